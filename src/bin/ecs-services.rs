//! `ecs-services` - service deployments of matching ECS clusters as a table.
//!
//! Prints one row per deployment with its replica counts and the short names
//! of its container images.

use ecs_fleet_report::cli::{self, ReportKind};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    cli::main(ReportKind::ServiceDeployments).await
}
