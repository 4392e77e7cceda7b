//! `ecs-tasks` - running tasks and container images of matching ECS clusters.
//!
//! Prints one block per cluster, one line per running task and one line per
//! container image, with the full image reference.

use ecs_fleet_report::cli::{self, ReportKind};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    cli::main(ReportKind::RunningTasks).await
}
