//! Command-line driver shared by the `ecs-tasks` and `ecs-services` binaries.
//!
//! Both binaries accept the same arguments and differ only in which
//! traversal they run and which presenter renders it.

use anyhow::Result;
use clap::{CommandFactory, FromArgMatches, Parser};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};

use crate::api::ContainerOrchestrationApi;
use crate::aws::EcsClient;
use crate::config::Config;
use crate::filter::ImageFilter;
use crate::inventory::{Discovery, FailureMode};
use crate::logging;
use crate::report::{no_matching_clusters, DeploymentTable, OutputFormat, Presenter, TaskLines};

/// Arguments common to both reports.
#[derive(Debug, Parser)]
#[command(version)]
pub struct Cli {
    /// Partial cluster name; clusters whose ARN contains it are reported
    pub cluster_filter: String,

    /// AWS region (overrides the config file)
    #[arg(long)]
    pub region: Option<String>,

    /// AWS profile (overrides the config file)
    #[arg(long)]
    pub profile: Option<String>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Report a failing cluster with an error marker instead of aborting
    #[arg(long)]
    pub keep_going: bool,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Which report a binary produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Running tasks and their full image references
    RunningTasks,
    /// One table row per service deployment
    ServiceDeployments,
}

impl ReportKind {
    fn command_name(&self) -> &'static str {
        match self {
            ReportKind::RunningTasks => "ecs-tasks",
            ReportKind::ServiceDeployments => "ecs-services",
        }
    }

    fn about(&self) -> &'static str {
        match self {
            ReportKind::RunningTasks => {
                "List running tasks and container images of matching ECS clusters"
            }
            ReportKind::ServiceDeployments => {
                "Tabulate service deployments and container images of matching ECS clusters"
            }
        }
    }
}

/// Settings resolved from the config file and command line.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    pub image_filter: ImageFilter,
    pub failure_mode: FailureMode,
    pub format: OutputFormat,
}

impl ReportOptions {
    /// Merges flags over the config file. Exclude patterns are compiled here,
    /// before any request is sent.
    ///
    /// # Arguments
    /// * `cli` - Parsed command-line arguments
    /// * `config` - Loaded configuration file
    ///
    /// # Errors
    /// Returns an error if an exclude pattern is not a valid regular expression.
    pub fn resolve(cli: &Cli, config: &Config) -> Result<Self> {
        let keep_going = cli.keep_going || config.behavior.keep_going;
        Ok(Self {
            image_filter: config.filter.image_filter()?,
            failure_mode: if keep_going {
                FailureMode::KeepGoing
            } else {
                FailureMode::FailFast
            },
            format: if cli.json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
        })
    }
}

/// Runs discovery for `kind` and returns the rendered report.
///
/// When no cluster matches, the report is the single "no matching clusters"
/// line regardless of the output format.
///
/// # Arguments
/// * `api` - The orchestration backend to query
/// * `kind` - Which report to produce
/// * `cluster_filter` - Substring a cluster ARN must contain
/// * `options` - Exclusion, failure mode and output format
///
/// # Returns
/// The complete report text, ready to be written to stdout
///
/// # Errors
/// Any upstream failure in [`FailureMode::FailFast`], or a ListClusters
/// failure in either mode. Nothing is rendered in that case.
pub async fn generate<A>(
    api: &A,
    kind: ReportKind,
    cluster_filter: &str,
    options: &ReportOptions,
) -> Result<String>
where
    A: ContainerOrchestrationApi + ?Sized,
{
    let discovery = Discovery::new(api, options.failure_mode);
    let clusters = discovery.list_matching_clusters(cluster_filter).await?;
    if clusters.is_empty() {
        return Ok(no_matching_clusters(cluster_filter));
    }

    let output = match kind {
        ReportKind::RunningTasks => {
            let inventory = discovery.running_tasks(&clusters).await?;
            TaskLines::new(options.image_filter.clone(), options.format).render(&inventory)?
        }
        ReportKind::ServiceDeployments => {
            let inventory = discovery.service_deployments(&clusters).await?;
            DeploymentTable::new(options.image_filter.clone(), options.format)
                .render(&inventory)?
        }
    };
    Ok(output)
}

fn parse_args(kind: ReportKind) -> Cli {
    let matches = Cli::command()
        .name(kind.command_name())
        .about(kind.about())
        .get_matches();
    Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

async fn run(kind: ReportKind, cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let options = ReportOptions::resolve(&cli, &config)?;

    let client = EcsClient::new(
        cli.region.clone().or(config.aws.region),
        cli.profile.clone().or(config.aws.profile),
    )
    .await;

    let output = generate(&client, kind, &cli.cluster_filter, &options).await?;
    info!(report = kind.command_name(), bytes = output.len(), "report generated");

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    if !output.is_empty() && !output.ends_with('\n') {
        writeln!(stdout)?;
    }
    Ok(())
}

/// Entry point of both binaries.
///
/// A missing cluster filter is reported by clap on stderr with a usage
/// message before any request is made.
pub async fn main(kind: ReportKind) -> ExitCode {
    let cli = parse_args(kind);
    logging::init(cli.verbose);

    match run(kind, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!(error = ?err, "run failed");
            eprintln!("{}", fatal_message(&err));
            ExitCode::FAILURE
        }
    }
}

/// One-line diagnostic printed on stderr for a failed run, independent of the
/// log filter.
fn fatal_message(err: &anyhow::Error) -> String {
    let message = format!("Error: {err:#}");
    message.lines().collect::<Vec<_>>().join(" ")
}
