//! Report presenters.
//!
//! Two presenters render a discovered inventory:
//!
//! - [`TaskLines`] prints one indented block per cluster with each running
//!   task and its full image references.
//! - [`DeploymentTable`] flattens service deployments into [`ReportRow`]s and
//!   renders them with `comfy-table`.
//!
//! Both honour the same [`ImageFilter`] and can emit JSON instead of text.

use anyhow::Result;
use comfy_table::{presets::ASCII_FULL, Table};
use serde::Serialize;

use crate::filter::ImageFilter;
use crate::inventory::{ClusterInventory, WorkloadSource};
use crate::names::{extract_image_name, extract_name};

/// Column headers of the deployment table
pub const TABLE_HEADERS: [&str; 6] = [
    "Cluster Name",
    "Task Definition",
    "Desired Count",
    "Pending Count",
    "Running Count",
    "Container Image",
];

/// Separator between image names in a row summary
pub const IMAGE_SEPARATOR: &str = ", ";

/// Marker shown in the task definition column of a failed cluster
const ERROR_MARKER: &str = "ERROR";

/// Output format of a presenter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Indented lines or table
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Line printed when the cluster filter matches nothing.
pub fn no_matching_clusters(filter: &str) -> String {
    format!("No matching clusters found for filter: {filter}")
}

/// Renders an inventory into the final report text.
pub trait Presenter {
    /// Renders `inventory` in the presenter's output format.
    ///
    /// # Errors
    /// Returns an error only if JSON serialization fails.
    fn render(&self, inventory: &[ClusterInventory]) -> Result<String>;
}

/// Per-cluster, per-task listing of running container images.
#[derive(Debug, Clone)]
pub struct TaskLines {
    filter: ImageFilter,
    format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct ClusterTasks<'a> {
    cluster: &'a str,
    tasks: Vec<TaskImages<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct TaskImages<'a> {
    task_id: &'a str,
    task_definition: &'a str,
    images: Vec<&'a str>,
}

impl TaskLines {
    pub fn new(filter: ImageFilter, format: OutputFormat) -> Self {
        Self { filter, format }
    }

    fn collect<'a>(&self, inventory: &'a [ClusterInventory]) -> Vec<ClusterTasks<'a>> {
        inventory
            .iter()
            .map(|cluster| ClusterTasks {
                cluster: cluster.cluster_name(),
                tasks: cluster
                    .workloads
                    .iter()
                    .filter_map(|w| match &w.source {
                        WorkloadSource::Task { task_arn } => Some(TaskImages {
                            task_id: extract_name(task_arn),
                            task_definition: extract_name(&w.task_definition_arn),
                            images: self
                                .filter
                                .retain(w.images.iter().map(|i| i.image.as_str())),
                        }),
                        WorkloadSource::Deployment { .. } => None,
                    })
                    .collect(),
                error: cluster.error.as_deref(),
            })
            .collect()
    }
}

impl Presenter for TaskLines {
    fn render(&self, inventory: &[ClusterInventory]) -> Result<String> {
        let clusters = self.collect(inventory);
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(&clusters)?);
        }

        let mut output = String::new();
        for cluster in clusters {
            output.push_str(&format!("Cluster: {}\n", cluster.cluster));
            if let Some(error) = cluster.error {
                output.push_str(&format!("\t{ERROR_MARKER}: {error}\n"));
            }
            for task in cluster.tasks {
                output.push_str(&format!("\tTask ID: {}\n", task.task_id));
                for image in task.images {
                    output.push_str(&format!("\t\tContainer Image: {image}\n"));
                }
            }
        }
        Ok(output)
    }
}

/// One table row per service deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub cluster_name: String,
    pub task_definition_name: String,
    pub desired_count: i32,
    pub pending_count: i32,
    pub running_count: i32,
    /// Leaf image names joined with [`IMAGE_SEPARATOR`]
    pub container_images: String,
}

impl ReportRow {
    fn cells(&self) -> Vec<String> {
        vec![
            self.cluster_name.clone(),
            self.task_definition_name.clone(),
            self.desired_count.to_string(),
            self.pending_count.to_string(),
            self.running_count.to_string(),
            self.container_images.clone(),
        ]
    }
}

/// A table entry: a deployment row or a cluster that failed discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TableEntry {
    Row(ReportRow),
    Failed { cluster_name: String, error: String },
}

impl TableEntry {
    fn cells(&self) -> Vec<String> {
        match self {
            TableEntry::Row(row) => row.cells(),
            TableEntry::Failed {
                cluster_name,
                error,
            } => vec![
                cluster_name.clone(),
                ERROR_MARKER.to_string(),
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
                error.clone(),
            ],
        }
    }
}

/// Deployment summary table.
#[derive(Debug, Clone)]
pub struct DeploymentTable {
    filter: ImageFilter,
    format: OutputFormat,
}

impl DeploymentTable {
    pub fn new(filter: ImageFilter, format: OutputFormat) -> Self {
        Self { filter, format }
    }

    /// Flattens the inventory into table entries.
    ///
    /// # Returns
    /// One [`TableEntry::Row`] per deployment and one [`TableEntry::Failed`]
    /// per failed cluster. Order is cluster, then service, then deployment,
    /// as discovered.
    ///
    /// Images are reduced to their leaf names first and exclusion is decided
    /// on those, so a registry host or path never hides an image.
    pub fn entries(&self, inventory: &[ClusterInventory]) -> Vec<TableEntry> {
        let mut entries = Vec::new();
        for cluster in inventory {
            if let Some(error) = &cluster.error {
                entries.push(TableEntry::Failed {
                    cluster_name: cluster.cluster_name().to_string(),
                    error: error.clone(),
                });
                continue;
            }

            for workload in &cluster.workloads {
                let WorkloadSource::Deployment { counts, .. } = &workload.source else {
                    continue;
                };

                let images = self
                    .filter
                    .retain(
                        workload
                            .images
                            .iter()
                            .map(|i| extract_image_name(&i.image)),
                    )
                    .join(IMAGE_SEPARATOR);

                entries.push(TableEntry::Row(ReportRow {
                    cluster_name: cluster.cluster_name().to_string(),
                    task_definition_name: extract_name(&workload.task_definition_arn).to_string(),
                    desired_count: counts.desired,
                    pending_count: counts.pending,
                    running_count: counts.running,
                    container_images: images,
                }));
            }
        }
        entries
    }
}

impl Presenter for DeploymentTable {
    fn render(&self, inventory: &[ClusterInventory]) -> Result<String> {
        let entries = self.entries(inventory);
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(&entries)?);
        }

        let mut table = Table::new();
        table.load_preset(ASCII_FULL).set_header(TABLE_HEADERS);

        for entry in &entries {
            table.add_row(entry.cells());
        }

        Ok(table.to_string())
    }
}
