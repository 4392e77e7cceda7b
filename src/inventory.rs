//! Discovery traversals over the orchestration API.
//!
//! Both reports walk the same hierarchy, clusters to workloads to task
//! definitions to images, and produce the same intermediate shape: one
//! [`ClusterInventory`] per matched cluster holding one [`Workload`] per
//! running task or per service deployment. Presenters in [`crate::report`]
//! only decide how to print it.
//!
//! All calls are issued sequentially and in upstream order, so a fixed
//! snapshot always yields the same inventory.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::api::{ContainerOrchestrationApi, DesiredStatus, TaskDefinition};
use crate::error::{Error, Result};
use crate::filter::matching_clusters;
use crate::names::extract_name;

/// How discovery reacts to an upstream failure inside a cluster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailureMode {
    /// The first failure aborts the whole run
    #[default]
    FailFast,
    /// A failure is recorded on its cluster and the remaining clusters continue
    KeepGoing,
}

/// Replica counts of a service deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReplicaCounts {
    pub desired: i32,
    pub pending: i32,
    pub running: i32,
}

/// Where a workload came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkloadSource {
    /// A task with desired status RUNNING
    Task { task_arn: String },
    /// A deployment of a service
    Deployment {
        service_arn: String,
        counts: ReplicaCounts,
    },
}

/// A container image as declared in a task definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerImage {
    pub container_name: String,
    /// Full image reference, unfiltered
    pub image: String,
}

/// A task or deployment resolved down to its container images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Workload {
    pub source: WorkloadSource,
    pub task_definition_arn: String,
    /// Every container image of the task definition, in definition order
    pub images: Vec<ContainerImage>,
}

/// Everything discovered for one matched cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterInventory {
    pub cluster_arn: String,
    pub workloads: Vec<Workload>,
    /// Set when the cluster failed in [`FailureMode::KeepGoing`]; workloads
    /// discovered before the failure are discarded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ClusterInventory {
    pub fn cluster_name(&self) -> &str {
        extract_name(&self.cluster_arn)
    }

    fn failed(cluster_arn: &str, err: &Error) -> Self {
        Self {
            cluster_arn: cluster_arn.to_string(),
            workloads: Vec::new(),
            error: Some(err.to_string()),
        }
    }
}

/// Walks the orchestration API for a set of clusters.
pub struct Discovery<'a, A: ?Sized> {
    api: &'a A,
    mode: FailureMode,
}

impl<'a, A> Discovery<'a, A>
where
    A: ContainerOrchestrationApi + ?Sized,
{
    pub fn new(api: &'a A, mode: FailureMode) -> Self {
        Self { api, mode }
    }

    /// Lists all clusters and keeps those whose ARN contains `filter`.
    ///
    /// # Returns
    /// Matching cluster ARNs in upstream order. An empty vector means nothing
    /// matched and is not an error.
    ///
    /// # Errors
    /// A failing ListClusters call is fatal in every [`FailureMode`].
    pub async fn list_matching_clusters(&self, filter: &str) -> Result<Vec<String>> {
        let clusters = self.api.list_clusters().await?;
        let total = clusters.len();
        let matched = matching_clusters(clusters, filter);
        info!(filter, total, matched = matched.len(), "matched clusters");
        Ok(matched)
    }

    /// Resolves the running tasks of each cluster to their images.
    ///
    /// For every task this issues DescribeTasks, then DescribeTaskDefinition.
    ///
    /// # Arguments
    /// * `clusters` - Cluster ARNs, usually from [`Self::list_matching_clusters`]
    ///
    /// # Returns
    /// One [`ClusterInventory`] per cluster, in the given order
    ///
    /// # Errors
    /// In [`FailureMode::FailFast`], the first upstream failure or a task
    /// missing from DescribeTasks ([`Error::TaskNotFound`]).
    pub async fn running_tasks(&self, clusters: &[String]) -> Result<Vec<ClusterInventory>> {
        let mut inventories = Vec::with_capacity(clusters.len());
        for cluster in clusters {
            let outcome = self.cluster_tasks(cluster).await;
            inventories.push(self.settle(cluster, outcome)?);
        }
        Ok(inventories)
    }

    /// Resolves the service deployments of each cluster to their images.
    ///
    /// Services are described in one batch per cluster; every deployment then
    /// costs one DescribeTaskDefinition call. Clusters without services are
    /// kept with no workloads.
    ///
    /// # Errors
    /// In [`FailureMode::FailFast`], the first upstream failure.
    pub async fn service_deployments(
        &self,
        clusters: &[String],
    ) -> Result<Vec<ClusterInventory>> {
        let mut inventories = Vec::with_capacity(clusters.len());
        for cluster in clusters {
            let outcome = self.cluster_deployments(cluster).await;
            inventories.push(self.settle(cluster, outcome)?);
        }
        Ok(inventories)
    }

    fn settle(&self, cluster: &str, outcome: Result<Vec<Workload>>) -> Result<ClusterInventory> {
        match outcome {
            Ok(workloads) => Ok(ClusterInventory {
                cluster_arn: cluster.to_string(),
                workloads,
                error: None,
            }),
            Err(err) if self.mode == FailureMode::KeepGoing => {
                warn!(cluster, error = %err, "cluster discovery failed, continuing");
                Ok(ClusterInventory::failed(cluster, &err))
            }
            Err(err) => Err(err),
        }
    }

    async fn cluster_tasks(&self, cluster: &str) -> Result<Vec<Workload>> {
        let task_arns = self.api.list_tasks(cluster, DesiredStatus::Running).await?;
        debug!(cluster, tasks = task_arns.len(), "listed running tasks");

        let mut workloads = Vec::with_capacity(task_arns.len());
        for task_arn in task_arns {
            let described = self
                .api
                .describe_tasks(cluster, std::slice::from_ref(&task_arn))
                .await?;
            let task = described
                .into_iter()
                .find(|t| t.task_arn == task_arn)
                .ok_or_else(|| Error::TaskNotFound {
                    cluster: cluster.to_string(),
                    task: extract_name(&task_arn).to_string(),
                })?;

            let definition = self
                .api
                .describe_task_definition(&task.task_definition_arn)
                .await?;

            workloads.push(Workload {
                source: WorkloadSource::Task { task_arn },
                task_definition_arn: task.task_definition_arn,
                images: container_images(definition),
            });
        }
        Ok(workloads)
    }

    async fn cluster_deployments(&self, cluster: &str) -> Result<Vec<Workload>> {
        let service_arns = self.api.list_services(cluster).await?;
        if service_arns.is_empty() {
            debug!(cluster, "no services, skipping");
            return Ok(Vec::new());
        }

        let services = self.api.describe_services(cluster, &service_arns).await?;

        let mut workloads = Vec::new();
        for service in services {
            for deployment in service.deployments {
                let definition = self
                    .api
                    .describe_task_definition(&deployment.task_definition_arn)
                    .await?;

                workloads.push(Workload {
                    source: WorkloadSource::Deployment {
                        service_arn: service.service_arn.clone(),
                        counts: ReplicaCounts {
                            desired: deployment.desired_count,
                            pending: deployment.pending_count,
                            running: deployment.running_count,
                        },
                    },
                    task_definition_arn: deployment.task_definition_arn,
                    images: container_images(definition),
                });
            }
        }
        Ok(workloads)
    }
}

fn container_images(definition: TaskDefinition) -> Vec<ContainerImage> {
    definition
        .container_definitions
        .into_iter()
        .map(|c| ContainerImage {
            container_name: c.name,
            image: c.image,
        })
        .collect()
}
