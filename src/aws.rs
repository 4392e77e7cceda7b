//! AWS ECS integration module.
//!
//! This module provides [`EcsClient`], the `aws-sdk-ecs` backed implementation
//! of [`ContainerOrchestrationApi`]. Each method issues exactly one request and
//! maps the SDK output into the plain types of [`crate::api`].

use async_trait::async_trait;
use aws_sdk_ecs::error::DisplayErrorContext;
use aws_sdk_ecs::types::Failure;
use aws_sdk_ecs::Client;
use tracing::{debug, warn};

use crate::api::{
    ContainerDefinition, ContainerOrchestrationApi, Deployment, DesiredStatus, Service, Task,
    TaskDefinition,
};
use crate::error::{Error, Result};

/// Client for reading cluster, task and service state from AWS ECS.
pub struct EcsClient {
    /// AWS ECS SDK client
    client: Client,
}

impl EcsClient {
    /// Creates a new ECS client with optional region and profile configuration.
    ///
    /// Credentials, region and profile resolution are delegated to
    /// `aws-config`; the overrides only take precedence over the environment
    /// and shared config files.
    ///
    /// # Arguments
    /// * `region` - Optional AWS region override (e.g., "us-east-1")
    /// * `profile` - Optional AWS profile name from ~/.aws/credentials
    pub async fn new(region: Option<String>, profile: Option<String>) -> Self {
        let mut config_loader = aws_config::from_env();

        if let Some(region_str) = region {
            config_loader = config_loader.region(aws_config::Region::new(region_str));
        }

        if let Some(profile_name) = profile {
            config_loader = config_loader.profile_name(profile_name);
        }

        let config = config_loader.load().await;
        Self {
            client: Client::new(&config),
        }
    }

}

/// Renders an SDK error with its full source chain on one line.
fn cause<E: std::error::Error>(err: E) -> String {
    DisplayErrorContext(err).to_string()
}

fn log_failures(action: &str, cluster: &str, failures: &[Failure]) {
    for failure in failures {
        warn!(
            action,
            cluster,
            arn = failure.arn().unwrap_or("unknown"),
            reason = failure.reason().unwrap_or("unknown"),
            detail = failure.detail().unwrap_or(""),
            "ECS reported a describe failure"
        );
    }
}

#[async_trait]
impl ContainerOrchestrationApi for EcsClient {
    async fn list_clusters(&self) -> Result<Vec<String>> {
        debug!("listing clusters");
        let resp = self
            .client
            .list_clusters()
            .send()
            .await
            .map_err(|e| Error::ListClusters { cause: cause(e) })?;

        Ok(resp.cluster_arns().to_vec())
    }

    async fn list_tasks(
        &self,
        cluster: &str,
        desired_status: DesiredStatus,
    ) -> Result<Vec<String>> {
        debug!(cluster, status = desired_status.as_str(), "listing tasks");
        let resp = self
            .client
            .list_tasks()
            .cluster(cluster)
            .desired_status(aws_sdk_ecs::types::DesiredStatus::from(
                desired_status.as_str(),
            ))
            .send()
            .await
            .map_err(|e| Error::upstream("list tasks for cluster", cluster, cause(e)))?;

        Ok(resp.task_arns().to_vec())
    }

    async fn describe_tasks(&self, cluster: &str, task_arns: &[String]) -> Result<Vec<Task>> {
        debug!(cluster, count = task_arns.len(), "describing tasks");
        let resource = match task_arns {
            [single] => single.as_str(),
            _ => cluster,
        };
        let resp = self
            .client
            .describe_tasks()
            .cluster(cluster)
            .set_tasks(Some(task_arns.to_vec()))
            .send()
            .await
            .map_err(|e| Error::upstream("describe task", resource, cause(e)))?;

        log_failures("describe tasks", cluster, resp.failures());

        let tasks = resp
            .tasks()
            .iter()
            .filter_map(|t| match (t.task_arn(), t.task_definition_arn()) {
                (Some(task_arn), Some(task_definition_arn)) => Some(Task {
                    task_arn: task_arn.to_string(),
                    task_definition_arn: task_definition_arn.to_string(),
                }),
                _ => {
                    warn!(cluster, "skipping task without ARN or task definition");
                    None
                }
            })
            .collect();

        Ok(tasks)
    }

    async fn describe_task_definition(&self, task_definition: &str) -> Result<TaskDefinition> {
        debug!(task_definition, "describing task definition");
        let resp = self
            .client
            .describe_task_definition()
            .task_definition(task_definition)
            .send()
            .await
            .map_err(|e| Error::upstream("describe task definition", task_definition, cause(e)))?;

        let definition = resp
            .task_definition()
            .ok_or_else(|| Error::TaskDefinitionNotFound(task_definition.to_string()))?;

        let container_definitions = definition
            .container_definitions()
            .iter()
            .filter_map(|c| {
                let name = c.name().unwrap_or("unknown").to_string();
                match c.image() {
                    Some(image) => Some(ContainerDefinition {
                        name,
                        image: image.to_string(),
                    }),
                    None => {
                        debug!(task_definition, container = %name, "container has no image");
                        None
                    }
                }
            })
            .collect();

        Ok(TaskDefinition {
            task_definition_arn: definition
                .task_definition_arn()
                .unwrap_or(task_definition)
                .to_string(),
            container_definitions,
        })
    }

    async fn list_services(&self, cluster: &str) -> Result<Vec<String>> {
        debug!(cluster, "listing services");
        let resp = self
            .client
            .list_services()
            .cluster(cluster)
            .send()
            .await
            .map_err(|e| Error::upstream("list services for cluster", cluster, cause(e)))?;

        Ok(resp.service_arns().to_vec())
    }

    async fn describe_services(
        &self,
        cluster: &str,
        service_arns: &[String],
    ) -> Result<Vec<Service>> {
        debug!(cluster, count = service_arns.len(), "describing services");
        let resp = self
            .client
            .describe_services()
            .cluster(cluster)
            .set_services(Some(service_arns.to_vec()))
            .send()
            .await
            .map_err(|e| Error::upstream("describe services for cluster", cluster, cause(e)))?;

        log_failures("describe services", cluster, resp.failures());

        let services = resp
            .services()
            .iter()
            .map(|s| {
                let service_arn = s.service_arn().unwrap_or("unknown").to_string();
                let deployments = s
                    .deployments()
                    .iter()
                    .filter_map(|d| {
                        let Some(task_definition_arn) = d.task_definition() else {
                            warn!(
                                service = %service_arn,
                                "skipping deployment without task definition"
                            );
                            return None;
                        };
                        Some(Deployment {
                            task_definition_arn: task_definition_arn.to_string(),
                            desired_count: d.desired_count(),
                            pending_count: d.pending_count(),
                            running_count: d.running_count(),
                        })
                    })
                    .collect();

                Service {
                    service_arn,
                    deployments,
                }
            })
            .collect();

        Ok(services)
    }
}
