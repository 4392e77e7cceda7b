//! In-memory orchestration API used by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use ecs_fleet_report::api::{
    ContainerDefinition, ContainerOrchestrationApi, Deployment, DesiredStatus, Service, Task,
    TaskDefinition,
};
use ecs_fleet_report::{Error, Result};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub const ACCOUNT: &str = "arn:aws:ecs:us-east-1:123456789012";

pub fn cluster_arn(name: &str) -> String {
    format!("{ACCOUNT}:cluster/{name}")
}

pub fn task_arn(cluster: &str, id: &str) -> String {
    format!("{ACCOUNT}:task/{cluster}/{id}")
}

pub fn service_arn(cluster: &str, name: &str) -> String {
    format!("{ACCOUNT}:service/{cluster}/{name}")
}

pub fn task_definition_arn(family_revision: &str) -> String {
    format!("{ACCOUNT}:task-definition/{family_revision}")
}

#[derive(Default)]
pub struct FakeEcs {
    clusters: Vec<String>,
    tasks: HashMap<String, Vec<Task>>,
    services: HashMap<String, Vec<Service>>,
    task_definitions: HashMap<String, Vec<ContainerDefinition>>,
    failing: HashSet<String>,
    undescribed: HashSet<String>,
    fail_list_clusters: bool,
    calls: Mutex<Vec<String>>,
}

impl FakeEcs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cluster(mut self, name: &str) -> Self {
        self.clusters.push(cluster_arn(name));
        self
    }

    pub fn running_task(mut self, cluster: &str, id: &str, task_definition: &str) -> Self {
        self.tasks
            .entry(cluster_arn(cluster))
            .or_default()
            .push(Task {
                task_arn: task_arn(cluster, id),
                task_definition_arn: task_definition_arn(task_definition),
            });
        self
    }

    /// Adds a service whose deployments are given as (task definition, desired, pending, running).
    pub fn service(
        mut self,
        cluster: &str,
        name: &str,
        deployments: &[(&str, i32, i32, i32)],
    ) -> Self {
        self.services
            .entry(cluster_arn(cluster))
            .or_default()
            .push(Service {
                service_arn: service_arn(cluster, name),
                deployments: deployments
                    .iter()
                    .map(|(td, desired, pending, running)| Deployment {
                        task_definition_arn: task_definition_arn(td),
                        desired_count: *desired,
                        pending_count: *pending,
                        running_count: *running,
                    })
                    .collect(),
            });
        self
    }

    pub fn task_definition(mut self, family_revision: &str, images: &[&str]) -> Self {
        self.task_definitions.insert(
            task_definition_arn(family_revision),
            images
                .iter()
                .enumerate()
                .map(|(i, image)| ContainerDefinition {
                    name: format!("container-{i}"),
                    image: image.to_string(),
                })
                .collect(),
        );
        self
    }

    /// Keeps a listed task out of `describe_tasks` responses, as ECS does for
    /// a task that stopped between the two calls.
    pub fn undescribed_task(mut self, cluster: &str, id: &str) -> Self {
        self.undescribed.insert(task_arn(cluster, id));
        self
    }

    /// Makes every call issued for `resource` fail.
    pub fn failing(mut self, resource: String) -> Self {
        self.failing.insert(resource);
        self
    }

    pub fn failing_list_clusters(mut self) -> Self {
        self.fail_list_clusters = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, action: &'static str, resource: &str) -> Result<()> {
        if self.failing.contains(resource) {
            return Err(Error::upstream(action, resource, "AccessDeniedException"));
        }
        Ok(())
    }
}

#[async_trait]
impl ContainerOrchestrationApi for FakeEcs {
    async fn list_clusters(&self) -> Result<Vec<String>> {
        self.record("list_clusters".to_string());
        if self.fail_list_clusters {
            return Err(Error::ListClusters {
                cause: "ExpiredTokenException".to_string(),
            });
        }
        Ok(self.clusters.clone())
    }

    async fn list_tasks(
        &self,
        cluster: &str,
        desired_status: DesiredStatus,
    ) -> Result<Vec<String>> {
        self.record(format!("list_tasks {cluster} {}", desired_status.as_str()));
        self.check("list tasks for cluster", cluster)?;
        Ok(self
            .tasks
            .get(cluster)
            .map(|tasks| tasks.iter().map(|t| t.task_arn.clone()).collect())
            .unwrap_or_default())
    }

    async fn describe_tasks(&self, cluster: &str, task_arns: &[String]) -> Result<Vec<Task>> {
        self.record(format!("describe_tasks {}", task_arns.join(",")));
        for arn in task_arns {
            self.check("describe task", arn)?;
        }
        Ok(self
            .tasks
            .get(cluster)
            .map(|tasks| {
                tasks
                    .iter()
                    .filter(|t| task_arns.contains(&t.task_arn))
                    .filter(|t| !self.undescribed.contains(&t.task_arn))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn describe_task_definition(&self, task_definition: &str) -> Result<TaskDefinition> {
        self.record(format!("describe_task_definition {task_definition}"));
        self.check("describe task definition", task_definition)?;
        let containers = self
            .task_definitions
            .get(task_definition)
            .ok_or_else(|| Error::TaskDefinitionNotFound(task_definition.to_string()))?;
        Ok(TaskDefinition {
            task_definition_arn: task_definition.to_string(),
            container_definitions: containers.clone(),
        })
    }

    async fn list_services(&self, cluster: &str) -> Result<Vec<String>> {
        self.record(format!("list_services {cluster}"));
        self.check("list services for cluster", cluster)?;
        Ok(self
            .services
            .get(cluster)
            .map(|services| services.iter().map(|s| s.service_arn.clone()).collect())
            .unwrap_or_default())
    }

    async fn describe_services(
        &self,
        cluster: &str,
        service_arns: &[String],
    ) -> Result<Vec<Service>> {
        self.record(format!("describe_services {cluster} {}", service_arns.len()));
        self.check("describe services for cluster", cluster)?;
        Ok(self
            .services
            .get(cluster)
            .map(|services| {
                services
                    .iter()
                    .filter(|s| service_arns.contains(&s.service_arn))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
