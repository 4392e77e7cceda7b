//! Read-only view of the ECS control plane.
//!
//! [`ContainerOrchestrationApi`] is the seam between discovery and the AWS
//! SDK. Every call returns a single page of results; pagination tokens are
//! never followed.

use async_trait::async_trait;

use crate::error::Result;

/// Desired status used when listing tasks. Reports only look at running tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesiredStatus {
    Running,
}

impl DesiredStatus {
    /// Wire value sent to ECS
    pub fn as_str(&self) -> &'static str {
        match self {
            DesiredStatus::Running => "RUNNING",
        }
    }
}

/// A described task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Full ARN of the task
    pub task_arn: String,
    /// ARN of the task definition the task was started from
    pub task_definition_arn: String,
}

/// A described service with its deployments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    /// Full ARN of the service
    pub service_arn: String,
    /// Deployments in the order ECS reports them (newest first)
    pub deployments: Vec<Deployment>,
}

/// One revision of a service's task definition with its replica counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    /// ARN of the deployment's task definition
    pub task_definition_arn: String,
    pub desired_count: i32,
    pub pending_count: i32,
    pub running_count: i32,
}

/// A task definition and its containers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDefinition {
    pub task_definition_arn: String,
    pub container_definitions: Vec<ContainerDefinition>,
}

/// A container within a task definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerDefinition {
    pub name: String,
    /// Image reference, possibly with registry and repository prefix
    pub image: String,
}

/// The read operations discovery needs from the orchestration service.
///
/// Implementations must be idempotent and side-effect free.
#[async_trait]
pub trait ContainerOrchestrationApi: Send + Sync {
    /// Lists the ARNs of all clusters visible to the caller.
    async fn list_clusters(&self) -> Result<Vec<String>>;

    /// Lists task ARNs in `cluster` with the given desired status.
    ///
    /// # Arguments
    /// * `cluster` - The cluster name or ARN
    /// * `desired_status` - Only tasks with this desired status are listed
    ///
    /// # Errors
    /// Returns [`crate::Error::Upstream`] naming the cluster if the call fails.
    async fn list_tasks(
        &self,
        cluster: &str,
        desired_status: DesiredStatus,
    ) -> Result<Vec<String>>;

    /// Describes the given tasks.
    ///
    /// # Arguments
    /// * `cluster` - The cluster name or ARN the tasks belong to
    /// * `task_arns` - Full task ARNs
    ///
    /// # Returns
    /// The described tasks. Tasks ECS cannot find are left out rather than
    /// reported as an error.
    ///
    /// # Errors
    /// Returns [`crate::Error::Upstream`] if the call fails.
    async fn describe_tasks(&self, cluster: &str, task_arns: &[String]) -> Result<Vec<Task>>;

    /// Describes a task definition and its containers.
    ///
    /// # Arguments
    /// * `task_definition` - Task definition ARN or `family:revision`
    ///
    /// # Errors
    /// Returns [`crate::Error::Upstream`] naming the task definition if the call
    /// fails, or [`crate::Error::TaskDefinitionNotFound`] if the response is empty.
    async fn describe_task_definition(&self, task_definition: &str) -> Result<TaskDefinition>;

    /// Lists service ARNs in `cluster`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Upstream`] naming the cluster if the call fails.
    async fn list_services(&self, cluster: &str) -> Result<Vec<String>>;

    /// Describes the given services in one call.
    ///
    /// # Arguments
    /// * `cluster` - The cluster name or ARN the services belong to
    /// * `service_arns` - Service ARNs as returned by [`Self::list_services`]
    ///
    /// # Errors
    /// Returns [`crate::Error::Upstream`] naming the cluster if the call fails.
    async fn describe_services(
        &self,
        cluster: &str,
        service_arns: &[String],
    ) -> Result<Vec<Service>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desired_status_wire_values() {
        assert_eq!(DesiredStatus::Running.as_str(), "RUNNING");
    }
}
