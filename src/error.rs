//! Error types for fleet discovery.
//!
//! Every upstream failure carries the operation that failed, the identifier it
//! was issued for and the rendered cause, so the top-level driver can print a
//! single diagnostic line without exposing the SDK's internal error chain.

/// Result type alias for discovery operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while discovering clusters, workloads and images.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// ListClusters failed
    #[error("failed to list clusters: {cause}")]
    ListClusters { cause: String },

    /// Any other list/describe call failed
    #[error("failed to {action} {resource}: {cause}")]
    Upstream {
        /// Operation being performed, e.g. "describe task definition"
        action: &'static str,
        /// Cluster, task or task definition the call was issued for
        resource: String,
        /// Rendered underlying cause
        cause: String,
    },

    /// DescribeTasks returned no entry for a task that was just listed
    #[error("task {task} not found in cluster {cluster}")]
    TaskNotFound { cluster: String, task: String },

    /// DescribeTaskDefinition returned an empty body
    #[error("task definition {0} not found")]
    TaskDefinitionNotFound(String),

    /// An exclude pattern from the configuration is not a valid regex
    #[error("invalid image exclude pattern {pattern:?}: {cause}")]
    InvalidExcludePattern { pattern: String, cause: String },
}

impl Error {
    /// Builds an [`Error::Upstream`] from any displayable cause.
    pub fn upstream(
        action: &'static str,
        resource: impl Into<String>,
        cause: impl std::fmt::Display,
    ) -> Self {
        Error::Upstream {
            action,
            resource: resource.into(),
            cause: cause.to_string(),
        }
    }
}
