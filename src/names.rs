//! Short display names for ARNs and image references.

/// Returns the last `/`-delimited segment of a resource identifier.
///
/// Identifiers without a `/` are returned unchanged. A trailing `/` yields an
/// empty name.
///
/// # Examples
/// ```
/// use ecs_fleet_report::names::extract_name;
///
/// assert_eq!(extract_name("arn:aws:ecs:us-east-1:123456789012:cluster/prod-web"), "prod-web");
/// assert_eq!(extract_name("prod-web"), "prod-web");
/// ```
pub fn extract_name(identifier: &str) -> &str {
    identifier.split('/').next_back().unwrap_or(identifier)
}

/// Returns the last path component of a container image reference.
///
/// The registry and repository path are stripped but a `:tag` or `@digest`
/// suffix is kept, so `registry.example.com/team/app:2.0` becomes `app:2.0`.
pub fn extract_image_name(image: &str) -> &str {
    extract_name(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_arn_extraction() {
        let full_arn = "arn:aws:ecs:us-east-1:123456789012:cluster/my-cluster";
        assert_eq!(extract_name(full_arn), "my-cluster");
    }

    #[test]
    fn test_cluster_arn_extraction_simple_name() {
        assert_eq!(extract_name("my-cluster"), "my-cluster");
    }

    #[test]
    fn test_task_id_extraction_with_multiple_slashes() {
        let task_arn = "arn:aws:ecs:us-east-1:123456789012:task/cluster-name/1234567890abcdef";
        assert_eq!(extract_name(task_arn), "1234567890abcdef");
    }

    #[test]
    fn test_task_definition_keeps_revision() {
        let arn = "arn:aws:ecs:us-east-1:123456789012:task-definition/web:42";
        assert_eq!(extract_name(arn), "web:42");
    }

    #[test]
    fn test_trailing_slash_yields_empty_name() {
        assert_eq!(extract_name("cluster/"), "");
    }

    #[test]
    fn test_image_name_strips_registry_path() {
        let image = "123456789012.dkr.ecr.us-east-1.amazonaws.com/team/app:2.0";
        assert_eq!(extract_image_name(image), "app:2.0");
    }

    #[test]
    fn test_image_name_bare() {
        assert_eq!(extract_image_name("redis:7"), "redis:7");
        assert_eq!(extract_image_name("busybox"), "busybox");
    }
}
