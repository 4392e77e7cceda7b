//! Cluster matching and container image exclusion.

use regex::Regex;

use crate::error::{Error, Result};

/// Image substring excluded when no configuration says otherwise.
pub const DEFAULT_EXCLUDED_IMAGE: &str = "nginx";

/// Keeps the cluster identifiers containing `filter`, in upstream order.
///
/// Matching is a plain case-sensitive substring test on the full identifier,
/// so a cluster name or any other part of the ARN can be used.
///
/// # Arguments
/// * `clusters` - Cluster ARNs as listed by ECS
/// * `filter` - Substring to look for
///
/// # Returns
/// The matching ARNs as a subsequence of `clusters`, possibly empty
pub fn matching_clusters<I, S>(clusters: I, filter: &str) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    clusters
        .into_iter()
        .map(Into::into)
        .filter(|arn| arn.contains(filter))
        .collect()
}

/// Predicate deciding which container images are left out of reports.
///
/// An image is excluded when its full reference contains any of the
/// configured substrings or matches any of the configured patterns.
#[derive(Debug, Clone)]
pub struct ImageFilter {
    substrings: Vec<String>,
    patterns: Vec<Regex>,
}

impl Default for ImageFilter {
    fn default() -> Self {
        Self {
            substrings: vec![DEFAULT_EXCLUDED_IMAGE.to_string()],
            patterns: Vec::new(),
        }
    }
}

impl ImageFilter {
    /// Builds a filter from exclude substrings and regular expressions.
    ///
    /// # Arguments
    /// * `substrings` - Images containing any of these are excluded
    /// * `patterns` - Images matching any of these regular expressions are excluded
    ///
    /// # Errors
    /// Returns [`Error::InvalidExcludePattern`] if a pattern does not compile.
    pub fn new<S, P>(substrings: S, patterns: P) -> Result<Self>
    where
        S: IntoIterator,
        S::Item: Into<String>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                let p = p.as_ref();
                Regex::new(p).map_err(|e| Error::InvalidExcludePattern {
                    pattern: p.to_string(),
                    cause: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            substrings: substrings.into_iter().map(Into::into).collect(),
            patterns,
        })
    }

    /// Returns true if `image` contains an exclude substring or matches an
    /// exclude pattern. Matching is case-sensitive.
    pub fn is_excluded(&self, image: &str) -> bool {
        self.substrings.iter().any(|s| image.contains(s.as_str()))
            || self.patterns.iter().any(|p| p.is_match(image))
    }

    /// Keeps the images that are not excluded, in encounter order.
    pub fn retain<'a, I>(&self, images: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        images
            .into_iter()
            .filter(|image| !self.is_excluded(image))
            .collect()
    }
}
