//! ECS Fleet Report - inventory reports for Amazon ECS clusters
//!
//! Discovers clusters whose ARN contains a filter string, walks their running
//! tasks or service deployments down to task definitions and container images,
//! and renders the result either as indented task lines or as a deployment
//! table.

pub mod api;
pub mod aws;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod inventory;
pub mod logging;
pub mod names;
pub mod report;

pub use error::{Error, Result};
