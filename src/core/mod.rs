//! Core domain models
//!
//! This module defines the fundamental data structures that represent
//! steps, pipelines, clusters, and their configuration.

pub mod cluster;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod step;

pub use cluster::*;
pub use error::BuildError;
pub use pipeline::*;
pub use step::*;
