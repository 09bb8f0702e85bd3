//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundary
//! between the application and the trained model.

mod pipeline;

pub use pipeline::{Pipeline, PipelineError};
