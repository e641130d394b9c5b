//! Core types for the Sprig templating engine.
//!
//! This crate provides the foundational pieces used across all other sprig
//! crates:
//! - Virtual-node descriptors and their builders
//! - Runtime values and deferred expressions
//! - The `Reactive` scope and its `Binding` resolver
//! - The host-DOM boundary trait
//! - Error types

pub mod errors;
pub mod host;
pub mod node;
pub mod scope;
pub mod value;

pub use errors::*;
pub use host::*;
pub use node::*;
pub use scope::*;
pub use value::*;
