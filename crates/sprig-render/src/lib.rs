//! Render evaluator and host backends for Sprig templates.
//!
//! This crate materializes bound template graphs into host DOM nodes:
//! - `Renderer` walks the graph and dispatches per node kind
//! - `SetterTable` caches property-vs-attribute resolution per `(tag, key)`
//! - `MemoryHost` (feature `memory`, on by default) is the in-memory
//!   reference backend used in tests and benchmarks
//!
//! # Example
//!
//! ```
//! use sprig_core::tag;
//! use sprig_render::{mount, MemoryHost};
//! use sprig_core::Host;
//!
//! let mut host = MemoryHost::new();
//! let root = host.create_element("body", None).unwrap();
//! let view = tag("h1").child("Hello, World!").build();
//! mount(&mut host, root, &view).unwrap();
//! assert_eq!(host.text_of(root), "Hello, World!");
//! ```

mod renderer;
mod setters;

#[cfg(feature = "memory")]
mod memory;

pub use renderer::{mount, render_with, Renderer};
pub use setters::{Setter, SetterTable};

#[cfg(feature = "memory")]
pub use memory::{MemoryHost, MemoryNode};
