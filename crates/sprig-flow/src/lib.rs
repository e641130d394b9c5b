//! Built-in structural primitives for Sprig templates.
//!
//! This crate provides the control-flow components shipped with the engine:
//! - [`fragment`]: grouping no-op
//! - [`slot`]: projected content with fallback
//! - [`match_`] / [`arm`]: conditional branch selection
//! - [`for_each`]: list iteration with per-iteration `val`/`index` states
//!
//! All of them are declared through the ordinary control-flow entry point
//! and speak only the renderer's [`Continuation`](sprig_core::Continuation)
//! contract: they never touch the host directly.

mod builtins;

pub use builtins::{arm, for_each, fragment, match_, slot};
