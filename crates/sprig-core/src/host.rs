//! The boundary between the renderer and the host DOM.
//!
//! The engine never holds host nodes directly; it addresses them through
//! opaque [`NodeId`] handles and mutates them through the [`Host`] trait.
//! A backend supplies element/text creation, property and attribute
//! assignment, listener registration, ordered append, and the capability
//! probe backing property-vs-attribute setter resolution.

use crate::errors::HostError;
use crate::value::{EventHandler, Value};

/// Opaque handle to one host node, assigned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// A host DOM backend.
///
/// The renderer assumes these operations never silently fail: a backend
/// either performs the mutation or reports a [`HostError`], which the
/// renderer passes through unmodified.
pub trait Host {
    /// Create an element, namespaced when `namespace` is given.
    fn create_element(&mut self, tag: &str, namespace: Option<&str>)
        -> Result<NodeId, HostError>;

    /// Create a text node.
    fn create_text(&mut self, text: &str) -> Result<NodeId, HostError>;

    /// Assign a native property on an element.
    fn set_property(&mut self, node: NodeId, key: &str, value: &Value) -> Result<(), HostError>;

    /// Assign an attribute on an element.
    fn set_attribute(&mut self, node: NodeId, key: &str, value: &str) -> Result<(), HostError>;

    /// Whether elements with this tag expose `key` as a settable native
    /// property. Must answer identically for identical `(tag, key)` pairs;
    /// the renderer caches the answer.
    fn has_property(&self, tag: &str, key: &str) -> bool;

    /// Register an event listener under `event` (the name without the `on`
    /// prefix).
    fn add_listener(
        &mut self,
        node: NodeId,
        event: &str,
        handler: EventHandler,
    ) -> Result<(), HostError>;

    /// Remove the listener registered under `event`, if any.
    fn remove_listener(&mut self, node: NodeId, event: &str) -> Result<(), HostError>;

    /// Append `child` as the last child of `parent`.
    fn append(&mut self, parent: NodeId, child: NodeId) -> Result<(), HostError>;
}
