//! In-memory host backend.
//!
//! `MemoryHost` is the reference implementation of the [`Host`] boundary: an
//! arena of element and text nodes with ordered children, separate property
//! and attribute stores, and per-event listeners. Its capability table, the
//! set of `(tag, key)` pairs exposed as native properties, is a read-only
//! static mapping.

use indexmap::IndexMap;

use sprig_core::{EventHandler, Host, HostError, NodeId, Value};

/// Properties settable on every element.
const GLOBAL_PROPERTIES: &[&str] = &[
    "id",
    "className",
    "title",
    "lang",
    "dir",
    "hidden",
    "tabIndex",
    "textContent",
];

/// Per-tag native properties, on top of the global set.
const TAG_PROPERTIES: &[(&str, &[&str])] = &[
    ("a", &["href", "target", "rel"]),
    ("button", &["disabled", "type"]),
    ("img", &["src", "alt"]),
    ("input", &["value", "checked", "disabled", "placeholder", "type"]),
    ("label", &["htmlFor"]),
    ("option", &["value", "selected", "disabled"]),
    ("select", &["value", "disabled"]),
    ("textarea", &["value", "disabled", "placeholder"]),
];

/// One node in the in-memory tree.
#[derive(Debug)]
pub enum MemoryNode {
    Element {
        tag: String,
        namespace: Option<String>,
        properties: IndexMap<String, Value>,
        attributes: IndexMap<String, String>,
        listeners: IndexMap<String, EventHandler>,
        children: Vec<NodeId>,
    },
    Text(String),
}

/// Arena-backed in-memory DOM.
#[derive(Debug, Default)]
pub struct MemoryHost {
    nodes: Vec<MemoryNode>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a node by handle.
    pub fn get(&self, id: NodeId) -> Option<&MemoryNode> {
        self.nodes.get(id.0 as usize)
    }

    /// Total number of nodes created so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Child handles of an element, empty for text nodes.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        match self.get(id) {
            Some(MemoryNode::Element { children, .. }) => children,
            _ => &[],
        }
    }

    /// Concatenated text content of a subtree, in document order.
    pub fn text_of(&self, id: NodeId) -> String {
        match self.get(id) {
            Some(MemoryNode::Text(text)) => text.clone(),
            Some(MemoryNode::Element { children, .. }) => children
                .iter()
                .map(|child| self.text_of(*child))
                .collect(),
            None => String::new(),
        }
    }

    /// Invoke the listener registered for `event`, if any. Returns whether a
    /// listener fired.
    pub fn fire(&self, id: NodeId, event: &str, payload: &Value) -> bool {
        if let Some(MemoryNode::Element { listeners, .. }) = self.get(id) {
            if let Some(handler) = listeners.get(event) {
                handler.call(payload);
                return true;
            }
        }
        false
    }

    fn push(&mut self, node: MemoryNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    fn element_mut(
        &mut self,
        id: NodeId,
    ) -> Result<&mut MemoryNode, HostError> {
        let node = self
            .nodes
            .get_mut(id.0 as usize)
            .ok_or(HostError::UnknownNode { id })?;
        match node {
            MemoryNode::Element { .. } => Ok(node),
            MemoryNode::Text(_) => Err(HostError::NotAnElement { id }),
        }
    }
}

impl Host for MemoryHost {
    fn create_element(
        &mut self,
        tag: &str,
        namespace: Option<&str>,
    ) -> Result<NodeId, HostError> {
        if tag.is_empty() || tag.contains(char::is_whitespace) {
            return Err(HostError::InvalidTag {
                tag: tag.to_string(),
            });
        }
        Ok(self.push(MemoryNode::Element {
            tag: tag.to_string(),
            namespace: namespace.map(str::to_string),
            properties: IndexMap::new(),
            attributes: IndexMap::new(),
            listeners: IndexMap::new(),
            children: Vec::new(),
        }))
    }

    fn create_text(&mut self, text: &str) -> Result<NodeId, HostError> {
        Ok(self.push(MemoryNode::Text(text.to_string())))
    }

    fn set_property(&mut self, node: NodeId, key: &str, value: &Value) -> Result<(), HostError> {
        if let MemoryNode::Element { properties, .. } = self.element_mut(node)? {
            properties.insert(key.to_string(), value.clone());
        }
        Ok(())
    }

    fn set_attribute(&mut self, node: NodeId, key: &str, value: &str) -> Result<(), HostError> {
        if let MemoryNode::Element { attributes, .. } = self.element_mut(node)? {
            attributes.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn has_property(&self, tag: &str, key: &str) -> bool {
        if GLOBAL_PROPERTIES.contains(&key) {
            return true;
        }
        TAG_PROPERTIES
            .iter()
            .find(|(t, _)| *t == tag)
            .is_some_and(|(_, keys)| keys.contains(&key))
    }

    fn add_listener(
        &mut self,
        node: NodeId,
        event: &str,
        handler: EventHandler,
    ) -> Result<(), HostError> {
        if let MemoryNode::Element { listeners, .. } = self.element_mut(node)? {
            listeners.insert(event.to_string(), handler);
        }
        Ok(())
    }

    fn remove_listener(&mut self, node: NodeId, event: &str) -> Result<(), HostError> {
        if let MemoryNode::Element { listeners, .. } = self.element_mut(node)? {
            listeners.shift_remove(event);
        }
        Ok(())
    }

    fn append(&mut self, parent: NodeId, child: NodeId) -> Result<(), HostError> {
        if child.0 as usize >= self.nodes.len() {
            return Err(HostError::UnknownNode { id: child });
        }
        if let MemoryNode::Element { children, .. } = self.element_mut(parent)? {
            children.push(child);
        }
        Ok(())
    }
}
