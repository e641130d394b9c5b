//! The render evaluator.
//!
//! Rendering materializes a (bound or concrete) template graph into host
//! nodes. The walk is a plain recursive dispatch over the closed node set;
//! control-flow components receive the renderer itself through the
//! [`Continuation`] trait and recurse through it. Failures are fail-fast and
//! non-transactional: host errors and structural errors abort the walk,
//! leaving any nodes created so far un-appended.

use smallvec::smallvec;
use tracing::{debug, trace};

use sprig_core::{
    Binding, Body, ComponentNode, Continuation, ElementNode, Host, Node, NodeId, PropValue,
    RenderError, Rendered, Value,
};
use sprig_hydrate::hydrate;

use crate::setters::{Setter, SetterTable};

/// One render pass over a host backend.
///
/// The renderer owns the setter-resolution table for its lifetime; each pass
/// starts explicitly initialized and grows it append-only.
pub struct Renderer<'h> {
    host: &'h mut dyn Host,
    setters: SetterTable,
}

impl<'h> Renderer<'h> {
    pub fn new(host: &'h mut dyn Host) -> Self {
        Self {
            host,
            setters: SetterTable::new(),
        }
    }

    /// Render a template graph into an ordered sequence of host nodes.
    pub fn render(&mut self, node: &Node) -> Result<Rendered, RenderError> {
        self.render_node(node)
    }

    /// Hydrate `node` against `scope`, then render the bound result.
    pub fn render_with(&mut self, node: &Node, scope: &Binding) -> Result<Rendered, RenderError> {
        self.render_scoped(node, scope)
    }

    /// Render `node` and append the results to `root`, in order. The only
    /// operation with observable host side effects below `root`; it runs to
    /// completion before returning.
    pub fn mount(&mut self, root: NodeId, node: &Node) -> Result<(), RenderError> {
        let rendered = self.render_node(node)?;
        debug!(nodes = rendered.len(), "mounting rendered tree");
        for id in &rendered {
            self.host.append(root, *id)?;
        }
        Ok(())
    }

    /// The setter-resolution table accumulated by this renderer.
    pub fn setters(&self) -> &SetterTable {
        &self.setters
    }

    fn render_element(&mut self, el: &ElementNode) -> Result<Rendered, RenderError> {
        trace!(tag = %el.tag, "rendering element");
        let id = self.host.create_element(&el.tag, el.namespace.as_deref())?;

        for (key, prop) in &el.props {
            // Two-character event prefix: the value must evaluate to a
            // handler, registered under the stripped name. The previous
            // listener for that name is removed first.
            if let Some(event) = key.strip_prefix("on") {
                let handler = match Self::resolve_prop(prop)? {
                    Value::Handler(h) => h,
                    _ => return Err(RenderError::NotAHandler { key: key.clone() }),
                };
                self.host.remove_listener(id, event)?;
                self.host.add_listener(id, event, handler)?;
                continue;
            }

            let value = Self::resolve_prop(prop)?;
            match self.setters.resolve(&*self.host, &el.tag, key) {
                Setter::Property => self.host.set_property(id, key, &value)?,
                Setter::Attribute => self.host.set_attribute(id, key, &value.to_text())?,
            }
        }

        for child in &el.children {
            let rendered = self.render_node(child)?;
            for child_id in rendered {
                self.host.append(id, child_id)?;
            }
        }

        Ok(smallvec![id])
    }

    /// A prop at render time is a literal or a bound expression; bound
    /// expressions are the lazy half of the prop contract and evaluate here.
    fn resolve_prop(prop: &PropValue) -> Result<Value, RenderError> {
        match prop {
            PropValue::Value(v) => Ok(v.clone()),
            PropValue::Bound(b) => Ok(b.eval()),
            PropValue::Expr(_) => Err(RenderError::UnboundExpression),
        }
    }

    fn render_component(&mut self, comp: &ComponentNode) -> Result<Rendered, RenderError> {
        // The child list always wins over a caller-supplied `children` prop.
        let mut overrides = comp.props.clone();
        let children: Vec<Value> = comp
            .children
            .iter()
            .cloned()
            .map(|n| Value::Node(Box::new(n)))
            .collect();
        overrides.insert("children".to_string(), PropValue::Value(Value::List(children)));
        let joined = comp.def.scope.join(overrides);

        match &comp.def.body {
            Body::ControlFlow(flow) => {
                trace!("entering control-flow body");
                flow(&joined, self)
            }
            Body::Template(template) => {
                // The joined binding both parameterizes the template function
                // and hydrates the expressions embedded in its result.
                let node = template(&joined);
                self.render_scoped(&node, &joined)
            }
        }
    }
}

impl Continuation for Renderer<'_> {
    fn render_node(&mut self, node: &Node) -> Result<Rendered, RenderError> {
        match node {
            Node::Literal(value) => self.render_value(value),
            Node::Bound(bound) => {
                let value = bound.eval();
                match value {
                    // Structural results render as values; everything else
                    // becomes exactly one text node.
                    Value::Node(_) | Value::List(_) => self.render_value(&value),
                    Value::Handler(_) => Err(RenderError::Unrenderable {
                        what: "an event handler",
                    }),
                    other => Ok(smallvec![self.host.create_text(&other.to_text())?]),
                }
            }
            Node::Expr(_) => Err(RenderError::UnboundExpression),
            Node::Element(el) => self.render_element(el),
            Node::Component(comp) => self.render_component(comp),
        }
    }

    fn render_scoped(&mut self, node: &Node, scope: &Binding) -> Result<Rendered, RenderError> {
        let bound = hydrate(node, scope);
        self.render_node(&bound)
    }

    fn render_value(&mut self, value: &Value) -> Result<Rendered, RenderError> {
        match value {
            Value::Node(node) => self.render_node(node),
            Value::List(items) => {
                let mut out = Rendered::new();
                for item in items {
                    out.extend(self.render_value(item)?);
                }
                Ok(out)
            }
            Value::Handler(_) => Err(RenderError::Unrenderable {
                what: "an event handler",
            }),
            falsy if !falsy.is_truthy() => Ok(Rendered::new()),
            text => Ok(smallvec![self.host.create_text(&text.to_text())?]),
        }
    }
}

/// Render `node` into `host` and append the results under `root`.
pub fn mount(host: &mut dyn Host, root: NodeId, node: &Node) -> Result<(), RenderError> {
    Renderer::new(host).mount(root, node)
}

/// Convenience over [`Renderer::render_with`]: render a template against a
/// binding produced by [`sprig_core::Reactive::join`].
pub fn render_with(
    host: &mut dyn Host,
    node: &Node,
    scope: &Binding,
) -> Result<Rendered, RenderError> {
    Renderer::new(host).render_with(node, scope)
}
