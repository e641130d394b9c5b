//! The built-in control-flow components.

use std::rc::Rc;

use sprig_core::{
    control_flow, control_flow_with, Binding, Body, ComponentBuilder, ComponentDef,
    Continuation, ControlFlowFn, Marker, Node, PropValue, Props, Reactive, RenderError,
    Rendered, Value,
};

/// The joined `children` value as a list of nodes. Non-node values stay
/// renderable as literals.
fn child_nodes(d: &Binding) -> Vec<Node> {
    match d.get("children") {
        Value::List(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Node(node) => *node,
                other => Node::Literal(other),
            })
            .collect(),
        Value::Node(node) => vec![*node],
        Value::Null => Vec::new(),
        other => vec![Node::Literal(other)],
    }
}

fn render_all(
    h: &mut dyn Continuation,
    nodes: &[Node],
) -> Result<Rendered, RenderError> {
    let mut out = Rendered::new();
    for node in nodes {
        out.extend(h.render_node(node)?);
    }
    Ok(out)
}

/// Deep-flatten a projection value: lists flatten recursively, `Null`
/// vanishes, everything else is kept as one renderable item.
fn flatten_value(value: Value, out: &mut Vec<Value>) {
    match value {
        Value::Null => {}
        Value::List(items) => {
            for item in items {
                flatten_value(item, out);
            }
        }
        other => out.push(other),
    }
}

/// Grouping no-op: renders every child through the continuation and splices
/// the results into the parent's sequence.
pub fn fragment() -> ComponentBuilder {
    control_flow(|d, h| render_all(h, &child_nodes(d))).instantiate()
}

/// Projected content with fallback: renders the deep-flattened `from` prop
/// when it is non-empty, the component's own children otherwise.
pub fn slot() -> ComponentBuilder {
    control_flow_with(Reactive::new().declare("from"), |d, h| {
        let mut projected = Vec::new();
        flatten_value(d.get("from"), &mut projected);
        if projected.is_empty() {
            return render_all(h, &child_nodes(d));
        }
        let mut out = Rendered::new();
        for value in &projected {
            out.extend(h.render_value(value)?);
        }
        Ok(out)
    })
    .instantiate()
}

/// Conditional rendering.
///
/// With a non-`Null` `test` prop, selection is positional: the child at
/// index 0 renders when `test` is truthy, index 1 when it is falsy; a
/// missing selected child is a [`RenderError::MissingBranch`]. Otherwise the
/// children are scanned in order for [`arm`] nodes and the first matching
/// arm's children render; no match renders nothing.
pub fn match_() -> ComponentBuilder {
    control_flow_with(
        Reactive::new().declare("test").declare("value"),
        |d, h| {
            let children = child_nodes(d);

            let test = d.get("test");
            if test != Value::Null {
                let index = usize::from(!test.is_truthy());
                let branch = children.get(index).ok_or(RenderError::MissingBranch {
                    index,
                    children: children.len(),
                })?;
                return h.render_node(branch);
            }

            let value = d.get("value");
            for child in &children {
                let comp = match child.as_component() {
                    Some(comp) if comp.def.is_arm() => comp,
                    _ => continue,
                };
                if arm_matches(comp.props.get("test"), &value) {
                    return render_all(h, &comp.children);
                }
            }
            Ok(Rendered::new())
        },
    )
    .instantiate()
}

/// Whether an arm's raw `test` prop selects it. An absent prop is the
/// default ("else") arm. With a `value` on the enclosing match, the test is
/// compared by equality (deferred tests evaluate first); without one, only a
/// deferred test can match, by truthiness.
fn arm_matches(test: Option<&PropValue>, value: &Value) -> bool {
    match test {
        None => true,
        Some(PropValue::Value(v)) => *value != Value::Null && v == value,
        Some(PropValue::Bound(b)) => {
            let evaluated = b.eval();
            if *value != Value::Null {
                evaluated == *value
            } else {
                evaluated.is_truthy()
            }
        }
        Some(PropValue::Expr(_)) => false,
    }
}

/// A branch marker consumed by [`match_`]. Renders nothing by itself; it
/// only carries its `test` prop and children.
pub fn arm() -> ComponentBuilder {
    let body: ControlFlowFn = Rc::new(|_, _| Ok(Rendered::new()));
    Rc::new(ComponentDef {
        scope: Reactive::new().declare("test"),
        body: Body::ControlFlow(body),
        marker: Some(Marker::Arm),
    })
    .instantiate()
}

/// List iteration: renders every child once per item of the `each` prop,
/// against a fresh scope exposing the `val` and `index` states. This is the
/// only primitive that introduces new bound state per iteration. An absent
/// `each` renders nothing; a non-list is a [`RenderError::ExpectedList`].
pub fn for_each() -> ComponentBuilder {
    control_flow_with(Reactive::new().declare("each"), |d, h| {
        let items = match d.get("each") {
            Value::Null => return Ok(Rendered::new()),
            Value::List(items) => items,
            other => {
                return Err(RenderError::ExpectedList { got: other.kind() });
            }
        };
        let children = child_nodes(d);
        let mut out = Rendered::new();
        for (index, item) in items.into_iter().enumerate() {
            let iteration = Reactive::new()
                .state("val", move || item.clone())
                .state("index", move || Value::from(index));
            let binding = iteration.join(Props::new());
            for child in &children {
                out.extend(h.render_scoped(child, &binding)?);
            }
        }
        Ok(out)
    })
    .instantiate()
}
