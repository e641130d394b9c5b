//! Scope binding for Sprig template graphs.
//!
//! Hydration walks an unbound template and a [`Binding`], producing a bound
//! graph in which every deferred expression is curried with that binding.
//! The walk is total: it never fails and never mutates its input. Element
//! and component nodes are rebuilt with freshly allocated prop maps and
//! child lists, so hydrating one template against several scopes yields
//! fully independent graphs.

use std::rc::Rc;

use sprig_core::{Binding, ComponentNode, ElementNode, Node, PropValue, Props};

/// Bind a template graph to a concrete scope.
///
/// - Deferred expressions are curried with the binding.
/// - Already-bound expressions pass through untouched; the first binding
///   wins, so re-hydration (as the For primitive does per iteration) never
///   re-curries.
/// - Literals pass through unchanged.
/// - Element and component nodes are rebuilt with every expression-valued
///   prop curried and every child hydrated recursively.
pub fn hydrate(node: &Node, scope: &Binding) -> Node {
    match node {
        Node::Expr(e) => Node::Bound(e.bind(scope)),
        Node::Bound(_) | Node::Literal(_) => node.clone(),
        Node::Element(el) => Node::Element(Rc::new(ElementNode {
            tag: el.tag.clone(),
            namespace: el.namespace.clone(),
            props: hydrate_props(&el.props, scope),
            children: hydrate_children(&el.children, scope),
        })),
        Node::Component(c) => Node::Component(Rc::new(ComponentNode {
            def: c.def.clone(),
            props: hydrate_props(&c.props, scope),
            children: hydrate_children(&c.children, scope),
        })),
    }
}

fn hydrate_props(props: &Props, scope: &Binding) -> Props {
    props
        .iter()
        .map(|(k, v)| {
            let bound = match v {
                PropValue::Expr(e) => PropValue::Bound(e.bind(scope)),
                other => other.clone(),
            };
            (k.clone(), bound)
        })
        .collect()
}

fn hydrate_children(children: &[Node], scope: &Binding) -> Vec<Node> {
    children.iter().map(|child| hydrate(child, scope)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprig_core::{component, expr, tag, Props, Reactive, Value};

    fn scope_with(name: &str, value: Value) -> Binding {
        let value2 = value.clone();
        Reactive::new()
            .state(name.to_string(), move || value2.clone())
            .join(Props::new())
    }

    #[test]
    fn test_expression_is_curried() {
        let template = Node::Expr(expr(|d| d.get("greeting")));
        let scope = scope_with("greeting", Value::from("hello"));

        let bound = hydrate(&template, &scope);
        match bound {
            Node::Bound(b) => assert_eq!(b.eval(), Value::from("hello")),
            other => panic!("expected bound expression, got {other:?}"),
        }
    }

    #[test]
    fn test_literal_passes_through() {
        let template = Node::Literal(Value::from("static"));
        let scope = Binding::empty();
        assert_eq!(hydrate(&template, &scope), template);
    }

    #[test]
    fn test_element_is_rebuilt_fresh() {
        let template = tag("div")
            .prop("id", "app")
            .prop("title", expr(|d| d.get("title")))
            .child(expr(|d| d.get("body")))
            .child("tail")
            .build();
        let scope = Reactive::new()
            .state("title", || Value::from("t"))
            .state("body", || Value::from("b"))
            .join(Props::new());

        let bound = hydrate(&template, &scope);
        let (orig, el) = (template.as_element().unwrap(), bound.as_element().unwrap());

        assert!(!std::ptr::eq(orig, el));
        assert_eq!(el.tag, "div");
        // Literal props pass through; expression props are now bound.
        assert_eq!(el.props.get("id"), orig.props.get("id"));
        match el.props.get("title").unwrap() {
            PropValue::Bound(b) => assert_eq!(b.eval(), Value::from("t")),
            other => panic!("expected bound prop, got {other:?}"),
        }
        match &el.children[0] {
            Node::Bound(b) => assert_eq!(b.eval(), Value::from("b")),
            other => panic!("expected bound child, got {other:?}"),
        }
        assert_eq!(el.children[1], Node::Literal(Value::from("tail")));
    }

    #[test]
    fn test_input_template_is_not_mutated() {
        let template = tag("p").child(expr(|d| d.get("x"))).build();
        let scope = scope_with("x", Value::from(1));

        let _ = hydrate(&template, &scope);

        let el = template.as_element().unwrap();
        assert!(
            matches!(el.children[0], Node::Expr(_)),
            "template child must stay unbound"
        );
    }

    #[test]
    fn test_two_hydrations_are_independent() {
        let template = tag("span").child(expr(|d| d.get("n"))).build();
        let first = hydrate(&template, &scope_with("n", Value::from(1)));
        let second = hydrate(&template, &scope_with("n", Value::from(2)));

        let eval = |node: &Node| match &node.as_element().unwrap().children[0] {
            Node::Bound(b) => b.eval(),
            other => panic!("expected bound child, got {other:?}"),
        };
        assert_eq!(eval(&first), Value::from(1));
        assert_eq!(eval(&second), Value::from(2));
    }

    #[test]
    fn test_bound_expression_keeps_first_binding() {
        let template = Node::Expr(expr(|d| d.get("n")));
        let first = hydrate(&template, &scope_with("n", Value::from(1)));
        let again = hydrate(&first, &scope_with("n", Value::from(2)));

        match again {
            Node::Bound(b) => assert_eq!(b.eval(), Value::from(1)),
            other => panic!("expected bound expression, got {other:?}"),
        }
    }

    #[test]
    fn test_component_node_keeps_definition() {
        let card = component(|_| tag("div").build());
        let template = card
            .clone()
            .instantiate()
            .prop("title", expr(|d| d.get("title")))
            .child(expr(|d| d.get("body")))
            .build();
        let scope = Reactive::new()
            .state("title", || Value::from("t"))
            .state("body", || Value::from("b"))
            .join(Props::new());

        let bound = hydrate(&template, &scope);
        let comp = bound.as_component().unwrap();
        assert!(Rc::ptr_eq(&comp.def, &card));
        assert!(matches!(
            comp.props.get("title"),
            Some(PropValue::Bound(_))
        ));
        assert!(matches!(comp.children[0], Node::Bound(_)));
    }
}
