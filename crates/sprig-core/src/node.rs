//! Virtual-node descriptors and their builders.
//!
//! Templates are built once at declaration time from a closed set of node
//! kinds and stay immutable afterwards; hydration and rendering only ever
//! allocate fresh nodes. Element factories come in two levels: [`tag`] for
//! plain elements and [`ns`] for a namespace whose factories stamp their URI
//! on every element built through them.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::errors::RenderError;
use crate::host::NodeId;
use crate::scope::{Binding, Reactive};
use crate::value::{BoundExpr, Expr, Value};

/// Ordered property map of an element or component node.
pub type Props = IndexMap<String, PropValue>;

/// The flat, ordered sequence of host nodes produced by one render step.
pub type Rendered = SmallVec<[NodeId; 4]>;

/// A property value: a literal, a deferred expression, or the bound form an
/// expression takes after hydration.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Value(Value),
    Expr(Expr),
    Bound(BoundExpr),
}

impl PropValue {
    /// The literal value, if this property is one.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            PropValue::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl From<Value> for PropValue {
    fn from(v: Value) -> Self {
        PropValue::Value(v)
    }
}

impl From<Expr> for PropValue {
    fn from(e: Expr) -> Self {
        PropValue::Expr(e)
    }
}

impl From<BoundExpr> for PropValue {
    fn from(b: BoundExpr) -> Self {
        PropValue::Bound(b)
    }
}

impl From<bool> for PropValue {
    fn from(v: bool) -> Self {
        PropValue::Value(v.into())
    }
}

impl From<f64> for PropValue {
    fn from(v: f64) -> Self {
        PropValue::Value(v.into())
    }
}

impl From<i64> for PropValue {
    fn from(v: i64) -> Self {
        PropValue::Value(v.into())
    }
}

impl From<i32> for PropValue {
    fn from(v: i32) -> Self {
        PropValue::Value(v.into())
    }
}

impl From<&str> for PropValue {
    fn from(v: &str) -> Self {
        PropValue::Value(v.into())
    }
}

impl From<String> for PropValue {
    fn from(v: String) -> Self {
        PropValue::Value(v.into())
    }
}

impl From<crate::value::EventHandler> for PropValue {
    fn from(v: crate::value::EventHandler) -> Self {
        PropValue::Value(Value::Handler(v))
    }
}

/// A template node. The closed set of kinds the hydrator and renderer
/// dispatch on.
#[derive(Debug, Clone)]
pub enum Node {
    /// A literal child (string, number, boolean, ...).
    Literal(Value),
    /// An unbound deferred expression.
    Expr(Expr),
    /// An expression curried with its binding by hydration.
    Bound(BoundExpr),
    /// A host element descriptor.
    Element(Rc<ElementNode>),
    /// A component or control-flow invocation.
    Component(Rc<ComponentNode>),
}

impl Node {
    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_component(&self) -> Option<&ComponentNode> {
        match self {
            Node::Component(c) => Some(c),
            _ => None,
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Literal(a), Node::Literal(b)) => a == b,
            (Node::Expr(a), Node::Expr(b)) => a == b,
            (Node::Bound(a), Node::Bound(b)) => a == b,
            (Node::Element(a), Node::Element(b)) => Rc::ptr_eq(a, b),
            (Node::Component(a), Node::Component(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<Value> for Node {
    fn from(v: Value) -> Self {
        Node::Literal(v)
    }
}

impl From<Expr> for Node {
    fn from(e: Expr) -> Self {
        Node::Expr(e)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Literal(s.into())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Literal(s.into())
    }
}

impl From<f64> for Node {
    fn from(n: f64) -> Self {
        Node::Literal(n.into())
    }
}

impl From<i64> for Node {
    fn from(n: i64) -> Self {
        Node::Literal(n.into())
    }
}

impl From<i32> for Node {
    fn from(n: i32) -> Self {
        Node::Literal(n.into())
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Literal(b.into())
    }
}

/// An element descriptor: tag, optional namespace, ordered props, children.
#[derive(Debug)]
pub struct ElementNode {
    pub tag: String,
    pub namespace: Option<String>,
    pub props: Props,
    pub children: Vec<Node>,
}

/// A component invocation: the definition plus the props and children this
/// instantiation supplies.
#[derive(Debug)]
pub struct ComponentNode {
    pub def: Rc<ComponentDef>,
    pub props: Props,
    pub children: Vec<Node>,
}

/// Marker consumed by a structural parent; `Arm` tags the branch nodes
/// scanned by the Match built-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Marker {
    Arm,
}

/// A template-producing component body.
pub type TemplateFn = Rc<dyn Fn(&Binding) -> Node>;

/// A control-flow body: receives the joined binding and the renderer's
/// continuation, and decides how (and whether) its children render.
pub type ControlFlowFn =
    Rc<dyn Fn(&Binding, &mut dyn Continuation) -> Result<Rendered, RenderError>>;

/// The two body shapes a component definition can have.
#[derive(Clone)]
pub enum Body {
    Template(TemplateFn),
    ControlFlow(ControlFlowFn),
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Template(_) => f.write_str("Template(..)"),
            Body::ControlFlow(_) => f.write_str("ControlFlow(..)"),
        }
    }
}

/// A component definition: the scope/render-function pair that serves as the
/// "tag" of every node instantiated from it.
#[derive(Debug, Clone)]
pub struct ComponentDef {
    pub scope: Reactive,
    pub body: Body,
    pub marker: Option<Marker>,
}

impl ComponentDef {
    /// Whether this definition is the Arm marker consumed by Match.
    pub fn is_arm(&self) -> bool {
        self.marker == Some(Marker::Arm)
    }

    /// Start an instantiation of this definition.
    pub fn instantiate(self: Rc<Self>) -> ComponentBuilder {
        ComponentBuilder {
            def: self,
            props: Props::new(),
            children: Vec::new(),
        }
    }
}

/// Declare a component from a render function, with a fresh scope carrying
/// only the `children` default.
pub fn component(render: impl Fn(&Binding) -> Node + 'static) -> Rc<ComponentDef> {
    component_with(Reactive::new(), render)
}

/// Declare a component from an explicit scope and a render function.
pub fn component_with(
    scope: Reactive,
    render: impl Fn(&Binding) -> Node + 'static,
) -> Rc<ComponentDef> {
    Rc::new(ComponentDef {
        scope,
        body: Body::Template(Rc::new(render)),
        marker: None,
    })
}

/// Declare a control-flow component from a render function, with a fresh
/// scope carrying only the `children` default.
pub fn control_flow(
    render: impl Fn(&Binding, &mut dyn Continuation) -> Result<Rendered, RenderError> + 'static,
) -> Rc<ComponentDef> {
    control_flow_with(Reactive::new(), render)
}

/// Declare a control-flow component from an explicit scope and render
/// function.
pub fn control_flow_with(
    scope: Reactive,
    render: impl Fn(&Binding, &mut dyn Continuation) -> Result<Rendered, RenderError> + 'static,
) -> Rc<ComponentDef> {
    Rc::new(ComponentDef {
        scope,
        body: Body::ControlFlow(Rc::new(render)),
        marker: None,
    })
}

/// The renderer's recursion contract, handed to control-flow bodies. A
/// control-flow component never touches the host directly; it renders its
/// branches and children back through this trait.
pub trait Continuation {
    /// Render one node.
    fn render_node(&mut self, node: &Node) -> Result<Rendered, RenderError>;

    /// Hydrate a node against a binding, then render it.
    fn render_scoped(&mut self, node: &Node, scope: &Binding) -> Result<Rendered, RenderError>;

    /// Render a runtime value: nodes render as nodes, lists flatten, falsy
    /// values vanish, anything else becomes text.
    fn render_value(&mut self, value: &Value) -> Result<Rendered, RenderError>;
}

/// An element factory with no namespace.
pub fn tag(name: impl Into<String>) -> ElementBuilder {
    ElementBuilder {
        tag: name.into(),
        namespace: None,
        props: Props::new(),
        children: Vec::new(),
    }
}

/// A namespaced factory root: every element built through it carries the
/// namespace URI, nested children included.
pub fn ns(uri: impl Into<String>) -> Namespace {
    Namespace { uri: uri.into() }
}

/// Tag-indexed factory for one namespace URI.
#[derive(Debug, Clone)]
pub struct Namespace {
    uri: String,
}

impl Namespace {
    pub fn tag(&self, name: impl Into<String>) -> ElementBuilder {
        ElementBuilder {
            tag: name.into(),
            namespace: Some(self.uri.clone()),
            props: Props::new(),
            children: Vec::new(),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }
}

/// Chainable element construction; `build` finalizes into a [`Node`]. A
/// builder finalized without children stores an empty ordered list.
#[derive(Debug)]
pub struct ElementBuilder {
    tag: String,
    namespace: Option<String>,
    props: Props,
    children: Vec<Node>,
}

impl ElementBuilder {
    pub fn prop(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    pub fn props<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<PropValue>,
    {
        for (k, v) in entries {
            self.props.insert(k.into(), v.into());
        }
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> Node {
        Node::Element(Rc::new(ElementNode {
            tag: self.tag,
            namespace: self.namespace,
            props: self.props,
            children: self.children,
        }))
    }
}

impl From<ElementBuilder> for Node {
    fn from(builder: ElementBuilder) -> Self {
        builder.build()
    }
}

/// Chainable component instantiation, mirroring [`ElementBuilder`].
#[derive(Debug)]
pub struct ComponentBuilder {
    def: Rc<ComponentDef>,
    props: Props,
    children: Vec<Node>,
}

impl ComponentBuilder {
    pub fn prop(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> Node {
        Node::Component(Rc::new(ComponentNode {
            def: self.def,
            props: self.props,
            children: self.children,
        }))
    }
}

impl From<ComponentBuilder> for Node {
    fn from(builder: ComponentBuilder) -> Self {
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SVG_NS: &str = "http://www.w3.org/2000/svg";

    #[test]
    fn test_tag_without_props_or_children() {
        let div = tag("div").build();
        let el = div.as_element().unwrap();
        assert_eq!(el.tag, "div");
        assert!(el.props.is_empty());
        assert!(el.children.is_empty());
        assert!(el.namespace.is_none());
    }

    #[test]
    fn test_tag_with_props() {
        let div = tag("div").prop("id", "test").build();
        let el = div.as_element().unwrap();
        assert_eq!(el.tag, "div");
        assert_eq!(
            el.props.get("id"),
            Some(&PropValue::Value(Value::from("test")))
        );
        assert!(el.children.is_empty());
    }

    #[test]
    fn test_tag_with_children_in_order() {
        let div = tag("div").child("hello").child("world").build();
        let el = div.as_element().unwrap();
        assert!(el.props.is_empty());
        assert_eq!(el.children.len(), 2);
        assert_eq!(el.children[0], Node::Literal(Value::from("hello")));
        assert_eq!(el.children[1], Node::Literal(Value::from("world")));
    }

    #[test]
    fn test_tag_builds_nested_nodes() {
        let div = tag("div")
            .prop("id", "app")
            .child(tag("h1").child("Hello, World!"))
            .child(tag("p").child("This is a test."))
            .build();
        let el = div.as_element().unwrap();
        assert_eq!(el.children.len(), 2);
        let h1 = el.children[0].as_element().unwrap();
        assert_eq!(h1.tag, "h1");
        assert_eq!(h1.children[0], Node::Literal(Value::from("Hello, World!")));
        let p = el.children[1].as_element().unwrap();
        assert_eq!(p.tag, "p");
    }

    #[test]
    fn test_namespace_propagates_through_factory() {
        let svg = ns(SVG_NS);
        let circle = svg
            .tag("circle")
            .prop("id", "test")
            .child(svg.tag("title").child("Test"))
            .build();
        let el = circle.as_element().unwrap();
        assert_eq!(el.tag, "circle");
        assert_eq!(el.namespace.as_deref(), Some(SVG_NS));
        let title = el.children[0].as_element().unwrap();
        assert_eq!(title.tag, "title");
        assert_eq!(title.namespace.as_deref(), Some(SVG_NS));
    }

    #[test]
    fn test_component_declaration_and_instantiation() {
        let banner = component(|_| tag("header").build());
        let node = banner
            .clone()
            .instantiate()
            .prop("title", "hi")
            .child("x")
            .build();
        let comp = node.as_component().unwrap();
        assert!(Rc::ptr_eq(&comp.def, &banner));
        assert_eq!(
            comp.props.get("title"),
            Some(&PropValue::Value(Value::from("hi")))
        );
        assert_eq!(comp.children.len(), 1);
        assert!(!comp.def.is_arm());
    }

    #[test]
    fn test_control_flow_declaration_is_tagged() {
        let cf = control_flow(|_, _| Ok(Rendered::new()));
        assert!(matches!(cf.body, Body::ControlFlow(_)));
        let plain = component(|_| tag("div").build());
        assert!(matches!(plain.body, Body::Template(_)));
    }

    #[cfg(test)]
    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn child_order_is_preserved(texts in proptest::collection::vec("[a-z]{1,8}", 0..16)) {
                let mut builder = tag("div");
                for t in &texts {
                    builder = builder.child(t.as_str());
                }
                let node = builder.build();
                let el = node.as_element().unwrap();
                prop_assert_eq!(el.children.len(), texts.len());
                for (child, t) in el.children.iter().zip(&texts) {
                    prop_assert_eq!(child, &Node::Literal(Value::from(t.as_str())));
                }
            }

            #[test]
            fn builder_always_stores_a_child_list(tag_name in "[a-z]{1,10}") {
                let node = tag(tag_name.as_str()).build();
                let el = node.as_element().unwrap();
                prop_assert_eq!(el.tag.as_str(), tag_name.as_str());
                prop_assert!(el.children.is_empty());
            }
        }
    }
}
