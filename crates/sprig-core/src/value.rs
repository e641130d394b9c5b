//! Runtime values and deferred expressions.

use std::fmt;
use std::rc::Rc;

use crate::node::Node;
use crate::scope::Binding;

/// An event callback registered on a host element.
///
/// Handlers are opaque closures invoked with the host's event payload; they
/// compare by identity, not by behavior.
#[derive(Clone)]
pub struct EventHandler(Rc<dyn Fn(&Value)>);

impl EventHandler {
    pub fn new(f: impl Fn(&Value) + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invoke the handler with an event payload.
    pub fn call(&self, event: &Value) {
        (self.0)(event)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EventHandler(..)")
    }
}

impl PartialEq for EventHandler {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// A runtime value resolved by a binding or produced by an expression.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absent value; every unresolved lookup produces it.
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<Value>),
    /// A virtual node carried as a value (children lists, slot projections).
    Node(Box<Node>),
    /// An event callback.
    Handler(EventHandler),
}

impl Value {
    /// Truthiness used for conditional rendering. Lists and nodes are always
    /// truthy; `Null`, `false`, `0`, `NaN`, and the empty string are not.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::List(_) | Value::Node(_) | Value::Handler(_) => true,
        }
    }

    /// Text form used for text nodes and attribute assignment. `Null` renders
    /// as the empty string; integral numbers print without a fractional part.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
            Value::List(items) => items
                .iter()
                .map(Value::to_text)
                .collect::<Vec<_>>()
                .join(","),
            // Structural values have no sensible text form; the renderer
            // routes them elsewhere before asking.
            Value::Node(_) | Value::Handler(_) => String::new(),
        }
    }

    /// Short kind name for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Node(_) => "node",
            Value::Handler(_) => "handler",
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Node(a), Value::Node(b)) => a == b,
            (Value::Handler(a), Value::Handler(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Value::Node(Box::new(node))
    }
}

impl From<EventHandler> for Value {
    fn from(handler: EventHandler) -> Self {
        Value::Handler(handler)
    }
}

/// A deferred, scope-dependent computation: the one-parameter form of the
/// engine's expressions. Binding one to a [`Binding`] curries it into a
/// [`BoundExpr`] evaluated with zero arguments at render time.
#[derive(Clone)]
pub struct Expr(Rc<dyn Fn(&Binding) -> Value>);

impl Expr {
    pub fn new(f: impl Fn(&Binding) -> Value + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Evaluate against an explicit binding.
    pub fn eval(&self, scope: &Binding) -> Value {
        (self.0)(scope)
    }

    /// Curry with a binding, producing the zero-argument bound form.
    pub fn bind(&self, scope: &Binding) -> BoundExpr {
        BoundExpr {
            expr: self.clone(),
            scope: scope.clone(),
        }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Expr(..)")
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Construct a deferred expression.
pub fn expr(f: impl Fn(&Binding) -> Value + 'static) -> Expr {
    Expr::new(f)
}

/// An expression curried with the binding it will be evaluated against.
#[derive(Clone)]
pub struct BoundExpr {
    expr: Expr,
    scope: Binding,
}

impl BoundExpr {
    pub fn eval(&self) -> Value {
        self.expr.eval(&self.scope)
    }
}

impl fmt::Debug for BoundExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BoundExpr(..)")
    }
}

impl PartialEq for BoundExpr {
    fn eq(&self, other: &Self) -> bool {
        self.expr == other.expr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Reactive;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Number(0.0).is_truthy());
        assert!(!Value::Number(f64::NAN).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(Value::Number(-1.5).is_truthy());
        assert!(Value::from("x").is_truthy());
        assert!(Value::List(vec![]).is_truthy());
    }

    #[test]
    fn test_text_conversion() {
        assert_eq!(Value::Null.to_text(), "");
        assert_eq!(Value::Bool(true).to_text(), "true");
        assert_eq!(Value::Number(10.0).to_text(), "10");
        assert_eq!(Value::Number(1.5).to_text(), "1.5");
        assert_eq!(Value::from("hi").to_text(), "hi");
        assert_eq!(
            Value::List(vec![Value::from(1), Value::from(2)]).to_text(),
            "1,2"
        );
    }

    #[test]
    fn test_expr_binds_scope() {
        let e = expr(|d| d.get("name"));
        let scope = Reactive::new()
            .state("name", || Value::from("world"))
            .join(Default::default());
        let bound = e.bind(&scope);
        assert_eq!(bound.eval(), Value::from("world"));
    }

    #[test]
    fn test_handlers_compare_by_identity() {
        let a = EventHandler::new(|_| {});
        let b = EventHandler::new(|_| {});
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
