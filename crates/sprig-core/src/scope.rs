//! Scopes and binding contexts.
//!
//! A [`Reactive`] declares the named defaults and internal states of one
//! component; [`Reactive::join`] merges them with caller overrides into a
//! read-only [`Binding`] with a fixed precedence: state, then override, then
//! default, then `Null`.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::node::{PropValue, Props};
use crate::value::Value;

/// A zero-argument producer of a default or state value.
pub type Supplier = Rc<dyn Fn() -> Value>;

/// Scope declaration: named default values (caller-overridable) and named
/// internal states (never overridable). One `Reactive` is shared by every
/// instantiation of the component declared with it.
#[derive(Clone)]
pub struct Reactive {
    defaults: IndexMap<String, Option<Supplier>>,
    states: IndexMap<String, Supplier>,
}

impl Default for Reactive {
    fn default() -> Self {
        Self::new()
    }
}

impl Reactive {
    /// A fresh scope. Every scope carries a `children` default supplying an
    /// empty list, so component bodies can always resolve their child list.
    pub fn new() -> Self {
        let mut defaults: IndexMap<String, Option<Supplier>> = IndexMap::new();
        defaults.insert(
            "children".to_string(),
            Some(Rc::new(|| Value::List(Vec::new())) as Supplier),
        );
        Self {
            defaults,
            states: IndexMap::new(),
        }
    }

    /// Register a caller-overridable key with a default supplier. Chainable.
    pub fn prop(mut self, name: impl Into<String>, supplier: impl Fn() -> Value + 'static) -> Self {
        self.defaults.insert(name.into(), Some(Rc::new(supplier)));
        self
    }

    /// Register a caller-overridable key with no default. Chainable.
    pub fn declare(mut self, name: impl Into<String>) -> Self {
        self.defaults.insert(name.into(), None);
        self
    }

    /// Register an internal state key. States shadow overrides and defaults.
    /// Chainable.
    pub fn state(
        mut self,
        name: impl Into<String>,
        supplier: impl Fn() -> Value + 'static,
    ) -> Self {
        self.states.insert(name.into(), Rc::new(supplier));
        self
    }

    /// Merge against caller overrides into a read-only binding context.
    ///
    /// Every default and state supplier is invoked exactly once here; the
    /// overrides are kept as passed and resolved per lookup.
    pub fn join(&self, overrides: Props) -> Binding {
        let defaults = self
            .defaults
            .iter()
            .map(|(k, v)| {
                let value = v.as_ref().map(|s| s()).unwrap_or(Value::Null);
                (k.clone(), value)
            })
            .collect();
        let states = self
            .states
            .iter()
            .map(|(k, s)| (k.clone(), s()))
            .collect();
        Binding {
            inner: Rc::new(BindingData {
                states,
                defaults,
                overrides,
            }),
        }
    }
}

impl fmt::Debug for Reactive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reactive")
            .field("defaults", &self.defaults.keys().collect::<Vec<_>>())
            .field("states", &self.states.keys().collect::<Vec<_>>())
            .finish()
    }
}

struct BindingData {
    states: IndexMap<String, Value>,
    defaults: IndexMap<String, Value>,
    overrides: Props,
}

/// A read-only binding context produced by [`Reactive::join`]. Cheap to
/// clone; every curried expression carries one.
#[derive(Clone)]
pub struct Binding {
    inner: Rc<BindingData>,
}

impl Binding {
    /// A binding with no keys at all: every lookup resolves to `Null`.
    pub fn empty() -> Self {
        Binding {
            inner: Rc::new(BindingData {
                states: IndexMap::new(),
                defaults: IndexMap::new(),
                overrides: Props::new(),
            }),
        }
    }

    /// Resolve a name. Precedence: state, then override, then default, then
    /// `Null`. Overrides apply only to declared default keys; a `Null`
    /// override falls through to the default; lookups never fail.
    pub fn get(&self, name: &str) -> Value {
        if let Some(state) = self.inner.states.get(name) {
            return state.clone();
        }
        if let Some(default) = self.inner.defaults.get(name) {
            return match self.inner.overrides.get(name) {
                Some(PropValue::Value(Value::Null)) | None => default.clone(),
                Some(PropValue::Value(v)) => v.clone(),
                Some(PropValue::Bound(b)) => b.eval(),
                Some(PropValue::Expr(e)) => e.eval(&Binding::empty()),
            };
        }
        Value::Null
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("states", &self.inner.states.keys().collect::<Vec<_>>())
            .field("defaults", &self.inner.defaults.keys().collect::<Vec<_>>())
            .field(
                "overrides",
                &self.inner.overrides.keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}
