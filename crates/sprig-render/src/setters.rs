//! Property-vs-attribute setter resolution.
//!
//! For every `(tag, key)` pair the renderer has to decide whether a prop is
//! assigned through a native element property or falls back to a generic
//! attribute. The decision is delegated to the host's capability probe and
//! cached here: the table is owned by one renderer, explicitly initialized,
//! append-only, and deterministic. The same pair always resolves to the
//! same setter.

use rustc_hash::FxHashMap;
use tracing::trace;

use sprig_core::Host;

/// How a resolved prop is applied to an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setter {
    /// Assign through a settable native property.
    Property,
    /// Fall back to generic attribute assignment.
    Attribute,
}

/// Append-only cache of setter resolutions keyed by `tag,key`.
#[derive(Debug, Default)]
pub struct SetterTable {
    resolved: FxHashMap<String, Setter>,
}

impl SetterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the setter for `(tag, key)`, probing the host's capability
    /// table on the first miss.
    pub fn resolve(&mut self, host: &dyn Host, tag: &str, key: &str) -> Setter {
        let cache_key = format!("{tag},{key}");
        if let Some(setter) = self.resolved.get(&cache_key) {
            return *setter;
        }
        let setter = if host.has_property(tag, key) {
            Setter::Property
        } else {
            Setter::Attribute
        };
        trace!(tag, key, ?setter, "resolved prop setter");
        self.resolved.insert(cache_key, setter);
        setter
    }

    /// Number of cached resolutions.
    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}

#[cfg(all(test, feature = "memory"))]
mod tests {
    use super::*;
    use crate::memory::MemoryHost;

    #[test]
    fn test_resolution_is_cached_and_stable() {
        let host = MemoryHost::new();
        let mut table = SetterTable::new();

        let first = table.resolve(&host, "input", "value");
        assert_eq!(first, Setter::Property);
        assert_eq!(table.len(), 1);

        let second = table.resolve(&host, "input", "value");
        assert_eq!(second, first);
        assert_eq!(table.len(), 1, "repeated resolution must not grow the table");
    }

    #[test]
    fn test_unknown_keys_fall_back_to_attribute() {
        let host = MemoryHost::new();
        let mut table = SetterTable::new();
        assert_eq!(table.resolve(&host, "div", "data-count"), Setter::Attribute);
        assert_eq!(table.resolve(&host, "div", "id"), Setter::Property);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn resolution_is_idempotent(tag in "[a-z]{1,8}", key in "[a-zA-Z-]{1,12}") {
                let host = MemoryHost::new();
                let mut table = SetterTable::new();
                let first = table.resolve(&host, &tag, &key);
                let second = table.resolve(&host, &tag, &key);
                prop_assert_eq!(first, second);
                prop_assert_eq!(table.len(), 1);
            }
        }
    }
}
