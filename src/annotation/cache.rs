use super::RouteOverride;
use std::collections::BTreeMap;

/// Side table of explicit routes, keyed by the declared method name.
///
/// Entries accumulate: annotating the same method again appends to its list
/// instead of replacing it, and the list keeps annotation order. A method
/// without an entry is routed by convention.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteCache {
    entries: BTreeMap<String, Vec<RouteOverride>>,
}

impl RouteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `route` to `method`, after any routes it already carries.
    pub fn annotate(&mut self, method: &str, route: RouteOverride) -> &mut Self {
        match self.entries.get_mut(method) {
            Some(routes) => routes.push(route),
            None => {
                self.entries.insert(method.to_string(), vec![route]);
            }
        }
        self
    }

    /// Routes declared for `method`, in annotation order.
    pub fn get(&self, method: &str) -> Option<&[RouteOverride]> {
        self.entries.get(method).map(Vec::as_slice)
    }

    pub fn contains(&self, method: &str) -> bool {
        self.entries.contains_key(method)
    }

    /// Drop every route declared for `method`.
    pub fn forget(&mut self, method: &str) -> Option<Vec<RouteOverride>> {
        self.entries.remove(method)
    }

    /// Number of annotated methods.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[RouteOverride])> {
        self.entries
            .iter()
            .map(|(name, routes)| (name.as_str(), routes.as_slice()))
    }
}
