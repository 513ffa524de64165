use super::{Endpoint, HostError, ResolvedRoute, RouteHost, build_url, parse_pattern};
use crate::annotation::HttpMethod;
use crate::view::{Handler, PathParams};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

/// One accepted `(verb, path)` registration.
pub struct RouteRecord<O> {
    pub method: HttpMethod,
    pub path: String,
    pub name: String,
    pub endpoint: Endpoint,
    pub options: BTreeMap<String, Value>,
    pub handler: Handler<O>,
}

impl<O> RouteRecord<O> {
    pub fn call(&self, params: &PathParams) -> O {
        (self.handler)(params)
    }
}

impl<O> fmt::Debug for RouteRecord<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteRecord")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("name", &self.name)
            .field("endpoint", &self.endpoint)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// In-memory route host.
///
/// Keeps every registration in order and answers reverse lookups by
/// endpoint name. It rejects:
/// - a pattern that does not parse,
/// - a verb already registered for the same path,
/// - a name already taken by a different view method.
///
/// A view method may reuse its own name (several explicit routes without a
/// `name` option); reverse lookup then resolves to the latest one.
pub struct RouteTable<O> {
    records: Vec<RouteRecord<O>>,
    claimed: HashSet<(HttpMethod, String)>,
    names: HashMap<String, usize>,
}

impl<O> Default for RouteTable<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> RouteTable<O> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            claimed: HashSet::new(),
            names: HashMap::new(),
        }
    }

    /// Every accepted registration, in registration order.
    pub fn records(&self) -> &[RouteRecord<O>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The latest record registered under `name`.
    pub fn named(&self, name: &str) -> Option<&RouteRecord<O>> {
        self.names.get(name).map(|&index| &self.records[index])
    }

    /// The record registered for `method` and `path`.
    pub fn find(&self, method: HttpMethod, path: &str) -> Option<&RouteRecord<O>> {
        self.records
            .iter()
            .find(|record| record.method == method && record.path == path)
    }

    /// Build the URL of the route named `name`.
    pub fn url_for(&self, name: &str, params: &PathParams) -> Result<String, HostError> {
        let record = self
            .named(name)
            .ok_or_else(|| HostError::UnknownName(name.to_string()))?;
        build_url(name, &record.path, params)
    }
}

impl<O> RouteHost<O> for RouteTable<O> {
    type Error = HostError;

    fn route(&mut self, route: ResolvedRoute<O>) -> Result<(), HostError> {
        parse_pattern(&route.path)?;

        if let Some(existing) = self.named(&route.name) {
            if existing.endpoint != route.endpoint {
                return Err(HostError::DuplicateName {
                    name: route.name,
                    existing: existing.endpoint.clone(),
                });
            }
        }

        let mut seen = HashSet::new();
        for &method in route.method.methods() {
            let key = (method, route.path.clone());
            if self.claimed.contains(&key) || !seen.insert(key) {
                return Err(HostError::DuplicateRoute {
                    method,
                    path: route.path,
                });
            }
        }

        for &method in route.method.methods() {
            self.claimed.insert((method, route.path.clone()));
            self.names.insert(route.name.clone(), self.records.len());
            self.records.push(RouteRecord {
                method,
                path: route.path.clone(),
                name: route.name.clone(),
                endpoint: route.endpoint.clone(),
                options: route.options.clone(),
                handler: route.handler.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::MethodSpec;
    use crate::view::handler;

    fn resolved(
        method: impl Into<MethodSpec>,
        path: &str,
        name: &str,
        view_method: &str,
    ) -> ResolvedRoute<String> {
        let body = format!("{view_method}:{path}");
        ResolvedRoute {
            method: method.into(),
            path: path.to_string(),
            name: name.to_string(),
            endpoint: Endpoint::new("BasicView", view_method),
            handler: handler(move |_| body.clone()),
            options: BTreeMap::new(),
        }
    }

    #[test]
    fn test_records_one_entry_per_verb() {
        let mut table = RouteTable::new();
        table
            .route(resolved(
                [HttpMethod::Post, HttpMethod::Put],
                "/endpoint/",
                "BasicView:route_post",
                "route_post",
            ))
            .unwrap();

        let methods: Vec<HttpMethod> = table.records().iter().map(|r| r.method).collect();
        assert_eq!(methods, [HttpMethod::Post, HttpMethod::Put]);
        assert_eq!(
            table.find(HttpMethod::Put, "/endpoint/").unwrap().call(&PathParams::new()),
            "route_post:/endpoint/"
        );
    }

    #[test]
    fn test_rejects_duplicate_verb_and_path() {
        let mut table = RouteTable::new();
        table.route(resolved(HttpMethod::Get, "/a/", "a", "a")).unwrap();

        let err = table
            .route(resolved([HttpMethod::Post, HttpMethod::Get], "/a/", "b", "b"))
            .unwrap_err();
        assert_eq!(
            err,
            HostError::DuplicateRoute {
                method: HttpMethod::Get,
                path: "/a/".to_string(),
            }
        );
        // nothing from the rejected call was kept
        assert_eq!(table.len(), 1);
        assert!(table.find(HttpMethod::Post, "/a/").is_none());
    }

    #[test]
    fn test_any_does_not_clash_with_specific_verbs() {
        let mut table = RouteTable::new();
        table.route(resolved(HttpMethod::Get, "/a/", "a", "a")).unwrap();
        table.route(resolved(HttpMethod::Any, "/a/", "fallback", "fallback")).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_name_taken_by_other_method_is_rejected() {
        let mut table = RouteTable::new();
        table.route(resolved(HttpMethod::Get, "/a/", "shared", "first")).unwrap();

        let err = table
            .route(resolved(HttpMethod::Get, "/b/", "shared", "second"))
            .unwrap_err();
        assert_eq!(
            err,
            HostError::DuplicateName {
                name: "shared".to_string(),
                existing: Endpoint::new("BasicView", "first"),
            }
        );
    }

    #[test]
    fn test_same_method_may_rebind_its_name() {
        let mut table = RouteTable::new();
        let name = "BasicView:multi_routed_method";
        for path in ["/route1/", "/route2/"] {
            table
                .route(resolved(HttpMethod::Get, path, name, "multi_routed_method"))
                .unwrap();
        }

        assert_eq!(table.len(), 2);
        assert_eq!(table.url_for(name, &PathParams::new()).unwrap(), "/route2/");
    }

    #[test]
    fn test_rejects_malformed_pattern() {
        let mut table = RouteTable::new();
        let err = table
            .route(resolved(HttpMethod::Get, "/user/<id/", "a", "a"))
            .unwrap_err();
        assert!(matches!(err, HostError::MalformedPattern { .. }));
        assert!(table.is_empty());
    }

    #[test]
    fn test_url_for() {
        let mut table = RouteTable::new();
        table
            .route(resolved(HttpMethod::Get, "/basic/<obj_id>/", "BasicView:get", "get"))
            .unwrap();

        let params = PathParams::new().with("obj_id", "42");
        assert_eq!(table.url_for("BasicView:get", &params).unwrap(), "/basic/42/");
        assert_eq!(
            table.url_for("BasicView:nope", &params),
            Err(HostError::UnknownName("BasicView:nope".to_string()))
        );
    }
}
