use dashmap::DashMap;
use std::env;
use std::sync::Arc;

/// Method names that map straight to an HTTP verb and add no path segment.
pub const DEFAULT_ROUTES: [&str; 6] = ["get", "put", "post", "delete", "index", "options"];

/// Suffix stripped from a view's class name to derive its path segment.
pub const DEFAULT_VIEW_IDENTIFIER: &str = "view";

/// Static configuration of a view.
///
/// Values are fixed once built. Call-time arguments never change a
/// `ViewConfig` in place; [`ViewConfig::mounted`] returns a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    class_name: String,
    base_route: Option<String>,
    route_prefix: Option<String>,
    view_identifier: String,
    default_routes: Vec<String>,
    base_args: Vec<String>,
}

impl Default for ViewConfig {
    /// The abstract base view: no class name, nothing to register.
    fn default() -> Self {
        Self::new("")
    }
}

impl ViewConfig {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            base_route: None,
            route_prefix: None,
            view_identifier: DEFAULT_VIEW_IDENTIFIER.to_string(),
            default_routes: DEFAULT_ROUTES.iter().map(|s| s.to_string()).collect(),
            base_args: Vec::new(),
        }
    }

    pub fn base_route(mut self, base_route: impl Into<String>) -> Self {
        self.base_route = non_empty(Some(base_route.into()));
        self
    }

    pub fn route_prefix(mut self, route_prefix: impl Into<String>) -> Self {
        self.route_prefix = non_empty(Some(route_prefix.into()));
        self
    }

    pub fn view_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.view_identifier = identifier.into();
        self
    }

    pub fn default_routes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_routes = names.into_iter().map(Into::into).collect();
        self
    }

    /// Parameter names that are bound by the base route and never become
    /// URL variables of individual methods.
    pub fn base_args<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_args = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn get_base_route(&self) -> Option<&str> {
        self.base_route.as_deref()
    }

    pub fn get_route_prefix(&self) -> Option<&str> {
        self.route_prefix.as_deref()
    }

    pub fn get_view_identifier(&self) -> &str {
        &self.view_identifier
    }

    pub fn get_default_routes(&self) -> &[String] {
        &self.default_routes
    }

    pub fn get_base_args(&self) -> &[String] {
        &self.base_args
    }

    pub fn is_abstract(&self) -> bool {
        self.class_name.is_empty()
    }

    pub fn is_default_route(&self, method: &str) -> bool {
        self.default_routes.iter().any(|name| name == method)
    }

    pub fn is_base_arg(&self, param: &str) -> bool {
        self.base_args.iter().any(|name| name == param)
    }

    /// Apply call-time arguments. Present values win over the view's own.
    pub fn mounted(&self, mount: &Mount) -> Self {
        let mut config = self.clone();
        if let Some(base_route) = &mount.base_route {
            config.base_route = Some(base_route.clone());
        }
        if let Some(route_prefix) = &mount.route_prefix {
            config.route_prefix = Some(route_prefix.clone());
        }
        config
    }
}

/// Call-time `base_route` / `route_prefix` arguments of a registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mount {
    pub base_route: Option<String>,
    pub route_prefix: Option<String>,
}

impl Mount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_route(mut self, base_route: impl Into<String>) -> Self {
        self.base_route = non_empty(Some(base_route.into()));
        self
    }

    pub fn route_prefix(mut self, route_prefix: impl Into<String>) -> Self {
        self.route_prefix = non_empty(Some(route_prefix.into()));
        self
    }

    /// Mount settings for `class_name` found in `config`.
    ///
    /// `<VIEW>_BASE_ROUTE` beats the global `BASE_ROUTE`; `<VIEW>` is the
    /// upper-cased class name.
    pub fn from_config(config: &ConfigService, class_name: &str) -> Self {
        let view = class_name.to_uppercase();
        let base_route = config
            .get(&format!("{view}_BASE_ROUTE"))
            .or_else(|| config.get("BASE_ROUTE"));
        Self {
            base_route: non_empty(base_route),
            route_prefix: non_empty(config.get(&format!("{view}_ROUTE_PREFIX"))),
        }
    }

    /// Fill the gaps in `self` from `fallback`.
    pub fn or(self, fallback: Mount) -> Self {
        Self {
            base_route: self.base_route.or(fallback.base_route),
            route_prefix: self.route_prefix.or(fallback.route_prefix),
        }
    }
}

/// Registration settings, usually read from `CLASSY_*` environment variables.
#[derive(Clone, Default)]
pub struct ConfigService {
    config: Arc<DashMap<String, String>>,
}

impl ConfigService {
    pub const ENV_PREFIX: &'static str = "CLASSY_";

    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `CLASSY_*` variable with the prefix removed.
    pub fn from_env() -> Self {
        let service = Self::default();
        for (key, value) in env::vars() {
            if let Some(key) = key.strip_prefix(Self::ENV_PREFIX) {
                service.set(key, &value);
            }
        }
        service
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.config.get(key).map(|v| v.clone())
    }

    pub fn set(&self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }

    pub fn len(&self) -> usize {
        self.config.len()
    }

    pub fn is_empty(&self) -> bool {
        self.config.is_empty()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
