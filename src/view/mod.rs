//! Class-based views
//!
//! A view is a type whose methods are HTTP handlers. Routes are derived from
//! the method names and parameter lists, unless a method carries explicit
//! route annotations.
//!
//! Views are usually declared with the `#[view]` macro, which generates the
//! [`View`] implementation from an `impl` block. Writing it by hand only takes
//! a list of [`MethodDescriptor`]s:
//!
//! ```
//! use classy::{MethodDescriptor, PathParams, View, ViewConfig, annotation};
//!
//! #[derive(Default)]
//! struct UserView;
//!
//! impl UserView {
//!     fn get(&self, obj_id: &str) -> String {
//!         format!("Get:{obj_id}")
//!     }
//! }
//!
//! impl View for UserView {
//!     type Output = String;
//!
//!     fn config() -> ViewConfig {
//!         ViewConfig::new("UserView")
//!     }
//!
//!     fn methods() -> Vec<MethodDescriptor<Self>> {
//!         vec![
//!             MethodDescriptor::new("get", &["obj_id"], |view: &Self, params: &PathParams| {
//!                 view.get(params.value("obj_id"))
//!             }),
//!             MethodDescriptor::new("custom", &[], |_: &Self, _: &PathParams| {
//!                 "Custom Route".to_string()
//!             })
//!             .route(annotation::route("/endpoint/")),
//!         ]
//!     }
//! }
//! ```

pub mod registrar;
pub mod rule;

pub use registrar::Registrar;

use crate::annotation::{RouteCache, RouteOverride};
use crate::config::ViewConfig;
use crate::error::ConfigurationError;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Prefix of method names that are never routed.
pub const RESERVED_PREFIX: &str = "_";

/// A request handler bound to a view instance.
pub type Handler<O> = Arc<dyn Fn(&PathParams) -> O + Send + Sync>;

/// Wraps a handler with cross-cutting behaviour.
pub type Decorator<O> = Arc<dyn Fn(Handler<O>) -> Handler<O> + Send + Sync>;

/// An unbound view method.
pub type MethodFn<V> = Arc<dyn Fn(&V, &PathParams) -> <V as View>::Output + Send + Sync>;

pub fn handler<O, F>(f: F) -> Handler<O>
where
    F: Fn(&PathParams) -> O + Send + Sync + 'static,
{
    Arc::new(f)
}

pub fn decorator<O, F>(f: F) -> Decorator<O>
where
    F: Fn(Handler<O>) -> Handler<O> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A view type whose methods are registered as routes.
///
/// Registration builds one instance of the view and binds every handler to
/// it, so handlers must not rely on per-request state stored in the view.
pub trait View: Send + Sync + Sized + 'static {
    /// What every handler of the view returns.
    type Output: 'static;

    fn config() -> ViewConfig;

    /// Methods declared by the view itself.
    fn methods() -> Vec<MethodDescriptor<Self>>;

    /// Methods of ancestor views, nearest ancestor first. They are routed only
    /// when not redefined by the view or a nearer ancestor.
    fn inherited() -> Vec<MethodDescriptor<Self>> {
        Vec::new()
    }

    /// Applied to every handler in order; the last one is the outermost.
    fn decorators() -> Vec<Decorator<Self::Output>> {
        Vec::new()
    }
}

/// Description of one routable view method.
///
/// `params` are the declared parameter names of the undecorated method,
/// receiver excluded, in declaration order.
pub struct MethodDescriptor<V: View> {
    name: String,
    params: Vec<String>,
    call: MethodFn<V>,
    routes: Vec<RouteOverride>,
    decorators: Vec<Decorator<V::Output>>,
}

impl<V: View> MethodDescriptor<V> {
    pub fn new<F>(name: impl Into<String>, params: &[&str], call: F) -> Self
    where
        F: Fn(&V, &PathParams) -> V::Output + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            params: params.iter().map(|p| p.to_string()).collect(),
            call: Arc::new(call),
            routes: Vec::new(),
            decorators: Vec::new(),
        }
    }

    /// Attach an explicit route. Stacked routes keep their order.
    pub fn route(mut self, route: RouteOverride) -> Self {
        self.routes.push(route);
        self
    }

    /// Wrap this method only. Method decorators sit inside the view's.
    pub fn decorate(mut self, decorator: Decorator<V::Output>) -> Self {
        self.decorators.push(decorator);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn routes(&self) -> &[RouteOverride] {
        &self.routes
    }

    /// Bind the method to `view` and apply the method's own decorators.
    pub fn bind(&self, view: Arc<V>) -> Handler<V::Output> {
        let call = self.call.clone();
        let mut bound: Handler<V::Output> =
            Arc::new(move |params: &PathParams| call(view.as_ref(), params));
        for decorator in &self.decorators {
            bound = decorator(bound);
        }
        bound
    }
}

impl<V: View> Clone for MethodDescriptor<V> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            params: self.params.clone(),
            call: self.call.clone(),
            routes: self.routes.clone(),
            decorators: self.decorators.clone(),
        }
    }
}

impl<V: View> fmt::Debug for MethodDescriptor<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("routes", &self.routes)
            .field("decorators", &self.decorators.len())
            .finish()
    }
}

/// The routable methods of a view, sorted by name, plus the route cache that
/// holds their explicit routes.
pub struct MethodTable<V: View> {
    view: String,
    methods: BTreeMap<String, MethodDescriptor<V>>,
    cache: RouteCache,
}

impl<V: View> MethodTable<V> {
    pub fn new(view: impl Into<String>) -> Self {
        Self {
            view: view.into(),
            methods: BTreeMap::new(),
            cache: RouteCache::new(),
        }
    }

    /// Table for `V`: its own methods, then whatever it inherits.
    pub fn for_view(config: &ViewConfig) -> Result<Self, ConfigurationError> {
        let mut table = Self::new(config.class_name());
        for method in V::methods() {
            table.define(method)?;
        }
        table.inherit(V::inherited());
        Ok(table)
    }

    /// Add a method declared by the view itself.
    pub fn define(&mut self, method: MethodDescriptor<V>) -> Result<(), ConfigurationError> {
        if self.methods.contains_key(method.name()) {
            return Err(ConfigurationError::DuplicateMethod {
                view: self.view.clone(),
                method: method.name().to_string(),
            });
        }
        self.insert(method);
        Ok(())
    }

    /// Add ancestor methods the table does not define yet.
    pub fn inherit(&mut self, methods: impl IntoIterator<Item = MethodDescriptor<V>>) {
        for method in methods {
            if self.methods.contains_key(method.name()) {
                tracing::debug!("{}: `{}` overrides an inherited method", self.view, method.name());
                continue;
            }
            self.insert(method);
        }
    }

    fn insert(&mut self, method: MethodDescriptor<V>) {
        if method.name().starts_with(RESERVED_PREFIX) {
            tracing::debug!("{}: skipping reserved member `{}`", self.view, method.name());
            return;
        }
        for route in method.routes() {
            self.cache.annotate(method.name(), route.clone());
        }
        self.methods.insert(method.name().to_string(), method);
    }

    /// Methods in lexicographic order of their names.
    pub fn iter(&self) -> impl Iterator<Item = &MethodDescriptor<V>> {
        self.methods.values()
    }

    pub fn get(&self, name: &str) -> Option<&MethodDescriptor<V>> {
        self.methods.get(name)
    }

    pub fn cache(&self) -> &RouteCache {
        &self.cache
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

/// Path variables matched for a request, by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(BTreeMap<String, String>);

impl PathParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// The value bound to `name`, or `""` when the route has no such variable.
    pub fn value(&self, name: &str) -> &str {
        self.get(name).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PathParams {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<HashMap<String, String>> for PathParams {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map.into_iter().collect())
    }
}
