//! View registration
//!
//! Turns a [`View`] into routes and submits them to a [`RouteHost`]:
//!
//! 1. resolve the view configuration against the call-time [`Mount`],
//! 2. collect the routable methods, sorted by name,
//! 3. build one view instance and bind every handler to it,
//! 4. wrap each handler with the view decorators (last one outermost),
//! 5. submit one route per explicit annotation, or a single conventional
//!    route when the method has none.
//!
//! Routes go to the host as soon as they are built. If the host refuses
//! one, registration stops there and the routes already submitted stay.

use super::{Handler, MethodDescriptor, MethodTable, View, rule};
use crate::annotation::{MethodSpec, RouteOverride};
use crate::config::{ConfigService, Mount, ViewConfig};
use crate::error::{ConfigurationError, RegisterError, Result};
use crate::host::{Endpoint, ResolvedRoute, RouteHost};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Registers views into a host.
///
/// A `Registrar` only carries call-time arguments; it never changes the
/// views it registers, so the same view can be registered into several
/// hosts with different mounts.
///
/// # Example
///
/// ```rust,ignore
/// let mut table = RouteTable::new();
/// Registrar::new().register::<UserView, _>(&mut table)?;
/// Registrar::new().base_route("admin").register::<UserView, _>(&mut admin_table)?;
/// ```
#[derive(Clone, Default)]
pub struct Registrar {
    mount: Mount,
    settings: Option<ConfigService>,
}

impl Registrar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the view's `base_route`.
    pub fn base_route(mut self, base_route: impl Into<String>) -> Self {
        self.mount = self.mount.base_route(base_route);
        self
    }

    /// Overrides the view's `route_prefix`.
    pub fn route_prefix(mut self, route_prefix: impl Into<String>) -> Self {
        self.mount = self.mount.route_prefix(route_prefix);
        self
    }

    pub fn mount(mut self, mount: Mount) -> Self {
        self.mount = mount;
        self
    }

    /// Read mount settings from `settings` for arguments not given explicitly.
    pub fn with_config(mut self, settings: ConfigService) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Register `V` with a default-constructed instance.
    pub fn register<V, H>(&self, host: &mut H) -> Result<(), H::Error>
    where
        V: View + Default,
        H: RouteHost<V::Output>,
    {
        self.register_instance(host, Arc::new(V::default()))
    }

    /// Register `V`, binding every handler to `view`.
    pub fn register_instance<V, H>(
        &self,
        host: &mut H,
        view: Arc<V>,
    ) -> Result<(), H::Error>
    where
        V: View,
        H: RouteHost<V::Output>,
    {
        let config = self.resolve_config(&V::config())?;
        let table = MethodTable::<V>::for_view(&config)?;
        let decorators = V::decorators();

        tracing::debug!(
            "Registering {} ({} methods)",
            config.class_name(),
            table.len()
        );

        for method in table.iter() {
            let mut handler = method.bind(view.clone());
            for decorator in &decorators {
                handler = decorator(handler);
            }

            match table.cache().get(method.name()) {
                None => {
                    let route = conventional_route(&config, method, handler);
                    submit(host, route)?;
                }
                Some(overrides) => {
                    for route in overrides {
                        let route =
                            override_route(&config, method, route.clone(), handler.clone());
                        submit(host, route)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn resolve_config(
        &self,
        config: &ViewConfig,
    ) -> std::result::Result<ViewConfig, ConfigurationError> {
        if config.is_abstract() {
            return Err(ConfigurationError::AbstractView);
        }
        let mount = match &self.settings {
            Some(settings) => self
                .mount
                .clone()
                .or(Mount::from_config(settings, config.class_name())),
            None => self.mount.clone(),
        };
        Ok(config.mounted(&mount))
    }
}

fn submit<O, H>(host: &mut H, route: ResolvedRoute<O>) -> Result<(), H::Error>
where
    H: RouteHost<O>,
{
    tracing::info!("{} : {}, Endpoint: {}", route.method, route.path, route.name);
    host.route(route).map_err(RegisterError::Rejected)
}

/// Route for a method without explicit annotations.
fn conventional_route<V: View>(
    config: &ViewConfig,
    method: &MethodDescriptor<V>,
    handler: Handler<V::Output>,
) -> ResolvedRoute<V::Output> {
    let endpoint = Endpoint::new(config.class_name(), method.name());
    ResolvedRoute {
        method: MethodSpec::One(rule::conventional_method(config, method.name())),
        path: rule::conventional_rule(config, method.name(), method.params()),
        name: endpoint.default_name(),
        endpoint,
        handler,
        options: BTreeMap::new(),
    }
}

/// Route for one explicit annotation. The pattern is used verbatim.
fn override_route<V: View>(
    config: &ViewConfig,
    method: &MethodDescriptor<V>,
    route: RouteOverride,
    handler: Handler<V::Output>,
) -> ResolvedRoute<V::Output> {
    let endpoint = Endpoint::new(config.class_name(), method.name());
    let (path, options) = route.into_parts();
    ResolvedRoute {
        method: options.method.unwrap_or_default(),
        path,
        name: options.name.unwrap_or_else(|| endpoint.default_name()),
        endpoint,
        handler,
        options: options.extra,
    }
}
