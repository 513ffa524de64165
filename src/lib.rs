//! # Classy
//!
//! Class-based views for Rust web services.
//!
//! A view groups related handlers as methods of one type. Instead of writing
//! a route for every handler, the routes are derived from the view:
//!
//! - the path segment comes from the view name (`UserView` → `/user/`),
//! - `get`, `put`, `post`, `delete`, `options` map to their HTTP verb and
//!   `index` to `GET`, all at the view's root,
//! - any other method is a `GET` route named after it
//!   (`reset_password` → `/user/reset-password/`),
//! - method parameters become path variables (`get(obj_id)` →
//!   `/user/<obj_id>/`),
//! - explicit `#[route]` annotations replace the derived route entirely.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use classy::prelude::*;
//!
//! #[derive(Default)]
//! pub struct UserView;
//!
//! #[view]
//! impl UserView {
//!     fn index(&self) -> String {
//!         "all users".to_string()
//!     }
//!
//!     fn get(&self, obj_id: String) -> String {
//!         format!("user {obj_id}")
//!     }
//!
//!     #[route("/users/search/", name = "user_search")]
//!     #[post("/users/search/")]
//!     fn search(&self) -> String {
//!         "search".to_string()
//!     }
//! }
//!
//! let mut host = AxumHost::new();
//! Registrar::new().register::<UserView, _>(&mut host)?;
//! let app: axum::Router = host.into_router();
//! ```
//!
//! Registration is meant to run once per view at startup. Any error it
//! returns is a configuration problem of the process.

pub mod annotation;
pub mod config;
pub mod error;
pub mod host;
pub mod view;

// Re-export core types
pub use annotation::{HttpMethod, MethodSpec, RouteCache, RouteOptions, RouteOverride};
pub use config::{ConfigService, Mount, ViewConfig};
pub use error::{ConfigurationError, RegisterError};
pub use host::{AxumHost, Endpoint, HostError, ResolvedRoute, RouteHost, RouteRecord, RouteTable};
pub use view::{
    Decorator, Handler, MethodDescriptor, MethodTable, PathParams, Registrar, View, decorator,
    handler,
};

// Re-export macros
pub use classy_macro::view;

// Used by generated code
pub use serde_json;

/// Prelude module for convenient imports
///
/// ```
/// use classy::prelude::*;
/// ```
pub mod prelude {
    pub use crate::annotation::{self, HttpMethod, MethodSpec, RouteOverride};
    pub use crate::config::{ConfigService, Mount, ViewConfig};
    pub use crate::error::{ConfigurationError, RegisterError};
    pub use crate::host::{AxumHost, HostError, RouteHost, RouteTable};
    pub use crate::view::{
        Decorator, Handler, MethodDescriptor, PathParams, Registrar, View, decorator, handler,
    };
    pub use crate::view;
}
