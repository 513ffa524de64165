//! Route annotations
//!
//! An annotation is an explicit `(pattern, options)` pair attached to a view
//! method. A method may carry any number of them; each one becomes its own
//! registration and the conventional rule is not used for that method.
//!
//! ```
//! use classy::annotation::{self, HttpMethod};
//!
//! let custom = annotation::route("/endpoint/");
//! let both = annotation::route("/endpoint/").method([HttpMethod::Post, HttpMethod::Put]);
//! let named = annotation::get("/users/<id>/").name("user_detail");
//! # let _ = (custom, both, named);
//! ```

pub mod cache;

pub use cache::RouteCache;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use strum_macros::{AsRefStr, Display, EnumString};

/// HTTP verbs a route can be registered for.
///
/// `Any` matches every verb and has the lowest dispatch priority; hosts use it
/// for fallback routes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Any,
}

/// One verb or a set of verbs sharing a single registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MethodSpec {
    One(HttpMethod),
    Many(Vec<HttpMethod>),
}

impl MethodSpec {
    pub fn methods(&self) -> &[HttpMethod] {
        match self {
            MethodSpec::One(method) => std::slice::from_ref(method),
            MethodSpec::Many(methods) => methods,
        }
    }

    pub fn contains(&self, method: HttpMethod) -> bool {
        self.methods().contains(&method)
    }
}

impl Default for MethodSpec {
    fn default() -> Self {
        MethodSpec::One(HttpMethod::Get)
    }
}

impl fmt::Display for MethodSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.methods().iter().map(|m| m.as_ref()).collect();
        f.write_str(&names.join(","))
    }
}

impl From<HttpMethod> for MethodSpec {
    fn from(method: HttpMethod) -> Self {
        MethodSpec::One(method)
    }
}

impl From<Vec<HttpMethod>> for MethodSpec {
    fn from(methods: Vec<HttpMethod>) -> Self {
        match methods.as_slice() {
            [single] => MethodSpec::One(*single),
            _ => MethodSpec::Many(methods),
        }
    }
}

impl<const N: usize> From<[HttpMethod; N]> for MethodSpec {
    fn from(methods: [HttpMethod; N]) -> Self {
        MethodSpec::from(methods.to_vec())
    }
}

/// Options carried by a [`RouteOverride`].
///
/// `method` and `name` are interpreted by the registrar, everything in
/// `extra` is handed to the host as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<MethodSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl RouteOptions {
    pub fn is_empty(&self) -> bool {
        self.method.is_none() && self.name.is_none() && self.extra.is_empty()
    }
}

/// An explicit route for a view method. The pattern is used verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteOverride {
    pattern: String,
    #[serde(default)]
    options: RouteOptions,
}

impl RouteOverride {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            options: RouteOptions::default(),
        }
    }

    /// Restrict the route to one verb or a set of verbs.
    pub fn method(mut self, method: impl Into<MethodSpec>) -> Self {
        self.options.method = Some(method.into());
        self
    }

    /// Endpoint name used for reverse lookup.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.options.name = Some(name.into());
        self
    }

    /// An opaque option forwarded to the host.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.extra.insert(key.into(), value.into());
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn options(&self) -> &RouteOptions {
        &self.options
    }

    pub fn into_parts(self) -> (String, RouteOptions) {
        (self.pattern, self.options)
    }
}

/// An override with no options: the registrar resolves it to `GET` and the
/// `<View>:<method>` endpoint name.
pub fn route(pattern: impl Into<String>) -> RouteOverride {
    RouteOverride::new(pattern)
}

pub fn get(pattern: impl Into<String>) -> RouteOverride {
    route(pattern).method(HttpMethod::Get)
}

pub fn post(pattern: impl Into<String>) -> RouteOverride {
    route(pattern).method(HttpMethod::Post)
}

pub fn put(pattern: impl Into<String>) -> RouteOverride {
    route(pattern).method(HttpMethod::Put)
}

pub fn patch(pattern: impl Into<String>) -> RouteOverride {
    route(pattern).method(HttpMethod::Patch)
}

pub fn delete(pattern: impl Into<String>) -> RouteOverride {
    route(pattern).method(HttpMethod::Delete)
}

pub fn head(pattern: impl Into<String>) -> RouteOverride {
    route(pattern).method(HttpMethod::Head)
}

/// Catch-all route matching every verb at the lowest priority.
pub fn any(pattern: impl Into<String>) -> RouteOverride {
    route(pattern).method(HttpMethod::Any)
}
