//! Route hosts
//!
//! A host is whatever finally serves the routes: it receives one
//! [`ResolvedRoute`] per registration and decides whether to accept it.
//! Two hosts ship with the crate, [`RouteTable`] (in memory, with reverse URL
//! building) and [`AxumHost`] (builds an `axum::Router`).

pub mod axum;
pub mod table;

pub use self::axum::AxumHost;
pub use table::{RouteRecord, RouteTable};

use crate::annotation::{HttpMethod, MethodSpec};
use crate::view::{Handler, PathParams};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// The router handle a view registers into.
pub trait RouteHost<O> {
    type Error;

    /// Register one route. Called once per route, in registration order.
    fn route(&mut self, route: ResolvedRoute<O>) -> Result<(), Self::Error>;
}

/// The view method a route was built from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Endpoint {
    pub view: String,
    pub method: String,
}

impl Endpoint {
    pub fn new(view: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            view: view.into(),
            method: method.into(),
        }
    }

    /// `<View>:<method>`, the name a route gets unless it sets one.
    pub fn default_name(&self) -> String {
        format!("{}:{}", self.view, self.method)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.view, self.method)
    }
}

/// A route ready to be handed to a host.
pub struct ResolvedRoute<O> {
    pub method: MethodSpec,
    pub path: String,
    pub name: String,
    pub endpoint: Endpoint,
    pub handler: Handler<O>,
    /// Options the registrar does not interpret.
    pub options: BTreeMap<String, Value>,
}

impl<O> ResolvedRoute<O> {
    pub fn call(&self, params: &PathParams) -> O {
        (self.handler)(params)
    }
}

impl<O> Clone for ResolvedRoute<O> {
    fn clone(&self) -> Self {
        Self {
            method: self.method.clone(),
            path: self.path.clone(),
            name: self.name.clone(),
            endpoint: self.endpoint.clone(),
            handler: self.handler.clone(),
            options: self.options.clone(),
        }
    }
}

impl<O> fmt::Debug for ResolvedRoute<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedRoute")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("name", &self.name)
            .field("endpoint", &self.endpoint)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Why a host refused a route or a URL lookup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("{method} {path} is already registered")]
    DuplicateRoute { method: HttpMethod, path: String },

    #[error("endpoint name `{name}` is already used by {existing}")]
    DuplicateName { name: String, existing: Endpoint },

    #[error("malformed path pattern `{pattern}`: {reason}")]
    MalformedPattern { pattern: String, reason: &'static str },

    #[error("path `{path}` conflicts with registered path `{existing}`")]
    ConflictingPattern { path: String, existing: String },

    #[error("no route named `{0}`")]
    UnknownName(String),

    #[error("cannot build `{name}`: missing value for `<{param}>`")]
    MissingParam { name: String, param: String },
}

/// One piece of a path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Static(&'a str),
    Var(&'a str),
}

/// Split a `<name>` pattern into static text and variables.
pub fn parse_pattern(pattern: &str) -> Result<Vec<Segment<'_>>, HostError> {
    let malformed = |reason| HostError::MalformedPattern {
        pattern: pattern.to_string(),
        reason,
    };

    if !pattern.starts_with('/') {
        return Err(malformed("must start with `/`"));
    }

    let mut segments = Vec::new();
    let mut rest = pattern;
    while let Some(open) = rest.find(['<', '>']) {
        if rest.as_bytes()[open] == b'>' {
            return Err(malformed("unmatched `>`"));
        }
        if open > 0 {
            segments.push(Segment::Static(&rest[..open]));
        }
        let after = &rest[open + 1..];
        let close = after.find('>').ok_or_else(|| malformed("unclosed `<`"))?;
        let name = &after[..close];
        if name.is_empty() {
            return Err(malformed("empty variable name"));
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(malformed("variable names may only contain letters, digits and `_`"));
        }
        segments.push(Segment::Var(name));
        rest = &after[close + 1..];
    }
    if !rest.is_empty() {
        segments.push(Segment::Static(rest));
    }
    Ok(segments)
}

/// Fill the variables of `pattern` from `params`.
pub fn build_url(name: &str, pattern: &str, params: &PathParams) -> Result<String, HostError> {
    let mut url = String::with_capacity(pattern.len());
    for segment in parse_pattern(pattern)? {
        match segment {
            Segment::Static(text) => url.push_str(text),
            Segment::Var(var) => {
                let value = params.get(var).ok_or_else(|| HostError::MissingParam {
                    name: name.to_string(),
                    param: var.to_string(),
                })?;
                url.push_str(value);
            }
        }
    }
    Ok(url)
}
