//! Conventional route derivation
//!
//! A view method without explicit routes gets a rule built from the view's
//! path segment, the method name and the method's parameter names:
//!
//! | view          | method                  | rule                  |
//! |---------------|-------------------------|-----------------------|
//! | `UserView`    | `get(obj_id)`           | `/user/<obj_id>/`     |
//! | `UserView`    | `index()`               | `/user/`              |
//! | `UserView`    | `reset_password(token)` | `/user/reset-password/<token>/` |

use crate::annotation::HttpMethod;
use crate::config::ViewConfig;
use std::str::FromStr;

/// Lower-cased class name with the view identifier removed, when the name
/// really ends with it.
pub fn class_segment(config: &ViewConfig) -> String {
    let name = config.class_name().to_lowercase();
    let identifier = config.get_view_identifier().to_lowercase();
    match name.strip_suffix(identifier.as_str()) {
        Some(stripped) if !identifier.is_empty() => stripped.to_string(),
        _ => name,
    }
}

/// Leading part of every conventional rule of the view.
pub fn base_segment(config: &ViewConfig) -> String {
    match (config.get_base_route(), config.get_route_prefix()) {
        (None, None) => class_segment(config),
        (None, Some(prefix)) => prefix.to_string(),
        (Some(base), None) => format!("{}/{}", base, class_segment(config)),
        (Some(base), Some(prefix)) => format!("{}/{}", base, prefix),
    }
}

/// Verb for a method routed by convention.
pub fn conventional_method(config: &ViewConfig, method: &str) -> HttpMethod {
    if method == "index" || !config.is_default_route(method) {
        return HttpMethod::Get;
    }
    HttpMethod::from_str(method).unwrap_or(HttpMethod::Get)
}

/// Rule for a method routed by convention.
pub fn conventional_rule(config: &ViewConfig, method: &str, params: &[String]) -> String {
    let mut parts = vec![base_segment(config)];

    if !config.is_default_route(method) {
        parts.push(hyphenate(method));
    }

    parts.extend(
        params
            .iter()
            .filter(|param| !config.is_base_arg(param))
            .map(|param| format!("<{}>", param)),
    );

    let joined: Vec<&str> = parts
        .iter()
        .map(String::as_str)
        .filter(|part| !part.is_empty())
        .collect();
    collapse_slashes(&format!("/{}/", joined.join("/")))
}

/// `reset_password` becomes `reset-password`.
pub fn hyphenate(method: &str) -> String {
    method.replace('_', "-").to_lowercase()
}

/// Replace every run of `/` with a single one.
pub fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut previous_slash = false;
    for ch in path.chars() {
        if ch == '/' {
            if previous_slash {
                continue;
            }
            previous_slash = true;
        } else {
            previous_slash = false;
        }
        out.push(ch);
    }
    out
}
