use super::{Endpoint, HostError, ResolvedRoute, RouteHost, Segment, build_url, parse_pattern};
use crate::annotation::HttpMethod;
use crate::view::{Handler, PathParams};
use ::axum::Router;
use ::axum::extract::Path;
use ::axum::extract::rejection::PathRejection;
use ::axum::response::{IntoResponse, Response};
use ::axum::routing::{MethodFilter, MethodRouter};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::future::{Ready, ready};

/// Host that assembles an [`axum::Router`](::axum::Router).
///
/// Routes sharing a path are merged into one `MethodRouter`; `ANY` routes
/// become its fallback, so they only see verbs nothing else on the path
/// handles. Handlers receive the matched path variables as [`PathParams`].
///
/// Registrations axum would panic on are rejected up front: a verb registered
/// twice for a path, and two paths of the same shape whose variables are
/// named differently (`/user/<id>/` vs `/user/<obj_id>/`).
///
/// ```rust,ignore
/// let mut host = AxumHost::new();
/// Registrar::new().register::<UserView, _>(&mut host)?;
/// let app: axum::Router = host.into_router();
/// ```
pub struct AxumHost<S = ()> {
    routes: BTreeMap<String, MethodRouter<S>>,
    claimed: HashSet<(HttpMethod, String)>,
    shapes: HashMap<String, String>,
    names: HashMap<String, (Endpoint, String)>,
}

impl<S> Default for AxumHost<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> AxumHost<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            routes: BTreeMap::new(),
            claimed: HashSet::new(),
            shapes: HashMap::new(),
            names: HashMap::new(),
        }
    }

    /// Number of distinct paths.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Build the URL of the route named `name`.
    pub fn url_for(&self, name: &str, params: &PathParams) -> Result<String, HostError> {
        let (_, pattern) = self
            .names
            .get(name)
            .ok_or_else(|| HostError::UnknownName(name.to_string()))?;
        build_url(name, pattern, params)
    }

    pub fn into_router(self) -> Router<S> {
        self.routes
            .into_iter()
            .fold(Router::new(), |router, (path, methods)| {
                router.route(&path, methods)
            })
    }
}

impl<S, O> RouteHost<O> for AxumHost<S>
where
    S: Clone + Send + Sync + 'static,
    O: IntoResponse + 'static,
{
    type Error = HostError;

    fn route(&mut self, route: ResolvedRoute<O>) -> Result<(), HostError> {
        let path = axum_path(&route.path)?;
        let shape = path_shape(&route.path)?;

        if let Some(existing) = self.shapes.get(&shape) {
            if existing != &path {
                return Err(HostError::ConflictingPattern {
                    path: route.path,
                    existing: existing.clone(),
                });
            }
        }
        if let Some((endpoint, _)) = self.names.get(&route.name) {
            if endpoint != &route.endpoint {
                return Err(HostError::DuplicateName {
                    name: route.name,
                    existing: endpoint.clone(),
                });
            }
        }
        let mut seen = HashSet::new();
        for &method in route.method.methods() {
            if self.claimed.contains(&(method, path.clone())) || !seen.insert(method) {
                return Err(HostError::DuplicateRoute {
                    method,
                    path: route.path,
                });
            }
        }

        let mut methods = self.routes.remove(&path).unwrap_or_else(MethodRouter::new);
        for &method in route.method.methods() {
            let endpoint = endpoint(route.handler.clone());
            methods = match method_filter(method) {
                Some(filter) => methods.on(filter, endpoint),
                None => methods.fallback(endpoint),
            };
            self.claimed.insert((method, path.clone()));
        }

        tracing::debug!("axum: {} {} -> {}", route.method, path, route.name);
        self.routes.insert(path.clone(), methods);
        self.shapes.insert(shape, path);
        self.names.insert(route.name, (route.endpoint, route.path));
        Ok(())
    }
}

fn endpoint<O>(
    handler: Handler<O>,
) -> impl Fn(Result<Path<HashMap<String, String>>, PathRejection>) -> Ready<Response>
+ Clone
+ Send
+ Sync
+ 'static
where
    O: IntoResponse + 'static,
{
    move |params| match params {
        Ok(Path(params)) => ready(handler(&PathParams::from(params)).into_response()),
        Err(rejection) => ready(rejection.into_response()),
    }
}

fn method_filter(method: HttpMethod) -> Option<MethodFilter> {
    match method {
        HttpMethod::Get => Some(MethodFilter::GET),
        HttpMethod::Post => Some(MethodFilter::POST),
        HttpMethod::Put => Some(MethodFilter::PUT),
        HttpMethod::Patch => Some(MethodFilter::PATCH),
        HttpMethod::Delete => Some(MethodFilter::DELETE),
        HttpMethod::Head => Some(MethodFilter::HEAD),
        HttpMethod::Options => Some(MethodFilter::OPTIONS),
        HttpMethod::Any => None,
    }
}

/// `/user/<id>/` becomes `/user/{id}/`.
fn axum_path(pattern: &str) -> Result<String, HostError> {
    let mut path = String::with_capacity(pattern.len());
    let segments = parse_pattern(pattern)?;
    let adjacent = segments
        .windows(2)
        .any(|pair| matches!(pair, [Segment::Var(_), Segment::Var(_)]));
    if adjacent {
        return Err(HostError::MalformedPattern {
            pattern: pattern.to_string(),
            reason: "axum needs a separator between two variables",
        });
    }
    for segment in segments {
        match segment {
            Segment::Static(text) => {
                let reserved = text.contains(['{', '}'])
                    || text.split('/').any(|part| part.starts_with([':', '*']));
                if reserved {
                    return Err(HostError::MalformedPattern {
                        pattern: pattern.to_string(),
                        reason: "axum reserves `{`, `}` and segments starting with `:` or `*`",
                    });
                }
                path.push_str(text);
            }
            Segment::Var(name) => {
                path.push('{');
                path.push_str(name);
                path.push('}');
            }
        }
    }
    Ok(path)
}

/// The pattern with variable names erased; axum refuses two paths that only
/// differ there.
fn path_shape(pattern: &str) -> Result<String, HostError> {
    let mut shape = String::with_capacity(pattern.len());
    for segment in parse_pattern(pattern)? {
        match segment {
            Segment::Static(text) => shape.push_str(text),
            Segment::Var(_) => shape.push_str("{}"),
        }
    }
    Ok(shape)
}
