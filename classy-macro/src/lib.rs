use proc_macro::TokenStream;

mod route;
mod view;

/// Attribute macro that turns an inherent impl block into a class-based view
///
/// Every `&self` method whose name does not start with `_` becomes a route.
/// Parameter names are taken from the signature as written and bound from
/// the matched path variables by name, so parameters must be types that
/// convert from `&str` (`String`, `&str`, ...).
///
/// # View options
/// - `name = "UserView"`: class name, defaults to the type name
/// - `base_route = "api"`, `route_prefix = "people"`
/// - `identifier = "view"`: suffix stripped from the class name
/// - `base_args = ["tenant"]`: parameters bound by the base route
/// - `default_routes = ["get", "index", ...]`
/// - `decorators = [logged, timed]`: `fn(Handler<O>) -> Handler<O>` paths
/// - `inherit = [crud_methods]`: functions returning ancestor descriptors
/// - `output = Type`: handler output, defaults to the first method's return type
///
/// # Method attributes
/// - `#[route("/pattern/", method = "POST", name = "endpoint", key = literal)]`
/// - `#[get("/pattern/")]`, `#[post]`, `#[put]`, `#[patch]`, `#[delete]`,
///   `#[head]`, `#[any]`
/// - `#[decorate(path)]`: wrap this method only
///
/// # Example
/// ```rust,ignore
/// use classy::view;
///
/// #[derive(Default)]
/// pub struct BasicView;
///
/// #[view]
/// impl BasicView {
///     fn index(&self) -> String {
///         "Index".to_string()
///     }
///
///     fn get(&self, obj_id: String) -> String {
///         format!("Get:{obj_id}")
///     }
///
///     #[route("/route1/")]
///     #[route("/route2/")]
///     fn multi_routed_method(&self) -> String {
///         "Multi Routed Method".to_string()
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn view(attr: TokenStream, item: TokenStream) -> TokenStream {
    view::view_attribute(attr, item)
}
