use classy::prelude::*;
use classy::Endpoint;

fn mydecorator(inner: Handler<String>) -> Handler<String> {
    handler(move |params| format!("decorator:{}", inner(params)))
}

#[derive(Default)]
pub struct BasicView;

#[view]
impl BasicView {
    fn index(&self) -> String {
        "Index".to_string()
    }

    fn get(&self, obj_id: String) -> String {
        format!("Get:{obj_id}")
    }

    fn put(&self, id: String) -> String {
        format!("Put {id}")
    }

    fn post(&self) -> String {
        "Post".to_string()
    }

    fn delete(&self, id: String) -> String {
        format!("Delete {id}")
    }

    fn mymethod(&self) -> String {
        "My Method".to_string()
    }

    fn mymethod_args(&self, p_one: &str, p_two: &str) -> String {
        format!("My Method {p_one} {p_two}")
    }

    #[route("/endpoint/")]
    fn mymethod_route(&self) -> String {
        "Custom Route".to_string()
    }

    #[route("/endpoint/", method = ["POST", "PUT"])]
    fn mymethod_route_post(&self) -> String {
        "Custom Route POST".to_string()
    }

    #[route("/route1/")]
    #[route("/route2/")]
    fn multi_routed_method(&self) -> String {
        "Multi Routed Method".to_string()
    }

    #[get("/basic/named/", name = "basic_endpoint", cache = 60)]
    fn named(&self) -> String {
        "Named".to_string()
    }

    fn _helper(&self) -> String {
        "never routed".to_string()
    }
}

#[derive(Default)]
pub struct RouteBaseView;

#[view(base_route = "my")]
impl RouteBaseView {
    fn index(&self) -> String {
        "index-route-base".to_string()
    }
}

#[derive(Default)]
pub struct RoutePrefixView;

#[view(route_prefix = "/")]
impl RoutePrefixView {
    fn index(&self) -> String {
        "index-route-prefix".to_string()
    }

    fn post(&self) -> String {
        "post-route-prefix".to_string()
    }
}

#[derive(Default)]
pub struct PrefixCollisionView;

#[view(route_prefix = "/")]
impl PrefixCollisionView {
    fn index(&self) -> String {
        "index".to_string()
    }

    fn get(&self) -> String {
        "get".to_string()
    }
}

#[derive(Default)]
pub struct DecoratorView;

#[view(decorators = [mydecorator])]
impl DecoratorView {
    fn index(&self) -> String {
        "index".to_string()
    }

    fn get(&self, val: String) -> String {
        format!("get:{val}")
    }

    fn myfunc(&self, arg1: String) -> String {
        format!("get:myfunc:{arg1}")
    }

    #[route("/my-custom-route/")]
    fn my_custom_route(&self) -> String {
        "get:my-custom-route".to_string()
    }
}

#[derive(Default)]
pub struct SingleDecoratorView;

#[view]
impl SingleDecoratorView {
    fn index(&self) -> String {
        "index".to_string()
    }

    #[decorate(mydecorator)]
    fn post(&self) -> String {
        "post".to_string()
    }
}

#[derive(Default)]
pub struct VarBaseView;

#[view(base_route = "var-base-route/<route>", base_args = ["route"])]
impl VarBaseView {
    fn index(&self, route: String) -> String {
        route
    }

    fn local(&self, route: String, local: String) -> String {
        format!("{route} {local}")
    }
}

/// Methods shared by every CRUD view, bound to the concrete view type.
fn crud_methods<V: View<Output = String>>() -> Vec<MethodDescriptor<V>> {
    vec![
        MethodDescriptor::new("index", &[], |_: &V, _: &PathParams| {
            "crud:index".to_string()
        }),
        MethodDescriptor::new("get", &["id"], |_: &V, params: &PathParams| {
            format!("crud:get:{}", params.value("id"))
        }),
    ]
}

#[derive(Default)]
pub struct ArticleView;

#[view(inherit = [crud_methods], output = String)]
impl ArticleView {
    fn index(&self) -> String {
        "articles".to_string()
    }
}

fn registered<V: View<Output = String> + Default>() -> RouteTable<String> {
    let mut table = RouteTable::<String>::new();
    Registrar::new().register::<V, _>(&mut table).unwrap();
    table
}

#[test]
fn test_basic_conventional_routes() {
    let table = registered::<BasicView>();
    let params = PathParams::new();

    assert_eq!(table.url_for("BasicView:index", &params).unwrap(), "/basic/");
    assert_eq!(table.url_for("BasicView:post", &params).unwrap(), "/basic/");
    assert_eq!(
        table.url_for("BasicView:mymethod", &params).unwrap(),
        "/basic/mymethod/"
    );

    let get = table.named("BasicView:get").unwrap();
    assert_eq!(get.method, HttpMethod::Get);
    assert_eq!(get.path, "/basic/<obj_id>/");
    assert_eq!(get.call(&PathParams::new().with("obj_id", "7")), "Get:7");

    let put = table.find(HttpMethod::Put, "/basic/<id>/").unwrap();
    assert_eq!(put.endpoint, Endpoint::new("BasicView", "put"));
    assert_eq!(put.call(&PathParams::new().with("id", "3")), "Put 3");

    let delete = table.find(HttpMethod::Delete, "/basic/<id>/").unwrap();
    assert_eq!(delete.call(&PathParams::new().with("id", "3")), "Delete 3");
}

#[test]
fn test_non_default_methods_are_hyphenated_gets() {
    let table = registered::<BasicView>();
    let args = table.named("BasicView:mymethod_args").unwrap();
    assert_eq!(args.method, HttpMethod::Get);
    assert_eq!(args.path, "/basic/mymethod-args/<p_one>/<p_two>/");

    let params = PathParams::new().with("p_one", "a").with("p_two", "b");
    assert_eq!(args.call(&params), "My Method a b");
    assert_eq!(
        table.url_for("BasicView:mymethod_args", &params).unwrap(),
        "/basic/mymethod-args/a/b/"
    );
}

#[test]
fn test_explicit_routes_replace_conventional_ones() {
    let table = registered::<BasicView>();

    let custom = table.find(HttpMethod::Get, "/endpoint/").unwrap();
    assert_eq!(custom.name, "BasicView:mymethod_route");
    assert!(table.find(HttpMethod::Get, "/basic/mymethod-route/").is_none());

    for verb in [HttpMethod::Post, HttpMethod::Put] {
        let record = table.find(verb, "/endpoint/").unwrap();
        assert_eq!(record.name, "BasicView:mymethod_route_post");
        assert_eq!(record.call(&PathParams::new()), "Custom Route POST");
    }
}

#[test]
fn test_stacked_routes_share_handler_and_name() {
    let table = registered::<BasicView>();
    let first = table.find(HttpMethod::Get, "/route1/").unwrap();
    let second = table.find(HttpMethod::Get, "/route2/").unwrap();

    assert_eq!(first.name, "BasicView:multi_routed_method");
    assert_eq!(second.name, first.name);
    assert_eq!(first.call(&PathParams::new()), "Multi Routed Method");
    assert_eq!(second.call(&PathParams::new()), "Multi Routed Method");
    assert_eq!(
        table
            .url_for("BasicView:multi_routed_method", &PathParams::new())
            .unwrap(),
        "/route2/"
    );
}

#[test]
fn test_named_route_keeps_extra_options() {
    let table = registered::<BasicView>();
    let named = table.named("basic_endpoint").unwrap();
    assert_eq!(named.path, "/basic/named/");
    assert_eq!(named.options.get("cache"), Some(&serde_json::json!(60)));
    assert!(table.named("BasicView:named").is_none());
}

#[test]
fn test_private_methods_are_not_routed() {
    let table = registered::<BasicView>();
    assert!(table.records().iter().all(|r| r.endpoint.method != "_helper"));
    assert!(table.named("BasicView:_helper").is_none());
}

#[test]
fn test_route_base() {
    let table = registered::<RouteBaseView>();
    let index = table.named("RouteBaseView:index").unwrap();
    assert_eq!(index.path, "/my/routebase/");
    assert_eq!(index.call(&PathParams::new()), "index-route-base");
}

#[test]
fn test_route_prefix_replaces_class_segment() {
    let table = registered::<RoutePrefixView>();
    for (verb, body) in [
        (HttpMethod::Get, "index-route-prefix"),
        (HttpMethod::Post, "post-route-prefix"),
    ] {
        let record = table.find(verb, "/").unwrap();
        assert_eq!(record.call(&PathParams::new()), body);
    }
    assert_eq!(table.len(), 2);
}

#[test]
fn test_route_prefix_get_collision_is_reported() {
    // `get` without parameters lands on the same rule as `index`
    let mut table = RouteTable::<String>::new();
    let err = Registrar::new()
        .register::<PrefixCollisionView, _>(&mut table)
        .unwrap_err();
    assert_eq!(
        err.rejection(),
        Some(&HostError::DuplicateRoute {
            method: HttpMethod::Get,
            path: "/".to_string(),
        })
    );
    let get = table.named("PrefixCollisionView:get").unwrap();
    assert_eq!(get.call(&PathParams::new()), "get");
}

#[test]
fn test_view_decorators_wrap_every_handler() {
    let table = registered::<DecoratorView>();
    let params = PathParams::new().with("val", "1").with("arg1", "2");

    assert_eq!(
        table.named("DecoratorView:index").unwrap().call(&params),
        "decorator:index"
    );
    assert_eq!(
        table.named("DecoratorView:get").unwrap().call(&params),
        "decorator:get:1"
    );
    assert_eq!(
        table.named("DecoratorView:myfunc").unwrap().call(&params),
        "decorator:get:myfunc:2"
    );
    assert_eq!(
        table
            .find(HttpMethod::Get, "/my-custom-route/")
            .unwrap()
            .call(&params),
        "decorator:get:my-custom-route"
    );
}

#[test]
fn test_method_decorator_wraps_only_its_method() {
    let table = registered::<SingleDecoratorView>();
    let params = PathParams::new();
    assert_eq!(
        table.find(HttpMethod::Post, "/singledecorator/").unwrap().call(&params),
        "decorator:post"
    );
    assert_eq!(
        table.find(HttpMethod::Get, "/singledecorator/").unwrap().call(&params),
        "index"
    );
}

#[test]
fn test_base_args_are_bound_by_the_base_route() {
    let table = registered::<VarBaseView>();
    let index = table.named("VarBaseView:index").unwrap();
    assert_eq!(index.path, "/var-base-route/<route>/varbase/");

    let local = table.named("VarBaseView:local").unwrap();
    assert_eq!(local.path, "/var-base-route/<route>/varbase/local/<local>/");

    let params = PathParams::new().with("route", "bar").with("local", "baz");
    assert_eq!(local.call(&params), "bar baz");
    assert_eq!(
        table.url_for("VarBaseView:local", &params).unwrap(),
        "/var-base-route/bar/varbase/local/baz/"
    );
}

#[test]
fn test_inherited_methods_fill_gaps_only() {
    let table = registered::<ArticleView>();
    let params = PathParams::new().with("id", "4");
    assert_eq!(table.named("ArticleView:index").unwrap().call(&params), "articles");

    let get = table.named("ArticleView:get").unwrap();
    assert_eq!(get.path, "/article/<id>/");
    assert_eq!(get.call(&params), "crud:get:4");
    assert_eq!(table.len(), 2);
}

#[test]
fn test_same_view_mounted_twice() -> anyhow::Result<()> {
    let mut table = RouteTable::<String>::new();
    Registrar::new()
        .base_route("v1")
        .register::<RouteBaseView, _>(&mut table)?;
    Registrar::new()
        .base_route("v2")
        .register::<RouteBaseView, _>(&mut table)?;

    assert_eq!(table.len(), 2);
    assert!(table.find(HttpMethod::Get, "/v1/routebase/").is_some());
    assert_eq!(
        table.url_for("RouteBaseView:index", &PathParams::new())?,
        "/v2/routebase/"
    );
    Ok(())
}

#[test]
fn test_generated_config_and_methods() {
    let config = BasicView::config();
    assert_eq!(config.class_name(), "BasicView");
    assert_eq!(config.get_view_identifier(), "view");

    let config = VarBaseView::config();
    assert_eq!(config.get_base_route(), Some("var-base-route/<route>"));
    assert_eq!(config.get_base_args(), ["route".to_string()]);

    let methods = BasicView::methods();
    let post = methods.iter().find(|m| m.name() == "mymethod_route_post").unwrap();
    assert_eq!(
        post.routes()[0].options().method,
        Some(MethodSpec::from([HttpMethod::Post, HttpMethod::Put]))
    );
    let args = methods.iter().find(|m| m.name() == "mymethod_args").unwrap();
    assert_eq!(args.params(), ["p_one".to_string(), "p_two".to_string()]);
}
