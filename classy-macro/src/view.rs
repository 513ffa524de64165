use crate::route::{
    is_decorate_attr, is_route_attr, parse_decorate_attr, parse_route_attr, RouteArgs,
};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse::Parse, parse::ParseStream, parse_macro_input, FnArg, ImplItem, ImplItemFn, ItemImpl,
    LitStr, Pat, Path, ReturnType, Token, Type,
};

#[derive(Default)]
struct ViewArgs {
    name: Option<LitStr>,
    base_route: Option<LitStr>,
    route_prefix: Option<LitStr>,
    identifier: Option<LitStr>,
    base_args: Option<Vec<LitStr>>,
    default_routes: Option<Vec<LitStr>>,
    decorators: Vec<Path>,
    inherit: Vec<Path>,
    output: Option<Type>,
}

impl Parse for ViewArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut args = ViewArgs::default();
        while !input.is_empty() {
            let name: syn::Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            if name == "name" {
                args.name = Some(input.parse()?);
            } else if name == "base_route" {
                args.base_route = Some(input.parse()?);
            } else if name == "route_prefix" {
                args.route_prefix = Some(input.parse()?);
            } else if name == "identifier" {
                args.identifier = Some(input.parse()?);
            } else if name == "base_args" {
                args.base_args = Some(parse_list(input)?);
            } else if name == "default_routes" {
                args.default_routes = Some(parse_list(input)?);
            } else if name == "decorators" {
                args.decorators = parse_list(input)?;
            } else if name == "inherit" {
                args.inherit = parse_list(input)?;
            } else if name == "output" {
                args.output = Some(input.parse()?);
            } else {
                return Err(syn::Error::new(
                    name.span(),
                    format!("unknown #[view] option `{}`", name),
                ));
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }
        Ok(args)
    }
}

/// Parse `[a, b, c]`.
fn parse_list<T: Parse>(input: ParseStream) -> syn::Result<Vec<T>> {
    let content;
    syn::bracketed!(content in input);
    let items = content.parse_terminated(T::parse, Token![,])?;
    Ok(items.into_iter().collect())
}

struct MethodInfo {
    fn_name: syn::Ident,
    params: Vec<String>,
    routes: Vec<RouteArgs>,
    decorators: Vec<Path>,
    output: Type,
}

pub fn view_attribute(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as ViewArgs);
    let input = parse_macro_input!(item as ItemImpl);
    match generate_view_impl(args, input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn generate_view_impl(args: ViewArgs, mut input: ItemImpl) -> syn::Result<TokenStream2> {
    if let Some((_, path, _)) = &input.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[view] goes on an inherent impl block",
        ));
    }

    let mut methods = Vec::new();
    for item in input.items.iter_mut() {
        if let ImplItem::Fn(method) = item {
            if let Some(info) = extract_method_info(method)? {
                methods.push(info);
            }
            method
                .attrs
                .retain(|attr| !is_route_attr(attr) && !is_decorate_attr(attr));
        }
    }

    let class_name = match &args.name {
        Some(name) => name.value(),
        None => type_name(&input.self_ty)?,
    };

    let output = match (&args.output, methods.first()) {
        (Some(output), _) => output.clone(),
        (None, Some(first)) => first.output.clone(),
        (None, None) => syn::parse_quote!(()),
    };

    let config = view_config(&class_name, &args);
    let descriptors = methods.iter().map(method_descriptor);

    let decorators_fn = if args.decorators.is_empty() {
        quote! {}
    } else {
        let decorators = &args.decorators;
        quote! {
            fn decorators() -> ::std::vec::Vec<::classy::Decorator<Self::Output>> {
                ::std::vec![#(::classy::decorator(#decorators)),*]
            }
        }
    };

    let inherited_fn = if args.inherit.is_empty() {
        quote! {}
    } else {
        let inherit = &args.inherit;
        quote! {
            fn inherited() -> ::std::vec::Vec<::classy::MethodDescriptor<Self>> {
                let mut __methods = ::std::vec::Vec::new();
                #(
                    let __inherited: ::std::vec::Vec<::classy::MethodDescriptor<Self>> = #inherit();
                    __methods.extend(__inherited);
                )*
                __methods
            }
        }
    };

    let self_ty = &input.self_ty;
    let (impl_generics, _, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        #input

        impl #impl_generics ::classy::View for #self_ty #where_clause {
            type Output = #output;

            fn config() -> ::classy::ViewConfig {
                #config
            }

            fn methods() -> ::std::vec::Vec<::classy::MethodDescriptor<Self>> {
                ::std::vec![#(#descriptors),*]
            }

            #inherited_fn
            #decorators_fn
        }
    })
}

/// Routable methods take `&self`; names starting with `_` are private.
fn extract_method_info(method: &ImplItemFn) -> syn::Result<Option<MethodInfo>> {
    let sig = &method.sig;
    let routing_attr = method
        .attrs
        .iter()
        .find(|attr| is_route_attr(attr) || is_decorate_attr(attr));
    let Some(receiver) = sig.receiver() else {
        return match routing_attr {
            Some(attr) => Err(syn::Error::new_spanned(
                attr,
                "only `&self` methods can be routed or decorated",
            )),
            None => Ok(None),
        };
    };
    if sig.ident.to_string().starts_with('_') {
        return match routing_attr {
            Some(attr) => Err(syn::Error::new_spanned(
                attr,
                "methods starting with `_` are never routed",
            )),
            None => Ok(None),
        };
    }
    let shared_ref = receiver.reference.is_some()
        && receiver.mutability.is_none()
        && receiver.colon_token.is_none();
    if !shared_ref {
        return Err(syn::Error::new_spanned(
            receiver,
            "view methods must take `&self`; the view instance is shared by all handlers",
        ));
    }
    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new_spanned(
            asyncness,
            "view methods are called synchronously and cannot be async",
        ));
    }

    let mut params = Vec::new();
    for input in sig.inputs.iter() {
        if let FnArg::Typed(pat_type) = input {
            match &*pat_type.pat {
                Pat::Ident(pat_ident) => params.push(pat_ident.ident.to_string()),
                other => {
                    return Err(syn::Error::new_spanned(
                        other,
                        "view method parameters must be plain identifiers",
                    ))
                }
            }
        }
    }

    let mut routes = Vec::new();
    let mut decorators = Vec::new();
    for attr in &method.attrs {
        if is_route_attr(attr) {
            routes.push(parse_route_attr(attr)?);
        } else if is_decorate_attr(attr) {
            decorators.push(parse_decorate_attr(attr)?);
        }
    }

    let output = match &sig.output {
        ReturnType::Default => syn::parse_quote!(()),
        ReturnType::Type(_, ty) => (**ty).clone(),
    };

    Ok(Some(MethodInfo {
        fn_name: sig.ident.clone(),
        params,
        routes,
        decorators,
        output,
    }))
}

fn method_descriptor(method: &MethodInfo) -> TokenStream2 {
    let fn_name = &method.fn_name;
    let name = fn_name.to_string();
    let params = &method.params;
    let routes = method.routes.iter().map(RouteArgs::to_tokens);
    let decorators = &method.decorators;

    quote! {
        ::classy::MethodDescriptor::new(
            #name,
            &[#(#params),*],
            |__view: &Self, __params: &::classy::PathParams| {
                __view.#fn_name(#(::core::convert::From::from(__params.value(#params))),*)
            },
        )
        #(.route(#routes))*
        #(.decorate(::classy::decorator(#decorators)))*
    }
}

fn view_config(class_name: &str, args: &ViewArgs) -> TokenStream2 {
    let base_route = args.base_route.as_ref().map(|v| quote! { .base_route(#v) });
    let route_prefix = args.route_prefix.as_ref().map(|v| quote! { .route_prefix(#v) });
    let identifier = args.identifier.as_ref().map(|v| quote! { .view_identifier(#v) });
    let base_args = args.base_args.as_ref().map(|names| {
        quote! { .base_args(::std::vec::Vec::<&str>::from([#(#names),*])) }
    });
    let default_routes = args.default_routes.as_ref().map(|names| {
        quote! { .default_routes(::std::vec::Vec::<&str>::from([#(#names),*])) }
    });
    quote! {
        ::classy::ViewConfig::new(#class_name)
            #base_route
            #route_prefix
            #identifier
            #base_args
            #default_routes
    }
}

/// `UserView` for `impl UserView` and `impl crate::views::UserView<T>`.
fn type_name(ty: &Type) -> syn::Result<String> {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            return Ok(segment.ident.to_string());
        }
    }
    Err(syn::Error::new_spanned(
        ty,
        "#[view] needs a named type; pass `name = \"...\"` otherwise",
    ))
}
