use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{
    parse::{Parse, ParseStream},
    Attribute, Ident, Lit, LitStr, Path, Token,
};

/// Method attributes consumed by `#[view]`. All but `route` preset the verb.
pub const ROUTE_ATTRS: [&str; 8] = ["route", "get", "post", "put", "patch", "delete", "head", "any"];

pub const DECORATE_ATTR: &str = "decorate";

const VERBS: [(&str, &str); 8] = [
    ("GET", "Get"),
    ("POST", "Post"),
    ("PUT", "Put"),
    ("PATCH", "Patch"),
    ("DELETE", "Delete"),
    ("HEAD", "Head"),
    ("OPTIONS", "Options"),
    ("ANY", "Any"),
];

/// One parsed `#[route(...)]` (or verb sugar) attribute.
pub struct RouteArgs {
    pattern: LitStr,
    methods: Vec<Ident>,
    name: Option<LitStr>,
    options: Vec<(String, Lit)>,
}

impl Parse for RouteArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let pattern: LitStr = input.parse()?;
        let mut methods = Vec::new();
        let mut name = None;
        let mut options = Vec::new();

        while !input.is_empty() {
            input.parse::<Token![,]>()?;
            if input.is_empty() {
                break;
            }
            let key: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            if key == "method" {
                if input.peek(syn::token::Bracket) {
                    let content;
                    syn::bracketed!(content in input);
                    let verbs = content.parse_terminated(<LitStr as Parse>::parse, Token![,])?;
                    for verb in verbs {
                        methods.push(verb_ident(&verb)?);
                    }
                } else {
                    let verb: LitStr = input.parse()?;
                    methods.push(verb_ident(&verb)?);
                }
            } else if key == "name" {
                name = Some(input.parse()?);
            } else {
                let value: Lit = input.parse()?;
                match value {
                    Lit::Str(_) | Lit::Int(_) | Lit::Float(_) | Lit::Bool(_) => {}
                    other => {
                        return Err(syn::Error::new(
                            other.span(),
                            "route options must be string, number or bool literals",
                        ))
                    }
                }
                options.push((key.to_string(), value));
            }
        }

        Ok(RouteArgs {
            pattern,
            methods,
            name,
            options,
        })
    }
}

impl RouteArgs {
    /// `::classy::RouteOverride` builder expression for this annotation.
    pub fn to_tokens(&self) -> TokenStream2 {
        let pattern = &self.pattern;
        let method = if self.methods.is_empty() {
            quote! {}
        } else {
            let methods = &self.methods;
            quote! {
                .method(::classy::MethodSpec::from([#(::classy::HttpMethod::#methods),*]))
            }
        };
        let name = self.name.as_ref().map(|name| quote! { .name(#name) });
        let options = self.options.iter().map(|(key, value)| {
            quote! { .option(#key, ::classy::serde_json::Value::from(#value)) }
        });
        quote! {
            ::classy::RouteOverride::new(#pattern) #method #name #(#options)*
        }
    }
}

pub fn is_route_attr(attr: &Attribute) -> bool {
    attr.path()
        .get_ident()
        .is_some_and(|ident| ROUTE_ATTRS.contains(&ident.to_string().as_str()))
}

pub fn is_decorate_attr(attr: &Attribute) -> bool {
    attr.path().is_ident(DECORATE_ATTR)
}

/// Parse a route attribute, applying the verb its name implies.
pub fn parse_route_attr(attr: &Attribute) -> syn::Result<RouteArgs> {
    let mut args: RouteArgs = attr.parse_args()?;
    let attr_name = attr
        .path()
        .get_ident()
        .map(|ident| ident.to_string())
        .unwrap_or_default();

    if attr_name != "route" {
        if !args.methods.is_empty() {
            return Err(syn::Error::new_spanned(
                attr,
                format!("#[{}] already sets the method; use #[route] to pass `method`", attr_name),
            ));
        }
        let verb = LitStr::new(&attr_name.to_uppercase(), Span::call_site());
        args.methods.push(verb_ident(&verb)?);
    }
    Ok(args)
}

pub fn parse_decorate_attr(attr: &Attribute) -> syn::Result<Path> {
    attr.parse_args()
}

fn verb_ident(verb: &LitStr) -> syn::Result<Ident> {
    let upper = verb.value().to_uppercase();
    VERBS
        .iter()
        .find(|(name, _)| *name == upper)
        .map(|(_, variant)| Ident::new(variant, verb.span()))
        .ok_or_else(|| {
            syn::Error::new(verb.span(), format!("unknown HTTP method `{}`", verb.value()))
        })
}
