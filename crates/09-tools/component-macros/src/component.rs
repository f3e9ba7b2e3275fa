//! `#[derive(Component)]` 实现

use crate::utils::{registration_fn_name, unwrap_type};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    punctuated::Punctuated, Attribute, Data, DeriveInput, Error, Fields, LitStr, Meta, Result,
    Token, Type,
};

/// 组件标记属性名与对应的 `MarkerKind` 变体
const MARKERS: [(&str, &str); 5] = [
    ("component", "Component"),
    ("service", "Service"),
    ("controller", "Controller"),
    ("resource", "Resource"),
    ("configuration", "Configuration"),
];

/// 组件标记
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerArg {
    /// `MarkerKind` 变体名
    pub kind: &'static str,
    pub alias: Option<String>,
}

/// `#[ioc(...)]` 选项
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IocOptions {
    /// 覆盖完整类型名称
    pub name: Option<String>,
    /// 不生成无参构造函数
    pub no_default: bool,
    /// 覆盖类型形态
    pub shape: Option<String>,
    /// 不登记到全局类型目录
    pub no_register: bool,
}

/// 解析组件标记属性
pub fn parse_markers(attrs: &[Attribute]) -> Result<Vec<MarkerArg>> {
    let mut markers = Vec::new();
    for attr in attrs {
        let Some(&(_, kind)) = MARKERS.iter().find(|(name, _)| attr.path().is_ident(name)) else {
            continue;
        };
        let alias = match &attr.meta {
            Meta::Path(_) => None,
            Meta::List(_) => Some(attr.parse_args::<LitStr>()?.value()),
            Meta::NameValue(nv) => {
                return Err(Error::new_spanned(
                    nv,
                    "组件别名的写法为 #[service(\"alias\")]",
                ))
            }
        };
        markers.push(MarkerArg { kind, alias });
    }
    Ok(markers)
}

/// 解析 `#[ioc(...)]`
pub fn parse_options(attrs: &[Attribute]) -> Result<IocOptions> {
    let mut options = IocOptions::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("ioc")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                options.name = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("no_default") {
                options.no_default = true;
            } else if meta.path.is_ident("no_register") {
                options.no_register = true;
            } else if meta.path.is_ident("shape") {
                let shape = meta.value()?.parse::<LitStr>()?;
                match shape.value().as_str() {
                    "concrete" | "abstract" => options.shape = Some(shape.value()),
                    _ => {
                        return Err(Error::new_spanned(
                            shape,
                            "shape 只能是 \"concrete\" 或 \"abstract\"",
                        ))
                    }
                }
            } else {
                return Err(meta.error("未知的 ioc 选项"));
            }
            Ok(())
        })?;
    }
    Ok(options)
}

/// 解析 `#[implements(...)]`
pub fn parse_implements(attrs: &[Attribute]) -> Result<Vec<Type>> {
    let mut types = Vec::new();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("implements")) {
        let parsed = attr.parse_args_with(Punctuated::<Type, Token![,]>::parse_terminated)?;
        types.extend(parsed);
    }
    Ok(types)
}

/// 实现 `#[derive(Component)]`
pub fn derive_component_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(&input.generics, "组件类型不能带泛型参数"));
    }
    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        _ => return Err(Error::new_spanned(struct_name, "#[derive(Component)] 只支持结构体")),
    };

    let markers = parse_markers(&input.attrs)?;
    let options = parse_options(&input.attrs)?;
    let implements = parse_implements(&input.attrs)?;

    let type_name = match &options.name {
        Some(name) => quote! { #name },
        None => quote! { ::std::concat!(::std::module_path!(), "::", ::std::stringify!(#struct_name)) },
    };

    let marker_calls = markers.iter().map(|marker| {
        let kind = syn::Ident::new(marker.kind, proc_macro2::Span::call_site());
        match &marker.alias {
            Some(alias) => quote! {
                .marker_with_alias(::ioc_common::MarkerKind::#kind, #alias)
            },
            None => quote! { .marker(::ioc_common::MarkerKind::#kind) },
        }
    });

    let field_calls = field_descriptors(struct_name, fields)?;

    let implements_calls = implements.iter().map(|target| {
        quote! {
            .implements(
                ::ioc_common::TypeKey::of::<#target>(),
                ::ioc_common::upcast!(#struct_name => #target),
            )
        }
    });

    let constructor_call = if options.no_default {
        quote! {}
    } else {
        quote! { .constructor(::ioc_common::new_default::<#struct_name>) }
    };

    let factory_call = if markers.iter().any(|marker| marker.kind == "Configuration") {
        quote! {
            .factory_methods(<#struct_name as ::ioc_common::FactoryMethods>::factory_methods())
        }
    } else {
        quote! {}
    };

    let shape_call = match options.shape.as_deref() {
        Some("abstract") => quote! { .shape(::ioc_common::TypeShape::Abstract) },
        _ => quote! {},
    };

    let registration = if options.no_register {
        quote! {}
    } else {
        let registration_fn = registration_fn_name(struct_name);
        quote! {
            #[::ioc_common::__private::ctor::ctor]
            fn #registration_fn() {
                ::ioc_common::TypeCatalog::global().register_type::<#struct_name>();
            }
        }
    };

    Ok(quote! {
        impl ::ioc_common::Component for #struct_name {
            fn descriptor() -> ::ioc_common::TypeDescriptor {
                ::ioc_common::TypeDescriptor::concrete::<#struct_name>(#type_name)
                    #(#marker_calls)*
                    #(#field_calls)*
                    #(#implements_calls)*
                    #constructor_call
                    #factory_call
                    #shape_call
                    .build()
            }
        }

        #registration
    })
}

/// 为 `#[autowired]` 字段生成字段描述
///
/// `Autowired<T>` 字段可注入；其他类型（例如 `Arc<T>`）视为不可重新赋值的字段。
fn field_descriptors(struct_name: &syn::Ident, fields: &Fields) -> Result<Vec<TokenStream>> {
    let mut calls = Vec::new();
    for field in fields {
        if !field.attrs.iter().any(|attr| attr.path().is_ident("autowired")) {
            continue;
        }
        let Some(ident) = &field.ident else {
            return Err(Error::new_spanned(field, "#[autowired] 只能用于具名字段"));
        };
        let name = ident.to_string();
        let call = if let Some(target) = unwrap_type(&field.ty, "Autowired") {
            quote! {
                .field(::ioc_common::FieldDescriptor::slot(
                    #name,
                    ::ioc_common::TypeKey::of::<#target>(),
                    ::ioc_common::slot!(#struct_name, #ident),
                ))
            }
        } else {
            let target = unwrap_type(&field.ty, "Arc").unwrap_or(&field.ty);
            quote! {
                .field(::ioc_common::FieldDescriptor::fixed(
                    #name,
                    ::ioc_common::TypeKey::of::<#target>(),
                ))
            }
        };
        calls.push(call);
    }
    Ok(calls)
}
