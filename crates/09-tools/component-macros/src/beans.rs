//! `#[beans]` 实现
//!
//! 把 impl 块中带 `#[bean]` 的方法登记为工厂方法，生成 `FactoryMethods` 实现。
//! 参数必须是 `Arc<T>`；返回值可以是 `R`、`Arc<R>`，或者包在 `Result<_, E>` 中。
//! `R` 必须是具体类型：`Arc<dyn Trait>` 无法还原出运行期类型，应返回实现类型。

use crate::utils::unwrap_type;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    Attribute, Error, FnArg, ImplItem, ImplItemFn, ItemImpl, LitStr, Meta, Result, ReturnType,
    Type,
};

/// 工厂方法的返回值形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReturnShape {
    /// `R`
    Value,
    /// `Arc<R>`
    Shared,
}

/// 解析后的工厂方法
struct BeanMethod {
    name: syn::Ident,
    alias: Option<String>,
    is_static: bool,
    parameters: Vec<Type>,
    produced: Type,
    shape: ReturnShape,
    fallible: bool,
}

/// 实现 `#[beans]`
pub fn beans_impl(mut item: ItemImpl) -> Result<TokenStream> {
    if item.trait_.is_some() {
        return Err(Error::new_spanned(&item.self_ty, "#[beans] 只能用于固有 impl 块"));
    }
    if !item.generics.params.is_empty() {
        return Err(Error::new_spanned(&item.generics, "#[beans] 不支持泛型 impl 块"));
    }

    let mut methods = Vec::new();
    for impl_item in &mut item.items {
        let ImplItem::Fn(function) = impl_item else {
            continue;
        };
        let Some(alias) = take_bean_attribute(&mut function.attrs)? else {
            continue;
        };
        methods.push(parse_method(function, alias)?);
    }

    let self_ty = &item.self_ty;
    let entries = methods.iter().map(|method| factory_entry(self_ty, method));

    Ok(quote! {
        #item

        impl ::ioc_common::FactoryMethods for #self_ty {
            fn factory_methods() -> ::std::vec::Vec<::ioc_common::FactoryMethod> {
                ::std::vec![#(#entries),*]
            }
        }
    })
}

/// 移除 `#[bean]` 属性，返回 `Some(alias)` 表示方法带有该属性
fn take_bean_attribute(attrs: &mut Vec<Attribute>) -> Result<Option<Option<String>>> {
    let Some(index) = attrs.iter().position(|attr| attr.path().is_ident("bean")) else {
        return Ok(None);
    };
    let attr = attrs.remove(index);
    let alias = match &attr.meta {
        Meta::Path(_) => None,
        Meta::List(_) => Some(attr.parse_args::<LitStr>()?.value()),
        Meta::NameValue(nv) => {
            return Err(Error::new_spanned(nv, "别名的写法为 #[bean(\"alias\")]"));
        }
    };
    Ok(Some(alias))
}

fn parse_method(function: &ImplItemFn, alias: Option<String>) -> Result<BeanMethod> {
    let signature = &function.sig;
    if signature.asyncness.is_some() || !signature.generics.params.is_empty() {
        return Err(Error::new_spanned(signature, "工厂方法不能是异步或泛型方法"));
    }

    let mut is_static = true;
    let mut parameters = Vec::new();
    for input in &signature.inputs {
        match input {
            FnArg::Receiver(receiver) => {
                if receiver.reference.is_none() || receiver.mutability.is_some() {
                    return Err(Error::new_spanned(receiver, "工厂方法的接收者必须是 &self"));
                }
                is_static = false;
            }
            FnArg::Typed(typed) => {
                let inner = unwrap_type(&typed.ty, "Arc").ok_or_else(|| {
                    Error::new_spanned(&typed.ty, "工厂方法的参数必须是 Arc<T>")
                })?;
                parameters.push(inner.clone());
            }
        }
    }

    let ReturnType::Type(_, returned) = &signature.output else {
        return Err(Error::new_spanned(signature, "工厂方法必须有返回值"));
    };
    let (fallible, value) = match unwrap_type(returned, "Result") {
        Some(ok) => (true, ok),
        None => (false, returned.as_ref()),
    };
    let (shape, produced) = match unwrap_type(value, "Arc") {
        Some(inner) => (ReturnShape::Shared, inner.clone()),
        None => (ReturnShape::Value, value.clone()),
    };
    if matches!(produced, Type::TraitObject(_) | Type::ImplTrait(_)) {
        return Err(Error::new_spanned(
            &produced,
            "工厂方法的返回类型必须是具体类型，接口请由实现类型通过 #[implements] 声明",
        ));
    }

    Ok(BeanMethod {
        name: signature.ident.clone(),
        alias,
        is_static,
        parameters,
        produced,
        shape,
        fallible,
    })
}

fn factory_entry(self_ty: &Type, method: &BeanMethod) -> TokenStream {
    let name = &method.name;
    let name_str = name.to_string();
    let produced = &method.produced;

    let args = method.parameters.iter().enumerate().map(|(index, parameter)| {
        quote! { args.arg::<#parameter>(#index)? }
    });
    let call = if method.is_static {
        quote! { <#self_ty>::#name(#(#args),*) }
    } else {
        quote! { args.holder::<#self_ty>(holder)?.#name(#(#args),*) }
    };
    let call = if method.fallible {
        quote! { #call.map_err(::std::convert::Into::<::ioc_common::BoxError>::into)? }
    } else {
        call
    };
    let wrap = match method.shape {
        ReturnShape::Value => quote! { ::std::sync::Arc::new(result) },
        ReturnShape::Shared => quote! { result },
    };

    let parameter_calls = method
        .parameters
        .iter()
        .map(|parameter| quote! { .parameter::<#parameter>() });
    let alias_call = method.alias.as_ref().map(|alias| quote! { .alias(#alias) });
    let static_call = method.is_static.then(|| quote! { .static_method() });

    quote! {
        {
            fn __invoke(
                holder: &::ioc_common::BeanRef,
                args: &::ioc_common::FactoryArgs<'_>,
            ) -> ::std::result::Result<::ioc_common::BeanRef, ::ioc_common::BoxError> {
                let _ = holder;
                let result: ::std::sync::Arc<#produced> = {
                    let result = #call;
                    #wrap
                };
                ::std::result::Result::Ok(result)
            }
            ::ioc_common::FactoryMethod::new::<#produced>(#name_str, __invoke)
                #(#parameter_calls)*
                #alias_call
                #static_call
        }
    }
}
