//! # Component Macros
//!
//! 这个 crate 提供了生成类型描述符和工厂方法的过程宏。
//!
//! ## 核心宏
//!
//! - [`Component`] - 为结构体生成 `ioc_common::Component` 实现，并在程序启动时登记到全局类型目录
//! - [`beans`] - 把 impl 块中的 `#[bean]` 方法生成为工厂方法
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use component_macros::{beans, Component};
//! use ioc_common::Autowired;
//! use std::sync::Arc;
//!
//! #[derive(Default, Component)]
//! #[resource]
//! pub struct TestDao;
//!
//! #[derive(Default, Component)]
//! #[service]
//! pub struct TestService {
//!     #[autowired]
//!     dao: Autowired<TestDao>,
//! }
//!
//! #[derive(Default, Component)]
//! #[configuration]
//! pub struct AppConfig;
//!
//! #[beans]
//! impl AppConfig {
//!     #[bean("widget")]
//!     fn widget(&self, dao: Arc<TestDao>) -> Widget {
//!         Widget::new(dao)
//!     }
//! }
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput, ItemImpl};

mod beans;
mod component;
mod utils;

/// 组件派生宏
///
/// # 结构体属性
///
/// - `#[component]` / `#[service]` / `#[controller]` / `#[resource]` / `#[configuration]` -
///   组件标记，可带别名，例如 `#[controller("c1")]`
/// - `#[implements(dyn Trait + Send + Sync, ...)]` - 可以按这些接口类型查找
/// - `#[ioc(name = "..", no_default, shape = "abstract", no_register)]`
///
/// # 字段属性
///
/// - `#[autowired]` - `Autowired<T>` 字段由容器注入；`Arc<T>` 字段只记录，不注入
///
/// 没有 `no_default` 时类型需要实现 `Default`；带 `#[configuration]` 时类型需要实现
/// `FactoryMethods`（通常由 [`beans`] 生成）。
#[proc_macro_derive(
    Component,
    attributes(component, service, controller, resource, configuration, implements, ioc, autowired)
)]
pub fn derive_component(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    component::derive_component_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// 工厂方法宏
///
/// # 示例
///
/// ```rust,ignore
/// #[beans]
/// impl AppConfig {
///     #[bean]
///     fn widget(&self, dao: Arc<TestDao>) -> Widget {
///         Widget::new(dao)
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn beans(args: TokenStream, input: TokenStream) -> TokenStream {
    if !args.is_empty() {
        return syn::Error::new(proc_macro2::Span::call_site(), "#[beans] 不接受参数")
            .to_compile_error()
            .into();
    }
    let item = parse_macro_input!(input as ItemImpl);
    beans::beans_impl(item)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
