//! 组件基础接口定义
//!
//! 提供 Bean 实例的类型擦除表示、可注入字段的写一次槽位以及组件 trait。

use crate::errors::BoxError;
use crate::metadata::{FactoryMethod, TypeDescriptor, TypeKey};
use once_cell::sync::OnceCell;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 容器持有的实例
pub type BeanRef = Arc<dyn Any + Send + Sync>;

/// 以某个类型查看实例的结果，内部装的是 `Arc<T>`，因此 `T` 可以是 `dyn Trait`
pub type BeanView = Arc<dyn Any + Send + Sync>;

/// 组件基础 trait
///
/// 所有可以被容器管理的类型都通过此 trait 提供自己的类型描述符，
/// 一般由 `#[derive(Component)]` 生成。
pub trait Component: Any + Send + Sync {
    /// 类型描述符
    fn descriptor() -> TypeDescriptor
    where
        Self: Sized;
}

/// 配置类的工厂方法列表，一般由 `#[beans]` 生成
pub trait FactoryMethods {
    fn factory_methods() -> Vec<FactoryMethod> {
        Vec::new()
    }
}

/// 以具体类型查看实例
pub fn view_of<C: Any + Send + Sync>(bean: &BeanRef) -> Option<BeanView> {
    let concrete: Arc<C> = Arc::clone(bean).downcast::<C>().ok()?;
    Some(Arc::new(concrete))
}

/// 从视图中取出类型化的实例
pub fn unview<T: ?Sized + 'static>(view: &BeanView) -> Option<Arc<T>> {
    view.downcast_ref::<Arc<T>>().cloned()
}

/// 通过 `Default` 构造实例
pub fn new_default<C: Default + Any + Send + Sync>() -> Result<BeanRef, BoxError> {
    Ok(Arc::new(C::default()))
}

/// 两个引用是否指向同一个实例
pub fn same_instance(a: &BeanRef, b: &BeanRef) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

/// 生成向上转换函数
///
/// ```rust,ignore
/// let upcast = ioc_common::upcast!(EnglishGreeter => dyn Greeter + Send + Sync);
/// ```
#[macro_export]
macro_rules! upcast {
    ($concrete:ty => $target:ty) => {{
        fn __upcast(bean: &$crate::BeanRef) -> ::std::option::Option<$crate::BeanView> {
            let concrete: ::std::sync::Arc<$concrete> =
                ::std::sync::Arc::clone(bean).downcast::<$concrete>().ok()?;
            let target: ::std::sync::Arc<$target> = concrete;
            ::std::option::Option::Some(::std::sync::Arc::new(target))
        }
        __upcast as $crate::UpcastFn
    }};
}

/// 生成字段注入点访问器
///
/// ```rust,ignore
/// let accessor = ioc_common::slot!(TestService, dao);
/// ```
#[macro_export]
macro_rules! slot {
    ($owner:ty, $field:ident) => {{
        fn __slot(bean: &$crate::BeanRef) -> ::std::option::Option<&dyn $crate::InjectionPoint> {
            bean.downcast_ref::<$owner>()
                .map(|owner| &owner.$field as &dyn $crate::InjectionPoint)
        }
        __slot as $crate::SlotAccessor
    }};
}

/// 注入点
///
/// 注入器只通过此 trait 访问字段，字段一旦有值就不会被覆盖。
pub trait InjectionPoint: Send + Sync {
    /// 字段是否已经有值
    fn is_filled(&self) -> bool;

    /// 用视图中的实例填充字段，类型不符或已有值时返回 `false`
    fn fill(&self, view: &BeanView) -> bool;
}

/// 可自动装配的字段
///
/// 写一次的槽位：容器在注册后填充，也可以在注册前手动装配。
pub struct Autowired<T: ?Sized> {
    cell: OnceCell<Arc<T>>,
}

impl<T: ?Sized> Autowired<T> {
    /// 创建空的字段
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// 创建已装配的字段
    pub fn with(bean: Arc<T>) -> Self {
        Self {
            cell: OnceCell::with_value(bean),
        }
    }

    /// 获取已装配的实例
    pub fn get(&self) -> Option<&Arc<T>> {
        self.cell.get()
    }

    pub fn is_wired(&self) -> bool {
        self.cell.get().is_some()
    }

    /// 手动装配，已有值时返回 `false`
    pub fn wire(&self, bean: Arc<T>) -> bool {
        self.cell.set(bean).is_ok()
    }
}

impl<T: ?Sized> Default for Autowired<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Autowired<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_wired() { "wired" } else { "empty" };
        write!(f, "Autowired<{}>({})", std::any::type_name::<T>(), state)
    }
}

impl<T: ?Sized + Send + Sync + 'static> InjectionPoint for Autowired<T> {
    fn is_filled(&self) -> bool {
        self.is_wired()
    }

    fn fill(&self, view: &BeanView) -> bool {
        match unview::<T>(view) {
            Some(bean) => self.wire(bean),
            None => false,
        }
    }
}

/// 工厂方法参数
pub struct FactoryArgs<'a> {
    method: &'a str,
    parameters: &'a [TypeKey],
    views: &'a [BeanView],
}

impl<'a> FactoryArgs<'a> {
    pub fn new(method: &'a str, parameters: &'a [TypeKey], views: &'a [BeanView]) -> Self {
        Self {
            method,
            parameters,
            views,
        }
    }

    /// 取出第 `index` 个参数
    pub fn arg<T: ?Sized + 'static>(&self, index: usize) -> Result<Arc<T>, BoxError> {
        let view = self.views.get(index).ok_or_else(|| {
            BoxError::from(format!("方法 {} 缺少第 {} 个参数", self.method, index))
        })?;
        unview::<T>(view).ok_or_else(|| {
            let declared = self
                .parameters
                .get(index)
                .map_or("<unknown>", |key| key.name());
            BoxError::from(format!(
                "方法 {} 的第 {} 个参数类型不符: 声明为 {}, 请求为 {}",
                self.method,
                index,
                declared,
                std::any::type_name::<T>()
            ))
        })
    }

    /// 将配置类实例转换为具体类型
    pub fn holder<'b, C: Any>(&self, bean: &'b BeanRef) -> Result<&'b C, BoxError> {
        bean.downcast_ref::<C>().ok_or_else(|| {
            BoxError::from(format!(
                "方法 {} 的接收者不是 {}",
                self.method,
                std::any::type_name::<C>()
            ))
        })
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

/// 容器中的一条 Bean 记录
#[derive(Clone)]
pub struct BeanEntry {
    /// 注册键
    pub key: String,
    /// 实例运行期类型的描述符
    pub descriptor: Arc<TypeDescriptor>,
    pub instance: BeanRef,
}

impl BeanEntry {
    pub fn new(key: impl Into<String>, descriptor: Arc<TypeDescriptor>, instance: BeanRef) -> Self {
        Self {
            key: key.into(),
            descriptor,
            instance,
        }
    }

    /// 以指定类型查看实例
    pub fn view(&self, key: &TypeKey) -> Option<BeanView> {
        self.descriptor.view(&self.instance, key)
    }

    /// 类型化的实例
    pub fn typed<T: ?Sized + 'static>(&self) -> Option<Arc<T>> {
        self.view(&TypeKey::of::<T>())
            .and_then(|view| unview::<T>(&view))
    }

    pub fn type_name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn is_instance(&self, other: &BeanRef) -> bool {
        same_instance(&self.instance, other)
    }
}

impl fmt::Debug for BeanEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanEntry")
            .field("key", &self.key)
            .field("type", &self.descriptor.name)
            .finish()
    }
}
