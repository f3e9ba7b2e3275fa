//! 元数据定义
//!
//! 提供类型描述符：以显式元数据代替运行期反射，描述一个类型的形态、
//! 组件标记、可注入字段、可向上转换的接口以及工厂方法。

use crate::component::{BeanRef, BeanView, Component, FactoryArgs, InjectionPoint};
use crate::errors::BoxError;
use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// 将实例转换为指定类型视图的函数
pub type UpcastFn = fn(&BeanRef) -> Option<BeanView>;

/// 从实例中取出注入点的函数
pub type SlotAccessor = fn(&BeanRef) -> Option<&dyn InjectionPoint>;

/// 无参构造函数
pub type ConstructorFn = fn() -> Result<BeanRef, BoxError>;

/// 类型描述符工厂
pub type DescriptorFn = fn() -> TypeDescriptor;

/// 工厂方法调用函数
pub type FactoryFn = fn(&BeanRef, &FactoryArgs<'_>) -> Result<BeanRef, BoxError>;

/// 类型键
///
/// 以 `TypeId` 判等，同时保留类型名称和是否为定长类型，
/// 后者用于在目录中查不到描述符时判断类型能否实例化（`dyn Trait` 等不定长类型不能）。
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
    sized: bool,
}

impl TypeKey {
    /// 从类型获取类型键
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            // 不定长类型的引用是胖指针
            sized: std::mem::size_of::<&T>() == std::mem::size_of::<usize>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_sized(&self) -> bool {
        self.sized
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// 类型形态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeShape {
    /// 具体类型，可以直接实例化
    Concrete,
    /// 接口（trait object）
    Interface,
    /// 抽象类型
    Abstract,
    /// 基本类型
    Primitive,
    /// 数组类型
    Array,
}

impl TypeShape {
    /// 该形态是否可以直接实例化
    pub fn is_instantiable(self) -> bool {
        matches!(self, Self::Concrete)
    }
}

/// 组件标记类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    Component,
    Service,
    Controller,
    Resource,
    Configuration,
}

impl MarkerKind {
    /// 所有可识别的组件标记
    pub const ALL: [MarkerKind; 5] = [
        Self::Component,
        Self::Service,
        Self::Controller,
        Self::Resource,
        Self::Configuration,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Component => "component",
            Self::Service => "service",
            Self::Controller => "controller",
            Self::Resource => "resource",
            Self::Configuration => "configuration",
        }
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#[{}]", self.name())
    }
}

/// 组件标记
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentMarker {
    /// 标记类型
    pub kind: MarkerKind,
    /// 显式别名，空白表示未指定
    pub alias: String,
}

impl ComponentMarker {
    /// 创建不带别名的标记
    pub fn new(kind: MarkerKind) -> Self {
        Self {
            kind,
            alias: String::new(),
        }
    }

    /// 设置别名
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    /// 非空白的别名
    pub fn explicit_alias(&self) -> Option<&str> {
        let alias = self.alias.trim();
        if alias.is_empty() {
            None
        } else {
            Some(alias)
        }
    }
}

/// 字段修饰符
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldModifiers {
    pub is_static: bool,
    pub is_final: bool,
}

/// 可注入字段描述
#[derive(Clone)]
pub struct FieldDescriptor {
    /// 字段名称
    pub name: &'static str,
    /// 字段声明的类型
    pub target: TypeKey,
    pub modifiers: FieldModifiers,
    /// 注入点访问器，不可重新赋值的字段没有访问器
    pub slot: Option<SlotAccessor>,
}

impl FieldDescriptor {
    /// 可注入的实例字段
    pub fn slot(name: &'static str, target: TypeKey, accessor: SlotAccessor) -> Self {
        Self {
            name,
            target,
            modifiers: FieldModifiers::default(),
            slot: Some(accessor),
        }
    }

    /// 构造后不可重新赋值的字段
    pub fn fixed(name: &'static str, target: TypeKey) -> Self {
        Self {
            name,
            target,
            modifiers: FieldModifiers {
                is_static: false,
                is_final: true,
            },
            slot: None,
        }
    }

    /// 静态字段
    pub fn static_field(name: &'static str, target: TypeKey) -> Self {
        Self {
            name,
            target,
            modifiers: FieldModifiers {
                is_static: true,
                is_final: false,
            },
            slot: None,
        }
    }

    /// 注入器是否会处理该字段
    pub fn is_injectable(&self) -> bool {
        !self.modifiers.is_static && !self.modifiers.is_final && self.slot.is_some()
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("target", &self.target)
            .field("modifiers", &self.modifiers)
            .field("slot", &self.slot.map(|_| "<function>"))
            .finish()
    }
}

/// 可向上转换的目标类型（实现的接口或父类型）
#[derive(Clone)]
pub struct Supertype {
    pub key: TypeKey,
    pub upcast: UpcastFn,
}

impl fmt::Debug for Supertype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Supertype")
            .field("key", &self.key)
            .field("upcast", &"<function>")
            .finish()
    }
}

/// 产生 Bean 的工厂方法
#[derive(Clone)]
pub struct FactoryMethod {
    /// 方法名称
    pub name: &'static str,
    /// 注册别名
    pub alias: Option<String>,
    /// 是否为静态方法（没有 `self` 接收者）
    pub is_static: bool,
    /// 声明的返回类型
    pub returns: TypeKey,
    /// 产物的运行期类型描述符
    pub produces: DescriptorFn,
    /// 参数类型
    pub parameters: Vec<TypeKey>,
    pub invoke: FactoryFn,
}

impl FactoryMethod {
    /// 创建返回 `R` 的工厂方法
    pub fn new<R: Component>(name: &'static str, invoke: FactoryFn) -> Self {
        Self {
            name,
            alias: None,
            is_static: false,
            returns: TypeKey::of::<R>(),
            produces: R::descriptor,
            parameters: Vec::new(),
            invoke,
        }
    }

    /// 设置注册别名
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// 追加一个参数类型
    pub fn parameter<T: ?Sized + 'static>(mut self) -> Self {
        self.parameters.push(TypeKey::of::<T>());
        self
    }

    /// 标记为静态方法
    pub fn static_method(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// 非空白的别名
    pub fn explicit_alias(&self) -> Option<&str> {
        self.alias
            .as_deref()
            .map(str::trim)
            .filter(|alias| !alias.is_empty())
    }
}

impl fmt::Debug for FactoryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryMethod")
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("is_static", &self.is_static)
            .field("returns", &self.returns)
            .field("parameters", &self.parameters)
            .field("invoke", &"<function>")
            .finish()
    }
}

/// 类型描述符
#[derive(Clone)]
pub struct TypeDescriptor {
    /// 完整类型名称，例如 `demo::service::TestService`
    pub name: String,
    pub key: TypeKey,
    pub shape: TypeShape,
    pub markers: Vec<ComponentMarker>,
    pub fields: Vec<FieldDescriptor>,
    pub supertypes: Vec<Supertype>,
    pub factory_methods: Vec<FactoryMethod>,
    pub constructor: Option<ConstructorFn>,
    self_view: Option<UpcastFn>,
}

impl TypeDescriptor {
    /// 具体类型
    pub fn concrete<C: Any + Send + Sync>(name: impl Into<String>) -> TypeDescriptorBuilder {
        TypeDescriptorBuilder::new(
            name.into(),
            TypeKey::of::<C>(),
            TypeShape::Concrete,
            Some(crate::component::view_of::<C>),
        )
    }

    /// 接口类型，通常是 `dyn Trait + Send + Sync`
    pub fn interface<T: ?Sized + 'static>(name: impl Into<String>) -> TypeDescriptorBuilder {
        TypeDescriptorBuilder::new(name.into(), TypeKey::of::<T>(), TypeShape::Interface, None)
    }

    /// 抽象类型
    pub fn abstract_type<T: ?Sized + 'static>(name: impl Into<String>) -> TypeDescriptorBuilder {
        TypeDescriptorBuilder::new(name.into(), TypeKey::of::<T>(), TypeShape::Abstract, None)
    }

    /// 基本类型
    pub fn primitive<T: ?Sized + 'static>(name: impl Into<String>) -> TypeDescriptorBuilder {
        TypeDescriptorBuilder::new(name.into(), TypeKey::of::<T>(), TypeShape::Primitive, None)
    }

    /// 数组类型
    pub fn array<T: ?Sized + 'static>(name: impl Into<String>) -> TypeDescriptorBuilder {
        TypeDescriptorBuilder::new(name.into(), TypeKey::of::<T>(), TypeShape::Array, None)
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn simple_name(&self) -> &str {
        let tail = self.name.rsplit("::").next().unwrap_or(&self.name);
        tail.rsplit('.').next().unwrap_or(tail)
    }

    /// 是否带有指定组件标记
    pub fn has_marker(&self, kind: MarkerKind) -> bool {
        self.markers.iter().any(|marker| marker.kind == kind)
    }

    /// 形态是否允许直接实例化
    pub fn can_instantiate(&self) -> bool {
        self.shape.is_instantiable()
    }

    /// 是否可以赋值给指定类型（即自身或实现了该类型）
    pub fn is_assignable_to(&self, key: &TypeKey) -> bool {
        self.key == *key || self.supertypes.iter().any(|s| s.key == *key)
    }

    /// 实例的运行期类型是否为本类型
    pub fn matches_instance(&self, bean: &BeanRef) -> bool {
        Any::type_id(&**bean) == self.key.id()
    }

    /// 以指定类型查看实例
    pub fn view(&self, bean: &BeanRef, key: &TypeKey) -> Option<BeanView> {
        if self.key == *key {
            return self.self_view.and_then(|view| view(bean));
        }
        self.supertypes
            .iter()
            .find(|s| s.key == *key)
            .and_then(|s| (s.upcast)(bean))
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("shape", &self.shape)
            .field("markers", &self.markers)
            .field("fields", &self.fields)
            .field("supertypes", &self.supertypes)
            .field("factory_methods", &self.factory_methods)
            .field("constructor", &self.constructor.map(|_| "<function>"))
            .finish()
    }
}

/// 类型描述符构建器
#[derive(Debug, Clone)]
pub struct TypeDescriptorBuilder {
    descriptor: TypeDescriptor,
}

impl TypeDescriptorBuilder {
    fn new(name: String, key: TypeKey, shape: TypeShape, self_view: Option<UpcastFn>) -> Self {
        Self {
            descriptor: TypeDescriptor {
                name,
                key,
                shape,
                markers: Vec::new(),
                fields: Vec::new(),
                supertypes: Vec::new(),
                factory_methods: Vec::new(),
                constructor: None,
                self_view,
            },
        }
    }

    /// 添加组件标记
    pub fn marker(mut self, kind: MarkerKind) -> Self {
        self.descriptor.markers.push(ComponentMarker::new(kind));
        self
    }

    /// 添加带别名的组件标记
    pub fn marker_with_alias(mut self, kind: MarkerKind, alias: impl Into<String>) -> Self {
        self.descriptor
            .markers
            .push(ComponentMarker::new(kind).with_alias(alias));
        self
    }

    /// 添加字段
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.descriptor.fields.push(field);
        self
    }

    /// 声明实现的接口或父类型
    pub fn implements(mut self, key: TypeKey, upcast: UpcastFn) -> Self {
        self.descriptor.supertypes.push(Supertype { key, upcast });
        self
    }

    /// 添加工厂方法
    pub fn factory_method(mut self, method: FactoryMethod) -> Self {
        self.descriptor.factory_methods.push(method);
        self
    }

    /// 批量添加工厂方法
    pub fn factory_methods(mut self, methods: Vec<FactoryMethod>) -> Self {
        self.descriptor.factory_methods.extend(methods);
        self
    }

    /// 设置无参构造函数
    pub fn constructor(mut self, constructor: ConstructorFn) -> Self {
        self.descriptor.constructor = Some(constructor);
        self
    }

    /// 覆盖类型形态
    pub fn shape(mut self, shape: TypeShape) -> Self {
        self.descriptor.shape = shape;
        self
    }

    pub fn build(self) -> TypeDescriptor {
        self.descriptor
    }
}
