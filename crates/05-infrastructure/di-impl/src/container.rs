//! Bean 容器
//!
//! 组合标识符解析、实例化守卫、注册表和注入器，提供批量实例化、
//! 手动注册和配置类加载。

use crate::guard;
use crate::identifier::classify;
use crate::injector::{DependencyInjector, InjectionReport};
use crate::registry::DefaultBeanRegistry;
use di_abstractions::{BeanRegistry, BeanResolver};
use ioc_common::{
    BeanEntry, BeanError, BeanRef, BeanResult, BeanView, Component, FactoryArgs, FactoryMethod,
    MarkerKind, TypeCatalog, TypeDescriptor, TypeKey,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Bean 容器
pub struct BeanContainer {
    registry: Arc<dyn BeanRegistry>,
    injector: DependencyInjector,
    catalog: Arc<TypeCatalog>,
}

impl BeanContainer {
    /// 使用默认注册表创建容器
    pub fn new(catalog: Arc<TypeCatalog>) -> Self {
        Self::with_registry(Arc::new(DefaultBeanRegistry::new()), catalog)
    }

    /// 使用指定注册表创建容器
    pub fn with_registry(registry: Arc<dyn BeanRegistry>, catalog: Arc<TypeCatalog>) -> Self {
        Self {
            registry,
            injector: DependencyInjector::new(),
            catalog,
        }
    }

    pub fn registry(&self) -> &Arc<dyn BeanRegistry> {
        &self.registry
    }

    pub fn catalog(&self) -> &Arc<TypeCatalog> {
        &self.catalog
    }

    /// 查找类型描述符，先查已知类型再查类型目录
    pub fn descriptor(&self, key: &TypeKey) -> Option<Arc<TypeDescriptor>> {
        self.registry
            .known_type(key)
            .or_else(|| self.catalog.by_key(key))
    }

    /// 声明类型的描述符
    ///
    /// 接口类型通常只出现在实现类型的 `implements` 声明里。目录中查不到的
    /// `dyn Trait` 按接口类型补一个描述符，并记为已知类型。
    pub fn declared_descriptor<T: ?Sized + 'static>(&self) -> Option<Arc<TypeDescriptor>> {
        let key = TypeKey::of::<T>();
        if let Some(descriptor) = self.descriptor(&key) {
            return Some(descriptor);
        }
        if key.is_sized() {
            return None;
        }
        let descriptor = Arc::new(TypeDescriptor::interface::<T>(interface_name(key.name())).build());
        if self.registry.add_known_type(Arc::clone(&descriptor)) {
            debug!("补充接口类型: {}", descriptor.name);
        }
        self.registry.known_type(&key).or(Some(descriptor))
    }

    /// 组件类型的描述符
    pub fn descriptor_of<C: Component>(&self) -> Arc<TypeDescriptor> {
        self.descriptor(&TypeKey::of::<C>())
            .unwrap_or_else(|| Arc::new(C::descriptor()))
    }

    /// 批量实例化并注入依赖
    pub fn do_instance<I, S>(&self, identifiers: I) -> BeanResult<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let created = self.instantiate(identifiers)?;
        self.inject_all();
        Ok(created)
    }

    /// 批量实例化，不做注入
    ///
    /// 所有标识符先解析为类型，任何一个无法解析都会中止调用。
    /// 随后实例化带组件标记且可实例化的类型；注册键已存在的类型直接跳过。
    pub fn instantiate<I, S>(&self, identifiers: I) -> BeanResult<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let descriptors = identifiers
            .into_iter()
            .map(|identifier| self.catalog.resolve(identifier.as_ref()))
            .collect::<BeanResult<Vec<_>>>()?;
        info!("开始实例化，共 {} 个类型", descriptors.len());

        let mut created = 0;
        for descriptor in descriptors {
            self.registry.add_known_type(Arc::clone(&descriptor));
            let classification = classify(&descriptor)?;
            if !classification.is_managed {
                continue;
            }
            if !guard::can_instantiate(&descriptor) {
                debug!("跳过不可实例化的类型: {}", descriptor.name);
                continue;
            }
            if self.registry.contains_key(&classification.key) {
                debug!(
                    "注册键已存在，跳过: {} ({})",
                    classification.key, descriptor.name
                );
                continue;
            }
            let instance = guard::new_default(&descriptor)?;
            match self
                .registry
                .register(&classification.key, descriptor, instance)
            {
                Ok(_) => created += 1,
                Err(BeanError::DuplicateBean { key, .. }) => {
                    debug!("注册键已存在，跳过: {}", key);
                }
                Err(e) => return Err(e),
            }
        }

        info!("实例化完毕，新增 {} 个 Bean", created);
        Ok(created)
    }

    /// 为所有已注册实例注入依赖
    pub fn inject_all(&self) -> InjectionReport {
        self.injector.inject_all(self.registry.as_ref())
    }

    /// 按类型查找
    pub fn lookup(&self, key: &TypeKey) -> Option<BeanEntry> {
        self.registry.lookup_by_type(key)
    }

    /// 按注册键查找
    pub fn lookup_named(&self, name: &str) -> Option<BeanEntry> {
        self.registry.lookup_by_key(name)
    }

    /// 按类型注册
    ///
    /// 声明的类型不可实例化时，使用第一个可以赋值给它的已知可实例化类型。
    /// `force_new` 为 `true` 时替换该注册键下已有的实例。
    pub fn set_bean_type(
        &self,
        declared: Arc<TypeDescriptor>,
        force_new: bool,
    ) -> BeanResult<BeanEntry> {
        self.registry.add_known_type(Arc::clone(&declared));
        let key = classify(&declared)?.key;
        if !force_new && self.registry.contains_key(&key) {
            return Err(BeanError::duplicate(&key, &declared.name));
        }

        let concrete = self.instantiable_for(&declared)?;
        let instance = guard::new_default(&concrete)?;
        let entry = if force_new {
            self.registry.replace(&key, concrete, instance).0
        } else {
            self.registry.register(&key, concrete, instance)?
        };
        self.inject_all();
        Ok(entry)
    }

    /// 注册已有实例
    ///
    /// 注册键由声明的类型决定，`runtime` 是实例运行期类型的描述符。
    pub fn set_bean_instance(
        &self,
        declared: Arc<TypeDescriptor>,
        runtime: Arc<TypeDescriptor>,
        instance: BeanRef,
    ) -> BeanResult<BeanEntry> {
        if !runtime.matches_instance(&instance) {
            return Err(BeanError::conflict(
                &runtime.name,
                "实例的运行期类型与描述符不一致",
            ));
        }
        if !runtime.is_assignable_to(&declared.key) {
            return Err(BeanError::conflict(
                &runtime.name,
                format!("不能作为 {} 注册", declared.name),
            ));
        }
        self.registry.add_known_type(Arc::clone(&declared));
        let key = classify(&declared)?.key;
        let entry = self.registry.register(&key, runtime, instance)?;
        self.inject_all();
        Ok(entry)
    }

    /// 创建不注册的新实例，依赖从容器中注入
    pub fn create_detached(&self, declared: Arc<TypeDescriptor>) -> BeanResult<BeanEntry> {
        let key = classify(&declared)?.key;
        let concrete = self.instantiable_for(&declared)?;
        let instance = guard::new_default(&concrete)?;
        self.injector
            .inject_instance(self.registry.as_ref(), &concrete, &instance);
        debug!("创建独立实例: {}", concrete.name);
        Ok(BeanEntry::new(key, concrete, instance))
    }

    /// 为带有指定标记的已知类型创建实例
    ///
    /// 注册键已存在时返回已有实例；不可实例化的类型被跳过。
    pub fn create_beans_with_marker(&self, kind: MarkerKind) -> BeanResult<Vec<BeanEntry>> {
        let mut entries = Vec::new();
        for descriptor in self.types_with_marker(kind) {
            if !guard::can_instantiate(&descriptor) {
                continue;
            }
            let key = classify(&descriptor)?.key;
            match self.registry.lookup_by_key(&key) {
                Some(existing) => entries.push(existing),
                None => entries.push(self.set_bean_type(descriptor, false)?),
            }
        }
        Ok(entries)
    }

    /// 加载配置类
    ///
    /// 依次执行每个配置类的工厂方法并注册其产物，完成后从容器中移除配置类实例。
    pub fn load_configuration(&self) -> BeanResult<usize> {
        info!("开始加载配置类");
        let mut produced = 0;
        for holder in self.registry.all_of_marker(MarkerKind::Configuration) {
            debug!("配置类: {} ({})", holder.key, holder.type_name());
            for method in &holder.descriptor.factory_methods {
                self.invoke_factory(&holder, method)?;
                produced += 1;
            }
            self.registry.remove(&holder.instance);
        }
        info!("配置类加载完毕，新增 {} 个 Bean", produced);
        Ok(produced)
    }

    /// 移除实例的所有注册键
    pub fn remove_bean(&self, instance: &BeanRef) -> Vec<String> {
        self.registry.remove(instance)
    }

    /// 运行期类型带有指定标记的实例
    pub fn beans_with_marker(&self, kind: MarkerKind) -> Vec<BeanEntry> {
        self.registry.all_of_marker(kind)
    }

    /// 带有指定标记的已知类型
    pub fn types_with_marker(&self, kind: MarkerKind) -> Vec<Arc<TypeDescriptor>> {
        self.registry
            .known_types()
            .into_iter()
            .filter(|descriptor| descriptor.has_marker(kind))
            .collect()
    }

    pub fn entries(&self) -> Vec<BeanEntry> {
        self.registry.entries()
    }

    pub fn known_types(&self) -> Vec<Arc<TypeDescriptor>> {
        self.registry.known_types()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// 声明类型本身或第一个可以赋值给它的已知可实例化类型
    fn instantiable_for(&self, declared: &Arc<TypeDescriptor>) -> BeanResult<Arc<TypeDescriptor>> {
        if guard::can_instantiate(declared) {
            return Ok(Arc::clone(declared));
        }
        self.registry
            .known_types()
            .into_iter()
            .find(|candidate| {
                guard::can_instantiate(candidate) && candidate.is_assignable_to(&declared.key)
            })
            .ok_or_else(|| {
                BeanError::instantiation(&declared.name, "没有可以实例化的实现类型")
            })
    }

    fn invoke_factory(&self, holder: &BeanEntry, method: &FactoryMethod) -> BeanResult<BeanEntry> {
        if method.is_static {
            return Err(BeanError::conflict(
                holder.type_name(),
                format!("工厂方法 {} 不能是静态方法", method.name),
            ));
        }
        if self.registry.lookup_by_type(&method.returns).is_some() {
            return Err(BeanError::duplicate(method.returns.name(), method.returns.name()));
        }

        let views = method
            .parameters
            .iter()
            .map(|parameter| {
                self.registry
                    .lookup_by_type(parameter)
                    .and_then(|entry| entry.view(parameter))
                    .ok_or_else(|| BeanError::UnresolvedDependency {
                        method: format!("{}::{}", holder.type_name(), method.name),
                        parameter: parameter.name().to_string(),
                    })
            })
            .collect::<BeanResult<Vec<BeanView>>>()?;

        let produced = self
            .descriptor(&method.returns)
            .unwrap_or_else(|| Arc::new((method.produces)()));
        let args = FactoryArgs::new(method.name, &method.parameters, &views);
        let instance = (method.invoke)(&holder.instance, &args)
            .map_err(|e| BeanError::instantiation(&produced.name, e.to_string()))?;
        if !produced.matches_instance(&instance) {
            return Err(BeanError::instantiation(
                &produced.name,
                format!("工厂方法 {} 返回了其他类型的实例", method.name),
            ));
        }

        let key = match method.explicit_alias() {
            Some(alias) => alias.to_string(),
            None => classify(&produced)?.key,
        };
        let entry = self.registry.register(&key, produced, instance)?;
        debug!("工厂方法 {} 产生 Bean: {}", method.name, entry.key);
        self.inject_all();
        Ok(entry)
    }
}

/// `dyn a::Trait + Send + Sync` 形式的类型名去掉修饰，只保留 trait 路径
fn interface_name(type_name: &str) -> &str {
    let name = type_name.strip_prefix("dyn ").unwrap_or(type_name);
    name.split(" + ").next().unwrap_or(name).trim()
}

impl BeanResolver for BeanContainer {
    fn resolve_by_type(&self, key: &TypeKey) -> Option<BeanEntry> {
        self.lookup(key)
    }

    fn resolve_by_name(&self, name: &str) -> Option<BeanEntry> {
        self.lookup_named(name)
    }
}

impl std::fmt::Debug for BeanContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeanContainer")
            .field("beans", &self.registry.len())
            .field("known_types", &self.registry.known_types().len())
            .field("catalog", &self.catalog.len())
            .finish()
    }
}
