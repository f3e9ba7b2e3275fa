//! 应用上下文端到端测试
//!
//! 组件描述符手工编写，不依赖过程宏

use di_abstractions::{BeanRegistry, TypedBeanResolver};
use di_impl::DefaultBeanRegistry;
use ioc_common::{
    new_default, slot, upcast, Autowired, BeanError, BeanRef, BoxError, Component, FactoryArgs,
    FactoryMethod, FieldDescriptor, MarkerKind, TypeCatalog, TypeDescriptor, TypeKey,
};
use ioc_context::{ApplicationContext, ContainerState, ContextError};
use std::fs;
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

/// 初始化测试日志系统（只初始化一次）
fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .try_init()
            .ok();
    });
}

#[derive(Debug, Default)]
struct Dao;

impl Dao {
    fn find(&self, id: u32) -> String {
        format!("row-{id}")
    }
}

impl Component for Dao {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::concrete::<Dao>("it::dao::Dao")
            .marker(MarkerKind::Resource)
            .constructor(new_default::<Dao>)
            .build()
    }
}

#[derive(Debug, Default)]
struct Service {
    dao: Autowired<Dao>,
}

impl Component for Service {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::concrete::<Service>("it::service::Service")
            .marker(MarkerKind::Service)
            .field(FieldDescriptor::slot("dao", TypeKey::of::<Dao>(), slot!(Service, dao)))
            .constructor(new_default::<Service>)
            .build()
    }
}

#[derive(Debug)]
struct Widget {
    dao: Arc<Dao>,
}

impl Component for Widget {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::concrete::<Widget>("it::config::Widget").build()
    }
}

#[derive(Debug, Default)]
struct AppConfig;

fn widget(holder: &BeanRef, args: &FactoryArgs<'_>) -> Result<BeanRef, BoxError> {
    args.holder::<AppConfig>(holder)?;
    Ok(Arc::new(Widget {
        dao: args.arg::<Dao>(0)?,
    }))
}

impl Component for AppConfig {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::concrete::<AppConfig>("it::config::AppConfig")
            .marker(MarkerKind::Configuration)
            .factory_method(FactoryMethod::new::<Widget>("widget", widget).parameter::<Dao>())
            .constructor(new_default::<AppConfig>)
            .build()
    }
}

trait Greeter: Send + Sync {
    fn greet(&self) -> &'static str;
}

#[derive(Debug, Default)]
struct EnglishGreeter;

impl Greeter for EnglishGreeter {
    fn greet(&self) -> &'static str {
        "hello"
    }
}

impl Component for EnglishGreeter {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::concrete::<EnglishGreeter>("it::greeting::EnglishGreeter")
            .marker(MarkerKind::Component)
            .implements(TypeKey::of::<dyn Greeter>(), upcast!(EnglishGreeter => dyn Greeter))
            .constructor(new_default::<EnglishGreeter>)
            .build()
    }
}

#[derive(Debug, Default)]
struct ChineseGreeter;

impl Greeter for ChineseGreeter {
    fn greet(&self) -> &'static str {
        "你好"
    }
}

impl Component for ChineseGreeter {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::concrete::<ChineseGreeter>("it::greeting::ChineseGreeter")
            .marker(MarkerKind::Component)
            .implements(TypeKey::of::<dyn Greeter>(), upcast!(ChineseGreeter => dyn Greeter))
            .constructor(new_default::<ChineseGreeter>)
            .build()
    }
}

#[derive(Debug, Default)]
struct Dual;

impl Component for Dual {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::concrete::<Dual>("it::web::Dual")
            .marker(MarkerKind::Service)
            .marker(MarkerKind::Controller)
            .constructor(new_default::<Dual>)
            .build()
    }
}

fn catalog() -> Arc<TypeCatalog> {
    let catalog = TypeCatalog::new();
    catalog.register_type::<Dao>();
    catalog.register_type::<Service>();
    catalog.register_type::<Widget>();
    catalog.register_type::<AppConfig>();
    catalog.register_type::<EnglishGreeter>();
    catalog.register_type::<ChineseGreeter>();
    catalog.register(TypeDescriptor::interface::<dyn Greeter>("it::greeting::Greeter").build());
    Arc::new(catalog)
}

fn context(load_configuration: bool) -> ApplicationContext {
    init_test_logger();
    ApplicationContext::builder()
        .scan_package("it")
        .load_configuration(load_configuration)
        .with_catalog(catalog())
        .build()
        .unwrap()
}

#[test]
fn test_service_receives_registered_dao() -> anyhow::Result<()> {
    let context = context(false);
    context.init()?;

    let service = context.get_bean::<Service>().unwrap();
    let dao = context.get_bean::<Dao>().unwrap();
    assert!(Arc::ptr_eq(service.dao.get().unwrap(), &dao));
    assert_eq!(service.dao.get().unwrap().find(1), "row-1");
    Ok(())
}

#[test]
fn test_keys_default_to_simple_names() -> anyhow::Result<()> {
    let context = context(false);
    context.init()?;

    let keys: Vec<String> = context.get_all_beans().into_iter().map(|entry| entry.key).collect();
    for expected in ["Dao", "Service", "AppConfig", "EnglishGreeter", "ChineseGreeter"] {
        assert!(keys.iter().any(|key| key == expected), "缺少 {expected}: {keys:?}");
    }
    assert!(!keys.iter().any(|key| key == "Widget" || key == "Greeter"));
    Ok(())
}

#[test]
fn test_configuration_produces_widget_and_drops_holder() -> anyhow::Result<()> {
    let context = context(true);
    context.init()?;
    assert_eq!(context.state(), ContainerState::ConfigurationLoaded);

    let widget = context.get_bean::<Widget>().unwrap();
    let dao = context.get_bean::<Dao>().unwrap();
    assert!(Arc::ptr_eq(&widget.dao, &dao));
    assert!(context.get_bean::<AppConfig>().is_none());
    assert!(context.get_bean_named::<AppConfig>("AppConfig").is_none());
    Ok(())
}

#[test]
fn test_configuration_skipped_when_disabled() -> anyhow::Result<()> {
    let context = context(false);
    context.init()?;
    assert_eq!(context.state(), ContainerState::Injected);
    assert!(context.get_bean::<Widget>().is_none());
    assert!(context.get_bean::<AppConfig>().is_some());
    Ok(())
}

#[test]
fn test_interface_lookup_returns_first_implementation() -> anyhow::Result<()> {
    let context = context(false);
    context.init()?;

    // 发现结果按标识符排序，ChineseGreeter 先注册
    let greeter = context.get_bean::<dyn Greeter>().unwrap();
    assert_eq!(greeter.greet(), "你好");

    let english = context.get_bean_named::<dyn Greeter>("EnglishGreeter").unwrap();
    assert_eq!(english.greet(), "hello");
    Ok(())
}

#[test]
fn test_duplicate_set_bean_keeps_first_instance() -> anyhow::Result<()> {
    let context = context(false);
    context.init()?;
    let first = context.get_bean::<Dao>().unwrap();

    let error = context.set_bean::<Dao>().unwrap_err();
    assert!(matches!(error, BeanError::DuplicateBean { ref key, .. } if key == "Dao"));
    assert!(Arc::ptr_eq(&context.get_bean::<Dao>().unwrap(), &first));
    Ok(())
}

#[test]
fn test_forced_set_bean_replaces_instance() -> anyhow::Result<()> {
    let context = context(false);
    context.init()?;
    let first = context.get_bean::<Dao>().unwrap();

    context.set_bean_forced::<Dao>(true)?;
    let second = context.get_bean::<Dao>().unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    Ok(())
}

#[test]
fn test_forced_get_returns_fresh_wired_instance() -> anyhow::Result<()> {
    let context = context(false);
    context.init()?;
    let registered = context.get_bean::<Service>().unwrap();

    let fresh = context.get_bean_forced::<Service>(true)?.unwrap();
    assert!(!Arc::ptr_eq(&registered, &fresh));
    assert!(fresh.dao.is_wired());
    assert!(Arc::ptr_eq(&context.get_bean::<Service>().unwrap(), &registered));
    Ok(())
}

#[test]
fn test_inject_all_is_idempotent() -> anyhow::Result<()> {
    let context = context(false);
    context.init()?;
    let service = context.get_bean::<Service>().unwrap();
    let dao_before = Arc::clone(service.dao.get().unwrap());

    let report = context.container().inject_all();
    assert_eq!(report.injected, 0);
    assert!(Arc::ptr_eq(service.dao.get().unwrap(), &dao_before));
    Ok(())
}

#[test]
fn test_unresolved_field_stays_empty() -> anyhow::Result<()> {
    init_test_logger();
    let catalog = TypeCatalog::new();
    catalog.register_type::<Service>();
    let context = ApplicationContext::builder()
        .with_catalog(Arc::new(catalog))
        .build()?;
    context.init()?;

    let service = context.get_bean::<Service>().unwrap();
    assert!(!service.dao.is_wired());
    assert!(matches!(
        context.set_bean::<Dao>(),
        Err(BeanError::TypeResolution { .. })
    ));
    Ok(())
}

#[test]
fn test_late_registration_fills_empty_field() -> anyhow::Result<()> {
    init_test_logger();
    let catalog = TypeCatalog::new();
    catalog.register_type::<Service>();
    catalog.register_type::<Dao>();
    let context = ApplicationContext::builder()
        .with_catalog(Arc::new(catalog))
        .filter_package("it::dao")
        .build()?;
    context.init()?;
    let service = context.get_bean::<Service>().unwrap();
    assert!(!service.dao.is_wired());

    let dao = context.set_bean_instance(Arc::new(Dao))?;
    assert!(Arc::ptr_eq(service.dao.get().unwrap(), &dao));
    Ok(())
}

#[test]
fn test_conflicting_markers_abort_init() {
    init_test_logger();
    let catalog = TypeCatalog::new();
    catalog.register_type::<Dao>();
    catalog.register_type::<Dual>();
    let context = ApplicationContext::builder()
        .with_catalog(Arc::new(catalog))
        .build()
        .unwrap();

    let error = context.init().unwrap_err();
    assert!(matches!(error, ContextError::Bean(BeanError::Conflict { .. })));
    // 失败前注册的 Bean 保留
    assert!(context.get_bean::<Dao>().is_some());
}

#[test]
fn test_marker_queries() -> anyhow::Result<()> {
    let context = context(false);
    context.init()?;

    let components: Vec<String> = context
        .get_beans_with_marker(MarkerKind::Component)
        .into_iter()
        .map(|entry| entry.key)
        .collect();
    assert_eq!(components, vec!["ChineseGreeter", "EnglishGreeter"]);

    let services = context.get_types_with_marker(MarkerKind::Service);
    assert_eq!(services.len(), 1);
    assert_eq!(services[0].simple_name(), "Service");

    let types = context.get_types_in_packages(&["it::greeting"])?;
    assert_eq!(types.len(), 3);
    Ok(())
}

#[test]
fn test_directory_discovery_end_to_end() -> anyhow::Result<()> {
    init_test_logger();
    let root = tempfile::tempdir()?;
    fs::create_dir_all(root.path().join("it/dao"))?;
    fs::create_dir_all(root.path().join("it/service"))?;
    fs::write(root.path().join("it/dao/Dao.rs"), "")?;
    fs::write(root.path().join("it/service/Service.rs"), "")?;
    fs::write(root.path().join("it/service/notes.txt"), "")?;

    let context = ApplicationContext::builder()
        .scan_package("it")
        .with_root_dir(root.path())
        .with_catalog(catalog())
        .build()?;
    context.init()?;

    let identifiers: Vec<String> = context.identifiers().into_iter().collect();
    assert_eq!(identifiers, vec!["it::dao::Dao", "it::service::Service"]);
    let service = context.get_bean::<Service>().unwrap();
    assert!(service.dao.is_wired());
    assert!(context.get_bean::<EnglishGreeter>().is_none());
    Ok(())
}

#[test]
fn test_directory_discovery_unknown_file_aborts_init() -> anyhow::Result<()> {
    init_test_logger();
    let root = tempfile::tempdir()?;
    fs::create_dir_all(root.path().join("it"))?;
    fs::write(root.path().join("it/Missing.rs"), "")?;

    let context = ApplicationContext::builder()
        .with_root_dir(root.path())
        .with_catalog(catalog())
        .build()?;
    let error = context.init().unwrap_err();
    assert!(matches!(
        error,
        ContextError::Bean(BeanError::TypeResolution { ref identifier }) if identifier == "it::Missing"
    ));
    Ok(())
}

#[test]
fn test_custom_registry_is_used() -> anyhow::Result<()> {
    init_test_logger();
    let registry = Arc::new(DefaultBeanRegistry::new());
    let context = ApplicationContext::builder()
        .scan_package("it::dao")
        .with_catalog(catalog())
        .with_registry(Arc::clone(&registry) as Arc<dyn BeanRegistry>)
        .build()?;
    context.init()?;

    assert_eq!(registry.len(), 1);
    assert!(registry.contains_key("Dao"));
    assert!(context.container().resolve::<Dao>().is_some());
    Ok(())
}

#[test]
fn test_concurrent_lookups_after_init() -> anyhow::Result<()> {
    let context = context(true);
    context.init()?;
    let expected = context.get_bean::<Dao>().unwrap();

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..100 {
                    let dao = context.get_bean::<Dao>().unwrap();
                    assert!(Arc::ptr_eq(&dao, &expected));
                    assert!(context.get_bean::<dyn Greeter>().is_some());
                    assert!(context.get_bean_named::<Widget>("Widget").is_some());
                }
            });
        }
    });
    Ok(())
}
