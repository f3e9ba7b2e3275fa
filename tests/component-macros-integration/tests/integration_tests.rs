//! 过程宏集成测试
//!
//! 组件通过 `#[derive(Component)]` 登记到全局类型目录，按包扫描隔离各个场景

use ioc_common::{BeanError, Component, MarkerKind, TypeCatalog, TypeKey, TypeShape};
use ioc_context::{ApplicationContext, ContextError};
use std::sync::Arc;

mod app {
    pub mod dao {
        use component_macros::Component;

        #[derive(Debug, Default, Component)]
        #[resource]
        pub struct TestDao;

        impl TestDao {
            pub fn find(&self, id: u32) -> String {
                format!("row-{id}")
            }
        }
    }

    pub mod service {
        use super::dao::TestDao;
        use component_macros::Component;
        use ioc_common::Autowired;

        #[derive(Debug, Default, Component)]
        #[service]
        pub struct TestService {
            #[autowired]
            pub dao: Autowired<TestDao>,
        }

        /// 抽象类型，不会被实例化
        #[derive(Debug, Default, Component)]
        #[service]
        #[ioc(shape = "abstract")]
        pub struct BaseService;
    }

    pub mod controller {
        use super::service::TestService;
        use component_macros::Component;
        use ioc_common::Autowired;

        #[derive(Debug, Default, Component)]
        #[controller("c1")]
        pub struct TestController {
            #[autowired]
            pub service: Autowired<TestService>,
        }

        #[derive(Debug, Default, Component)]
        #[controller("tc2")]
        pub struct Test2Controller {
            #[autowired]
            pub service: Autowired<TestService>,
        }
    }

    pub mod greeting {
        use component_macros::Component;

        pub trait Greeter: Send + Sync {
            fn greet(&self) -> &'static str;
        }

        #[derive(Debug, Default, Component)]
        #[component]
        #[implements(dyn Greeter)]
        pub struct EnglishGreeter;

        impl Greeter for EnglishGreeter {
            fn greet(&self) -> &'static str {
                "hello"
            }
        }

        #[derive(Debug, Default, Component)]
        #[component("zh")]
        #[implements(dyn Greeter)]
        pub struct ChineseGreeter;

        impl Greeter for ChineseGreeter {
            fn greet(&self) -> &'static str {
                "你好"
            }
        }
    }

    pub mod report {
        use super::dao::TestDao;
        use component_macros::Component;
        use std::sync::Arc;

        /// `Arc` 字段在构造后不可重新赋值，注入器不会处理
        #[derive(Debug, Default, Component)]
        #[component]
        #[ioc(name = "reports::Reporter")]
        pub struct Reporter {
            #[autowired]
            pub dao: Arc<TestDao>,
        }
    }

    pub mod config {
        use super::dao::TestDao;
        use component_macros::{beans, Component};
        use std::sync::Arc;

        #[derive(Debug, Component)]
        #[ioc(no_default)]
        pub struct Widget {
            pub dao: Arc<TestDao>,
        }

        #[derive(Debug, Component)]
        #[ioc(no_default)]
        pub struct Gadget {
            pub label: String,
        }

        #[derive(Debug, Default, Component)]
        #[configuration]
        pub struct AppConfig;

        #[beans]
        impl AppConfig {
            #[bean]
            fn widget(&self, dao: Arc<TestDao>) -> Widget {
                Widget { dao }
            }

            #[bean("shiny")]
            fn gadget(&self) -> Result<Arc<Gadget>, String> {
                Ok(Arc::new(Gadget {
                    label: "shiny".to_string(),
                }))
            }
        }
    }
}

mod broken {
    pub mod dual {
        use component_macros::Component;

        #[derive(Debug, Default, Component)]
        #[service]
        #[controller]
        pub struct Dual;
    }

    pub mod static_factory {
        use component_macros::{beans, Component};

        #[derive(Debug, Component)]
        #[ioc(no_default)]
        pub struct Part;

        #[derive(Debug, Default, Component)]
        #[configuration]
        pub struct StaticConfig;

        #[beans]
        impl StaticConfig {
            #[bean]
            fn part() -> Part {
                Part
            }
        }
    }

    pub mod failing {
        use component_macros::{beans, Component};

        #[derive(Debug, Component)]
        #[ioc(no_default)]
        pub struct Fragile;

        #[derive(Debug, Default, Component)]
        #[configuration]
        pub struct FailingConfig;

        #[beans]
        impl FailingConfig {
            #[bean]
            fn fragile(&self) -> Result<Fragile, String> {
                Err("不可用".to_string())
            }
        }
    }
}

use app::config::{AppConfig, Gadget, Widget};
use app::controller::{Test2Controller, TestController};
use app::dao::TestDao;
use app::greeting::{ChineseGreeter, EnglishGreeter, Greeter};
use app::report::Reporter;
use app::service::{BaseService, TestService};

fn context(package: &str, load_configuration: bool) -> ApplicationContext {
    ApplicationContext::builder()
        .scan_package(package)
        .load_configuration(load_configuration)
        .build()
        .unwrap()
}

#[test]
fn test_derive_descriptor() {
    let descriptor = TestService::descriptor();
    assert_eq!(descriptor.name, "integration_tests::app::service::TestService");
    assert_eq!(descriptor.simple_name(), "TestService");
    assert!(descriptor.has_marker(MarkerKind::Service));
    assert_eq!(descriptor.fields.len(), 1);
    assert_eq!(descriptor.fields[0].name, "dao");
    assert_eq!(descriptor.fields[0].target, TypeKey::of::<TestDao>());
    assert!(descriptor.fields[0].is_injectable());
    assert!(descriptor.constructor.is_some());
}

#[test]
fn test_derive_options() {
    let reporter = Reporter::descriptor();
    assert_eq!(reporter.name, "reports::Reporter");
    assert!(!reporter.fields[0].is_injectable());
    assert!(reporter.fields[0].modifiers.is_final);

    assert_eq!(BaseService::descriptor().shape, TypeShape::Abstract);
    assert!(Widget::descriptor().constructor.is_none());
    assert!(Widget::descriptor().markers.is_empty());

    let chinese = ChineseGreeter::descriptor();
    assert_eq!(chinese.markers[0].explicit_alias(), Some("zh"));
    assert!(chinese.is_assignable_to(&TypeKey::of::<dyn Greeter>()));
}

#[test]
fn test_beans_attribute_builds_factory_methods() {
    let descriptor = AppConfig::descriptor();
    let names: Vec<&str> = descriptor.factory_methods.iter().map(|m| m.name).collect();
    assert_eq!(names, vec!["widget", "gadget"]);

    let widget = &descriptor.factory_methods[0];
    assert_eq!(widget.returns, TypeKey::of::<Widget>());
    assert_eq!(widget.parameters, vec![TypeKey::of::<TestDao>()]);
    assert!(!widget.is_static);
    assert_eq!(descriptor.factory_methods[1].explicit_alias(), Some("shiny"));
}

#[test]
fn test_derived_types_are_in_global_catalog() {
    let catalog = TypeCatalog::global();
    for name in [
        "integration_tests::app::dao::TestDao",
        "integration_tests::app::service::TestService",
        "integration_tests::app::controller::TestController",
        "integration_tests::app::config::AppConfig",
        "reports::Reporter",
    ] {
        assert!(catalog.contains(name), "全局目录中缺少 {name}");
    }
    assert!(catalog.by_key(&TypeKey::of::<Test2Controller>()).is_some());
}

#[test]
fn test_context_wires_derived_components() {
    let context = context("integration_tests::app", false);
    context.init().unwrap();

    let dao = context.get_bean::<TestDao>().unwrap();
    let service = context.get_bean::<TestService>().unwrap();
    assert!(Arc::ptr_eq(service.dao.get().unwrap(), &dao));

    let c1 = context.get_bean_named::<TestController>("c1").unwrap();
    let tc2 = context.get_bean_named::<Test2Controller>("tc2").unwrap();
    assert!(Arc::ptr_eq(c1.service.get().unwrap(), &service));
    assert!(Arc::ptr_eq(tc2.service.get().unwrap(), &service));
    assert!(context.get_bean_named::<TestController>("TestController").is_none());
    assert_eq!(c1.service.get().unwrap().dao.get().unwrap().find(5), "row-5");
}

#[test]
fn test_abstract_and_fixed_fields() {
    let context = context("integration_tests::app", false);
    context.init().unwrap();

    assert!(context.get_bean::<BaseService>().is_none());
    let services = context.get_types_with_marker(MarkerKind::Service);
    assert!(services.iter().any(|d| d.simple_name() == "BaseService"));

    // Reporter 不在扫描的包内，手动注册
    assert!(context.get_bean::<Reporter>().is_none());
    let reporter = context.set_bean_instance(Arc::new(Reporter::default())).unwrap();
    assert!(context.get_bean_named::<Reporter>("Reporter").is_some());
    let dao = context.get_bean::<TestDao>().unwrap();
    assert!(!Arc::ptr_eq(&reporter.dao, &dao));
}

#[test]
fn test_interface_lookup_with_alias() {
    let context = context("integration_tests::app::greeting", false);
    context.init().unwrap();

    let first = context.get_bean::<dyn Greeter>().unwrap();
    assert_eq!(first.greet(), "你好");
    assert_eq!(context.get_bean_named::<dyn Greeter>("zh").unwrap().greet(), "你好");
    assert_eq!(
        context.get_bean_named::<dyn Greeter>("EnglishGreeter").unwrap().greet(),
        "hello"
    );
    assert!(context.get_bean::<EnglishGreeter>().is_some());
}

#[test]
fn test_set_bean_by_derived_interface() {
    let context = context("integration_tests::app::greeting", false);
    context.init().unwrap();

    // 派生宏只登记实现类型，接口描述符在注册时补出
    let entry = context.set_bean::<dyn Greeter>().unwrap();
    assert_eq!(entry.key, "Greeter");
    assert_eq!(entry.type_name(), "integration_tests::app::greeting::ChineseGreeter");
    let registered = context.get_bean_named::<dyn Greeter>("Greeter").unwrap();
    assert_eq!(registered.greet(), "你好");

    let fresh = context.get_bean_forced::<dyn Greeter>(true).unwrap().unwrap();
    assert_eq!(fresh.greet(), "你好");
    assert!(matches!(
        context.set_bean::<dyn Greeter>(),
        Err(BeanError::DuplicateBean { .. })
    ));
}

#[test]
fn test_set_bean_as_derived_interface() {
    let context = context("integration_tests::app::greeting", false);
    context.init().unwrap();

    let english = context
        .set_bean_as::<dyn Greeter, EnglishGreeter>(Arc::new(EnglishGreeter))
        .unwrap();
    let registered = context.get_bean_named::<dyn Greeter>("Greeter").unwrap();
    assert_eq!(registered.greet(), english.greet());
    assert!(context
        .get_types_with_marker(MarkerKind::Component)
        .iter()
        .all(|descriptor| descriptor.shape != TypeShape::Interface));
}

#[test]
fn test_configuration_loading() {
    let context = context("integration_tests::app", true);
    context.init().unwrap();

    let widget = context.get_bean::<Widget>().unwrap();
    assert!(Arc::ptr_eq(&widget.dao, &context.get_bean::<TestDao>().unwrap()));
    let gadget = context.get_bean_named::<Gadget>("shiny").unwrap();
    assert_eq!(gadget.label, "shiny");
    assert!(context.get_bean::<AppConfig>().is_none());
}

#[test]
fn test_multiple_markers_conflict() {
    let context = context("integration_tests::broken::dual", false);
    let error = context.init().unwrap_err();
    assert!(matches!(error, ContextError::Bean(BeanError::Conflict { .. })));
}

#[test]
fn test_static_factory_method_conflict() {
    let context = context("integration_tests::broken::static_factory", true);
    let error = context.init().unwrap_err();
    assert!(matches!(error, ContextError::Bean(BeanError::Conflict { .. })));
}

#[test]
fn test_failing_factory_method() {
    let context = context("integration_tests::broken::failing", true);
    let error = context.init().unwrap_err();
    assert!(matches!(
        error,
        ContextError::Bean(BeanError::Instantiation { ref message, .. }) if message.contains("不可用")
    ));
}
