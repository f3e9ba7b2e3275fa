//! IoC 容器示例应用
//!
//! 演示如何通过应用上下文完成组件扫描、依赖注入和配置类加载

mod demo;

use anyhow::Context;
use clap::Parser;
use demo::config::Widget;
use demo::controller::{Test2Controller, TestController};
use demo::dao::TestDao;
use demo::greeting::Greeter;
use demo::service::TestService;
use ioc_common::MarkerKind;
use ioc_context::{ApplicationContext, ContextBuilder, LoggingConfig};
use tracing::{info, warn};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "Lorn IoC 容器示例应用")]
#[command(version)]
struct Args {
    /// 扫描的包，可重复指定
    #[arg(short, long = "scan", default_value = "example_app::demo")]
    scan_packages: Vec<String>,

    /// 排除的包，可重复指定
    #[arg(short, long = "filter")]
    filter_packages: Vec<String>,

    /// 不加载配置类
    #[arg(long)]
    skip_configuration: bool,

    /// 环境变量前缀
    #[arg(long, default_value = "IOC")]
    env_prefix: String,

    /// 日志级别
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// 使用生产环境日志格式
    #[arg(long)]
    production: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let context = build_context(&args)?;
    info!("启动 example-app");

    context.init().context("初始化 IoC 容器失败")?;
    info!("容器状态: {}", context.state());

    demonstrate_lookup(&context)?;
    demonstrate_markers(&context);
    demonstrate_configuration(&context);
    demonstrate_interfaces(&context);
    demonstrate_forced(&context)?;

    info!("example-app 运行结束");
    Ok(())
}

/// 构建应用上下文
///
/// 环境变量先生效，命令行参数在其后追加
fn build_context(args: &Args) -> anyhow::Result<ApplicationContext> {
    let logging = if args.production {
        LoggingConfig::production()
    } else {
        LoggingConfig::development()
    }
    .with_level(parse_log_level(&args.log_level));

    let mut builder = ContextBuilder::from_env(&args.env_prefix)?
        .load_configuration(!args.skip_configuration)
        .with_logging(logging);
    for package in &args.scan_packages {
        builder = builder.scan_package(package.as_str());
    }
    for package in &args.filter_packages {
        builder = builder.filter_package(package.as_str());
    }

    Ok(builder.build()?)
}

/// 演示按类型和按名称获取
fn demonstrate_lookup(context: &ApplicationContext) -> anyhow::Result<()> {
    info!("演示按类型和按名称获取");

    let controller = context
        .get_bean_named::<TestController>("c1")
        .context("未找到名为 c1 的控制器")?;
    info!("c1 处理结果: {}", controller.handle(7));

    match context.get_bean_named::<Test2Controller>("tc2") {
        Some(controller) => info!("tc2 已就绪: {}", controller.is_ready()),
        None => warn!("未找到名为 tc2 的控制器"),
    }

    let service = context.get_bean::<TestService>().context("未找到 TestService")?;
    let dao = context.get_bean::<TestDao>().context("未找到 TestDao")?;
    info!(
        "TestService 查询: {:?}, TestDao 查询: {}",
        service.describe(1),
        dao.find(1)
    );
    Ok(())
}

/// 演示按标记查询
fn demonstrate_markers(context: &ApplicationContext) {
    info!("演示按标记查询");

    for kind in MarkerKind::ALL {
        let keys: Vec<String> = context
            .get_beans_with_marker(kind)
            .into_iter()
            .map(|entry| entry.key)
            .collect();
        info!("{}: {:?}", kind, keys);
    }
}

/// 演示配置类产生的 Bean
fn demonstrate_configuration(context: &ApplicationContext) {
    if !context.settings().load_configuration {
        info!("已跳过配置类加载");
        return;
    }
    match context.get_bean::<Widget>() {
        Some(widget) => info!("配置类产生的 Widget: {}", widget.lookup(3)),
        None => warn!("未找到 Widget"),
    }
}

/// 演示接口查询，返回第一个实现
fn demonstrate_interfaces(context: &ApplicationContext) {
    match context.get_bean::<dyn Greeter>() {
        Some(greeter) => info!("{}", greeter.greet("IoC")),
        None => warn!("没有 Greeter 实现"),
    }
}

/// 演示强制创建新实例
fn demonstrate_forced(context: &ApplicationContext) -> anyhow::Result<()> {
    let registered = context.get_bean::<TestService>().context("未找到 TestService")?;
    let fresh = context
        .get_bean_forced::<TestService>(true)?
        .context("无法创建 TestService 新实例")?;
    info!(
        "新实例与已注册实例相同: {}, 新实例已注入: {:?}",
        std::sync::Arc::ptr_eq(&registered, &fresh),
        fresh.describe(2)
    );
    Ok(())
}

/// 解析日志级别
fn parse_log_level(level: &str) -> tracing::Level {
    match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}
