//! 依赖注入端到端测试：注册 → 解析 → 调用

use anyhow::Context;
use di_abstractions::{ContainerBuilder, DependencyProvider, Registration};
use di_impl::{load_container_config_from, DependencyRegistry, ResolvedGraph};
use infrastructure_common::DependencyError;
use std::io::Write;
use std::sync::{Arc, Once};
use std::thread;
use tracing::info;

static INIT_LOGGER: Once = Once::new();

/// 初始化测试日志
fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .try_init()
            .ok();
    });
}

trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

trait Handler: Send + Sync {
    fn route(&self) -> &str;
}

trait Router: Send + Sync {
    fn routes(&self) -> Vec<String>;
}

trait Server: Send + Sync {
    fn banner(&self) -> String;
}

struct FixedClock(u64);

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.0
    }
}

struct Route(&'static str);

impl Handler for Route {
    fn route(&self) -> &str {
        self.0
    }
}

struct TableRouter {
    handlers: Vec<Arc<dyn Handler>>,
}

impl Router for TableRouter {
    fn routes(&self) -> Vec<String> {
        self.handlers.iter().map(|h| h.route().to_string()).collect()
    }
}

struct HttpServer {
    router: Arc<dyn Router>,
    clock: Arc<dyn Clock>,
}

impl Server for HttpServer {
    fn banner(&self) -> String {
        format!("started at {} with {}", self.clock.now(), self.router.routes().join(","))
    }
}

fn server(router: Arc<dyn Router>, clock: Arc<dyn Clock>) -> anyhow::Result<Arc<dyn Server>> {
    Ok(Arc::new(HttpServer { router, clock }))
}

fn router(handlers: Vec<Arc<dyn Handler>>) -> Arc<dyn Router> {
    Arc::new(TableRouter { handlers })
}

fn health() -> Arc<dyn Handler> {
    Arc::new(Route("/health"))
}

fn users(_clock: Arc<dyn Clock>) -> Arc<dyn Handler> {
    Arc::new(Route("/users"))
}

/// 按依赖的逆序注册，迫使解析器跑多轮
fn application(registry: &mut DependencyRegistry) -> anyhow::Result<()> {
    registry.register_producer(server)?;
    registry.register_producer(router)?;
    registry.register_producer(users)?;
    registry.register_producer(health)?;
    registry.register_instance::<dyn Clock>(Arc::new(FixedClock(1700)))?;
    Ok(())
}

fn build_application() -> anyhow::Result<ResolvedGraph> {
    let mut registry = DependencyRegistry::new();
    application(&mut registry)?;
    registry
        .build()
        .map_err(|errors| anyhow::anyhow!("{} 个解析错误", errors.len()))
}

#[test]
fn test_application_graph() -> anyhow::Result<()> {
    init_test_logger();

    let graph = build_application()?;
    let banner = graph.provide_for(|server: Arc<dyn Server>| server.banner())?;
    info!("{}", banner);

    assert_eq!(banner, "started at 1700 with /users,/health");
    assert_eq!(graph.stats().producers_invoked, 4);
    assert_eq!(graph.stats().registered_instances, 1);
    assert_eq!(graph.len(), 4);
    Ok(())
}

#[test]
fn test_collection_keeps_registration_order() -> anyhow::Result<()> {
    init_test_logger();

    let mut registry = DependencyRegistry::new();
    registry.register_instance::<dyn Handler>(Arc::new(Route("/a")))?;
    registry.register_producer(|| -> Arc<dyn Handler> { Arc::new(Route("/b")) })?;
    registry.register_instance::<dyn Handler>(Arc::new(Route("/c")))?;
    registry.register_producer(router)?;

    let graph = registry.build().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let routes = graph.provide_for(|router: Arc<dyn Router>| router.routes())?;
    assert_eq!(routes, vec!["/a", "/b", "/c"]);

    let handlers = graph.resolve_all::<dyn Handler>()?;
    assert_eq!(handlers.len(), 3);
    Ok(())
}

#[test]
fn test_router_registered_before_handler_values() -> anyhow::Result<()> {
    init_test_logger();

    let mut registry = DependencyRegistry::new();
    registry.register_producer(router)?;
    registry.register_instance::<dyn Handler>(Arc::new(Route("/first")))?;
    registry.register_instance::<dyn Handler>(Arc::new(Route("/second")))?;

    let graph = registry.build().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let routes = graph.provide_for(|router: Arc<dyn Router>| router.routes())?;
    assert_eq!(routes, vec!["/first", "/second"]);
    assert_eq!(graph.stats().passes, 1);
    Ok(())
}

#[test]
fn test_cycle_reports_every_stalled_producer() {
    init_test_logger();

    let mut registry = DependencyRegistry::new();
    registry
        .register_producer(|_router: Arc<dyn Router>| -> Arc<dyn Clock> { Arc::new(FixedClock(0)) })
        .unwrap();
    registry
        .register_producer(|_clock: Arc<dyn Clock>| -> Arc<dyn Router> {
            Arc::new(TableRouter { handlers: Vec::new() })
        })
        .unwrap();

    let errors = registry.build().unwrap_err();
    assert_eq!(errors.len(), 2);
    for error in &errors {
        assert!(matches!(error, DependencyError::Unresolved { .. }));
        assert!(!error.is_fatal());
    }
}

#[test]
fn test_configured_cycle_detection() -> anyhow::Result<()> {
    init_test_logger();

    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    writeln!(file, "enable_circular_dependency_detection = true")?;
    let config = load_container_config_from(file.path()).context("加载容器配置")?;

    let mut registry = DependencyRegistry::with_config(config);
    registry.register_producer(|_router: Arc<dyn Router>| -> Arc<dyn Clock> { Arc::new(FixedClock(0)) })?;
    registry.register_producer(|_clock: Arc<dyn Clock>| -> Arc<dyn Router> {
        Arc::new(TableRouter { handlers: Vec::new() })
    })?;

    let errors = registry.build().unwrap_err();
    let cycle = errors
        .iter()
        .find(|e| matches!(e, DependencyError::CircularDependency { .. }))
        .context("缺少循环依赖错误")?;
    assert_eq!(cycle.to_string(), "循环依赖检测到: Clock -> Router -> Clock");
    Ok(())
}

#[test]
fn test_registration_values_are_erased_and_recovered() -> anyhow::Result<()> {
    let mut registry = DependencyRegistry::new();
    registry.register(Some(Registration::instance::<dyn Clock>(Arc::new(FixedClock(42)))))?;
    registry.register(Some(Registration::producer(health)))?;
    assert_eq!(registry.pending_producers(), 1);

    let graph = registry.build().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    assert_eq!(graph.resolve::<dyn Clock>()?.now(), 42);
    assert_eq!(graph.resolve::<dyn Handler>()?.route(), "/health");
    Ok(())
}

#[test]
fn test_shared_graph_across_threads() -> anyhow::Result<()> {
    init_test_logger();

    let graph = Arc::new(build_application()?);
    let workers: Vec<_> = (0..8)
        .map(|_| {
            let graph = graph.clone();
            thread::spawn(move || graph.provide_for(|clock: Arc<dyn Clock>, server: Arc<dyn Server>| {
                (clock.now(), server.banner())
            }))
        })
        .collect();

    for worker in workers {
        let (now, banner) = worker.join().map_err(|_| anyhow::anyhow!("线程崩溃"))??;
        assert_eq!(now, 1700);
        assert!(banner.ends_with("/users,/health"));
    }
    Ok(())
}
