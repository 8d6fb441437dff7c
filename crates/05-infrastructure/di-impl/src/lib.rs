//! # 依赖注入具体实现
//!
//! 提供注册表、不动点解析器和已解析依赖图的具体实现。
//!
//! 数据只朝一个方向流动：注册 → 解析（消耗注册表）→ 调用（只读，可重复）。
//!
//! ```
//! use di_abstractions::{ContainerBuilder, DependencyProvider};
//! use di_impl::DependencyRegistry;
//! use std::sync::Arc;
//!
//! trait Greeting: Send + Sync {
//!     fn text(&self) -> String;
//! }
//!
//! struct Hello;
//!
//! impl Greeting for Hello {
//!     fn text(&self) -> String {
//!         "hello".to_string()
//!     }
//! }
//!
//! let mut registry = DependencyRegistry::new();
//! registry
//!     .register_producer(|| -> Arc<dyn Greeting> { Arc::new(Hello) })
//!     .unwrap();
//!
//! let graph = registry.build().unwrap();
//! let text = graph.provide_for(|greeting: Arc<dyn Greeting>| greeting.text()).unwrap();
//! assert_eq!(text, "hello");
//! ```

mod binding;
pub mod config;
pub mod graph;
pub mod registry;
mod resolver;

pub use self::config::{load_container_config, load_container_config_from};
pub use graph::ResolvedGraph;
pub use registry::DependencyRegistry;
