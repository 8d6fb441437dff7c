//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义组件注册、依赖解析和按需调用的核心接口。
//!
//! ## 核心接口
//!
//! - [`Producer`] - 生产者接口，被调用一次后即被消耗
//! - [`Dependency`] - 参数绑定接口（单个能力或能力集合）
//! - [`Consumer`] - 可以由已解析依赖图调用的函数
//! - [`ContainerBuilder`] - 注册表接口
//! - [`DependencyProvider`] - 已解析依赖图接口

/// 为 0 到 8 个参数的函数生成实现
macro_rules! all_the_arities {
    ($name:ident) => {
        $name!();
        $name!(A1);
        $name!(A1, A2);
        $name!(A1, A2, A3);
        $name!(A1, A2, A3, A4);
        $name!(A1, A2, A3, A4, A5);
        $name!(A1, A2, A3, A4, A5, A6);
        $name!(A1, A2, A3, A4, A5, A6, A7);
        $name!(A1, A2, A3, A4, A5, A6, A7, A8);
    };
}

pub mod container;
pub mod factory;
pub mod registry;
pub mod resolver;

pub use container::*;
pub use factory::*;
pub use registry::*;
pub use resolver::*;
