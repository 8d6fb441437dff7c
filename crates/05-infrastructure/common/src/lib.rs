//! # Infrastructure Common
//!
//! 这个 crate 提供了依赖解析引擎各层共享的基础类型。
//!
//! ## 核心类型
//!
//! - [`CapabilityType`] - 能力类型标识，依赖匹配的最小单位
//! - [`TypeShape`] - 参数或返回值声明的形状
//! - [`Signature`] - 生产者或消费者函数的声明签名
//! - [`Instance`] - 类型擦除后的具体值
//! - [`Binding`] - 为某个参数解析出的值（单个或集合）
//!
//! ## 设计原则
//!
//! - 以 `TypeId` 作为稳定的能力类型键
//! - 签名在注册时校验，解析阶段只处理合法形状
//! - 所有失败都以结构化错误交给调用方

pub mod component;
pub mod errors;
pub mod metadata;
pub mod signature;

pub use component::*;
pub use errors::*;
pub use metadata::*;
pub use signature::*;
