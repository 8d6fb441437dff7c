//! 依赖注入容器抽象接口
//!
//! 提供注册表和已解析依赖图的核心抽象

use crate::factory::IntoProducer;
use crate::registry::Registration;
use crate::resolver::{Consumer, Dependency};
use infrastructure_common::{
    Binding, BoxError, Capability, CapabilityType, DependencyError, InvocationError, RegistrationError,
    TypeShape,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 容器构建器 trait
///
/// 注册阶段只做加法，不会调用任何生产者；`build` 消耗构建器
pub trait ContainerBuilder {
    /// 构建出的依赖图类型
    type Container: DependencyProvider;

    /// 注册具体值或生产者，`None` 表示空项
    fn register(&mut self, item: Option<Registration>) -> Result<(), RegistrationError>;

    /// 解析全部生产者
    ///
    /// 成功时不带任何错误；失败时错误列表非空
    fn build(self) -> Result<Self::Container, Vec<DependencyError>>;

    /// 注册能力值
    fn register_instance<T>(&mut self, instance: Arc<T>) -> Result<(), RegistrationError>
    where
        T: ?Sized + Capability,
    {
        self.register(Some(Registration::instance(instance)))
    }

    /// 注册生产者函数
    fn register_producer<Args, P>(&mut self, producer: P) -> Result<(), RegistrationError>
    where
        P: IntoProducer<Args>,
    {
        self.register(Some(Registration::producer(producer)))
    }
}

/// 依赖提供者 trait
///
/// 已解析依赖图的只读接口，可以被多个线程同时调用
pub trait DependencyProvider: Send + Sync {
    /// 为声明形状查找绑定，单个值可以提升为单元素集合
    fn binding(&self, shape: &TypeShape) -> Result<Binding, DependencyError>;

    /// 所有已注册的能力类型
    fn capabilities(&self) -> Vec<CapabilityType>;

    /// 绑定函数的全部参数并调用一次
    ///
    /// 任何参数无法绑定时函数不会被调用。函数的返回值原样作为结果返回。
    ///
    /// 只有函数可以被调用：
    ///
    /// ```compile_fail
    /// use di_abstractions::DependencyProvider;
    ///
    /// fn call_number(graph: &impl DependencyProvider) {
    ///     let _ = graph.provide_for(42);
    /// }
    /// ```
    fn provide_for<Args, F>(&self, f: F) -> Result<F::Output, InvocationError>
    where
        F: Consumer<Args>,
    {
        let bindings = F::parameters()
            .iter()
            .map(|shape| self.binding(shape))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(f.consume(bindings)?)
    }

    /// 与 [`provide_for`](Self::provide_for) 相同，但函数返回的错误作为调用错误返回
    fn try_provide_for<Args, F, T, E>(&self, f: F) -> Result<T, InvocationError>
    where
        F: Consumer<Args, Output = Result<T, E>>,
        E: Into<BoxError>,
    {
        self.provide_for(f)?
            .map_err(|e| InvocationError::Failed { source: e.into() })
    }

    /// 解析单个能力值
    fn resolve<T>(&self) -> Result<Arc<T>, DependencyError>
    where
        T: ?Sized + Capability,
    {
        let binding = self.binding(&TypeShape::capability::<T>())?;
        Arc::<T>::extract(Some(binding))
    }

    /// 解析某个能力类型的全部值（按注册顺序）
    fn resolve_all<T>(&self) -> Result<Vec<Arc<T>>, DependencyError>
    where
        T: ?Sized + Capability,
    {
        let binding = self.binding(&TypeShape::collection::<T>())?;
        Vec::<Arc<T>>::extract(Some(binding))
    }

    /// 检查是否已注册能力类型
    fn is_registered<T>(&self) -> bool
    where
        T: ?Sized + 'static,
    {
        self.capabilities().contains(&CapabilityType::of::<T>())
    }
}

/// 容器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// 解析停滞时是否额外执行循环依赖检测
    pub enable_circular_dependency_detection: bool,
    /// 最大解析轮数，`None` 表示一直解析到不动点
    pub max_resolution_passes: Option<usize>,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            enable_circular_dependency_detection: false,
            max_resolution_passes: None,
        }
    }
}

/// 解析统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionStats {
    /// 已注册能力类型数量
    pub registered_capabilities: usize,
    /// 已注册的具体值数量
    pub registered_instances: usize,
    /// 被调用的生产者数量
    pub producers_invoked: usize,
    /// 解析轮数
    pub passes: usize,
}
