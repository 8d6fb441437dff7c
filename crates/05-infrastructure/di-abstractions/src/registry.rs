//! 注册项与依赖图抽象

use crate::factory::{IntoProducer, Producer};
use infrastructure_common::{Capability, CapabilityType, DependencyError, Instance};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// 注册项
///
/// 已经构造好的能力值，或者尚未调用的生产者
pub enum Registration {
    /// 具体值
    Instance(Instance),
    /// 生产者
    Producer(Box<dyn Producer>),
}

impl Registration {
    /// 从能力值创建注册项
    pub fn instance<T: ?Sized + Capability>(value: Arc<T>) -> Self {
        Self::Instance(Instance::of(value))
    }

    /// 从生产者函数创建注册项
    pub fn producer<Args, P: IntoProducer<Args>>(producer: P) -> Self {
        Self::Producer(producer.into_producer())
    }
}

impl From<Instance> for Registration {
    fn from(instance: Instance) -> Self {
        Self::Instance(instance)
    }
}

impl From<Box<dyn Producer>> for Registration {
    fn from(producer: Box<dyn Producer>) -> Self {
        Self::Producer(producer)
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance(instance) => f.debug_tuple("Instance").field(instance).finish(),
            Self::Producer(producer) => f
                .debug_struct("Producer")
                .field("name", &producer.name())
                .field("signature", &producer.signature().to_string())
                .finish(),
        }
    }
}

/// 依赖图节点
#[derive(Debug, Clone)]
pub struct DependencyGraphNode {
    /// 产出的能力类型
    pub capability: CapabilityType,
    /// 生产者名称
    pub name: String,
    /// 依赖的能力类型列表
    pub dependencies: Vec<CapabilityType>,
}

/// 循环依赖检测器
pub trait CircularDependencyDetector: Send + Sync {
    /// 检测循环依赖，每个环返回一个错误
    fn detect_circular_dependencies(&self, graph: &[DependencyGraphNode]) -> Vec<DependencyError>;
}

/// 默认循环依赖检测器
///
/// 在能力类型层面做深度优先搜索，同一能力类型的多个生产者合并为一个节点
#[derive(Debug, Default)]
pub struct DefaultCircularDependencyDetector;

impl CircularDependencyDetector for DefaultCircularDependencyDetector {
    fn detect_circular_dependencies(&self, graph: &[DependencyGraphNode]) -> Vec<DependencyError> {
        let mut order = Vec::new();
        let mut edges: HashMap<CapabilityType, Vec<CapabilityType>> = HashMap::new();
        for node in graph {
            let targets = edges.entry(node.capability).or_insert_with(|| {
                order.push(node.capability);
                Vec::new()
            });
            for dependency in &node.dependencies {
                if !targets.contains(dependency) {
                    targets.push(*dependency);
                }
            }
        }

        let mut visited = HashSet::new();
        let mut stack = Vec::new();
        let mut errors = Vec::new();
        for capability in order {
            if !visited.contains(&capability) {
                Self::dfs_check(capability, &edges, &mut visited, &mut stack, &mut errors);
            }
        }
        errors
    }
}

impl DefaultCircularDependencyDetector {
    fn dfs_check(
        current: CapabilityType,
        edges: &HashMap<CapabilityType, Vec<CapabilityType>>,
        visited: &mut HashSet<CapabilityType>,
        stack: &mut Vec<CapabilityType>,
        errors: &mut Vec<DependencyError>,
    ) {
        if let Some(start) = stack.iter().position(|c| *c == current) {
            let chain = stack[start..]
                .iter()
                .chain(std::iter::once(&current))
                .map(CapabilityType::short_name)
                .collect::<Vec<_>>()
                .join(" -> ");
            errors.push(DependencyError::CircularDependency {
                dependency_chain: chain,
            });
            return;
        }

        if visited.contains(&current) {
            return;
        }

        // 图外的能力类型没有出边
        let Some(targets) = edges.get(&current) else {
            visited.insert(current);
            return;
        };

        stack.push(current);
        for dependency in targets {
            Self::dfs_check(*dependency, edges, visited, stack, errors);
        }
        stack.pop();
        visited.insert(current);
    }
}
