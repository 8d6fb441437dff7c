//! 不动点解析器
//!
//! 反复遍历全部注册项，调用输入已经就绪的生产者，直到没有待解析的生产者，
//! 或者某一轮没有任何进展为止。

use crate::binding::{bind, Unavailable};
use crate::graph::{Resolved, ResolvedGraph};
use crate::registry::{DependencyRegistry, Entry, Slot};
use di_abstractions::{
    CircularDependencyDetector, DefaultCircularDependencyDetector, DependencyGraphNode, Producer,
    ResolutionStats,
};
use infrastructure_common::{Binding, CapabilityType, DependencyError, Instance};
use tracing::{debug, error, info, warn};

/// 生产者在注册表中的位置
#[derive(Debug, Clone, Copy)]
struct SlotRef {
    capability: CapabilityType,
    /// 集合中的下标，单个注册为 `None`
    position: Option<usize>,
}

impl DependencyRegistry {
    /// 解析全部生产者，消耗注册表
    pub(crate) fn resolve(mut self) -> Result<ResolvedGraph, Vec<DependencyError>> {
        let producers = self.pending;
        info!(
            "开始解析依赖: {} 个能力类型, {} 个待解析生产者",
            self.order.len(),
            producers
        );

        let max_passes = self.config.max_resolution_passes.map(|max| max.max(1));
        let mut previous = self.pending + 1;
        let mut passes = 0;
        let mut stalled = Vec::new();

        while self.pending > 0 && self.pending < previous {
            if max_passes.is_some_and(|max| passes >= max) {
                warn!("达到最大解析轮数: {}", passes);
                break;
            }
            previous = self.pending;
            passes += 1;

            stalled = self.run_pass().map_err(|fatal| vec![fatal])?;
            debug!("第 {} 轮解析完成, 剩余 {} 个待解析生产者", passes, self.pending);
        }

        if self.pending > 0 {
            warn!("解析停滞: {} 个生产者无法解析", self.pending);
            if self.config.enable_circular_dependency_detection {
                let graph = self.pending_graph();
                stalled.extend(DefaultCircularDependencyDetector.detect_circular_dependencies(&graph));
            }
            return Err(stalled);
        }

        let stats = ResolutionStats {
            registered_capabilities: self.order.len(),
            registered_instances: self.instances,
            producers_invoked: producers,
            passes,
        };
        info!("依赖解析完成: 调用了 {} 个生产者, 共 {} 轮", producers, passes);
        Ok(self.into_graph(stats))
    }

    /// 完整遍历一次全部注册项
    ///
    /// 返回本轮无法解析的生产者；致命错误立即中止
    fn run_pass(&mut self) -> Result<Vec<DependencyError>, DependencyError> {
        let mut stalled = Vec::new();

        for index in 0..self.order.len() {
            let capability = self.order[index];
            let positions = match self.entries.get(&capability) {
                Some(Entry::Single(Slot::Pending(_))) => vec![None],
                Some(Entry::Collection(slots)) => (0..slots.len()).map(Some).collect(),
                _ => continue,
            };

            for position in positions {
                let slot = SlotRef {
                    capability,
                    position,
                };
                if let Some(unresolved) = self.resolve_slot(slot)? {
                    stalled.push(unresolved);
                }
            }

            self.finalize_collection(capability);
        }

        Ok(stalled)
    }

    /// 尝试调用一个生产者
    ///
    /// 输入尚未就绪时返回 `Ok(Some(..))`，生产者保持待解析状态
    fn resolve_slot(&mut self, slot: SlotRef) -> Result<Option<DependencyError>, DependencyError> {
        let bindings = {
            let Some(Slot::Pending(producer)) = self.slot(slot) else {
                return Ok(None);
            };
            match self.bind_inputs(producer.as_ref()) {
                Ok(bindings) => bindings,
                Err(Unavailable::NotReady(reason)) => {
                    return Ok(Some(DependencyError::Unresolved {
                        producer: producer.name().to_string(),
                        type_name: slot.capability.to_string(),
                        reason,
                    }));
                }
                Err(Unavailable::Fatal(fatal)) => return Err(fatal),
            }
        };

        let Some(target) = self.slot_mut(slot) else {
            return Ok(None);
        };
        let producer = match std::mem::replace(target, Slot::Spent) {
            Slot::Pending(producer) => producer,
            other => {
                *target = other;
                return Ok(None);
            }
        };

        *target = Slot::Built(invoke(producer, bindings, slot.capability)?);
        self.pending -= 1;
        Ok(None)
    }

    fn bind_inputs(&self, producer: &dyn Producer) -> Result<Vec<Binding>, Unavailable> {
        producer
            .signature()
            .inputs
            .iter()
            .map(|shape| {
                let view = shape
                    .capability_type()
                    .and_then(|capability| self.entries.get(&capability))
                    .map(Entry::view);
                bind(shape, view)
            })
            .collect()
    }

    /// 集合的全部成员都已构建时，替换为最终的有序序列
    fn finalize_collection(&mut self, capability: CapabilityType) {
        let Some(entry) = self.entries.get_mut(&capability) else {
            return;
        };
        if let Entry::Collection(slots) = entry {
            if slots.iter().all(Slot::is_built) {
                let items = std::mem::take(slots)
                    .into_iter()
                    .filter_map(Slot::into_instance)
                    .collect();
                *entry = Entry::Sequence(items);
            }
        }
    }

    fn slot(&self, slot: SlotRef) -> Option<&Slot> {
        match (self.entries.get(&slot.capability)?, slot.position) {
            (Entry::Single(single), None) => Some(single),
            (Entry::Collection(slots), Some(position)) => slots.get(position),
            _ => None,
        }
    }

    fn slot_mut(&mut self, slot: SlotRef) -> Option<&mut Slot> {
        match (self.entries.get_mut(&slot.capability)?, slot.position) {
            (Entry::Single(single), None) => Some(single),
            (Entry::Collection(slots), Some(position)) => slots.get_mut(position),
            _ => None,
        }
    }

    /// 仍待解析的生产者组成的依赖图
    fn pending_graph(&self) -> Vec<DependencyGraphNode> {
        let mut graph = Vec::new();
        for capability in &self.order {
            let slots: Vec<&Slot> = match self.entries.get(capability) {
                Some(Entry::Single(slot)) => vec![slot],
                Some(Entry::Collection(slots)) => slots.iter().collect(),
                _ => continue,
            };
            for slot in slots {
                if let Slot::Pending(producer) = slot {
                    graph.push(DependencyGraphNode {
                        capability: *capability,
                        name: producer.name().to_string(),
                        dependencies: producer.signature().input_capabilities(),
                    });
                }
            }
        }
        graph
    }

    fn into_graph(mut self, stats: ResolutionStats) -> ResolvedGraph {
        for capability in self.order.clone() {
            self.finalize_collection(capability);
        }

        let values = self
            .entries
            .into_iter()
            .filter_map(|(capability, entry)| {
                let resolved = match entry {
                    Entry::Single(slot) => Resolved::Single(slot.into_instance()?),
                    Entry::Sequence(items) => Resolved::Sequence(items),
                    Entry::Collection(_) => return None,
                };
                Some((capability, resolved))
            })
            .collect();

        ResolvedGraph::new(self.order, values, stats)
    }
}

/// 调用生产者并校验返回值
fn invoke(
    producer: Box<dyn Producer>,
    bindings: Vec<Binding>,
    capability: CapabilityType,
) -> Result<Instance, DependencyError> {
    let name = producer.name().to_string();
    debug!("调用生产者: {} -> {}", name, capability);

    match producer.produce(bindings) {
        Err(source) => {
            error!("生产者执行失败: {}, 原因: {}", name, source);
            Err(DependencyError::ProducerFailed {
                producer: name,
                type_name: capability.to_string(),
                source,
            })
        }
        Ok(None) => {
            error!("生产者返回了空值: {}", name);
            Err(DependencyError::NilOutput {
                producer: name,
                type_name: capability.to_string(),
            })
        }
        Ok(Some(instance)) if instance.capability_type() == Some(capability) => Ok(instance),
        Ok(Some(instance)) => Err(DependencyError::InvalidOutput {
            producer: name,
            expected: capability.to_string(),
            actual: instance.shape().to_string(),
        }),
    }
}
