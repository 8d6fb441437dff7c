//! 已解析依赖图

use crate::binding::{bind, EntryView};
use di_abstractions::{DependencyProvider, ResolutionStats};
use infrastructure_common::{Binding, CapabilityType, DependencyError, Instance, TypeShape};
use std::collections::HashMap;

/// 能力类型的最终值
#[derive(Debug)]
pub(crate) enum Resolved {
    Single(Instance),
    Sequence(Vec<Instance>),
}

impl Resolved {
    fn view(&self) -> EntryView<'_> {
        match self {
            Self::Single(instance) => EntryView::Single(instance),
            Self::Sequence(items) => EntryView::Sequence(items),
        }
    }
}

/// 已解析依赖图
///
/// 所有生产者都已调用完毕。之后只有读操作，可以在线程间共享。
#[derive(Debug)]
pub struct ResolvedGraph {
    order: Vec<CapabilityType>,
    values: HashMap<CapabilityType, Resolved>,
    stats: ResolutionStats,
}

impl ResolvedGraph {
    pub(crate) fn new(
        order: Vec<CapabilityType>,
        values: HashMap<CapabilityType, Resolved>,
        stats: ResolutionStats,
    ) -> Self {
        Self { order, values, stats }
    }

    /// 能力类型数量
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// 是否没有任何能力类型
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// 解析统计信息
    pub fn stats(&self) -> &ResolutionStats {
        &self.stats
    }
}

impl DependencyProvider for ResolvedGraph {
    fn binding(&self, shape: &TypeShape) -> Result<Binding, DependencyError> {
        let view = shape
            .capability_type()
            .and_then(|capability| self.values.get(&capability))
            .map(Resolved::view);
        bind(shape, view).map_err(|unavailable| unavailable.into_error(shape))
    }

    fn capabilities(&self) -> Vec<CapabilityType> {
        self.order.clone()
    }
}
