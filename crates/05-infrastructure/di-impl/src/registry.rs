//! 能力类型注册表

use crate::binding::EntryView;
use crate::graph::ResolvedGraph;
use di_abstractions::{ContainerBuilder, ContainerConfig, Producer, Registration};
use infrastructure_common::{CapabilityType, DependencyError, Instance, RegistrationError};
use std::collections::hash_map::{Entry as MapEntry, HashMap};
use std::fmt;
use tracing::debug;

/// 注册表中的单个值
pub(crate) enum Slot {
    /// 已构建的值
    Built(Instance),
    /// 尚未调用的生产者
    Pending(Box<dyn Producer>),
    /// 生产者已被取出，正在调用
    Spent,
}

impl Slot {
    pub(crate) fn is_built(&self) -> bool {
        matches!(self, Self::Built(_))
    }

    pub(crate) fn into_instance(self) -> Option<Instance> {
        match self {
            Self::Built(instance) => Some(instance),
            Self::Pending(_) | Self::Spent => None,
        }
    }
}

/// 某个能力类型的注册状态
pub(crate) enum Entry {
    /// 只注册了一个值或生产者
    Single(Slot),
    /// 注册了多个，按注册顺序排列
    Collection(Vec<Slot>),
    /// 全部成员都已构建的集合
    Sequence(Vec<Instance>),
}

impl Entry {
    pub(crate) fn view(&self) -> EntryView<'_> {
        match self {
            Self::Single(Slot::Built(instance)) => EntryView::Single(instance),
            Self::Single(Slot::Pending(_) | Slot::Spent) => EntryView::Unbuilt,
            Self::Collection(slots) => EntryView::Incomplete(slots.len()),
            Self::Sequence(items) => EntryView::Sequence(items),
        }
    }

    /// 追加一个值，单个注册自动变为集合
    ///
    /// 全部由具体值组成的集合直接就是完成的序列
    fn push(&mut self, slot: Slot) {
        let previous = std::mem::replace(self, Self::Sequence(Vec::new()));
        *self = match (previous, slot) {
            (Self::Single(Slot::Built(first)), Slot::Built(instance)) => Self::Sequence(vec![first, instance]),
            (Self::Sequence(mut items), Slot::Built(instance)) => {
                items.push(instance);
                Self::Sequence(items)
            }
            (previous, slot) => {
                let mut slots = match previous {
                    Self::Single(existing) => vec![existing],
                    Self::Collection(slots) => slots,
                    Self::Sequence(items) => items.into_iter().map(Slot::Built).collect(),
                };
                slots.push(slot);
                Self::Collection(slots)
            }
        };
    }
}

/// 依赖注册表
///
/// 只接受新增注册，不会调用任何生产者。调用 [`build`](ContainerBuilder::build)
/// 会消耗注册表并产出 [`ResolvedGraph`]。
pub struct DependencyRegistry {
    /// 容器配置
    pub(crate) config: ContainerConfig,
    /// 能力类型（按首次注册顺序）
    pub(crate) order: Vec<CapabilityType>,
    /// 注册状态
    pub(crate) entries: HashMap<CapabilityType, Entry>,
    /// 尚未调用的生产者数量（包括集合中的）
    pub(crate) pending: usize,
    /// 注册的具体值数量
    pub(crate) instances: usize,
}

impl DependencyRegistry {
    /// 创建新的注册表
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// 使用指定配置创建注册表
    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            config,
            order: Vec::new(),
            entries: HashMap::new(),
            pending: 0,
            instances: 0,
        }
    }

    /// 容器配置
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// 尚未调用的生产者数量
    pub fn pending_producers(&self) -> usize {
        self.pending
    }

    /// 已注册的能力类型数量
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// 是否没有任何注册
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// 已注册的能力类型（按首次注册顺序）
    pub fn capabilities(&self) -> &[CapabilityType] {
        &self.order
    }

    /// 检查是否已注册能力类型
    pub fn is_registered<T: ?Sized + 'static>(&self) -> bool {
        self.entries.contains_key(&CapabilityType::of::<T>())
    }

    fn insert(&mut self, capability: CapabilityType, slot: Slot) {
        match self.entries.entry(capability) {
            MapEntry::Vacant(vacant) => {
                self.order.push(capability);
                vacant.insert(Entry::Single(slot));
            }
            MapEntry::Occupied(mut occupied) => occupied.get_mut().push(slot),
        }
    }
}

impl Default for DependencyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DependencyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencyRegistry")
            .field("config", &self.config)
            .field("capabilities", &self.order)
            .field("pending", &self.pending)
            .field("instances", &self.instances)
            .finish()
    }
}

impl ContainerBuilder for DependencyRegistry {
    type Container = ResolvedGraph;

    fn register(&mut self, item: Option<Registration>) -> Result<(), RegistrationError> {
        let Some(item) = item else {
            return Err(RegistrationError::Nil);
        };

        let (capability, slot) = match item {
            Registration::Producer(producer) => {
                let capability = producer.signature().validate_producer(producer.name())?;
                debug!("注册生产者: {} -> {}", producer.name(), capability);
                self.pending += 1;
                (capability, Slot::Pending(producer))
            }
            Registration::Instance(instance) => {
                let capability = instance
                    .capability_type()
                    .ok_or_else(|| RegistrationError::UnsupportedItem {
                        type_name: instance.shape().to_string(),
                    })?;
                debug!("注册实例: {}", capability);
                self.instances += 1;
                (capability, Slot::Built(instance))
            }
        };

        self.insert(capability, slot);
        Ok(())
    }

    fn build(self) -> Result<ResolvedGraph, Vec<DependencyError>> {
        self.resolve()
    }
}
