//! 组件值定义
//!
//! 提供注册表中存放的类型擦除值以及解析后的参数绑定

use crate::metadata::{CapabilityType, TypeShape};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 能力 trait
///
/// 任何可以跨线程共享的 `'static` 类型（包括 `dyn Trait`）都可以作为能力类型
pub trait Capability: Send + Sync + 'static {}

impl<T: ?Sized + Send + Sync + 'static> Capability for T {}

/// 类型擦除的具体值
///
/// 内部保存的是 `Arc<T>`，克隆只增加引用计数
#[derive(Clone)]
pub struct Instance {
    /// 声明形状
    shape: TypeShape,
    /// 实际值（`Arc<T>` 被装入 `Any`）
    value: Arc<dyn Any + Send + Sync>,
}

impl Instance {
    /// 从能力值创建实例
    pub fn of<T: ?Sized + Capability>(value: Arc<T>) -> Self {
        Self {
            shape: TypeShape::capability::<T>(),
            value: Arc::new(value),
        }
    }

    /// 创建不满足任何能力类型的实例
    ///
    /// 这样的实例可以构造，但会被注册表拒绝
    pub fn opaque<V: Any + Send + Sync>(value: V) -> Self {
        Self {
            shape: TypeShape::other::<V>(),
            value: Arc::new(value),
        }
    }

    /// 声明形状
    pub fn shape(&self) -> TypeShape {
        self.shape
    }

    /// 能力类型（仅当实例是能力值时存在）
    pub fn capability_type(&self) -> Option<CapabilityType> {
        match self.shape {
            TypeShape::Capability(capability) => Some(capability),
            _ => None,
        }
    }

    /// 还原为具体的 `Arc<T>`
    pub fn downcast<T: ?Sized + Capability>(&self) -> Option<Arc<T>> {
        self.value.downcast_ref::<Arc<T>>().cloned()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("shape", &self.shape)
            .field("value", &"<erased>")
            .finish()
    }
}

/// 参数绑定
///
/// 为一个声明参数解析出来的值
#[derive(Debug, Clone)]
pub enum Binding {
    /// 单个能力值
    Single(Instance),
    /// 按注册顺序排列的能力值集合
    Collection(Vec<Instance>),
}

impl Binding {
    /// 绑定中值的数量
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Collection(items) => items.len(),
        }
    }

    /// 是否为空集合
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
