//! 元数据定义
//!
//! 提供能力类型和声明形状的元数据信息

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// 能力类型
///
/// 注册表中的键。通常是 `dyn Trait`，也可以是任意 `'static` 类型。
#[derive(Debug, Clone, Copy)]
pub struct CapabilityType {
    /// 类型ID
    id: TypeId,
    /// 完整类型名称
    name: &'static str,
}

impl CapabilityType {
    /// 从类型获取能力类型
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// 类型ID
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// 完整类型名称
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> &'static str {
        let name = self.name.strip_prefix("dyn ").unwrap_or(self.name);
        name.rsplit("::").next().unwrap_or(name)
    }
}

impl PartialEq for CapabilityType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CapabilityType {}

impl Hash for CapabilityType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for CapabilityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// 声明形状
///
/// 描述函数参数或返回值在依赖解析中的角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeShape {
    /// 单个能力类型
    Capability(CapabilityType),
    /// 能力类型的有序集合
    Collection(CapabilityType),
    /// 错误信号
    Error,
    /// 其他无法注入的类型
    Other(&'static str),
}

impl TypeShape {
    /// 能力类型形状
    pub fn capability<T: ?Sized + 'static>() -> Self {
        Self::Capability(CapabilityType::of::<T>())
    }

    /// 集合形状
    pub fn collection<T: ?Sized + 'static>() -> Self {
        Self::Collection(CapabilityType::of::<T>())
    }

    /// 其他类型形状
    pub fn other<T: ?Sized + 'static>() -> Self {
        Self::Other(std::any::type_name::<T>())
    }

    /// 是否可以由注册表提供
    pub fn is_injectable(&self) -> bool {
        matches!(self, Self::Capability(_) | Self::Collection(_))
    }

    /// 涉及的能力类型
    pub fn capability_type(&self) -> Option<CapabilityType> {
        match self {
            Self::Capability(capability) | Self::Collection(capability) => Some(*capability),
            Self::Error | Self::Other(_) => None,
        }
    }
}

impl fmt::Display for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Capability(capability) => write!(f, "{capability}"),
            Self::Collection(capability) => write!(f, "Vec<{capability}>"),
            Self::Error => f.write_str("error"),
            Self::Other(name) => f.write_str(name),
        }
    }
}
