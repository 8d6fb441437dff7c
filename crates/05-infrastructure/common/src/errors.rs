//! 错误类型定义

use thiserror::Error;

/// 生产者或被调用函数返回的错误
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 注册错误类型
///
/// 在注册时同步返回，注册表状态不会被修改
#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("不能注册空项")]
    Nil,

    #[error("生产者输出形状无效: {producer}, 必须返回 1 个能力类型和可选的错误, 实际返回: {outputs}")]
    InvalidOutputShape { producer: String, outputs: String },

    #[error("生产者输入形状无效: {producer}, 第 {position} 个参数 {shape} 既不是能力类型也不是能力类型的集合")]
    InvalidInputShape {
        producer: String,
        position: usize,
        shape: String,
    },

    #[error("无效的注册项: {type_name}, 需要能力类型的实例或返回能力类型的生产者")]
    UnsupportedItem { type_name: String },
}

/// 依赖解析错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("没有所需类型的值: {type_name}")]
    MissingDependency { type_name: String },

    #[error("所需类型注册了 {count} 个值, 无法作为单个值提供: {type_name}")]
    AmbiguousDependency { type_name: String, count: usize },

    #[error("无法解析生产者: {producer}, 类型: {type_name}, 原因: {reason}")]
    Unresolved {
        producer: String,
        type_name: String,
        reason: String,
    },

    #[error("生产者执行失败: {producer}, 原因: {source}")]
    ProducerFailed {
        producer: String,
        type_name: String,
        source: BoxError,
    },

    #[error("生产者返回了空值: {producer}, 类型: {type_name}")]
    NilOutput { producer: String, type_name: String },

    #[error("生产者返回值类型不匹配: {producer}, 期望 {expected}, 实际 {actual}")]
    InvalidOutput {
        producer: String,
        expected: String,
        actual: String,
    },

    #[error("循环依赖检测到: {dependency_chain}")]
    CircularDependency { dependency_chain: String },

    #[error("参数绑定失败: {type_name}")]
    BindingMismatch { type_name: String },
}

impl DependencyError {
    /// 是否是使整个构建立即失败的错误
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Unresolved { .. } | Self::CircularDependency { .. })
    }
}

/// 调用错误类型
#[derive(Error, Debug)]
pub enum InvocationError {
    #[error("无法提供参数: {source}")]
    Unbound {
        #[from]
        source: DependencyError,
    },

    #[error("函数执行失败: {source}")]
    Failed { source: BoxError },
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置解析失败: {source}")]
    ParseError { source: BoxError },
}

/// 结果类型别名
pub type RegistrationResult<T> = Result<T, RegistrationError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type InvocationResult<T> = Result<T, InvocationError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
