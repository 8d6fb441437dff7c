//! 函数签名
//!
//! 描述生产者和消费者的声明输入输出，并提供注册时的形状校验

use crate::errors::RegistrationError;
use crate::metadata::{CapabilityType, TypeShape};
use std::fmt;

/// 函数的声明签名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// 声明的输入
    pub inputs: Vec<TypeShape>,
    /// 声明的输出
    pub outputs: Vec<TypeShape>,
}

impl Signature {
    /// 创建新的签名
    pub fn new(inputs: Vec<TypeShape>, outputs: Vec<TypeShape>) -> Self {
        Self { inputs, outputs }
    }

    /// 生产者产出的能力类型
    ///
    /// 输出必须是 1 个能力类型，外加可选的错误信号
    pub fn produced_capability(&self) -> Option<CapabilityType> {
        match self.outputs.as_slice() {
            [TypeShape::Capability(capability)] | [TypeShape::Capability(capability), TypeShape::Error] => {
                Some(*capability)
            }
            _ => None,
        }
    }

    /// 第一个无法注入的输入（位置和形状）
    pub fn first_uninjectable_input(&self) -> Option<(usize, TypeShape)> {
        self.inputs
            .iter()
            .enumerate()
            .find(|(_, shape)| !shape.is_injectable())
            .map(|(position, shape)| (position, *shape))
    }

    /// 所有输入都可以由注册表提供
    pub fn can_provide_for(&self) -> bool {
        self.first_uninjectable_input().is_none()
    }

    /// 按生产者规则校验签名，返回产出的能力类型
    pub fn validate_producer(&self, producer: &str) -> Result<CapabilityType, RegistrationError> {
        let capability = self
            .produced_capability()
            .ok_or_else(|| RegistrationError::InvalidOutputShape {
                producer: producer.to_string(),
                outputs: format_shapes(&self.outputs),
            })?;

        if let Some((position, shape)) = self.first_uninjectable_input() {
            return Err(RegistrationError::InvalidInputShape {
                producer: producer.to_string(),
                position,
                shape: shape.to_string(),
            });
        }

        Ok(capability)
    }

    /// 输入涉及的能力类型（按声明顺序，可能重复）
    pub fn input_capabilities(&self) -> Vec<CapabilityType> {
        self.inputs.iter().filter_map(TypeShape::capability_type).collect()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn({}) -> {}", format_shapes(&self.inputs), format_shapes(&self.outputs))
    }
}

fn format_shapes(shapes: &[TypeShape]) -> String {
    let joined = shapes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    match shapes.len() {
        1 => joined,
        _ => format!("({joined})"),
    }
}
