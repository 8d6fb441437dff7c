//! 参数解析抽象接口
//!
//! 提供函数参数与已解析值之间的绑定能力

use infrastructure_common::{Binding, Capability, DependencyError, Instance, TypeShape};
use std::sync::Arc;

/// 可注入参数 trait
///
/// 只有两种参数形状：单个能力 `Arc<T>` 或能力集合 `Vec<Arc<T>>`
pub trait Dependency: Sized + 'static {
    /// 参数的声明形状
    fn shape() -> TypeShape;

    /// 从绑定中还原参数值
    fn from_binding(binding: Binding) -> Option<Self>;

    /// 从按顺序提供的绑定中取出参数值
    fn extract(binding: Option<Binding>) -> Result<Self, DependencyError> {
        binding
            .and_then(Self::from_binding)
            .ok_or_else(|| DependencyError::BindingMismatch {
                type_name: Self::shape().to_string(),
            })
    }
}

impl<T: ?Sized + Capability> Dependency for Arc<T> {
    fn shape() -> TypeShape {
        TypeShape::capability::<T>()
    }

    fn from_binding(binding: Binding) -> Option<Self> {
        match binding {
            Binding::Single(instance) => instance.downcast::<T>(),
            Binding::Collection(_) => None,
        }
    }
}

impl<T: ?Sized + Capability> Dependency for Vec<Arc<T>> {
    fn shape() -> TypeShape {
        TypeShape::collection::<T>()
    }

    fn from_binding(binding: Binding) -> Option<Self> {
        match binding {
            Binding::Collection(items) => items.iter().map(Instance::downcast::<T>).collect(),
            Binding::Single(instance) => instance.downcast::<T>().map(|value| vec![value]),
        }
    }
}

/// 消费者 trait
///
/// 参数全部是 [`Dependency`] 的 `FnOnce` 函数都自动实现此 trait
pub trait Consumer<Args>: Sized {
    /// 函数返回值
    type Output;

    /// 声明的参数形状（按参数顺序）
    fn parameters() -> Vec<TypeShape>;

    /// 以绑定好的参数调用函数
    fn consume(self, bindings: Vec<Binding>) -> Result<Self::Output, DependencyError>;
}

macro_rules! impl_consumer {
    ($($ty:ident),*) => {
        impl<F, R, $($ty,)*> Consumer<($($ty,)*)> for F
        where
            F: FnOnce($($ty),*) -> R,
            $($ty: Dependency,)*
        {
            type Output = R;

            fn parameters() -> Vec<TypeShape> {
                vec![$($ty::shape()),*]
            }

            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn consume(self, bindings: Vec<Binding>) -> Result<R, DependencyError> {
                let mut bindings = bindings.into_iter();
                $(let $ty = $ty::extract(bindings.next())?;)*
                Ok(self($($ty),*))
            }
        }
    };
}

all_the_arities!(impl_consumer);
