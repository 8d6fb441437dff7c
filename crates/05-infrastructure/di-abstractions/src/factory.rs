//! 生产者抽象接口
//!
//! 提供构造能力值的生产者支持

use crate::resolver::Dependency;
use infrastructure_common::{BoxError, Binding, Capability, Instance, Signature, TypeShape};
use std::marker::PhantomData;
use std::sync::Arc;

/// 生产者 trait
///
/// 构造一个能力值，可以依赖其他能力值。调用会消耗生产者本身，
/// 因此每个生产者最多被调用一次。
pub trait Producer: Send {
    /// 生产者名称（用于诊断信息）
    fn name(&self) -> &str;

    /// 声明的签名
    fn signature(&self) -> Signature;

    /// 以按签名顺序绑定好的输入构造能力值
    ///
    /// 返回 `Ok(None)` 表示生产者返回了空值
    fn produce(self: Box<Self>, inputs: Vec<Binding>) -> Result<Option<Instance>, BoxError>;
}

/// 生产者返回值 trait
pub trait ProducerOutput: 'static {
    /// 声明的输出形状
    fn outputs() -> Vec<TypeShape>;

    /// 转换为类型擦除的实例
    fn into_instance(self) -> Result<Option<Instance>, BoxError>;
}

impl<T: ?Sized + Capability> ProducerOutput for Arc<T> {
    fn outputs() -> Vec<TypeShape> {
        vec![TypeShape::capability::<T>()]
    }

    fn into_instance(self) -> Result<Option<Instance>, BoxError> {
        Ok(Some(Instance::of(self)))
    }
}

impl<T: ?Sized + Capability> ProducerOutput for Option<Arc<T>> {
    fn outputs() -> Vec<TypeShape> {
        vec![TypeShape::capability::<T>()]
    }

    fn into_instance(self) -> Result<Option<Instance>, BoxError> {
        Ok(self.map(Instance::of))
    }
}

impl<T, E> ProducerOutput for Result<Arc<T>, E>
where
    T: ?Sized + Capability,
    E: Into<BoxError> + 'static,
{
    fn outputs() -> Vec<TypeShape> {
        vec![TypeShape::capability::<T>(), TypeShape::Error]
    }

    fn into_instance(self) -> Result<Option<Instance>, BoxError> {
        self.map(|value| Some(Instance::of(value))).map_err(Into::into)
    }
}

impl<T, E> ProducerOutput for Result<Option<Arc<T>>, E>
where
    T: ?Sized + Capability,
    E: Into<BoxError> + 'static,
{
    fn outputs() -> Vec<TypeShape> {
        vec![TypeShape::capability::<T>(), TypeShape::Error]
    }

    fn into_instance(self) -> Result<Option<Instance>, BoxError> {
        self.map(|value| value.map(Instance::of)).map_err(Into::into)
    }
}

/// 可以转换为生产者的函数
pub trait IntoProducer<Args> {
    /// 转换为生产者
    fn into_producer(self) -> Box<dyn Producer>;
}

/// 函数生产者包装器
pub struct FnProducer<F, Args> {
    factory_fn: F,
    args: PhantomData<fn() -> Args>,
}

impl<F, Args> FnProducer<F, Args> {
    /// 创建新的函数生产者
    pub fn new(factory_fn: F) -> Self {
        Self {
            factory_fn,
            args: PhantomData,
        }
    }
}

macro_rules! impl_fn_producer {
    ($($ty:ident),*) => {
        impl<F, R, $($ty,)*> Producer for FnProducer<F, ($($ty,)*)>
        where
            F: FnOnce($($ty),*) -> R + Send + 'static,
            R: ProducerOutput,
            $($ty: Dependency,)*
        {
            fn name(&self) -> &str {
                std::any::type_name::<F>()
            }

            fn signature(&self) -> Signature {
                Signature::new(vec![$($ty::shape()),*], R::outputs())
            }

            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn produce(self: Box<Self>, inputs: Vec<Binding>) -> Result<Option<Instance>, BoxError> {
                let mut inputs = inputs.into_iter();
                $(let $ty = $ty::extract(inputs.next())?;)*
                (self.factory_fn)($($ty),*).into_instance()
            }
        }

        impl<F, R, $($ty,)*> IntoProducer<($($ty,)*)> for F
        where
            F: FnOnce($($ty),*) -> R + Send + 'static,
            R: ProducerOutput,
            $($ty: Dependency,)*
        {
            fn into_producer(self) -> Box<dyn Producer> {
                Box::new(FnProducer::<F, ($($ty,)*)>::new(self))
            }
        }
    };
}

all_the_arities!(impl_fn_producer);
