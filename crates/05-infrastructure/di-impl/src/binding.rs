//! 参数绑定
//!
//! 解析阶段和调用阶段共用同一套查找规则：
//! 先精确匹配，再把单个值提升为单元素集合。

use infrastructure_common::{Binding, DependencyError, Instance, TypeShape};

/// 某个能力类型在注册表中的当前状态
#[derive(Debug, Clone, Copy)]
pub(crate) enum EntryView<'a> {
    /// 单个已构建的值
    Single(&'a Instance),
    /// 已完成的集合
    Sequence(&'a [Instance]),
    /// 单个生产者，尚未调用
    Unbuilt,
    /// 集合中还有未调用的生产者
    Incomplete(usize),
}

/// 绑定失败
#[derive(Debug)]
pub(crate) enum Unavailable {
    /// 后续轮次可能满足
    NotReady(String),
    /// 任何后续轮次都无法满足
    Fatal(DependencyError),
}

impl Unavailable {
    pub(crate) fn into_error(self, shape: &TypeShape) -> DependencyError {
        match self {
            Self::NotReady(_) => DependencyError::MissingDependency {
                type_name: shape.to_string(),
            },
            Self::Fatal(error) => error,
        }
    }
}

/// 为声明形状查找绑定
pub(crate) fn bind(shape: &TypeShape, view: Option<EntryView<'_>>) -> Result<Binding, Unavailable> {
    let missing = || {
        Unavailable::Fatal(DependencyError::MissingDependency {
            type_name: shape.to_string(),
        })
    };
    let Some(view) = view else {
        return Err(missing());
    };

    match (shape, view) {
        (TypeShape::Capability(_), EntryView::Single(instance)) => Ok(Binding::Single(instance.clone())),
        (TypeShape::Capability(_), EntryView::Sequence(items)) => Err(ambiguous(shape, items.len())),
        (TypeShape::Capability(_), EntryView::Incomplete(count)) => Err(ambiguous(shape, count)),
        (TypeShape::Collection(_), EntryView::Sequence(items)) => Ok(Binding::Collection(items.to_vec())),
        (TypeShape::Collection(_), EntryView::Single(instance)) => {
            Ok(Binding::Collection(vec![instance.clone()]))
        }
        (TypeShape::Collection(_), EntryView::Incomplete(_)) => {
            Err(Unavailable::NotReady(format!("集合尚未完成, 类型: {shape}")))
        }
        (TypeShape::Capability(_) | TypeShape::Collection(_), EntryView::Unbuilt) => {
            Err(Unavailable::NotReady(format!("输入尚未构建, 类型: {shape}")))
        }
        (TypeShape::Error | TypeShape::Other(_), _) => Err(missing()),
    }
}

fn ambiguous(shape: &TypeShape, count: usize) -> Unavailable {
    Unavailable::Fatal(DependencyError::AmbiguousDependency {
        type_name: shape.to_string(),
        count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    trait Probe: Send + Sync {}

    struct Ping;

    impl Probe for Ping {}

    fn probe() -> Instance {
        let value: Arc<dyn Probe> = Arc::new(Ping);
        Instance::of(value)
    }

    #[test]
    fn test_exact_and_promoted_bindings() {
        let instance = probe();
        let single = bind(&TypeShape::capability::<dyn Probe>(), Some(EntryView::Single(&instance)));
        assert!(matches!(single, Ok(Binding::Single(_))));

        let promoted = bind(&TypeShape::collection::<dyn Probe>(), Some(EntryView::Single(&instance)));
        assert!(matches!(promoted, Ok(Binding::Collection(ref items)) if items.len() == 1));

        let items = vec![probe(), probe()];
        let sequence = bind(&TypeShape::collection::<dyn Probe>(), Some(EntryView::Sequence(&items)));
        assert!(matches!(sequence, Ok(Binding::Collection(ref items)) if items.len() == 2));
    }

    #[test]
    fn test_unavailable_bindings() {
        let shape = TypeShape::capability::<dyn Probe>();
        assert!(matches!(bind(&shape, None), Err(Unavailable::Fatal(DependencyError::MissingDependency { .. }))));
        assert!(matches!(bind(&shape, Some(EntryView::Unbuilt)), Err(Unavailable::NotReady(_))));
        assert!(matches!(
            bind(&shape, Some(EntryView::Incomplete(3))),
            Err(Unavailable::Fatal(DependencyError::AmbiguousDependency { count: 3, .. }))
        ));

        let collection = TypeShape::collection::<dyn Probe>();
        assert!(matches!(bind(&collection, Some(EntryView::Incomplete(2))), Err(Unavailable::NotReady(_))));
        assert!(matches!(bind(&collection, Some(EntryView::Unbuilt)), Err(Unavailable::NotReady(_))));
    }

    #[test]
    fn test_missing_message_names_type() {
        let shape = TypeShape::collection::<dyn Probe>();
        let error = bind(&shape, None).unwrap_err().into_error(&shape);
        assert!(error.to_string().contains("Vec<dyn"));
        assert!(error.to_string().contains("Probe>"));
    }
}
