//! 受管组件抽象接口
//!
//! 动态按名注入被重构为一组小的能力 trait：实现方在编译期
//! 提供名称到字段/设值方法的分发，容器不依赖宿主的动态派发。

use container_common::InjectionResult;
use serde_json::Value;
use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

/// 可按名注入字段的组件
pub trait FieldInjectable {
    /// 注入指定字段
    ///
    /// 组件在注册进缓存之后才会被注入，因此实现方需要内部可变性。
    fn set_field(&self, field: &str, value: ResolvedValue) -> InjectionResult<()>;
}

/// 可按名调用设值方法的组件
pub trait SetterInjectable {
    /// 调用指定设值方法
    fn invoke_setter(&self, setter: &str, value: ResolvedValue) -> InjectionResult<()>;
}

/// 受管组件 trait
///
/// 容器缓存中的活体实例统一以 `Arc<dyn ManagedComponent>` 持有。
pub trait ManagedComponent: FieldInjectable + SetterInjectable + Any + Send + Sync + Debug {
    /// 向下转型入口
    fn as_any(&self) -> &dyn Any;
}

/// 活体实例别名
pub type ComponentRef = Arc<dyn ManagedComponent>;

/// 绑定解析后的注入值
#[derive(Debug, Clone)]
pub enum ResolvedValue {
    /// 字面量值（作用域查找缺失时为 null）
    Literal(Value),
    /// 已解析的实例引用
    Object(ComponentRef),
    /// 有序的键到已解析实例（或空槽）的列表
    ObjectList(Vec<(String, Option<ComponentRef>)>),
}

impl ResolvedValue {
    /// 空字面量值
    pub fn null() -> Self {
        Self::Literal(Value::Null)
    }

    /// 取字面量值
    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            Self::Literal(value) => Some(value),
            _ => None,
        }
    }

    /// 取实例引用
    pub fn as_object(&self) -> Option<&ComponentRef> {
        match self {
            Self::Object(instance) => Some(instance),
            _ => None,
        }
    }

    /// 消耗自身并取实例引用
    pub fn into_object(self) -> Option<ComponentRef> {
        match self {
            Self::Object(instance) => Some(instance),
            _ => None,
        }
    }

    /// 消耗自身并取实例列表
    pub fn into_object_list(self) -> Option<Vec<(String, Option<ComponentRef>)>> {
        match self {
            Self::ObjectList(entries) => Some(entries),
            _ => None,
        }
    }

    /// 是否为空字面量
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Literal(Value::Null))
    }
}
