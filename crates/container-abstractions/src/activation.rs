//! 类实例化能力抽象接口
//!
//! 容器自身不做类加载：给定类名与按序的构造参数值，
//! 由外部协作者产出新实例。

use crate::component::{ComponentRef, ResolvedValue};
use container_common::ActivationResult;

/// 类实例化能力 trait
pub trait ClassActivator: Send + Sync {
    /// 按类名与有序构造参数创建新实例
    ///
    /// 未知类名返回 [`ClassNotFound`](container_common::ActivationError::ClassNotFound)，
    /// 参数与构造函数不符返回
    /// [`ConstructorMismatch`](container_common::ActivationError::ConstructorMismatch)。
    fn instantiate(
        &self,
        class_name: &str,
        args: Vec<ResolvedValue>,
    ) -> ActivationResult<ComponentRef>;

    /// 类名是否可实例化
    fn class_exists(&self, class_name: &str) -> bool;
}
