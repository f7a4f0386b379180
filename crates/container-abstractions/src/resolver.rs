//! 实例解析器抽象接口

use crate::component::ComponentRef;
use container_common::ResolutionResult;

/// 实例解析器 trait
///
/// 按名称惰性解析活体实例；同一缓存生命周期内重复调用
/// 返回同一实例身份。
pub trait InstanceResolver {
    /// 返回缓存的活体实例，必要时先实例化并缓存
    fn get(&mut self, name: &str) -> ResolutionResult<ComponentRef>;

    /// 名称是否已有缓存的活体实例
    fn is_resolved(&self, name: &str) -> bool;
}
