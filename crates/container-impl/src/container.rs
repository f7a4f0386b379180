//! 组件容器
//!
//! 容器是显式传递的实例，持有定义存储、活体实例缓存与外部协作者。
//! 不提供任何全局单例入口。

use crate::config::ContainerConfig;
use crate::store::DefinitionStore;
use container_abstractions::{
    ClassActivator, ClassIntrospector, ComponentRef, NoAmbientValues, ScopeValueProvider,
};
use container_common::InstanceDefinition;
use std::collections::HashMap;
use std::sync::Arc;

/// 组件容器
///
/// 单线程同步使用：一个容器实例属于一个进程/请求生命周期，
/// 缓存与定义映射的生命周期与一次加载的存储一致。
pub struct ComponentContainer {
    pub(crate) config: ContainerConfig,
    pub(crate) store: DefinitionStore,
    /// 活体实例缓存；仅整体重载时清空，不做单条失效
    pub(crate) cache: HashMap<String, ComponentRef>,
    /// 构造中的实例名称栈，用于构造参数循环检测
    pub(crate) in_progress: Vec<String>,
    pub(crate) anonymous_counter: u64,
    pub(crate) activator: Arc<dyn ClassActivator>,
    pub(crate) introspector: Arc<dyn ClassIntrospector>,
    pub(crate) scopes: Arc<dyn ScopeValueProvider>,
}

impl ComponentContainer {
    /// 创建新容器
    pub fn new(
        activator: Arc<dyn ClassActivator>,
        introspector: Arc<dyn ClassIntrospector>,
    ) -> Self {
        Self {
            config: ContainerConfig::default(),
            store: DefinitionStore::new(),
            cache: HashMap::new(),
            in_progress: Vec::new(),
            anonymous_counter: 0,
            activator,
            introspector,
            scopes: Arc::new(NoAmbientValues),
        }
    }

    /// 配置环境作用域取值提供者
    pub fn with_scopes(mut self, scopes: Arc<dyn ScopeValueProvider>) -> Self {
        self.scopes = scopes;
        self
    }

    /// 覆盖容器配置
    pub fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    /// 只读访问定义存储
    pub fn store(&self) -> &DefinitionStore {
        &self.store
    }

    /// 按名称取定义
    pub fn definition(&self, name: &str) -> Option<&InstanceDefinition> {
        self.store.get(name)
    }

    /// 已缓存的活体实例数量
    pub fn resolved_count(&self) -> usize {
        self.cache.len()
    }
}

impl std::fmt::Debug for ComponentContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentContainer")
            .field("config", &self.config)
            .field("definitions", &self.store.len())
            .field("resolved", &self.cache.len())
            .finish()
    }
}
