//! 定义存储
//!
//! 实例名称到声明式定义的权威映射。键为唯一名称，
//! 迭代顺序即名称的全字典序，持久化编解码直接复用该顺序。

use container_common::InstanceDefinition;
use std::collections::BTreeMap;

/// 定义存储
#[derive(Debug, Default, Clone)]
pub struct DefinitionStore {
    definitions: BTreeMap<String, InstanceDefinition>,
}

impl DefinitionStore {
    /// 创建空存储
    pub fn new() -> Self {
        Self::default()
    }

    /// 定义数量
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// 名称是否已声明
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// 按名称取定义
    pub fn get(&self, name: &str) -> Option<&InstanceDefinition> {
        self.definitions.get(name)
    }

    /// 按名称取可变定义
    pub fn get_mut(&mut self, name: &str) -> Option<&mut InstanceDefinition> {
        self.definitions.get_mut(name)
    }

    /// 写入定义，返回被替换的旧定义
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        definition: InstanceDefinition,
    ) -> Option<InstanceDefinition> {
        self.definitions.insert(name.into(), definition)
    }

    /// 删除定义
    pub fn remove(&mut self, name: &str) -> Option<InstanceDefinition> {
        self.definitions.remove(name)
    }

    /// 按名称字典序迭代
    pub fn iter(&self) -> impl Iterator<Item = (&String, &InstanceDefinition)> {
        self.definitions.iter()
    }

    /// 按名称字典序可变迭代
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut InstanceDefinition)> {
        self.definitions.iter_mut()
    }

    /// 按字典序迭代全部名称
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    /// 直接引用指定名称的定义名称，按字典序
    pub fn referencing(&self, name: &str) -> Vec<&str> {
        self.definitions
            .iter()
            .filter(|(_, def)| def.references(name))
            .map(|(owner, _)| owner.as_str())
            .collect()
    }

    /// 用新的映射整体替换现有定义
    pub fn replace_all(&mut self, definitions: BTreeMap<String, InstanceDefinition>) {
        self.definitions = definitions;
    }

    /// 导出定义映射的副本
    pub fn to_map(&self) -> BTreeMap<String, InstanceDefinition> {
        self.definitions.clone()
    }
}
