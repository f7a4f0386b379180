//! 生成的访问器表面
//!
//! 为每个可寻址的非匿名定义生成一个唯一符号，全部委托给活体容器的
//! `get(name)`：身份与缓存语义不变，只是寻址机制不同。表面是显式
//! 构造、显式传递的值，不是全局单例。

use crate::container::ComponentContainer;
use crate::store::DefinitionStore;
use container_abstractions::{ComponentRef, InstanceResolver};
use container_common::{ResolutionError, ResolutionResult};
use heck::ToSnakeCase;
use std::collections::BTreeMap;
use tracing::debug;

/// 访问器表面：符号到实例名称的确定性映射
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessorSurface {
    accessors: BTreeMap<String, String>,
}

impl AccessorSurface {
    /// 从存储生成访问器表面
    ///
    /// 按名称字典序处理，匿名定义跳过；符号冲突追加数字消歧后缀，
    /// 因此同一存储总是生成同一映射。
    pub fn generate(store: &DefinitionStore) -> Self {
        let mut accessors: BTreeMap<String, String> = BTreeMap::new();
        for (name, definition) in store.iter() {
            if definition.anonymous {
                continue;
            }
            let base = accessor_symbol(name);
            let mut symbol = base.clone();
            let mut suffix = 2u32;
            while accessors.contains_key(&symbol) {
                symbol = format!("{base}_{suffix}");
                suffix += 1;
            }
            debug!("生成访问器: {} -> {}", symbol, name);
            accessors.insert(symbol, name.clone());
        }
        Self { accessors }
    }

    /// 访问器数量
    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }

    /// 按字典序迭代全部符号
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.accessors.keys().map(String::as_str)
    }

    /// 符号指向的实例名称
    pub fn target(&self, symbol: &str) -> Option<&str> {
        self.accessors.get(symbol).map(String::as_str)
    }

    /// 经由符号解析实例，等价于对目标名称调用 `get`
    pub fn resolve(
        &self,
        container: &mut ComponentContainer,
        symbol: &str,
    ) -> ResolutionResult<ComponentRef> {
        let name = self
            .accessors
            .get(symbol)
            .ok_or_else(|| ResolutionError::InstanceNotFound {
                name: symbol.to_string(),
            })?;
        container.get(name)
    }
}

/// 实例名称到访问器符号
fn accessor_symbol(name: &str) -> String {
    let snake = name.to_snake_case();
    if snake.is_empty() {
        "get_instance".to_string()
    } else {
        format!("get_{snake}")
    }
}
