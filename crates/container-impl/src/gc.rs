//! 垃圾回收
//!
//! 对声明图做标记-清除式可达性回收：根为全部非弱定义，沿构造参数、
//! 字段与设值方法绑定中的引用外扩；未被标记的弱定义在清除阶段删除。
//! 该回收是宿主语言内存管理之外的手工方案，按批次在持久化之前执行，
//! 编辑之间的瞬时过度保留是预期行为。

use crate::container::ComponentContainer;
use std::collections::HashSet;
use tracing::{debug, info};

impl ComponentContainer {
    /// 执行一轮标记-清除回收，返回被删除的实例名称（字典序）
    ///
    /// 标记集仅存在于本次调用栈上，不进入定义，也就不可能泄漏到
    /// 持久化输出。已标记的定义不会被重复外扩，引用环上也保证终止。
    pub fn collect_garbage(&mut self) -> Vec<String> {
        let mut marked: HashSet<String> = HashSet::new();
        let mut worklist: Vec<String> = self
            .store
            .iter()
            .filter(|(_, def)| !def.weak)
            .map(|(name, _)| name.clone())
            .collect();

        for root in &worklist {
            marked.insert(root.clone());
        }

        while let Some(name) = worklist.pop() {
            let Some(definition) = self.store.get(&name) else {
                // 悬空引用在解析期才报错，回收期直接跳过
                continue;
            };
            let targets: Vec<String> = definition
                .referenced_names()
                .into_iter()
                .map(str::to_string)
                .collect();
            for target in targets {
                if marked.insert(target.clone()) {
                    worklist.push(target);
                }
            }
        }

        let doomed: Vec<String> = self
            .store
            .names()
            .filter(|name| !marked.contains(*name))
            .map(str::to_string)
            .collect();
        for name in &doomed {
            debug!("回收不可达弱实例: {}", name);
            self.store.remove(name);
        }

        info!("垃圾回收完成, 移除 {} 个实例", doomed.len());
        doomed
    }
}
