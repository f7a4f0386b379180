//! 持久化编解码
//!
//! 把定义存储确定性地序列化为自描述 JSON 快照：外部定义（归他方
//! 所有）被排除，幸存定义按名称全字典序输出，独立并发编辑下的
//! 差异噪音最小。加载反向执行：整体替换定义映射并使活体实例缓存
//! 全部失效。

use crate::container::ComponentContainer;
use crate::store::DefinitionStore;
use container_common::{InstanceDefinition, PersistenceError, PersistenceResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

/// 快照格式标签
pub const SNAPSHOT_FORMAT: &str = "declarative-container-store";
/// 当前快照版本
pub const SNAPSHOT_VERSION: u32 = 1;

/// 定义存储快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// 格式标签，自描述用
    pub format: String,
    /// 格式版本
    pub version: u32,
    /// 非外部定义映射，键序即输出序
    pub instances: BTreeMap<String, InstanceDefinition>,
}

impl StoreSnapshot {
    /// 从存储捕获快照，排除外部定义
    pub fn capture(store: &DefinitionStore) -> Self {
        let instances = store
            .iter()
            .filter(|(_, def)| !def.external)
            .map(|(name, def)| (name.clone(), def.clone()))
            .collect();
        Self {
            format: SNAPSHOT_FORMAT.to_string(),
            version: SNAPSHOT_VERSION,
            instances,
        }
    }

    /// 校验格式标签与版本
    pub fn validate(&self) -> PersistenceResult<()> {
        if self.format != SNAPSHOT_FORMAT || self.version != SNAPSHOT_VERSION {
            return Err(PersistenceError::UnsupportedSnapshot {
                format: self.format.clone(),
                version: self.version,
            });
        }
        Ok(())
    }
}

impl ComponentContainer {
    /// 捕获当前存储的快照（不触发垃圾回收）
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot::capture(&self.store)
    }

    /// 序列化当前存储为 JSON 文本
    pub fn snapshot_json(&self) -> PersistenceResult<String> {
        let snapshot = self.snapshot();
        let text = if self.config.pretty_snapshots {
            serde_json::to_string_pretty(&snapshot)?
        } else {
            serde_json::to_string(&snapshot)?
        };
        Ok(text)
    }

    /// 把当前存储写入快照文件
    ///
    /// 目标（或目标尚不存在时其所在目录）不可写则返回
    /// [`WriteDenied`](PersistenceError::WriteDenied)。文件句柄为
    /// 作用域值，任何退出路径（包括失败）都保证释放。
    pub fn write_snapshot_file(&self, path: &Path) -> PersistenceResult<()> {
        ensure_writable(path)?;
        let snapshot = self.snapshot();
        let text = if self.config.pretty_snapshots {
            serde_json::to_string_pretty(&snapshot)?
        } else {
            serde_json::to_string(&snapshot)?
        };
        fs::write(path, text).map_err(|err| deny_on_permission(err, path))?;
        info!(
            "写入快照: {} ({} 个定义)",
            path.display(),
            snapshot.instances.len()
        );
        Ok(())
    }

    /// 持久化前的批处理：先垃圾回收再写快照，返回被回收的名称
    pub fn collect_and_write(&mut self, path: &Path) -> PersistenceResult<Vec<String>> {
        let removed = self.collect_garbage();
        self.write_snapshot_file(path)?;
        Ok(removed)
    }

    /// 用快照整体替换定义映射并清空活体实例缓存
    ///
    /// 重载即新的缓存纪元：此前取得的活体实例按调用方约定视为过期。
    pub fn load_snapshot(&mut self, snapshot: StoreSnapshot) -> PersistenceResult<()> {
        snapshot.validate()?;
        let mut instances = snapshot.instances;
        for definition in instances.values_mut() {
            definition.normalize();
        }
        debug!("加载快照: {} 个定义", instances.len());
        self.store.replace_all(instances);
        self.cache.clear();
        self.in_progress.clear();
        Ok(())
    }

    /// 从 JSON 文本加载快照
    pub fn load_snapshot_json(&mut self, text: &str) -> PersistenceResult<()> {
        let snapshot: StoreSnapshot = serde_json::from_str(text)?;
        self.load_snapshot(snapshot)
    }

    /// 从快照文件加载
    pub fn load_snapshot_file(&mut self, path: &Path) -> PersistenceResult<()> {
        let text = fs::read_to_string(path)?;
        debug!("读取快照: {}", path.display());
        self.load_snapshot_json(&text)
    }
}

/// 写入前检查目标可写性
fn ensure_writable(path: &Path) -> PersistenceResult<()> {
    let deny = || PersistenceError::WriteDenied {
        path: path.display().to_string(),
    };

    if path.exists() {
        let metadata = fs::metadata(path)?;
        if metadata.permissions().readonly() {
            return Err(deny());
        }
        return Ok(());
    }

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };
    if !parent.exists() {
        return Err(deny());
    }
    let metadata = fs::metadata(&parent)?;
    if metadata.permissions().readonly() {
        return Err(deny());
    }
    Ok(())
}

fn deny_on_permission(err: std::io::Error, path: &Path) -> PersistenceError {
    if err.kind() == ErrorKind::PermissionDenied {
        PersistenceError::WriteDenied {
            path: path.display().to_string(),
        }
    } else {
        PersistenceError::Io { source: err }
    }
}
