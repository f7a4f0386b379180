//! 容器配置

/// 容器配置
#[derive(Debug, Clone)]
pub struct ContainerConfig {
    /// 最大解析深度
    pub max_resolution_depth: usize,
    /// 快照是否使用缩进格式
    pub pretty_snapshots: bool,
    /// 匿名实例名称前缀
    pub anonymous_name_prefix: String,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            max_resolution_depth: 100,
            pretty_snapshots: true,
            anonymous_name_prefix: "anonymous".to_string(),
        }
    }
}
