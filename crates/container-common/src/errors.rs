//! 错误类型定义

use thiserror::Error;

/// 结构编辑错误类型
///
/// 所有结构编辑错误在任何变更发生之前同步抛出，存储保持不变。
#[derive(Error, Debug)]
pub enum EditError {
    #[error("实例名称已存在: {name}")]
    DuplicateInstance { name: String },

    #[error("外部实例不可变更: {name}")]
    ExternalInstanceImmutable { name: String },

    #[error("无效的绑定作用域: {scope}")]
    InvalidBindingScope { scope: String },

    #[error("实例未声明: {name}")]
    InstanceNotFound { name: String },
}

/// 解析错误类型
///
/// 解析错误沿递归解析链逐帧包装为 [`DependencyFailed`](ResolutionError::DependencyFailed)，
/// 对外暴露到根因的完整引用路径。
#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("实例未声明: {name}")]
    InstanceNotFound { name: String },

    #[error("实例 {name} 的依赖解析失败: {cause}")]
    DependencyFailed {
        name: String,
        #[source]
        cause: Box<ResolutionError>,
    },

    #[error("检测到构造参数循环依赖: {chain}")]
    CyclicDependency { chain: String },

    #[error("超出最大解析深度 {depth}: {name}")]
    MaxDepthExceeded { name: String, depth: usize },

    #[error("实例 {name} 实例化失败: {source}")]
    Activation {
        name: String,
        #[source]
        source: ActivationError,
    },

    #[error("实例 {name} 注入失败: {source}")]
    Injection {
        name: String,
        #[source]
        source: InjectionError,
    },
}

impl ResolutionError {
    /// 沿 `DependencyFailed` 链取得最终根因
    pub fn root_cause(&self) -> &ResolutionError {
        match self {
            Self::DependencyFailed { cause, .. } => cause.root_cause(),
            other => other,
        }
    }
}

/// 类实例化错误类型
///
/// 由外部的类实例化能力产生。
#[derive(Error, Debug)]
pub enum ActivationError {
    #[error("类未找到: {class_name}")]
    ClassNotFound { class_name: String },

    #[error("构造函数不匹配: {class_name}, 原因: {message}")]
    ConstructorMismatch { class_name: String, message: String },
}

/// 注入错误类型
#[derive(Error, Debug)]
pub enum InjectionError {
    #[error("未知字段: {field}")]
    UnknownField { field: String },

    #[error("未知设值方法: {setter}")]
    UnknownSetter { setter: String },

    #[error("注入值被拒绝: {message}")]
    ValueRejected { message: String },
}

/// 类自省错误类型
#[derive(Error, Debug)]
pub enum IntrospectionError {
    #[error("类未找到: {class_name}")]
    ClassNotFound { class_name: String },
}

/// 持久化错误类型
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("目标不可写: {path}")]
    WriteDenied { path: String },

    #[error("快照读写失败: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("快照序列化失败: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    #[error("不支持的快照格式: {format} v{version}")]
    UnsupportedSnapshot { format: String, version: u32 },
}

/// 容器聚合错误类型
#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("结构编辑错误: {source}")]
    Edit {
        #[from]
        source: EditError,
    },

    #[error("解析错误: {source}")]
    Resolution {
        #[from]
        source: ResolutionError,
    },

    #[error("自省错误: {source}")]
    Introspection {
        #[from]
        source: IntrospectionError,
    },

    #[error("持久化错误: {source}")]
    Persistence {
        #[from]
        source: PersistenceError,
    },
}

/// 结果类型别名
pub type EditResult<T> = Result<T, EditError>;
pub type ResolutionResult<T> = Result<T, ResolutionError>;
pub type ActivationResult<T> = Result<T, ActivationError>;
pub type InjectionResult<T> = Result<T, InjectionError>;
pub type IntrospectionResult<T> = Result<T, IntrospectionError>;
pub type PersistenceResult<T> = Result<T, PersistenceError>;
pub type ContainerResult<T> = Result<T, ContainerError>;
