//! # 声明式组件容器实现
//!
//! 提供具体的容器实现：定义存储、惰性解析、图结构编辑、
//! 可达性垃圾回收与快照编解码。
//!
//! ## 核心组件
//!
//! - [`ComponentContainer`] - 容器本体（解析器 + 图编辑器）
//! - [`DefinitionStore`] - 名称到定义的权威映射
//! - [`StoreSnapshot`] - 确定性持久化快照
//! - [`AccessorSurface`] - 生成的访问器表面
//! - [`StaticClassRegistry`] - 类实例化与自省的静态注册表

pub mod accessor;
pub mod codec;
pub mod config;
pub mod container;
pub mod editor;
pub mod gc;
pub mod registry;
pub mod resolver;
pub mod store;

pub use accessor::AccessorSurface;
pub use codec::{StoreSnapshot, SNAPSHOT_FORMAT, SNAPSHOT_VERSION};
pub use config::ContainerConfig;
pub use container::ComponentContainer;
pub use registry::{
    AmbientScopeValues, ClassDescriptor, ComponentConstructor, MethodDescriptor,
    StaticClassRegistry,
};
pub use store::DefinitionStore;
