//! # Container Common
//!
//! 声明式组件容器的公共数据模型与错误类型。
//!
//! ## 核心组件
//!
//! - [`InstanceDefinition`] - 命名实例的声明式定义
//! - [`Binding`] - 构造参数/字段/设值方法绑定
//! - [`LiteralScope`] - 字面量取值作用域
//! - 按关注点划分的错误枚举，聚合为 [`ContainerError`]

pub mod definition;
pub mod errors;

pub use definition::*;
pub use errors::*;
