//! # Container Abstractions
//!
//! 声明式组件容器的能力抽象层。
//!
//! ## 核心接口
//!
//! - [`ManagedComponent`] - 受管组件（按名字段/设值方法注入）
//! - [`ClassActivator`] - 类实例化能力
//! - [`ClassIntrospector`] - 类自省能力
//! - [`ScopeValueProvider`] - 环境作用域取值
//! - [`InstanceResolver`] - 实例解析器
//! - [`GraphEditor`] - 组件图结构编辑

pub mod activation;
pub mod component;
pub mod editor;
pub mod introspection;
pub mod resolver;
pub mod scope;

pub use activation::*;
pub use component::*;
pub use editor::*;
pub use introspection::*;
pub use resolver::*;
pub use scope::*;
