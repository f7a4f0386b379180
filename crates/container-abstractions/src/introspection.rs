//! 类自省能力抽象接口
//!
//! 回答子类型/接口实现查询，并枚举类的可注入属性，
//! 供按类型查找与面向 UI 的注入点发现使用。

use container_common::IntrospectionResult;

/// 构造参数描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDescriptor {
    /// 参数名称
    pub name: String,
    /// 是否必填（无默认值）
    pub required: bool,
}

impl ParamDescriptor {
    /// 创建必填参数描述
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
        }
    }

    /// 创建带默认值的参数描述
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
        }
    }
}

/// 类的可注入属性集合
///
/// 设值方法要求单个必填参数，其后只允许带默认值的参数。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InjectableProperties {
    /// 公开字段名称
    pub fields: Vec<String>,
    /// 构造参数描述，按声明顺序
    pub constructor_params: Vec<ParamDescriptor>,
    /// 设值方法名称
    pub setters: Vec<String>,
}

/// 类自省能力 trait
pub trait ClassIntrospector: Send + Sync {
    /// 类名是否已知
    fn class_exists(&self, class_name: &str) -> bool;

    /// 类是否等于、继承或实现目标类型
    fn is_assignable_to(&self, class_name: &str, target: &str) -> IntrospectionResult<bool>;

    /// 枚举类的可注入属性
    fn injectable_properties(&self, class_name: &str) -> IntrospectionResult<InjectableProperties>;
}
