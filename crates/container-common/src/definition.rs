//! 实例定义数据模型
//!
//! 提供声明式组件图的核心数据结构：字面量作用域、绑定和实例定义。

use crate::errors::EditError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// 字面量绑定的取值作用域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LiteralScope {
    /// 直接传递字面量值
    Literal,
    /// 按名称查找环境常量
    EnvironmentConstant,
    /// 按键查找当前请求范围的环境值
    RequestScoped,
    /// 按键查找当前会话范围的环境值
    SessionScoped,
}

impl fmt::Display for LiteralScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Literal => "LITERAL",
            Self::EnvironmentConstant => "ENVIRONMENT_CONSTANT",
            Self::RequestScoped => "REQUEST_SCOPED",
            Self::SessionScoped => "SESSION_SCOPED",
        };
        f.write_str(text)
    }
}

impl FromStr for LiteralScope {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LITERAL" => Ok(Self::Literal),
            "ENVIRONMENT_CONSTANT" => Ok(Self::EnvironmentConstant),
            "REQUEST_SCOPED" => Ok(Self::RequestScoped),
            "SESSION_SCOPED" => Ok(Self::SessionScoped),
            other => Err(EditError::InvalidBindingScope {
                scope: other.to_string(),
            }),
        }
    }
}

/// 绑定
///
/// 将构造参数槽位、字段或设值方法关联到一个带作用域的字面量值、
/// 另一个实例的引用、或一个有序的引用列表。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Binding {
    /// 带作用域的字面量值
    Literal { value: Value, scope: LiteralScope },
    /// 指向另一个实例的单个引用
    Reference { target: String },
    /// 有序的键到目标名称（或空槽）的引用列表
    ReferenceList {
        entries: IndexMap<String, Option<String>>,
    },
}

impl Binding {
    /// 创建直接字面量绑定
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal {
            value: value.into(),
            scope: LiteralScope::Literal,
        }
    }

    /// 创建带作用域的字面量绑定
    pub fn scoped_literal(value: impl Into<Value>, scope: LiteralScope) -> Self {
        Self::Literal {
            value: value.into(),
            scope,
        }
    }

    /// 创建空字面量占位绑定
    pub fn null() -> Self {
        Self::Literal {
            value: Value::Null,
            scope: LiteralScope::Literal,
        }
    }

    /// 创建单个引用绑定
    pub fn reference(target: impl Into<String>) -> Self {
        Self::Reference {
            target: target.into(),
        }
    }

    /// 从 (键, 目标) 序列创建引用列表绑定
    pub fn reference_list<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Option<String>)>,
    {
        Self::ReferenceList {
            entries: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// 绑定是否直接引用指定实例名称
    pub fn references(&self, name: &str) -> bool {
        match self {
            Self::Literal { .. } => false,
            Self::Reference { target } => target == name,
            Self::ReferenceList { entries } => {
                entries.values().any(|t| t.as_deref() == Some(name))
            }
        }
    }

    /// 收集绑定直接引用的全部实例名称
    pub fn collect_targets<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        match self {
            Self::Literal { .. } => {}
            Self::Reference { target } => {
                out.insert(target.as_str());
            }
            Self::ReferenceList { entries } => {
                for target in entries.values().flatten() {
                    out.insert(target.as_str());
                }
            }
        }
    }

    /// 将绑定中对 `old` 的引用改写为 `new`
    pub fn rewrite_target(&mut self, old: &str, new: &str) {
        match self {
            Self::Literal { .. } => {}
            Self::Reference { target } => {
                if target.as_str() == old {
                    *target = new.to_string();
                }
            }
            Self::ReferenceList { entries } => {
                for target in entries.values_mut() {
                    if target.as_deref() == Some(old) {
                        *target = Some(new.to_string());
                    }
                }
            }
        }
    }
}

/// 实例定义
///
/// 名称到类及其构造参数、字段和设值方法绑定的声明式映射条目。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceDefinition {
    /// 类名称
    pub class_name: String,
    /// 是否归属于其他存储（本存储不得重命名或删除）
    #[serde(default, skip_serializing_if = "is_false")]
    pub external: bool,
    /// 不可达时是否允许被垃圾回收
    #[serde(default, skip_serializing_if = "is_false")]
    pub weak: bool,
    /// 是否匿名（蕴含 weak；名称不用于人工展示）
    #[serde(default, skip_serializing_if = "is_false")]
    pub anonymous: bool,
    /// 构造参数绑定，按索引 0..n-1 致密排列
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constructor_args: Vec<Binding>,
    /// 字段绑定，按声明顺序
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub field_bindings: IndexMap<String, Binding>,
    /// 设值方法绑定，按声明顺序
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub setter_bindings: IndexMap<String, Binding>,
    /// 自由格式注释/元数据
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl InstanceDefinition {
    /// 创建新的实例定义
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            external: false,
            weak: false,
            anonymous: false,
            constructor_args: Vec::new(),
            field_bindings: IndexMap::new(),
            setter_bindings: IndexMap::new(),
            comment: None,
        }
    }

    /// 标记为外部实例
    pub fn with_external(mut self, external: bool) -> Self {
        self.external = external;
        self
    }

    /// 标记为弱实例
    pub fn with_weak(mut self, weak: bool) -> Self {
        self.weak = weak;
        self
    }

    /// 标记为匿名实例（同时强制 weak）
    pub fn with_anonymous(mut self, anonymous: bool) -> Self {
        self.anonymous = anonymous;
        if anonymous {
            self.weak = true;
        }
        self
    }

    /// 设置注释
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// 重申不变量：匿名蕴含弱实例
    ///
    /// 反序列化得到的定义也必须满足该不变量。
    pub fn normalize(&mut self) {
        if self.anonymous {
            self.weak = true;
        }
    }

    /// 设置指定索引的构造参数绑定
    ///
    /// 索引保持从 0 起致密：缺失的低位槽补空字面量占位，
    /// `None` 也写入显式的空占位而不是删除槽位。
    pub fn set_constructor_arg(&mut self, index: usize, binding: Option<Binding>) {
        while self.constructor_args.len() < index {
            self.constructor_args.push(Binding::null());
        }
        let binding = binding.unwrap_or_else(Binding::null);
        if index < self.constructor_args.len() {
            self.constructor_args[index] = binding;
        } else {
            self.constructor_args.push(binding);
        }
    }

    /// 遍历定义的全部出边绑定（构造参数、字段、设值方法）
    pub fn bindings(&self) -> impl Iterator<Item = &Binding> {
        self.constructor_args
            .iter()
            .chain(self.field_bindings.values())
            .chain(self.setter_bindings.values())
    }

    /// 定义是否直接引用指定实例名称
    pub fn references(&self, name: &str) -> bool {
        self.bindings().any(|b| b.references(name))
    }

    /// 收集定义直接引用的全部实例名称
    pub fn referenced_names(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        for binding in self.bindings() {
            binding.collect_targets(&mut out);
        }
        out
    }
}
