//! 环境作用域取值抽象接口
//!
//! 宿主环境提供环境常量以及请求/会话范围的键值查找。
//! 缺失的键产出 `None`，解析时落为 null 而不是报错。

use serde_json::Value;

/// 环境作用域取值 trait
pub trait ScopeValueProvider: Send + Sync {
    /// 查找命名环境常量
    fn environment_constant(&self, name: &str) -> Option<Value>;

    /// 查找当前请求范围的键值
    fn request_value(&self, key: &str) -> Option<Value>;

    /// 查找当前会话范围的键值
    fn session_value(&self, key: &str) -> Option<Value>;
}

/// 空的作用域提供者：任何键都视为缺失
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAmbientValues;

impl ScopeValueProvider for NoAmbientValues {
    fn environment_constant(&self, _name: &str) -> Option<Value> {
        None
    }

    fn request_value(&self, _key: &str) -> Option<Value> {
        None
    }

    fn session_value(&self, _key: &str) -> Option<Value> {
        None
    }
}
