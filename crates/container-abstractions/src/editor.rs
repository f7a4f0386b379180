//! 组件图结构编辑抽象接口
//!
//! 所有结构编辑必须保持全图引用一致性；编辑错误同步抛出，
//! 失败时存储不得有任何部分变更。

use container_common::{Binding, EditResult};
use std::collections::BTreeSet;

/// 声明同名实例已存在时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnExistPolicy {
    /// 抛出 [`DuplicateInstance`](container_common::EditError::DuplicateInstance)
    Fail,
    /// 重建定义（清空其出边绑定与注释），保留其他定义指向它的引用
    KeepIncomingLinks,
    /// 对已存在的定义不做任何修改
    KeepAll,
}

/// 组件图结构编辑 trait
pub trait GraphEditor {
    /// 声明命名实例
    fn declare(
        &mut self,
        name: &str,
        class_name: &str,
        external: bool,
        on_exist: OnExistPolicy,
        weak: bool,
    ) -> EditResult<()>;

    /// 声明匿名实例并返回生成的名称
    fn declare_anonymous(&mut self, class_name: &str) -> EditResult<String>;

    /// 绑定指定索引的构造参数；`None` 写入显式空占位，索引保持致密
    fn bind_constructor_arg(
        &mut self,
        name: &str,
        index: usize,
        binding: Option<Binding>,
    ) -> EditResult<()>;

    /// 绑定字段；`None` 移除绑定条目
    fn bind_field(&mut self, name: &str, field: &str, binding: Option<Binding>) -> EditResult<()>;

    /// 绑定设值方法；`None` 移除绑定条目
    fn bind_setter(&mut self, name: &str, setter: &str, binding: Option<Binding>)
        -> EditResult<()>;

    /// 批量绑定字段
    fn bind_fields(
        &mut self,
        name: &str,
        bindings: Vec<(String, Option<Binding>)>,
    ) -> EditResult<()>;

    /// 批量绑定设值方法
    fn bind_setters(
        &mut self,
        name: &str,
        bindings: Vec<(String, Option<Binding>)>,
    ) -> EditResult<()>;

    /// 设置或清除注释
    fn set_comment(&mut self, name: &str, comment: Option<String>) -> EditResult<()>;

    /// 删除定义并清理全图中指向它的引用
    fn remove(&mut self, name: &str) -> EditResult<()>;

    /// 重命名定义并改写全图中指向旧名称的引用
    fn rename(&mut self, old: &str, new: &str) -> EditResult<()>;

    /// 按值复制定义；后续对副本的编辑不得影响源定义
    fn duplicate(&mut self, src: &str, dest: &str) -> EditResult<()>;

    /// 返回类等于、继承或实现目标类型的实例名称；
    /// 类无法自省的实例被静默跳过
    fn find_instances_of_type(&self, type_name: &str) -> Vec<String>;

    /// 返回直接引用指定名称的实例名称集合
    fn owner_components(&self, name: &str) -> BTreeSet<String>;
}
