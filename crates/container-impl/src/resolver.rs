//! 实例解析
//!
//! 惰性地把声明式定义解析为缓存的活体实例。构造完成的实例在字段/
//! 设值方法注入之前即登记进缓存，因此注入期间出现的循环回引能够
//! 观察到稳定的实例身份——这是唯一受支持的循环引用形态；经由构造
//! 参数到达的循环通过构造中名称栈快速失败。

use crate::container::ComponentContainer;
use container_abstractions::{
    ClassActivator, ComponentRef, InstanceResolver, ResolvedValue, ScopeValueProvider,
};
use container_common::{
    Binding, InstanceDefinition, LiteralScope, ResolutionError, ResolutionResult,
};
use serde_json::Value;
use tracing::debug;

impl InstanceResolver for ComponentContainer {
    fn get(&mut self, name: &str) -> ResolutionResult<ComponentRef> {
        if let Some(instance) = self.cache.get(name) {
            return Ok(instance.clone());
        }
        self.instantiate(name)
    }

    fn is_resolved(&self, name: &str) -> bool {
        self.cache.contains_key(name)
    }
}

impl ComponentContainer {
    fn instantiate(&mut self, name: &str) -> ResolutionResult<ComponentRef> {
        let definition = self
            .store
            .get(name)
            .cloned()
            .ok_or_else(|| ResolutionError::InstanceNotFound {
                name: name.to_string(),
            })?;

        if let Some(start) = self.in_progress.iter().position(|n| n == name) {
            let mut chain = self.in_progress[start..].join(" -> ");
            chain.push_str(" -> ");
            chain.push_str(name);
            return Err(ResolutionError::CyclicDependency { chain });
        }
        if self.in_progress.len() >= self.config.max_resolution_depth {
            return Err(ResolutionError::MaxDepthExceeded {
                name: name.to_string(),
                depth: self.config.max_resolution_depth,
            });
        }

        debug!("实例化: {} ({})", name, definition.class_name);
        self.in_progress.push(name.to_string());
        let constructed = self.construct(name, &definition);
        self.in_progress.pop();
        let instance = constructed?;

        // 注入前登记缓存，循环回引由此取得已定身份的实例
        self.cache.insert(name.to_string(), instance.clone());

        if let Err(err) = self.inject(name, &definition, &instance) {
            // 失败的解析不得在缓存中留下部分注入的实例
            self.cache.remove(name);
            return Err(err);
        }

        Ok(instance)
    }

    fn construct(
        &mut self,
        name: &str,
        definition: &InstanceDefinition,
    ) -> ResolutionResult<ComponentRef> {
        let mut args = Vec::with_capacity(definition.constructor_args.len());
        for binding in &definition.constructor_args {
            args.push(self.resolve_binding(name, binding)?);
        }
        self.activator
            .instantiate(&definition.class_name, args)
            .map_err(|source| ResolutionError::Activation {
                name: name.to_string(),
                source,
            })
    }

    fn inject(
        &mut self,
        name: &str,
        definition: &InstanceDefinition,
        instance: &ComponentRef,
    ) -> ResolutionResult<()> {
        for (field, binding) in &definition.field_bindings {
            let value = self.resolve_binding(name, binding)?;
            instance
                .set_field(field, value)
                .map_err(|source| ResolutionError::Injection {
                    name: name.to_string(),
                    source,
                })?;
        }
        for (setter, binding) in &definition.setter_bindings {
            let value = self.resolve_binding(name, binding)?;
            instance
                .invoke_setter(setter, value)
                .map_err(|source| ResolutionError::Injection {
                    name: name.to_string(),
                    source,
                })?;
        }
        Ok(())
    }

    /// 解析单个绑定为注入值
    ///
    /// 依赖解析产生的任何错误都以当前实例名包装为
    /// [`DependencyFailed`](ResolutionError::DependencyFailed)，
    /// 保留到最终缺失名称的完整因果链。
    fn resolve_binding(&mut self, owner: &str, binding: &Binding) -> ResolutionResult<ResolvedValue> {
        match binding {
            Binding::Literal { value, scope } => {
                Ok(ResolvedValue::Literal(self.resolve_scoped(value, *scope)))
            }
            Binding::Reference { target } => {
                let instance = self.get_dependency(owner, target)?;
                Ok(ResolvedValue::Object(instance))
            }
            Binding::ReferenceList { entries } => {
                let mut resolved = Vec::with_capacity(entries.len());
                for (key, target) in entries {
                    let instance = match target {
                        Some(target) => Some(self.get_dependency(owner, target)?),
                        None => None,
                    };
                    resolved.push((key.clone(), instance));
                }
                Ok(ResolvedValue::ObjectList(resolved))
            }
        }
    }

    fn get_dependency(&mut self, owner: &str, target: &str) -> ResolutionResult<ComponentRef> {
        self.get(target)
            .map_err(|cause| ResolutionError::DependencyFailed {
                name: owner.to_string(),
                cause: Box::new(cause),
            })
    }

    fn resolve_scoped(&self, value: &Value, scope: LiteralScope) -> Value {
        match scope {
            LiteralScope::Literal => value.clone(),
            LiteralScope::EnvironmentConstant => self
                .scopes
                .environment_constant(&scope_key(value))
                .unwrap_or(Value::Null),
            LiteralScope::RequestScoped => self
                .scopes
                .request_value(&scope_key(value))
                .unwrap_or(Value::Null),
            LiteralScope::SessionScoped => self
                .scopes
                .session_value(&scope_key(value))
                .unwrap_or(Value::Null),
        }
    }
}

/// 作用域查找键：字面量值即常量/键名称
fn scope_key(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
