//! 组件图结构编辑
//!
//! 声明/重命名/删除/复制/绑定在整个定义图上保持引用一致性。
//! 全部失败条件在任何写入之前检查，失败的编辑不留下部分变更。

use crate::container::ComponentContainer;
use container_abstractions::{ClassIntrospector, GraphEditor, OnExistPolicy};
use container_common::{Binding, EditError, EditResult, InstanceDefinition};
use std::collections::BTreeSet;
use tracing::{debug, warn};

impl GraphEditor for ComponentContainer {
    fn declare(
        &mut self,
        name: &str,
        class_name: &str,
        external: bool,
        on_exist: OnExistPolicy,
        weak: bool,
    ) -> EditResult<()> {
        if let Some(existing) = self.store.get(name) {
            match on_exist {
                OnExistPolicy::Fail => {
                    return Err(EditError::DuplicateInstance {
                        name: name.to_string(),
                    });
                }
                OnExistPolicy::KeepAll => {
                    debug!("声明已存在, 保留原定义: {}", name);
                    return Ok(());
                }
                OnExistPolicy::KeepIncomingLinks => {
                    // 重建会清空既有定义自身的出边绑定，外部定义归他方所有
                    if existing.external {
                        return Err(EditError::ExternalInstanceImmutable {
                            name: name.to_string(),
                        });
                    }
                }
            }
        }

        debug!("声明实例: {} ({})", name, class_name);
        let definition = InstanceDefinition::new(class_name)
            .with_external(external)
            .with_weak(weak);
        self.store.insert(name, definition);
        Ok(())
    }

    fn declare_anonymous(&mut self, class_name: &str) -> EditResult<String> {
        let name = loop {
            self.anonymous_counter += 1;
            let candidate = format!(
                "{}:{}",
                self.config.anonymous_name_prefix, self.anonymous_counter
            );
            if !self.store.contains(&candidate) {
                break candidate;
            }
        };

        debug!("声明匿名实例: {} ({})", name, class_name);
        let definition = InstanceDefinition::new(class_name).with_anonymous(true);
        self.store.insert(name.clone(), definition);
        Ok(name)
    }

    fn bind_constructor_arg(
        &mut self,
        name: &str,
        index: usize,
        binding: Option<Binding>,
    ) -> EditResult<()> {
        let definition = self.editable_definition(name)?;
        definition.set_constructor_arg(index, binding);
        Ok(())
    }

    fn bind_field(&mut self, name: &str, field: &str, binding: Option<Binding>) -> EditResult<()> {
        let definition = self.editable_definition(name)?;
        match binding {
            Some(binding) => {
                definition.field_bindings.insert(field.to_string(), binding);
            }
            // 空目标即整条移除绑定，与构造参数的显式占位语义不同
            None => {
                definition.field_bindings.shift_remove(field);
            }
        }
        Ok(())
    }

    fn bind_setter(
        &mut self,
        name: &str,
        setter: &str,
        binding: Option<Binding>,
    ) -> EditResult<()> {
        let definition = self.editable_definition(name)?;
        match binding {
            Some(binding) => {
                definition
                    .setter_bindings
                    .insert(setter.to_string(), binding);
            }
            None => {
                definition.setter_bindings.shift_remove(setter);
            }
        }
        Ok(())
    }

    fn bind_fields(
        &mut self,
        name: &str,
        bindings: Vec<(String, Option<Binding>)>,
    ) -> EditResult<()> {
        self.editable_definition(name)?;
        for (field, binding) in bindings {
            self.bind_field(name, &field, binding)?;
        }
        Ok(())
    }

    fn bind_setters(
        &mut self,
        name: &str,
        bindings: Vec<(String, Option<Binding>)>,
    ) -> EditResult<()> {
        self.editable_definition(name)?;
        for (setter, binding) in bindings {
            self.bind_setter(name, &setter, binding)?;
        }
        Ok(())
    }

    fn set_comment(&mut self, name: &str, comment: Option<String>) -> EditResult<()> {
        let definition = self.editable_definition(name)?;
        definition.comment = comment;
        Ok(())
    }

    fn remove(&mut self, name: &str) -> EditResult<()> {
        match self.store.get(name) {
            None => {
                return Err(EditError::InstanceNotFound {
                    name: name.to_string(),
                })
            }
            Some(definition) if definition.external => {
                return Err(EditError::ExternalInstanceImmutable {
                    name: name.to_string(),
                })
            }
            Some(_) => {}
        }

        debug!("删除实例: {}", name);
        self.store.remove(name);
        self.scrub_references(name);
        Ok(())
    }

    fn rename(&mut self, old: &str, new: &str) -> EditResult<()> {
        match self.store.get(old) {
            None => {
                return Err(EditError::InstanceNotFound {
                    name: old.to_string(),
                })
            }
            Some(definition) if definition.external => {
                return Err(EditError::ExternalInstanceImmutable {
                    name: old.to_string(),
                })
            }
            Some(_) => {}
        }
        if self.store.contains(new) {
            return Err(EditError::DuplicateInstance {
                name: new.to_string(),
            });
        }

        debug!("重命名实例: {} -> {}", old, new);
        let definition = self.store.remove(old).expect("定义已在前置检查中确认存在");
        self.store.insert(new, definition);
        for (_, definition) in self.store.iter_mut() {
            for binding in definition_bindings_mut(definition) {
                binding.rewrite_target(old, new);
            }
        }
        Ok(())
    }

    fn duplicate(&mut self, src: &str, dest: &str) -> EditResult<()> {
        let Some(definition) = self.store.get(src) else {
            return Err(EditError::InstanceNotFound {
                name: src.to_string(),
            });
        };
        if self.store.contains(dest) {
            return Err(EditError::DuplicateInstance {
                name: dest.to_string(),
            });
        }

        debug!("复制实例: {} -> {}", src, dest);
        let copy = definition.clone();
        self.store.insert(dest, copy);
        Ok(())
    }

    fn find_instances_of_type(&self, type_name: &str) -> Vec<String> {
        let mut matches = Vec::new();
        for (name, definition) in self.store.iter() {
            match self
                .introspector
                .is_assignable_to(&definition.class_name, type_name)
            {
                Ok(true) => matches.push(name.clone()),
                Ok(false) => {}
                Err(err) => {
                    // 类无法自省的实例静默跳过
                    warn!("跳过无法自省的实例 {}: {}", name, err);
                }
            }
        }
        matches
    }

    fn owner_components(&self, name: &str) -> BTreeSet<String> {
        self.store
            .referencing(name)
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

impl ComponentContainer {
    /// 取可编辑定义：未声明或外部定义直接报错
    fn editable_definition(&mut self, name: &str) -> EditResult<&mut InstanceDefinition> {
        match self.store.get(name) {
            None => Err(EditError::InstanceNotFound {
                name: name.to_string(),
            }),
            Some(definition) if definition.external => Err(EditError::ExternalInstanceImmutable {
                name: name.to_string(),
            }),
            Some(_) => Ok(self
                .store
                .get_mut(name)
                .expect("定义已在前置检查中确认存在")),
        }
    }

    /// 清理全图中指向已删除名称的引用
    ///
    /// 构造参数槽位中的单个引用改写为空占位以保持索引致密；
    /// 字段/设值方法映射中的条目整条移除；引用列表删除匹配条目。
    /// 外部定义的绑定同样参与清理。
    fn scrub_references(&mut self, name: &str) {
        for (_, definition) in self.store.iter_mut() {
            for slot in &mut definition.constructor_args {
                if matches!(&*slot, Binding::Reference { target } if target == name) {
                    *slot = Binding::null();
                } else if let Binding::ReferenceList { entries } = slot {
                    entries.retain(|_, target| target.as_deref() != Some(name));
                }
            }
            scrub_binding_map(&mut definition.field_bindings, name);
            scrub_binding_map(&mut definition.setter_bindings, name);
        }
    }
}

fn scrub_binding_map(bindings: &mut indexmap::IndexMap<String, Binding>, name: &str) {
    bindings.retain(|_, binding| match binding {
        Binding::Reference { target } => target.as_str() != name,
        Binding::ReferenceList { entries } => {
            entries.retain(|_, target| target.as_deref() != Some(name));
            true
        }
        Binding::Literal { .. } => true,
    });
}

fn definition_bindings_mut(
    definition: &mut InstanceDefinition,
) -> impl Iterator<Item = &mut Binding> {
    definition
        .constructor_args
        .iter_mut()
        .chain(definition.field_bindings.values_mut())
        .chain(definition.setter_bindings.values_mut())
}
