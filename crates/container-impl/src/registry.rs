//! 静态类注册表
//!
//! 以声明的类描述符加构造闭包，同时提供类实例化与类自省两种能力。
//! 这是“名称到构造/设值函数注册表”的静态化实现，宿主在组装期注册
//! 其全部可注入类。

use container_abstractions::{
    ClassActivator, ClassIntrospector, ComponentRef, InjectableProperties, ParamDescriptor,
    ResolvedValue, ScopeValueProvider,
};
use container_common::{
    ActivationError, ActivationResult, IntrospectionError, IntrospectionResult,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// 构造闭包类型
pub type ComponentConstructor =
    Arc<dyn Fn(Vec<ResolvedValue>) -> ActivationResult<ComponentRef> + Send + Sync>;

/// 方法描述
///
/// 设值方法形态：恰好一个必填参数，其后只允许带默认值的参数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    /// 方法名称
    pub name: String,
    /// 必填参数数量
    pub required_params: usize,
    /// 带默认值的参数数量
    pub optional_params: usize,
}

impl MethodDescriptor {
    /// 创建方法描述
    pub fn new(name: impl Into<String>, required_params: usize, optional_params: usize) -> Self {
        Self {
            name: name.into(),
            required_params,
            optional_params,
        }
    }

    /// 是否符合设值方法形态
    pub fn is_setter_shaped(&self) -> bool {
        self.required_params == 1
    }
}

/// 类描述符
#[derive(Debug, Clone, Default)]
pub struct ClassDescriptor {
    /// 类名称
    pub name: String,
    /// 父类名称
    pub parent: Option<String>,
    /// 实现的接口名称
    pub interfaces: Vec<String>,
    /// 公开字段名称
    pub fields: Vec<String>,
    /// 构造参数描述，按声明顺序
    pub constructor_params: Vec<ParamDescriptor>,
    /// 公开方法描述
    pub methods: Vec<MethodDescriptor>,
}

impl ClassDescriptor {
    /// 创建新的类描述符
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// 设置父类
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// 添加实现的接口
    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// 添加公开字段
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    /// 添加构造参数
    pub fn with_constructor_param(mut self, param: ParamDescriptor) -> Self {
        self.constructor_params.push(param);
        self
    }

    /// 添加公开方法
    pub fn with_method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }
}

/// 静态类注册表
#[derive(Default)]
pub struct StaticClassRegistry {
    classes: HashMap<String, ClassDescriptor>,
    constructors: HashMap<String, ComponentConstructor>,
}

impl StaticClassRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册类描述符及其构造闭包
    pub fn register_class(&mut self, descriptor: ClassDescriptor, constructor: ComponentConstructor) {
        debug!("注册类: {}", descriptor.name);
        self.constructors
            .insert(descriptor.name.clone(), constructor);
        self.classes.insert(descriptor.name.clone(), descriptor);
    }

    /// 仅注册接口/抽象类型的描述符（不可实例化）
    pub fn register_type(&mut self, descriptor: ClassDescriptor) {
        debug!("注册类型: {}", descriptor.name);
        self.classes.insert(descriptor.name.clone(), descriptor);
    }

    fn descriptor(&self, class_name: &str) -> IntrospectionResult<&ClassDescriptor> {
        self.classes
            .get(class_name)
            .ok_or_else(|| IntrospectionError::ClassNotFound {
                class_name: class_name.to_string(),
            })
    }
}

impl ClassActivator for StaticClassRegistry {
    fn instantiate(
        &self,
        class_name: &str,
        args: Vec<ResolvedValue>,
    ) -> ActivationResult<ComponentRef> {
        let constructor =
            self.constructors
                .get(class_name)
                .ok_or_else(|| ActivationError::ClassNotFound {
                    class_name: class_name.to_string(),
                })?;

        if let Some(descriptor) = self.classes.get(class_name) {
            let required = descriptor
                .constructor_params
                .iter()
                .filter(|p| p.required)
                .count();
            let total = descriptor.constructor_params.len();
            if args.len() < required || args.len() > total {
                return Err(ActivationError::ConstructorMismatch {
                    class_name: class_name.to_string(),
                    message: format!(
                        "期望 {}..={} 个参数, 实际 {}",
                        required,
                        total,
                        args.len()
                    ),
                });
            }
        }

        constructor(args)
    }

    fn class_exists(&self, class_name: &str) -> bool {
        self.constructors.contains_key(class_name)
    }
}

impl ClassIntrospector for StaticClassRegistry {
    fn class_exists(&self, class_name: &str) -> bool {
        self.classes.contains_key(class_name)
    }

    fn is_assignable_to(&self, class_name: &str, target: &str) -> IntrospectionResult<bool> {
        let mut current = Some(self.descriptor(class_name)?);
        while let Some(descriptor) = current {
            if descriptor.name == target {
                return Ok(true);
            }
            if descriptor.interfaces.iter().any(|i| i == target) {
                return Ok(true);
            }
            current = match &descriptor.parent {
                Some(parent) => Some(self.descriptor(parent)?),
                None => None,
            };
        }
        Ok(false)
    }

    fn injectable_properties(&self, class_name: &str) -> IntrospectionResult<InjectableProperties> {
        let descriptor = self.descriptor(class_name)?;
        Ok(InjectableProperties {
            fields: descriptor.fields.clone(),
            constructor_params: descriptor.constructor_params.clone(),
            setters: descriptor
                .methods
                .iter()
                .filter(|m| m.is_setter_shaped())
                .map(|m| m.name.clone())
                .collect(),
        })
    }
}

/// 映射支撑的环境作用域取值
///
/// 宿主在请求/会话边界填充后传入容器。
#[derive(Debug, Default, Clone)]
pub struct AmbientScopeValues {
    constants: HashMap<String, Value>,
    request: HashMap<String, Value>,
    session: HashMap<String, Value>,
}

impl AmbientScopeValues {
    /// 创建空的作用域取值集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加环境常量
    pub fn with_constant(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.constants.insert(name.into(), value.into());
        self
    }

    /// 添加请求范围键值
    pub fn with_request_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.request.insert(key.into(), value.into());
        self
    }

    /// 添加会话范围键值
    pub fn with_session_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.session.insert(key.into(), value.into());
        self
    }
}

impl ScopeValueProvider for AmbientScopeValues {
    fn environment_constant(&self, name: &str) -> Option<Value> {
        self.constants.get(name).cloned()
    }

    fn request_value(&self, key: &str) -> Option<Value> {
        self.request.get(key).cloned()
    }

    fn session_value(&self, key: &str) -> Option<Value> {
        self.session.get(key).cloned()
    }
}
