//! # Type Descriptors
//!
//! 리플렉션 대신 사용하는 **제한된 타입 정보 서비스**입니다.
//! 각 타입은 다음 항목을 명시적으로 선언합니다.
//!
//! - 생성자 목록 (파라미터 타입 + 팩토리 클로저)
//! - 쓰기 가능한 프로퍼티 목록 (타입 + setter 클로저)
//! - 메서드 시그니처 (선언 capability + 선택적 호출 클로저)
//! - 이름으로 호출할 수 있는 인자 없는 훅 (init/destroy 훅 이름용)
//! - 구현하는 capability(인터페이스 역할) 이름
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! let descriptor = TypeDescriptor::builder::<UserServiceImpl>("UserServiceImpl")
//!     .implements("UserService")
//!     .constructor(vec![], |_| Ok(UserServiceImpl::default()))
//!     .property("dao", ValueType::component("UserDao"), |service, value| {
//!         service.set_dao(value.as_instance().cloned());
//!         Ok(())
//!     })
//!     .method("UserService", "save", vec![ValueType::Str], |service, args| {
//!         service.save(args[0].as_str().unwrap_or_default())
//!     })
//!     .hook("my_init", |service| service.my_init())
//!     .build();
//! ```

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::aop::invocation::{InvocationError, InvocationResult};
use crate::core::component::{Component, Instance};
use crate::core::errors::BoxError;
use crate::core::value::{Value, ValueType};

type ConstructorFn = dyn Fn(Args) -> Result<Instance, BoxError> + Send + Sync;
type SetterFn = dyn Fn(&dyn Component, Value) -> Result<(), BoxError> + Send + Sync;
type InvokerFn = dyn Fn(&dyn Component, &[Value]) -> InvocationResult + Send + Sync;
type HookFn = dyn Fn(&dyn Component) -> Result<(), BoxError> + Send + Sync;

/// 생성자에 전달되는 변환 완료된 인자 목록
#[derive(Debug, Clone, Default)]
pub struct Args(Vec<Value>);

impl Args {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Value, BoxError> {
        self.0
            .get(index)
            .ok_or_else(|| format!("missing argument #{}", index).into())
    }

    pub fn str(&self, index: usize) -> Result<String, BoxError> {
        match self.get(index)? {
            Value::Str(s) => Ok(s.clone()),
            Value::Null => Ok(String::new()),
            other => Err(format!("argument #{} is {}, expected str", index, other.kind()).into()),
        }
    }

    pub fn int(&self, index: usize) -> Result<i64, BoxError> {
        self.get(index)?
            .as_int()
            .ok_or_else(|| format!("argument #{} is not an int", index).into())
    }

    pub fn float(&self, index: usize) -> Result<f64, BoxError> {
        self.get(index)?
            .as_float()
            .ok_or_else(|| format!("argument #{} is not a float", index).into())
    }

    pub fn bool(&self, index: usize) -> Result<bool, BoxError> {
        self.get(index)?
            .as_bool()
            .ok_or_else(|| format!("argument #{} is not a bool", index).into())
    }

    pub fn instance(&self, index: usize) -> Result<Instance, BoxError> {
        self.get(index)?
            .as_instance()
            .cloned()
            .ok_or_else(|| format!("argument #{} is not a component", index).into())
    }

    /// 인자를 구체 타입으로 다운캐스트합니다. 프록시가 들어온 경우 실패합니다.
    pub fn component<T: Component>(&self, index: usize) -> Result<Arc<T>, BoxError> {
        let instance = self.instance(index)?;
        let actual = instance.component_type();
        instance.downcast_arc::<T>().map_err(|_| {
            format!(
                "argument #{} is {}, expected {}",
                index,
                actual,
                std::any::type_name::<T>()
            )
            .into()
        })
    }

    pub fn into_values(self) -> Vec<Value> {
        self.0
    }
}

/// 생성자 디스크립터
#[derive(Clone)]
pub struct ConstructorDescriptor {
    pub params: Vec<ValueType>,
    factory: Arc<ConstructorFn>,
}

impl ConstructorDescriptor {
    pub fn invoke(&self, args: Vec<Value>) -> Result<Instance, BoxError> {
        (self.factory)(Args::new(args))
    }
}

impl fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDescriptor")
            .field("params", &self.params)
            .finish()
    }
}

/// 쓰기 가능한 프로퍼티 디스크립터
#[derive(Clone)]
pub struct PropertyDescriptor {
    pub name: String,
    pub value_type: ValueType,
    setter: Arc<SetterFn>,
}

impl PropertyDescriptor {
    pub fn write(&self, target: &dyn Component, value: Value) -> Result<(), BoxError> {
        (self.setter)(target, value)
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .finish()
    }
}

/// 메서드 시그니처
///
/// `declaring_type` 은 메서드를 선언한 capability(또는 구체 타입) 이름입니다.
/// 프록시는 타깃이 구현한 capability 에 선언된 메서드만 노출합니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    pub declaring_type: String,
    pub name: String,
    pub params: Vec<ValueType>,
}

impl MethodSignature {
    pub fn new(declaring_type: impl Into<String>, name: impl Into<String>, params: Vec<ValueType>) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            name: name.into(),
            params,
        }
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.params.iter().map(ToString::to_string).collect();
        write!(f, "{}::{}({})", self.declaring_type, self.name, params.join(", "))
    }
}

/// 메서드 디스크립터
#[derive(Clone)]
pub struct MethodDescriptor {
    pub signature: MethodSignature,
    invoker: Option<Arc<InvokerFn>>,
}

impl MethodDescriptor {
    /// 타깃에서 메서드를 실행합니다. 호출 클로저가 없으면 타깃의 동적 디스패치로 넘깁니다.
    pub fn invoke(&self, target: &dyn Component, args: &[Value]) -> InvocationResult {
        match &self.invoker {
            Some(invoker) => invoker(target, args),
            None => target.invoke(&self.signature.name, args),
        }
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("signature", &self.signature)
            .field("invokable", &self.invoker.is_some())
            .finish()
    }
}

/// 타입 디스크립터
#[derive(Clone)]
pub struct TypeDescriptor {
    pub name: String,
    pub type_id: TypeId,
    pub interfaces: Vec<String>,
    pub constructors: Vec<ConstructorDescriptor>,
    pub properties: Vec<PropertyDescriptor>,
    pub methods: Vec<MethodDescriptor>,
    hooks: HashMap<String, Arc<HookFn>>,
}

impl TypeDescriptor {
    pub fn builder<T: Component>(name: impl Into<String>) -> TypeDescriptorBuilder<T> {
        TypeDescriptorBuilder::new(name.into())
    }

    /// 자기 자신의 이름이거나 선언한 capability 이름이면 대입 가능합니다.
    pub fn is_assignable_to(&self, type_name: &str) -> bool {
        self.name == type_name || self.implements(type_name)
    }

    pub fn implements(&self, capability: &str) -> bool {
        self.interfaces.iter().any(|i| i == capability)
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn has_hook(&self, name: &str) -> bool {
        self.hooks.contains_key(name)
    }

    /// 이름으로 인자 없는 훅을 실행합니다.
    pub fn invoke_hook(&self, name: &str, target: &dyn Component) -> Result<(), BoxError> {
        match self.hooks.get(name) {
            Some(hook) => hook(target),
            None => Err(format!("{} has no method named '{}'", self.name, name).into()),
        }
    }

    /// 프록시가 노출하는 메서드 (구현한 capability 에 선언된 것만)
    pub fn interface_methods(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.methods
            .iter()
            .filter(|m| self.implements(&m.signature.declaring_type))
    }

    /// 이름과 인자 수로 노출 메서드를 찾습니다.
    pub fn find_interface_method(&self, name: &str, arity: usize) -> Option<&MethodDescriptor> {
        self.interface_methods()
            .find(|m| m.signature.name == name && m.signature.params.len() == arity)
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut hooks: Vec<&String> = self.hooks.keys().collect();
        hooks.sort();
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("interfaces", &self.interfaces)
            .field("constructors", &self.constructors)
            .field("properties", &self.properties)
            .field("methods", &self.methods)
            .field("hooks", &hooks)
            .finish()
    }
}

/// 타입 디스크립터 빌더
///
/// 클로저는 구체 타입 `T` 기준으로 작성하고, 빌더가 다운캐스트 래퍼를 씌웁니다.
pub struct TypeDescriptorBuilder<T: Component> {
    descriptor: TypeDescriptor,
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T: Component> TypeDescriptorBuilder<T> {
    fn new(name: String) -> Self {
        Self {
            descriptor: TypeDescriptor {
                name,
                type_id: TypeId::of::<T>(),
                interfaces: Vec::new(),
                constructors: Vec::new(),
                properties: Vec::new(),
                methods: Vec::new(),
                hooks: HashMap::new(),
            },
            _marker: std::marker::PhantomData,
        }
    }

    pub fn implements(mut self, capability: impl Into<String>) -> Self {
        self.descriptor.interfaces.push(capability.into());
        self
    }

    pub fn constructor<F>(mut self, params: Vec<ValueType>, factory: F) -> Self
    where
        F: Fn(Args) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        let factory: Arc<ConstructorFn> =
            Arc::new(move |args: Args| factory(args).map(|value| Arc::new(value) as Instance));
        self.descriptor
            .constructors
            .push(ConstructorDescriptor { params, factory });
        self
    }

    pub fn property<F>(mut self, name: impl Into<String>, value_type: ValueType, setter: F) -> Self
    where
        F: Fn(&T, Value) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        let name = name.into();
        let property_name = name.clone();
        let setter: Arc<SetterFn> = Arc::new(move |target: &dyn Component, value: Value| {
            let concrete = target.downcast_ref::<T>().ok_or_else(|| {
                BoxError::from(format!(
                    "cannot write '{}' on {}",
                    property_name,
                    target.component_type()
                ))
            })?;
            setter(concrete, value)
        });
        self.descriptor.properties.push(PropertyDescriptor {
            name,
            value_type,
            setter,
        });
        self
    }

    pub fn method<F>(
        mut self,
        declaring_type: impl Into<String>,
        name: impl Into<String>,
        params: Vec<ValueType>,
        invoker: F,
    ) -> Self
    where
        F: Fn(&T, &[Value]) -> InvocationResult + Send + Sync + 'static,
    {
        let signature = MethodSignature::new(declaring_type, name, params);
        let method_name = signature.name.clone();
        let invoker: Arc<InvokerFn> = Arc::new(move |target: &dyn Component, args: &[Value]| {
            let concrete = target
                .downcast_ref::<T>()
                .ok_or_else(|| InvocationError::NoSuchMethod {
                    type_name: target.component_type().to_string(),
                    method: method_name.clone(),
                })?;
            invoker(concrete, args)
        });
        self.descriptor.methods.push(MethodDescriptor {
            signature,
            invoker: Some(invoker),
        });
        self
    }

    /// 호출 클로저 없이 시그니처만 선언합니다. 실행은 `Component::invoke` 가 담당합니다.
    pub fn method_signature(mut self, signature: MethodSignature) -> Self {
        self.descriptor.methods.push(MethodDescriptor {
            signature,
            invoker: None,
        });
        self
    }

    pub fn hook<F>(mut self, name: impl Into<String>, hook: F) -> Self
    where
        F: Fn(&T) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        let name = name.into();
        let hook_name = name.clone();
        let hook: Arc<HookFn> = Arc::new(move |target: &dyn Component| {
            let concrete = target.downcast_ref::<T>().ok_or_else(|| {
                BoxError::from(format!(
                    "cannot call '{}' on {}",
                    hook_name,
                    target.component_type()
                ))
            })?;
            hook(concrete)
        });
        self.descriptor.hooks.insert(name, hook);
        self
    }

    pub fn build(self) -> TypeDescriptor {
        self.descriptor
    }
}
