//! # Container
//!
//! 이름이 붙은 정의로부터 인스턴스를 만들고, 참조를 해석하고, 생명주기를 관리하는
//! IoC 컨테이너입니다.
//!
//! ## 해석 흐름
//!
//! ```text
//! resolve(name)
//!   ├─ L1 hit → 반환
//!   ├─ singleton
//!   │    ├─ 생성 락 획득 (같은 스레드 재진입 허용)
//!   │    ├─ 생성 중? → 조기 참조(L2/L3) 또는 CircularConstructorDependency
//!   │    └─ 생성 파이프라인 → L1 승격 / 실패 시 흔적 제거
//!   └─ prototype
//!        ├─ 현재 스레드의 생성 중 집합에 있음? → CircularPrototypeDependency
//!        └─ 생성 파이프라인 (캐시하지 않음)
//! ```
//!
//! ## 생성 파이프라인
//!
//! 1. **instantiate** - 생성자 인자 해석, 생성자 선택, 호출
//! 2. **early expose** - 싱글톤이고 생성자 참조가 없을 때만 L3 공급자 등록
//! 3. **populate** - 프로퍼티 값 해석/변환 후 setter 호출
//! 4. **initialize** - aware 콜백 → 전처리 → 초기화 콜백/훅 → 후처리
//! 5. **register for teardown** - 싱글톤이고 파괴 capability 또는 destroy 훅이 있으면 등록
//!
//! ## 동시성
//!
//! 싱글톤 생성은 컨테이너 단위의 재진입 가능한 단일 락으로 직렬화됩니다.
//! 같은 이름에 대한 동시 요청은 한 번만 생성되며, 서로 다른 이름의 생성도
//! 같은 락을 공유하므로 독립적으로 진행된다고 가정해서는 안 됩니다.
//!
//! ## Spring과의 비교
//!
//! | Spring | 이 시스템 |
//! |--------|-----------|
//! | `DefaultListableBeanFactory` | `Container` |
//! | `getBean(name)` | `resolve(name)` |
//! | `getBean(name, Class)` | `resolve_as::<T>(name)` / `resolve_typed(name, type)` |
//! | `getBean(Class)` | `resolve_by_type(type)` |
//! | `preInstantiateSingletons()` | `refresh()` |
//! | `destroySingletons()` | `close()` |

use std::cell::RefCell;
use std::collections::HashSet;
use std::sync::{Arc, Weak};

use log::{debug, info, warn};
use parking_lot::{Mutex, ReentrantMutex, RwLock};
use uuid::Uuid;

use crate::aop::proxy::AopProxy;
use crate::config::ContainerConfig;
use crate::core::cache::{InstanceState, SingletonCache};
use crate::core::component::{Component, Instance, AFTER_PROPERTIES_SET, DESTROY};
use crate::core::definition::{ArgumentValue, EntityDefinition};
use crate::core::descriptor::{ConstructorDescriptor, TypeDescriptor};
use crate::core::errors::{ContainerError, ContainerResult, EntityContext};
use crate::core::processor::{EntityPostProcessor, ProcessorChain};
use crate::core::registry::{DefinitionRegistry, TypeRegistry};
use crate::core::value::{TypeConverter, Value, ValueType};

thread_local! {
    /// 현재 스레드의 호출 스택에서 생성 중인 프로토타입 (컨테이너 id, 이름)
    static PROTOTYPES_IN_CREATION: RefCell<HashSet<(Uuid, String)>> = RefCell::new(HashSet::new());
}

/// 프로토타입 생성 중 표시. drop 시 해제됩니다.
struct PrototypeCreation {
    key: (Uuid, String),
}

impl PrototypeCreation {
    fn enter(container: Uuid, name: &str) -> Option<Self> {
        let key = (container, name.to_string());
        let inserted = PROTOTYPES_IN_CREATION.with(|set| set.borrow_mut().insert(key.clone()));
        inserted.then_some(Self { key })
    }

    fn contains(container: Uuid, name: &str) -> bool {
        PROTOTYPES_IN_CREATION.with(|set| set.borrow().contains(&(container, name.to_string())))
    }
}

impl Drop for PrototypeCreation {
    fn drop(&mut self) {
        PROTOTYPES_IN_CREATION.with(|set| {
            set.borrow_mut().remove(&self.key);
        });
    }
}

/// 파괴 단계에서 처리할 싱글톤
struct DisposableEntry {
    name: String,
    instance: Instance,
    definition: Arc<EntityDefinition>,
}

/// IoC 컨테이너
pub struct Container {
    id: Uuid,
    config: ContainerConfig,
    self_ref: Weak<Container>,
    definitions: RwLock<DefinitionRegistry>,
    types: RwLock<TypeRegistry>,
    cache: SingletonCache,
    creation_lock: ReentrantMutex<()>,
    processors: ProcessorChain,
    disposables: Mutex<Vec<DisposableEntry>>,
    manual_singletons: Mutex<Vec<String>>,
    converter: TypeConverter,
}

impl Container {
    /// 기본 설정으로 컨테이너를 만듭니다.
    pub fn new() -> Arc<Self> {
        Self::with_config(ContainerConfig::default())
    }

    /// `inventory` 로 제출된 타입이 모두 등록된 컨테이너를 만듭니다.
    pub fn with_config(config: ContainerConfig) -> Arc<Self> {
        let types = TypeRegistry::with_registered_types();
        let allow_overriding = config.allow_definition_overriding;

        Arc::new_cyclic(|self_ref| {
            let container = Container {
                id: Uuid::new_v4(),
                config,
                self_ref: self_ref.clone(),
                definitions: RwLock::new(DefinitionRegistry::new(allow_overriding)),
                types: RwLock::new(types),
                cache: SingletonCache::new(),
                creation_lock: ReentrantMutex::new(()),
                processors: ProcessorChain::new(),
                disposables: Mutex::new(Vec::new()),
                manual_singletons: Mutex::new(Vec::new()),
                converter: TypeConverter::new(),
            };
            debug!(
                "🏗️ Container {} created ({} types known)",
                container.id,
                container.types.read().len()
            );
            container
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    // ========== 등록 ==========

    /// 정의를 등록합니다.
    ///
    /// # Errors
    ///
    /// * `DuplicateDefinition` - 덮어쓰기가 허용되지 않았고 같은 이름이 이미 있음
    pub fn register(&self, name: &str, definition: EntityDefinition) -> ContainerResult<()> {
        debug!("📝 Registering '{}' ({})", name, definition.type_name);
        self.definitions.write().register(name, definition)
    }

    /// 완성된 인스턴스를 싱글톤으로 직접 등록합니다.
    ///
    /// 생성 파이프라인과 후처리기를 거치지 않으며, 파괴 단계 대상도 아닙니다.
    pub fn register_singleton(&self, name: &str, instance: Instance) -> ContainerResult<()> {
        let _guard = self.creation_lock.lock();

        if !self.config.allow_definition_overriding
            && (self.cache.ready(name).is_some() || self.contains_definition(name))
        {
            return Err(ContainerError::DuplicateDefinition {
                name: name.to_string(),
            });
        }

        let mut manual = self.manual_singletons.lock();
        if !manual.iter().any(|existing| existing == name) {
            manual.push(name.to_string());
        }
        self.cache.register_ready(name, instance);
        debug!("📌 Singleton '{}' registered", name);
        Ok(())
    }

    /// 런타임에 타입 디스크립터를 등록합니다.
    pub fn register_type(&self, descriptor: TypeDescriptor) -> Arc<TypeDescriptor> {
        debug!("📦 Type registered: {}", descriptor.name);
        self.types.write().register(descriptor)
    }

    /// 후처리기를 추가합니다. 이미 생성된 싱글톤에는 적용되지 않습니다.
    pub fn add_processor(&self, processor: Arc<dyn EntityPostProcessor>) {
        self.processors.add(processor);
    }

    pub fn processor_count(&self) -> usize {
        self.processors.len()
    }

    // ========== 조회 ==========

    pub fn contains_definition(&self, name: &str) -> bool {
        self.definitions.read().contains(name)
    }

    pub fn definition(&self, name: &str) -> ContainerResult<Arc<EntityDefinition>> {
        self.definitions.read().get(name)
    }

    /// 등록 순서대로 정의 이름을 반환합니다.
    pub fn definition_names(&self) -> Vec<String> {
        self.definitions.read().names()
    }

    pub fn instance_state(&self, name: &str) -> InstanceState {
        self.cache.state(name)
    }

    pub fn is_currently_in_creation(&self, name: &str) -> bool {
        self.cache.is_in_creation(name) || PrototypeCreation::contains(self.id, name)
    }

    pub fn descriptor_of(&self, instance: &Instance) -> Option<Arc<TypeDescriptor>> {
        self.types.read().descriptor_of(&**instance)
    }

    pub fn type_descriptor(&self, type_name: &str) -> Option<Arc<TypeDescriptor>> {
        self.types.read().get(type_name)
    }

    /// `type_name` 에 대입 가능한 엔티티 이름 (정의 등록 순서, 이어서 직접 등록한 싱글톤)
    ///
    /// 인스턴스를 만들지 않고 타입 디스크립터만으로 판단합니다.
    pub fn names_of_type(&self, type_name: &str) -> Vec<String> {
        let entries = self.definitions.read().entries();
        let types = self.types.read();

        let mut names: Vec<String> = entries
            .into_iter()
            .filter(|(_, definition)| {
                types
                    .get(&definition.type_name)
                    .is_some_and(|descriptor| descriptor.is_assignable_to(type_name))
            })
            .map(|(name, _)| name)
            .collect();

        for name in self.manual_singletons.lock().iter() {
            if names.contains(name) {
                continue;
            }
            if let Some(instance) = self.cache.ready(name) {
                if types.is_instance_assignable(&instance, type_name) {
                    names.push(name.clone());
                }
            }
        }

        names
    }

    /// `type_name` 에 대입 가능한 모든 엔티티를 해석합니다.
    pub fn entities_of_type(&self, type_name: &str) -> ContainerResult<Vec<(String, Instance)>> {
        self.names_of_type(type_name)
            .into_iter()
            .map(|name| self.resolve(&name).map(|instance| (name, instance)))
            .collect()
    }

    // ========== 해석 ==========

    /// 이름으로 인스턴스를 해석합니다.
    ///
    /// # Errors
    ///
    /// * `DefinitionNotFound` - 정의도, 직접 등록된 싱글톤도 없음
    /// * `ResolutionFailed` - 생성 중 실패 (원인은 `root_cause()` 로 확인)
    pub fn resolve(&self, name: &str) -> ContainerResult<Instance> {
        if let Some(instance) = self.cache.ready(name) {
            return Ok(instance);
        }

        let definition = self.definition(name)?;
        if definition.is_singleton() {
            self.resolve_singleton(name, &definition)
        } else {
            self.resolve_prototype(name, &definition)
        }
    }

    /// 해석 후 구체 타입으로 다운캐스트합니다. 프록시는 구체 타입이 아니므로 실패합니다.
    pub fn resolve_as<T: Component>(&self, name: &str) -> ContainerResult<Arc<T>> {
        let instance = self.resolve(name)?;
        let actual = self.type_name_of(&instance);
        instance
            .downcast_arc::<T>()
            .map_err(|_| ContainerError::TypeMismatch {
                name: name.to_string(),
                expected: std::any::type_name::<T>().to_string(),
                actual,
            })
    }

    /// 해석 후 타입 이름(또는 capability 이름)으로 대입 가능성을 확인합니다.
    pub fn resolve_typed(&self, name: &str, type_name: &str) -> ContainerResult<Instance> {
        let instance = self.resolve(name)?;
        if self.types.read().is_instance_assignable(&instance, type_name) {
            Ok(instance)
        } else {
            Err(ContainerError::TypeMismatch {
                name: name.to_string(),
                expected: type_name.to_string(),
                actual: self.type_name_of(&instance),
            })
        }
    }

    /// 타입으로 유일한 엔티티를 해석합니다.
    ///
    /// # Errors
    ///
    /// * `NoEntityOfType` - 후보 없음
    /// * `AmbiguousType` - 후보가 둘 이상
    pub fn resolve_by_type(&self, type_name: &str) -> ContainerResult<Instance> {
        let mut candidates = self.names_of_type(type_name);
        match candidates.len() {
            0 => Err(ContainerError::NoEntityOfType {
                type_name: type_name.to_string(),
            }),
            1 => {
                let name = candidates.remove(0);
                self.resolve(&name)
            }
            _ => Err(ContainerError::AmbiguousType {
                type_name: type_name.to_string(),
                candidates,
            }),
        }
    }

    fn resolve_singleton(
        &self,
        name: &str,
        definition: &Arc<EntityDefinition>,
    ) -> ContainerResult<Instance> {
        let _guard = self.creation_lock.lock();

        if let Some(instance) = self.cache.ready(name) {
            return Ok(instance);
        }

        if self.cache.is_in_creation(name) {
            return match self.cache.early_reference(name) {
                Some(early) => {
                    debug!("🔁 Early reference handed out for '{}'", name);
                    Ok(early)
                }
                None => Err(ContainerError::CircularConstructorDependency {
                    name: name.to_string(),
                }),
            };
        }

        self.cache.begin_creation(name);
        debug!("🔨 Creating singleton '{}'", name);

        match self.create_entity(name, definition) {
            Ok(instance) => {
                if let Some(early) = self.cache.complete(name, instance.clone()) {
                    if !Arc::ptr_eq(&early, &instance) {
                        warn!(
                            "⚠️ '{}' was handed out early as a raw reference but its final instance differs; peers keep the raw reference",
                            name
                        );
                    }
                }
                debug!("✅ Singleton '{}' ready", name);
                Ok(instance)
            }
            Err(e) => {
                let evicted = self.cache.abort(name);
                if !evicted.is_empty() {
                    warn!(
                        "⚠️ '{}' failed; evicting {:?} which captured its early reference",
                        name, evicted
                    );
                    self.disposables
                        .lock()
                        .retain(|entry| !evicted.contains(&entry.name));
                }
                Err(e.wrap(name))
            }
        }
    }

    fn resolve_prototype(
        &self,
        name: &str,
        definition: &Arc<EntityDefinition>,
    ) -> ContainerResult<Instance> {
        let Some(_creation) = PrototypeCreation::enter(self.id, name) else {
            return Err(ContainerError::CircularPrototypeDependency {
                name: name.to_string(),
            });
        };

        self.create_entity(name, definition)
            .map_err(|e| e.wrap(name))
    }

    // ========== 생성 파이프라인 ==========

    fn create_entity(
        &self,
        name: &str,
        definition: &Arc<EntityDefinition>,
    ) -> ContainerResult<Instance> {
        let descriptor = self.type_descriptor(&definition.type_name).ok_or_else(|| {
            ContainerError::ConstructionFailure {
                name: name.to_string(),
                reason: format!("no type descriptor registered for '{}'", definition.type_name),
            }
        })?;

        let raw = self.instantiate(name, definition, &descriptor)?;

        if definition.is_singleton() && !definition.has_constructor_references() {
            self.expose_early_reference(name, &raw);
        }

        self.populate(name, definition, &descriptor, &raw)?;
        let instance = self.initialize(name, definition, raw)?;
        self.register_disposable_if_necessary(name, definition, &instance);

        Ok(instance)
    }

    fn expose_early_reference(&self, name: &str, raw: &Instance) {
        let container = self.self_ref.clone();
        let exposed = raw.clone();
        let entity = name.to_string();

        self.cache.add_factory(
            name,
            Box::new(move || match container.upgrade() {
                Some(container) => container.processors.apply_early_reference(exposed, &entity),
                None => exposed,
            }),
        );
    }

    /// 인자 값을 해석합니다. 참조라면 `dependent` 를 그 이름의 의존자로 기록합니다.
    fn resolve_argument(&self, dependent: &str, value: &ArgumentValue) -> ContainerResult<Value> {
        match value {
            ArgumentValue::Literal(literal) => Ok(Value::Str(literal.clone())),
            ArgumentValue::Reference(reference) => {
                let instance = self.resolve(reference)?;
                self.cache.register_dependent(reference, dependent);
                Ok(Value::Instance(instance))
            }
        }
    }

    fn instantiate(
        &self,
        name: &str,
        definition: &EntityDefinition,
        descriptor: &TypeDescriptor,
    ) -> ContainerResult<Instance> {
        let args = definition
            .constructor_args
            .iter()
            .map(|arg| self.resolve_argument(name, arg))
            .collect::<ContainerResult<Vec<Value>>>()?;

        let constructor = self.select_constructor(descriptor, &args).ok_or_else(|| {
            let kinds: Vec<&str> = args.iter().map(Value::kind).collect();
            ContainerError::ConstructionFailure {
                name: name.to_string(),
                reason: format!(
                    "{} has no constructor matching ({})",
                    descriptor.name,
                    kinds.join(", ")
                ),
            }
        })?;

        let converted = args
            .into_iter()
            .zip(&constructor.params)
            .map(|(value, param)| self.converter.convert_if_necessary(value, param))
            .collect::<Result<Vec<Value>, String>>()
            .with_reason(name, || format!("constructor argument of {}", descriptor.name))?;

        constructor.invoke(converted).for_entity(name)
    }

    /// 정확히 일치하는 생성자를 우선하고, 없으면 인자 수가 같고 모든 파라미터가
    /// 대입 가능한 첫 번째 생성자를 고릅니다.
    fn select_constructor<'d>(
        &self,
        descriptor: &'d TypeDescriptor,
        args: &[Value],
    ) -> Option<&'d ConstructorDescriptor> {
        let types = self.types.read();
        let same_arity = || {
            descriptor
                .constructors
                .iter()
                .filter(|constructor| constructor.params.len() == args.len())
        };

        same_arity()
            .find(|constructor| {
                constructor
                    .params
                    .iter()
                    .zip(args)
                    .all(|(param, arg)| Self::is_exact_match(&types, param, arg))
            })
            .or_else(|| {
                same_arity().find(|constructor| {
                    constructor
                        .params
                        .iter()
                        .zip(args)
                        .all(|(param, arg)| Self::is_assignable(&types, param, arg))
                })
            })
    }

    fn is_exact_match(types: &TypeRegistry, param: &ValueType, arg: &Value) -> bool {
        match (param, arg) {
            (ValueType::Str, Value::Str(_))
            | (ValueType::Int, Value::Int(_))
            | (ValueType::Float, Value::Float(_))
            | (ValueType::Bool, Value::Bool(_))
            | (ValueType::Char, Value::Char(_)) => true,
            (ValueType::Component(key), Value::Instance(instance)) => types
                .descriptor_of(&**instance)
                .is_some_and(|descriptor| &descriptor.name == key),
            _ => false,
        }
    }

    fn is_assignable(types: &TypeRegistry, param: &ValueType, arg: &Value) -> bool {
        match (param, arg) {
            (ValueType::Any, _) => true,
            (ValueType::Optional(_), Value::Null) => true,
            (ValueType::Optional(inner), other) => Self::is_assignable(types, inner, other),
            (ValueType::Component(_), Value::Null) => true,
            (ValueType::Component(key), Value::Instance(instance)) => {
                types.is_instance_assignable(instance, key)
            }
            (scalar, Value::Str(_)) if scalar.is_scalar() => true,
            (ValueType::Float, Value::Int(_)) => true,
            _ => Self::is_exact_match(types, param, arg),
        }
    }

    fn populate(
        &self,
        name: &str,
        definition: &EntityDefinition,
        descriptor: &TypeDescriptor,
        instance: &Instance,
    ) -> ContainerResult<()> {
        for binding in &definition.properties {
            let property = descriptor.property(&binding.name).ok_or_else(|| {
                ContainerError::PropertyNotWritable {
                    name: name.to_string(),
                    property: binding.name.clone(),
                }
            })?;

            let value = self.resolve_argument(name, &binding.value)?;
            if matches!(value, Value::Instance(_))
                && !Self::is_assignable(&self.types.read(), &property.value_type, &value)
            {
                return Err(ContainerError::ConstructionFailure {
                    name: name.to_string(),
                    reason: format!(
                        "property '{}' of type {} cannot hold {}",
                        binding.name,
                        property.value_type,
                        value
                            .as_instance()
                            .map(|instance| self.type_name_of(instance))
                            .unwrap_or_default()
                    ),
                });
            }
            let value = self
                .converter
                .convert_if_necessary(value, &property.value_type)
                .with_reason(name, || format!("property '{}'", binding.name))?;

            property
                .write(&**instance, value)
                .with_reason(name, || format!("writing property '{}'", binding.name))?;
        }
        Ok(())
    }

    fn initialize(
        &self,
        name: &str,
        definition: &EntityDefinition,
        instance: Instance,
    ) -> ContainerResult<Instance> {
        self.invoke_aware_callbacks(name, &instance);

        let instance = self
            .processors
            .apply_before_initialization(instance, name, self)?;

        self.invoke_init_methods(name, definition, &instance)?;

        self.processors
            .apply_after_initialization(instance, name, self)
    }

    fn invoke_aware_callbacks(&self, name: &str, instance: &Instance) {
        if let Some(aware) = instance.as_name_aware() {
            aware.set_entity_name(name);
        }
        if let Some(aware) = instance.as_container_aware() {
            aware.set_container(self.self_ref.clone());
        }
    }

    fn invoke_init_methods(
        &self,
        name: &str,
        definition: &EntityDefinition,
        instance: &Instance,
    ) -> ContainerResult<()> {
        let initializing = instance.as_initializing();

        if let Some(initializing) = initializing {
            debug!("'{}': {}", name, AFTER_PROPERTIES_SET);
            initializing
                .after_properties_set()
                .map_err(|e| ContainerError::LifecycleHookFailure {
                    name: name.to_string(),
                    hook: AFTER_PROPERTIES_SET.to_string(),
                    reason: e.to_string(),
                })?;
        }

        if let Some(hook) = definition.init_method_name() {
            if !(initializing.is_some() && hook == AFTER_PROPERTIES_SET) {
                self.invoke_named_hook(name, hook, instance)?;
            }
        }
        Ok(())
    }

    /// 이름으로 지정된 훅을 실행합니다. 프록시라면 타깃에서 실행합니다.
    fn invoke_named_hook(&self, name: &str, hook: &str, instance: &Instance) -> ContainerResult<()> {
        let target = match instance.downcast_ref::<AopProxy>() {
            Some(proxy) => proxy.target().clone(),
            None => instance.clone(),
        };

        let hook_failure = |reason: String| ContainerError::LifecycleHookFailure {
            name: name.to_string(),
            hook: hook.to_string(),
            reason,
        };

        let descriptor = self
            .descriptor_of(&target)
            .ok_or_else(|| hook_failure(format!("{} has no type descriptor", target.component_type())))?;

        debug!("'{}': {}", name, hook);
        descriptor
            .invoke_hook(hook, &*target)
            .map_err(|e| hook_failure(e.to_string()))
    }

    fn register_disposable_if_necessary(
        &self,
        name: &str,
        definition: &Arc<EntityDefinition>,
        instance: &Instance,
    ) {
        if !definition.is_singleton() {
            return;
        }
        if instance.as_disposable().is_some() || definition.destroy_method_name().is_some() {
            self.disposables.lock().push(DisposableEntry {
                name: name.to_string(),
                instance: instance.clone(),
                definition: definition.clone(),
            });
        }
    }

    // ========== 생명주기 ==========

    /// 지연 초기화가 아닌 모든 싱글톤을 등록 순서대로 미리 생성합니다.
    ///
    /// `pre_instantiate_singletons` 가 꺼져 있으면 아무것도 하지 않습니다.
    pub fn refresh(&self) -> ContainerResult<()> {
        if !self.config.pre_instantiate_singletons {
            info!("⏭️ Singleton pre-instantiation disabled");
            return Ok(());
        }

        let entries = self.definitions.read().entries();
        let mut created = 0;
        for (name, definition) in entries {
            if definition.is_singleton() && !definition.lazy_init {
                self.resolve(&name)?;
                created += 1;
            }
        }

        info!("🚀 Container refreshed: {} singletons pre-instantiated", created);
        Ok(())
    }

    /// 파괴 단계를 실행하고 모든 캐시를 비웁니다.
    ///
    /// 등록된 역순으로 파괴하며, 개별 실패는 로그로 남기고 수집만 합니다.
    pub fn close(&self) -> Vec<ContainerError> {
        let _guard = self.creation_lock.lock();

        let entries = std::mem::take(&mut *self.disposables.lock());
        let mut failures = Vec::new();

        for entry in entries.iter().rev() {
            if let Err(e) = self.destroy_entity(entry) {
                warn!("⚠️ Destroy failed for '{}': {}", entry.name, e);
                failures.push(e);
            }
        }

        for name in self.cache.ready_names() {
            self.cache.mark_destroyed(&name);
        }
        self.cache.clear();
        self.manual_singletons.lock().clear();

        info!(
            "🛑 Container closed: {} destroyed, {} failures",
            entries.len(),
            failures.len()
        );
        failures
    }

    fn destroy_entity(&self, entry: &DisposableEntry) -> ContainerResult<()> {
        debug!("🧹 Destroying '{}'", entry.name);
        let disposable = entry.instance.as_disposable();

        if let Some(disposable) = disposable {
            disposable
                .destroy()
                .map_err(|e| ContainerError::LifecycleHookFailure {
                    name: entry.name.clone(),
                    hook: DESTROY.to_string(),
                    reason: e.to_string(),
                })?;
        }

        if let Some(hook) = entry.definition.destroy_method_name() {
            if !(disposable.is_some() && hook == DESTROY) {
                self.invoke_named_hook(&entry.name, hook, &entry.instance)?;
            }
        }
        Ok(())
    }

    fn type_name_of(&self, instance: &Instance) -> String {
        self.descriptor_of(instance)
            .map(|descriptor| descriptor.name.clone())
            .unwrap_or_else(|| instance.component_type().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::component::{
        ContainerAware, DisposableComponent, InitializingComponent, NameAware,
    };
    use crate::core::definition::Scope;
    use crate::core::descriptor::Args;
    use crate::core::errors::BoxError;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::thread;

    // ---------- fixtures ----------

    #[derive(Default)]
    struct Node {
        peer: Mutex<Option<Instance>>,
        label: Mutex<String>,
    }

    impl Component for Node {}

    fn node_type() -> TypeDescriptor {
        TypeDescriptor::builder::<Node>("Node")
            .implements("Linked")
            .constructor(vec![], |_| Ok(Node::default()))
            .constructor(vec![ValueType::component("Node")], |args| {
                let node = Node::default();
                *node.peer.lock() = Some(args.instance(0)?);
                Ok(node)
            })
            .property("peer", ValueType::component("Linked"), |node, value| {
                *node.peer.lock() = value.as_instance().cloned();
                Ok(())
            })
            .property("label", ValueType::Str, |node, value| {
                *node.label.lock() = value.as_str().unwrap_or_default().to_string();
                Ok(())
            })
            .build()
    }

    fn peer_of(instance: &Instance) -> Instance {
        instance
            .downcast_ref::<Node>()
            .and_then(|node| node.peer.lock().clone())
            .expect("peer wired")
    }

    struct Counted {
        size: i64,
    }

    impl Component for Counted {}

    fn counted_type(counter: Arc<AtomicUsize>) -> TypeDescriptor {
        let with_size = counter.clone();
        TypeDescriptor::builder::<Counted>("Counted")
            .constructor(vec![], move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Counted { size: 0 })
            })
            .constructor(vec![ValueType::Int], move |args| {
                with_size.fetch_add(1, Ordering::SeqCst);
                Ok(Counted { size: args.int(0)? })
            })
            .build()
    }

    struct Tracked {
        label: String,
        fail: bool,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl DisposableComponent for Tracked {
        fn destroy(&self) -> Result<(), BoxError> {
            if self.fail {
                return Err(format!("{} refused to stop", self.label).into());
            }
            self.log.lock().push(self.label.clone());
            Ok(())
        }
    }

    impl Component for Tracked {
        fn as_disposable(&self) -> Option<&dyn DisposableComponent> {
            Some(self)
        }
    }

    fn tracked_type(log: Arc<Mutex<Vec<String>>>) -> TypeDescriptor {
        TypeDescriptor::builder::<Tracked>("Tracked")
            .constructor(vec![ValueType::Str, ValueType::Bool], move |args| {
                Ok(Tracked {
                    label: args.str(0)?,
                    fail: args.bool(1)?,
                    log: log.clone(),
                })
            })
            .build()
    }

    #[derive(Default)]
    struct CustomBean {
        initialized: AtomicBool,
        destroyed: AtomicBool,
    }

    impl Component for CustomBean {}

    fn custom_bean_type() -> TypeDescriptor {
        TypeDescriptor::builder::<CustomBean>("CustomBean")
            .constructor(vec![], |_| Ok(CustomBean::default()))
            .hook("myInit", |bean| {
                bean.initialized.store(true, Ordering::SeqCst);
                Ok(())
            })
            .hook("myDestroy", |bean| {
                bean.destroyed.store(true, Ordering::SeqCst);
                Ok(())
            })
            .build()
    }

    struct Lifecycle {
        events: Arc<Mutex<Vec<String>>>,
        init_calls: AtomicUsize,
    }

    impl Lifecycle {
        fn record(&self, event: impl Into<String>) {
            self.events.lock().push(event.into());
        }
    }

    impl NameAware for Lifecycle {
        fn set_entity_name(&self, name: &str) {
            self.record(format!("name:{}", name));
        }
    }

    impl ContainerAware for Lifecycle {
        fn set_container(&self, container: Weak<Container>) {
            if container.upgrade().is_some() {
                self.record("container");
            }
        }
    }

    impl InitializingComponent for Lifecycle {
        fn after_properties_set(&self) -> Result<(), BoxError> {
            self.init_calls.fetch_add(1, Ordering::SeqCst);
            self.record("after_properties_set");
            Ok(())
        }
    }

    impl Component for Lifecycle {
        fn as_name_aware(&self) -> Option<&dyn NameAware> {
            Some(self)
        }

        fn as_container_aware(&self) -> Option<&dyn ContainerAware> {
            Some(self)
        }

        fn as_initializing(&self) -> Option<&dyn InitializingComponent> {
            Some(self)
        }
    }

    fn lifecycle_type(events: Arc<Mutex<Vec<String>>>) -> TypeDescriptor {
        TypeDescriptor::builder::<Lifecycle>("Lifecycle")
            .constructor(vec![], move |_| {
                Ok(Lifecycle {
                    events: events.clone(),
                    init_calls: AtomicUsize::new(0),
                })
            })
            .hook(AFTER_PROPERTIES_SET, |lifecycle| {
                lifecycle.init_calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .hook("start", |lifecycle| {
                lifecycle.record("start");
                Ok(())
            })
            .build()
    }

    struct PhaseRecorder;

    impl EntityPostProcessor for PhaseRecorder {
        fn before_initialization(
            &self,
            instance: Instance,
            _name: &str,
            _container: &Container,
        ) -> ContainerResult<Option<Instance>> {
            if let Some(lifecycle) = instance.downcast_ref::<Lifecycle>() {
                lifecycle.record("before");
            }
            Ok(Some(instance))
        }

        fn after_initialization(
            &self,
            instance: Instance,
            _name: &str,
            _container: &Container,
        ) -> ContainerResult<Option<Instance>> {
            if let Some(lifecycle) = instance.downcast_ref::<Lifecycle>() {
                lifecycle.record("after");
            }
            Ok(Some(instance))
        }
    }

    struct Wrapped {
        inner: Instance,
    }

    impl Component for Wrapped {}

    struct WrapNamed(&'static str);

    impl EntityPostProcessor for WrapNamed {
        fn after_initialization(
            &self,
            instance: Instance,
            name: &str,
            _container: &Container,
        ) -> ContainerResult<Option<Instance>> {
            if name == self.0 {
                return Ok(Some(Arc::new(Wrapped { inner: instance })));
            }
            Ok(Some(instance))
        }
    }

    struct Picked {
        chosen: &'static str,
        value: Value,
    }

    impl Component for Picked {}

    fn picked(chosen: &'static str, args: Args) -> Result<Picked, BoxError> {
        Ok(Picked {
            chosen,
            value: args.get(0)?.clone(),
        })
    }

    /// 같은 인자 수의 생성자가 겹치도록 선언한 타입
    fn picked_type() -> TypeDescriptor {
        TypeDescriptor::builder::<Picked>("Picked")
            .constructor(vec![ValueType::Any], |args| picked("any", args))
            .constructor(vec![ValueType::Str], |args| picked("str", args))
            .constructor(vec![ValueType::component("Unrelated"), ValueType::Int], |args| {
                picked("unrelated", args)
            })
            .constructor(
                vec![ValueType::optional(ValueType::component("Linked")), ValueType::Int],
                |args| picked("optional-linked", args),
            )
            .constructor(
                vec![ValueType::Bool, ValueType::optional(ValueType::Int)],
                |args| Ok(Picked { chosen: "optional-int", value: args.get(1)?.clone() }),
            )
            .build()
    }

    fn container_with_nodes() -> Arc<Container> {
        let container = Container::new();
        container.register_type(node_type());
        container
    }

    // ---------- scopes ----------

    #[test]
    fn test_singleton_resolves_to_identical_instance() {
        let container = container_with_nodes();
        container.register("node", EntityDefinition::new("Node")).unwrap();

        let first = container.resolve("node").unwrap();
        let second = container.resolve("node").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(container.instance_state("node"), InstanceState::Ready);
    }

    #[test]
    fn test_prototype_resolves_to_distinct_instances() {
        let container = container_with_nodes();
        container
            .register(
                "node",
                EntityDefinition::new("Node").with_scope(Scope::Prototype),
            )
            .unwrap();

        let first = container.resolve("node").unwrap();
        let second = container.resolve("node").unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(container.instance_state("node"), InstanceState::NotCreated);
    }

    // ---------- circular references ----------

    #[test]
    fn test_setter_cycle_between_singletons_is_resolved() {
        let container = container_with_nodes();
        container
            .register(
                "a",
                EntityDefinition::new("Node").property("peer", ArgumentValue::reference("b")),
            )
            .unwrap();
        container
            .register(
                "b",
                EntityDefinition::new("Node").property("peer", ArgumentValue::reference("a")),
            )
            .unwrap();

        let a = container.resolve("a").unwrap();
        let b = container.resolve("b").unwrap();

        assert!(Arc::ptr_eq(&peer_of(&a), &b));
        assert!(Arc::ptr_eq(&peer_of(&peer_of(&a)), &a));
        assert!(Arc::ptr_eq(&peer_of(&peer_of(&b)), &b));
    }

    #[test]
    fn test_constructor_cycle_is_fatal() {
        let container = container_with_nodes();
        container
            .register(
                "a",
                EntityDefinition::new("Node").constructor_arg(ArgumentValue::reference("b")),
            )
            .unwrap();
        container
            .register(
                "b",
                EntityDefinition::new("Node").constructor_arg(ArgumentValue::reference("a")),
            )
            .unwrap();

        let error = container.resolve("a").err().expect("cycle must fail");

        assert!(matches!(
            error.root_cause(),
            ContainerError::CircularConstructorDependency { name } if name == "a"
        ));
        assert_eq!(error.resolution_path(), vec!["a", "b"]);
        assert_eq!(container.instance_state("a"), InstanceState::NotCreated);
        assert_eq!(container.instance_state("b"), InstanceState::NotCreated);
        assert!(!container.is_currently_in_creation("a"));
        assert!(container.resolve("b").is_err());
    }

    #[test]
    fn test_setter_side_of_mixed_cycle_can_be_exposed_early() {
        let container = container_with_nodes();
        container
            .register(
                "a",
                EntityDefinition::new("Node").constructor_arg(ArgumentValue::reference("b")),
            )
            .unwrap();
        container
            .register(
                "b",
                EntityDefinition::new("Node").property("peer", ArgumentValue::reference("a")),
            )
            .unwrap();

        let b = container.resolve("b").unwrap();
        let a = container.resolve("a").unwrap();

        assert!(Arc::ptr_eq(&peer_of(&a), &b));
        assert!(Arc::ptr_eq(&peer_of(&b), &a));
    }

    #[test]
    fn test_prototype_self_cycle_fails_every_time() {
        let container = container_with_nodes();
        container
            .register(
                "loop",
                EntityDefinition::new("Node")
                    .with_scope(Scope::Prototype)
                    .property("peer", ArgumentValue::reference("loop")),
            )
            .unwrap();

        for _ in 0..2 {
            let error = container.resolve("loop").err().expect("cycle must fail");
            assert!(matches!(
                error.root_cause(),
                ContainerError::CircularPrototypeDependency { name } if name == "loop"
            ));
        }
        assert!(!container.is_currently_in_creation("loop"));
    }

    #[test]
    fn test_prototype_tracking_is_per_thread() {
        let container = container_with_nodes();
        container
            .register(
                "leaf",
                EntityDefinition::new("Node").with_scope(Scope::Prototype),
            )
            .unwrap();

        let _creation = PrototypeCreation::enter(container.id(), "leaf");
        assert!(container.is_currently_in_creation("leaf"));

        let other = container.clone();
        let resolved = thread::spawn(move || other.resolve("leaf").is_ok())
            .join()
            .unwrap();
        assert!(resolved);
    }

    // ---------- construction ----------

    #[test]
    fn test_literal_constructor_argument_is_coerced() {
        let container = Container::new();
        container.register_type(counted_type(Arc::new(AtomicUsize::new(0))));
        container
            .register(
                "sized",
                EntityDefinition::new("Counted").constructor_arg(ArgumentValue::literal(" 12 ")),
            )
            .unwrap();

        let sized = container.resolve_as::<Counted>("sized").unwrap();
        assert_eq!(sized.size, 12);
    }

    #[test]
    fn test_unconvertible_literal_is_construction_failure() {
        let container = Container::new();
        container.register_type(counted_type(Arc::new(AtomicUsize::new(0))));
        container
            .register(
                "sized",
                EntityDefinition::new("Counted").constructor_arg(ArgumentValue::literal("twelve")),
            )
            .unwrap();

        let error = container.resolve("sized").err().expect("must fail");
        assert!(matches!(
            error.root_cause(),
            ContainerError::ConstructionFailure { name, .. } if name == "sized"
        ));
        assert_eq!(container.instance_state("sized"), InstanceState::NotCreated);
    }

    #[test]
    fn test_missing_setter_is_property_not_writable() {
        let container = container_with_nodes();
        container
            .register(
                "node",
                EntityDefinition::new("Node").property("color", ArgumentValue::literal("red")),
            )
            .unwrap();

        let error = container.resolve("node").err().expect("must fail");
        assert!(matches!(
            error.root_cause(),
            ContainerError::PropertyNotWritable { property, .. } if property == "color"
        ));
    }

    #[test]
    fn test_unknown_names() {
        let container = container_with_nodes();
        container
            .register(
                "node",
                EntityDefinition::new("Node").property("peer", ArgumentValue::reference("ghost")),
            )
            .unwrap();
        container.register("typo", EntityDefinition::new("Nod")).unwrap();

        assert!(matches!(
            container.resolve("ghost"),
            Err(ContainerError::DefinitionNotFound { .. })
        ));
        let error = container.resolve("node").err().unwrap();
        assert_eq!(error.resolution_path(), vec!["node"]);
        assert!(matches!(error.root_cause(), ContainerError::DefinitionNotFound { name } if name == "ghost"));
        assert!(matches!(
            container.resolve("typo").err().unwrap().root_cause(),
            ContainerError::ConstructionFailure { .. }
        ));
    }

    // ---------- lifecycle ----------

    #[test]
    fn test_initialization_order() {
        let container = Container::new();
        let events = Arc::new(Mutex::new(Vec::new()));
        container.register_type(lifecycle_type(events.clone()));
        container.add_processor(Arc::new(PhaseRecorder));
        container
            .register(
                "life",
                EntityDefinition::new("Lifecycle").with_init_method("start"),
            )
            .unwrap();

        container.resolve("life").unwrap();

        assert_eq!(
            *events.lock(),
            vec![
                "name:life",
                "container",
                "before",
                "after_properties_set",
                "start",
                "after"
            ]
        );
    }

    #[test]
    fn test_init_hook_named_like_capability_runs_once() {
        let container = Container::new();
        container.register_type(lifecycle_type(Arc::new(Mutex::new(Vec::new()))));
        container
            .register(
                "life",
                EntityDefinition::new("Lifecycle").with_init_method(AFTER_PROPERTIES_SET),
            )
            .unwrap();

        let life = container.resolve_as::<Lifecycle>("life").unwrap();
        assert_eq!(life.init_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_custom_init_and_destroy_hooks() {
        let container = Container::new();
        container.register_type(custom_bean_type());
        container
            .register(
                "customBean",
                EntityDefinition::new("CustomBean")
                    .with_init_method("myInit")
                    .with_destroy_method("myDestroy"),
            )
            .unwrap();

        let bean = container.resolve_as::<CustomBean>("customBean").unwrap();
        assert!(bean.initialized.load(Ordering::SeqCst));
        assert!(!bean.destroyed.load(Ordering::SeqCst));

        let failures = container.close();

        assert!(failures.is_empty());
        assert!(bean.destroyed.load(Ordering::SeqCst));
        assert_eq!(container.instance_state("customBean"), InstanceState::Destroyed);
    }

    #[test]
    fn test_missing_init_hook_is_lifecycle_failure() {
        let container = Container::new();
        container.register_type(custom_bean_type());
        container
            .register(
                "customBean",
                EntityDefinition::new("CustomBean").with_init_method("warmUp"),
            )
            .unwrap();

        let error = container.resolve("customBean").err().expect("must fail");
        assert!(matches!(
            error.root_cause(),
            ContainerError::LifecycleHookFailure { hook, .. } if hook == "warmUp"
        ));
    }

    #[test]
    fn test_destroy_runs_in_reverse_order_and_survives_failures() {
        let container = Container::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        container.register_type(tracked_type(log.clone()));
        for (name, fail) in [("first", "false"), ("second", "yes"), ("third", "0")] {
            container
                .register(
                    name,
                    EntityDefinition::new("Tracked")
                        .constructor_arg(ArgumentValue::literal(name))
                        .constructor_arg(ArgumentValue::literal(fail)),
                )
                .unwrap();
        }

        for name in ["third", "first", "second"] {
            container.resolve(name).unwrap();
        }
        let failures = container.close();

        assert_eq!(*log.lock(), vec!["first", "third"]);
        assert_eq!(failures.len(), 1);
        assert!(matches!(
            &failures[0],
            ContainerError::LifecycleHookFailure { name, hook, .. } if name == "second" && hook == DESTROY
        ));
        assert_eq!(container.instance_state("second"), InstanceState::Destroyed);
    }

    #[test]
    fn test_prototypes_are_not_tracked_for_destruction() {
        let container = Container::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        container.register_type(tracked_type(log.clone()));
        container
            .register(
                "temp",
                EntityDefinition::new("Tracked")
                    .with_scope(Scope::Prototype)
                    .constructor_arg(ArgumentValue::literal("temp"))
                    .constructor_arg(ArgumentValue::literal("false")),
            )
            .unwrap();

        container.resolve("temp").unwrap();
        container.close();

        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_resolve_after_close_rebuilds() {
        let container = container_with_nodes();
        container.register("node", EntityDefinition::new("Node")).unwrap();
        let before = container.resolve("node").unwrap();

        container.close();
        let after = container.resolve("node").unwrap();

        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(container.instance_state("node"), InstanceState::Ready);
    }

    #[test]
    fn test_exact_constructor_wins_over_earlier_assignable_one() {
        let container = Container::new();
        container.register_type(picked_type());
        container
            .register(
                "picked",
                EntityDefinition::new("Picked").constructor_arg(ArgumentValue::literal("x")),
            )
            .unwrap();

        let picked = container.resolve_as::<Picked>("picked").unwrap();
        assert_eq!(picked.chosen, "str");
        assert_eq!(picked.value, Value::from("x"));
    }

    #[test]
    fn test_capability_parameter_falls_back_to_assignable_constructor() {
        let container = container_with_nodes();
        container.register_type(picked_type());
        container.register("node", EntityDefinition::new("Node")).unwrap();
        container
            .register(
                "picked",
                EntityDefinition::new("Picked")
                    .constructor_arg(ArgumentValue::reference("node"))
                    .constructor_arg(ArgumentValue::literal("7")),
            )
            .unwrap();

        let picked = container.resolve_as::<Picked>("picked").unwrap();
        let node = container.resolve("node").unwrap();

        assert_eq!(picked.chosen, "optional-linked");
        assert!(picked
            .value
            .as_instance()
            .is_some_and(|instance| Arc::ptr_eq(instance, &node)));
    }

    #[test]
    fn test_optional_parameter_accepts_plain_literal() {
        let container = Container::new();
        container.register_type(picked_type());
        container
            .register(
                "picked",
                EntityDefinition::new("Picked")
                    .constructor_arg(ArgumentValue::literal("yes"))
                    .constructor_arg(ArgumentValue::literal("5")),
            )
            .unwrap();

        let picked = container.resolve_as::<Picked>("picked").unwrap();
        assert_eq!(picked.chosen, "optional-int");
        assert_eq!(picked.value, Value::Int(5));
    }

    #[test]
    fn test_reference_of_wrong_type_is_rejected_by_property() {
        let container = container_with_nodes();
        container.register_type(custom_bean_type());
        container.register("bean", EntityDefinition::new("CustomBean")).unwrap();
        container
            .register(
                "linked",
                EntityDefinition::new("Node").property("peer", ArgumentValue::reference("bean")),
            )
            .unwrap();
        container
            .register(
                "labelled",
                EntityDefinition::new("Node").property("label", ArgumentValue::reference("bean")),
            )
            .unwrap();

        for name in ["linked", "labelled"] {
            let error = container.resolve(name).err().expect("must fail");
            assert!(matches!(
                error.root_cause(),
                ContainerError::ConstructionFailure { name: failed, reason }
                    if failed == name && reason.contains("CustomBean")
            ));
            assert_eq!(container.instance_state(name), InstanceState::NotCreated);
        }
    }

    #[test]
    fn test_failed_singleton_evicts_peer_holding_its_early_reference() {
        let container = container_with_nodes();
        container
            .register(
                "a",
                EntityDefinition::new("Node")
                    .property("peer", ArgumentValue::reference("c"))
                    .property("color", ArgumentValue::literal("red")),
            )
            .unwrap();
        container
            .register(
                "c",
                EntityDefinition::new("Node")
                    .property("peer", ArgumentValue::reference("a"))
                    .with_destroy_method("shutdown"),
            )
            .unwrap();

        assert!(container.resolve("a").is_err());

        assert_eq!(container.instance_state("a"), InstanceState::NotCreated);
        assert_eq!(container.instance_state("c"), InstanceState::NotCreated);
        assert!(container.resolve("c").is_err());
        assert!(container.close().is_empty());
    }

    // ---------- extension pipeline ----------

    #[test]
    fn test_post_processor_substitution_is_kept() {
        let container = container_with_nodes();
        container.add_processor(Arc::new(WrapNamed("node")));
        container.register("node", EntityDefinition::new("Node")).unwrap();
        container.register("plain", EntityDefinition::new("Node")).unwrap();

        let first = container.resolve("node").unwrap();
        let second = container.resolve("node").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        let wrapped = first.downcast_ref::<Wrapped>().expect("substituted");
        assert!(wrapped.inner.downcast_ref::<Node>().is_some());
        assert!(container.resolve("plain").unwrap().downcast_ref::<Node>().is_some());
    }

    // ---------- typed lookup ----------

    #[test]
    fn test_typed_resolution() {
        let container = container_with_nodes();
        container.register_type(custom_bean_type());
        container.register("node", EntityDefinition::new("Node")).unwrap();
        container.register("bean", EntityDefinition::new("CustomBean")).unwrap();

        assert!(container.resolve_as::<Node>("node").is_ok());
        assert!(container.resolve_typed("node", "Linked").is_ok());
        assert!(matches!(
            container.resolve_as::<CustomBean>("node"),
            Err(ContainerError::TypeMismatch { actual, .. }) if actual == "Node"
        ));
        assert!(matches!(
            container.resolve_typed("bean", "Linked"),
            Err(ContainerError::TypeMismatch { expected, .. }) if expected == "Linked"
        ));
    }

    #[test]
    fn test_resolve_by_type() {
        let container = container_with_nodes();
        container.register_type(custom_bean_type());
        container.register("bean", EntityDefinition::new("CustomBean")).unwrap();

        assert!(matches!(
            container.resolve_by_type("Linked"),
            Err(ContainerError::NoEntityOfType { type_name }) if type_name == "Linked"
        ));

        container.register("left", EntityDefinition::new("Node")).unwrap();
        assert!(container.resolve_by_type("Linked").is_ok());

        container.register("right", EntityDefinition::new("Node")).unwrap();
        assert!(matches!(
            container.resolve_by_type("Linked"),
            Err(ContainerError::AmbiguousType { candidates, .. }) if candidates == vec!["left", "right"]
        ));
        assert!(container.resolve_by_type("CustomBean").is_ok());
    }

    #[test]
    fn test_entities_of_type_include_registered_singletons() {
        let container = container_with_nodes();
        container.register("defined", EntityDefinition::new("Node")).unwrap();
        container
            .register_singleton("manual", Arc::new(Node::default()))
            .unwrap();

        let names: Vec<String> = container
            .entities_of_type("Linked")
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();

        assert_eq!(names, vec!["defined", "manual"]);
        assert!(container.resolve("manual").is_ok());
        assert!(matches!(
            container.register_singleton("manual", Arc::new(Node::default())),
            Err(ContainerError::DuplicateDefinition { .. })
        ));
    }

    // ---------- registry & refresh ----------

    #[test]
    fn test_registered_singleton_cannot_shadow_definition() {
        let container = container_with_nodes();
        container.register("node", EntityDefinition::new("Node")).unwrap();

        assert!(matches!(
            container.register_singleton("node", Arc::new(Node::default())),
            Err(ContainerError::DuplicateDefinition { name }) if name == "node"
        ));
        assert_eq!(container.instance_state("node"), InstanceState::NotCreated);

        let lenient = Container::with_config(ContainerConfig {
            allow_definition_overriding: true,
            ..ContainerConfig::default()
        });
        lenient.register_type(node_type());
        lenient.register("node", EntityDefinition::new("Node")).unwrap();
        assert!(lenient.register_singleton("node", Arc::new(Node::default())).is_ok());
    }

    #[test]
    fn test_definition_names_keep_registration_order() {
        let container = container_with_nodes();
        for name in ["zeta", "alpha", "mid"] {
            container.register(name, EntityDefinition::new("Node")).unwrap();
        }

        assert_eq!(container.definition_names(), vec!["zeta", "alpha", "mid"]);
        assert!(matches!(
            container.register("alpha", EntityDefinition::new("Node")),
            Err(ContainerError::DuplicateDefinition { .. })
        ));
    }

    #[test]
    fn test_overriding_when_allowed() {
        let container = Container::with_config(ContainerConfig {
            allow_definition_overriding: true,
            ..ContainerConfig::default()
        });
        container.register_type(node_type());
        container.register("node", EntityDefinition::new("Node")).unwrap();
        container
            .register(
                "node",
                EntityDefinition::new("Node").with_scope(Scope::Prototype),
            )
            .unwrap();

        assert!(container.definition("node").unwrap().is_prototype());
        assert_eq!(container.definition_names(), vec!["node"]);
    }

    #[test]
    fn test_refresh_skips_lazy_singletons() {
        let container = Container::new();
        let counter = Arc::new(AtomicUsize::new(0));
        container.register_type(counted_type(counter.clone()));
        container.register("eager", EntityDefinition::new("Counted")).unwrap();
        container
            .register("lazy", EntityDefinition::new("Counted").lazy())
            .unwrap();
        container
            .register(
                "proto",
                EntityDefinition::new("Counted").with_scope(Scope::Prototype),
            )
            .unwrap();

        container.refresh().unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(container.instance_state("eager"), InstanceState::Ready);
        assert_eq!(container.instance_state("lazy"), InstanceState::NotCreated);

        container.resolve("lazy").unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_refresh_respects_pre_instantiation_flag() {
        let container = Container::with_config(ContainerConfig {
            pre_instantiate_singletons: false,
            ..ContainerConfig::default()
        });
        let counter = Arc::new(AtomicUsize::new(0));
        container.register_type(counted_type(counter.clone()));
        container.register("eager", EntityDefinition::new("Counted")).unwrap();

        container.refresh().unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    // ---------- concurrency ----------

    #[test]
    fn test_concurrent_same_name_resolution_constructs_once() {
        let container = Container::new();
        let counter = Arc::new(AtomicUsize::new(0));
        container.register_type(counted_type(counter.clone()));
        container.register("shared", EntityDefinition::new("Counted")).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let container = container.clone();
                thread::spawn(move || container.resolve("shared").unwrap())
            })
            .collect();
        let instances: Vec<Instance> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(instances.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
    }
}
