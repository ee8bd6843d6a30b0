//! # Definition & Type Registries
//!
//! 컨테이너가 참고하는 두 가지 레지스트리를 제공합니다.
//!
//! ## [`DefinitionRegistry`] - 엔티티 정의 저장소
//! - 이름 → [`EntityDefinition`] 매핑을 **등록 순서대로** 보관합니다.
//! - 중복 이름 처리는 설정 플래그(`allow_overriding`)에 따라 거부 또는 덮어쓰기합니다.
//!
//! ## [`TypeRegistry`] - 타입 디스크립터 저장소
//! - `inventory` 기반 컴파일 타임 자동 등록 + 런타임 수동 등록을 모두 지원합니다.
//! - 타입 이름과 `TypeId` 두 가지 키로 조회할 수 있습니다.
//!
//! ## 자동 등록
//!
//! ```rust,ignore
//! use ioc_container::core::registry::TypeRegistration;
//!
//! fn describe_user_service() -> TypeDescriptor {
//!     TypeDescriptor::builder::<UserServiceImpl>("UserServiceImpl")
//!         .implements("UserService")
//!         .constructor(vec![], |_| Ok(UserServiceImpl::default()))
//!         .build()
//! }
//!
//! inventory::submit! {
//!     TypeRegistration { name: "UserServiceImpl", describe: describe_user_service }
//! }
//! ```
//!
//! ## Spring과의 비교
//!
//! | Spring | 이 시스템 |
//! |--------|-----------|
//! | `BeanDefinitionRegistry` | `DefinitionRegistry` |
//! | `allowBeanDefinitionOverriding` | `DefinitionRegistry::allow_overriding` |
//! | `Class.forName` + 리플렉션 | `TypeRegistry` + `TypeDescriptor` |

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, warn};
use once_cell::sync::Lazy;

use crate::core::component::{Component, Instance};
use crate::core::definition::EntityDefinition;
use crate::core::descriptor::TypeDescriptor;
use crate::core::errors::{ContainerError, ContainerResult};

/// 컴파일 타임 타입 등록 정보
///
/// `inventory::submit!` 으로 제출하면 [`TypeRegistry::with_registered_types`] 가 수집합니다.
pub struct TypeRegistration {
    pub name: &'static str,
    pub describe: fn() -> TypeDescriptor,
}

// inventory를 통한 자동 수집 설정
// 컴파일 타임에 모든 TypeRegistration을 수집합니다.
inventory::collect!(TypeRegistration);

static REGISTERED_TYPES: Lazy<Vec<Arc<TypeDescriptor>>> = Lazy::new(|| {
    let mut descriptors = Vec::new();

    for registration in inventory::iter::<TypeRegistration>() {
        let descriptor = (registration.describe)();
        debug!("📦 Type collected: {} ({})", registration.name, descriptor.name);
        descriptors.push(Arc::new(descriptor));
    }

    descriptors
});

/// 타입 디스크립터 저장소
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    by_name: HashMap<String, Arc<TypeDescriptor>>,
    by_type_id: HashMap<TypeId, Arc<TypeDescriptor>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `inventory` 로 제출된 모든 타입을 포함한 레지스트리를 만듭니다.
    pub fn with_registered_types() -> Self {
        let mut registry = Self::new();
        for descriptor in REGISTERED_TYPES.iter() {
            registry.insert(descriptor.clone());
        }
        registry
    }

    pub fn register(&mut self, descriptor: TypeDescriptor) -> Arc<TypeDescriptor> {
        let descriptor = Arc::new(descriptor);
        self.insert(descriptor.clone());
        descriptor
    }

    fn insert(&mut self, descriptor: Arc<TypeDescriptor>) {
        if self.by_name.contains_key(&descriptor.name) {
            debug!("Type descriptor '{}' replaced", descriptor.name);
        }
        self.by_type_id.insert(descriptor.type_id, descriptor.clone());
        self.by_name.insert(descriptor.name.clone(), descriptor);
    }

    pub fn get(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
        self.by_name.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// 인스턴스의 구체 타입에 해당하는 디스크립터
    pub fn descriptor_of(&self, instance: &dyn Component) -> Option<Arc<TypeDescriptor>> {
        let type_id = std::any::Any::type_id(instance.as_any());
        self.by_type_id.get(&type_id).cloned()
    }

    /// 인스턴스가 `type_name` 에 대입 가능한지 확인합니다.
    ///
    /// 1. AOP 인프라 역할 이름은 capability 질의로 판단합니다.
    /// 2. 프록시는 타깃이 구현한 capability 에만 대입 가능합니다.
    /// 3. 그 외에는 디스크립터의 이름/capability 로 판단합니다.
    pub fn is_instance_assignable(&self, instance: &Instance, type_name: &str) -> bool {
        use crate::aop::{ADVICE, ADVISOR, POINTCUT};

        match type_name {
            ADVICE => return instance.clone().as_advice().is_some(),
            POINTCUT => return instance.clone().as_pointcut().is_some(),
            ADVISOR => return instance.clone().as_advisor().is_some(),
            _ => {}
        }

        if let Some(proxy) = instance.downcast_ref::<crate::aop::proxy::AopProxy>() {
            return proxy.implements(type_name);
        }

        match self.descriptor_of(instance.as_ref()) {
            Some(descriptor) => descriptor.is_assignable_to(type_name),
            None => instance.component_type() == type_name,
        }
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// 엔티티 정의 저장소
///
/// 등록 순서를 보존하며, 덮어쓰기 시에도 최초 등록 위치를 유지합니다.
#[derive(Debug, Default)]
pub struct DefinitionRegistry {
    names: Vec<String>,
    definitions: HashMap<String, Arc<EntityDefinition>>,
    allow_overriding: bool,
}

impl DefinitionRegistry {
    pub fn new(allow_overriding: bool) -> Self {
        Self {
            names: Vec::new(),
            definitions: HashMap::new(),
            allow_overriding,
        }
    }

    pub fn allow_overriding(&self) -> bool {
        self.allow_overriding
    }

    /// 정의를 등록합니다.
    ///
    /// # Errors
    ///
    /// * `DuplicateDefinition` - 덮어쓰기가 금지되었고 같은 이름이 이미 있음
    pub fn register(&mut self, name: &str, definition: EntityDefinition) -> ContainerResult<()> {
        if self.definitions.contains_key(name) {
            if !self.allow_overriding {
                return Err(ContainerError::DuplicateDefinition {
                    name: name.to_string(),
                });
            }
            warn!("⚠️ Entity definition '{}' overridden", name);
        } else {
            self.names.push(name.to_string());
        }

        self.definitions
            .insert(name.to_string(), Arc::new(definition));
        Ok(())
    }

    pub fn get(&self, name: &str) -> ContainerResult<Arc<EntityDefinition>> {
        self.definitions
            .get(name)
            .cloned()
            .ok_or_else(|| ContainerError::DefinitionNotFound {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// 등록 순서대로 정의 이름을 반환합니다.
    pub fn names(&self) -> Vec<String> {
        self.names.clone()
    }

    /// 등록 순서대로 (이름, 정의) 쌍을 반환합니다.
    pub fn entries(&self) -> Vec<(String, Arc<EntityDefinition>)> {
        self.names
            .iter()
            .filter_map(|name| {
                self.definitions
                    .get(name)
                    .map(|definition| (name.clone(), definition.clone()))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
