//! # Container Error Handling System
//!
//! 컨테이너 전역에서 사용하는 통합 에러 처리 시스템입니다.
//! Spring Framework의 `BeansException` 계층 구조를 `thiserror` 기반의 단일 열거형으로
//! 옮겨와, 엔티티 이름과 원인을 손실 없이 `resolve()` 호출자에게 전달합니다.
//!
//! ## 설계 철학
//!
//! ### 1. 발생 지점에서 복구하지 않음
//! - 모든 에러는 발생 지점에서 복구 불가능하며 그대로 호출자에게 전파됩니다.
//! - 컨테이너는 재시도하거나 스스로 상태를 고치지 않습니다.
//! - 유일한 예외는 `close()` 의 파괴 단계로, 실패를 수집만 하고 계속 진행합니다.
//!
//! ### 2. 해석 경로 보존
//! - 생성 경계마다 [`ContainerError::ResolutionFailed`] 로 엔티티 이름을 덧씌웁니다.
//! - [`ContainerError::root_cause`] 로 최초 원인을, [`ContainerError::resolution_path`] 로
//!   `a -> b -> a` 같은 해석 경로를 얻을 수 있습니다.
//!
//! ## Spring과의 비교
//!
//! | Spring | 이 시스템 |
//! |--------|-----------|
//! | `NoSuchBeanDefinitionException` | `DefinitionNotFound` |
//! | `BeanDefinitionOverrideException` | `DuplicateDefinition` |
//! | `BeanCurrentlyInCreationException` | `CircularConstructorDependency` / `CircularPrototypeDependency` |
//! | `BeanCreationException` | `ResolutionFailed` + `ConstructionFailure` |
//! | `NotWritablePropertyException` | `PropertyNotWritable` |
//! | `BeanNotOfRequiredTypeException` | `TypeMismatch` |
//! | `NoUniqueBeanDefinitionException` | `AmbiguousType` |
//!
//! ## 사용 패턴
//!
//! ```rust,ignore
//! use ioc_container::core::errors::ContainerError;
//!
//! match container.resolve("a") {
//!     Ok(instance) => { /* ... */ }
//!     Err(e) if matches!(e.root_cause(), ContainerError::CircularConstructorDependency { .. }) => {
//!         eprintln!("순환 참조 경로: {:?}", e.resolution_path());
//!     }
//!     Err(e) => return Err(e),
//! }
//! ```

use thiserror::Error;

/// 사용자 제공 콜백(생성자, setter, 생명주기 훅)이 반환하는 에러 타입
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 컨테이너 전역 에러 타입
///
/// 정의 등록, 인스턴스 해석, 생명주기 처리, 프록시 생성 중 발생할 수 있는
/// 모든 에러를 포괄합니다.
///
/// ## 에러 카테고리
///
/// ### 1. 정의(Definition) 계층
/// - `DefinitionNotFound`, `DuplicateDefinition`
///
/// ### 2. 해석(Resolution) 계층
/// - `CircularConstructorDependency`, `CircularPrototypeDependency`
/// - `TypeMismatch`, `AmbiguousType`, `NoEntityOfType`
///
/// ### 3. 생성(Construction) 계층
/// - `ConstructionFailure`, `PropertyNotWritable`, `LifecycleHookFailure`
///
/// ### 4. AOP 계층
/// - `ProxyUnsupported`
#[derive(Error, Debug)]
pub enum ContainerError {
    /// 요청한 이름의 정의가 등록되어 있지 않음
    #[error("No entity definition named '{name}'")]
    DefinitionNotFound { name: String },

    /// 덮어쓰기가 금지된 상태에서 같은 이름으로 다시 등록하려 함
    #[error("Entity definition '{name}' is already registered")]
    DuplicateDefinition { name: String },

    /// 생성자 주입 참조가 순환을 이룸 (조기 노출 불가)
    #[error("Circular constructor dependency on '{name}'")]
    CircularConstructorDependency { name: String },

    /// 프로토타입 스코프 엔티티의 순환 참조
    #[error("Circular prototype dependency on '{name}'")]
    CircularPrototypeDependency { name: String },

    /// 인스턴스화 또는 값 변환 실패
    ///
    /// # 발생 시나리오
    /// - 타입 디스크립터가 등록되지 않음
    /// - 일치하는 생성자가 없음
    /// - 리터럴 변환 실패 (`"abc"` → `Int`)
    /// - 생성자/setter 클로저가 에러를 반환
    #[error("Failed to construct '{name}': {reason}")]
    ConstructionFailure { name: String, reason: String },

    /// 바인딩된 프로퍼티에 대응하는 setter 가 없음
    #[error("Property '{property}' of '{name}' is not writable")]
    PropertyNotWritable { name: String, property: String },

    /// 초기화/파괴 훅 실행 실패
    #[error("Lifecycle hook '{hook}' failed for '{name}': {reason}")]
    LifecycleHookFailure {
        name: String,
        hook: String,
        reason: String,
    },

    /// 요청한 타입과 실제 인스턴스 타입이 다름
    #[error("Entity '{name}' is not of type {expected} (actual: {actual})")]
    TypeMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    /// 타입으로 조회했으나 후보가 둘 이상
    #[error("Multiple entities of type {type_name}: {candidates:?}")]
    AmbiguousType {
        type_name: String,
        candidates: Vec<String>,
    },

    /// 타입으로 조회했으나 후보가 없음
    #[error("No entity of type {type_name}")]
    NoEntityOfType { type_name: String },

    /// 인터페이스(capability)를 노출하지 않는 타입에 대한 프록시 요청
    #[error("Cannot proxy {type_name}: {reason}")]
    ProxyUnsupported { type_name: String, reason: String },

    /// 엔티티 생성 경계에서 덧씌워지는 래퍼
    #[error("Error creating entity '{name}': {source}")]
    ResolutionFailed {
        name: String,
        #[source]
        source: Box<ContainerError>,
    },
}

impl ContainerError {
    /// 래퍼를 모두 벗겨낸 최초 원인을 반환합니다.
    pub fn root_cause(&self) -> &ContainerError {
        let mut current = self;
        while let ContainerError::ResolutionFailed { source, .. } = current {
            current = source.as_ref();
        }
        current
    }

    /// 래퍼 체인에 기록된 엔티티 이름들을 바깥쪽부터 반환합니다.
    pub fn resolution_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        let mut current = self;
        while let ContainerError::ResolutionFailed { name, source } = current {
            path.push(name.as_str());
            current = source.as_ref();
        }
        path
    }

    /// 엔티티 이름으로 에러를 감쌉니다.
    pub(crate) fn wrap(self, name: &str) -> ContainerError {
        ContainerError::ResolutionFailed {
            name: name.to_string(),
            source: Box::new(self),
        }
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type ContainerResult<T> = Result<T, ContainerError>;

/// 사용자 콜백 에러를 `ContainerError` 로 변환하는 확장 trait
pub trait EntityContext<T> {
    /// 엔티티 이름과 함께 `ConstructionFailure` 로 변환합니다.
    fn for_entity(self, name: &str) -> ContainerResult<T>;

    /// 지연 평가된 설명을 앞에 붙여 `ConstructionFailure` 로 변환합니다.
    fn with_reason<F>(self, name: &str, f: F) -> ContainerResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> EntityContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn for_entity(self, name: &str) -> ContainerResult<T> {
        self.map_err(|e| ContainerError::ConstructionFailure {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }

    fn with_reason<F>(self, name: &str, f: F) -> ContainerResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| ContainerError::ConstructionFailure {
            name: name.to_string(),
            reason: format!("{}: {}", f(), e),
        })
    }
}
