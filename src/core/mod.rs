//! # Core Container Module
//!
//! 객체 생명주기 컨테이너의 핵심 엔진입니다.
//! Spring Framework의 `BeanFactory` 가 하는 일(정의 기반 생성, 참조 해석, 순환 참조 해소,
//! 초기화/파괴 콜백, 후처리기 체인)을 Rust의 소유권 모델에 맞게 구현합니다.
//!
//! ## 모듈 구성
//!
//! ### 정의와 값
//! - [`definition`] - 엔티티 정의 (`EntityDefinition`, `Scope`, `ArgumentValue`)
//! - [`value`] - 런타임 값, 선언 타입, 리터럴 변환기
//!
//! ### 타입 정보
//! - [`component`] - 관리 객체 trait 과 capability 질의
//! - [`descriptor`] - 생성자/프로퍼티/메서드/훅을 명시하는 타입 디스크립터
//! - [`registry`] - 정의 레지스트리와 `inventory` 기반 타입 레지스트리
//!
//! ### 엔진
//! - [`cache`] - 3단계 싱글톤 캐시
//! - [`processor`] - 초기화 전/후 후처리기 체인
//! - [`container`] - 해석 흐름과 생성 파이프라인
//! - [`errors`] - 통합 에러 타입
//!
//! ## Spring과의 비교
//!
//! | Spring | 이 시스템 |
//! |--------|-----------|
//! | `BeanDefinition` | `EntityDefinition` |
//! | `BeanFactory` | `Container` |
//! | `singletonObjects` / `earlySingletonObjects` / `singletonFactories` | `SingletonCache` L1 / L2 / L3 |
//! | `BeanPostProcessor` | `EntityPostProcessor` |
//! | `BeanNameAware`, `InitializingBean`, `DisposableBean` | `Component` capability 질의 |
//! | `SimpleTypeConverter` | `TypeConverter` |
//!
//! ## 사용 패턴
//!
//! ```rust,ignore
//! use ioc_container::core::{ArgumentValue, Container, EntityDefinition, Scope};
//!
//! let container = Container::new();
//!
//! container.register("userDao", EntityDefinition::new("UserDao"))?;
//! container.register(
//!     "userService",
//!     EntityDefinition::new("UserServiceImpl")
//!         .property("dao", ArgumentValue::reference("userDao"))
//!         .with_init_method("warm_up"),
//! )?;
//!
//! container.refresh()?;
//! let service = container.resolve("userService")?;
//!
//! for failure in container.close() {
//!     eprintln!("{}", failure);
//! }
//! ```
//!
//! ## 트러블슈팅
//!
//! ### 생성자 순환 참조
//! ```text
//! Error creating entity 'a': Error creating entity 'b': Circular constructor dependency on 'a'
//! ```
//! **해결**: 순환 고리 중 하나를 프로퍼티 주입으로 바꾸면 조기 노출로 해소됩니다.
//!
//! ### 미등록 타입
//! ```text
//! Failed to construct 'userService': no type descriptor registered for 'UserServiceImpl'
//! ```
//! **해결**: `inventory::submit!` 으로 `TypeRegistration` 을 제출하거나 `Container::register_type` 으로 등록합니다.

pub mod cache;
pub mod component;
pub mod container;
pub mod definition;
pub mod descriptor;
pub mod errors;
pub mod processor;
pub mod registry;
pub mod value;

pub use cache::InstanceState;
pub use component::{
    Component, ContainerAware, DisposableComponent, InitializingComponent, Instance, NameAware,
};
pub use container::Container;
pub use definition::{ArgumentValue, EntityDefinition, PropertyBinding, Scope};
pub use descriptor::{Args, MethodSignature, TypeDescriptor};
pub use errors::{BoxError, ContainerError, ContainerResult, EntityContext};
pub use processor::EntityPostProcessor;
pub use registry::TypeRegistration;
pub use value::{TypeConverter, Value, ValueType};
