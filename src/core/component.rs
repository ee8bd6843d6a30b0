//! # Managed Components
//!
//! 컨테이너가 관리하는 모든 객체가 구현하는 [`Component`] trait 과
//! 선택적 생명주기 capability trait 들을 정의합니다.
//!
//! Java의 마커 인터페이스(`BeanNameAware`, `InitializingBean` 등)를 다중 상속 대신
//! **닫힌 집합의 capability 질의**로 표현합니다. 각 질의의 기본 구현은 `None` 이며,
//! 해당 콜백을 지원하는 타입만 오버라이드합니다.
//!
//! ```rust,ignore
//! struct AuditLog { name: Mutex<String> }
//!
//! impl NameAware for AuditLog {
//!     fn set_entity_name(&self, name: &str) {
//!         *self.name.lock() = name.to_string();
//!     }
//! }
//!
//! impl Component for AuditLog {
//!     fn as_name_aware(&self) -> Option<&dyn NameAware> {
//!         Some(self)
//!     }
//! }
//! ```

use std::sync::{Arc, Weak};

use downcast_rs::{impl_downcast, DowncastSync};

use crate::aop::advice::Advice;
use crate::aop::advisor::Advisor;
use crate::aop::invocation::{InvocationError, InvocationResult};
use crate::aop::pointcut::Pointcut;
use crate::core::container::Container;
use crate::core::errors::BoxError;
use crate::core::value::Value;

/// 컨테이너가 다루는 타입 소거된 인스턴스 핸들
pub type Instance = Arc<dyn Component>;

/// [`InitializingComponent`] 의 콜백 이름. 같은 이름의 init 훅은 중복 호출하지 않습니다.
pub const AFTER_PROPERTIES_SET: &str = "after_properties_set";

/// [`DisposableComponent`] 의 콜백 이름. 같은 이름의 destroy 훅은 중복 호출하지 않습니다.
pub const DESTROY: &str = "destroy";

/// 컨테이너 관리 객체
///
/// `Send + Sync` 이며 `downcast-rs` 를 통해 구체 타입으로 되돌릴 수 있습니다.
pub trait Component: DowncastSync {
    /// 진단 메시지용 구체 타입 이름
    fn component_type(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// 이름 기반 동적 메서드 호출 진입점
    ///
    /// 구체 타입은 보통 직접 호출되므로 기본 구현은 `NoSuchMethod` 입니다.
    /// 프록시는 이 메서드를 통해 인터셉터 체인을 실행합니다.
    fn invoke(&self, method: &str, _args: &[Value]) -> InvocationResult {
        Err(InvocationError::NoSuchMethod {
            type_name: self.component_type().to_string(),
            method: method.to_string(),
        })
    }

    fn as_name_aware(&self) -> Option<&dyn NameAware> {
        None
    }

    fn as_container_aware(&self) -> Option<&dyn ContainerAware> {
        None
    }

    fn as_initializing(&self) -> Option<&dyn InitializingComponent> {
        None
    }

    fn as_disposable(&self) -> Option<&dyn DisposableComponent> {
        None
    }

    /// AOP 인프라: advice 역할
    fn as_advice(self: Arc<Self>) -> Option<Advice> {
        None
    }

    /// AOP 인프라: pointcut 역할
    fn as_pointcut(self: Arc<Self>) -> Option<Arc<dyn Pointcut>> {
        None
    }

    /// AOP 인프라: advisor 역할
    fn as_advisor(self: Arc<Self>) -> Option<Arc<dyn Advisor>> {
        None
    }
}

impl_downcast!(sync Component);

/// 자신이 등록된 엔티티 이름을 전달받는 capability
pub trait NameAware {
    fn set_entity_name(&self, name: &str);
}

/// 자신을 관리하는 컨테이너를 전달받는 capability
///
/// 순환 소유를 피하기 위해 `Weak` 핸들을 전달합니다.
pub trait ContainerAware {
    fn set_container(&self, container: Weak<Container>);
}

/// 프로퍼티 주입 완료 후 호출되는 초기화 capability
pub trait InitializingComponent {
    fn after_properties_set(&self) -> Result<(), BoxError>;
}

/// 컨테이너 종료 시 호출되는 정리 capability
pub trait DisposableComponent {
    fn destroy(&self) -> Result<(), BoxError>;
}

/// advice / pointcut / advisor 역할을 하는 인프라 객체인지 확인합니다.
///
/// 인프라 객체는 자동 프록시 대상에서 제외됩니다.
pub fn is_aop_infrastructure(instance: &Instance) -> bool {
    instance.clone().as_advice().is_some()
        || instance.clone().as_pointcut().is_some()
        || instance.clone().as_advisor().is_some()
}
