//! # Advice
//!
//! 인터셉터 체인에 들어가는 세 종류의 advice 입니다.
//!
//! | 종류 | 실행 방식 |
//! |------|-----------|
//! | `Around` | 제어권을 받고 `proceed()` 호출 여부를 직접 결정 |
//! | `Before` | 로직 실행 후 자동으로 `proceed()` |
//! | `AfterReturning` | `proceed()` 결과를 관찰만 하고 값은 그대로 전달 |
//!
//! advice 를 컨테이너 엔티티로 등록하려면 `Component::as_advice` 를 오버라이드합니다.
//!
//! ```rust,ignore
//! impl Component for AuditAdvice {
//!     fn as_advice(self: Arc<Self>) -> Option<Advice> {
//!         Some(Advice::Before(self))
//!     }
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use crate::aop::invocation::{InvocationError, InvocationResult, MethodInvocation};
use crate::core::component::Instance;
use crate::core::descriptor::MethodSignature;
use crate::core::value::Value;

/// around advice
pub trait MethodInterceptor: Send + Sync {
    fn invoke(&self, invocation: &mut MethodInvocation<'_>) -> InvocationResult;
}

/// before advice
pub trait MethodBeforeAdvice: Send + Sync {
    fn before(
        &self,
        method: &MethodSignature,
        args: &[Value],
        target: &Instance,
    ) -> Result<(), InvocationError>;
}

/// after-returning advice
pub trait AfterReturningAdvice: Send + Sync {
    fn after_returning(
        &self,
        value: &Value,
        method: &MethodSignature,
        args: &[Value],
        target: &Instance,
    ) -> Result<(), InvocationError>;
}

#[derive(Clone)]
pub enum Advice {
    Around(Arc<dyn MethodInterceptor>),
    Before(Arc<dyn MethodBeforeAdvice>),
    AfterReturning(Arc<dyn AfterReturningAdvice>),
}

impl Advice {
    pub fn kind(&self) -> &'static str {
        match self {
            Advice::Around(_) => "around",
            Advice::Before(_) => "before",
            Advice::AfterReturning(_) => "after-returning",
        }
    }
}

impl fmt::Debug for Advice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Advice({})", self.kind())
    }
}
