//! # Method Invocation
//!
//! 프록시를 통한 한 번의 메서드 호출 컨텍스트와 인터셉터 체인 실행기입니다.
//!
//! ```text
//! proceed()
//!   ├─ cursor == len → 타깃 메서드 실행
//!   ├─ Around        → interceptor.invoke(self)  (proceed 호출 여부는 advice 가 결정)
//!   ├─ Before        → advice.before(..)?; proceed()
//!   └─ AfterReturning→ let v = proceed()?; advice.after_returning(&v, ..)?; v
//! ```
//!
//! 에러는 `?` 로 남은 advice 들을 거쳐 그대로 위로 전파되며, 이를 가로채 바꿀 수 있는
//! 것은 around advice 뿐입니다.

use thiserror::Error;

use crate::aop::advice::Advice;
use crate::core::component::Instance;
use crate::core::descriptor::{MethodDescriptor, MethodSignature};
use crate::core::value::Value;

/// 프록시/동적 호출 에러
///
/// 컨테이너 에러(`ContainerError`)와 섞이지 않도록 별도 타입으로 둡니다.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvocationError {
    #[error("{type_name} has no method '{method}'")]
    NoSuchMethod { type_name: String, method: String },

    #[error("Invalid arguments for '{method}': {reason}")]
    InvalidArguments { method: String, reason: String },

    /// 타깃 또는 advice 가 보고한 비즈니스 실패
    #[error("'{method}' failed: {reason}")]
    Failed { method: String, reason: String },
}

impl InvocationError {
    pub fn failed(method: impl Into<String>, reason: impl Into<String>) -> Self {
        InvocationError::Failed {
            method: method.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_arguments(method: impl Into<String>, reason: impl Into<String>) -> Self {
        InvocationError::InvalidArguments {
            method: method.into(),
            reason: reason.into(),
        }
    }
}

pub type InvocationResult = Result<Value, InvocationError>;

/// 인터셉터 체인을 따라 진행하는 메서드 호출
pub struct MethodInvocation<'a> {
    target: &'a Instance,
    method: &'a MethodDescriptor,
    arguments: Vec<Value>,
    interceptors: &'a [Advice],
    cursor: usize,
}

impl<'a> MethodInvocation<'a> {
    pub fn new(
        target: &'a Instance,
        method: &'a MethodDescriptor,
        arguments: Vec<Value>,
        interceptors: &'a [Advice],
    ) -> Self {
        Self {
            target,
            method,
            arguments,
            interceptors,
            cursor: 0,
        }
    }

    pub fn method(&self) -> &MethodSignature {
        &self.method.signature
    }

    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    /// around advice 가 타깃에 전달될 인자를 바꿀 때 사용합니다.
    pub fn arguments_mut(&mut self) -> &mut Vec<Value> {
        &mut self.arguments
    }

    pub fn target(&self) -> &Instance {
        self.target
    }

    /// 체인의 다음 단계를 실행합니다. 체인 끝에서는 타깃 메서드를 호출합니다.
    pub fn proceed(&mut self) -> InvocationResult {
        let interceptors = self.interceptors;
        let Some(advice) = interceptors.get(self.cursor) else {
            return self.method.invoke(&**self.target, &self.arguments);
        };
        self.cursor += 1;

        match advice {
            Advice::Around(interceptor) => interceptor.invoke(self),
            Advice::Before(before) => {
                before.before(&self.method.signature, &self.arguments, self.target)?;
                self.proceed()
            }
            Advice::AfterReturning(after) => {
                let value = self.proceed()?;
                after.after_returning(&value, &self.method.signature, &self.arguments, self.target)?;
                Ok(value)
            }
        }
    }
}
