//! 데모용 advice: 호출 로깅, 실행 시간 측정, 반환값 집계

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info};

use crate::aop::advice::{Advice, AfterReturningAdvice, MethodBeforeAdvice, MethodInterceptor};
use crate::aop::invocation::{InvocationError, InvocationResult, MethodInvocation};
use crate::aop::ADVICE;
use crate::core::component::{Component, Instance};
use crate::core::descriptor::{MethodSignature, TypeDescriptor};
use crate::core::registry::TypeRegistration;
use crate::core::value::Value;

// ========== Before ==========

/// 호출 직전에 메서드 이름과 인자를 로그로 남깁니다.
#[derive(Debug, Default)]
pub struct LoggingAdvice {
    calls: AtomicUsize,
}

impl LoggingAdvice {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MethodBeforeAdvice for LoggingAdvice {
    fn before(
        &self,
        method: &MethodSignature,
        args: &[Value],
        target: &Instance,
    ) -> Result<(), InvocationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        info!(
            "📨 {} on {} with {:?}",
            method,
            target.component_type(),
            args
        );
        Ok(())
    }
}

impl Component for LoggingAdvice {
    fn as_advice(self: Arc<Self>) -> Option<Advice> {
        Some(Advice::Before(self))
    }
}

fn describe_logging_advice() -> TypeDescriptor {
    TypeDescriptor::builder::<LoggingAdvice>("LoggingAdvice")
        .implements(ADVICE)
        .constructor(vec![], |_| Ok(LoggingAdvice::default()))
        .build()
}

inventory::submit! {
    TypeRegistration {
        name: "LoggingAdvice",
        describe: describe_logging_advice,
    }
}

// ========== Around ==========

/// 타깃 호출 시간을 측정합니다.
#[derive(Debug, Default)]
pub struct TimingInterceptor {
    measured: AtomicUsize,
}

impl TimingInterceptor {
    pub fn measured(&self) -> usize {
        self.measured.load(Ordering::SeqCst)
    }
}

impl MethodInterceptor for TimingInterceptor {
    fn invoke(&self, invocation: &mut MethodInvocation<'_>) -> InvocationResult {
        let started = Instant::now();
        let method = invocation.method().to_string();

        let result = invocation.proceed();

        self.measured.fetch_add(1, Ordering::SeqCst);
        debug!(
            "⏱️ {} took {:?} ({})",
            method,
            started.elapsed(),
            if result.is_ok() { "ok" } else { "failed" }
        );
        result
    }
}

impl Component for TimingInterceptor {
    fn as_advice(self: Arc<Self>) -> Option<Advice> {
        Some(Advice::Around(self))
    }
}

fn describe_timing_interceptor() -> TypeDescriptor {
    TypeDescriptor::builder::<TimingInterceptor>("TimingInterceptor")
        .implements(ADVICE)
        .constructor(vec![], |_| Ok(TimingInterceptor::default()))
        .build()
}

inventory::submit! {
    TypeRegistration {
        name: "TimingInterceptor",
        describe: describe_timing_interceptor,
    }
}

// ========== AfterReturning ==========

/// 정상 반환된 문자열 결과의 총 길이를 집계합니다.
#[derive(Debug, Default)]
pub struct ResultAuditAdvice {
    returned: AtomicUsize,
    characters: AtomicUsize,
}

impl ResultAuditAdvice {
    pub fn returned(&self) -> usize {
        self.returned.load(Ordering::SeqCst)
    }

    pub fn characters(&self) -> usize {
        self.characters.load(Ordering::SeqCst)
    }
}

impl AfterReturningAdvice for ResultAuditAdvice {
    fn after_returning(
        &self,
        value: &Value,
        _method: &MethodSignature,
        _args: &[Value],
        _target: &Instance,
    ) -> Result<(), InvocationError> {
        self.returned.fetch_add(1, Ordering::SeqCst);
        if let Some(text) = value.as_str() {
            self.characters.fetch_add(text.chars().count(), Ordering::SeqCst);
        }
        Ok(())
    }
}

impl Component for ResultAuditAdvice {
    fn as_advice(self: Arc<Self>) -> Option<Advice> {
        Some(Advice::AfterReturning(self))
    }
}

fn describe_result_audit_advice() -> TypeDescriptor {
    TypeDescriptor::builder::<ResultAuditAdvice>("ResultAuditAdvice")
        .implements(ADVICE)
        .constructor(vec![], |_| Ok(ResultAuditAdvice::default()))
        .build()
}

inventory::submit! {
    TypeRegistration {
        name: "ResultAuditAdvice",
        describe: describe_result_audit_advice,
    }
}
