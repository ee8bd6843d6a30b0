//! # Advisor
//!
//! pointcut 과 advice 의 쌍입니다. advisor 역할의 엔티티는 [`AutoProxyCreator`] 가
//! 컨테이너에서 찾아 사용합니다.
//!
//! ```rust,ignore
//! container.register("savePointcut", EntityDefinition::new(NAME_MATCH_POINTCUT)
//!     .constructor_arg(ArgumentValue::literal("save")))?;
//! container.register("saveAdvisor", EntityDefinition::new(POINTCUT_ADVISOR)
//!     .constructor_arg(ArgumentValue::reference("savePointcut"))
//!     .constructor_arg(ArgumentValue::reference("auditAdvice")))?;
//! ```
//!
//! [`AutoProxyCreator`]: crate::aop::auto_proxy::AutoProxyCreator

use std::fmt;
use std::sync::Arc;

use crate::aop::advice::Advice;
use crate::aop::pointcut::Pointcut;
use crate::aop::{ADVICE, ADVISOR, POINTCUT};
use crate::core::component::Component;
use crate::core::descriptor::TypeDescriptor;
use crate::core::errors::BoxError;
use crate::core::registry::TypeRegistration;
use crate::core::value::ValueType;

pub trait Advisor: Send + Sync {
    fn pointcut(&self) -> Arc<dyn Pointcut>;

    fn advice(&self) -> Advice;
}

pub const POINTCUT_ADVISOR: &str = "PointcutAdvisor";

/// 기본 advisor 구현
#[derive(Clone)]
pub struct PointcutAdvisor {
    pointcut: Arc<dyn Pointcut>,
    advice: Advice,
}

impl PointcutAdvisor {
    pub fn new(pointcut: Arc<dyn Pointcut>, advice: Advice) -> Self {
        Self { pointcut, advice }
    }
}

impl fmt::Debug for PointcutAdvisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointcutAdvisor")
            .field("advice", &self.advice)
            .finish_non_exhaustive()
    }
}

impl Advisor for PointcutAdvisor {
    fn pointcut(&self) -> Arc<dyn Pointcut> {
        self.pointcut.clone()
    }

    fn advice(&self) -> Advice {
        self.advice.clone()
    }
}

impl Component for PointcutAdvisor {
    fn as_advisor(self: Arc<Self>) -> Option<Arc<dyn Advisor>> {
        Some(self)
    }
}

fn describe_pointcut_advisor() -> TypeDescriptor {
    TypeDescriptor::builder::<PointcutAdvisor>(POINTCUT_ADVISOR)
        .implements(ADVISOR)
        .constructor(
            vec![ValueType::component(POINTCUT), ValueType::component(ADVICE)],
            |args| {
                let pointcut = args
                    .instance(0)?
                    .as_pointcut()
                    .ok_or_else(|| BoxError::from("argument #0 is not a pointcut"))?;
                let advice = args
                    .instance(1)?
                    .as_advice()
                    .ok_or_else(|| BoxError::from("argument #1 is not an advice"))?;
                Ok(PointcutAdvisor::new(pointcut, advice))
            },
        )
        .build()
}

inventory::submit! {
    TypeRegistration {
        name: POINTCUT_ADVISOR,
        describe: describe_pointcut_advisor,
    }
}
