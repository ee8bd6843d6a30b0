//! # AOP Proxy Subsystem
//!
//! 메서드 호출을 가로채 횡단 관심사(로깅, 트랜잭션, 측정 등)를 끼워 넣는 모듈입니다.
//!
//! ## 구성 요소
//!
//! | 모듈 | 역할 |
//! |------|------|
//! | [`advice`] | around / before / after-returning advice |
//! | [`pointcut`] | 메서드 매처 |
//! | [`advisor`] | pointcut + advice 쌍 |
//! | [`invocation`] | 인덱스 기반 인터셉터 체인 실행 |
//! | [`proxy`] | 프록시 설정, 팩토리, 프록시 객체 |
//! | [`auto_proxy`] | 생성 파이프라인에 프록시를 연결하는 후처리기 |
//!
//! ## 프록시 전략
//!
//! 타깃이 선언한 capability(인터페이스 역할)에 속한 메서드만 노출하는 **인터페이스 프록시**만
//! 지원합니다. capability 를 하나도 선언하지 않은 타입은 프록시할 수 없습니다.

pub mod advice;
pub mod advisor;
pub mod auto_proxy;
pub mod invocation;
pub mod pointcut;
pub mod proxy;

/// advice 역할을 하는 인프라 객체의 capability 이름
pub const ADVICE: &str = "Advice";

/// pointcut 역할을 하는 인프라 객체의 capability 이름
pub const POINTCUT: &str = "Pointcut";

/// advisor 역할을 하는 인프라 객체의 capability 이름
pub const ADVISOR: &str = "Advisor";

pub use advice::{Advice, AfterReturningAdvice, MethodBeforeAdvice, MethodInterceptor};
pub use advisor::{Advisor, PointcutAdvisor};
pub use auto_proxy::AutoProxyCreator;
pub use invocation::{InvocationError, InvocationResult, MethodInvocation};
pub use pointcut::{NameMatchPointcut, Pointcut};
pub use proxy::{AopProxy, ProxyConfig, ProxyFactory};
