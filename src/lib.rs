//! 객체 생명주기 컨테이너
//!
//! 이름이 붙은 엔티티 정의를 등록받아 인스턴스를 만들고, 의존성을 주입하고,
//! 순환 참조를 해소하고, 초기화/파괴 콜백을 실행하는 IoC 컨테이너입니다.
//! 인터페이스 기반 AOP 프록시로 메서드 호출에 advice 를 끼워 넣을 수 있습니다.
//!
//! # Features
//!
//! - **정의 레지스트리**: 이름 → 정의, 등록 순서 보존
//! - **3단계 싱글톤 캐시**: 완성본 / 조기 참조 / 조기 참조 팩토리
//! - **생성 파이프라인**: 생성자 선택, 리터럴 변환, 프로퍼티 주입, 생명주기 콜백
//! - **후처리기**: 초기화 전/후 인스턴스 치환
//! - **AOP**: pointcut, advisor, 인터셉터 체인, 자동 프록시 생성
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  Definitions    │ ← 외부 협력자가 등록 (JSON, 코드)
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   Container     │ ← resolve / refresh / close
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Post-processor │ ← AutoProxyCreator 등
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Instance/Proxy │ ← 호출자에게 전달
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ioc_container::aop::AutoProxyCreator;
//! use ioc_container::core::{Container, EntityDefinition, Value};
//!
//! let container = Container::new();
//! container.add_processor(Arc::new(AutoProxyCreator::new()));
//! container.register("greetingService", EntityDefinition::new("GreetingServiceImpl"))?;
//! container.refresh()?;
//!
//! let service = container.resolve("greetingService")?;
//! let greeting = service.invoke("greet", &[Value::from("Ada")])?;
//! ```

pub mod aop;
pub mod config;
pub mod core;
pub mod demo;
pub mod utils;
