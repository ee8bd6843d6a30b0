//! # Demo Components
//!
//! 바이너리가 컨테이너를 시연할 때 쓰는 예제 타입과 정의 묶음입니다.
//!
//! | 엔티티 | 타입 | 비고 |
//! |--------|------|------|
//! | `messageRepository` | `InMemoryMessageRepository` | 파괴 콜백 |
//! | `greetingService` | `GreetingServiceImpl` | init/destroy 훅, 이름 인식 |
//! | `requestContext` | `RequestContext` | prototype |
//! | `loggingAdvice` / `timingInterceptor` / `resultAudit` | advice | AOP 인프라 |
//! | `greetPointcut` | `NameMatchPointcut` | `greet*` |
//! | `*Advisor` | `PointcutAdvisor` | pointcut + advice |
//!
//! 정의는 설정 파일을 흉내 낸 JSON 문서에서 읽어 등록합니다.

pub mod advice;
pub mod greeting;

use log::debug;
use serde::Deserialize;

use crate::core::container::Container;
use crate::core::definition::EntityDefinition;
use crate::core::errors::BoxError;

pub use advice::{LoggingAdvice, ResultAuditAdvice, TimingInterceptor};
pub use greeting::{
    GreetingServiceImpl, InMemoryMessageRepository, RequestContext, GREETING_SERVICE,
    MESSAGE_REPOSITORY,
};

/// 이름이 붙은 정의 한 건
#[derive(Debug, Deserialize)]
struct NamedDefinition {
    name: String,
    #[serde(flatten)]
    definition: EntityDefinition,
}

pub const DEFINITIONS: &str = r#"[
    { "name": "messageRepository", "type_name": "InMemoryMessageRepository" },
    {
        "name": "greetingService",
        "type_name": "GreetingServiceImpl",
        "constructor_args": [{ "literal": "Hello" }],
        "properties": [{ "name": "repository", "value": { "ref": "messageRepository" } }],
        "init_method": "warm_up",
        "destroy_method": "shutdown"
    },
    {
        "name": "requestContext",
        "type_name": "RequestContext",
        "scope": "prototype",
        "constructor_args": [{ "literal": "ko" }]
    },
    { "name": "loggingAdvice", "type_name": "LoggingAdvice" },
    { "name": "timingInterceptor", "type_name": "TimingInterceptor" },
    { "name": "resultAudit", "type_name": "ResultAuditAdvice" },
    {
        "name": "greetPointcut",
        "type_name": "NameMatchPointcut",
        "constructor_args": [{ "literal": "greet*" }]
    },
    {
        "name": "loggingAdvisor",
        "type_name": "PointcutAdvisor",
        "constructor_args": [{ "ref": "greetPointcut" }, { "ref": "loggingAdvice" }]
    },
    {
        "name": "timingAdvisor",
        "type_name": "PointcutAdvisor",
        "constructor_args": [{ "ref": "greetPointcut" }, { "ref": "timingInterceptor" }]
    },
    {
        "name": "auditAdvisor",
        "type_name": "PointcutAdvisor",
        "constructor_args": [{ "ref": "greetPointcut" }, { "ref": "resultAudit" }]
    }
]"#;

/// JSON 정의 문서를 파싱합니다. 문서 순서가 곧 등록 순서입니다.
pub fn parse_definitions(json: &str) -> Result<Vec<(String, EntityDefinition)>, BoxError> {
    let named: Vec<NamedDefinition> = serde_json::from_str(json)?;
    Ok(named
        .into_iter()
        .map(|entry| (entry.name, entry.definition))
        .collect())
}

/// 데모 정의를 모두 등록하고 등록 건수를 반환합니다.
pub fn register_definitions(container: &Container) -> Result<usize, BoxError> {
    let definitions = parse_definitions(DEFINITIONS)?;
    let count = definitions.len();

    for (name, definition) in definitions {
        debug!("Registering demo definition '{}' ({})", name, definition.type_name);
        container.register(&name, definition)?;
    }

    Ok(count)
}
