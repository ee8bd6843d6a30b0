//! 컨테이너 설정 관리 모듈
//!
//! 실행 환경과 컨테이너 동작 플래그를 환경 변수에서 읽어옵니다.

use std::env;

use log::warn;

use crate::core::value::TypeConverter;

/// 애플리케이션 실행 환경
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// 개발 환경 - 정의 덮어쓰기 허용
    Development,
    /// 테스트 환경 - 정의 덮어쓰기 허용
    Test,
    /// 스테이징 환경 - 프로덕션과 동일한 엄격한 설정
    Staging,
    /// 프로덕션 환경 - 중복 정의 거부
    Production,
}

impl Environment {
    /// 현재 실행 환경을 감지합니다.
    ///
    /// `ENVIRONMENT` 환경 변수를 확인하며, 설정되지 않은 경우 `Production`을 기본값으로 사용합니다.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let env = Environment::current();
    /// match env {
    ///     Environment::Development => println!("개발 환경"),
    ///     Environment::Production => println!("프로덕션 환경"),
    ///     _ => {}
    /// }
    /// ```
    pub fn current() -> Self {
        Self::from_str(&env::var("ENVIRONMENT").unwrap_or_else(|_| "production".to_string()))
    }

    /// 문자열에서 Environment를 생성합니다.
    ///
    /// 알 수 없는 값인 경우 `Production`을 반환합니다.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }
}

/// 컨테이너 동작 설정
///
/// | 필드 | 환경 변수 | 기본값 |
/// |------|-----------|--------|
/// | `allow_definition_overriding` | `ALLOW_DEFINITION_OVERRIDING` | Development/Test: true, 그 외: false |
/// | `pre_instantiate_singletons` | `PRE_INSTANTIATE_SINGLETONS` | true |
///
/// boolean 값은 `true/false`, `yes/no`, `on/off`, `1/0` 을 받습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerConfig {
    /// 같은 이름으로 다시 등록할 때 덮어쓸지(true) 거부할지(false)
    pub allow_definition_overriding: bool,
    /// `refresh()` 시 지연 초기화가 아닌 싱글톤을 미리 생성할지
    pub pre_instantiate_singletons: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            allow_definition_overriding: false,
            pre_instantiate_singletons: true,
        }
    }
}

impl ContainerConfig {
    /// 현재 환경 변수로부터 설정을 만듭니다.
    pub fn from_env() -> Self {
        let environment = Environment::current();

        Self {
            allow_definition_overriding: Self::bool_var(
                "ALLOW_DEFINITION_OVERRIDING",
                Self::allow_overriding_for_env(environment),
            ),
            pre_instantiate_singletons: Self::bool_var("PRE_INSTANTIATE_SINGLETONS", true),
        }
    }

    /// 특정 환경에 대한 정의 덮어쓰기 기본값을 반환합니다.
    ///
    /// - Development/Test: true (빠른 반복 개발)
    /// - Staging/Production: false (설정 실수 조기 발견)
    pub fn allow_overriding_for_env(environment: Environment) -> bool {
        match environment {
            Environment::Development | Environment::Test => true,
            Environment::Staging | Environment::Production => false,
        }
    }

    fn bool_var(key: &str, default: bool) -> bool {
        match env::var(key) {
            Ok(raw) => TypeConverter::parse_bool(&raw).unwrap_or_else(|e| {
                warn!("⚠️ {}: {} (using default: {})", key, e, default);
                default
            }),
            Err(_) => default,
        }
    }
}
