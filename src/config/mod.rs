//! # Configuration Module
//!
//! 컨테이너 설정 관리를 담당하는 모듈입니다.
//! Spring Framework의 `@Profile` 과 `allowBeanDefinitionOverriding` 같은 설정을
//! 환경 변수 기반으로 중앙집중식으로 관리합니다.
//!
//! ## 모듈 구성
//!
//! - [`container_config`] - 실행 환경, 컨테이너 동작 플래그
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use ioc_container::config::{ContainerConfig, Environment};
//! use ioc_container::core::Container;
//!
//! let env = Environment::current();
//! println!("Current environment: {:?}", env);
//!
//! let container = Container::with_config(ContainerConfig::from_env());
//! ```
//!
//! ## 환경 변수 설정 가이드
//!
//! ```bash
//! # 환경 설정
//! export ENVIRONMENT="production"          # development, test, staging, production
//!
//! # 컨테이너 동작
//! export ALLOW_DEFINITION_OVERRIDING="no"  # 중복 정의 거부
//! export PRE_INSTANTIATE_SINGLETONS="yes"  # refresh() 시 싱글톤 미리 생성
//!
//! # 로깅
//! export RUST_LOG="ioc_container=debug"
//! ```
//!
//! ## Spring과의 비교
//!
//! | Spring | Rust (이 프로젝트) |
//! |--------|-------------------|
//! | `@Profile("dev")` | `Environment::Development` |
//! | `setAllowBeanDefinitionOverriding` | `ALLOW_DEFINITION_OVERRIDING` |
//! | `lazy-init="true"` 기본값 | `PRE_INSTANTIATE_SINGLETONS` |
//! | `application.yml` | `.env` 파일 |

pub mod container_config;

pub use container_config::*;
