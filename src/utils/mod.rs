//! 공통 유틸리티 함수 모듈
//!
//! 데모 바이너리가 컨테이너 부팅 과정을 보여줄 때 쓰는 터미널 출력 함수들을 제공합니다.
//!
//! # Modules
//!
//! - [`display_terminal`] - 부팅 단계, 엔티티 상태, 종료 리포트 출력
//!
//! # Examples
//!
//! ```rust,ignore
//! use ioc_container::utils::display_terminal::{print_boxed_title, print_entity_status};
//!
//! print_boxed_title("Container Started");
//! print_entity_status("greetingService", InstanceState::Ready);
//! ```

pub mod display_terminal;
