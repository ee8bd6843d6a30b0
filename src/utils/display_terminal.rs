//! 터미널 출력 포맷팅 유틸리티
//!
//! 컨테이너 부팅/종료 과정을 박스 제목, 단계 표시, 트리 형태의 상태 목록으로 보여줍니다.

use crate::core::cache::InstanceState;
use crate::core::container::Container;
use crate::core::errors::ContainerError;

const BOX_WIDTH: usize = 50;

/// 컨테이너 요약 정보
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ContainerSummary {
    pub singletons: usize,
    pub prototypes: usize,
    pub lazy: usize,
    pub processors: usize,
}

impl ContainerSummary {
    /// 등록된 정의와 후처리기 수로 요약을 만듭니다.
    pub fn of(container: &Container) -> Self {
        let mut summary = Self {
            processors: container.processor_count(),
            ..Self::default()
        };

        for name in container.definition_names() {
            let Ok(definition) = container.definition(&name) else {
                continue;
            };
            if definition.is_prototype() {
                summary.prototypes += 1;
            } else {
                summary.singletons += 1;
                if definition.lazy_init {
                    summary.lazy += 1;
                }
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.singletons + self.prototypes
    }
}

/// 박스 형태로 둘러싸인 제목을 출력합니다
///
/// ```text
/// ╔══════════════════════════════════════════════════╗
/// ║                Container Started                 ║
/// ╚══════════════════════════════════════════════════╝
/// ```
pub fn print_boxed_title(title: &str) {
    println!("{}", boxed_title(title));
}

fn boxed_title(title: &str) -> String {
    let border = "═".repeat(BOX_WIDTH);
    format!("╔{border}╗\n║{title:^width$}║\n╚{border}╝", width = BOX_WIDTH)
}

/// 부팅 단계 시작을 표시합니다
///
/// ```text
/// → Step 1: Registering entity definitions
/// ```
pub fn print_step_start(step: u8, description: &str) {
    println!("→ Step {}: {}", step, description);
}

/// 부팅 단계 완료와 처리된 항목 수를 표시합니다
pub fn print_step_complete(step: u8, description: &str, count: usize) {
    println!("✓ Step {}: {} ({} items)", step, description, count);
}

/// 엔티티 하나의 생명주기 상태를 트리 항목으로 표시합니다
///
/// ```text
///    ├─ greetingService: ready
/// ```
pub fn print_entity_status(name: &str, state: InstanceState) {
    println!("{}", entity_line(name, &state.to_string()));
}

/// 프록시를 거친 메서드 호출 결과를 표시합니다
pub fn print_invocation(call: &str, outcome: &str) {
    println!("{}", entity_line(call, outcome));
}

fn entity_line(name: &str, status: &str) -> String {
    format!("   ├─ {}: {}", name, status)
}

/// 부팅 완료 요약을 출력합니다
///
/// ```text
/// ╔══════════════════════════════════════════════════╗
/// ║            🎉 CONTAINER INITIALIZED              ║
/// ╚══════════════════════════════════════════════════╝
///    📦 Singletons: 4 (lazy: 1)
///    🧬 Prototypes: 1
///    🔌 Post-processors: 1
///    🚀 Total Definitions: 5
/// ```
pub fn print_final_summary(summary: &ContainerSummary) {
    println!();
    print_boxed_title("🎉 CONTAINER INITIALIZED");
    println!("   📦 Singletons: {} (lazy: {})", summary.singletons, summary.lazy);
    println!("   🧬 Prototypes: {}", summary.prototypes);
    println!("   🔌 Post-processors: {}", summary.processors);
    println!("   🚀 Total Definitions: {}", summary.total());
    println!();
}

/// `close()` 가 수집한 파괴 실패 목록을 출력합니다
pub fn print_destroy_report(failures: &[ContainerError]) {
    if failures.is_empty() {
        println!("✓ All disposable entities destroyed");
        return;
    }
    println!("⚠ {} entities failed to shut down cleanly", failures.len());
    for failure in failures {
        println!("   ├─ {}", failure);
    }
}
