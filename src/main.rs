//! 객체 생명주기 컨테이너 데모 애플리케이션
//!
//! 데모 정의를 등록하고 자동 프록시를 붙인 뒤, 프록시된 서비스를 호출하고 컨테이너를 닫습니다.

use std::process::ExitCode;
use std::sync::Arc;

use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};

use ioc_container::aop::AutoProxyCreator;
use ioc_container::config::ContainerConfig;
use ioc_container::core::{BoxError, Container, Value};
use ioc_container::demo::{self, RequestContext};
use ioc_container::utils::display_terminal::{
    print_boxed_title, print_destroy_report, print_entity_status, print_final_summary,
    print_invocation, print_step_complete, print_step_start, ContainerSummary,
};

fn main() -> ExitCode {
    // 환경 설정 및 로깅 초기화
    load_env_file();
    init_logging();

    info!("🚀 컨테이너 데모 시작중...");

    let container = Container::with_config(ContainerConfig::from_env());

    let outcome = run(&container);

    let failures = container.close();
    print_destroy_report(&failures);

    match outcome {
        Ok(()) if failures.is_empty() => ExitCode::SUCCESS,
        Ok(()) => ExitCode::FAILURE,
        Err(e) => {
            error!("❌ 데모 실행 실패: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// 정의 등록, refresh, 프록시 호출까지의 데모 흐름
///
/// # Errors
///
/// * 정의 문서 파싱 실패
/// * `ContainerError` - 등록 또는 해석 실패
/// * `InvocationError` - 프록시 메서드 호출 실패
fn run(container: &Arc<Container>) -> Result<(), BoxError> {
    print_boxed_title("IoC Container Demo");

    print_step_start(1, "Registering definitions");
    let registered = demo::register_definitions(container)?;
    print_step_complete(1, "Definitions registered", registered);

    print_step_start(2, "Adding post-processors");
    container.add_processor(Arc::new(AutoProxyCreator::new()));
    print_step_complete(2, "Post-processors added", container.processor_count());

    print_step_start(3, "Refreshing container");
    container.refresh()?;
    for name in container.definition_names() {
        print_entity_status(&name, container.instance_state(&name));
    }
    print_final_summary(&ContainerSummary::of(container));

    print_step_start(4, "Invoking proxied service");
    let service = container.resolve("greetingService")?;
    for name in ["Ada", "Grace", "Linus"] {
        let greeting = service.invoke("greet", &[Value::from(name)])?;
        print_invocation(&format!("greet({})", name), &format!("{:?}", greeting));
    }
    match service.invoke("greet", &[Value::from("   ")]) {
        Ok(value) => print_invocation("greet(blank)", &format!("{:?}", value)),
        Err(e) => print_invocation("greet(blank)", &e.to_string()),
    }
    let greeted = service.invoke("greeted", &[])?;
    print_invocation("greeted()", &format!("{:?}", greeted));

    let context = container.resolve_as::<RequestContext>("requestContext")?;
    info!("🧬 Prototype request context {} ({})", context.request_id, context.locale);

    Ok(())
}

/// 환경별 설정 파일을 로드합니다
///
/// PROFILE 환경변수에 따라 적절한 .env 파일을 로드합니다.
///
/// # Environment Variables
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
///
/// ```bash
/// PROFILE=prod cargo run
/// ```
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    match profile.as_str() {
        "prod" => match dotenv::from_filename(".env.prod") {
            Ok(_) => info!(".env.prod 파일 로드 됨"),
            Err(e) => error!(".env.prod 파일 로드 실패: {}", e),
        },
        "dev" => match dotenv::from_filename(".env.dev") {
            Ok(_) => info!(".env.dev 파일 로드 됨"),
            Err(e) => error!(".env.dev 파일 로드 실패: {}", e),
        },
        _ => {
            dotenv().ok();
            info!("기본 .env 파일 로드");
        }
    }
}

/// 로깅 시스템을 초기화합니다
///
/// # Environment Variables
///
/// * `RUST_LOG` - 로깅 레벨 설정 (기본값: "info")
///
/// ```bash
/// RUST_LOG=ioc_container::core=debug cargo run
/// ```
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
}
