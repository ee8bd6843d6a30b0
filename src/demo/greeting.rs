//! 데모용 인사 서비스와 메시지 저장소

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use log::info;
use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

use crate::aop::invocation::InvocationError;
use crate::core::component::{Component, DisposableComponent, Instance, NameAware};
use crate::core::descriptor::TypeDescriptor;
use crate::core::errors::BoxError;
use crate::core::registry::TypeRegistration;
use crate::core::value::{Value, ValueType};

pub const GREETING_SERVICE: &str = "GreetingService";
pub const MESSAGE_REPOSITORY: &str = "MessageRepository";

// ========== MessageRepository ==========

/// 보낸 인사말을 메모리에 보관하는 저장소
#[derive(Default)]
pub struct InMemoryMessageRepository {
    messages: Mutex<Vec<String>>,
}

impl InMemoryMessageRepository {
    pub fn record(&self, message: &str) -> usize {
        let mut messages = self.messages.lock();
        messages.push(message.to_string());
        messages.len()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }
}

impl DisposableComponent for InMemoryMessageRepository {
    fn destroy(&self) -> Result<(), BoxError> {
        let mut messages = self.messages.lock();
        info!("🧹 MessageRepository flushed {} messages", messages.len());
        messages.clear();
        Ok(())
    }
}

impl Component for InMemoryMessageRepository {
    fn as_disposable(&self) -> Option<&dyn DisposableComponent> {
        Some(self)
    }
}

fn describe_message_repository() -> TypeDescriptor {
    TypeDescriptor::builder::<InMemoryMessageRepository>("InMemoryMessageRepository")
        .implements(MESSAGE_REPOSITORY)
        .constructor(vec![], |_| Ok(InMemoryMessageRepository::default()))
        .method(MESSAGE_REPOSITORY, "record", vec![ValueType::Str], |repo, args| {
            let message = args.first().and_then(Value::as_str).unwrap_or_default();
            Ok(Value::Int(repo.record(message) as i64))
        })
        .method(MESSAGE_REPOSITORY, "count", vec![], |repo, _| {
            Ok(Value::Int(repo.len() as i64))
        })
        .build()
}

inventory::submit! {
    TypeRegistration {
        name: "InMemoryMessageRepository",
        describe: describe_message_repository,
    }
}

// ========== GreetingService ==========

/// 인사말을 만들고 저장소에 기록하는 서비스
pub struct GreetingServiceImpl {
    entity_name: RwLock<String>,
    greeting: RwLock<String>,
    repository: RwLock<Option<Instance>>,
    greeted: AtomicUsize,
    warmed_up: AtomicBool,
    shut_down: AtomicBool,
}

impl GreetingServiceImpl {
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            entity_name: RwLock::new(String::new()),
            greeting: RwLock::new(greeting.into()),
            repository: RwLock::new(None),
            greeted: AtomicUsize::new(0),
            warmed_up: AtomicBool::new(false),
            shut_down: AtomicBool::new(false),
        }
    }

    /// 저장소는 `MessageRepository` 메서드 호출로만 사용하므로 프록시여도 됩니다.
    pub fn set_repository(&self, repository: Instance) {
        *self.repository.write() = Some(repository);
    }

    pub fn greet(&self, name: &str) -> Result<String, InvocationError> {
        if name.trim().is_empty() {
            return Err(InvocationError::invalid_arguments("greet", "name must not be blank"));
        }

        let message = format!("{}, {}!", self.greeting.read(), name.trim());
        if let Some(repository) = self.repository.read().as_ref() {
            match repository.downcast_ref::<InMemoryMessageRepository>() {
                Some(concrete) => {
                    concrete.record(&message);
                }
                None => {
                    repository.invoke("record", &[Value::Str(message.clone())])?;
                }
            }
        }
        self.greeted.fetch_add(1, Ordering::SeqCst);
        Ok(message)
    }

    pub fn greeted(&self) -> usize {
        self.greeted.load(Ordering::SeqCst)
    }

    pub fn entity_name(&self) -> String {
        self.entity_name.read().clone()
    }

    pub fn is_warmed_up(&self) -> bool {
        self.warmed_up.load(Ordering::SeqCst)
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }

    fn warm_up(&self) -> Result<(), BoxError> {
        if self.greeting.read().is_empty() {
            return Err("greeting must be configured before warm-up".into());
        }
        self.warmed_up.store(true, Ordering::SeqCst);
        info!("🔥 '{}' warmed up", self.entity_name());
        Ok(())
    }

    fn shutdown(&self) -> Result<(), BoxError> {
        self.shut_down.store(true, Ordering::SeqCst);
        info!("👋 '{}' shut down after {} greetings", self.entity_name(), self.greeted());
        Ok(())
    }
}

impl NameAware for GreetingServiceImpl {
    fn set_entity_name(&self, name: &str) {
        *self.entity_name.write() = name.to_string();
    }
}

impl Component for GreetingServiceImpl {
    fn as_name_aware(&self) -> Option<&dyn NameAware> {
        Some(self)
    }
}

fn describe_greeting_service() -> TypeDescriptor {
    TypeDescriptor::builder::<GreetingServiceImpl>("GreetingServiceImpl")
        .implements(GREETING_SERVICE)
        .constructor(vec![], |_| Ok(GreetingServiceImpl::new("Hello")))
        .constructor(vec![ValueType::Str], |args| {
            Ok(GreetingServiceImpl::new(args.str(0)?))
        })
        .property("greeting", ValueType::Str, |service, value| {
            *service.greeting.write() = value.as_str().unwrap_or_default().to_string();
            Ok(())
        })
        .property(
            "repository",
            ValueType::component(MESSAGE_REPOSITORY),
            |service, value| {
                let repository = value
                    .as_instance()
                    .cloned()
                    .ok_or_else(|| BoxError::from("repository must be a component"))?;
                service.set_repository(repository);
                Ok(())
            },
        )
        .method(GREETING_SERVICE, "greet", vec![ValueType::Str], |service, args| {
            let name = args.first().and_then(Value::as_str).unwrap_or_default();
            service.greet(name).map(Value::Str)
        })
        .method(GREETING_SERVICE, "greeted", vec![], |service, _| {
            Ok(Value::Int(service.greeted() as i64))
        })
        .hook("warm_up", GreetingServiceImpl::warm_up)
        .hook("shutdown", GreetingServiceImpl::shutdown)
        .build()
}

inventory::submit! {
    TypeRegistration {
        name: "GreetingServiceImpl",
        describe: describe_greeting_service,
    }
}

// ========== RequestContext (prototype) ==========

/// 요청마다 새로 만들어지는 컨텍스트
pub struct RequestContext {
    pub request_id: Uuid,
    pub locale: String,
}

impl RequestContext {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            locale: locale.into(),
        }
    }
}

impl Component for RequestContext {}

fn describe_request_context() -> TypeDescriptor {
    TypeDescriptor::builder::<RequestContext>("RequestContext")
        .constructor(vec![], |_| Ok(RequestContext::new("en")))
        .constructor(vec![ValueType::Str], |args| Ok(RequestContext::new(args.str(0)?)))
        .build()
}

inventory::submit! {
    TypeRegistration {
        name: "RequestContext",
        describe: describe_request_context,
    }
}
