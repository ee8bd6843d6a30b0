//! # Auto Proxy Creator
//!
//! 초기화가 끝난 엔티티에 적용 가능한 advisor 가 있으면 프록시로 바꿔치기하는 후처리기입니다.
//!
//! 1. advice / pointcut / advisor 인프라 객체는 건너뜁니다.
//! 2. 컨테이너에서 advisor 역할의 엔티티를 모두 찾습니다 (생성 중인 것은 제외).
//! 3. 타깃 타입의 capability 메서드 중 하나라도 pointcut 에 걸리는 advisor 만 남깁니다.
//! 4. 남은 advisor 가 있으면 프록시를, 없으면 원래 인스턴스를 반환합니다.
//!
//! 순환 참조로 조기 노출된 싱글톤이 나중에 프록시로 바뀌면, 조기 참조를 받은 쪽은
//! 원본 인스턴스를 계속 가지고 있습니다. 컨테이너는 이 경우 경고 로그를 남깁니다.

use std::sync::Arc;

use log::debug;

use crate::aop::advisor::Advisor;
use crate::aop::proxy::{ProxyConfig, ProxyFactory};
use crate::aop::ADVISOR;
use crate::core::component::{is_aop_infrastructure, Instance};
use crate::core::container::Container;
use crate::core::descriptor::{MethodDescriptor, TypeDescriptor};
use crate::core::errors::ContainerResult;
use crate::core::processor::EntityPostProcessor;

#[derive(Debug, Default, Clone, Copy)]
pub struct AutoProxyCreator;

impl AutoProxyCreator {
    pub fn new() -> Self {
        Self
    }

    fn candidate_advisors(&self, container: &Container) -> ContainerResult<Vec<Arc<dyn Advisor>>> {
        let mut advisors = Vec::new();

        for name in container.names_of_type(ADVISOR) {
            if container.is_currently_in_creation(&name) {
                debug!("Advisor '{}' is still in creation, skipped", name);
                continue;
            }
            if let Some(advisor) = container.resolve(&name)?.as_advisor() {
                advisors.push(advisor);
            }
        }

        Ok(advisors)
    }

    /// 프록시가 노출하는 capability 메서드 중 pointcut 에 걸리는 것이 있는지 확인합니다.
    ///
    /// capability 가 없는 타입은 모든 메서드를 보고, 일치하면 프록시 생성 단계에서
    /// `ProxyUnsupported` 로 실패합니다.
    fn can_apply(advisor: &Arc<dyn Advisor>, descriptor: &TypeDescriptor) -> bool {
        let pointcut = advisor.pointcut();
        let matches = |method: &MethodDescriptor| pointcut.matches(&method.signature, &descriptor.name);

        if descriptor.interfaces.is_empty() {
            descriptor.methods.iter().any(matches)
        } else {
            descriptor.interface_methods().any(matches)
        }
    }
}

impl EntityPostProcessor for AutoProxyCreator {
    fn name(&self) -> &str {
        "AutoProxyCreator"
    }

    fn after_initialization(
        &self,
        instance: Instance,
        name: &str,
        container: &Container,
    ) -> ContainerResult<Option<Instance>> {
        if is_aop_infrastructure(&instance) {
            return Ok(Some(instance));
        }

        let Some(descriptor) = container.descriptor_of(&instance) else {
            return Ok(Some(instance));
        };

        let advisors: Vec<Arc<dyn Advisor>> = self
            .candidate_advisors(container)?
            .into_iter()
            .filter(|advisor| Self::can_apply(advisor, &descriptor))
            .collect();

        if advisors.is_empty() {
            return Ok(Some(instance));
        }

        let mut config = ProxyConfig::new(instance, descriptor);
        for advisor in advisors {
            config.add_advisor(advisor);
        }

        let proxy: Instance = ProxyFactory::new(config).get_proxy()?;
        debug!("'{}' wrapped by an AOP proxy", name);
        Ok(Some(proxy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aop::advice::{Advice, MethodBeforeAdvice};
    use crate::aop::advisor::POINTCUT_ADVISOR;
    use crate::aop::invocation::InvocationError;
    use crate::aop::pointcut::NAME_MATCH_POINTCUT;
    use crate::aop::proxy::AopProxy;
    use crate::core::component::Component;
    use crate::core::definition::{ArgumentValue, EntityDefinition};
    use crate::core::descriptor::MethodSignature;
    use crate::core::errors::ContainerError;
    use crate::core::value::{Value, ValueType};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Accounts {
        peer: Mutex<Option<Instance>>,
        opened: AtomicUsize,
    }

    impl Component for Accounts {}

    fn accounts_type() -> TypeDescriptor {
        TypeDescriptor::builder::<Accounts>("Accounts")
            .implements("AccountService")
            .constructor(vec![], |_| Ok(Accounts::default()))
            .property("peer", ValueType::Any, |accounts, value| {
                *accounts.peer.lock().unwrap() = value.as_instance().cloned();
                Ok(())
            })
            .method("AccountService", "open", vec![ValueType::Str], |accounts, _| {
                Ok(Value::Int(accounts.opened.fetch_add(1, Ordering::SeqCst) as i64 + 1))
            })
            .method("AccountService", "balance", vec![], |_, _| Ok(Value::Int(0)))
            .method("Accounts", "close", vec![], |_, _| Ok(Value::Null))
            .build()
    }

    struct Ledger;

    impl Component for Ledger {}

    fn ledger_type() -> TypeDescriptor {
        TypeDescriptor::builder::<Ledger>("Ledger")
            .constructor(vec![], |_| Ok(Ledger))
            .method("Ledger", "open", vec![], |_, _| Ok(Value::Null))
            .build()
    }

    #[derive(Default)]
    struct Audit {
        calls: AtomicUsize,
    }

    impl MethodBeforeAdvice for Audit {
        fn before(
            &self,
            _method: &MethodSignature,
            _args: &[Value],
            _target: &Instance,
        ) -> Result<(), InvocationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    impl Component for Audit {
        fn as_advice(self: Arc<Self>) -> Option<Advice> {
            Some(Advice::Before(self))
        }
    }

    fn audit_type() -> TypeDescriptor {
        TypeDescriptor::builder::<Audit>("Audit")
            .implements(crate::aop::ADVICE)
            .constructor(vec![], |_| Ok(Audit::default()))
            .build()
    }

    fn container_with_advisor(methods: &str) -> Arc<Container> {
        let container = Container::new();
        container.register_type(accounts_type());
        container.register_type(ledger_type());
        container.register_type(audit_type());
        container.add_processor(Arc::new(AutoProxyCreator::new()));

        container.register("audit", EntityDefinition::new("Audit")).unwrap();
        container
            .register(
                "pointcut",
                EntityDefinition::new(NAME_MATCH_POINTCUT)
                    .constructor_arg(ArgumentValue::literal(methods)),
            )
            .unwrap();
        container
            .register(
                "advisor",
                EntityDefinition::new(POINTCUT_ADVISOR)
                    .constructor_arg(ArgumentValue::reference("pointcut"))
                    .constructor_arg(ArgumentValue::reference("audit")),
            )
            .unwrap();
        container
    }

    #[test]
    fn test_matching_entity_is_proxied() {
        let container = container_with_advisor("open");
        container.register("accounts", EntityDefinition::new("Accounts")).unwrap();

        let accounts = container.resolve("accounts").unwrap();
        assert!(accounts.downcast_ref::<AopProxy>().is_some());
        assert!(container.resolve_typed("accounts", "AccountService").is_ok());

        assert_eq!(accounts.invoke("open", &[Value::from("alice")]), Ok(Value::Int(1)));
        accounts.invoke("balance", &[]).unwrap();

        let audit = container.resolve_as::<Audit>("audit").unwrap();
        assert_eq!(audit.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_infrastructure_and_unmatched_entities_are_left_alone() {
        let container = container_with_advisor("transfer");
        container.register("accounts", EntityDefinition::new("Accounts")).unwrap();

        let accounts = container.resolve("accounts").unwrap();
        assert!(accounts.downcast_ref::<Accounts>().is_some());
        assert!(container.resolve("advisor").unwrap().downcast_ref::<AopProxy>().is_none());
        assert!(container.resolve("audit").unwrap().downcast_ref::<Audit>().is_some());
    }

    #[test]
    fn test_advisor_matching_only_concrete_methods_does_not_proxy() {
        let container = container_with_advisor("close");
        container.register("accounts", EntityDefinition::new("Accounts")).unwrap();

        let accounts = container.resolve("accounts").unwrap();
        assert!(accounts.downcast_ref::<Accounts>().is_some());
    }

    #[test]
    fn test_matching_type_without_capability_fails_to_proxy() {
        let container = container_with_advisor("open");
        container.register("ledger", EntityDefinition::new("Ledger")).unwrap();

        let error = container.resolve("ledger").err().expect("must fail");
        assert!(matches!(
            error.root_cause(),
            ContainerError::ProxyUnsupported { type_name, .. } if type_name == "Ledger"
        ));
    }

    #[test]
    fn test_early_reference_peer_keeps_raw_instance() {
        let container = container_with_advisor("open");
        container
            .register(
                "a",
                EntityDefinition::new("Accounts").property("peer", ArgumentValue::reference("b")),
            )
            .unwrap();
        container
            .register(
                "b",
                EntityDefinition::new("Accounts").property("peer", ArgumentValue::reference("a")),
            )
            .unwrap();

        let a = container.resolve("a").unwrap();
        let b = container.resolve("b").unwrap();

        let proxied_a = a.downcast_ref::<AopProxy>().expect("a is proxied");
        let proxied_b = b.downcast_ref::<AopProxy>().expect("b is proxied");

        let b_target = proxied_b.target().downcast_ref::<Accounts>().unwrap();
        let seen_a = b_target.peer.lock().unwrap().clone().unwrap();
        assert!(seen_a.downcast_ref::<Accounts>().is_some());
        assert!(Arc::ptr_eq(&seen_a, proxied_a.target()));
    }
}
