//! # Proxies
//!
//! [`ProxyConfig`] 로 타깃과 advisor 목록을 모으고, [`ProxyFactory`] 로 [`AopProxy`] 를 만듭니다.
//!
//! ```rust,ignore
//! let mut config = ProxyConfig::new(target, descriptor);
//! config.add_advisor(Arc::new(PointcutAdvisor::new(pointcut, advice)));
//! let proxy = ProxyFactory::new(config).get_proxy()?;
//!
//! proxy.invoke("save", &[Value::from("alice")])?;
//! ```
//!
//! ## 제약
//!
//! - 타깃 타입이 capability 를 하나 이상 선언해야 합니다.
//! - `proxy_target_type`(구체 타입 프록시) 요청은 지원하지 않습니다.
//! - 프록시는 capability 에 선언된 메서드만 노출합니다.

use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::aop::advice::Advice;
use crate::aop::advisor::Advisor;
use crate::aop::invocation::{InvocationError, InvocationResult, MethodInvocation};
use crate::core::component::{
    Component, ContainerAware, DisposableComponent, InitializingComponent, Instance, NameAware,
};
use crate::core::descriptor::{MethodSignature, TypeDescriptor};
use crate::core::errors::{ContainerError, ContainerResult};
use crate::core::value::Value;

/// 프록시 설정
#[derive(Clone)]
pub struct ProxyConfig {
    pub target: Instance,
    pub target_type: Arc<TypeDescriptor>,
    pub proxy_target_type: bool,
    advisors: Vec<Arc<dyn Advisor>>,
}

impl ProxyConfig {
    pub fn new(target: Instance, target_type: Arc<TypeDescriptor>) -> Self {
        Self {
            target,
            target_type,
            proxy_target_type: false,
            advisors: Vec::new(),
        }
    }

    pub fn add_advisor(&mut self, advisor: Arc<dyn Advisor>) {
        self.advisors.push(advisor);
    }

    /// `index` 위치에 advisor 를 끼워 넣습니다. 범위를 넘으면 끝에 추가합니다.
    pub fn insert_advisor(&mut self, index: usize, advisor: Arc<dyn Advisor>) {
        let index = index.min(self.advisors.len());
        self.advisors.insert(index, advisor);
    }

    pub fn advisors(&self) -> &[Arc<dyn Advisor>] {
        &self.advisors
    }

    /// 호출되는 메서드에 적용할 advice 를 advisor 등록 순서대로 반환합니다.
    pub fn interceptors_for(&self, method: &MethodSignature) -> Vec<Advice> {
        self.advisors
            .iter()
            .filter(|advisor| advisor.pointcut().matches(method, &self.target_type.name))
            .map(|advisor| advisor.advice())
            .collect()
    }
}

impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("target_type", &self.target_type.name)
            .field("advisors", &self.advisors.len())
            .field("proxy_target_type", &self.proxy_target_type)
            .finish()
    }
}

/// 프록시 팩토리
pub struct ProxyFactory {
    config: ProxyConfig,
}

impl ProxyFactory {
    pub fn new(config: ProxyConfig) -> Self {
        Self { config }
    }

    /// # Errors
    ///
    /// * `ProxyUnsupported` - 구체 타입 프록시 요청, 또는 타깃이 capability 를 선언하지 않음
    pub fn get_proxy(self) -> ContainerResult<Arc<AopProxy>> {
        let type_name = self.config.target_type.name.clone();

        if self.config.proxy_target_type {
            return Err(ContainerError::ProxyUnsupported {
                type_name,
                reason: "proxying the concrete type is not supported".to_string(),
            });
        }

        if self.config.target_type.interfaces.is_empty() {
            return Err(ContainerError::ProxyUnsupported {
                type_name,
                reason: "the type declares no capability to proxy".to_string(),
            });
        }

        debug!(
            "🎭 Proxy created for {} ({} advisors, capabilities: {:?})",
            type_name,
            self.config.advisors.len(),
            self.config.target_type.interfaces
        );
        Ok(Arc::new(AopProxy {
            config: self.config,
        }))
    }
}

/// 인터페이스 프록시
///
/// capability 메서드 호출을 인터셉터 체인으로 실행하고, 생명주기 capability 질의는 타깃에 위임합니다.
pub struct AopProxy {
    config: ProxyConfig,
}

impl AopProxy {
    pub fn target(&self) -> &Instance {
        &self.config.target
    }

    pub fn target_type(&self) -> &TypeDescriptor {
        &self.config.target_type
    }

    pub fn interfaces(&self) -> &[String] {
        &self.config.target_type.interfaces
    }

    pub fn implements(&self, capability: &str) -> bool {
        self.config.target_type.implements(capability)
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

impl fmt::Debug for AopProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AopProxy")
            .field("config", &self.config)
            .finish()
    }
}

impl Component for AopProxy {
    fn invoke(&self, method: &str, args: &[Value]) -> InvocationResult {
        let descriptor = self
            .config
            .target_type
            .find_interface_method(method, args.len())
            .ok_or_else(|| InvocationError::NoSuchMethod {
                type_name: self.config.target_type.name.clone(),
                method: method.to_string(),
            })?;

        let chain = self.config.interceptors_for(&descriptor.signature);
        if chain.is_empty() {
            return descriptor.invoke(&*self.config.target, args);
        }

        MethodInvocation::new(&self.config.target, descriptor, args.to_vec(), &chain).proceed()
    }

    fn as_name_aware(&self) -> Option<&dyn NameAware> {
        self.config.target.as_name_aware()
    }

    fn as_container_aware(&self) -> Option<&dyn ContainerAware> {
        self.config.target.as_container_aware()
    }

    fn as_initializing(&self) -> Option<&dyn InitializingComponent> {
        self.config.target.as_initializing()
    }

    fn as_disposable(&self) -> Option<&dyn DisposableComponent> {
        self.config.target.as_disposable()
    }
}
