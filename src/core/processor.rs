//! # Extension Pipeline
//!
//! 초기화 전/후에 인스턴스를 검사하거나 교체할 수 있는 후처리기 체인입니다.
//!
//! - 후처리기는 추가만 가능하며, 두 단계 모두 **등록 순서대로** 실행됩니다.
//! - 훅이 `Ok(None)` 을 반환하면 직전 값을 유지하고 해당 단계의 나머지 체인을 건너뜁니다.
//! - 훅이 `Err` 를 반환하면 생성 전체가 실패합니다.
//!
//! ## Spring과의 비교
//!
//! | Spring | 이 시스템 |
//! |--------|-----------|
//! | `BeanPostProcessor#postProcessBeforeInitialization` | `before_initialization` |
//! | `BeanPostProcessor#postProcessAfterInitialization` | `after_initialization` |
//! | `SmartInstantiationAwareBeanPostProcessor#getEarlyBeanReference` | `early_reference` |

use std::sync::Arc;

use log::debug;
use parking_lot::RwLock;

use crate::core::component::Instance;
use crate::core::container::Container;
use crate::core::errors::ContainerResult;

/// 엔티티 후처리기
///
/// 모든 훅의 기본 구현은 항등 변환입니다.
pub trait EntityPostProcessor: Send + Sync {
    /// 진단용 이름
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn before_initialization(
        &self,
        instance: Instance,
        _name: &str,
        _container: &Container,
    ) -> ContainerResult<Option<Instance>> {
        Ok(Some(instance))
    }

    fn after_initialization(
        &self,
        instance: Instance,
        _name: &str,
        _container: &Container,
    ) -> ContainerResult<Option<Instance>> {
        Ok(Some(instance))
    }

    /// 순환 참조 해소를 위해 조기 노출되는 참조를 가공합니다.
    fn early_reference(&self, instance: Instance, _name: &str) -> Instance {
        instance
    }
}

#[derive(Clone, Copy)]
enum Phase {
    Before,
    After,
}

/// 등록 순서를 보존하는 후처리기 목록
#[derive(Default)]
pub struct ProcessorChain {
    processors: RwLock<Vec<Arc<dyn EntityPostProcessor>>>,
}

impl ProcessorChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, processor: Arc<dyn EntityPostProcessor>) {
        debug!("🔌 Post-processor added: {}", processor.name());
        self.processors.write().push(processor);
    }

    pub fn len(&self) -> usize {
        self.processors.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.read().is_empty()
    }

    /// 훅 실행 중 다른 엔티티 해석이 후처리기를 추가해도 막히지 않도록 사본을 사용합니다.
    fn snapshot(&self) -> Vec<Arc<dyn EntityPostProcessor>> {
        self.processors.read().clone()
    }

    pub fn apply_before_initialization(
        &self,
        instance: Instance,
        name: &str,
        container: &Container,
    ) -> ContainerResult<Instance> {
        self.apply(Phase::Before, instance, name, container)
    }

    pub fn apply_after_initialization(
        &self,
        instance: Instance,
        name: &str,
        container: &Container,
    ) -> ContainerResult<Instance> {
        self.apply(Phase::After, instance, name, container)
    }

    fn apply(
        &self,
        phase: Phase,
        instance: Instance,
        name: &str,
        container: &Container,
    ) -> ContainerResult<Instance> {
        let mut current = instance;
        for processor in self.snapshot() {
            let result = match phase {
                Phase::Before => processor.before_initialization(current.clone(), name, container)?,
                Phase::After => processor.after_initialization(current.clone(), name, container)?,
            };
            match result {
                Some(next) => {
                    if !Arc::ptr_eq(&next, &current) {
                        debug!("'{}' replaced by {}", name, processor.name());
                    }
                    current = next;
                }
                None => {
                    debug!("'{}': {} returned nothing, chain stopped", name, processor.name());
                    break;
                }
            }
        }
        Ok(current)
    }

    /// 등록된 모든 후처리기의 `early_reference` 를 순서대로 적용합니다.
    pub fn apply_early_reference(&self, instance: Instance, name: &str) -> Instance {
        self.snapshot()
            .iter()
            .fold(instance, |current, processor| processor.early_reference(current, name))
    }
}
