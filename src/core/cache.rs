//! # Three-Tier Singleton Cache
//!
//! 싱글톤 순환 참조를 해결하기 위한 3단계 캐시입니다.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ L1 ready      이름 → 완성된 싱글톤                        │
//! ├──────────────────────────────────────────────────────────┤
//! │ L2 early      이름 → 할당됐지만 아직 채워지지 않은 인스턴스 │
//! ├──────────────────────────────────────────────────────────┤
//! │ L3 factories  이름 → 조기 참조를 지연 생성하는 공급자      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! - 생성 중인 이름에 대한 조회는 L2, 없으면 L3 공급자를 **한 번** 실행해 L2로 승격합니다.
//! - 생성 완료 시 L1에 올리고 L2/L3 항목을 지웁니다.
//! - 생성 실패 시 해당 이름의 흔적(생성 중 표시, L2, L3)을 모두 지웁니다.
//!   실패한 이름을 (직접 또는 간접으로) 참조하며 이미 완성된 싱글톤도 L1 에서 내립니다.
//!
//! 내부 뮤텍스는 짧게만 잡으며, L3 공급자는 락을 놓은 상태에서 실행합니다.
//! 생성 자체의 상호 배제는 컨테이너의 생성 락이 담당합니다.

use std::collections::{HashMap, HashSet};
use std::fmt;

use log::debug;
use parking_lot::Mutex;

use crate::core::component::Instance;

/// L3 조기 참조 공급자
pub type EarlyReferenceFactory = Box<dyn FnOnce() -> Instance + Send>;

/// 이름별 인스턴스 생명주기 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstanceState {
    #[default]
    NotCreated,
    UnderConstruction,
    EarlyExposed,
    Ready,
    Destroyed,
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InstanceState::NotCreated => "not-created",
            InstanceState::UnderConstruction => "under-construction",
            InstanceState::EarlyExposed => "early-exposed",
            InstanceState::Ready => "ready",
            InstanceState::Destroyed => "destroyed",
        };
        write!(f, "{}", label)
    }
}

#[derive(Default)]
struct CacheState {
    ready: HashMap<String, Instance>,
    early: HashMap<String, Instance>,
    factories: HashMap<String, EarlyReferenceFactory>,
    in_creation: HashSet<String>,
    states: HashMap<String, InstanceState>,
    /// 이름 → 그 이름을 참조로 주입받은 엔티티들
    dependents: HashMap<String, HashSet<String>>,
}

/// 3단계 싱글톤 캐시
#[derive(Default)]
pub struct SingletonCache {
    inner: Mutex<CacheState>,
}

impl SingletonCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// L1 조회
    pub fn ready(&self, name: &str) -> Option<Instance> {
        self.inner.lock().ready.get(name).cloned()
    }

    /// 생성 중인 이름의 조기 참조를 반환합니다.
    ///
    /// L2 에 있으면 그대로, 없으면 L3 공급자를 실행해 L2 로 옮깁니다.
    /// 생성 중이 아니거나 조기 노출되지 않았다면 `None` 입니다.
    pub fn early_reference(&self, name: &str) -> Option<Instance> {
        let factory = {
            let mut state = self.inner.lock();
            if !state.in_creation.contains(name) {
                return None;
            }
            if let Some(instance) = state.early.get(name) {
                return Some(instance.clone());
            }
            state.factories.remove(name)?
        };

        let instance = factory();

        let mut state = self.inner.lock();
        state.early.insert(name.to_string(), instance.clone());
        debug!("L3 → L2 promoted: {}", name);
        Some(instance)
    }

    pub fn is_in_creation(&self, name: &str) -> bool {
        self.inner.lock().in_creation.contains(name)
    }

    /// 생성 중 표시를 남깁니다. 이미 생성 중이면 `false` 를 반환합니다.
    pub fn begin_creation(&self, name: &str) -> bool {
        let mut state = self.inner.lock();
        let inserted = state.in_creation.insert(name.to_string());
        if inserted {
            state
                .states
                .insert(name.to_string(), InstanceState::UnderConstruction);
        }
        inserted
    }

    /// L3 공급자를 등록합니다. 이미 완성된 이름이면 무시합니다.
    pub fn add_factory(&self, name: &str, factory: EarlyReferenceFactory) {
        let mut state = self.inner.lock();
        if state.ready.contains_key(name) {
            return;
        }
        state.factories.insert(name.to_string(), factory);
        state.early.remove(name);
        state
            .states
            .insert(name.to_string(), InstanceState::EarlyExposed);
    }

    /// 생성 완료: L1 에 올리고 L2/L3 및 생성 중 표시를 지웁니다.
    ///
    /// 생성 도중 다른 엔티티에게 넘겨진 조기 참조가 있었다면 그것을 반환합니다.
    pub fn complete(&self, name: &str, instance: Instance) -> Option<Instance> {
        let mut state = self.inner.lock();
        let early = state.early.remove(name);
        state.factories.remove(name);
        state.in_creation.remove(name);
        state.ready.insert(name.to_string(), instance);
        state.states.insert(name.to_string(), InstanceState::Ready);
        early
    }

    /// `dependent` 가 `name` 을 참조로 주입받았음을 기록합니다.
    pub fn register_dependent(&self, name: &str, dependent: &str) {
        if name == dependent {
            return;
        }
        self.inner
            .lock()
            .dependents
            .entry(name.to_string())
            .or_default()
            .insert(dependent.to_string());
    }

    /// 생성 실패: 해당 이름의 흔적을 모두 지웁니다.
    ///
    /// 실패한 이름의 조기 참조를 받아 이미 L1 에 오른 싱글톤(과 그것을 참조한 싱글톤)도
    /// 함께 내리고, 내린 이름들을 반환합니다.
    pub fn abort(&self, name: &str) -> Vec<String> {
        let mut state = self.inner.lock();
        state.early.remove(name);
        state.factories.remove(name);
        state.in_creation.remove(name);
        state
            .states
            .insert(name.to_string(), InstanceState::NotCreated);

        let mut evicted = Vec::new();
        let mut visited: HashSet<String> = HashSet::from([name.to_string()]);
        let mut pending: Vec<String> = state
            .dependents
            .remove(name)
            .map(|set| set.into_iter().collect())
            .unwrap_or_default();

        while let Some(dependent) = pending.pop() {
            if !visited.insert(dependent.clone()) {
                continue;
            }
            if state.ready.remove(&dependent).is_some() {
                state
                    .states
                    .insert(dependent.clone(), InstanceState::NotCreated);
                if let Some(next) = state.dependents.remove(&dependent) {
                    pending.extend(next);
                }
                debug!("L1 evicted: {} (depends on failed '{}')", dependent, name);
                evicted.push(dependent);
            } else if let Some(next) = state.dependents.get(&dependent) {
                pending.extend(next.iter().cloned());
            }
        }
        evicted
    }

    /// 외부에서 완성된 인스턴스를 L1 에 직접 등록합니다.
    pub fn register_ready(&self, name: &str, instance: Instance) {
        let mut state = self.inner.lock();
        state.ready.insert(name.to_string(), instance);
        state.states.insert(name.to_string(), InstanceState::Ready);
    }

    pub fn state(&self, name: &str) -> InstanceState {
        self.inner
            .lock()
            .states
            .get(name)
            .copied()
            .unwrap_or_default()
    }

    pub fn mark_destroyed(&self, name: &str) {
        self.inner
            .lock()
            .states
            .insert(name.to_string(), InstanceState::Destroyed);
    }

    /// 모든 캐시 단계를 비웁니다. 생명주기 상태 기록은 유지됩니다.
    pub fn clear(&self) {
        let mut state = self.inner.lock();
        state.ready.clear();
        state.early.clear();
        state.factories.clear();
        state.in_creation.clear();
        state.dependents.clear();
    }

    pub fn ready_names(&self) -> Vec<String> {
        self.inner.lock().ready.keys().cloned().collect()
    }
}
