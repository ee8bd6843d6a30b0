//! # Pointcut
//!
//! 어떤 메서드 호출에 advice 를 적용할지 결정하는 매처입니다.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::aop::POINTCUT;
use crate::core::component::Component;
use crate::core::descriptor::{MethodSignature, TypeDescriptor};
use crate::core::registry::TypeRegistration;
use crate::core::value::ValueType;

/// 메서드 매처
pub trait Pointcut: Send + Sync {
    /// `target_type` 의 `method` 호출에 적용되는지 여부
    fn matches(&self, method: &MethodSignature, target_type: &str) -> bool;
}

pub const NAME_MATCH_POINTCUT: &str = "NameMatchPointcut";

/// 메서드 이름 기반 pointcut
///
/// 정확한 이름 외에 `*` 접두/접미 와일드카드를 지원합니다.
///
/// | 패턴 | 일치 |
/// |------|------|
/// | `save` | `save` |
/// | `find*` | `find`, `findById` |
/// | `*User` | `saveUser`, `deleteUser` |
/// | `*Order*` | `placeOrderNow` |
/// | `*` | 전부 |
#[derive(Debug, Default)]
pub struct NameMatchPointcut {
    names: RwLock<Vec<String>>,
}

impl NameMatchPointcut {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pointcut = Self::default();
        for name in names {
            pointcut.add_method_name(name);
        }
        pointcut
    }

    pub fn add_method_name(&self, name: impl Into<String>) {
        let name = name.into();
        let mut names = self.names.write();
        if !names.contains(&name) {
            names.push(name);
        }
    }

    /// 쉼표로 구분된 이름 목록을 추가합니다. 빈 항목은 무시합니다.
    pub fn set_method_names(&self, csv: &str) {
        csv.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .for_each(|name| self.add_method_name(name));
    }

    pub fn method_names(&self) -> Vec<String> {
        self.names.read().clone()
    }

    fn is_match(method_name: &str, pattern: &str) -> bool {
        if pattern == "*" {
            return true;
        }
        match (pattern.strip_prefix('*'), pattern.strip_suffix('*')) {
            (Some(_), Some(_)) => method_name.contains(&pattern[1..pattern.len() - 1]),
            (Some(suffix), None) => method_name.ends_with(suffix),
            (None, Some(prefix)) => method_name.starts_with(prefix),
            (None, None) => method_name == pattern,
        }
    }
}

impl Pointcut for NameMatchPointcut {
    fn matches(&self, method: &MethodSignature, _target_type: &str) -> bool {
        self.names
            .read()
            .iter()
            .any(|pattern| Self::is_match(&method.name, pattern))
    }
}

impl Component for NameMatchPointcut {
    fn as_pointcut(self: Arc<Self>) -> Option<Arc<dyn Pointcut>> {
        Some(self)
    }
}

fn describe_name_match_pointcut() -> TypeDescriptor {
    TypeDescriptor::builder::<NameMatchPointcut>(NAME_MATCH_POINTCUT)
        .implements(POINTCUT)
        .constructor(vec![], |_| Ok(NameMatchPointcut::default()))
        .constructor(vec![ValueType::Str], |args| {
            let pointcut = NameMatchPointcut::default();
            pointcut.set_method_names(&args.str(0)?);
            Ok(pointcut)
        })
        .property("method_names", ValueType::Str, |pointcut, value| {
            pointcut.set_method_names(value.as_str().unwrap_or_default());
            Ok(())
        })
        .build()
}

inventory::submit! {
    TypeRegistration {
        name: NAME_MATCH_POINTCUT,
        describe: describe_name_match_pointcut,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::component::{is_aop_infrastructure, Instance};

    fn signature(name: &str) -> MethodSignature {
        MethodSignature::new("UserService", name, vec![])
    }

    #[test]
    fn test_exact_name_match() {
        let pointcut = NameMatchPointcut::new(["save"]);

        assert!(pointcut.matches(&signature("save"), "UserServiceImpl"));
        assert!(!pointcut.matches(&signature("find"), "UserServiceImpl"));
        assert!(!pointcut.matches(&signature("saveAll"), "UserServiceImpl"));
    }

    #[test]
    fn test_wildcard_patterns() {
        let pointcut = NameMatchPointcut::new(["find*", "*User", "*Order*"]);

        assert!(pointcut.matches(&signature("findById"), "T"));
        assert!(pointcut.matches(&signature("deleteUser"), "T"));
        assert!(pointcut.matches(&signature("placeOrderNow"), "T"));
        assert!(!pointcut.matches(&signature("save"), "T"));
        assert!(NameMatchPointcut::new(["*"]).matches(&signature("anything"), "T"));
    }

    #[test]
    fn test_csv_method_names_are_trimmed_and_deduplicated() {
        let pointcut = NameMatchPointcut::default();
        pointcut.set_method_names(" save, find ,,save ");

        assert_eq!(pointcut.method_names(), vec!["save", "find"]);
    }

    #[test]
    fn test_pointcut_is_infrastructure() {
        let instance: Instance = Arc::new(NameMatchPointcut::default());

        assert!(is_aop_infrastructure(&instance));
        assert!(instance.as_pointcut().is_some());
    }
}
