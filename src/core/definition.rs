//! # Entity Definitions
//!
//! 컨테이너가 인스턴스를 만들 때 참고하는 선언적 메타데이터입니다.
//! Spring의 `BeanDefinition` 에 대응하며, 설정 파일 리더나 패키지 스캐너 같은
//! 외부 협력자가 만들어 `Container::register` 로 넘겨줍니다.
//!
//! 정의는 등록 이후 읽기 전용으로 취급되며, `serde` 로 역직렬화할 수 있어
//! 외부 포맷(JSON 등)에서 곧바로 생성할 수 있습니다.
//!
//! ```rust,ignore
//! let definition = EntityDefinition::new("OrderService")
//!     .with_scope(Scope::Prototype)
//!     .constructor_arg(ArgumentValue::reference("userRepository"))
//!     .property("timeout", ArgumentValue::literal("30"));
//! ```

use serde::{Deserialize, Serialize};

/// 인스턴스 공유 범위
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// 컨테이너당 하나의 공유 인스턴스
    #[default]
    Singleton,
    /// 해석할 때마다 새 인스턴스 (호출자가 소유)
    Prototype,
}

/// 생성자 인자 또는 프로퍼티 값
///
/// 리터럴은 대상 타입으로 변환되고, 참조는 컨테이너를 통해 재귀적으로 해석됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentValue {
    /// 문자열 리터럴 (`"42"`, `"true"`, `"hello"`)
    Literal(String),
    /// 이름으로 참조하는 다른 엔티티
    #[serde(rename = "ref")]
    Reference(String),
}

impl ArgumentValue {
    pub fn literal(value: impl Into<String>) -> Self {
        ArgumentValue::Literal(value.into())
    }

    pub fn reference(name: impl Into<String>) -> Self {
        ArgumentValue::Reference(name.into())
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, ArgumentValue::Reference(_))
    }
}

/// 이름이 붙은 프로퍼티 바인딩
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyBinding {
    pub name: String,
    pub value: ArgumentValue,
}

/// 엔티티 정의
///
/// | 필드 | 의미 |
/// |------|------|
/// | `type_name` | 타입 디스크립터 식별자 |
/// | `scope` | singleton / prototype |
/// | `lazy_init` | `refresh()` 시 미리 생성하지 않음 |
/// | `init_method` | 이름으로 지정한 초기화 훅 |
/// | `destroy_method` | 이름으로 지정한 파괴 훅 |
/// | `constructor_args` | 순서가 있는 생성자 인자 |
/// | `properties` | 이름이 붙은 프로퍼티 바인딩 |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDefinition {
    pub type_name: String,
    #[serde(default)]
    pub scope: Scope,
    #[serde(default)]
    pub lazy_init: bool,
    #[serde(default)]
    pub init_method: Option<String>,
    #[serde(default)]
    pub destroy_method: Option<String>,
    #[serde(default)]
    pub constructor_args: Vec<ArgumentValue>,
    #[serde(default)]
    pub properties: Vec<PropertyBinding>,
}

impl EntityDefinition {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            scope: Scope::Singleton,
            lazy_init: false,
            init_method: None,
            destroy_method: None,
            constructor_args: Vec::new(),
            properties: Vec::new(),
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn lazy(mut self) -> Self {
        self.lazy_init = true;
        self
    }

    pub fn with_init_method(mut self, name: impl Into<String>) -> Self {
        self.init_method = Some(name.into());
        self
    }

    pub fn with_destroy_method(mut self, name: impl Into<String>) -> Self {
        self.destroy_method = Some(name.into());
        self
    }

    pub fn constructor_arg(mut self, value: ArgumentValue) -> Self {
        self.constructor_args.push(value);
        self
    }

    pub fn property(mut self, name: impl Into<String>, value: ArgumentValue) -> Self {
        self.properties.push(PropertyBinding {
            name: name.into(),
            value,
        });
        self
    }

    pub fn is_singleton(&self) -> bool {
        self.scope == Scope::Singleton
    }

    pub fn is_prototype(&self) -> bool {
        self.scope == Scope::Prototype
    }

    /// 생성자 인자 중 다른 엔티티 참조가 있는지 여부
    ///
    /// 참조가 있으면 조기 노출이 불가능하며, 이 엔티티를 거치는 순환은 치명적입니다.
    pub fn has_constructor_references(&self) -> bool {
        self.constructor_args.iter().any(ArgumentValue::is_reference)
    }

    /// 공백만 있는 훅 이름은 지정하지 않은 것으로 봅니다.
    pub fn init_method_name(&self) -> Option<&str> {
        self.init_method
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    pub fn destroy_method_name(&self) -> Option<&str> {
        self.destroy_method
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}
