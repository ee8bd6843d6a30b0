//! # Values and Literal Coercion
//!
//! 생성자 인자와 프로퍼티에 흘러가는 런타임 값([`Value`])과 선언 타입([`ValueType`]),
//! 그리고 문자열 리터럴을 선언 타입으로 바꾸는 [`TypeConverter`] 를 제공합니다.
//!
//! ## 변환 규칙
//!
//! | 선언 타입 | 입력 | 결과 |
//! |-----------|------|------|
//! | `Int` | `" 42 "` | `Int(42)` |
//! | `Int` | `""` | `Int(0)` (기본값) |
//! | `Optional(Int)` | `""` | `Null` |
//! | `Bool` | `yes` / `on` / `1` | `Bool(true)` |
//! | `Char` | `"ab"` | 에러 (한 글자만 허용) |
//!
//! `Optional(T)` 는 nullable("boxed") 형태로, `T` 와 상호 대입 가능합니다.

use std::fmt;
use std::sync::Arc;

use crate::core::component::Instance;

/// 런타임 값
#[derive(Clone)]
pub enum Value {
    Null,
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Char(char),
    Instance(Instance),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            Value::Char(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Value::Instance(instance) => Some(instance),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// 진단 메시지용 값 종류 이름
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Str(_) => "str",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Char(_) => "char",
            Value::Instance(instance) => instance.component_type(),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Str(s) => write!(f, "Str({:?})", s),
            Value::Int(v) => write!(f, "Int({})", v),
            Value::Float(v) => write!(f, "Float({})", v),
            Value::Bool(v) => write!(f, "Bool({})", v),
            Value::Char(v) => write!(f, "Char({:?})", v),
            Value::Instance(instance) => write!(f, "Instance({})", instance.component_type()),
        }
    }
}

/// 인스턴스는 동일성(같은 할당)으로 비교합니다.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Instance(a), Value::Instance(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<Instance> for Value {
    fn from(value: Instance) -> Self {
        Value::Instance(value)
    }
}

/// 생성자 파라미터 / 프로퍼티 / 메서드 파라미터의 선언 타입
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    Str,
    Int,
    Float,
    Bool,
    Char,
    /// nullable 형태. `T` 와 상호 대입 가능
    Optional(Box<ValueType>),
    /// 타입 이름 또는 capability 이름으로 식별되는 컴포넌트
    Component(String),
    /// 아무 값이나 허용
    Any,
}

impl ValueType {
    pub fn component(type_name: impl Into<String>) -> Self {
        ValueType::Component(type_name.into())
    }

    pub fn optional(inner: ValueType) -> Self {
        ValueType::Optional(Box::new(inner))
    }

    /// `Optional` 을 벗겨낸 기저 타입
    pub fn base(&self) -> &ValueType {
        match self {
            ValueType::Optional(inner) => inner.base(),
            other => other,
        }
    }

    /// 문자열 리터럴에서 변환 가능한 스칼라 타입인지 여부
    pub fn is_scalar(&self) -> bool {
        matches!(
            self.base(),
            ValueType::Str | ValueType::Int | ValueType::Float | ValueType::Bool | ValueType::Char
        )
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Str => write!(f, "str"),
            ValueType::Int => write!(f, "int"),
            ValueType::Float => write!(f, "float"),
            ValueType::Bool => write!(f, "bool"),
            ValueType::Char => write!(f, "char"),
            ValueType::Optional(inner) => write!(f, "Option<{}>", inner),
            ValueType::Component(name) => write!(f, "{}", name),
            ValueType::Any => write!(f, "any"),
        }
    }
}

/// 리터럴 변환기
///
/// 변환 실패는 사람이 읽을 수 있는 메시지로 반환되며, 호출 측에서
/// `ConstructionFailure` 로 감쌉니다.
#[derive(Debug, Default, Clone, Copy)]
pub struct TypeConverter;

impl TypeConverter {
    pub fn new() -> Self {
        Self
    }

    /// 해석된 값을 선언 타입에 맞게 변환합니다.
    ///
    /// 문자열이 아닌 값은 이미 해석된 것으로 보고 그대로 통과시킵니다.
    pub fn convert_if_necessary(&self, value: Value, target: &ValueType) -> Result<Value, String> {
        match value {
            Value::Str(raw) => self.convert_literal(&raw, target),
            Value::Null if !matches!(target, ValueType::Optional(_) | ValueType::Any) => {
                Ok(Self::default_value(target))
            }
            other => Ok(other),
        }
    }

    /// 문자열 리터럴을 선언 타입으로 변환합니다.
    pub fn convert_literal(&self, raw: &str, target: &ValueType) -> Result<Value, String> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Ok(Self::default_value(target));
        }

        match target {
            ValueType::Str | ValueType::Any => Ok(Value::Str(trimmed.to_string())),
            ValueType::Int => trimmed
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|e| format!("Cannot convert '{}' to int: {}", trimmed, e)),
            ValueType::Float => trimmed
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|e| format!("Cannot convert '{}' to float: {}", trimmed, e)),
            ValueType::Bool => Self::parse_bool(trimmed).map(Value::Bool),
            ValueType::Char => {
                let mut chars = trimmed.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Value::Char(c)),
                    _ => Err(format!("char requires a single character, got '{}'", trimmed)),
                }
            }
            ValueType::Component(name) => Err(format!(
                "Cannot convert literal '{}' to component type {}",
                trimmed, name
            )),
            ValueType::Optional(inner) => self.convert_literal(trimmed, inner),
        }
    }

    /// 유연한 boolean 파싱: true/false, yes/no, on/off, 1/0
    pub fn parse_bool(raw: &str) -> Result<bool, String> {
        match raw.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            other => Err(format!(
                "Cannot convert '{}' to bool (expected true/false, yes/no, on/off, 1/0)",
                other
            )),
        }
    }

    fn default_value(target: &ValueType) -> Value {
        match target {
            ValueType::Str => Value::Str(String::new()),
            ValueType::Int => Value::Int(0),
            ValueType::Float => Value::Float(0.0),
            ValueType::Bool => Value::Bool(false),
            ValueType::Char => Value::Char('\0'),
            _ => Value::Null,
        }
    }
}
