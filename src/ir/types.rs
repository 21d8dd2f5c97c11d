//! Ссылки на типы в IR и их текстовые формы.
//!
//! Source form (`int`, `java.lang.String`, `char[][]`, `?T`) is what producers
//! write in JSON and what ends up as the canonical type id. Descriptor form
//! (`I`, `Ljava/lang/String;`, `[C`) is what class-constant literals use.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Примитивные типы JVM (включая void)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 9] = [
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::Char,
        PrimitiveType::Short,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
        PrimitiveType::Void,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Char => "char",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
            PrimitiveType::Void => "void",
        }
    }

    pub fn descriptor_char(self) -> char {
        match self {
            PrimitiveType::Boolean => 'Z',
            PrimitiveType::Byte => 'B',
            PrimitiveType::Char => 'C',
            PrimitiveType::Short => 'S',
            PrimitiveType::Int => 'I',
            PrimitiveType::Long => 'J',
            PrimitiveType::Float => 'F',
            PrimitiveType::Double => 'D',
            PrimitiveType::Void => 'V',
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    pub fn from_descriptor_char(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.descriptor_char() == c)
    }
}

/// Ссылка на тип
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeRef {
    Primitive(PrimitiveType),
    /// Полное имя класса или интерфейса через точку
    Class(String),
    Array(Box<TypeRef>),
    Unresolved(String),
}

impl TypeRef {
    pub fn class(name: impl Into<String>) -> Self {
        TypeRef::Class(name.into())
    }

    pub fn array_of(component: TypeRef) -> Self {
        TypeRef::Array(Box::new(component))
    }

    /// Каноническое имя типа в исходной форме
    pub fn name(&self) -> String {
        match self {
            TypeRef::Primitive(p) => p.name().to_string(),
            TypeRef::Class(name) => name.clone(),
            TypeRef::Array(component) => format!("{}[]", component.name()),
            TypeRef::Unresolved(name) => format!("?{name}"),
        }
    }

    /// JVM-дескриптор типа.
    ///
    /// Unresolved types have no descriptor; their `?name` form is kept so the
    /// method raw descriptor stays readable.
    pub fn jvm_descriptor(&self) -> String {
        match self {
            TypeRef::Primitive(p) => p.descriptor_char().to_string(),
            TypeRef::Class(name) => format!("L{};", name.replace('.', "/")),
            TypeRef::Array(component) => format!("[{}", component.jvm_descriptor()),
            TypeRef::Unresolved(name) => format!("?{name}"),
        }
    }

    /// Разбирает полный JVM-дескриптор поля (`[C`, `Lfoo/Bar;`, `I`)
    pub fn from_descriptor(descriptor: &str) -> Option<TypeRef> {
        let (parsed, rest) = parse_descriptor_prefix(descriptor)?;
        rest.is_empty().then_some(parsed)
    }
}

fn parse_descriptor_prefix(s: &str) -> Option<(TypeRef, &str)> {
    let first = s.chars().next()?;
    match first {
        '[' => {
            let (component, rest) = parse_descriptor_prefix(&s[1..])?;
            Some((TypeRef::array_of(component), rest))
        }
        'L' => {
            let end = s.find(';')?;
            let name = &s[1..end];
            if name.is_empty() {
                return None;
            }
            Some((TypeRef::Class(name.replace('/', ".")), &s[end + 1..]))
        }
        c => PrimitiveType::from_descriptor_char(c).map(|p| (TypeRef::Primitive(p), &s[1..])),
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Ошибка разбора текстовой формы типа
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeParseError {
    #[error("empty type name")]
    Empty,
    #[error("malformed type name `{0}`")]
    Malformed(String),
}

impl FromStr for TypeRef {
    type Err = TypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TypeParseError::Empty);
        }

        if let Some(component) = s.strip_suffix("[]") {
            return Ok(TypeRef::array_of(component.parse()?));
        }

        if let Some(name) = s.strip_prefix('?') {
            if name.is_empty() {
                return Err(TypeParseError::Malformed(s.to_string()));
            }
            return Ok(TypeRef::Unresolved(name.to_string()));
        }

        if let Some(p) = PrimitiveType::from_name(s) {
            return Ok(TypeRef::Primitive(p));
        }

        let valid = s
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '$' | '.' | '-'));
        if !valid || s.starts_with('.') || s.ends_with('.') {
            return Err(TypeParseError::Malformed(s.to_string()));
        }

        Ok(TypeRef::Class(s.to_string()))
    }
}

impl TryFrom<String> for TypeRef {
    type Error = TypeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.name()
    }
}

impl From<PrimitiveType> for TypeRef {
    fn from(value: PrimitiveType) -> Self {
        TypeRef::Primitive(value)
    }
}
