//! Классы, поля, методы и инструкции, поставляемые производителем IR.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use super::types::TypeRef;

/// Модификаторы JVM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Public,
    Private,
    Protected,
    Static,
    Final,
    Synchronized,
    Volatile,
    Transient,
    Native,
    Abstract,
    #[serde(rename = "strictfp")]
    Strict,
    Synthetic,
    Bridge,
    Varargs,
    Enum,
    Annotation,
    Interface,
}

impl Modifier {
    pub fn as_str(self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Private => "private",
            Modifier::Protected => "protected",
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Synchronized => "synchronized",
            Modifier::Volatile => "volatile",
            Modifier::Transient => "transient",
            Modifier::Native => "native",
            Modifier::Abstract => "abstract",
            Modifier::Strict => "strictfp",
            Modifier::Synthetic => "synthetic",
            Modifier::Bridge => "bridge",
            Modifier::Varargs => "varargs",
            Modifier::Enum => "enum",
            Modifier::Annotation => "annotation",
            Modifier::Interface => "interface",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Класс или интерфейс
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    /// Полное имя через точку
    pub name: String,
    #[serde(default)]
    pub is_interface: bool,
    #[serde(default)]
    pub superclass: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub methods: Vec<Method>,
    /// Класс приложения (а не библиотеки)
    #[serde(default)]
    pub application: bool,
    /// Артефакт (jar, apk), из которого загружен класс
    #[serde(default)]
    pub artifact: Option<String>,
}

impl Class {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_interface: false,
            superclass: None,
            interfaces: Vec::new(),
            modifiers: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            application: false,
            artifact: None,
        }
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            is_interface: true,
            ..Self::new(name)
        }
    }

    /// Проставляет объявляющий класс членам, у которых он не указан
    pub fn adopt_members(&mut self) {
        for field in &mut self.fields {
            if field.declaring_class.is_empty() {
                field.declaring_class = self.name.clone();
            }
        }
        for method in &mut self.methods {
            if method.declaring_class.is_empty() {
                method.declaring_class = self.name.clone();
            }
        }
    }
}

/// Поле класса
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    #[serde(default)]
    pub declaring_class: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: TypeRef,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
}

impl Field {
    pub fn new(declaring_class: impl Into<String>, name: impl Into<String>, field_type: TypeRef) -> Self {
        Self {
            declaring_class: declaring_class.into(),
            name: name.into(),
            field_type,
            modifiers: Vec::new(),
        }
    }
}

/// Метод с телом из инструкций
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Method {
    #[serde(default)]
    pub declaring_class: String,
    pub name: String,
    #[serde(default)]
    pub params: Vec<TypeRef>,
    pub return_type: TypeRef,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default)]
    pub declared_exceptions: Vec<TypeRef>,
    #[serde(default)]
    pub body: Vec<Instruction>,
}

impl Method {
    pub fn new(
        declaring_class: impl Into<String>,
        name: impl Into<String>,
        params: Vec<TypeRef>,
        return_type: TypeRef,
    ) -> Self {
        Self {
            declaring_class: declaring_class.into(),
            name: name.into(),
            params,
            return_type,
            modifiers: Vec::new(),
            declared_exceptions: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: impl IntoIterator<Item = Modifier>) -> Self {
        self.modifiers.extend(modifiers);
        self
    }

    pub fn with_body(mut self, body: Vec<Instruction>) -> Self {
        self.body = body;
        self
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    pub fn is_static(&self) -> bool {
        self.has_modifier(Modifier::Static)
    }

    pub fn is_native(&self) -> bool {
        self.has_modifier(Modifier::Native)
    }

    pub fn declaring_type(&self) -> TypeRef {
        TypeRef::Class(self.declaring_class.clone())
    }
}

/// Локальная переменная метода в точке использования
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Local {
    pub name: String,
    #[serde(rename = "type")]
    pub var_type: TypeRef,
}

impl Local {
    pub fn new(name: impl Into<String>, var_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            var_type,
        }
    }
}

/// Бинарные операторы
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    Ushr,
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOperator::Add => "add",
            BinaryOperator::Sub => "sub",
            BinaryOperator::Mul => "mul",
            BinaryOperator::Div => "div",
            BinaryOperator::Rem => "rem",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
            BinaryOperator::Xor => "xor",
            BinaryOperator::Shl => "shl",
            BinaryOperator::Shr => "shr",
            BinaryOperator::Ushr => "ushr",
        };
        f.write_str(s)
    }
}

/// Литеральные константы
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ConstantValue {
    String(String),
    Null,
    /// Текстовая форма числового литерала
    Numeric(String),
    /// Литерал class-константы: `[C` или `Lfoo/Bar;`
    Class(String),
    /// Ссылка на метод для MethodHandle
    MethodHandle(String),
}

impl ConstantValue {
    pub fn label(&self) -> &'static str {
        match self {
            ConstantValue::String(_) => "assign-string",
            ConstantValue::Null => "assign-null",
            ConstantValue::Numeric(_) => "assign-num",
            ConstantValue::Class(_) => "assign-class",
            ConstantValue::MethodHandle(_) => "assign-handle",
        }
    }
}

/// Виды инструкций
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum InstructionKind {
    Constant {
        dest: Local,
        value: ConstantValue,
    },
    BinaryOp {
        dest: Local,
        operator: BinaryOperator,
        lhs: Local,
        rhs: Local,
    },
    Return {
        value: Local,
    },
    ReturnVoid,
    /// Инструкция без собственного обработчика
    Unsupported {
        opcode: String,
    },
}

impl InstructionKind {
    pub fn label(&self) -> &'static str {
        match self {
            InstructionKind::Constant { value, .. } => value.label(),
            InstructionKind::BinaryOp { .. } => "binop",
            InstructionKind::Return { .. } => "return",
            InstructionKind::ReturnVoid => "return-void",
            InstructionKind::Unsupported { .. } => "unsupported",
        }
    }
}

/// Инструкция с индексом внутри метода
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub index: u32,
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(flatten)]
    pub kind: InstructionKind,
}

impl Instruction {
    pub fn new(index: u32, kind: InstructionKind) -> Self {
        Self {
            index,
            line: None,
            kind,
        }
    }

    pub fn at_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn line_number(&self) -> u32 {
        self.line.unwrap_or(0)
    }
}

/// Запись файла свойств из ресурсов программы
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyEntry {
    pub path: String,
    pub key: String,
    pub value: String,
}

/// Программа целиком
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub classes: Vec<Class>,
    #[serde(default)]
    pub properties: Vec<PropertyEntry>,
}

impl Program {
    pub fn new(classes: Vec<Class>) -> Self {
        let mut program = Self {
            classes,
            properties: Vec::new(),
        };
        program.link();
        program
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut program: Program =
            serde_json::from_str(json).context("Failed to parse program JSON")?;
        program.link();
        Ok(program)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read program from {}", path.as_ref().display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Invalid program file {}", path.as_ref().display()))
    }

    /// Связывает члены классов с объявляющими классами
    pub fn link(&mut self) {
        for class in &mut self.classes {
            class.adopt_members();
        }
    }

    pub fn merge(&mut self, other: Program) {
        self.classes.extend(other.classes);
        self.properties.extend(other.properties);
    }

    pub fn method_count(&self) -> usize {
        self.classes.iter().map(|c| c.methods.len()).sum()
    }

    pub fn instruction_count(&self) -> usize {
        self.classes
            .iter()
            .flat_map(|c| &c.methods)
            .map(|m| m.body.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::PrimitiveType;

    const SAMPLE: &str = r#"{
        "classes": [{
            "name": "demo.Main",
            "superclass": "java.lang.Object",
            "modifiers": ["public"],
            "application": true,
            "fields": [{ "name": "count", "type": "int", "modifiers": ["private", "static"] }],
            "methods": [{
                "name": "run",
                "params": ["java.lang.String[]"],
                "return_type": "void",
                "modifiers": ["public", "static"],
                "body": [
                    { "index": 0, "line": 4, "op": "constant",
                      "dest": { "name": "s", "type": "java.lang.String" },
                      "value": { "kind": "string", "value": "hi" } },
                    { "index": 1, "op": "constant",
                      "dest": { "name": "n", "type": "java.lang.Object" },
                      "value": { "kind": "null" } },
                    { "index": 2, "op": "unsupported", "opcode": "monitorenter" },
                    { "index": 3, "op": "return_void" }
                ]
            }]
        }],
        "properties": [{ "path": "app.properties", "key": "k", "value": "v" }]
    }"#;

    #[test]
    fn test_program_from_json() {
        let program = Program::from_json_str(SAMPLE).unwrap();
        assert_eq!(program.classes.len(), 1);
        assert_eq!(program.method_count(), 1);
        assert_eq!(program.instruction_count(), 4);

        let class = &program.classes[0];
        assert!(class.application);
        assert_eq!(class.fields[0].declaring_class, "demo.Main");
        assert_eq!(class.fields[0].field_type, PrimitiveType::Int.into());

        let method = &class.methods[0];
        assert_eq!(method.declaring_class, "demo.Main");
        assert!(method.is_static());
        assert!(!method.is_native());
        assert_eq!(method.body[0].line_number(), 4);
        assert_eq!(method.body[1].line_number(), 0);
        assert_eq!(
            method.body[1].kind,
            InstructionKind::Constant {
                dest: Local::new("n", TypeRef::class("java.lang.Object")),
                value: ConstantValue::Null,
            }
        );
        assert_eq!(method.body[2].kind.label(), "unsupported");
        assert_eq!(method.body[3].kind, InstructionKind::ReturnVoid);
    }

    #[test]
    fn test_program_rejects_bad_type() {
        let json = r#"{ "classes": [{ "name": "A",
            "fields": [{ "name": "f", "type": "not a type" }] }] }"#;
        assert!(Program::from_json_str(json).is_err());
    }

    #[test]
    fn test_merge_programs() {
        let mut a = Program::new(vec![Class::new("A")]);
        let b = Program::new(vec![Class::new("B"), Class::interface("I")]);
        a.merge(b);
        assert_eq!(a.classes.len(), 3);
        assert!(a.classes[2].is_interface);
    }

    #[test]
    fn test_modifier_display_matches_serde() {
        assert_eq!(Modifier::Strict.to_string(), "strictfp");
        assert_eq!(
            serde_json::to_string(&Modifier::Strict).unwrap(),
            "\"strictfp\""
        );
        assert_eq!(BinaryOperator::Ushr.to_string(), "ushr");
    }
}
