//! Output schema: every predicate the fact writer produces, with its file name and arity.
//!
//! Names and arities are the contract with the downstream Datalog program.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PredicateFile {
    StringRaw,
    StringConst,
    Method,
    FieldSignature,
    ClassType,
    InterfaceType,
    ClassHeap,
    DirectSuperClass,
    DirectSuperIface,
    ArrayType,
    ComponentType,
    VarType,
    VarDeclaringMethod,
    AssignHeapAlloc,
    AssignNull,
    AssignNumConst,
    AssignLocal,
    AssignBinop,
    AssignOperType,
    AssignOperFrom,
    Return,
    ReturnVoid,
    NativeReturnVar,
    UnsupportedInstruction,
    FormalParam,
    ThisVar,
    MethodDeclException,
    FieldModifier,
    ClassModifier,
    MethodModifier,
    MethodHandleConstant,
    AppClass,
    ClassArtifact,
    Properties,
}

impl PredicateFile {
    pub const ALL: [PredicateFile; 34] = [
        PredicateFile::StringRaw,
        PredicateFile::StringConst,
        PredicateFile::Method,
        PredicateFile::FieldSignature,
        PredicateFile::ClassType,
        PredicateFile::InterfaceType,
        PredicateFile::ClassHeap,
        PredicateFile::DirectSuperClass,
        PredicateFile::DirectSuperIface,
        PredicateFile::ArrayType,
        PredicateFile::ComponentType,
        PredicateFile::VarType,
        PredicateFile::VarDeclaringMethod,
        PredicateFile::AssignHeapAlloc,
        PredicateFile::AssignNull,
        PredicateFile::AssignNumConst,
        PredicateFile::AssignLocal,
        PredicateFile::AssignBinop,
        PredicateFile::AssignOperType,
        PredicateFile::AssignOperFrom,
        PredicateFile::Return,
        PredicateFile::ReturnVoid,
        PredicateFile::NativeReturnVar,
        PredicateFile::UnsupportedInstruction,
        PredicateFile::FormalParam,
        PredicateFile::ThisVar,
        PredicateFile::MethodDeclException,
        PredicateFile::FieldModifier,
        PredicateFile::ClassModifier,
        PredicateFile::MethodModifier,
        PredicateFile::MethodHandleConstant,
        PredicateFile::AppClass,
        PredicateFile::ClassArtifact,
        PredicateFile::Properties,
    ];

    /// Имя файла фактов (без расширения `.facts`)
    pub fn file_name(self) -> &'static str {
        match self {
            PredicateFile::StringRaw => "StringRaw",
            PredicateFile::StringConst => "StringConstant",
            PredicateFile::Method => "Method",
            PredicateFile::FieldSignature => "Field",
            PredicateFile::ClassType => "ClassType",
            PredicateFile::InterfaceType => "InterfaceType",
            PredicateFile::ClassHeap => "ClassHeap",
            PredicateFile::DirectSuperClass => "DirectSuperclass",
            PredicateFile::DirectSuperIface => "DirectSuperinterface",
            PredicateFile::ArrayType => "ArrayType",
            PredicateFile::ComponentType => "ComponentType",
            PredicateFile::VarType => "Var-Type",
            PredicateFile::VarDeclaringMethod => "Var-DeclaringMethod",
            PredicateFile::AssignHeapAlloc => "AssignHeapAllocation",
            PredicateFile::AssignNull => "AssignNull",
            PredicateFile::AssignNumConst => "AssignNumConstant",
            PredicateFile::AssignLocal => "AssignLocal",
            PredicateFile::AssignBinop => "AssignBinop",
            PredicateFile::AssignOperType => "AssignOperType",
            PredicateFile::AssignOperFrom => "AssignOperFrom",
            PredicateFile::Return => "Return",
            PredicateFile::ReturnVoid => "ReturnVoid",
            PredicateFile::NativeReturnVar => "NativeReturnVar",
            PredicateFile::UnsupportedInstruction => "UnsupportedInstruction",
            PredicateFile::FormalParam => "FormalParam",
            PredicateFile::ThisVar => "ThisVar",
            PredicateFile::MethodDeclException => "Method-DeclaresException",
            PredicateFile::FieldModifier => "Field-Modifier",
            PredicateFile::ClassModifier => "ClassModifier",
            PredicateFile::MethodModifier => "Method-Modifier",
            PredicateFile::MethodHandleConstant => "MethodHandleConstant",
            PredicateFile::AppClass => "ApplicationClass",
            PredicateFile::ClassArtifact => "Class-Artifact",
            PredicateFile::Properties => "Properties",
        }
    }

    /// Число столбцов
    pub fn arity(self) -> usize {
        match self {
            PredicateFile::StringConst
            | PredicateFile::ClassType
            | PredicateFile::InterfaceType
            | PredicateFile::ArrayType
            | PredicateFile::AppClass => 1,

            PredicateFile::StringRaw
            | PredicateFile::ClassHeap
            | PredicateFile::DirectSuperClass
            | PredicateFile::DirectSuperIface
            | PredicateFile::ComponentType
            | PredicateFile::VarType
            | PredicateFile::VarDeclaringMethod
            | PredicateFile::AssignOperType
            | PredicateFile::AssignOperFrom
            | PredicateFile::NativeReturnVar
            | PredicateFile::ThisVar
            | PredicateFile::MethodDeclException
            | PredicateFile::FieldModifier
            | PredicateFile::ClassModifier
            | PredicateFile::MethodModifier
            | PredicateFile::MethodHandleConstant
            | PredicateFile::ClassArtifact => 2,

            PredicateFile::ReturnVoid
            | PredicateFile::UnsupportedInstruction
            | PredicateFile::FormalParam
            | PredicateFile::Properties => 3,

            PredicateFile::FieldSignature
            | PredicateFile::AssignNull
            | PredicateFile::AssignBinop
            | PredicateFile::Return => 4,

            PredicateFile::AssignNumConst | PredicateFile::AssignLocal => 5,

            PredicateFile::Method | PredicateFile::AssignHeapAlloc => 6,
        }
    }

    /// Имя предиката в схеме (`VAR_TYPE`, `ASSIGN_HEAP_ALLOC`, ...)
    pub fn schema_name(self) -> &'static str {
        match self {
            PredicateFile::StringRaw => "STRING_RAW",
            PredicateFile::StringConst => "STRING_CONST",
            PredicateFile::Method => "METHOD",
            PredicateFile::FieldSignature => "FIELD_SIGNATURE",
            PredicateFile::ClassType => "CLASS_TYPE",
            PredicateFile::InterfaceType => "INTERFACE_TYPE",
            PredicateFile::ClassHeap => "CLASS_HEAP",
            PredicateFile::DirectSuperClass => "DIRECT_SUPER_CLASS",
            PredicateFile::DirectSuperIface => "DIRECT_SUPER_IFACE",
            PredicateFile::ArrayType => "ARRAY_TYPE",
            PredicateFile::ComponentType => "COMPONENT_TYPE",
            PredicateFile::VarType => "VAR_TYPE",
            PredicateFile::VarDeclaringMethod => "VAR_DECLARING_METHOD",
            PredicateFile::AssignHeapAlloc => "ASSIGN_HEAP_ALLOC",
            PredicateFile::AssignNull => "ASSIGN_NULL",
            PredicateFile::AssignNumConst => "ASSIGN_NUM_CONST",
            PredicateFile::AssignLocal => "ASSIGN_LOCAL",
            PredicateFile::AssignBinop => "ASSIGN_BINOP",
            PredicateFile::AssignOperType => "ASSIGN_OPER_TYPE",
            PredicateFile::AssignOperFrom => "ASSIGN_OPER_FROM",
            PredicateFile::Return => "RETURN",
            PredicateFile::ReturnVoid => "RETURN_VOID",
            PredicateFile::NativeReturnVar => "NATIVE_RETURN_VAR",
            PredicateFile::UnsupportedInstruction => "UNSUPPORTED_INSTRUCTION",
            PredicateFile::FormalParam => "FORMAL_PARAM",
            PredicateFile::ThisVar => "THIS_VAR",
            PredicateFile::MethodDeclException => "METHOD_DECL_EXCEPTION",
            PredicateFile::FieldModifier => "FIELD_MODIFIER",
            PredicateFile::ClassModifier => "CLASS_MODIFIER",
            PredicateFile::MethodModifier => "METHOD_MODIFIER",
            PredicateFile::MethodHandleConstant => "METHOD_HANDLE_CONSTANT",
            PredicateFile::AppClass => "APP_CLASS",
            PredicateFile::ClassArtifact => "CLASS_ARTIFACT",
            PredicateFile::Properties => "PROPERTIES",
        }
    }
}

impl fmt::Display for PredicateFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}
