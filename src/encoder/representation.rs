//! Текстовые схемы идентификаторов.
//!
//! Pure functions only: nothing here writes facts. Variable and instruction
//! ids are scoped by the encoded method id, so two methods never share one.

use crate::ir::{Field, Instruction, InstructionKind, Method, TypeRef};

fn joined_params(params: &[TypeRef]) -> String {
    params.iter().map(TypeRef::name).collect::<Vec<_>>().join(",")
}

/// `<C: R name(P1,P2)>`
pub fn method_signature(method: &Method) -> String {
    format!(
        "<{}: {} {}({})>",
        method.declaring_class,
        method.return_type.name(),
        method.name,
        joined_params(&method.params)
    )
}

/// `R(P1,P2)`
pub fn method_descriptor(method: &Method) -> String {
    format!("{}({})", method.return_type.name(), joined_params(&method.params))
}

/// JVM-дескриптор `(P1P2)R`
pub fn raw_descriptor(method: &Method) -> String {
    let params: String = method.params.iter().map(TypeRef::jvm_descriptor).collect();
    format!("({}){}", params, method.return_type.jvm_descriptor())
}

/// `<C: T name>`
pub fn field_signature(field: &Field) -> String {
    format!(
        "<{}: {} {}>",
        field.declaring_class,
        field.field_type.name(),
        field.name
    )
}

pub fn local_var_id(method_id: &str, name: &str) -> String {
    format!("{method_id}/{name}")
}

pub fn this_var_id(method_id: &str) -> String {
    format!("{method_id}/@this")
}

pub fn param_var_id(method_id: &str, index: usize) -> String {
    format!("{method_id}/@parameter{index}")
}

pub fn native_return_var_id(method_id: &str) -> String {
    format!("{method_id}/@native-return")
}

/// `M/<label>/instruction<index>`; для неподдержанных инструкций метка включает опкод
pub fn instruction_id(method_id: &str, instr: &Instruction) -> String {
    match &instr.kind {
        InstructionKind::Unsupported { opcode } => {
            format!("{}/unsupported {}/instruction{}", method_id, opcode, instr.index)
        }
        kind => format!("{}/{}/instruction{}", method_id, kind.label(), instr.index),
    }
}

/// Heap-идентичность объекта класса (`Foo.class`)
pub fn class_constant_id(type_id: &str) -> String {
    format!("<class {type_id}>")
}

pub fn method_handle_id(handle: &str) -> String {
    format!("<handle {handle}>")
}
