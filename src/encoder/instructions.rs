//! Факты инструкций и неявных переменных метода.

use super::representation;
use super::FactWriter;
use crate::core::{EncodeError, Result};
use crate::facts::{Database, PredicateFile};
use crate::generator::Session;
use crate::ir::{BinaryOperator, ConstantValue, Instruction, InstructionKind, Local, Method, TypeRef};

/// Итог обработки одной инструкции
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionOutcome {
    Encoded,
    /// Записан только маркер `UNSUPPORTED_INSTRUCTION`
    Unsupported,
}

impl<D: Database> FactWriter<D> {
    /// `ASSIGN_BINOP`, `ASSIGN_OPER_TYPE`, then `ASSIGN_OPER_FROM` for `lhs` and `rhs` in that order.
    pub fn emit_binary_op(
        &self,
        method: &Method,
        instr: &Instruction,
        dest: &Local,
        operator: BinaryOperator,
        lhs: &Local,
        rhs: &Local,
    ) -> Result<()> {
        let method_id = self.method_id(method);
        let insn = representation::instruction_id(&method_id, instr);
        let dest_var = self.variable_id_in(&method_id, dest)?;
        let lhs_var = self.variable_id_in(&method_id, lhs)?;
        let rhs_var = self.variable_id_in(&method_id, rhs)?;

        self.add(
            PredicateFile::AssignBinop,
            &[&insn, &instr.index.to_string(), &dest_var, &method_id],
        );
        self.add(PredicateFile::AssignOperType, &[&insn, &operator.to_string()]);
        self.add(PredicateFile::AssignOperFrom, &[&insn, &lhs_var]);
        self.add(PredicateFile::AssignOperFrom, &[&insn, &rhs_var]);
        Ok(())
    }

    pub fn emit_return(&self, method: &Method, instr: &Instruction, value: &Local) -> Result<()> {
        let method_id = self.method_id(method);
        let insn = representation::instruction_id(&method_id, instr);
        let var = self.variable_id_in(&method_id, value)?;
        self.add(
            PredicateFile::Return,
            &[&insn, &instr.index.to_string(), &var, &method_id],
        );
        Ok(())
    }

    pub fn emit_return_void(&self, method: &Method, instr: &Instruction) {
        let method_id = self.method_id(method);
        let insn = representation::instruction_id(&method_id, instr);
        self.add(
            PredicateFile::ReturnVoid,
            &[&insn, &instr.index.to_string(), &method_id],
        );
    }

    /// Representative return variable of a native method, typed by its return type.
    pub fn emit_native_return_var(&self, method: &Method) -> Result<String> {
        let method_id = self.method_id(method);
        let var = self.register_var(
            representation::native_return_var_id(&method_id),
            &method.return_type,
            &method_id,
        )?;
        self.add(PredicateFile::NativeReturnVar, &[&var, &method_id]);
        Ok(var)
    }

    /// Receiver variable typed by the declaring class.
    pub fn emit_this_var(&self, method: &Method) -> Result<String> {
        let method_id = self.method_id(method);
        let var = self.register_var(
            representation::this_var_id(&method_id),
            &method.declaring_type(),
            &method_id,
        )?;
        self.add(PredicateFile::ThisVar, &[&method_id, &var]);
        Ok(var)
    }

    pub fn emit_formal_param(&self, method: &Method, index: usize) -> Result<String> {
        let method_id = self.method_id(method);
        let param_type = method
            .params
            .get(index)
            .ok_or_else(|| EncodeError::ParameterOutOfRange {
                method: method_id.clone(),
                index,
                arity: method.params.len(),
            })?;

        let var = self.register_var(
            representation::param_var_id(&method_id, index),
            param_type,
            &method_id,
        )?;
        self.add(
            PredicateFile::FormalParam,
            &[&index.to_string(), &method_id, &var],
        );
        Ok(var)
    }

    /// `METHOD_DECL_EXCEPTION(exceptionType, method)`
    pub fn emit_declared_exception(&self, method: &Method, exception: &TypeRef) -> Result<()> {
        let method_id = self.method_id(method);
        let type_id = self.type_id(exception)?;
        self.add(PredicateFile::MethodDeclException, &[&type_id, &method_id]);
        Ok(())
    }

    /// Marker for an instruction without a dedicated handler. Never fails.
    pub fn emit_unsupported(&self, method: &Method, instr: &Instruction) -> String {
        let method_id = self.method_id(method);
        let insn = representation::instruction_id(&method_id, instr);
        tracing::debug!("Unsupported instruction {}", insn);
        self.add(
            PredicateFile::UnsupportedInstruction,
            &[&insn, &instr.index.to_string(), &method_id],
        );
        insn
    }

    /// Dispatches one instruction to its emitter or materializer.
    pub fn emit_instruction(
        &self,
        method: &Method,
        instr: &Instruction,
        session: &mut Session,
    ) -> Result<InstructionOutcome> {
        match &instr.kind {
            InstructionKind::Constant { dest, value } => match value {
                ConstantValue::String(s) => {
                    self.materialize_string_constant(method, instr, dest, s)?;
                }
                ConstantValue::Null => self.materialize_null_constant(method, instr, dest)?,
                ConstantValue::Numeric(text) => {
                    self.materialize_numeric_constant(method, instr, dest, text)?
                }
                ConstantValue::Class(literal) => {
                    self.materialize_class_constant(method, instr, dest, literal)?;
                }
                ConstantValue::MethodHandle(handle) => {
                    self.materialize_method_handle_constant(method, instr, dest, handle, session)?;
                }
            },
            InstructionKind::BinaryOp {
                dest,
                operator,
                lhs,
                rhs,
            } => self.emit_binary_op(method, instr, dest, *operator, lhs, rhs)?,
            InstructionKind::Return { value } => self.emit_return(method, instr, value)?,
            InstructionKind::ReturnVoid => self.emit_return_void(method, instr),
            InstructionKind::Unsupported { .. } => {
                self.emit_unsupported(method, instr);
                return Ok(InstructionOutcome::Unsupported);
            }
        }
        Ok(InstructionOutcome::Encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::MemoryDatabase;
    use crate::ir::{Modifier, PrimitiveType};
    use pretty_assertions::assert_eq;

    const M: &str = "<demo.Calc: int add(int,int)>";

    fn method() -> Method {
        Method::new(
            "demo.Calc",
            "add",
            vec![PrimitiveType::Int.into(), PrimitiveType::Int.into()],
            PrimitiveType::Int.into(),
        )
    }

    fn int_local(name: &str) -> Local {
        Local::new(name, PrimitiveType::Int.into())
    }

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_binary_op_operand_order() {
        let w = FactWriter::new(MemoryDatabase::with_journal());
        let (r, a, b) = (int_local("r"), int_local("a"), int_local("b"));
        let instr = Instruction::new(
            3,
            InstructionKind::BinaryOp {
                dest: r.clone(),
                operator: BinaryOperator::Add,
                lhs: a.clone(),
                rhs: b.clone(),
            },
        );
        w.emit_binary_op(&method(), &instr, &r, BinaryOperator::Add, &a, &b)
            .unwrap();

        let insn = format!("{M}/binop/instruction3");
        let emitted: Vec<_> = w
            .database()
            .journal()
            .into_iter()
            .filter(|(p, _)| {
                matches!(
                    p,
                    PredicateFile::AssignBinop
                        | PredicateFile::AssignOperType
                        | PredicateFile::AssignOperFrom
                )
            })
            .collect();
        assert_eq!(
            emitted,
            vec![
                (PredicateFile::AssignBinop, row(&[&insn, "3", &format!("{M}/r"), M])),
                (PredicateFile::AssignOperType, row(&[&insn, "add"])),
                (PredicateFile::AssignOperFrom, row(&[&insn, &format!("{M}/a")])),
                (PredicateFile::AssignOperFrom, row(&[&insn, &format!("{M}/b")])),
            ]
        );
    }

    #[test]
    fn test_return_and_return_void() {
        let w = FactWriter::new(MemoryDatabase::new());
        let r = int_local("r");
        w.emit_return(&method(), &Instruction::new(4, InstructionKind::Return { value: r.clone() }), &r)
            .unwrap();

        let void = Method::new("demo.Calc", "reset", vec![], PrimitiveType::Void.into());
        w.emit_return_void(&void, &Instruction::new(0, InstructionKind::ReturnVoid));

        let db = w.database();
        assert_eq!(
            db.facts(PredicateFile::Return),
            vec![row(&[&format!("{M}/return/instruction4"), "4", &format!("{M}/r"), M])]
        );
        assert!(db.contains(
            PredicateFile::ReturnVoid,
            &[
                "<demo.Calc: void reset()>/return-void/instruction0",
                "0",
                "<demo.Calc: void reset()>",
            ]
        ));
    }

    #[test]
    fn test_implicit_variables() {
        let w = FactWriter::new(MemoryDatabase::new());
        let native = method().with_modifiers([Modifier::Native]);

        let this = w.emit_this_var(&native).unwrap();
        let ret = w.emit_native_return_var(&native).unwrap();
        let p1 = w.emit_formal_param(&native, 1).unwrap();

        let db = w.database();
        assert_eq!(this, format!("{M}/@this"));
        assert!(db.contains(PredicateFile::ThisVar, &[M, &this]));
        assert!(db.contains(PredicateFile::VarType, &[&this, "demo.Calc"]));

        assert_eq!(ret, format!("{M}/@native-return"));
        assert!(db.contains(PredicateFile::NativeReturnVar, &[&ret, M]));
        assert!(db.contains(PredicateFile::VarType, &[&ret, "int"]));

        assert!(db.contains(PredicateFile::FormalParam, &["1", M, &p1]));
        assert!(db.contains(PredicateFile::VarDeclaringMethod, &[&p1, M]));
    }

    #[test]
    fn test_formal_param_out_of_range() {
        let w = FactWriter::new(MemoryDatabase::new());
        let err = w.emit_formal_param(&method(), 2).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::ParameterOutOfRange { index: 2, arity: 2, .. }
        ));
    }

    #[test]
    fn test_declared_exception() {
        let w = FactWriter::new(MemoryDatabase::new());
        w.emit_declared_exception(&method(), &TypeRef::class("java.io.IOException"))
            .unwrap();
        assert!(w
            .database()
            .contains(PredicateFile::MethodDeclException, &["java.io.IOException", M]));
    }

    #[test]
    fn test_unsupported_is_one_marker() {
        let w = FactWriter::new(MemoryDatabase::new());
        let mut session = Session::new();
        let instr = Instruction::new(
            9,
            InstructionKind::Unsupported {
                opcode: "monitorexit".into(),
            },
        );

        let outcome = w.emit_instruction(&method(), &instr, &mut session).unwrap();
        assert_eq!(outcome, InstructionOutcome::Unsupported);
        assert_eq!(w.database().len(), 1);
        assert_eq!(
            w.database().facts(PredicateFile::UnsupportedInstruction),
            vec![row(&[&format!("{M}/unsupported monitorexit/instruction9"), "9", M])]
        );
    }

    #[test]
    fn test_dispatch_propagates_fatal_errors() {
        let w = FactWriter::new(MemoryDatabase::new());
        let mut session = Session::new();
        let dest = Local::new("c", TypeRef::class("java.lang.Class"));
        let instr = Instruction::new(
            1,
            InstructionKind::Constant {
                dest,
                value: ConstantValue::Class("java.lang.String".into()),
            },
        );

        let err = w.emit_instruction(&method(), &instr, &mut session).unwrap_err();
        assert!(matches!(err, EncodeError::UnsupportedClassConstantSyntax { .. }));
    }
}
