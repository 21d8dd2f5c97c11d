//! Переменные и литеральные константы.
//!
//! String and class constants get a heap identity bound to the instruction
//! that introduces them. Null and numeric constants are encoded inline on the
//! instruction fact.

use super::representation;
use super::FactWriter;
use crate::core::{EncodeError, Result};
use crate::facts::{Database, PredicateFile};
use crate::generator::Session;
use crate::ir::{Instruction, Local, Method, TypeRef};

const METHOD_HANDLE_TEMP: &str = "$mhandleconstant";
const METHOD_HANDLE_TYPE: &str = "java.lang.invoke.MethodHandle";

/// Признаки синтаксиса class-литерала: `[...` или `L...;`
fn is_class_constant_syntax(literal: &str) -> bool {
    literal.starts_with('[') || (literal.starts_with('L') && literal.ends_with(';'))
}

impl<D: Database> FactWriter<D> {
    /// Id of `local` within `method`; see [`FactWriter::variable_id_in`].
    pub fn variable_id(&self, method: &Method, local: &Local) -> Result<String> {
        self.variable_id_in(&self.method_id(method), local)
    }

    /// Registers a local of an already encoded method.
    ///
    /// The first type seen for the variable is kept; later calls with a
    /// different type get `VAR_TYPE` for the recorded one.
    pub fn variable_id_in(&self, method_id: &str, local: &Local) -> Result<String> {
        let var = representation::local_var_id(method_id, &local.name);
        self.register_var(var, &local.var_type, method_id)
    }

    pub(crate) fn register_var(
        &self,
        var: String,
        var_type: &TypeRef,
        method_id: &str,
    ) -> Result<String> {
        let recorded = self.var_types.get_or_insert(&var, var_type);
        let type_id = self.type_id(&recorded)?;
        self.add(PredicateFile::VarType, &[&var, &type_id]);
        self.add(PredicateFile::VarDeclaringMethod, &[&var, method_id]);
        Ok(var)
    }

    fn assign_heap_alloc(
        &self,
        insn: &str,
        instr: &Instruction,
        heap: &str,
        var: &str,
        method_id: &str,
    ) {
        self.add(
            PredicateFile::AssignHeapAlloc,
            &[
                insn,
                &instr.index.to_string(),
                heap,
                var,
                method_id,
                &instr.line_number().to_string(),
            ],
        );
    }

    /// Returns the heap id of the string constant.
    pub fn materialize_string_constant(
        &self,
        method: &Method,
        instr: &Instruction,
        dest: &Local,
        value: &str,
    ) -> Result<String> {
        let method_id = self.method_id(method);
        let var = self.variable_id_in(&method_id, dest)?;
        let heap = self.encode_string_constant(value);
        let insn = representation::instruction_id(&method_id, instr);
        self.assign_heap_alloc(&insn, instr, &heap, &var, &method_id);
        Ok(heap)
    }

    pub fn materialize_null_constant(
        &self,
        method: &Method,
        instr: &Instruction,
        dest: &Local,
    ) -> Result<()> {
        let method_id = self.method_id(method);
        let var = self.variable_id_in(&method_id, dest)?;
        let insn = representation::instruction_id(&method_id, instr);
        self.add(
            PredicateFile::AssignNull,
            &[&insn, &instr.index.to_string(), &var, &method_id],
        );
        Ok(())
    }

    pub fn materialize_numeric_constant(
        &self,
        method: &Method,
        instr: &Instruction,
        dest: &Local,
        value: &str,
    ) -> Result<()> {
        let method_id = self.method_id(method);
        let var = self.variable_id_in(&method_id, dest)?;
        let insn = representation::instruction_id(&method_id, instr);
        self.add(
            PredicateFile::AssignNumConst,
            &[&insn, &instr.index.to_string(), value, &var, &method_id],
        );
        Ok(())
    }

    /// `Foo.class` literal in descriptor form (`[C`, `Lfoo/Bar;`).
    ///
    /// Any other form is fatal and nothing is written for the instruction.
    pub fn materialize_class_constant(
        &self,
        method: &Method,
        instr: &Instruction,
        dest: &Local,
        literal: &str,
    ) -> Result<String> {
        let method_id = self.method_id(method);
        let insn = representation::instruction_id(&method_id, instr);

        let class_type = is_class_constant_syntax(literal)
            .then(|| TypeRef::from_descriptor(literal))
            .flatten()
            .ok_or_else(|| EncodeError::UnsupportedClassConstantSyntax {
                literal: literal.to_string(),
                instruction: insn.clone(),
            })?;

        let type_id = self.type_id(&class_type)?;
        let var = self.variable_id_in(&method_id, dest)?;
        let heap = representation::class_constant_id(&type_id);
        self.add(PredicateFile::ClassHeap, &[&heap, &type_id]);
        self.assign_heap_alloc(&insn, instr, &heap, &var, &method_id);
        Ok(heap)
    }

    /// Method handle literal: the handle object is allocated into a fresh
    /// `$mhandleconstant<n>` local, then copied into `dest`.
    pub fn materialize_method_handle_constant(
        &self,
        method: &Method,
        instr: &Instruction,
        dest: &Local,
        handle: &str,
        session: &mut Session,
    ) -> Result<String> {
        let method_id = self.method_id(method);
        let insn = representation::instruction_id(&method_id, instr);
        let var = self.variable_id_in(&method_id, dest)?;

        let temp_name = format!(
            "{}{}",
            METHOD_HANDLE_TEMP,
            session.next_number(METHOD_HANDLE_TEMP)
        );
        let temp = self.register_var(
            representation::local_var_id(&method_id, &temp_name),
            &TypeRef::class(METHOD_HANDLE_TYPE),
            &method_id,
        )?;

        let heap = representation::method_handle_id(handle);
        self.add(PredicateFile::MethodHandleConstant, &[&heap, handle]);
        self.assign_heap_alloc(&insn, instr, &heap, &temp, &method_id);
        self.add(
            PredicateFile::AssignLocal,
            &[&insn, &instr.index.to_string(), &temp, &var, &method_id],
        );
        Ok(heap)
    }
}
