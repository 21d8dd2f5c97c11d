//! Нормализация типов.

use super::FactWriter;
use crate::core::{EncodeError, Result};
use crate::facts::{Database, PredicateFile};
use crate::ir::TypeRef;

impl<D: Database> FactWriter<D> {
    /// Canonical id of a type.
    ///
    /// Arrays register `ARRAY_TYPE` and `COMPONENT_TYPE` for every level down
    /// to the element type. Class and interface declarations are left to the
    /// entity registrar; only the id is returned here. An unresolved element
    /// type fails before any fact is written.
    pub fn type_id(&self, t: &TypeRef) -> Result<String> {
        match t {
            TypeRef::Primitive(p) => Ok(p.name().to_string()),
            TypeRef::Class(name) => Ok(self.class_type_id(name)),
            TypeRef::Array(component) => {
                let component_id = self.type_id(component)?;
                let id = t.name();
                self.add(PredicateFile::ArrayType, &[&id]);
                self.add(PredicateFile::ComponentType, &[&id, &component_id]);
                Ok(id)
            }
            TypeRef::Unresolved(_) => Err(EncodeError::InvalidTypeKind {
                type_name: t.name(),
            }),
        }
    }

    pub fn class_type_id(&self, class_name: &str) -> String {
        class_name.to_string()
    }
}
