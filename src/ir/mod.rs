/*!
# Program IR

The resolved program representation consumed by the fact writer: classes,
members, method bodies, types and literal constants. The IR producer owns
loading and resolution; this module only fixes the shape it hands over
(JSON via serde).
*/

pub mod program;
pub mod types;

pub use program::{
    BinaryOperator, Class, ConstantValue, Field, Instruction, InstructionKind, Local, Method,
    Modifier, Program, PropertyEntry,
};
pub use types::{PrimitiveType, TypeParseError, TypeRef};
