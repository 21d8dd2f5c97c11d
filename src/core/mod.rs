/*!
# Core Module

Error handling shared by every encoding stage.
*/

pub mod errors;

pub use errors::{EncodeError, Result, UnitContext};
