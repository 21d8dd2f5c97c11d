/*!
# Cache System

Shared, process-lifetime caches owned by one encoding run.
*/

pub mod var_types;

pub use var_types::VarTypeCache;
