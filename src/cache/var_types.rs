/*!
# Variable Type Cache

Мемоизация статических типов переменных, общая для всех рабочих потоков.

The first type recorded for a variable id wins. Later callers, including
threads that lost a race on a fresh key, get the recorded type back and
never overwrite it.
*/

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::ir::TypeRef;

/// Потокобезопасный кэш "идентификатор переменной -> тип"
#[derive(Debug, Default)]
pub struct VarTypeCache {
    types: RwLock<HashMap<String, TypeRef>>,
}

impl VarTypeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `candidate` if the key is absent, otherwise return the recorded type.
    pub fn get_or_insert(&self, var_id: &str, candidate: &TypeRef) -> TypeRef {
        // Быстрый путь: тип уже записан
        if let Some(recorded) = self
            .types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(var_id)
        {
            return recorded.clone();
        }

        let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
        match types.entry(var_id.to_string()) {
            Entry::Occupied(entry) => {
                if entry.get() != candidate {
                    tracing::debug!(
                        "Variable {} keeps first recorded type {} (ignoring {})",
                        var_id,
                        entry.get(),
                        candidate
                    );
                }
                entry.get().clone()
            }
            Entry::Vacant(entry) => entry.insert(candidate.clone()).clone(),
        }
    }

    pub fn get(&self, var_id: &str) -> Option<TypeRef> {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(var_id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.types.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
