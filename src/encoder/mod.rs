/*!
# Fact Encoder

Maps program entities to stable identifiers and writes their facts to a
[`Database`](crate::facts::Database).

One `FactWriter` serves a whole run and is shared by reference across worker
threads. Its only mutable state is the variable type cache; everything else
is a pure function of the IR node being encoded.

## Компоненты

- `identifiers` - строковые константы и сигнатуры, хэш-теги для длинных значений
- `types` - нормализация типов, рекурсивная регистрация массивов
- `entities` - классы, интерфейсы, методы, поля, модификаторы
- `variables` - переменные и литеральные константы
- `instructions` - факты инструкций и неявных переменных метода
- `representation` - схемы идентификаторов
*/

pub mod entities;
pub mod identifiers;
pub mod instructions;
pub mod representation;
pub mod types;
pub mod variables;

pub use identifiers::java_string_hash;
pub use instructions::InstructionOutcome;

use crate::cache::VarTypeCache;
use crate::configuration::EncoderConfig;
use crate::facts::{Database, PredicateFile};

/// Кодировщик фактов
pub struct FactWriter<D: Database> {
    db: D,
    config: EncoderConfig,
    var_types: VarTypeCache,
}

impl<D: Database> FactWriter<D> {
    pub fn new(db: D) -> Self {
        Self::with_config(db, EncoderConfig::default())
    }

    pub fn with_config(db: D, config: EncoderConfig) -> Self {
        Self {
            db,
            config,
            var_types: VarTypeCache::new(),
        }
    }

    pub fn database(&self) -> &D {
        &self.db
    }

    pub fn into_database(self) -> D {
        self.db
    }

    pub fn var_types(&self) -> &VarTypeCache {
        &self.var_types
    }

    #[inline]
    fn add(&self, predicate: PredicateFile, args: &[&str]) {
        self.db.add(predicate, args);
    }
}
