/*!
# Fact Sinks

Append-only, deduplicating stores for encoded tuples.

Sinks accept concurrent `add` calls and treat facts as a set: emitting the
same tuple twice is harmless. The encoder performs no locking of its own
around sink writes.

## Использование

```rust,ignore
use ir_facts::facts::{Database, MemoryDatabase, PredicateFile};

let db = MemoryDatabase::new();
db.add(PredicateFile::ArrayType, &["int[]"]);
assert!(db.contains(PredicateFile::ArrayType, &["int[]"]));
```
*/

pub mod csv;
pub mod memory;
pub mod predicate;

pub use csv::{CsvDatabase, FlushSummary};
pub use memory::MemoryDatabase;
pub use predicate::PredicateFile;

use std::sync::Arc;

/// Приёмник фактов
pub trait Database: Send + Sync {
    /// Добавляет кортеж в предикат. Число аргументов должно совпадать с арностью.
    fn add(&self, predicate: PredicateFile, args: &[&str]);
}

impl<D: Database + ?Sized> Database for Arc<D> {
    fn add(&self, predicate: PredicateFile, args: &[&str]) {
        (**self).add(predicate, args)
    }
}

impl<D: Database + ?Sized> Database for &D {
    fn add(&self, predicate: PredicateFile, args: &[&str]) {
        (**self).add(predicate, args)
    }
}
