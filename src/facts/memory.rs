//! In-memory concurrent fact store.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, PoisonError, RwLock};

use super::{Database, PredicateFile};

/// Одна запись журнала: предикат и аргументы в порядке вызова `add`
pub type JournalEntry = (PredicateFile, Vec<String>);

/// Потокобезопасное множество фактов в памяти
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    relations: RwLock<HashMap<PredicateFile, HashSet<Vec<String>>>>,
    /// Журнал всех вызовов `add` (включая повторы), если включён
    journal: Option<Mutex<Vec<JournalEntry>>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// База, запоминающая порядок всех вызовов `add`
    pub fn with_journal() -> Self {
        Self {
            relations: RwLock::default(),
            journal: Some(Mutex::new(Vec::new())),
        }
    }

    /// Отсортированные кортежи предиката
    pub fn facts(&self, predicate: PredicateFile) -> Vec<Vec<String>> {
        let relations = self.relations.read().unwrap_or_else(PoisonError::into_inner);
        let mut rows: Vec<Vec<String>> = relations
            .get(&predicate)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        rows.sort();
        rows
    }

    pub fn contains(&self, predicate: PredicateFile, args: &[&str]) -> bool {
        let row: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        self.relations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&predicate)
            .is_some_and(|set| set.contains(&row))
    }

    /// Кортежи предиката, у которых первый столбец равен `key`
    pub fn lookup(&self, predicate: PredicateFile, key: &str) -> Vec<Vec<String>> {
        self.facts(predicate)
            .into_iter()
            .filter(|row| row.first().is_some_and(|first| first == key))
            .collect()
    }

    pub fn count(&self, predicate: PredicateFile) -> usize {
        self.relations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&predicate)
            .map_or(0, HashSet::len)
    }

    /// Общее число различных кортежей
    pub fn len(&self) -> usize {
        self.relations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(HashSet::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Снимок всех предикатов в детерминированном порядке
    pub fn snapshot(&self) -> BTreeMap<PredicateFile, Vec<Vec<String>>> {
        let relations = self.relations.read().unwrap_or_else(PoisonError::into_inner);
        relations
            .iter()
            .map(|(predicate, set)| {
                let mut rows: Vec<Vec<String>> = set.iter().cloned().collect();
                rows.sort();
                (*predicate, rows)
            })
            .collect()
    }

    /// Копия журнала; пустой, если журнал не включён
    pub fn journal(&self) -> Vec<JournalEntry> {
        self.journal
            .as_ref()
            .map(|j| j.lock().unwrap_or_else(PoisonError::into_inner).clone())
            .unwrap_or_default()
    }
}

impl Database for MemoryDatabase {
    fn add(&self, predicate: PredicateFile, args: &[&str]) {
        debug_assert_eq!(
            args.len(),
            predicate.arity(),
            "{} expects {} columns",
            predicate,
            predicate.arity()
        );

        let row: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        if let Some(journal) = &self.journal {
            journal
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push((predicate, row.clone()));
        }

        self.relations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(predicate)
            .or_default()
            .insert(row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_deduplicates_tuples() {
        let db = MemoryDatabase::new();
        db.add(PredicateFile::ArrayType, &["int[]"]);
        db.add(PredicateFile::ArrayType, &["int[]"]);
        db.add(PredicateFile::ComponentType, &["int[]", "int"]);

        assert_eq!(db.count(PredicateFile::ArrayType), 1);
        assert_eq!(db.len(), 2);
        assert!(db.contains(PredicateFile::ComponentType, &["int[]", "int"]));
        assert!(!db.contains(PredicateFile::ComponentType, &["int", "int[]"]));
    }

    #[test]
    fn test_journal_keeps_order_and_duplicates() {
        let db = MemoryDatabase::with_journal();
        db.add(PredicateFile::ClassType, &["B"]);
        db.add(PredicateFile::ClassType, &["A"]);
        db.add(PredicateFile::ClassType, &["B"]);

        let journal: Vec<String> = db.journal().into_iter().map(|(_, row)| row[0].clone()).collect();
        assert_eq!(journal, vec!["B", "A", "B"]);
        assert_eq!(db.facts(PredicateFile::ClassType), vec![vec!["A"], vec!["B"]]);
    }

    #[test]
    fn test_journal_disabled_by_default() {
        let db = MemoryDatabase::new();
        db.add(PredicateFile::ClassType, &["A"]);
        assert!(db.journal().is_empty());
    }

    #[test]
    fn test_lookup_by_first_column() {
        let db = MemoryDatabase::new();
        db.add(PredicateFile::VarType, &["m/a", "int"]);
        db.add(PredicateFile::VarType, &["m/b", "long"]);
        assert_eq!(db.lookup(PredicateFile::VarType, "m/b"), vec![vec!["m/b", "long"]]);
    }

    #[test]
    fn test_concurrent_adds() {
        let db = Arc::new(MemoryDatabase::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let db = Arc::clone(&db);
                thread::spawn(move || {
                    for i in 0..100 {
                        let name = format!("C{}", i % 50);
                        db.add(PredicateFile::ClassType, &[&name]);
                        db.add(PredicateFile::AppClass, &[&format!("T{t}")]);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(db.count(PredicateFile::ClassType), 50);
        assert_eq!(db.count(PredicateFile::AppClass), 8);
    }
}
