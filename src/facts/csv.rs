//! Fact files on disk: one delimited `<Predicate>.facts` file per predicate.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::{Database, MemoryDatabase, PredicateFile};
use crate::core::{EncodeError, Result};

/// Итоги записи каталога фактов
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushSummary {
    pub files: usize,
    pub rows: usize,
}

/// База фактов, записываемая в каталог при `flush`
///
/// Tuples are collected in memory (deduplicated) and written sorted, so two
/// runs over the same program produce byte-identical files.
#[derive(Debug)]
pub struct CsvDatabase {
    out_dir: PathBuf,
    separator: char,
    memory: MemoryDatabase,
}

impl CsvDatabase {
    /// Создаёт каталог вывода (если его нет)
    pub fn create<P: AsRef<Path>>(out_dir: P) -> Result<Self> {
        let out_dir = out_dir.as_ref().to_path_buf();
        fs::create_dir_all(&out_dir).map_err(|e| EncodeError::io(&out_dir, e))?;
        Ok(Self {
            out_dir,
            separator: '\t',
            memory: MemoryDatabase::new(),
        })
    }

    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Накопленные факты (до записи на диск)
    pub fn memory(&self) -> &MemoryDatabase {
        &self.memory
    }

    pub fn file_path(&self, predicate: PredicateFile) -> PathBuf {
        self.out_dir.join(format!("{}.facts", predicate.file_name()))
    }

    /// Записывает файл для каждого предиката схемы, включая пустые
    pub fn flush(&self) -> Result<FlushSummary> {
        let snapshot = self.memory.snapshot();
        let mut summary = FlushSummary::default();

        for predicate in PredicateFile::ALL {
            let path = self.file_path(predicate);
            let file = File::create(&path).map_err(|e| EncodeError::io(&path, e))?;
            let mut writer = BufWriter::new(file);

            if let Some(rows) = snapshot.get(&predicate) {
                for row in rows {
                    let line = row
                        .iter()
                        .map(|value| escape_value(value, self.separator))
                        .collect::<Vec<_>>()
                        .join(&self.separator.to_string());
                    writeln!(writer, "{line}").map_err(|e| EncodeError::io(&path, e))?;
                }
                summary.rows += rows.len();
            }

            writer.flush().map_err(|e| EncodeError::io(&path, e))?;
            summary.files += 1;
        }

        tracing::debug!(
            "Wrote {} fact files ({} rows) to {}",
            summary.files,
            summary.rows,
            self.out_dir.display()
        );
        Ok(summary)
    }
}

impl Database for CsvDatabase {
    fn add(&self, predicate: PredicateFile, args: &[&str]) {
        self.memory.add(predicate, args);
    }
}

/// Экранирует значения, которые сломали бы построчный формат
///
/// A separator other than tab is kept as `\<sep>`, so every row has exactly
/// the predicate's arity when split on unescaped separators.
pub fn escape_value(value: &str, separator: char) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c if c == separator => {
                out.push('\\');
                out.push(c);
            }
            other => out.push(other),
        }
    }
    out
}
