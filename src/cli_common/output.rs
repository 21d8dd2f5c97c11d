//! Вывод таблиц для команд CLI: текстом в терминал или JSON-массивом

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use crate::facts::PredicateFile;

/// Формат вывода
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow::anyhow!("Unknown output format: {} (expected text or json)", s)),
        }
    }
}

/// Запись, которую можно показать строкой таблицы
pub trait TableRow {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

/// Строка схемы фактов: предикат, файл, число столбцов
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SchemaRow {
    pub predicate: &'static str,
    pub file: String,
    pub arity: usize,
}

impl From<PredicateFile> for SchemaRow {
    fn from(predicate: PredicateFile) -> Self {
        Self {
            predicate: predicate.schema_name(),
            file: format!("{}.facts", predicate.file_name()),
            arity: predicate.arity(),
        }
    }
}

impl TableRow for SchemaRow {
    const HEADERS: &'static [&'static str] = &["predicate", "file", "arity"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.predicate.to_string(),
            self.file.clone(),
            self.arity.to_string(),
        ]
    }
}

pub struct OutputWriter {
    writer: Box<dyn Write>,
    format: OutputFormat,
}

impl OutputWriter {
    pub fn stdout(format: OutputFormat) -> Self {
        Self {
            writer: Box::new(io::stdout()),
            format,
        }
    }

    pub fn file(path: &Path, format: OutputFormat) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        Ok(Self {
            writer: Box::new(BufWriter::new(file)),
            format,
        })
    }

    /// Text: заголовок и выровненная таблица. JSON: массив записей как есть.
    pub fn write_records<T: TableRow + Serialize>(&mut self, title: &str, records: &[T]) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut self.writer, records)?;
                writeln!(self.writer)?;
            }
            OutputFormat::Text => {
                writeln!(self.writer, "{}", title.bold().blue())?;
                let rows: Vec<Vec<String>> = records.iter().map(T::cells).collect();
                self.write_text_table(T::HEADERS, &rows)?;
            }
        }
        self.writer.flush()?;
        Ok(())
    }

    fn write_text_table(&mut self, headers: &[&str], rows: &[Vec<String>]) -> Result<()> {
        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let header_line = headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| format!("{h:<w$}"))
            .collect::<Vec<_>>()
            .join("  ");
        writeln!(self.writer, "{}", header_line.trim_end().bold())?;
        writeln!(self.writer, "{}", "-".repeat(header_line.trim_end().chars().count()))?;

        for row in rows {
            let line = row
                .iter()
                .zip(&widths)
                .map(|(cell, w)| format!("{cell:<w$}"))
                .collect::<Vec<_>>()
                .join("  ");
            writeln!(self.writer, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
