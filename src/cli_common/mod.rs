//! Общий модуль для CLI
//!
//! Логирование в stderr и цветные отчёты команд в stdout.

use anyhow::{bail, Result};
use colored::Colorize;
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use crate::facts::FlushSummary;
use crate::generator::GenerationStats;
use crate::ir::Program;

pub mod args;
pub mod output;

pub use args::CommonArgs;
pub use output::{OutputFormat, OutputWriter, SchemaRow, TableRow};

/// Логи идут в stderr, чтобы не смешиваться с выводом `schema --format json`
pub fn init_logging(level: tracing::Level) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(level == tracing::Level::TRACE)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

pub fn print_banner(description: &str) {
    println!(
        "{} {}",
        "ir-facts".bold().blue(),
        env!("CARGO_PKG_VERSION").dimmed()
    );
    println!("{}\n", description.dimmed());
}

/// Размер загруженной программы
pub fn print_program_summary(program: &Program) {
    println!(
        "{} {} classes, {} methods, {} instructions",
        "•".blue(),
        program.classes.len(),
        program.method_count(),
        program.instruction_count()
    );
}

/// Итог `generate`: неподдержанные инструкции (если были) и записанные файлы
pub fn print_generation_report(
    stats: &GenerationStats,
    summary: &FlushSummary,
    out_dir: &Path,
    elapsed: Duration,
) {
    if stats.unsupported > 0 {
        print_warning(&format!(
            "{} of {} instructions have no dedicated handler and were recorded as unsupported",
            stats.unsupported, stats.instructions
        ));
    }
    print_success(&format!(
        "Wrote {} facts to {} files in {} ({})",
        summary.rows,
        summary.files,
        out_dir.display(),
        format_duration(elapsed)
    ));
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message.green());
}

pub fn print_warning(message: &str) {
    println!("{} {}", "!".yellow().bold(), message.yellow());
}

/// Вход `generate`: JSON-файл или каталог
pub fn require_input(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("Input does not exist: {}", path.display());
    }
    if !path.is_file() && !path.is_dir() {
        bail!("Input is neither a file nor a directory: {}", path.display());
    }
    Ok(())
}

pub fn format_duration(duration: Duration) -> String {
    if duration < Duration::from_secs(1) {
        format!("{}ms", duration.as_millis())
    } else if duration < Duration::from_secs(60) {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
