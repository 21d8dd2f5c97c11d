/*!
# IR Facts CLI

Command-line interface for encoding program IR into Datalog fact files.
*/

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

use ir_facts::cli_common::{self, CommonArgs, OutputFormat, OutputWriter, SchemaRow};
use ir_facts::{CsvDatabase, FactGenerator, FactsConfig, PredicateFile, Program};

#[derive(Parser)]
#[command(
    name = "ir-facts",
    version = env!("CARGO_PKG_VERSION"),
    about = "Encodes a program's IR into relational facts for Datalog analyses"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode JSON programs into .facts files
    Generate {
        /// Program JSON file or directory of JSON files
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for .facts files
        #[arg(short, long)]
        output: PathBuf,

        /// Configuration file (TOML or YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of parallel workers (0 = all CPUs)
        #[arg(short, long)]
        workers: Option<usize>,
    },

    /// List predicates with their file names and arities
    Schema {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Write the schema to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the default configuration file
    InitConfig {
        /// Output file
        #[arg(short, long, default_value = "ir-facts.toml")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli_common::init_logging(cli.common.log_level())?;

    match cli.command {
        Commands::Generate {
            input,
            output,
            config,
            workers,
        } => generate_command(&input, &output, config.as_deref(), workers, &cli.common),
        Commands::Schema { format, output } => schema_command(&format, output.as_deref()),
        Commands::InitConfig { output } => init_config_command(&output),
    }
}

fn generate_command(
    input: &Path,
    output: &Path,
    config_path: Option<&Path>,
    workers: Option<usize>,
    common: &CommonArgs,
) -> Result<()> {
    let start = Instant::now();
    cli_common::require_input(input)?;

    let mut config = match config_path {
        Some(path) => FactsConfig::load_from_file(path)?,
        None => FactsConfig::default(),
    };
    if let Some(workers) = workers {
        config.generator.workers = workers;
    }
    let warnings = config.validate()?;

    let program = load_program(input)?;
    if common.should_print() {
        cli_common::print_banner("Encoding program IR into relational facts");
        for warning in &warnings {
            cli_common::print_warning(warning);
        }
        cli_common::print_program_summary(&program);
    }

    let db = CsvDatabase::create(output)?.with_separator(config.output.separator);
    let mut generator = FactGenerator::new(db, &config);

    let progress = if common.should_print() {
        let pb = ProgressBar::new(program.classes.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} classes {msg}")
                .context("Invalid progress template")?
                .progress_chars("=> "),
        );
        generator = generator.with_progress(pb.clone());
        Some(pb)
    } else {
        None
    };

    let result = generator.generate(&program);
    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }
    let stats = result.context("Fact generation failed")?;

    let db = generator.into_database();
    let summary = db.flush().context("Failed to write fact files")?;

    if common.should_print() {
        cli_common::print_generation_report(&stats, &summary, db.out_dir(), start.elapsed());
    }
    Ok(())
}

/// Файл JSON или каталог с файлами JSON (объединяются в одну программу)
fn load_program(input: &Path) -> Result<Program> {
    if input.is_file() {
        return Program::load_from_file(input);
    }

    let mut files: Vec<PathBuf> = WalkDir::new(input)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No JSON program files found in {}", input.display());
    }

    let mut program = Program::default();
    for file in files {
        tracing::debug!("Loading {}", file.display());
        program.merge(Program::load_from_file(&file)?);
    }
    Ok(program)
}

fn schema_command(format: &str, output: Option<&Path>) -> Result<()> {
    let format: OutputFormat = format.parse()?;
    let rows: Vec<SchemaRow> = PredicateFile::ALL.into_iter().map(SchemaRow::from).collect();

    let mut writer = match output {
        Some(path) => OutputWriter::file(path, format)?,
        None => OutputWriter::stdout(format),
    };
    writer.write_records("Fact schema", &rows)?;

    if let Some(path) = output {
        cli_common::print_success(&format!("Schema written to {}", path.display()));
    }
    Ok(())
}

fn init_config_command(output: &Path) -> Result<()> {
    if output.exists() {
        cli_common::print_warning(&format!("Overwriting {}", output.display()));
    }
    FactsConfig::default().save_to_file(output)?;
    cli_common::print_success(&format!("Default configuration written to {}", output.display()));
    Ok(())
}
