/*!
# IR Facts v0.3

Fact encoding layer for Datalog-style program analyses. Turns a resolved
program IR (classes, methods, fields, instructions, types, constants) into a
complete, deduplicated set of tuples over fixed-arity predicates.

## Core Features

- **Stable identifiers** for types, methods, fields, variables, instructions and constants
- **Hash tags** for oversized string constants and method signatures, with the raw mapping kept
- **Recursive array registration** (`ARRAY_TYPE` / `COMPONENT_TYPE` for every level)
- **First-writer-wins variable types**, safe under concurrent workers
- **Explicit escape hatch** for instructions without a dedicated handler
- **Parallel generation** on a rayon pool, failing the whole run on the first fatal error

## Architecture

```text
IR Facts
├── Core        - Error types and unit context
├── IR          - Program model consumed from the producer (JSON)
├── Facts       - Predicate schema, in-memory and .facts file sinks
├── Cache       - Variable type memoization
├── Encoder     - Identifier encoding, types, entities, variables, instructions
├── Generator   - Whole-program driver with worker pool
└── CLI common  - Logging and output helpers for the binary
```

## Usage

### CLI
```bash
# Encode a program (or a directory of JSON programs) into .facts files
ir-facts generate --input program.json --output facts/

# Show the predicate schema
ir-facts schema --format json

# Write the default configuration
ir-facts init-config --output ir-facts.toml
```

### Library
```rust,ignore
use ir_facts::{encode_program, FactsConfig, PredicateFile, Program};

let program = Program::load_from_file("program.json")?;
let db = encode_program(&program, &FactsConfig::default())?;
println!("{} methods", db.count(PredicateFile::Method));
```
*/

pub mod cache;
pub mod cli_common;
pub mod configuration;
pub mod core;
pub mod encoder;
pub mod facts;
pub mod generator;
pub mod ir;

// Re-export main types for convenience
pub use cache::VarTypeCache;
pub use configuration::{EncoderConfig, FactsConfig, GeneratorConfig, OutputConfig};
pub use crate::core::{EncodeError, UnitContext};
pub use encoder::{FactWriter, InstructionOutcome};
pub use facts::{CsvDatabase, Database, FlushSummary, MemoryDatabase, PredicateFile};
pub use generator::{FactGenerator, GenerationStats, Session};
pub use ir::{
    BinaryOperator, Class, ConstantValue, Field, Instruction, InstructionKind, Local, Method,
    Modifier, PrimitiveType, Program, PropertyEntry, TypeRef,
};

use std::path::Path;

/// Кодирует программу в памяти
pub fn encode_program(program: &Program, config: &FactsConfig) -> crate::core::Result<MemoryDatabase> {
    let generator = FactGenerator::new(MemoryDatabase::new(), config);
    generator.generate(program)?;
    Ok(generator.into_database())
}

/// Кодирует программу из JSON-файла и записывает файлы `.facts`
pub fn generate_fact_files<P: AsRef<Path>, Q: AsRef<Path>>(
    program_path: P,
    out_dir: Q,
    config: &FactsConfig,
) -> anyhow::Result<(GenerationStats, FlushSummary)> {
    let program = Program::load_from_file(program_path)?;
    let db = CsvDatabase::create(out_dir)?.with_separator(config.output.separator);
    let generator = FactGenerator::new(db, config);
    let stats = generator.generate(&program)?;
    let summary = generator.into_database().flush()?;
    Ok((stats, summary))
}
