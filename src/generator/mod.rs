/*!
# Fact Generator

Walks a whole [`Program`] and drives the [`FactWriter`].

Classes are processed in parallel on a dedicated rayon pool against one
shared writer. The first fatal error fails the whole run, wrapped with the
class and method it came from; a partially encoded program is never
reported as success.
*/

pub mod session;

pub use session::Session;

use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::Serialize;
use std::ops::AddAssign;

use crate::configuration::FactsConfig;
use crate::core::{Result, UnitContext};
use crate::encoder::{FactWriter, InstructionOutcome};
use crate::facts::Database;
use crate::ir::{Class, Method, Program};

/// Статистика генерации
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenerationStats {
    pub classes: usize,
    pub fields: usize,
    pub methods: usize,
    pub instructions: usize,
    pub unsupported: usize,
    pub properties: usize,
}

impl AddAssign for GenerationStats {
    fn add_assign(&mut self, other: Self) {
        self.classes += other.classes;
        self.fields += other.fields;
        self.methods += other.methods;
        self.instructions += other.instructions;
        self.unsupported += other.unsupported;
        self.properties += other.properties;
    }
}

/// Генератор фактов для программы
pub struct FactGenerator<D: Database> {
    writer: FactWriter<D>,
    workers: usize,
    progress: Option<ProgressBar>,
}

impl<D: Database> FactGenerator<D> {
    pub fn new(db: D, config: &FactsConfig) -> Self {
        Self {
            writer: FactWriter::with_config(db, config.encoder.clone()),
            workers: config.generator.effective_workers(),
            progress: None,
        }
    }

    /// Прогресс увеличивается на единицу после каждого класса
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn writer(&self) -> &FactWriter<D> {
        &self.writer
    }

    pub fn into_database(self) -> D {
        self.writer.into_database()
    }

    /// Кодирует всю программу
    pub fn generate(&self, program: &Program) -> Result<GenerationStats> {
        tracing::info!(
            "Generating facts for {} classes ({} methods) using {} workers",
            program.classes.len(),
            program.method_count(),
            self.workers
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()?;

        let per_class: Vec<GenerationStats> = pool.install(|| {
            program
                .classes
                .par_iter()
                .map(|class| {
                    let stats = self
                        .generate_class(class)
                        .in_unit(|| format!("class {}", class.name));
                    if let Some(progress) = &self.progress {
                        progress.inc(1);
                    }
                    stats
                })
                .collect::<Result<Vec<_>>>()
        })?;

        let mut stats = GenerationStats::default();
        for class_stats in per_class {
            stats += class_stats;
        }

        for property in &program.properties {
            self.writer
                .register_property(&property.path, &property.key, &property.value);
        }
        stats.properties = program.properties.len();

        tracing::info!(
            "Generated facts: {} classes, {} fields, {} methods, {} instructions ({} unsupported), {} properties",
            stats.classes,
            stats.fields,
            stats.methods,
            stats.instructions,
            stats.unsupported,
            stats.properties
        );
        Ok(stats)
    }

    /// Класс, его поля и методы
    pub fn generate_class(&self, class: &Class) -> Result<GenerationStats> {
        let w = &self.writer;
        let mut stats = GenerationStats {
            classes: 1,
            ..GenerationStats::default()
        };

        w.register_class_or_interface(class);
        for &modifier in &class.modifiers {
            w.register_class_modifier(modifier, class);
        }
        if let Some(superclass) = &class.superclass {
            w.register_superclass(class, superclass);
        }
        for interface in &class.interfaces {
            w.register_superinterface(class, interface);
        }
        if class.application {
            w.register_application_class(class);
        }
        if let Some(artifact) = &class.artifact {
            w.register_class_artifact(artifact, class);
        }

        for field in &class.fields {
            w.register_field(field)
                .in_unit(|| format!("field {}.{}", class.name, field.name))?;
            for &modifier in &field.modifiers {
                w.register_field_modifier(modifier, field);
            }
            stats.fields += 1;
        }

        for method in &class.methods {
            let method_stats = self
                .generate_method(method)
                .in_unit(|| format!("method {}", w.method_id(method)))?;
            stats += method_stats;
        }

        Ok(stats)
    }

    /// Объявление метода, неявные переменные и тело
    pub fn generate_method(&self, method: &Method) -> Result<GenerationStats> {
        let w = &self.writer;
        let mut stats = GenerationStats {
            methods: 1,
            ..GenerationStats::default()
        };

        w.register_method(method)?;
        for &modifier in &method.modifiers {
            w.register_method_modifier(modifier, method);
        }
        if !method.is_static() {
            w.emit_this_var(method)?;
        }
        for index in 0..method.params.len() {
            w.emit_formal_param(method, index)?;
        }
        for exception in &method.declared_exceptions {
            w.emit_declared_exception(method, exception)?;
        }
        if method.is_native() {
            w.emit_native_return_var(method)?;
        }

        let mut session = Session::new();
        for instr in &method.body {
            stats.instructions += 1;
            if w.emit_instruction(method, instr, &mut session)? == InstructionOutcome::Unsupported {
                stats.unsupported += 1;
            }
        }

        if let Some(progress) = &self.progress {
            progress.tick();
        }
        Ok(stats)
    }
}
