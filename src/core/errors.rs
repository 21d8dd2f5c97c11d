/*!
# Error System for IR Facts

Fatal encoding errors and their context. Anything that reaches the caller as
an `EncodeError` aborts the run: the fact set would otherwise be silently
incomplete. Recorded gaps (unsupported instructions) are facts, not errors.
*/

use std::path::PathBuf;
use thiserror::Error;

/// Результат операций кодирования
pub type Result<T> = std::result::Result<T, EncodeError>;

/// Ошибки кодирования фактов
#[derive(Error, Debug)]
pub enum EncodeError {
    /// Тип вне {array, primitive, class-or-interface}
    #[error("Don't know what to do with type `{type_name}`")]
    InvalidTypeKind { type_name: String },

    /// Литерал class-константы не в форме `[...` или `L...;`
    #[error("Unexpected class constant `{literal}` in {instruction}")]
    UnsupportedClassConstantSyntax { literal: String, instruction: String },

    #[error("Parameter index {index} out of range for {method} ({arity} parameters)")]
    ParameterOutOfRange {
        method: String,
        index: usize,
        arity: usize,
    },

    /// Ошибка внутри конкретной единицы (класс, метод)
    #[error("Failed to encode {unit}: {source}")]
    InUnit {
        unit: String,
        #[source]
        source: Box<EncodeError>,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl EncodeError {
    /// Оборачивает ошибку контекстом единицы кодирования.
    ///
    /// Повторная обёртка тем же контекстом не добавляет уровень.
    pub fn within(self, unit: impl Into<String>) -> Self {
        let unit = unit.into();
        if let EncodeError::InUnit { unit: existing, .. } = &self {
            if *existing == unit {
                return self;
            }
        }
        EncodeError::InUnit {
            unit,
            source: Box::new(self),
        }
    }

    /// Исходная ошибка без слоёв контекста
    pub fn root_cause(&self) -> &EncodeError {
        match self {
            EncodeError::InUnit { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EncodeError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Расширение для `Result`: добавить контекст единицы кодирования
pub trait UnitContext<T> {
    fn in_unit<F, S>(self, unit: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> UnitContext<T> for Result<T> {
    fn in_unit<F, S>(self, unit: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| e.within(unit()))
    }
}
