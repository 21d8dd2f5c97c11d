//! Счётчики внутри одного метода.

use std::collections::HashMap;

/// Per-method counter service for fresh synthetic names.
///
/// Each basename counts independently from zero. A session lives exactly as
/// long as the method being encoded, so numbering restarts in every method.
#[derive(Debug, Default)]
pub struct Session {
    counters: HashMap<String, u32>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_number(&mut self, basename: &str) -> u32 {
        let counter = self.counters.entry(basename.to_string()).or_insert(0);
        let number = *counter;
        *counter += 1;
        number
    }
}
