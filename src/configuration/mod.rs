/*!
# Configuration

Settings for one fact-generation run. Loaded from TOML or YAML (chosen by
file extension); every field has a default, so an empty file is a valid
configuration.

```toml
[encoder]
string_hash_threshold = 256
signature_hash_threshold = 1024
quote_padded_strings = false

[generator]
workers = 0

[output]
separator = "\t"
```
*/

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Параметры кодирования идентификаторов
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Строковые константы длиннее порога заменяются хэш-тегом
    pub string_hash_threshold: usize,
    /// Сигнатуры методов длиннее порога заменяются хэш-тегом
    pub signature_hash_threshold: usize,
    /// Оборачивать пустые строки и строки с пробелами по краям в `<<"...">>`
    pub quote_padded_strings: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            string_hash_threshold: 256,
            signature_hash_threshold: 1024,
            quote_padded_strings: false,
        }
    }
}

/// Параметры обхода программы
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Число рабочих потоков (0 = по числу CPU)
    pub workers: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self { workers: 0 }
    }
}

impl GeneratorConfig {
    pub fn effective_workers(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get()
        } else {
            self.workers
        }
    }
}

/// Параметры файлов фактов
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub separator: char,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { separator: '\t' }
    }
}

/// Полная конфигурация запуска
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactsConfig {
    pub encoder: EncoderConfig,
    pub generator: GeneratorConfig,
    pub output: OutputConfig,
}

impl FactsConfig {
    /// Load configuration, choosing the format by extension (`.yaml`/`.yml` or TOML)
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );

        let config: Self = if is_yaml {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config from {}", path.display()))?
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config from {}", path.display()))?
        };

        for warning in config.validate()? {
            tracing::warn!("{}: {}", path.display(), warning);
        }
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write config to {}", path.as_ref().display()))?;
        Ok(())
    }

    /// Проверяет конфигурацию; возвращает предупреждения
    pub fn validate(&self) -> Result<Vec<String>> {
        let mut warnings = Vec::new();

        if self.encoder.string_hash_threshold == 0 {
            bail!("encoder.string_hash_threshold must be greater than zero");
        }
        if self.encoder.signature_hash_threshold == 0 {
            bail!("encoder.signature_hash_threshold must be greater than zero");
        }
        if matches!(self.output.separator, '\n' | '\r' | '\\') {
            bail!(
                "output.separator {:?} would corrupt fact files",
                self.output.separator
            );
        }

        if self.encoder.string_hash_threshold != 256 || self.encoder.signature_hash_threshold != 1024 {
            warnings.push(
                "non-default hash thresholds change identifiers seen by downstream rules".to_string(),
            );
        }
        let cpus = num_cpus::get();
        if self.generator.workers > cpus * 4 {
            warnings.push(format!(
                "generator.workers = {} is far above the {} available CPUs",
                self.generator.workers, cpus
            ));
        }

        Ok(warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    #[test]
    fn test_default_config() {
        let config = FactsConfig::default();
        assert_eq!(config.encoder.string_hash_threshold, 256);
        assert_eq!(config.encoder.signature_hash_threshold, 1024);
        assert!(!config.encoder.quote_padded_strings);
        assert_eq!(config.output.separator, '\t');
        assert!(config.validate().unwrap().is_empty());
    }

    #[test]
    fn test_config_file_roundtrip() {
        let mut config = FactsConfig::default();
        config.generator.workers = 3;

        let temp_file = NamedTempFile::new().unwrap();
        config.save_to_file(temp_file.path()).unwrap();

        let loaded = FactsConfig::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: FactsConfig = toml::from_str("[encoder]\nquote_padded_strings = true\n").unwrap();
        assert!(config.encoder.quote_padded_strings);
        assert_eq!(config.encoder.string_hash_threshold, 256);
        assert_eq!(config.generator.workers, 0);
    }

    #[test]
    fn test_yaml_config() {
        let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "generator:\n  workers: 2\noutput:\n  separator: ','").unwrap();

        let config = FactsConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.generator.workers, 2);
        assert_eq!(config.output.separator, ',');
    }

    #[test]
    fn test_validation_rejects_zero_threshold() {
        let mut config = FactsConfig::default();
        config.encoder.string_hash_threshold = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_warns_on_custom_threshold() {
        let mut config = FactsConfig::default();
        config.encoder.signature_hash_threshold = 4096;
        assert_eq!(config.validate().unwrap().len(), 1);
    }

    #[test]
    fn test_effective_workers() {
        let config = GeneratorConfig { workers: 0 };
        assert!(config.effective_workers() >= 1);
        assert_eq!(GeneratorConfig { workers: 5 }.effective_workers(), 5);
    }
}
