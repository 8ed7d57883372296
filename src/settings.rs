use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AnalyzerError, Result};
use crate::i18n::Language;
use crate::types::OutputFormat;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Язык сообщений классификатора GC и ошибок
    pub language: Language,
    /// Директория с пользовательскими документами правил
    pub rules_dir: Option<PathBuf>,
    /// Загружать ли встроенные правила (по умолчанию true)
    pub include_builtin_rules: bool,
    pub request_timeout_secs: u64,
    /// Ограничение на весь анализ, включая загрузку отчёта
    pub analysis_timeout_secs: u64,
    pub output: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: Language::Chinese,
            rules_dir: None,
            include_builtin_rules: true,
            request_timeout_secs: 30,
            analysis_timeout_secs: 30,
            output: OutputFormat::Text,
        }
    }
}

impl Settings {
    /// Загрузить настройки из стандартного места, при отсутствии файла - умолчания
    pub fn load() -> Result<Settings> {
        match crate::paths::settings_file() {
            Some(path) => Self::load_from(&path),
            None => {
                log::debug!("No config directory, using default settings");
                Ok(Settings::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Settings> {
        if !path.exists() {
            log::debug!("Settings file {} not found, using defaults", path.display());
            return Ok(Settings::default());
        }

        let text = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&text).map_err(|e| {
            AnalyzerError::InvalidConfig(format!("{}: {}", path.display(), e))
        })?;
        log::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}
