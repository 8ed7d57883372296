//! Источник отчёта spark: ссылка на viewer или локальный файл

mod fetch;
mod types;

pub use fetch::{fetch_report, load_report, raw_report_url, validate_report_url};
pub use types::{JavaInfo, PlatformInfo, SparkMetadata, SparkReport, SystemStatistics, UserInfo};

use std::path::PathBuf;

use crate::error::Result;

/// Откуда брать отчёт
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportSource {
    Url(String),
    File(PathBuf),
}

impl ReportSource {
    /// Всё, что начинается с http(s)://, считается ссылкой
    pub fn parse(input: &str) -> Self {
        if input.starts_with("http://") || input.starts_with("https://") {
            Self::Url(input.to_string())
        } else {
            Self::File(PathBuf::from(input))
        }
    }

    pub async fn load(&self, timeout_secs: u64) -> Result<SparkReport> {
        match self {
            Self::Url(url) => fetch_report(url, timeout_secs).await,
            Self::File(path) => load_report(path),
        }
    }

    pub fn id(&self) -> String {
        match self {
            Self::Url(url) => report_id(url),
            Self::File(path) => path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default(),
        }
    }
}

/// Идентификатор отчёта: последний сегмент пути ссылки
pub fn report_id(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}
