use reqwest::Client;
use std::path::Path;
use std::time::Duration;

use super::types::SparkReport;
use crate::error::{AnalyzerError, Result};

const MAX_RETRIES: u32 = 3;
const BASE_DELAY_MS: u64 = 1000;
const REPORT_URL_PREFIX: &str = "https://spark";

/// Проверить, что ссылка ведёт на viewer spark
pub fn validate_report_url(url: &str) -> Result<()> {
    if url.starts_with(REPORT_URL_PREFIX) {
        Ok(())
    } else {
        Err(AnalyzerError::InvalidReportUrl(url.to_string()))
    }
}

/// Адрес сырого JSON отчёта
pub fn raw_report_url(url: &str) -> String {
    let base = url.split(['?', '#']).next().unwrap_or(url);
    format!("{}?raw=1", base)
}

/// Загрузить отчёт по ссылке с повторами при сетевых ошибках и 5xx
pub async fn fetch_report(url: &str, timeout_secs: u64) -> Result<SparkReport> {
    validate_report_url(url)?;
    let raw_url = raw_report_url(url);

    let client = Client::builder()
        .user_agent(crate::USER_AGENT)
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| {
            log::error!("Failed to build HTTP client: {}", e);
            AnalyzerError::Http(e)
        })?;

    let mut last_error = None;

    for attempt in 0..MAX_RETRIES {
        if attempt > 0 {
            let delay = BASE_DELAY_MS * (1 << (attempt - 1));
            log::debug!(
                "Retrying {} after {}ms (attempt {}/{})",
                raw_url,
                delay,
                attempt + 1,
                MAX_RETRIES
            );
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        log::info!("Fetching spark report: {}", raw_url);

        let response = match client.get(&raw_url).send().await {
            Ok(r) => r,
            Err(e) => {
                log::warn!(
                    "Network error fetching {} (attempt {}/{}): {}",
                    raw_url,
                    attempt + 1,
                    MAX_RETRIES,
                    e
                );
                last_error = Some(AnalyzerError::Http(e));
                continue;
            }
        };

        let status = response.status();
        if !status.is_success() {
            log::error!("HTTP {} for {}", status, raw_url);
            let err = AnalyzerError::ReportUnavailable(format!("HTTP {}: {}", status, url));
            if status.is_server_error() {
                last_error = Some(err);
                continue;
            }
            return Err(err);
        }

        let text = match response.text().await {
            Ok(t) => t,
            Err(e) => {
                log::error!("Failed to read response body from {}: {}", raw_url, e);
                last_error = Some(AnalyzerError::Http(e));
                continue;
            }
        };

        return parse_report(&text).map_err(|e| {
            log::debug!("Response body: {}", text.chars().take(500).collect::<String>());
            AnalyzerError::ReportUnavailable(format!("{}: {}", url, e))
        });
    }

    log::error!("All {} attempts failed for {}", MAX_RETRIES, raw_url);
    Err(last_error.unwrap_or_else(|| AnalyzerError::ReportUnavailable(url.to_string())))
}

/// Прочитать сырой отчёт из файла
pub fn load_report(path: &Path) -> Result<SparkReport> {
    log::info!("Loading spark report from {}", path.display());
    let text = std::fs::read_to_string(path)?;
    Ok(parse_report(&text)?)
}

fn parse_report(text: &str) -> std::result::Result<SparkReport, serde_json::Error> {
    serde_json::from_str(text)
}
