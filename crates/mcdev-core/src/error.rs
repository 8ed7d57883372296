use serde::Serialize;
use thiserror::Error;

use crate::i18n::Language;

/// Информация об ошибке с подсказкой для восстановления
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    /// Код ошибки для идентификации
    pub code: String,
    /// Человекочитаемое сообщение
    pub message: String,
    /// Подсказка для исправления
    pub recovery_hint: Option<String>,
    /// Технические детали (для логов)
    pub details: Option<String>,
}

impl ErrorInfo {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            recovery_hint: None,
            details: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.recovery_hint = Some(hint.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not a spark report URL: {0}")]
    InvalidReportUrl(String),

    #[error("Spark report unavailable: {0}")]
    ReportUnavailable(String),

    #[error("Invalid rule catalog: {0}")]
    RuleCatalog(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Analysis timed out after {0}s")]
    Timeout(u64),
}

impl AnalyzerError {
    /// Информация об ошибке на языке по умолчанию
    pub fn to_error_info(&self) -> ErrorInfo {
        self.localized_error_info(Language::default())
    }

    /// Возвращает локализованную информацию об ошибке
    pub fn localized_error_info(&self, lang: Language) -> ErrorInfo {
        match self {
            AnalyzerError::Io(e) => match lang {
                Language::Chinese => ErrorInfo::new("IO_ERROR", format!("文件读写失败：{}", e.kind()))
                    .with_hint("请检查文件路径和访问权限")
                    .with_details(e.to_string()),
                Language::English => ErrorInfo::new("IO_ERROR", format!("Filesystem error: {}", e.kind()))
                    .with_hint("Check the file path and access permissions")
                    .with_details(e.to_string()),
            },
            AnalyzerError::Http(e) => {
                let timeout = e.is_timeout();
                let connect = e.is_connect();
                let status = e.status().map(|s| s.as_u16());
                match lang {
                    Language::Chinese => {
                        let (message, hint) = if timeout {
                            ("服务器响应超时", "请检查网络连接后重试")
                        } else if connect {
                            ("无法连接到服务器", "请检查网络连接，服务器可能暂时不可用")
                        } else if status == Some(404) {
                            ("报告不存在", "spark 报告可能已过期，请重新生成")
                        } else {
                            ("网络错误", "请检查网络连接")
                        };
                        ErrorInfo::new("HTTP_ERROR", message)
                            .with_hint(hint)
                            .with_details(e.to_string())
                    }
                    Language::English => {
                        let (message, hint) = if timeout {
                            ("Server timeout", "Check your internet connection and try again")
                        } else if connect {
                            ("Failed to connect to server", "Check your internet connection. The server might be temporarily unavailable")
                        } else if status == Some(404) {
                            ("Report not found", "The spark report may have expired, generate a new one")
                        } else {
                            ("Network error", "Check your internet connection")
                        };
                        ErrorInfo::new("HTTP_ERROR", message)
                            .with_hint(hint)
                            .with_details(e.to_string())
                    }
                }
            }
            AnalyzerError::Json(e) => match lang {
                Language::Chinese => ErrorInfo::new("JSON_ERROR", "数据解析失败")
                    .with_hint("请确认这是 spark 报告的原始数据")
                    .with_details(e.to_string()),
                Language::English => ErrorInfo::new("JSON_ERROR", "Data processing error")
                    .with_hint("Make sure the input is a raw spark report")
                    .with_details(e.to_string()),
            },
            AnalyzerError::InvalidReportUrl(url) => match lang {
                Language::Chinese => ErrorInfo::new("INVALID_REPORT_URL", "不是 spark 报告的网址。")
                    .with_hint("网址应以 https://spark 开头")
                    .with_details(url.clone()),
                Language::English => ErrorInfo::new("INVALID_REPORT_URL", "Not a spark report URL")
                    .with_hint("The URL must start with https://spark")
                    .with_details(url.clone()),
            },
            AnalyzerError::ReportUnavailable(msg) => match lang {
                Language::Chinese => ErrorInfo::new("REPORT_UNAVAILABLE", "获取数据失败，请检查是不是 spark 报告的链接。")
                    .with_details(msg.clone()),
                Language::English => ErrorInfo::new("REPORT_UNAVAILABLE", "Failed to fetch the report, check that the link is a spark report")
                    .with_details(msg.clone()),
            },
            AnalyzerError::RuleCatalog(msg) => match lang {
                Language::Chinese => ErrorInfo::new("RULE_CATALOG", "规则文件无效")
                    .with_hint("请检查规则目录中的 JSON 文件")
                    .with_details(msg.clone()),
                Language::English => ErrorInfo::new("RULE_CATALOG", "Invalid rule catalog")
                    .with_hint("Check the JSON files in the rules directory")
                    .with_details(msg.clone()),
            },
            AnalyzerError::InvalidConfig(msg) => match lang {
                Language::Chinese => ErrorInfo::new("INVALID_CONFIG", "配置无效")
                    .with_hint("请检查 settings.json")
                    .with_details(msg.clone()),
                Language::English => ErrorInfo::new("INVALID_CONFIG", "Invalid configuration")
                    .with_hint("Check settings.json")
                    .with_details(msg.clone()),
            },
            AnalyzerError::Timeout(secs) => match lang {
                Language::Chinese => ErrorInfo::new("TIMEOUT", format!("分析超时（{} 秒）", secs))
                    .with_hint("请稍后重试或调大 analysis_timeout_secs"),
                Language::English => ErrorInfo::new("TIMEOUT", format!("Analysis timed out after {}s", secs))
                    .with_hint("Try again later or raise analysis_timeout_secs"),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;

impl serde::Serialize for AnalyzerError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Сериализуем как ErrorInfo для более полной информации
        self.to_error_info().serialize(serializer)
    }
}
