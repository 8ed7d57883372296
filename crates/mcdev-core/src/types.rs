use serde::{Deserialize, Serialize};

/// Единица результата анализа: карточка «заголовок + текст»
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub name: String,
    pub value: String,
}

impl Finding {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Диагностическая карточка: "⚠️" + метка, текст ошибки как есть
    pub fn diagnostic(label: &str, error: impl std::fmt::Display) -> Self {
        Self {
            name: format!("⚠️{}", label),
            value: error.to_string(),
        }
    }
}

/// Сигнал из JVM флагов: размер кучи (MB) и название алгоритма GC
#[derive(Debug, Clone, PartialEq)]
pub struct JvmFlagSignal {
    pub memory_mb: f64,
    /// Имя из `-XX:+Use<Name>GC`, например "G1", "Z", "Shenandoah"
    pub gc_algorithm: String,
}

/// Формат вывода отчёта
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_finding() {
        let f = Finding::diagnostic("spawn-limits.monsters", "boom");
        assert_eq!(f.name, "⚠️spawn-limits.monsters");
        assert_eq!(f.value, "boom");
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("text"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::parse("html"), None);
    }
}
