//! Извлечение конфигов сервера из отчёта в единое пространство имён
//!
//! Spark хранит конфиги как JSON-строки под ключами вида `bukkit.yml`.
//! Ошибка разбора одного источника не мешает остальным.

use serde_json::{Map, Value};
use std::collections::HashMap;

/// Пространство имён для выражений: имя источника -> дерево конфига
pub type Namespace = mcdev_expr::Context;

/// Ключ в отчёте -> имя переменной в правилах (порядок важен)
pub const CONFIG_SOURCES: &[(&str, &str)] = &[
    ("server.properties", "server_properties"),
    ("bukkit.yml", "bukkit"),
    ("spigot.yml", "spigot"),
    ("paper/", "paper"),
    ("purpur.yml", "purpur"),
];

/// Источник, который не удалось разобрать
#[derive(Debug, Clone, PartialEq)]
pub struct SourceParseError {
    pub report_key: String,
    pub source_name: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub namespace: Namespace,
    pub errors: Vec<SourceParseError>,
}

/// Построить пространство имён из `serverConfigurations`
pub fn normalize(configs: &HashMap<String, Value>) -> Normalized {
    let mut result = Normalized::default();

    for (report_key, source_name) in CONFIG_SOURCES {
        let Some(raw) = configs.get(*report_key) else {
            continue;
        };

        let parsed = match raw {
            Value::Null => continue,
            Value::String(text) if text.trim().is_empty() => continue,
            Value::String(text) => parse_source(report_key, text),
            // Уже структурированные данные принимаем как есть
            other => Ok(other.clone()),
        };

        match parsed {
            Ok(tree) => {
                log::debug!("Config source {} -> {}", report_key, source_name);
                result.namespace.insert(source_name.to_string(), tree);
            }
            Err(message) => {
                log::warn!("Failed to parse {}: {}", report_key, message);
                result.errors.push(SourceParseError {
                    report_key: report_key.to_string(),
                    source_name: source_name.to_string(),
                    message,
                });
            }
        }
    }

    result
}

fn parse_source(report_key: &str, text: &str) -> Result<Value, String> {
    match serde_json::from_str::<Value>(text) {
        Ok(v) => Ok(v),
        // Старые версии spark присылают server.properties как есть
        Err(e) if report_key == "server.properties" => {
            let props = parse_properties(text);
            if props.is_empty() {
                Err(e.to_string())
            } else {
                Ok(Value::Object(props))
            }
        }
        Err(e) => Err(e.to_string()),
    }
}

/// Разбор формата `key=value` с приведением чисел и булевых значений.
/// Строки без `=` пропускаются.
pub fn parse_properties(text: &str) -> Map<String, Value> {
    let mut map = Map::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }
        let Some((key, value)) = trimmed.split_once('=') else {
            continue;
        };
        if key.trim().is_empty() {
            continue;
        }
        map.insert(key.trim().to_string(), property_value(value.trim()));
    }
    map
}

fn property_value(raw: &str) -> Value {
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => {
            if let Ok(i) = raw.parse::<i64>() {
                Value::from(i)
            } else if let Some(f) = raw
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite() && raw.contains('.'))
            {
                Value::from(f)
            } else {
                Value::String(raw.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn configs(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_selective_inclusion() {
        let raw = configs(&[
            ("server.properties", json!(r#"{"view-distance": 10}"#)),
            ("paper/", json!(r#"{"paper-world-defaults.yml": {"chunks": {}}}"#)),
        ]);
        let normalized = normalize(&raw);
        let keys: Vec<&String> = normalized.namespace.keys().collect();
        assert_eq!(keys, vec!["server_properties", "paper"]);
        assert!(normalized.errors.is_empty());
        assert_eq!(normalized.namespace["server_properties"]["view-distance"], 10);
    }

    #[test]
    fn test_namespace_order_follows_source_table() {
        let raw = configs(&[
            ("purpur.yml", json!("{}")),
            ("bukkit.yml", json!("{}")),
            ("server.properties", json!("{}")),
        ]);
        let keys: Vec<String> = normalize(&raw).namespace.keys().cloned().collect();
        assert_eq!(keys, vec!["server_properties", "bukkit", "purpur"]);
    }

    #[test]
    fn test_parse_failure_does_not_abort_others() {
        let raw = configs(&[
            ("bukkit.yml", json!("{ broken")),
            ("spigot.yml", json!(r#"{"settings": {"bungeecord": false}}"#)),
        ]);
        let normalized = normalize(&raw);
        assert!(normalized.namespace.contains_key("spigot"));
        assert!(!normalized.namespace.contains_key("bukkit"));
        assert_eq!(normalized.errors.len(), 1);
        assert_eq!(normalized.errors[0].report_key, "bukkit.yml");
        assert_eq!(normalized.errors[0].source_name, "bukkit");
    }

    #[test]
    fn test_empty_and_unknown_keys_are_skipped() {
        let raw = configs(&[
            ("bukkit.yml", json!("")),
            ("spigot.yml", Value::Null),
            ("velocity.toml", json!("{}")),
        ]);
        let normalized = normalize(&raw);
        assert!(normalized.namespace.is_empty());
        assert!(normalized.errors.is_empty());
    }

    #[test]
    fn test_structured_value_is_accepted() {
        let raw = configs(&[("bukkit.yml", json!({"spawn-limits": {"monsters": 70}}))]);
        let normalized = normalize(&raw);
        assert_eq!(normalized.namespace["bukkit"]["spawn-limits"]["monsters"], 70);
    }

    #[test]
    fn test_properties_fallback() {
        let text = "#Minecraft server properties\nview-distance=10\nonline-mode=false\nmotd=A Minecraft Server\nratio=0.5\n";
        let raw = configs(&[("server.properties", json!(text))]);
        let normalized = normalize(&raw);
        let props = &normalized.namespace["server_properties"];
        assert_eq!(props["view-distance"], 10);
        assert_eq!(props["online-mode"], false);
        assert_eq!(props["motd"], "A Minecraft Server");
        assert_eq!(props["ratio"], 0.5);
    }

    #[test]
    fn test_broken_json_without_properties_is_error() {
        for text in ["[1,2", "{\"view-distance\": 10", "not a config"] {
            let raw = configs(&[("server.properties", json!(text))]);
            let normalized = normalize(&raw);
            assert!(normalized.namespace.is_empty(), "{}", text);
            assert_eq!(normalized.errors.len(), 1, "{}", text);
            assert_eq!(normalized.errors[0].report_key, "server.properties");
        }
    }

    #[test]
    fn test_properties_fallback_only_for_server_properties() {
        let raw = configs(&[("bukkit.yml", json!("spawn-limits=1"))]);
        let normalized = normalize(&raw);
        assert!(normalized.namespace.is_empty());
        assert_eq!(normalized.errors.len(), 1);
    }
}
