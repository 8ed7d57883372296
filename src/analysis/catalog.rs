//! Каталог правил анализа конфигурации
//!
//! Документ правил: JSON-объект `путь узла -> [Checker]`, по одному документу
//! на источник конфигурации. Порядок узлов сохраняется так, как он записан в
//! файле, от него зависит порядок карточек в отчёте.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use crate::error::{AnalyzerError, Result};

/// Источники, для которых существуют правила
pub const SOURCE_NAMES: &[&str] = &["bukkit", "spigot", "server_properties", "purpur", "paper"];

/// Встроенные правила (вшиты в бинарник)
const BUILTIN_RULES: &[(&str, &str)] = &[
    ("bukkit", include_str!("../../rules/bukkit.json")),
    ("spigot", include_str!("../../rules/spigot.json")),
    ("server_properties", include_str!("../../rules/server.properties.json")),
    ("purpur", include_str!("../../rules/purpur.json")),
    ("paper", include_str!("../../rules/paper.json")),
];

static BUILTIN_CATALOG: LazyLock<Arc<RuleCatalog>> = LazyLock::new(|| {
    let mut catalog = RuleCatalog::default();
    for (source, text) in BUILTIN_RULES {
        let section = parse_document(source, text).expect("valid built-in rule document");
        catalog.insert(source, section);
    }
    Arc::new(catalog)
});

/// Одно правило-кандидат: все выражения должны быть истинны
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checker {
    #[serde(default)]
    pub expressions: Vec<String>,
    #[serde(default)]
    pub prefix: Option<String>,
    pub value: String,
}

/// Узел конфигурации с его правилами (путь используется только как подпись)
#[derive(Debug, Clone, PartialEq)]
pub struct RuleNode {
    pub path: String,
    pub checkers: Vec<Checker>,
}

/// Правила одного источника в порядке объявления
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSection {
    pub nodes: Vec<RuleNode>,
}

impl RuleSection {
    pub fn checker_count(&self) -> usize {
        self.nodes.iter().map(|n| n.checkers.len()).sum()
    }
}

/// Неизменяемый после загрузки каталог правил
#[derive(Debug, Clone, Default)]
pub struct RuleCatalog {
    sections: HashMap<String, RuleSection>,
}

impl RuleCatalog {
    /// Встроенный каталог, общий для всего процесса
    pub fn builtin() -> Arc<RuleCatalog> {
        Arc::clone(&BUILTIN_CATALOG)
    }

    /// Загрузить каталог: встроенные правила + документы из `rules_dir`.
    /// Файл `<source>.json` из директории полностью заменяет встроенную секцию.
    pub fn load(rules_dir: Option<&Path>, include_builtin: bool) -> Result<RuleCatalog> {
        let mut catalog = if include_builtin {
            BUILTIN_CATALOG.as_ref().clone()
        } else {
            RuleCatalog::default()
        };

        if let Some(dir) = rules_dir {
            catalog.load_dir(dir)?;
        }

        log::info!(
            "Loaded {} rule sections ({} checkers)",
            catalog.sections.len(),
            catalog.checker_count()
        );
        Ok(catalog)
    }

    fn load_dir(&mut self, dir: &Path) -> Result<()> {
        if !dir.is_dir() {
            return Err(AnalyzerError::RuleCatalog(format!(
                "rules directory not found: {}",
                dir.display()
            )));
        }

        let mut files = fs::read_dir(dir)?
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("json"))
            .collect::<Vec<_>>();
        // Детерминированный порядок загрузки
        files.sort();

        for path in files {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default();
            let Some(source) = source_for_file(stem) else {
                log::warn!("Skipping rule file with unknown source: {}", path.display());
                continue;
            };
            let text = fs::read_to_string(&path)?;
            let section = parse_document(source, &text)?;
            log::debug!(
                "Rule file {} -> {} ({} nodes)",
                path.display(),
                source,
                section.nodes.len()
            );
            self.insert(source, section);
        }
        Ok(())
    }

    pub fn insert(&mut self, source: &str, section: RuleSection) {
        self.sections.insert(source.to_string(), section);
    }

    pub fn section(&self, source: &str) -> Option<&RuleSection> {
        self.sections.get(source)
    }

    /// Источники в каноническом порядке, затем прочие по алфавиту
    pub fn sources(&self) -> Vec<&str> {
        let mut known: Vec<&str> = SOURCE_NAMES
            .iter()
            .copied()
            .filter(|s| self.sections.contains_key(*s))
            .collect();
        let mut extra: Vec<&str> = self
            .sections
            .keys()
            .map(String::as_str)
            .filter(|s| !SOURCE_NAMES.contains(s))
            .collect();
        extra.sort();
        known.extend(extra);
        known
    }

    pub fn checker_count(&self) -> usize {
        self.sections.values().map(RuleSection::checker_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Имя файла правил -> имя источника
pub fn source_for_file(stem: &str) -> Option<&'static str> {
    match stem {
        "server.properties" | "server_properties" => Some("server_properties"),
        other => SOURCE_NAMES.iter().copied().find(|s| *s == other),
    }
}

/// Разобрать документ правил одного источника
pub fn parse_document(source: &str, text: &str) -> Result<RuleSection> {
    let root: serde_json::Map<String, serde_json::Value> = serde_json::from_str(text)
        .map_err(|e| AnalyzerError::RuleCatalog(format!("{}: {}", source, e)))?;

    let mut nodes = Vec::with_capacity(root.len());
    for (path, value) in root {
        let checkers: Vec<Checker> = serde_json::from_value(value).map_err(|e| {
            AnalyzerError::RuleCatalog(format!("{}: node '{}': {}", source, path, e))
        })?;
        nodes.push(RuleNode { path, checkers });
    }
    Ok(RuleSection { nodes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_has_all_sources() {
        let catalog = RuleCatalog::builtin();
        assert_eq!(catalog.sources(), SOURCE_NAMES.to_vec());
        for source in SOURCE_NAMES {
            let section = catalog.section(source).unwrap();
            assert!(!section.nodes.is_empty(), "{} has no rules", source);
        }
    }

    #[test]
    fn test_builtin_catalog_is_shared() {
        let a = RuleCatalog::builtin();
        let b = RuleCatalog::builtin();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_parse_document_preserves_order() {
        let text = r#"{
            "z.last": [{"expressions": ["true"], "value": "z"}],
            "a.first": [{"expressions": ["true"], "prefix": "❌", "value": "a"}],
            "m.middle": [{"value": "m"}]
        }"#;
        let section = parse_document("bukkit", text).unwrap();
        let paths: Vec<&str> = section.nodes.iter().map(|n| n.path.as_str()).collect();
        assert_eq!(paths, vec!["z.last", "a.first", "m.middle"]);
        assert_eq!(section.nodes[1].checkers[0].prefix.as_deref(), Some("❌"));
        assert!(section.nodes[2].checkers[0].expressions.is_empty());
    }

    #[test]
    fn test_parse_document_rejects_bad_shape() {
        let err = parse_document("spigot", r#"{"node": {"value": "x"}}"#).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("spigot") && msg.contains("node"), "{}", msg);

        assert!(parse_document("spigot", "not json").is_err());
    }

    #[test]
    fn test_source_for_file() {
        assert_eq!(source_for_file("server.properties"), Some("server_properties"));
        assert_eq!(source_for_file("server_properties"), Some("server_properties"));
        assert_eq!(source_for_file("paper"), Some("paper"));
        assert_eq!(source_for_file("velocity"), None);
    }

    #[test]
    fn test_load_dir_replaces_builtin_section() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("bukkit.json"),
            r#"{"custom.node": [{"expressions": ["true"], "value": "custom"}]}"#,
        )
        .unwrap();
        fs::write(dir.path().join("velocity.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let catalog = RuleCatalog::load(Some(dir.path()), true).unwrap();
        let bukkit = catalog.section("bukkit").unwrap();
        assert_eq!(bukkit.nodes.len(), 1);
        assert_eq!(bukkit.nodes[0].path, "custom.node");
        // остальные встроенные секции на месте
        assert!(catalog.section("paper").is_some());
        assert!(catalog.section("velocity").is_none());
    }

    #[test]
    fn test_load_without_builtin() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("server.properties.json"),
            r#"{"view-distance": [{"expressions": ["true"], "value": "v"}]}"#,
        )
        .unwrap();
        let catalog = RuleCatalog::load(Some(dir.path()), false).unwrap();
        assert_eq!(catalog.sources(), vec!["server_properties"]);
        assert_eq!(catalog.checker_count(), 1);
    }

    #[test]
    fn test_load_missing_dir_fails() {
        let err = RuleCatalog::load(Some(Path::new("/definitely/not/here")), true).unwrap_err();
        assert!(matches!(err, AnalyzerError::RuleCatalog(_)));
    }
}
