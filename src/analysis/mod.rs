//! Анализ отчёта spark: правила конфигурации + эвристика GC

pub mod catalog;
pub mod evaluator;
pub mod gc;
pub mod normalizer;

pub use catalog::{Checker, RuleCatalog, RuleNode, RuleSection};
pub use evaluator::evaluate_rules;
pub use normalizer::{normalize, Namespace, Normalized, SourceParseError};

use mcdev_expr::ExpressionEvaluator;
use serde::Serialize;

use crate::i18n::Language;
use crate::spark::SparkReport;
use crate::types::Finding;

/// Итоговый отчёт для вывода
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub id: String,
    pub platform: String,
    pub user: String,
    pub findings: Vec<Finding>,
}

impl AnalysisReport {
    pub fn build(id: impl Into<String>, report: &SparkReport, findings: Vec<Finding>) -> Self {
        Self {
            id: id.into(),
            platform: report.platform_version().to_string(),
            user: report.user_name().to_string(),
            findings,
        }
    }
}

async fn analyze_configs(
    report: &SparkReport,
    catalog: &RuleCatalog,
    evaluator: &dyn ExpressionEvaluator,
) -> Vec<Finding> {
    let Some(configs) = report.server_configurations() else {
        log::debug!("Report has no server configurations");
        return Vec::new();
    };

    let normalized = normalize(configs);
    let mut findings = evaluate_rules(&normalized.namespace, catalog, evaluator).await;
    findings.extend(
        normalized
            .errors
            .iter()
            .map(|e| Finding::diagnostic(&e.report_key, &e.message)),
    );
    findings
}

async fn analyze_gc(report: &SparkReport, lang: Language) -> Finding {
    gc::classify(
        report.vm_args(),
        report.is_server(),
        report.java_major_version(),
        lang,
    )
}

/// Полный анализ: карточка GC всегда первая, затем правила и ошибки разбора
pub async fn analyze(
    report: &SparkReport,
    catalog: &RuleCatalog,
    evaluator: &dyn ExpressionEvaluator,
    lang: Language,
) -> Vec<Finding> {
    let (gc_finding, config_findings) = tokio::join!(
        analyze_gc(report, lang),
        analyze_configs(report, catalog, evaluator)
    );

    let mut findings = Vec::with_capacity(config_findings.len() + 1);
    findings.push(gc_finding);
    findings.extend(config_findings);
    log::info!("Analysis finished: {} findings", findings.len());
    findings
}
