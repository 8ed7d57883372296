//! Вычисление правил каталога над пространством имён
//!
//! Все выражения запускаются одновременно, но результат собирается строго в
//! порядке каталога: источник -> узел -> checker -> выражение.

use futures::future::join_all;
use mcdev_expr::{is_truthy, ExprError, ExpressionEvaluator};

use super::catalog::{Checker, RuleCatalog};
use super::normalizer::Namespace;
use crate::types::Finding;

/// Итог одного checker'а после завершения всех его выражений
struct CheckerOutcome {
    matched: bool,
    errors: Vec<ExprError>,
}

async fn run_checker(
    checker: &Checker,
    namespace: &Namespace,
    evaluator: &dyn ExpressionEvaluator,
) -> CheckerOutcome {
    // Сначала дожидаемся всех результатов, только потом AND
    let results = join_all(
        checker
            .expressions
            .iter()
            .map(|expr| evaluator.evaluate(expr, namespace)),
    )
    .await;

    let mut matched = true;
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(value) => matched &= is_truthy(&value),
            Err(e) => {
                matched = false;
                errors.push(e);
            }
        }
    }
    CheckerOutcome { matched, errors }
}

fn finding_name(prefix: Option<&str>, path: &str) -> String {
    match prefix {
        Some(p) if !p.is_empty() => format!("{} {}", p, path),
        _ => path.to_string(),
    }
}

/// Вычислить все правила для источников, присутствующих в `namespace`
pub async fn evaluate_rules(
    namespace: &Namespace,
    catalog: &RuleCatalog,
    evaluator: &dyn ExpressionEvaluator,
) -> Vec<Finding> {
    let mut pending = Vec::new();
    for source in namespace.keys() {
        let Some(section) = catalog.section(source) else {
            log::debug!("No rules for source {}, skipping", source);
            continue;
        };
        for node in &section.nodes {
            for checker in &node.checkers {
                pending.push((node.path.as_str(), checker));
            }
        }
    }

    let outcomes = join_all(
        pending
            .iter()
            .map(|(_, checker)| run_checker(checker, namespace, evaluator)),
    )
    .await;

    let mut findings = Vec::new();
    for ((path, checker), outcome) in pending.iter().zip(outcomes) {
        for err in &outcome.errors {
            log::warn!("Rule {} failed: {}", path, err);
            findings.push(Finding::diagnostic(path, err));
        }
        if outcome.matched {
            findings.push(Finding::new(
                finding_name(checker.prefix.as_deref(), path),
                checker.value.clone(),
            ));
        }
    }

    log::debug!(
        "Evaluated {} checkers, {} findings",
        pending.len(),
        findings.len()
    );
    findings
}
