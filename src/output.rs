//! Вывод результатов анализа

use std::fmt::Write;

use crate::analysis::AnalysisReport;
use crate::error::Result;
use crate::i18n::Language;

/// Текстовый отчёт: заголовок и по блоку на каждую карточку
pub fn render_text(report: &AnalysisReport, lang: Language) -> String {
    let (title, platform, user) = match lang {
        Language::Chinese => ("Spark 分析", "平台", "上传者"),
        Language::English => ("Spark analysis", "Platform", "Uploaded by"),
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}: {}", title, report.id);
    if !report.platform.is_empty() {
        let _ = writeln!(out, "{}: {}", platform, report.platform);
    }
    if !report.user.is_empty() {
        let _ = writeln!(out, "{}: {}", user, report.user);
    }

    for finding in &report.findings {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", finding.name);
        for line in finding.value.lines() {
            let _ = writeln!(out, "    {}", line);
        }
    }
    out
}

pub fn render_json(report: &AnalysisReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
