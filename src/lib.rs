use chrono::Local;
use std::sync::Arc;
use std::time::Duration;

pub use mcdev_core::{error, i18n, types};

pub mod analysis;
pub mod output;
pub mod paths;
pub mod settings;
pub mod spark;

use analysis::{AnalysisReport, RuleCatalog};
use error::{AnalyzerError, Result};
use mcdev_expr::ExpressionEvaluator;
use settings::Settings;
use spark::ReportSource;

/// User-Agent для запросов к viewer spark
pub const USER_AGENT: &str = concat!("mcdev/", env!("CARGO_PKG_VERSION"));

/// Уровень логов по количеству `-v`
pub fn log_level(verbosity: u8) -> log::LevelFilter {
    match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

/// Логи в stderr, stdout остаётся под отчёт
pub fn init_logger(verbosity: u8) {
    let logger = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log_level(verbosity))
        .level_for("hyper", log::LevelFilter::Warn)
        .level_for("hyper_util", log::LevelFilter::Warn)
        .level_for("reqwest", log::LevelFilter::Warn)
        .chain(std::io::stderr());

    if let Err(e) = logger.apply() {
        eprintln!("Failed to initialize logger: {}", e);
    }
}

/// Каталог правил по настройкам; без пользовательской директории
/// используется общий встроенный каталог
pub fn load_catalog(settings: &Settings) -> Result<Arc<RuleCatalog>> {
    match (&settings.rules_dir, settings.include_builtin_rules) {
        (None, true) => Ok(RuleCatalog::builtin()),
        (dir, include_builtin) => Ok(Arc::new(RuleCatalog::load(
            dir.as_deref(),
            include_builtin,
        )?)),
    }
}

/// Загрузить отчёт и проанализировать его, всё в пределах `analysis_timeout_secs`
pub async fn run_analysis(
    source: &ReportSource,
    catalog: &RuleCatalog,
    evaluator: &dyn ExpressionEvaluator,
    settings: &Settings,
) -> Result<AnalysisReport> {
    let timeout_secs = settings.analysis_timeout_secs;
    let run = async {
        let report = source.load(settings.request_timeout_secs).await?;
        let findings = analysis::analyze(&report, catalog, evaluator, settings.language).await;
        Ok::<_, AnalyzerError>(AnalysisReport::build(source.id(), &report, findings))
    };

    match tokio::time::timeout(Duration::from_secs(timeout_secs), run).await {
        Ok(result) => result,
        Err(_) => {
            log::error!("Analysis timed out after {}s", timeout_secs);
            Err(AnalyzerError::Timeout(timeout_secs))
        }
    }
}
