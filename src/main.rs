use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use mcdev_expr::JexlEvaluator;
use mcdev_lib::analysis::RuleCatalog;
use mcdev_lib::error::AnalyzerError;
use mcdev_lib::i18n::Language;
use mcdev_lib::output::{render_json, render_text};
use mcdev_lib::settings::Settings;
use mcdev_lib::spark::ReportSource;
use mcdev_lib::types::OutputFormat;

#[derive(Parser)]
#[command(
    name = "mcdev",
    version,
    about = "Analyze spark reports for Minecraft server misconfiguration",
    after_help = "Examples:\n  mcdev https://spark.lucko.me/abc123\n  mcdev report.json --format json --lang en\n  mcdev rules --rules ./my-rules",
    arg_required_else_help = true
)]
struct Cli {
    /// spark report URL (https://spark...) or path to a raw report JSON file
    report: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(long, global = true, help = "Output format: text|json")]
    format: Option<String>,

    #[arg(long, global = true, help = "Directory with rule documents (<source>.json)")]
    rules: Option<PathBuf>,

    #[arg(long, global = true, action = clap::ArgAction::SetTrue, help = "Do not load built-in rules")]
    no_builtin: bool,

    #[arg(long, global = true, help = "Message language: zh|en")]
    lang: Option<String>,

    #[arg(long, global = true, help = "Timeout for the whole analysis, seconds")]
    timeout: Option<u64>,

    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "More logs (-v, -vv, -vvv)")]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// List loaded rule sections
    Rules,
}

/// Настройки из файла, поверх них флаги командной строки
fn resolve_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let mut settings = Settings::load().context("Failed to load settings")?;

    if let Some(lang) = &cli.lang {
        settings.language = lang
            .parse::<Language>()
            .map_err(|e| anyhow::anyhow!(e))
            .context("Invalid --lang")?;
    }
    if let Some(format) = &cli.format {
        settings.output = OutputFormat::parse(format)
            .ok_or_else(|| anyhow::anyhow!("Unknown output format: {}", format))?;
    }
    if let Some(dir) = &cli.rules {
        settings.rules_dir = Some(dir.clone());
    }
    if cli.no_builtin {
        settings.include_builtin_rules = false;
    }
    if let Some(secs) = cli.timeout {
        settings.analysis_timeout_secs = secs;
    }
    Ok(settings)
}

fn print_rules(catalog: &RuleCatalog) {
    for source in catalog.sources() {
        if let Some(section) = catalog.section(source) {
            println!(
                "{:<18} {:>3} nodes {:>3} checkers",
                source,
                section.nodes.len(),
                section.checker_count()
            );
        }
    }
    println!("total: {} checkers", catalog.checker_count());
}

async fn run(cli: &Cli, settings: &Settings) -> anyhow::Result<()> {
    let catalog = mcdev_lib::load_catalog(settings).context("Failed to load rules")?;

    if let Some(Commands::Rules) = cli.command {
        print_rules(&catalog);
        return Ok(());
    }

    let input = cli
        .report
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("No report URL or file given"))?;
    let source = ReportSource::parse(input);
    if let ReportSource::Url(url) = &source {
        mcdev_lib::spark::validate_report_url(url)?;
    }

    let evaluator = JexlEvaluator::new();
    let report = mcdev_lib::run_analysis(&source, &catalog, &evaluator, settings).await?;

    let rendered = match settings.output {
        OutputFormat::Text => render_text(&report, settings.language),
        OutputFormat::Json => render_json(&report)?,
    };
    print!("{}", rendered);
    Ok(())
}

fn print_error(err: &anyhow::Error, lang: Language) {
    match err.chain().find_map(|e| e.downcast_ref::<AnalyzerError>()) {
        Some(analyzer_err) => {
            let info = analyzer_err.localized_error_info(lang);
            eprintln!("[{}] {}", info.code, info.message);
            if let Some(hint) = info.recovery_hint {
                eprintln!("  {}", hint);
            }
            log::debug!("{:#}", err);
        }
        None => eprintln!("Error: {:#}", err),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    mcdev_lib::init_logger(cli.verbose);

    let settings = match resolve_settings(&cli) {
        Ok(s) => s,
        Err(e) => {
            print_error(&e, Language::default());
            return ExitCode::FAILURE;
        }
    };

    match run(&cli, &settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e, settings.language);
            ExitCode::FAILURE
        }
    }
}
