use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use credentialing_engine::api::{credentialing_router, with_operational_routes, AppState};
use credentialing_engine::config::AppConfig;
use credentialing_engine::credentialing::{
    evaluate_batch, BatchSummary, ComplianceReport, DocumentEvaluator, DocumentInput,
    DocumentReport, RuleCatalog, RuleEvaluator,
};
use credentialing_engine::error::AppError;
use credentialing_engine::telemetry;
use serde::Serialize;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "Credentialing Compliance Engine",
    about = "Evaluate provider credentialing documents against a compliance rule catalog",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Evaluate one document's extracted text and print the compliance report
    Evaluate(EvaluateArgs),
    /// Evaluate several documents, write per-document CSV rows to stdout and totals to stderr
    Batch(BatchArgs),
    /// Inspect rule catalogs
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },
}

#[derive(Subcommand, Debug)]
enum CatalogCommand {
    /// Load a catalog file and report whether it is valid
    Validate(CatalogValidateArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
    /// Rule catalog JSON file (defaults to CREDENTIALING_CATALOG or the built-in catalog)
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    /// File holding the extracted document text ("-" reads stdin)
    #[arg(long)]
    text: PathBuf,
    /// Rule catalog JSON file (defaults to CREDENTIALING_CATALOG or the built-in catalog)
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Print the report as JSON instead of a readable summary
    #[arg(long)]
    json: bool,
    /// Date used to flag expired credentials (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// Text files to evaluate; each file name becomes the document id
    #[arg(required = true)]
    files: Vec<PathBuf>,
    /// Rule catalog JSON file (defaults to CREDENTIALING_CATALOG or the built-in catalog)
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CatalogValidateArgs {
    /// Catalog JSON file to validate
    path: PathBuf,
}

#[derive(Debug, Serialize)]
struct BatchSummaryRow<'a> {
    document: &'a str,
    overall_score: String,
    status: &'static str,
    hard_rules_passed: usize,
    hard_rules_total: usize,
    soft_points_earned: f64,
    failed_hard_rules: String,
}

impl<'a> From<&'a DocumentReport> for BatchSummaryRow<'a> {
    fn from(entry: &'a DocumentReport) -> Self {
        let report = &entry.report;
        Self {
            document: &entry.document_id,
            overall_score: format!("{:.2}", report.overall_score),
            status: report.status.as_str(),
            hard_rules_passed: report.breakdown.hard_rules_passed,
            hard_rules_total: report.breakdown.hard_rules_total,
            soft_points_earned: report.breakdown.soft_points_earned,
            failed_hard_rules: report.failed_hard_rules().join(";"),
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Evaluate(args) => run_evaluate(args),
        Command::Batch(args) => run_batch(args),
        Command::Catalog {
            command: CatalogCommand::Validate(args),
        } => run_catalog_validate(args),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Explicit path first, then the configured path, then the built-in catalog.
fn resolve_catalog(
    explicit: Option<PathBuf>,
    config: &AppConfig,
) -> Result<RuleCatalog, AppError> {
    match explicit.or_else(|| config.catalog.path.clone()) {
        Some(path) => Ok(RuleCatalog::from_path(path)?),
        None => Ok(RuleCatalog::standard()),
    }
}

fn read_text(path: &Path) -> Result<String, AppError> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }

    Ok(std::fs::read_to_string(path)?)
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let catalog = Arc::new(resolve_catalog(args.catalog.take(), &config)?);
    info!(
        hard_rules = catalog.hard_rules().len(),
        soft_rules = catalog.soft_rules().len(),
        "rule catalog loaded"
    );
    let evaluator = Arc::new(RuleEvaluator::new(catalog));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = with_operational_routes(credentialing_router(evaluator))
        .layer(Extension(state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "credentialing engine ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        text,
        catalog,
        json,
        today,
    } = args;

    let config = AppConfig::load()?;
    let evaluator = RuleEvaluator::new(Arc::new(resolve_catalog(catalog, &config)?));
    let document = read_text(&text)?;
    let report = evaluator.evaluate(&document);

    if json {
        println!("{}", report.to_json()?);
    } else {
        let today = today.unwrap_or_else(|| Local::now().date_naive());
        render_report(&evaluator, &report, today);
    }

    Ok(())
}

fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let evaluator = RuleEvaluator::new(Arc::new(resolve_catalog(args.catalog, &config)?));

    let documents = args
        .files
        .iter()
        .map(|path| -> Result<DocumentInput, AppError> {
            Ok(DocumentInput {
                document_id: path.display().to_string(),
                text: read_text(path)?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let reports = evaluate_batch(&evaluator, &documents);

    let mut writer = csv::Writer::from_writer(std::io::stdout());
    for entry in &reports {
        writer.serialize(BatchSummaryRow::from(entry))?;
    }
    writer.flush()?;

    eprintln!("{}", BatchSummary::from_reports(&reports));

    Ok(())
}

fn run_catalog_validate(args: CatalogValidateArgs) -> Result<(), AppError> {
    let catalog = RuleCatalog::from_path(&args.path)?;
    let scoring = catalog.scoring();

    println!("Catalog {} is valid", args.path.display());
    println!(
        "- {} hard rules, {} soft rules",
        catalog.hard_rules().len(),
        catalog.soft_rules().len()
    );
    println!(
        "- weights: hard {:.1}, soft {:.1}; passing at {:.1}, conditional at {:.1}",
        scoring.hard_rules_weight,
        scoring.soft_rules_weight,
        scoring.minimum_passing_score,
        scoring.conditional_score
    );

    Ok(())
}

fn render_report(evaluator: &RuleEvaluator, report: &ComplianceReport, today: NaiveDate) {
    let catalog = evaluator.catalog();

    println!("Credentialing compliance report");
    println!("{}", report.summary());

    println!("\nHard rules");
    for (rule, evaluation) in catalog.hard_rules().iter().zip(&report.hard_rule_evaluations) {
        println!(
            "- [{}] {}: {}/{} keywords, confidence {:.2}",
            if evaluation.compliant { "pass" } else { "FAIL" },
            rule.name,
            evaluation.matched_keywords.len(),
            rule.keywords.len(),
            evaluation.confidence
        );
        for line in &evaluation.evidence {
            println!("    > {line}");
        }
    }

    println!("\nSoft rules");
    for (rule, evaluation) in catalog.soft_rules().iter().zip(&report.soft_rule_evaluations) {
        println!(
            "- [{}] {} (weight {}): {}/{} keywords, confidence {:.2}",
            if evaluation.compliant { "pass" } else { "miss" },
            rule.name,
            rule.weight,
            evaluation.matched_keywords.len(),
            rule.keywords.len(),
            evaluation.confidence
        );
    }

    if report.extracted_fields.is_empty() {
        println!("\nExtracted fields: none");
    } else {
        println!("\nExtracted fields");
        for (field, value) in report.extracted_fields.iter() {
            println!("- {}: {}", field.label(), value);
        }
    }

    if report.extracted_fields.is_expired(today) {
        println!("\nWarning: credential expired before {today}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["credentialing-engine"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn evaluate_parses_today_override() {
        let cli = Cli::try_parse_from([
            "credentialing-engine",
            "evaluate",
            "--text",
            "scan.txt",
            "--today",
            "2025-01-15",
            "--json",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Evaluate(args)) => {
                assert_eq!(args.text, PathBuf::from("scan.txt"));
                assert_eq!(args.today, NaiveDate::from_ymd_opt(2025, 1, 15));
                assert!(args.json);
            }
            other => panic!("expected evaluate command, got {other:?}"),
        }
    }

    #[test]
    fn batch_requires_at_least_one_file() {
        assert!(Cli::try_parse_from(["credentialing-engine", "batch"]).is_err());
    }

    #[test]
    fn summary_row_flattens_report() {
        let catalog = RuleCatalog::standard();
        let evaluator = RuleEvaluator::new(Arc::new(catalog));
        let entry = DocumentReport {
            document_id: "scan-1".to_string(),
            report: evaluator.evaluate(""),
        };

        let row = BatchSummaryRow::from(&entry);

        assert_eq!(row.document, "scan-1");
        assert_eq!(row.overall_score, "0.00");
        assert_eq!(row.status, "non_compliant");
        assert_eq!(row.hard_rules_passed, 0);
        assert!(row.failed_hard_rules.contains("medical_license"));
    }
}
