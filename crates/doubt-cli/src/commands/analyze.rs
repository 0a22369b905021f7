//! Analyze command - page count, preview and keywords of a single PDF.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use doubt_core::models::config::MarkerPolicy;
use doubt_core::{AnalysisReport, AnalysisResult, AnalysisSession, Operation};

use super::{load_config, upload_file};

/// Arguments for the analyze command.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Only append the preview marker when the preview was cut
    #[arg(long)]
    marker_when_truncated: bool,

    /// Question to answer alongside the analysis
    #[arg(short, long)]
    question: Option<String>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

pub async fn run(args: AnalyzeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if args.marker_when_truncated {
        config.analysis.marker_policy = MarkerPolicy::WhenTruncated;
    }

    info!("Analyzing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.set_message("Loading PDF...");

    let mut session = AnalysisSession::new(config);
    upload_file(&mut session, &args.input)?;

    pb.set_message("Analyzing...");
    run_concurrently(&mut session).await?;

    if let Some(question) = &args.question {
        session.ask(question);
    }

    pb.finish_and_clear();

    let report = session.report();
    let output = format_report(&report, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total analysis time: {:?}", start.elapsed());

    Ok(())
}

/// Run every analysis of the current upload on the blocking pool.
pub async fn run_concurrently(session: &mut AnalysisSession) -> anyhow::Result<()> {
    let handles: Vec<_> = session
        .launch_all()
        .into_iter()
        .map(|ticket| tokio::task::spawn_blocking(move || ticket.run()))
        .collect();

    for handle in handles {
        let completion = handle.await?;
        session.complete(completion);
    }
    Ok(())
}

pub fn format_report(report: &AnalysisReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Text => Ok(format_text(report)),
    }
}

/// Render the report as a plain text summary.
pub fn format_text(report: &AnalysisReport) -> String {
    let mut output = String::new();

    if let Some(name) = &report.document {
        output.push_str(&format!("Document: {}\n", name));
    }

    output.push_str(&format!("Pages: {}\n", slot_text(report.slot(Operation::PageCount))));
    output.push('\n');

    output.push_str("Preview:\n");
    output.push_str(&format!("  {}\n", slot_text(report.slot(Operation::Preview))));
    output.push('\n');

    output.push_str("Keywords:\n");
    match report.slot(Operation::Keywords) {
        Some(AnalysisResult::Keywords { entries }) if entries.is_empty() => {
            output.push_str("  (none found)\n");
        }
        Some(failure @ AnalysisResult::Failure(_)) => {
            output.push_str(&format!("  {}\n", slot_text(Some(failure))));
        }
        Some(result) => {
            for line in result.display_lines() {
                output.push_str(&format!("  {}\n", line));
            }
        }
        None => output.push_str("  -\n"),
    }

    if let Some(answer) = &report.answer {
        output.push_str(&format!("\nAnswer:\n  {}\n", answer));
    }

    output
}

fn slot_text(result: Option<&AnalysisResult>) -> String {
    match result {
        Some(AnalysisResult::Failure(failure)) => format!("error: {}", failure),
        Some(result) => result.display_lines().join(" "),
        None => "-".to_string(),
    }
}
