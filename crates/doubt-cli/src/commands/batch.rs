//! Batch processing command for multiple PDF files.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use doubt_core::{AnalysisReport, AnalysisResult, AnalysisSession, Operation};

use super::analyze::{OutputFormat, format_report, run_concurrently};
use super::{load_config, upload_file};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    report: Option<AnalysisReport>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            ext.eq_ignore_ascii_case("pdf")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    // One session for the whole batch; every upload resets the previous results
    let mut session = AnalysisSession::new(config);
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let outcome = process_single_file(&mut session, &path).await;
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match outcome {
            Ok(report) => {
                let error = first_failure(&report);
                if let Some(msg) = &error {
                    warn!("Analysis of {} failed: {}", path.display(), msg);
                }
                results.push(ProcessResult {
                    path,
                    report: Some(report),
                    error,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        report: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    if let Some(output_dir) = &args.output_dir {
        let extension = match args.format {
            OutputFormat::Json => "json",
            OutputFormat::Text => "txt",
        };

        for result in &results {
            if let Some(report) = &result.report {
                let output_name = result
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("document");
                let output_path = output_dir.join(format!("{}.{}", output_name, extension));
                fs::write(&output_path, format_report(report, args.format)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

async fn process_single_file(
    session: &mut AnalysisSession,
    path: &PathBuf,
) -> anyhow::Result<AnalysisReport> {
    upload_file(session, path)?;
    run_concurrently(session).await?;
    Ok(session.report())
}

fn first_failure(report: &AnalysisReport) -> Option<String> {
    Operation::ALL
        .into_iter()
        .filter_map(|op| report.slot(op).and_then(AnalysisResult::as_failure))
        .map(|failure| failure.message.clone())
        .next()
}

fn write_summary(path: &PathBuf, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "pages",
        "keywords",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result.path.file_name().and_then(|s| s.to_str()).unwrap_or("");
        let status = if result.error.is_some() { "error" } else { "success" };

        let (pages, keywords) = match &result.report {
            Some(report) => summary_columns(report),
            None => (String::new(), String::new()),
        };

        let elapsed = result.processing_time_ms.to_string();

        wtr.write_record([
            filename,
            status,
            pages.as_str(),
            keywords.as_str(),
            elapsed.as_str(),
            result.error.as_deref().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

fn summary_columns(report: &AnalysisReport) -> (String, String) {
    let pages = match report.slot(Operation::PageCount) {
        Some(AnalysisResult::PageCount { pages }) => pages.to_string(),
        _ => String::new(),
    };
    let keywords = match report.slot(Operation::Keywords) {
        Some(result @ AnalysisResult::Keywords { .. }) => result.display_lines().join("; "),
        _ => String::new(),
    };
    (pages, keywords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use doubt_core::{ErrorKind, FrequencyEntry};

    #[test]
    fn test_summary_columns() {
        let report = AnalysisReport {
            page_count: Some(AnalysisResult::PageCount { pages: 4 }),
            keywords: Some(AnalysisResult::Keywords {
                entries: vec![FrequencyEntry::new("rust", 2), FrequencyEntry::new("crate", 1)],
            }),
            ..AnalysisReport::default()
        };
        assert_eq!(
            summary_columns(&report),
            ("4".to_string(), "rust (2); crate (1)".to_string())
        );
    }

    #[test]
    fn test_first_failure() {
        let report = AnalysisReport {
            page_count: Some(AnalysisResult::PageCount { pages: 1 }),
            preview: Some(AnalysisResult::failure(ErrorKind::PageOutOfRange, "no first page")),
            ..AnalysisReport::default()
        };
        assert_eq!(first_failure(&report).as_deref(), Some("no first page"));
        assert_eq!(first_failure(&AnalysisReport::default()), None);
    }
}
