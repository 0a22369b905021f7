//! Keywords command - ranked keywords of a single PDF.

use std::path::PathBuf;

use clap::Args;

use doubt_core::{AnalysisResult, AnalysisSession, FrequencyEntry, Operation};

use super::{load_config, upload_file};

/// Arguments for the keywords command.
#[derive(Args)]
pub struct KeywordsArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: KeywordFormat,

    /// Maximum number of keywords
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Number of leading pages to scan
    #[arg(long)]
    pages: Option<u32>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum KeywordFormat {
    /// One "token (count)" per line
    Text,
    /// JSON array
    Json,
    /// CSV with token and count columns
    Csv,
}

pub async fn run(args: KeywordsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(limit) = args.limit {
        config.analysis.keyword_limit = limit;
    }
    if let Some(pages) = args.pages {
        config.analysis.keyword_pages = pages;
    }

    let mut session = AnalysisSession::new(config);
    upload_file(&mut session, &args.input)?;

    let Some(ticket) = session.launch(Operation::Keywords) else {
        anyhow::bail!("No document loaded");
    };
    let completion = tokio::task::spawn_blocking(move || ticket.run()).await?;
    session.complete(completion);

    match session.result(Operation::Keywords) {
        Some(AnalysisResult::Keywords { entries }) => {
            print!("{}", format_keywords(entries, args.format)?);
            Ok(())
        }
        Some(AnalysisResult::Failure(failure)) => anyhow::bail!("{}", failure),
        _ => anyhow::bail!("Keyword extraction produced no result"),
    }
}

pub fn format_keywords(entries: &[FrequencyEntry], format: KeywordFormat) -> anyhow::Result<String> {
    match format {
        KeywordFormat::Text => Ok(entries.iter().map(|e| format!("{}\n", e)).collect()),
        KeywordFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(entries)?)),
        KeywordFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(["token", "count"])?;
            for entry in entries {
                let count = entry.count.to_string();
                wtr.write_record([entry.token.as_str(), count.as_str()])?;
            }
            Ok(String::from_utf8(wtr.into_inner()?)?)
        }
    }
}
