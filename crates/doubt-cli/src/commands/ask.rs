//! Ask command - answer a question about a PDF.

use std::path::PathBuf;

use clap::Args;
use console::style;

use doubt_core::AnalysisSession;

use super::analyze::run_concurrently;
use super::{load_config, upload_file};

/// Arguments for the ask command.
#[derive(Args)]
pub struct AskArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Question to ask
    question: String,
}

pub async fn run(args: AskArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let mut session = AnalysisSession::new(config);
    upload_file(&mut session, &args.input)?;
    run_concurrently(&mut session).await?;

    match session.ask(&args.question) {
        Some(answer) => println!("{}", answer),
        None => eprintln!("{} Nothing to answer: the question is empty.", style("ℹ").blue()),
    }

    Ok(())
}
