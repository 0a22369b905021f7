//! Subcommands and the helpers they share.

pub mod analyze;
pub mod ask;
pub mod batch;
pub mod config;
pub mod keywords;

use std::fs;
use std::path::{Path, PathBuf};

use doubt_core::{AnalysisSession, DoubtConfig, PDF_MEDIA_TYPE};
use tracing::debug;

/// Load configuration from an explicit path, the default location, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<DoubtConfig> {
    if let Some(path) = config_path {
        return Ok(DoubtConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        Ok(DoubtConfig::from_file(&default_path)?)
    } else {
        Ok(DoubtConfig::default())
    }
}

/// Guess a media type from the file extension.
pub fn media_type_for(path: &Path) -> String {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "pdf" => PDF_MEDIA_TYPE,
        "txt" => "text/plain",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
    .to_string()
}

/// Read a file and make it the session's current upload.
pub fn upload_file(session: &mut AnalysisSession, path: &PathBuf) -> anyhow::Result<()> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    let data = fs::read(path)?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document")
        .to_string();

    session
        .upload(name, media_type_for(path), data)
        .map_err(|failure| anyhow::anyhow!("{}: {}", path.display(), failure))?;
    Ok(())
}
