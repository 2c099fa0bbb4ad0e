//! Flat-file persistence for the feedback history.
//!
//! The history is serialized as a plain ordered JSON list with no schema
//! versioning. The file is rewritten after every append; reads happen once
//! at startup.

use std::path::Path;

use common::{FeedbackRecord, Result};
use tracing::{debug, info};

/// Load the full history from `path`. A missing file is a fresh start,
/// not an error.
pub fn load(path: &Path) -> Result<Vec<FeedbackRecord>> {
    if !path.exists() {
        info!(path = %path.display(), "No feedback history found, starting fresh");
        return Ok(Vec::new());
    }

    let json = std::fs::read_to_string(path)?;
    let records: Vec<FeedbackRecord> = serde_json::from_str(&json)?;
    info!(path = %path.display(), records = records.len(), "Feedback history loaded");
    Ok(records)
}

/// Write the full history to `path`, creating parent directories as
/// needed.
pub fn save(path: &Path, records: &[FeedbackRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, &json)?;
    debug!(path = %path.display(), records = records.len(), "Feedback history saved");
    Ok(())
}
