//! Small helpers for text truncation and output directory checks.

use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Longest headline shown in a UI row before it is cut.
pub const DISPLAY_WIDTH: usize = 110;

/// Cut `s` to at most `max` characters, ending in `...` when cut.
///
/// ```ignore
/// assert_eq!(truncate_for_display("short", 110), "short");
/// ```
pub fn truncate_for_display(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = s.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Truncate a string for logging purposes.
///
/// Long strings keep their first `max` characters followed by
/// `"…(+N bytes)"`.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Ensure the directory that will hold `file` exists and is writable.
///
/// Creates the directory if needed, then writes and removes a probe file.
///
/// # Arguments
///
/// * `file` - Output file whose directory should be checked
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not writable.
#[instrument(level = "info", skip_all, fields(file = %file.display()))]
pub async fn ensure_writable_parent(file: &Path) -> Result<(), Box<dyn Error>> {
    let dir = match file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).await?;
    let probe_path = dir.join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!(dir = %dir.display(), "Output directory is writable");
    Ok(())
}
