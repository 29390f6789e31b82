//! JSON digest of one scrape cycle.
//!
//! The digest is a snapshot for other tools to consume; it is written on
//! request and never read back.

use crate::error::ExportError;
use crate::models::{Digest, Headline};
use chrono::Local;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Wrap `headlines` in a [`Digest`] stamped with the current local time.
pub fn build_digest(headlines: &[Headline]) -> Digest {
    let now = Local::now();
    Digest {
        local_date: now.date_naive().to_string(),
        local_time: now.time().format("%H:%M:%S").to_string(),
        total: headlines.len(),
        headlines: headlines.to_vec(),
    }
}

/// Write the digest to `path`, creating parent directories as needed.
///
/// # Arguments
///
/// * `headlines` - Headlines to include, in display order
/// * `path` - Destination file; an existing file is overwritten
///
/// # Errors
///
/// Returns [`ExportError::Empty`] when there is nothing to write, and an
/// I/O or serialization error if the directory or file cannot be written.
#[instrument(level = "info", skip(headlines), fields(count = headlines.len()))]
pub async fn write_digest(headlines: &[Headline], path: &Path) -> Result<(), ExportError> {
    if headlines.is_empty() {
        return Err(ExportError::Empty);
    }

    let json = serde_json::to_string_pretty(&build_digest(headlines))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(parent).await {
            error!(dir = %parent.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }

    fs::write(path, json).await?;
    info!(path = %path.display(), "Wrote JSON digest");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ImportanceTier;

    fn headline(text: &str) -> Headline {
        Headline {
            source: "Example".to_string(),
            text: text.to_string(),
            link: String::new(),
            importance: ImportanceTier::Low,
            emoji: ImportanceTier::Low.glyph().to_string(),
            site_url: "https://example.com".to_string(),
        }
    }

    #[test]
    fn test_build_digest() {
        let digest = build_digest(&[headline("One"), headline("Two")]);
        assert_eq!(digest.total, 2);
        assert_eq!(digest.local_date.len(), 10);
        assert_eq!(digest.local_time.len(), 8);
    }

    #[tokio::test]
    async fn test_write_digest_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("digest.json");
        write_digest(&[headline("One")], &path).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let digest: Digest = serde_json::from_str(&text).unwrap();
        assert_eq!(digest.headlines[0].text, "One");
    }

    #[tokio::test]
    async fn test_write_digest_rejects_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("digest.json");
        assert!(matches!(write_digest(&[], &path).await, Err(ExportError::Empty)));
        assert!(!path.exists());
    }
}
