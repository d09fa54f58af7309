//! Custom background image storage.
//!
//! At most one custom background exists at a time, stored as
//! `custom_background.<ext>` under the upload directory; saving a new image
//! removes the previous one first.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::fs;

/// Image extensions accepted for upload.
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Base filename (without extension) of the stored background.
const CUSTOM_BG_STEM: &str = "custom_background";

/// Extract the extension from an uploaded filename if it is allowed.
///
/// Returns the lowercased extension, or `None` for disallowed or missing
/// extensions.
pub fn allowed_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// File store for the single custom background image.
#[derive(Debug, Clone)]
pub struct BackgroundStore {
    dir: PathBuf,
}

impl BackgroundStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Create the upload directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create upload dir: {}", self.dir.display()))
    }

    /// Full path of a stored file by name.
    pub fn path_of(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    /// Filename of the current custom background, if one exists.
    pub async fn current(&self) -> Option<String> {
        for ext in ALLOWED_EXTENSIONS {
            let filename = format!("{}.{}", CUSTOM_BG_STEM, ext);
            if fs::try_exists(self.dir.join(&filename)).await.unwrap_or(false) {
                return Some(filename);
            }
        }
        None
    }

    /// Store a new background, replacing any previous one. Returns the
    /// filename it was stored under.
    pub async fn save(&self, ext: &str, data: &[u8]) -> Result<String> {
        self.ensure_dir().await?;

        if let Some(old) = self.current().await {
            fs::remove_file(self.dir.join(&old))
                .await
                .with_context(|| format!("Failed to remove previous background: {}", old))?;
        }

        let filename = format!("{}.{}", CUSTOM_BG_STEM, ext);
        fs::write(self.dir.join(&filename), data)
            .await
            .with_context(|| format!("Failed to write background: {}", filename))?;

        Ok(filename)
    }

    /// Delete the current background. Returns `false` when there was none.
    pub async fn remove(&self) -> Result<bool> {
        match self.current().await {
            Some(filename) => {
                fs::remove_file(self.dir.join(&filename))
                    .await
                    .with_context(|| format!("Failed to remove background: {}", filename))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
