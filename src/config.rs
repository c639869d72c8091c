//! Run configuration.

use std::path::{Path, PathBuf};

/// File name of the generated brief.
pub const DEFAULT_FILE_NAME: &str = "Propwell_AMP_Weekly_Brief_02.23.26.pdf";

/// Settings for one generation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BriefConfig {
    /// Where the PDF is written.  Existing files are overwritten.
    pub output: PathBuf,
    /// Directory searched for fonts before the built-in candidates.
    pub fonts_dir: Option<PathBuf>,
    /// Add a bookmark outline of the section headings.
    pub bookmarks: bool,
}

impl BriefConfig {
    /// Configuration writing to `output` with every other setting at its default.
    pub fn with_output(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            ..Self::default()
        }
    }

    /// Sets the font directory.
    pub fn fonts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fonts_dir = Some(dir.into());
        self
    }

    /// Enables or disables bookmarks.
    pub fn bookmarks(mut self, enabled: bool) -> Self {
        self.bookmarks = enabled;
        self
    }

    /// The font directory as a path, if one was configured.
    pub fn fonts_dir_path(&self) -> Option<&Path> {
        self.fonts_dir.as_deref()
    }
}

/// `~/Downloads/<DEFAULT_FILE_NAME>`, falling back to the working directory when the home
/// directory is unknown.
pub fn default_output_path() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join("Downloads").join(DEFAULT_FILE_NAME),
        None => {
            log::warn!("home directory unknown; writing {} to the working directory", DEFAULT_FILE_NAME);
            PathBuf::from(DEFAULT_FILE_NAME)
        }
    }
}

impl Default for BriefConfig {
    fn default() -> Self {
        Self {
            output: default_output_path(),
            fonts_dir: None,
            bookmarks: false,
        }
    }
}
