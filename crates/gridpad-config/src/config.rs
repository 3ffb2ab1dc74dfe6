//! Editor configuration: load, save and sanitize.
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// File name of the configuration, next to the executable.
pub const CONFIG_FILE_NAME: &str = "gridpad.json";

/// Persisted editor settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Window width in character cells.
    pub columns: usize,
    /// Window height in character cells.
    pub rows: usize,
    pub word_wrap: bool,
    /// When off, navigation keys scroll the view and editing is disabled.
    pub caret_enabled: bool,
    /// Glyph cell size in pixels, used to place the caret widget.
    pub glyph_width: usize,
    pub glyph_height: usize,
    /// Upper bound for the text store in bytes. 0 = unlimited.
    pub max_document_bytes: usize,
    /// Rows that stay visible across a page up/down.
    pub page_overlap: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            columns: 80,
            rows: 24,
            word_wrap: false,
            caret_enabled: true,
            glyph_width: 8,
            glyph_height: 16,
            max_document_bytes: 0,
            page_overlap: 1,
        }
    }
}

impl EditorConfig {
    /// Returns the config file path: exe directory + `gridpad.json`.
    pub fn config_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|d| d.join(CONFIG_FILE_NAME)))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }

    /// Loads config from `path`, creating a default file if it doesn't exist.
    /// Returns defaults on any error (unreadable file, parse error, etc.).
    pub fn load_or_create(path: &Path) -> Self {
        if path.exists() {
            match Self::load(path) {
                Ok(mut config) => {
                    config.sanitize();
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load config at {}: {e:#}", path.display());
                }
            }
            // Keep the broken file for the user to fix
            let mut config = Self::default();
            config.sanitize();
            config
        } else {
            let config = Self::default();
            if let Err(e) = config.save(path) {
                tracing::warn!("Failed to create default config at {}: {e:#}", path.display());
            }
            config
        }
    }

    fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
    }

    /// Saves config to `path` as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self).context("serializing config")?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
    }

    /// Store limit as an option; `None` means unlimited.
    pub fn document_limit(&self) -> Option<usize> {
        (self.max_document_bytes > 0).then_some(self.max_document_bytes)
    }

    /// Clamps values to valid ranges.
    pub fn sanitize(&mut self) {
        self.columns = self.columns.max(1);
        self.rows = self.rows.max(1);
        self.glyph_width = self.glyph_width.max(1);
        self.glyph_height = self.glyph_height.max(1);
        self.page_overlap = self.page_overlap.min(self.rows - 1);
    }
}
