//! Editor configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sanitize::AllowList;
use crate::schedule::Time;

/// Font family given to monospace carriers on the live surface.
pub const DEFAULT_CODE_FONT_FAMILY: &str = r#"Monaco, Consolas, "Lucida Console", monospace"#;

/// Options for one editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Allow Enter to split blocks. Single-line editors swallow it.
    pub multiline: bool,
    /// Offer formatting commands and produce semantic markup. When off the
    /// content is plain text.
    pub enable_formatting: bool,
    pub placeholder_text: String,
    /// Show the placeholder instead of focusing the surface on activation.
    pub start_empty: bool,
    pub code_font_family: String,
    /// Quiet period before a "changed" notification fires.
    pub change_debounce: Time,
    /// Time given to the host to deliver pasted content.
    pub paste_grace: Time,
    pub allow_list: AllowList,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            multiline: true,
            enable_formatting: true,
            placeholder_text: "Enter Text".to_string(),
            start_empty: false,
            code_font_family: DEFAULT_CODE_FONT_FAMILY.to_string(),
            change_debounce: 200,
            paste_grace: 10,
            allow_list: AllowList::default(),
        }
    }
}

impl EditorConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EditorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        tracing::debug!(target: "markwell::config", path = %path.display(), "loading config");
        Self::from_json_str(&content)
    }

    fn validate(&self) -> Result<()> {
        if self.change_debounce == 0 {
            return Err(Error::Config("change_debounce must be positive".into()));
        }
        if self.code_font_family.trim().is_empty() {
            return Err(Error::Config("code_font_family must not be empty".into()));
        }
        Ok(())
    }
}
