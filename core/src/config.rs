use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::clipboard::DEFAULT_PAYLOAD_TAG;
use crate::error::{Result, SnapshotError};

/// Top-level configuration loaded from `snapclip.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotConfig {
    #[serde(default)]
    pub clipboard: ClipboardConfig,
    #[serde(default)]
    pub codec: CodecConfig,
}

/// Clipboard adapter settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipboardConfig {
    /// Tag that marks our payloads on the transport.
    #[serde(default = "default_payload_tag")]
    pub payload_tag: String,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            payload_tag: default_payload_tag(),
        }
    }
}

fn default_payload_tag() -> String {
    DEFAULT_PAYLOAD_TAG.into()
}

/// Serialization format of snapshot blobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecFormat {
    /// Human-readable RON.
    #[default]
    Ron,
    /// Compact binary.
    Bincode,
}

/// Snapshot codec settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    #[serde(default)]
    pub format: CodecFormat,
    /// Pretty-print text formats. Ignored for binary formats.
    #[serde(default)]
    pub pretty: bool,
}

/// Load a config from a TOML file.
pub fn load_config(path: &Path) -> Result<SnapshotConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| SnapshotError::Config(format!("failed to read {}: {e}", path.display())))?;
    toml::from_str(&content)
        .map_err(|e| SnapshotError::Config(format!("failed to parse {}: {e}", path.display())))
}

/// Load a config, falling back to defaults if the file is missing or invalid.
pub fn load_or_default(path: &Path) -> SnapshotConfig {
    match load_config(path) {
        Ok(config) => {
            log::info!(
                "Loaded snapshot config: {:?} codec, tag {}",
                config.codec.format,
                config.clipboard.payload_tag
            );
            config
        }
        Err(e) => {
            log::warn!("No snapshot config ({e}), using defaults");
            SnapshotConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn full_config() {
        let file = write_config(
            r#"
            [clipboard]
            payload_tag = "application/x-test"

            [codec]
            format = "bincode"
            pretty = true
            "#,
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.clipboard.payload_tag, "application/x-test");
        assert_eq!(config.codec.format, CodecFormat::Bincode);
        assert!(config.codec.pretty);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let file = write_config("[codec]\npretty = true\n");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.clipboard.payload_tag, DEFAULT_PAYLOAD_TAG);
        assert_eq!(config.codec.format, CodecFormat::Ron);
    }

    #[test]
    fn unknown_format_is_config_error() {
        let file = write_config("[codec]\nformat = \"xml\"\n");
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, SnapshotError::Config(_)));
    }

    #[test]
    fn missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_or_default(&dir.path().join("snapclip.toml"));
        assert_eq!(config, SnapshotConfig::default());
    }
}
