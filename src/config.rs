use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const APP_NAME: &str = "ytdlp-form";
const SETTINGS_FILE: &str = "settings.toml";

/// User overrides read from `<config dir>/ytdlp-form/settings.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Explicit yt-dlp binary; otherwise it is looked up on PATH.
    pub ytdlp_path: Option<PathBuf>,
    pub probe_url: String,
    pub probe_timeout_secs: u64,
    /// `en-US` or `es-ES`. Falls back to `LANG` when unset.
    pub language: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ytdlp_path: None,
            probe_url: "http://www.google.com".to_string(),
            probe_timeout_secs: 3,
            language: None,
        }
    }
}

impl Settings {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid settings file")
    }

    /// Reads the settings file if there is one. A missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in {}", path.display()))
    }

    pub fn load() -> Self {
        let Some(path) = settings_path() else {
            return Self::default();
        };

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("ignoring settings: {err:#}");
                Self::default()
            }
        }
    }
}

pub fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME).join(SETTINGS_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let settings = Settings::from_toml("language = \"es-ES\"\nprobe_timeout_secs = 10\n").unwrap();
        assert_eq!(settings.language.as_deref(), Some("es-ES"));
        assert_eq!(settings.probe_timeout(), Duration::from_secs(10));
        assert_eq!(settings.probe_url, Settings::default().probe_url);
        assert_eq!(settings.ytdlp_path, None);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Settings::from_toml("retries = 3").is_err());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "ytdlp_path = \"/opt/bin/yt-dlp\"\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.ytdlp_path, Some(PathBuf::from("/opt/bin/yt-dlp")));
    }
}
