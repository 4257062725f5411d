use anyhow::Result;
use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use crate::contact::DEFAULT_CONTACT_FORM_URL;
use crate::export::ExportFormat;
use crate::loader::DEFAULT_SAMPLE_DELAY;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub theme: Theme,
    pub default_export_format: ExportFormat,
    pub export_dir: Option<String>,
    pub contact_form_url: String,
    /// Appended verbatim to the contact form URL, e.g. `?utm_source=expo`.
    pub contact_query: String,
    pub sample_delay_ms: u64,
    pub cjk_font_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Theme {
    Light,
    Dark,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            default_export_format: ExportFormat::Spreadsheet,
            export_dir: None,
            contact_form_url: DEFAULT_CONTACT_FORM_URL.to_string(),
            contact_query: String::new(),
            sample_delay_ms: DEFAULT_SAMPLE_DELAY.as_millis() as u64,
            cjk_font_path: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;

        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("jp", "shokunin-san", "green-nh3-registry")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(proj_dirs.config_dir().join("config.json"))
    }

    pub fn sample_delay(&self) -> Duration {
        Duration::from_millis(self.sample_delay_ms)
    }

    /// Configured export directory, else the user's downloads, else the working directory.
    pub fn export_dir(&self) -> PathBuf {
        if let Some(dir) = &self.export_dir {
            return PathBuf::from(dir);
        }

        UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.contact_form_url.starts_with("https://") && !self.contact_form_url.starts_with("http://") {
            errors.push("Contact form URL must start with http:// or https://".to_string());
        }

        if !self.contact_query.is_empty() && !self.contact_query.starts_with('?') {
            errors.push("Contact query must be empty or start with '?'".to_string());
        }

        if let Some(dir) = &self.export_dir {
            if dir.trim().is_empty() {
                errors.push("Export directory must not be blank".to_string());
            }
        }

        if let Some(font) = &self.cjk_font_path {
            if !Path::new(font).is_file() {
                errors.push(format!("CJK font not found: {}", font));
            }
        }

        errors
    }
}
