use std::path::PathBuf;

use serde::Deserialize;

/// On-disk shape of the config file.
#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    pub version: u32,
    pub site: SiteSection,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct SiteSection {
    /// Folder of source notes. Read-only for every part of this tool.
    pub zettelkasten_path: String,
    /// Output folder for the generated site.
    pub site_path: String,
    pub site_title: String,
    #[serde(default)]
    pub copyright_text: String,
    /// Strip tags from published copies of the notes.
    #[serde(default)]
    pub hide_tags: bool,
    /// Omit creation dates from the chronological index.
    #[serde(default)]
    pub hide_chrono_index_dates: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file_level: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), file_level: None, file: None }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Fully resolved configuration handed to the pipeline.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub zettelkasten_path: PathBuf,
    pub site_path: PathBuf,
    pub site_title: String,
    pub copyright_text: String,
    pub hide_tags: bool,
    pub hide_chrono_index_dates: bool,
    pub logging: LoggingConfig,
}
