use std::path::{Path, PathBuf};
use std::{env, fs};

use dirs::home_dir;
use shellexpand::full;
use thiserror::Error;

use super::types::{ConfigFile, SiteConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found at {0}")]
    NotFound(String),

    #[error("failed to read config file {0}: {1}")]
    ReadError(String, #[source] std::io::Error),

    #[error("failed to parse TOML in {0}: {1}")]
    ParseError(String, #[source] toml::de::Error),

    #[error("version {0} is unsupported (expected 1)")]
    BadVersion(u32),

    #[error("home directory not available to expand '~'")]
    NoHome,
}

pub fn load(config_path: Option<&Path>) -> Result<SiteConfig, ConfigError> {
    let path = match config_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path(),
    };

    if !path.exists() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }

    let s = fs::read_to_string(&path)
        .map_err(|e| ConfigError::ReadError(path.display().to_string(), e))?;

    let cf: ConfigFile = toml::from_str(&s)
        .map_err(|e| ConfigError::ParseError(path.display().to_string(), e))?;

    if cf.version != 1 {
        return Err(ConfigError::BadVersion(cf.version));
    }

    Ok(SiteConfig {
        zettelkasten_path: expand_path(&cf.site.zettelkasten_path)?,
        site_path: expand_path(&cf.site.site_path)?,
        site_title: cf.site.site_title,
        copyright_text: cf.site.copyright_text,
        hide_tags: cf.site.hide_tags,
        hide_chrono_index_dates: cf.site.hide_chrono_index_dates,
        logging: cf.logging,
    })
}

pub fn default_config_path() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        return Path::new(&xdg).join("zettelsite").join("config.toml");
    }
    let home = home_dir().unwrap_or_else(|| PathBuf::from("~"));
    home.join(".config").join("zettelsite").join("config.toml")
}

fn expand_path(input: &str) -> Result<PathBuf, ConfigError> {
    let expanded = full(input).map_err(|_| ConfigError::NoHome)?;
    Ok(PathBuf::from(expanded.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_minimal_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
version = 1

[site]
zettelkasten_path = "/notes"
site_path = "/site"
site_title = "My Notes"
"#,
        );
        let cfg = load(Some(&path)).unwrap();
        assert_eq!(cfg.zettelkasten_path, PathBuf::from("/notes"));
        assert_eq!(cfg.site_title, "My Notes");
        assert_eq!(cfg.copyright_text, "");
        assert!(!cfg.hide_tags);
        assert!(!cfg.hide_chrono_index_dates);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn test_load_full_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
version = 1

[site]
zettelkasten_path = "/notes"
site_path = "/site"
site_title = "My Notes"
copyright_text = "© 2026"
hide_tags = true
hide_chrono_index_dates = true

[logging]
level = "debug"
"#,
        );
        let cfg = load(Some(&path)).unwrap();
        assert!(cfg.hide_tags);
        assert!(cfg.hide_chrono_index_dates);
        assert_eq!(cfg.copyright_text, "© 2026");
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = load(Some(&dir.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_bad_version() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
version = 2

[site]
zettelkasten_path = "/notes"
site_path = "/site"
site_title = "t"
"#,
        );
        assert!(matches!(load(Some(&path)), Err(ConfigError::BadVersion(2))));
    }

    #[test]
    fn test_malformed_toml() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_config(&dir, "version = ");
        assert!(matches!(load(Some(&path)), Err(ConfigError::ParseError(_, _))));
    }
}
