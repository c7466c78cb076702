use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

/// Environment variable that overrides the API key stored on disk.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_location = "Nairobi"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_key: Option<String>,

    /// Location shown when `show` is run with no argument.
    pub default_location: Option<String>,
}

impl Config {
    /// Load config from the platform config dir, or return an empty default
    /// if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config dir, creating parent directories as
    /// needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// API key with the environment variable taking precedence over the file.
    pub fn api_key(&self) -> Option<String> {
        Self::select_api_key(std::env::var(API_KEY_ENV).ok(), self.api_key.clone())
    }

    fn select_api_key(env: Option<String>, file: Option<String>) -> Option<String> {
        let non_empty = |key: String| {
            let key = key.trim().to_string();
            if key.is_empty() { None } else { Some(key) }
        };
        env.and_then(non_empty).or_else(|| file.and_then(non_empty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_key_takes_precedence_over_file_key() {
        let key = Config::select_api_key(Some("ENV_KEY".into()), Some("FILE_KEY".into()));
        assert_eq!(key.as_deref(), Some("ENV_KEY"));
    }

    #[test]
    fn file_key_used_when_env_is_absent_or_blank() {
        let key = Config::select_api_key(None, Some("FILE_KEY".into()));
        assert_eq!(key.as_deref(), Some("FILE_KEY"));

        let key = Config::select_api_key(Some("   ".into()), Some("FILE_KEY".into()));
        assert_eq!(key.as_deref(), Some("FILE_KEY"));
    }

    #[test]
    fn no_key_configured_resolves_to_none() {
        assert_eq!(Config::select_api_key(None, None), None);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");

        let cfg = Config {
            api_key: Some("KEY".into()),
            default_location: Some("Nairobi".into()),
        };
        cfg.save_to(&path).expect("save");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded.api_key.as_deref(), Some("KEY"));
        assert_eq!(loaded.default_location.as_deref(), Some("Nairobi"));
    }

    #[test]
    fn load_missing_file_returns_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let loaded = Config::load_from(&dir.path().join("missing.toml")).expect("load");

        assert!(loaded.api_key.is_none());
        assert!(loaded.default_location.is_none());
    }
}
