use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub git: GitConfig,
    #[serde(default)]
    pub behavior: BehaviorConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct GitConfig {
    pub executable: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct BehaviorConfig {
    pub log_commands: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_root: Option<PathBuf>,
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            executable: "git".to_string(),
            initial_branch: None,
            user_name: Some("Test User".to_string()),
            user_email: Some("test@example.com".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    /// Create default configuration
    pub fn default_config() -> Self {
        Config {
            git: GitConfig::default(),
            behavior: BehaviorConfig::default(),
        }
    }

    /// Parse configuration from TOML text. Missing sections fall back to defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    /// Save configuration to a file
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        self.validate()?;

        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.git.executable.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "git.executable must not be empty".to_string(),
            ));
        }

        if let Some(branch) = &self.git.initial_branch {
            if branch.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "git.initial_branch must not be empty when set".to_string(),
                ));
            }
        }

        if let Some(name) = &self.git.user_name {
            if name.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "git.user_name must not be empty when set".to_string(),
                ));
            }
        }

        if let Some(email) = &self.git.user_email {
            if !email.contains('@') {
                return Err(ConfigError::InvalidValue(format!(
                    "Invalid git.user_email: {}",
                    email
                )));
            }
        }

        Ok(())
    }

    /// Directory under which fresh repositories are allocated
    pub fn temp_root(&self) -> PathBuf {
        self.behavior
            .temp_root
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }

    /// Audit log location, when command logging is enabled
    pub fn log_path(&self) -> Option<PathBuf> {
        if !self.behavior.log_commands {
            return None;
        }

        Some(
            self.behavior
                .log_path
                .clone()
                .unwrap_or_else(|| std::env::temp_dir().join("tmprepo").join("commands.log")),
        )
    }
}
