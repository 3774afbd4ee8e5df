use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::types::{Role, DEFAULT_PARTICIPATING_ROLES};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub planning: PlanningConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    7010
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Write logs to a file under `directory` instead of stderr
    #[serde(default)]
    pub to_file: bool,

    #[serde(default = "default_log_directory")]
    pub directory: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> String {
    ".planboard/logs".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: false,
            directory: default_log_directory(),
        }
    }
}

/// Plan checklist and machine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningConfig {
    /// Roles that receive a readiness item on every new plan, in checklist order
    #[serde(default = "default_participating_roles")]
    pub participating_roles: Vec<Role>,

    /// Machines plans may be scheduled on. Empty disables the machine check.
    #[serde(default = "default_machines")]
    pub machines: Vec<String>,

    /// Load the demo plan set on startup
    #[serde(default = "default_seed_demo_data")]
    pub seed_demo_data: bool,
}

fn default_participating_roles() -> Vec<Role> {
    DEFAULT_PARTICIPATING_ROLES.to_vec()
}

fn default_machines() -> Vec<String> {
    ["Machine A", "Machine B", "Machine C", "Machine D", "Machine E"]
        .iter()
        .map(|m| (*m).to_string())
        .collect()
}

fn default_seed_demo_data() -> bool {
    true
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            participating_roles: default_participating_roles(),
            machines: default_machines(),
            seed_demo_data: default_seed_demo_data(),
        }
    }
}

/// Demo sign-in settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Password shared by every directory user
    #[serde(default = "default_demo_password")]
    pub demo_password: String,
}

fn default_demo_password() -> String {
    "password".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            demo_password: default_demo_password(),
        }
    }
}

impl Config {
    /// Project-local config file in the working directory
    pub fn local_config_path() -> PathBuf {
        PathBuf::from("planboard.toml")
    }

    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Embedded defaults so the server runs without any config file
        let defaults = Config::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        let local_config = Self::local_config_path();
        if local_config.exists() {
            builder = builder.add_source(config::File::from(local_config));
        }

        // User config in ~/.config/planboard/ (optional global overrides)
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("planboard").join("config.toml");
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        // Explicit config file (CLI override)
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment variables with PLANBOARD_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("PLANBOARD")
                .separator("__")
                .try_parsing(true),
        );

        let config: Config = builder
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the board cannot run with
    pub fn validate(&self) -> Result<()> {
        let roles = &self.planning.participating_roles;
        if roles.is_empty() {
            bail!("planning.participating_roles must name at least one role");
        }
        let mut seen = HashSet::new();
        for role in roles {
            if !seen.insert(role) {
                bail!("planning.participating_roles lists {} more than once", role);
            }
        }
        if self.planning.machines.iter().any(|m| m.trim().is_empty()) {
            bail!("planning.machines contains an empty machine name");
        }
        Ok(())
    }

    /// Save config to planboard.toml in the working directory
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::local_config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_str =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        std::fs::write(path, toml_str)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;

        Ok(())
    }

    /// Get absolute path to logs directory
    pub fn logs_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.logging.directory);
        if path.is_absolute() {
            path
        } else {
            std::env::current_dir().unwrap_or_default().join(path)
        }
    }

    /// Socket address string for the HTTP listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 7010);
        assert_eq!(config.bind_address(), "0.0.0.0:7010");
        assert_eq!(
            config.planning.participating_roles,
            DEFAULT_PARTICIPATING_ROLES.to_vec()
        );
        assert_eq!(config.planning.machines.len(), 5);
        assert!(config.planning.seed_demo_data);
        assert_eq!(config.auth.demo_password, "password");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_roles() {
        let mut config = Config::default();
        config.planning.participating_roles.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_roles() {
        let mut config = Config::default();
        config.planning.participating_roles.push(Role::QaEngineer);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("QA_ENGINEER"));
    }

    #[test]
    fn test_save_and_load_explicit_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("planboard.toml");

        let mut config = Config::default();
        config.server.port = 9100;
        config.planning.participating_roles = vec![Role::QaEngineer, Role::StoreExecutive];
        config.planning.machines = vec!["Lathe 1".to_string()];
        config.save_to(&path).unwrap();

        let loaded = Config::load(path.to_str()).unwrap();
        assert_eq!(loaded.server.port, 9100);
        assert_eq!(
            loaded.planning.participating_roles,
            vec![Role::QaEngineer, Role::StoreExecutive]
        );
        assert_eq!(loaded.planning.machines, vec!["Lathe 1".to_string()]);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("partial.toml");
        std::fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();

        let loaded = Config::load(path.to_str()).unwrap();
        assert_eq!(loaded.logging.level, "debug");
        assert_eq!(loaded.server.port, 7010);
        assert_eq!(loaded.planning.machines.len(), 5);
    }

    #[test]
    fn test_logs_path_is_absolute() {
        let config = Config::default();
        assert!(config.logs_path().is_absolute());
        assert!(config.logs_path().ends_with(".planboard/logs"));
    }
}
