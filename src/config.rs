//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/budgetree/budgetree.toml`
//! 3. Local config: `<dir>/.budgetree.toml` (usually the working directory)
//! 4. Environment variables: `BUDGETREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Unified configuration for budgetree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Decimal places for values and variances (default: 2)
    pub precision: usize,
    /// Spaces of indentation per tree level in the table (default: 2)
    pub indent: usize,
    /// Tree document to load when `--file` is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    /// Colorize variance and status output
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            precision: 2,
            indent: 2,
            data_file: None,
            color: true,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub precision: Option<usize>,
    pub indent: Option<usize>,
    pub data_file: Option<PathBuf>,
    pub color: Option<bool>,
}

/// Get the XDG config directory for budgetree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "budgetree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("budgetree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".budgetree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
pub fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Merge overlay config onto self (base). Overlay wins where specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            precision: overlay.precision.unwrap_or(self.precision),
            indent: overlay.indent.unwrap_or(self.indent),
            data_file: overlay.data_file.clone().or_else(|| self.data_file.clone()),
            color: overlay.color.unwrap_or(self.color),
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(data_file) = &self.data_file {
            let expanded = expand_path(data_file.to_string_lossy().as_ref());
            self.data_file = Some(PathBuf::from(expanded));
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.budgetree.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_layers(global_config_path().as_deref(), local_dir)
    }

    /// Load settings from an explicit global config path and local directory.
    ///
    /// Missing files are skipped. Environment variables are applied last.
    pub fn load_layers(
        global_path: Option<&Path>,
        local_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_path {
            if global_path.exists() {
                let raw = load_raw_settings(global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply BUDGETREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(Environment::with_prefix("BUDGETREE").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_int("precision") {
            settings.precision = to_usize("precision", val)?;
        }
        if let Ok(val) = config.get_int("indent") {
            settings.indent = to_usize("indent", val)?;
        }
        if let Ok(val) = config.get_string("data_file") {
            settings.data_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_bool("color") {
            settings.color = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# budgetree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/budgetree/budgetree.toml
#   Local:  ./.budgetree.toml
#   Env:    BUDGETREE_* environment variables (e.g. BUDGETREE_PRECISION=3)

# Decimal places for values and variance
# precision = 2

# Indentation per tree level in the table view
# indent = 2

# Tree document (.json or .toml) to load when --file is not given
# data_file = "~/budgets/2026.json"

# Colorize variance output (NO_COLOR is honored as well)
# color = true
"#
        .to_string()
    }
}

fn to_usize(key: &str, val: i64) -> Result<usize, ApplicationError> {
    usize::try_from(val).map_err(|_| ApplicationError::Config {
        message: format!("{key} must be a non-negative integer, got {val}"),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
