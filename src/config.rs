//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/mediassist/mediassist.toml`
//! 3. Local config: `<dir>/.mediassist.toml` (usually the working directory)
//! 4. Environment variables: `MEDIASSIST_*` prefix

use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::SummaryScope;

/// Timestamp zone used in patient records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClockConfig {
    /// Fixed UTC offset in whole hours, independent of the host locale
    pub utc_offset_hours: i32,
    /// Label appended to every timestamp
    pub zone_label: String,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: 5,
            zone_label: "PST".into(),
        }
    }
}

impl ClockConfig {
    pub fn offset(&self) -> Result<FixedOffset, ApplicationError> {
        self.utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| ApplicationError::Config {
                message: format!("utc_offset_hours out of range: {}", self.utc_offset_hours),
            })
    }
}

/// Decision tree traversal limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TraversalConfig {
    /// Questions asked before a traversal is abandoned as cyclic
    pub max_steps: usize,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self { max_steps: 64 }
    }
}

/// Default period covered by `summary`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ScopeSetting {
    #[default]
    AllTime,
    Week,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct SummaryConfig {
    pub scope: ScopeSetting,
}

/// Raw clock config for intermediate parsing (fields are Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawClockConfig {
    pub utc_offset_hours: Option<i32>,
    pub zone_label: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawTraversalConfig {
    pub max_steps: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSummaryConfig {
    pub scope: Option<ScopeSetting>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub records_file: Option<PathBuf>,
    pub clock: RawClockConfig,
    pub traversal: RawTraversalConfig,
    pub summary: RawSummaryConfig,
}

/// Unified configuration for mediassist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Append-only patient record store (default: ./patient_records.txt)
    pub records_file: PathBuf,
    pub clock: ClockConfig,
    pub traversal: TraversalConfig,
    pub summary: SummaryConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            records_file: PathBuf::from("patient_records.txt"),
            clock: ClockConfig::default(),
            traversal: TraversalConfig::default(),
            summary: SummaryConfig::default(),
        }
    }
}

/// Get the XDG config directory for mediassist.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "mediassist").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("mediassist.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".mediassist.toml")
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

/// Expand environment variables and `~` in a path string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Summary scope for `now`, as configured.
    pub fn summary_scope(&self, now: &chrono::DateTime<FixedOffset>) -> SummaryScope {
        match self.summary.scope {
            ScopeSetting::AllTime => SummaryScope::AllTime,
            ScopeSetting::Week => SummaryScope::week_of(now),
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.records_file.to_string_lossy().as_ref());
        self.records_file = PathBuf::from(expanded);
    }

    /// Overlay config onto self: fields specified in the overlay win.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            records_file: overlay
                .records_file
                .clone()
                .unwrap_or_else(|| self.records_file.clone()),
            clock: ClockConfig {
                utc_offset_hours: overlay
                    .clock
                    .utc_offset_hours
                    .unwrap_or(self.clock.utc_offset_hours),
                zone_label: overlay
                    .clock
                    .zone_label
                    .clone()
                    .unwrap_or_else(|| self.clock.zone_label.clone()),
            },
            traversal: TraversalConfig {
                max_steps: overlay
                    .traversal
                    .max_steps
                    .unwrap_or(self.traversal.max_steps),
            },
            summary: SummaryConfig {
                scope: overlay.summary.scope.unwrap_or(self.summary.scope),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.mediassist.toml`
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/mediassist/mediassist.toml`
    /// 3. Local config: `<local_dir>/.mediassist.toml`
    /// 4. Environment variables: `MEDIASSIST_*` prefix
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;

        current.expand_paths();
        current.validate()?;

        Ok(current)
    }

    /// Apply MEDIASSIST_* environment variables as explicit overrides.
    ///
    /// Nested keys use `__`: `MEDIASSIST_CLOCK__ZONE_LABEL=UTC`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("MEDIASSIST")
                .prefix_separator("_")
                .separator("__"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("records_file") {
            settings.records_file = PathBuf::from(val);
        }
        if let Ok(val) = config.get_int("clock.utc_offset_hours") {
            settings.clock.utc_offset_hours =
                i32::try_from(val).map_err(|_| ApplicationError::Config {
                    message: format!("utc_offset_hours out of range: {val}"),
                })?;
        }
        if let Ok(val) = config.get_string("clock.zone_label") {
            settings.clock.zone_label = val;
        }
        if let Ok(val) = config.get_int("traversal.max_steps") {
            settings.traversal.max_steps =
                usize::try_from(val).map_err(|_| ApplicationError::Config {
                    message: format!("max_steps out of range: {val}"),
                })?;
        }
        if let Ok(val) = config.get::<ScopeSetting>("summary.scope") {
            settings.summary.scope = val;
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        self.clock.offset()?;
        if self.traversal.max_steps == 0 {
            return Err(ApplicationError::Config {
                message: "traversal.max_steps must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# mediassist configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/mediassist/mediassist.toml
#   Local:  ./.mediassist.toml
#   Env:    MEDIASSIST_* environment variables (MEDIASSIST_CLOCK__ZONE_LABEL=...)

# Append-only patient record store
# records_file = "patient_records.txt"

[clock]
# Records are timestamped in this fixed offset, whatever the host timezone
# utc_offset_hours = 5
# zone_label = "PST"

[traversal]
# Questions asked before a traversal is abandoned
# max_steps = 64

[summary]
# "all-time" counts every stored record, "week" only the current ISO week
# scope = "all-time"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
