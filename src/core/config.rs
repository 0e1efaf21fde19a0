//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.lectern/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::gesture::GestureConfig;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LecternConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub gestures: GestureSection,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub state_dir: Option<String>,
    pub start_document: Option<String>,
    pub load_delay_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GestureSection {
    pub min_swipe_distance: Option<f32>,
    pub min_swipe_velocity: Option<f32>,
    pub max_off_path: Option<f32>,
    pub tap_slop: Option<f32>,
    pub bottom_band_fraction: Option<f32>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_START_DOCUMENT: &str = "KJV";
pub const DEFAULT_LOAD_DELAY_MS: u64 = 150;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// `None` when no home directory exists; state is then kept in memory.
    pub state_dir: Option<PathBuf>,
    pub start_document: String,
    pub load_delay_ms: u64,
    pub gestures: GestureConfig,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.lectern`.
pub fn lectern_home() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".lectern"))
}

/// Returns the path to `~/.lectern/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    lectern_home().map(|h| h.join("config.toml"))
}

/// Load config from `~/.lectern/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `LecternConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<LecternConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(LecternConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(LecternConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: LecternConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Lectern Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# state_dir = "/home/me/.lectern/state"   # Or set LECTERN_STATE_DIR
# start_document = "KJV"                  # Or set LECTERN_DOCUMENT
# load_delay_ms = 150                     # Simulated page load latency

# [gestures]
# min_swipe_distance = 120.0
# min_swipe_velocity = 200.0             # units per second
# max_off_path = 250.0
# tap_slop = 16.0
# bottom_band_fraction = 0.15
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_document` and `cli_state_dir` are from CLI flags (None = not specified).
pub fn resolve(
    config: &LecternConfig,
    cli_document: Option<&str>,
    cli_state_dir: Option<&Path>,
) -> ResolvedConfig {
    // Start document: CLI → env → config → default
    let start_document = cli_document
        .map(|s| s.to_string())
        .or_else(|| std::env::var("LECTERN_DOCUMENT").ok())
        .or_else(|| config.general.start_document.clone())
        .unwrap_or_else(|| DEFAULT_START_DOCUMENT.to_string());

    // State dir: CLI → env → config → ~/.lectern/state
    let state_dir = cli_state_dir
        .map(Path::to_path_buf)
        .or_else(|| std::env::var("LECTERN_STATE_DIR").ok().map(PathBuf::from))
        .or_else(|| config.general.state_dir.as_ref().map(PathBuf::from))
        .or_else(|| lectern_home().map(|h| h.join("state")));

    ResolvedConfig {
        state_dir,
        start_document,
        load_delay_ms: config
            .general
            .load_delay_ms
            .unwrap_or(DEFAULT_LOAD_DELAY_MS),
        gestures: resolve_gestures(&config.gestures),
    }
}

fn resolve_gestures(section: &GestureSection) -> GestureConfig {
    let defaults = GestureConfig::default();
    GestureConfig {
        min_swipe_distance: section
            .min_swipe_distance
            .unwrap_or(defaults.min_swipe_distance),
        min_swipe_velocity: section
            .min_swipe_velocity
            .unwrap_or(defaults.min_swipe_velocity),
        max_off_path: section.max_off_path.unwrap_or(defaults.max_off_path),
        tap_slop: section.tap_slop.unwrap_or(defaults.tap_slop),
        bottom_band_fraction: section
            .bottom_band_fraction
            .map(|f| f.clamp(0.0, 1.0))
            .unwrap_or(defaults.bottom_band_fraction),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = LecternConfig::default();
        assert!(config.general.start_document.is_none());
        assert!(config.gestures.tap_slop.is_none());
    }

    #[test]
    fn test_resolve_cli_wins() {
        let config = LecternConfig {
            general: GeneralConfig {
                start_document: Some("ESV".to_string()),
                state_dir: Some("/tmp/from-config".to_string()),
                load_delay_ms: Some(0),
            },
            ..Default::default()
        };
        let resolved = resolve(&config, Some("WEB"), Some(Path::new("/tmp/from-cli")));
        assert_eq!(resolved.start_document, "WEB");
        assert_eq!(resolved.state_dir, Some(PathBuf::from("/tmp/from-cli")));
        assert_eq!(resolved.load_delay_ms, 0);
    }

    #[test]
    fn test_resolve_gesture_defaults() {
        let resolved = resolve(&LecternConfig::default(), None, None);
        assert_eq!(resolved.gestures, GestureConfig::default());
        assert_eq!(resolved.load_delay_ms, DEFAULT_LOAD_DELAY_MS);
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing, everything else stays default
        let toml_str = r#"
[gestures]
min_swipe_distance = 40.0
bottom_band_fraction = 2.0
"#;
        let config: LecternConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.gestures.min_swipe_distance, Some(40.0));
        assert!(config.general.state_dir.is_none());

        let gestures = resolve_gestures(&config.gestures);
        assert_eq!(gestures.min_swipe_distance, 40.0);
        assert_eq!(gestures.bottom_band_fraction, 1.0);
        assert_eq!(gestures.tap_slop, GestureConfig::default().tap_slop);
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[general]
state_dir = "/var/lib/lectern"
start_document = "Eastons"
load_delay_ms = 10

[gestures]
tap_slop = 4.0
"#;
        let config: LecternConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.state_dir.as_deref(), Some("/var/lib/lectern"));
        assert_eq!(config.general.start_document.as_deref(), Some("Eastons"));
        assert_eq!(config.general.load_delay_ms, Some(10));
        assert_eq!(config.gestures.tap_slop, Some(4.0));
    }
}
