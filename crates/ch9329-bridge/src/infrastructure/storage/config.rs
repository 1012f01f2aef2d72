//! TOML-based configuration persistence for the bridge.
//!
//! Reads and writes `BridgeConfig` to the platform-appropriate config file:
//! - Windows:  `%APPDATA%\CH9329Bridge\config.toml`
//! - Linux:    `$XDG_CONFIG_HOME/ch9329-bridge/config.toml` (or `~/.config/...`)
//! - macOS:    `~/Library/Application Support/CH9329Bridge/config.toml`
//!
//! Example:
//!
//! ```toml
//! [serial]
//! device = "/dev/ttyUSB0"
//! baud_rate = 9600
//!
//! [keyboard]
//! rollover_policy = "drop_oldest"
//! key_up = 1
//! ```
//!
//! Every section and field is optional; anything missing takes its default,
//! so a first run works without a file.

use std::path::{Path, PathBuf};

use ch9329_core::{RolloverPolicy, ScreenSize, TypingOptions};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable that overrides `serial.device`.
pub const DEVICE_ENV_VAR: &str = "CH9329_DEVICE";

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BridgeConfig {
    #[serde(default)]
    pub bridge: GeneralConfig,
    #[serde(default)]
    pub serial: SerialConfig,
    #[serde(default)]
    pub keyboard: KeyboardConfig,
    #[serde(default)]
    pub mouse: MouseConfig,
}

/// General process settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Serial link to the chip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SerialConfig {
    /// Device path (`/dev/ttyUSB0`, `COM3`, ...).
    #[serde(default = "default_device")]
    pub device: String,
    /// Must match the chip's configured rate; factory default is 9600.
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
}

/// Keyboard forwarding and typing behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeyboardConfig {
    #[serde(default)]
    pub rollover_policy: RolloverPolicy,
    /// Times each typed character's report is sent.
    #[serde(default = "default_key_repeat")]
    pub key_repeat: u32,
    /// Release reports sent after each typed character.
    #[serde(default = "default_key_up")]
    pub key_up: u32,
    /// Echo forwarded keys to the console.
    #[serde(default = "default_true")]
    pub echo: bool,
}

/// Remote screen geometry and wheel behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MouseConfig {
    #[serde(default = "default_screen_width")]
    pub screen_width: u32,
    #[serde(default = "default_screen_height")]
    pub screen_height: u32,
    /// Forward horizontal wheel movement; many targets misread it.
    #[serde(default)]
    pub horizontal_scroll: bool,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_device() -> String {
    if cfg!(target_os = "windows") {
        "COM3".to_string()
    } else {
        "/dev/ttyUSB0".to_string()
    }
}
fn default_baud_rate() -> u32 {
    9600
}
fn default_key_repeat() -> u32 {
    1
}
fn default_key_up() -> u32 {
    1
}
fn default_true() -> bool {
    true
}
fn default_screen_width() -> u32 {
    1920
}
fn default_screen_height() -> u32 {
    1080
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            device: default_device(),
            baud_rate: default_baud_rate(),
        }
    }
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            rollover_policy: RolloverPolicy::default(),
            key_repeat: default_key_repeat(),
            key_up: default_key_up(),
            echo: default_true(),
        }
    }
}

impl Default for MouseConfig {
    fn default() -> Self {
        Self {
            screen_width: default_screen_width(),
            screen_height: default_screen_height(),
            horizontal_scroll: false,
        }
    }
}

impl BridgeConfig {
    pub fn typing_options(&self) -> TypingOptions {
        TypingOptions {
            key_repeat: self.keyboard.key_repeat,
            key_up: self.keyboard.key_up,
        }
    }

    pub fn screen_size(&self) -> ScreenSize {
        ScreenSize::new(self.mouse.screen_width, self.mouse.screen_height)
    }

    /// Replaces `serial.device` with `device` when it is set and non-empty.
    pub fn apply_device_override(&mut self, device: Option<String>) {
        if let Some(device) = device.filter(|d| !d.trim().is_empty()) {
            self.serial.device = device;
        }
    }

    /// Applies overrides from the process environment ([`DEVICE_ENV_VAR`]).
    pub fn apply_env_overrides(&mut self) {
        self.apply_device_override(std::env::var(DEVICE_ENV_VAR).ok());
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `BridgeConfig` from the platform config file, returning defaults if
/// the file does not yet exist.
///
/// # Errors
///
/// See [`load_config_from`].
pub fn load_config() -> Result<BridgeConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads `BridgeConfig` from `path`, returning defaults if it does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<BridgeConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BridgeConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Persists `config` to the platform config file.
///
/// # Errors
///
/// See [`save_config_to`].
pub fn save_config(config: &BridgeConfig) -> Result<(), ConfigError> {
    save_config_to(&config_file_path()?, config)
}

/// Persists `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(path: &Path, config: &BridgeConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Resolves the platform config directory including the app subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("CH9329Bridge"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("ch9329-bridge"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("CH9329Bridge")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
