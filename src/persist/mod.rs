//! Persistence layer for console configuration.
//!
//! Provides RON-based save/load for console settings and command history.

use std::fs;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConsoleConfig;
use crate::core::{CommandRegistry, ConCommand, ConsoleOverlay, LogBuffer, ParamKind};

/// Default config file name.
pub const DEFAULT_CONFIG_FILE: &str = "console.ron";

/// Persisted subset of [`ConsoleConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleSettings {
    pub log_capacity: usize,
    pub history_capacity: usize,
    pub max_command_len: usize,
    pub echo_commands: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self::from(&ConsoleConfig::default())
    }
}

impl From<&ConsoleConfig> for ConsoleSettings {
    fn from(config: &ConsoleConfig) -> Self {
        Self {
            log_capacity: config.log_capacity,
            history_capacity: config.history_capacity,
            max_command_len: config.max_command_len,
            echo_commands: config.echo_commands,
        }
    }
}

impl ConsoleSettings {
    /// Copy the settings into a live config.
    pub fn apply_to(&self, config: &mut ConsoleConfig) {
        config.log_capacity = self.log_capacity.max(1);
        config.history_capacity = self.history_capacity.max(1);
        config.max_command_len = self.max_command_len;
        config.echo_commands = self.echo_commands;
    }
}

/// Serializable console state.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConsoleConfigFile {
    #[serde(default)]
    pub settings: ConsoleSettings,
    /// Command history, oldest first.
    #[serde(default)]
    pub history: Vec<String>,
}

impl ConsoleConfigFile {
    /// Create a new config with default settings and no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current settings and history.
    pub fn capture(config: &ConsoleConfig, overlay: &ConsoleOverlay) -> Self {
        Self {
            settings: ConsoleSettings::from(config),
            history: overlay.history().iter().map(String::from).collect(),
        }
    }

    /// Load config from a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e.to_string()))?;

        ron::from_str(&contents)
            .map_err(|e| ConfigError::Parse(path.display().to_string(), e.to_string()))
    }

    /// Save config to a RON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| ConfigError::Io(parent.display().to_string(), e.to_string()))?;
            }
        }

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let contents = ron::ser::to_string_pretty(self, pretty)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        fs::write(path, contents)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e.to_string()))
    }

    /// Load config from file, returning default if file doesn't exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Apply settings to the live resources and replay the saved history.
    pub fn apply(&self, config: &mut ConsoleConfig, overlay: &mut ConsoleOverlay, log: &LogBuffer) {
        self.settings.apply_to(config);
        log.set_capacity(config.log_capacity);
        overlay.edit_mut().set_max_chars(config.max_command_len);

        let history = overlay.history_mut();
        history.set_capacity(config.history_capacity);
        for line in &self.history {
            history.commit(line);
        }
    }
}

/// Errors that can occur during config operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// IO error (path, message).
    #[error("IO error for '{0}': {1}")]
    Io(String, String),
    /// Parse error (path, message).
    #[error("Parse error for '{0}': {1}")]
    Parse(String, String),
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialize(String),
}

/// Resource tracking the config file path.
#[derive(Resource, Debug, Clone)]
pub struct ConfigPath(pub String);

impl Default for ConfigPath {
    fn default() -> Self {
        Self(DEFAULT_CONFIG_FILE.to_string())
    }
}

/// System to load config on startup.
pub fn load_config_on_startup(
    mut config: ResMut<ConsoleConfig>,
    mut overlay: ResMut<ConsoleOverlay>,
    log: Res<LogBuffer>,
    config_path: Res<ConfigPath>,
) {
    let path = &config_path.0;

    if !Path::new(path).exists() {
        info!("No config file found at '{}', using defaults", path);
        return;
    }

    match ConsoleConfigFile::load(path) {
        Ok(file) => {
            file.apply(&mut config, &mut overlay, &log);
            info!(
                "Loaded console config from '{}' ({} history lines)",
                path,
                file.history.len()
            );
        }
        Err(e) => {
            error!("Failed to load config: {}", e);
        }
    }
}

/// Save the current settings and history to `path`.
pub fn save_config(
    config: &ConsoleConfig,
    overlay: &ConsoleOverlay,
    path: impl AsRef<Path>,
) -> Result<(), ConfigError> {
    ConsoleConfigFile::capture(config, overlay).save(path)
}

/// Register the `config save` command.
pub(crate) fn register_persist_commands(mut registry: ResMut<CommandRegistry>) {
    let save = ConCommand::new("config save", |args, world| {
        let default_path = world
            .get_resource::<ConfigPath>()
            .map(|p| p.0.clone())
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
        let path = args.text(0).map(str::to_string).unwrap_or(default_path);

        let (Some(config), Some(overlay)) = (
            world.get_resource::<ConsoleConfig>(),
            world.get_resource::<ConsoleOverlay>(),
        ) else {
            warn!("config save: console is not initialized");
            return;
        };

        let result = save_config(config, overlay, &path);
        let log = world.get_resource::<LogBuffer>();
        match (result, log) {
            (Ok(()), Some(log)) => log.info(format!("Saved config to '{path}'")),
            (Err(e), Some(log)) => log.error(format!("Failed to save config: {e}")),
            (Ok(()), None) => info!("Saved config to '{}'", path),
            (Err(e), None) => error!("Failed to save config: {}", e),
        }
    })
    .params([ParamKind::OptionalText])
    .description("Save console settings and history to a RON file");

    if let Err(e) = registry.register(save) {
        warn!("Console: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_config_file_roundtrip() {
        let mut config = ConsoleConfigFile::new();
        config.settings.log_capacity = 50;
        config.history = vec!["echo hi".into(), "add 2 3".into()];

        let temp = NamedTempFile::new().unwrap();
        config.save(temp.path()).unwrap();

        let loaded = ConsoleConfigFile::load(temp.path()).unwrap();
        assert_eq!(loaded.settings.log_capacity, 50);
        assert_eq!(loaded.history, vec!["echo hi", "add 2 3"]);
    }

    #[test]
    fn test_config_file_load_missing() {
        let result = ConsoleConfigFile::load("nonexistent_file.ron");
        assert!(matches!(result, Err(ConfigError::Io(..))));
    }

    #[test]
    fn test_config_file_load_or_default() {
        let config = ConsoleConfigFile::load_or_default("nonexistent_file.ron");
        assert_eq!(config.settings, ConsoleSettings::default());
        assert!(config.history.is_empty());
    }

    #[test]
    fn test_config_parse_ron() {
        let ron_content = r#"(
    settings: (
        log_capacity: 64,
        echo_commands: false,
    ),
    history: ["list", "help echo"],
)"#;

        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(ron_content.as_bytes()).unwrap();
        temp.flush().unwrap();

        let config = ConsoleConfigFile::load(temp.path()).unwrap();
        assert_eq!(config.settings.log_capacity, 64);
        assert!(!config.settings.echo_commands);
        // Missing fields fall back to defaults
        assert_eq!(config.settings.history_capacity, 1024);
        assert_eq!(config.history, vec!["list", "help echo"]);
    }

    #[test]
    fn test_config_parse_error() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"(settings: [").unwrap();
        temp.flush().unwrap();
        assert!(matches!(
            ConsoleConfigFile::load(temp.path()),
            Err(ConfigError::Parse(..))
        ));
    }

    #[test]
    fn test_apply_restores_history_and_capacity() {
        let file = ConsoleConfigFile {
            settings: ConsoleSettings {
                log_capacity: 5,
                history_capacity: 2,
                ..default()
            },
            history: vec!["a".into(), "b".into(), "c".into()],
        };

        let mut config = ConsoleConfig::default();
        let mut overlay = ConsoleOverlay::default();
        let log = LogBuffer::default();
        file.apply(&mut config, &mut overlay, &log);

        assert_eq!(config.log_capacity, 5);
        assert_eq!(log.capacity(), 5);
        assert_eq!(overlay.history().iter().collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("console.ron");

        let mut overlay = ConsoleOverlay::default();
        overlay.history_mut().commit("list");
        save_config(&ConsoleConfig::default(), &overlay, &path).unwrap();

        let loaded = ConsoleConfigFile::load(&path).unwrap();
        assert_eq!(loaded.history, vec!["list"]);
    }
}
