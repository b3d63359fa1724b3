//! Console configuration.
//!
//! Insert a [`ConsoleConfig`] before adding [`ConsolePlugin`](crate::ConsolePlugin)
//! to override the defaults:
//!
//! ```ignore
//! App::new()
//!     .insert_resource(ConsoleConfig {
//!         log_capacity: 1000,
//!         ..default()
//!     })
//!     .add_plugins(ConsolePlugin);
//! ```

use bevy::log::Level;
use bevy::prelude::*;

use crate::core::{
    DEFAULT_DELIMITERS, DEFAULT_HISTORY_CAPACITY, DEFAULT_LOG_CAPACITY, DEFAULT_MAX_COMMAND_LEN,
};

/// Settings shared by every console layer.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ConsoleConfig {
    /// Log lines retained by the [`LogBuffer`](crate::core::LogBuffer).
    pub log_capacity: usize,
    /// Lines retained by the command history.
    pub history_capacity: usize,
    /// Maximum length of the edit line, in chars.
    pub max_command_len: usize,
    /// Characters that separate tokens.
    pub delimiters: Vec<char>,
    /// Most verbose `tracing` level copied into the log buffer.
    pub capture_level: Level,
    /// Echo each dispatched line to the log as `> line`.
    pub echo_commands: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            log_capacity: DEFAULT_LOG_CAPACITY,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            max_command_len: DEFAULT_MAX_COMMAND_LEN,
            delimiters: DEFAULT_DELIMITERS.to_vec(),
            capture_level: Level::INFO,
            echo_commands: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::default();
        assert_eq!(config.log_capacity, 200);
        assert_eq!(config.history_capacity, 1024);
        assert_eq!(config.max_command_len, 512);
        assert_eq!(config.delimiters, vec![' ', '\t']);
        assert!(config.echo_commands);
    }
}
