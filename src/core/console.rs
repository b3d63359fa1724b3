//! Unified console API for convenient access.
//!
//! The [`Console`] system parameter combines [`CommandRegistry`],
//! [`CommandQueue`] and [`LogBuffer`] into a single ergonomic API.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::{CommandEntry, CommandQueue, CommandRegistry, ConCommand, LogBuffer, RegistryError, Severity};

/// Unified console system parameter.
///
/// # Examples
///
/// ```ignore
/// fn setup_console(mut console: Console) {
///     console
///         .register_cmd(
///             ConCommand::new("noclip", |_, _world| info!("Noclip toggled!"))
///                 .description("Toggle noclip mode"),
///         )
///         .ok();
///
///     console.push("noclip");
/// }
/// ```
#[derive(SystemParam)]
pub struct Console<'w> {
    registry: ResMut<'w, CommandRegistry>,
    queue: Res<'w, CommandQueue>,
    log: Res<'w, LogBuffer>,
}

impl Console<'_> {
    /// Register a console command.
    ///
    /// Fails if the path already has a handler or the parameter list is
    /// malformed; the failure is also logged.
    pub fn register_cmd(&mut self, cmd: ConCommand) -> Result<(), RegistryError> {
        let name = cmd.name().to_string();
        self.registry.register(cmd).inspect_err(|e| {
            warn!("Console: cannot register '{}': {}", name, e);
        })
    }

    /// Remove a command. Returns `false` if nothing was registered there.
    pub fn unregister(&mut self, path: &str) -> bool {
        self.registry.unregister(path)
    }

    /// Queue a line for the next drain.
    pub fn push(&self, line: impl Into<String>) {
        self.queue.push(line);
    }

    /// Append a message to the console log.
    pub fn log(&self, severity: Severity, message: impl Into<String>) {
        self.log.log(severity, message);
    }

    /// Check if a command exists at `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.registry.contains(path)
    }

    /// Get a command entry by path.
    pub fn get(&self, path: &str) -> Option<&CommandEntry> {
        self.registry.get(path)
    }

    /// Get the number of registered commands.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Check if no commands are registered.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Get read-only access to the underlying registry.
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Get a handle to the queue that outlives the system.
    pub fn queue(&self) -> CommandQueue {
        self.queue.clone()
    }

    /// Get a handle to the log that outlives the system.
    pub fn log_buffer(&self) -> LogBuffer {
        self.log.clone()
    }
}

/// Read-only console system parameter.
///
/// Lets the scheduler run readers in parallel.
#[derive(SystemParam)]
pub struct ConsoleRef<'w> {
    registry: Res<'w, CommandRegistry>,
    log: Res<'w, LogBuffer>,
}

impl ConsoleRef<'_> {
    /// Check if a command exists at `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.registry.contains(path)
    }

    /// Get a command entry by path.
    pub fn get(&self, path: &str) -> Option<&CommandEntry> {
        self.registry.get(path)
    }

    /// All registered commands.
    pub fn commands(&self) -> Vec<&CommandEntry> {
        self.registry.commands()
    }

    /// The underlying registry.
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// The console log.
    pub fn log_buffer(&self) -> &LogBuffer {
        &self.log
    }
}
