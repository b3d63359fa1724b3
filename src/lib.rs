//! A typed command dispatcher and developer console for Bevy.
//!
//! bevy_devconsole provides:
//!
//! - **ConCommand**: Commands with a declared, runtime-checked parameter list
//! - **CommandRegistry**: Hierarchical names (`log ring`, `cfg set`)
//! - **CommandQueue**: Thread-safe FIFO drained once per frame
//! - **LogBuffer**: Severity-tagged log ring fed by `tracing`
//! - **ConsoleOverlay**: Console state machine with history navigation
//! - **Console**: Unified system parameter for convenient access
//!
//! # Features
//!
//! - `egui` (default): egui-based overlay
//! - `terminal`: stdin/stdout backend for dedicated servers
//! - `persist`: RON persistence of settings and history (`config save`)
//! - `full`: Enable egui + persist
//!
//! # Quick Start
//!
//! ```ignore
//! use bevy::log::LogPlugin;
//! use bevy::prelude::*;
//! use bevy_devconsole::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins.set(LogPlugin {
//!             custom_layer: custom_log_layer,
//!             ..default()
//!         }))
//!         .add_plugins(ConsolePlugin)
//!         .add_systems(Startup, setup_console)
//!         .run();
//! }
//!
//! fn setup_console(mut console: Console) {
//!     console
//!         .register_cmd(
//!             ConCommand::new("add", |args, _world| {
//!                 let sum = args.integer(0).unwrap_or(0) + args.integer(1).unwrap_or(0);
//!                 info!("{sum}");
//!             })
//!             .params([ParamKind::Integer, ParamKind::Integer])
//!             .description("Add two integers"),
//!         )
//!         .ok();
//!
//!     console.push("add 2 3");
//! }
//! ```

use bevy::prelude::*;

// Core module (always available, zero optional deps)
pub mod core;

pub mod builtins;
pub mod config;
pub mod logging;

// UI modules (feature-gated)
#[cfg(feature = "egui")]
pub mod ui;

// Terminal backend (feature-gated)
#[cfg(feature = "terminal")]
pub mod terminal;

// Persistence module (feature-gated)
#[cfg(feature = "persist")]
pub mod persist;

// Re-export core types at crate root for convenience
pub use crate::core::{
    tokenize, ArgToken, ArgValue, Arity, CommandArgs, CommandEntry, CommandHandler,
    CommandHistory, CommandQueue, CommandRegistry, ConCommand, Console, ConsoleClearEvent,
    ConsoleEventsPlugin, ConsoleInput, ConsoleInputEvent, ConsoleOverlay, ConsoleRef,
    ConsoleState, ConsoleToggleEvent, DispatchError, DrainOutcome, LogBuffer, LogEntry, LogView,
    ParamKind, ParameterDescriptor, RegistryError, Severity, ViewLayout,
};

pub use config::ConsoleConfig;
pub use logging::{custom_log_layer, LogCaptureLayer};

#[cfg(feature = "egui")]
pub use ui::{ConsoleKeys, ConsoleTheme};

#[cfg(feature = "persist")]
pub use persist::{ConfigError, ConfigPath, ConsoleConfigFile, ConsoleSettings};

#[cfg(feature = "terminal")]
pub use terminal::{TerminalConfig, TerminalPlugin};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::ConsoleConfig;
    pub use crate::core::{
        tokenize, ArgValue, CommandArgs, CommandQueue, CommandRegistry, ConCommand, Console,
        ConsoleInputEvent, ConsoleOverlay, ConsoleRef, LogBuffer, ParamKind, Severity,
    };
    pub use crate::logging::custom_log_layer;
    pub use crate::ConsolePlugin;
}

/// Main console plugin.
///
/// # Configuration
///
/// Insert a [`ConsoleConfig`] before the plugin to change capacities,
/// delimiters or echo:
///
/// ```ignore
/// app.insert_resource(ConsoleConfig { log_capacity: 1000, ..default() })
///     .add_plugins(ConsolePlugin);
/// ```
#[derive(Default)]
pub struct ConsolePlugin;

impl Plugin for ConsolePlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<ConsoleConfig>()
            .cloned()
            .unwrap_or_default();

        // The log layer may have created the buffer already
        match app.world().get_resource::<LogBuffer>() {
            Some(log) => log.set_capacity(config.log_capacity),
            None => {
                app.insert_resource(LogBuffer::new(config.log_capacity));
            }
        }

        if !app.world().contains_resource::<CommandRegistry>() {
            app.insert_resource(CommandRegistry::with_delimiters(config.delimiters.clone()));
        }
        if !app.world().contains_resource::<ConsoleOverlay>() {
            app.insert_resource(
                ConsoleOverlay::new(config.history_capacity, config.max_command_len)
                    .with_delimiters(config.delimiters.clone()),
            );
        }

        app.insert_resource(config)
            .init_resource::<CommandQueue>()
            .add_plugins(ConsoleEventsPlugin);

        // Register built-in commands
        app.add_systems(Startup, builtins::register_builtin_commands);

        // Once per frame:
        // 1. forward_console_input: Move input messages into the queue
        // 2. handle_console_requests: Apply toggle/clear requests
        // 3. drain_command_queue: Dispatch with exclusive World access
        app.add_systems(
            Update,
            (
                forward_console_input,
                handle_console_requests,
                drain_command_queue,
            )
                .chain(),
        );

        // Persistence (feature-gated)
        #[cfg(feature = "persist")]
        {
            app.init_resource::<persist::ConfigPath>().add_systems(
                Startup,
                (
                    persist::register_persist_commands,
                    persist::load_config_on_startup,
                )
                    .after(builtins::register_builtin_commands),
            );
        }

        // egui UI (feature-gated)
        #[cfg(feature = "egui")]
        {
            use bevy_egui::EguiPrimaryContextPass;

            app.init_resource::<ui::ConsoleUiState>()
                .init_resource::<ui::ConsoleKeys>()
                .init_resource::<ui::ConsoleTheme>()
                .add_systems(Update, ui::open_close_ui.before(drain_command_queue))
                .add_systems(
                    EguiPrimaryContextPass,
                    ui::render_ui_system.run_if(|o: Res<ConsoleOverlay>| o.is_visible()),
                );
        }

        // Terminal backend (feature-gated)
        #[cfg(feature = "terminal")]
        {
            app.add_plugins(terminal::TerminalPlugin);
        }
    }
}

/// Move [`ConsoleInputEvent`]s into the [`CommandQueue`].
fn forward_console_input(mut events: MessageReader<ConsoleInputEvent>, queue: Res<CommandQueue>) {
    queue.extend(events.read().map(|event| event.command.clone()));
}

/// Apply [`ConsoleToggleEvent`] and [`ConsoleClearEvent`] requests.
fn handle_console_requests(
    mut toggles: MessageReader<ConsoleToggleEvent>,
    mut clears: MessageReader<ConsoleClearEvent>,
    mut overlay: ResMut<ConsoleOverlay>,
    log: Res<LogBuffer>,
) {
    for toggle in toggles.read() {
        overlay.set_visible(toggle.open);
    }
    if clears.read().count() > 0 {
        log.clear();
    }
}

/// Dispatch every queued line.
pub fn drain_command_queue(world: &mut World) {
    let Some(queue) = world.get_resource::<CommandQueue>().cloned() else {
        return;
    };
    queue.drain_all(world);
}
