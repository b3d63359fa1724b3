//! Console messages for communication between layers.
//!
//! Messages are the mechanism for:
//! - Any system -> Queue: command lines
//! - Any system -> Overlay: show/hide requests, clearing the log

use bevy::prelude::*;

/// Message carrying a command line to queue.
///
/// Forwarded into the [`CommandQueue`](super::CommandQueue) before the queue
/// is drained in the same frame.
///
/// # Examples
///
/// ```ignore
/// fn spawn_wave(mut input: MessageWriter<ConsoleInputEvent>) {
///     input.write(ConsoleInputEvent::new("wave spawn 3"));
/// }
/// ```
#[derive(Message, Debug, Clone)]
pub struct ConsoleInputEvent {
    /// The raw command line.
    pub command: String,
}

impl ConsoleInputEvent {
    /// Create a new input message.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

/// Message requesting the overlay to open or close.
///
/// Also written by the console when its visibility changes.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleToggleEvent {
    /// Whether the console is (or should be) open.
    pub open: bool,
}

impl ConsoleToggleEvent {
    /// Request to open the console.
    pub fn opened() -> Self {
        Self { open: true }
    }

    /// Request to close the console.
    pub fn closed() -> Self {
        Self { open: false }
    }
}

/// Message requesting the log buffer to be cleared.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct ConsoleClearEvent;

/// Plugin that registers all console messages.
pub struct ConsoleEventsPlugin;

impl Plugin for ConsoleEventsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ConsoleInputEvent>()
            .add_message::<ConsoleToggleEvent>()
            .add_message::<ConsoleClearEvent>();
    }
}
