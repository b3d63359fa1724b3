//! Core console types with zero optional dependencies.
//!
//! This module provides the fundamental building blocks:
//! - [`tokenize`] - Delimiter tokenizer over borrowed lines
//! - [`CommandRegistry`] - Hierarchical command tree with typed dispatch
//! - [`CommandQueue`] - Multi-producer FIFO drained once per frame
//! - [`LogBuffer`] - Thread-safe log ring with severities
//! - [`CommandHistory`] - Deduplicated history with navigation
//! - [`ConsoleOverlay`] - Console state machine and [`LogView`] layout
//! - [`Console`] - Unified system parameter for convenient access
//! - Messages for communication between layers

mod command;
mod console;
mod edit;
mod error;
mod events;
mod history;
mod log_buffer;
mod overlay;
mod params;
mod queue;
mod registry;
mod ring;
mod tokenizer;
mod view;

pub use command::{CommandHandler, ConCommand};
pub use console::{Console, ConsoleRef};
pub use edit::{EditBuffer, DEFAULT_MAX_COMMAND_LEN};
pub use error::{Arity, DescriptorError, DispatchError, RegistryError};
pub use events::{ConsoleClearEvent, ConsoleEventsPlugin, ConsoleInputEvent, ConsoleToggleEvent};
pub use history::{CommandHistory, HistoryCursor, DEFAULT_HISTORY_CAPACITY};
pub use log_buffer::{format_time, LogBuffer, LogEntry, Severity, DEFAULT_LOG_CAPACITY};
pub use overlay::{ConsoleInput, ConsoleOverlay, ConsoleState};
pub use params::{ArgValue, CommandArgs, ParamKind, ParameterDescriptor};
pub use queue::{CommandQueue, DrainOutcome};
pub use registry::{CommandEntry, CommandNode, CommandRegistry, Invocation};
pub use ring::RingBuffer;
pub use tokenizer::{is_blank, tokenize, ArgToken, Tokens, DEFAULT_DELIMITERS};
pub use view::{LogView, ViewLayout, FLOW_SCREENS, INPUT_ROWS};
