//! Custom [LogPlugin](bevy::log::LogPlugin) functionality.
//!
//! Routes every `tracing` event (including Bevy's own `info!`/`warn!`/
//! `error!`) into the console [`LogBuffer`].

use bevy::log::{BoxedLayer, Level};
use bevy::prelude::*;
use tracing::Subscriber;
use tracing_subscriber::field::Visit;
use tracing_subscriber::Layer;

use crate::config::ConsoleConfig;
use crate::core::{LogBuffer, Severity};

/// A function that implements the log capture for the developer console via
/// [`LogPlugin::custom_layer`](bevy::log::LogPlugin::custom_layer).
///
/// Shares the app's [`LogBuffer`] resource, inserting one if needed, so the
/// console plugin can be added before or after the log plugin.
///
/// ```ignore
/// App::new()
///     .add_plugins(DefaultPlugins.set(LogPlugin {
///         custom_layer: custom_log_layer,
///         ..default()
///     }))
///     .add_plugins(ConsolePlugin);
/// ```
pub fn custom_log_layer(app: &mut App) -> Option<BoxedLayer> {
    Some(Box::new(create_custom_log_layer(app)))
}

fn create_custom_log_layer(app: &mut App) -> LogCaptureLayer {
    let config = app
        .world()
        .get_resource::<ConsoleConfig>()
        .cloned()
        .unwrap_or_default();

    let buffer = match app.world().get_resource::<LogBuffer>() {
        Some(buffer) => buffer.clone(),
        None => {
            let buffer = LogBuffer::new(config.log_capacity);
            app.insert_resource(buffer.clone());
            buffer
        }
    };

    LogCaptureLayer::new(buffer, config.capture_level)
}

/// A [`Layer`] that copies log events into a [`LogBuffer`].
pub struct LogCaptureLayer {
    buffer: LogBuffer,
    max_level: Level,
}

impl LogCaptureLayer {
    /// Capture events at `max_level` and below (in verbosity) into `buffer`.
    pub fn new(buffer: LogBuffer, max_level: Level) -> Self {
        Self { buffer, max_level }
    }
}

impl<S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>> Layer<S>
    for LogCaptureLayer
{
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let level = *event.metadata().level();
        if level > self.max_level {
            return;
        }

        let mut message = None;
        event.record(&mut LogEventVisitor(&mut message));
        if let Some(message) = message {
            self.buffer.log(Severity::from(level), message);
        }
    }
}

/// A [`Visit`]or that extracts the `message` field of an event.
struct LogEventVisitor<'a>(&'a mut Option<String>);

impl Visit for LogEventVisitor<'_> {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            *self.0 = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        // Only log out messages
        if field.name() == "message" {
            *self.0 = Some(format!("{value:?}"));
        }
    }
}
