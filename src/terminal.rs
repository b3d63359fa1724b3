//! Terminal backend for headless/dedicated server console.
//!
//! A reader thread pushes each stdin line straight into the
//! [`CommandQueue`]; new [`LogBuffer`] entries are echoed to stdout.

use std::io::{self, BufRead, Write};
use std::thread::{self, JoinHandle};

use bevy::prelude::*;

use crate::core::{CommandQueue, LogBuffer, LogEntry, Severity};

/// Plugin that adds terminal (stdin/stdout) console support.
pub struct TerminalPlugin;

impl Plugin for TerminalPlugin {
    fn build(&self, app: &mut App) {
        let queue = app
            .world_mut()
            .get_resource_or_insert_with(CommandQueue::default)
            .clone();
        spawn_stdin_reader(io::stdin(), queue);

        app.init_resource::<TerminalConfig>()
            .add_systems(PostUpdate, write_stdout);
    }
}

/// Configuration for terminal behavior.
#[derive(Resource)]
pub struct TerminalConfig {
    /// Whether to use colored output (ANSI escape codes).
    pub colored: bool,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self { colored: false } // Disabled by default - causes issues on some terminals
    }
}

/// Push every non-empty line of `input` into `queue` from a background thread.
pub fn spawn_stdin_reader<R>(input: R, queue: CommandQueue) -> JoinHandle<()>
where
    R: io::Read + Send + 'static,
{
    thread::spawn(move || {
        let reader = io::BufReader::new(input);
        for line in reader.lines().map_while(Result::ok) {
            let text = line.trim();
            if !text.is_empty() {
                queue.push(text);
            }
        }
    })
}

fn write_stdout(log: Option<Res<LogBuffer>>, config: Res<TerminalConfig>, mut seen: Local<u64>) {
    let Some(log) = log else { return };

    let lines = fresh_lines(&log, &mut seen, config.colored);
    if lines.is_empty() {
        return;
    }

    let mut stdout = io::stdout().lock();
    for line in lines {
        let _ = writeln!(stdout, "{line}");
    }
    let _ = stdout.flush();
}

/// Render the entries logged or updated since `seen`, and advance it.
fn fresh_lines(log: &LogBuffer, seen: &mut u64, colored: bool) -> Vec<String> {
    let entries = log.since(*seen);
    if let Some(last) = entries.last() {
        *seen = last.seq;
    }
    entries.iter().map(|entry| render_line(entry, colored)).collect()
}

fn render_line(entry: &LogEntry, colored: bool) -> String {
    if !colored {
        return entry.render();
    }
    let color = match entry.severity {
        Severity::Info => "\x1b[0m",
        Severity::Warn => "\x1b[33m",
        Severity::Error => "\x1b[31m",
    };
    format!("{}{}\x1b[0m", color, entry.render())
}
