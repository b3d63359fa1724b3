//! Built-in console commands.

use std::fs;

use bevy::prelude::*;

use crate::config::ConsoleConfig;
use crate::core::{
    tokenize, CommandEntry, CommandQueue, CommandRegistry, ConCommand, ConsoleOverlay, LogBuffer,
    ParamKind, Severity,
};

/// Line prefixes that mark a comment in `exec` scripts.
pub const SCRIPT_COMMENT_PREFIXES: &[&str] = &["//", "#"];

/// Every built-in command, ready to register.
pub fn builtin_commands() -> Vec<ConCommand> {
    vec![
        help(),
        list(),
        echo(),
        exec(),
        log_clear(),
        log_ring(),
        history(),
        history_clear(),
    ]
}

/// Register built-in console commands.
pub(crate) fn register_builtin_commands(mut registry: ResMut<CommandRegistry>) {
    for cmd in builtin_commands() {
        if let Err(e) = registry.register(cmd) {
            warn!("Console: {}", e);
        }
    }
}

/// Write a line of command output to the console log.
fn print(world: &World, severity: Severity, message: impl Into<String>) {
    match world.get_resource::<LogBuffer>() {
        Some(log) => log.log(severity, message),
        None => info!("{}", message.into()),
    }
}

fn describe(entry: &CommandEntry) -> String {
    if entry.description.is_empty() {
        entry.usage()
    } else {
        format!("{} - {}", entry.usage(), entry.description)
    }
}

// help - Show usage for a command path or for every command
fn help() -> ConCommand {
    ConCommand::new("help", |args, world| {
        let registry = world.resource::<CommandRegistry>();

        let lines: Vec<String> = match args.text(0) {
            Some(query) => {
                let path = tokenize(query, registry.delimiters())
                    .map(|t| t.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                let below = format!("{path} ");
                registry
                    .commands()
                    .into_iter()
                    .filter(|entry| *entry.path == *path || entry.path.starts_with(&below))
                    .map(describe)
                    .collect()
            }
            None => registry.commands().into_iter().map(describe).collect(),
        };

        if lines.is_empty() {
            let query = args.text_or(0, "");
            print(world, Severity::Warn, format!("Unknown command: {query}"));
            return;
        }
        for line in lines {
            print(world, Severity::Info, line);
        }
    })
    .params([ParamKind::OptionalText])
    .description("Show usage for a command, or list all commands")
}

// list - Top-level command names
fn list() -> ConCommand {
    ConCommand::new("list", |_args, world| {
        let names: Vec<String> = world
            .resource::<CommandRegistry>()
            .children("")
            .into_iter()
            .map(String::from)
            .collect();
        for name in names {
            print(world, Severity::Info, name);
        }
    })
    .description("List top-level commands")
}

// echo - Print text to console
fn echo() -> ConCommand {
    ConCommand::new("echo", |args, world| {
        print(world, Severity::Info, args.text_or(0, ""));
    })
    .params([ParamKind::OptionalText])
    .description("Print text to console")
}

// exec - Queue every command line of a script file
fn exec() -> ConCommand {
    ConCommand::new("exec", |args, world| {
        let path = args.text_or(0, "");
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                print(world, Severity::Error, format!("Failed to read '{path}': {e}"));
                return;
            }
        };

        let lines: Vec<&str> = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter(|line| !SCRIPT_COMMENT_PREFIXES.iter().any(|p| line.starts_with(p)))
            .collect();

        let count = lines.len();
        world.resource::<CommandQueue>().extend(lines);
        print(world, Severity::Info, format!("Queued {count} commands from '{path}'"));
    })
    .params([ParamKind::Text])
    .description("Run the commands in a script file")
}

// log clear - Drop every retained log line
fn log_clear() -> ConCommand {
    ConCommand::new("log clear", |_args, world| {
        if let Some(log) = world.get_resource::<LogBuffer>() {
            log.clear();
        }
    })
    .description("Clear console output")
}

// log ring - Resize the log ring
fn log_ring() -> ConCommand {
    ConCommand::new("log ring", |args, world| {
        let requested = args.integer(0).unwrap_or_default();
        let Ok(capacity) = usize::try_from(requested) else {
            print(world, Severity::Warn, "log ring: capacity must be at least 1");
            return;
        };
        if capacity == 0 {
            print(world, Severity::Warn, "log ring: capacity must be at least 1");
            return;
        }

        if let Some(log) = world.get_resource::<LogBuffer>() {
            log.set_capacity(capacity);
        }
        if let Some(mut config) = world.get_resource_mut::<ConsoleConfig>() {
            config.log_capacity = capacity;
        }
        print(world, Severity::Info, format!("Log ring holds {capacity} lines"));
    })
    .params([ParamKind::Integer])
    .description("Set how many log lines are retained")
}

// history - Print the command history, oldest first
fn history() -> ConCommand {
    ConCommand::new("history", |_args, world| {
        let Some(overlay) = world.get_resource::<ConsoleOverlay>() else {
            print(world, Severity::Warn, "No console history");
            return;
        };
        let lines: Vec<String> = overlay
            .history()
            .iter()
            .enumerate()
            .map(|(i, line)| format!("{:>4}  {}", i + 1, line))
            .collect();
        for line in lines {
            print(world, Severity::Info, line);
        }
    })
    .description("Show command history")
}

// history clear - Forget the command history
fn history_clear() -> ConCommand {
    ConCommand::new("history clear", |_args, world| {
        if let Some(mut overlay) = world.get_resource_mut::<ConsoleOverlay>() {
            overlay.history_mut().clear();
        }
    })
    .description("Clear command history")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_register_cleanly() {
        let mut registry = CommandRegistry::new();
        for cmd in builtin_commands() {
            registry.register(cmd).unwrap();
        }
        assert_eq!(registry.len(), 8);
        assert!(registry.contains("log ring"));
        assert!(registry.contains("history clear"));
        assert_eq!(registry.children("log"), vec!["clear", "ring"]);
    }

    #[test]
    fn test_usage_lines() {
        let mut registry = CommandRegistry::new();
        for cmd in builtin_commands() {
            registry.register(cmd).unwrap();
        }
        assert_eq!(registry.get("exec").unwrap().usage(), "exec <text>");
        assert_eq!(registry.get("log ring").unwrap().usage(), "log ring <int>");
        assert_eq!(
            describe(registry.get("echo").unwrap()),
            "echo [text...] - Print text to console"
        );
    }
}
