//! FIFO queue of raw command lines.
//!
//! Producers (the console input line, `exec` scripts, a stdin thread, Bevy
//! messages) push text; the frame loop drains it once per tick. Capture and
//! execution therefore run on independent schedules.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use bevy::prelude::*;

use super::{is_blank, CommandRegistry, DispatchError, LogBuffer};
use crate::config::ConsoleConfig;

/// Outcome of dispatching one queued line.
#[derive(Debug, Clone, PartialEq)]
pub enum DrainOutcome {
    /// The handler ran to completion.
    Executed {
        /// The dispatched line.
        line: String,
    },
    /// The line never reached a handler.
    Rejected {
        /// The dispatched line.
        line: String,
        /// Why dispatch failed.
        error: DispatchError,
    },
    /// The handler panicked.
    Panicked {
        /// The dispatched line.
        line: String,
        /// The panic message.
        message: String,
    },
}

/// Shared handle to the command queue.
///
/// Safe for any number of producer threads and one consumer. Cloning the
/// handle shares the queue.
///
/// # Examples
///
/// ```
/// use bevy_devconsole::core::CommandQueue;
///
/// let queue = CommandQueue::default();
/// let producer = queue.clone();
/// producer.push("echo hello");
/// assert_eq!(queue.take_pending(), vec!["echo hello".to_string()]);
/// ```
#[derive(Resource, Debug, Clone, Default)]
pub struct CommandQueue {
    inner: Arc<Mutex<VecDeque<String>>>,
}

impl CommandQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<String>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Append a line to the tail.
    pub fn push(&self, line: impl Into<String>) {
        self.lock().push_back(line.into());
    }

    /// Append several lines in order, under one lock.
    pub fn extend<I, S>(&self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lock().extend(lines.into_iter().map(Into::into));
    }

    /// Number of queued lines.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Remove and return everything queued right now, oldest first.
    pub fn take_pending(&self) -> Vec<String> {
        self.lock().drain(..).collect()
    }

    /// Dispatch every line queued at the time of the call, in FIFO order.
    ///
    /// Lines pushed while draining (for example by a handler) stay queued
    /// for the next call. Failures are logged and never stop the drain.
    /// Blank lines are skipped.
    pub fn drain_all(&self, world: &mut World) -> Vec<DrainOutcome> {
        let pending = self.take_pending();
        let mut outcomes = Vec::with_capacity(pending.len());

        for line in pending {
            if let Some(outcome) = dispatch_line(world, line) {
                outcomes.push(outcome);
            }
        }

        outcomes
    }
}

fn dispatch_line(world: &mut World, line: String) -> Option<DrainOutcome> {
    let Some(registry) = world.get_resource::<CommandRegistry>() else {
        error!("Console: no command registry, dropping '{}'", line);
        return None;
    };

    if is_blank(&line, registry.delimiters()) {
        return None;
    }

    // Resolve while the registry is borrowed; run once the borrow has ended.
    let resolved = registry.resolve(&line);
    let log = world.get_resource::<LogBuffer>().cloned();
    let echo = world
        .get_resource::<ConsoleConfig>()
        .is_none_or(|config| config.echo_commands);

    if let Some(log) = log.as_ref().filter(|_| echo) {
        log.info(format!("> {}", line));
    }

    let invocation = match resolved {
        Ok(invocation) => invocation,
        Err(error) => {
            report(log.as_ref(), error.to_string());
            return Some(DrainOutcome::Rejected { line, error });
        }
    };

    let path = invocation.path.clone();
    match invocation.invoke(world) {
        Ok(()) => Some(DrainOutcome::Executed { line }),
        Err(message) => {
            report(log.as_ref(), format!("Command '{}' panicked: {}", path, message));
            Some(DrainOutcome::Panicked { line, message })
        }
    }
}

/// Write a dispatch failure to the console log, or to `tracing` without one.
fn report(log: Option<&LogBuffer>, message: String) {
    match log {
        Some(log) => log.error(message),
        None => error!("{}", message),
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::core::{Arity, ConCommand, ParamKind, Severity};

    #[derive(Resource, Default)]
    struct Seen(Vec<String>);

    fn world_with(commands: Vec<ConCommand>) -> (World, CommandQueue) {
        let mut world = World::new();
        let queue = CommandQueue::new();
        let mut registry = CommandRegistry::new();
        for cmd in commands {
            registry.register(cmd).unwrap();
        }
        world.insert_resource(registry);
        world.insert_resource(queue.clone());
        world.init_resource::<Seen>();
        (world, queue)
    }

    fn record(name: &'static str) -> ConCommand {
        ConCommand::new(name, move |args, world| {
            let text = args.text(0).map(|t| format!("{name} {t}")).unwrap_or(name.to_string());
            world.resource_mut::<Seen>().0.push(text);
        })
        .params([ParamKind::OptionalText])
    }

    #[test]
    fn test_fifo_order() {
        let (mut world, queue) = world_with(vec![record("a"), record("b"), record("c")]);
        queue.push("a");
        queue.push("b");
        queue.push("c");

        queue.drain_all(&mut world);
        assert_eq!(world.resource::<Seen>().0, vec!["a", "b", "c"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_push_during_drain_waits_for_next_drain() {
        let again = ConCommand::new("again", |_, world| {
            world.resource::<CommandQueue>().push("again");
            world.resource_mut::<Seen>().0.push("again".into());
        });
        let (mut world, queue) = world_with(vec![again]);
        queue.push("again");

        queue.drain_all(&mut world);
        assert_eq!(world.resource::<Seen>().0.len(), 1);
        assert_eq!(queue.len(), 1);

        queue.drain_all(&mut world);
        assert_eq!(world.resource::<Seen>().0.len(), 2);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_bad_command_does_not_stop_drain() {
        let (mut world, queue) = world_with(vec![record("ok")]);
        queue.push("nope");
        queue.push("ok first");
        queue.push("ok second");

        let outcomes = queue.drain_all(&mut world);
        assert_eq!(outcomes.len(), 3);
        assert!(matches!(
            &outcomes[0],
            DrainOutcome::Rejected { error: DispatchError::CommandNotFound(name), .. } if name == "nope"
        ));
        assert_eq!(world.resource::<Seen>().0, vec!["ok first", "ok second"]);
    }

    #[test]
    fn test_end_to_end_add() {
        #[derive(Resource, Default)]
        struct Sums(Vec<(i64, i64)>);

        let add = ConCommand::new("add", |args, world| {
            let pair = (args.integer(0).unwrap_or_default(), args.integer(1).unwrap_or_default());
            world.resource_mut::<Sums>().0.push(pair);
        })
        .params([ParamKind::Integer, ParamKind::Integer]);

        let (mut world, queue) = world_with(vec![add]);
        world.init_resource::<Sums>();

        queue.push("add 2 3");
        let outcomes = queue.drain_all(&mut world);
        assert_eq!(outcomes, vec![DrainOutcome::Executed { line: "add 2 3".into() }]);
        assert_eq!(world.resource::<Sums>().0, vec![(2, 3)]);

        queue.push("add 2 x");
        let outcomes = queue.drain_all(&mut world);
        assert_eq!(
            outcomes,
            vec![DrainOutcome::Rejected {
                line: "add 2 x".into(),
                error: DispatchError::ArgumentType {
                    command: "add".into(),
                    index: 1,
                    expected: ParamKind::Integer,
                },
            }]
        );

        queue.push("add 1");
        let outcomes = queue.drain_all(&mut world);
        assert!(matches!(
            &outcomes[0],
            DrainOutcome::Rejected {
                error: DispatchError::ArityMismatch { expected: Arity { min: 2, max: 2 }, actual: 1, .. },
                ..
            }
        ));

        queue.push("nope");
        let outcomes = queue.drain_all(&mut world);
        assert!(matches!(
            &outcomes[0],
            DrainOutcome::Rejected { error: DispatchError::CommandNotFound(_), .. }
        ));

        assert_eq!(world.resource::<Sums>().0.len(), 1);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let (mut world, queue) = world_with(vec![]);
        queue.push("   ");
        queue.push("\t");
        assert!(queue.drain_all(&mut world).is_empty());
    }

    #[test]
    fn test_commands_are_echoed_to_log() {
        let (mut world, queue) = world_with(vec![record("ok")]);
        let log = LogBuffer::new(10);
        world.insert_resource(log.clone());

        queue.push("ok now");
        queue.drain_all(&mut world);
        let lines: Vec<_> = log.snapshot_all().into_iter().map(|e| e.message).collect();
        assert_eq!(lines, vec!["> ok now"]);
    }

    #[test]
    fn test_echo_can_be_disabled() {
        let (mut world, queue) = world_with(vec![record("ok")]);
        let log = LogBuffer::new(10);
        world.insert_resource(log.clone());
        world.insert_resource(ConsoleConfig {
            echo_commands: false,
            ..default()
        });

        queue.push("ok now");
        queue.drain_all(&mut world);
        assert!(log.is_empty());
        assert_eq!(world.resource::<Seen>().0, vec!["ok now"]);
    }

    #[test]
    fn test_failures_are_logged_as_errors() {
        let add = ConCommand::new("add", |_, _| {}).params([ParamKind::Integer, ParamKind::Integer]);
        let boom = ConCommand::new("boom", |_, _| panic!("kaboom"));
        let (mut world, queue) = world_with(vec![add, boom]);
        let log = LogBuffer::new(20);
        world.insert_resource(log.clone());

        for line in ["nope", "add 2 x", "add 1", "boom"] {
            queue.push(line);
            queue.drain_all(&mut world);

            let last = log.snapshot(1).pop().unwrap();
            assert_eq!(last.severity, Severity::Error, "after '{line}'");
        }

        let errors: Vec<_> = log
            .snapshot_all()
            .into_iter()
            .filter(|e| e.severity == Severity::Error)
            .map(|e| e.message)
            .collect();
        assert_eq!(errors.len(), 4);
        assert!(errors[3].contains("Command 'boom' panicked"));
        assert!(errors[3].contains("kaboom"));
    }

    #[test]
    fn test_concurrent_producers() {
        let queue = CommandQueue::new();
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let queue = queue.clone();
                thread::spawn(move || {
                    for i in 0..25 {
                        queue.push(format!("{t} {i}"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let lines = queue.take_pending();
        assert_eq!(lines.len(), 100);
        // Each producer's own lines stay in push order.
        for t in 0..4 {
            let mine: Vec<_> = lines.iter().filter(|l| l.starts_with(&format!("{t} "))).collect();
            let expected: Vec<_> = (0..25).map(|i| format!("{t} {i}")).collect();
            assert_eq!(mine, expected.iter().collect::<Vec<_>>());
        }
    }
}
