//! Command registry with hierarchical names.
//!
//! Commands live in a tree: `"cfg"`, `"cfg set"` and `"cfg reload"` share the
//! `cfg` node. Dispatch walks the tree one token per level and runs the
//! deepest command found on that walk; the tokens after it are arguments.
//!
//! A flat lookup keyed on the first token only would make multi-segment
//! names such as `"cfg set"` unreachable, because `cfg` would always win.
//! The tree walk is what lets both `cfg <section>` and `cfg set <section>
//! <key>` coexist.

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};

use bevy::prelude::*;

use super::tokenizer::{tokenize, ArgToken, DEFAULT_DELIMITERS};
use super::{
    CommandArgs, CommandHandler, ConCommand, DispatchError, ParameterDescriptor, RegistryError,
};

/// A registered command's payload.
pub struct CommandEntry {
    /// Full command path, segments joined by a single space.
    pub path: Box<str>,
    /// Description shown by `help`.
    pub description: &'static str,
    /// Declared parameter list.
    pub descriptor: ParameterDescriptor,
    handler: CommandHandler,
}

impl CommandEntry {
    /// Usage line, e.g. `add <int> <int>`.
    pub fn usage(&self) -> String {
        if self.descriptor.is_empty() {
            self.path.to_string()
        } else {
            format!("{} {}", self.path, self.descriptor.usage())
        }
    }
}

impl std::fmt::Debug for CommandEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandEntry")
            .field("path", &self.path)
            .field("description", &self.description)
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// One level of the command tree.
#[derive(Debug, Default)]
pub struct CommandNode {
    name: Box<str>,
    entry: Option<CommandEntry>,
    children: BTreeMap<Box<str>, CommandNode>,
}

impl CommandNode {
    fn named(name: &str) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// This node's own segment (empty for the root).
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The command registered at this node, if any.
    #[inline]
    pub fn entry(&self) -> Option<&CommandEntry> {
        self.entry.as_ref()
    }

    /// Subcommand nodes, sorted by name.
    pub fn children(&self) -> impl Iterator<Item = &CommandNode> {
        self.children.values()
    }

    fn is_prunable(&self) -> bool {
        self.entry.is_none() && self.children.is_empty()
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a CommandEntry>) {
        if let Some(entry) = &self.entry {
            out.push(entry);
        }
        for child in self.children.values() {
            child.collect(out);
        }
    }

    fn remove(&mut self, segments: &[&str]) -> bool {
        let Some((first, rest)) = segments.split_first() else {
            return self.entry.take().is_some();
        };
        let Some(child) = self.children.get_mut(*first) else {
            return false;
        };
        let removed = child.remove(rest);
        if removed && child.is_prunable() {
            self.children.remove(*first);
        }
        removed
    }
}

/// A resolved command ready to run.
///
/// Produced by [`CommandRegistry::resolve`] once the arguments have been
/// coerced; holding one does not borrow the registry.
pub struct Invocation {
    /// Full path of the matched command.
    pub path: Box<str>,
    /// Coerced arguments.
    pub args: CommandArgs,
    handler: CommandHandler,
}

impl Invocation {
    /// Run the handler.
    ///
    /// A panic inside the handler is caught and returned as its message.
    pub fn invoke(self, world: &mut World) -> Result<(), String> {
        let Invocation { args, handler, .. } = self;
        panic::catch_unwind(AssertUnwindSafe(|| handler(&args, world))).map_err(|panic_info| {
            if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            }
        })
    }
}

impl std::fmt::Debug for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invocation")
            .field("path", &self.path)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// Central registry for console commands.
///
/// Owned by the `App` as a resource; subsystems register at setup and
/// unregister at teardown.
///
/// # Examples
///
/// ```
/// use bevy_devconsole::core::{CommandRegistry, ConCommand, ParamKind};
///
/// let mut registry = CommandRegistry::new();
/// registry
///     .register(ConCommand::new("add", |_, _| {}).params([ParamKind::Integer, ParamKind::Integer]))
///     .unwrap();
///
/// let invocation = registry.resolve("add 2 3").unwrap();
/// assert_eq!(invocation.args.integer(1), Some(3));
/// assert!(registry.resolve("add 2 x").is_err());
/// ```
#[derive(Resource, Debug)]
pub struct CommandRegistry {
    root: CommandNode,
    delimiters: Vec<char>,
    len: usize,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    /// Create a new empty registry splitting on the default delimiters.
    pub fn new() -> Self {
        Self::with_delimiters(DEFAULT_DELIMITERS.to_vec())
    }

    /// Create a registry splitting names and lines on `delimiters`.
    pub fn with_delimiters(delimiters: Vec<char>) -> Self {
        Self {
            root: CommandNode::default(),
            delimiters,
            len: 0,
        }
    }

    /// The delimiters used to split lines.
    #[inline]
    pub fn delimiters(&self) -> &[char] {
        &self.delimiters
    }

    fn segments<'a>(&'a self, path: &'a str) -> Vec<&'a str> {
        tokenize(path, &self.delimiters).map(|t| t.as_str()).collect()
    }

    /// Register a command under its (possibly multi-segment) name.
    ///
    /// Intermediate nodes are created as needed. Registering a second
    /// command at the same path fails; the first registration stays.
    pub fn register(&mut self, cmd: ConCommand) -> Result<(), RegistryError> {
        let (name, description, params, handler) = cmd.split();
        let segments: Vec<String> = self.segments(&name).into_iter().map(String::from).collect();
        if segments.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        let path = segments.join(" ");

        let descriptor = ParameterDescriptor::new(params).map_err(|source| {
            RegistryError::InvalidDescriptor {
                name: path.clone(),
                source,
            }
        })?;

        let mut node = &mut self.root;
        for segment in &segments {
            node = node
                .children
                .entry(segment.as_str().into())
                .or_insert_with(|| CommandNode::named(segment));
        }

        if node.entry.is_some() {
            return Err(RegistryError::DuplicateName(path));
        }

        node.entry = Some(CommandEntry {
            path: path.into(),
            description,
            descriptor,
            handler,
        });
        self.len += 1;
        Ok(())
    }

    /// Remove the command at `path`.
    ///
    /// Subcommands below it stay registered. Returns `false` if nothing was
    /// registered there.
    pub fn unregister(&mut self, path: &str) -> bool {
        let segments: Vec<String> = self.segments(path).into_iter().map(String::from).collect();
        if segments.is_empty() {
            return false;
        }
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
        let removed = self.root.remove(&segments);
        if removed {
            self.len -= 1;
        }
        removed
    }

    /// Find the node at `path`.
    pub fn node(&self, path: &str) -> Option<&CommandNode> {
        let mut node = &self.root;
        for segment in tokenize(path, &self.delimiters) {
            node = node.children.get(segment.as_str())?;
        }
        Some(node)
    }

    /// The command registered at exactly `path`.
    pub fn get(&self, path: &str) -> Option<&CommandEntry> {
        self.node(path)?.entry()
    }

    /// Check if a command is registered at exactly `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Names of the subcommands directly below `path` (`""` for top level).
    pub fn children(&self, path: &str) -> Vec<&str> {
        self.node(path)
            .map(|node| node.children().map(CommandNode::name).collect())
            .unwrap_or_default()
    }

    /// All registered commands, depth first in name order.
    pub fn commands(&self) -> Vec<&CommandEntry> {
        let mut out = Vec::with_capacity(self.len);
        self.root.collect(&mut out);
        out
    }

    /// Commands whose path starts with `prefix`.
    pub fn prefix_iter<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a CommandEntry> {
        self.commands()
            .into_iter()
            .filter(move |entry| entry.path.starts_with(prefix))
    }

    /// Get the number of registered commands.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the registry is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Match `line` to a command and coerce its arguments.
    ///
    /// Tokens are consumed one tree level at a time for as long as a child
    /// node matches. The deepest node on that walk carrying a command wins
    /// and the remaining tokens become its arguments. Nothing is invoked.
    pub fn resolve(&self, line: &str) -> Result<Invocation, DispatchError> {
        let tokens: Vec<ArgToken<'_>> = tokenize(line, &self.delimiters).collect();
        let Some(first) = tokens.first() else {
            return Err(DispatchError::CommandNotFound(String::new()));
        };

        let mut node = &self.root;
        let mut matched: Option<(&CommandEntry, usize)> = None;
        let mut depth = 0;

        for token in &tokens {
            let Some(child) = node.children.get(token.as_str()) else {
                break;
            };
            node = child;
            depth += 1;
            if let Some(entry) = &node.entry {
                matched = Some((entry, depth));
            }
        }

        let Some((entry, consumed)) = matched else {
            let walked = if depth == 0 {
                first.as_str().to_string()
            } else {
                tokens[..depth]
                    .iter()
                    .map(|t| t.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            };
            return Err(DispatchError::CommandNotFound(walked));
        };

        let args = entry.descriptor.coerce(&entry.path, line, &tokens[consumed..])?;
        Ok(Invocation {
            path: entry.path.clone(),
            args,
            handler: entry.handler.clone(),
        })
    }

    /// Resolve `line` and run it against `world`.
    ///
    /// A handler panic is reported as `Ok(Err(message))`.
    pub fn dispatch(
        &self,
        line: &str,
        world: &mut World,
    ) -> Result<Result<(), String>, DispatchError> {
        let invocation = self.resolve(line)?;
        Ok(invocation.invoke(world))
    }
}
