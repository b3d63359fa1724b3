//! Console command (ConCommand) definition.
//!
//! A command pairs a handler with the parameter list it accepts. The list is
//! fixed at registration; dispatch coerces text arguments against it before
//! the handler is ever called.

use std::sync::Arc;

use bevy::prelude::*;

use super::{CommandArgs, ParamKind};

/// Type alias for command handler functions.
///
/// Handlers receive:
/// - `args`: one coerced value per declared parameter
/// - `world`: Mutable access to the Bevy world
///
/// Handlers are reference counted so dispatch can release the registry
/// before calling them; a handler may itself register commands or queue
/// new lines.
pub type CommandHandler = Arc<dyn Fn(&CommandArgs, &mut World) + Send + Sync>;

/// A console command with a typed parameter list and a handler.
///
/// # Examples
///
/// ```
/// use bevy_devconsole::core::{ConCommand, ParamKind};
///
/// let add = ConCommand::new("add", |args, _world| {
///     let sum = args.integer(0).unwrap_or(0) + args.integer(1).unwrap_or(0);
///     bevy::log::info!("{sum}");
/// })
/// .params([ParamKind::Integer, ParamKind::Integer])
/// .description("Add two integers");
///
/// assert_eq!(add.name(), "add");
/// assert_eq!(add.get_params().len(), 2);
/// ```
pub struct ConCommand {
    name: Box<str>,
    description: &'static str,
    params: Vec<ParamKind>,
    handler: CommandHandler,
}

impl ConCommand {
    /// Create a new command with the given name and handler.
    ///
    /// The name may contain several space-separated segments (`"cfg set"`)
    /// to register a subcommand.
    pub fn new<F>(name: impl Into<Box<str>>, handler: F) -> Self
    where
        F: Fn(&CommandArgs, &mut World) + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: "",
            params: Vec::new(),
            handler: Arc::new(handler),
        }
    }

    /// Set the parameter list.
    pub fn params(mut self, params: impl Into<Vec<ParamKind>>) -> Self {
        self.params = params.into();
        self
    }

    /// Set the description.
    pub fn description(mut self, desc: &'static str) -> Self {
        self.description = desc;
        self
    }

    /// Get the command name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the description.
    #[inline]
    pub fn get_description(&self) -> &'static str {
        self.description
    }

    /// Get the declared parameter kinds.
    #[inline]
    pub fn get_params(&self) -> &[ParamKind] {
        &self.params
    }

    /// Split the command into its parts for storage in the registry.
    pub(crate) fn split(self) -> (Box<str>, &'static str, Vec<ParamKind>, CommandHandler) {
        (self.name, self.description, self.params, self.handler)
    }
}

impl std::fmt::Debug for ConCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConCommand")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concommand_creation() {
        let cmd = ConCommand::new("cfg set", |_args, _world| {})
            .params([ParamKind::Text, ParamKind::Text, ParamKind::OptionalText])
            .description("Set a config value");

        assert_eq!(cmd.name(), "cfg set");
        assert_eq!(cmd.get_description(), "Set a config value");
        assert_eq!(cmd.get_params().len(), 3);
    }

    #[test]
    fn test_concommand_handler_runs() {
        #[derive(Resource, Default)]
        struct Hits(u32);

        let cmd = ConCommand::new("hit", |_args, world| {
            world.resource_mut::<Hits>().0 += 1;
        });

        let mut world = World::new();
        world.init_resource::<Hits>();

        let (_, _, _, handler) = cmd.split();
        handler(&CommandArgs::new("hit", Vec::new()), &mut world);
        handler(&CommandArgs::new("hit", Vec::new()), &mut world);
        assert_eq!(world.resource::<Hits>().0, 2);
    }
}
