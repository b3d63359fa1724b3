//! Error types for registration and dispatch.

use std::fmt;

use thiserror::Error;

use super::ParamKind;

/// Number of arguments a command accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    /// Arguments that must be present.
    pub min: usize,
    /// Arguments accepted at most (`min + 1` when the last parameter is optional).
    pub max: usize,
}

impl Arity {
    /// Whether `count` arguments satisfy this arity.
    #[inline]
    pub fn accepts(&self, count: usize) -> bool {
        (self.min..=self.max).contains(&count)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{} to {}", self.min, self.max)
        }
    }
}

/// Failure to turn a text line into a handler invocation.
///
/// None of these ever reach the handler: coercion completes before the
/// handler is called, so a failed dispatch leaves no partial state behind.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    /// The line names no registered command.
    #[error("command '{0}' not found")]
    CommandNotFound(String),

    /// Wrong number of arguments for the command's parameter list.
    #[error("command '{command}' accepts {expected} arguments (called with {actual} arguments)")]
    ArityMismatch {
        /// Full command path.
        command: String,
        /// Accepted argument count.
        expected: Arity,
        /// Supplied argument count.
        actual: usize,
    },

    /// An argument failed to parse as its declared kind.
    #[error("{command}: argument[{index}] must be {}", .expected.describe())]
    ArgumentType {
        /// Full command path.
        command: String,
        /// Zero-based argument index.
        index: usize,
        /// Kind declared for that argument.
        expected: ParamKind,
    },
}

/// A parameter list that cannot be matched against text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DescriptorError {
    /// An optional parameter appears before the last position.
    #[error("optional parameter at position {index} must be the last parameter")]
    OptionalNotLast {
        /// Position of the misplaced optional parameter.
        index: usize,
    },
}

/// Failure to register a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A handler already exists at this path.
    #[error("command '{0}' is already registered")]
    DuplicateName(String),

    /// The command path contains no segments.
    #[error("command name is empty")]
    EmptyName,

    /// The command's parameter list is malformed.
    #[error("command '{name}': {source}")]
    InvalidDescriptor {
        /// Full command path.
        name: String,
        /// What is wrong with the parameter list.
        #[source]
        source: DescriptorError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_display() {
        assert_eq!(Arity { min: 2, max: 2 }.to_string(), "2");
        assert_eq!(Arity { min: 1, max: 2 }.to_string(), "1 to 2");
    }

    #[test]
    fn test_arity_accepts() {
        let arity = Arity { min: 1, max: 2 };
        assert!(!arity.accepts(0));
        assert!(arity.accepts(1));
        assert!(arity.accepts(2));
        assert!(!arity.accepts(3));
    }

    #[test]
    fn test_dispatch_error_messages() {
        let err = DispatchError::ArgumentType {
            command: "add".into(),
            index: 1,
            expected: ParamKind::Integer,
        };
        assert_eq!(err.to_string(), "add: argument[1] must be an integer");

        let err = DispatchError::CommandNotFound("nope".into());
        assert_eq!(err.to_string(), "command 'nope' not found");
    }
}
