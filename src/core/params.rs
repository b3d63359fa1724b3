//! Parameter lists and argument coercion.
//!
//! A command declares an ordered list of [`ParamKind`]s when it is
//! registered. At dispatch time the argument tokens are matched against that
//! list, left to right, and coerced into [`ArgValue`]s before the handler
//! runs.

use std::fmt;

use super::tokenizer::ArgToken;
use super::{Arity, DescriptorError, DispatchError};

/// The kind of a single command parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// A signed integer (`i64`).
    Integer,
    /// A floating point number (`f64`).
    Float,
    /// A single token of text.
    Text,
    /// Optional trailing text: the rest of the line, verbatim.
    OptionalText,
    /// Optional trailing integer: at most one token.
    OptionalInteger,
    /// Optional trailing float: at most one token.
    OptionalFloat,
}

impl ParamKind {
    /// Whether the parameter may be omitted.
    #[inline]
    pub fn is_optional(&self) -> bool {
        matches!(
            self,
            ParamKind::OptionalText | ParamKind::OptionalInteger | ParamKind::OptionalFloat
        )
    }

    /// Placeholder used in usage strings.
    pub fn placeholder(&self) -> &'static str {
        match self {
            ParamKind::Integer => "<int>",
            ParamKind::Float => "<float>",
            ParamKind::Text => "<text>",
            ParamKind::OptionalText => "[text...]",
            ParamKind::OptionalInteger => "[int]",
            ParamKind::OptionalFloat => "[float]",
        }
    }

    /// Human-readable description used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            ParamKind::Integer | ParamKind::OptionalInteger => "an integer",
            ParamKind::Float | ParamKind::OptionalFloat => "a number",
            ParamKind::Text | ParamKind::OptionalText => "text",
        }
    }

    fn coerce(&self, token: &str) -> Option<ArgValue> {
        match self {
            ParamKind::Integer | ParamKind::OptionalInteger => {
                token.parse().ok().map(ArgValue::Integer)
            }
            ParamKind::Float | ParamKind::OptionalFloat => token.parse().ok().map(ArgValue::Float),
            ParamKind::Text | ParamKind::OptionalText => Some(ArgValue::Text(token.to_string())),
        }
    }
}

/// Ordered parameter list of a command.
///
/// Only the last parameter may be optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterDescriptor {
    kinds: Vec<ParamKind>,
}

impl ParameterDescriptor {
    /// Create a descriptor, rejecting optional parameters before the last slot.
    pub fn new(kinds: impl Into<Vec<ParamKind>>) -> Result<Self, DescriptorError> {
        let kinds = kinds.into();
        let last = kinds.len().saturating_sub(1);
        if let Some(index) = kinds.iter().take(last).position(ParamKind::is_optional) {
            return Err(DescriptorError::OptionalNotLast { index });
        }
        Ok(Self { kinds })
    }

    /// The declared kinds, in order.
    #[inline]
    pub fn kinds(&self) -> &[ParamKind] {
        &self.kinds
    }

    /// Number of declared parameters.
    #[inline]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Check if the command takes no parameters.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Whether the last parameter is optional.
    pub fn has_optional(&self) -> bool {
        self.kinds.last().is_some_and(ParamKind::is_optional)
    }

    /// Accepted argument count.
    ///
    /// An optional text slot absorbs any number of trailing tokens, but it is
    /// still reported as one argument.
    pub fn arity(&self) -> Arity {
        let max = self.kinds.len();
        let min = if self.has_optional() { max - 1 } else { max };
        Arity { min, max }
    }

    /// Placeholders joined by spaces, e.g. `<int> <int> [text...]`.
    pub fn usage(&self) -> String {
        self.kinds
            .iter()
            .map(ParamKind::placeholder)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Coerce argument tokens cut from `line` into typed values.
    ///
    /// Arity is checked before any token is parsed. An optional text slot
    /// receives the slice of `line` from the first remaining token to the end
    /// of the last one, so internal spacing survives.
    pub fn coerce(
        &self,
        command: &str,
        line: &str,
        tokens: &[ArgToken<'_>],
    ) -> Result<CommandArgs, DispatchError> {
        let arity = self.arity();
        let absorbs_rest = self.kinds.last() == Some(&ParamKind::OptionalText);
        let count_ok = if absorbs_rest {
            tokens.len() >= arity.min
        } else {
            arity.accepts(tokens.len())
        };

        if !count_ok {
            return Err(DispatchError::ArityMismatch {
                command: command.to_string(),
                expected: arity,
                actual: tokens.len(),
            });
        }

        let mut values = Vec::with_capacity(self.kinds.len());
        for (index, kind) in self.kinds.iter().enumerate() {
            let Some(token) = tokens.get(index) else {
                values.push(ArgValue::Absent);
                continue;
            };

            if *kind == ParamKind::OptionalText {
                let end = tokens.last().map_or(token.end, |t| t.end);
                let rest = line.get(token.start..end).unwrap_or(token.as_str());
                values.push(ArgValue::Text(rest.to_string()));
                break;
            }

            let value = kind.coerce(token.as_str()).ok_or_else(|| DispatchError::ArgumentType {
                command: command.to_string(),
                index,
                expected: *kind,
            })?;
            values.push(value);
        }

        Ok(CommandArgs::new(line, values))
    }
}

impl fmt::Display for ParameterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.usage())
    }
}

/// A coerced argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// An integer argument.
    Integer(i64),
    /// A floating point argument.
    Float(f64),
    /// A text argument.
    Text(String),
    /// An omitted optional argument.
    Absent,
}

impl ArgValue {
    /// The integer value, if this is an integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ArgValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// The numeric value as `f64`, if this is a number.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ArgValue::Float(v) => Some(*v),
            ArgValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// The text value, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ArgValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this is an omitted optional argument.
    #[inline]
    pub fn is_absent(&self) -> bool {
        matches!(self, ArgValue::Absent)
    }
}

/// Coerced arguments passed to a command handler.
///
/// There is one value per declared parameter, in declaration order; an
/// omitted optional parameter is [`ArgValue::Absent`].
#[derive(Debug, Clone, PartialEq)]
pub struct CommandArgs {
    /// The raw command line.
    raw: String,
    /// Coerced values.
    values: Vec<ArgValue>,
}

impl CommandArgs {
    /// Create new command args from a raw line and coerced values.
    pub fn new(raw: impl Into<String>, values: Vec<ArgValue>) -> Self {
        Self {
            raw: raw.into(),
            values,
        }
    }

    /// Get the raw command line.
    #[inline]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Get the number of values (equals the parameter count).
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get a value by index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&ArgValue> {
        self.values.get(index)
    }

    /// Integer argument at `index`.
    pub fn integer(&self, index: usize) -> Option<i64> {
        self.get(index).and_then(ArgValue::as_integer)
    }

    /// Numeric argument at `index` as `f64`.
    pub fn float(&self, index: usize) -> Option<f64> {
        self.get(index).and_then(ArgValue::as_float)
    }

    /// Text argument at `index`; `None` for an omitted optional argument.
    pub fn text(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(ArgValue::as_text)
    }

    /// Text argument at `index`, or `default` if omitted.
    pub fn text_or<'a>(&'a self, index: usize, default: &'a str) -> &'a str {
        self.text(index).unwrap_or(default)
    }

    /// Get all values as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[ArgValue] {
        &self.values
    }

    /// Iterate over values.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &ArgValue> {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{tokenize, DEFAULT_DELIMITERS};

    fn coerce(kinds: &[ParamKind], args_line: &str) -> Result<CommandArgs, DispatchError> {
        let descriptor = ParameterDescriptor::new(kinds.to_vec()).unwrap();
        let tokens: Vec<_> = tokenize(args_line, DEFAULT_DELIMITERS).collect();
        descriptor.coerce("cmd", args_line, &tokens)
    }

    #[test]
    fn test_descriptor_rejects_early_optional() {
        let err = ParameterDescriptor::new(vec![ParamKind::OptionalText, ParamKind::Integer]);
        assert_eq!(err, Err(DescriptorError::OptionalNotLast { index: 0 }));

        assert!(ParameterDescriptor::new(vec![ParamKind::Integer, ParamKind::OptionalText]).is_ok());
        assert!(ParameterDescriptor::new(vec![]).is_ok());
    }

    #[test]
    fn test_arity() {
        let d = ParameterDescriptor::new(vec![ParamKind::Text, ParamKind::OptionalInteger]).unwrap();
        assert_eq!(d.arity(), Arity { min: 1, max: 2 });

        let d = ParameterDescriptor::new(vec![ParamKind::Integer, ParamKind::Integer]).unwrap();
        assert_eq!(d.arity(), Arity { min: 2, max: 2 });
    }

    #[test]
    fn test_coerce_integers() {
        let args = coerce(&[ParamKind::Integer, ParamKind::Integer], "2 3").unwrap();
        assert_eq!(args.integer(0), Some(2));
        assert_eq!(args.integer(1), Some(3));
    }

    #[test]
    fn test_coerce_float_and_text() {
        let args = coerce(&[ParamKind::Float, ParamKind::Text], "-1.5 a=b").unwrap();
        assert_eq!(args.float(0), Some(-1.5));
        assert_eq!(args.text(1), Some("a=b"));
    }

    #[test]
    fn test_type_error_reports_index() {
        let err = coerce(&[ParamKind::Integer, ParamKind::Integer], "2 x").unwrap_err();
        assert_eq!(
            err,
            DispatchError::ArgumentType {
                command: "cmd".into(),
                index: 1,
                expected: ParamKind::Integer,
            }
        );
    }

    #[test]
    fn test_arity_checked_before_types() {
        let err = coerce(&[ParamKind::Integer, ParamKind::Integer], "x").unwrap_err();
        assert!(matches!(err, DispatchError::ArityMismatch { actual: 1, .. }));
    }

    #[test]
    fn test_too_many_arguments() {
        let err = coerce(&[ParamKind::Integer], "1 2").unwrap_err();
        assert_eq!(
            err,
            DispatchError::ArityMismatch {
                command: "cmd".into(),
                expected: Arity { min: 1, max: 1 },
                actual: 2,
            }
        );
    }

    #[test]
    fn test_optional_text_absent() {
        let args = coerce(&[ParamKind::Text, ParamKind::OptionalText], "reload").unwrap();
        assert_eq!(args.text(0), Some("reload"));
        assert_eq!(args.get(1), Some(&ArgValue::Absent));
        assert_eq!(args.text(1), None);
    }

    #[test]
    fn test_optional_text_takes_rest_verbatim() {
        let args = coerce(&[ParamKind::Text, ParamKind::OptionalText], "create name=bob   group=2").unwrap();
        assert_eq!(args.text(1), Some("name=bob   group=2"));
    }

    #[test]
    fn test_optional_numeric_single_token() {
        let args = coerce(&[ParamKind::OptionalInteger], "").unwrap();
        assert!(args.get(0).unwrap().is_absent());

        let args = coerce(&[ParamKind::OptionalInteger], "7").unwrap();
        assert_eq!(args.integer(0), Some(7));

        let err = coerce(&[ParamKind::OptionalInteger], "7 8").unwrap_err();
        assert!(matches!(err, DispatchError::ArityMismatch { actual: 2, .. }));

        let err = coerce(&[ParamKind::OptionalFloat], "abc").unwrap_err();
        assert!(matches!(err, DispatchError::ArgumentType { index: 0, .. }));
    }

    #[test]
    fn test_no_params() {
        assert!(coerce(&[], "").unwrap().is_empty());
        assert!(coerce(&[], "extra").is_err());
    }

    #[test]
    fn test_usage() {
        let d = ParameterDescriptor::new(vec![ParamKind::Integer, ParamKind::Float, ParamKind::OptionalText])
            .unwrap();
        assert_eq!(d.usage(), "<int> <float> [text...]");
    }
}
