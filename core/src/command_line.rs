//! Read access to parsed command-line state.
//!
//! Parsers expose flag values in two shapes. Scalar flags (bool, int,
//! string) are read through a generic "current value" accessor, while
//! repeatable string flags are read by a direct typed lookup. The two
//! capabilities are separate traits so the extractor can pick one from the
//! flag's declared kind:
//!
//! - [`GenericGettable`]: scalar values.
//! - [`DirectSequenceReadable`]: string sequences.
//!
//! [`CommandLine`] is implemented for every type providing both.
//! [`MapCommandLine`] is an in-memory implementation; the clap-backed one
//! lives in [`clap_flags`](crate::clap_flags).

use std::collections::HashMap;

use crate::{FlagValue, ValueKind};

/// Generic access to the current value of a scalar flag.
pub trait GenericGettable {
    /// Returns the current value of flag `name`.
    ///
    /// `kind` is the kind the caller expects; typed backends use it to pick
    /// their lookup. Callers must still check the kind of the returned
    /// value. Returns `None` when the command line holds no entry for
    /// `name`.
    fn get(&self, name: &str, kind: ValueKind) -> Option<FlagValue>;
}

/// Direct typed access to repeatable string flags.
pub trait DirectSequenceReadable {
    /// Returns the values of string-sequence flag `name`, or `None` when the
    /// command line holds no entry for it.
    fn string_slice(&self, name: &str) -> Option<Vec<String>>;
}

/// Parsed command-line state readable through both capabilities.
pub trait CommandLine: GenericGettable + DirectSequenceReadable {}

impl<T: GenericGettable + DirectSequenceReadable + ?Sized> CommandLine for T {}

#[derive(Debug, Clone)]
enum Entry {
    Value(FlagValue),
    Sequence(Vec<String>),
}

/// In-memory command line.
///
/// Scalars added with [`with_value`](Self::with_value) are visible only
/// through [`GenericGettable`]; sequences added with
/// [`with_string_slice`](Self::with_string_slice) only through
/// [`DirectSequenceReadable`]. Useful for replaying options recorded
/// elsewhere and for tests.
///
/// # Examples
///
/// ```
/// use machine_flags_core::*;
///
/// let cmd = MapCommandLine::new()
///     .with_value("retries", FlagValue::Int(5))
///     .with_string_slice("tags", ["ford"]);
///
/// assert_eq!(cmd.get("retries", ValueKind::Int), Some(FlagValue::Int(5)));
/// assert_eq!(cmd.string_slice("tags"), Some(vec!["ford".to_string()]));
/// assert_eq!(cmd.get("tags", ValueKind::StringSlice), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapCommandLine {
    entries: HashMap<String, Entry>,
}

impl MapCommandLine {
    /// Creates an empty command line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a scalar entry readable through [`GenericGettable`].
    pub fn with_value(mut self, name: impl Into<String>, value: FlagValue) -> Self {
        self.entries.insert(name.into(), Entry::Value(value));
        self
    }

    /// Adds a sequence entry readable through [`DirectSequenceReadable`].
    pub fn with_string_slice<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.entries.insert(name.into(), Entry::Sequence(values));
        self
    }
}

impl GenericGettable for MapCommandLine {
    fn get(&self, name: &str, _kind: ValueKind) -> Option<FlagValue> {
        match self.entries.get(name) {
            Some(Entry::Value(value)) => Some(value.clone()),
            _ => None,
        }
    }
}

impl DirectSequenceReadable for MapCommandLine {
    fn string_slice(&self, name: &str) -> Option<Vec<String>> {
        match self.entries.get(name) {
            Some(Entry::Sequence(values)) => Some(values.clone()),
            _ => None,
        }
    }
}
