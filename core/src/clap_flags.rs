//! clap adapter for concrete flags and parsed matches.
//!
//! Registration: [`to_arg`] builds a [`clap::Arg`] for each
//! [`ConcreteFlag`] and [`register`] adds a whole list to a
//! [`clap::Command`]. Booleans take one of two shapes depending on their
//! default (see [`ArgShape`]).
//!
//! Reading back: [`MatchesCommandLine`] wraps [`clap::ArgMatches`] as a
//! [`CommandLine`](crate::CommandLine) for
//! [`driver_options`](crate::driver_options).
//!
//! # Example
//!
//! ```
//! use clap::Command;
//! use machine_flags_core::clap_flags::{MatchesCommandLine, register};
//! use machine_flags_core::*;
//!
//! let descriptors: Vec<FlagDescriptor> = vec![
//!     BoolFlag::new("enable-ssl").with_value(true).into(),
//!     IntFlag::new("retries").with_value(3).into(),
//! ];
//! let flags = convert_flags(&descriptors).unwrap();
//!
//! let matches = register(Command::new("create"), &flags)
//!     .try_get_matches_from(["create", "--retries", "5"])
//!     .unwrap();
//! let opts = driver_options(&MatchesCommandLine::new(&matches), &descriptors);
//!
//! assert!(opts.bool("enable-ssl"));
//! assert_eq!(opts.int("retries"), 5);
//! ```

use clap::builder::BoolishValueParser;
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use tracing::{debug, trace, warn};

use crate::{ConcreteFlag, DirectSequenceReadable, FlagValue, GenericGettable, ValueKind};

/// How a concrete flag is spelled on the command line.
///
/// Both boolean shapes take an optional `=value`: bare `--name` means
/// `true` and `--name=false` means `false`. Values (and environment
/// bindings) accept `true`/`false`, `yes`/`no`, `on`/`off` and `1`/`0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgShape {
    /// Boolean defaulting to `false`.
    Switch,
    /// Boolean defaulting to `true`.
    NegatableSwitch,
    /// Single int or string value.
    Single,
    /// Repeatable string value; environment values split on `,`.
    Multiple,
}

/// Returns the shape `flag` is registered with.
///
/// # Examples
///
/// ```
/// use machine_flags_core::clap_flags::{ArgShape, arg_shape};
/// use machine_flags_core::{BoolFlag, FlagDescriptor, convert_flags};
///
/// let flags = convert_flags(&[
///     FlagDescriptor::from(BoolFlag::new("azure-managed-disks").with_value(true)),
///     FlagDescriptor::from(BoolFlag::new("debug")),
/// ]).unwrap();
/// assert_eq!(arg_shape(&flags[0]), ArgShape::NegatableSwitch);
/// assert_eq!(arg_shape(&flags[1]), ArgShape::Switch);
/// ```
pub fn arg_shape(flag: &ConcreteFlag) -> ArgShape {
    match flag.default {
        FlagValue::Bool(false) => ArgShape::Switch,
        FlagValue::Bool(true) => ArgShape::NegatableSwitch,
        FlagValue::Int(_) | FlagValue::String(_) => ArgShape::Single,
        FlagValue::StringSlice(_) => ArgShape::Multiple,
    }
}

/// Builds the clap argument for `flag`.
///
/// The flag name is both the argument id and the long option. Usage and
/// environment binding are carried over; the default is registered unless
/// it is an empty string or an empty sequence.
pub fn to_arg(flag: &ConcreteFlag) -> Arg {
    let mut arg = Arg::new(flag.name.clone()).long(flag.name.clone());
    if !flag.usage.is_empty() {
        arg = arg.help(flag.usage.clone());
    }
    if let Some(env_var) = &flag.env_var {
        arg = arg.env(env_var.clone());
    }

    match &flag.default {
        FlagValue::Bool(default) => arg
            .action(ArgAction::Set)
            .value_parser(BoolishValueParser::new())
            .num_args(0..=1)
            .require_equals(true)
            .default_value(default.to_string())
            .default_missing_value("true"),
        FlagValue::Int(default) => arg
            .action(ArgAction::Set)
            .value_parser(value_parser!(i64))
            .allow_negative_numbers(true)
            .default_value(default.to_string()),
        FlagValue::String(default) => {
            let arg = arg.action(ArgAction::Set);
            if default.is_empty() {
                arg
            } else {
                arg.default_value(default.clone())
            }
        }
        FlagValue::StringSlice(default) => {
            let arg = arg.action(ArgAction::Append).value_delimiter(',');
            if default.is_empty() {
                arg
            } else {
                arg.default_values(default.clone())
            }
        }
    }
}

/// Adds every flag in `flags` to `command`, in order.
///
/// A flag whose name is already taken by one of the command's own
/// arguments (including the built-in `help` and `version` flags) is
/// skipped with a warning and reads as absent afterwards.
pub fn register(command: Command, flags: &[ConcreteFlag]) -> Command {
    flags.iter().fold(command, |command, flag| {
        if is_taken(&command, &flag.name) {
            warn!(flag = %flag.name, "Flag name is taken by the command; not registering it");
            return command;
        }
        debug!(flag = %flag.name, shape = ?arg_shape(flag), "Registering driver flag");
        command.arg(to_arg(flag))
    })
}

fn is_taken(command: &Command, name: &str) -> bool {
    let builtin = match name {
        "help" => !command.is_disable_help_flag_set(),
        "version" => command.get_version().is_some() && !command.is_disable_version_flag_set(),
        _ => false,
    };
    builtin
        || command
            .get_arguments()
            .any(|arg| arg.get_id() == name || arg.get_long() == Some(name))
}

/// [`CommandLine`](crate::CommandLine) view of parsed [`ArgMatches`].
///
/// Ids that were never registered read as absent.
#[derive(Debug, Clone, Copy)]
pub struct MatchesCommandLine<'a> {
    matches: &'a ArgMatches,
}

impl<'a> MatchesCommandLine<'a> {
    /// Wraps parsed matches.
    pub fn new(matches: &'a ArgMatches) -> Self {
        Self { matches }
    }
}

impl GenericGettable for MatchesCommandLine<'_> {
    fn get(&self, name: &str, kind: ValueKind) -> Option<FlagValue> {
        let value = match kind {
            ValueKind::Bool => self
                .matches
                .try_get_one::<bool>(name)
                .map(|value| value.copied().map(FlagValue::Bool)),
            ValueKind::Int => self
                .matches
                .try_get_one::<i64>(name)
                .map(|value| value.copied().map(FlagValue::Int)),
            ValueKind::String => self
                .matches
                .try_get_one::<String>(name)
                .map(|value| value.cloned().map(FlagValue::String)),
            ValueKind::StringSlice => return None,
        };

        match value {
            Ok(Some(value)) => {
                let source = self.matches.value_source(name);
                trace!(flag = %name, source = ?source, "Read flag from matches");
                Some(value)
            }
            Ok(None) => None,
            Err(err) => {
                debug!(flag = %name, error = %err, "Flag not readable from matches");
                None
            }
        }
    }
}

impl DirectSequenceReadable for MatchesCommandLine<'_> {
    fn string_slice(&self, name: &str) -> Option<Vec<String>> {
        let values: Vec<String> = match self.matches.try_get_many::<String>(name) {
            Ok(values) => values?.cloned().collect(),
            Err(err) => {
                debug!(flag = %name, error = %err, "Flag not readable from matches");
                return None;
            }
        };

        if is_empty_env_binding(&values, self.matches.value_source(name)) {
            trace!(flag = %name, "Empty environment value; treating flag as unset");
            return None;
        }
        Some(values)
    }
}

/// An environment variable set to `""` unsets the binding rather than
/// supplying one empty element.
fn is_empty_env_binding(values: &[String], source: Option<ValueSource>) -> bool {
    source == Some(ValueSource::EnvVariable) && values.iter().all(String::is_empty)
}
