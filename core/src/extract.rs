//! Driver option extraction from parsed command-line state.
//!
//! [`driver_options`] reads one value per descriptor out of a
//! [`CommandLine`] and collects them into [`DriverOptions`]. Extraction
//! never fails: a flag the command line holds no entry for reads as the
//! zero value of its kind.
//!
//! The descriptor's declared default is not consulted here. A parser that
//! registered the flag already reports that default when the flag was not
//! given, so the command line's current value is taken as-is.
//!
//! # Example
//!
//! ```
//! use machine_flags_core::*;
//!
//! let descriptors: Vec<FlagDescriptor> = vec![
//!     BoolFlag::new("enable-ssl").with_value(true).into(),
//!     IntFlag::new("retries").with_value(3).into(),
//! ];
//!
//! let cmd = MapCommandLine::new().with_value("retries", FlagValue::Int(5));
//! let opts = driver_options(&cmd, &descriptors);
//!
//! assert!(!opts.bool("enable-ssl"));
//! assert_eq!(opts.int("retries"), 5);
//! ```

use tracing::{debug, trace, warn};

use crate::{CommandLine, DriverOptions, FlagDescriptor, FlagValue, ValueKind};

/// Extracts driver options for `descriptors` from `command_line`.
///
/// Bool, int and string flags are read through
/// [`GenericGettable`](crate::GenericGettable); a returned value of another
/// kind is discarded with a warning. String-sequence flags are always read
/// through [`DirectSequenceReadable`](crate::DirectSequenceReadable).
/// Missing entries resolve to `false`, `0`, `""` or an empty sequence.
pub fn driver_options<C>(command_line: &C, descriptors: &[FlagDescriptor]) -> DriverOptions
where
    C: CommandLine + ?Sized,
{
    let mut options = DriverOptions::new();

    for descriptor in descriptors {
        let name = descriptor.name();
        let Some(kind) = descriptor.kind() else {
            debug!(flag = %name, "Skipping flag of unsupported type");
            continue;
        };

        let value = match kind {
            ValueKind::StringSlice => {
                FlagValue::StringSlice(command_line.string_slice(name).unwrap_or_default())
            }
            ValueKind::Bool | ValueKind::Int | ValueKind::String => {
                read_scalar(command_line, name, kind)
            }
        };
        trace!(flag = %name, value = ?value, "Extracted driver option");
        options.insert(name, value);
    }

    options
}

fn read_scalar<C>(command_line: &C, name: &str, kind: ValueKind) -> FlagValue
where
    C: CommandLine + ?Sized,
{
    match command_line.get(name, kind) {
        Some(value) if value.kind() == kind => value,
        Some(value) => {
            warn!(
                flag = %name,
                expected = %kind,
                found = %value.kind(),
                "Command line returned a value of the wrong type; using zero value"
            );
            FlagValue::zero(kind)
        }
        None => FlagValue::zero(kind),
    }
}
