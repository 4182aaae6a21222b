//! Descriptor to concrete flag conversion.
//!
//! [`convert_flags`] maps each [`FlagDescriptor`] a driver declares onto the
//! [`ConcreteFlag`] registered with the command-line parser. Name, usage and
//! environment binding are carried through verbatim; the declared default
//! becomes the parser default.
//!
//! # Example
//!
//! ```
//! use machine_flags_core::*;
//!
//! let descriptors: Vec<FlagDescriptor> = vec![
//!     StringFlag::new("region").with_value("us-east-1".into()).into(),
//!     BoolFlag::new("enable-ssl").with_value(true).into(),
//! ];
//!
//! let flags = convert_flags(&descriptors).unwrap();
//! assert_eq!(flags[0].default, FlagValue::String("us-east-1".into()));
//! assert_eq!(flags[1].default, FlagValue::Bool(true));
//! ```

use thiserror::Error;
use tracing::{debug, trace};

use crate::{ConcreteFlag, Flag, FlagDescriptor, FlagValue};

/// Descriptor conversion errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The descriptor's kind has no concrete flag mapping.
    #[error("unsupported flag type '{kind}' for flag '{name}'")]
    UnsupportedFlagType {
        /// Flag name.
        name: String,
        /// Declared kind.
        kind: String,
    },
}

/// Converts driver flag descriptors into concrete parser flags.
///
/// Produces exactly one flag per descriptor, in input order. A single
/// unsupported descriptor fails the whole conversion so that a driver is
/// never registered with a partial flag set.
///
/// # Errors
///
/// Returns [`ConversionError::UnsupportedFlagType`] for the first
/// [`FlagDescriptor::Unrecognized`] entry.
///
/// # Examples
///
/// ```
/// use machine_flags_core::*;
///
/// let unknown = FlagDescriptor::Unrecognized {
///     name: "timeout".into(),
///     kind: "duration".into(),
/// };
/// let err = convert_flags(&[IntFlag::new("port").into(), unknown]).unwrap_err();
/// assert!(matches!(err, ConversionError::UnsupportedFlagType { .. }));
///
/// assert!(convert_flags(&[]).unwrap().is_empty());
/// ```
pub fn convert_flags(descriptors: &[FlagDescriptor]) -> Result<Vec<ConcreteFlag>, ConversionError> {
    descriptors.iter().map(convert_flag).collect()
}

fn convert_flag(descriptor: &FlagDescriptor) -> Result<ConcreteFlag, ConversionError> {
    let flag = match descriptor {
        FlagDescriptor::Bool(flag) => concrete(flag, FlagValue::Bool(flag.value)),
        FlagDescriptor::Int(flag) => concrete(flag, FlagValue::Int(flag.value)),
        FlagDescriptor::String(flag) => concrete(flag, FlagValue::String(flag.value.clone())),
        FlagDescriptor::StringSlice(flag) => {
            concrete(flag, FlagValue::StringSlice(flag.value.clone()))
        }
        FlagDescriptor::Unrecognized { name, kind } => {
            debug!(flag = %name, kind = %kind, "Rejecting flag of unsupported type");
            return Err(ConversionError::UnsupportedFlagType {
                name: name.clone(),
                kind: kind.clone(),
            });
        }
    };
    trace!(flag = %flag.name, kind = %flag.kind(), "Converted flag descriptor");
    Ok(flag)
}

fn concrete<T>(flag: &Flag<T>, default: FlagValue) -> ConcreteFlag {
    ConcreteFlag {
        name: flag.name.clone(),
        usage: flag.usage.clone(),
        env_var: flag.env_var.clone(),
        default,
    }
}
