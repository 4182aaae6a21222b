//! Driver flag adaptation for machine provisioning tools.
//!
//! Infrastructure drivers declare their options as provider-agnostic
//! [`FlagDescriptor`]s. This crate connects those declarations to the
//! command-line parser and back:
//!
//! - [`convert_flags`] turns descriptors into [`ConcreteFlag`]s, one per
//!   descriptor, in order.
//! - [`clap_flags`] registers concrete flags on a [`clap::Command`] and
//!   exposes parsed [`clap::ArgMatches`] as a [`CommandLine`] (feature
//!   `clap`, on by default).
//! - [`driver_options`] reads the parsed values back into the
//!   [`DriverOptions`] a driver consumes.
//! - [`validate_swarm_discovery`] checks the cluster discovery URL given
//!   on the command line.
//!
//! Flag sets can also be declared in YAML or JSON ([`DriverFlagSet`]) and
//! checked with [`validate_descriptors`].
//!
//! # Example
//!
//! ```
//! use machine_flags_core::*;
//!
//! let descriptors: Vec<FlagDescriptor> = vec![
//!     BoolFlag::new("enable-ssl").with_usage("Enable SSL").with_value(true).into(),
//!     IntFlag::new("retries").with_usage("Number of retries").with_value(3).into(),
//!     StringSliceFlag::new("tags").with_value(vec!["a".into(), "b".into()]).into(),
//! ];
//!
//! let flags = convert_flags(&descriptors).unwrap();
//! assert_eq!(flags.len(), 3);
//!
//! // Nothing parsed: every option reads as its zero value.
//! let opts = driver_options(&MapCommandLine::new(), &descriptors);
//! assert!(!opts.bool("enable-ssl"));
//! assert_eq!(opts.int("retries"), 0);
//! assert!(opts.string_slice("tags").is_empty());
//!
//! assert!(validate_swarm_discovery("token://deadbeefcafe").is_ok());
//! ```

#[cfg(feature = "clap")]
pub mod clap_flags;
mod command_line;
mod convert;
mod discovery;
mod error;
mod extract;
pub mod flagset;
mod types;
mod validate;

pub use command_line::{CommandLine, DirectSequenceReadable, GenericGettable, MapCommandLine};
pub use convert::{ConversionError, convert_flags};
pub use discovery::{
    DiscoveryBackend, SwarmDiscovery, ValidationError, parse_swarm_discovery,
    validate_swarm_discovery,
};
pub use error::{FlagSetError, Result};
pub use extract::driver_options;
pub use flagset::DriverFlagSet;
pub use types::*;
pub use validate::{DescriptorError, validate_descriptors};
