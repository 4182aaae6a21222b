//! Driver flag sets declared in YAML or JSON.
//!
//! A flag set names a driver and lists the flags it accepts. Drivers that
//! are not compiled into the tool (or tools that want to describe them
//! declaratively) ship one of these instead of building descriptors in
//! code.
//!
//! # Example YAML
//!
//! ```yaml
//! driver: amazonec2
//! flags:
//!   - type: string
//!     name: amazonec2-region
//!     usage: AWS region
//!     env_var: AWS_DEFAULT_REGION
//!     value: us-east-1
//!   - type: bool
//!     name: amazonec2-use-ebs-optimized-instance
//!     usage: Create an EBS optimized instance
//!   - type: int
//!     name: amazonec2-root-size
//!     value: 16
//!   - type: string_slice
//!     name: amazonec2-security-group
//!     value: [docker-machine]
//! ```
//!
//! `type` is one of `bool`, `int`, `string`, `string_slice`. Other types
//! load as [`FlagDescriptor::Unrecognized`] and fail at conversion.

use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{FlagSetError, Result};
use crate::{ConcreteFlag, DescriptorError, FlagDescriptor, convert_flags, validate_descriptors};

/// Flags declared by one driver.
///
/// # Examples
///
/// ```
/// use machine_flags_core::DriverFlagSet;
///
/// let set = DriverFlagSet::from_yaml_str(r#"
/// driver: generic
/// flags:
///   - type: string
///     name: generic-ip-address
///     usage: IP Address of machine
/// "#).unwrap();
///
/// assert_eq!(set.driver, "generic");
/// assert_eq!(set.flags.len(), 1);
/// assert!(set.validate().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DriverFlagSet {
    /// Driver name.
    pub driver: String,
    /// Declared flags, in registration order.
    #[serde(default)]
    pub flags: Vec<FlagDescriptor>,
}

impl DriverFlagSet {
    /// Loads and validates a flag set from a YAML or JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](FlagSetError::Io) if the file cannot be read,
    /// [`Yaml`](FlagSetError::Yaml) if parsing fails, or
    /// [`InvalidDescriptor`](FlagSetError::InvalidDescriptor) if the
    /// descriptors fail [`validate`](Self::validate).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let set: Self = serde_yaml::from_reader(BufReader::new(file))?;
        debug!(
            path = %path.display(),
            driver = %set.driver,
            flags = set.flags.len(),
            "Loaded driver flag set"
        );
        set.ensure_valid()?;
        Ok(set)
    }

    /// Parses and validates a flag set from a YAML or JSON string.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load), minus I/O.
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let set: Self = serde_yaml::from_str(raw)?;
        set.ensure_valid()?;
        Ok(set)
    }

    /// Checks the descriptors for structural problems and returns all of
    /// them.
    pub fn validate(&self) -> Vec<DescriptorError> {
        validate_descriptors(&self.flags)
    }

    /// Converts the descriptors into concrete parser flags.
    ///
    /// # Errors
    ///
    /// Returns [`Conversion`](FlagSetError::Conversion) if any descriptor
    /// has an unsupported type.
    pub fn to_cli_flags(&self) -> Result<Vec<ConcreteFlag>> {
        Ok(convert_flags(&self.flags)?)
    }

    /// Looks up a descriptor by name.
    pub fn find_flag(&self, name: &str) -> Option<&FlagDescriptor> {
        self.flags.iter().find(|flag| flag.name() == name)
    }

    fn ensure_valid(&self) -> Result<()> {
        match self.validate().into_iter().next() {
            Some(source) => Err(FlagSetError::InvalidDescriptor {
                driver: self.driver.clone(),
                source,
            }),
            None => Ok(()),
        }
    }
}
