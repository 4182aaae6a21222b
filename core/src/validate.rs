//! Descriptor list validation.
//!
//! Catches structural problems in a driver's flag declarations before they
//! reach the parser, where they would surface as registration panics or
//! silently shadowed flags: empty, malformed or reserved names, duplicate
//! names and duplicate environment bindings.
//!
//! # Examples
//!
//! ```
//! use machine_flags_core::*;
//!
//! let flags: Vec<FlagDescriptor> = vec![
//!     StringFlag::new("region").into(),
//!     IntFlag::new("retries").into(),
//! ];
//! assert!(validate_descriptors(&flags).is_empty());
//!
//! let duplicated: Vec<FlagDescriptor> = vec![
//!     StringFlag::new("region").into(),
//!     BoolFlag::new("region").into(),
//! ];
//! assert_eq!(
//!     validate_descriptors(&duplicated),
//!     vec![DescriptorError::DuplicateFlag("region".into())]
//! );
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::FlagDescriptor;

/// Names the command-line parser claims for itself.
const RESERVED_NAMES: &[&str] = &["help"];

/// Descriptor validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    /// Flag name is empty or whitespace-only.
    #[error("flag name cannot be empty")]
    EmptyName,
    /// Flag name starts with `-` or contains whitespace or `=`.
    #[error("invalid flag name: {0}")]
    InvalidName(String),
    /// Flag name is taken by the parser itself (`help`).
    #[error("flag name is reserved: {0}")]
    ReservedName(String),
    /// Two descriptors share a name.
    #[error("duplicate flag: {0}")]
    DuplicateFlag(String),
    /// Two descriptors bind the same environment variable.
    #[error("environment variable {env_var} is bound by both '{first}' and '{second}'")]
    DuplicateEnvVar {
        /// Environment variable name.
        env_var: String,
        /// Flag that bound it first.
        first: String,
        /// Flag that bound it again.
        second: String,
    },
}

/// Validates a driver's descriptor list.
///
/// Returns every problem found, in descriptor order. An empty result means
/// the list can be registered.
pub fn validate_descriptors(descriptors: &[FlagDescriptor]) -> Vec<DescriptorError> {
    let mut errors = Vec::new();
    let mut seen_names: HashSet<&str> = HashSet::new();
    let mut seen_env: Vec<(&str, &str)> = Vec::new();

    for descriptor in descriptors {
        let name = descriptor.name();
        if name.trim().is_empty() {
            errors.push(DescriptorError::EmptyName);
            continue;
        }

        if name.starts_with('-') || name.chars().any(|ch| ch.is_whitespace() || ch == '=') {
            errors.push(DescriptorError::InvalidName(name.to_string()));
        } else if RESERVED_NAMES.contains(&name) {
            errors.push(DescriptorError::ReservedName(name.to_string()));
        }

        if !seen_names.insert(name) {
            errors.push(DescriptorError::DuplicateFlag(name.to_string()));
        }

        if let Some(env_var) = descriptor.env_var() {
            match seen_env.iter().find(|(var, _)| *var == env_var) {
                Some((_, first)) => errors.push(DescriptorError::DuplicateEnvVar {
                    env_var: env_var.to_string(),
                    first: first.to_string(),
                    second: name.to_string(),
                }),
                None => seen_env.push((env_var, name)),
            }
        }
    }

    errors
}
