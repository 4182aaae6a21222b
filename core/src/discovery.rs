//! Swarm discovery URL validation.
//!
//! A discovery string tells cluster members where to find each other, as
//! `<scheme>://<location>` (for example `token://deadbeefcafe` or
//! `consul://10.0.0.5:8500/swarm`). The check is purely syntactic; no
//! backend is contacted.
//!
//! # Example
//!
//! ```
//! use machine_flags_core::{DiscoveryBackend, parse_swarm_discovery, validate_swarm_discovery};
//!
//! assert!(validate_swarm_discovery("").is_ok());
//! assert!(validate_swarm_discovery("token://deadbeefcafe").is_ok());
//! assert!(validate_swarm_discovery("foo").is_err());
//!
//! let discovery = parse_swarm_discovery("etcd://10.0.0.2:2379/swarm").unwrap();
//! assert_eq!(discovery.backend, DiscoveryBackend::Etcd);
//! assert_eq!(discovery.location, "10.0.0.2:2379/swarm");
//! ```

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static DISCOVERY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<scheme>[^:/\s]*)://(?P<location>.*)$").expect("static regex must compile")
});

static SCHEME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*$").expect("static regex must compile")
});

/// Discovery string validation errors.
///
/// Every variant carries the rejected input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The input is not of the form `<scheme>://<location>`.
    #[error("Swarm Discovery URL was in the wrong format: {0}")]
    Malformed(String),
    /// The scheme is empty or contains characters a URL scheme cannot.
    #[error("invalid scheme '{scheme}' in swarm discovery URL: {input}")]
    InvalidScheme {
        /// Full input string.
        input: String,
        /// Offending scheme.
        scheme: String,
    },
    /// Nothing (or only whitespace) follows `://`.
    #[error("swarm discovery URL is missing a location: {0}")]
    MissingLocation(String),
}

/// Discovery backend named by the URL scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryBackend {
    /// Hosted token discovery (`token://`).
    Token,
    /// Consul key/value store (`consul://`).
    Consul,
    /// etcd key/value store (`etcd://`).
    Etcd,
    /// ZooKeeper (`zk://`).
    Zookeeper,
    /// Static file listing members (`file://`).
    File,
    /// Static member list (`nodes://`).
    Nodes,
    /// Any other scheme, lowercased.
    Other(String),
}

impl DiscoveryBackend {
    fn from_scheme(scheme: &str) -> Self {
        match scheme.to_ascii_lowercase().as_str() {
            "token" => Self::Token,
            "consul" => Self::Consul,
            "etcd" => Self::Etcd,
            "zk" => Self::Zookeeper,
            "file" => Self::File,
            "nodes" => Self::Nodes,
            other => Self::Other(other.to_string()),
        }
    }
}

/// A syntactically valid discovery reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwarmDiscovery {
    /// Backend selected by the scheme.
    pub backend: DiscoveryBackend,
    /// Everything after `://`.
    pub location: String,
}

/// Parses a non-empty discovery string.
///
/// # Errors
///
/// Returns [`ValidationError::Malformed`] when there is no `://` separator
/// (this includes the empty string), [`ValidationError::InvalidScheme`] for
/// a bad scheme and [`ValidationError::MissingLocation`] when the location
/// is empty or contains whitespace.
pub fn parse_swarm_discovery(input: &str) -> Result<SwarmDiscovery, ValidationError> {
    let Some(caps) = DISCOVERY_RE.captures(input) else {
        return Err(ValidationError::Malformed(input.to_string()));
    };

    let scheme = &caps["scheme"];
    if !SCHEME_RE.is_match(scheme) {
        return Err(ValidationError::InvalidScheme {
            input: input.to_string(),
            scheme: scheme.to_string(),
        });
    }

    let location = &caps["location"];
    if location.is_empty() || location.chars().any(char::is_whitespace) {
        return Err(ValidationError::MissingLocation(input.to_string()));
    }

    Ok(SwarmDiscovery {
        backend: DiscoveryBackend::from_scheme(scheme),
        location: location.to_string(),
    })
}

/// Validates an optional discovery string.
///
/// The empty string is accepted because cluster discovery is optional.
///
/// # Errors
///
/// Returns the [`ValidationError`] from [`parse_swarm_discovery`] for any
/// other malformed input.
pub fn validate_swarm_discovery(input: &str) -> Result<(), ValidationError> {
    if input.is_empty() {
        return Ok(());
    }
    parse_swarm_discovery(input).map(|_| ())
}
