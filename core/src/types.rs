//! Flag and option type definitions.
//!
//! This module defines the data model shared by the converter, the
//! extractor, and the clap adapter:
//!
//! - [`FlagDescriptor`]: a provider-agnostic flag declared by a driver.
//! - [`ConcreteFlag`]: the parser-facing flag produced from a descriptor.
//! - [`DriverOptions`]: the typed option map handed back to a driver.
//!
//! Descriptors deserialize from the flag-set format described in
//! [`flagset`](crate::flagset).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Value kind shared by descriptors, concrete flags, and option values.
///
/// # Examples
///
/// ```
/// use machine_flags_core::{FlagValue, ValueKind};
///
/// assert_eq!(FlagValue::zero(ValueKind::Int), FlagValue::Int(0));
/// assert_eq!(ValueKind::StringSlice.to_string(), "string_slice");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// `true` / `false`.
    Bool,
    /// Signed integer.
    Int,
    /// Single string.
    String,
    /// Sequence of strings (repeatable flag).
    StringSlice,
}

impl ValueKind {
    /// Returns the flag-set spelling of this kind (`"bool"`, `"int"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::String => "string",
            Self::StringSlice => "string_slice",
        }
    }

    /// Parses the flag-set spelling of a kind.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bool" => Some(Self::Bool),
            "int" => Some(Self::Int),
            "string" => Some(Self::String),
            "string_slice" => Some(Self::StringSlice),
            _ => None,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed flag or option value.
///
/// Serializes untagged, so a [`DriverOptions`] map renders as plain
/// JSON/YAML scalars and lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// String value.
    String(String),
    /// String sequence value.
    StringSlice(Vec<String>),
}

impl FlagValue {
    /// Returns the zero value for `kind`: `false`, `0`, `""`, or an empty
    /// sequence.
    pub fn zero(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Bool => Self::Bool(false),
            ValueKind::Int => Self::Int(0),
            ValueKind::String => Self::String(String::new()),
            ValueKind::StringSlice => Self::StringSlice(Vec::new()),
        }
    }

    /// Returns the kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::String(_) => ValueKind::String,
            Self::StringSlice(_) => ValueKind::StringSlice,
        }
    }
}

/// Common shape of a typed flag declaration.
///
/// `value` is the default a driver declares for the flag. Construct with
/// [`Flag::new`] and chain the `with_*` builders, then convert into a
/// [`FlagDescriptor`].
///
/// # Examples
///
/// ```
/// use machine_flags_core::{BoolFlag, FlagDescriptor};
///
/// let flag: FlagDescriptor = BoolFlag::new("azure-managed-disks")
///     .with_usage("Configures VM and availability set for managed disks")
///     .with_env_var("AZURE_MANAGED_DISKS")
///     .with_value(true)
///     .into();
/// assert_eq!(flag.name(), "azure-managed-disks");
/// assert_eq!(flag.env_var(), Some("AZURE_MANAGED_DISKS"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flag<T> {
    /// Unique flag name (kebab-case by convention), used as the long option.
    pub name: String,
    /// Help text.
    pub usage: String,
    /// Environment variable consulted by the parser, if any.
    pub env_var: Option<String>,
    /// Declared default.
    pub value: T,
}

impl<T: Default> Flag<T> {
    /// Creates a flag with empty usage, no environment binding, and a zero
    /// default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            usage: String::new(),
            env_var: None,
            value: T::default(),
        }
    }
}

impl<T> Flag<T> {
    /// Sets the help text.
    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    /// Binds the flag to an environment variable. An empty name clears the
    /// binding.
    pub fn with_env_var(mut self, env_var: impl Into<String>) -> Self {
        let env_var = env_var.into();
        self.env_var = (!env_var.is_empty()).then_some(env_var);
        self
    }

    /// Sets the declared default.
    pub fn with_value(mut self, value: T) -> Self {
        self.value = value;
        self
    }
}

/// Boolean flag declaration.
pub type BoolFlag = Flag<bool>;
/// Integer flag declaration.
pub type IntFlag = Flag<i64>;
/// String flag declaration.
pub type StringFlag = Flag<String>;
/// Repeatable string flag declaration.
pub type StringSliceFlag = Flag<Vec<String>>;

/// Provider-agnostic flag declared by a driver.
///
/// [`Unrecognized`](FlagDescriptor::Unrecognized) holds a descriptor whose
/// kind has no mapping in this crate, such as one read from a flag-set file
/// written for a newer driver. The converter rejects it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawDescriptor")]
pub enum FlagDescriptor {
    /// Boolean flag.
    Bool(BoolFlag),
    /// Integer flag.
    Int(IntFlag),
    /// String flag.
    String(StringFlag),
    /// Repeatable string flag.
    StringSlice(StringSliceFlag),
    /// Flag of a kind this crate does not know.
    Unrecognized {
        /// Declared flag name.
        name: String,
        /// Declared kind, verbatim.
        kind: String,
    },
}

impl FlagDescriptor {
    /// Returns the flag name.
    pub fn name(&self) -> &str {
        match self {
            Self::Bool(flag) => &flag.name,
            Self::Int(flag) => &flag.name,
            Self::String(flag) => &flag.name,
            Self::StringSlice(flag) => &flag.name,
            Self::Unrecognized { name, .. } => name,
        }
    }

    /// Returns the help text (empty for unrecognized descriptors).
    pub fn usage(&self) -> &str {
        match self {
            Self::Bool(flag) => &flag.usage,
            Self::Int(flag) => &flag.usage,
            Self::String(flag) => &flag.usage,
            Self::StringSlice(flag) => &flag.usage,
            Self::Unrecognized { .. } => "",
        }
    }

    /// Returns the bound environment variable, if any.
    pub fn env_var(&self) -> Option<&str> {
        match self {
            Self::Bool(flag) => flag.env_var.as_deref(),
            Self::Int(flag) => flag.env_var.as_deref(),
            Self::String(flag) => flag.env_var.as_deref(),
            Self::StringSlice(flag) => flag.env_var.as_deref(),
            Self::Unrecognized { .. } => None,
        }
    }

    /// Returns the value kind, or `None` for unrecognized descriptors.
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            Self::Bool(_) => Some(ValueKind::Bool),
            Self::Int(_) => Some(ValueKind::Int),
            Self::String(_) => Some(ValueKind::String),
            Self::StringSlice(_) => Some(ValueKind::StringSlice),
            Self::Unrecognized { .. } => None,
        }
    }

    /// Returns the declared default, or `None` for unrecognized descriptors.
    pub fn default_value(&self) -> Option<FlagValue> {
        match self {
            Self::Bool(flag) => Some(FlagValue::Bool(flag.value)),
            Self::Int(flag) => Some(FlagValue::Int(flag.value)),
            Self::String(flag) => Some(FlagValue::String(flag.value.clone())),
            Self::StringSlice(flag) => Some(FlagValue::StringSlice(flag.value.clone())),
            Self::Unrecognized { .. } => None,
        }
    }
}

impl From<BoolFlag> for FlagDescriptor {
    fn from(flag: BoolFlag) -> Self {
        Self::Bool(flag)
    }
}

impl From<IntFlag> for FlagDescriptor {
    fn from(flag: IntFlag) -> Self {
        Self::Int(flag)
    }
}

impl From<StringFlag> for FlagDescriptor {
    fn from(flag: StringFlag) -> Self {
        Self::String(flag)
    }
}

impl From<StringSliceFlag> for FlagDescriptor {
    fn from(flag: StringSliceFlag) -> Self {
        Self::StringSlice(flag)
    }
}

/// Wire form of a descriptor entry in a flag-set file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDescriptor {
    #[serde(rename = "type")]
    kind: String,
    name: String,
    #[serde(default)]
    usage: String,
    #[serde(default)]
    env_var: Option<String>,
    #[serde(default)]
    value: Option<serde_json::Value>,
}

impl TryFrom<RawDescriptor> for FlagDescriptor {
    type Error = String;

    fn try_from(raw: RawDescriptor) -> Result<Self, Self::Error> {
        let Some(kind) = ValueKind::from_name(&raw.kind) else {
            return Ok(Self::Unrecognized {
                name: raw.name,
                kind: raw.kind,
            });
        };
        let value = match raw.value {
            None | Some(serde_json::Value::Null) => FlagValue::zero(kind),
            Some(value) => parse_default(&raw.name, kind, value)?,
        };
        let env_var = raw.env_var.unwrap_or_default();

        let descriptor: Self = match value {
            FlagValue::Bool(value) => Flag::new(raw.name)
                .with_usage(raw.usage)
                .with_env_var(env_var)
                .with_value(value)
                .into(),
            FlagValue::Int(value) => Flag::new(raw.name)
                .with_usage(raw.usage)
                .with_env_var(env_var)
                .with_value(value)
                .into(),
            FlagValue::String(value) => Flag::new(raw.name)
                .with_usage(raw.usage)
                .with_env_var(env_var)
                .with_value(value)
                .into(),
            FlagValue::StringSlice(value) => Flag::new(raw.name)
                .with_usage(raw.usage)
                .with_env_var(env_var)
                .with_value(value)
                .into(),
        };
        Ok(descriptor)
    }
}

fn parse_default(
    name: &str,
    kind: ValueKind,
    value: serde_json::Value,
) -> Result<FlagValue, String> {
    let mismatch = || format!("flag '{name}': default value does not match type '{kind}'");
    match (kind, value) {
        (ValueKind::Bool, serde_json::Value::Bool(b)) => Ok(FlagValue::Bool(b)),
        (ValueKind::Int, serde_json::Value::Number(n)) => {
            n.as_i64().map(FlagValue::Int).ok_or_else(mismatch)
        }
        (ValueKind::String, serde_json::Value::String(s)) => Ok(FlagValue::String(s)),
        (ValueKind::StringSlice, serde_json::Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                serde_json::Value::String(s) => Ok(s),
                _ => Err(mismatch()),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(FlagValue::StringSlice),
        _ => Err(mismatch()),
    }
}

/// Parser-facing flag produced from a [`FlagDescriptor`].
///
/// Booleans keep a single kind with an explicit default; how a
/// default-true switch is spelled for a particular parser is decided by the
/// adapter (see [`clap_flags::ArgShape`](crate::clap_flags::ArgShape)).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcreteFlag {
    /// Flag name, used as the long option and the lookup key.
    pub name: String,
    /// Help text.
    pub usage: String,
    /// Environment variable consulted by the parser, if any.
    pub env_var: Option<String>,
    /// Default registered with the parser.
    pub default: FlagValue,
}

impl ConcreteFlag {
    /// Returns the value kind of this flag.
    pub fn kind(&self) -> ValueKind {
        self.default.kind()
    }
}

/// Typed option values handed to a driver.
///
/// Queries never fail: a name that was not extracted, or that holds a value
/// of another kind, reads as the zero value of the requested type.
///
/// # Examples
///
/// ```
/// use machine_flags_core::{DriverOptions, FlagValue};
///
/// let mut opts = DriverOptions::new();
/// opts.insert("retries", FlagValue::Int(3));
///
/// assert_eq!(opts.int("retries"), 3);
/// assert_eq!(opts.int("missing"), 0);
/// assert!(!opts.bool("retries"));
/// assert!(opts.string_slice("tags").is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DriverOptions {
    values: BTreeMap<String, FlagValue>,
}

impl DriverOptions {
    /// Creates an empty option map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `name`, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: FlagValue) {
        self.values.insert(name.into(), value);
    }

    /// Returns the raw value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.values.get(name)
    }

    /// Returns the boolean stored under `name`, or `false`.
    pub fn bool(&self, name: &str) -> bool {
        match self.values.get(name) {
            Some(FlagValue::Bool(value)) => *value,
            _ => false,
        }
    }

    /// Returns the integer stored under `name`, or `0`.
    pub fn int(&self, name: &str) -> i64 {
        match self.values.get(name) {
            Some(FlagValue::Int(value)) => *value,
            _ => 0,
        }
    }

    /// Returns the string stored under `name`, or `""`.
    pub fn string(&self, name: &str) -> &str {
        match self.values.get(name) {
            Some(FlagValue::String(value)) => value,
            _ => "",
        }
    }

    /// Returns the string sequence stored under `name`, or an empty slice.
    pub fn string_slice(&self, name: &str) -> &[String] {
        match self.values.get(name) {
            Some(FlagValue::StringSlice(values)) => values,
            _ => &[],
        }
    }

    /// Number of stored options.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when no options are stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates options in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}
