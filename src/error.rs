//! Error handling for vcd-trace
//!
//! This module defines the crate error type and a Result alias for use
//! throughout the reader and writer engines.
//!
//! Per-value failures ([`ValueError`]) are kept separate from session
//! failures ([`VcdError`]): an encoder or decoder only knows about the text
//! it was handed, while the session wraps that failure with the variable or
//! identifier it belonged to.

use thiserror::Error;

/// Failure to convert a single value to or from its wire token
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// Text is not a number and not one of the indeterminate symbols
    #[error("value {value:?} is not a number, x, or z")]
    InvalidValue { value: String },

    /// Number does not fit the declared vector width
    #[error("value {value} is larger than a {width}-bit vector allows (max {max})")]
    OutOfRange { value: String, width: u32, max: u128 },

    /// Text that cannot stand as one whitespace-delimited token
    #[error("value {value:?} is empty or contains whitespace")]
    NotAToken { value: String },

    /// Wire token does not have the shape the type expects
    #[error("malformed {kind} token {token:?}")]
    Malformed { kind: &'static str, token: String },
}

/// Main error type for trace sessions
#[derive(Error, Debug)]
pub enum VcdError {
    /// A declaration names a type the codec does not support
    #[error("unsupported type: {type_name:?}, use one of the following: {supported}")]
    UnsupportedType { type_name: String, supported: String },

    /// Value set or decoded against a name/identifier that was never declared
    #[error("unknown variable: {0}")]
    UnknownVariable(String),

    /// Writer time went backwards
    #[error("changing value from an earlier time: {time} < {last}")]
    NonMonotonicTime { time: u64, last: u64 },

    /// A value could not be encoded for a variable
    #[error("failed to encode value for {variable}: {source}")]
    EncodingFailed {
        variable: String,
        #[source]
        source: ValueError,
    },

    /// A wire token could not be decoded for an identifier
    #[error("failed to decode value for identifier {identifier}: {source}")]
    DecodingFailed {
        identifier: String,
        #[source]
        source: ValueError,
    },

    /// Header record missing its end token or otherwise unreadable
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    /// Timescale text outside the supported magnitudes and units
    #[error("invalid timescale: {0}")]
    InvalidTimescale(String),

    /// Bit-vector declared with an unusable width
    #[error("invalid width {width} for variable {name}")]
    InvalidWidth { name: String, width: u32 },

    /// The same qualified name was registered twice
    #[error("variable already registered: {0}")]
    DuplicateVariable(String),

    /// Scope segment or variable name that cannot be written as one token
    #[error("invalid name {0:?}: names must be non-empty and free of whitespace")]
    InvalidName(String),

    /// Header records written after the first value change
    #[error("header already finalized, declarations must precede values")]
    HeaderFinalized,

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Trace export serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<VcdError>,
    },
}

impl VcdError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        VcdError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Strip any context wrappers and return the underlying error
    pub fn root(&self) -> &VcdError {
        match self {
            VcdError::WithContext { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Result type alias for vcd-trace operations
pub type Result<T> = std::result::Result<T, VcdError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| VcdError::Io(e).with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| VcdError::Io(e).with_context(f()))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, serde_json::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| VcdError::Json(e).with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| VcdError::Json(e).with_context(f()))
    }
}
