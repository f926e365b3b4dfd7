//! # Error Types
//!
//! Error handling for the ISO 8583 field codec.
//!
//! Every failure a codec call can hit is one variant of [`CodecError`]. Callers can
//! match on the kind while `Display` still yields the full diagnostic text, including
//! the wrapped cause for encoder failures and digit parsing failures.
//!
//! ## Error Categories
//! - **Input Errors**: absent input, truncated input
//! - **Prefix Errors**: malformed length digits, overflowing or invalid prefix widths
//! - **Encoding Errors**: unknown encoding names, failures raised by encode/decode functions
//! - **Content Errors**: fixed-width length mismatches, non-numeric content
//! - **Configuration Errors**: invalid or unreadable configuration
//!
//! No codec operation logs its errors; they are always returned to the caller.
//!
//! ## Example Usage
//! ```rust
//! use iso8583_codec::error::CodecError;
//! use iso8583_codec::field::{FieldCodec, Mti};
//!
//! let mut mti = Mti::default();
//! match mti.unmarshal(Some(b"01"), 4, "ascii") {
//!     Err(CodecError::TruncatedInput { remaining, required }) => {
//!         assert_eq!((remaining, required), (2, 4));
//!     }
//!     other => panic!("unexpected result: {other:?}"),
//! }
//! ```

use std::num::ParseIntError;
use thiserror::Error;

/// Error message constants shared by error paths and tests.
pub mod constants {
    /// Unmarshal was handed no input buffer at all
    pub const ERR_NIL_INPUT: &str = "bytes input is nil";

    /// Configuration errors
    pub const ERR_CONFIG_OPEN: &str = "Failed to open config file";
    pub const ERR_CONFIG_READ: &str = "Failed to read config file";
    pub const ERR_CONFIG_PARSE: &str = "Failed to parse TOML";
    pub const ERR_CONFIG_WRITE: &str = "Failed to write config file";

    /// Logging errors
    pub const ERR_LOGGING_INIT: &str = "Failed to install tracing subscriber";
}

/// Failure reported by a registered encode or decode function.
///
/// Built-in encodings only ever produce the `Unmappable*` variants; externally
/// registered encodings are free to use [`EncodingError::Custom`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("character {0:?} has no mapping in this encoding")]
    UnmappableChar(char),

    #[error("byte 0x{0:02X} has no mapping in this encoding")]
    UnmappableByte(u8),

    #[error("{0}")]
    Custom(String),
}

impl EncodingError {
    /// Convenience constructor for encodings registered from outside the crate
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}

// CodecError is the single error type for every codec operation
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("bytes input is nil")]
    NilInput,

    #[error("message remain ({remaining} bytes) is shorter than indicated length: {required}")]
    TruncatedInput { remaining: usize, required: usize },

    #[error("length prefix {prefix:?} is not a decimal number: {source}")]
    MalformedLength {
        prefix: String,
        #[source]
        source: ParseIntError,
    },

    #[error("content length {length} does not fit in a {digits}-digit length prefix")]
    PrefixOverflow { length: usize, digits: usize },

    #[error("length prefix width {width} is outside the supported range 1..={max} digits")]
    InvalidPrefixWidth { width: usize, max: usize },

    #[error("unknown encoding '{0}'")]
    UnknownEncoding(String),

    #[error("encoder '{encoding}' returned error: {source}")]
    EncodingFailure {
        encoding: String,
        #[source]
        source: EncodingError,
    },

    #[error("field isn't {expected} characters long, its: {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("field characters aren't numbers: parsing {value:?}: {source}")]
    NonNumericContent {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CodecError {
    /// True for failures caused by the input running out before the field did
    pub fn is_truncation(&self) -> bool {
        matches!(self, CodecError::TruncatedInput { .. })
    }
}

/// Type alias for Results using CodecError
pub type Result<T> = std::result::Result<T, CodecError>;
