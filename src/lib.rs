//! # ISO 8583 Field Codec
//!
//! Converts typed ISO 8583 field values to and from their wire bytes.
//!
//! A field's wire shape is the composition of three independent choices:
//! - **Length prefix**: none, `LL` (2 digits) or `LLL` (3 digits), stating the content
//!   length in bytes
//! - **Encodings**: a named encoding for the prefix and one for the content, picked by a
//!   directive such as `"ebcdic/ascii"`
//! - **Content rules**: free text, raw binary, or fixed-width digits
//!
//! `marshal` is the exact inverse of `unmarshal`; any failure is returned as a typed
//! [`CodecError`](error::CodecError) and leaves no partially filled value behind.
//!
//! ## Example
//! ```rust
//! use iso8583_codec::field::{FieldCodec, LlVar, Mti};
//!
//! let mti = Mti::new("0100");
//! assert_eq!(mti.marshal(0, "ascii")?, b"0100");
//!
//! let pan = LlVar::from("4761739001010010");
//! let wire = pan.marshal(0, "ebcdic/ascii")?;
//! assert_eq!(&wire[..2], &[0xF1, 0xF6]); // "16" in EBCDIC
//!
//! let mut back = LlVar::default();
//! assert_eq!(back.unmarshal(Some(&wire), 0, "ebcdic/ascii")?, 18);
//! assert_eq!(back, pan);
//! # Ok::<(), iso8583_codec::error::CodecError>(())
//! ```
//!
//! ## Custom Encodings
//! ```rust
//! use iso8583_codec::encoding::register_encoding;
//! use iso8583_codec::error::EncodingError;
//!
//! register_encoding(
//!     "upper-ascii",
//!     |text| Ok(text.to_ascii_uppercase().into_bytes()),
//!     |bytes| String::from_utf8(bytes.to_vec()).map_err(|e| EncodingError::custom(e.to_string())),
//! );
//! ```

pub mod config;
pub mod encoding;
pub mod error;
pub mod field;
pub mod utils;

pub use encoding::{global_registry, register_encoding, EncodingDirective, EncodingRegistry};
pub use error::{CodecError, EncodingError, Result};
pub use field::{
    Alphanumeric, Binary, FieldCodec, LlBinary, LlVar, LllBinary, LllVar, Mti, Numeric,
};
