//! # Character Encodings
//!
//! Named, pluggable encodings applied to length prefixes and field content.
//!
//! ## Components
//! - **Registry**: name -> (encode, decode) table, with a process-wide instance
//! - **Directive**: `prefix/content` encoding specifier parsing
//! - **EBCDIC**: built-in IBM-1047 code page
//!
//! ## Built-ins
//! - `ascii`: strict 7-bit pass-through
//! - `ebcdic`: IBM-1047, byte-for-byte over Latin-1
//!
//! Encodings are looked up by name on every call, so registering or replacing a
//! name at runtime affects every later marshal/unmarshal.

pub mod directive;
pub mod ebcdic;
pub mod registry;

pub use directive::EncodingDirective;
pub use registry::{global_registry, register_encoding, EncodingRegistry, ASCII, EBCDIC};
