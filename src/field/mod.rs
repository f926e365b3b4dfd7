//! # Field Codecs
//!
//! Typed ISO 8583 field values and their wire representation.
//!
//! Every field type implements [`FieldCodec`]: `marshal` produces the complete wire
//! bytes of the field, `unmarshal` consumes a prefix of an input stream and reports
//! how many bytes it used. Both take a declared length and an encoding directive
//! (`"ascii"`, `"ebcdic"`, `"ebcdic/ascii"`, ...).
//!
//! ## Field Kinds
//! - **Variable binary** (`LlBinary`, `LllBinary`): decimal length prefix + raw bytes
//! - **Variable text** (`LlVar`, `LllVar`): decimal length prefix + encoded text
//! - **Fixed numeric** (`Numeric`, `Mti`): exactly W decimal digits, no prefix
//! - **Fixed text / binary** (`Alphanumeric`, `Binary`): exactly W characters / bytes
//!
//! ## Declared Length
//! - Variable fields ignore it on marshal. On unmarshal it is the number of prefix
//!   digits present on the wire: `0` means the field's own LL/LLL width.
//! - Fixed fields use it as their width.
//!
//! ## Atomicity
//! A failed `unmarshal` leaves the field at its default (empty) value; a failed
//! `marshal` returns no bytes.

pub mod binary;
pub mod length;
pub mod numeric;
pub mod text;

pub use binary::{Binary, LlBinary, LllBinary, VarBinary};
pub use numeric::{Mti, Numeric, MTI_WIDTH};
pub use text::{Alphanumeric, LlVar, LllVar, VarText};

use crate::encoding::{global_registry, EncodingDirective, EncodingRegistry};
use crate::error::{CodecError, Result};
use crate::utils::metrics::global_metrics;
use std::num::ParseIntError;
use tracing::trace;

/// Wire codec shared by every field type.
///
/// Implementors provide [`to_wire`](FieldCodec::to_wire) and
/// [`from_wire`](FieldCodec::from_wire); the provided methods parse the directive,
/// pick the registry, keep the all-or-nothing contract and record metrics.
pub trait FieldCodec: Default + Sized {
    /// Short field kind name used in trace output
    const KIND: &'static str;

    /// Produce the full wire representation of the field.
    fn to_wire(
        &self,
        length: usize,
        directive: EncodingDirective<'_>,
        registry: &EncodingRegistry,
    ) -> Result<Vec<u8>>;

    /// Read a field from the start of `input`, returning it with the bytes consumed.
    fn from_wire(
        input: Option<&[u8]>,
        length: usize,
        directive: EncodingDirective<'_>,
        registry: &EncodingRegistry,
    ) -> Result<(Self, usize)>;

    /// Marshal through the process-wide encoding registry.
    fn marshal(&self, length: usize, directive: &str) -> Result<Vec<u8>> {
        self.marshal_with(length, directive, global_registry())
    }

    fn marshal_with(
        &self,
        length: usize,
        directive: &str,
        registry: &EncodingRegistry,
    ) -> Result<Vec<u8>> {
        let metrics = global_metrics();
        match self.to_wire(length, EncodingDirective::parse(directive), registry) {
            Ok(wire) => {
                metrics.marshal_success(wire.len() as u64);
                trace!(kind = Self::KIND, directive, bytes = wire.len(), "Field marshaled");
                Ok(wire)
            }
            Err(e) => {
                metrics.marshal_failure();
                Err(e)
            }
        }
    }

    /// Unmarshal through the process-wide encoding registry.
    ///
    /// `None` input is rejected with `NilInput`; an empty slice is a present but
    /// empty buffer.
    fn unmarshal<I: AsRef<[u8]>>(
        &mut self,
        input: Option<I>,
        length: usize,
        directive: &str,
    ) -> Result<usize> {
        self.unmarshal_with(input, length, directive, global_registry())
    }

    fn unmarshal_with<I: AsRef<[u8]>>(
        &mut self,
        input: Option<I>,
        length: usize,
        directive: &str,
        registry: &EncodingRegistry,
    ) -> Result<usize> {
        let metrics = global_metrics();
        let input: Option<&[u8]> = input.as_ref().map(|i| i.as_ref());
        match Self::from_wire(input, length, EncodingDirective::parse(directive), registry) {
            Ok((value, consumed)) => {
                *self = value;
                metrics.unmarshal_success(consumed as u64);
                trace!(kind = Self::KIND, directive, consumed, "Field unmarshaled");
                Ok(consumed)
            }
            Err(e) => {
                *self = Self::default();
                metrics.unmarshal_failure();
                Err(e)
            }
        }
    }
}

/// Number of bytes `chars` characters occupy in `encoding`, scaled from one encoded `'0'`.
///
/// Saturates at `usize::MAX`, which no input can satisfy, so an absurd width ends in
/// `TruncatedInput` instead of an allocation.
pub(crate) fn encoded_width(
    chars: usize,
    encoding: &str,
    registry: &EncodingRegistry,
) -> Result<usize> {
    let unit = registry.encode(encoding, "0")?.len();
    Ok(unit.saturating_mul(chars))
}

/// Fails with the parse error of the first character that is not an ASCII digit.
pub(crate) fn check_digits(text: &str) -> std::result::Result<(), ParseIntError> {
    match text.chars().find(|c| !c.is_ascii_digit()) {
        Some(c) => c.to_string().parse::<u8>().map(drop),
        None => Ok(()),
    }
}

/// Prefix digits to read on unmarshal: `0` selects the field maximum.
pub(crate) fn prefix_width(declared: usize, max: usize) -> Result<usize> {
    match declared {
        0 => Ok(max),
        width if width <= max => Ok(width),
        width => Err(CodecError::InvalidPrefixWidth { width, max }),
    }
}

/// Fails with `NilInput` when there is no input buffer at all
pub(crate) fn require_input(input: Option<&[u8]>) -> Result<&[u8]> {
    input.ok_or(CodecError::NilInput)
}

/// Split the first `width` bytes off `input`
pub(crate) fn take(input: &[u8], width: usize) -> Result<&[u8]> {
    input.get(..width).ok_or(CodecError::TruncatedInput {
        remaining: input.len(),
        required: width,
    })
}
