//! Fixed-width numeric fields.
//!
//! A numeric field has no length prefix: it is exactly W decimal digits, passed
//! through the directive's content encoding. The message type indicator is the
//! 4-digit case.

use crate::encoding::{EncodingDirective, EncodingRegistry};
use crate::error::{CodecError, Result};
use crate::field::{check_digits, encoded_width, require_input, take, FieldCodec};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of digits in a message type indicator
pub const MTI_WIDTH: usize = 4;

fn validate(value: &str, width: usize) -> Result<()> {
    let actual = value.chars().count();
    if actual != width {
        return Err(CodecError::LengthMismatch {
            expected: width,
            actual,
        });
    }

    check_digits(value).map_err(|source| CodecError::NonNumericContent {
        value: value.to_string(),
        source,
    })
}

fn write_digits(
    value: &str,
    width: usize,
    encoding: &str,
    registry: &EncodingRegistry,
) -> Result<Vec<u8>> {
    validate(value, width)?;
    registry.encode(encoding, value)
}

/// Read `chars` encoded characters and require them to be `width` digits.
fn read_digits(
    input: &[u8],
    chars: usize,
    width: usize,
    encoding: &str,
    registry: &EncodingRegistry,
) -> Result<(String, usize)> {
    let bytes = encoded_width(chars, encoding, registry)?;
    let value = registry.decode(encoding, take(input, bytes)?)?;
    validate(&value, width)?;
    Ok((value, bytes))
}

/// Numeric field of caller-declared width.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Numeric(pub String);

impl Numeric {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of the digits; `None` if they do not fit in a u64
    pub fn value(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl From<&str> for Numeric {
    fn from(digits: &str) -> Self {
        Self(digits.to_string())
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FieldCodec for Numeric {
    const KIND: &'static str = "NUMERIC";

    fn to_wire(
        &self,
        length: usize,
        directive: EncodingDirective<'_>,
        registry: &EncodingRegistry,
    ) -> Result<Vec<u8>> {
        write_digits(&self.0, length, directive.content, registry)
    }

    fn from_wire(
        input: Option<&[u8]>,
        length: usize,
        directive: EncodingDirective<'_>,
        registry: &EncodingRegistry,
    ) -> Result<(Self, usize)> {
        let input = require_input(input)?;
        let (value, consumed) = read_digits(input, length, length, directive.content, registry)?;
        Ok((Self(value), consumed))
    }
}

/// Message type indicator, e.g. `0100` for an authorization request.
///
/// Always four digits. On unmarshal the declared length is how many characters to
/// read (`0` reads four), so a mis-declared length surfaces as `LengthMismatch`
/// instead of silently reading a different field boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mti(pub String);

impl Mti {
    pub fn new(digits: &str) -> Self {
        Self(digits.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Mti {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FieldCodec for Mti {
    const KIND: &'static str = "MTI";

    fn to_wire(
        &self,
        _length: usize,
        directive: EncodingDirective<'_>,
        registry: &EncodingRegistry,
    ) -> Result<Vec<u8>> {
        write_digits(&self.0, MTI_WIDTH, directive.content, registry)
    }

    fn from_wire(
        input: Option<&[u8]>,
        length: usize,
        directive: EncodingDirective<'_>,
        registry: &EncodingRegistry,
    ) -> Result<(Self, usize)> {
        let input = require_input(input)?;
        let chars = if length == 0 { MTI_WIDTH } else { length };
        let (value, consumed) = read_digits(input, chars, MTI_WIDTH, directive.content, registry)?;
        Ok((Self(value), consumed))
    }
}
