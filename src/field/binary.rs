//! Raw binary fields.
//!
//! Binary content is never passed through an encoding. Only the length prefix of the
//! variable forms is, using the directive's prefix encoding.

use crate::encoding::{EncodingDirective, EncodingRegistry};
use crate::error::{CodecError, Result};
use crate::field::length::{read_prefixed, write_prefixed, LLL_DIGITS, LL_DIGITS};
use crate::field::{prefix_width, require_input, take, FieldCodec};
use serde::{Deserialize, Serialize};

/// Variable-length binary field with a `D`-digit decimal length prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VarBinary<const D: usize>(pub Vec<u8>);

/// Binary field with a 2-digit length prefix (up to 99 bytes)
pub type LlBinary = VarBinary<LL_DIGITS>;

/// Binary field with a 3-digit length prefix (up to 999 bytes)
pub type LllBinary = VarBinary<LLL_DIGITS>;

impl<const D: usize> VarBinary<D> {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl<const D: usize> From<Vec<u8>> for VarBinary<D> {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl<const D: usize> From<&[u8]> for VarBinary<D> {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl<const D: usize> FieldCodec for VarBinary<D> {
    const KIND: &'static str = if D == LL_DIGITS { "LLBINARY" } else { "LLLBINARY" };

    fn to_wire(
        &self,
        _length: usize,
        directive: EncodingDirective<'_>,
        registry: &EncodingRegistry,
    ) -> Result<Vec<u8>> {
        write_prefixed(D, &self.0, directive.prefix, registry)
    }

    fn from_wire(
        input: Option<&[u8]>,
        length: usize,
        directive: EncodingDirective<'_>,
        registry: &EncodingRegistry,
    ) -> Result<(Self, usize)> {
        let input = require_input(input)?;
        let digits = prefix_width(length, D)?;
        let (content, consumed) = read_prefixed(digits, input, directive.prefix, registry)?;
        Ok((Self(content.to_vec()), consumed))
    }
}

/// Fixed-length binary field: exactly `length` raw bytes, no prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Binary(pub Vec<u8>);

impl Binary {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Binary {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl FieldCodec for Binary {
    const KIND: &'static str = "BINARY";

    fn to_wire(
        &self,
        length: usize,
        _directive: EncodingDirective<'_>,
        _registry: &EncodingRegistry,
    ) -> Result<Vec<u8>> {
        if self.0.len() != length {
            return Err(CodecError::LengthMismatch {
                expected: length,
                actual: self.0.len(),
            });
        }
        Ok(self.0.clone())
    }

    fn from_wire(
        input: Option<&[u8]>,
        length: usize,
        _directive: EncodingDirective<'_>,
        _registry: &EncodingRegistry,
    ) -> Result<(Self, usize)> {
        let content = take(require_input(input)?, length)?;
        Ok((Self(content.to_vec()), length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> EncodingRegistry {
        EncodingRegistry::with_builtins()
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_lllbinary_marshal() {
        let field = LllBinary::from(vec![0x41, 0x42]);
        let wire = field.marshal_with(0, "ascii", &registry()).unwrap();
        assert_eq!(wire, b"002AB".to_vec());
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_lllbinary_unmarshal() {
        let mut field = LllBinary::default();
        let consumed = field
            .unmarshal_with(Some(b"002AB"), 3, "ascii", &registry())
            .unwrap();
        assert_eq!(consumed, 5);
        assert_eq!(field.as_bytes(), &[0x41, 0x42]);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_content_is_never_encoded() {
        // 0xFF is neither ASCII nor a digit; binary content must pass through untouched
        let field = LlBinary::from(vec![0xFF, 0x00, 0x80]);
        let wire = field.marshal_with(0, "ebcdic", &registry()).unwrap();
        assert_eq!(wire, vec![0xF0, 0xF3, 0xFF, 0x00, 0x80]);

        let mut back = LlBinary::default();
        assert_eq!(back.unmarshal_with(Some(&wire), 0, "ebcdic", &registry()).unwrap(), 5);
        assert_eq!(back, field);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_split_directive_uses_prefix_part() {
        let field = LlBinary::from(vec![1, 2, 3]);
        let wire = field.marshal_with(0, "ebcdic/missing", &registry()).unwrap();
        assert_eq!(&wire[..2], &[0xF0, 0xF3]);
    }

    #[test]
    fn test_nil_input() {
        let mut field = LlBinary::from(vec![9]);
        let result = field.unmarshal_with(None::<&[u8]>, 0, "ascii", &registry());
        assert!(matches!(result, Err(CodecError::NilInput)));
        assert!(field.as_bytes().is_empty());
    }

    #[test]
    fn test_empty_input_is_truncated_not_nil() {
        let mut field = LlBinary::default();
        let result = field.unmarshal_with(Some(b""), 0, "ascii", &registry());
        assert!(matches!(
            result,
            Err(CodecError::TruncatedInput { remaining: 0, required: 2 })
        ));
    }

    #[test]
    fn test_truncated_content_resets_value() {
        let mut field = LllBinary::from(vec![7, 7, 7]);
        let result = field.unmarshal_with(Some(b"005AB"), 0, "ascii", &registry());
        assert!(matches!(
            result,
            Err(CodecError::TruncatedInput { remaining: 2, required: 5 })
        ));
        assert_eq!(field, LllBinary::default());
    }

    #[test]
    fn test_overflow() {
        let field = LlBinary::from(vec![0u8; 100]);
        assert!(matches!(
            field.marshal_with(0, "ascii", &registry()),
            Err(CodecError::PrefixOverflow { length: 100, digits: 2 })
        ));
    }

    #[test]
    fn test_prefix_width_above_field_maximum() {
        let mut field = LlBinary::default();
        assert!(matches!(
            field.unmarshal_with(Some(b"002AB"), 3, "ascii", &registry()),
            Err(CodecError::InvalidPrefixWidth { width: 3, max: 2 })
        ));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_fixed_binary() {
        let field = Binary::from(vec![0xDE, 0xAD]);
        assert_eq!(field.marshal_with(2, "ascii", &registry()).unwrap(), vec![0xDE, 0xAD]);
        assert!(matches!(
            field.marshal_with(3, "ascii", &registry()),
            Err(CodecError::LengthMismatch { expected: 3, actual: 2 })
        ));

        let mut back = Binary::default();
        assert_eq!(
            back.unmarshal_with(Some(&[0xDE, 0xAD, 0x01][..]), 2, "ascii", &registry())
                .unwrap(),
            2
        );
        assert_eq!(back, field);
    }
}
