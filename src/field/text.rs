//! Text fields.
//!
//! Content goes through the directive's content encoding. For the variable forms the
//! length prefix states the *encoded* byte count, not the character count.

use crate::encoding::{EncodingDirective, EncodingRegistry};
use crate::error::{CodecError, Result};
use crate::field::length::{read_prefixed, write_prefixed, LLL_DIGITS, LL_DIGITS};
use crate::field::{encoded_width, prefix_width, require_input, take, FieldCodec};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Variable-length text field with a `D`-digit decimal length prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VarText<const D: usize>(pub String);

/// Text field with a 2-digit length prefix
pub type LlVar = VarText<LL_DIGITS>;

/// Text field with a 3-digit length prefix
pub type LllVar = VarText<LLL_DIGITS>;

impl<const D: usize> VarText<D> {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<const D: usize> From<&str> for VarText<D> {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl<const D: usize> From<String> for VarText<D> {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl<const D: usize> fmt::Display for VarText<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<const D: usize> FieldCodec for VarText<D> {
    const KIND: &'static str = if D == LL_DIGITS { "LLVAR" } else { "LLLVAR" };

    fn to_wire(
        &self,
        _length: usize,
        directive: EncodingDirective<'_>,
        registry: &EncodingRegistry,
    ) -> Result<Vec<u8>> {
        let content = registry.encode(directive.content, &self.0)?;
        write_prefixed(D, &content, directive.prefix, registry)
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
        let text = registry.decode(directive.content, content)?;
        Ok((Self(text), consumed))
    }
}

/// Fixed-length text field: exactly `length` characters in the content encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Alphanumeric(pub String);

impl Alphanumeric {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Alphanumeric {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl fmt::Display for Alphanumeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FieldCodec for Alphanumeric {
    const KIND: &'static str = "VAR";

    fn to_wire(
        &self,
        length: usize,
        directive: EncodingDirective<'_>,
        registry: &EncodingRegistry,
    ) -> Result<Vec<u8>> {
        let actual = self.0.chars().count();
        if actual != length {
            return Err(CodecError::LengthMismatch {
                expected: length,
                actual,
            });
        }
        registry.encode(directive.content, &self.0)
    }

    fn from_wire(
        input: Option<&[u8]>,
        length: usize,
        directive: EncodingDirective<'_>,
        registry: &EncodingRegistry,
    ) -> Result<(Self, usize)> {
        let input = require_input(input)?;
        let (text, consumed) = read_chars(input, length, directive.content, registry)?;
        Ok((Self(text), consumed))
    }
}

/// Upper bound on bytes per character when sizing a variable-width encoding
const MAX_CHAR_BYTES: usize = 4;

/// Read exactly `chars` characters of `encoding` from the start of `input`.
///
/// The width of one encoded `'0'` is tried first. If that does not decode to `chars`
/// characters the slice grows one byte at a time, for encodings whose characters
/// differ in width.
fn read_chars(
    input: &[u8],
    chars: usize,
    encoding: &str,
    registry: &EncodingRegistry,
) -> Result<(String, usize)> {
    let width = encoded_width(chars, encoding, registry)?;
    let fixed = registry.decode(encoding, take(input, width)?);
    if let Ok(text) = &fixed {
        if text.chars().count() == chars {
            return Ok((text.clone(), width));
        }
    }

    let limit = input.len().min(chars.saturating_mul(MAX_CHAR_BYTES));
    for end in width.saturating_add(1)..=limit {
        if let Ok(text) = registry.decode(encoding, &input[..end]) {
            match text.chars().count().cmp(&chars) {
                Ordering::Equal => return Ok((text, end)),
                Ordering::Greater => break,
                Ordering::Less => {}
            }
        }
    }

    Err(CodecError::LengthMismatch {
        expected: chars,
        actual: fixed?.chars().count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::ebcdic;
    use crate::error::EncodingError;

    fn registry() -> EncodingRegistry {
        EncodingRegistry::with_builtins()
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_llvar_ascii() {
        let field = LlVar::from("ascii_standard");
        let wire = field.marshal_with(0, "ascii", &registry()).unwrap();
        assert_eq!(wire, b"14ascii_standard".to_vec());

        let mut back = LlVar::default();
        assert_eq!(back.unmarshal_with(Some(&wire), 2, "ascii", &registry()).unwrap(), 16);
        assert_eq!(back.as_str(), "ascii_standard");
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_llvar_ebcdic_prefix_ascii_content() {
        let field = LlVar::from("ascii_standard");
        let wire = field.marshal_with(0, "ebcdic/ascii", &registry()).unwrap();

        let mut expected = ebcdic::encode("14").unwrap();
        expected.extend_from_slice(b"ascii_standard");
        assert_eq!(wire, expected);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_llvar_ebcdic_everywhere() {
        let field = LlVar::from("ebcdic");
        let wire = field.marshal_with(0, "ebcdic", &registry()).unwrap();

        let mut expected = ebcdic::encode("06").unwrap();
        expected.extend(ebcdic::encode("ebcdic").unwrap());
        assert_eq!(wire, expected);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_short_prefix_on_unmarshal() {
        let mut input = ebcdic::encode("6").unwrap();
        input.extend_from_slice(b"ebcdic");

        let mut field = LlVar::default();
        let consumed = field
            .unmarshal_with(Some(&input), 1, "ebcdic/ascii", &registry())
            .unwrap();
        assert_eq!(consumed, 7);
        assert_eq!(field.as_str(), "ebcdic");
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_prefix_counts_encoded_bytes() {
        let registry = registry();
        // two bytes per character on the wire
        registry.register(
            "wide",
            |t| Ok(t.bytes().flat_map(|b| [0, b]).collect()),
            |b| Ok(b.chunks(2).map(|pair| char::from(pair[pair.len() - 1])).collect()),
        );

        let field = LllVar::from("abc");
        let wire = field.marshal_with(0, "ascii/wide", &registry).unwrap();
        assert_eq!(&wire[..3], b"006");
        assert_eq!(wire.len(), 9);

        let mut back = LllVar::default();
        assert_eq!(back.unmarshal_with(Some(&wire), 0, "ascii/wide", &registry).unwrap(), 9);
        assert_eq!(back, field);
    }

    #[test]
    fn test_unknown_content_encoding() {
        let field = LlVar::from("x");
        assert!(matches!(
            field.marshal_with(0, "ascii/nope", &registry()),
            Err(CodecError::UnknownEncoding(name)) if name == "nope"
        ));

        let mut back = LlVar::from("stale");
        assert!(matches!(
            back.unmarshal_with(Some(b"01x"), 0, "ascii/nope", &registry()),
            Err(CodecError::UnknownEncoding(_))
        ));
        assert_eq!(back.as_str(), "");
    }

    #[test]
    fn test_content_decode_failure() {
        let mut field = LlVar::default();
        let result = field.unmarshal_with(Some(&[b'0', b'1', 0xC1][..]), 0, "ascii", &registry());
        match result {
            Err(CodecError::EncodingFailure { encoding, .. }) => assert_eq!(encoding, "ascii"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_prefix() {
        let mut field = LllVar::default();
        assert!(matches!(
            field.unmarshal_with(Some(b"0x5hello"), 0, "ascii", &registry()),
            Err(CodecError::MalformedLength { .. })
        ));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_alphanumeric() {
        let field = Alphanumeric::from("TERM0001");
        let wire = field.marshal_with(8, "ebcdic", &registry()).unwrap();
        assert_eq!(wire, ebcdic::encode("TERM0001").unwrap());

        let mut back = Alphanumeric::default();
        assert_eq!(back.unmarshal_with(Some(&wire), 8, "ebcdic", &registry()).unwrap(), 8);
        assert_eq!(back, field);

        assert!(matches!(
            field.marshal_with(6, "ebcdic", &registry()),
            Err(CodecError::LengthMismatch { expected: 6, actual: 8 })
        ));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_alphanumeric_variable_width_encoding() {
        let registry = registry();
        registry.register(
            "utf8",
            |t| Ok(t.as_bytes().to_vec()),
            |b| String::from_utf8(b.to_vec()).map_err(|e| EncodingError::custom(e.to_string())),
        );

        let field = Alphanumeric::from("éa");
        let wire = field.marshal_with(2, "utf8", &registry).unwrap();
        assert_eq!(wire, vec![0xC3, 0xA9, b'a']);

        let mut message = wire.clone();
        message.extend_from_slice(b"NEXT");
        let mut back = Alphanumeric::default();
        assert_eq!(back.unmarshal_with(Some(&message), 2, "utf8", &registry).unwrap(), 3);
        assert_eq!(back, field);
    }

    #[test]
    fn test_alphanumeric_huge_width() {
        let mut field = Alphanumeric::from("stale");
        assert!(matches!(
            field.unmarshal_with(Some(b"AB"), usize::MAX, "ascii", &registry()),
            Err(CodecError::TruncatedInput { remaining: 2, .. })
        ));
        assert_eq!(field, Alphanumeric::default());
    }

    #[test]
    fn test_alphanumeric_short_text_on_wire() {
        // three bytes that only ever decode to two characters
        let registry = registry();
        registry.register(
            "utf8",
            |t| Ok(t.as_bytes().to_vec()),
            |b| String::from_utf8(b.to_vec()).map_err(|e| EncodingError::custom(e.to_string())),
        );
        let mut field = Alphanumeric::default();
        assert!(matches!(
            field.unmarshal_with(Some(&[0xC3, 0xA9, b'a'][..]), 3, "utf8", &registry),
            Err(CodecError::LengthMismatch { expected: 3, actual: 2 })
        ));
    }
}
