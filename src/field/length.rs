//! Length prefix codec.
//!
//! A variable field is preceded by its content length in bytes, written as a
//! zero-padded decimal string of a fixed digit count and passed through the prefix
//! encoding.
//!
//! ```text
//! LL   (2 digits):  "14" + 14 content bytes
//! LLL  (3 digits): "002" +  2 content bytes
//! ```

use crate::encoding::EncodingRegistry;
use crate::error::{CodecError, Result};
use crate::field::{check_digits, encoded_width, take};

/// Digit count of an LL prefix
pub const LL_DIGITS: usize = 2;

/// Digit count of an LLL prefix
pub const LLL_DIGITS: usize = 3;

fn check_prefix_digits(digits: usize) -> Result<()> {
    if digits == 0 {
        return Err(CodecError::InvalidPrefixWidth {
            width: digits,
            max: LLL_DIGITS,
        });
    }
    Ok(())
}

/// Largest content length a prefix of `digits` digits can state, if it fits in a usize
pub fn max_length(digits: usize) -> Option<usize> {
    u32::try_from(digits)
        .ok()
        .and_then(|d| 10usize.checked_pow(d))
        .map(|limit| limit - 1)
}

/// Render `length` as a `digits`-wide decimal prefix in the given encoding.
///
/// # Errors
/// `InvalidPrefixWidth` for a zero-digit prefix, `PrefixOverflow` if `length` needs
/// more than `digits` digits, or whatever the registry reports for the prefix encoding.
pub fn encode_prefix(
    digits: usize,
    length: usize,
    encoding: &str,
    registry: &EncodingRegistry,
) -> Result<Vec<u8>> {
    check_prefix_digits(digits)?;
    if let Some(max) = max_length(digits) {
        if length > max {
            return Err(CodecError::PrefixOverflow { length, digits });
        }
    }

    registry.encode(encoding, &format!("{length:0digits$}"))
}

/// Read a `digits`-wide decimal prefix from the start of `input`.
///
/// Returns the stated content length and the number of bytes the prefix occupied.
///
/// # Errors
/// `InvalidPrefixWidth` for a zero-digit prefix, `TruncatedInput` if `input` is shorter than the encoded prefix, `MalformedLength` if
/// the decoded prefix is not all decimal digits, or whatever the registry reports.
pub fn decode_prefix(
    digits: usize,
    input: &[u8],
    encoding: &str,
    registry: &EncodingRegistry,
) -> Result<(usize, usize)> {
    check_prefix_digits(digits)?;
    let width = encoded_width(digits, encoding, registry)?;
    if input.len() < width {
        return Err(CodecError::TruncatedInput {
            remaining: input.len(),
            required: width,
        });
    }

    let prefix = registry.decode(encoding, &input[..width])?;
    let length = check_digits(&prefix)
        .and_then(|()| prefix.parse::<usize>())
        .map_err(|source| CodecError::MalformedLength {
            prefix: prefix.clone(),
            source,
        })?;

    Ok((length, width))
}

/// Prepend the length prefix of `content` and return the complete wire bytes.
pub fn write_prefixed(
    digits: usize,
    content: &[u8],
    encoding: &str,
    registry: &EncodingRegistry,
) -> Result<Vec<u8>> {
    let mut wire = encode_prefix(digits, content.len(), encoding, registry)?;
    wire.extend_from_slice(content);
    Ok(wire)
}

/// Read a length prefix and the content it announces.
///
/// Returns the content bytes (still in wire form) and the total bytes consumed,
/// prefix included.
pub fn read_prefixed<'a>(
    digits: usize,
    input: &'a [u8],
    encoding: &str,
    registry: &EncodingRegistry,
) -> Result<(&'a [u8], usize)> {
    let (length, width) = decode_prefix(digits, input, encoding, registry)?;
    let content = take(&input[width..], length)?;
    Ok((content, width + length))
}
