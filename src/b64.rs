//! Base64 codec
//!
//! Encoding is the standard padded alphabet. Decoding is deliberately
//! lenient: the conversion form accepts text pasted from the upload page
//! (or anywhere else), so foreign characters, stray padding, and a
//! truncated final quantum are tolerated rather than rejected.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;

/// Engine used for lenient decoding: no padding expectations, trailing
/// bits of a short final quantum are accepted.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Encode bytes as standard padded base64.
pub fn encode(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Decode a base64 string, skipping anything that is not part of the
/// standard alphabet.
///
/// Matches permissive decoder semantics: `=` is ignored wherever it
/// appears, whitespace and other foreign characters are dropped, and a
/// lone trailing symbol (which encodes fewer than 8 bits) is discarded.
/// Never fails; garbage input decodes to whatever valid symbols it
/// contains, worst case an empty vector.
pub fn decode_lenient(text: &str) -> Vec<u8> {
    let mut cleaned: Vec<u8> = text
        .bytes()
        .filter(|b| b.is_ascii_alphanumeric() || *b == b'+' || *b == b'/')
        .collect();

    // A final quantum of one symbol carries no whole byte.
    if cleaned.len() % 4 == 1 {
        cleaned.pop();
    }

    // Infallible: `cleaned` holds only alphabet symbols and a valid
    // length, and trailing bits are allowed above.
    LENIENT.decode(&cleaned).unwrap_or_default()
}
