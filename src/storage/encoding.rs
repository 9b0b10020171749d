//! Data URL parsing and base64 checks shared by the storage providers.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;

/// Decoder for untrusted server input: padding optional, trailing bits tolerated.
pub(crate) const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

const DATA_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// A `data:<mime>;base64,<payload>` string split into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataUrl<'a> {
    pub mime_type: &'a str,
    pub payload: &'a str,
}

impl<'a> DataUrl<'a> {
    /// Parses the strict `data:<mime>;base64,<payload>` shape.
    ///
    /// The MIME type runs up to the first `;` and must be non-empty. The payload
    /// must be non-empty and free of line terminators.
    pub fn parse(input: &'a str) -> Option<Self> {
        let rest = input.strip_prefix(DATA_PREFIX)?;
        let semi = rest.find(';')?;
        let (mime_type, tail) = rest.split_at(semi);
        if mime_type.is_empty() {
            return None;
        }
        let payload = tail.strip_prefix(BASE64_MARKER)?;
        if payload.is_empty() || payload.chars().any(is_line_terminator) {
            return None;
        }
        Some(Self { mime_type, payload })
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// Builds a data URL from raw bytes.
    pub fn encode(mime_type: &str, bytes: &[u8]) -> String {
        format!("{DATA_PREFIX}{mime_type}{BASE64_MARKER}{}", STANDARD.encode(bytes))
    }
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// True when decoding with the strict standard engine and re-encoding
/// reproduces `input` byte for byte.
pub fn is_canonical_base64(input: &str) -> bool {
    match STANDARD.decode(input) {
        Ok(bytes) => STANDARD.encode(bytes) == input,
        Err(_) => false,
    }
}

/// Approximate decoded size of a base64 string: `floor(len * 3 / 4)` of the
/// segment after the first comma, or of the whole string when there is none.
/// Padding is not subtracted.
pub fn approximate_decoded_size(encoded: &str) -> u64 {
    let payload = if encoded.contains(',') {
        encoded.split(',').nth(1).unwrap_or_default()
    } else {
        encoded
    };
    (payload.len() as u64 * 3) / 4
}

/// Heuristic used by the thumbnail policy to spot bare base64.
///
/// Only the length of the whole input is checked against `min_len`; the
/// character class is checked after stripping a `data:<mime>;base64,` prefix.
pub fn looks_like_base64(input: &str, min_len: usize) -> bool {
    if input.len() < min_len {
        return false;
    }
    let body = strip_data_prefix(input);
    !body.is_empty()
        && body
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'='))
}

fn strip_data_prefix(input: &str) -> &str {
    let Some(rest) = input.strip_prefix(DATA_PREFIX) else {
        return input;
    };
    match rest.find(';') {
        Some(semi) if semi > 0 => rest[semi..].strip_prefix(BASE64_MARKER).unwrap_or(input),
        _ => input,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_image_data_url() {
        let url = DataUrl::parse("data:image/png;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(url.mime_type, "image/png");
        assert_eq!(url.payload, "iVBORw0KGgo=");
        assert!(url.is_image());
    }

    #[test]
    fn rejects_malformed_data_urls() {
        assert!(DataUrl::parse("data:;base64,AAAA").is_none());
        assert!(DataUrl::parse("data:image/png;base64,").is_none());
        assert!(DataUrl::parse("data:image/png,AAAA").is_none());
        assert!(DataUrl::parse("data:image/png;base64,AA\nAA").is_none());
        assert!(DataUrl::parse("image/png;base64,AAAA").is_none());
    }

    #[test]
    fn non_image_mime_is_detected() {
        let url = DataUrl::parse("data:text/plain;base64,aGk=").unwrap();
        assert!(!url.is_image());
    }

    #[test]
    fn encode_builds_data_url() {
        assert_eq!(DataUrl::encode("image/gif", b"hi"), "data:image/gif;base64,aGk=");
    }

    #[test]
    fn canonical_base64_round_trips_exactly() {
        assert!(is_canonical_base64("aGVsbG8="));
        assert!(!is_canonical_base64("aGVsbG8"));
        assert!(!is_canonical_base64("aGVsbG9="));
        assert!(!is_canonical_base64("not base64!"));
    }

    #[test]
    fn lenient_engine_accepts_missing_padding() {
        assert_eq!(LENIENT.decode("aGVsbG8").unwrap(), b"hello");
        assert!(LENIENT.decode("a*b").is_err());
    }

    #[test]
    fn decoded_size_uses_payload_after_first_comma() {
        assert_eq!(approximate_decoded_size("data:image/png;base64,AAAAAAAA"), 6);
        assert_eq!(approximate_decoded_size("AAAAA"), 3);
        assert_eq!(approximate_decoded_size("aGk="), 3);
    }

    #[test]
    fn base64_heuristic_needs_length_and_alphabet() {
        let long = "A".repeat(100);
        assert!(looks_like_base64(&long, 100));
        assert!(!looks_like_base64(&"A".repeat(99), 100));
        assert!(!looks_like_base64(&format!("{long} with spaces"), 100));

        let prefixed = format!("data:image/png;base64,{}", "B".repeat(80));
        assert!(looks_like_base64(&prefixed, 100));
    }
}
