//! # Zero-Width Watermarking
//!
//! Embeds a short identifier into arbitrary text using invisible Unicode
//! code points, and recovers or strips it again.
//!
//! ## Frame Format
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        WATERMARK FRAME                                  │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  identifier "Alice"                                                    │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  delimited frame      "WM:Alice:WM"                                    │
//! │        │                                                                │
//! │        ▼  (UTF-8 bytes, 8 bits each, MSB first)                        │
//! │  bit string           01010111 01001101 00111010 ...                   │
//! │        │                                                                │
//! │        ▼  (0 → U+200B zero-width space, 1 → U+200C non-joiner)         │
//! │  invisible run        one contiguous run of zero-width characters      │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  host text            inserted after the first sentence boundary,      │
//! │                       or prepended when the text has none              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The watermark grows linearly with the identifier: 8 bits per byte, one
//! invisible character per bit. No length limit is enforced.
//!
//! ## Extraction Scans The Whole Text
//!
//! `extract` collects invisible characters from the *entire* text, in order,
//! not just the contiguous embedded run. That makes extraction robust to the
//! run being relocated, and fragile to stray invisible characters elsewhere
//! in the text - any incidental U+200B/U+200C corrupts the frame. This is a
//! known, preserved property of the codec.

use crate::error::{Error, Result};

/// Invisible code point for a `0` bit (zero-width space)
pub const ZERO_BIT_CHAR: char = '\u{200B}';

/// Invisible code point for a `1` bit (zero-width non-joiner)
pub const ONE_BIT_CHAR: char = '\u{200C}';

const FRAME_PREFIX: &str = "WM:";
const FRAME_SUFFIX: &str = ":WM";

/// Embed an identifier into text as an invisible watermark
///
/// The identifier is framed as `WM:<identifier>:WM`, bit-expanded, mapped to
/// zero-width characters, and inserted as one contiguous run after the first
/// sentence boundary (sentence-ending punctuation followed by whitespace) -
/// or prepended when the text has no such boundary.
///
/// Returns a new string; the input is not mutated.
///
/// ## Errors
///
/// `InvalidArgument` when `text` or `identifier` is empty.
pub fn embed(text: &str, identifier: &str) -> Result<String> {
    if text.is_empty() || identifier.is_empty() {
        return Err(Error::InvalidArgument("Text and watermark are required".into()));
    }

    let frame = format!("{}{}{}", FRAME_PREFIX, identifier, FRAME_SUFFIX);
    let run: String = frame
        .bytes()
        .flat_map(|byte| (0..8).rev().map(move |k| (byte >> k) & 1))
        .map(|bit| if bit == 0 { ZERO_BIT_CHAR } else { ONE_BIT_CHAR })
        .collect();

    let watermarked = match sentence_boundary_end(text) {
        Some(at) => {
            let mut out = String::with_capacity(text.len() + run.len() * 3);
            out.push_str(&text[..at]);
            out.push_str(&run);
            out.push_str(&text[at..]);
            out
        }
        None => format!("{}{}", run, text),
    };

    Ok(watermarked)
}

/// Extract the embedded identifier from watermarked text
///
/// ## Errors
///
/// - `WatermarkNotFound` when the text contains no invisible characters.
/// - `WatermarkCorrupted` when invisible characters are present but do not
///   decode to a `WM:<identifier>:WM` frame; `raw` carries the decoded
///   string for diagnostics.
pub fn extract(text: &str) -> Result<String> {
    if text.is_empty() {
        return Err(Error::InvalidArgument("Watermarked text is required".into()));
    }

    let bits: Vec<u8> = text
        .chars()
        .filter_map(|c| match c {
            ZERO_BIT_CHAR => Some(0),
            ONE_BIT_CHAR => Some(1),
            _ => None,
        })
        .collect();

    if bits.is_empty() {
        return Err(Error::WatermarkNotFound);
    }

    // Regroup to bytes, dropping a trailing partial byte
    let bytes: Vec<u8> = bits
        .chunks_exact(8)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | bit))
        .collect();

    let decoded = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            return Err(Error::WatermarkCorrupted {
                raw: String::from_utf8_lossy(e.as_bytes()).into_owned(),
            })
        }
    };

    match parse_frame(&decoded) {
        Some(identifier) => Ok(identifier.to_string()),
        None => Err(Error::WatermarkCorrupted { raw: decoded }),
    }
}

/// Remove every invisible watermark character from text
///
/// Always succeeds; a no-op when no watermark is present.
pub fn strip(text: &str) -> String {
    text.chars()
        .filter(|&c| c != ZERO_BIT_CHAR && c != ONE_BIT_CHAR)
        .collect()
}

/// Check whether the text carries the expected identifier
pub fn verify(text: &str, expected: &str) -> Result<bool> {
    Ok(extract(text)? == expected)
}

/// Lazy-match `WM:(...):WM`: the first `WM:` and the nearest following `:WM`
fn parse_frame(decoded: &str) -> Option<&str> {
    let start = decoded.find(FRAME_PREFIX)? + FRAME_PREFIX.len();
    let rest = &decoded[start..];
    let end = rest.find(FRAME_SUFFIX)?;
    Some(&rest[..end])
}

/// Byte offset just past the first sentence boundary: sentence-ending
/// punctuation followed by its whole whitespace run
fn sentence_boundary_end(text: &str) -> Option<usize> {
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        match chars.peek() {
            Some(&(_, next)) if next.is_whitespace() => {
                let mut end = i + c.len_utf8();
                while let Some(&(j, w)) = chars.peek() {
                    if !w.is_whitespace() {
                        break;
                    }
                    end = j + w.len_utf8();
                    chars.next();
                }
                return Some(end);
            }
            _ => {}
        }
    }
    None
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_extract_round_trip() {
        let watermarked = embed("The cat sat.", "Alice").unwrap();
        assert_eq!(extract(&watermarked).unwrap(), "Alice");
    }

    #[test]
    fn test_watermark_is_invisible_to_strip() {
        let original = "First sentence. Second sentence follows here.";
        let watermarked = embed(original, "sender-42").unwrap();

        assert_ne!(watermarked, original);
        assert_eq!(strip(&watermarked), original);
    }

    #[test]
    fn test_inserted_after_first_sentence_boundary() {
        let watermarked = embed("One done. Two follows.", "id").unwrap();
        // The run must sit between the boundary whitespace and "Two"
        let run_start = watermarked.find(ZERO_BIT_CHAR).unwrap();
        assert_eq!(&watermarked[..run_start], "One done. ");
    }

    #[test]
    fn test_prepended_without_sentence_boundary() {
        let watermarked = embed("no sentence boundary here", "id").unwrap();
        let first = watermarked.chars().next().unwrap();
        assert!(first == ZERO_BIT_CHAR || first == ONE_BIT_CHAR);
        assert_eq!(extract(&watermarked).unwrap(), "id");
    }

    #[test]
    fn test_trailing_period_is_not_a_boundary() {
        // "." at end of text has no following whitespace
        let watermarked = embed("Only one sentence.", "id").unwrap();
        let first = watermarked.chars().next().unwrap();
        assert!(first == ZERO_BIT_CHAR || first == ONE_BIT_CHAR);
    }

    #[test]
    fn test_unicode_identifier_round_trip() {
        let watermarked = embed("Some text. More text.", "Ålice-émoji").unwrap();
        assert_eq!(extract(&watermarked).unwrap(), "Ålice-émoji");
    }

    #[test]
    fn test_extract_without_watermark_not_found() {
        assert!(matches!(extract("clean text"), Err(Error::WatermarkNotFound)));
    }

    #[test]
    fn test_stray_invisible_chars_corrupt_frame() {
        // A handful of invisible characters that do not decode to a frame
        let text = format!("plain{}{}{}text", ZERO_BIT_CHAR, ONE_BIT_CHAR, ZERO_BIT_CHAR);
        assert!(matches!(
            extract(&text),
            Err(Error::WatermarkCorrupted { .. })
        ));
    }

    #[test]
    fn test_corrupted_error_carries_raw_decode() {
        // Eight valid bit chars decode to one byte that is not a frame
        let bits = "01000001"; // 'A'
        let run: String = bits
            .chars()
            .map(|b| if b == '0' { ZERO_BIT_CHAR } else { ONE_BIT_CHAR })
            .collect();
        match extract(&format!("text {} here", run)) {
            Err(Error::WatermarkCorrupted { raw }) => assert_eq!(raw, "A"),
            other => panic!("expected WatermarkCorrupted, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_inputs_rejected() {
        assert!(matches!(embed("", "id"), Err(Error::InvalidArgument(_))));
        assert!(matches!(embed("text", ""), Err(Error::InvalidArgument(_))));
        assert!(matches!(extract(""), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_strip_is_noop_on_clean_text() {
        assert_eq!(strip("untouched"), "untouched");
    }

    #[test]
    fn test_verify_match_and_mismatch() {
        let watermarked = embed("Check me. Twice over.", "owner").unwrap();
        assert!(verify(&watermarked, "owner").unwrap());
        assert!(!verify(&watermarked, "intruder").unwrap());
    }

    #[test]
    fn test_extraction_survives_run_relocation() {
        // Whole-text scan: moving the run to the end still extracts
        let watermarked = embed("Alpha beta. Gamma delta.", "mark").unwrap();
        let clean = strip(&watermarked);
        let run: String = watermarked
            .chars()
            .filter(|&c| c == ZERO_BIT_CHAR || c == ONE_BIT_CHAR)
            .collect();
        let relocated = format!("{}{}", clean, run);
        assert_eq!(extract(&relocated).unwrap(), "mark");
    }
}
