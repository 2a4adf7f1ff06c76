//! # Linguistic Steganography
//!
//! Hides an arbitrary payload inside natural-language cover text by choosing
//! between synonyms, two bits per substitutable word.
//!
//! ## Why Word Choice Instead Of Invisible Characters
//!
//! Encoding through *word choice* survives copy-paste, re-typing, and
//! plain-text transport, where zero-width and whitespace tricks are destroyed
//! by the first normalizing editor. The price is density: four synonyms per
//! group caps the channel at 2 bits per carrying word.
//!
//! ## Frame Format
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          STEGO FRAME                                    │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  payload (arbitrary UTF-8)                                             │
//! │        │                                                                │
//! │        ▼  base64 (keeps binary/Unicode intact through a word channel)  │
//! │  ASCII string, 8 bits per char                                         │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  ┌──────────────────────┬──────────────────────────────┐               │
//! │  │ 32-bit header        │ payload bits                 │ (+ pad to     │
//! │  │ payload bit-length,  │                              │  even length) │
//! │  │ big-endian           │                              │               │
//! │  └──────────────────────┴──────────────────────────────┘               │
//! │        │                                                                │
//! │        ▼  2 bits per substitutable word, in text order                 │
//! │  cover text with synonyms swapped: bits 00/01/10/11 select the         │
//! │  group member at index 0/1/2/3                                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Capacity planning: if the cover text holds fewer substitutable words than
//! the frame needs, the whole cover is repeated (space-joined) until it fits.
//! A cover with *no* substitutable words falls back to the bundled default
//! corpus. The codec never silently truncates a payload.

mod synonyms;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::error::{Error, Result};

/// Bits in the length-prefix header
const HEADER_BITS: usize = 32;

/// Hide a payload in cover text via synonym substitution
///
/// ## Parameters
///
/// - `payload`: the secret to hide; arbitrary UTF-8, may be empty
/// - `cover_text`: cover to embed into; `None` or blank uses the default
///   corpus, and a cover with no substitutable words falls back to it too
///
/// ## Errors
///
/// `InsufficientCapacity` when not even the fallback corpus can carry the
/// frame (only possible with a misconfigured synonym table).
pub fn hide(payload: &str, cover_text: Option<&str>) -> Result<String> {
    let cover = match cover_text {
        Some(text) if !text.trim().is_empty() => text,
        _ => synonyms::DEFAULT_COVER_TEXT,
    };

    let encoded = BASE64.encode(payload.as_bytes());
    let payload_bits = bits_of_bytes(encoded.as_bytes());

    // Header carries the payload's bit length, not byte length
    let mut frame: Vec<bool> = Vec::with_capacity(HEADER_BITS + payload_bits.len() + 1);
    let declared = payload_bits.len() as u32;
    frame.extend((0..HEADER_BITS).rev().map(|k| (declared >> k) & 1 == 1));
    frame.extend(payload_bits);
    if frame.len() % 2 != 0 {
        frame.push(false);
    }

    let required_words = frame.len().div_ceil(2);
    let prepared = prepare_cover(cover, required_words)?;

    let mut words: Vec<String> = prepared.split_whitespace().map(str::to_string).collect();
    let sites = substitution_sites(&words);
    if sites.len() < required_words {
        return Err(Error::InsufficientCapacity {
            required: required_words,
            available: sites.len(),
        });
    }

    tracing::debug!(
        bits = frame.len(),
        words = sites.len(),
        "embedding frame into cover text"
    );

    let mut bit_idx = 0;
    for site in &sites {
        if bit_idx >= frame.len() {
            break;
        }
        let hi = frame[bit_idx];
        let lo = frame.get(bit_idx + 1).copied().unwrap_or(false);
        let index = ((hi as usize) << 1) | lo as usize;

        let original = &words[site.position];
        let replacement = format!(
            "{}{}",
            match_capitalization(synonyms::synonym(site.group, index), original),
            trailing_punctuation(original)
        );
        words[site.position] = replacement;
        bit_idx += 2;
    }

    Ok(words.join(" "))
}

/// Extract a hidden payload from stego text
///
/// ## Errors
///
/// - `InsufficientData` when fewer than 32 bits are recoverable (no header).
/// - `CorruptFrame` when the declared length exceeds the available bits, or
///   when the recovered bits fail base64/UTF-8 decoding.
pub fn extract(stego_text: &str) -> Result<String> {
    let mut bits: Vec<bool> = Vec::new();
    for token in stego_text.split_whitespace() {
        if let Some((_, index)) = synonyms::lookup(&clean_token(token)) {
            bits.push(index & 0b10 != 0);
            bits.push(index & 0b01 != 0);
        }
    }

    if bits.len() < HEADER_BITS {
        return Err(Error::InsufficientData { bits: bits.len() });
    }

    let declared = bits[..HEADER_BITS]
        .iter()
        .fold(0usize, |acc, &bit| (acc << 1) | bit as usize);
    let available = bits.len() - HEADER_BITS;
    if declared > available {
        return Err(Error::CorruptFrame(format!(
            "declared payload length {} bits exceeds the {} bits available after the header",
            declared, available
        )));
    }

    // A zero-length header is the legitimate encoding of an empty payload
    let message_bits = &bits[HEADER_BITS..HEADER_BITS + declared];
    let bytes: Vec<u8> = message_bits
        .chunks_exact(8)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | bit as u8))
        .collect();

    let encoded = String::from_utf8(bytes)
        .map_err(|_| Error::CorruptFrame("recovered bits are not an ASCII base64 string".into()))?;
    let raw = BASE64
        .decode(&encoded)
        .map_err(|e| Error::CorruptFrame(format!("invalid base64 payload: {}", e)))?;
    String::from_utf8(raw)
        .map_err(|_| Error::CorruptFrame("decoded payload is not valid UTF-8".into()))
}

/// Expand bytes to bits, MSB first
fn bits_of_bytes(bytes: &[u8]) -> Vec<bool> {
    bytes
        .iter()
        .flat_map(|&byte| (0..8).rev().map(move |k| (byte >> k) & 1 == 1))
        .collect()
}

// ============================================================================
// CAPACITY PLANNING
// ============================================================================

/// A word in the cover that can carry 2 bits
struct Site {
    /// Index into the whitespace-split word list
    position: usize,
    /// Synonym group the word belongs to
    group: usize,
}

fn substitution_sites(words: &[String]) -> Vec<Site> {
    words
        .iter()
        .enumerate()
        .filter_map(|(position, word)| {
            synonyms::lookup(&clean_token(word)).map(|(group, _)| Site { position, group })
        })
        .collect()
}

fn count_sites(text: &str) -> usize {
    text.split_whitespace()
        .filter(|token| synonyms::lookup(&clean_token(token)).is_some())
        .count()
}

/// Repeat the cover text until it can carry `required_words` 2-bit slots,
/// falling back to the default corpus when the cover carries none at all
fn prepare_cover(cover: &str, required_words: usize) -> Result<String> {
    let mut text = cover;
    let mut base = count_sites(text);

    if base == 0 {
        tracing::warn!("cover text has no substitutable words, using the default corpus");
        text = synonyms::DEFAULT_COVER_TEXT;
        base = count_sites(text);
        if base == 0 {
            return Err(Error::InsufficientCapacity {
                required: required_words,
                available: 0,
            });
        }
    }

    let repetitions = std::cmp::max(1, required_words.div_ceil(base));
    if repetitions > 1 {
        Ok(vec![text; repetitions].join(" "))
    } else {
        Ok(text.to_string())
    }
}

// ============================================================================
// TOKEN HELPERS
// ============================================================================

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Reduce a token to its lookup key: word characters only, lowercased
///
/// Edge cases: a token with internal punctuation ("don't" → "dont") keeps no
/// record of where the punctuation was, which is fine for matching because no
/// table entry contains punctuation - such tokens simply never match.
fn clean_token(token: &str) -> String {
    token
        .chars()
        .filter(|&c| is_word_char(c))
        .collect::<String>()
        .to_lowercase()
}

/// The trailing run of non-word characters ("good," → ","), carried onto the
/// substituted synonym. Leading punctuation is dropped on substitution.
fn trailing_punctuation(token: &str) -> &str {
    let end = token
        .char_indices()
        .rev()
        .find(|(_, c)| is_word_char(*c))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    &token[end..]
}

/// Title-case the synonym when the original word was capitalized
///
/// Edge case: an all-caps original ("GOOD") yields a title-cased synonym
/// ("Great"), not an all-caps one - the table is the canonical spelling and
/// only the leading capital is preserved.
fn match_capitalization(synonym: &str, original: &str) -> String {
    let capitalized = original
        .chars()
        .find(|&c| is_word_char(c))
        .map(char::is_uppercase)
        .unwrap_or(false);

    if !capitalized {
        return synonym.to_string();
    }

    let mut chars = synonym.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
