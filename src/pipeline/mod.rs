//! # Layered Pipeline
//!
//! The orchestrator: five ordered transformation layers forward, the exact
//! mirror backward, with an integrity/authenticity checkpoint in the middle.
//!
//! ## Forward (encrypt)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      5-LAYER ENCRYPTION                                 │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  plaintext                                                             │
//! │      │                                                                  │
//! │  [1] AES-256-CBC encrypt, fresh random IV ───────────► iv              │
//! │      │                                                                  │
//! │  [2] wrap symmetric key                                                │
//! │      │   RSA: OAEP under key_encryption public key ──► encrypted_key   │
//! │      │   ECC: pass through UNCHANGED (simplified,                      │
//! │      │        documented - not ECIES)                                  │
//! │      │                                                                  │
//! │  [3] watermark-embed sender id into the ciphertext                     │
//! │      │                                                                  │
//! │  [4] SHA-256 the WATERMARKED ciphertext ─────────────► ciphertext_hash │
//! │      │   sign the hex hash (RSA-PSS / ECDSA) ────────► signature       │
//! │      │                                                                  │
//! │  [5] base64 the watermarked ciphertext,                                │
//! │      hide it in cover text via synonyms ─────────────► stego_text      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Backward (decrypt)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      MIRRORED DECRYPTION                                │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  stego_text                                                            │
//! │      │                                                                  │
//! │  [5] stego-extract → base64-decode → watermarked ciphertext            │
//! │      │                                                                  │
//! │  [4] watermark-extract (best effort: a failure here records            │
//! │      │   extracted_watermark = None, it never aborts)                  │
//! │      │                                                                  │
//! │  [✓] INTEGRITY GATE - hash recomputed over the STILL-WATERMARKED       │
//! │      │   ciphertext; signature verified over the envelope's STORED     │
//! │      │   hash. Signature invalid → SignatureInvalid. Hash mismatch →   │
//! │      │   IntegrityViolation. Both must pass; only then is the          │
//! │      │   watermark stripped.                                           │
//! │      │                                                                  │
//! │  [2] recover symmetric key (RSA: OAEP-decrypt; ECC: read it from       │
//! │      │   the bundle - mirrors the forward simplification)              │
//! │      │                                                                  │
//! │  [1] AES-256-CBC decrypt with the envelope IV → plaintext              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Any layer failure aborts the whole operation immediately and names the
//! layer (`Error::LayerFailed` and friends); no partial envelope or
//! plaintext is ever returned. Decryption never yields a plaintext without
//! both gates passing.

mod envelope;

pub use envelope::{
    DecryptionOutcome, EncryptionEnvelope, EncryptionOutcome, LayerOutput, StepRecord,
};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::crypto::{ecdsa, rsa, symmetric, KeyAlgorithm, KeyBundle, KeySize, Mode};
use crate::error::{Error, Result};
use crate::{stego, watermark};

/// Generate a complete key bundle for the layered workflow
///
/// Convenience alias for [`KeyBundle::generate`].
pub fn generate_keys(algorithm: KeyAlgorithm) -> Result<KeyBundle> {
    KeyBundle::generate(algorithm)
}

/// Run the 5-layer encryption workflow
///
/// ## Parameters
///
/// - `plaintext`: the message to protect
/// - `sender_identifier`: embedded as the layer-3 watermark
/// - `keys`: a pre-generated bundle; `None` generates one for `algorithm`
/// - `algorithm`: asymmetric family used when generating (a supplied bundle
///   carries its own)
/// - `cover_text`: optional layer-5 cover; the default corpus otherwise
///
/// ## Returns
///
/// The [`EncryptionEnvelope`], the key bundle used, and the ordered
/// layer-by-layer trace.
pub fn encrypt(
    plaintext: &str,
    sender_identifier: &str,
    keys: Option<KeyBundle>,
    algorithm: KeyAlgorithm,
    cover_text: Option<&str>,
) -> Result<EncryptionOutcome> {
    let keys = match keys {
        Some(bundle) => bundle,
        None => KeyBundle::generate(algorithm)?,
    };

    tracing::info!(
        algorithm = ?keys.algorithm,
        plaintext_len = plaintext.len(),
        sender = sender_identifier,
        "layered encryption started"
    );

    let mut layers = Vec::with_capacity(5);

    // ------------------------------------------------------------------
    // Layer 1: AES encryption of the plaintext
    // ------------------------------------------------------------------
    let aes_out = symmetric::encrypt(
        plaintext,
        keys.symmetric.as_str(),
        Mode::Cbc,
        KeySize::Bits256,
        None,
    )
    .map_err(|e| e.at_layer(1, "aes-encrypt"))?;
    let ciphertext = aes_out.ciphertext;
    let iv = aes_out
        .iv
        .ok_or_else(|| Error::EncryptionFailed("CBC mode produced no IV".into()))
        .map_err(|e| e.at_layer(1, "aes-encrypt"))?;

    tracing::debug!(ciphertext_len = ciphertext.len(), "layer 1 complete");
    layers.push(LayerOutput {
        layer: 1,
        name: "AES Encryption".into(),
        algorithm: "AES-256-CBC".into(),
        input: plaintext.into(),
        output: ciphertext.clone(),
        metadata: json!({ "iv": iv.clone(), "key_size": 256 }),
    });

    // ------------------------------------------------------------------
    // Layer 2: asymmetric wrap of the symmetric key
    //
    // The ECC branch deliberately passes the key through unmodified. Real
    // hybrid encryption here would be ECIES; the sandbox keeps the known
    // weakness instead of pretending otherwise.
    // ------------------------------------------------------------------
    let (encrypted_key, wrap_method) = match keys.algorithm {
        KeyAlgorithm::Rsa => {
            let wrapped = rsa::encrypt(keys.symmetric.as_str(), &keys.key_encryption.public_key)
                .map_err(|e| e.at_layer(2, "key-wrap"))?;
            (wrapped, "RSA-2048")
        }
        KeyAlgorithm::Ecc => (keys.symmetric.as_str().to_string(), "ECC-Based (Simplified)"),
    };

    tracing::debug!(method = wrap_method, "layer 2 complete");
    layers.push(LayerOutput {
        layer: 2,
        name: "Key Encryption".into(),
        algorithm: keys.key_encryption.algorithm.clone(),
        input: keys.symmetric.as_str().into(),
        output: encrypted_key.clone(),
        metadata: json!({ "method": wrap_method }),
    });

    // ------------------------------------------------------------------
    // Layer 3: watermark the ciphertext with the sender identifier
    // ------------------------------------------------------------------
    let watermarked = watermark::embed(&ciphertext, sender_identifier)
        .map_err(|e| e.at_layer(3, "watermark"))?;

    tracing::debug!(watermarked_len = watermarked.len(), "layer 3 complete");
    layers.push(LayerOutput {
        layer: 3,
        name: "Text Watermarking".into(),
        algorithm: "Zero-Width Characters".into(),
        input: ciphertext.clone(),
        output: watermarked.clone(),
        metadata: json!({
            "watermark": sender_identifier,
            "method": "zero-width-characters",
        }),
    });

    // ------------------------------------------------------------------
    // Layer 4: hash the WATERMARKED ciphertext and sign the hash
    // ------------------------------------------------------------------
    let ciphertext_hash = hex::encode(Sha256::digest(watermarked.as_bytes()));
    let signature = match keys.algorithm {
        KeyAlgorithm::Rsa => rsa::sign(&ciphertext_hash, &keys.signature.private_key),
        KeyAlgorithm::Ecc => ecdsa::sign(&ciphertext_hash, &keys.signature.private_key),
    }
    .map_err(|e| e.at_layer(4, "signature"))?;

    tracing::debug!(hash = %ciphertext_hash, "layer 4 complete");
    layers.push(LayerOutput {
        layer: 4,
        name: "Digital Signature".into(),
        algorithm: keys.signature.algorithm.clone(),
        input: ciphertext_hash.clone(),
        output: signature.clone(),
        metadata: json!({
            "hash_algorithm": "SHA-256",
            "hash": ciphertext_hash.clone(),
        }),
    });

    // ------------------------------------------------------------------
    // Layer 5: hide the watermarked ciphertext in cover text
    //
    // Base64 first: the watermarked ciphertext contains zero-width Unicode
    // that must survive a word-oriented channel intact.
    // ------------------------------------------------------------------
    let carrier = BASE64.encode(watermarked.as_bytes());
    let stego_text =
        stego::hide(&carrier, cover_text).map_err(|e| e.at_layer(5, "stego-hide"))?;

    tracing::debug!(stego_len = stego_text.len(), "layer 5 complete");
    layers.push(LayerOutput {
        layer: 5,
        name: "Linguistic Steganography".into(),
        algorithm: "Synonym Substitution".into(),
        input: watermarked,
        output: stego_text.clone(),
        metadata: json!({ "method": "linguistic-synonym-substitution" }),
    });

    tracing::info!("layered encryption complete");

    Ok(EncryptionOutcome {
        envelope: EncryptionEnvelope {
            stego_text,
            encrypted_key,
            signature,
            ciphertext_hash,
            iv,
        },
        keys,
        layers,
    })
}

/// Run the mirrored 5-layer decryption workflow
///
/// Requires the envelope from [`encrypt`] and the same key bundle. See the
/// module docs for the step order and the integrity gate; decryption never
/// returns a plaintext unless both the signature and the hash check pass.
pub fn decrypt(envelope: &EncryptionEnvelope, keys: &KeyBundle) -> Result<DecryptionOutcome> {
    tracing::info!(
        algorithm = ?keys.algorithm,
        stego_len = envelope.stego_text.len(),
        "layered decryption started"
    );

    let mut steps = Vec::with_capacity(5);

    // ------------------------------------------------------------------
    // Reverse layer 5: recover the watermarked ciphertext
    // ------------------------------------------------------------------
    let carrier = stego::extract(&envelope.stego_text)
        .map_err(|e| Error::StegoExtractionFailed { source: Box::new(e) })?;
    let watermarked_bytes = BASE64.decode(&carrier).map_err(|e| Error::StegoExtractionFailed {
        source: Box::new(Error::CorruptFrame(format!("invalid base64 carrier: {}", e))),
    })?;
    let watermarked = String::from_utf8(watermarked_bytes).map_err(|_| Error::StegoExtractionFailed {
        source: Box::new(Error::CorruptFrame("carrier is not valid UTF-8".into())),
    })?;

    tracing::debug!(watermarked_len = watermarked.len(), "reverse layer 5 complete");
    steps.push(StepRecord {
        layer: 5,
        name: "Linguistic Steganography Extraction".into(),
        detail: json!({ "output_preview": preview(&watermarked) }),
    });

    // ------------------------------------------------------------------
    // Reverse layer 4: extract the watermark - best effort only.
    // Signature verification is the authoritative integrity gate, not
    // watermark presence, so a failure here degrades to None.
    // ------------------------------------------------------------------
    let extracted_watermark = match watermark::extract(&watermarked) {
        Ok(identifier) => Some(identifier),
        Err(e) => {
            tracing::warn!("watermark extraction failed: {}", e);
            None
        }
    };

    steps.push(StepRecord {
        layer: 4,
        name: "Watermark Extraction".into(),
        detail: json!({ "extracted_watermark": extracted_watermark.clone() }),
    });

    // ------------------------------------------------------------------
    // Integrity gate: recompute the hash over the STILL-WATERMARKED
    // ciphertext, verify the signature over the envelope's STORED hash.
    // ------------------------------------------------------------------
    let recomputed_hash = hex::encode(Sha256::digest(watermarked.as_bytes()));

    let signature_valid = match keys.algorithm {
        KeyAlgorithm::Rsa => rsa::verify(
            &envelope.ciphertext_hash,
            &envelope.signature,
            &keys.signature.public_key,
        ),
        KeyAlgorithm::Ecc => ecdsa::verify(
            &envelope.ciphertext_hash,
            &envelope.signature,
            &keys.signature.public_key,
        ),
    }
    .unwrap_or_else(|e| {
        tracing::warn!("signature verification errored: {}", e);
        false
    });

    if !signature_valid {
        return Err(Error::SignatureInvalid);
    }

    let hash_matches = recomputed_hash == envelope.ciphertext_hash;
    if !hash_matches {
        return Err(Error::IntegrityViolation {
            expected: envelope.ciphertext_hash.clone(),
            actual: recomputed_hash,
        });
    }

    tracing::debug!("integrity gate passed");
    steps.push(StepRecord {
        layer: 3,
        name: "Signature Verification".into(),
        detail: json!({
            "signature_valid": signature_valid,
            "hash_matches": hash_matches,
        }),
    });

    // Only now is the watermark stripped for decryption
    let clean_ciphertext = watermark::strip(&watermarked);

    // ------------------------------------------------------------------
    // Reverse layer 2: recover the symmetric key
    // ------------------------------------------------------------------
    let symmetric_key = match keys.algorithm {
        KeyAlgorithm::Rsa => {
            rsa::decrypt(&envelope.encrypted_key, &keys.key_encryption.private_key)
                .map_err(|e| Error::KeyRecoveryFailed { source: Box::new(e) })?
        }
        // Mirrors the forward simplification: the key was never wrapped
        KeyAlgorithm::Ecc => keys.symmetric.as_str().to_string(),
    };

    tracing::debug!("reverse layer 2 complete");
    steps.push(StepRecord {
        layer: 2,
        name: "Key Decryption".into(),
        detail: json!({ "method": keys.key_encryption.algorithm.clone() }),
    });

    // ------------------------------------------------------------------
    // Reverse layer 1: AES decryption
    // ------------------------------------------------------------------
    let plaintext = symmetric::decrypt(
        &clean_ciphertext,
        &symmetric_key,
        Mode::Cbc,
        KeySize::Bits256,
        Some(&envelope.iv),
    )
    .map_err(|e| e.at_layer(1, "aes-decrypt"))?;

    tracing::debug!(plaintext_len = plaintext.len(), "reverse layer 1 complete");
    steps.push(StepRecord {
        layer: 1,
        name: "AES Decryption".into(),
        detail: json!({ "output_preview": preview(&plaintext) }),
    });

    tracing::info!("layered decryption complete");

    Ok(DecryptionOutcome {
        plaintext,
        extracted_watermark,
        signature_verified: true,
        hash_verified: true,
        steps,
    })
}

/// First 100 characters of a value, for step-trace display
fn preview(value: &str) -> String {
    if value.chars().count() <= 100 {
        value.to_string()
    } else {
        let cut: String = value.chars().take(100).collect();
        format!("{}...", cut)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SYNONYM_TABLE: [[&str; 4]; 4] = [
        ["good", "great", "excellent", "fine"],
        ["fast", "quick", "rapid", "swift"],
        ["big", "large", "huge", "giant"],
        ["make", "create", "build", "produce"],
    ];

    /// Swap the first synonym-carrying word in stego text for a different
    /// member of its group - flips two frame bits without leaving the
    /// codec's vocabulary
    fn tamper_first_carrier(stego_text: &str) -> String {
        let mut words: Vec<String> = stego_text.split_whitespace().map(String::from).collect();
        'outer: for word in words.iter_mut() {
            let clean: String = word
                .chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase();
            for group in SYNONYM_TABLE {
                if let Some(pos) = group.iter().position(|s| *s == clean) {
                    *word = group[(pos + 1) % 4].to_string();
                    break 'outer;
                }
            }
        }
        words.join(" ")
    }

    #[test]
    fn test_rsa_round_trip() {
        let outcome = encrypt("Secret", "Bob", None, KeyAlgorithm::Rsa, None).unwrap();
        let decrypted = decrypt(&outcome.envelope, &outcome.keys).unwrap();

        assert_eq!(decrypted.plaintext, "Secret");
        assert!(decrypted.signature_verified);
        assert!(decrypted.hash_verified);
        assert_eq!(decrypted.extracted_watermark.as_deref(), Some("Bob"));
    }

    #[test]
    fn test_ecc_round_trip() {
        let outcome = encrypt("Secret", "Bob", None, KeyAlgorithm::Ecc, None).unwrap();

        // The documented simplification: the key travels in the clear
        assert_eq!(outcome.envelope.encrypted_key, outcome.keys.symmetric.as_str());

        let decrypted = decrypt(&outcome.envelope, &outcome.keys).unwrap();
        assert_eq!(decrypted.plaintext, "Secret");
        assert!(decrypted.signature_verified);
        assert!(decrypted.hash_verified);
        assert_eq!(decrypted.extracted_watermark.as_deref(), Some("Bob"));
    }

    #[test]
    fn test_single_char_plaintext() {
        let outcome = encrypt("x", "s", None, KeyAlgorithm::Ecc, None).unwrap();
        let decrypted = decrypt(&outcome.envelope, &outcome.keys).unwrap();
        assert_eq!(decrypted.plaintext, "x");
    }

    #[test]
    fn test_multi_kb_plaintext() {
        let plaintext = "All work and no play makes Jack a dull boy. ".repeat(70); // ~3 KB
        let outcome = encrypt(&plaintext, "kb-sender", None, KeyAlgorithm::Ecc, None).unwrap();
        let decrypted = decrypt(&outcome.envelope, &outcome.keys).unwrap();
        assert_eq!(decrypted.plaintext, plaintext);
        assert_eq!(decrypted.extracted_watermark.as_deref(), Some("kb-sender"));
    }

    #[test]
    fn test_unicode_plaintext_round_trip() {
        let plaintext = "geheime Nachricht: héllo 🌍";
        let outcome = encrypt(plaintext, "Ümläut", None, KeyAlgorithm::Ecc, None).unwrap();
        let decrypted = decrypt(&outcome.envelope, &outcome.keys).unwrap();
        assert_eq!(decrypted.plaintext, plaintext);
        assert_eq!(decrypted.extracted_watermark.as_deref(), Some("Ümläut"));
    }

    #[test]
    fn test_supplied_bundle_is_reused() {
        let bundle = KeyBundle::generate(KeyAlgorithm::Ecc).unwrap();
        let symmetric = bundle.symmetric.as_str().to_string();

        let outcome =
            encrypt("reuse me", "sender", Some(bundle), KeyAlgorithm::Ecc, None).unwrap();
        assert_eq!(outcome.keys.symmetric.as_str(), symmetric);

        let decrypted = decrypt(&outcome.envelope, &outcome.keys).unwrap();
        assert_eq!(decrypted.plaintext, "reuse me");
    }

    #[test]
    fn test_custom_cover_text() {
        let cover = "Good tools make hard work easy and fast for big teams to use well.";
        let outcome = encrypt("hidden", "s", None, KeyAlgorithm::Ecc, Some(cover)).unwrap();
        let decrypted = decrypt(&outcome.envelope, &outcome.keys).unwrap();
        assert_eq!(decrypted.plaintext, "hidden");
    }

    #[test]
    fn test_layer_trace_is_ordered_and_complete() {
        let outcome = encrypt("traced", "s", None, KeyAlgorithm::Ecc, None).unwrap();

        let numbers: Vec<u8> = outcome.layers.iter().map(|l| l.layer).collect();
        assert_eq!(numbers, [1, 2, 3, 4, 5]);

        // Each layer's output feeds the next where the flow is direct
        assert_eq!(outcome.layers[2].input, outcome.layers[0].output);
        assert_eq!(outcome.layers[4].input, outcome.layers[2].output);

        // The envelope hash is the layer-4 input
        assert_eq!(outcome.layers[3].input, outcome.envelope.ciphertext_hash);

        // Layer 3 metadata records the sender
        assert_eq!(outcome.layers[2].metadata["watermark"], "s");
    }

    #[test]
    fn test_hash_covers_watermarked_ciphertext() {
        // The invariant that makes the reverse-order gate work: the stored
        // hash is over layer 3's output, not layer 1's
        let outcome = encrypt("invariant", "s", None, KeyAlgorithm::Ecc, None).unwrap();
        let watermarked = &outcome.layers[2].output;
        let expected = hex::encode(Sha256::digest(watermarked.as_bytes()));
        assert_eq!(outcome.envelope.ciphertext_hash, expected);
        assert_ne!(
            outcome.envelope.ciphertext_hash,
            hex::encode(Sha256::digest(outcome.layers[0].output.as_bytes()))
        );
    }

    #[test]
    fn test_tampered_stego_text_never_decrypts_silently() {
        let outcome = encrypt("tamper target", "s", None, KeyAlgorithm::Ecc, None).unwrap();

        let tampered_text = tamper_first_carrier(&outcome.envelope.stego_text);
        assert_ne!(tampered_text, outcome.envelope.stego_text);

        let mut tampered = outcome.envelope.clone();
        tampered.stego_text = tampered_text;

        // Stego extraction failure, signature failure, or hash mismatch -
        // anything but a silent wrong plaintext
        assert!(decrypt(&tampered, &outcome.keys).is_err());
    }

    #[test]
    fn test_tampered_hash_fails_signature_gate() {
        let outcome = encrypt("gate order", "s", None, KeyAlgorithm::Ecc, None).unwrap();

        let mut tampered = outcome.envelope.clone();
        let flipped = if tampered.ciphertext_hash.starts_with('0') { "1" } else { "0" };
        tampered.ciphertext_hash = format!("{}{}", flipped, &tampered.ciphertext_hash[1..]);
        assert_ne!(tampered.ciphertext_hash, outcome.envelope.ciphertext_hash);

        // The signature was made over the original hash, so the signature
        // gate trips first - regardless of the hash comparison
        assert!(matches!(
            decrypt(&tampered, &outcome.keys),
            Err(Error::SignatureInvalid)
        ));
    }

    #[test]
    fn test_tampered_signature_detected() {
        let outcome = encrypt("sig tamper", "s", None, KeyAlgorithm::Rsa, None).unwrap();

        let mut tampered = outcome.envelope.clone();
        tampered.signature = {
            let mut raw = BASE64.decode(&tampered.signature).unwrap();
            raw[0] ^= 0xFF;
            BASE64.encode(raw)
        };

        assert!(matches!(
            decrypt(&tampered, &outcome.keys),
            Err(Error::SignatureInvalid)
        ));
    }

    #[test]
    fn test_wrong_key_bundle_rejected() {
        let outcome = encrypt("wrong keys", "s", None, KeyAlgorithm::Ecc, None).unwrap();
        let other_bundle = KeyBundle::generate(KeyAlgorithm::Ecc).unwrap();

        assert!(matches!(
            decrypt(&outcome.envelope, &other_bundle),
            Err(Error::SignatureInvalid)
        ));
    }

    #[test]
    fn test_empty_plaintext_fails_at_layer_1() {
        match encrypt("", "s", None, KeyAlgorithm::Ecc, None) {
            Err(Error::LayerFailed { layer: 1, .. }) => {}
            other => panic!("expected layer 1 failure, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_sender_fails_at_layer_3() {
        match encrypt("text", "", None, KeyAlgorithm::Ecc, None) {
            Err(Error::LayerFailed { layer: 3, .. }) => {}
            other => panic!("expected layer 3 failure, got {:?}", other),
        }
    }

    #[test]
    fn test_garbage_stego_text_fails_extraction() {
        let outcome = encrypt("x", "s", None, KeyAlgorithm::Ecc, None).unwrap();
        let mut tampered = outcome.envelope.clone();
        tampered.stego_text = "no carrier words in this sentence at all".into();

        assert!(matches!(
            decrypt(&tampered, &outcome.keys),
            Err(Error::StegoExtractionFailed { .. })
        ));
    }

    #[test]
    fn test_decryption_step_trace_runs_5_to_1() {
        let outcome = encrypt("traced", "s", None, KeyAlgorithm::Ecc, None).unwrap();
        let decrypted = decrypt(&outcome.envelope, &outcome.keys).unwrap();

        let numbers: Vec<u8> = decrypted.steps.iter().map(|s| s.layer).collect();
        assert_eq!(numbers, [5, 4, 3, 2, 1]);
    }
}
