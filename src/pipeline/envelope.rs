//! Envelope, trace, and outcome types the pipeline hands back to the caller.
//!
//! These are display/transport values: everything is serde-serializable so
//! the caller boundary (HTTP, CLI, UI - outside this crate) can render them
//! directly. None of them are consumed by the pipeline's own logic except
//! [`EncryptionEnvelope`], which is decryption's required input.

use serde::{Deserialize, Serialize};

use crate::crypto::KeyBundle;

/// The terminal artifact of encryption and the sole required input (besides
/// the key bundle) to decryption
///
/// Invariant: `ciphertext_hash` is the SHA-256 of the **watermarked**
/// ciphertext (post layer-3, pre layer-5), not of the raw AES ciphertext.
/// Decryption recomputes the hash before stripping the watermark, so this
/// ordering is load-bearing for the integrity check.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EncryptionEnvelope {
    /// Layer 5 output: the natural-language text carrying everything
    pub stego_text: String,
    /// Layer 2 output: the wrapped symmetric key (RSA), or the key itself
    /// (ECC simplification)
    pub encrypted_key: String,
    /// Layer 4 output: base64 signature over `ciphertext_hash`
    pub signature: String,
    /// Hex SHA-256 of the watermarked ciphertext
    pub ciphertext_hash: String,
    /// Base64 IV from layer 1
    pub iv: String,
}

/// One layer's observational record, produced during encryption
///
/// Append-only, ordered; for caller display only - decryption never reads it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LayerOutput {
    /// Layer number, 1-5
    pub layer: u8,
    /// Human-readable layer name
    pub name: String,
    /// Algorithm applied at this layer
    pub algorithm: String,
    /// The layer's input value
    pub input: String,
    /// The layer's output value
    pub output: String,
    /// Layer-specific extras (IV, watermark, bit counts, ...)
    pub metadata: serde_json::Value,
}

/// One reverse-pipeline step record, produced during decryption
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StepRecord {
    /// The forward layer this step reverses
    pub layer: u8,
    /// Human-readable step name
    pub name: String,
    /// Step-specific detail for display
    pub detail: serde_json::Value,
}

/// Everything encryption returns
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EncryptionOutcome {
    /// The envelope decryption will need
    pub envelope: EncryptionEnvelope,
    /// The key bundle used (generated when the caller supplied none)
    pub keys: KeyBundle,
    /// Ordered per-layer trace for display
    pub layers: Vec<LayerOutput>,
}

/// Everything decryption returns
///
/// By construction both verification flags are `true` on success - the
/// pipeline aborts otherwise. They are carried explicitly so the caller can
/// render the integrity story without re-deriving it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DecryptionOutcome {
    /// The recovered plaintext
    pub plaintext: String,
    /// Watermark recovered during reverse layer 4, when extraction succeeded
    pub extracted_watermark: Option<String>,
    /// Signature gate result (always `true` on success)
    pub signature_verified: bool,
    /// Hash gate result (always `true` on success)
    pub hash_verified: bool,
    /// Ordered step trace for display
    pub steps: Vec<StepRecord>,
}
