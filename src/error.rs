//! # Error Handling
//!
//! This module provides the error types for Lamina Core.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           ERROR HIERARCHY                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Error (top-level)                                                     │
//! │  │                                                                      │
//! │  ├── Input Errors                                                      │
//! │  │   └── InvalidArgument       - Missing/empty/malformed input         │
//! │  │                                                                      │
//! │  ├── Primitive Crypto Errors                                           │
//! │  │   ├── EncryptionFailed      - Cipher operation failed               │
//! │  │   ├── DecryptionFailed      - Cipher/padding/decode failure         │
//! │  │   ├── SigningFailed         - Signature creation failed             │
//! │  │   ├── InvalidKey            - Key format/length/PEM invalid         │
//! │  │   └── KeyGenerationFailed   - Keypair generation failed             │
//! │  │                                                                      │
//! │  ├── Watermark Errors                                                  │
//! │  │   ├── WatermarkNotFound     - No invisible markers in text          │
//! │  │   └── WatermarkCorrupted    - Markers present, frame unreadable     │
//! │  │                                                                      │
//! │  ├── Steganography Errors                                              │
//! │  │   ├── InsufficientCapacity  - Cover text cannot hold the payload    │
//! │  │   ├── InsufficientData      - Too few bits to read the header       │
//! │  │   └── CorruptFrame          - Frame header/body fails to decode     │
//! │  │                                                                      │
//! │  └── Pipeline Errors                                                   │
//! │      ├── LayerFailed           - A numbered layer aborted (with cause) │
//! │      ├── StegoExtractionFailed - Reverse layer 5 aborted (with cause)  │
//! │      ├── SignatureInvalid      - Authenticity gate failed              │
//! │      ├── IntegrityViolation    - Recomputed hash mismatch              │
//! │      └── KeyRecoveryFailed     - Symmetric key unwrap failed           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every fallible operation in the crate returns [`Result`]. The pipeline never
//! catches-and-continues: a failing layer aborts the whole operation and the
//! error identifies which layer failed and why (the cause travels as
//! [`std::error::Error::source`]). Cryptographic failures are terminal,
//! reportable conditions and are never retried.

use thiserror::Error;

/// Result type alias for Lamina Core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Lamina Core
///
/// All errors are categorized by module/domain to make error handling
/// clearer and to provide meaningful error messages to users.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Input Errors (100-199)
    // ========================================================================

    /// A required input was missing, empty, or malformed
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ========================================================================
    // Primitive Crypto Errors (200-299)
    // ========================================================================

    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption failed
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// Signing failed
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// Invalid key format or length
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Keypair generation failed
    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),

    // ========================================================================
    // Watermark Errors (300-399)
    // ========================================================================

    /// No invisible watermark characters were found in the text
    #[error("No watermark found in text")]
    WatermarkNotFound,

    /// Invisible characters were found but the decoded frame is not
    /// `WM:<identifier>:WM`; `raw` carries the decoded string for diagnostics
    #[error("Watermark format invalid or corrupted (raw: {raw:?})")]
    WatermarkCorrupted {
        /// The raw decoded string that failed to match the frame format
        raw: String,
    },

    // ========================================================================
    // Steganography Errors (400-499)
    // ========================================================================

    /// The cover text cannot hold the payload, even after repetition
    #[error("Cover text has insufficient capacity: need {required} substitutable words, found {available}")]
    InsufficientCapacity {
        /// Substitutable words required to carry the frame
        required: usize,
        /// Substitutable words actually available
        available: usize,
    },

    /// Fewer than 32 bits were recovered - not even a frame header
    #[error("Insufficient data extracted: only {bits} bits (need at least 32 for the header)")]
    InsufficientData {
        /// Number of bits actually recovered
        bits: usize,
    },

    /// The frame header or body failed to decode
    #[error("Corrupt stego frame: {0}")]
    CorruptFrame(String),

    // ========================================================================
    // Pipeline Errors (500-599)
    // ========================================================================

    /// A forward or reverse pipeline layer aborted; the underlying error
    /// travels as the source
    #[error("Layer {layer} ({name}) failed: {source}")]
    LayerFailed {
        /// Layer number, 1-5
        layer: u8,
        /// Short layer name for diagnostics
        name: &'static str,
        /// The underlying failure
        #[source]
        source: Box<Error>,
    },

    /// Reverse layer 5 could not recover the hidden ciphertext
    #[error("Steganography extraction failed: {source}")]
    StegoExtractionFailed {
        /// The underlying codec or decode failure
        #[source]
        source: Box<Error>,
    },

    /// Digital signature verification failed - the authenticity gate
    #[error("Digital signature verification failed")]
    SignatureInvalid,

    /// The recomputed ciphertext hash does not match the envelope's hash
    #[error("Ciphertext hash mismatch: expected {expected}, recomputed {actual}")]
    IntegrityViolation {
        /// Hash stored in the envelope at encryption time
        expected: String,
        /// Hash recomputed from the extracted ciphertext
        actual: String,
    },

    /// The symmetric key could not be recovered from the envelope
    #[error("Symmetric key recovery failed: {source}")]
    KeyRecoveryFailed {
        /// The underlying unwrap failure
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Get the stable numeric code for this error
    ///
    /// Error codes are organized by category:
    /// - 100-199: Input
    /// - 200-299: Primitive crypto
    /// - 300-399: Watermark codec
    /// - 400-499: Steganography codec
    /// - 500-599: Pipeline
    pub fn code(&self) -> i32 {
        match self {
            // Input (100-199)
            Error::InvalidArgument(_) => 100,

            // Primitive crypto (200-299)
            Error::EncryptionFailed(_) => 200,
            Error::DecryptionFailed(_) => 201,
            Error::SigningFailed(_) => 202,
            Error::InvalidKey(_) => 203,
            Error::KeyGenerationFailed(_) => 204,

            // Watermark (300-399)
            Error::WatermarkNotFound => 300,
            Error::WatermarkCorrupted { .. } => 301,

            // Steganography (400-499)
            Error::InsufficientCapacity { .. } => 400,
            Error::InsufficientData { .. } => 401,
            Error::CorruptFrame(_) => 402,

            // Pipeline (500-599)
            Error::LayerFailed { .. } => 500,
            Error::StegoExtractionFailed { .. } => 501,
            Error::SignatureInvalid => 502,
            Error::IntegrityViolation { .. } => 503,
            Error::KeyRecoveryFailed { .. } => 504,
        }
    }

    /// Wrap this error as a numbered pipeline-layer failure
    pub(crate) fn at_layer(self, layer: u8, name: &'static str) -> Error {
        Error::LayerFailed {
            layer,
            name,
            source: Box::new(self),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::InvalidArgument("x".into()).code(), 100);
        assert_eq!(Error::EncryptionFailed("x".into()).code(), 200);
        assert_eq!(Error::WatermarkNotFound.code(), 300);
        assert_eq!(
            Error::InsufficientCapacity {
                required: 10,
                available: 2
            }
            .code(),
            400
        );
        assert_eq!(Error::SignatureInvalid.code(), 502);
    }

    #[test]
    fn test_layer_wrap_preserves_source() {
        let inner = Error::EncryptionFailed("bad block".into());
        let wrapped = inner.at_layer(1, "aes-encrypt");

        assert_eq!(wrapped.code(), 500);
        let msg = wrapped.to_string();
        assert!(msg.contains("Layer 1"));
        assert!(msg.contains("bad block"));

        // The cause must be reachable through the standard error chain
        let source = std::error::Error::source(&wrapped).expect("source");
        assert!(source.to_string().contains("bad block"));
    }

    #[test]
    fn test_integrity_violation_message_names_both_hashes() {
        let err = Error::IntegrityViolation {
            expected: "aaaa".into(),
            actual: "bbbb".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("aaaa"));
        assert!(msg.contains("bbbb"));
    }
}
