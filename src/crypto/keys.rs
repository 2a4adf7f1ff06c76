//! # Key Management
//!
//! This module generates and carries the key material for one layered
//! encryption session.
//!
//! ## Bundle Shape
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          KEY BUNDLE                                     │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  symmetric          256-bit secret, hex-encoded (64 chars)             │
//! │                     → layer 1 (AES-256-CBC)                            │
//! │                                                                         │
//! │  key_encryption     RSA-2048 keypair   (RSA mode)                      │
//! │                     P-256 keypair      (ECC mode, held but unused -    │
//! │                     the ECC branch passes the key through)             │
//! │                     → layer 2 (key wrapping)                           │
//! │                                                                         │
//! │  signature          RSA-2048 keypair   (RSA-SHA256 / PSS)              │
//! │                     P-256 keypair      (ECDSA)                         │
//! │                     → layer 4 (signing the ciphertext hash)            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The bundle is produced by the pipeline (or supplied by the caller),
//! immutable once used, and never persisted by this crate - the caller owns
//! its lifetime. The symmetric secret is zeroized on drop, and `Debug` output
//! redacts every private half.

use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::{ecdsa, rsa};
use crate::error::Result;

/// Which asymmetric family a key bundle is built for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyAlgorithm {
    /// RSA-2048: OAEP key wrapping + PSS signatures
    #[serde(rename = "RSA")]
    Rsa,
    /// P-256: ECDSA signatures, pass-through key handling
    #[serde(rename = "ECC")]
    Ecc,
}

/// The session's symmetric secret, hex-encoded
///
/// Zeroized when dropped; `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct SymmetricKey(String);

impl SymmetricKey {
    /// Generate a fresh 256-bit secret (64 hex chars)
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Wrap an existing hex-encoded secret
    pub fn from_hex(hex_key: String) -> Self {
        Self(hex_key)
    }

    /// The hex-encoded secret
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SymmetricKey(<redacted>)")
    }
}

/// Algorithm parameters attached to a keypair
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyParameters {
    /// Modulus size in bits (RSA)
    KeySize(usize),
    /// Curve name (ECC)
    Curve(String),
}

/// One asymmetric keypair plus its algorithm label and parameters
#[derive(Clone, Serialize, Deserialize)]
pub struct KeypairMaterial {
    /// Algorithm label: `RSA`, `ECC`, `RSA-SHA256`, or `ECDSA`
    pub algorithm: String,
    /// SPKI PEM public key
    pub public_key: String,
    /// PKCS#8 PEM private key
    pub private_key: String,
    /// Key size or curve name
    pub parameters: KeyParameters,
}

impl std::fmt::Debug for KeypairMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeypairMaterial")
            .field("algorithm", &self.algorithm)
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .field("parameters", &self.parameters)
            .finish()
    }
}

/// All key material for one layered encryption session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeyBundle {
    /// Asymmetric family the bundle was generated for
    pub algorithm: KeyAlgorithm,
    /// Layer 1 secret
    pub symmetric: SymmetricKey,
    /// Layer 2 keypair
    pub key_encryption: KeypairMaterial,
    /// Layer 4 keypair
    pub signature: KeypairMaterial,
}

impl KeyBundle {
    /// Generate a complete bundle for the given asymmetric family
    ///
    /// RSA mode generates two independent RSA-2048 keypairs (wrapping and
    /// signing); ECC mode generates two independent P-256 keypairs.
    pub fn generate(algorithm: KeyAlgorithm) -> Result<Self> {
        let symmetric = SymmetricKey::generate();

        let (key_encryption, signature) = match algorithm {
            KeyAlgorithm::Rsa => {
                let wrap = rsa::generate_keypair(rsa::DEFAULT_KEY_SIZE)?;
                let sig = rsa::generate_keypair(rsa::DEFAULT_KEY_SIZE)?;
                (
                    KeypairMaterial {
                        algorithm: "RSA".to_string(),
                        public_key: wrap.public_key,
                        private_key: wrap.private_key,
                        parameters: KeyParameters::KeySize(wrap.key_size),
                    },
                    KeypairMaterial {
                        algorithm: "RSA-SHA256".to_string(),
                        public_key: sig.public_key,
                        private_key: sig.private_key,
                        parameters: KeyParameters::KeySize(sig.key_size),
                    },
                )
            }
            KeyAlgorithm::Ecc => {
                let wrap = ecdsa::generate_keypair()?;
                let sig = ecdsa::generate_keypair()?;
                (
                    KeypairMaterial {
                        algorithm: "ECC".to_string(),
                        public_key: wrap.public_key,
                        private_key: wrap.private_key,
                        parameters: KeyParameters::Curve(wrap.curve),
                    },
                    KeypairMaterial {
                        algorithm: "ECDSA".to_string(),
                        public_key: sig.public_key,
                        private_key: sig.private_key,
                        parameters: KeyParameters::Curve(sig.curve),
                    },
                )
            }
        };

        Ok(Self {
            algorithm,
            symmetric,
            key_encryption,
            signature,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
