//! # Lamina Core
//!
//! The core library of an educational cryptography sandbox: independent
//! primitives (AES, RSA, ECC, digital signatures) plus a composite "layered"
//! pipeline that chains symmetric encryption, asymmetric key wrapping,
//! digital signing, text watermarking, and linguistic steganography into one
//! reversible workflow.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        LAMINA CORE MODULES                              │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │                    ┌──────────────────────────┐                        │
//! │                    │        pipeline          │                        │
//! │                    │                          │                        │
//! │                    │  5 layers forward,       │                        │
//! │                    │  mirrored reverse,       │                        │
//! │                    │  integrity gate between  │                        │
//! │                    └─────┬──────┬──────┬──────┘                        │
//! │                          │      │      │                               │
//! │         ┌────────────────┘      │      └───────────────┐               │
//! │         ▼                       ▼                      ▼               │
//! │  ┌─────────────┐        ┌─────────────┐        ┌─────────────┐        │
//! │  │   crypto    │        │  watermark  │        │    stego    │        │
//! │  │             │        │             │        │             │        │
//! │  │ - AES       │        │ zero-width  │        │ synonym     │        │
//! │  │   ECB/CBC   │        │ characters, │        │ substitution│        │
//! │  │ - RSA       │        │ WM:..:WM    │        │ 2 bits/word,│        │
//! │  │   OAEP/PSS  │        │ frame       │        │ 32-bit      │        │
//! │  │ - ECDSA     │        │             │        │ length      │        │
//! │  │   P-256     │        │             │        │ header      │        │
//! │  │ - KeyBundle │        │             │        │             │        │
//! │  └─────────────┘        └─────────────┘        └─────────────┘        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Hierarchy
//!
//! - [`error`] - Error types for the entire library
//! - [`crypto`] - Primitive provider (AES, RSA, ECDSA, key bundles)
//! - [`watermark`] - Zero-width-character watermark codec
//! - [`stego`] - Linguistic steganography codec
//! - [`pipeline`] - The 5-layer composite workflow
//!
//! ## Security Model (And Its Deliberate Limits)
//!
//! This is a teaching sandbox, not a production cryptosystem. Two properties
//! are intentional and documented rather than fixed:
//!
//! 1. The ECC branch of the pipeline passes the symmetric key through
//!    **unencrypted** - real hybrid encryption would use ECIES.
//! 2. The watermark codec scans the whole text for invisible characters, so
//!    stray zero-width code points corrupt extraction.
//!
//! What the pipeline *does* guarantee: decryption never returns a plaintext
//! unless the envelope's signature verifies **and** the recomputed
//! ciphertext hash matches. Tampering with the stego text, the hash, or the
//! signature aborts with a typed error.
//!
//! ## Concurrency
//!
//! Every operation is a synchronous pure function over its inputs: no shared
//! mutable state, no caches, no background tasks. All APIs are reentrant and
//! thread-safe by construction; cryptographic failures are terminal and
//! never retried.
//!
//! ## Example
//!
//! ```ignore
//! use lamina_core::{encrypt, decrypt, KeyAlgorithm};
//!
//! let outcome = encrypt("Secret", "Bob", None, KeyAlgorithm::Rsa, None)?;
//! let recovered = decrypt(&outcome.envelope, &outcome.keys)?;
//! assert_eq!(recovered.plaintext, "Secret");
//! assert!(recovered.signature_verified && recovered.hash_verified);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod crypto;
pub mod error;
pub mod pipeline;
pub mod stego;
pub mod watermark;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use crypto::{KeyAlgorithm, KeyBundle, KeyParameters, KeypairMaterial, SymmetricKey};
pub use error::{Error, Result};
pub use pipeline::{
    decrypt, encrypt, generate_keys, DecryptionOutcome, EncryptionEnvelope, EncryptionOutcome,
    LayerOutput, StepRecord,
};
