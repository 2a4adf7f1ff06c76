//! # Cryptographic Primitives
//!
//! This module is the sandbox's primitive provider: thin, well-typed wrappers
//! over audited RustCrypto implementations. Nothing here is novel by design -
//! the interesting engineering lives in the codecs and the layered pipeline,
//! which call into this module.
//!
//! ## Primitive Map
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       PRIMITIVE PROVIDER                                │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  symmetric    AES-128/192/256, ECB + CBC, PKCS#7      → pipeline L1    │
//! │  rsa          RSA-OAEP(SHA-256), RSA-PSS(SHA-256)     → pipeline L2/L4 │
//! │  ecdsa        ECDSA P-256 (SHA-256), ECDH             → pipeline L4    │
//! │  keys         per-session KeyBundle generation        → pipeline       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function is pure over its inputs: no shared state, no caches, safe
//! to call from any number of threads at once.

pub mod ecdsa;
pub mod keys;
pub mod rsa;
pub mod symmetric;

pub use keys::{KeyAlgorithm, KeyBundle, KeyParameters, KeypairMaterial, SymmetricKey};
pub use symmetric::{KeySize, Mode, SymmetricOutput};
