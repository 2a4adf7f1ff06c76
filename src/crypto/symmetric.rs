//! # Symmetric Encryption Module
//!
//! Provides AES block-cipher encryption in the classic ECB and CBC modes.
//!
//! This is the teaching half of the sandbox: unlike an AEAD construction,
//! ECB/CBC make the roles of padding, IVs, and block boundaries visible to
//! the caller. Integrity is *not* provided here - in the layered pipeline it
//! comes from the signature/hash checkpoint, not from the cipher.
//!
//! ## Key Preparation
//!
//! The caller-supplied key is an arbitrary string (the pipeline passes a
//! 64-hex-char secret). It is normalized to cipher key material as:
//!
//! ```text
//! key_bytes = SHA-256(key_utf8)[0 .. key_size/8]
//! ```
//!
//! so any string becomes a valid 128/192/256-bit key deterministically.
//!
//! ## Wire Forms
//!
//! | Value | Encoding |
//! |-------|----------|
//! | ciphertext | base64 |
//! | IV | base64 (16 bytes), or a 16-byte literal string on input |
//! | plaintext | UTF-8 |

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit};
use aes::{Aes128, Aes192, Aes256};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// AES block size in bytes
pub const BLOCK_SIZE: usize = 16;

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes192CbcEnc = cbc::Encryptor<Aes192>;
type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;
type Aes192CbcDec = cbc::Decryptor<Aes192>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;
type Aes128EcbEnc = ecb::Encryptor<Aes128>;
type Aes192EcbEnc = ecb::Encryptor<Aes192>;
type Aes256EcbEnc = ecb::Encryptor<Aes256>;
type Aes128EcbDec = ecb::Decryptor<Aes128>;
type Aes192EcbDec = ecb::Decryptor<Aes192>;
type Aes256EcbDec = ecb::Decryptor<Aes256>;

/// AES block mode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Electronic codebook - no IV, identical blocks leak (kept for teaching)
    Ecb,
    /// Cipher block chaining - requires a 16-byte IV
    Cbc,
}

/// AES key size in bits
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeySize {
    /// 128-bit key
    Bits128,
    /// 192-bit key
    Bits192,
    /// 256-bit key
    Bits256,
}

impl KeySize {
    /// Key length in bytes
    pub fn bytes(self) -> usize {
        match self {
            KeySize::Bits128 => 16,
            KeySize::Bits192 => 24,
            KeySize::Bits256 => 32,
        }
    }
}

/// Result of a symmetric encryption call
///
/// `iv` is `Some` for CBC (freshly generated when the caller did not supply
/// one) and `None` for ECB.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SymmetricOutput {
    /// Base64-encoded ciphertext
    pub ciphertext: String,
    /// Base64-encoded IV, when the mode uses one
    pub iv: Option<String>,
}

/// Normalize an arbitrary key string to cipher key material
fn prepare_key(key: &str, key_size: KeySize) -> Vec<u8> {
    let digest = Sha256::digest(key.as_bytes());
    digest[..key_size.bytes()].to_vec()
}

/// Generate a random 16-byte IV for CBC mode
fn random_iv() -> [u8; BLOCK_SIZE] {
    let mut iv = [0u8; BLOCK_SIZE];
    OsRng.fill_bytes(&mut iv);
    iv
}

/// Parse a caller-supplied IV
///
/// Accepts either a literal 16-byte string or base64 decoding to exactly
/// 16 bytes. Anything else is rejected - an IV silently padded or truncated
/// would decrypt to garbage without explanation.
fn parse_iv(iv: &str) -> Result<[u8; BLOCK_SIZE]> {
    let raw = iv.as_bytes();
    if raw.len() == BLOCK_SIZE {
        let mut out = [0u8; BLOCK_SIZE];
        out.copy_from_slice(raw);
        return Ok(out);
    }

    let decoded = BASE64
        .decode(iv)
        .map_err(|_| Error::InvalidArgument("IV must be 16 bytes, or base64 of 16 bytes".into()))?;
    decoded
        .as_slice()
        .try_into()
        .map_err(|_| Error::InvalidArgument("Incorrect IV length (it must be 16 bytes long)".into()))
}

/// Encrypt plaintext with AES
///
/// ## Parameters
///
/// - `plaintext`: UTF-8 text to encrypt
/// - `key`: arbitrary key string, normalized via SHA-256 (see module docs)
/// - `mode`: [`Mode::Ecb`] or [`Mode::Cbc`]
/// - `key_size`: 128/192/256-bit
/// - `iv`: optional IV for CBC (16-byte literal or base64); a random IV is
///   generated when omitted. Ignored for ECB.
///
/// ## Errors
///
/// `InvalidArgument` for empty inputs or an unparseable IV.
pub fn encrypt(
    plaintext: &str,
    key: &str,
    mode: Mode,
    key_size: KeySize,
    iv: Option<&str>,
) -> Result<SymmetricOutput> {
    if plaintext.is_empty() || key.is_empty() {
        return Err(Error::InvalidArgument("Plaintext and key are required".into()));
    }

    let prepared = prepare_key(key, key_size);
    let data = plaintext.as_bytes();

    match mode {
        Mode::Ecb => {
            let ciphertext = match key_size {
                KeySize::Bits128 => ecb_encrypt::<Aes128EcbEnc>(&prepared, data)?,
                KeySize::Bits192 => ecb_encrypt::<Aes192EcbEnc>(&prepared, data)?,
                KeySize::Bits256 => ecb_encrypt::<Aes256EcbEnc>(&prepared, data)?,
            };
            Ok(SymmetricOutput {
                ciphertext: BASE64.encode(ciphertext),
                iv: None,
            })
        }
        Mode::Cbc => {
            let iv_bytes = match iv {
                Some(s) => parse_iv(s)?,
                None => random_iv(),
            };
            let ciphertext = match key_size {
                KeySize::Bits128 => cbc_encrypt::<Aes128CbcEnc>(&prepared, &iv_bytes, data)?,
                KeySize::Bits192 => cbc_encrypt::<Aes192CbcEnc>(&prepared, &iv_bytes, data)?,
                KeySize::Bits256 => cbc_encrypt::<Aes256CbcEnc>(&prepared, &iv_bytes, data)?,
            };
            Ok(SymmetricOutput {
                ciphertext: BASE64.encode(ciphertext),
                iv: Some(BASE64.encode(iv_bytes)),
            })
        }
    }
}

/// Decrypt AES ciphertext
///
/// ## Parameters
///
/// - `ciphertext`: base64-encoded ciphertext
/// - `key`: the key string used at encryption time
/// - `mode` / `key_size`: must match encryption
/// - `iv`: required for CBC, ignored for ECB
///
/// ## Errors
///
/// `DecryptionFailed` when the ciphertext does not decode, the padding is
/// invalid (wrong key/IV), or the plaintext is not UTF-8.
pub fn decrypt(
    ciphertext: &str,
    key: &str,
    mode: Mode,
    key_size: KeySize,
    iv: Option<&str>,
) -> Result<String> {
    if ciphertext.is_empty() || key.is_empty() {
        return Err(Error::InvalidArgument("Ciphertext and key are required".into()));
    }

    let prepared = prepare_key(key, key_size);
    let data = BASE64
        .decode(ciphertext)
        .map_err(|e| Error::DecryptionFailed(format!("Invalid base64 ciphertext: {}", e)))?;

    let plaintext_bytes = match mode {
        Mode::Ecb => match key_size {
            KeySize::Bits128 => ecb_decrypt::<Aes128EcbDec>(&prepared, &data)?,
            KeySize::Bits192 => ecb_decrypt::<Aes192EcbDec>(&prepared, &data)?,
            KeySize::Bits256 => ecb_decrypt::<Aes256EcbDec>(&prepared, &data)?,
        },
        Mode::Cbc => {
            let iv = iv
                .filter(|s| !s.trim().is_empty())
                .ok_or_else(|| Error::InvalidArgument("IV is required for CBC mode".into()))?;
            let iv_bytes = parse_iv(iv)?;
            match key_size {
                KeySize::Bits128 => cbc_decrypt::<Aes128CbcDec>(&prepared, &iv_bytes, &data)?,
                KeySize::Bits192 => cbc_decrypt::<Aes192CbcDec>(&prepared, &iv_bytes, &data)?,
                KeySize::Bits256 => cbc_decrypt::<Aes256CbcDec>(&prepared, &iv_bytes, &data)?,
            }
        }
    };

    String::from_utf8(plaintext_bytes)
        .map_err(|_| Error::DecryptionFailed("Decrypted data is not valid UTF-8".into()))
}

fn cbc_encrypt<C: KeyIvInit + BlockEncryptMut>(key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let cipher = C::new_from_slices(key, iv)
        .map_err(|e| Error::EncryptionFailed(format!("Invalid key/IV length: {}", e)))?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(data))
}

fn cbc_decrypt<C: KeyIvInit + BlockDecryptMut>(key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let cipher = C::new_from_slices(key, iv)
        .map_err(|e| Error::DecryptionFailed(format!("Invalid key/IV length: {}", e)))?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(data)
        .map_err(|_| Error::DecryptionFailed("Invalid padding (wrong key, IV, or ciphertext)".into()))
}

fn ecb_encrypt<C: KeyInit + BlockEncryptMut>(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let cipher = C::new_from_slice(key)
        .map_err(|e| Error::EncryptionFailed(format!("Invalid key length: {}", e)))?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(data))
}

fn ecb_decrypt<C: KeyInit + BlockDecryptMut>(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let cipher = C::new_from_slice(key)
        .map_err(|e| Error::DecryptionFailed(format!("Invalid key length: {}", e)))?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(data)
        .map_err(|_| Error::DecryptionFailed("Invalid padding (wrong key or ciphertext)".into()))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cbc_round_trip() {
        let out = encrypt("Hello, World!", "my secret key", Mode::Cbc, KeySize::Bits256, None).unwrap();
        assert!(out.iv.is_some());

        let plain = decrypt(
            &out.ciphertext,
            "my secret key",
            Mode::Cbc,
            KeySize::Bits256,
            out.iv.as_deref(),
        )
        .unwrap();
        assert_eq!(plain, "Hello, World!");
    }

    #[test]
    fn test_ecb_round_trip() {
        let out = encrypt("block mode basics", "k", Mode::Ecb, KeySize::Bits128, None).unwrap();
        assert!(out.iv.is_none());

        let plain = decrypt(&out.ciphertext, "k", Mode::Ecb, KeySize::Bits128, None).unwrap();
        assert_eq!(plain, "block mode basics");
    }

    #[test]
    fn test_all_key_sizes_round_trip() {
        for size in [KeySize::Bits128, KeySize::Bits192, KeySize::Bits256] {
            let out = encrypt("size sweep", "key", Mode::Cbc, size, None).unwrap();
            let plain =
                decrypt(&out.ciphertext, "key", Mode::Cbc, size, out.iv.as_deref()).unwrap();
            assert_eq!(plain, "size sweep");
        }
    }

    #[test]
    fn test_unicode_plaintext_round_trip() {
        let text = "héllo wörld 🌍";
        let out = encrypt(text, "clé", Mode::Cbc, KeySize::Bits256, None).unwrap();
        let plain = decrypt(&out.ciphertext, "clé", Mode::Cbc, KeySize::Bits256, out.iv.as_deref())
            .unwrap();
        assert_eq!(plain, text);
    }

    #[test]
    fn test_caller_supplied_literal_iv() {
        let iv = "0123456789abcdef"; // 16-byte literal
        let out = encrypt("pinned iv", "key", Mode::Cbc, KeySize::Bits256, Some(iv)).unwrap();
        // The returned IV is the base64 of the literal bytes
        assert_eq!(out.iv.as_deref(), Some(BASE64.encode(iv.as_bytes()).as_str()));

        let plain =
            decrypt(&out.ciphertext, "key", Mode::Cbc, KeySize::Bits256, Some(iv)).unwrap();
        assert_eq!(plain, "pinned iv");
    }

    #[test]
    fn test_wrong_key_fails_or_differs() {
        let out = encrypt("Hello, World!", "right key", Mode::Cbc, KeySize::Bits256, None).unwrap();
        match decrypt(&out.ciphertext, "wrong key", Mode::Cbc, KeySize::Bits256, out.iv.as_deref())
        {
            Ok(plain) => assert_ne!(plain, "Hello, World!"),
            Err(_) => {} // padding or UTF-8 failure is the usual outcome
        }
    }

    #[test]
    fn test_cbc_decrypt_requires_iv() {
        let out = encrypt("needs iv", "key", Mode::Cbc, KeySize::Bits256, None).unwrap();
        let result = decrypt(&out.ciphertext, "key", Mode::Cbc, KeySize::Bits256, None);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_bad_iv_rejected() {
        let result = encrypt("x", "key", Mode::Cbc, KeySize::Bits256, Some("way too short"));
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_empty_inputs_rejected() {
        assert!(matches!(
            encrypt("", "key", Mode::Cbc, KeySize::Bits256, None),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            decrypt("abcd", "", Mode::Cbc, KeySize::Bits256, None),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_tampered_ciphertext_fails_or_differs() {
        let out = encrypt("Hello, World! Across two blocks.", "key", Mode::Cbc, KeySize::Bits256, None)
            .unwrap();
        let mut raw = BASE64.decode(&out.ciphertext).unwrap();
        raw[0] ^= 0xFF;
        let tampered = BASE64.encode(raw);

        match decrypt(&tampered, "key", Mode::Cbc, KeySize::Bits256, out.iv.as_deref()) {
            Ok(plain) => assert_ne!(plain, "Hello, World! Across two blocks."),
            Err(_) => {}
        }
    }
}
