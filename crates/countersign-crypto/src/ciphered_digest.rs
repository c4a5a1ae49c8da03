//! Ciphered-digest tag construction: AES-ECB + PKCS#7 over a SHA-256 digest.
//!
//! This is the deployed wire format. The payload is hashed with SHA-256 and
//! the 32-byte digest is encrypted with AES in ECB mode using PKCS#7
//! padding. Because the digest length is fixed, the padding is
//! deterministic: two full cipher blocks of digest plus one block of pure
//! padding, giving a 48-byte tag.
//!
//! # Security
//!
//! ECB with no IV means the construction is fully deterministic: identical
//! payloads under the same key always produce identical tags, and the
//! trailing padding block is identical across all tags under a given key.
//! This is a known weakness of the deployed format, reproduced here
//! bit-for-bit for interoperability. See [`crate::TagScheme::KeyedHash`]
//! for the hardened alternative.

use aes::{
    Aes128, Aes192, Aes256,
    cipher::{BlockDecryptMut, BlockEncryptMut, KeyInit, block_padding::Pkcs7},
};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::{error::IntegrityError, key::SharedKey};

/// AES block size in bytes.
const BLOCK_SIZE: usize = 16;

/// SHA-256 digest size in bytes.
const DIGEST_SIZE: usize = 32;

/// Tag size in bytes: a 32-byte digest padded up to the next whole block.
pub const CIPHERED_DIGEST_TAG_SIZE: usize = DIGEST_SIZE + BLOCK_SIZE;

/// Compute the tag for `payload` under `key`.
///
/// Deterministic: the same payload and key always produce the same tag.
pub(crate) fn sign(payload: &[u8], key: &SharedKey) -> Result<Vec<u8>, IntegrityError> {
    let digest = Sha256::digest(payload);
    encrypt_digest(key, &digest)
}

/// Check `tag` against the digest recomputed over `payload`.
///
/// Returns `Ok(true)` only if decrypting the tag yields exactly the SHA-256
/// digest of the payload. The comparison is constant-time.
///
/// # Errors
///
/// - `MalformedTag` if the tag length is not a whole number of cipher
///   blocks, or if the decrypted bytes carry invalid PKCS#7 padding. Both
///   conditions mean the tag is not valid ciphertext at all, as opposed to
///   valid ciphertext over the wrong digest (which is `Ok(false)`).
pub(crate) fn verify(payload: &[u8], tag: &[u8], key: &SharedKey) -> Result<bool, IntegrityError> {
    if tag.is_empty() || tag.len() % BLOCK_SIZE != 0 {
        return Err(IntegrityError::MalformedTag {
            reason: "length is not a whole number of cipher blocks",
            len: tag.len(),
        });
    }

    let decrypted = decrypt_tag(key, tag)?;
    if decrypted.len() != DIGEST_SIZE {
        return Ok(false);
    }

    let digest = Sha256::digest(payload);
    Ok(decrypted.as_slice().ct_eq(digest.as_slice()).into())
}

/// Encrypt a digest with AES-ECB + PKCS#7, dispatching on key length.
fn encrypt_digest(key: &SharedKey, digest: &[u8]) -> Result<Vec<u8>, IntegrityError> {
    let key_error = IntegrityError::InvalidKeyLength { actual: key.len() };
    let tag = match key.len() {
        16 => ecb::Encryptor::<Aes128>::new_from_slice(key.as_bytes())
            .map_err(|_| key_error)?
            .encrypt_padded_vec_mut::<Pkcs7>(digest),
        24 => ecb::Encryptor::<Aes192>::new_from_slice(key.as_bytes())
            .map_err(|_| key_error)?
            .encrypt_padded_vec_mut::<Pkcs7>(digest),
        32 => ecb::Encryptor::<Aes256>::new_from_slice(key.as_bytes())
            .map_err(|_| key_error)?
            .encrypt_padded_vec_mut::<Pkcs7>(digest),
        _ => return Err(key_error),
    };

    debug_assert_eq!(tag.len(), CIPHERED_DIGEST_TAG_SIZE);

    Ok(tag)
}

/// Decrypt a tag with AES-ECB and strip PKCS#7 padding.
fn decrypt_tag(key: &SharedKey, tag: &[u8]) -> Result<Vec<u8>, IntegrityError> {
    let key_error = IntegrityError::InvalidKeyLength { actual: key.len() };
    let decrypted = match key.len() {
        16 => ecb::Decryptor::<Aes128>::new_from_slice(key.as_bytes())
            .map_err(|_| key_error)?
            .decrypt_padded_vec_mut::<Pkcs7>(tag),
        24 => ecb::Decryptor::<Aes192>::new_from_slice(key.as_bytes())
            .map_err(|_| key_error)?
            .decrypt_padded_vec_mut::<Pkcs7>(tag),
        32 => ecb::Decryptor::<Aes256>::new_from_slice(key.as_bytes())
            .map_err(|_| key_error)?
            .decrypt_padded_vec_mut::<Pkcs7>(tag),
        _ => return Err(key_error),
    };

    decrypted
        .map_err(|_| IntegrityError::MalformedTag { reason: "invalid block padding", len: tag.len() })
}
