//! Encryption boundary: an injectable AEAD capability over cookie values.
//!
//! Ciphertext layout: 24-byte random nonce, then the XChaCha20-Poly1305
//! output (ciphertext + tag). A fresh nonce is drawn from the OS RNG for
//! every encryption; the nonce travels with its ciphertext and is never
//! reused under a key.

use crate::constants::{KEY_LEN, NONCE_LEN};
use crate::core::error::StoreError;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

/// Authenticated encrypt/decrypt capability supplied to the store.
pub trait ValueCipher: Send + Sync {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, StoreError>;

    /// Fails with [`StoreError::Decryption`] on any authentication
    /// mismatch (wrong key, flipped bit); never yields garbage plaintext.
    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, StoreError>;
}

/// Default cipher: XChaCha20-Poly1305 under a 256-bit key.
pub struct XChaChaValueCipher {
    key: Zeroizing<[u8; KEY_LEN]>,
}

// Manual impl so the key bytes never reach debug output.
impl std::fmt::Debug for XChaChaValueCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XChaChaValueCipher").finish_non_exhaustive()
    }
}

impl XChaChaValueCipher {
    /// Rejects wrong-length keys before any store I/O happens.
    pub fn new(key: &[u8]) -> Result<Self, StoreError> {
        if key.len() != KEY_LEN {
            return Err(StoreError::InvalidArgument(format!(
                "key must be {} bytes, got {}",
                KEY_LEN,
                key.len()
            )));
        }
        let mut k = Zeroizing::new([0u8; KEY_LEN]);
        k.copy_from_slice(key);
        Ok(Self { key: k })
    }
}

impl ValueCipher for XChaChaValueCipher {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, StoreError> {
        let cipher = XChaCha20Poly1305::new((&*self.key).into());
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);
        let sealed = cipher
            .encrypt(XNonce::from_slice(&nonce), plaintext)
            .map_err(|e| StoreError::Encryption(e.to_string()))?;
        let mut out = Vec::with_capacity(NONCE_LEN + sealed.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&sealed);
        Ok(out)
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, StoreError> {
        if ciphertext.len() < NONCE_LEN {
            return Err(StoreError::Decryption(
                "ciphertext shorter than nonce".to_string(),
            ));
        }
        let (nonce, sealed) = ciphertext.split_at(NONCE_LEN);
        let cipher = XChaCha20Poly1305::new((&*self.key).into());
        cipher
            .decrypt(XNonce::from_slice(nonce), sealed)
            .map_err(|_| StoreError::Decryption("authentication failed".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key(fill: u8) -> [u8; KEY_LEN] {
        [fill; KEY_LEN]
    }

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let cipher = XChaChaValueCipher::new(&test_key(1)).unwrap();
        let sealed = cipher.encrypt(b"abc123").unwrap();
        assert_ne!(&sealed[NONCE_LEN..], b"abc123");
        let opened = cipher.decrypt(&sealed).unwrap();
        assert_eq!(opened, b"abc123");
    }

    #[test]
    fn test_fresh_nonce_per_encryption() {
        let cipher = XChaChaValueCipher::new(&test_key(1)).unwrap();
        let a = cipher.encrypt(b"same").unwrap();
        let b = cipher.encrypt(b"same").unwrap();
        assert_ne!(a[..NONCE_LEN], b[..NONCE_LEN]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_wrong_key_fails_authentication() {
        let sealed = XChaChaValueCipher::new(&test_key(1))
            .unwrap()
            .encrypt(b"secret")
            .unwrap();
        let other = XChaChaValueCipher::new(&test_key(2)).unwrap();
        let err = other.decrypt(&sealed).unwrap_err();
        assert!(matches!(err, StoreError::Decryption(_)));
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let cipher = XChaChaValueCipher::new(&test_key(1)).unwrap();
        let mut sealed = cipher.encrypt(b"secret").unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0x01;
        let err = cipher.decrypt(&sealed).unwrap_err();
        assert!(matches!(err, StoreError::Decryption(_)));
    }

    #[test]
    fn test_tampered_nonce_fails() {
        let cipher = XChaChaValueCipher::new(&test_key(1)).unwrap();
        let mut sealed = cipher.encrypt(b"secret").unwrap();
        sealed[0] ^= 0x01;
        assert!(cipher.decrypt(&sealed).is_err());
    }

    #[test]
    fn test_short_ciphertext_rejected() {
        let cipher = XChaChaValueCipher::new(&test_key(1)).unwrap();
        let err = cipher.decrypt(&[0u8; 5]).unwrap_err();
        assert!(matches!(err, StoreError::Decryption(_)));
    }

    #[test]
    fn test_wrong_key_length_rejected() {
        for len in [0, 16, 31, 33, 64] {
            let err = XChaChaValueCipher::new(&vec![0u8; len]).unwrap_err();
            assert!(matches!(err, StoreError::InvalidArgument(_)), "len {}", len);
        }
    }

    #[test]
    fn test_debug_output_redacts_key() {
        let cipher = XChaChaValueCipher::new(&test_key(0xab)).unwrap();
        let rendered = format!("{:?}", cipher);
        assert!(rendered.contains("XChaChaValueCipher"));
        assert!(!rendered.contains("171")); // 0xab
        assert!(!rendered.contains("key"));
    }

    #[test]
    fn test_empty_plaintext_round_trip() {
        let cipher = XChaChaValueCipher::new(&test_key(1)).unwrap();
        let sealed = cipher.encrypt(b"").unwrap();
        assert_eq!(cipher.decrypt(&sealed).unwrap(), b"");
    }
}
