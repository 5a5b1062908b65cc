//! XChaCha20-Poly1305 sealing and opening.
//!
//! Unlike a general-purpose AEAD wrapper, this module never bundles the
//! nonce with the ciphertext: the container format gives the header nonce
//! and every chunk nonce their own fixed-size fields (see the format design
//! notes), so callers pass the nonce in separately and get back a ciphertext
//! whose length is exactly `plaintext.len() + TAG_LEN`.

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};

use crate::config::{AEAD_KEY_LEN, NONCE_LEN};
use crate::error::{CryptError, Result};

/// A bound XChaCha20-Poly1305 instance for one artifact's AEAD key.
pub struct Aead20 {
    cipher: XChaCha20Poly1305,
}

impl Aead20 {
    /// Builds a cipher from a 32-byte key.
    pub fn new(key: &[u8; AEAD_KEY_LEN]) -> Self {
        let cipher = XChaCha20Poly1305::new_from_slice(key).expect("key is exactly AEAD_KEY_LEN bytes");
        Self { cipher }
    }

    /// Encrypts `plaintext` under `nonce`, with no additional authenticated
    /// data. Returns `ciphertext || tag`.
    pub fn seal(&self, nonce: &[u8; NONCE_LEN], plaintext: &[u8]) -> Result<Vec<u8>> {
        let nonce = XNonce::from_slice(nonce);
        self.cipher
            .encrypt(nonce, plaintext)
            .map_err(|_| CryptError::internal("AEAD seal failed"))
    }

    /// Decrypts `ciphertext` (which must include the trailing tag) under
    /// `nonce`. Returns [`CryptError::AuthFailure`] if the tag does not
    /// verify. This is the one place a wrong passphrase or a tampered byte
    /// surfaces during decryption.
    pub fn open(&self, nonce: &[u8; NONCE_LEN], ciphertext: &[u8]) -> Result<Vec<u8>> {
        let nonce = XNonce::from_slice(nonce);
        self.cipher.decrypt(nonce, ciphertext).map_err(|_| CryptError::AuthFailure)
    }
}

/// Fills a fresh, cryptographically random nonce.
pub fn random_nonce() -> [u8; NONCE_LEN] {
    let mut nonce = [0u8; NONCE_LEN];
    rand::Rng::fill(&mut rand::rng(), &mut nonce);
    nonce
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_then_open_roundtrips() {
        let key = [0x11u8; AEAD_KEY_LEN];
        let cipher = Aead20::new(&key);
        let nonce = random_nonce();
        let plaintext = b"the quick brown fox";

        let ciphertext = cipher.seal(&nonce, plaintext).unwrap();
        let recovered = cipher.open(&nonce, &ciphertext).unwrap();
        assert_eq!(recovered, plaintext);
    }

    #[test]
    fn open_fails_on_tampered_ciphertext() {
        let key = [0x22u8; AEAD_KEY_LEN];
        let cipher = Aead20::new(&key);
        let nonce = random_nonce();
        let mut ciphertext = cipher.seal(&nonce, b"hello").unwrap();
        *ciphertext.last_mut().unwrap() ^= 0xFF;

        let err = cipher.open(&nonce, &ciphertext).unwrap_err();
        assert!(err.is_auth_failure());
    }

    #[test]
    fn open_fails_with_wrong_key() {
        let nonce = random_nonce();
        let ciphertext = Aead20::new(&[0x33u8; AEAD_KEY_LEN]).seal(&nonce, b"secret").unwrap();

        let err = Aead20::new(&[0x44u8; AEAD_KEY_LEN]).open(&nonce, &ciphertext).unwrap_err();
        assert!(err.is_auth_failure());
    }

    #[test]
    fn seal_handles_empty_plaintext() {
        let cipher = Aead20::new(&[0x55u8; AEAD_KEY_LEN]);
        let nonce = random_nonce();
        let ciphertext = cipher.seal(&nonce, b"").unwrap();
        assert_eq!(cipher.open(&nonce, &ciphertext).unwrap(), b"");
    }

    #[test]
    fn random_nonce_is_not_all_zero() {
        let nonce = random_nonce();
        assert_ne!(nonce, [0u8; NONCE_LEN]);
    }
}
