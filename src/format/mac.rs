//! Streaming whole-file HMAC-SHA256.
//!
//! Unlike [`crate::kdf`]'s one-shot use of Argon2, the trailing artifact MAC
//! is fed incrementally as bytes are written or read, since the whole point
//! is to authenticate the artifact without buffering it in memory. Verifies
//! with [`subtle::ConstantTimeEq`] to avoid leaking the comparison outcome
//! through timing.

use hmac::{Hmac, Mac as _};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::config::MAC_LEN;
use crate::error::{CryptError, Result};

/// A streaming HMAC-SHA256 accumulator keyed with the artifact's MAC key.
pub struct StreamingMac {
    mac: Hmac<Sha256>,
}

impl StreamingMac {
    /// Builds a new accumulator from a 32-byte key.
    pub fn new(key: &[u8; 32]) -> Self {
        let mac = Hmac::<Sha256>::new_from_slice(key).expect("HMAC-SHA256 accepts any key length");
        Self { mac }
    }

    /// Feeds `bytes` into the running digest. Must be called for every byte
    /// written to (or read from) the artifact, in order, excluding the
    /// trailing MAC field itself.
    pub fn update(&mut self, bytes: &[u8]) {
        self.mac.update(bytes);
    }

    /// Finalizes the digest, consuming the accumulator.
    #[must_use]
    pub fn finalize(self) -> [u8; MAC_LEN] {
        self.mac.finalize().into_bytes().into()
    }

    /// Finalizes the digest and compares it against `expected` in constant
    /// time. Returns [`CryptError::AuthFailure`] on mismatch.
    pub fn finalize_and_verify(self, expected: &[u8; MAC_LEN]) -> Result<()> {
        let computed = self.finalize();
        if bool::from(computed.ct_eq(expected)) {
            Ok(())
        } else {
            Err(CryptError::AuthFailure)
        }
    }
}
