//! Best-effort secret wiping for passphrases and derived keys.
//!
//! Passphrases use [`secrecy`]'s `SecretBox`; derived keys use a lighter
//! [`Protected`] wrapper since they are fixed-size byte arrays rather than
//! heap-allocated strings. Both zeroize their contents when dropped. This is
//! advisory on platforms with managed memory or swap (see the design notes
//! on best-effort key wipe), but it costs nothing and closes the easy case.

use std::fmt;
use std::ops::Deref;

use secrecy::zeroize::Zeroize;
use secrecy::{ExposeSecret, SecretBox};

/// A heap-allocated secret that is zeroized when dropped.
pub struct Secret<T: Zeroize> {
    inner: SecretBox<T>,
}

impl<T: Zeroize> Secret<T> {
    pub fn new(data: T) -> Self {
        Self { inner: SecretBox::new(Box::new(data)) }
    }

    pub fn expose_secret(&self) -> &T {
        self.inner.expose_secret()
    }
}

impl<T: Zeroize> From<SecretBox<T>> for Secret<T> {
    fn from(secret: SecretBox<T>) -> Self {
        Self { inner: secret }
    }
}

/// A passphrase held only as long as the operation that needs it.
pub type SecretString = Secret<String>;

impl SecretString {
    pub fn from_str(s: &str) -> Self {
        Self::new(s.to_owned())
    }
}

/// A fixed-size byte array that is zeroized when dropped.
///
/// Used for the AEAD and MAC keys, which are cheap to copy and don't need
/// `secrecy`'s heap indirection.
pub struct Protected<T: Zeroize> {
    inner: T,
}

impl<T: Zeroize> Protected<T> {
    pub fn new(value: T) -> Self {
        Self { inner: value }
    }

    #[must_use]
    pub fn expose(&self) -> &T {
        &self.inner
    }
}

impl<T: Zeroize> Deref for Protected<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T: Zeroize> Drop for Protected<T> {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

impl<T: Zeroize> fmt::Debug for Protected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Protected([REDACTED])")
    }
}

/// A 32-byte key that is zeroized on drop.
pub type ProtectedKey = Protected<[u8; 32]>;

/// The (AEAD key, MAC key) pair derived by [`crate::kdf::derive`], held in
/// zeroizing wrappers for the lifetime of one operation.
pub struct DerivedKeys {
    pub aead_key: ProtectedKey,
    pub mac_key: ProtectedKey,
}

impl DerivedKeys {
    /// Splits a 64-byte Argon2id output into the AEAD and MAC halves.
    pub(crate) fn from_kdf_output(mut output: [u8; crate::config::DERIVED_KEY_LEN]) -> Self {
        let mut aead_key = [0u8; crate::config::AEAD_KEY_LEN];
        let mut mac_key = [0u8; crate::config::MAC_KEY_LEN];
        aead_key.copy_from_slice(&output[..crate::config::AEAD_KEY_LEN]);
        mac_key.copy_from_slice(&output[crate::config::AEAD_KEY_LEN..]);
        output.zeroize();
        Self {
            aead_key: Protected::new(aead_key),
            mac_key: Protected::new(mac_key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protected_exposes_inner_value() {
        let secret = ProtectedKey::new([0x42; 32]);
        assert_eq!(secret.expose(), &[0x42; 32]);
    }

    #[test]
    fn protected_debug_is_redacted() {
        let secret = ProtectedKey::new([0x01; 32]);
        assert_eq!(format!("{secret:?}"), "Protected([REDACTED])");
    }

    #[test]
    fn derived_keys_split_in_order() {
        let mut output = [0u8; crate::config::DERIVED_KEY_LEN];
        for (i, b) in output.iter_mut().enumerate() {
            *b = i as u8;
        }
        let keys = DerivedKeys::from_kdf_output(output);
        assert_eq!(keys.aead_key.expose()[0], 0);
        assert_eq!(keys.mac_key.expose()[0], 32);
    }

    #[test]
    fn secret_string_exposes_value() {
        let secret = SecretString::from_str("hunter2");
        assert_eq!(secret.expose_secret(), "hunter2");
    }
}
