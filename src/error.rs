//! Error taxonomy for the cryptstream core.
//!
//! Every public operation returns [`CryptError`]. Callers that need to branch
//! on failure kind (retry on `Io`, surface "wrong password" on `AuthFailure`,
//! etc.) match on the variant; callers that just want a message can rely on
//! `Display`.

use thiserror::Error;

/// The error type returned by every public operation in this crate.
#[derive(Error, Debug)]
pub enum CryptError {
    /// The caller supplied a malformed argument: empty passphrase, a salt of
    /// the wrong length, a missing output directory, a negative size, and so
    /// on. The operation was never attempted.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The artifact is structurally broken: bad magic, unsupported version,
    /// a header length outside the allowed range, a short read, or a chunk
    /// count inconsistent with the declared sizes.
    #[error("corrupt artifact: {0}")]
    Corrupt(String),

    /// An AEAD tag or the trailing whole-file MAC failed to verify. By
    /// design this single variant covers both "wrong passphrase" and "the
    /// file was tampered with", the core never distinguishes the two to
    /// the caller.
    #[error("authentication failed: wrong passphrase or tampered file")]
    AuthFailure,

    /// An underlying filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A condition the core believes cannot happen at runtime, such as the
    /// KDF returning the wrong number of output bytes. Indicates a bug in
    /// this crate rather than bad input or a hostile artifact.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CryptError {
    /// Shorthand for constructing an [`CryptError::InvalidInput`] from any
    /// displayable message.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Shorthand for constructing an [`CryptError::Corrupt`] from any
    /// displayable message.
    pub fn corrupt(msg: impl Into<String>) -> Self {
        Self::Corrupt(msg.into())
    }

    /// Shorthand for constructing an [`CryptError::Internal`] from any
    /// displayable message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// True if this is the single "wrong passphrase or tampering" kind.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AuthFailure)
    }
}

/// Result type alias used throughout the crate's public API.
pub type Result<T> = std::result::Result<T, CryptError>;

impl From<zip::result::ZipError> for CryptError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Self::Io(e),
            other => Self::Corrupt(format!("zip archive error: {other}")),
        }
    }
}

impl From<argon2::Error> for CryptError {
    fn from(err: argon2::Error) -> Self {
        Self::Internal(format!("argon2 failure: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failure_message_does_not_leak_cause() {
        let err = CryptError::AuthFailure;
        assert_eq!(err.to_string(), "authentication failed: wrong passphrase or tampered file");
        assert!(err.is_auth_failure());
    }

    #[test]
    fn invalid_input_carries_message() {
        let err = CryptError::invalid_input("passphrase cannot be empty");
        assert!(err.to_string().contains("passphrase cannot be empty"));
    }
}
