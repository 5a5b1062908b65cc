//! Argon2id key derivation.
//!
//! Every artifact's AEAD key and MAC key are derived from the caller's
//! passphrase and a per-artifact random salt in a single Argon2id pass whose
//! 64-byte output is split in half: see [`crate::secret::DerivedKeys`].

use argon2::{Algorithm, Argon2, Params, Version};
use tracing::debug;

use crate::config::{
    ARGON2_ITERATIONS, ARGON2_MEMORY_KIB, ARGON2_MIN_ITERATIONS, ARGON2_MIN_MEMORY_KIB,
    ARGON2_MIN_PARALLELISM, ARGON2_OUTPUT_LEN, ARGON2_PARALLELISM, DERIVED_KEY_LEN,
    OWASP_MIN_ITERATIONS_FOR_LOW_MEMORY, OWASP_MIN_MEMORY_KIB, SALT_LEN,
};
use crate::error::{CryptError, Result};
use crate::secret::DerivedKeys;

/// The tunable Argon2id parameters carried in (or defaulted for) an artifact.
///
/// These are not persisted in the container format: the format always uses
/// [`KdfParams::default`]. This type exists so [`validate_params`] can be
/// exercised independently of an artifact, e.g. from the CLI's
/// `validate-params` subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: ARGON2_MEMORY_KIB,
            iterations: ARGON2_ITERATIONS,
            parallelism: ARGON2_PARALLELISM,
        }
    }
}

/// Derives the AEAD and MAC keys from `passphrase` and `salt`.
///
/// `salt` must be exactly [`SALT_LEN`] bytes. Returns [`CryptError::InvalidInput`]
/// for a malformed passphrase or salt, and [`CryptError::Internal`] only if
/// Argon2 itself reports an internal failure (parameters are fixed and valid,
/// so this should not happen in practice).
pub fn derive(passphrase: &[u8], salt: &[u8; SALT_LEN], params: KdfParams) -> Result<DerivedKeys> {
    if passphrase.is_empty() {
        return Err(CryptError::invalid_input("passphrase cannot be empty"));
    }

    let argon_params = Params::new(params.memory_kib, params.iterations, params.parallelism, Some(ARGON2_OUTPUT_LEN))
        .map_err(|e| CryptError::internal(format!("invalid Argon2 parameters: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon_params);

    let mut output = [0u8; DERIVED_KEY_LEN];
    argon2
        .hash_password_into(passphrase, salt, &mut output)
        .map_err(|e| CryptError::internal(format!("key derivation failed: {e}")))?;

    debug!(memory_kib = params.memory_kib, iterations = params.iterations, "derived keys from passphrase");

    Ok(DerivedKeys::from_kdf_output(output))
}

/// Validates a set of Argon2id parameters, returning human-readable warnings.
///
/// An empty vector means the parameters are at or above OWASP's recommended
/// defaults. A nonempty vector does not mean the parameters are rejected:
/// every warning here is advisory, intended for the `validate-params` CLI
/// subcommand to surface to a human before they commit to weak settings.
#[must_use]
pub fn validate_params(params: KdfParams) -> Vec<String> {
    let mut warnings = Vec::new();

    if params.memory_kib < ARGON2_MIN_MEMORY_KIB {
        warnings.push(format!(
            "memory cost {} KiB is below the minimum of {} KiB",
            params.memory_kib, ARGON2_MIN_MEMORY_KIB
        ));
    }
    if params.iterations < ARGON2_MIN_ITERATIONS {
        warnings.push(format!(
            "iteration count {} is below the minimum of {}",
            params.iterations, ARGON2_MIN_ITERATIONS
        ));
    }
    if params.parallelism < ARGON2_MIN_PARALLELISM {
        warnings.push(format!(
            "parallelism {} is below the minimum of {}",
            params.parallelism, ARGON2_MIN_PARALLELISM
        ));
    }

    if params.memory_kib < OWASP_MIN_MEMORY_KIB && params.iterations < OWASP_MIN_ITERATIONS_FOR_LOW_MEMORY {
        warnings.push(format!(
            "memory cost {} KiB combined with {} iteration(s) is weaker than OWASP's recommended Argon2id defaults \
             ({OWASP_MIN_MEMORY_KIB} KiB, or {OWASP_MIN_ITERATIONS_FOR_LOW_MEMORY}+ iterations at lower memory)",
            params.memory_kib, params.iterations
        ));
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_is_deterministic_for_same_inputs() {
        let salt = [7u8; SALT_LEN];
        let keys1 = derive(b"correct horse battery staple", &salt, KdfParams::default()).unwrap();
        let keys2 = derive(b"correct horse battery staple", &salt, KdfParams::default()).unwrap();
        assert_eq!(keys1.aead_key.expose(), keys2.aead_key.expose());
        assert_eq!(keys1.mac_key.expose(), keys2.mac_key.expose());
    }

    #[test]
    fn derive_differs_for_different_salts() {
        let keys1 = derive(b"password", &[1u8; SALT_LEN], KdfParams::default()).unwrap();
        let keys2 = derive(b"password", &[2u8; SALT_LEN], KdfParams::default()).unwrap();
        assert_ne!(keys1.aead_key.expose(), keys2.aead_key.expose());
    }

    #[test]
    fn derive_rejects_empty_passphrase() {
        let salt = [0u8; SALT_LEN];
        assert!(derive(b"", &salt, KdfParams::default()).is_err());
    }

    #[test]
    fn aead_key_and_mac_key_differ() {
        let salt = [3u8; SALT_LEN];
        let keys = derive(b"password", &salt, KdfParams::default()).unwrap();
        assert_ne!(keys.aead_key.expose(), keys.mac_key.expose());
    }

    #[test]
    fn default_params_have_no_warnings() {
        assert!(validate_params(KdfParams::default()).is_empty());
    }

    #[test]
    fn low_memory_and_low_iterations_are_flagged() {
        let params = KdfParams { memory_kib: 64, iterations: 1, parallelism: 1 };
        let warnings = validate_params(params);
        assert!(!warnings.is_empty());
    }

    #[test]
    fn zero_parallelism_is_flagged() {
        let params = KdfParams { memory_kib: ARGON2_MEMORY_KIB, iterations: ARGON2_ITERATIONS, parallelism: 0 };
        let warnings = validate_params(params);
        assert!(warnings.iter().any(|w| w.contains("parallelism")));
    }
}
