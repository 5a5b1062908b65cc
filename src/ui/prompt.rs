//! Interactive prompts: passwords (hidden input, confirmed on encryption),
//! and yes/no confirmations before overwriting output.

use std::path::Path;

use inquire::{Confirm, Password, PasswordDisplayMode};

use crate::error::{CryptError, Result};

/// Collects passwords and confirmations from the terminal.
pub struct Prompt {
    password_min_length: usize,
}

impl Prompt {
    #[must_use]
    pub fn new(password_min_length: usize) -> Self {
        Self { password_min_length }
    }

    /// Prompts for a new password twice and requires both entries to match.
    ///
    /// # Errors
    /// [`CryptError::InvalidInput`] if the entries differ, are too short, or
    /// the prompt itself fails (user cancellation, non-interactive terminal).
    pub fn prompt_encryption_password(&self) -> Result<String> {
        let password = self.prompt_password("Enter encryption password")?;
        let confirmation = self.prompt_password("Confirm password")?;
        if password != confirmation {
            return Err(CryptError::invalid_input("passwords do not match"));
        }
        Ok(password)
    }

    /// Prompts for a single password, for decryption.
    ///
    /// # Errors
    /// Same failure modes as [`prompt_encryption_password`], minus the
    /// confirmation mismatch case.
    pub fn prompt_decryption_password(&self) -> Result<String> {
        self.prompt_password("Enter decryption password")
    }

    /// Asks whether to overwrite an existing output path.
    ///
    /// # Errors
    /// [`CryptError::InvalidInput`] if the prompt fails.
    pub fn confirm_overwrite(&self, path: &Path) -> Result<bool> {
        let filename = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_else(|| path.display().to_string().into());
        Confirm::new(&format!("{filename} already exists. Overwrite?"))
            .with_default(false)
            .prompt()
            .map_err(|e| CryptError::invalid_input(format!("confirmation failed: {e}")))
    }

    fn prompt_password(&self, message: &str) -> Result<String> {
        let min_length = self.password_min_length;
        Password::new(message)
            .with_display_mode(PasswordDisplayMode::Masked)
            .with_validator(move |input: &str| {
                if input.trim().is_empty() {
                    return Ok(inquire::validator::Validation::Invalid("password cannot be empty or whitespace only".into()));
                }
                if input.len() < min_length {
                    return Ok(inquire::validator::Validation::Invalid(format!("password must be at least {min_length} characters long").into()));
                }
                Ok(inquire::validator::Validation::Valid)
            })
            .without_confirmation()
            .prompt()
            .map_err(|e| CryptError::invalid_input(format!("password input failed: {e}")))
    }
}
