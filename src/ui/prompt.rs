//! Interactive password prompts.
//!
//! Passwords are read with `inquire` in masked mode. Encryption prompts
//! twice and refuses a mismatch; decryption prompts once, since a wrong
//! password is caught by the container's signature check anyway.

use anyhow::{Context, Result, bail, ensure};
use inquire::validator::{StringValidator, Validation};
use inquire::{CustomUserError, Password as PasswordInput, PasswordDisplayMode};

use crate::secret::Password;

/// Interactive prompt handler.
pub struct Prompt {
    /// Minimum accepted password length.
    min_length: usize,
}

/// Inquire validator enforcing the CLI's minimum password length.
#[derive(Clone)]
struct MinLength(usize);

impl StringValidator for MinLength {
    fn validate(&self, input: &str) -> Result<Validation, CustomUserError> {
        if input.len() < self.0 {
            Ok(Validation::Invalid(format!("password must be at least {} characters long", self.0).into()))
        } else {
            Ok(Validation::Valid)
        }
    }
}

impl Prompt {
    /// Creates a prompt handler with the given length floor.
    #[must_use]
    pub const fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    /// Prompts for an encryption password, with confirmation.
    ///
    /// # Errors
    ///
    /// Fails if the terminal interaction fails or the confirmation does
    /// not match.
    pub fn encryption_password(&self) -> Result<Password> {
        let entered = PasswordInput::new("please enter a password:")
            .with_display_mode(PasswordDisplayMode::Masked)
            .with_custom_confirmation_message("confirm your password:")
            .with_custom_confirmation_error_message("passwords do not match")
            .with_validator(MinLength(self.min_length))
            .prompt()
            .context("password prompt failed")?;

        Ok(Password::new(&entered))
    }

    /// Prompts for a decryption password, no confirmation.
    ///
    /// # Errors
    ///
    /// Fails if the terminal interaction fails.
    pub fn decryption_password(&self) -> Result<Password> {
        let entered = PasswordInput::new("please enter your password:")
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .with_validator(MinLength(self.min_length))
            .prompt()
            .context("password prompt failed")?;

        Ok(Password::new(&entered))
    }

    /// Prompts for another password after a failed decryption.
    ///
    /// Hitting enter without typing anything skips the file and returns
    /// `None`.
    ///
    /// # Errors
    ///
    /// Fails if the terminal interaction fails or a non-empty entry is
    /// shorter than the minimum length.
    pub fn retry_password(&self) -> Result<Option<Password>> {
        let entered = PasswordInput::new("type another password, or hit enter to skip this file:")
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()
            .context("password prompt failed")?;

        if entered.is_empty() {
            return Ok(None);
        }

        ensure!(entered.len() >= self.min_length, "password must be at least {} characters long", self.min_length);

        Ok(Some(Password::new(&entered)))
    }

    /// Validates a password supplied via `--password`.
    ///
    /// # Errors
    ///
    /// Fails if the flag value is shorter than the minimum length.
    pub fn accept_flag_password(&self, value: &str) -> Result<Password> {
        if value.len() < self.min_length {
            bail!("password must be at least {} characters long", self.min_length);
        }

        Ok(Password::new(value))
    }
}
