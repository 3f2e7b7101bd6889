//! Error types for the container format layer.
//!
//! The CLI layer wraps these in `anyhow` context; the format layer keeps
//! them typed so callers and tests can match on the exact condition.
//! `SignatureMismatch` deliberately covers both a wrong password and a
//! tampered container: an HMAC check cannot tell the two apart, and
//! reporting which one applies would hand information to an attacker.

use thiserror::Error;

/// Errors produced by the container format layer.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Encryption was requested with a zero-length password.
    #[error("password cannot be zero bytes")]
    EmptyPassword,

    /// The input is shorter than the smallest possible container.
    #[error("input is too small to be an encrypted container")]
    TooSmall,

    /// The container declares a format version this build does not carry.
    #[error("version ({got}) is not supported. supported versions are ({supported})")]
    UnsupportedVersion {
        /// Version number read from the container.
        got: u16,
        /// Comma-separated list of versions this build supports.
        supported: String,
    },

    /// The trailing signature did not match the encrypted data.
    ///
    /// Either the password was wrong or the container was tampered with;
    /// the two cases are indistinguishable by design.
    #[error("the signature did not match the encrypted data")]
    SignatureMismatch,

    /// The key derivation cost parameters were rejected by the KDF.
    #[error("invalid key derivation cost parameters")]
    InvalidCostParams,

    /// An I/O error from the underlying sink or source, passed through
    /// verbatim.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
