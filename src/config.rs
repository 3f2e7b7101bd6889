//! Application-wide constants.
//!
//! Cryptographic constants live with the format version they belong to
//! (see `format::v1`); this module only carries the knobs of the CLI
//! shell around the format.

/// Application name used in user-facing output.
pub const APP_NAME: &str = "latchkey";

/// Default file extension for encrypted containers, without the dot.
///
/// Encryption appends it, decryption strips it. Files already carrying
/// the extension are skipped on encrypt; files without it are skipped on
/// decrypt. Overridable with `--ext` for people who really need to.
pub const FILE_EXTENSION: &str = "lky";

/// Minimum password length accepted at the CLI boundary.
///
/// The format itself accepts any non-empty password; this floor only
/// guards interactively-entered and flag-supplied passwords against the
/// obviously weak.
pub const PASSWORD_MIN_LENGTH: usize = 8;
