//! Common type definitions.

/// The direction a run processes files in.
///
/// Determines which files are eligible (by extension) and how output
/// paths are derived.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Replace plaintext files with encrypted containers.
    Encrypt,

    /// Replace encrypted containers with their plaintext.
    Decrypt,
}
