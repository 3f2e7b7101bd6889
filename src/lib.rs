//! Password-based authenticated file encryption.
//!
//! Files are sealed into a self-describing container: a header carrying
//! the format version and key-derivation inputs, the AES-256-CTR
//! ciphertext, and a trailing HMAC-SHA-512 signature over everything
//! before it. Keys come from the password via Argon2id, and decryption
//! verifies the signature before releasing a single plaintext byte.
//!
//! The [`format`] module is the stable entry point; everything else
//! supports the command-line application built on top of it.

pub mod app;
pub mod codec;
pub mod config;
pub mod error;
pub mod file;
pub mod format;
pub mod registry;
pub mod secret;
pub mod stats;
pub mod types;
pub mod ui;
