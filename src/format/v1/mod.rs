//! Version 1 of the container format.
//!
//! Layout of a finished container, all integers big-endian:
//!
//! ```text
//! field:  version | kdf version | cost time | cost memory | cost threads | salt | iv | ciphertext | signature
//! bytes:        2 |           2 |         4 |           4 |            1 |   64 | 16 |   variable |        64
//! ```
//!
//! Keys are derived from the password with Argon2id, the payload is
//! enciphered with AES-256-CTR, and the whole of header‖ciphertext is
//! authenticated with HMAC-SHA-512. The signature is always verified in
//! full before a single plaintext byte is released.

use crate::codec::{U8_LEN, U16_LEN, U32_LEN};

mod cost;
mod decrypt;
mod encrypt;
mod header;
mod ring;

pub use cost::CostParams;
pub use decrypt::{DecryptReader, decrypt_file, read_signature};
pub use encrypt::{EncryptWriter, encrypt_file};
pub use header::CryptoHeader;
pub(crate) use ring::CryptoRing;

/// Format version written into and expected from v1 containers.
pub const VERSION: u16 = 1;

/// AES-256 key length in bytes.
pub(crate) const CIPHER_KEY_LEN: usize = 32;

/// HMAC-SHA-512 key length in bytes.
pub(crate) const MAC_KEY_LEN: usize = 64;

/// Salt length in bytes.
pub const SALT_LEN: usize = 64;

/// IV length in bytes, equal to the AES block size.
pub const IV_LEN: usize = 16;

/// Trailing signature length in bytes (SHA-512 output size).
pub const SIGNATURE_LEN: usize = 64;

/// Encoded cost parameter block length in bytes.
pub const COST_PARAMS_LEN: usize = U32_LEN + U32_LEN + U8_LEN;

/// Encoded header length in bytes.
pub const HEADER_LEN: usize = U16_LEN + U16_LEN + COST_PARAMS_LEN + SALT_LEN + IV_LEN;

/// Fixed overhead a v1 container adds on top of the plaintext.
pub const OVERHEAD_LEN: usize = HEADER_LEN + SIGNATURE_LEN;

// Cost parameter base values the presets are built from. The argon2
// memory argument is in KiB.
pub(crate) const BASE_COST_TIME: u32 = 4;
pub(crate) const BASE_COST_MEMORY: u32 = 512 * 1024;
pub(crate) const BASE_COST_THREADS: u8 = 8;
