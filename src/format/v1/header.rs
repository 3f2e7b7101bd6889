//! The container's plaintext metadata record.
//!
//! The header is the only place randomness enters per file: salt and IV
//! are drawn fresh from the OS rng every time a header is generated and
//! are never reused or derived deterministically. It is written to the
//! sink unencrypted so decryption can discover the cost parameters and
//! salt/IV without a password, but it is covered by the trailing
//! signature so it cannot be altered unnoticed.

use std::fmt;

use rand::TryRng;
use rand::rngs::SysRng;

use crate::codec::{U16_LEN, get_u16, put_u16};
use crate::format::v1::{COST_PARAMS_LEN, CostParams, HEADER_LEN, IV_LEN, SALT_LEN, VERSION};

/// KDF algorithm version recorded in the header (Argon2 v1.3).
pub const KDF_VERSION: u16 = argon2::Version::V0x13 as u16;

/// Decoded v1 container header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CryptoHeader {
    format_version: u16,
    kdf_version: u16,
    cost: CostParams,
    salt: [u8; SALT_LEN],
    iv: [u8; IV_LEN],
}

impl CryptoHeader {
    /// Generates a fresh header for one encryption operation, with a
    /// random salt and IV.
    #[must_use]
    pub fn generate(cost: CostParams) -> Self {
        let mut salt = [0u8; SALT_LEN];
        let mut iv = [0u8; IV_LEN];
        fill_random(&mut salt);
        fill_random(&mut iv);

        Self { format_version: VERSION, kdf_version: KDF_VERSION, cost, salt, iv }
    }

    /// Encodes the header into its fixed binary layout.
    #[must_use]
    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let mut buf = [0u8; HEADER_LEN];
        let mut at = 0;

        buf[at..at + U16_LEN].copy_from_slice(&put_u16(self.format_version));
        at += U16_LEN;
        buf[at..at + U16_LEN].copy_from_slice(&put_u16(self.kdf_version));
        at += U16_LEN;
        buf[at..at + COST_PARAMS_LEN].copy_from_slice(&self.cost.encode());
        at += COST_PARAMS_LEN;
        buf[at..at + SALT_LEN].copy_from_slice(&self.salt);
        at += SALT_LEN;
        buf[at..at + IV_LEN].copy_from_slice(&self.iv);

        buf
    }

    /// Decodes a header from the first [`HEADER_LEN`] bytes of `bytes`.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is shorter than [`HEADER_LEN`]. Callers always
    /// pre-slice exactly one encoded header.
    #[must_use]
    pub fn decode(bytes: &[u8]) -> Self {
        assert!(bytes.len() >= HEADER_LEN, "buffer too short to hold a crypto header");

        let mut at = 0;
        let format_version = get_u16(&bytes[at..at + U16_LEN]);
        at += U16_LEN;
        let kdf_version = get_u16(&bytes[at..at + U16_LEN]);
        at += U16_LEN;
        let cost = CostParams::decode(&bytes[at..at + COST_PARAMS_LEN]);
        at += COST_PARAMS_LEN;
        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&bytes[at..at + SALT_LEN]);
        at += SALT_LEN;
        let mut iv = [0u8; IV_LEN];
        iv.copy_from_slice(&bytes[at..at + IV_LEN]);

        Self { format_version, kdf_version, cost, salt, iv }
    }

    /// Format version declared by the container.
    #[inline]
    #[must_use]
    pub const fn format_version(&self) -> u16 {
        self.format_version
    }

    /// KDF algorithm version that produced the keys.
    #[inline]
    #[must_use]
    pub const fn kdf_version(&self) -> u16 {
        self.kdf_version
    }

    /// Key derivation cost parameters.
    #[inline]
    #[must_use]
    pub const fn cost(&self) -> CostParams {
        self.cost
    }

    /// Per-file random salt.
    #[inline]
    #[must_use]
    pub const fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    /// Per-file random IV.
    #[inline]
    #[must_use]
    pub const fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }
}

impl fmt::Display for CryptoHeader {
    /// Renders the header for diagnostics, with memory shown in MiB.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "version: {}", self.format_version)?;
        writeln!(f, "kdf version: {}", self.kdf_version)?;
        writeln!(f, "salt: {}", hex::encode(self.salt))?;
        writeln!(f, "iv: {}", hex::encode(self.iv))?;
        writeln!(f, "cost parameters:")?;
        writeln!(f, "    time: {}", self.cost.time)?;
        writeln!(f, "    memory: {} MiB", self.cost.memory / 1024)?;
        writeln!(f, "    threads: {}", self.cost.threads)
    }
}

/// Fills `buf` with bytes from the OS rng.
///
/// # Panics
///
/// Panics if the OS rng fails: with no trustworthy randomness every
/// guarantee the format makes is void, so there is nothing to continue
/// with.
pub(crate) fn fill_random(buf: &mut [u8]) {
    SysRng.try_fill_bytes(buf).expect("system rng unavailable");
}
