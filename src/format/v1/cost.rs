//! Key derivation cost parameters.

use crate::codec::{U32_LEN, get_u8, get_u32, put_u8, put_u32};
use crate::format::v1::{BASE_COST_MEMORY, BASE_COST_THREADS, BASE_COST_TIME, COST_PARAMS_LEN};

/// Argon2id tuning triple carried in every container header.
///
/// The presets trade derivation cost against attack resistance; `memory`
/// is in KiB throughout, matching the argon2 memory argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostParams {
    /// Time cost (number of passes).
    pub time: u32,

    /// Memory cost in KiB.
    pub memory: u32,

    /// Degree of parallelism.
    pub threads: u8,
}

impl CostParams {
    /// Half the default time cost, for bulk runs over many files.
    pub const FAST: Self = Self { time: BASE_COST_TIME / 2, memory: BASE_COST_MEMORY, threads: BASE_COST_THREADS };

    /// The default cost profile.
    pub const NORMAL: Self = Self { time: BASE_COST_TIME, memory: BASE_COST_MEMORY, threads: BASE_COST_THREADS };

    /// Double the default time cost with extra lanes, for the paranoid.
    pub const SLOW: Self = Self { time: BASE_COST_TIME * 2, memory: BASE_COST_MEMORY, threads: BASE_COST_THREADS + BASE_COST_THREADS / 2 };

    /// Encodes the parameters as 4 time + 4 memory + 1 threads bytes,
    /// big-endian.
    #[must_use]
    pub fn encode(&self) -> [u8; COST_PARAMS_LEN] {
        let mut buf = [0u8; COST_PARAMS_LEN];
        buf[..U32_LEN].copy_from_slice(&put_u32(self.time));
        buf[U32_LEN..U32_LEN * 2].copy_from_slice(&put_u32(self.memory));
        buf[U32_LEN * 2..].copy_from_slice(&put_u8(self.threads));
        buf
    }

    /// Decodes parameters from the first [`COST_PARAMS_LEN`] bytes of
    /// `bytes`.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is shorter than [`COST_PARAMS_LEN`]. Callers
    /// always pre-slice exactly one encoded block; anything shorter is a
    /// bug, not a runtime condition.
    #[must_use]
    pub fn decode(bytes: &[u8]) -> Self {
        assert!(bytes.len() >= COST_PARAMS_LEN, "buffer too short to hold cost parameters");

        Self {
            time: get_u32(&bytes[..U32_LEN]),
            memory: get_u32(&bytes[U32_LEN..U32_LEN * 2]),
            threads: get_u8(&bytes[U32_LEN * 2..]),
        }
    }
}

impl Default for CostParams {
    fn default() -> Self {
        Self::NORMAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_len() {
        assert_eq!(COST_PARAMS_LEN, 9);
        assert_eq!(CostParams::NORMAL.encode().len(), COST_PARAMS_LEN);
    }

    #[test]
    fn test_roundtrip() {
        for params in [
            CostParams::FAST,
            CostParams::NORMAL,
            CostParams::SLOW,
            CostParams { time: 1, memory: 8, threads: 1 },
            CostParams { time: u32::MAX, memory: u32::MAX, threads: u8::MAX },
        ] {
            assert_eq!(CostParams::decode(&params.encode()), params);
        }
    }

    #[test]
    fn test_presets() {
        assert_eq!(CostParams::FAST, CostParams { time: 2, memory: 512 * 1024, threads: 8 });
        assert_eq!(CostParams::NORMAL, CostParams { time: 4, memory: 512 * 1024, threads: 8 });
        assert_eq!(CostParams::SLOW, CostParams { time: 8, memory: 512 * 1024, threads: 12 });
    }

    #[test]
    #[should_panic(expected = "buffer too short")]
    fn test_decode_short_buffer_panics() {
        let _ = CostParams::decode(&[0u8; COST_PARAMS_LEN - 1]);
    }
}
