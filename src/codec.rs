//! Fixed-width big-endian integer codec.
//!
//! Every binary structure in the container format goes through these
//! helpers so byte order is decided in exactly one place. Decoders index
//! directly into the slice: callers pre-validate lengths against the
//! fixed-width layout, and a short slice is a caller bug, not a runtime
//! condition.

/// Encoded width of a `u8` field.
pub const U8_LEN: usize = 1;

/// Encoded width of a `u16` field.
pub const U16_LEN: usize = 2;

/// Encoded width of a `u32` field.
pub const U32_LEN: usize = 4;

/// Encodes a `u8` as a single byte.
#[inline]
#[must_use]
pub const fn put_u8(value: u8) -> [u8; U8_LEN] {
    [value]
}

/// Decodes a `u8` from the first byte of `bytes`.
#[inline]
#[must_use]
pub const fn get_u8(bytes: &[u8]) -> u8 {
    bytes[0]
}

/// Encodes a `u16` as two big-endian bytes.
#[inline]
#[must_use]
pub const fn put_u16(value: u16) -> [u8; U16_LEN] {
    value.to_be_bytes()
}

/// Decodes a big-endian `u16` from the first two bytes of `bytes`.
#[inline]
#[must_use]
pub const fn get_u16(bytes: &[u8]) -> u16 {
    u16::from_be_bytes([bytes[0], bytes[1]])
}

/// Encodes a `u32` as four big-endian bytes.
#[inline]
#[must_use]
pub const fn put_u32(value: u32) -> [u8; U32_LEN] {
    value.to_be_bytes()
}

/// Decodes a big-endian `u32` from the first four bytes of `bytes`.
#[inline]
#[must_use]
pub const fn get_u32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u8_roundtrip() {
        for value in [0u8, 1, 0x7f, 0xff] {
            assert_eq!(get_u8(&put_u8(value)), value);
        }
    }

    #[test]
    fn test_u16_roundtrip() {
        for value in [0u16, 1, 0x0102, u16::MAX] {
            assert_eq!(get_u16(&put_u16(value)), value);
        }
    }

    #[test]
    fn test_u32_roundtrip() {
        for value in [0u32, 1, 0x0102_0304, u32::MAX] {
            assert_eq!(get_u32(&put_u32(value)), value);
        }
    }

    #[test]
    fn test_big_endian_layout() {
        assert_eq!(put_u16(0x0102), [0x01, 0x02]);
        assert_eq!(put_u32(0x0102_0304), [0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        assert_eq!(get_u16(&[0x01, 0x02, 0xaa, 0xbb]), 0x0102);
    }
}
