//! Derived key material and the live cipher/MAC primitives.
//!
//! One ring is owned by exactly one encrypt or decrypt session. The
//! derived key bytes live in a [`Zeroizing`] buffer that is wiped as soon
//! as the primitives are keyed, the AES key schedule is zeroized on drop,
//! and [`CryptoRing::destroy`] consumes the ring so it cannot be used
//! again. Exclusive access is enforced by `&mut self`; a ring is never
//! shared across threads.

use argon2::Algorithm::Argon2id;
use argon2::Version::V0x13;
use argon2::{Argon2, Params};
use ctr::cipher::{KeyIvInit, StreamCipher};
use hmac::{Hmac, Mac as _};
use sha2::Sha512;
use zeroize::Zeroizing;

use crate::error::FormatError;
use crate::format::v1::{CIPHER_KEY_LEN, CryptoHeader, MAC_KEY_LEN, SIGNATURE_LEN};

type Aes256Ctr = ctr::Ctr128BE<aes::Aes256>;
type HmacSha512 = Hmac<Sha512>;

/// A session's keyed stream cipher and MAC accumulator.
pub(crate) struct CryptoRing {
    stream: Aes256Ctr,
    mac: HmacSha512,
}

impl CryptoRing {
    /// Derives the cipher and MAC keys from `password` and the header's
    /// salt and cost parameters, and keys the primitives.
    ///
    /// Argon2id produces [`CIPHER_KEY_LEN`] + [`MAC_KEY_LEN`] bytes; the
    /// first 32 key AES-256-CTR (counter seeded with the header IV), the
    /// remaining 64 key HMAC-SHA-512.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::InvalidCostParams`] if the KDF rejects the
    /// header's cost parameters.
    pub(crate) fn derive(password: &[u8], header: &CryptoHeader) -> Result<Self, FormatError> {
        let mut key = Zeroizing::new([0u8; CIPHER_KEY_LEN + MAC_KEY_LEN]);

        let cost = header.cost();
        let params = Params::new(cost.memory, cost.time, u32::from(cost.threads), Some(key.len())).map_err(|_| FormatError::InvalidCostParams)?;

        Argon2::new(Argon2id, V0x13, params)
            .hash_password_into(password, header.salt(), key.as_mut())
            .map_err(|_| FormatError::InvalidCostParams)?;

        // Key and IV sizes are fixed constants of the format; a length
        // error here is an internal invariant violation.
        let stream = Aes256Ctr::new_from_slices(&key[..CIPHER_KEY_LEN], header.iv()).expect("fixed AES-256-CTR key and iv sizes");
        let mac = HmacSha512::new_from_slice(&key[CIPHER_KEY_LEN..]).expect("hmac accepts any key length");

        Ok(Self { stream, mac })
    }

    /// Applies the keystream to `buf` in place, advancing the stream.
    #[inline]
    pub(crate) fn apply_keystream(&mut self, buf: &mut [u8]) {
        self.stream.apply_keystream(buf);
    }

    /// Feeds `bytes` into the MAC accumulator.
    #[inline]
    pub(crate) fn mac_update(&mut self, bytes: &[u8]) {
        self.mac.update(bytes);
    }

    /// Finalizes a copy of the MAC accumulator into a signature.
    ///
    /// The accumulator itself is left untouched, so bytes fed afterwards
    /// extend the original stream.
    pub(crate) fn signature(&self) -> [u8; SIGNATURE_LEN] {
        self.mac.clone().finalize().into_bytes().into()
    }

    /// Consumes the ring, wiping the cipher key schedule.
    ///
    /// Sessions call this exactly once when they close; the move makes a
    /// second use impossible.
    pub(crate) fn destroy(self) {}
}
