//! The verify-before-decrypt reader.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use subtle::ConstantTimeEq;

use crate::error::FormatError;
use crate::format::v1::{CryptoHeader, CryptoRing, HEADER_LEN, OVERHEAD_LEN, SIGNATURE_LEN, VERSION};

/// Read buffer size for the authentication pass.
const MAC_PASS_BUF: usize = 64 * 1024;

/// Decrypting reader over a verified container.
///
/// Construction performs the whole gate sequence: size check, header
/// parse, version check, key derivation, and a full MAC pass over
/// header‖ciphertext compared against the trailing signature in constant
/// time. Only when all of that succeeds does a reader exist at all, so
/// no plaintext byte can be released from an unauthenticated container.
/// AES-CTR is malleable on its own; decrypt-while-verifying would hand an
/// attacker a plaintext oracle, which is why the ciphertext is read twice
/// instead of once.
///
/// The derived key material is wiped when the reader is dropped.
pub struct DecryptReader<R: Read + Seek> {
    source: R,
    ring: CryptoRing,
    remaining: u64,
}

impl<R: Read + Seek> DecryptReader<R> {
    /// Opens a decrypt session over `source`, verifying the container
    /// before returning.
    ///
    /// # Errors
    ///
    /// - [`FormatError::TooSmall`] if `source` is shorter than the
    ///   minimum container size.
    /// - [`FormatError::UnsupportedVersion`] if the header declares a
    ///   version other than 1.
    /// - [`FormatError::SignatureMismatch`] if the signature does not
    ///   match, whether from a wrong password or a tampered container.
    /// - I/O errors from `source` verbatim.
    pub fn new(password: &[u8], mut source: R) -> Result<Self, FormatError> {
        let total = source.seek(SeekFrom::End(0))?;
        if total < OVERHEAD_LEN as u64 {
            return Err(FormatError::TooSmall);
        }

        source.seek(SeekFrom::Start(0))?;
        let mut header_bytes = [0u8; HEADER_LEN];
        source.read_exact(&mut header_bytes)?;
        let header = CryptoHeader::decode(&header_bytes);

        if header.format_version() != VERSION {
            return Err(FormatError::UnsupportedVersion { got: header.format_version(), supported: VERSION.to_string() });
        }

        let mut ring = match CryptoRing::derive(password, &header) {
            Ok(ring) => ring,
            // A damaged cost field is tampering like any other bit flip.
            Err(FormatError::InvalidCostParams) => return Err(FormatError::SignatureMismatch),
            Err(other) => return Err(other),
        };

        // Authenticate everything up front: the whole of
        // header‖ciphertext flows through the MAC before any plaintext
        // is produced.
        source.seek(SeekFrom::Start(0))?;
        accumulate(&mut source, &mut ring, total - SIGNATURE_LEN as u64)?;

        let mut expected = [0u8; SIGNATURE_LEN];
        source.read_exact(&mut expected)?;

        let computed = ring.signature();
        if !bool::from(computed.ct_eq(&expected)) {
            // Wrong password or tampered data; there is no way to know
            // which, and we do not pretend otherwise.
            return Err(FormatError::SignatureMismatch);
        }

        // Rewind past the header; reads decrypt lazily from here,
        // bounded to exactly the ciphertext.
        source.seek(SeekFrom::Start(HEADER_LEN as u64))?;
        let remaining = total - OVERHEAD_LEN as u64;

        Ok(Self { source, ring, remaining })
    }
}

impl<R: Read + Seek> Read for DecryptReader<R> {
    /// Reads ciphertext from the source and deciphers it in place.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.remaining == 0 || buf.is_empty() {
            return Ok(0);
        }

        let want = buf.len().min(usize::try_from(self.remaining).unwrap_or(usize::MAX));
        let read = self.source.read(&mut buf[..want])?;
        self.ring.apply_keystream(&mut buf[..read]);
        self.remaining -= read as u64;

        Ok(read)
    }
}

/// Feeds `count` bytes from `source` into the ring's MAC accumulator.
fn accumulate<R: Read>(source: &mut R, ring: &mut CryptoRing, count: u64) -> Result<(), FormatError> {
    let mut buf = vec![0u8; MAC_PASS_BUF];
    let mut left = count;

    while left > 0 {
        let want = left.min(buf.len() as u64) as usize;
        let read = source.read(&mut buf[..want])?;
        if read == 0 {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
        }
        ring.mac_update(&buf[..read]);
        left -= read as u64;
    }

    Ok(())
}

/// Reads the raw trailing signature of a container without verifying it.
///
/// Diagnostics only; a signature read this way says nothing about the
/// container's integrity.
///
/// # Errors
///
/// Returns [`FormatError::TooSmall`] if `source` is shorter than the
/// minimum container size, or I/O errors verbatim.
pub fn read_signature<R: Read + Seek>(source: &mut R) -> Result<[u8; SIGNATURE_LEN], FormatError> {
    let total = source.seek(SeekFrom::End(0))?;
    if total < OVERHEAD_LEN as u64 {
        return Err(FormatError::TooSmall);
    }

    source.seek(SeekFrom::End(-(SIGNATURE_LEN as i64)))?;
    let mut signature = [0u8; SIGNATURE_LEN];
    source.read_exact(&mut signature)?;

    Ok(signature)
}

/// Decrypts the container at `input` into a new plaintext file at
/// `output`.
///
/// The container is fully verified before `output` is created, so a
/// wrong password never leaves a partial file behind.
///
/// # Errors
///
/// Propagates [`DecryptReader::new`] errors, plus the create error if
/// `output` already exists (opened with `create_new`; nothing is ever
/// overwritten).
pub fn decrypt_file(password: &[u8], input: &Path, output: &Path) -> Result<(), FormatError> {
    let source = BufReader::new(File::open(input)?);
    let mut reader = DecryptReader::new(password, source)?;

    let mut sink = BufWriter::new(OpenOptions::new().write(true).create_new(true).open(output)?);
    io::copy(&mut reader, &mut sink)?;
    sink.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::format::v1::{CostParams, EncryptWriter};

    const TEST_COST: CostParams = CostParams { time: 1, memory: 8 * 1024, threads: 1 };
    const TEST_PASS: &[u8] = b"testpassword";

    fn encrypt(payload: &[u8]) -> Vec<u8> {
        let mut writer = EncryptWriter::new(TEST_PASS, TEST_COST, Vec::new()).unwrap();
        writer.write_all(payload).unwrap();
        writer.finish().unwrap()
    }

    #[test]
    fn test_roundtrip() {
        for payload in [b"".as_slice(), b"x", b"hello container", &[0x5au8; 4096]] {
            let container = encrypt(payload);
            let mut reader = DecryptReader::new(TEST_PASS, Cursor::new(container)).unwrap();
            let mut plain = Vec::new();
            reader.read_to_end(&mut plain).unwrap();
            assert_eq!(plain, payload);
        }
    }

    #[test]
    fn test_wrong_password() {
        let container = encrypt(b"payload");
        match DecryptReader::new(b"wrongpassword", Cursor::new(container)) {
            Err(FormatError::SignatureMismatch) => {}
            other => panic!("expected SignatureMismatch, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_any_bit_flip_is_detected() {
        let container = encrypt(b"tamper detection payload");

        // One flipped bit per region: version, kdf version, threads,
        // salt, iv, ciphertext, start of signature, last byte. Time and
        // memory bytes are left alone here so a flipped high bit cannot
        // turn the KDF into a multi-gigabyte derivation; damaged cost
        // fields are covered by the invalid-cost mapping below.
        let last = container.len() - 1;
        for offset in [1, 2, 12, 40, 85, HEADER_LEN + 3, container.len() - SIGNATURE_LEN, last] {
            let mut tampered = container.clone();
            tampered[offset] ^= 0x01;
            match DecryptReader::new(TEST_PASS, Cursor::new(tampered)) {
                Err(FormatError::SignatureMismatch | FormatError::UnsupportedVersion { .. }) => {}
                other => panic!("bit flip at {offset} not detected: {:?}", other.err()),
            }
        }
    }

    #[test]
    fn test_damaged_cost_reads_as_tampering() {
        let mut container = encrypt(b"payload");
        // Zero the time cost; the KDF rejects it before any MAC pass.
        container[4..8].fill(0);
        match DecryptReader::new(TEST_PASS, Cursor::new(container)) {
            Err(FormatError::SignatureMismatch) => {}
            other => panic!("expected SignatureMismatch, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_too_small() {
        for len in [0, 1, HEADER_LEN, OVERHEAD_LEN - 1] {
            match DecryptReader::new(TEST_PASS, Cursor::new(vec![0u8; len])) {
                Err(FormatError::TooSmall) => {}
                other => panic!("expected TooSmall for {len} bytes, got {:?}", other.err()),
            }
        }
    }

    #[test]
    fn test_unsupported_version() {
        let mut container = encrypt(b"payload");
        // Overwrite the version field with one this build does not have.
        container[0] = 0;
        container[1] = 7;
        match DecryptReader::new(TEST_PASS, Cursor::new(container)) {
            Err(FormatError::UnsupportedVersion { got: 7, .. }) => {}
            other => panic!("expected UnsupportedVersion, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_read_signature_matches_tail() {
        let container = encrypt(b"payload");
        let signature = read_signature(&mut Cursor::new(&container)).unwrap();
        assert_eq!(signature.as_slice(), &container[container.len() - SIGNATURE_LEN..]);
    }

    #[test]
    fn test_read_signature_too_small() {
        match read_signature(&mut Cursor::new(vec![0u8; SIGNATURE_LEN])) {
            Err(FormatError::TooSmall) => {}
            other => panic!("expected TooSmall, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_decrypt_file_refuses_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("data.lky");
        let output = dir.path().join("data");
        std::fs::write(&input, encrypt(b"payload")).unwrap();
        std::fs::write(&output, b"already here").unwrap();

        match decrypt_file(TEST_PASS, &input, &output) {
            Err(FormatError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::AlreadyExists),
            other => panic!("expected AlreadyExists, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_password_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("data.lky");
        let output = dir.path().join("data");
        std::fs::write(&input, encrypt(b"payload")).unwrap();

        assert!(matches!(decrypt_file(b"wrongpassword", &input, &output), Err(FormatError::SignatureMismatch)));
        assert!(!output.exists());
    }
}
