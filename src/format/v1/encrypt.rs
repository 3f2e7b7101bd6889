//! The streaming encrypt-then-authenticate writer.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::FormatError;
use crate::format::v1::{CostParams, CryptoHeader, CryptoRing};

/// Encrypting writer over an arbitrary byte sink.
///
/// Construction writes the plaintext header to the sink and feeds it into
/// the MAC. Every chunk written afterwards is enciphered, written out,
/// and MAC-accumulated in submission order (the MAC covers ciphertext,
/// not plaintext). [`EncryptWriter::finish`] must be called when done:
/// it appends the signature and wipes the key material. A writer dropped
/// without finishing leaves the container unsigned and unverifiable.
pub struct EncryptWriter<W: Write> {
    sink: Option<W>,
    ring: Option<CryptoRing>,
}

impl<W: Write> EncryptWriter<W> {
    /// Opens an encrypt session over `sink`.
    ///
    /// Generates a fresh header from `cost`, derives the session keys,
    /// and writes the encoded header before returning.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::EmptyPassword`] for a zero-length password
    /// (nothing is written to the sink), [`FormatError::InvalidCostParams`]
    /// if the KDF rejects `cost`, or the sink's I/O error verbatim.
    pub fn new(password: &[u8], cost: CostParams, mut sink: W) -> Result<Self, FormatError> {
        if password.is_empty() {
            return Err(FormatError::EmptyPassword);
        }

        let header = CryptoHeader::generate(cost);
        let mut ring = CryptoRing::derive(password, &header)?;

        // The header goes out unencrypted so decryption can recover the
        // cost parameters and salt/IV, but it is still signed.
        let encoded = header.encode();
        sink.write_all(&encoded)?;
        ring.mac_update(&encoded);

        Ok(Self { sink: Some(sink), ring: Some(ring) })
    }

    /// Finalizes the container: appends the signature over
    /// header‖ciphertext, wipes the key material, flushes, and returns
    /// the sink.
    ///
    /// # Errors
    ///
    /// Returns the sink's I/O error verbatim.
    pub fn finish(mut self) -> Result<W, FormatError> {
        // Both fields are only ever taken here; `self` still exists for
        // Drop afterwards, which must see them emptied.
        let mut ring = self.ring.take().expect("finish consumes the writer");
        let mut sink = self.sink.take().expect("finish consumes the writer");

        let signature = ring.signature();
        sink.write_all(&signature)?;
        ring.destroy();
        sink.flush()?;

        Ok(sink)
    }
}

impl<W: Write> Write for EncryptWriter<W> {
    /// Enciphers `buf` and writes the ciphertext to the sink, feeding the
    /// ciphertext into the MAC.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let ring = self.ring.as_mut().expect("ring lives until finish");
        let sink = self.sink.as_mut().expect("sink lives until finish");

        let mut chunk = buf.to_vec();
        ring.apply_keystream(&mut chunk);
        sink.write_all(&chunk)?;
        ring.mac_update(&chunk);

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sink.as_mut().expect("sink lives until finish").flush()
    }
}

impl<W: Write> Drop for EncryptWriter<W> {
    fn drop(&mut self) {
        if self.ring.is_some() {
            tracing::warn!("encrypt writer dropped without finish; the container is unsigned");
        }
    }
}

/// Encrypts the file at `input` into a new container at `output`.
///
/// # Errors
///
/// Returns [`FormatError::EmptyPassword`] before touching the
/// filesystem, the open error if `input` cannot be read, or the create
/// error if `output` already exists (the output is opened with
/// `create_new`; nothing is ever overwritten).
pub fn encrypt_file(password: &[u8], cost: CostParams, input: &Path, output: &Path) -> Result<(), FormatError> {
    if password.is_empty() {
        return Err(FormatError::EmptyPassword);
    }

    let mut source = BufReader::new(File::open(input)?);
    let sink = BufWriter::new(OpenOptions::new().write(true).create_new(true).open(output)?);

    let mut writer = EncryptWriter::new(password, cost, sink)?;
    copy_into(&mut source, &mut writer)?;
    writer.finish()?;

    Ok(())
}

/// `io::copy` with the error lifted into the format error type.
fn copy_into<R: Read, W: Write>(source: &mut R, sink: &mut W) -> Result<u64, FormatError> {
    Ok(io::copy(source, sink)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::v1::OVERHEAD_LEN;

    const TEST_COST: CostParams = CostParams { time: 1, memory: 8 * 1024, threads: 1 };

    #[test]
    fn test_empty_password_writes_nothing() {
        let sink: Vec<u8> = Vec::new();
        match EncryptWriter::new(b"", TEST_COST, sink) {
            Err(FormatError::EmptyPassword) => {}
            other => panic!("expected EmptyPassword, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_container_length() {
        let mut writer = EncryptWriter::new(b"testpassword", TEST_COST, Vec::new()).unwrap();
        let payload = [0xabu8; 1024];
        writer.write_all(&payload).unwrap();
        let container = writer.finish().unwrap();
        assert_eq!(container.len(), OVERHEAD_LEN + payload.len());
    }

    #[test]
    fn test_empty_payload_container() {
        let writer = EncryptWriter::new(b"testpassword", TEST_COST, Vec::new()).unwrap();
        let container = writer.finish().unwrap();
        assert_eq!(container.len(), OVERHEAD_LEN);
    }

    #[test]
    fn test_ciphertext_differs_from_plaintext() {
        use crate::format::v1::HEADER_LEN;

        let mut writer = EncryptWriter::new(b"testpassword", TEST_COST, Vec::new()).unwrap();
        let payload = [0u8; 256];
        writer.write_all(&payload).unwrap();
        let container = writer.finish().unwrap();
        assert_ne!(&container[HEADER_LEN..HEADER_LEN + payload.len()], payload.as_slice());
    }

    #[test]
    fn test_encrypt_file_refuses_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("plain.txt");
        let output = dir.path().join("plain.txt.lky");
        std::fs::write(&input, b"payload").unwrap();
        std::fs::write(&output, b"already here").unwrap();

        match encrypt_file(b"testpassword", TEST_COST, &input, &output) {
            Err(FormatError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::AlreadyExists),
            other => panic!("expected AlreadyExists, got {other:?}"),
        }
    }

    #[test]
    fn test_encrypt_file_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("nonexistent.txt");
        let output = dir.path().join("out.lky");

        match encrypt_file(b"testpassword", TEST_COST, &input, &output) {
            Err(FormatError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            other => panic!("expected NotFound, got {other:?}"),
        }
        assert!(!output.exists());
    }
}
