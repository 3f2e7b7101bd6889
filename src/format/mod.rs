//! Container format dispatch.
//!
//! Encryption always writes the newest format version; decryption reads
//! the version field first, checks it against the [`VersionRegistry`],
//! and only then hands the source to the matching codec. Unknown
//! versions are rejected before any key derivation work happens.

use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::LazyLock;

pub mod v1;

use crate::codec::{U16_LEN, get_u16};
use crate::error::FormatError;
use crate::registry::VersionRegistry;

/// The compiled-in format versions, built once and never mutated.
static REGISTRY: LazyLock<VersionRegistry> = LazyLock::new(|| VersionRegistry::new(&[v1::VERSION]));

/// The registry of format versions this build supports.
#[must_use]
pub fn registry() -> &'static VersionRegistry {
    &REGISTRY
}

/// Opens an encrypting writer over `sink`, using the newest format
/// version.
///
/// [`v1::EncryptWriter::finish`] must be called when done writing, and
/// before the underlying sink is closed, otherwise the signature over
/// the encrypted data is never written.
///
/// # Errors
///
/// See [`v1::EncryptWriter::new`].
pub fn encrypt_stream<W: Write>(password: &[u8], cost: v1::CostParams, sink: W) -> Result<v1::EncryptWriter<W>, FormatError> {
    // Swapping in newer versions here keeps users on the latest format
    // without touching callers.
    v1::EncryptWriter::new(password, cost, sink)
}

/// Opens a verifying, decrypting reader over `source`.
///
/// If the password is wrong or the container was tampered with this
/// fails with [`FormatError::SignatureMismatch`]; the two causes are
/// indistinguishable by design.
///
/// # Errors
///
/// [`FormatError::UnsupportedVersion`] if the declared version is not in
/// the registry, otherwise see [`v1::DecryptReader::new`].
pub fn decrypt_stream<R: Read + Seek>(password: &[u8], mut source: R) -> Result<v1::DecryptReader<R>, FormatError> {
    let version = read_version(&mut source)?;
    if !REGISTRY.is_supported(version) {
        return Err(FormatError::UnsupportedVersion { got: version, supported: REGISTRY.describe().to_owned() });
    }

    source.seek(SeekFrom::Start(0))?;

    // Only one version to dispatch to so far.
    v1::DecryptReader::new(password, source)
}

/// Encrypts the file at `input` into a new container at `output`.
///
/// # Errors
///
/// See [`v1::encrypt_file`].
pub fn encrypt_file(password: &[u8], cost: v1::CostParams, input: &Path, output: &Path) -> Result<(), FormatError> {
    v1::encrypt_file(password, cost, input, output)
}

/// Decrypts the container at `input` into a new plaintext file at
/// `output`.
///
/// # Errors
///
/// See [`v1::decrypt_file`].
pub fn decrypt_file(password: &[u8], input: &Path, output: &Path) -> Result<(), FormatError> {
    v1::decrypt_file(password, input, output)
}

/// Decodes the plaintext header at the front of `bytes` for inspection.
///
/// No keys are derived and nothing is verified; this is the diagnostics
/// view of a container's metadata.
///
/// # Errors
///
/// [`FormatError::TooSmall`] if `bytes` cannot hold a header,
/// [`FormatError::UnsupportedVersion`] if the version field is unknown.
pub fn extract_header(bytes: &[u8]) -> Result<v1::CryptoHeader, FormatError> {
    if bytes.len() < U16_LEN {
        return Err(FormatError::TooSmall);
    }

    let version = get_u16(bytes);
    if !REGISTRY.is_supported(version) {
        return Err(FormatError::UnsupportedVersion { got: version, supported: REGISTRY.describe().to_owned() });
    }

    if bytes.len() < v1::HEADER_LEN {
        return Err(FormatError::TooSmall);
    }

    Ok(v1::CryptoHeader::decode(bytes))
}

/// Reads the raw trailing signature of the container in `source`,
/// without verifying it. Diagnostics only.
///
/// # Errors
///
/// [`FormatError::TooSmall`], [`FormatError::UnsupportedVersion`], or
/// I/O errors verbatim.
pub fn read_trailing_signature<R: Read + Seek>(source: &mut R) -> Result<[u8; v1::SIGNATURE_LEN], FormatError> {
    let version = read_version(source)?;
    if !REGISTRY.is_supported(version) {
        return Err(FormatError::UnsupportedVersion { got: version, supported: REGISTRY.describe().to_owned() });
    }

    v1::read_signature(source)
}

/// Reads the leading version field of `source`.
fn read_version<R: Read + Seek>(source: &mut R) -> Result<u16, FormatError> {
    let total = source.seek(SeekFrom::End(0))?;
    if total < U16_LEN as u64 {
        return Err(FormatError::TooSmall);
    }

    source.seek(SeekFrom::Start(0))?;
    let mut bytes = [0u8; U16_LEN];
    source.read_exact(&mut bytes)?;

    Ok(get_u16(&bytes))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    const TEST_COST: v1::CostParams = v1::CostParams { time: 1, memory: 8 * 1024, threads: 1 };

    #[test]
    fn test_registry_has_v1() {
        assert!(registry().is_supported(v1::VERSION));
        assert_eq!(registry().describe(), "1");
    }

    #[test]
    fn test_version_gate_precedes_key_derivation() {
        // A version-2 header carrying cost parameters no KDF could ever
        // run: if derivation were attempted this would not come back as
        // UnsupportedVersion (or return at all in reasonable time).
        let absurd = v1::CostParams { time: u32::MAX, memory: u32::MAX, threads: u8::MAX };
        let mut bytes = v1::CryptoHeader::generate(absurd).encode().to_vec();
        bytes[0] = 0;
        bytes[1] = 2;
        bytes.extend_from_slice(&[0u8; v1::SIGNATURE_LEN]);

        match decrypt_stream(b"testpassword", Cursor::new(bytes)) {
            Err(FormatError::UnsupportedVersion { got: 2, supported }) => assert_eq!(supported, "1"),
            other => panic!("expected UnsupportedVersion, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_decrypt_stream_empty_input() {
        match decrypt_stream(b"testpassword", Cursor::new(Vec::new())) {
            Err(FormatError::TooSmall) => {}
            other => panic!("expected TooSmall, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_stream_roundtrip_through_dispatcher() {
        use std::io::{Read as _, Write as _};

        let mut writer = encrypt_stream(b"testpassword", TEST_COST, Vec::new()).unwrap();
        writer.write_all(b"dispatcher roundtrip").unwrap();
        let container = writer.finish().unwrap();

        let mut reader = decrypt_stream(b"testpassword", Cursor::new(container)).unwrap();
        let mut plain = Vec::new();
        reader.read_to_end(&mut plain).unwrap();
        assert_eq!(plain, b"dispatcher roundtrip");
    }

    #[test]
    fn test_extract_header() {
        let writer = encrypt_stream(b"testpassword", TEST_COST, Vec::new()).unwrap();
        let container = writer.finish().unwrap();

        let header = extract_header(&container).unwrap();
        assert_eq!(header.format_version(), v1::VERSION);
        assert_eq!(header.cost(), TEST_COST);
    }

    #[test]
    fn test_extract_header_unknown_version() {
        let mut bytes = [0u8; v1::HEADER_LEN];
        bytes[1] = 9;
        assert!(matches!(extract_header(&bytes), Err(FormatError::UnsupportedVersion { got: 9, .. })));
    }

    #[test]
    fn test_extract_header_too_small() {
        assert!(matches!(extract_header(&[]), Err(FormatError::TooSmall)));
        let mut bytes = [0u8; v1::HEADER_LEN - 1];
        bytes[1] = 1;
        assert!(matches!(extract_header(&bytes), Err(FormatError::TooSmall)));
    }

    #[test]
    fn test_read_trailing_signature() {
        let mut writer = encrypt_stream(b"testpassword", TEST_COST, Vec::new()).unwrap();
        std::io::Write::write_all(&mut writer, b"payload").unwrap();
        let container = writer.finish().unwrap();

        let signature = read_trailing_signature(&mut Cursor::new(&container)).unwrap();
        assert_eq!(signature.as_slice(), &container[container.len() - v1::SIGNATURE_LEN..]);
    }
}
