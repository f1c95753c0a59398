//! Checksum utilities for file fingerprinting and record signatures

use crate::error::Result;
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;

/// Field separator used when hashing an ordered tuple of record fields.
///
/// ASCII unit separator; it cannot appear in normalized field values, so two
/// distinct field tuples can never collapse to the same preimage.
pub const FIELD_SEPARATOR: char = '\u{1f}';

/// Compute the SHA-256 digest of a file's full byte content, hex encoded.
pub fn compute_file_sha256(path: impl AsRef<Path>) -> Result<String> {
    let mut file = std::fs::File::open(path)?;
    compute_sha256(&mut file)
}

/// Compute the SHA-256 digest of any readable source, hex encoded.
pub fn compute_sha256<R: Read>(reader: &mut R) -> Result<String> {
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Hash an ordered tuple of field values into a content signature.
///
/// Fields are joined with [`FIELD_SEPARATOR`] before hashing, so the digest
/// is sensitive to field order and to empty-vs-missing distinctions encoded
/// by the caller.
pub fn hash_fields<'a, I>(fields: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut hasher = Sha256::new();
    let mut first = true;
    for field in fields {
        if !first {
            hasher.update([FIELD_SEPARATOR as u8]);
        }
        first = false;
        hasher.update(field.as_bytes());
    }
    hex::encode(hasher.finalize())
}
