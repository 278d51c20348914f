//! Checksum utilities for content verification

use crate::error::{MediaportError, Result};
use crate::types::ChecksumAlgorithm;
use sha2::{Digest, Sha256, Sha512};
use std::io::Read;

/// Compute checksum for a byte slice
pub fn compute_bytes_checksum(data: &[u8], algorithm: ChecksumAlgorithm) -> Result<String> {
    let mut cursor = std::io::Cursor::new(data);
    compute_checksum(&mut cursor, algorithm)
}

/// Compute checksum for any readable source
pub fn compute_checksum<R: Read>(reader: &mut R, algorithm: ChecksumAlgorithm) -> Result<String> {
    match algorithm {
        ChecksumAlgorithm::Sha256 => {
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
        },
        ChecksumAlgorithm::Sha512 => {
            let mut hasher = Sha512::new();
            let mut buffer = [0u8; 8192];

            loop {
                let bytes_read = reader.read(&mut buffer)?;
                if bytes_read == 0 {
                    break;
                }
                hasher.update(&buffer[..bytes_read]);
            }

            Ok(hex::encode(hasher.finalize()))
        },
    }
}

/// Verify a byte slice against an expected checksum
///
/// Comparison is case-insensitive on the hex digest. Returns a
/// `ChecksumMismatch` error when the digests differ.
pub fn verify_bytes_checksum(
    data: &[u8],
    expected: &str,
    algorithm: ChecksumAlgorithm,
) -> Result<bool> {
    let actual = compute_bytes_checksum(data, algorithm)?;
    if actual.eq_ignore_ascii_case(expected) {
        Ok(true)
    } else {
        Err(MediaportError::ChecksumMismatch {
            expected: expected.to_string(),
            actual,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_compute_checksum_sha256() {
        let data = b"hello world";
        let mut cursor = Cursor::new(data);
        let checksum = compute_checksum(&mut cursor, ChecksumAlgorithm::Sha256).unwrap();
        assert_eq!(checksum, "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9");
    }

    #[test]
    fn test_compute_checksum_sha512() {
        let data = b"hello world";
        let mut cursor = Cursor::new(data);
        let checksum = compute_checksum(&mut cursor, ChecksumAlgorithm::Sha512).unwrap();
        assert_eq!(
            checksum,
            "309ecc489c12d6eb4cc40f50c902f2b4d0ed77ee511a7c7a9bcd3ca86d4cd86f989dd35bc5ff499670da34255b45b0cfd830e81f605dcf7dc5542e93ae9cd76f"
        );
    }

    #[test]
    fn test_verify_bytes_checksum_case_insensitive() {
        let data = b"hello world";
        let lowercase = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";
        let uppercase = lowercase.to_uppercase();

        assert!(verify_bytes_checksum(data, lowercase, ChecksumAlgorithm::Sha256).unwrap());
        assert!(verify_bytes_checksum(data, &uppercase, ChecksumAlgorithm::Sha256).unwrap());
    }

    #[test]
    fn test_verify_bytes_checksum_mismatch() {
        let data = b"hello world";
        let err = verify_bytes_checksum(data, "deadbeef", ChecksumAlgorithm::Sha256).unwrap_err();
        match err {
            MediaportError::ChecksumMismatch { expected, .. } => {
                assert_eq!(expected, "deadbeef");
            },
            other => panic!("unexpected error: {other}"),
        }
    }
}
