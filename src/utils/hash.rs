//! SHA-256 file hashing.

use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;

use crate::core::Result;

/// Lowercase hex SHA-256 of the file at `path`, streamed in 64 KiB chunks.
///
/// # Errors
///
/// Returns [`BinError::Io`](crate::core::BinError::Io) when the file cannot be read.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0_u8; 64 * 1024];
    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_value() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("file");
        std::fs::write(&path, "hello world").unwrap();
        assert_eq!(
            sha256_file(&path).unwrap(),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_sha256_missing_file() {
        assert!(sha256_file(Path::new("/nonexistent/binresolve/file")).is_err());
    }
}
