//! Content digests and the digest-to-blob-path mapping.
//!
//! Manifests reference blobs as `<algorithm>:<hex>`. On disk the store names
//! the blob file `<algorithm>-<hex>` directly under `blobs/`, with no
//! directory sharding. That flat mapping is an external contract with the
//! Ollama store and must not be changed here.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::utils::errors::{BackupError, Result};

/// Digest algorithms the store is known to use.
const KNOWN_ALGORITHMS: &[(&str, usize)] = &[("sha256", 64)];

/// A parsed, validated content digest. Used as the deduplication key: two
/// models referencing the same digest map to the same blob file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest {
    algorithm: String,
    hex: String,
}

impl Digest {
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// The blob's file name under `blobs/`, e.g. `sha256-ab12...`.
    pub fn blob_file_name(&self) -> String {
        format!("{}-{}", self.algorithm, self.hex)
    }

    /// The blob's expected location in the store. Pure function of the digest
    /// and the catalog root.
    pub fn blob_path(&self, catalog_root: &Path) -> PathBuf {
        catalog_root.join("blobs").join(self.blob_file_name())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.hex)
    }
}

impl FromStr for Digest {
    type Err = BackupError;

    fn from_str(s: &str) -> Result<Self> {
        let bad = |reason: &str| BackupError::BadDigest {
            digest: s.to_string(),
            reason: reason.to_string(),
        };

        let (algorithm, hex) = s
            .split_once(':')
            .ok_or_else(|| bad("expected `<algorithm>:<hex>`"))?;

        let expected_len = KNOWN_ALGORITHMS
            .iter()
            .find(|(name, _)| *name == algorithm)
            .map(|(_, len)| *len)
            .ok_or_else(|| bad("unknown digest algorithm"))?;

        if hex.len() != expected_len {
            return Err(bad("wrong hash length"));
        }
        if !hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()) {
            return Err(bad("hash is not lowercase hexadecimal"));
        }

        Ok(Self {
            algorithm: algorithm.to_string(),
            hex: hex.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn hex(c: char) -> String {
        std::iter::repeat(c).take(64).collect()
    }

    #[test]
    fn test_parse_valid_digest() {
        let raw = format!("sha256:{}", hex('a'));
        let digest: Digest = raw.parse().unwrap();
        assert_eq!(digest.algorithm(), "sha256");
        assert_eq!(digest.to_string(), raw);
    }

    #[test]
    fn test_blob_path_is_flat() {
        let digest: Digest = format!("sha256:{}", hex('b')).parse().unwrap();
        assert_eq!(digest.blob_file_name(), format!("sha256-{}", hex('b')));
        assert_eq!(
            digest.blob_path(Path::new("/store")),
            Path::new("/store/blobs").join(format!("sha256-{}", hex('b')))
        );
    }

    #[test]
    fn test_same_digest_same_path() {
        let a: Digest = format!("sha256:{}", hex('c')).parse().unwrap();
        let b: Digest = format!("sha256:{}", hex('c')).parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.blob_path(Path::new("/s")), b.blob_path(Path::new("/s")));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for raw in [
            "sha256".to_string(),                 // no separator
            format!("md5:{}", hex('a')),          // unknown algorithm
            "sha256:abc".to_string(),             // too short
            format!("sha256:{}", hex('g')),       // not hex
            format!("sha256:{}", hex('A')),       // uppercase
        ] {
            let result: Result<Digest> = raw.parse();
            assert!(
                matches!(result, Err(BackupError::BadDigest { .. })),
                "expected rejection of {raw:?}"
            );
        }
    }
}
