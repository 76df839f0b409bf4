//! Content identity: the git blob hash of a file's bytes.

use crate::error::{AttnError, Result};
use sha1::{Digest, Sha1};
use std::fmt;

/// A 20-byte SHA-1 blob hash identifying a file's exact byte content.
///
/// The value is bit-compatible with `git hash-object`: the same bytes give
/// the same id whether git computed it or we did, and the file's name or
/// location never enters the hash.
///
/// # Examples
///
/// ```
/// use attn_core::ContentId;
///
/// let id = ContentId::hash_blob(b"");
/// assert_eq!(id.as_hex(), "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentId([u8; 20]);

impl ContentId {
    /// The length of a ContentId in bytes.
    pub const LEN: usize = 20;

    /// The length of a ContentId as a hex string.
    pub const HEX_LEN: usize = 40;

    /// Creates a ContentId from raw bytes.
    #[inline]
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Returns the raw digest bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns this ContentId as a lowercase hex string of exactly 40 characters.
    pub fn as_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parses a ContentId from a hex string.
    ///
    /// Surrounding whitespace is ignored, so raw `git hash-object` output
    /// parses directly.
    ///
    /// # Errors
    ///
    /// Returns `AttnError::InvalidContentId` if the string is not valid hex
    /// or is not exactly 40 characters long.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.len() != Self::HEX_LEN {
            return Err(AttnError::InvalidContentId(format!(
                "expected {} hex chars, got {}",
                Self::HEX_LEN,
                s.len()
            )));
        }

        let bytes = hex::decode(s).map_err(|e| AttnError::InvalidContentId(e.to_string()))?;

        let arr: [u8; 20] = bytes
            .try_into()
            .map_err(|_| AttnError::InvalidContentId("invalid length".to_string()))?;

        Ok(Self(arr))
    }

    /// Computes the blob hash of raw file content.
    ///
    /// Hashes `"blob <len>\0"` followed by the content, as git does.
    pub fn hash_blob(data: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(blob_header(data.len()));
        hasher.update(data);
        let digest = hasher.finalize();

        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_hex())
    }
}

impl fmt::Debug for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentId({}...)", &self.as_hex()[..12])
    }
}

/// Builds the git blob header for content of `len` bytes.
pub(crate) fn blob_header(len: usize) -> Vec<u8> {
    let mut out = format!("blob {}", len).into_bytes();
    out.push(0);
    out
}
