//! Content revisions for emitted files.
//!
//! Precache entries carry a revision so a service worker can tell when a file
//! with a stable (unhashed) name changed between builds.
//!
//! # Usage
//!
//! ```ignore
//! use crate::utils::hash;
//!
//! let rev = hash::revision(b"console.log(1)"); // -> "3f1c0e5a9b2d7c41"
//! ```

use blake3::Hasher;

/// Number of hex characters kept from the blake3 digest.
const REVISION_LEN: usize = 16;

/// Compute a short hex revision from byte data.
#[inline]
pub fn revision<T: AsRef<[u8]> + ?Sized>(data: &T) -> String {
    let mut hasher = Hasher::new();
    hasher.update(data.as_ref());
    let digest = hasher.finalize();
    let mut hex = hex::encode(digest.as_bytes());
    hex.truncate(REVISION_LEN);
    hex
}
