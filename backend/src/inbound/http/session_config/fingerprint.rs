//! Session key fingerprints for startup logs.
//!
//! Lets operators confirm which cookie key a replica loaded without the key
//! material ever reaching the log stream.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

/// Bytes of the digest kept before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// Hex-encoded prefix of the SHA-256 digest of the key's signing half.
///
/// # Examples
///
/// ```rust
/// use actix_web::cookie::Key;
/// use event_manager::inbound::http::session_config::fingerprint::key_fingerprint;
///
/// let fp = key_fingerprint(&Key::generate());
/// assert_eq!(fp.len(), 16);
/// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}
