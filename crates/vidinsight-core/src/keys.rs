//! Unique key generation for uploaded videos.
//!
//! Key format: `{epoch millis}_{6 random base-36 chars}.{extension}`. The same key is
//! the storage object key; with the extension stripped it is the result route id.

use chrono::Utc;
use rand::Rng;

use crate::constants::{DEFAULT_VIDEO_EXTENSION, KEY_SUFFIX_LEN};

const BASE36_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a collision-resistant key for `original_name` using the current time.
pub fn generate_unique_key(original_name: &str) -> String {
    generate_key_at(original_name, Utc::now().timestamp_millis(), &mut rand::rng())
}

/// Generate a key for a fixed timestamp and random source.
pub fn generate_key_at<R: Rng + ?Sized>(
    original_name: &str,
    timestamp_millis: i64,
    rng: &mut R,
) -> String {
    format!(
        "{}_{}.{}",
        timestamp_millis,
        random_base36(rng, KEY_SUFFIX_LEN),
        key_extension(original_name)
    )
}

/// Extension of `name`: the text after the last `.`, or `mp4` when there is none.
pub fn key_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext,
        _ => DEFAULT_VIDEO_EXTENSION,
    }
}

/// Route id for a generated key: everything before the first `.`.
pub fn route_id_for_key(key: &str) -> &str {
    key.split_once('.').map(|(stem, _)| stem).unwrap_or(key)
}

fn random_base36<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| BASE36_ALPHABET[rng.random_range(0..BASE36_ALPHABET.len())] as char)
        .collect()
}
