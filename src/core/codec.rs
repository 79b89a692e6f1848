//! Whole-container codec for the name → cookie map.
//!
//! Container layout:
//! - magic `CKVAULT1` (8 bytes)
//! - format version (1 byte)
//! - SHA-256 of the body (32 bytes)
//! - body: JSON object, name → record
//!
//! The codec only ever sees ciphertext values; encryption happens above
//! it. The checksum is unkeyed so a container opens (structure validated)
//! under any key, leaving wrong-key failures to surface per record.

use crate::constants::{CHECKSUM_LEN, CONTAINER_MAGIC, FORMAT_VERSION, HEADER_LEN};
use crate::core::error::StoreError;
use crate::models::cookie::Cookie;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

pub fn encode(cookies: &BTreeMap<String, Cookie>) -> Result<Vec<u8>, StoreError> {
    let body = serde_json::to_vec(cookies)
        .map_err(|e| StoreError::Codec(format!("serialize container body: {}", e)))?;
    let mut out = Vec::with_capacity(HEADER_LEN + body.len());
    out.extend_from_slice(CONTAINER_MAGIC);
    out.push(FORMAT_VERSION);
    out.extend_from_slice(&Sha256::digest(&body));
    out.extend_from_slice(&body);
    Ok(out)
}

/// Decode a container. An empty byte stream is the first-run case and
/// yields an empty map, not an error.
pub fn decode(bytes: &[u8]) -> Result<BTreeMap<String, Cookie>, StoreError> {
    if bytes.is_empty() {
        return Ok(BTreeMap::new());
    }
    if bytes.len() < HEADER_LEN {
        return Err(StoreError::Codec(format!(
            "container truncated: {} bytes, header needs {}",
            bytes.len(),
            HEADER_LEN
        )));
    }
    let (magic, rest) = bytes.split_at(CONTAINER_MAGIC.len());
    if magic != CONTAINER_MAGIC {
        return Err(StoreError::Codec("bad container magic".to_string()));
    }
    let version = rest[0];
    if version != FORMAT_VERSION {
        return Err(StoreError::Codec(format!(
            "unsupported container version {}",
            version
        )));
    }
    let checksum = &rest[1..1 + CHECKSUM_LEN];
    let body = &rest[1 + CHECKSUM_LEN..];
    if Sha256::digest(body).as_slice() != checksum {
        return Err(StoreError::Codec("container checksum mismatch".to_string()));
    }
    serde_json::from_slice(body)
        .map_err(|e| StoreError::Codec(format!("parse container body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn sample_map() -> BTreeMap<String, Cookie> {
        let mut map = BTreeMap::new();
        for (name, value) in [("session", b"ciphertext-a".as_slice()), ("csrf", b"ct-b")] {
            map.insert(
                name.to_string(),
                Cookie {
                    name: name.to_string(),
                    value: value.to_vec(),
                    domain: "example.com".into(),
                    expires: Utc::now() + Duration::days(7),
                    max_age: 604_800,
                    http_only: name == "session",
                },
            );
        }
        map
    }

    #[test]
    fn test_round_trip_law() {
        let map = sample_map();
        let bytes = encode(&map).unwrap();
        assert_eq!(decode(&bytes).unwrap(), map);
    }

    #[test]
    fn test_empty_bytes_decode_to_empty_map() {
        assert!(decode(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_empty_map_round_trip() {
        let map = BTreeMap::new();
        let bytes = encode(&map).unwrap();
        assert!(decode(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_encode_is_deterministic() {
        let map = sample_map();
        assert_eq!(encode(&map).unwrap(), encode(&map).unwrap());
    }

    #[test]
    fn test_truncated_header_rejected() {
        let err = decode(&encode(&sample_map()).unwrap()[..HEADER_LEN - 1]).unwrap_err();
        assert!(matches!(err, StoreError::Codec(_)));
    }

    #[test]
    fn test_bad_magic_rejected() {
        let mut bytes = encode(&sample_map()).unwrap();
        bytes[0] ^= 0xff;
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, StoreError::Codec(ref m) if m.contains("magic")));
    }

    #[test]
    fn test_unknown_version_rejected() {
        let mut bytes = encode(&sample_map()).unwrap();
        bytes[CONTAINER_MAGIC.len()] = 99;
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, StoreError::Codec(ref m) if m.contains("version")));
    }

    #[test]
    fn test_body_corruption_fails_checksum() {
        let mut bytes = encode(&sample_map()).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, StoreError::Codec(ref m) if m.contains("checksum")));
    }

    #[test]
    fn test_checksum_corruption_rejected() {
        let mut bytes = encode(&sample_map()).unwrap();
        bytes[CONTAINER_MAGIC.len() + 1] ^= 0x01;
        assert!(decode(&bytes).is_err());
    }
}
