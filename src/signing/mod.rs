//! Request signing (signature version 2).
//!
//! The service authenticates requests by an HMAC-SHA256 signature over a
//! canonical string built from the HTTP method, region host, path, and the
//! sorted, percent-encoded query parameters. The base64 digest travels as
//! the `Signature` parameter, appended after every signed parameter.

mod canonical;

pub use canonical::{canonical_query, percent_encode, string_to_sign};

use crate::types::ParameterList;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Value of the `SignatureMethod` parameter.
pub const SIGNATURE_METHOD: &str = "HmacSHA256";

/// Value of the `SignatureVersion` parameter.
pub const SIGNATURE_VERSION: &str = "2";

/// Format a timestamp the way the service expects: UTC ISO-8601 truncated to
/// whole seconds with literal zero milliseconds.
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S.000Z").to_string()
}

/// Calculate HMAC-SHA256.
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Sign a request and return the base64 signature that becomes the
/// `Signature` parameter.
///
/// `params` must be the final parameter set: defaults merged, exclusivity
/// rules applied. The signature covers exactly what will be sent.
pub fn sign(
    method: &str,
    host: &str,
    path: &str,
    params: &ParameterList,
    secret_key: &str,
) -> String {
    let string_to_sign = canonical::string_to_sign(method, host, path, params);
    BASE64.encode(hmac_sha256(secret_key.as_bytes(), string_to_sign.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn test_format_timestamp_has_literal_zero_millis() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        assert_eq!(format_timestamp(&dt), "2024-01-15T12:00:00.000Z");

        // Sub-second precision is truncated, never rounded into the output.
        let dt = Utc
            .with_ymd_and_hms(2024, 1, 15, 12, 0, 0)
            .unwrap()
            .checked_add_signed(chrono::Duration::milliseconds(987))
            .unwrap();
        assert_eq!(format_timestamp(&dt), "2024-01-15T12:00:00.000Z");
    }

    #[test]
    fn test_hmac_sha256_length() {
        assert_eq!(hmac_sha256(b"key", b"message").len(), 32);
    }

    #[test]
    fn test_sign_matches_known_vector() {
        // Frozen ListOrders request; the expected value was computed
        // independently from the documented algorithm.
        let params: ParameterList = [
            ("AWSAccessKeyId", "AKIAEXAMPLE"),
            ("Action", "ListOrders"),
            ("CreatedAfter", "2024-01-01T00:00:00.000Z"),
            ("MarketplaceId.Id.1", "A1F83G8C2ARO7P"),
            ("MarketplaceId.Id.2", "A1PA6795UKMFR9"),
            ("MarketplaceId.Id.3", "A1RKKUPIHCS9HS"),
            ("MarketplaceId.Id.4", "A13V1IB3VIYZZH"),
            ("MarketplaceId.Id.5", "APJ6JRA9NG5V4"),
            ("SellerId", "SELLER123"),
            ("SignatureMethod", "HmacSHA256"),
            ("SignatureVersion", "2"),
            ("Timestamp", "2024-01-15T12:00:00.000Z"),
            ("Version", "2013-09-01"),
        ]
        .into_iter()
        .collect();

        let signature = sign(
            "POST",
            "mws-eu.amazonservices.com",
            "/Orders/2013-09-01",
            &params,
            "secret123",
        );
        assert_eq!(signature, "vJcxBviQHbq9KKgFxL9HIaQBIXaSvEW7F47ZqajkWxk=");
    }

    #[test]
    fn test_sign_is_insertion_order_independent() {
        let forward: ParameterList = [("Action", "GetOrder"), ("Version", "2013-09-01")]
            .into_iter()
            .collect();
        let backward: ParameterList = [("Version", "2013-09-01"), ("Action", "GetOrder")]
            .into_iter()
            .collect();

        let host = "mws.amazonservices.com";
        assert_eq!(
            sign("POST", host, "/", &forward, "secret"),
            sign("POST", host, "/", &backward, "secret")
        );
    }

    proptest! {
        #[test]
        fn prop_signature_independent_of_insertion_order(
            entries in proptest::collection::btree_map("[A-Za-z0-9.]{1,12}", "[ -~]{0,16}", 1..8)
        ) {
            let mut pairs: Vec<(String, String)> = entries.into_iter().collect();
            let forward: ParameterList = pairs.clone().into_iter().collect();
            pairs.reverse();
            let backward: ParameterList = pairs.into_iter().collect();

            prop_assert_eq!(
                sign("POST", "mws.amazonservices.com", "/", &forward, "secret"),
                sign("POST", "mws.amazonservices.com", "/", &backward, "secret")
            );
        }
    }
}
