//! Marketplace identifier routing table.
//!
//! The table is immutable and process-wide. Each marketplace id maps to the
//! regional API host that requests for that marketplace must be signed
//! against.

/// Marketplace id to region host, one entry per supported marketplace.
const MARKETPLACE_HOSTS: &[(&str, &str)] = &[
    ("A2EUQ1WTGCTBG2", "mws.amazonservices.ca"),
    ("ATVPDKIKX0DER", "mws.amazonservices.com"),
    ("A1AM78C64UM0Y8", "mws.amazonservices.com.mx"),
    ("A1PA6795UKMFR9", "mws-eu.amazonservices.com"),
    ("A1RKKUPIHCS9HS", "mws-eu.amazonservices.com"),
    ("A13V1IB3VIYZZH", "mws-eu.amazonservices.com"),
    ("A21TJRUUN4KGV", "mws.amazonservices.in"),
    ("APJ6JRA9NG5V4", "mws-eu.amazonservices.com"),
    ("A1F83G8C2ARO7P", "mws-eu.amazonservices.com"),
    ("A1VC38T7YXB528", "mws.amazonservices.jp"),
    ("AAHKV2X7AFYLW", "mws.amazonservices.com.cn"),
];

/// Marketplace ids attached by default to requests that do not address a
/// marketplace explicitly. Requests carrying their own `MarketplaceId` or
/// `MarketplaceIdList.*` parameter drop these.
pub const DEFAULT_MARKETPLACE_IDS: [&str; 5] = [
    "A1F83G8C2ARO7P",
    "A1PA6795UKMFR9",
    "A1RKKUPIHCS9HS",
    "A13V1IB3VIYZZH",
    "APJ6JRA9NG5V4",
];

/// Resolve the region host for a marketplace id.
pub(crate) fn region_host(marketplace_id: &str) -> Option<&'static str> {
    MARKETPLACE_HOSTS
        .iter()
        .find(|(id, _)| *id == marketplace_id)
        .map(|(_, host)| *host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_marketplaces_resolve() {
        assert_eq!(region_host("ATVPDKIKX0DER"), Some("mws.amazonservices.com"));
        assert_eq!(
            region_host("A1F83G8C2ARO7P"),
            Some("mws-eu.amazonservices.com")
        );
        assert_eq!(
            region_host("A1VC38T7YXB528"),
            Some("mws.amazonservices.jp")
        );
    }

    #[test]
    fn test_unknown_marketplace_is_none() {
        assert_eq!(region_host("ZZZZZZZZZZZZZZ"), None);
    }

    #[test]
    fn test_default_marketplaces_are_routable() {
        for id in DEFAULT_MARKETPLACE_IDS {
            assert!(region_host(id).is_some(), "{id} missing from host table");
        }
    }
}
