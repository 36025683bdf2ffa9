//! Static registry of MWS operations.
//!
//! Each entry maps a logical operation name to the HTTP method, API section
//! path, section version, and `Action` parameter value the service expects.
//! The table is read-only and initialized once per process.

use crate::error::MwsError;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// HTTP method used by an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET.
    Get,
    /// HTTP POST.
    Post,
}

impl HttpMethod {
    /// Wire name of the method, as used in the string-to-sign.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// Immutable descriptor of a single MWS operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointDescriptor {
    /// Logical operation name used for lookup.
    pub operation: &'static str,
    /// HTTP method.
    pub method: HttpMethod,
    /// Request path of the API section.
    pub path: &'static str,
    /// API section version, sent as the `Version` parameter.
    pub version: &'static str,
    /// Value of the `Action` parameter.
    pub action: &'static str,
}

const ORDERS_PATH: &str = "/Orders/2013-09-01";
const ORDERS_VERSION: &str = "2013-09-01";
const PRODUCTS_PATH: &str = "/Products/2011-10-01";
const PRODUCTS_VERSION: &str = "2011-10-01";
const FEEDS_REPORTS_PATH: &str = "/";
const FEEDS_REPORTS_VERSION: &str = "2009-01-01";
const SELLERS_PATH: &str = "/Sellers/2011-07-01";
const SELLERS_VERSION: &str = "2011-07-01";
const RECOMMENDATIONS_PATH: &str = "/Recommendations/2013-04-01";
const RECOMMENDATIONS_VERSION: &str = "2013-04-01";

macro_rules! endpoint {
    ($operation:literal, $path:expr, $version:expr) => {
        EndpointDescriptor {
            operation: $operation,
            method: HttpMethod::Post,
            path: $path,
            version: $version,
            action: $operation,
        }
    };
}

/// Every operation the client can dispatch.
const ENTRIES: &[EndpointDescriptor] = &[
    // Orders
    endpoint!("ListOrders", ORDERS_PATH, ORDERS_VERSION),
    endpoint!("ListOrdersByNextToken", ORDERS_PATH, ORDERS_VERSION),
    endpoint!("GetOrder", ORDERS_PATH, ORDERS_VERSION),
    endpoint!("ListOrderItems", ORDERS_PATH, ORDERS_VERSION),
    endpoint!("ListOrderItemsByNextToken", ORDERS_PATH, ORDERS_VERSION),
    // Products and pricing
    endpoint!("GetCompetitivePricingForASIN", PRODUCTS_PATH, PRODUCTS_VERSION),
    endpoint!("GetLowestOfferListingsForASIN", PRODUCTS_PATH, PRODUCTS_VERSION),
    endpoint!("GetLowestPricedOffersForASIN", PRODUCTS_PATH, PRODUCTS_VERSION),
    endpoint!("GetMyPriceForSKU", PRODUCTS_PATH, PRODUCTS_VERSION),
    endpoint!("GetMyPriceForASIN", PRODUCTS_PATH, PRODUCTS_VERSION),
    endpoint!("GetMatchingProductForId", PRODUCTS_PATH, PRODUCTS_VERSION),
    endpoint!("GetProductCategoriesForSKU", PRODUCTS_PATH, PRODUCTS_VERSION),
    endpoint!("GetProductCategoriesForASIN", PRODUCTS_PATH, PRODUCTS_VERSION),
    // Feeds
    endpoint!("SubmitFeed", FEEDS_REPORTS_PATH, FEEDS_REPORTS_VERSION),
    endpoint!("GetFeedSubmissionList", FEEDS_REPORTS_PATH, FEEDS_REPORTS_VERSION),
    endpoint!("GetFeedSubmissionResult", FEEDS_REPORTS_PATH, FEEDS_REPORTS_VERSION),
    endpoint!("CancelFeedSubmissions", FEEDS_REPORTS_PATH, FEEDS_REPORTS_VERSION),
    // Reports
    endpoint!("RequestReport", FEEDS_REPORTS_PATH, FEEDS_REPORTS_VERSION),
    endpoint!("GetReportRequestList", FEEDS_REPORTS_PATH, FEEDS_REPORTS_VERSION),
    endpoint!("CancelReportRequests", FEEDS_REPORTS_PATH, FEEDS_REPORTS_VERSION),
    endpoint!("GetReportList", FEEDS_REPORTS_PATH, FEEDS_REPORTS_VERSION),
    endpoint!("GetReport", FEEDS_REPORTS_PATH, FEEDS_REPORTS_VERSION),
    endpoint!("GetReportCount", FEEDS_REPORTS_PATH, FEEDS_REPORTS_VERSION),
    // Sellers
    endpoint!("ListMarketplaceParticipations", SELLERS_PATH, SELLERS_VERSION),
    // Recommendations
    endpoint!("ListRecommendations", RECOMMENDATIONS_PATH, RECOMMENDATIONS_VERSION),
];

static REGISTRY: Lazy<HashMap<&'static str, &'static EndpointDescriptor>> =
    Lazy::new(|| ENTRIES.iter().map(|entry| (entry.operation, entry)).collect());

/// Resolve an operation name to its descriptor.
pub fn resolve(operation: &str) -> Result<&'static EndpointDescriptor, MwsError> {
    REGISTRY
        .get(operation)
        .copied()
        .ok_or_else(|| MwsError::UnknownOperation {
            operation: operation.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_operation() {
        let endpoint = resolve("ListOrders").unwrap();
        assert_eq!(endpoint.method, HttpMethod::Post);
        assert_eq!(endpoint.path, "/Orders/2013-09-01");
        assert_eq!(endpoint.version, "2013-09-01");
        assert_eq!(endpoint.action, "ListOrders");
    }

    #[test]
    fn test_feeds_and_reports_use_root_path() {
        assert_eq!(resolve("SubmitFeed").unwrap().path, "/");
        assert_eq!(resolve("RequestReport").unwrap().version, "2009-01-01");
    }

    #[test]
    fn test_resolve_unknown_operation() {
        let err = resolve("ListWidgets").unwrap_err();
        match err {
            MwsError::UnknownOperation { operation } => assert_eq!(operation, "ListWidgets"),
            other => panic!("expected UnknownOperation, got {other:?}"),
        }
    }

    #[test]
    fn test_registry_has_no_duplicate_names() {
        assert_eq!(REGISTRY.len(), ENTRIES.len());
        assert!(ENTRIES.len() >= 20);
    }

    #[test]
    fn test_http_method_wire_names() {
        assert_eq!(HttpMethod::Get.as_str(), "GET");
        assert_eq!(HttpMethod::Post.as_str(), "POST");
    }
}
