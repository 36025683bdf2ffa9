//! Amazon MWS Integration Module
//!
//! Production-ready, type-safe client for the Amazon Marketplace Web Service.
//!
//! # Features
//!
//! - **Canonical signing**: deterministic parameter ordering with HMAC-SHA256
//!   signatures and marketplace-based region routing
//! - **Response normalization**: XML responses become predictable
//!   object/array/scalar trees; repeatable elements are always sequences
//! - **Feeds**: envelope construction, XML encoding, Content-MD5 headers
//! - **Reports**: request, poll, fetch, and tab-delimited parsing
//! - **Services**: orders, pricing, products, feeds, reports, sellers
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use amazon_mws::{ListOrdersRequest, MwsClient, MwsClientBuilder, MwsConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), amazon_mws::MwsError> {
//!     let config = MwsConfig::builder()
//!         .seller_id("A2TESTSELLER")
//!         .marketplace_id("A1F83G8C2ARO7P")
//!         .access_key_id("AKIA...")
//!         .secret_key("...")
//!         .build()?;
//!
//!     let client = MwsClientBuilder::new().config(config).build()?;
//!
//!     let since = chrono::Utc::now() - chrono::Duration::days(7);
//!     let orders = client.orders().list_orders(ListOrdersRequest::unshipped(since)).await?;
//!     println!("{} open orders", orders.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod dispatch;
pub mod endpoints;
pub mod error;
pub mod feeds;
pub mod mocks;
pub mod reports;
pub mod services;
pub mod signing;
pub mod transport;
pub mod types;
pub mod xml;

// Re-export main types at crate root
pub use client::{MwsClient, MwsClientBuilder, MwsClientImpl};
pub use config::{MwsConfig, MwsConfigBuilder, DEFAULT_MARKETPLACE_IDS};
pub use dispatch::{Dispatcher, ResponseBody};
pub use endpoints::{EndpointDescriptor, HttpMethod};
pub use error::{ConfigurationError, MwsError, TransportError};
pub use feeds::{FeedEnvelope, FeedMessage, OperationType};
pub use reports::{ProcessingStatus, Report, ReportRequestStatus, ReportRow};
pub use services::{
    FeedsService, ListOrdersRequest, MatchedProducts, OrdersService, PricingService,
    ProductsService, ReportsService, SellersService,
};
pub use transport::{HttpRequest, HttpResponse, HttpTransport};
pub use types::{FeedSubmissionInfo, ParameterList};
pub use xml::{XmlNode, ATTRIBUTES_KEY, TEXT_KEY};

/// Create a client configured from `MWS_*` environment variables.
///
/// Reads `MWS_SELLER_ID`, `MWS_MARKETPLACE_ID`, `MWS_ACCESS_KEY_ID`,
/// `MWS_SECRET_KEY`, and optionally `MWS_AUTH_TOKEN`.
pub fn create_client_from_env() -> Result<MwsClientImpl> {
    MwsClientBuilder::new().from_env().build()
}

/// Create a client with explicit configuration.
pub fn create_client(config: MwsConfig) -> Result<MwsClientImpl> {
    MwsClientBuilder::new().config(config).build()
}

/// Result type alias for MWS operations.
pub type Result<T> = std::result::Result<T, MwsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_exports() {
        // Verify all major types are exported
        let _ = std::any::type_name::<MwsError>();
        let _ = std::any::type_name::<MwsConfig>();
        let _ = std::any::type_name::<XmlNode>();
        let _ = std::any::type_name::<FeedEnvelope>();
        let _ = std::any::type_name::<Report>();
    }
}
