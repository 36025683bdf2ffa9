//! MWS service implementations.
//!
//! Each service is a thin adapter over the request dispatcher: it assembles
//! query parameters for one API section and unwraps the normalized response.
//! - Orders: order listing and retrieval
//! - Pricing: competitive and own-offer pricing lookups
//! - Products: catalog matching and category lookups
//! - Feeds: bulk-update submission
//! - Reports: asynchronous report pipeline
//! - Sellers: marketplace participation and recommendations

mod feeds;
mod orders;
mod pricing;
mod products;
mod reports;
mod sellers;

pub use feeds::{FeedsService, INVENTORY_FEED, PRICING_FEED};
pub use orders::{ListOrdersRequest, OrdersService};
pub use pricing::PricingService;
pub use products::{MatchedProducts, ProductsService};
pub use reports::ReportsService;
pub use sellers::SellersService;
