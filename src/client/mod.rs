//! MWS client interface and builder.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::config::MwsConfig;
use crate::dispatch::Dispatcher;
use crate::error::MwsError;
use crate::services::{
    FeedsService, OrdersService, PricingService, ProductsService, ReportsService, SellersService,
};
use crate::transport::{HttpTransport, ReqwestTransport};

/// MWS client trait.
pub trait MwsClient: Send + Sync {
    /// Get the orders service.
    fn orders(&self) -> &OrdersService;

    /// Get the pricing service.
    fn pricing(&self) -> &PricingService;

    /// Get the products service.
    fn products(&self) -> &ProductsService;

    /// Get the feeds service.
    fn feeds(&self) -> &FeedsService;

    /// Get the reports service.
    fn reports(&self) -> &ReportsService;

    /// Get the sellers service.
    fn sellers(&self) -> &SellersService;

    /// Get the client configuration.
    fn config(&self) -> &MwsConfig;
}

/// MWS client implementation.
pub struct MwsClientImpl {
    config: Arc<MwsConfig>,
    dispatcher: Arc<Dispatcher>,

    // Lazy-initialized services
    orders: OnceCell<OrdersService>,
    pricing: OnceCell<PricingService>,
    products: OnceCell<ProductsService>,
    feeds: OnceCell<FeedsService>,
    reports: OnceCell<ReportsService>,
    sellers: OnceCell<SellersService>,
}

impl MwsClientImpl {
    /// Create a new client with the given configuration and transport.
    pub fn new(config: MwsConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let config = Arc::new(config);
        let dispatcher = Arc::new(Dispatcher::new(config.clone(), transport));

        Self {
            config,
            dispatcher,
            orders: OnceCell::new(),
            pricing: OnceCell::new(),
            products: OnceCell::new(),
            feeds: OnceCell::new(),
            reports: OnceCell::new(),
            sellers: OnceCell::new(),
        }
    }

    /// Quick check whether the configured credentials are accepted.
    ///
    /// Probes a harmless order-items lookup with a sentinel id; a rejection
    /// complaining about the sentinel means the signature itself was
    /// accepted.
    pub async fn validate_credentials(&self) -> bool {
        match self.orders().list_order_items("validate").await {
            Ok(_) => true,
            Err(MwsError::RemoteService { message, .. }) => {
                message.contains("Invalid AmazonOrderId")
            }
            Err(_) => false,
        }
    }
}

impl MwsClient for MwsClientImpl {
    fn orders(&self) -> &OrdersService {
        self.orders
            .get_or_init(|| OrdersService::new(self.dispatcher.clone()))
    }

    fn pricing(&self) -> &PricingService {
        self.pricing
            .get_or_init(|| PricingService::new(self.config.clone(), self.dispatcher.clone()))
    }

    fn products(&self) -> &ProductsService {
        self.products
            .get_or_init(|| ProductsService::new(self.config.clone(), self.dispatcher.clone()))
    }

    fn feeds(&self) -> &FeedsService {
        self.feeds
            .get_or_init(|| FeedsService::new(self.config.clone(), self.dispatcher.clone()))
    }

    fn reports(&self) -> &ReportsService {
        self.reports
            .get_or_init(|| ReportsService::new(self.dispatcher.clone()))
    }

    fn sellers(&self) -> &SellersService {
        self.sellers
            .get_or_init(|| SellersService::new(self.config.clone(), self.dispatcher.clone()))
    }

    fn config(&self) -> &MwsConfig {
        &self.config
    }
}

impl std::fmt::Debug for MwsClientImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MwsClientImpl")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Builder for the MWS client.
pub struct MwsClientBuilder {
    config: Option<MwsConfig>,
    from_env: bool,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl MwsClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: None,
            from_env: false,
            transport: None,
        }
    }

    /// Use the provided configuration.
    pub fn config(mut self, config: MwsConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env(mut self) -> Self {
        self.from_env = true;
        self
    }

    /// Use a custom HTTP transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<MwsClientImpl, MwsError> {
        let config = match self.config {
            Some(config) => config,
            None if self.from_env => MwsConfig::builder().from_env().build()?,
            None => MwsConfig::builder().build()?,
        };

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::from_config(&config)?),
        };

        Ok(MwsClientImpl::new(config, transport))
    }
}

impl Default for MwsClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
