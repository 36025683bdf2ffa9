//! Configuration types for the MWS client.
//!
//! This module provides the `MwsConfig` type holding credentials, marketplace
//! routing, and transport settings. Validation is eager: a config that builds
//! successfully is guaranteed to have all required credentials and a routable
//! marketplace id.

mod marketplaces;

pub use marketplaces::DEFAULT_MARKETPLACE_IDS;
pub(crate) use marketplaces::region_host;

use crate::error::{ConfigurationError, MwsError};
use secrecy::SecretString;
use std::time::Duration;

/// Fixed application identifier reported in the user-agent header.
pub const APPLICATION_NAME: &str = "mws-integration";

/// Configuration for the MWS client.
///
/// Immutable after construction; shared read-only across services.
#[derive(Clone)]
pub struct MwsConfig {
    /// Seller (merchant) identifier.
    pub seller_id: String,

    /// Home marketplace id; determines the region host.
    pub marketplace_id: String,

    /// Access key id used in the `AWSAccessKeyId` parameter.
    pub access_key_id: String,

    /// Shared secret used to sign requests.
    pub secret_key: SecretString,

    /// Optional delegated-access token, sent as `MWSAuthToken` when present.
    pub auth_token: Option<SecretString>,

    /// Application version reported in the user-agent header.
    pub application_version: String,

    /// Region host resolved from the marketplace id at build time.
    pub region_host: String,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Read timeout for individual operations.
    pub read_timeout: Duration,

    /// Maximum idle connections kept per host.
    pub max_connections: u32,

    /// Verify TLS certificates.
    pub verify_ssl: bool,
}

impl std::fmt::Debug for MwsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MwsConfig")
            .field("seller_id", &self.seller_id)
            .field("marketplace_id", &self.marketplace_id)
            .field("access_key_id", &self.access_key_id)
            .field("region_host", &self.region_host)
            .field("application_version", &self.application_version)
            .field("connect_timeout", &self.connect_timeout)
            .field("read_timeout", &self.read_timeout)
            .field("max_connections", &self.max_connections)
            .field("verify_ssl", &self.verify_ssl)
            // Intentionally omit secret_key and auth_token
            .finish_non_exhaustive()
    }
}

impl MwsConfig {
    /// Create a new configuration builder.
    pub fn builder() -> MwsConfigBuilder {
        MwsConfigBuilder::default()
    }

    /// Base URL for the configured region.
    pub fn region_url(&self) -> String {
        format!("https://{}", self.region_host)
    }

    /// User-agent string: fixed application identifier plus version.
    pub fn user_agent(&self) -> String {
        format!("{}/{}", APPLICATION_NAME, self.application_version)
    }
}

/// Builder for MWS configuration.
#[derive(Default)]
pub struct MwsConfigBuilder {
    seller_id: Option<String>,
    marketplace_id: Option<String>,
    access_key_id: Option<String>,
    secret_key: Option<SecretString>,
    auth_token: Option<SecretString>,
    application_version: Option<String>,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    max_connections: Option<u32>,
    verify_ssl: Option<bool>,
}

impl MwsConfigBuilder {
    /// Create a new builder with no values set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the seller (merchant) identifier. Required.
    pub fn seller_id(mut self, seller_id: impl Into<String>) -> Self {
        self.seller_id = Some(seller_id.into());
        self
    }

    /// Set the home marketplace id. Required.
    pub fn marketplace_id(mut self, marketplace_id: impl Into<String>) -> Self {
        self.marketplace_id = Some(marketplace_id.into());
        self
    }

    /// Set the access key id. Required.
    pub fn access_key_id(mut self, access_key_id: impl Into<String>) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self
    }

    /// Set the signing secret. Required.
    pub fn secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = Some(SecretString::new(secret_key.into()));
        self
    }

    /// Set the delegated-access auth token.
    pub fn auth_token(mut self, auth_token: impl Into<String>) -> Self {
        self.auth_token = Some(SecretString::new(auth_token.into()));
        self
    }

    /// Set the application version reported in the user-agent header.
    pub fn application_version(mut self, version: impl Into<String>) -> Self {
        self.application_version = Some(version.into());
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the read timeout.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Set the maximum idle connections kept per host.
    pub fn max_connections(mut self, connections: u32) -> Self {
        self.max_connections = Some(connections);
        self
    }

    /// Enable or disable TLS certificate verification.
    pub fn verify_ssl(mut self, verify: bool) -> Self {
        self.verify_ssl = Some(verify);
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Reads `MWS_SELLER_ID`, `MWS_MARKETPLACE_ID`, `MWS_ACCESS_KEY_ID`,
    /// `MWS_SECRET_KEY`, `MWS_AUTH_TOKEN`, and `MWS_APP_VERSION`. Values
    /// already set on the builder are kept.
    pub fn from_env(mut self) -> Self {
        if self.seller_id.is_none() {
            self.seller_id = std::env::var("MWS_SELLER_ID").ok();
        }
        if self.marketplace_id.is_none() {
            self.marketplace_id = std::env::var("MWS_MARKETPLACE_ID").ok();
        }
        if self.access_key_id.is_none() {
            self.access_key_id = std::env::var("MWS_ACCESS_KEY_ID").ok();
        }
        if self.secret_key.is_none() {
            self.secret_key = std::env::var("MWS_SECRET_KEY").ok().map(SecretString::new);
        }
        if self.auth_token.is_none() {
            self.auth_token = std::env::var("MWS_AUTH_TOKEN").ok().map(SecretString::new);
        }
        if self.application_version.is_none() {
            self.application_version = std::env::var("MWS_APP_VERSION").ok();
        }
        self
    }

    /// Build the configuration.
    ///
    /// Fails when a required field is missing or the marketplace id is not in
    /// the routing table.
    pub fn build(self) -> Result<MwsConfig, MwsError> {
        let seller_id = self.seller_id.ok_or_else(|| missing("seller_id"))?;
        let marketplace_id = self.marketplace_id.ok_or_else(|| missing("marketplace_id"))?;
        let access_key_id = self.access_key_id.ok_or_else(|| missing("access_key_id"))?;
        let secret_key = self.secret_key.ok_or_else(|| missing("secret_key"))?;

        let region_host = region_host(&marketplace_id)
            .ok_or_else(|| {
                MwsError::Configuration(ConfigurationError::UnknownMarketplace {
                    marketplace_id: marketplace_id.clone(),
                })
            })?
            .to_string();

        Ok(MwsConfig {
            seller_id,
            marketplace_id,
            access_key_id,
            secret_key,
            auth_token: self.auth_token,
            application_version: self
                .application_version
                .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
            region_host,
            connect_timeout: self.connect_timeout.unwrap_or(Duration::from_secs(5)),
            read_timeout: self.read_timeout.unwrap_or(Duration::from_secs(30)),
            max_connections: self.max_connections.unwrap_or(100),
            verify_ssl: self.verify_ssl.unwrap_or(true),
        })
    }
}

fn missing(field: &str) -> MwsError {
    MwsError::Configuration(ConfigurationError::MissingField {
        field: field.to_string(),
    })
}
