//! Seller account operations.

use std::sync::Arc;

use crate::config::MwsConfig;
use crate::dispatch::Dispatcher;
use crate::error::MwsError;
use crate::types::ParameterList;
use crate::xml::XmlNode;

/// Service for seller account operations.
pub struct SellersService {
    config: Arc<MwsConfig>,
    dispatcher: Arc<Dispatcher>,
}

impl SellersService {
    /// Create a new sellers service.
    pub fn new(config: Arc<MwsConfig>, dispatcher: Arc<Dispatcher>) -> Self {
        Self { config, dispatcher }
    }

    /// Marketplaces the seller participates in, with per-marketplace seller
    /// information. Returns the result node, or the whole document when the
    /// response has an unexpected shape.
    pub async fn list_marketplace_participations(&self) -> Result<XmlNode, MwsError> {
        let doc = self
            .dispatcher
            .dispatch("ListMarketplaceParticipations", ParameterList::new())
            .await?
            .into_document()?;

        Ok(doc
            .at(&[
                "ListMarketplaceParticipationsResponse",
                "ListMarketplaceParticipationsResult",
            ])
            .cloned()
            .unwrap_or(doc))
    }

    /// Active recommendations for the configured marketplace, optionally
    /// restricted to one category. `None` when the service reports nothing.
    pub async fn list_recommendations(
        &self,
        category: Option<&str>,
    ) -> Result<Option<XmlNode>, MwsError> {
        let mut params =
            ParameterList::new().with("MarketplaceId", self.config.marketplace_id.as_str());
        if let Some(category) = category {
            params.insert("RecommendationCategory", category);
        }

        let doc = self
            .dispatcher
            .dispatch("ListRecommendations", params)
            .await?
            .into_document()?;

        Ok(doc
            .at(&["ListRecommendationsResponse", "ListRecommendationsResult"])
            .cloned())
    }
}
