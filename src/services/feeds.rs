//! Bulk-update feed submission.

use std::sync::Arc;

use bytes::Bytes;

use crate::config::MwsConfig;
use crate::dispatch::{Dispatcher, ResponseBody};
use crate::error::MwsError;
use crate::feeds::FeedEnvelope;
use crate::types::{FeedSubmissionInfo, ParameterList};
use crate::xml::{XmlNode, ATTRIBUTES_KEY, TEXT_KEY};

/// Feed type for inventory quantity updates.
pub const INVENTORY_FEED: &str = "_POST_INVENTORY_AVAILABILITY_DATA_";

/// Feed type for price updates.
pub const PRICING_FEED: &str = "_POST_PRODUCT_PRICING_DATA_";

/// Service for feed submission.
pub struct FeedsService {
    config: Arc<MwsConfig>,
    dispatcher: Arc<Dispatcher>,
}

impl FeedsService {
    /// Create a new feeds service.
    pub fn new(config: Arc<MwsConfig>, dispatcher: Arc<Dispatcher>) -> Self {
        Self { config, dispatcher }
    }

    /// Render the feed XML for an envelope without submitting it.
    ///
    /// Debug path: lets callers inspect exactly what would be sent.
    pub fn render_feed(&self, envelope: &FeedEnvelope) -> String {
        envelope.encode(&self.config.seller_id)
    }

    /// Encode and submit a feed envelope.
    pub async fn submit_feed(
        &self,
        feed_type: &str,
        envelope: &FeedEnvelope,
    ) -> Result<FeedSubmissionInfo, MwsError> {
        let body = self.render_feed(envelope);
        self.submit_feed_content(feed_type, body.into_bytes()).await
    }

    /// Submit pre-rendered feed XML.
    pub async fn submit_feed_content(
        &self,
        feed_type: &str,
        content: impl Into<Bytes>,
    ) -> Result<FeedSubmissionInfo, MwsError> {
        let mut params = ParameterList::new();
        params.insert("FeedType", feed_type);
        params.insert("PurgeAndReplace", "false");
        params.insert("Merchant", self.config.seller_id.as_str());
        if feed_type == PRICING_FEED {
            params.insert("MarketplaceIdList.Id.1", self.config.marketplace_id.as_str());
        }

        let doc = self
            .dispatcher
            .dispatch_with_body("SubmitFeed", params, content.into())
            .await?
            .into_document()?;

        let info = doc
            .at(&["SubmitFeedResponse", "SubmitFeedResult", "FeedSubmissionInfo"])
            .and_then(|node| node.as_items().first())
            .ok_or_else(|| MwsError::MalformedResponse {
                message: "SubmitFeed response is missing FeedSubmissionInfo".to_string(),
            })?;

        Ok(FeedSubmissionInfo {
            feed_submission_id: info
                .text_of("FeedSubmissionId")
                .ok_or_else(|| MwsError::MalformedResponse {
                    message: "FeedSubmissionInfo is missing FeedSubmissionId".to_string(),
                })?
                .to_string(),
            feed_type: info.text_of("FeedType").map(str::to_string),
            submitted_date: info.text_of("SubmittedDate").map(str::to_string),
            feed_processing_status: info.text_of("FeedProcessingStatus").map(str::to_string),
        })
    }

    /// Fetch the processing report for a submitted feed.
    ///
    /// Returns the `ProcessingReport` node when the response carries one,
    /// the whole document otherwise. Some feed results come back as a bare
    /// string; those surface as a text node.
    pub async fn get_feed_submission_result(
        &self,
        feed_submission_id: &str,
    ) -> Result<XmlNode, MwsError> {
        let params = ParameterList::new().with("FeedSubmissionId", feed_submission_id);
        let body = self
            .dispatcher
            .dispatch("GetFeedSubmissionResult", params)
            .await?;

        match body {
            ResponseBody::Document(doc) => {
                let report = doc
                    .at(&["AmazonEnvelope", "Message"])
                    .and_then(|messages| messages.as_items().first())
                    .and_then(|message| message.get("ProcessingReport"))
                    .cloned();
                Ok(report.unwrap_or(doc))
            }
            ResponseBody::Text(text) => Ok(XmlNode::Text(text)),
        }
    }

    /// Submit an inventory feed setting available quantity per SKU.
    pub async fn update_stock<I, S>(&self, quantities: I) -> Result<FeedSubmissionInfo, MwsError>
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut envelope = FeedEnvelope::new("Inventory");
        for (sku, quantity) in quantities {
            envelope.push_update(
                "Inventory",
                XmlNode::object([
                    ("SKU", XmlNode::text(sku)),
                    ("Quantity", XmlNode::text(quantity.to_string())),
                ]),
            );
        }
        self.submit_feed(INVENTORY_FEED, &envelope).await
    }

    /// Submit a pricing feed setting the standard price per SKU.
    ///
    /// Prices must already be formatted as the service's numeric type; the
    /// marketplace default currency is used.
    pub async fn update_price<I, S, P>(&self, prices: I) -> Result<FeedSubmissionInfo, MwsError>
    where
        I: IntoIterator<Item = (S, P)>,
        S: Into<String>,
        P: Into<String>,
    {
        let mut envelope = FeedEnvelope::new("Price");
        for (sku, price) in prices {
            envelope.push_message(
                "Price",
                XmlNode::object([
                    ("SKU", XmlNode::text(sku)),
                    (
                        "StandardPrice",
                        XmlNode::object([
                            (
                                ATTRIBUTES_KEY,
                                XmlNode::object([("currency", XmlNode::text("DEFAULT"))]),
                            ),
                            (TEXT_KEY, XmlNode::text(price)),
                        ]),
                    ),
                ]),
            );
        }
        self.submit_feed(PRICING_FEED, &envelope).await
    }
}
