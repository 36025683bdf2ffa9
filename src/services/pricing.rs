//! Pricing lookups for the configured marketplace.
//!
//! Keyed results use the per-item identifiers the service reports back (as
//! element attributes or nested identifier blocks), so callers can correlate
//! responses with the identifiers they asked for.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::MwsConfig;
use crate::dispatch::Dispatcher;
use crate::error::MwsError;
use crate::types::ParameterList;
use crate::xml::XmlNode;

/// Identifier-list size limit for the pricing batch calls.
const MAX_IDENTIFIERS: usize = 20;

/// Service for pricing operations.
pub struct PricingService {
    config: Arc<MwsConfig>,
    dispatcher: Arc<Dispatcher>,
}

impl PricingService {
    /// Create a new pricing service.
    pub fn new(config: Arc<MwsConfig>, dispatcher: Arc<Dispatcher>) -> Self {
        Self { config, dispatcher }
    }

    /// Current competitive price per ASIN. ASINs without a competitive price
    /// are absent from the result.
    pub async fn competitive_pricing_for_asins(
        &self,
        asins: &[&str],
    ) -> Result<BTreeMap<String, XmlNode>, MwsError> {
        ensure_limit(asins.len(), "ASIN")?;

        let mut params = self.marketplace_params();
        params.insert_indexed("ASINList.ASIN", asins.iter().copied());

        let doc = self
            .dispatcher
            .dispatch("GetCompetitivePricingForASIN", params)
            .await?
            .into_document()?;

        let mut prices = BTreeMap::new();
        for result in results(&doc, &[
            "GetCompetitivePricingForASINResponse",
            "GetCompetitivePricingForASINResult",
        ]) {
            let Some(asin) = result
                .at(&["Product", "Identifiers", "MarketplaceASIN", "ASIN"])
                .and_then(XmlNode::as_text)
            else {
                continue;
            };
            let price = result
                .at(&["Product", "CompetitivePricing", "CompetitivePrices", "CompetitivePrice"])
                .and_then(|node| node.as_items().first())
                .and_then(|competitive| competitive.get("Price"));
            if let Some(price) = price {
                prices.insert(asin.to_string(), price.clone());
            }
        }
        Ok(prices)
    }

    /// Lowest priced offers for a single ASIN and item condition.
    pub async fn lowest_priced_offers_for_asin(
        &self,
        asin: &str,
        item_condition: &str,
    ) -> Result<XmlNode, MwsError> {
        let params = self
            .marketplace_params()
            .with("ASIN", asin)
            .with("ItemCondition", item_condition);

        self.dispatcher
            .dispatch("GetLowestPricedOffersForASIN", params)
            .await?
            .into_document()
    }

    /// Your own offers per SKU. A SKU whose lookup did not succeed maps to
    /// `None`.
    pub async fn my_price_for_skus(
        &self,
        skus: &[&str],
        item_condition: Option<&str>,
    ) -> Result<BTreeMap<String, Option<XmlNode>>, MwsError> {
        ensure_limit(skus.len(), "SKU")?;

        let mut params = self.marketplace_params();
        if let Some(condition) = item_condition {
            params.insert("ItemCondition", condition);
        }
        params.insert_indexed("SellerSKUList.SellerSKU", skus.iter().copied());

        let doc = self
            .dispatcher
            .dispatch("GetMyPriceForSKU", params)
            .await?
            .into_document()?;

        Ok(keyed_offers(
            &doc,
            &["GetMyPriceForSKUResponse", "GetMyPriceForSKUResult"],
            "SellerSKU",
        ))
    }

    /// Your own offers per ASIN. An ASIN whose lookup did not succeed maps
    /// to `None`.
    pub async fn my_price_for_asins(
        &self,
        asins: &[&str],
        item_condition: Option<&str>,
    ) -> Result<BTreeMap<String, Option<XmlNode>>, MwsError> {
        ensure_limit(asins.len(), "ASIN")?;

        let mut params = self.marketplace_params();
        if let Some(condition) = item_condition {
            params.insert("ItemCondition", condition);
        }
        params.insert_indexed("ASINList.ASIN", asins.iter().copied());

        let doc = self
            .dispatcher
            .dispatch("GetMyPriceForASIN", params)
            .await?
            .into_document()?;

        Ok(keyed_offers(
            &doc,
            &["GetMyPriceForASINResponse", "GetMyPriceForASINResult"],
            "ASIN",
        ))
    }

    /// Lowest active offer listings per ASIN. An ASIN without listings maps
    /// to `None`.
    pub async fn lowest_offer_listings_for_asins(
        &self,
        asins: &[&str],
        item_condition: Option<&str>,
    ) -> Result<BTreeMap<String, Option<XmlNode>>, MwsError> {
        ensure_limit(asins.len(), "ASIN")?;

        let mut params = self.marketplace_params();
        if let Some(condition) = item_condition {
            params.insert("ItemCondition", condition);
        }
        params.insert_indexed("ASINList.ASIN", asins.iter().copied());

        let doc = self
            .dispatcher
            .dispatch("GetLowestOfferListingsForASIN", params)
            .await?
            .into_document()?;

        let mut listings = BTreeMap::new();
        for result in results(&doc, &[
            "GetLowestOfferListingsForASINResponse",
            "GetLowestOfferListingsForASINResult",
        ]) {
            let Some(asin) = result
                .at(&["Product", "Identifiers", "MarketplaceASIN", "ASIN"])
                .and_then(XmlNode::as_text)
            else {
                continue;
            };
            let lowest = result
                .at(&["Product", "LowestOfferListings", "LowestOfferListing"])
                .cloned();
            listings.insert(asin.to_string(), lowest);
        }
        Ok(listings)
    }

    fn marketplace_params(&self) -> ParameterList {
        ParameterList::new().with("MarketplaceId", self.config.marketplace_id.as_str())
    }
}

fn ensure_limit(count: usize, what: &str) -> Result<(), MwsError> {
    if count > MAX_IDENTIFIERS {
        return Err(MwsError::InvalidRequest {
            message: format!("at most {MAX_IDENTIFIERS} {what}s per call, got {count}"),
        });
    }
    Ok(())
}

/// The per-identifier result elements of a batch pricing response.
fn results<'a>(doc: &'a XmlNode, path: &[&str]) -> &'a [XmlNode] {
    doc.at(path).map(XmlNode::as_items).unwrap_or(&[])
}

/// Key each result element by an identifying attribute; failed lookups map
/// to `None`.
fn keyed_offers(
    doc: &XmlNode,
    path: &[&str],
    key_attribute: &str,
) -> BTreeMap<String, Option<XmlNode>> {
    let mut offers = BTreeMap::new();
    for result in results(doc, path) {
        let Some(key) = result.attribute(key_attribute) else {
            continue;
        };
        let value = if result.attribute("status") == Some("Success") {
            result.at(&["Product", "Offers", "Offer"]).cloned()
        } else {
            None
        };
        offers.insert(key.to_string(), value);
    }
    offers
}
