//! Catalog matching and category lookups.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::MwsConfig;
use crate::dispatch::Dispatcher;
use crate::error::MwsError;
use crate::types::ParameterList;
use crate::xml::XmlNode;

/// Identifier-list size limit for catalog matching.
const MAX_IDS: usize = 5;

/// Outcome of a catalog matching call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchedProducts {
    /// Scalar item attributes per matched identifier, plus derived image
    /// URLs when the service reported a small image.
    pub found: BTreeMap<String, BTreeMap<String, String>>,
    /// Identifiers the service could not match.
    pub not_found: Vec<String>,
}

/// Service for product catalog operations.
pub struct ProductsService {
    config: Arc<MwsConfig>,
    dispatcher: Arc<Dispatcher>,
}

impl ProductsService {
    /// Create a new products service.
    pub fn new(config: Arc<MwsConfig>, dispatcher: Arc<Dispatcher>) -> Self {
        Self { config, dispatcher }
    }

    /// Match catalog products by identifier (`ASIN`, `SellerSKU`, `UPC`,
    /// `EAN`, `ISBN`, or `JAN`). Duplicate identifiers are collapsed before
    /// the call.
    pub async fn matching_products_for_ids(
        &self,
        ids: &[&str],
        id_type: &str,
    ) -> Result<MatchedProducts, MwsError> {
        let mut unique: Vec<&str> = Vec::new();
        for id in ids {
            if !unique.contains(id) {
                unique.push(id);
            }
        }
        if unique.len() > MAX_IDS {
            return Err(MwsError::InvalidRequest {
                message: format!("at most {MAX_IDS} ids per call, got {}", unique.len()),
            });
        }

        let mut params = ParameterList::new()
            .with("MarketplaceId", self.config.marketplace_id.as_str())
            .with("IdType", id_type);
        params.insert_indexed("IdList.Id", unique.iter().copied());

        let doc = self
            .dispatcher
            .dispatch("GetMatchingProductForId", params)
            .await?
            .into_document()?;

        let mut matched = MatchedProducts::default();
        let results = doc
            .at(&[
                "GetMatchingProductForIdResponse",
                "GetMatchingProductForIdResult",
            ])
            .map(XmlNode::as_items)
            .unwrap_or(&[]);

        for result in results {
            let Some(id) = result.attribute("Id") else {
                continue;
            };
            if result.attribute("status") != Some("Success") {
                matched.not_found.push(id.to_string());
                continue;
            }

            let attributes = result
                .at(&["Products", "Product"])
                .and_then(|products| products.as_items().first())
                .and_then(|product| product.at(&["AttributeSets", "ItemAttributes"]))
                .and_then(|attrs| attrs.as_items().first())
                .map(scalar_attributes)
                .unwrap_or_default();
            matched.found.insert(id.to_string(), attributes);
        }

        Ok(matched)
    }

    /// Product categories for one of your SKUs. Empty when the product is
    /// uncategorized or unknown.
    pub async fn product_categories_for_sku(
        &self,
        seller_sku: &str,
    ) -> Result<Vec<XmlNode>, MwsError> {
        let params = ParameterList::new()
            .with("MarketplaceId", self.config.marketplace_id.as_str())
            .with("SellerSKU", seller_sku);

        let doc = self
            .dispatcher
            .dispatch("GetProductCategoriesForSKU", params)
            .await?
            .into_document()?;

        Ok(categories(&doc, &[
            "GetProductCategoriesForSKUResponse",
            "GetProductCategoriesForSKUResult",
            "Self",
        ]))
    }

    /// Product categories for an ASIN. Empty when the product is
    /// uncategorized or unknown.
    pub async fn product_categories_for_asin(
        &self,
        asin: &str,
    ) -> Result<Vec<XmlNode>, MwsError> {
        let params = ParameterList::new()
            .with("MarketplaceId", self.config.marketplace_id.as_str())
            .with("ASIN", asin);

        let doc = self
            .dispatcher
            .dispatch("GetProductCategoriesForASIN", params)
            .await?
            .into_document()?;

        Ok(categories(&doc, &[
            "GetProductCategoriesForASINResponse",
            "GetProductCategoriesForASINResult",
            "Self",
        ]))
    }
}

fn categories(doc: &XmlNode, path: &[&str]) -> Vec<XmlNode> {
    doc.at(path)
        .map(|node| node.as_items().to_vec())
        .unwrap_or_default()
}

/// Collect the scalar children of an item-attributes block, deriving the
/// image size variants the listing UIs expect.
fn scalar_attributes(attrs: &XmlNode) -> BTreeMap<String, String> {
    let mut collected = BTreeMap::new();

    if let Some(entries) = attrs.as_object() {
        for (key, value) in entries {
            if let XmlNode::Text(text) = value {
                collected.insert(key.clone(), text.clone());
            }
        }
    }

    if let Some(url) = attrs.at(&["SmallImage", "URL"]).and_then(XmlNode::as_text) {
        collected.insert("medium_image".to_string(), url.to_string());
        collected.insert("small_image".to_string(), url.replace("._SL75_", "._SL50_"));
        collected.insert("large_image".to_string(), url.replace("._SL75_", ""));
    }

    collected
}
