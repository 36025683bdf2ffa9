//! Order retrieval operations.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::dispatch::Dispatcher;
use crate::error::MwsError;
use crate::signing::format_timestamp;
use crate::types::ParameterList;
use crate::xml::XmlNode;

/// Filter for [`OrdersService::list_orders`].
#[derive(Debug, Clone)]
pub struct ListOrdersRequest {
    /// Lower bound on order creation time.
    pub created_after: DateTime<Utc>,
    /// Optional upper bound on order creation time.
    pub created_before: Option<DateTime<Utc>>,
    /// Order statuses to include.
    pub order_statuses: Vec<String>,
    /// Fulfillment channels to include.
    pub fulfillment_channels: Vec<String>,
}

impl ListOrdersRequest {
    /// Orders awaiting shipment (`Unshipped` + `PartiallyShipped`, seller
    /// fulfilled), the most common polling filter.
    pub fn unshipped(created_after: DateTime<Utc>) -> Self {
        Self {
            created_after,
            created_before: None,
            order_statuses: vec!["Unshipped".into(), "PartiallyShipped".into()],
            fulfillment_channels: vec!["MFN".into()],
        }
    }

    /// Orders already shipped, seller fulfilled.
    pub fn shipped(created_after: DateTime<Utc>) -> Self {
        Self {
            created_after,
            created_before: None,
            order_statuses: vec!["Shipped".into()],
            fulfillment_channels: vec!["MFN".into()],
        }
    }

    /// Replace the status filter.
    pub fn with_statuses<I, S>(mut self, statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order_statuses = statuses.into_iter().map(Into::into).collect();
        self
    }

    /// Set the upper bound on creation time.
    pub fn created_before(mut self, before: DateTime<Utc>) -> Self {
        self.created_before = Some(before);
        self
    }
}

/// Service for order operations.
pub struct OrdersService {
    dispatcher: Arc<Dispatcher>,
}

impl OrdersService {
    /// Create a new orders service.
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// List orders matching the filter. A single matching order still comes
    /// back as a one-element vector.
    pub async fn list_orders(
        &self,
        request: ListOrdersRequest,
    ) -> Result<Vec<XmlNode>, MwsError> {
        let mut params = ParameterList::new();
        params.insert("CreatedAfter", format_timestamp(&request.created_after));
        if let Some(before) = request.created_before {
            params.insert("CreatedBefore", format_timestamp(&before));
        }
        params.insert_indexed("OrderStatus.Status", request.order_statuses);
        params.insert_indexed("FulfillmentChannel.Channel", request.fulfillment_channels);

        let doc = self
            .dispatcher
            .dispatch("ListOrders", params)
            .await?
            .into_document()?;

        Ok(collect_items(
            &doc,
            &["ListOrdersResponse", "ListOrdersResult", "Orders", "Order"],
        ))
    }

    /// Fetch a single order, `None` when the service has no record of it.
    pub async fn get_order(&self, amazon_order_id: &str) -> Result<Option<XmlNode>, MwsError> {
        let params = ParameterList::new().with("AmazonOrderId.Id.1", amazon_order_id);
        let doc = self
            .dispatcher
            .dispatch("GetOrder", params)
            .await?
            .into_document()?;

        Ok(doc
            .at(&["GetOrderResponse", "GetOrderResult", "Orders", "Order"])
            .and_then(|orders| orders.as_items().first().cloned()))
    }

    /// List the line items of an order.
    pub async fn list_order_items(
        &self,
        amazon_order_id: &str,
    ) -> Result<Vec<XmlNode>, MwsError> {
        let params = ParameterList::new().with("AmazonOrderId", amazon_order_id);
        let doc = self
            .dispatcher
            .dispatch("ListOrderItems", params)
            .await?
            .into_document()?;

        Ok(collect_items(
            &doc,
            &[
                "ListOrderItemsResponse",
                "ListOrderItemsResult",
                "OrderItems",
                "OrderItem",
            ],
        ))
    }
}

fn collect_items(doc: &XmlNode, path: &[&str]) -> Vec<XmlNode> {
    doc.at(path)
        .map(|node| node.as_items().to_vec())
        .unwrap_or_default()
}
