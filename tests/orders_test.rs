//! Integration tests for OrdersService.

use std::sync::Arc;

use amazon_mws::mocks::{MockResponse, MockTransport, TestFixtures};
use amazon_mws::{
    ListOrdersRequest, MwsClient, MwsClientBuilder, MwsClientImpl, MwsConfig, MwsError,
};
use chrono::{TimeZone, Utc};

fn test_config() -> MwsConfig {
    MwsConfig::builder()
        .seller_id("SELLER123")
        .marketplace_id("A1F83G8C2ARO7P")
        .access_key_id("AKIAEXAMPLE")
        .secret_key("secret123")
        .build()
        .unwrap()
}

fn client_with(transport: Arc<MockTransport>) -> MwsClientImpl {
    MwsClientBuilder::new()
        .config(test_config())
        .transport(transport)
        .build()
        .unwrap()
}

fn created_after() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

#[tokio::test]
async fn test_single_order_still_comes_back_as_list() {
    let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::xml(
        TestFixtures::list_orders_xml(&["026-1234567-0000001"]),
    )]));
    let client = client_with(transport.clone());

    let orders = client
        .orders()
        .list_orders(ListOrdersRequest::unshipped(created_after()))
        .await
        .unwrap();

    assert_eq!(orders.len(), 1);
    assert_eq!(
        orders[0].text_of("AmazonOrderId"),
        Some("026-1234567-0000001")
    );
}

#[tokio::test]
async fn test_two_orders_keep_document_order() {
    let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::xml(
        TestFixtures::list_orders_xml(&["026-1", "026-2"]),
    )]));
    let client = client_with(transport);

    let orders = client
        .orders()
        .list_orders(ListOrdersRequest::unshipped(created_after()))
        .await
        .unwrap();

    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].text_of("AmazonOrderId"), Some("026-1"));
    assert_eq!(orders[1].text_of("AmazonOrderId"), Some("026-2"));
}

#[tokio::test]
async fn test_list_orders_builds_signed_query() {
    let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::xml(
        TestFixtures::list_orders_xml(&[]),
    )]));
    let client = client_with(transport.clone());

    client
        .orders()
        .list_orders(ListOrdersRequest::unshipped(created_after()))
        .await
        .unwrap();

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, "POST");
    assert!(request.url.starts_with("https://mws-eu.amazonservices.com/Orders/2013-09-01?"));
    assert!(request.url.contains("CreatedAfter=2024-01-01T00%3A00%3A00.000Z"));
    assert!(request.url.contains("OrderStatus.Status.1=Unshipped"));
    assert!(request.url.contains("OrderStatus.Status.2=PartiallyShipped"));
    assert!(request.url.contains("FulfillmentChannel.Channel.1=MFN"));
    // The signature is always the final parameter.
    let (_, signature) = request.url.rsplit_once('&').unwrap();
    assert!(signature.starts_with("Signature="));
}

#[tokio::test]
async fn test_no_matching_orders_is_empty_list() {
    let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::xml(
        TestFixtures::list_orders_xml(&[]),
    )]));
    let client = client_with(transport);

    let orders = client
        .orders()
        .list_orders(ListOrdersRequest::shipped(created_after()))
        .await
        .unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn test_get_order_not_found_is_none() {
    let body = r#"<?xml version="1.0"?>
<GetOrderResponse xmlns="https://mws.amazonservices.com/Orders/2013-09-01">
  <GetOrderResult><Orders></Orders></GetOrderResult>
</GetOrderResponse>"#;
    let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::xml(body)]));
    let client = client_with(transport);

    let order = client.orders().get_order("026-0000000-0000000").await.unwrap();
    assert!(order.is_none());
}

#[tokio::test]
async fn test_list_order_items() {
    let body = r#"<?xml version="1.0"?>
<ListOrderItemsResponse xmlns="https://mws.amazonservices.com/Orders/2013-09-01">
  <ListOrderItemsResult>
    <OrderItems>
      <OrderItem>
        <ASIN>B00EXAMPLE</ASIN>
        <QuantityOrdered>2</QuantityOrdered>
      </OrderItem>
    </OrderItems>
  </ListOrderItemsResult>
</ListOrderItemsResponse>"#;
    let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::xml(body)]));
    let client = client_with(transport);

    let items = client.orders().list_order_items("026-1").await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].text_of("QuantityOrdered"), Some("2"));
}

#[tokio::test]
async fn test_service_error_is_surfaced_with_message() {
    let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::error(
        400,
        TestFixtures::error_xml("InvalidParameterValue", "Invalid AmazonOrderId: nope"),
    )]));
    let client = client_with(transport);

    let err = client.orders().list_order_items("nope").await.unwrap_err();
    match err {
        MwsError::RemoteService { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Invalid AmazonOrderId: nope");
        }
        other => panic!("expected RemoteService, got {other:?}"),
    }
}
