//! Integration tests for PricingService.

use std::sync::Arc;

use amazon_mws::mocks::{MockResponse, MockTransport, TestFixtures};
use amazon_mws::{MwsClient, MwsClientBuilder, MwsClientImpl, MwsConfig, MwsError};

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

#[tokio::test]
async fn test_my_price_for_skus_keys_by_attribute() {
    let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::xml(
        TestFixtures::my_price_for_sku_xml(),
    )]));
    let client = client_with(transport.clone());

    let prices = client
        .pricing()
        .my_price_for_skus(&["SKU-GOOD", "SKU-BAD"], None)
        .await
        .unwrap();

    assert_eq!(prices.len(), 2);
    let good = prices.get("SKU-GOOD").unwrap().as_ref().unwrap();
    let offers = good.as_items();
    assert_eq!(offers.len(), 1);
    assert_eq!(
        offers[0]
            .at(&["BuyingPrice", "ListingPrice", "Amount"])
            .and_then(|n| n.as_text()),
        Some("12.99")
    );
    assert!(prices.get("SKU-BAD").unwrap().is_none());

    // Single-marketplace addressing only.
    let request = transport.last_request().unwrap();
    assert!(request.url.contains("MarketplaceId=A1F83G8C2ARO7P"));
    assert!(!request.url.contains("MarketplaceId.Id."));
    assert!(request.url.contains("SellerSKUList.SellerSKU.1=SKU-GOOD"));
}

#[tokio::test]
async fn test_identifier_limit_is_enforced_before_dispatch() {
    let transport = Arc::new(MockTransport::new());
    let client = client_with(transport.clone());

    let skus: Vec<String> = (0..21).map(|i| format!("SKU-{i}")).collect();
    let refs: Vec<&str> = skus.iter().map(String::as_str).collect();

    let err = client
        .pricing()
        .my_price_for_skus(&refs, None)
        .await
        .unwrap_err();
    assert!(matches!(err, MwsError::InvalidRequest { .. }));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_competitive_pricing_single_result_is_keyed() {
    let body = r#"<?xml version="1.0"?>
<GetCompetitivePricingForASINResponse xmlns="http://mws.amazonservices.com/schema/Products/2011-10-01">
  <GetCompetitivePricingForASINResult ASIN="B00EXAMPLE" status="Success">
    <Product>
      <Identifiers>
        <MarketplaceASIN>
          <MarketplaceId>A1F83G8C2ARO7P</MarketplaceId>
          <ASIN>B00EXAMPLE</ASIN>
        </MarketplaceASIN>
      </Identifiers>
      <CompetitivePricing>
        <CompetitivePrices>
          <CompetitivePrice belongsToRequester="false" condition="New">
            <Price>
              <ListingPrice><CurrencyCode>GBP</CurrencyCode><Amount>21.50</Amount></ListingPrice>
            </Price>
          </CompetitivePrice>
        </CompetitivePrices>
      </CompetitivePricing>
    </Product>
  </GetCompetitivePricingForASINResult>
</GetCompetitivePricingForASINResponse>"#;
    let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::xml(body)]));
    let client = client_with(transport);

    let prices = client
        .pricing()
        .competitive_pricing_for_asins(&["B00EXAMPLE"])
        .await
        .unwrap();

    assert_eq!(prices.len(), 1);
    let price = prices.get("B00EXAMPLE").unwrap();
    assert_eq!(
        price
            .at(&["ListingPrice", "Amount"])
            .and_then(|n| n.as_text()),
        Some("21.50")
    );
}

#[tokio::test]
async fn test_competitive_pricing_without_price_is_absent() {
    let body = r#"<?xml version="1.0"?>
<GetCompetitivePricingForASINResponse xmlns="http://mws.amazonservices.com/schema/Products/2011-10-01">
  <GetCompetitivePricingForASINResult ASIN="B00EMPTY" status="Success">
    <Product>
      <Identifiers>
        <MarketplaceASIN>
          <MarketplaceId>A1F83G8C2ARO7P</MarketplaceId>
          <ASIN>B00EMPTY</ASIN>
        </MarketplaceASIN>
      </Identifiers>
      <CompetitivePricing><CompetitivePrices></CompetitivePrices></CompetitivePricing>
    </Product>
  </GetCompetitivePricingForASINResult>
</GetCompetitivePricingForASINResponse>"#;
    let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::xml(body)]));
    let client = client_with(transport);

    let prices = client
        .pricing()
        .competitive_pricing_for_asins(&["B00EMPTY"])
        .await
        .unwrap();
    assert!(prices.is_empty());
}

#[tokio::test]
async fn test_lowest_priced_offers_passes_condition() {
    let body = r#"<?xml version="1.0"?>
<GetLowestPricedOffersForASINResponse xmlns="http://mws.amazonservices.com/schema/Products/2011-10-01">
  <GetLowestPricedOffersForASINResult MarketplaceID="A1F83G8C2ARO7P" ItemCondition="New">
    <Summary><TotalOfferCount>3</TotalOfferCount></Summary>
  </GetLowestPricedOffersForASINResult>
</GetLowestPricedOffersForASINResponse>"#;
    let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::xml(body)]));
    let client = client_with(transport.clone());

    let doc = client
        .pricing()
        .lowest_priced_offers_for_asin("B00EXAMPLE", "New")
        .await
        .unwrap();
    assert!(doc.get("GetLowestPricedOffersForASINResponse").is_some());

    let request = transport.last_request().unwrap();
    assert!(request.url.contains("ASIN=B00EXAMPLE"));
    assert!(request.url.contains("ItemCondition=New"));
}
