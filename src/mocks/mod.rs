//! Mock implementations and response fixtures for testing.
//!
//! The mock transport returns scripted responses in order and records every
//! request it was handed, so tests can assert on the exact signed request a
//! service produced.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{MwsError, TransportError};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};

/// A scripted HTTP response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Bytes,
}

impl MockResponse {
    /// A 200 response with an XML content type.
    pub fn xml(body: impl Into<Bytes>) -> Self {
        Self {
            status: 200,
            headers: [("content-type".to_string(), "text/xml".to_string())]
                .into_iter()
                .collect(),
            body: body.into(),
        }
    }

    /// A 200 response with a plain-text content type.
    pub fn text(body: impl Into<Bytes>) -> Self {
        Self {
            status: 200,
            headers: [("content-type".to_string(), "text/plain".to_string())]
                .into_iter()
                .collect(),
            body: body.into(),
        }
    }

    /// An error response with the given status and body.
    pub fn error(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Add a header to the response.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Mock HTTP transport returning scripted responses.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<Vec<MockResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    /// A transport with no scripted responses; any send fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport that replays the given responses in order.
    pub fn with_responses(responses: Vec<MockResponse>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every request sent so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, MwsError> {
        self.requests.lock().unwrap().push(request);

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(MwsError::Transport(TransportError::ConnectionFailed {
                message: "no scripted response left".to_string(),
            }));
        }
        let scripted = responses.remove(0);
        Ok(HttpResponse {
            status: scripted.status,
            headers: scripted.headers,
            body: scripted.body,
        })
    }
}

/// Canned response documents for tests.
pub struct TestFixtures;

impl TestFixtures {
    /// ListOrders response carrying the given order ids.
    pub fn list_orders_xml(order_ids: &[&str]) -> String {
        let orders: String = order_ids
            .iter()
            .map(|id| {
                format!(
                    "<Order><AmazonOrderId>{id}</AmazonOrderId>\
                     <OrderStatus>Unshipped</OrderStatus></Order>"
                )
            })
            .collect();
        format!(
            r#"<?xml version="1.0"?>
<ListOrdersResponse xmlns="https://mws.amazonservices.com/Orders/2013-09-01">
  <ListOrdersResult><Orders>{orders}</Orders></ListOrdersResult>
  <ResponseMetadata><RequestId>req-1</RequestId></ResponseMetadata>
</ListOrdersResponse>"#
        )
    }

    /// Service error envelope.
    pub fn error_xml(code: &str, message: &str) -> String {
        format!(
            r#"<?xml version="1.0"?>
<ErrorResponse xmlns="https://mws.amazonservices.com/">
  <Error><Type>Sender</Type><Code>{code}</Code><Message>{message}</Message></Error>
  <RequestID>req-err</RequestID>
</ErrorResponse>"#
        )
    }

    /// SubmitFeed acknowledgment.
    pub fn submit_feed_xml(feed_submission_id: &str) -> String {
        format!(
            r#"<?xml version="1.0"?>
<SubmitFeedResponse xmlns="http://mws.amazonaws.com/doc/2009-01-01/">
  <SubmitFeedResult>
    <FeedSubmissionInfo>
      <FeedSubmissionId>{feed_submission_id}</FeedSubmissionId>
      <FeedType>_POST_INVENTORY_AVAILABILITY_DATA_</FeedType>
      <SubmittedDate>2024-01-15T12:00:00+00:00</SubmittedDate>
      <FeedProcessingStatus>_SUBMITTED_</FeedProcessingStatus>
    </FeedSubmissionInfo>
  </SubmitFeedResult>
  <ResponseMetadata><RequestId>req-2</RequestId></ResponseMetadata>
</SubmitFeedResponse>"#
        )
    }

    /// RequestReport acknowledgment.
    pub fn request_report_xml(report_request_id: &str) -> String {
        format!(
            r#"<?xml version="1.0"?>
<RequestReportResponse xmlns="http://mws.amazonaws.com/doc/2009-01-01/">
  <RequestReportResult>
    <ReportRequestInfo>
      <ReportRequestId>{report_request_id}</ReportRequestId>
      <ReportType>_GET_MERCHANT_LISTINGS_DATA_</ReportType>
      <ReportProcessingStatus>_SUBMITTED_</ReportProcessingStatus>
    </ReportRequestInfo>
  </RequestReportResult>
</RequestReportResponse>"#
        )
    }

    /// GetReportRequestList response for a single request.
    pub fn report_status_xml(
        report_request_id: &str,
        processing_status: &str,
        generated_report_id: Option<&str>,
    ) -> String {
        let generated = generated_report_id
            .map(|id| format!("<GeneratedReportId>{id}</GeneratedReportId>"))
            .unwrap_or_default();
        format!(
            r#"<?xml version="1.0"?>
<GetReportRequestListResponse xmlns="http://mws.amazonaws.com/doc/2009-01-01/">
  <GetReportRequestListResult>
    <ReportRequestInfo>
      <ReportRequestId>{report_request_id}</ReportRequestId>
      <ReportProcessingStatus>{processing_status}</ReportProcessingStatus>
      {generated}
    </ReportRequestInfo>
  </GetReportRequestListResult>
</GetReportRequestListResponse>"#
        )
    }

    /// GetReportRequestList response with no matching request.
    pub fn report_status_empty_xml() -> &'static str {
        r#"<?xml version="1.0"?>
<GetReportRequestListResponse xmlns="http://mws.amazonaws.com/doc/2009-01-01/">
  <GetReportRequestListResult>
    <NextToken>none</NextToken>
  </GetReportRequestListResult>
</GetReportRequestListResponse>"#
    }

    /// GetMyPriceForSKU response with one successful and one failed lookup.
    pub fn my_price_for_sku_xml() -> &'static str {
        r#"<?xml version="1.0"?>
<GetMyPriceForSKUResponse xmlns="http://mws.amazonservices.com/schema/Products/2011-10-01">
  <GetMyPriceForSKUResult SellerSKU="SKU-GOOD" status="Success">
    <Product>
      <Offers>
        <Offer>
          <BuyingPrice><ListingPrice>
            <CurrencyCode>GBP</CurrencyCode><Amount>12.99</Amount>
          </ListingPrice></BuyingPrice>
        </Offer>
      </Offers>
    </Product>
  </GetMyPriceForSKUResult>
  <GetMyPriceForSKUResult SellerSKU="SKU-BAD" status="ClientError">
    <Error><Code>InvalidParameterValue</Code></Error>
  </GetMyPriceForSKUResult>
</GetMyPriceForSKUResponse>"#
    }

    /// GetMatchingProductForId response with a locale-qualified attribute
    /// block and one unmatched id.
    pub fn matching_product_xml() -> &'static str {
        r#"<?xml version="1.0"?>
<GetMatchingProductForIdResponse xmlns="http://mws.amazonservices.com/schema/Products/2011-10-01">
  <GetMatchingProductForIdResult Id="B00GOOD" status="Success">
    <Products>
      <Product>
        <AttributeSets>
          <ns2:ItemAttributes xml:lang="de-DE">
            <ns2:Title>Ein Buch</ns2:Title>
            <ns2:Brand>Verlag</ns2:Brand>
            <ns2:SmallImage>
              <ns2:URL>https://img.example/pic._SL75_.jpg</ns2:URL>
            </ns2:SmallImage>
          </ns2:ItemAttributes>
        </AttributeSets>
      </Product>
    </Products>
  </GetMatchingProductForIdResult>
  <GetMatchingProductForIdResult Id="B00MISSING" status="ClientError">
    <Error><Code>InvalidParameterValue</Code></Error>
  </GetMatchingProductForIdResult>
</GetMatchingProductForIdResponse>"#
    }
}
