//! Request dispatcher.
//!
//! Ties the endpoint registry, canonical signer, transport, and XML
//! normalizer together: resolves the operation, merges the default parameter
//! set, signs, sends, and routes the response body by content type. Every
//! dispatch signs with a fresh timestamp, so a retried call is re-signed
//! rather than replayed.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use tracing::{debug, trace};

use crate::config::{MwsConfig, DEFAULT_MARKETPLACE_IDS};
use crate::endpoints;
use crate::error::MwsError;
use crate::feeds;
use crate::signing;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::types::ParameterList;
use crate::xml::{self, XmlNode};

/// A routed response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// The response declared an XML content type and was normalized.
    Document(XmlNode),
    /// Anything else, returned as text unchanged (the service answers some
    /// feed-result calls with a bare string).
    Text(String),
}

impl ResponseBody {
    /// Unwrap the normalized document, failing when the service answered
    /// with a non-XML body.
    pub fn into_document(self) -> Result<XmlNode, MwsError> {
        match self {
            ResponseBody::Document(node) => Ok(node),
            ResponseBody::Text(_) => Err(MwsError::MalformedResponse {
                message: "expected an XML document, got a text body".to_string(),
            }),
        }
    }
}

/// Signs and sends requests, and routes responses.
pub struct Dispatcher {
    config: Arc<MwsConfig>,
    transport: Arc<dyn HttpTransport>,
}

impl Dispatcher {
    /// Create a new dispatcher.
    pub fn new(config: Arc<MwsConfig>, transport: Arc<dyn HttpTransport>) -> Self {
        Self { config, transport }
    }

    /// Dispatch an operation and route the response by content type.
    pub async fn dispatch(
        &self,
        operation: &str,
        params: ParameterList,
    ) -> Result<ResponseBody, MwsError> {
        let response = self.send(operation, params, None).await?;
        route(response)
    }

    /// Dispatch an operation with an XML body (feed submission).
    pub async fn dispatch_with_body(
        &self,
        operation: &str,
        params: ParameterList,
        body: Bytes,
    ) -> Result<ResponseBody, MwsError> {
        let response = self.send(operation, params, Some(body)).await?;
        route(response)
    }

    /// Dispatch an operation and return the raw response bytes verbatim,
    /// bypassing normalization (report fetches, debug paths).
    pub async fn dispatch_raw(
        &self,
        operation: &str,
        params: ParameterList,
    ) -> Result<Bytes, MwsError> {
        let response = self.send(operation, params, None).await?;
        Ok(response.body)
    }

    async fn send(
        &self,
        operation: &str,
        params: ParameterList,
        body: Option<Bytes>,
    ) -> Result<HttpResponse, MwsError> {
        let request = self.build_request(operation, params, body, Utc::now())?;
        debug!(operation, url = %request.url, "dispatching request");

        let response = self.transport.send(request).await?;
        trace!(operation, status = response.status, "received response");

        if !response.is_success() {
            return Err(translate_error(&response));
        }
        Ok(response)
    }

    /// Build the signed HTTP request for an operation.
    ///
    /// Pure with respect to the supplied timestamp: identical inputs yield a
    /// byte-identical request, which is what makes signing testable and
    /// retries safe to re-sign.
    pub fn build_request(
        &self,
        operation: &str,
        params: ParameterList,
        body: Option<Bytes>,
        timestamp: DateTime<Utc>,
    ) -> Result<HttpRequest, MwsError> {
        let endpoint = endpoints::resolve(operation)?;
        let config = &self.config;
        let mut params = params;

        let mut defaults: Vec<(String, String)> = vec![
            ("Timestamp".into(), signing::format_timestamp(&timestamp)),
            ("AWSAccessKeyId".into(), config.access_key_id.clone()),
            ("Action".into(), endpoint.action.to_string()),
            ("SellerId".into(), config.seller_id.clone()),
            ("SignatureMethod".into(), signing::SIGNATURE_METHOD.into()),
            ("SignatureVersion".into(), signing::SIGNATURE_VERSION.into()),
            ("Version".into(), endpoint.version.to_string()),
        ];
        for (index, id) in DEFAULT_MARKETPLACE_IDS.iter().enumerate() {
            defaults.push((format!("MarketplaceId.Id.{}", index + 1), (*id).to_string()));
        }
        params.merge_defaults(defaults);

        if let Some(token) = &config.auth_token {
            params.insert("MWSAuthToken", token.expose_secret().as_str());
        }

        // Exactly one marketplace addressing scheme may survive: an explicit
        // single-marketplace or list parameter evicts the defaults.
        if params.contains_key("MarketplaceId") || params.contains_prefixed("MarketplaceIdList.") {
            params.remove_prefixed("MarketplaceId.Id.");
        }

        // On feed submissions the seller and marketplace identities travel in
        // the body; leaving the query defaults in place makes the service
        // reject the signature.
        if body.is_some() {
            params.remove("SellerId");
            params.remove_prefixed("MarketplaceId.Id.");
        }

        let signature = signing::sign(
            endpoint.method.as_str(),
            &config.region_host,
            endpoint.path,
            &params,
            config.secret_key.expose_secret(),
        );

        // The signature is appended after every signed parameter.
        let query = format!(
            "{}&Signature={}",
            signing::canonical_query(&params),
            signing::percent_encode(&signature)
        );
        let url = format!("{}{}?{}", config.region_url(), endpoint.path, query);

        let mut request = HttpRequest::new(endpoint.method.as_str(), url)
            .with_header("Accept", "application/xml")
            .with_header("x-amazon-user-agent", config.user_agent());

        if let Some(body) = body {
            request = request
                .with_header("Content-MD5", feeds::content_md5(&body))
                .with_header("Content-Type", "text/xml; charset=iso-8859-1")
                .with_header("Host", config.region_host.clone())
                .with_body(body);
        }

        Ok(request)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Route a successful response body by declared content type.
fn route(response: HttpResponse) -> Result<ResponseBody, MwsError> {
    let is_xml = response
        .content_type()
        .map(|ct| ct.to_ascii_lowercase().contains("xml"))
        .unwrap_or(false);

    if is_xml {
        Ok(ResponseBody::Document(xml::normalize(&response.body)?))
    } else {
        Ok(ResponseBody::Text(
            String::from_utf8_lossy(&response.body).into_owned(),
        ))
    }
}

/// Translate a non-success response into an error.
///
/// When the body is a recognizable XML error envelope, the embedded
/// human-readable message is surfaced; otherwise the raw body (or a generic
/// message) is.
fn translate_error(response: &HttpResponse) -> MwsError {
    let body = String::from_utf8_lossy(&response.body);

    let message = if body.contains("<ErrorResponse") {
        extract_error_message(&body).unwrap_or_else(|| body.trim().to_string())
    } else if body.trim().is_empty() {
        "the service returned an error without a body".to_string()
    } else {
        body.trim().to_string()
    };

    MwsError::RemoteService {
        status: response.status,
        message,
    }
}

fn extract_error_message(body: &str) -> Option<String> {
    let doc = xml::normalize(body.as_bytes()).ok()?;
    doc.at(&["ErrorResponse", "Error", "Message"])?
        .as_text()
        .map(str::to_string)
}
