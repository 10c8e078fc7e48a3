use crate::graphql::GraphqlRequest;
use serde_json::Value;
use std::future::Future;
use url::Url;

use super::view::CatalogError;

/// HTTP status and parsed JSON body of a gateway reply
#[derive(Debug, Clone, PartialEq)]
pub struct SourceReply {
    pub status: u16,
    pub body: Value,
}

impl SourceReply {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something the catalog view can send product queries to
pub trait CatalogSource {
    /// Send a GraphQL request and return the reply, failing only when no JSON body was obtained
    fn send(
        &self,
        request: &GraphqlRequest,
    ) -> impl Future<Output = Result<SourceReply, CatalogError>> + Send;
}

/// Catalog source talking to the proxy gateway over HTTP
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl GatewayClient {
    /// Creates a client posting to the gateway products endpoint
    pub fn new(http: reqwest::Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }

    /// Parses `gateway_url` and creates a client with a default HTTP client
    pub fn from_url(gateway_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(reqwest::Client::new(), Url::parse(gateway_url)?))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl CatalogSource for GatewayClient {
    async fn send(&self, request: &GraphqlRequest) -> Result<SourceReply, CatalogError> {
        ::log::debug!("Sending GraphQL request to {}", self.endpoint);

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .json::<Value>()
            .await
            .map_err(|e| CatalogError::Decode(e.to_string()))?;

        Ok(SourceReply::new(status, body))
    }
}
