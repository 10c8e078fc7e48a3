use crate::graphql::GraphqlRequest;
use axum::body::Bytes;
use axum::http::StatusCode;
use std::future::Future;
use url::Url;

use super::GatewayError;

/// Header carrying the Storefront access token
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

/// Raw upstream reply, before any status handling
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: Bytes,
}

/// Outbound seam of the gateway
pub trait UpstreamTransport: Send + Sync + 'static {
    /// POST `request` to `endpoint` with the access token header
    fn post_graphql(
        &self,
        endpoint: &Url,
        access_token: &str,
        request: &GraphqlRequest,
    ) -> impl Future<Output = Result<UpstreamReply, GatewayError>> + Send;
}

/// Transport issuing real HTTP requests with reqwest
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl UpstreamTransport for HttpTransport {
    async fn post_graphql(
        &self,
        endpoint: &Url,
        access_token: &str,
        request: &GraphqlRequest,
    ) -> Result<UpstreamReply, GatewayError> {
        let response = self
            .client
            .post(endpoint.clone())
            .header(ACCESS_TOKEN_HEADER, access_token)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        Ok(UpstreamReply { status, body })
    }
}
