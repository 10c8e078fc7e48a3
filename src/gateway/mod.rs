//! Storefront proxy gateway.
//!
//! Receives `{query, variables}` envelopes from the catalog view, injects the
//! store credentials and relays them to the Shopify Storefront API. Every
//! failure, from missing configuration to an upstream error status, is
//! answered with `500` and a `{"error": message}` body; successful upstream
//! bodies are passed through unchanged.

pub mod transport;


use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tower_http::cors::CorsLayer;

use crate::catalog::{CatalogError, CatalogSource, SourceReply};
use crate::config::{ConfigError, Credentials, GatewayConfig};
use crate::graphql::GraphqlRequest;

pub use transport::{ACCESS_TOKEN_HEADER, HttpTransport, UpstreamReply, UpstreamTransport};

/// Route the gateway answers on
pub const PRODUCTS_ROUTE: &str = "/api/shopify/products";

/// Every way a relayed request can fail
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error("Requête GraphQL invalide: {0}")]
    MalformedRequest(serde_json::Error),

    #[error("Erreur API Shopify: {status} - {reason}")]
    Upstream {
        status: u16,
        reason: String,
        body: Value,
    },

    #[error("Réponse Shopify illisible: {0}")]
    InvalidUpstreamBody(serde_json::Error),

    #[error("Erreur réseau: {0}")]
    Transport(#[from] reqwest::Error),
}

/// JSON body of every gateway failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Relays GraphQL requests to the Storefront API with injected credentials
pub struct Gateway<T = HttpTransport> {
    config: GatewayConfig,
    transport: T,
}

impl Gateway<HttpTransport> {
    /// Gateway using a default reqwest client
    pub fn with_http(config: GatewayConfig) -> Self {
        Self::new(config, HttpTransport::default())
    }
}

impl<T: UpstreamTransport> Gateway<T> {
    pub fn new(config: GatewayConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Relay a raw request body; credentials are checked before the body is parsed
    pub async fn forward(&self, body: &[u8]) -> Result<Value, GatewayError> {
        let credentials = self.credentials()?;
        let request: GraphqlRequest =
            serde_json::from_slice(body).map_err(GatewayError::MalformedRequest)?;

        self.relay(&credentials, &request).await
    }

    /// Relay an already parsed request
    pub async fn execute(&self, request: &GraphqlRequest) -> Result<Value, GatewayError> {
        let credentials = self.credentials()?;
        self.relay(&credentials, request).await
    }

    fn credentials(&self) -> Result<Credentials<'_>, GatewayError> {
        self.config.credentials().map_err(|e| {
            if let ConfigError::Missing {
                domain_exists,
                token_exists,
            } = &e
            {
                ::log::error!(
                    "Configuration Shopify manquante: domain_exists={}, token_exists={}",
                    domain_exists,
                    token_exists
                );
            }
            GatewayError::from(e)
        })
    }

    async fn relay(
        &self,
        credentials: &Credentials<'_>,
        request: &GraphqlRequest,
    ) -> Result<Value, GatewayError> {
        ::log::debug!("GraphQL variables: {}", request.variables);
        ::log::debug!("Upstream GraphQL URL: {}", credentials.endpoint);

        let reply = self
            .transport
            .post_graphql(&credentials.endpoint, credentials.access_token, request)
            .await
            .inspect_err(|e| ::log::error!("Upstream request failed: {}", e))?;

        ::log::info!("Shopify response status: {}", reply.status);

        if !reply.status.is_success() {
            let body = serde_json::from_slice(&reply.body)
                .unwrap_or_else(|_| Value::Object(Default::default()));
            let reason = reply.status.canonical_reason().unwrap_or_default();
            ::log::error!(
                "Shopify API error: status={}, reason={:?}, body={}",
                reply.status.as_u16(),
                reason,
                body
            );

            return Err(GatewayError::Upstream {
                status: reply.status.as_u16(),
                reason: reason.to_string(),
                body,
            });
        }

        let data =
            serde_json::from_slice(&reply.body).map_err(GatewayError::InvalidUpstreamBody)?;
        ::log::debug!("Shopify response relayed");
        Ok(data)
    }
}

impl<T: UpstreamTransport> CatalogSource for Gateway<T> {
    async fn send(&self, request: &GraphqlRequest) -> Result<SourceReply, CatalogError> {
        match self.execute(request).await {
            Ok(body) => Ok(SourceReply::new(StatusCode::OK.as_u16(), body)),
            Err(e) => Ok(SourceReply::new(
                StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                serde_json::json!({ "error": e.to_string() }),
            )),
        }
    }
}

async fn products_handler<T: UpstreamTransport>(
    State(gateway): State<Arc<Gateway<T>>>,
    body: Bytes,
) -> Response {
    match gateway.forward(&body).await {
        Ok(data) => (StatusCode::OK, Json(data)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Router exposing the gateway on [`PRODUCTS_ROUTE`]
pub fn router<T: UpstreamTransport>(gateway: Gateway<T>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route(PRODUCTS_ROUTE, post(products_handler::<T>))
        .layer(cors)
        .with_state(Arc::new(gateway))
}

/// Run the gateway until Ctrl+C or SIGTERM
pub async fn serve(config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = config.credentials() {
        ::log::warn!("{}: every request will be answered with an error", e);
    }

    let address = format!("0.0.0.0:{}", config.port);
    let app = router(Gateway::with_http(config));

    ::log::info!("Binding to {}", address);
    let listener = TcpListener::bind(&address).await?;
    ::log::info!("Gateway listening on {}{}", address, PRODUCTS_ROUTE);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    ::log::info!("Gateway shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            ::log::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        ::log::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                ::log::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                ::log::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
