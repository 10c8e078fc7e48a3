pub mod catalog;
pub mod config;
pub mod gateway;
pub mod graphql;
pub mod utils;

// Re-export commonly used types for convenience
pub use catalog::{CatalogView, GatewayClient, Product};
pub use config::{GatewayConfig, ViewConfig};
pub use gateway::Gateway;

use std::error::Error;
use std::path::Path;

/// Builder for a catalog view browsing products through the proxy gateway
pub struct Catalog {
    config: ViewConfig,
    http: Option<reqwest::Client>,
}

impl Catalog {
    /// Create a builder for the gateway products endpoint at `gateway_url`
    pub fn new(gateway_url: &str) -> Self {
        Self {
            config: ViewConfig::new(gateway_url),
            http: None,
        }
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: ViewConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a file
    pub fn with_config_file(
        self,
        path: impl AsRef<Path>,
    ) -> Result<Self, Box<dyn Error>> {
        let config = ViewConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Load configuration from a string
    pub fn with_config_str(self, config_str: &str) -> Result<Self, Box<dyn Error>> {
        let config = serde_json::from_str(config_str)?;
        Ok(self.with_config(config))
    }

    /// Use an existing HTTP client instead of a default one
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = Some(client);
        self
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Build the view; nothing is fetched until it is mounted
    pub fn open(self) -> Result<CatalogView<GatewayClient>, Box<dyn Error>> {
        let endpoint = url::Url::parse(&self.config.gateway_url)?;
        ::log::debug!("Opening catalog through gateway {}", endpoint);

        let client = GatewayClient::new(self.http.unwrap_or_default(), endpoint);
        Ok(CatalogView::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_with_gateway_url() {
        let view = Catalog::new("http://localhost:3000/api/shopify/products")
            .open()
            .unwrap();
        assert_eq!(
            view.source().endpoint().as_str(),
            "http://localhost:3000/api/shopify/products"
        );
        assert_eq!(view.current_page(), 1);
    }

    #[test]
    fn test_config_str_overrides_url() {
        let catalog = Catalog::new("http://unused")
            .with_config_str(r#"{"gateway_url": "http://shop.local/api/shopify/products"}"#)
            .unwrap();
        assert_eq!(
            catalog.config().gateway_url,
            "http://shop.local/api/shopify/products"
        );
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        assert!(Catalog::new("not a url").open().is_err());
    }
}
