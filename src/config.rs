use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use url::Url;

/// Environment variable holding the Shopify store domain
pub const STORE_DOMAIN_VAR: &str = "SHOPIFY_STORE_DOMAIN";

/// Environment variable holding the Storefront access token
pub const ACCESS_TOKEN_VAR: &str = "SHOPIFY_STOREFRONT_ACCESS_TOKEN";

/// Environment variable overriding the Storefront API version
pub const API_VERSION_VAR: &str = "SHOPIFY_API_VERSION";

/// Environment variable overriding the gateway port
pub const PORT_VAR: &str = "GATEWAY_PORT";

/// Errors raised while turning configuration into usable upstream credentials
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Store domain or access token is absent
    #[error("Configuration Shopify manquante")]
    Missing {
        domain_exists: bool,
        token_exists: bool,
    },

    /// The store domain does not produce a valid endpoint URL
    #[error("Invalid Shopify endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

/// Configuration for the Storefront proxy gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Store domain, e.g. `my-shop.myshopify.com`
    #[serde(default)]
    pub store_domain: Option<String>,

    /// Storefront API access token
    #[serde(default)]
    pub access_token: Option<String>,

    /// Storefront API version segment of the endpoint path
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Port the gateway listens on
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Credentials resolved from a valid [`GatewayConfig`]
#[derive(Debug, Clone)]
pub struct Credentials<'a> {
    /// Full GraphQL endpoint URL
    pub endpoint: Url,

    /// Access token injected in the upstream request headers
    pub access_token: &'a str,
}

/// Configuration for the catalog view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    /// URL of the gateway products endpoint
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,
}

/// Default value for api_version
fn default_api_version() -> String {
    "2023-01".to_string()
}

/// Default value for port
fn default_port() -> u16 {
    3000
}

/// Default value for gateway_url
fn default_gateway_url() -> String {
    "http://localhost:3000/api/shopify/products".to_string()
}

/// Reads an environment variable, treating empty values as absent
fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            store_domain: None,
            access_token: None,
            api_version: default_api_version(),
            port: default_port(),
        }
    }
}

impl GatewayConfig {
    /// Create a configuration holding both credentials
    pub fn new(store_domain: &str, access_token: &str) -> Self {
        Self {
            store_domain: Some(store_domain.to_string()),
            access_token: Some(access_token.to_string()),
            ..Self::default()
        }
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Self {
        Self::default().with_env_fallback()
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Fill values the configuration does not carry from the environment
    pub fn with_env_fallback(mut self) -> Self {
        if self.store_domain.as_deref().is_none_or(str::is_empty) {
            self.store_domain = non_empty_var(STORE_DOMAIN_VAR);
        }
        if self.access_token.as_deref().is_none_or(str::is_empty) {
            self.access_token = non_empty_var(ACCESS_TOKEN_VAR);
        }
        if let Some(version) = non_empty_var(API_VERSION_VAR) {
            self.api_version = version;
        }
        if let Some(port) = non_empty_var(PORT_VAR) {
            match port.parse() {
                Ok(port) => self.port = port,
                Err(e) => ::log::warn!("Invalid {} value {:?}: {}", PORT_VAR, port, e),
            }
        }
        self
    }

    /// Resolve the upstream endpoint and token, failing if either credential is missing
    pub fn credentials(&self) -> Result<Credentials<'_>, ConfigError> {
        let domain = self.store_domain.as_deref().filter(|d| !d.is_empty());
        let token = self.access_token.as_deref().filter(|t| !t.is_empty());

        let (Some(domain), Some(access_token)) = (domain, token) else {
            return Err(ConfigError::Missing {
                domain_exists: domain.is_some(),
                token_exists: token.is_some(),
            });
        };

        Ok(Credentials {
            endpoint: self.endpoint_for(domain)?,
            access_token,
        })
    }

    /// Build the GraphQL endpoint; a domain with a scheme is used as the base URL
    fn endpoint_for(&self, domain: &str) -> Result<Url, url::ParseError> {
        let base = if domain.contains("://") {
            domain.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", domain.trim_end_matches('/'))
        };

        Url::parse(&format!("{}/api/{}/graphql.json", base, self.api_version))
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            gateway_url: default_gateway_url(),
        }
    }
}

impl ViewConfig {
    /// Create a configuration pointing at the given gateway URL
    pub fn new(gateway_url: &str) -> Self {
        Self {
            gateway_url: gateway_url.to_string(),
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_build_https_endpoint() {
        let config = GatewayConfig::new("my-shop.myshopify.com", "secret");
        let credentials = config.credentials().unwrap();

        assert_eq!(
            credentials.endpoint.as_str(),
            "https://my-shop.myshopify.com/api/2023-01/graphql.json"
        );
        assert_eq!(credentials.access_token, "secret");
    }

    #[test]
    fn test_domain_with_scheme_is_kept() {
        let config = GatewayConfig::new("http://127.0.0.1:8080/", "secret");
        let credentials = config.credentials().unwrap();

        assert_eq!(
            credentials.endpoint.as_str(),
            "http://127.0.0.1:8080/api/2023-01/graphql.json"
        );
    }

    #[test]
    fn test_missing_credentials() {
        let config = GatewayConfig {
            store_domain: Some("my-shop.myshopify.com".to_string()),
            ..GatewayConfig::default()
        };

        match config.credentials() {
            Err(ConfigError::Missing {
                domain_exists,
                token_exists,
            }) => {
                assert!(domain_exists);
                assert!(!token_exists);
            }
            other => panic!("expected missing configuration, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_values_count_as_missing() {
        let config = GatewayConfig::new("", "");
        let err = config.credentials().unwrap_err();

        assert_eq!(err.to_string(), "Configuration Shopify manquante");
    }

    #[test]
    fn test_from_json_defaults() {
        let config =
            GatewayConfig::from_json(r#"{"store_domain": "shop.example", "access_token": "t"}"#)
                .unwrap();

        assert_eq!(config.api_version, "2023-01");
        assert_eq!(config.port, 3000);
        assert!(config.credentials().is_ok());
    }

    #[test]
    fn test_custom_api_version() {
        let config = GatewayConfig {
            api_version: "2024-04".to_string(),
            ..GatewayConfig::new("shop.example", "t")
        };

        assert_eq!(
            config.credentials().unwrap().endpoint.path(),
            "/api/2024-04/graphql.json"
        );
    }

    #[test]
    fn test_view_config_default_url() {
        let config = ViewConfig::default();
        assert_eq!(
            config.gateway_url,
            "http://localhost:3000/api/shopify/products"
        );
    }
}
