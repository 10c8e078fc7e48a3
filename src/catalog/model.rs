use serde::{Deserialize, Serialize};

/// A product as returned by the Storefront `products` connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Global product ID
    pub id: String,

    /// Product title
    pub title: String,

    /// URL handle
    pub handle: String,

    /// Plain text description
    #[serde(default)]
    pub description: String,

    /// Price range across variants
    pub price_range: PriceRange,

    /// Product images, the query asks for at most one
    #[serde(default)]
    pub images: ImageConnection,
}

/// Price range of a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    /// Cheapest variant price
    pub min_variant_price: Money,
}

/// A decimal amount in a currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Decimal amount as sent by Shopify, e.g. `"19.90"`
    pub amount: String,

    /// ISO 4217 currency code
    pub currency_code: String,
}

/// Image edge list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageConnection {
    pub edges: Vec<ImageEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageEdge {
    pub node: Image,
}

/// A product image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Image URL
    pub url: String,

    /// Alternative text, often unset
    #[serde(default)]
    pub alt_text: Option<String>,
}

/// `data` member of the products query response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductsData {
    pub products: ProductConnection,
}

/// A page of the `products` connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductConnection {
    pub edges: Vec<ProductEdge>,
    pub page_info: PageInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductEdge {
    pub node: Product,

    /// Per-edge cursor, unused by pagination
    #[serde(default)]
    pub cursor: Option<String>,
}

/// Connection page info
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether another page exists after this one
    pub has_next_page: bool,

    /// Cursor of the last edge, absent for an empty page
    #[serde(default)]
    pub end_cursor: Option<String>,
}

impl Product {
    /// Representative image, the first one returned
    pub fn image(&self) -> Option<&Image> {
        self.images.edges.first().map(|edge| &edge.node)
    }

    /// Cheapest variant price
    pub fn price(&self) -> &Money {
        &self.price_range.min_variant_price
    }
}

impl ProductConnection {
    /// Products of this page in upstream order
    pub fn into_products(self) -> Vec<Product> {
        self.edges.into_iter().map(|edge| edge.node).collect()
    }
}
