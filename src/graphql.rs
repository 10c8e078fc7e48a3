use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of products requested per catalog page
pub const PAGE_SIZE: u32 = 12;

/// Storefront query listing products through the `products` connection
pub const PRODUCTS_QUERY: &str = r#"
  query Products($first: Int!, $after: String) {
    products(first: $first, after: $after) {
      edges {
        node {
          id
          title
          handle
          description
          priceRange {
            minVariantPrice {
              amount
              currencyCode
            }
          }
          images(first: 1) {
            edges {
              node {
                url
                altText
              }
            }
          }
        }
        cursor
      }
      pageInfo {
        hasNextPage
        endCursor
      }
    }
  }
"#;

/// GraphQL request envelope relayed by the gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequest {
    /// Query document
    pub query: String,

    /// Query variables
    #[serde(default)]
    pub variables: Value,

    /// Operation to run when the document holds several
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

/// Variables of [`PRODUCTS_QUERY`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariables {
    /// Page size
    pub first: u32,

    /// Cursor the page starts after, `null` for the first page
    pub after: Option<String>,
}

impl ProductVariables {
    /// Variables for a page starting after the given cursor
    pub fn after(cursor: Option<&str>) -> Self {
        Self {
            first: PAGE_SIZE,
            after: cursor.map(str::to_string),
        }
    }
}

impl GraphqlRequest {
    /// Create a request from a query document and variables
    pub fn new(query: &str, variables: Value) -> Self {
        Self {
            query: query.to_string(),
            variables,
            operation_name: None,
        }
    }

    /// Products listing request for the page after `cursor`
    pub fn products(cursor: Option<&str>) -> Self {
        let variables = ProductVariables::after(cursor);
        // A plain struct of a number and an optional string always serializes
        let variables = serde_json::to_value(&variables).unwrap_or_default();
        Self::new(PRODUCTS_QUERY, variables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_page_variables() {
        let request = GraphqlRequest::products(None);
        assert_eq!(request.variables, json!({ "first": 12, "after": null }));
        assert!(request.query.contains("pageInfo"));
    }

    #[test]
    fn test_next_page_variables() {
        let request = GraphqlRequest::products(Some("C1"));
        assert_eq!(request.variables, json!({ "first": 12, "after": "C1" }));
    }

    #[test]
    fn test_variables_decode_back() {
        let request = GraphqlRequest::products(Some("C7"));
        let variables: ProductVariables = serde_json::from_value(request.variables).unwrap();
        assert_eq!(variables, ProductVariables::after(Some("C7")));
    }

    #[test]
    fn test_operation_name_is_optional() {
        let request: GraphqlRequest =
            serde_json::from_str(r#"{"query": "{ shop { name } }"}"#).unwrap();
        assert_eq!(request.variables, Value::Null);
        assert_eq!(request.operation_name, None);

        let encoded = serde_json::to_value(&request).unwrap();
        assert!(encoded.get("operationName").is_none());
    }
}
