
use crate::catalog::{CatalogError, CatalogSource, SourceReply};
use crate::graphql::GraphqlRequest;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Catalog source replaying scripted replies and recording requests
#[derive(Default)]
pub(super) struct ScriptedSource {
    replies: Mutex<VecDeque<Result<SourceReply, CatalogError>>>,
    requests: Mutex<Vec<GraphqlRequest>>,
}

impl ScriptedSource {
    pub(super) fn new(replies: Vec<Result<SourceReply, CatalogError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn push(&self, reply: Result<SourceReply, CatalogError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub(super) fn requests(&self) -> Vec<GraphqlRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl CatalogSource for ScriptedSource {
    async fn send(&self, request: &GraphqlRequest) -> Result<SourceReply, CatalogError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CatalogError::Network("no scripted reply".to_string())))
    }
}

pub(super) fn product_json(id: usize) -> Value {
    json!({
        "id": format!("gid://shopify/Product/{}", id),
        "title": format!("Produit {}", id),
        "handle": format!("produit-{}", id),
        "description": format!("Description du produit {}", id),
        "priceRange": { "minVariantPrice": { "amount": "10.0", "currencyCode": "EUR" } },
        "images": { "edges": [] }
    })
}

/// Successful products page reply with `count` products numbered from `first_id`
pub(super) fn page_reply(
    first_id: usize,
    count: usize,
    has_next_page: bool,
    end_cursor: Option<&str>,
) -> Result<SourceReply, CatalogError> {
    let edges: Vec<Value> = (first_id..first_id + count)
        .map(|id| json!({ "node": product_json(id), "cursor": format!("E{}", id) }))
        .collect();

    Ok(SourceReply::new(
        200,
        json!({
            "data": {
                "products": {
                    "edges": edges,
                    "pageInfo": { "hasNextPage": has_next_page, "endCursor": end_cursor }
                }
            }
        }),
    ))
}
