use crate::graphql::GraphqlRequest;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::model::{Product, ProductsData};
use super::pagination::Pagination;
use super::render;
use super::source::{CatalogSource, SourceReply};

/// Message used when a failed reply carries no `error` text
pub const DEFAULT_FETCH_ERROR: &str = "Erreur lors de la récupération des produits";

/// Why a catalog fetch failed; the display text is what the user sees
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The gateway answered with a non-success status
    #[error("Erreur {status}: {message}")]
    Http { status: u16, message: String },

    /// A successful reply without `data`
    #[error("Format de réponse invalide: data manquant")]
    InvalidResponse,

    /// `data` is present but is not a products connection
    #[error("Format de réponse invalide: {0}")]
    Malformed(String),

    /// The request never produced a reply
    #[error("{0}")]
    Network(String),

    /// The reply body was not JSON
    #[error("{0}")]
    Decode(String),
}

/// Last HTTP status and parsed body, shown alongside errors
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugInfo {
    pub status: u16,
    pub response_data: Value,
}

/// Observable state of the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Nothing requested yet
    Idle,
    /// A fetch is in flight
    Loading,
    /// The last fetch succeeded
    Success,
    /// The last fetch failed; [`CatalogView::retry`] re-issues it
    Error,
}

/// Outcome of a page change request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageChange {
    /// Target outside `[1, total_pages]`, nothing happened
    Ignored,
    /// Target is already the current page
    Unchanged,
    /// The page was selected and fetched
    Fetched,
}

/// A fetch started by [`CatalogView::begin_fetch`], to be handed back to [`CatalogView::complete`]
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    sequence: u64,
    page: u32,
    request: GraphqlRequest,
}

impl FetchTicket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn request(&self) -> &GraphqlRequest {
        &self.request
    }
}

/// Paginated product catalog driven through a [`CatalogSource`]
///
/// Each fetch replaces the displayed products with one page. Fetches are
/// sequenced: only the completion of the most recently issued fetch is
/// applied, older ones are dropped.
pub struct CatalogView<S> {
    source: S,
    products: Vec<Product>,
    pagination: Pagination,
    loading: bool,
    error: Option<CatalogError>,
    debug: Option<DebugInfo>,
    issued: u64,
}

impl<S: CatalogSource> CatalogView<S> {
    /// Create a view on page 1; nothing is fetched until [`mount`](Self::mount)
    pub fn new(source: S) -> Self {
        Self {
            source,
            products: Vec::new(),
            pagination: Pagination::new(),
            loading: true,
            error: None,
            debug: None,
            issued: 0,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn current_page(&self) -> u32 {
        self.pagination.current_page()
    }

    pub fn total_pages(&self) -> u32 {
        self.pagination.total_pages()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&CatalogError> {
        self.error.as_ref()
    }

    pub fn debug_info(&self) -> Option<&DebugInfo> {
        self.debug.as_ref()
    }

    pub fn state(&self) -> ViewState {
        if self.issued == 0 {
            ViewState::Idle
        } else if self.loading {
            ViewState::Loading
        } else if self.error.is_some() {
            ViewState::Error
        } else {
            ViewState::Success
        }
    }

    /// Fetch the initial page
    pub async fn mount(&mut self) -> bool {
        self.load().await
    }

    /// Re-issue the fetch for the current page
    pub async fn retry(&mut self) -> bool {
        ::log::info!("Retrying page {}", self.current_page());
        self.load().await
    }

    /// Navigate to `page` and fetch it
    pub async fn go_to(&mut self, page: u32) -> PageChange {
        if page == self.current_page() {
            return PageChange::Unchanged;
        }
        if !self.pagination.select(page) {
            return PageChange::Ignored;
        }
        self.load().await;
        PageChange::Fetched
    }

    pub async fn previous(&mut self) -> PageChange {
        self.go_to(self.current_page().saturating_sub(1)).await
    }

    pub async fn next(&mut self) -> PageChange {
        self.go_to(self.current_page().saturating_add(1)).await
    }

    /// Navigate to `target`, returning the page reached
    ///
    /// Pages ahead are fetched one at a time, since the cursor of a page is
    /// only known once the page before it was loaded. The walk stops early on
    /// the last page or on a failed fetch.
    pub async fn walk_to(&mut self, target: u32) -> u32 {
        if target <= self.current_page() {
            self.go_to(target).await;
            return self.current_page();
        }

        while self.current_page() < target && self.error.is_none() {
            if self.next().await != PageChange::Fetched {
                ::log::warn!(
                    "Page {} does not exist, stopping at page {} of {}",
                    target,
                    self.current_page(),
                    self.total_pages()
                );
                break;
            }
        }
        self.current_page()
    }

    /// Fetch the current page and apply the reply
    pub async fn load(&mut self) -> bool {
        let ticket = self.begin_fetch();
        let reply = self.source.send(&ticket.request).await;
        self.complete(ticket, reply)
    }

    /// Select `page` and start fetching it, or `None` if it is out of range
    pub fn begin_page(&mut self, page: u32) -> Option<FetchTicket> {
        if !self.pagination.select(page) {
            return None;
        }
        Some(self.begin_fetch())
    }

    /// Start a fetch of the current page, superseding any fetch in flight
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        self.loading = true;
        self.error = None;

        let page = self.pagination.current_page();
        let request = GraphqlRequest::products(self.pagination.current_cursor());
        ::log::debug!(
            "Fetching page {} (request #{}) with variables {}",
            page,
            self.issued,
            request.variables
        );

        FetchTicket {
            sequence: self.issued,
            page,
            request,
        }
    }

    /// Apply the reply of a fetch; returns `false` when the ticket was superseded
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        reply: Result<SourceReply, CatalogError>,
    ) -> bool {
        if ticket.sequence != self.issued {
            ::log::debug!(
                "Discarding stale reply #{} for page {} (latest is #{})",
                ticket.sequence,
                ticket.page,
                self.issued
            );
            return false;
        }

        self.loading = false;
        if let Err(e) = self.apply(ticket.page, reply) {
            ::log::error!("Failed to load page {}: {}", ticket.page, e);
            self.error = Some(e);
        }
        true
    }

    fn apply(
        &mut self,
        page: u32,
        reply: Result<SourceReply, CatalogError>,
    ) -> Result<(), CatalogError> {
        let reply = reply?;
        self.debug = Some(DebugInfo {
            status: reply.status,
            response_data: reply.body.clone(),
        });

        if !reply.is_success() {
            let message = reply
                .body
                .get("error")
                .and_then(Value::as_str)
                .filter(|message| !message.is_empty())
                .unwrap_or(DEFAULT_FETCH_ERROR);
            return Err(CatalogError::Http {
                status: reply.status,
                message: message.to_string(),
            });
        }

        let data = match reply.body.get("data") {
            Some(data) if !data.is_null() => data,
            _ => return Err(CatalogError::InvalidResponse),
        };
        let data: ProductsData = serde_json::from_value(data.clone())
            .map_err(|e| CatalogError::Malformed(e.to_string()))?;

        let page_info = data.products.page_info.clone();
        self.products = data.products.into_products();
        self.pagination.record_page(page, &page_info);

        ::log::info!(
            "Loaded page {} with {} products ({} pages known)",
            page,
            self.products.len(),
            self.pagination.total_pages()
        );
        Ok(())
    }

    /// Render the view as an HTML fragment
    pub fn render_html(&self) -> String {
        render::html(self)
    }

    /// Render the view as plain text
    pub fn render_text(&self) -> String {
        render::text(self)
    }
}
