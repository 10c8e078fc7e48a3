pub mod model;
pub mod pagination;
pub mod render;
pub mod source;
pub mod view;

#[cfg(test)]
mod tests;

pub use model::{Image, Money, PageInfo, Product, ProductConnection, ProductsData};
pub use pagination::{CursorTable, Pagination};
pub use source::{CatalogSource, GatewayClient, SourceReply};
pub use view::{CatalogError, CatalogView, DebugInfo, FetchTicket, PageChange, ViewState};
