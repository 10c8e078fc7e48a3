//! HTML and text rendering of a [`CatalogView`].
//!
//! Precedence follows the view state: a loading indicator while nothing has
//! been loaded yet, then the error panel, then the product grid with its
//! pagination controls.

use maud::{Markup, html};

use crate::utils::{DESCRIPTION_MAX_CHARS, format_price, truncate_description};

use super::model::Product;
use super::source::CatalogSource;
use super::view::CatalogView;

/// Image shown for products without one
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.jpg";

/// Shown when a page holds no products
pub const EMPTY_MESSAGE: &str = "Aucun produit trouvé";

pub(crate) fn html<S: CatalogSource>(view: &CatalogView<S>) -> String {
    let markup = if view.is_loading() && view.products().is_empty() {
        loading_markup()
    } else if view.error().is_some() {
        error_markup(view)
    } else {
        catalog_markup(view)
    };
    markup.into_string()
}

fn loading_markup() -> Markup {
    html! {
        div.catalog.catalog-loading role="status" aria-live="polite" {
            div.spinner aria-label="Chargement des produits" {}
        }
    }
}

fn error_markup<S: CatalogSource>(view: &CatalogView<S>) -> Markup {
    html! {
        div.catalog.catalog-error role="alert" {
            @if let Some(error) = view.error() {
                p.error-message { (error.to_string()) }
            }
            @if let Some(debug) = view.debug_info() {
                div.debug-info {
                    h3 { "Informations de débogage:" }
                    pre { (serde_json::to_string_pretty(debug).unwrap_or_default()) }
                }
            }
            div.retry {
                button type="button" data-action="retry" aria-label="Réessayer de charger les produits" {
                    "Réessayer"
                }
            }
        }
    }
}

fn catalog_markup<S: CatalogSource>(view: &CatalogView<S>) -> Markup {
    let products = view.products();

    html! {
        div.catalog {
            @if !products.is_empty() {
                div.catalog-header {
                    h2 { "Produits " span.product-count { "(" (products.len()) ")" } }
                }
            }
            div.product-grid {
                @if products.is_empty() {
                    div.empty-state { p { (EMPTY_MESSAGE) } }
                } @else {
                    @for product in products {
                        (product_card(product))
                    }
                }
            }
            @if view.total_pages() > 1 {
                (pagination_markup(view.current_page(), view.total_pages()))
            }
        }
    }
}

fn product_card(product: &Product) -> Markup {
    let (src, alt) = match product.image() {
        Some(image) => (
            image.url.as_str(),
            image.alt_text.as_deref().unwrap_or(&product.title),
        ),
        None => (PLACEHOLDER_IMAGE, product.title.as_str()),
    };
    let price = product.price();

    html! {
        article.product-card data-handle=(product.handle) aria-label={ "Produit : " (product.title) } {
            img src=(src) alt=(alt) loading="lazy";
            div.product-info {
                h2.product-title { (product.title) }
                p.product-description {
                    (truncate_description(&product.description, DESCRIPTION_MAX_CHARS))
                }
                p.product-price { (format_price(&price.amount, &price.currency_code)) }
            }
        }
    }
}

fn pagination_markup(current: u32, total: u32) -> Markup {
    html! {
        nav.pagination aria-label="Pagination" {
            button.page-previous type="button" data-page=(current.saturating_sub(1))
                aria-label="Page précédente" disabled[current == 1] { "Précédent" }
            @for page in 1..=total {
                @let is_current = page == current;
                button.page.page-current[is_current] type="button" data-page=(page)
                    aria-label={ "Page " (page) } aria-current=[is_current.then_some("page")] {
                    (page)
                }
            }
            button.page-next type="button" data-page=(current + 1)
                aria-label="Page suivante" disabled[current == total] { "Suivant" }
        }
    }
}

pub(crate) fn text<S: CatalogSource>(view: &CatalogView<S>) -> String {
    if view.is_loading() && view.products().is_empty() {
        return "Chargement des produits...\n".to_string();
    }

    if let Some(error) = view.error() {
        let mut text = format!("{}\n", error);
        if let Some(debug) = view.debug_info() {
            text.push_str("\nInformations de débogage:\n");
            text.push_str(&serde_json::to_string_pretty(debug).unwrap_or_default());
            text.push('\n');
        }
        return text;
    }

    let products = view.products();
    if products.is_empty() {
        return format!("{}\n", EMPTY_MESSAGE);
    }

    let mut text = format!(
        "Produits ({}), page {}/{}\n\n",
        products.len(),
        view.current_page(),
        view.total_pages()
    );
    for (index, product) in products.iter().enumerate() {
        let price = product.price();
        text.push_str(&format!(
            "{:>2}. {} [{}]\n    {}\n",
            index + 1,
            product.title,
            format_price(&price.amount, &price.currency_code),
            truncate_description(&product.description, DESCRIPTION_MAX_CHARS)
        ));
    }
    text
}
