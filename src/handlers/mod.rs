pub mod categories;
pub mod category_types;
pub mod icons;
pub mod payment_items;
pub mod recipients;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        // Category types
        .route(
            "/category-types",
            get(category_types::list).post(category_types::create),
        )
        // Categories
        .route(
            "/categories",
            get(categories::list_all).post(categories::create),
        )
        .route("/categories/selectable", get(categories::selectable))
        .route("/categories/tree", get(categories::tree))
        .route("/categories/by-type/:type_id", get(categories::list_by_type))
        .route(
            "/categories/:id",
            get(categories::show).put(categories::update),
        )
        .route("/categories/:id/descendants", get(categories::descendants))
        .route(
            "/categories/:id/parent-options",
            get(categories::parent_options),
        )
        .route("/categories/:id/icon", get(categories::icon))
        // Icons
        .route("/uploadicon", post(icons::upload))
        .route("/download_static/:filename", get(icons::download))
        // Recipients
        .route(
            "/recipients",
            get(recipients::list).post(recipients::create),
        )
        .route("/recipients/:id", get(recipients::show))
        // Payment items
        .route(
            "/payment-items",
            get(payment_items::list).post(payment_items::create),
        )
        .route(
            "/payment-items/:id",
            get(payment_items::show)
                .put(payment_items::update)
                .delete(payment_items::delete),
        )
        .route("/payment-items/:id/icon", get(payment_items::icon))
        // Health check
        .route("/health", get(health))
}

async fn health() -> &'static str {
    "OK"
}
