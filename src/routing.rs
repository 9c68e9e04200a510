//! Application router configuration.

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{
    AppState, Error,
    catalog::{
        create_catalog_item_endpoint, delete_catalog_item_endpoint, edit_catalog_item_endpoint,
        get_catalog_item_endpoint, get_catalog_items_endpoint, use_catalog_item_endpoint,
    },
    endpoints,
    item::{
        create_item_endpoint, delete_item_endpoint, edit_item_endpoint, get_item_endpoint,
        get_items_endpoint,
    },
    list::{
        create_list_endpoint, delete_list_endpoint, edit_list_endpoint, get_list_endpoint,
        get_lists_endpoint,
    },
    logging::logging_middleware,
};

/// Return a router with all the app's routes.
///
/// Requests for routes that do not exist get a JSON 404 response.
pub fn build_router(state: AppState) -> Router {
    let list_routes = Router::new()
        .route(
            endpoints::LISTS_API,
            get(get_lists_endpoint).post(create_list_endpoint),
        )
        .route(
            endpoints::LIST_API,
            get(get_list_endpoint)
                .put(edit_list_endpoint)
                .delete(delete_list_endpoint),
        );

    let item_routes = Router::new()
        .route(
            endpoints::ITEMS_API,
            get(get_items_endpoint).post(create_item_endpoint),
        )
        .route(
            endpoints::ITEM_API,
            get(get_item_endpoint)
                .put(edit_item_endpoint)
                .delete(delete_item_endpoint),
        );

    let catalog_routes = Router::new()
        .route(
            endpoints::CATALOG_API,
            get(get_catalog_items_endpoint).post(create_catalog_item_endpoint),
        )
        .route(
            endpoints::CATALOG_ITEM_API,
            get(get_catalog_item_endpoint)
                .put(edit_catalog_item_endpoint)
                .delete(delete_catalog_item_endpoint),
        )
        .route(
            endpoints::CATALOG_ITEM_USE_API,
            post(use_catalog_item_endpoint),
        );

    list_routes
        .merge(item_routes)
        .merge(catalog_routes)
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

async fn get_404_not_found() -> Error {
    Error::NotFound
}
