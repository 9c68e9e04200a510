//! The catalog of frequently bought items that can be reused across lists.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod get_endpoint;
mod use_endpoint;

pub use core::{
    CatalogFilter, CatalogItem, CatalogItemId, CatalogItemUpdate, CatalogState, NewCatalogItem,
    create_catalog_item, create_catalog_item_table, delete_catalog_item, get_catalog_item,
    get_catalog_items, record_catalog_usage, update_catalog_item,
};
pub use create_endpoint::create_catalog_item_endpoint;
pub use delete_endpoint::delete_catalog_item_endpoint;
pub use edit_endpoint::edit_catalog_item_endpoint;
pub use get_endpoint::{get_catalog_item_endpoint, get_catalog_items_endpoint};
pub use use_endpoint::use_catalog_item_endpoint;
