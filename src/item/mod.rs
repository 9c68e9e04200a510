//! Items to buy in a shopping list.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod get_endpoint;

pub use core::{
    ItemId, ItemState, ItemUpdate, NewItem, ShoppingItem, create_item, create_item_from_catalog,
    create_item_table, delete_item, get_item, get_items_in_list, update_item,
};
pub use create_endpoint::create_item_endpoint;
pub use delete_endpoint::delete_item_endpoint;
pub use edit_endpoint::edit_item_endpoint;
pub use get_endpoint::{get_item_endpoint, get_items_endpoint};
