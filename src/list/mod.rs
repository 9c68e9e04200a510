//! Weekly shopping lists and the items they own.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod details;
mod edit_endpoint;
mod get_endpoint;

pub use core::{
    ListId, ListState, ListUpdate, NewList, ShoppingList, create_list, create_list_table,
    delete_list, get_all_lists, get_list, update_list,
};
pub use create_endpoint::create_list_endpoint;
pub use delete_endpoint::delete_list_endpoint;
pub use details::{ListOverview, ListWithItems, get_list_overviews, get_list_with_items};
pub use edit_endpoint::edit_list_endpoint;
pub use get_endpoint::{get_list_endpoint, get_lists_endpoint};
