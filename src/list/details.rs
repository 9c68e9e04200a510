//! Shopping lists combined with their items and summaries.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    item::{ShoppingItem, get_items_in_list},
    list::{ListId, ShoppingList, get_all_lists, get_list},
    summary::{ListSummary, summarize},
};

/// A shopping list with all of its items and their summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListWithItems {
    /// The list itself.
    #[serde(flatten)]
    pub list: ShoppingList,
    /// The items in the list ordered by category and then name.
    pub items: Vec<ShoppingItem>,
    /// Totals for `items`.
    pub summary: ListSummary,
}

/// A shopping list with the summary of its items, used for the list index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListOverview {
    /// The list itself.
    #[serde(flatten)]
    pub list: ShoppingList,
    /// Totals for the items in the list.
    pub summary: ListSummary,
}

/// Retrieve a shopping list, its items and their summary.
///
/// # Errors
/// Returns [Error::NotFound] if there is no list with `id`.
pub fn get_list_with_items(id: ListId, connection: &Connection) -> Result<ListWithItems, Error> {
    let list = get_list(id, connection)?;
    let items = get_items_in_list(id, connection)?;
    let summary = summarize(&items);

    Ok(ListWithItems {
        list,
        items,
        summary,
    })
}

/// Retrieve every shopping list with its summary, the most recent week first.
pub fn get_list_overviews(connection: &Connection) -> Result<Vec<ListOverview>, Error> {
    get_all_lists(connection)?
        .into_iter()
        .map(|list| {
            let items = get_items_in_list(list.id, connection)?;

            Ok(ListOverview {
                summary: summarize(&items),
                list,
            })
        })
        .collect()
}
