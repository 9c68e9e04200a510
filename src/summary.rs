//! Aggregate statistics for the items in a shopping list.
//!
//! Both the list index and the list detail responses use [summarize], so the
//! numbers shown for a list are always derived from its current items.

use serde::{Deserialize, Serialize};

use crate::item::ShoppingItem;

/// Read-only totals derived from a list's items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSummary {
    /// The number of items in the list.
    pub total_items: usize,
    /// The number of items that have been marked as completed.
    pub completed_items: usize,
    /// The cost of every item in the list, i.e., quantity times price.
    pub estimated_total: f64,
    /// The cost of the completed items only.
    pub actual_total: f64,
    /// The cost of the items that are still to be bought.
    pub remaining_total: f64,
    /// The share of completed items as a whole percentage in [0, 100].
    pub completion_percentage: u8,
}

/// Compute the [ListSummary] for `items`.
///
/// An empty list has a completion percentage of zero.
pub fn summarize(items: &[ShoppingItem]) -> ListSummary {
    let mut completed_items = 0;
    let mut estimated_total = 0.0;
    let mut actual_total = 0.0;

    for item in items {
        let cost = item.cost();
        estimated_total += cost;

        if item.completed {
            completed_items += 1;
            actual_total += cost;
        }
    }

    let total_items = items.len();

    ListSummary {
        total_items,
        completed_items,
        estimated_total,
        actual_total,
        remaining_total: estimated_total - actual_total,
        completion_percentage: completion_percentage(completed_items, total_items),
    }
}

fn completion_percentage(completed_items: usize, total_items: usize) -> u8 {
    if total_items == 0 {
        return 0;
    }

    let percentage = (completed_items as f64 / total_items as f64 * 100.0).round();

    percentage.clamp(0.0, 100.0) as u8
}
