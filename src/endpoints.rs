//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/lists/{list_id}', use [format_endpoint].

/// The route to list and create shopping lists.
pub const LISTS_API: &str = "/api/lists";
/// The route to get, update and delete a single shopping list.
pub const LIST_API: &str = "/api/lists/{list_id}";
/// The route to list and create shopping items.
pub const ITEMS_API: &str = "/api/items";
/// The route to get, update and delete a single shopping item.
pub const ITEM_API: &str = "/api/items/{item_id}";
/// The route to list and create catalog items.
pub const CATALOG_API: &str = "/api/catalog";
/// The route to get, update and delete a single catalog item.
pub const CATALOG_ITEM_API: &str = "/api/catalog/{catalog_item_id}";
/// The route to record that a catalog item was picked for a list.
pub const CATALOG_ITEM_USE_API: &str = "/api/catalog/{catalog_item_id}/use";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/items/{item_id}', '{item_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
