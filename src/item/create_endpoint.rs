//! Defines the endpoint for adding an item to a shopping list.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::Response,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    catalog::{CatalogItemId, NewCatalogItem, create_catalog_item},
    db::lock_connection,
    endpoints::{self, format_endpoint},
    item::{ItemState, NewItem, ShoppingItem, create_item, create_item_from_catalog},
    list::ListId,
    response::created,
};

/// The JSON body for adding an item to a shopping list.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemPayload {
    /// The list to add the item to, required.
    pub list_id: Option<ListId>,
    /// What to buy, required.
    pub name: Option<String>,
    /// Defaults to 1.
    pub quantity: Option<i64>,
    /// Defaults to "pcs".
    pub unit: Option<String>,
    /// Defaults to "General".
    pub category: Option<String>,
    /// Defaults to 0.
    pub price: Option<f64>,
    /// The catalog item the item was picked from, if any.
    ///
    /// When set, the catalog item's usage count is incremented in the same
    /// transaction that creates the item.
    pub catalog_item_id: Option<CatalogItemId>,
}

/// A route handler for adding an item to a shopping list, responds with the
/// new item.
///
/// Items typed in by hand are also added to the catalog if it does not
/// already have an item with the same name.
pub async fn create_item_endpoint(
    State(state): State<ItemState>,
    payload: Result<Json<CreateItemPayload>, JsonRejection>,
) -> Result<Response, Error> {
    let Json(payload) = payload?;
    let list_id = payload.list_id.ok_or(Error::MissingField("listId"))?;
    let name = payload.name.as_deref().ok_or(Error::MissingField("name"))?;
    let new_item = NewItem::build(
        list_id,
        name,
        payload.quantity,
        payload.unit.as_deref(),
        payload.category.as_deref(),
        payload.price,
    )?;

    let connection = lock_connection(&state.db_connection)?;

    let item = match payload.catalog_item_id {
        Some(catalog_item_id) => create_item_from_catalog(&new_item, catalog_item_id, &connection)?,
        None => {
            let item = create_item(&new_item, &connection)?;
            remember_in_catalog(&item, &connection);
            item
        }
    };

    Ok(created(format_endpoint(endpoints::ITEM_API, item.id), item))
}

/// Add `item` to the catalog so it can be picked for later lists.
///
/// This is advisory: an item that is already catalogued is skipped and any
/// other error is logged and discarded.
fn remember_in_catalog(item: &ShoppingItem, connection: &Connection) {
    let new_catalog_item = match NewCatalogItem::build(
        &item.name,
        Some(item.quantity),
        Some(&item.unit),
        Some(&item.category),
        Some(item.price),
    ) {
        Ok(new_catalog_item) => new_catalog_item,
        Err(error) => {
            tracing::warn!("Could not add item {} to the catalog: {error}", item.id);
            return;
        }
    };

    match create_catalog_item(&new_catalog_item, connection) {
        Ok(catalog_item) => tracing::debug!(
            "Added \"{}\" to the catalog as {}",
            catalog_item.name,
            catalog_item.id
        ),
        Err(Error::DuplicateCatalogName(_)) => {}
        Err(error) => {
            tracing::warn!("Could not add \"{}\" to the catalog: {error}", item.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        extract::State,
        http::{StatusCode, header::LOCATION},
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        catalog::{
            CatalogFilter, CatalogItemUpdate, NewCatalogItem, create_catalog_item,
            get_catalog_item, get_catalog_items, update_catalog_item,
        },
        initialize_db,
        item::{ItemState, create_item_endpoint, get_item, get_items_in_list},
        list::{ListId, NewList, create_list},
    };

    use super::CreateItemPayload;

    fn get_test_state_and_list() -> (ItemState, ListId) {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();
        let list = create_list(
            &NewList::new("Groceries", date!(2025 - 03 - 03)).unwrap(),
            &connection,
        )
        .unwrap();

        let state = ItemState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        (state, list.id)
    }

    #[tokio::test]
    async fn can_create_item_with_defaults() {
        let (state, list_id) = get_test_state_and_list();
        let payload = CreateItemPayload {
            list_id: Some(list_id),
            name: Some("Bread".to_owned()),
            ..Default::default()
        };

        let response = create_item_endpoint(State(state.clone()), Ok(Json(payload)))
            .await
            .expect("Could not create item");

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers().get(LOCATION).unwrap(), "/api/items/1");
        let item = get_item(1, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(item.name, "Bread");
        assert_eq!(item.quantity, 1);
        assert_eq!(item.unit, "pcs");
        assert_eq!(item.category, "General");
        assert_eq!(item.price, 0.0);
        assert!(!item.completed);
    }

    #[tokio::test]
    async fn create_item_adds_item_to_catalog() {
        let (state, list_id) = get_test_state_and_list();
        let payload = CreateItemPayload {
            list_id: Some(list_id),
            name: Some("Coffee".to_owned()),
            quantity: Some(2),
            unit: Some("bags".to_owned()),
            category: Some("Beverages".to_owned()),
            price: Some(7.5),
            catalog_item_id: None,
        };

        create_item_endpoint(State(state.clone()), Ok(Json(payload)))
            .await
            .expect("Could not create item");

        let catalog = get_catalog_items(
            &CatalogFilter::default(),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].name, "Coffee");
        assert_eq!(catalog[0].default_quantity, 2);
        assert_eq!(catalog[0].default_unit, "bags");
        assert_eq!(catalog[0].category, "Beverages");
        assert_eq!(catalog[0].default_price, 7.5);
        assert_eq!(catalog[0].usage_count, 1);
    }

    #[tokio::test]
    async fn create_item_succeeds_when_already_catalogued() {
        let (state, list_id) = get_test_state_and_list();
        let catalog_item = create_catalog_item(
            &NewCatalogItem::build("Coffee", None, None, None, Some(5.0)).unwrap(),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();
        let payload = CreateItemPayload {
            list_id: Some(list_id),
            name: Some("coffee".to_owned()),
            price: Some(9.0),
            ..Default::default()
        };

        let response = create_item_endpoint(State(state.clone()), Ok(Json(payload))).await;

        assert!(response.is_ok());
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_catalog_item(catalog_item.id, &connection), Ok(catalog_item));
        assert_eq!(get_items_in_list(list_id, &connection).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn create_item_does_not_catalog_non_ascii_case_variant() {
        let (state, list_id) = get_test_state_and_list();
        for name in ["Crème fraîche", "CRÈME FRAÎCHE"] {
            let payload = CreateItemPayload {
                list_id: Some(list_id),
                name: Some(name.to_owned()),
                ..Default::default()
            };

            create_item_endpoint(State(state.clone()), Ok(Json(payload)))
                .await
                .expect("Could not create item");
        }

        let catalog = get_catalog_items(
            &CatalogFilter::default(),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].name, "Crème fraîche");
    }

    #[tokio::test]
    async fn create_item_succeeds_when_catalog_rejects_item() {
        let (state, list_id) = get_test_state_and_list();
        state
            .db_connection
            .lock()
            .unwrap()
            .execute("DROP TABLE catalog_item", ())
            .unwrap();
        let payload = CreateItemPayload {
            list_id: Some(list_id),
            name: Some("Tea".to_owned()),
            ..Default::default()
        };

        let response = create_item_endpoint(State(state.clone()), Ok(Json(payload))).await;

        assert!(response.is_ok());
        assert_eq!(
            get_items_in_list(list_id, &state.db_connection.lock().unwrap())
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn create_item_from_catalog_records_usage() {
        let (state, list_id) = get_test_state_and_list();
        let catalog_item = create_catalog_item(
            &NewCatalogItem::build("Milk", None, None, Some("Dairy"), None).unwrap(),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();
        let payload = CreateItemPayload {
            list_id: Some(list_id),
            name: Some("Milk".to_owned()),
            category: Some("Dairy".to_owned()),
            catalog_item_id: Some(catalog_item.id),
            ..Default::default()
        };

        create_item_endpoint(State(state.clone()), Ok(Json(payload)))
            .await
            .expect("Could not create item");

        let catalog_item =
            get_catalog_item(catalog_item.id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(catalog_item.usage_count, 2);
    }

    #[tokio::test]
    async fn create_item_from_catalog_does_not_touch_catalog_fields() {
        let (state, list_id) = get_test_state_and_list();
        let catalog_item = {
            let connection = state.db_connection.lock().unwrap();
            let catalog_item = create_catalog_item(
                &NewCatalogItem::build("Milk", None, None, None, Some(1.0)).unwrap(),
                &connection,
            )
            .unwrap();
            update_catalog_item(
                catalog_item.id,
                &CatalogItemUpdate {
                    category: Some("Dairy".to_owned()),
                    ..Default::default()
                },
                &connection,
            )
            .unwrap()
        };
        let payload = CreateItemPayload {
            list_id: Some(list_id),
            name: Some("Milk".to_owned()),
            price: Some(3.0),
            catalog_item_id: Some(catalog_item.id),
            ..Default::default()
        };

        create_item_endpoint(State(state.clone()), Ok(Json(payload)))
            .await
            .expect("Could not create item");

        let got = get_catalog_item(catalog_item.id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(got.default_price, 1.0);
        assert_eq!(got.category, "Dairy");
    }

    #[tokio::test]
    async fn create_item_fails_without_list_id() {
        let (state, _) = get_test_state_and_list();
        let payload = CreateItemPayload {
            name: Some("Bread".to_owned()),
            ..Default::default()
        };

        let result = create_item_endpoint(State(state), Ok(Json(payload))).await;

        assert_eq!(result.err(), Some(Error::MissingField("listId")));
    }

    #[tokio::test]
    async fn create_item_fails_on_missing_list() {
        let (state, list_id) = get_test_state_and_list();
        let payload = CreateItemPayload {
            list_id: Some(list_id + 10),
            name: Some("Bread".to_owned()),
            ..Default::default()
        };

        let result = create_item_endpoint(State(state.clone()), Ok(Json(payload))).await;

        assert_eq!(result.err(), Some(Error::InvalidListId(list_id + 10)));
        let catalog = get_catalog_items(
            &CatalogFilter::default(),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();
        assert!(catalog.is_empty());
    }
}
