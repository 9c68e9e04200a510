//! Defines the endpoint for changing a shopping item, e.g. ticking it off.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};

use crate::{
    Error,
    db::lock_connection,
    item::{ItemId, ItemState, ItemUpdate, ShoppingItem, update_item},
};

/// A route handler for applying a partial update to a shopping item.
pub async fn edit_item_endpoint(
    State(state): State<ItemState>,
    path: Result<Path<ItemId>, PathRejection>,
    update: Result<Json<ItemUpdate>, JsonRejection>,
) -> Result<Json<ShoppingItem>, Error> {
    let Path(item_id) = path?;
    let Json(update) = update?;
    let connection = lock_connection(&state.db_connection)?;

    update_item(item_id, &update, &connection).map(Json)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        extract::{Path, State},
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error, initialize_db,
        item::{
            ItemState, ItemUpdate, NewItem, ShoppingItem, create_item, edit_item_endpoint,
            get_item,
        },
        list::{NewList, create_list},
    };

    fn get_test_state_and_item() -> (ItemState, ShoppingItem) {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();
        let list = create_list(
            &NewList::new("Groceries", date!(2025 - 03 - 03)).unwrap(),
            &connection,
        )
        .unwrap();
        let item = create_item(
            &NewItem::build(list.id, "Flour", Some(2), Some("kg"), Some("Baking"), Some(1.2))
                .unwrap(),
            &connection,
        )
        .unwrap();

        let state = ItemState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        (state, item)
    }

    #[tokio::test]
    async fn can_mark_item_completed() {
        let (state, item) = get_test_state_and_item();
        let update = ItemUpdate {
            completed: Some(true),
            ..Default::default()
        };

        let updated = edit_item_endpoint(State(state), Ok(Path(item.id)), Ok(Json(update)))
            .await
            .expect("Could not update item");

        assert!(updated.completed);
        assert_eq!(updated.name, item.name);
        assert_eq!(updated.quantity, item.quantity);
    }

    #[tokio::test]
    async fn empty_update_leaves_item_unchanged() {
        let (state, item) = get_test_state_and_item();

        let update = ItemUpdate::default();

        let result =
            edit_item_endpoint(State(state.clone()), Ok(Path(item.id)), Ok(Json(update))).await;

        assert_eq!(result.err(), Some(Error::EmptyUpdate));
        assert_eq!(get_item(item.id, &state.db_connection.lock().unwrap()), Ok(item));
    }

    #[tokio::test]
    async fn negative_price_is_rejected() {
        let (state, item) = get_test_state_and_item();
        let update = ItemUpdate {
            price: Some(-0.5),
            ..Default::default()
        };

        let result =
            edit_item_endpoint(State(state), Ok(Path(item.id)), Ok(Json(update))).await;

        assert_eq!(result.err(), Some(Error::InvalidPrice(-0.5)));
    }

    #[tokio::test]
    async fn update_missing_item_returns_not_found() {
        let (state, item) = get_test_state_and_item();
        let update = ItemUpdate {
            name: Some("Sugar".to_owned()),
            ..Default::default()
        };

        let result =
            edit_item_endpoint(State(state), Ok(Path(item.id + 1)), Ok(Json(update))).await;

        assert_eq!(result.err(), Some(Error::NotFound));
    }
}
