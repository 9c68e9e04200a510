//! Defines the endpoints for browsing the catalog.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};

use crate::{
    Error,
    catalog::{
        CatalogFilter, CatalogItem, CatalogItemId, CatalogState, get_catalog_item,
        get_catalog_items,
    },
    db::lock_connection,
};

/// A route handler for listing catalog items, most used first.
///
/// The optional `search` and `category` query parameters narrow down the
/// results.
pub async fn get_catalog_items_endpoint(
    State(state): State<CatalogState>,
    filter: Result<Query<CatalogFilter>, QueryRejection>,
) -> Result<Json<Vec<CatalogItem>>, Error> {
    let Query(filter) = filter?;
    let connection = lock_connection(&state.db_connection)?;

    get_catalog_items(&filter, &connection).map(Json)
}

/// A route handler for getting a single catalog item.
pub async fn get_catalog_item_endpoint(
    State(state): State<CatalogState>,
    path: Result<Path<CatalogItemId>, PathRejection>,
) -> Result<Json<CatalogItem>, Error> {
    let Path(catalog_item_id) = path?;
    let connection = lock_connection(&state.db_connection)?;

    get_catalog_item(catalog_item_id, &connection).map(Json)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, Query, State};
    use rusqlite::Connection;

    use crate::{
        Error,
        catalog::{
            CatalogFilter, CatalogState, NewCatalogItem, create_catalog_item,
            get_catalog_item_endpoint, get_catalog_items_endpoint,
        },
        initialize_db,
    };

    fn get_test_state() -> CatalogState {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();

        for (name, category) in [("Apples", "Produce"), ("Pears", "Produce"), ("Ham", "Deli")] {
            create_catalog_item(
                &NewCatalogItem::build(name, None, None, Some(category), None).unwrap(),
                &connection,
            )
            .unwrap();
        }

        CatalogState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn lists_all_items_without_filter() {
        let state = get_test_state();

        let items = get_catalog_items_endpoint(State(state), Ok(Query(CatalogFilter::default())))
            .await
            .expect("Could not get catalog");

        let names: Vec<&str> = items.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, vec!["Apples", "Ham", "Pears"]);
    }

    #[tokio::test]
    async fn filters_by_category() {
        let state = get_test_state();
        let filter = CatalogFilter {
            search: None,
            category: Some("Deli".to_owned()),
        };

        let items = get_catalog_items_endpoint(State(state), Ok(Query(filter)))
            .await
            .expect("Could not get catalog");

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Ham");
    }

    #[tokio::test]
    async fn get_missing_catalog_item_returns_not_found() {
        let state = get_test_state();

        let result = get_catalog_item_endpoint(State(state), Ok(Path(99))).await;

        assert_eq!(result.err(), Some(Error::NotFound));
    }

    #[tokio::test]
    async fn get_catalog_item_succeeds() {
        let state = get_test_state();

        let item = get_catalog_item_endpoint(State(state), Ok(Path(2)))
            .await
            .expect("Could not get catalog item");

        assert_eq!(item.name, "Pears");
    }
}
