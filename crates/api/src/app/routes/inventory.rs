use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use pantry_infra::InventoryError;
use pantry_inventory::{InventoryItem, matches_search};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/items", get(list_items).post(add_item))
        .route("/items/:name/remove-one", post(remove_one))
        .route(
            "/items/:name",
            get(get_item).put(modify_item).delete(remove_all),
        )
}

fn items_response(result: Result<Vec<InventoryItem>, InventoryError>) -> axum::response::Response {
    match result {
        Ok(items) => {
            (StatusCode::OK, Json(dto::ItemsResponse::from_items(&items))).into_response()
        }
        Err(e) => errors::inventory_error_to_response(e),
    }
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ListItemsQuery>,
) -> axum::response::Response {
    let items = match services.inventory.list().await {
        Ok(items) => items,
        Err(e) => return errors::inventory_error_to_response(e),
    };

    let search = query.search.unwrap_or_default();
    let visible = items.iter().filter(|item| matches_search(&item.name, &search));
    Json(dto::ItemsResponse::from_items(visible)).into_response()
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(name): Path<String>,
) -> axum::response::Response {
    let name = match dto::parse_name(&name) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.inventory.find(&name).await {
        Ok(item) => Json(dto::ItemResponse::from(&item)).into_response(),
        Err(e) => errors::inventory_error_to_response(e),
    }
}

pub async fn add_item(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::AddItemRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(v) => v,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    let parsed = (dto::parse_name(&body.name), dto::parse_quantity(body.quantity));
    let (name, quantity) = match parsed {
        (Ok(n), Ok(q)) => (n, q),
        (Err(e), _) | (_, Err(e)) => return errors::domain_error_to_response(e),
    };

    items_response(services.inventory.add(name, quantity).await)
}

pub async fn remove_one(
    Extension(services): Extension<Arc<AppServices>>,
    Path(name): Path<String>,
) -> axum::response::Response {
    let name = match dto::parse_name(&name) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    items_response(services.inventory.remove(name).await)
}

pub async fn remove_all(
    Extension(services): Extension<Arc<AppServices>>,
    Path(name): Path<String>,
) -> axum::response::Response {
    let name = match dto::parse_name(&name) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    items_response(services.inventory.remove_all(name).await)
}

pub async fn modify_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(name): Path<String>,
    body: Result<Json<dto::ModifyItemRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(v) => v,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    let old_name = match dto::parse_name(&name) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let new_name = match body.name.as_deref().map(dto::parse_name).transpose() {
        Ok(v) => v.unwrap_or_else(|| old_name.clone()),
        Err(e) => return errors::domain_error_to_response(e),
    };
    let quantity = match dto::parse_quantity(body.quantity) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    items_response(services.inventory.modify(old_name, new_name, quantity).await)
}
