//! City operations, nested under states.

use serde_json::Value;

use hbnb_core::models::{
    as_object, parse_create, require_field, City, CreateCityRequest, Model, State,
    UpdateCityRequest,
};
use hbnb_core::storage::relations::cities_of_state;
use hbnb_core::storage::Result;

use super::{fetch, persist, records, remove, show, update, Record};
use crate::state::AppState;

/// Lists the cities of a state, oldest first.
pub async fn list_cities_of_state(app: &AppState, state_id: &str) -> Result<Vec<Record>> {
    let state = fetch::<State>(app, state_id).await?;
    Ok(records(cities_of_state(app.storage.as_ref(), state.id).await?))
}

pub async fn get_city(app: &AppState, city_id: &str) -> Result<Record> {
    show::<City>(app, city_id).await
}

/// Creates a city in `state_id`. Requires `name`.
pub async fn create_city(app: &AppState, state_id: &str, body: &Value) -> Result<Record> {
    let _guard = app.write_lock().await;
    let state = fetch::<State>(app, state_id).await?;

    let body = as_object(body)?;
    require_field(body, "name")?;
    let request: CreateCityRequest = parse_create(body)?;

    persist(app, request.into_city(state.id).into_entity()).await
}

/// Renames a city. `state_id` cannot be changed.
pub async fn update_city(app: &AppState, city_id: &str, body: &Value) -> Result<Record> {
    update::<UpdateCityRequest>(app, city_id, body).await
}

/// Deletes a city with its places and their reviews.
pub async fn delete_city(app: &AppState, city_id: &str) -> Result<Record> {
    remove::<City>(app, city_id).await
}
