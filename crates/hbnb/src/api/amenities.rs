//! Amenity operations.

use serde_json::Value;

use hbnb_core::models::{
    as_object, parse_create, require_field, Amenity, CreateAmenityRequest, Model,
    UpdateAmenityRequest,
};
use hbnb_core::storage::Result;

use super::{list, persist, remove, show, update, Record};
use crate::state::AppState;

pub async fn list_amenities(app: &AppState) -> Result<Vec<Record>> {
    list::<Amenity>(app).await
}

pub async fn get_amenity(app: &AppState, amenity_id: &str) -> Result<Record> {
    show::<Amenity>(app, amenity_id).await
}

pub async fn create_amenity(app: &AppState, body: &Value) -> Result<Record> {
    let body = as_object(body)?;
    require_field(body, "name")?;
    let request: CreateAmenityRequest = parse_create(body)?;

    let _guard = app.write_lock().await;
    persist(app, request.into_amenity().into_entity()).await
}

pub async fn update_amenity(app: &AppState, amenity_id: &str, body: &Value) -> Result<Record> {
    update::<UpdateAmenityRequest>(app, amenity_id, body).await
}

/// Deletes an amenity and unlinks it from every place.
pub async fn delete_amenity(app: &AppState, amenity_id: &str) -> Result<Record> {
    remove::<Amenity>(app, amenity_id).await
}
