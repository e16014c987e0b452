//! Place operations, nested under cities.

use serde_json::Value;

use hbnb_core::models::{
    as_object, parse_create, require_field, City, CreatePlaceRequest, Model, Place,
    UpdatePlaceRequest,
};
use hbnb_core::storage::relations::places_of_city;
use hbnb_core::storage::Result;

use super::{fetch, persist, records, remove, resolve_user, show, update, Record};
use crate::state::AppState;

/// Lists the places of a city, oldest first.
pub async fn list_places_of_city(app: &AppState, city_id: &str) -> Result<Vec<Record>> {
    let city = fetch::<City>(app, city_id).await?;
    Ok(records(places_of_city(app.storage.as_ref(), city.id).await?))
}

pub async fn get_place(app: &AppState, place_id: &str) -> Result<Record> {
    show::<Place>(app, place_id).await
}

/// Creates a place in `city_id`.
///
/// Requires `user_id`, which must name an existing user, then `name`.
pub async fn create_place(app: &AppState, city_id: &str, body: &Value) -> Result<Record> {
    let _guard = app.write_lock().await;
    let city = fetch::<City>(app, city_id).await?;

    let body = as_object(body)?;
    let user = resolve_user(app, require_field(body, "user_id")?).await?;
    require_field(body, "name")?;
    let request: CreatePlaceRequest = parse_create(body)?;

    persist(app, request.into_place(city.id, user.id).into_entity()).await
}

/// Updates descriptive fields. Owner, city and amenity links are fixed.
pub async fn update_place(app: &AppState, place_id: &str, body: &Value) -> Result<Record> {
    update::<UpdatePlaceRequest>(app, place_id, body).await
}

/// Deletes a place with its reviews and amenity links.
pub async fn delete_place(app: &AppState, place_id: &str) -> Result<Record> {
    remove::<Place>(app, place_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::cities::create_city;
    use crate::api::states::create_state;
    use crate::api::test_support::*;
    use crate::api::users::create_user;
    use crate::state::AppState;
    use hbnb_core::storage::RepositoryError;
    use serde_json::json;

    async fn city_and_user(app: &AppState) -> (String, String) {
        let state = create_state(app, &json!({"name": "Oregon"})).await.unwrap();
        let city = create_city(app, &id_of(&state), &json!({"name": "Portland"}))
            .await
            .unwrap();
        let user = create_user(app, &json!({"email": "h@o.st", "password": "pw"}))
            .await
            .unwrap();
        (id_of(&city), id_of(&user))
    }

    #[tokio::test]
    async fn test_create_place_validation_order() {
        let (_dir, app) = file_app().await;
        let (city_id, user_id) = city_and_user(&app).await;

        let result = create_place(&app, &city_id, &json!({"name": "Loft"})).await;
        assert_eq!(
            result,
            Err(RepositoryError::Validation("Missing user_id".to_string()))
        );

        // An unknown user wins over a missing name.
        let result = create_place(&app, &city_id, &json!({"user_id": "ghost"})).await;
        assert_eq!(result, Err(RepositoryError::reference("User", "ghost")));

        let result = create_place(&app, &city_id, &json!({"user_id": user_id})).await;
        assert_eq!(
            result,
            Err(RepositoryError::Validation("Missing name".to_string()))
        );
    }

    #[tokio::test]
    async fn test_create_place_with_details() {
        let app = db_app().await;
        let (city_id, user_id) = city_and_user(&app).await;

        let record = create_place(
            &app,
            &city_id,
            &json!({
                "user_id": user_id,
                "name": "Loft",
                "number_rooms": 2,
                "price_by_night": 120,
                "latitude": 45.5
            }),
        )
        .await
        .unwrap();

        assert_eq!(record["number_rooms"], 2);
        assert_eq!(record["number_bathrooms"], 0);
        assert_eq!(record["latitude"], 45.5);
        assert_eq!(record["city_id"], city_id.as_str());
        assert_eq!(
            list_places_of_city(&app, &city_id).await.unwrap(),
            vec![record]
        );
    }

    #[tokio::test]
    async fn test_update_place_ignores_owner_and_links() {
        let (_dir, app) = file_app().await;
        let (city_id, user_id) = city_and_user(&app).await;
        let place = create_place(&app, &city_id, &json!({"user_id": user_id, "name": "Loft"}))
            .await
            .unwrap();

        let updated = update_place(
            &app,
            &id_of(&place),
            &json!({
                "name": "Big loft",
                "user_id": "someone-else",
                "city_id": "elsewhere",
                "amenity_ids": ["x"],
                "max_guest": 4
            }),
        )
        .await
        .unwrap();

        assert_eq!(updated["name"], "Big loft");
        assert_eq!(updated["max_guest"], 4);
        assert_eq!(updated["user_id"], user_id.as_str());
        assert_eq!(updated["city_id"], city_id.as_str());
        assert_eq!(updated["amenity_ids"], json!([]));
    }

    #[tokio::test]
    async fn test_update_place_wrong_type_mutates_nothing() {
        let (_dir, app) = file_app().await;
        let (city_id, user_id) = city_and_user(&app).await;
        let place = create_place(&app, &city_id, &json!({"user_id": user_id, "name": "Loft"}))
            .await
            .unwrap();
        let id = id_of(&place);

        let result = update_place(&app, &id, &json!({"name": "New", "number_rooms": "two"})).await;

        assert!(matches!(result, Err(RepositoryError::Validation(_))));
        assert_eq!(get_place(&app, &id).await.unwrap(), place);
    }
}
