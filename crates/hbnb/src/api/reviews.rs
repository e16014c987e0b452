//! Review operations, nested under places.

use serde_json::Value;

use hbnb_core::models::{
    as_object, parse_create, require_field, CreateReviewRequest, Model, Place, Review,
    UpdateReviewRequest,
};
use hbnb_core::storage::relations::reviews_of_place;
use hbnb_core::storage::Result;

use super::{fetch, persist, records, remove, resolve_user, show, update, Record};
use crate::state::AppState;

pub async fn list_reviews_of_place(app: &AppState, place_id: &str) -> Result<Vec<Record>> {
    let place = fetch::<Place>(app, place_id).await?;
    Ok(records(reviews_of_place(app.storage.as_ref(), place.id).await?))
}

pub async fn get_review(app: &AppState, review_id: &str) -> Result<Record> {
    show::<Review>(app, review_id).await
}

/// Creates a review of `place_id`.
///
/// Requires `user_id`, which must name an existing user, then `text`.
pub async fn create_review(app: &AppState, place_id: &str, body: &Value) -> Result<Record> {
    let _guard = app.write_lock().await;
    let place = fetch::<Place>(app, place_id).await?;

    let body = as_object(body)?;
    let user = resolve_user(app, require_field(body, "user_id")?).await?;
    require_field(body, "text")?;
    let request: CreateReviewRequest = parse_create(body)?;

    persist(app, request.into_review(place.id, user.id).into_entity()).await
}

pub async fn update_review(app: &AppState, review_id: &str, body: &Value) -> Result<Record> {
    update::<UpdateReviewRequest>(app, review_id, body).await
}

pub async fn delete_review(app: &AppState, review_id: &str) -> Result<Record> {
    remove::<Review>(app, review_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::cities::create_city;
    use crate::api::places::create_place;
    use crate::api::states::create_state;
    use crate::api::test_support::*;
    use crate::api::users::create_user;
    use hbnb_core::storage::RepositoryError;
    use serde_json::json;

    async fn place_and_user(app: &AppState) -> (String, String) {
        let state = create_state(app, &json!({"name": "Maine"})).await.unwrap();
        let city = create_city(app, &id_of(&state), &json!({"name": "Bangor"}))
            .await
            .unwrap();
        let user = create_user(app, &json!({"email": "r@v.w", "password": "pw"}))
            .await
            .unwrap();
        let place = create_place(
            app,
            &id_of(&city),
            &json!({"user_id": id_of(&user), "name": "Cabin"}),
        )
        .await
        .unwrap();
        (id_of(&place), id_of(&user))
    }

    #[tokio::test]
    async fn test_create_review_requires_text_after_user() {
        let (_dir, app) = file_app().await;
        let (place_id, user_id) = place_and_user(&app).await;

        let result = create_review(&app, &place_id, &json!({"user_id": user_id})).await;
        assert_eq!(
            result,
            Err(RepositoryError::Validation("Missing text".to_string()))
        );
    }

    #[tokio::test]
    async fn test_review_lifecycle() {
        let app = db_app().await;
        let (place_id, user_id) = place_and_user(&app).await;

        let review = create_review(
            &app,
            &place_id,
            &json!({"user_id": user_id, "text": "Cozy"}),
        )
        .await
        .unwrap();
        let id = id_of(&review);

        let updated = update_review(&app, &id, &json!({"text": "Very cozy", "place_id": "x"}))
            .await
            .unwrap();
        assert_eq!(updated["text"], "Very cozy");
        assert_eq!(updated["place_id"], place_id.as_str());
        assert_eq!(
            list_reviews_of_place(&app, &place_id).await.unwrap(),
            vec![updated]
        );

        delete_review(&app, &id).await.unwrap();
        assert!(list_reviews_of_place(&app, &place_id)
            .await
            .unwrap()
            .is_empty());
    }
}
