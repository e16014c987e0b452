//! User operations. Records never carry the password.

use serde_json::Value;

use hbnb_core::models::{
    as_object, parse_create, require_field, CreateUserRequest, Model, UpdateUserRequest, User,
};
use hbnb_core::storage::Result;

use super::{list, persist, remove, show, update, Record};
use crate::state::AppState;

pub async fn list_users(app: &AppState) -> Result<Vec<Record>> {
    list::<User>(app).await
}

pub async fn get_user(app: &AppState, user_id: &str) -> Result<Record> {
    show::<User>(app, user_id).await
}

/// Creates a user. Requires `email`, then `password`.
pub async fn create_user(app: &AppState, body: &Value) -> Result<Record> {
    let body = as_object(body)?;
    require_field(body, "email")?;
    require_field(body, "password")?;
    let request: CreateUserRequest = parse_create(body)?;

    let _guard = app.write_lock().await;
    persist(app, request.into_user().into_entity()).await
}

/// Updates names and password. `email` cannot be changed.
pub async fn update_user(app: &AppState, user_id: &str, body: &Value) -> Result<Record> {
    update::<UpdateUserRequest>(app, user_id, body).await
}

/// Deletes a user with their places and reviews.
pub async fn delete_user(app: &AppState, user_id: &str) -> Result<Record> {
    remove::<User>(app, user_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::*;
    use hbnb_core::models::EntityKind;
    use hbnb_core::storage::relations::get_as;
    use hbnb_core::storage::RepositoryError;
    use serde_json::json;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_create_user_requires_email_before_password() {
        let (_dir, app) = file_app().await;

        let result = create_user(&app, &json!({})).await;
        assert_eq!(
            result,
            Err(RepositoryError::Validation("Missing email".to_string()))
        );

        let result = create_user(&app, &json!({"email": "a@b.c"})).await;
        assert_eq!(
            result,
            Err(RepositoryError::Validation("Missing password".to_string()))
        );
    }

    #[tokio::test]
    async fn test_user_record_hides_password() {
        let (_dir, app) = file_app().await;

        let record = create_user(
            &app,
            &json!({"email": "a@b.c", "password": "pw", "first_name": "Ada"}),
        )
        .await
        .unwrap();

        assert!(!record.contains_key("password"));
        assert_eq!(record["first_name"], "Ada");
        assert!(!get_user(&app, &id_of(&record))
            .await
            .unwrap()
            .contains_key("password"));
    }

    #[tokio::test]
    async fn test_update_user_ignores_email_and_sets_password() {
        let app = db_app().await;
        let record = create_user(&app, &json!({"email": "a@b.c", "password": "pw"}))
            .await
            .unwrap();
        let id = id_of(&record);

        let updated = update_user(
            &app,
            &id,
            &json!({"email": "new@b.c", "password": "new", "last_name": "Lovelace"}),
        )
        .await
        .unwrap();

        assert_eq!(updated["email"], "a@b.c");
        assert_eq!(updated["last_name"], "Lovelace");

        let stored = get_as::<User>(app.storage.as_ref(), Uuid::parse_str(&id).unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.password, "new");
        assert_eq!(list_users(&app).await.unwrap().len(), 1);
        assert!(app
            .storage
            .get(EntityKind::User, stored.id)
            .await
            .unwrap()
            .is_some());
    }
}
