//! State operations.

use serde_json::Value;

use hbnb_core::models::{
    as_object, parse_create, require_field, CreateStateRequest, Model, State, UpdateStateRequest,
};
use hbnb_core::storage::Result;

use super::{list, persist, remove, show, update, Record};
use crate::state::AppState;

pub async fn list_states(app: &AppState) -> Result<Vec<Record>> {
    list::<State>(app).await
}

pub async fn get_state(app: &AppState, state_id: &str) -> Result<Record> {
    show::<State>(app, state_id).await
}

/// Creates a state. Requires `name`.
pub async fn create_state(app: &AppState, body: &Value) -> Result<Record> {
    let body = as_object(body)?;
    require_field(body, "name")?;
    let request: CreateStateRequest = parse_create(body)?;

    let _guard = app.write_lock().await;
    persist(app, request.into_state().into_entity()).await
}

pub async fn update_state(app: &AppState, state_id: &str, body: &Value) -> Result<Record> {
    update::<UpdateStateRequest>(app, state_id, body).await
}

/// Deletes a state and, through its cities, everything located in it.
pub async fn delete_state(app: &AppState, state_id: &str) -> Result<Record> {
    remove::<State>(app, state_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::*;
    use hbnb_core::storage::RepositoryError;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_state_returns_record() {
        let (_dir, app) = file_app().await;

        let record = create_state(&app, &json!({"name": "California"}))
            .await
            .unwrap();

        assert_eq!(record["__class__"], "State");
        assert_eq!(record["name"], "California");
        assert_eq!(record["created_at"], record["updated_at"]);
    }

    #[tokio::test]
    async fn test_create_state_requires_object() {
        let (_dir, app) = file_app().await;

        let result = create_state(&app, &json!("California")).await;
        assert_eq!(
            result,
            Err(RepositoryError::Validation("Not a JSON".to_string()))
        );
    }

    #[tokio::test]
    async fn test_create_state_requires_name() {
        let (_dir, app) = file_app().await;

        let result = create_state(&app, &json!({"nom": "California"})).await;
        assert_eq!(
            result,
            Err(RepositoryError::Validation("Missing name".to_string()))
        );
        assert!(list_states(&app).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_state_ignores_client_id() {
        let (_dir, app) = file_app().await;

        let record = create_state(&app, &json!({"name": "Ohio", "id": "fixed"}))
            .await
            .unwrap();
        assert_ne!(record["id"], "fixed");
    }

    #[tokio::test]
    async fn test_update_state_keeps_protected_fields() {
        let app = db_app().await;
        let created = create_state(&app, &json!({"name": "Cali"})).await.unwrap();
        let id = id_of(&created);

        let updated = update_state(
            &app,
            &id,
            &json!({
                "name": "California",
                "id": "other",
                "created_at": "2000-01-01T00:00:00Z",
                "updated_at": "2000-01-01T00:00:00Z"
            }),
        )
        .await
        .unwrap();

        assert_eq!(updated["name"], "California");
        assert_eq!(updated["id"], created["id"]);
        assert_eq!(updated["created_at"], created["created_at"]);
        assert_ne!(updated["updated_at"], "2000-01-01T00:00:00Z");
        assert_eq!(get_state(&app, &id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_state_rejects_unknown_field() {
        let (_dir, app) = file_app().await;
        let created = create_state(&app, &json!({"name": "Utah"})).await.unwrap();
        let id = id_of(&created);

        let result = update_state(&app, &id, &json!({"name": "X", "capital": "SLC"})).await;

        assert!(matches!(result, Err(RepositoryError::Validation(_))));
        assert_eq!(get_state(&app, &id).await.unwrap()["name"], "Utah");
    }

    #[tokio::test]
    async fn test_update_unknown_state_is_not_found_before_body_check() {
        let (_dir, app) = file_app().await;

        let result = update_state(&app, "missing", &json!("not an object")).await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_state_returns_empty_object() {
        let (_dir, app) = file_app().await;
        let created = create_state(&app, &json!({"name": "Iowa"})).await.unwrap();
        let id = id_of(&created);

        assert_eq!(delete_state(&app, &id).await.unwrap(), Record::new());
        assert!(matches!(
            delete_state(&app, &id).await,
            Err(RepositoryError::NotFound { .. })
        ));
    }
}
