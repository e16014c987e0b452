//! Entity operations consumed by a transport layer.
//!
//! Every operation takes the shared [`AppState`], path IDs as raw strings
//! and, where relevant, the decoded JSON body. Results are outward records
//! (`serde_json` objects carrying `__class__`), lists of them, or an empty
//! object for deletes. Errors are `RepositoryError`s; map them with
//! `hbnb_core::storage::repository_error_to_status_code`.
//!
//! Mutating operations hold the write gate from their first lookup until
//! `save()` returns. A failed operation rolls its staged changes back before
//! releasing the gate.

pub mod amenities;
pub mod cities;
pub mod place_amenities;
pub mod places;
pub mod places_search;
pub mod reviews;
pub mod states;
pub mod users;

use serde_json::{Map, Value};
use uuid::Uuid;

use hbnb_core::models::{
    parse_update, Amenity, City, Entity, EntityKind, Model, Place, Review, State, UpdateRequest,
    User,
};
use hbnb_core::storage::relations::{all_as, delete_with_dependents, get_as};
use hbnb_core::storage::{RepositoryError, Result};

use crate::state::AppState;

/// Outward JSON shape of one entity.
pub type Record = Map<String, Value>;

/// Parses a path ID. Malformed IDs are reported like unknown ones.
pub(crate) fn parse_id(kind: EntityKind, id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).map_err(|_| RepositoryError::not_found(kind.as_str(), id))
}

/// Loads the entity addressed by a path ID.
pub(crate) async fn fetch<M: Model>(app: &AppState, id: &str) -> Result<M> {
    let uuid = parse_id(M::KIND, id)?;
    get_as::<M>(app.storage.as_ref(), uuid)
        .await?
        .ok_or_else(|| RepositoryError::not_found(M::KIND.as_str(), id))
}

/// Resolves the `user_id` of a create body. Anything that does not name an
/// existing user is a reference error.
pub(crate) async fn resolve_user(app: &AppState, value: &Value) -> Result<User> {
    let raw = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let Ok(user_id) = Uuid::parse_str(&raw) else {
        return Err(RepositoryError::reference("User", raw));
    };
    get_as::<User>(app.storage.as_ref(), user_id)
        .await?
        .ok_or_else(|| RepositoryError::reference("User", raw))
}

pub(crate) fn record<M: Model>(model: M) -> Record {
    model.into_entity().to_record()
}

pub(crate) fn records<M: Model>(models: Vec<M>) -> Vec<Record> {
    models.into_iter().map(record).collect()
}

/// Saves every staged change, discarding them all if the save fails.
/// The caller holds the write gate.
pub(crate) async fn commit(app: &AppState) -> Result<()> {
    if let Err(e) = app.storage.save().await {
        discard(app).await;
        return Err(e);
    }
    Ok(())
}

async fn discard(app: &AppState) {
    match app.storage.rollback().await {
        Ok(()) => tracing::warn!(backend = %app.storage.backend(), "Rolled back staged changes"),
        Err(e) => tracing::error!(error = %e, "Rollback of staged changes failed"),
    }
}

/// Stages `entity` and commits. The caller holds the write gate.
pub(crate) async fn persist(app: &AppState, entity: Entity) -> Result<Record> {
    let record = entity.to_record();
    if let Err(e) = app.storage.new(entity).await {
        discard(app).await;
        return Err(e);
    }
    commit(app).await?;
    Ok(record)
}

pub(crate) async fn list<M: Model>(app: &AppState) -> Result<Vec<Record>> {
    Ok(records(all_as::<M>(app.storage.as_ref()).await?))
}

pub(crate) async fn show<M: Model>(app: &AppState, id: &str) -> Result<Record> {
    Ok(record(fetch::<M>(app, id).await?))
}

/// Applies an allow-listed update and commits it.
pub(crate) async fn update<R>(app: &AppState, id: &str, body: &Value) -> Result<Record>
where
    R: UpdateRequest,
    R::Target: Model,
{
    let _guard = app.write_lock().await;
    let mut model = fetch::<R::Target>(app, id).await?;
    let request: R = parse_update(body)?;
    request.apply_to(&mut model);

    let mut entity = model.into_entity();
    entity.touch();
    tracing::debug!(entity = %entity.kind(), entity_id = %entity.id(), "Updating record");
    persist(app, entity).await
}

/// Deletes an entity with its dependents and commits.
pub(crate) async fn remove<M: Model>(app: &AppState, id: &str) -> Result<Record> {
    let _guard = app.write_lock().await;
    let entity = fetch::<M>(app, id).await?.into_entity();

    let removed = match delete_with_dependents(app.storage.as_ref(), &entity).await {
        Ok(removed) => removed,
        Err(e) => {
            discard(app).await;
            return Err(e);
        }
    };
    commit(app).await?;

    tracing::info!(
        entity = %entity.kind(),
        entity_id = %entity.id(),
        removed,
        "Deleted record"
    );
    Ok(Record::new())
}

/// Lists every record of `kind`, oldest first.
pub async fn list_records(app: &AppState, kind: EntityKind) -> Result<Vec<Record>> {
    match kind {
        EntityKind::State => list::<State>(app).await,
        EntityKind::City => list::<City>(app).await,
        EntityKind::Place => list::<Place>(app).await,
        EntityKind::User => list::<User>(app).await,
        EntityKind::Review => list::<Review>(app).await,
        EntityKind::Amenity => list::<Amenity>(app).await,
    }
}

/// Gets one record of `kind`.
pub async fn get_record(app: &AppState, kind: EntityKind, id: &str) -> Result<Record> {
    match kind {
        EntityKind::State => states::get_state(app, id).await,
        EntityKind::City => cities::get_city(app, id).await,
        EntityKind::Place => places::get_place(app, id).await,
        EntityKind::User => users::get_user(app, id).await,
        EntityKind::Review => reviews::get_review(app, id).await,
        EntityKind::Amenity => amenities::get_amenity(app, id).await,
    }
}

/// Deletes one record of `kind` along with its dependents.
pub async fn delete_record(app: &AppState, kind: EntityKind, id: &str) -> Result<Record> {
    match kind {
        EntityKind::State => states::delete_state(app, id).await,
        EntityKind::City => cities::delete_city(app, id).await,
        EntityKind::Place => places::delete_place(app, id).await,
        EntityKind::User => users::delete_user(app, id).await,
        EntityKind::Review => reviews::delete_review(app, id).await,
        EntityKind::Amenity => amenities::delete_amenity(app, id).await,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use serde_json::Value;
    use tempfile::TempDir;

    use crate::state::AppState;
    use crate::storage::{FileRepository, SqliteRepository};

    pub async fn file_app() -> (TempDir, AppState) {
        let dir = TempDir::new().unwrap();
        let repo = FileRepository::open(dir.path().join("file.json"))
            .await
            .unwrap();
        (dir, AppState::new(Arc::new(repo)))
    }

    pub async fn db_app() -> AppState {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        AppState::new(Arc::new(repo))
    }

    pub fn id_of(record: &super::Record) -> String {
        match record.get("id") {
            Some(Value::String(id)) => id.clone(),
            other => panic!("Record without id: {other:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tempfile::TempDir;

    use crate::storage::FileRepository;
    use hbnb_core::storage::Storage;

    #[test]
    fn test_parse_id_malformed_is_not_found() {
        let result = parse_id(EntityKind::City, "not-a-uuid");
        assert_eq!(
            result,
            Err(RepositoryError::not_found("City", "not-a-uuid"))
        );
    }

    #[tokio::test]
    async fn test_resolve_user_non_string_is_reference_error() {
        let (_dir, app) = file_app().await;

        let result = resolve_user(&app, &json!(42)).await;
        assert_eq!(result, Err(RepositoryError::reference("User", "42")));
    }

    async fn app_without_directory() -> (TempDir, PathBuf, AppState) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("file.json");
        let repo = FileRepository::open(&path).await.unwrap();
        (dir, path, AppState::new(Arc::new(repo)))
    }

    #[tokio::test]
    async fn test_failed_create_is_not_visible_or_saved_later() {
        let (dir, path, app) = app_without_directory().await;

        let result = states::create_state(&app, &json!({"name": "Ghost"})).await;
        assert!(matches!(result, Err(RepositoryError::Persistence(_))));
        assert!(states::list_states(&app).await.unwrap().is_empty());

        std::fs::create_dir(dir.path().join("missing")).unwrap();
        amenities::create_amenity(&app, &json!({"name": "Wifi"}))
            .await
            .unwrap();

        let reopened = FileRepository::open(&path).await.unwrap();
        assert!(reopened.all(EntityKind::State).await.unwrap().is_empty());
        assert_eq!(reopened.all(EntityKind::Amenity).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_record_and_dependents() {
        let (dir, _path, app) = app_without_directory().await;
        std::fs::create_dir(dir.path().join("missing")).unwrap();
        let state = states::create_state(&app, &json!({"name": "Maine"}))
            .await
            .unwrap();
        let state_id = id_of(&state);
        cities::create_city(&app, &state_id, &json!({"name": "Portland"}))
            .await
            .unwrap();

        // Removing the directory makes the next save fail.
        std::fs::remove_dir_all(dir.path().join("missing")).unwrap();
        let result = states::delete_state(&app, &state_id).await;

        assert!(matches!(result, Err(RepositoryError::Persistence(_))));
        assert_eq!(states::get_state(&app, &state_id).await.unwrap(), state);
        assert_eq!(
            cities::list_cities_of_state(&app, &state_id)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_db_failed_save_does_not_block_later_writes() {
        let app = db_app().await;
        // An orphan staged behind the gate's back stands in for any change
        // the database rejects.
        app.storage
            .new(City::new(Uuid::new_v4(), "Orphan").into())
            .await
            .unwrap();

        let result = states::create_state(&app, &json!({"name": "Ghost"})).await;
        assert!(matches!(result, Err(RepositoryError::Persistence(_))));
        assert!(states::list_states(&app).await.unwrap().is_empty());

        let created = states::create_state(&app, &json!({"name": "Nevada"}))
            .await
            .unwrap();
        assert_eq!(states::list_states(&app).await.unwrap(), vec![created]);
        assert!(app.storage.all(EntityKind::City).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generic_dispatch_round_trip() {
        let (_dir, app) = file_app().await;
        let created = states::create_state(&app, &json!({"name": "Kansas"}))
            .await
            .unwrap();
        let id = id_of(&created);

        let listed = list_records(&app, EntityKind::State).await.unwrap();
        assert_eq!(listed, vec![created.clone()]);
        assert_eq!(
            get_record(&app, EntityKind::State, &id).await.unwrap(),
            created
        );

        assert_eq!(
            delete_record(&app, EntityKind::State, &id).await.unwrap(),
            Record::new()
        );
        assert!(matches!(
            get_record(&app, EntityKind::State, &id).await,
            Err(RepositoryError::NotFound { .. })
        ));
    }
}
