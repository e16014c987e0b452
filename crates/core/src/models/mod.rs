mod entity;
mod error;
mod requests;
mod types;

pub use entity::{storage_key, Entity, EntityKind, Model, Relation, UnknownEntityKind};
pub use error::RequestError;
pub use requests::{
    as_object, parse_create, parse_update, require_field, CreateAmenityRequest,
    CreateCityRequest, CreatePlaceRequest, CreateReviewRequest, CreateStateRequest,
    CreateUserRequest, UpdateAmenityRequest, UpdateCityRequest, UpdatePlaceRequest,
    UpdateRequest, UpdateReviewRequest, UpdateStateRequest, UpdateUserRequest,
};
pub use types::{Amenity, City, Place, Review, State, User};
