mod error;
mod http_mapping;
#[cfg(test)]
pub(crate) mod memory;
pub mod relations;
mod traits;

pub use error::{RepositoryError, Result};
pub use http_mapping::repository_error_to_status_code;
pub use traits::{Backend, Storage};
