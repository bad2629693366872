pub mod fetch;
pub mod query;
pub mod store;

pub use crate::domain::model::Collections;
pub use crate::domain::ports::KeyValueStorage;
pub use crate::utils::error::Result;
