pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::memory::MemoryStorage;
pub use crate::config::{Endpoints, StoreConfig};
pub use crate::core::query::{ProjectFilter, TestimonialFilter};
pub use crate::core::store::{ContentStore, Subscription};
pub use crate::domain::model::{
    CacheEnvelope, Category, Collections, Project, SearchResults, TeamMember, Testimonial,
};
pub use crate::domain::ports::KeyValueStorage;
pub use crate::utils::error::{ContentError, Result};
