//! Data transfer objects.

mod cache_dto;

pub use cache_dto::{CacheOutcome, CacheRequest};
