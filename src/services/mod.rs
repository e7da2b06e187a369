// Service exports
pub mod cache;
pub mod memory;
pub mod postgres;
pub mod store;

pub use cache::{CacheKey, RedisEditStore};
pub use memory::{MemoryDirectory, MemoryEditStore};
pub use postgres::PostgresClient;
pub use store::{DonorStore, EditStore, EventStore, StoreError};
