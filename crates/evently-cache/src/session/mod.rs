//! Session storage module.
//!
//! Both stores persist an [`AuthSession`](evently_core::AuthSession) per
//! session cookie and forget it after a TTL.

mod memory_store;
mod redis_store;

pub use memory_store::MemorySessionStore;
pub use redis_store::{RedisSessionStore, SessionRecord};
