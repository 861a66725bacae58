//! # evently-cache
//!
//! Persistence for browser sessions.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Session Storage**: `SessionStore` implementations keyed by session
//!   cookie, in Redis (shared across instances) or in process memory
//!
//! ## Example
//!
//! ```ignore
//! use evently_cache::{RedisPool, RedisPoolConfig, RedisSessionStore};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let store = RedisSessionStore::new(pool, 7 * 24 * 60 * 60);
//! store.save(&key, &session).await?;
//! ```

pub mod pool;
pub mod session;

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};

// Re-export session types
pub use session::{MemorySessionStore, RedisSessionStore, SessionRecord};
