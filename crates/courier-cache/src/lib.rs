//! # courier-cache
//!
//! Redis layer for pub/sub notification fan-out.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Pub/Sub**: Per-user event channels feeding the push collaborator
//! - **Notifier**: Fire-and-forget implementation of the core `Notifier` port
//!
//! ## Example
//!
//! ```ignore
//! use courier_cache::{RedisPool, RedisPoolConfig, Publisher, RedisNotifier};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let notifier = RedisNotifier::new(Publisher::new(pool));
//! ```

pub mod pool;
pub mod pubsub;

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};

// Re-export pubsub types
pub use pubsub::{
    PubSubChannel, PubSubEvent, Publisher, RedisNotifier, BROADCAST_CHANNEL,
    CONVERSATION_CHANNEL_PREFIX, USER_CHANNEL_PREFIX,
};
