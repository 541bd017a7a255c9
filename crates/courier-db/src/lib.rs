//! # courier-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for the repository traits
//! defined in `courier-core`. It handles:
//!
//! - Connection pool management
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations with per-operation transactions
//!
//! ## Usage
//!
//! ```rust,ignore
//! use courier_db::pool::{create_pool, DatabaseConfig};
//! use courier_db::repositories::PgMessageRepository;
//! use courier_core::traits::MessageRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::default();
//!     let pool = create_pool(&config).await?;
//!     let message_repo = PgMessageRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{PgConversationRepository, PgMembershipRepository, PgMessageRepository};
