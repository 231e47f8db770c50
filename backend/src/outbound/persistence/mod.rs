//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL through `diesel-async` and a `bb8` pool.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Typed errors**: every pool and Diesel failure maps onto the port's
//!   error enum.
//!
//! # Example
//!
//! ```ignore
//! use circle::outbound::persistence::{DbPool, DieselMessageRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/circle")).await?;
//! let messages = DieselMessageRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_follow_repository;
mod diesel_message_repository;
mod diesel_post_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_follow_repository::DieselFollowRepository;
pub use diesel_message_repository::DieselMessageRepository;
pub use diesel_post_repository::DieselPostRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
