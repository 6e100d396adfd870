//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementation of the [`UserRepository`](crate::domain::ports::UserRepository)
//! port backed by PostgreSQL via `diesel-async` and `bb8` pooling.
//!
//! - **Thin adapters**: the repository only translates between Diesel rows
//!   and domain types. No business logic resides here.
//! - **Internal models**: row structs (`models.rs`) and the schema
//!   (`schema.rs`) never leak into the domain.
//! - **Strongly typed errors**: database failures map to
//!   [`UserPersistenceError`](crate::domain::ports::UserPersistenceError),
//!   with unique-constraint violations naming the clashing field.
//!
//! # Example
//!
//! ```ignore
//! use event_manager::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/events")).await?;
//! let repo = DieselUserRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
