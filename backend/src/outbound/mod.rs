//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed user repository using Diesel ORM.
//! - **memory**: process-local user repository for database-less runs.
//! - **email**: log-backed email notifier.
//! - **smtp**: email notifier delivering through an SMTP relay.
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod email;
pub mod memory;
pub mod persistence;
pub mod smtp;
