//! Event Manager account service library.
//!
//! Hexagonal layout: `domain` holds account rules and ports, `inbound` the
//! Actix HTTP adapter, and `outbound` the persistence and email adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
