//! Offset pagination primitives shared by Event Manager list endpoints.
//!
//! A [`PageRequest`] validates `skip`/`limit` query parameters, a [`Page`]
//! pairs the fetched items with the total row count, and [`PageLinks`] renders
//! `self`/`first`/`last`/`next`/`prev` navigation URLs for the response body.

mod links;
mod page;
mod request;

pub use links::{Link, PageLinks};
pub use page::{Page, PageEnvelope};
pub use request::{DEFAULT_LIMIT, MAX_LIMIT, PageRequest, PageRequestError};
