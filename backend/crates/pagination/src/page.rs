//! A fetched page of rows and its serialisable envelope.

use serde::Serialize;
use url::Url;

use crate::{PageLinks, PageRequest};

/// Items fetched for a [`PageRequest`] plus the collection size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    items: Vec<T>,
    total: u64,
    request: PageRequest,
}

impl<T> Page<T> {
    /// Pair fetched items with the total number of rows.
    #[must_use]
    pub const fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            request,
        }
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Total rows across every page.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Request that produced this page.
    #[must_use]
    pub const fn request(&self) -> PageRequest {
        self.request
    }

    /// Convert each item, keeping the paging metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }

    /// Render the response envelope with links rooted at `base`.
    #[must_use]
    pub fn into_envelope(self, base: &Url) -> PageEnvelope<T> {
        let links = PageLinks::build(base, self.request, self.total);
        PageEnvelope {
            page: self.request.page_number(),
            size: self.items.len(),
            total: self.total,
            items: self.items,
            links,
        }
    }
}

/// JSON body returned by list endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageEnvelope<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Total rows across every page.
    pub total: u64,
    /// One-based page number.
    pub page: u64,
    /// Number of items on this page.
    pub size: usize,
    /// Navigation links.
    pub links: PageLinks,
}
