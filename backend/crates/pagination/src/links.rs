//! Navigation links for paginated collections.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::PageRequest;

/// Hypermedia link with a relation name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Relation, e.g. `next`.
    pub rel: String,
    /// Absolute target URL.
    pub href: String,
}

impl Link {
    /// Build a link from a relation name and target.
    #[must_use]
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
        }
    }
}

/// Links rendered alongside a page of results.
///
/// `next` and `prev` are omitted at the end and start of the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    /// The page being returned.
    #[serde(rename = "self")]
    pub self_: Link,
    /// The first page.
    pub first: Link,
    /// The last page holding at least one row (or the first if empty).
    pub last: Link,
    /// The following page, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<Link>,
    /// The preceding page, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<Link>,
}

impl PageLinks {
    /// Compute links for `request` over a collection of `total` rows.
    ///
    /// Existing query parameters on `base` are replaced by `skip` and `limit`.
    ///
    /// # Examples
    /// ```
    /// use pagination::{PageLinks, PageRequest};
    /// use url::Url;
    ///
    /// let base = Url::parse("http://localhost:8080/users").unwrap();
    /// let request = PageRequest::new(Some(10), Some(10)).unwrap();
    /// let links = PageLinks::build(&base, request, 25);
    /// assert_eq!(links.last.href, "http://localhost:8080/users?skip=20&limit=10");
    /// assert!(links.next.is_some());
    /// ```
    #[must_use]
    pub fn build(base: &Url, request: PageRequest, total: u64) -> Self {
        let limit = u64::from(request.limit());
        let skip = request.skip();
        let last_skip = total
            .saturating_sub(1)
            .checked_div(limit)
            .unwrap_or(0)
            .saturating_mul(limit);

        let next_skip = skip.saturating_add(limit);
        let next = (next_skip < total).then(|| link(base, "next", request.with_skip(next_skip)));
        let prev = (skip > 0)
            .then(|| link(base, "prev", request.with_skip(skip.saturating_sub(limit))));

        Self {
            self_: link(base, "self", request),
            first: link(base, "first", request.with_skip(0)),
            last: link(base, "last", request.with_skip(last_skip)),
            next,
            prev,
        }
    }
}

fn link(base: &Url, rel: &str, request: PageRequest) -> Link {
    let mut target = base.clone();
    target
        .query_pairs_mut()
        .clear()
        .append_pair("skip", &request.skip().to_string())
        .append_pair("limit", &request.limit().to_string());
    Link::new(rel, target.as_str())
}
