//! Validated offset/limit page requests.

use serde::{Deserialize, Serialize};

/// Limit applied when the client omits one.
pub const DEFAULT_LIMIT: u32 = 10;
/// Largest page a client may request.
pub const MAX_LIMIT: u32 = 100;

/// Errors raised while validating pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// The requested limit is zero or above [`MAX_LIMIT`].
    #[error("limit must be between 1 and {max}, got {got}")]
    LimitOutOfRange {
        /// Value supplied by the client.
        got: u32,
        /// Upper bound in force.
        max: u32,
    },
}

/// Offset pagination request.
///
/// ## Invariants
/// - `1 <= limit <= MAX_LIMIT`.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(Some(20), Some(10)).unwrap();
/// assert_eq!(request.page_number(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPageRequest", into = "RawPageRequest")]
pub struct PageRequest {
    skip: u64,
    limit: u32,
}

impl PageRequest {
    /// Validate optional query parameters, applying defaults.
    ///
    /// # Errors
    /// Returns [`PageRequestError::LimitOutOfRange`] when `limit` is zero or
    /// larger than [`MAX_LIMIT`].
    pub const fn new(skip: Option<u64>, limit: Option<u32>) -> Result<Self, PageRequestError> {
        let skip = match skip {
            Some(value) => value,
            None => 0,
        };
        let limit = match limit {
            Some(value) => value,
            None => DEFAULT_LIMIT,
        };
        if limit == 0 || limit > MAX_LIMIT {
            return Err(PageRequestError::LimitOutOfRange {
                got: limit,
                max: MAX_LIMIT,
            });
        }
        Ok(Self { skip, limit })
    }

    /// Number of rows to skip.
    #[must_use]
    pub const fn skip(&self) -> u64 {
        self.skip
    }

    /// Maximum number of rows to return.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// One-based page number containing the first requested row.
    #[must_use]
    pub fn page_number(&self) -> u64 {
        self.skip
            .checked_div(u64::from(self.limit))
            .unwrap_or(0)
            .saturating_add(1)
    }

    /// Request for the same window size starting at `skip`.
    #[must_use]
    pub const fn with_skip(&self, skip: u64) -> Self {
        Self {
            skip,
            limit: self.limit,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawPageRequest {
    #[serde(default)]
    skip: Option<u64>,
    #[serde(default)]
    limit: Option<u32>,
}

impl TryFrom<RawPageRequest> for PageRequest {
    type Error = PageRequestError;

    fn try_from(value: RawPageRequest) -> Result<Self, Self::Error> {
        Self::new(value.skip, value.limit)
    }
}

impl From<PageRequest> for RawPageRequest {
    fn from(value: PageRequest) -> Self {
        Self {
            skip: Some(value.skip),
            limit: Some(value.limit),
        }
    }
}
