//! Offset pagination over index operations.
//!
//! An index response looks like:
//!
//! ```json
//! {"data": [{"id": 1}, {"id": 2}], "meta": {"pagination": {"count": 2}}}
//! ```
//!
//! [`iterate_pages`] requests pages at increasing offsets until a page
//! reports a count of zero, handing each item to the caller in order.

use std::future::Future;

use serde::Deserialize;
use serde_json::Value;

use crate::clients::ApiError;

/// One page of an index response.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Page {
    /// Items of the page.
    pub data: Vec<Value>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

/// Metadata of an index page.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct PageMeta {
    /// Pagination counters.
    pub pagination: Pagination,
}

/// Pagination counters of an index page.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    /// Number of items on this page.
    pub count: u64,
}

impl Page {
    /// Parses a page from an index response.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorKind::Fatal`](crate::ErrorKind::Fatal) error if the
    /// response lacks `data` or `meta.pagination.count`.
    pub fn from_value(value: Value) -> Result<Self, ApiError> {
        serde_json::from_value(value)
            .map_err(|e| ApiError::fatal(format!("malformed index page: {e}")))
    }

    /// Returns the page's item count.
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.meta.pagination.count
    }
}

/// Walks every page, calling `handler` once per item in server order.
///
/// `fetch_page` receives the offset to request: 0 for the first page, then
/// the running total of reported counts. The walk stops after the first page
/// whose count is 0; that page's items are still delivered. Any fetch error
/// stops the walk and is returned; items already handed to `handler` stay
/// delivered.
///
/// # Errors
///
/// Returns the first error from `fetch_page`, or an
/// [`ErrorKind::Fatal`](crate::ErrorKind::Fatal) error for a malformed page.
///
/// # Example
///
/// ```rust
/// use hub_api_client::rest::iterate_pages;
/// use serde_json::json;
///
/// # #[tokio::main]
/// # async fn main() {
/// let mut seen = Vec::new();
/// iterate_pages(
///     |offset| async move {
///         Ok(match offset {
///             0 => json!({"data": [1, 2], "meta": {"pagination": {"count": 2}}}),
///             _ => json!({"data": [], "meta": {"pagination": {"count": 0}}}),
///         })
///     },
///     |item| seen.push(item),
/// )
/// .await
/// .unwrap();
///
/// assert_eq!(seen, [json!(1), json!(2)]);
/// # }
/// ```
pub async fn iterate_pages<F, Fut, H>(mut fetch_page: F, mut handler: H) -> Result<(), ApiError>
where
    F: FnMut(u64) -> Fut,
    Fut: Future<Output = Result<Value, ApiError>>,
    H: FnMut(Value),
{
    let mut offset = 0;
    loop {
        let page = Page::from_value(fetch_page(offset).await?)?;
        let count = page.count();

        tracing::trace!(offset, count, "Iterating index page");
        page.data.into_iter().for_each(&mut handler);
        if count == 0 {
            return Ok(());
        }
        offset += count;
    }
}
