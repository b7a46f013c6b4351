//! The pagination engine.

use std::future::Future;

use futures::future::join_all;
use serde_json::{json, Value};

use crate::clients::ApiError;

/// Largest page the Web API returns for list endpoints.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Most pages the bulk strategy requests at once. A reported `total` that
/// needs more continues sequentially instead.
pub const MAX_BULK_PAGES: u64 = 1_000;

/// Clamps a requested page size to `1..=MAX_PAGE_SIZE`.
///
/// # Example
///
/// ```rust
/// use spotify_api::pagination::clamp_page_size;
///
/// assert_eq!(clamp_page_size(100), 50);
/// assert_eq!(clamp_page_size(0), 1);
/// assert_eq!(clamp_page_size(20), 20);
/// ```
#[must_use]
pub fn clamp_page_size(page_size: u32) -> u32 {
    page_size.clamp(1, MAX_PAGE_SIZE)
}

/// One page of a collection, normalized from the endpoint's payload.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    /// The items on this page, in collection order.
    pub items: Vec<T>,
    /// Collection size reported by the endpoint.
    pub total: u64,
    /// Page size reported by the endpoint. Offset-paginated endpoints
    /// advance by this amount.
    pub limit: Option<u64>,
    /// Cursor of the next page, for cursor-paginated endpoints.
    pub after: Option<String>,
}

/// Position of a page to fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageCursor {
    /// Requested page size, already clamped.
    pub limit: u32,
    /// Offset of the first item on the page.
    pub offset: u64,
    /// Cursor returned by the previous page, if the collection uses cursors.
    pub after: Option<String>,
}

impl PageCursor {
    fn first(limit: u32) -> Self {
        Self {
            limit,
            offset: 0,
            after: None,
        }
    }

    /// Query parameters for an offset-paginated endpoint.
    #[must_use]
    pub fn offset_query(&self) -> Value {
        json!({ "limit": self.limit, "offset": self.offset })
    }

    /// Query parameters for a cursor-paginated endpoint. `after` is `null`
    /// on the first page, which leaves it out of the query string.
    #[must_use]
    pub fn cursor_query(&self) -> Value {
        json!({ "limit": self.limit, "after": self.after })
    }
}

/// How pages after the first are fetched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    /// One page at a time until the collection is exhausted. Required for
    /// cursor-paginated collections.
    Sequential,
    /// The first page alone, then every remaining page concurrently.
    #[default]
    BulkParallel,
}

/// Per-call pagination settings.
///
/// # Example
///
/// ```rust
/// use spotify_api::pagination::{PaginationOptions, Strategy};
///
/// let options = PaginationOptions::new(200).item_cap(60).strategy(Strategy::Sequential);
/// assert_eq!(options.page_size(), 50);
/// assert_eq!(options.cap(), Some(60));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaginationOptions {
    page_size: u32,
    item_cap: Option<usize>,
    strategy: Strategy,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self::new(MAX_PAGE_SIZE)
    }
}

impl PaginationOptions {
    /// Creates options with the given page size (clamped), no item cap and
    /// the bulk strategy.
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: clamp_page_size(page_size),
            item_cap: None,
            strategy: Strategy::default(),
        }
    }

    /// Stops requesting pages once `cap` items have been collected. The last
    /// page is kept whole, so the result may hold more than `cap` items.
    #[must_use]
    pub const fn item_cap(mut self, cap: usize) -> Self {
        self.item_cap = Some(cap);
        self
    }

    /// Sets the strategy.
    #[must_use]
    pub const fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Returns the clamped page size.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns the item cap, if any.
    #[must_use]
    pub const fn cap(&self) -> Option<usize> {
        self.item_cap
    }

    /// Returns the strategy.
    #[must_use]
    pub const fn strategy_kind(&self) -> Strategy {
        self.strategy
    }

    fn cap_or_unbounded(&self) -> usize {
        self.item_cap.unwrap_or(usize::MAX)
    }
}

/// Transient state of one pagination run.
struct PageState<T> {
    items: Vec<T>,
    total: Option<u64>,
    next: Option<PageCursor>,
}

impl<T> PageState<T> {
    fn start(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            total: None,
            next: Some(PageCursor::first(page_size)),
        }
    }

    fn collected(&self) -> u64 {
        u64::try_from(self.items.len()).unwrap_or(u64::MAX)
    }

    fn is_done(&self, cap: usize) -> bool {
        self.next.is_none()
            || self.items.len() >= cap
            || self.total.is_some_and(|total| self.collected() >= total)
    }

    /// Appends a page and works out where the next one starts. An empty page
    /// ends the run whatever `total` claims.
    fn absorb(&mut self, page: Page<T>, requested: &PageCursor) {
        self.total = Some(page.total);
        if page.items.is_empty() {
            self.next = None;
            return;
        }
        self.items.extend(page.items);

        self.next = match (page.after, page.limit) {
            (Some(after), _) => Some(PageCursor {
                limit: requested.limit,
                offset: requested.offset,
                after: Some(after),
            }),
            (None, Some(limit)) if limit > 0 && requested.after.is_none() => {
                requested.offset.checked_add(limit).map(|offset| PageCursor {
                    limit: requested.limit,
                    offset,
                    after: None,
                })
            }
            _ => None,
        };
    }
}

/// Materializes a paginated collection into one ordered `Vec`.
///
/// `fetch` is called with the position of each page and returns its raw
/// payload, or `None` when there is nothing to read. `extract` normalizes a
/// payload into a [`Page`]; returning `None` marks the collection as
/// exhausted rather than failing.
///
/// # Strategies
///
/// - [`Strategy::Sequential`] fetches one page at a time, advancing by the
///   page's reported `limit` or `after` cursor, until the reported `total`
///   or the item cap is reached, a page comes back empty, or `fetch` returns
///   `None`.
/// - [`Strategy::BulkParallel`] fetches the first page to learn `total` and
///   `limit`, then requests the remaining `ceil((min(total, cap) - n) /
///   limit)` pages concurrently and concatenates them in offset order. A
///   remaining page that fails or returns nothing contributes no items. If
///   the first page reports a cursor instead of a `limit`, or the reported
///   `total` needs more than [`MAX_BULK_PAGES`] pages, the run continues
///   sequentially.
///
/// # Errors
///
/// Any error from the first page is returned. With the sequential strategy
/// any page error is returned; with the bulk strategy errors from the
/// remaining pages are logged and skipped.
pub async fn paginate<T, P, F, Fut, X>(
    fetch: F,
    extract: X,
    options: &PaginationOptions,
) -> Result<Vec<T>, ApiError>
where
    F: Fn(PageCursor) -> Fut,
    Fut: Future<Output = Result<Option<P>, ApiError>>,
    X: Fn(&P) -> Option<Page<T>>,
{
    let state = PageState::start(options.page_size());
    match options.strategy_kind() {
        Strategy::Sequential => sequential(&fetch, &extract, state, options.cap_or_unbounded()).await,
        Strategy::BulkParallel => bulk(&fetch, &extract, state, options).await,
    }
}

async fn sequential<T, P, F, Fut, X>(
    fetch: &F,
    extract: &X,
    mut state: PageState<T>,
    cap: usize,
) -> Result<Vec<T>, ApiError>
where
    F: Fn(PageCursor) -> Fut,
    Fut: Future<Output = Result<Option<P>, ApiError>>,
    X: Fn(&P) -> Option<Page<T>>,
{
    while !state.is_done(cap) {
        let Some(cursor) = state.next.take() else {
            break;
        };
        tracing::debug!(offset = cursor.offset, after = ?cursor.after, "fetching page");

        let Some(payload) = fetch(cursor.clone()).await? else {
            break;
        };
        let Some(page) = extract(&payload) else {
            break;
        };
        state.absorb(page, &cursor);
    }

    Ok(state.items)
}

async fn bulk<T, P, F, Fut, X>(
    fetch: &F,
    extract: &X,
    mut state: PageState<T>,
    options: &PaginationOptions,
) -> Result<Vec<T>, ApiError>
where
    F: Fn(PageCursor) -> Fut,
    Fut: Future<Output = Result<Option<P>, ApiError>>,
    X: Fn(&P) -> Option<Page<T>>,
{
    let cap = options.cap_or_unbounded();
    let first = PageCursor::first(options.page_size());
    tracing::debug!(offset = 0, "fetching first page");

    let Some(payload) = fetch(first.clone()).await? else {
        return Ok(state.items);
    };
    let Some(page) = extract(&payload) else {
        return Ok(state.items);
    };

    let total = page.total;
    let limit = page.limit.filter(|limit| *limit > 0);
    let has_cursor = page.after.is_some();
    state.absorb(page, &first);

    if state.is_done(cap) {
        return Ok(state.items);
    }
    let Some(limit) = limit.filter(|_| !has_cursor) else {
        return sequential(fetch, extract, state, cap).await;
    };

    let target = total.min(u64::try_from(cap).unwrap_or(u64::MAX));
    let remaining = target.saturating_sub(state.collected());
    let pages = remaining / limit + u64::from(remaining % limit != 0);
    if pages > MAX_BULK_PAGES || limit.checked_mul(pages).is_none() {
        tracing::debug!(total, limit, pages, "too many pages for one fan-out");
        return sequential(fetch, extract, state, cap).await;
    }
    tracing::debug!(total, limit, pages, "fetching remaining pages concurrently");

    let fetches = (1..=pages).map(|index| {
        let cursor = PageCursor {
            limit: options.page_size(),
            offset: limit * index,
            after: None,
        };
        let offset = cursor.offset;
        let pending = fetch(cursor);
        async move { (offset, pending.await) }
    });

    for (offset, result) in join_all(fetches).await {
        match result {
            Ok(Some(payload)) => match extract(&payload) {
                Some(page) => state.items.extend(page.items),
                None => tracing::warn!(offset, "page payload had no items"),
            },
            Ok(None) => tracing::warn!(offset, "page returned no payload"),
            Err(error) => tracing::warn!(offset, %error, "page fetch failed"),
        }
    }

    Ok(state.items)
}
