//! Pagination over the Web API's list endpoints.
//!
//! List endpoints return at most [`MAX_PAGE_SIZE`] items per call. The
//! [`paginate`] engine hides that limit by fetching pages until a collection
//! is exhausted, using either [`Strategy::Sequential`] or
//! [`Strategy::BulkParallel`].
//!
//! The engine is generic over two caller-supplied functions:
//!
//! - a fetch function, called with a [`PageCursor`] and returning the raw
//!   payload of one page, or `None` when there is nothing more to read
//! - an extraction function, normalizing a raw payload into a [`Page`]
//!   (see [`extract`] for the Web API's shapes)
//!
//! # Example
//!
//! ```rust
//! use serde_json::{json, Value};
//! use spotify_api::clients::ApiError;
//! use spotify_api::pagination::{extract, paginate, PageCursor, PaginationOptions, Strategy};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let fetch = |cursor: PageCursor| async move {
//!     let remaining = 75_u64.saturating_sub(cursor.offset);
//!     let items: Vec<Value> = (0..remaining.min(u64::from(cursor.limit)))
//!         .map(|i| json!(cursor.offset + i))
//!         .collect();
//!     Ok::<_, ApiError>(Some(json!({"items": items, "total": 75, "limit": cursor.limit})))
//! };
//!
//! let options = PaginationOptions::new(50).strategy(Strategy::Sequential);
//! let items = paginate(fetch, extract::extract_items, &options).await.unwrap();
//! assert_eq!(items.len(), 75);
//! # });
//! ```

mod engine;
pub mod extract;

pub use engine::{
    clamp_page_size, paginate, Page, PageCursor, PaginationOptions, Strategy, MAX_BULK_PAGES,
    MAX_PAGE_SIZE,
};
