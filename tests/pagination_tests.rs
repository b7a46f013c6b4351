//! Integration tests for the pagination engine.
//!
//! The engine is driven with in-process fetch functions so that call counts,
//! requested offsets and completion order can be observed directly.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use serde_json::{json, Value};
use spotify_api::clients::ApiError;
use spotify_api::pagination::extract::{extract_followed_artists, extract_items};
use spotify_api::pagination::{paginate, PageCursor, PaginationOptions, Strategy};

/// Serves `total` numbered items, honoring the requested offset and limit.
fn items_page(total: u64, cursor: &PageCursor) -> Value {
    let end = total.min(cursor.offset + u64::from(cursor.limit));
    let items: Vec<Value> = (cursor.offset..end).map(|i| json!({ "n": i })).collect();
    json!({ "items": items, "total": total, "limit": cursor.limit, "offset": cursor.offset })
}

fn numbers(items: &[Value]) -> Vec<u64> {
    items.iter().filter_map(|item| item["n"].as_u64()).collect()
}

// === Sequential ===

/// 125 items at 50 per page take exactly 3 fetches.
#[tokio::test]
async fn test_sequential_125_items_in_three_fetches() {
    let offsets = Mutex::new(Vec::new());
    let fetch = |cursor: PageCursor| {
        offsets.lock().unwrap().push(cursor.offset);
        async move { Ok::<_, ApiError>(Some(items_page(125, &cursor))) }
    };
    let options = PaginationOptions::new(50).strategy(Strategy::Sequential);

    let items = paginate(fetch, extract_items, &options).await.unwrap();

    assert_eq!(*offsets.lock().unwrap(), vec![0, 50, 100]);
    assert_eq!(numbers(&items), (0..125).collect::<Vec<_>>());
}

/// A stale `total` does not cause endless fetching once a page is empty.
#[tokio::test]
async fn test_sequential_stale_total_stops_on_empty_page() {
    let calls = AtomicUsize::new(0);
    let fetch = |cursor: PageCursor| {
        calls.fetch_add(1, Ordering::SeqCst);
        async move {
            let page = if cursor.offset == 0 {
                items_page(125, &cursor)
            } else {
                json!({"items": [], "total": 125, "limit": 50})
            };
            Ok::<_, ApiError>(Some(page))
        }
    };
    let options = PaginationOptions::new(50).strategy(Strategy::Sequential);

    let items = paginate(fetch, extract_items, &options).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(items.len(), 50);
}

/// Page sizes above the ceiling are clamped before the first request.
#[tokio::test]
async fn test_requested_page_size_is_clamped() {
    let limits = Mutex::new(Vec::new());
    let fetch = |cursor: PageCursor| {
        limits.lock().unwrap().push(cursor.limit);
        async move { Ok::<_, ApiError>(Some(items_page(60, &cursor))) }
    };
    let options = PaginationOptions::new(500).strategy(Strategy::Sequential);

    let items = paginate(fetch, extract_items, &options).await.unwrap();

    assert_eq!(*limits.lock().unwrap(), vec![50, 50]);
    assert_eq!(items.len(), 60);
}

/// Followed artists advance through the `after` cursor.
#[tokio::test]
async fn test_cursor_pages_follow_after() {
    let fetch = |cursor: PageCursor| async move {
        let (ids, after) = match cursor.after.as_deref() {
            None => (vec!["a", "b"], json!("b")),
            Some("b") => (vec!["c", "d"], json!("d")),
            Some(_) => (vec!["e"], json!(null)),
        };
        let items: Vec<Value> = ids.into_iter().map(|id| json!({ "id": id })).collect();
        Ok::<_, ApiError>(Some(json!({
            "artists": {"items": items, "total": 5, "limit": 2, "cursors": {"after": after}}
        })))
    };
    let options = PaginationOptions::new(2).strategy(Strategy::Sequential);

    let items = paginate(fetch, extract_followed_artists, &options)
        .await
        .unwrap();

    let ids: Vec<&str> = items.iter().filter_map(|item| item["id"].as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c", "d", "e"]);
}

// === Bulk Parallel ===

/// One first-page fetch plus two concurrent fetches, reassembled in offset
/// order even though the last page completes first.
#[tokio::test]
async fn test_bulk_reassembles_in_offset_order() {
    let offsets = Mutex::new(Vec::new());
    let fetch = |cursor: PageCursor| {
        offsets.lock().unwrap().push(cursor.offset);
        async move {
            if cursor.offset == 50 {
                tokio::time::sleep(Duration::from_millis(80)).await;
            }
            Ok::<_, ApiError>(Some(items_page(125, &cursor)))
        }
    };

    let items = paginate(fetch, extract_items, &PaginationOptions::new(50))
        .await
        .unwrap();

    let mut requested = offsets.lock().unwrap().clone();
    requested.sort_unstable();
    assert_eq!(requested, vec![0, 50, 100]);
    assert_eq!(numbers(&items), (0..125).collect::<Vec<_>>());
}

/// With a cap of 60, exactly one page follows the first and the last page
/// is not trimmed.
#[tokio::test]
async fn test_bulk_item_cap_never_requests_third_page() {
    let offsets = Mutex::new(Vec::new());
    let fetch = |cursor: PageCursor| {
        offsets.lock().unwrap().push(cursor.offset);
        async move { Ok::<_, ApiError>(Some(items_page(125, &cursor))) }
    };
    let options = PaginationOptions::new(50).item_cap(60);

    let items = paginate(fetch, extract_items, &options).await.unwrap();

    assert_eq!(*offsets.lock().unwrap(), vec![0, 50]);
    assert_eq!(items.len(), 100);
}

/// A failing page contributes nothing; the rest of the collection survives.
#[tokio::test]
async fn test_bulk_tolerates_failed_page() {
    let fetch = |cursor: PageCursor| async move {
        if cursor.offset == 100 {
            return Err(ApiError::Setup {
                reason: "simulated failure".to_string(),
            });
        }
        Ok(Some(items_page(175, &cursor)))
    };

    let items = paginate(fetch, extract_items, &PaginationOptions::new(50))
        .await
        .unwrap();

    let expected: Vec<u64> = (0..100).chain(150..175).collect();
    assert_eq!(numbers(&items), expected);
}

/// A cursor-paginated first page continues sequentially in bulk mode.
#[tokio::test]
async fn test_bulk_falls_back_to_sequential_for_cursors() {
    let calls = AtomicUsize::new(0);
    let fetch = |cursor: PageCursor| {
        calls.fetch_add(1, Ordering::SeqCst);
        async move {
            let (items, after) = if cursor.after.is_none() {
                (json!([{"id": "a"}]), json!("a"))
            } else {
                (json!([{"id": "b"}]), json!(null))
            };
            Ok::<_, ApiError>(Some(json!({
                "artists": {"items": items, "total": 2, "cursors": {"after": after}}
            })))
        }
    };

    let items = paginate(fetch, extract_followed_artists, &PaginationOptions::new(1))
        .await
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(items.len(), 2);
}
