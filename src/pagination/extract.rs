//! Page extraction for the Web API's list payloads.
//!
//! Each function normalizes one payload shape into a [`Page`]. A payload
//! missing the expected fields yields `None`, which the engine treats as
//! exhaustion.

use serde_json::Value;

use crate::pagination::Page;

fn page_from(container: &Value, items: Vec<Value>) -> Page<Value> {
    Page {
        total: container
            .get("total")
            .and_then(Value::as_u64)
            .unwrap_or_else(|| u64::try_from(items.len()).unwrap_or(u64::MAX)),
        limit: container.get("limit").and_then(Value::as_u64),
        after: None,
        items,
    }
}

fn unwrap_envelopes(payload: &Value, envelope: &str) -> Option<Page<Value>> {
    let items = payload
        .get("items")?
        .as_array()?
        .iter()
        .filter_map(|item| item.get(envelope))
        .filter(|inner| !inner.is_null())
        .cloned()
        .collect();
    Some(page_from(payload, items))
}

/// `{items, total, limit}`: saved tracks, playlists, artist albums.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use spotify_api::pagination::extract::extract_items;
///
/// let page = extract_items(&json!({"items": [{"id": "a"}], "total": 1, "limit": 50})).unwrap();
/// assert_eq!(page.items, vec![json!({"id": "a"})]);
/// assert_eq!(page.limit, Some(50));
/// ```
#[must_use]
pub fn extract_items(payload: &Value) -> Option<Page<Value>> {
    let items = payload.get("items")?.as_array()?.clone();
    Some(page_from(payload, items))
}

/// Playlist tracks: each item wraps the track in a `track` envelope, which
/// is unwrapped. Items whose track is `null` (removed or local files) are
/// dropped.
#[must_use]
pub fn extract_playlist_tracks(payload: &Value) -> Option<Page<Value>> {
    unwrap_envelopes(payload, "track")
}

/// Saved albums: each item wraps the album in an `album` envelope.
#[must_use]
pub fn extract_saved_albums(payload: &Value) -> Option<Page<Value>> {
    unwrap_envelopes(payload, "album")
}

/// Followed artists: `{artists: {items, total, cursors: {after}}}`.
///
/// The page carries no `limit`, so the engine follows the `after` cursor.
#[must_use]
pub fn extract_followed_artists(payload: &Value) -> Option<Page<Value>> {
    let artists = payload.get("artists")?;
    let items = artists.get("items")?.as_array()?.clone();
    let mut page = page_from(artists, items);
    page.limit = None;
    page.after = artists
        .pointer("/cursors/after")
        .and_then(Value::as_str)
        .map(String::from);
    Some(page)
}
