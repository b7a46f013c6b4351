//! Single-call Web API endpoints.
//!
//! Each method issues exactly one request with the given access token and
//! returns the response body. List endpoints default to `limit=20` and
//! `offset=0`. Token freshness is the caller's concern here; the collection
//! operations on [`SpotifyClient`] check it before calling these.

use serde_json::{json, Value};

use crate::api::SpotifyClient;
use crate::clients::{ApiError, HttpMethod, RequestDescriptor, RequestDescriptorBuilder};

/// Default page size of list endpoints.
pub const DEFAULT_LIMIT: u32 = 20;

fn list_query(limit: Option<u32>, offset: Option<u64>) -> Value {
    json!({
        "limit": limit.unwrap_or(DEFAULT_LIMIT),
        "offset": offset.unwrap_or(0),
    })
}

fn segment(id: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(id)
}

impl SpotifyClient {
    fn api_request(&self, access_token: &str) -> Result<RequestDescriptorBuilder, ApiError> {
        RequestDescriptor::api(self.config().api_endpoint(), access_token)
    }

    async fn send(&self, request: RequestDescriptorBuilder) -> Result<Value, ApiError> {
        let response = self.http().execute(&request.build()).await?;
        Ok(response.body)
    }

    /// `GET /v1/me`: the current user's profile.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Setup`] for an empty token, otherwise the
    /// classified error of the call.
    pub async fn get_me(&self, access_token: &str) -> Result<Value, ApiError> {
        self.send(self.api_request(access_token)?.path("/v1/me")).await
    }

    /// `GET /v1/me/tracks`: one page of the user's saved tracks.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Setup`] for an empty token, otherwise the
    /// classified error of the call.
    pub async fn get_saved_tracks(
        &self,
        access_token: &str,
        limit: Option<u32>,
        offset: Option<u64>,
    ) -> Result<Value, ApiError> {
        let request = self
            .api_request(access_token)?
            .method(HttpMethod::Get)
            .path("/v1/me/tracks")
            .query_params(list_query(limit, offset));
        self.send(request).await
    }

    /// `GET /v1/me/playlists`: one page of the playlists the user owns or
    /// follows.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Setup`] for an empty token, otherwise the
    /// classified error of the call.
    pub async fn get_playlists(
        &self,
        access_token: &str,
        limit: Option<u32>,
        offset: Option<u64>,
    ) -> Result<Value, ApiError> {
        let request = self
            .api_request(access_token)?
            .path("/v1/me/playlists")
            .query_params(list_query(limit, offset));
        self.send(request).await
    }

    /// `GET /v1/me/albums`: one page of the user's saved albums.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Setup`] for an empty token, otherwise the
    /// classified error of the call.
    pub async fn get_saved_albums(
        &self,
        access_token: &str,
        limit: Option<u32>,
        offset: Option<u64>,
    ) -> Result<Value, ApiError> {
        let request = self
            .api_request(access_token)?
            .path("/v1/me/albums")
            .query_params(list_query(limit, offset));
        self.send(request).await
    }

    /// `GET /v1/me/following?type=artist`: one page of followed artists.
    ///
    /// This endpoint is cursor-paginated; pass the previous page's
    /// `cursors.after` to continue.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Setup`] for an empty token, otherwise the
    /// classified error of the call.
    pub async fn get_followed_artists(
        &self,
        access_token: &str,
        limit: Option<u32>,
        after: Option<&str>,
    ) -> Result<Value, ApiError> {
        let request = self
            .api_request(access_token)?
            .path("/v1/me/following")
            .query_params(json!({
                "type": "artist",
                "limit": limit.unwrap_or(DEFAULT_LIMIT),
                "after": after,
            }));
        self.send(request).await
    }

    /// `GET /v1/playlists/{id}/tracks`: one page of a playlist's items.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Setup`] for an empty token, otherwise the
    /// classified error of the call.
    pub async fn get_playlist_tracks(
        &self,
        access_token: &str,
        playlist_id: &str,
        limit: Option<u32>,
        offset: Option<u64>,
    ) -> Result<Value, ApiError> {
        let request = self
            .api_request(access_token)?
            .path(format!("/v1/playlists/{}/tracks", segment(playlist_id)))
            .query_params(list_query(limit, offset));
        self.send(request).await
    }

    /// `GET /v1/artists/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Setup`] for an empty token, otherwise the
    /// classified error of the call.
    pub async fn get_artist(&self, access_token: &str, artist_id: &str) -> Result<Value, ApiError> {
        let request = self
            .api_request(access_token)?
            .path(format!("/v1/artists/{}", segment(artist_id)));
        self.send(request).await
    }

    /// `GET /v1/artists/{id}/top-tracks`. Without a `market` the user's own
    /// market is used.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Setup`] for an empty token, otherwise the
    /// classified error of the call.
    pub async fn get_artist_top_tracks(
        &self,
        access_token: &str,
        artist_id: &str,
        market: Option<&str>,
    ) -> Result<Value, ApiError> {
        let request = self
            .api_request(access_token)?
            .path(format!("/v1/artists/{}/top-tracks", segment(artist_id)))
            .query_params(json!({ "market": market.unwrap_or("from_token") }));
        self.send(request).await
    }

    /// `GET /v1/artists/{id}/albums`: one page of an artist's albums.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Setup`] for an empty token, otherwise the
    /// classified error of the call.
    pub async fn get_artist_albums(
        &self,
        access_token: &str,
        artist_id: &str,
        limit: Option<u32>,
        offset: Option<u64>,
    ) -> Result<Value, ApiError> {
        let request = self
            .api_request(access_token)?
            .path(format!("/v1/artists/{}/albums", segment(artist_id)))
            .query_params(list_query(limit, offset));
        self.send(request).await
    }

    /// `GET /v1/artists/{id}/related-artists`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Setup`] for an empty token, otherwise the
    /// classified error of the call.
    pub async fn get_related_artists(
        &self,
        access_token: &str,
        artist_id: &str,
    ) -> Result<Value, ApiError> {
        let request = self
            .api_request(access_token)?
            .path(format!("/v1/artists/{}/related-artists", segment(artist_id)));
        self.send(request).await
    }

    /// `GET /v1/me/player/devices`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Setup`] for an empty token, otherwise the
    /// classified error of the call.
    pub async fn get_available_devices(&self, access_token: &str) -> Result<Value, ApiError> {
        self.send(self.api_request(access_token)?.path("/v1/me/player/devices"))
            .await
    }

    /// `PUT /v1/me/player`: transfers playback to `device_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Setup`] for an empty token or device ID, otherwise
    /// the classified error of the call.
    pub async fn transfer_playback(
        &self,
        access_token: &str,
        device_id: &str,
    ) -> Result<Value, ApiError> {
        if device_id.is_empty() {
            return Err(ApiError::Setup {
                reason: "a device ID is required to transfer playback".to_string(),
            });
        }
        let request = self
            .api_request(access_token)?
            .method(HttpMethod::Put)
            .path("/v1/me/player")
            .body_params(json!({ "device_ids": [device_id] }));
        self.send(request).await
    }
}
