//! The Web API client.
//!
//! [`SpotifyClient`] composes the configuration, the transport, the
//! refresh-before-use gate and the pagination engine. Its operations take the
//! caller's [`Credential`] by mutable reference: the credential is refreshed
//! in place when it has expired, before any Web API call is made.
//!
//! # Example
//!
//! ```rust,ignore
//! use spotify_api::pagination::PaginationOptions;
//! use spotify_api::{SpotifyClient, SpotifyConfig};
//!
//! let client = SpotifyClient::new(SpotifyConfig::from_env()?)?;
//!
//! // `credential` comes from the session store
//! let tracks = client
//!     .saved_tracks(&mut credential, &PaginationOptions::default())
//!     .await?;
//! println!("{} saved tracks", tracks.len());
//! ```

mod endpoints;

pub use endpoints::DEFAULT_LIMIT;

use serde_json::Value;

use crate::auth::oauth::{
    authorization_code_grant, begin_authorization, create_authorize_url, ensure_fresh_token,
    AuthorizationRequest, StateParam,
};
use crate::auth::{Credential, SessionStore};
use crate::clients::{ApiError, HttpClient};
use crate::config::SpotifyConfig;
use crate::pagination::{extract, paginate, PageCursor, PaginationOptions, Strategy};

/// Artist, top tracks, albums and related artists, fetched together.
#[derive(Clone, Debug, PartialEq)]
pub struct ArtistDetail {
    /// The artist object.
    pub artist: Value,
    /// The artist's top tracks.
    pub top_tracks: Vec<Value>,
    /// Every album of the artist.
    pub albums: Vec<Value>,
    /// Artists similar to this one.
    pub related_artists: Vec<Value>,
}

/// Client for the accounts service and the Web API.
///
/// `SpotifyClient` is cheap to clone and `Send + Sync`; one instance is meant
/// to be shared by every request handler.
#[derive(Clone, Debug)]
pub struct SpotifyClient {
    config: SpotifyConfig,
    http: HttpClient,
}

// Verify SpotifyClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SpotifyClient>();
};

fn array_field(body: &Value, field: &str) -> Vec<Value> {
    body.get(field)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

impl SpotifyClient {
    /// Creates a client for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Setup`] if the HTTP client cannot be constructed.
    pub fn new(config: SpotifyConfig) -> Result<Self, ApiError> {
        let http = HttpClient::new(&config)?;
        Ok(Self { config, http })
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &SpotifyConfig {
        &self.config
    }

    /// Returns the transport.
    #[must_use]
    pub const fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Builds the authorize URL for `state`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Setup`] if no redirect URI is configured.
    pub fn authorize_url(&self, state: &StateParam) -> Result<String, ApiError> {
        create_authorize_url(&self.config, state)
    }

    /// Generates a state and the matching authorize URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Setup`] if no redirect URI is configured.
    pub fn begin_authorization(&self) -> Result<AuthorizationRequest, ApiError> {
        begin_authorization(&self.config)
    }

    /// Exchanges the callback's authorization code for a [`Credential`].
    ///
    /// # Errors
    ///
    /// See [`authorization_code_grant`].
    pub async fn exchange_code(&self, code: &str) -> Result<Credential, ApiError> {
        authorization_code_grant(&self.config, &self.http, code).await
    }

    /// Refreshes `credential` if it has expired. Returns `true` if it was
    /// refreshed.
    ///
    /// # Errors
    ///
    /// Returns the classified error of the refresh call; the credential is
    /// left untouched.
    pub async fn ensure_token(&self, credential: &mut Credential) -> Result<bool, ApiError> {
        ensure_fresh_token(&self.config, &self.http, credential).await
    }

    /// Reads the credential stored under `key`, refreshes it if it has
    /// expired, writes it back and returns the usable access token.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Setup`] if nothing is stored under `key`
    /// - the classified error of the refresh call, in which case the stored
    ///   credential is not modified
    pub async fn ensure_stored_session_token<S>(
        &self,
        store: &S,
        key: &str,
    ) -> Result<String, ApiError>
    where
        S: SessionStore + ?Sized,
    {
        let mut credential = store.get(key).ok_or_else(|| ApiError::Setup {
            reason: "no credential is stored for this session".to_string(),
        })?;

        if self.ensure_token(&mut credential).await? {
            store.set(key, credential.clone());
        }
        Ok(credential.access_token)
    }

    async fn fresh_token(&self, credential: &mut Credential) -> Result<String, ApiError> {
        self.ensure_token(credential).await?;
        Ok(credential.access_token.clone())
    }

    /// The current user's profile.
    ///
    /// # Errors
    ///
    /// Returns the classified error of the refresh or the call.
    pub async fn current_user(&self, credential: &mut Credential) -> Result<Value, ApiError> {
        let token = self.fresh_token(credential).await?;
        self.get_me(&token).await
    }

    /// Every saved track of the user.
    ///
    /// # Errors
    ///
    /// Returns the classified error of the refresh or of the first page.
    pub async fn saved_tracks(
        &self,
        credential: &mut Credential,
        options: &PaginationOptions,
    ) -> Result<Vec<Value>, ApiError> {
        let token = self.fresh_token(credential).await?;
        let token = token.as_str();
        paginate(
            move |cursor: PageCursor| async move {
                self.get_saved_tracks(token, Some(cursor.limit), Some(cursor.offset))
                    .await
                    .map(Some)
            },
            extract::extract_items,
            options,
        )
        .await
    }

    /// Every playlist the user owns or follows.
    ///
    /// # Errors
    ///
    /// Returns the classified error of the refresh or of the first page.
    pub async fn playlists(
        &self,
        credential: &mut Credential,
        options: &PaginationOptions,
    ) -> Result<Vec<Value>, ApiError> {
        let token = self.fresh_token(credential).await?;
        let token = token.as_str();
        paginate(
            move |cursor: PageCursor| async move {
                self.get_playlists(token, Some(cursor.limit), Some(cursor.offset))
                    .await
                    .map(Some)
            },
            extract::extract_items,
            options,
        )
        .await
    }

    /// Every saved album of the user, unwrapped from its `album` envelope.
    ///
    /// # Errors
    ///
    /// Returns the classified error of the refresh or of the first page.
    pub async fn saved_albums(
        &self,
        credential: &mut Credential,
        options: &PaginationOptions,
    ) -> Result<Vec<Value>, ApiError> {
        let token = self.fresh_token(credential).await?;
        let token = token.as_str();
        paginate(
            move |cursor: PageCursor| async move {
                self.get_saved_albums(token, Some(cursor.limit), Some(cursor.offset))
                    .await
                    .map(Some)
            },
            extract::extract_saved_albums,
            options,
        )
        .await
    }

    /// Every artist the user follows.
    ///
    /// The endpoint is cursor-paginated, so pages are always fetched
    /// sequentially whatever strategy `options` names.
    ///
    /// # Errors
    ///
    /// Returns the classified error of the refresh or of any page.
    pub async fn followed_artists(
        &self,
        credential: &mut Credential,
        options: &PaginationOptions,
    ) -> Result<Vec<Value>, ApiError> {
        let token = self.fresh_token(credential).await?;
        let token = token.as_str();
        let options = options.strategy(Strategy::Sequential);
        paginate(
            move |cursor: PageCursor| async move {
                self.get_followed_artists(token, Some(cursor.limit), cursor.after.as_deref())
                    .await
                    .map(Some)
            },
            extract::extract_followed_artists,
            &options,
        )
        .await
    }

    /// Every track of a playlist, unwrapped from its `track` envelope.
    ///
    /// # Errors
    ///
    /// Returns the classified error of the refresh or of the first page.
    pub async fn playlist_tracks(
        &self,
        credential: &mut Credential,
        playlist_id: &str,
        options: &PaginationOptions,
    ) -> Result<Vec<Value>, ApiError> {
        let token = self.fresh_token(credential).await?;
        let token = token.as_str();
        paginate(
            move |cursor: PageCursor| async move {
                self.get_playlist_tracks(token, playlist_id, Some(cursor.limit), Some(cursor.offset))
                    .await
                    .map(Some)
            },
            extract::extract_playlist_tracks,
            options,
        )
        .await
    }

    /// Every album of an artist.
    ///
    /// # Errors
    ///
    /// Returns the classified error of the refresh or of the first page.
    pub async fn artist_albums(
        &self,
        credential: &mut Credential,
        artist_id: &str,
        options: &PaginationOptions,
    ) -> Result<Vec<Value>, ApiError> {
        let token = self.fresh_token(credential).await?;
        self.all_artist_albums(&token, artist_id, options).await
    }

    async fn all_artist_albums(
        &self,
        token: &str,
        artist_id: &str,
        options: &PaginationOptions,
    ) -> Result<Vec<Value>, ApiError> {
        paginate(
            move |cursor: PageCursor| async move {
                self.get_artist_albums(token, artist_id, Some(cursor.limit), Some(cursor.offset))
                    .await
                    .map(Some)
            },
            extract::extract_items,
            options,
        )
        .await
    }

    /// The artist, its top tracks, all of its albums and related artists,
    /// requested concurrently. Any failing request fails the whole result.
    ///
    /// # Errors
    ///
    /// Returns the classified error of the refresh or of the first request
    /// to fail.
    pub async fn artist_detail(
        &self,
        credential: &mut Credential,
        artist_id: &str,
        market: Option<&str>,
    ) -> Result<ArtistDetail, ApiError> {
        let token = self.fresh_token(credential).await?;
        let token = token.as_str();
        let album_options = PaginationOptions::default();

        let (artist, top_tracks, albums, related_artists) = tokio::try_join!(
            self.get_artist(token, artist_id),
            self.get_artist_top_tracks(token, artist_id, market),
            self.all_artist_albums(token, artist_id, &album_options),
            self.get_related_artists(token, artist_id),
        )?;

        Ok(ArtistDetail {
            artist,
            top_tracks: array_field(&top_tracks, "tracks"),
            albums,
            related_artists: array_field(&related_artists, "artists"),
        })
    }

    /// The user's available playback devices.
    ///
    /// # Errors
    ///
    /// Returns the classified error of the refresh or the call.
    pub async fn devices(&self, credential: &mut Credential) -> Result<Vec<Value>, ApiError> {
        let token = self.fresh_token(credential).await?;
        let body = self.get_available_devices(&token).await?;
        Ok(array_field(&body, "devices"))
    }

    /// Transfers playback to `device_id`.
    ///
    /// # Errors
    ///
    /// Returns the classified error of the refresh or the call.
    pub async fn set_active_device(
        &self,
        credential: &mut Credential,
        device_id: &str,
    ) -> Result<(), ApiError> {
        let token = self.fresh_token(credential).await?;
        self.transfer_playback(&token, device_id).await?;
        Ok(())
    }
}
