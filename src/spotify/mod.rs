use anyhow::Context;
use log::{debug, error};
use rspotify::{
    model::{PlayableId, PlaylistId, SearchResult, SearchType, TrackId},
    prelude::{BaseClient, Id, OAuthClient},
    scopes, AuthCodeSpotify, Credentials, OAuth,
};

use crate::{config::SpotifyCredentials, track::MatchCandidate};

pub mod matcher;

/// The destination catalog: track search and playlist writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Destination: Send + Sync {
    async fn search_tracks(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<MatchCandidate>, anyhow::Error>;

    async fn create_playlist(&self, name: &str, description: &str)
        -> Result<String, anyhow::Error>;

    /// Returns false when the track could not be added.
    async fn add_track(&self, uri: &str, playlist_id: &str) -> bool;

    async fn count_tracks(&self, playlist_id: &str) -> Option<u32>;
}

pub struct Spotify {
    client: AuthCodeSpotify,
}

impl Spotify {
    /// Runs the authorization code flow, reusing the cached token when there
    /// is one.
    pub fn authorize(credentials: &SpotifyCredentials) -> Result<Self, anyhow::Error> {
        let creds = Credentials::new(&credentials.client_id, &credentials.client_secret);
        let oauth = OAuth {
            redirect_uri: credentials.redirect_uri.clone(),
            scopes: scopes!("playlist-modify-private", "playlist-read-private"),
            ..Default::default()
        };

        let mut client = AuthCodeSpotify::new(creds, oauth);
        client.config.token_cached = true;

        let url = client.get_authorize_url(false)?;
        client
            .prompt_for_token(&url)
            .context("Spotify authorization failed")?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Destination for Spotify {
    async fn search_tracks(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<MatchCandidate>, anyhow::Error> {
        let result = self
            .client
            .search(query, SearchType::Track, None, None, Some(limit), None)?;

        let SearchResult::Tracks(page) = result else {
            return Ok(Vec::new());
        };

        let candidates = page
            .items
            .into_iter()
            .filter_map(|track| {
                // Local files have no catalog id.
                let uri = track.id.as_ref()?.uri();
                let artist_name = track
                    .artists
                    .first()
                    .map(|artist| artist.name.clone())
                    .unwrap_or_default();
                Some(MatchCandidate { uri, artist_name })
            })
            .collect();
        Ok(candidates)
    }

    async fn create_playlist(
        &self,
        name: &str,
        description: &str,
    ) -> Result<String, anyhow::Error> {
        let user = self.client.current_user()?;
        let playlist = self.client.user_playlist_create(
            user.id,
            name,
            Some(false),
            None,
            Some(description),
        )?;
        debug!("Created playlist {} ({})", playlist.name, playlist.id.id());
        Ok(playlist.id.id().to_string())
    }

    async fn add_track(&self, uri: &str, playlist_id: &str) -> bool {
        let ids = TrackId::from_uri(uri)
            .map_err(anyhow::Error::from)
            .and_then(|track| Ok((track, PlaylistId::from_id(playlist_id)?)));
        let (track, playlist) = match ids {
            Ok(ids) => ids,
            Err(err) => {
                error!("Cannot add {} to {}: {}", uri, playlist_id, err);
                return false;
            }
        };

        match self
            .client
            .playlist_add_items(playlist, [PlayableId::Track(track)], None)
        {
            Ok(_) => true,
            Err(err) => {
                error!("Spotify rejected {}: {}", uri, err);
                false
            }
        }
    }

    async fn count_tracks(&self, playlist_id: &str) -> Option<u32> {
        let playlist_id = PlaylistId::from_id(playlist_id).ok()?;
        match self.client.playlist(playlist_id, None, None) {
            Ok(playlist) => Some(playlist.tracks.total),
            Err(err) => {
                error!("Bad API Response: {}", err);
                None
            }
        }
    }
}
