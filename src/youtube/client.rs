use anyhow::Context;
use reqwest::Response;

use super::models::{
    playlist_items::PlaylistItem, playlists::Playlist, ListResponse,
};

pub const YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3";

pub struct YouTube {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl YouTube {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(YOUTUBE_API_URL.to_string(), api_key)
    }

    pub fn with_base_url(base_url: String, api_key: String) -> Self {
        Self {
            base_url,
            api_key,
            client: reqwest::Client::new(),
        }
    }

    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Response, anyhow::Error> {
        let response = self
            .client
            .get(format!("{}/{}", self.base_url, path))
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .header("Accept", "application/json")
            .send()
            .await?
            .error_for_status()
            .with_context(|| format!("YouTube API request to {} failed", path))?;

        Ok(response)
    }

    pub async fn get_playlist_items(
        &self,
        playlist_id: &str,
        max_results: u32,
        page_token: Option<&str>,
    ) -> Result<ListResponse<PlaylistItem>, anyhow::Error> {
        let max_results = max_results.to_string();
        let mut query = vec![
            ("part", "snippet"),
            ("playlistId", playlist_id),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let items: ListResponse<PlaylistItem> =
            self.get("playlistItems", &query).await?.json().await?;
        Ok(items)
    }

    pub async fn get_playlists(
        &self,
        playlist_id: &str,
    ) -> Result<ListResponse<Playlist>, anyhow::Error> {
        let playlists: ListResponse<Playlist> = self
            .get("playlists", &[("part", "snippet"), ("id", playlist_id)])
            .await?
            .json()
            .await?;
        Ok(playlists)
    }
}
