use anyhow::Context;
use client::YouTube;
use futures::{
    stream::{self, BoxStream},
    StreamExt, TryStreamExt,
};
use log::{debug, warn};
use models::playlist_items::PlaylistItem;

use crate::track::RawPlaylistItem;

pub mod client;
pub mod extractor;
pub mod models;

/// Largest `maxResults` the playlistItems endpoint accepts.
pub const PAGE_SIZE: u32 = 50;

/// One page of a playlist listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistPage {
    pub items: Vec<RawPlaylistItem>,
    pub next_page_token: Option<String>,
}

#[async_trait::async_trait]
pub trait PlaylistSource: Send + Sync {
    async fn fetch_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistPage, anyhow::Error>;

    async fn playlist_title(&self, playlist_id: &str) -> Result<String, anyhow::Error>;
}

#[async_trait::async_trait]
impl PlaylistSource for YouTube {
    async fn fetch_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistPage, anyhow::Error> {
        debug!(
            "Fetching songs for playlist: {} PageToken: {:?}",
            playlist_id, page_token
        );
        let response = self
            .get_playlist_items(playlist_id, PAGE_SIZE, page_token)
            .await?;

        let items = raw_items(response.items);
        debug!(
            "Fetched {} items from playlist ({:?} total).",
            items.len(),
            response.page_info.and_then(|info| info.total_results)
        );

        Ok(PlaylistPage {
            items,
            next_page_token: response.next_page_token,
        })
    }

    async fn playlist_title(&self, playlist_id: &str) -> Result<String, anyhow::Error> {
        debug!("Fetching playlist name for ID: {}", playlist_id);
        let playlists = self.get_playlists(playlist_id).await?;
        let title = playlists
            .items
            .into_iter()
            .next()
            .map(|playlist| playlist.snippet.title)
            .with_context(|| format!("playlist {} not found", playlist_id))?;
        debug!("Playlist name result: {}", title);
        Ok(title)
    }
}

/// Maps listed entries to pipeline items. Entries without a video id, such
/// as private or deleted videos, keep an empty id so their title can still
/// be parsed.
pub fn raw_items(items: Vec<PlaylistItem>) -> Vec<RawPlaylistItem> {
    items
        .into_iter()
        .map(|item| {
            let title = item.snippet.title;
            let video_id = match item.snippet.resource_id.video_id {
                Some(video_id) => video_id,
                None => {
                    warn!("No video ID for playlist item: {}", title);
                    String::new()
                }
            };
            debug!("API Title: {}, Video ID: {}", title, video_id);
            RawPlaylistItem {
                display_title: title,
                external_video_id: video_id,
            }
        })
        .collect()
}

/// Streams every item of a playlist, following continuation tokens until a
/// page comes back without one. Each call starts again from the first page.
pub fn list_items<'a>(
    source: &'a dyn PlaylistSource,
    playlist_id: &'a str,
) -> BoxStream<'a, Result<RawPlaylistItem, anyhow::Error>> {
    // `None` ends the listing, `Some(token)` fetches the page at `token`.
    let pages = stream::try_unfold(Some(None::<String>), move |next| async move {
        let Some(page_token) = next else {
            return Ok::<_, anyhow::Error>(None);
        };
        let page = source.fetch_page(playlist_id, page_token.as_deref()).await?;
        let next = page
            .next_page_token
            .filter(|token| !token.is_empty())
            .map(Some);
        Ok(Some((page.items, next)))
    });

    pages
        .map_ok(|items| stream::iter(items.into_iter().map(Ok::<_, anyhow::Error>)))
        .try_flatten()
        .boxed()
}

/// Extracts the playlist id from a YouTube URL. Anything without a `list=`
/// parameter is assumed to already be an id.
pub fn playlist_id_from_url(url: &str) -> String {
    let mut playlist_id = url;
    for marker in ["list=", "list\\="] {
        if let Some(index) = playlist_id.find(marker) {
            playlist_id = &playlist_id[index + marker.len()..];
        }
    }
    let end = ["\\&", "&", "%26"]
        .iter()
        .filter_map(|separator| playlist_id.find(separator))
        .min()
        .unwrap_or(playlist_id.len());

    playlist_id[..end].to_string()
}
