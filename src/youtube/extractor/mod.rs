use log::debug;
use serde::Deserialize;

use crate::track::Track;

pub mod title_parse;
pub mod ytdlp;

/// The fields of a yt-dlp info document used for track resolution.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoMetadata {
    pub title: Option<String>,
    pub track: Option<String>,
    pub artist: Option<String>,
    pub artists: Option<Vec<String>>,
}

impl VideoMetadata {
    /// Returns the official track and artist when both are present.
    pub fn track(&self) -> Option<Track> {
        let title = non_blank(self.track.as_deref())?;
        let artist = non_blank(self.artist.as_deref()).or_else(|| {
            self.artists
                .as_ref()
                .and_then(|artists| non_blank(artists.first().map(String::as_str)))
        })?;
        Some(Track::new(artist, title))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[async_trait::async_trait]
pub trait VideoMetadataSource: Send + Sync {
    async fn video_metadata(&self, video_id: &str) -> Result<VideoMetadata, anyhow::Error>;
}

/// Looks up the platform's own track/artist fields for a video. Lookup
/// failures are not errors here, they only mean the title has to be parsed.
pub async fn try_structured(source: &dyn VideoMetadataSource, video_id: &str) -> Option<Track> {
    if video_id.is_empty() {
        return None;
    }
    match source.video_metadata(video_id).await {
        Ok(metadata) => {
            let track = metadata.track();
            if track.is_none() {
                debug!("No track info found - Video ID {}", video_id);
            }
            track
        }
        Err(err) => {
            debug!("Structured lookup unavailable for {}: {:#}", video_id, err);
            None
        }
    }
}

/// Guesses artist and title from the raw video title.
pub fn try_heuristic(display_title: &str) -> Option<Track> {
    title_parse::artist_title(display_title)
}
