use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Track {
    pub artist: String,
    pub title: String,
}

impl Track {
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.artist.trim().is_empty() && !self.title.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawPlaylistItem {
    pub display_title: String,
    pub external_video_id: String,
}

/// Outcome of metadata extraction. Both fields absent means nothing usable
/// was found for the item, which callers treat as a skip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    pub artist: Option<String>,
    pub title: Option<String>,
}

impl ExtractionResult {
    pub fn into_track(self) -> Option<Track> {
        match (self.artist, self.title) {
            (Some(artist), Some(title)) => {
                let track = Track { artist, title };
                track.is_complete().then_some(track)
            }
            _ => None,
        }
    }
}

impl From<Track> for ExtractionResult {
    fn from(track: Track) -> Self {
        Self {
            artist: Some(track.artist),
            title: Some(track.title),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchCandidate {
    pub uri: String,
    pub artist_name: String,
}
