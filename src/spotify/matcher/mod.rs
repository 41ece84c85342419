pub mod fuzzy;

use log::debug;

use crate::track::{MatchCandidate, Track};

use super::Destination;

pub const SEARCH_LIMIT: u32 = 10;
pub const TOP_SCORES: usize = 3;
pub const CONFIDENCE_THRESHOLD: u8 = 70;

/// How a search result is chosen once candidates are scored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Take the first search result whatever its artist score. Scores are
    /// only logged.
    #[default]
    TopResult,
    /// Take the first result by the best-scoring artist, and only when that
    /// score clears [`CONFIDENCE_THRESHOLD`].
    ConfidentArtist,
}

pub fn search_query(track: &Track) -> String {
    format!("{} {}", track.title, track.artist)
}

/// Fuzzy scores of `artist` against the distinct primary artists of the
/// candidates, best first.
pub fn score_artists<'a>(artist: &str, candidates: &'a [MatchCandidate]) -> Vec<(&'a str, u8)> {
    let mut names: Vec<&str> = Vec::new();
    for candidate in candidates.iter() {
        if !names.contains(&candidate.artist_name.as_str()) {
            names.push(candidate.artist_name.as_str());
        }
    }
    fuzzy::extract(artist, names, TOP_SCORES)
}

/// Searches the catalog for `track` and returns the URI to add, if any.
pub async fn find_uri(
    destination: &dyn Destination,
    track: &Track,
    policy: MatchPolicy,
) -> Option<String> {
    let query = search_query(track);
    debug!("Query arguments: {}", query);

    let candidates = match destination.search_tracks(&query, SEARCH_LIMIT).await {
        Ok(candidates) => candidates,
        Err(err) => {
            debug!("Search failed for {:?}: {:#}", query, err);
            return None;
        }
    };
    let first = candidates.first()?;

    let scores = score_artists(&track.artist, &candidates);
    let best = scores
        .first()
        .filter(|(_, score)| *score > CONFIDENCE_THRESHOLD);
    match best {
        Some(_) => debug!("Fuzzy match found {:?}", scores),
        None => debug!("Fuzzy match not found {:?}", scores),
    }

    match policy {
        MatchPolicy::TopResult => Some(first.uri.clone()),
        MatchPolicy::ConfidentArtist => {
            let (name, _) = best?;
            candidates
                .iter()
                .find(|candidate| candidate.artist_name == *name)
                .map(|candidate| candidate.uri.clone())
        }
    }
}
