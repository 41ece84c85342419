//! Best-effort split of a free-form video title into artist and song.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::track::Track;

/// Bracketed or trailing annotations that never belong to the song name.
static FLUFF_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // "(Official Video)", "[Lyrics]", "【MV】", "(Audio HD)"
        Regex::new(r"(?i)\s*[\(\[【][^\)\]】]*\b(?:official|video|audio|lyrics?|hd|hq|4k|mv|m/v|visuali[sz]er|full\s+album|explicit|clean)\b[^\)\]】]*[\)\]】]").unwrap(),
        // "Song Official Music Video", "Song Lyrics"
        Regex::new(r"(?i)\s+(?:official\s+(?:music\s+)?video|official\s+audio|lyric\s+video|lyrics|hd|hq)\s*$").unwrap(),
    ]
});

/// Separators between artist and song, most specific first.
const SPACED_SEPARATORS: &[&str] = &[" -- ", " - ", " – ", " — ", " ~ ", " | ", " / ", " _ "];
const BARE_SEPARATORS: &[&str] = &["--", "-", "–", "—", ":", "|"];

/// `"Title" by Artist`. An unquoted title is not split on `by`, since song
/// names such as `Stand by Me` contain it.
static TITLE_BY_ARTIST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^["“「『](?P<title>[^"”」』]+)["”」』]\s+by\s+(?P<artist>.+)$"#).unwrap()
});

static ARTIST_QUOTED_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(?P<artist>[^"“「『]+?)\s*["“「『](?P<title>[^"”」』]+)["”」』]"#).unwrap()
});

const QUOTES: &[char] = &['"', '\'', '“', '”', '「', '」', '『', '』'];

pub fn remove_fluff(title: &str) -> String {
    let mut cleaned = title.to_string();
    for re in FLUFF_PATTERNS.iter() {
        cleaned = re.replace_all(&cleaned, "").to_string();
    }
    cleaned.trim().to_string()
}

fn clean_part(part: &str) -> &str {
    part.trim()
        .trim_end_matches(|c: char| c == '|' || c == '-' || c.is_whitespace())
        .trim_matches(QUOTES)
        .trim()
}

fn track_from(artist: &str, title: &str) -> Option<Track> {
    let track = Track::new(clean_part(artist), clean_part(title));
    track.is_complete().then_some(track)
}

fn split_on(title: &str, separators: &[&str]) -> Option<Option<Track>> {
    separators.iter().find_map(|separator| {
        title
            .split_once(separator)
            .map(|(artist, song)| track_from(artist, song))
    })
}

/// Splits a video title such as `Artist - Song (Official Video)` into its
/// artist and song name. Returns `None` when the title has no recognisable
/// structure.
pub fn artist_title(display_title: &str) -> Option<Track> {
    let title = remove_fluff(display_title);
    if title.is_empty() {
        return None;
    }

    if let Some(track) = split_on(&title, SPACED_SEPARATORS) {
        return track;
    }

    if let Some(captures) = TITLE_BY_ARTIST.captures(&title) {
        return track_from(&captures["artist"], &captures["title"]);
    }

    if let Some(captures) = ARTIST_QUOTED_TITLE.captures(&title) {
        return track_from(&captures["artist"], &captures["title"]);
    }

    split_on(&title, BARE_SEPARATORS).flatten()
}
