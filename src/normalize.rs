use crate::track::Track;

/// Cuts `value` at the first occurrence of `pattern`, dropping the pattern
/// and everything after it.
fn cut_at<'a>(value: &'a str, pattern: &str) -> &'a str {
    match value.find(pattern) {
        Some(index) => &value[..index],
        None => value,
    }
}

// "ft" is matched case-sensitively anywhere, so "Left" becomes "Le".
fn strip_noise(value: &str) -> &str {
    let value = cut_at(value, "(");
    let value = cut_at(value, "ft");
    cut_at(value, ",")
}

/// Drops remix notes, featured artists and secondary collaborators from a
/// track so the search query only carries the main artist and song name.
pub fn normalize(track: &Track) -> Track {
    let title = strip_noise(&track.title);
    let artist = strip_noise(cut_at(&track.artist, " x "));

    Track {
        artist: artist.trim().to_string(),
        title: title.trim().to_string(),
    }
}
