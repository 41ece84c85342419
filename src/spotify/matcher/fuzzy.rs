use levenshtein::levenshtein;

/// Lowercases and replaces everything that is not a letter or digit with a
/// space.
fn process(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect()
}

fn sorted_tokens(value: &str) -> String {
    let processed = process(value);
    let mut tokens: Vec<&str> = processed.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Similarity of two strings on a 0-100 scale, from their edit distance
/// relative to the longer string.
pub fn ratio(a: &str, b: &str) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let longest = a.chars().count().max(b.chars().count());
    let distance = levenshtein(a, b).min(longest);
    (((longest - distance) * 100 + longest / 2) / longest) as u8
}

/// Like [`ratio`], but insensitive to case, punctuation and word order.
pub fn token_sort_ratio(a: &str, b: &str) -> u8 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Scores every choice against `query` and keeps the `limit` best, highest
/// first. Equal scores keep the order of `choices`.
pub fn extract<'a, I>(query: &str, choices: I, limit: usize) -> Vec<(&'a str, u8)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut scored: Vec<(&str, u8)> = choices
        .into_iter()
        .map(|choice| (choice, token_sort_ratio(query, choice)))
        .collect();
    radsort::sort_by_key(&mut scored, |(_, score)| u8::MAX - *score);
    scored.truncate(limit);
    scored
}
