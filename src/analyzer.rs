//! Text metrics.
//!
//! Computes the word and character counts reported by `POST /analyze`.
//! Both counts are derived from the unmodified input; nothing here allocates
//! or holds state.

/// Counts produced for a single piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextMetrics {
    pub word_count: usize,
    pub character_count: usize,
}

/// Analyze `text`, returning its word and character counts.
///
/// `character_count` is the number of Unicode code points, whitespace and
/// punctuation included. `word_count` is the number of maximal runs of
/// non-whitespace characters.
pub fn analyze(text: &str) -> TextMetrics {
    TextMetrics {
        word_count: word_count(text),
        character_count: text.chars().count(),
    }
}

/// Number of whitespace-separated tokens in `text`.
///
/// Leading and trailing whitespace never produce tokens, so whitespace-only
/// input counts as zero words.
pub fn word_count(text: &str) -> usize {
    text.split(is_separator)
        .filter(|token| !token.is_empty())
        .count()
}

/// Unicode White_Space plus the ASCII information separators (FS, GS, RS, US).
fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}
