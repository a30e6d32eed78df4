//! Keyword matching over one page of episodes.

use serde::Serialize;

use super::catalog::{EpisodeSummary, Keyword};

/// Titles of episodes whose description contains the keyword.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeywordMatches {
    titles: Vec<String>,
}

impl KeywordMatches {
    /// Matching titles in page order.
    #[must_use]
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// Whether nothing on the page matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

/// Case-sensitive substring match of `keyword` against each description,
/// keeping page order.
#[must_use]
pub fn match_keyword(episodes: &[EpisodeSummary], keyword: &Keyword) -> KeywordMatches {
    KeywordMatches {
        titles: episodes
            .iter()
            .filter(|episode| episode.description.contains(keyword.as_str()))
            .map(|episode| episode.name.clone())
            .collect(),
    }
}
