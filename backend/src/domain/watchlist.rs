//! Watchlist membership between users and stored podcasts.

use std::collections::HashMap;

use serde::Serialize;

use super::podcast::{Podcast, PodcastId};
use super::user::UserId;

/// One `(user, podcast)` watchlist row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchListEntry {
    /// Owner of the watchlist.
    pub user_id: UserId,
    /// Watched podcast.
    pub podcast_id: PodcastId,
}

impl WatchListEntry {
    /// Pair a user with a podcast.
    #[must_use]
    pub const fn new(user_id: UserId, podcast_id: PodcastId) -> Self {
        Self {
            user_id,
            podcast_id,
        }
    }
}

/// Whether `podcast_id` appears in `entries`.
#[must_use]
pub fn contains_podcast(entries: &[WatchListEntry], podcast_id: PodcastId) -> bool {
    entries.iter().any(|entry| entry.podcast_id == podcast_id)
}

/// Arrange `podcasts` in the order of `entries`.
///
/// Entries whose podcast is missing from `podcasts` are skipped.
#[must_use]
pub fn podcasts_in_entry_order(entries: &[WatchListEntry], podcasts: Vec<Podcast>) -> Vec<Podcast> {
    let mut by_id: HashMap<PodcastId, Podcast> = podcasts
        .into_iter()
        .map(|podcast| (podcast.id(), podcast))
        .collect();
    entries
        .iter()
        .filter_map(|entry| by_id.remove(&entry.podcast_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewPodcast;

    fn podcast(id: i32, title: &str) -> Podcast {
        NewPodcast::try_from_parts(title, "Host", "", None, "show1")
            .expect("valid podcast")
            .into_podcast(PodcastId::new(id).expect("id"))
    }

    #[test]
    fn orders_podcasts_by_entries() {
        let user = UserId::random();
        let entries = vec![
            WatchListEntry::new(user.clone(), PodcastId::new(2).expect("id")),
            WatchListEntry::new(user.clone(), PodcastId::new(9).expect("id")),
            WatchListEntry::new(user, PodcastId::new(1).expect("id")),
        ];
        let ordered = podcasts_in_entry_order(
            &entries,
            vec![podcast(1, "one"), podcast(2, "two")],
        );
        let titles: Vec<_> = ordered.iter().map(Podcast::title).collect();
        assert_eq!(titles, vec!["two", "one"]);
    }
}
