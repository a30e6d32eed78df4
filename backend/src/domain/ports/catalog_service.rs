//! Driving port for catalog use-cases.
//!
//! Handlers call this port with the session's authorization code; the
//! implementation decides when to exchange the code for a token.

use async_trait::async_trait;

use crate::domain::{
    AuthorizationCode, EpisodeOffset, Error, Keyword, KeywordMatches, ShowId, ShowRecord,
};

/// Domain use-case port for catalog access.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Provider consent URL the browser is sent to when no code is held.
    fn authorization_url(&self) -> String;

    /// Look up a show by catalog id.
    async fn lookup_show(
        &self,
        code: &AuthorizationCode,
        show_id: &ShowId,
    ) -> Result<ShowRecord, Error>;

    /// Search one page of a show's episodes for `keyword`.
    async fn search_episodes(
        &self,
        code: &AuthorizationCode,
        show_id: &ShowId,
        keyword: &Keyword,
        offset: EpisodeOffset,
    ) -> Result<KeywordMatches, Error>;

    /// Drop any token cached for `code`.
    async fn forget(&self, code: &AuthorizationCode);
}
