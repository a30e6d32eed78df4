//! Catalog use-cases: authorization URL, show lookup and episode search.
//!
//! Every catalog call needs a bearer token. Tokens are exchanged from the
//! session's authorization code on demand and, when a TTL is configured, kept
//! in a small in-process cache keyed by the code's fingerprint. Expiry is read
//! from an injected [`Clock`] so tests can move time.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use tracing::{debug, info};
use url::Url;

use crate::domain::ports::{CatalogService, CatalogSource, TokenExchange};
use crate::domain::{
    AuthorizationCode, BearerToken, EpisodeOffset, Error, Keyword, KeywordMatches, ShowId,
    ShowRecord, match_keyword,
};

/// Provider settings needed to build the consent URL and size the cache.
#[derive(Debug, Clone)]
pub struct CatalogAccessSettings {
    /// Provider consent page.
    pub authorize_url: Url,
    /// Registered client identifier.
    pub client_id: String,
    /// Where the provider sends the listener back with a code.
    pub redirect_uri: String,
    /// Zero disables the token cache.
    pub token_cache_ttl: Duration,
}

struct CachedToken {
    token: BearerToken,
    expires_at: DateTime<Utc>,
}

struct TokenCache {
    ttl: TimeDelta,
    entries: Mutex<HashMap<String, CachedToken>>,
}

impl TokenCache {
    fn new(lifetime: Duration) -> Option<Self> {
        if lifetime.is_zero() {
            return None;
        }
        Some(Self {
            ttl: TimeDelta::from_std(lifetime).unwrap_or(TimeDelta::MAX),
            entries: Mutex::new(HashMap::new()),
        })
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CachedToken>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn get(&self, fingerprint: &str, now: DateTime<Utc>) -> Option<BearerToken> {
        let mut entries = self.lock();
        match entries.get(fingerprint) {
            Some(cached) if cached.expires_at > now => Some(cached.token.clone()),
            Some(_) => {
                entries.remove(fingerprint);
                None
            }
            None => None,
        }
    }

    fn put(&self, fingerprint: String, token: BearerToken, now: DateTime<Utc>) {
        let expires_at = now.checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);
        let mut entries = self.lock();
        entries.retain(|_, cached| cached.expires_at > now);
        entries.insert(fingerprint, CachedToken { token, expires_at });
    }

    fn remove(&self, fingerprint: &str) {
        self.lock().remove(fingerprint);
    }
}

/// [`CatalogService`] implementation over the token and catalog ports.
pub struct CatalogAccess {
    tokens: Arc<dyn TokenExchange>,
    source: Arc<dyn CatalogSource>,
    clock: Arc<dyn Clock>,
    authorization_url: String,
    cache: Option<TokenCache>,
}

impl CatalogAccess {
    /// Wire the service.
    ///
    /// A zero `token_cache_ttl` leaves the cache disabled.
    ///
    /// # Examples
    /// ```ignore
    /// let access = CatalogAccess::new(tokens, source, Arc::new(DefaultClock), settings);
    /// assert!(access.authorization_url().contains("response_type=code"));
    /// ```
    #[must_use]
    pub fn new(
        tokens: Arc<dyn TokenExchange>,
        source: Arc<dyn CatalogSource>,
        clock: Arc<dyn Clock>,
        settings: CatalogAccessSettings,
    ) -> Self {
        let mut url = settings.authorize_url;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &settings.redirect_uri)
            .append_pair("client_id", &settings.client_id);
        Self {
            tokens,
            source,
            clock,
            authorization_url: url.into(),
            cache: TokenCache::new(settings.token_cache_ttl),
        }
    }

    async fn bearer_token(&self, code: &AuthorizationCode) -> Result<BearerToken, Error> {
        let fingerprint = code.fingerprint();
        if let Some(cache) = &self.cache {
            if let Some(token) = cache.get(&fingerprint, self.clock.utc()) {
                debug!(code = %fingerprint, "catalog token cache hit");
                return Ok(token);
            }
        }

        let token = self.tokens.exchange(code).await?;
        debug!(code = %fingerprint, "exchanged authorization code");
        if let Some(cache) = &self.cache {
            cache.put(fingerprint, token.clone(), self.clock.utc());
        }
        Ok(token)
    }
}

#[async_trait]
impl CatalogService for CatalogAccess {
    fn authorization_url(&self) -> String {
        self.authorization_url.clone()
    }

    async fn lookup_show(
        &self,
        code: &AuthorizationCode,
        show_id: &ShowId,
    ) -> Result<ShowRecord, Error> {
        let token = self.bearer_token(code).await?;
        let show = self.source.lookup_show(&token, show_id).await?;
        info!(show_id = %show_id, "catalog show lookup succeeded");
        Ok(show)
    }

    async fn search_episodes(
        &self,
        code: &AuthorizationCode,
        show_id: &ShowId,
        keyword: &Keyword,
        offset: EpisodeOffset,
    ) -> Result<KeywordMatches, Error> {
        let token = self.bearer_token(code).await?;
        let episodes = self.source.list_episodes(&token, show_id, offset).await?;
        let matches = match_keyword(&episodes, keyword);
        debug!(
            show_id = %show_id,
            offset = offset.get(),
            scanned = episodes.len(),
            matched = matches.titles().len(),
            "episode keyword search finished"
        );
        Ok(matches)
    }

    async fn forget(&self, code: &AuthorizationCode) {
        if let Some(cache) = &self.cache {
            cache.remove(&code.fingerprint());
        }
    }
}

#[cfg(test)]
mod tests {
    //! Token caching and catalog error propagation.
    use super::*;
    use crate::domain::ports::{
        CatalogSourceError, MockCatalogSource, MockTokenExchange, TokenExchangeError,
    };
    use crate::domain::{EpisodeSummary, ErrorCode};
    use crate::test_support::MutableClock;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn clock() -> Arc<MutableClock> {
        let start = Utc
            .with_ymd_and_hms(2026, 1, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp");
        Arc::new(MutableClock::new(start))
    }

    fn settings(ttl_secs: u64) -> CatalogAccessSettings {
        CatalogAccessSettings {
            authorize_url: Url::parse("https://accounts.example.com/authorize").expect("url"),
            client_id: "client-1".into(),
            redirect_uri: "http://127.0.0.1:5000/".into(),
            token_cache_ttl: Duration::from_secs(ttl_secs),
        }
    }

    fn code() -> AuthorizationCode {
        AuthorizationCode::new("auth-code").expect("code")
    }

    fn show_id() -> ShowId {
        ShowId::new("show1").expect("show id")
    }

    fn exchange_expecting(times: usize) -> MockTokenExchange {
        let mut tokens = MockTokenExchange::new();
        tokens
            .expect_exchange()
            .times(times)
            .returning(|_| Ok(BearerToken::new("token")));
        tokens
    }

    fn episodes_source() -> MockCatalogSource {
        let mut source = MockCatalogSource::new();
        source.expect_list_episodes().returning(|_, _, _| {
            Ok(vec![
                EpisodeSummary {
                    name: "A".into(),
                    description: "cats".into(),
                },
                EpisodeSummary {
                    name: "B".into(),
                    description: "dogs".into(),
                },
            ])
        });
        source
    }

    #[rstest]
    fn authorization_url_carries_client_and_redirect(clock: Arc<MutableClock>) {
        let access = CatalogAccess::new(
            Arc::new(MockTokenExchange::new()),
            Arc::new(MockCatalogSource::new()),
            clock,
            settings(0),
        );
        let url = Url::parse(&access.authorization_url()).expect("valid url");
        let pairs: HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs.get("response_type").map(String::as_str), Some("code"));
        assert_eq!(pairs.get("client_id").map(String::as_str), Some("client-1"));
        assert_eq!(
            pairs.get("redirect_uri").map(String::as_str),
            Some("http://127.0.0.1:5000/")
        );
    }

    #[rstest]
    #[tokio::test]
    async fn search_returns_matching_titles(clock: Arc<MutableClock>) {
        let access = CatalogAccess::new(
            Arc::new(exchange_expecting(1)),
            Arc::new(episodes_source()),
            clock,
            settings(0),
        );
        let matches = access
            .search_episodes(
                &code(),
                &show_id(),
                &Keyword::new("cat").expect("keyword"),
                EpisodeOffset::default(),
            )
            .await
            .expect("search succeeds");
        assert_eq!(matches.titles(), ["A"]);
    }

    #[rstest]
    #[tokio::test]
    async fn disabled_cache_exchanges_every_call(clock: Arc<MutableClock>) {
        let access = CatalogAccess::new(
            Arc::new(exchange_expecting(2)),
            Arc::new(episodes_source()),
            clock,
            settings(0),
        );
        let keyword = Keyword::new("cat").expect("keyword");
        for _ in 0..2 {
            access
                .search_episodes(&code(), &show_id(), &keyword, EpisodeOffset::default())
                .await
                .expect("search succeeds");
        }
    }

    #[rstest]
    #[tokio::test]
    async fn cached_token_is_reused_until_expiry(clock: Arc<MutableClock>) {
        let access = CatalogAccess::new(
            Arc::new(exchange_expecting(2)),
            Arc::new(episodes_source()),
            clock.clone(),
            settings(300),
        );
        let (code, show_id) = (code(), show_id());
        let keyword = Keyword::new("cat").expect("keyword");
        let search = || access.search_episodes(&code, &show_id, &keyword, EpisodeOffset::default());

        search().await.expect("first search");
        clock.advance_seconds(299);
        search().await.expect("cached search");
        clock.advance_seconds(1);
        search().await.expect("search after expiry");
    }

    #[rstest]
    #[tokio::test]
    async fn forget_drops_cached_token(clock: Arc<MutableClock>) {
        let access = CatalogAccess::new(
            Arc::new(exchange_expecting(2)),
            Arc::new(episodes_source()),
            clock,
            settings(300),
        );
        let keyword = Keyword::new("cat").expect("keyword");
        access
            .search_episodes(&code(), &show_id(), &keyword, EpisodeOffset::default())
            .await
            .expect("first search");
        access.forget(&code()).await;
        access
            .search_episodes(&code(), &show_id(), &keyword, EpisodeOffset::default())
            .await
            .expect("search after forget");
    }

    #[rstest]
    #[tokio::test]
    async fn failed_exchange_skips_catalog(clock: Arc<MutableClock>) {
        let mut tokens = MockTokenExchange::new();
        tokens
            .expect_exchange()
            .returning(|_| Err(TokenExchangeError::rejected("invalid_grant")));
        let mut source = MockCatalogSource::new();
        source.expect_lookup_show().times(0);
        let access = CatalogAccess::new(Arc::new(tokens), Arc::new(source), clock, settings(300));

        let err = access
            .lookup_show(&code(), &show_id())
            .await
            .expect_err("exchange fails");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
        assert_eq!(err.detail_code(), Some("token_exchange_failed"));
    }

    #[rstest]
    #[tokio::test]
    async fn offset_out_of_range_is_distinct_from_no_matches(clock: Arc<MutableClock>) {
        let mut source = MockCatalogSource::new();
        source
            .expect_list_episodes()
            .returning(|_, _, offset| Err(CatalogSourceError::offset_out_of_range(offset.get())));
        let access = CatalogAccess::new(
            Arc::new(exchange_expecting(1)),
            Arc::new(source),
            clock,
            settings(0),
        );

        let err = access
            .search_episodes(
                &code(),
                &show_id(),
                &Keyword::new("cat").expect("keyword"),
                EpisodeOffset::new(5000),
            )
            .await
            .expect_err("offset too high");
        assert_eq!(err.detail_code(), Some("offset_out_of_range"));
        assert_eq!(err.message(), "The offset was too high");
    }
}
