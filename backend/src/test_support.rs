//! Test utilities for the podwatch crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled for tests and for the `test-support` feature.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::ports::{
    CatalogSource, CatalogSourceError, PodcastPersistenceError, PodcastRepository, TokenExchange,
    TokenExchangeError, UserPersistenceError, UserRepository, WatchListPersistenceError,
    WatchListRepository,
};
use crate::domain::{
    AuthorizationCode, BearerToken, EmailAddress, EpisodeOffset, EpisodeSummary, NewPodcast,
    NewUserAccount, PasswordDigest, PlainPassword, Podcast, PodcastId, ShowId, ShowRecord, User,
    UserAccount, UserId, Username, WatchListEntry,
};

#[derive(Default)]
struct StoreState {
    users: Vec<UserAccount>,
    podcasts: Vec<Podcast>,
    last_podcast_id: i32,
    entries: Vec<WatchListEntry>,
    writes: usize,
}

/// In-memory implementation of every repository port.
///
/// Mirrors the PostgreSQL constraints: unique usernames, unique show ids,
/// unique watchlist pairs and cascading podcast deletes.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    fn lock(&self) -> MutexGuard<'_, StoreState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Build a stored account with a freshly hashed password.
    ///
    /// # Panics
    /// Panics when the fixture values are invalid.
    #[must_use]
    pub fn account(username: &str, password: &str, admin: bool) -> UserAccount {
        let user = User::new(
            UserId::random(),
            Username::new(username).unwrap_or_else(|err| panic!("fixture username: {err}")),
            EmailAddress::new(format!("{username}@example.com"))
                .unwrap_or_else(|err| panic!("fixture email: {err}")),
            admin,
        );
        let password_digest = PasswordDigest::hash(&PlainPassword::new(password))
            .unwrap_or_else(|err| panic!("fixture password: {err}"));
        UserAccount {
            user,
            password_digest,
        }
    }

    /// Seed an account directly, bypassing registration.
    pub fn insert_account(&self, account: UserAccount) -> User {
        let user = account.user.clone();
        self.lock().users.push(account);
        user
    }

    /// Seed a podcast directly and return it with its id.
    ///
    /// # Panics
    /// Panics when the fixture values are invalid.
    pub fn insert_podcast(&self, title: &str, show_id: &str) -> Podcast {
        let fresh = NewPodcast::try_from_parts(title, "Host", "About cats", None, show_id)
            .unwrap_or_else(|err| panic!("fixture podcast: {err}"));
        let mut state = self.lock();
        state.last_podcast_id += 1;
        let id = PodcastId::new(state.last_podcast_id)
            .unwrap_or_else(|err| panic!("fixture podcast id: {err}"));
        let podcast = fresh.into_podcast(id);
        state.podcasts.push(podcast.clone());
        podcast
    }

    /// Number of successful mutations so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    /// Number of watchlist entries across all users.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.lock().entries.len()
    }

    /// Number of stored podcasts.
    #[must_use]
    pub fn podcast_count(&self) -> usize {
        self.lock().podcasts.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, account: &NewUserAccount) -> Result<User, UserPersistenceError> {
        let mut state = self.lock();
        if state
            .users
            .iter()
            .any(|stored| stored.user.username() == &account.username)
        {
            return Err(UserPersistenceError::duplicate_username(
                account.username.as_ref(),
            ));
        }
        let user = User::new(
            UserId::random(),
            account.username.clone(),
            account.email.clone(),
            false,
        );
        state.users.push(UserAccount {
            user: user.clone(),
            password_digest: account.password_digest.clone(),
        });
        state.writes += 1;
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|stored| stored.user.id() == id)
            .map(|stored| stored.user.clone()))
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|stored| stored.user.username().as_ref() == username)
            .cloned())
    }
}

#[async_trait]
impl PodcastRepository for InMemoryStore {
    async fn add(&self, podcast: &NewPodcast) -> Result<Podcast, PodcastPersistenceError> {
        let mut state = self.lock();
        if state
            .podcasts
            .iter()
            .any(|stored| stored.show_id() == podcast.show_id())
        {
            return Err(PodcastPersistenceError::duplicate_show(
                podcast.show_id().as_ref(),
            ));
        }
        let id = PodcastId::new(state.last_podcast_id + 1)
            .map_err(|err| PodcastPersistenceError::query(err.to_string()))?;
        state.last_podcast_id = id.get();
        let stored = podcast.clone().into_podcast(id);
        state.podcasts.push(stored.clone());
        state.writes += 1;
        Ok(stored)
    }

    async fn find_by_id(&self, id: PodcastId) -> Result<Option<Podcast>, PodcastPersistenceError> {
        Ok(self
            .lock()
            .podcasts
            .iter()
            .find(|stored| stored.id() == id)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[PodcastId]) -> Result<Vec<Podcast>, PodcastPersistenceError> {
        Ok(self
            .lock()
            .podcasts
            .iter()
            .filter(|stored| ids.contains(&stored.id()))
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Podcast>, PodcastPersistenceError> {
        Ok(self.lock().podcasts.clone())
    }

    async fn delete(&self, id: PodcastId) -> Result<bool, PodcastPersistenceError> {
        let mut state = self.lock();
        let before = state.podcasts.len();
        state.podcasts.retain(|stored| stored.id() != id);
        if state.podcasts.len() == before {
            return Ok(false);
        }
        state.entries.retain(|entry| entry.podcast_id != id);
        state.writes += 1;
        Ok(true)
    }
}

#[async_trait]
impl WatchListRepository for InMemoryStore {
    async fn add(&self, entry: &WatchListEntry) -> Result<(), WatchListPersistenceError> {
        let mut state = self.lock();
        let podcast_id = entry.podcast_id.get();
        if !state
            .podcasts
            .iter()
            .any(|stored| stored.id() == entry.podcast_id)
        {
            return Err(WatchListPersistenceError::podcast_not_found(podcast_id));
        }
        if state.entries.contains(entry) {
            return Err(WatchListPersistenceError::duplicate(podcast_id));
        }
        state.entries.push(entry.clone());
        state.writes += 1;
        Ok(())
    }

    async fn remove(&self, entry: &WatchListEntry) -> Result<(), WatchListPersistenceError> {
        let mut state = self.lock();
        let before = state.entries.len();
        state.entries.retain(|stored| stored != entry);
        if state.entries.len() != before {
            state.writes += 1;
        }
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<WatchListEntry>, WatchListPersistenceError> {
        Ok(self
            .lock()
            .entries
            .iter()
            .filter(|entry| &entry.user_id == user_id)
            .cloned()
            .collect())
    }
}

/// Clock whose time only moves when a test advances it.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Clock frozen at `now`.
    #[must_use]
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Move time forward by `seconds`.
    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Token endpoint double that echoes the code back as the token.
#[derive(Default)]
pub struct StubTokenExchange {
    calls: AtomicUsize,
    failure: Mutex<Option<TokenExchangeError>>,
}

impl StubTokenExchange {
    /// Fail every later exchange with `error`.
    pub fn fail_with(&self, error: TokenExchangeError) {
        *lock_or_recover(&self.failure) = Some(error);
    }

    /// Exchanges attempted so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenExchange for StubTokenExchange {
    async fn exchange(&self, code: &AuthorizationCode) -> Result<BearerToken, TokenExchangeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = lock_or_recover(&self.failure).clone() {
            return Err(error);
        }
        Ok(BearerToken::new(format!("token-{}", code.expose())))
    }
}

/// Catalog double serving shows and single episode pages from memory.
///
/// Offsets past the configured page fail with `OffsetOutOfRange`, matching
/// the provider's empty-body answer.
#[derive(Default)]
pub struct StubCatalogSource {
    shows: Mutex<HashMap<String, ShowRecord>>,
    episodes: Mutex<HashMap<String, Vec<EpisodeSummary>>>,
}

impl StubCatalogSource {
    /// Register a show and its first page of episodes.
    ///
    /// # Panics
    /// Panics when `show_id` is not a valid catalog id.
    #[must_use]
    pub fn with_show(self, show_id: &str, name: &str, episodes: &[(&str, &str)]) -> Self {
        let id = ShowId::new(show_id).unwrap_or_else(|err| panic!("fixture show id: {err}"));
        lock_or_recover(&self.shows).insert(
            show_id.to_owned(),
            ShowRecord {
                name: name.to_owned(),
                description: format!("All about {name}"),
                publisher: "Fixture Radio".to_owned(),
                image_url: None,
                id,
            },
        );
        lock_or_recover(&self.episodes).insert(
            show_id.to_owned(),
            episodes
                .iter()
                .map(|(name, description)| EpisodeSummary {
                    name: (*name).to_owned(),
                    description: (*description).to_owned(),
                })
                .collect(),
        );
        self
    }
}

#[async_trait]
impl CatalogSource for StubCatalogSource {
    async fn lookup_show(
        &self,
        _token: &BearerToken,
        show_id: &ShowId,
    ) -> Result<ShowRecord, CatalogSourceError> {
        lock_or_recover(&self.shows)
            .get(show_id.as_ref())
            .cloned()
            .ok_or_else(|| CatalogSourceError::not_found(show_id.as_ref()))
    }

    async fn list_episodes(
        &self,
        _token: &BearerToken,
        show_id: &ShowId,
        offset: EpisodeOffset,
    ) -> Result<Vec<EpisodeSummary>, CatalogSourceError> {
        let episodes = lock_or_recover(&self.episodes);
        let page = episodes
            .get(show_id.as_ref())
            .ok_or_else(|| CatalogSourceError::not_found(show_id.as_ref()))?;
        let start = usize::try_from(offset.get()).unwrap_or(usize::MAX);
        if start > 0 && start >= page.len() {
            return Err(CatalogSourceError::offset_out_of_range(offset.get()));
        }
        Ok(page.iter().skip(start).cloned().collect())
    }
}

fn lock_or_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
