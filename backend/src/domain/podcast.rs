//! Stored podcast records and their identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors returned by podcast constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PodcastValidationError {
    /// The id was not a positive integer.
    #[error("invalid id")]
    InvalidId,
    /// The show id was blank.
    #[error("show id must not be empty")]
    EmptyShowId,
    /// The show id contained non-alphanumeric characters.
    #[error("show id may only contain ASCII letters and digits")]
    InvalidShowId,
    /// The title was blank after trimming.
    #[error("podcast title must not be empty")]
    EmptyTitle,
    /// The host was blank after trimming.
    #[error("podcast host must not be empty")]
    EmptyHost,
}

/// Database identifier of a stored podcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PodcastId(i32);

impl PodcastId {
    /// Wrap a positive database identifier.
    ///
    /// # Errors
    /// [`PodcastValidationError::InvalidId`] for zero or negative values.
    pub const fn new(id: i32) -> Result<Self, PodcastValidationError> {
        if id <= 0 {
            return Err(PodcastValidationError::InvalidId);
        }
        Ok(Self(id))
    }

    /// Parse an identifier taken from a URL path segment.
    ///
    /// # Errors
    /// [`PodcastValidationError::InvalidId`] when the segment is not a
    /// positive integer.
    pub fn parse(raw: &str) -> Result<Self, PodcastValidationError> {
        raw.trim()
            .parse::<i32>()
            .map_err(|_| PodcastValidationError::InvalidId)
            .and_then(Self::new)
    }

    /// Raw integer value.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for PodcastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// External catalog identifier of a show.
///
/// Catalog ids are base-62 strings, so only ASCII alphanumerics are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShowId(String);

impl ShowId {
    /// Validate and construct a [`ShowId`].
    ///
    /// # Errors
    /// [`PodcastValidationError`] when blank or not alphanumeric.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, PodcastValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(PodcastValidationError::EmptyShowId);
        }
        if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(PodcastValidationError::InvalidShowId);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ShowId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ShowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ShowId> for String {
    fn from(value: ShowId) -> Self {
        value.0
    }
}

impl TryFrom<String> for ShowId {
    type Error = PodcastValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Podcast fields an admin submits after a catalog lookup.
///
/// ## Invariants
/// - `title` and `host` are trimmed and non-empty.
/// - `description` may be empty.
/// - `image_url` is `None` when blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPodcast {
    title: String,
    host: String,
    description: String,
    image_url: Option<String>,
    show_id: ShowId,
}

impl NewPodcast {
    /// Validate raw form fields.
    ///
    /// # Errors
    /// [`PodcastValidationError`] for a blank title or host, or a malformed
    /// show id.
    pub fn try_from_parts(
        title: &str,
        host: &str,
        description: &str,
        image_url: Option<&str>,
        show_id: &str,
    ) -> Result<Self, PodcastValidationError> {
        let trimmed_title = title.trim();
        if trimmed_title.is_empty() {
            return Err(PodcastValidationError::EmptyTitle);
        }
        let trimmed_host = host.trim();
        if trimmed_host.is_empty() {
            return Err(PodcastValidationError::EmptyHost);
        }
        Ok(Self {
            title: trimmed_title.to_owned(),
            host: trimmed_host.to_owned(),
            description: description.to_owned(),
            image_url: image_url
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_owned),
            show_id: ShowId::new(show_id)?,
        })
    }

    /// Display title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Publisher or presenter.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Free-text description, possibly empty.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Cover art URL, if any.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Catalog identifier of the show.
    #[must_use]
    pub const fn show_id(&self) -> &ShowId {
        &self.show_id
    }

    /// Attach the identifier assigned by storage.
    #[must_use]
    pub fn into_podcast(self, id: PodcastId) -> Podcast {
        Podcast {
            id,
            title: self.title,
            host: self.host,
            description: self.description,
            image_url: self.image_url,
            show_id: self.show_id,
        }
    }
}

/// Podcast stored in the local library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Podcast {
    id: PodcastId,
    title: String,
    host: String,
    description: String,
    image_url: Option<String>,
    show_id: ShowId,
}

impl Podcast {
    /// Library identifier.
    #[must_use]
    pub const fn id(&self) -> PodcastId {
        self.id
    }

    /// Display title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Publisher or presenter.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Free-text description, possibly empty.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Cover art URL, if any.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Catalog identifier used for episode lookups.
    #[must_use]
    pub const fn show_id(&self) -> &ShowId {
        &self.show_id
    }
}
