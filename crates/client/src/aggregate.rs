//! Per-user and per-film queries.
//!
//! ### Queries
//! - Films, reviews and lists walk numbered pages; followers and following walk
//!   "next" links.
//! - A film is assembled from its main page, its details page and the first page
//!   of its most-active reviews.
//!
//! ### Failure
//! - Any page failure fails the whole query. There are no partial results.
//! - Every query runs under one overall deadline.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use lboxd_core::{
    AppConfig, Error, FilmListEntries, FilmLog, FilmMetadata, ListReference, PersonReference, Review, UserProfile,
};
use tracing::info;
use url::Url;

use crate::extract::{
    extract_description, extract_films, extract_languages, extract_linked_data, extract_list_entries, extract_lists,
    extract_people, extract_reviews, resolve,
};
use crate::fetch::{FetchClient, FetchConfig, PageFetcher, canonicalize, same_site};
use crate::paginate::{walk_linked, walk_numbered};

/// Scraper for one site, bound to a page fetcher.
pub struct Letterboxd<F> {
    fetcher: F,
    base_url: Url,
    max_pages: usize,
    deadline: Duration,
}

impl Letterboxd<FetchClient> {
    /// Build a network-backed scraper from application config.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let fetcher = FetchClient::new(FetchConfig::from(config))?;
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| Error::InvalidUrl(format!("base url '{}': {e}", config.base_url)))?;

        Ok(Self::new(fetcher, base_url)?.with_max_pages(config.max_pages).with_deadline(config.deadline()))
    }
}

impl<F: PageFetcher> Letterboxd<F> {
    /// `base_url` must end with `/` so profile paths join beneath it.
    pub fn new(fetcher: F, base_url: Url) -> Result<Self, Error> {
        if !base_url.path().ends_with('/') {
            return Err(Error::InvalidUrl(format!("base url '{base_url}' must end with '/'")));
        }
        let defaults = AppConfig::default();
        Ok(Self { fetcher, base_url, max_pages: defaults.max_pages, deadline: defaults.deadline() })
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Profile root for `username`.
    ///
    /// Usernames are ASCII letters, digits and underscores. Anything else is
    /// rejected before a request is sent.
    pub fn user_url(&self, username: &str) -> Result<Url, Error> {
        if username.is_empty() || !username.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
            return Err(Error::InvalidInput(format!("invalid username '{username}'")));
        }
        resolve(&self.base_url, &format!("{username}/"))
    }

    fn user_resource(&self, username: &str, path: &str) -> Result<Url, Error> {
        resolve(&self.user_url(username)?, path)
    }

    /// Canonicalize a caller-supplied page URL and require it to be on this site.
    fn site_url(&self, input: &str) -> Result<Url, Error> {
        let url = canonicalize(input)?;
        if !same_site(&self.base_url, &url) {
            return Err(Error::InvalidUrl(format!("{url} is not on {}", self.base_url)));
        }
        Ok(url)
    }

    /// Every film the user has logged, keyed by film URL, with their rating.
    pub async fn films(&self, username: &str) -> Result<FilmLog, Error> {
        let root = self.user_resource(username, "films/")?;
        let films = self.bounded(walk_numbered(&self.fetcher, &root, self.max_pages, extract_films)).await?;

        let mut log = FilmLog::new();
        log.extend(films);
        info!(username, films = log.len(), "collected films");
        Ok(log)
    }

    /// Review texts across all of the user's review pages, in page order.
    pub async fn reviews(&self, username: &str) -> Result<Vec<Review>, Error> {
        let root = self.user_resource(username, "films/reviews/")?;
        let reviews = self.bounded(walk_numbered(&self.fetcher, &root, self.max_pages, extract_reviews)).await?;
        info!(username, reviews = reviews.len(), "collected reviews");
        Ok(reviews)
    }

    pub async fn lists(&self, username: &str) -> Result<Vec<ListReference>, Error> {
        let root = self.user_resource(username, "lists/")?;
        let lists = self.bounded(walk_numbered(&self.fetcher, &root, self.max_pages, extract_lists)).await?;
        info!(username, lists = lists.len(), "collected lists");
        Ok(lists)
    }

    pub async fn followers(&self, username: &str) -> Result<Vec<PersonReference>, Error> {
        let root = self.user_resource(username, "followers/")?;
        let people = self.bounded(walk_linked(&self.fetcher, &root, self.max_pages, extract_people)).await?;
        info!(username, followers = people.len(), "collected followers");
        Ok(people)
    }

    pub async fn following(&self, username: &str) -> Result<Vec<PersonReference>, Error> {
        let root = self.user_resource(username, "following/")?;
        let people = self.bounded(walk_linked(&self.fetcher, &root, self.max_pages, extract_people)).await?;
        info!(username, following = people.len(), "collected following");
        Ok(people)
    }

    /// Run every per-user query, one after another.
    ///
    /// Each query gets its own deadline.
    pub async fn profile(&self, username: &str) -> Result<UserProfile, Error> {
        let profile_url = self.user_url(username)?;
        let films = self.films(username).await?;
        let reviews = self.reviews(username).await?;
        let lists = self.lists(username).await?;
        let followers = self.followers(username).await?;
        let following = self.following(username).await?;

        Ok(UserProfile {
            username: username.to_string(),
            profile_url,
            films,
            reviews,
            lists,
            followers,
            following,
            fetched_at: Utc::now(),
        })
    }

    /// Metadata, languages, synopsis and top reviews of one film.
    pub async fn film(&self, film_url: &str) -> Result<FilmMetadata, Error> {
        let url = self.site_url(film_url)?;
        let film = self.bounded(self.collect_film(url)).await?;
        info!(film = %film.url, title = %film.title, languages = film.languages.len(), "collected film");
        Ok(film)
    }

    async fn collect_film(&self, url: Url) -> Result<FilmMetadata, Error> {
        let main = self.fetcher.fetch(&url).await?;
        let data = extract_linked_data(&main)?;
        let description = extract_description(&main)?;

        let details_url = resolve(&url, "details/")?;
        let languages = extract_languages(&self.fetcher.fetch(&details_url).await?)?;

        let reviews_url = resolve(&url, "reviews/by/activity/")?;
        let top_reviews = extract_reviews(&self.fetcher.fetch(&reviews_url).await?, &reviews_url)?;

        Ok(FilmMetadata {
            url,
            title: data.title,
            directors: data.directors,
            genres: data.genres,
            countries: data.countries,
            release_year: data.release_year,
            languages,
            average_rating: data.average_rating,
            rating_count: data.rating_count,
            description,
            top_reviews,
        })
    }

    /// Films of a curated list, across all of its pages.
    pub async fn list(&self, list_url: &str) -> Result<FilmListEntries, Error> {
        let list_url = self.site_url(list_url)?;
        let films = self.bounded(walk_numbered(&self.fetcher, &list_url, self.max_pages, extract_list_entries)).await?;
        info!(list = %list_url, films = films.len(), "collected list");
        Ok(FilmListEntries { list_url, films })
    }

    async fn bounded<T>(&self, query: impl Future<Output = Result<T, Error>>) -> Result<T, Error> {
        tokio::time::timeout(self.deadline, query)
            .await
            .map_err(|_| Error::DeadlineExceeded(self.deadline.as_millis() as u64))?
    }
}
