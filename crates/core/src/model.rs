//! Record types produced by page extraction.
//!
//! Every value here is an immutable snapshot built from one fetch. Nothing is
//! mutated after construction apart from [`FilmLog`] while a query folds pages.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use url::Url;

use crate::Error;

/// Collapse every run of whitespace to a single space and trim both ends.
///
/// Idempotent: normalizing an already-normalized string returns it unchanged.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A user rating stored as a count of half stars (1..=10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rating(u8);

impl Rating {
    const CLASS_PREFIX: &'static str = "rated-";

    /// Build a rating from a half-star count on the site's 10-step scale.
    pub fn from_half_stars(half_stars: u8) -> Result<Self, Error> {
        if (1..=10).contains(&half_stars) {
            Ok(Self(half_stars))
        } else {
            Err(Error::InvalidRating(format!("{half_stars} is outside 1..=10")))
        }
    }

    /// Parse a `rated-N` class token. Returns `None` for tokens of any other shape.
    pub fn from_class_token(token: &str) -> Option<Result<Self, Error>> {
        let n = token.strip_prefix(Self::CLASS_PREFIX)?;
        Some(
            n.parse::<u8>()
                .map_err(|_| Error::InvalidRating(format!("unparseable class token '{token}'")))
                .and_then(Self::from_half_stars),
        )
    }

    pub fn half_stars(self) -> u8 {
        self.0
    }

    /// Rating on the 5-star scale, in steps of 0.5.
    pub fn stars(self) -> f32 {
        f32::from(self.0) / 2.0
    }
}

impl Serialize for Rating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f32(self.stars())
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let stars = f32::deserialize(deserializer)?;
        let half = (stars * 2.0).round();
        if !(1.0..=10.0).contains(&half) || (half / 2.0 - stars).abs() > f32::EPSILON {
            return Err(serde::de::Error::custom(format!("{stars} is not a half-star rating in 0.5..=5")));
        }
        Ok(Self(half as u8))
    }
}

/// A film seen on a user's films page, with the user's rating if they gave one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmReference {
    pub film_url: Url,
    /// `None` means unrated, never zero.
    pub rating: Option<Rating>,
}

/// Watched films keyed by film URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilmLog(BTreeMap<String, FilmReference>);

impl FilmLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a film, replacing any earlier entry for the same URL.
    ///
    /// A replaced entry means the site listed one film twice; it is logged and
    /// the later entry wins.
    pub fn insert(&mut self, film: FilmReference) -> Option<FilmReference> {
        let previous = self.0.insert(film.film_url.to_string(), film);
        if let Some(prev) = &previous {
            tracing::warn!(film_url = %prev.film_url, "film listed more than once; keeping last entry");
        }
        previous
    }

    pub fn get(&self, film_url: &str) -> Option<&FilmReference> {
        self.0.get(film_url)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilmReference> {
        self.0.values()
    }
}

impl Extend<FilmReference> for FilmLog {
    fn extend<T: IntoIterator<Item = FilmReference>>(&mut self, iter: T) {
        for film in iter {
            self.insert(film);
        }
    }
}

/// Review text with whitespace already normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Review(String);

impl Review {
    pub fn new(raw: &str) -> Self {
        Self(normalize_whitespace(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Review {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListReference {
    pub list_url: Url,
}

/// A profile link from a followers or following page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonReference {
    pub profile_url: Url,
}

/// Everything known about one film, gathered from its main, details and reviews pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmMetadata {
    pub url: Url,
    pub title: String,
    pub directors: Vec<String>,
    pub genres: Vec<String>,
    pub countries: Vec<String>,
    /// Four-digit year of the publication event.
    pub release_year: String,
    pub languages: BTreeSet<String>,
    /// Average on the 5-star scale, in (0, 5].
    pub average_rating: f64,
    pub rating_count: u64,
    pub description: String,
    /// First page of the most-active reviews only.
    pub top_reviews: Vec<Review>,
}

/// Films that belong to one curated list, in list order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilmListEntries {
    pub list_url: Url,
    pub films: Vec<Url>,
}

/// Result of running every per-user query for one username.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub profile_url: Url,
    pub films: FilmLog,
    pub reviews: Vec<Review>,
    pub lists: Vec<ListReference>,
    pub followers: Vec<PersonReference>,
    pub following: Vec<PersonReference>,
    pub fetched_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn film(url: &str, half_stars: Option<u8>) -> FilmReference {
        FilmReference {
            film_url: Url::parse(url).unwrap(),
            rating: half_stars.map(|n| Rating::from_half_stars(n).unwrap()),
        }
    }

    #[test]
    fn test_rating_from_class_token() {
        assert_eq!(Rating::from_class_token("rated-7").unwrap().unwrap().stars(), 3.5);
        assert_eq!(Rating::from_class_token("rated-10").unwrap().unwrap().stars(), 5.0);
        assert_eq!(Rating::from_class_token("rated-1").unwrap().unwrap().stars(), 0.5);
    }

    #[test]
    fn test_rating_ignores_other_tokens() {
        assert!(Rating::from_class_token("rating").is_none());
        assert!(Rating::from_class_token("-tiny").is_none());
    }

    #[test]
    fn test_rating_rejects_out_of_range() {
        assert!(matches!(Rating::from_class_token("rated-0"), Some(Err(Error::InvalidRating(_)))));
        assert!(matches!(Rating::from_class_token("rated-11"), Some(Err(Error::InvalidRating(_)))));
        assert!(matches!(Rating::from_class_token("rated-x"), Some(Err(Error::InvalidRating(_)))));
    }

    #[test]
    fn test_rating_serializes_as_stars() {
        let rating = Rating::from_half_stars(7).unwrap();
        assert_eq!(serde_json::to_string(&rating).unwrap(), "3.5");
        let back: Rating = serde_json::from_str("3.5").unwrap();
        assert_eq!(back, rating);
        assert!(serde_json::from_str::<Rating>("3.3").is_err());
        assert!(serde_json::from_str::<Rating>("0").is_err());
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a \n\t b   c "), "a b c");
        assert_eq!(normalize_whitespace(""), "");
    }

    #[test]
    fn test_normalize_whitespace_idempotent() {
        let once = normalize_whitespace("\n  Loved   it.\n\n Would  watch again. ");
        assert_eq!(normalize_whitespace(&once), once);
    }

    #[test]
    fn test_review_is_normalized() {
        let review = Review::new("  great\n\n film ");
        assert_eq!(review.as_str(), "great film");
        assert_eq!(serde_json::to_string(&review).unwrap(), "\"great film\"");
    }

    #[test]
    fn test_film_log_last_seen_wins() {
        let mut log = FilmLog::new();
        assert!(log.insert(film("https://letterboxd.com/film/heat-1995/", Some(8))).is_none());
        let previous = log.insert(film("https://letterboxd.com/film/heat-1995/", None));

        assert_eq!(previous.unwrap().rating.unwrap().half_stars(), 8);
        assert_eq!(log.len(), 1);
        assert!(log.get("https://letterboxd.com/film/heat-1995/").unwrap().rating.is_none());
    }

    #[test]
    fn test_film_log_serializes_as_map() {
        let mut log = FilmLog::new();
        log.extend([film("https://letterboxd.com/film/heat-1995/", Some(9))]);
        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json["https://letterboxd.com/film/heat-1995/"]["rating"], 4.5);
    }
}
