//! Film metadata from the embedded JSON-LD document on a film's main page.

use lboxd_core::Error;
use scraper::Html;
use serde::{Deserialize, Deserializer};

use super::{selector, selectors};

const CDATA_OPEN: &str = "/* <![CDATA[ */";
const CDATA_CLOSE: &str = "/* ]]> */";

/// The publication event among a film's release events.
const PUBLICATION_EVENT: &str = "PublicationEvent";

/// Fields read from the film's structured data.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkedData {
    pub title: String,
    pub directors: Vec<String>,
    pub genres: Vec<String>,
    pub countries: Vec<String>,
    pub release_year: String,
    pub average_rating: f64,
    pub rating_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFilm {
    name: String,
    #[serde(deserialize_with = "one_or_many")]
    director: Vec<Named>,
    #[serde(deserialize_with = "one_or_many")]
    genre: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    country_of_origin: Vec<Named>,
    #[serde(deserialize_with = "one_or_many")]
    released_event: Vec<ReleaseEvent>,
    aggregate_rating: AggregateRating,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReleaseEvent {
    #[serde(rename = "@type")]
    kind: String,
    #[serde(default)]
    start_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AggregateRating {
    rating_value: f64,
    rating_count: u64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

/// JSON-LD writes single-valued lists as a bare value.
fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::Many(items) => items,
        OneOrMany::One(item) => vec![item],
    })
}

/// Remove the CDATA comment markers the site wraps around its JSON-LD.
pub fn strip_cdata(script: &str) -> &str {
    let script = script.trim();
    let script = script.strip_prefix(CDATA_OPEN).unwrap_or(script);
    script.strip_suffix(CDATA_CLOSE).unwrap_or(script).trim()
}

/// Decode the film's structured data.
///
/// Fails with [`Error::MalformedMetadata`] when the script element is absent,
/// is not valid JSON, or lacks any field the metadata needs.
pub fn extract_linked_data(html: &str) -> Result<LinkedData, Error> {
    let document = Html::parse_document(html);
    let script = document
        .select(&selector(selectors::LINKED_DATA))
        .next()
        .ok_or_else(|| Error::MalformedMetadata("no application/ld+json script on page".into()))?;

    let text = script.text().collect::<String>();
    let raw: RawFilm = serde_json::from_str(strip_cdata(&text))
        .map_err(|e| Error::MalformedMetadata(format!("structured data: {e}")))?;

    let start_date = raw
        .released_event
        .iter()
        .find(|event| event.kind == PUBLICATION_EVENT)
        .and_then(|event| event.start_date.as_deref())
        .ok_or_else(|| Error::MalformedMetadata("no PublicationEvent with a startDate in releasedEvent".into()))?;

    let release_year = start_date
        .get(..4)
        .filter(|year| year.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(|| Error::MalformedMetadata(format!("startDate '{start_date}' has no 4-digit year")))?
        .to_string();

    let average_rating = raw.aggregate_rating.rating_value;
    if !(average_rating > 0.0 && average_rating <= 5.0) {
        return Err(Error::MalformedMetadata(format!("ratingValue {average_rating} outside (0, 5]")));
    }

    Ok(LinkedData {
        title: raw.name,
        directors: raw.director.into_iter().map(|d| d.name).collect(),
        genres: raw.genre,
        countries: raw.country_of_origin.into_iter().map(|c| c.name).collect(),
        release_year,
        average_rating,
        rating_count: raw.aggregate_rating.rating_count,
    })
}
