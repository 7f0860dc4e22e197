//! Letterboxd scraping engine.
//!
//! This crate provides the page fetch pipeline, record extraction, pagination
//! and the per-user and per-film queries built on them.

pub mod aggregate;
pub mod extract;
pub mod fetch;
pub mod paginate;

#[cfg(test)]
mod testing;

pub use aggregate::Letterboxd;

pub use extract::{
    LinkedData, extract_description, extract_films, extract_languages, extract_linked_data, extract_list_entries,
    extract_lists, extract_people, extract_reviews,
};

pub use fetch::{FetchClient, FetchConfig, FetchResponse, PageFetcher, RetryPolicy, canonicalize};
