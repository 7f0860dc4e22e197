//! Record extraction from site markup.
//!
//! Every extractor is a pure function of one page's HTML and the URL it was
//! fetched from. Documents are parsed with `scraper` inside the call and never
//! escape it.
//!
//! ### Site Contract
//! - Selectors, attribute names and class tokens below must match the live
//!   markup exactly. A change on the site surfaces as [`Error::SelectorMiss`]
//!   or [`Error::MalformedMetadata`], never as silently empty fields.
//!
//! ### Attribute Access
//! - [`attr`] for optional attributes, [`require_attr`] where absence is fatal.
//! - Relative hrefs are resolved against the page URL with [`resolve`].

pub mod details;
pub mod films;
pub mod links;
pub mod metadata;
pub mod reviews;

pub use details::{extract_description, extract_languages};
pub use films::extract_films;
pub use links::{extract_list_entries, extract_lists, extract_people};
pub use metadata::{LinkedData, extract_linked_data};
pub use reviews::extract_reviews;

use lboxd_core::{Error, normalize_whitespace};
use scraper::{ElementRef, Selector};
use url::Url;

/// CSS selectors the extractors depend on.
pub mod selectors {
    pub const POSTER_CONTAINER: &str = "li.poster-container";
    pub const FILM_TARGET: &str = "[data-target-link]";
    pub const RATING: &str = "span.rating";
    pub const REVIEW_BODY: &str = "div.body-text.-prose.collapsible-text";
    pub const LIST_LINK: &str = "a.list-link";
    pub const PERSON_SUMMARY: &str = "div.person-summary";
    pub const PERSON_NAME: &str = "a.name";
    pub const LIST_ENTRY: &str = ".list-number + a";
    pub const PAGE_NUMBERS: &str = ".paginate-pages a";
    pub const NEXT_PAGE: &str = "a.next";
    pub const LINKED_DATA: &str = r#"script[type="application/ld+json"]"#;
    pub const DETAILS_TAB: &str = "#tab-details";
    pub const LANGUAGE_LINK: &str = r#"a[href^="/films/language/"]"#;
    pub const DESCRIPTION: &str = "div.truncate > p";
}

/// Parse one of the constant selectors above.
pub(crate) fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("invalid selector")
}

/// Optional attribute lookup; absence is a normal outcome.
pub fn attr<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name)
}

/// Attribute lookup where absence means the page no longer matches the site contract.
pub fn require_attr<'a>(element: ElementRef<'a>, name: &str, context: &str) -> Result<&'a str, Error> {
    attr(element, name).ok_or_else(|| Error::SelectorMiss(format!("{context}: missing '{name}' attribute")))
}

/// Resolve an href against the page it was found on.
pub fn resolve(page: &Url, href: &str) -> Result<Url, Error> {
    page.join(href.trim())
        .map_err(|e| Error::InvalidUrl(format!("cannot resolve '{href}' against {page}: {e}")))
}

/// Element text with fragments joined by single spaces, then normalized.
pub fn element_text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}
