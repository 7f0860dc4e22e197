//! Review bodies from a user's reviews pages or a film's popular reviews.

use lboxd_core::{Error, Review};
use scraper::Html;
use url::Url;

use super::{element_text, selector, selectors};

/// Extract every review body on the page, whitespace-normalized, in document order.
///
/// A page without reviews yields an empty list. The page URL only appears in logs.
pub fn extract_reviews(html: &str, page: &Url) -> Result<Vec<Review>, Error> {
    let document = Html::parse_document(html);
    let bodies = selector(selectors::REVIEW_BODY);

    let reviews: Vec<Review> = document
        .select(&bodies)
        .map(|body| Review::new(&element_text(body)))
        .collect();

    tracing::trace!(url = %page, count = reviews.len(), "extracted reviews");

    Ok(reviews)
}
