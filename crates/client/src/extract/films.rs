//! Film references and user ratings from poster grids.

use lboxd_core::{Error, FilmReference, Rating};
use scraper::{ElementRef, Html};
use url::Url;

use super::{require_attr, resolve, selector, selectors};

/// Extract every poster container on a films page, in document order.
///
/// The film URL comes from the `data-target-link` attribute; the rating, when
/// present, from a `rated-N` class on the nested rating marker.
pub fn extract_films(html: &str, page: &Url) -> Result<Vec<FilmReference>, Error> {
    let document = Html::parse_document(html);
    let containers = selector(selectors::POSTER_CONTAINER);
    let target = selector(selectors::FILM_TARGET);
    let marker = selector(selectors::RATING);

    document
        .select(&containers)
        .map(|container| {
            let poster = container
                .select(&target)
                .next()
                .ok_or_else(|| Error::SelectorMiss(format!("poster container without film link on {page}")))?;
            let film_url = resolve(page, require_attr(poster, "data-target-link", "film poster")?)?;

            let rating = container.select(&marker).next().map(rating_from_marker).transpose()?;

            Ok(FilmReference { film_url, rating })
        })
        .collect()
}

fn rating_from_marker(marker: ElementRef<'_>) -> Result<Rating, Error> {
    marker
        .value()
        .classes()
        .find_map(Rating::from_class_token)
        .unwrap_or_else(|| Err(Error::InvalidRating("rating marker without a rated-N class".into())))
}
