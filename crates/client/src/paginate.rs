//! Page discovery for paginated resources.
//!
//! ### Numbered Pagination (films, reviews, lists)
//! - The highest page number shown in `.paginate-pages` is the page count N.
//! - Pages are `base/page/1/` through `base/page/N/`; `page/1/` aliases the base page.
//! - No page-number links means a single page: `[base]`.
//!
//! ### Linked Pagination (followers, following)
//! - Each page carries an `a.next` link to the following page, or none on the last.
//! - Walks are capped and refuse to revisit a page.

use std::collections::HashSet;

use lboxd_core::{Error, normalize_whitespace};
use scraper::Html;
use url::Url;

use crate::extract::{require_attr, resolve, selector, selectors};
use crate::fetch::{PageFetcher, same_site};

/// URL of page `number` beneath a resource root ending in `/`.
pub fn page_url(base: &Url, number: usize) -> Result<Url, Error> {
    resolve(base, &format!("page/{number}/"))
}

/// Page URLs for a numbered resource, given the markup of its base page.
pub fn numbered_pages(html: &str, base: &Url) -> Result<Vec<Url>, Error> {
    let document = Html::parse_document(html);
    let Some(last) = document.select(&selector(selectors::PAGE_NUMBERS)).last() else {
        return Ok(vec![base.clone()]);
    };

    let label = normalize_whitespace(&last.text().collect::<String>());
    let count = label
        .parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| Error::PaginationParse(format!("last page link '{label}' on {base} is not a page number")))?;

    (1..=count).map(|number| page_url(base, number)).collect()
}

/// The page after `current`, if the markup links to one.
///
/// A next link that leaves the site of `current` is a [`Error::SelectorMiss`].
pub fn next_page(html: &str, current: &Url) -> Result<Option<Url>, Error> {
    let document = Html::parse_document(html);
    let Some(anchor) = document.select(&selector(selectors::NEXT_PAGE)).next() else {
        return Ok(None);
    };

    let next = resolve(current, require_attr(anchor, "href", "next page link")?)?;
    if !same_site(current, &next) {
        return Err(Error::SelectorMiss(format!("next page link on {current} leaves the site: {next}")));
    }
    Ok(Some(next))
}

/// Fetch a numbered resource's base page and list every page URL.
pub async fn resolve_numbered_pages<F>(fetcher: &F, base: &Url) -> Result<Vec<Url>, Error>
where
    F: PageFetcher + ?Sized,
{
    let html = fetcher.fetch(base).await?;
    numbered_pages(&html, base)
}

/// Fetch `current` and return the next page's URL, or `None` on the last page.
pub async fn resolve_next_page<F>(fetcher: &F, current: &Url) -> Result<Option<Url>, Error>
where
    F: PageFetcher + ?Sized,
{
    let html = fetcher.fetch(current).await?;
    next_page(&html, current)
}

/// Visit every page of a numbered resource in order and concatenate what `extract` finds.
///
/// A single-page resource is fetched once. With N pages the base page is fetched
/// for the count and `page/1/` again for its records.
pub async fn walk_numbered<F, T, X>(fetcher: &F, base: &Url, max_pages: usize, extract: X) -> Result<Vec<T>, Error>
where
    F: PageFetcher + ?Sized,
    T: Send,
    X: Fn(&str, &Url) -> Result<Vec<T>, Error> + Send + Sync,
{
    let base_html = fetcher.fetch(base).await?;
    let pages = numbered_pages(&base_html, base)?;
    if pages.len() > max_pages {
        return Err(Error::PageLimit { url: base.to_string(), limit: max_pages });
    }

    let mut records = Vec::new();
    for (index, page) in pages.iter().enumerate() {
        let fetched;
        let html = if page == base {
            &base_html
        } else {
            fetched = fetcher.fetch(page).await?;
            &fetched
        };
        let found = extract(html, page)?;
        tracing::debug!(url = %page, page = index + 1, of = pages.len(), records = found.len(), "visited page");
        records.extend(found);
    }

    Ok(records)
}

/// Follow "next" links from `root` and concatenate what `extract` finds on each page.
///
/// Each page is fetched once; records and the next link come from the same markup.
pub async fn walk_linked<F, T, X>(fetcher: &F, root: &Url, max_pages: usize, extract: X) -> Result<Vec<T>, Error>
where
    F: PageFetcher + ?Sized,
    T: Send,
    X: Fn(&str, &Url) -> Result<Vec<T>, Error> + Send + Sync,
{
    let mut records = Vec::new();
    let mut visited = HashSet::new();
    let mut current = Some(root.clone());

    while let Some(page) = current {
        if visited.len() >= max_pages {
            return Err(Error::PageLimit { url: root.to_string(), limit: max_pages });
        }
        if !visited.insert(page.clone()) {
            return Err(Error::PaginationCycle(page.to_string()));
        }

        let html = fetcher.fetch(&page).await?;
        let found = extract(&html, &page)?;
        tracing::debug!(url = %page, page = visited.len(), records = found.len(), "visited page");
        records.extend(found);

        current = next_page(&html, &page)?;
    }

    Ok(records)
}
