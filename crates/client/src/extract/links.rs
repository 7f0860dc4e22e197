//! Anchor-based records: curated lists, people, and a list's films.
//!
//! All three resolve an href to an absolute URL. An element that promises a
//! link but carries none is a [`Error::SelectorMiss`], not a skipped record.

use lboxd_core::{Error, ListReference, PersonReference};
use scraper::Html;
use url::Url;

use super::{require_attr, resolve, selector, selectors};

/// Extract the curated lists linked from a user's lists page.
pub fn extract_lists(html: &str, page: &Url) -> Result<Vec<ListReference>, Error> {
    let document = Html::parse_document(html);
    let anchors = selector(selectors::LIST_LINK);

    document
        .select(&anchors)
        .map(|a| Ok(ListReference { list_url: resolve(page, require_attr(a, "href", "list link")?)? }))
        .collect()
}

/// Extract profile links from a followers or following page.
///
/// Both listings share the same markup; only the resource path differs.
pub fn extract_people(html: &str, page: &Url) -> Result<Vec<PersonReference>, Error> {
    let document = Html::parse_document(html);
    let summaries = selector(selectors::PERSON_SUMMARY);
    let name = selector(selectors::PERSON_NAME);

    document
        .select(&summaries)
        .map(|summary| {
            let anchor = summary
                .select(&name)
                .next()
                .ok_or_else(|| Error::SelectorMiss(format!("person summary without name link on {page}")))?;
            let profile_url = resolve(page, require_attr(anchor, "href", "person name")?)?;
            Ok(PersonReference { profile_url })
        })
        .collect()
}

/// Extract the film links of a list page, in list order.
pub fn extract_list_entries(html: &str, page: &Url) -> Result<Vec<Url>, Error> {
    let document = Html::parse_document(html);
    let entries = selector(selectors::LIST_ENTRY);

    document
        .select(&entries)
        .map(|a| resolve(page, require_attr(a, "href", "list entry")?))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(path: &str) -> Url {
        Url::parse("https://letterboxd.com/").unwrap().join(path).unwrap()
    }

    #[test]
    fn test_extract_lists() {
        let html = r#"
            <section class="list">
                <a href="/someone/list/lazed-out-summer/" class="list-link"><div class="poster-list"></div></a>
            </section>
            <section class="list">
                <a href="/someone/list/best-of-2019/" class="list-link"></a>
            </section>
            <a href="/someone/list/not-a-list-link/">ignored</a>
        "#;

        let lists = extract_lists(html, &page("someone/lists/page/1/")).unwrap();
        assert_eq!(lists.len(), 2);
        assert_eq!(lists[0].list_url.as_str(), "https://letterboxd.com/someone/list/lazed-out-summer/");
        assert_eq!(lists[1].list_url.as_str(), "https://letterboxd.com/someone/list/best-of-2019/");
    }

    #[test]
    fn test_extract_lists_missing_href_is_fatal() {
        let html = r#"<a class="list-link">broken</a>"#;
        let result = extract_lists(html, &page("someone/lists/"));
        assert!(matches!(result, Err(Error::SelectorMiss(_))));
    }

    #[test]
    fn test_extract_people() {
        let html = r#"
            <table class="person-table"><tbody>
                <tr><td class="table-person"><div class="person-summary">
                    <a class="avatar -a40" href="/alice/"><img alt="Alice"></a>
                    <h3 class="title-3"><a href="/alice/" class="name">Alice</a></h3>
                </div></td></tr>
                <tr><td class="table-person"><div class="person-summary">
                    <h3 class="title-3"><a href="/bob/" class="name">Bob</a></h3>
                </div></td></tr>
            </tbody></table>
        "#;

        let people = extract_people(html, &page("someone/followers/")).unwrap();
        assert_eq!(people.len(), 2);
        assert_eq!(people[0].profile_url.as_str(), "https://letterboxd.com/alice/");
        assert_eq!(people[1].profile_url.as_str(), "https://letterboxd.com/bob/");
    }

    #[test]
    fn test_extract_people_without_name_anchor_is_fatal() {
        let html = r#"<div class="person-summary"><a class="avatar" href="/alice/"></a></div>"#;
        let result = extract_people(html, &page("someone/following/"));
        assert!(matches!(result, Err(Error::SelectorMiss(_))));
    }

    #[test]
    fn test_extract_list_entries() {
        let html = r#"
            <ul class="poster-list -p125 -grid film-list">
                <li class="poster-container numbered-list-item">
                    <p class="list-number">1</p><a href="/film/days-of-heaven/">Days of Heaven</a>
                </li>
                <li class="poster-container numbered-list-item">
                    <p class="list-number">2</p><a href="/film/paris-texas/">Paris, Texas</a>
                </li>
            </ul>
        "#;

        let films = extract_list_entries(html, &page("someone/list/lazed-out-summer/")).unwrap();
        assert_eq!(
            films.iter().map(Url::as_str).collect::<Vec<_>>(),
            vec!["https://letterboxd.com/film/days-of-heaven/", "https://letterboxd.com/film/paris-texas/"]
        );
    }
}
