//! Film facts that only exist in markup: languages and the synopsis.

use std::collections::BTreeSet;

use lboxd_core::Error;
use scraper::Html;

use super::{element_text, selector, selectors};

/// Collect language names from the details tab of a film's details page.
///
/// Languages appear under both "Language" and "Spoken Languages", so the
/// result is a set.
pub fn extract_languages(html: &str) -> Result<BTreeSet<String>, Error> {
    let document = Html::parse_document(html);
    let tab = document
        .select(&selector(selectors::DETAILS_TAB))
        .next()
        .ok_or_else(|| Error::SelectorMiss("film details page without a details tab".into()))?;

    Ok(tab
        .select(&selector(selectors::LANGUAGE_LINK))
        .map(element_text)
        .filter(|name| !name.is_empty())
        .collect())
}

/// Text of the first paragraph in the film's truncated description block.
pub fn extract_description(html: &str) -> Result<String, Error> {
    let document = Html::parse_document(html);
    document
        .select(&selector(selectors::DESCRIPTION))
        .next()
        .map(element_text)
        .ok_or_else(|| Error::SelectorMiss("film page without a description paragraph".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_languages_fixture() {
        let languages = extract_languages(include_str!("../../fixtures/parasite-details.html")).unwrap();
        assert_eq!(languages.into_iter().collect::<Vec<_>>(), vec!["English", "Korean"]);
    }

    #[test]
    fn test_extract_languages_deduplicates() {
        let html = r#"<div id="tab-details">
            <a href="/films/language/korean/">Korean</a>
            <a href="/films/language/korean/">Korean</a>
        </div>"#;
        let languages = extract_languages(html).unwrap();
        assert_eq!(languages.len(), 1);
        assert!(languages.contains("Korean"));
    }

    #[test]
    fn test_extract_languages_ignores_other_facets() {
        let html = r#"<div id="tab-details">
            <a href="/films/country/south-korea/">South Korea</a>
            <a href="/studio/barunson-ea/">Barunson E&amp;A</a>
        </div>"#;
        assert!(extract_languages(html).unwrap().is_empty());
    }

    #[test]
    fn test_extract_languages_without_tab_is_fatal() {
        let result = extract_languages("<html><body></body></html>");
        assert!(matches!(result, Err(Error::SelectorMiss(_))));
    }

    #[test]
    fn test_extract_description_fixture() {
        let description = extract_description(include_str!("../../fixtures/parasite.html")).unwrap();
        assert!(description.starts_with("All unemployed, Ki-taek’s family"));
        assert!(description.ends_with("an unexpected incident."));
        assert!(!description.contains('\n'));
    }

    #[test]
    fn test_extract_description_first_paragraph_only() {
        let html = r#"<div class="truncate"><p>First.</p><p>Second.</p></div>"#;
        assert_eq!(extract_description(html).unwrap(), "First.");
    }

    #[test]
    fn test_extract_description_missing_is_fatal() {
        let result = extract_description("<div class=\"review\"><p>no truncate block</p></div>");
        assert!(matches!(result, Err(Error::SelectorMiss(_))));
    }
}
