//! list_films tool implementation.

use lboxd_client::{Letterboxd, PageFetcher};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Input parameters for the list_films tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListParams {
    /// List page URL, e.g. "https://letterboxd.com/someone/list/summer/".
    pub url: String,
}

pub async fn films_impl<F: PageFetcher>(
    scraper: &Letterboxd<F>, params: &ListParams,
) -> Result<CallToolResult, McpError> {
    json_result(&scraper.list(&params.url).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{StaticFetcher, result_json};

    #[tokio::test]
    async fn test_list_films_impl() {
        let list = "https://letterboxd.com/someone/list/summer/";
        let scraper = StaticFetcher::default()
            .with_page(
                list,
                r#"<ul>
                    <li><p class="list-number">1</p><a href="/film/days-of-heaven/">Days of Heaven</a></li>
                    <li><p class="list-number">2</p><a href="/film/paris-texas/">Paris, Texas</a></li>
                </ul>"#,
            )
            .into_scraper();

        let json = result_json(&films_impl(&scraper, &ListParams { url: list.into() }).await.unwrap());

        assert_eq!(json["list_url"], list);
        assert_eq!(
            json["films"],
            serde_json::json!(["https://letterboxd.com/film/days-of-heaven/", "https://letterboxd.com/film/paris-texas/"])
        );
    }
}
