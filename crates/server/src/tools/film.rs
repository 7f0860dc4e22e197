//! film_details tool implementation.

use lboxd_client::{Letterboxd, PageFetcher};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Input parameters for the film_details tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FilmParams {
    /// Film page URL, e.g. "https://letterboxd.com/film/parasite-2019/".
    /// The scheme may be omitted.
    pub url: String,
}

pub async fn details_impl<F: PageFetcher>(
    scraper: &Letterboxd<F>, params: &FilmParams,
) -> Result<CallToolResult, McpError> {
    json_result(&scraper.film(&params.url).await?)
}
