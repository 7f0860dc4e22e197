//! Per-user tools: films, reviews, lists, followers, following and the full profile.

use lboxd_client::{Letterboxd, PageFetcher};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Input parameters for every per-user tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UserParams {
    /// Letterboxd username (letters, digits and underscores).
    pub username: String,
}

pub async fn films_impl<F: PageFetcher>(
    scraper: &Letterboxd<F>, params: &UserParams,
) -> Result<CallToolResult, McpError> {
    json_result(&scraper.films(&params.username).await?)
}

pub async fn reviews_impl<F: PageFetcher>(
    scraper: &Letterboxd<F>, params: &UserParams,
) -> Result<CallToolResult, McpError> {
    json_result(&scraper.reviews(&params.username).await?)
}

pub async fn lists_impl<F: PageFetcher>(
    scraper: &Letterboxd<F>, params: &UserParams,
) -> Result<CallToolResult, McpError> {
    json_result(&scraper.lists(&params.username).await?)
}

pub async fn followers_impl<F: PageFetcher>(
    scraper: &Letterboxd<F>, params: &UserParams,
) -> Result<CallToolResult, McpError> {
    json_result(&scraper.followers(&params.username).await?)
}

pub async fn following_impl<F: PageFetcher>(
    scraper: &Letterboxd<F>, params: &UserParams,
) -> Result<CallToolResult, McpError> {
    json_result(&scraper.following(&params.username).await?)
}

pub async fn profile_impl<F: PageFetcher>(
    scraper: &Letterboxd<F>, params: &UserParams,
) -> Result<CallToolResult, McpError> {
    json_result(&scraper.profile(&params.username).await?)
}
