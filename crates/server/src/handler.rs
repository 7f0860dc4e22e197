//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the scraper queries.
use std::sync::Arc;

use lboxd_client::{FetchClient, Letterboxd};
use lboxd_core::AppConfig;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

use crate::tools::{FilmParams, ListParams, UserParams, film, list, user};

/// The main MCP server handler for lboxd.
#[derive(Clone)]
pub struct LboxdServer {
    tool_router: ToolRouter<Self>,
    scraper: Arc<Letterboxd<FetchClient>>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl LboxdServer {
    /// Create a server handler backed by a network scraper built from `config`.
    pub fn new(config: &AppConfig) -> Result<Self, lboxd_core::Error> {
        let scraper = Letterboxd::from_config(config)?;
        Ok(Self { tool_router: Self::tool_router(), scraper: Arc::new(scraper) })
    }

    #[tool(description = "List every film a user has logged, keyed by film URL, with the user's star rating if any.")]
    async fn user_films(&self, params: Parameters<UserParams>) -> Result<CallToolResult, McpError> {
        user::films_impl(&self.scraper, &params.0).await
    }

    #[tool(description = "Collect the text of every review a user has written, in page order.")]
    async fn user_reviews(&self, params: Parameters<UserParams>) -> Result<CallToolResult, McpError> {
        user::reviews_impl(&self.scraper, &params.0).await
    }

    #[tool(description = "List the URLs of a user's curated lists.")]
    async fn user_lists(&self, params: Parameters<UserParams>) -> Result<CallToolResult, McpError> {
        user::lists_impl(&self.scraper, &params.0).await
    }

    #[tool(description = "List the profile URLs of a user's followers.")]
    async fn user_followers(&self, params: Parameters<UserParams>) -> Result<CallToolResult, McpError> {
        user::followers_impl(&self.scraper, &params.0).await
    }

    #[tool(description = "List the profile URLs of the people a user follows.")]
    async fn user_following(&self, params: Parameters<UserParams>) -> Result<CallToolResult, McpError> {
        user::following_impl(&self.scraper, &params.0).await
    }

    /// Runs the five per-user queries one after another; fails if any of them does.
    #[tool(description = "Run every per-user query (films, reviews, lists, followers, following) for one username.")]
    async fn user_profile(&self, params: Parameters<UserParams>) -> Result<CallToolResult, McpError> {
        user::profile_impl(&self.scraper, &params.0).await
    }

    #[tool(
        description = "Fetch a film's metadata: title, directors, genres, countries, release year, languages, average rating, rating count, synopsis and top reviews."
    )]
    async fn film_details(&self, params: Parameters<FilmParams>) -> Result<CallToolResult, McpError> {
        film::details_impl(&self.scraper, &params.0).await
    }

    #[tool(description = "List the film URLs of a curated list, in list order, across all of its pages.")]
    async fn list_films(&self, params: Parameters<ListParams>) -> Result<CallToolResult, McpError> {
        list::films_impl(&self.scraper, &params.0).await
    }
}

impl ServerHandler for LboxdServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "lboxd".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_query_is_a_tool() {
        let server = LboxdServer::new(&AppConfig::default()).unwrap();
        let mut names: Vec<String> = server.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        names.sort();

        assert_eq!(
            names,
            vec![
                "film_details",
                "list_films",
                "user_films",
                "user_followers",
                "user_following",
                "user_lists",
                "user_profile",
                "user_reviews",
            ]
        );
    }
}
