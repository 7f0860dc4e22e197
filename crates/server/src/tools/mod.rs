//! MCP tool implementations.
//!
//! Each tool is a thin wrapper over one [`Letterboxd`](lboxd_client::Letterboxd)
//! query; results are returned as pretty-printed JSON text.

pub mod film;
pub mod list;
pub mod user;

pub use film::FilmParams;
pub use list::ListParams;
pub use user::UserParams;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Failed to serialize result: {e}"), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
