//! Unified error types for lboxd.
//!
//! Every failure is fatal to the query in flight. Only [`Error::is_transient`]
//! failures are retried, and only by the fetch layer.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Unified error types for the lboxd scraper.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty username).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Connection-level failure before a response arrived.
    #[error("NETWORK_ERROR: {0}")]
    Network(String),

    /// Fetch timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Non-2xx HTTP response.
    #[error("HTTP_ERROR: status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// Fetch response too large.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// Structured-data script missing, undecodable, or lacking an expected key.
    #[error("MALFORMED_METADATA: {0}")]
    MalformedMetadata(String),

    /// Last page-number link is not a positive integer.
    #[error("PAGINATION_PARSE_ERROR: {0}")]
    PaginationParse(String),

    /// A selector matched nothing where a match was structurally required.
    #[error("SELECTOR_MISS: {0}")]
    SelectorMiss(String),

    /// Rating marker present without a usable `rated-N` token.
    #[error("INVALID_RATING: {0}")]
    InvalidRating(String),

    /// Pagination walk exceeded the page cap.
    #[error("PAGE_LIMIT: {url} exceeded {limit} pages")]
    PageLimit { url: String, limit: usize },

    /// A "next" link pointed back at a page already visited.
    #[error("PAGINATION_CYCLE: {0} was reached twice")]
    PaginationCycle(String),

    /// The whole query ran past its deadline.
    #[error("DEADLINE_EXCEEDED: query did not finish within {0}ms")]
    DeadlineExceeded(u64),
}

impl Error {
    /// Whether a retry of the same request could plausibly succeed.
    ///
    /// Timeouts, connection failures, `429` and `5xx` responses are transient.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Network(_) | Error::FetchTimeout(_) => true,
            Error::HttpStatus { status, .. } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidInput(_) => -32602,
            Error::InvalidUrl(_) => -32003,
            Error::Network(_) => -32008,
            Error::FetchTimeout(_) => -32006,
            Error::HttpStatus { .. } => -32008,
            Error::FetchTooLarge(_) => -32007,
            Error::MalformedMetadata(_) => -32020,
            Error::PaginationParse(_) => -32021,
            Error::SelectorMiss(_) => -32022,
            Error::InvalidRating(_) => -32023,
            Error::PageLimit { .. } => -32024,
            Error::PaginationCycle(_) => -32025,
            Error::DeadlineExceeded(_) => -32026,
        };

        McpError { code: ErrorCode(code), message: err.to_string().into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::SelectorMiss("a.name".to_string());
        assert!(err.to_string().contains("SELECTOR_MISS"));
        assert!(err.to_string().contains("a.name"));

        let err = Error::HttpStatus { url: "https://letterboxd.com/x/".into(), status: 503 };
        assert_eq!(err.to_string(), "HTTP_ERROR: status 503 for https://letterboxd.com/x/");
    }

    #[test]
    fn test_transient_classification() {
        assert!(Error::FetchTimeout("slow".into()).is_transient());
        assert!(Error::Network("refused".into()).is_transient());
        assert!(Error::HttpStatus { url: String::new(), status: 429 }.is_transient());
        assert!(Error::HttpStatus { url: String::new(), status: 502 }.is_transient());
        assert!(!Error::HttpStatus { url: String::new(), status: 404 }.is_transient());
        assert!(!Error::MalformedMetadata("no script".into()).is_transient());
        assert!(!Error::PaginationParse("abc".into()).is_transient());
    }

    #[test]
    fn test_error_to_mcp_error() {
        let err = Error::PaginationParse("next".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32021);
        assert!(mcp_err.message.contains("PAGINATION_PARSE_ERROR"));
    }
}
