//! In-memory page fetcher for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use lboxd_core::Error;
use url::Url;

use crate::fetch::PageFetcher;

/// Serves fixture markup by exact URL and records every request.
///
/// Unknown URLs answer like a missing page (`404`).
#[derive(Default)]
pub struct FixtureFetcher {
    pages: HashMap<String, String>,
    hits: Mutex<Vec<String>>,
}

impl FixtureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }

    /// URLs requested so far, in request order.
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for FixtureFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, Error> {
        self.hits.lock().unwrap().push(url.to_string());
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| Error::HttpStatus { url: url.to_string(), status: 404 })
    }
}
