//! In-memory stops feed for exercising the poller without a Transiter
//! instance.
//!
//! Pages are registered against the cursor that requests them. A cursor
//! with nothing registered answers with a 404, mirroring an upstream that
//! no longer knows the cursor.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::client::TransiterConfig;
use super::error::TransiterError;
use super::feed::StopFeed;
use super::types::StopsPage;

#[derive(Debug, Clone)]
enum MockResponse {
    Page(StopsPage),
    Failure { status: u16 },
    Json(String),
}

/// Mock stops feed serving canned pages.
#[derive(Debug, Clone)]
pub struct MockStopFeed {
    responses: HashMap<Option<String>, MockResponse>,
    requested: Arc<Mutex<Vec<Option<String>>>>,
    max_pages: usize,
}

impl Default for MockStopFeed {
    fn default() -> Self {
        Self {
            responses: HashMap::new(),
            requested: Arc::new(Mutex::new(Vec::new())),
            max_pages: TransiterConfig::default().max_pages,
        }
    }
}

impl MockStopFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `page` for `cursor` (`None` for the first page).
    pub fn with_page(mut self, cursor: Option<&str>, page: StopsPage) -> Self {
        self.responses
            .insert(cursor.map(str::to_string), MockResponse::Page(page));
        self
    }

    /// Serve a raw JSON body for `cursor`, decoded like a live response.
    pub fn with_json(mut self, cursor: Option<&str>, body: impl Into<String>) -> Self {
        self.responses
            .insert(cursor.map(str::to_string), MockResponse::Json(body.into()));
        self
    }

    /// Fail requests for `cursor` with the given HTTP status.
    pub fn with_failure(mut self, cursor: Option<&str>, status: u16) -> Self {
        self.responses
            .insert(cursor.map(str::to_string), MockResponse::Failure { status });
        self
    }

    pub fn with_max_pages(mut self, n: usize) -> Self {
        self.max_pages = n;
        self
    }

    /// Replace every canned response, keeping the request log.
    ///
    /// Lets one mock stand in for successive cycles of a changing feed.
    pub fn replace_pages(&mut self, pages: Vec<(Option<&str>, StopsPage)>) {
        self.responses = pages
            .into_iter()
            .map(|(cursor, page)| (cursor.map(str::to_string), MockResponse::Page(page)))
            .collect();
    }

    /// Cursors requested so far, in order.
    pub fn requested(&self) -> Vec<Option<String>> {
        self.requested
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }

    fn respond(&self, cursor: Option<&str>) -> Result<StopsPage, TransiterError> {
        if let Ok(mut log) = self.requested.lock() {
            log.push(cursor.map(str::to_string));
        }

        match self.responses.get(&cursor.map(str::to_string)) {
            Some(MockResponse::Page(page)) => Ok(page.clone()),
            Some(MockResponse::Failure { status }) => Err(TransiterError::Api {
                status: *status,
                message: "mock failure".to_string(),
            }),
            Some(MockResponse::Json(body)) => {
                serde_json::from_str(body).map_err(|e| TransiterError::json(e, body))
            }
            None => Err(TransiterError::Api {
                status: 404,
                message: format!("no mock page for cursor {:?}", cursor),
            }),
        }
    }
}

impl StopFeed for MockStopFeed {
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<StopsPage, TransiterError> {
        self.respond(cursor)
    }

    fn max_pages(&self) -> usize {
        self.max_pages
    }
}
