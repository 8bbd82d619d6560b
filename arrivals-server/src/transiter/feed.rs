//! Cursor-paginated walk over the stops feed.

use std::future::Future;

use tracing::debug;

use super::error::TransiterError;
use super::types::{StopRecord, StopsPage};

/// A source of stops pages.
///
/// Implemented by [`TransiterClient`](super::TransiterClient) for the live
/// feed and by [`MockStopFeed`](super::MockStopFeed) for tests.
pub trait StopFeed: Send + Sync {
    /// Fetch the page starting at `cursor`, or the first page if `None`.
    fn fetch_page(
        &self,
        cursor: Option<&str>,
    ) -> impl Future<Output = Result<StopsPage, TransiterError>> + Send;

    /// Upper bound on pages followed in one cycle.
    fn max_pages(&self) -> usize;
}

/// Everything one pagination walk produced.
#[derive(Debug, Default)]
pub struct FeedCycle {
    /// Stops from every page consumed, in feed order.
    pub stops: Vec<StopRecord>,
    /// Number of pages successfully consumed.
    pub pages: usize,
    /// Set if the walk stopped early.
    pub error: Option<TransiterError>,
}

impl FeedCycle {
    /// Whether the walk reached the end of the cursor chain.
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// The stops if the walk completed, otherwise the error that stopped it.
    pub fn into_result(self) -> Result<Vec<StopRecord>, TransiterError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.stops),
        }
    }
}

/// Follow the cursor chain from the first page until it ends or a request
/// fails.
///
/// A failure stops the walk immediately; pages already consumed are kept
/// in the result alongside the error. Nothing is retried.
pub async fn fetch_cycle<F: StopFeed>(feed: &F) -> FeedCycle {
    let mut cycle = FeedCycle::default();
    let mut cursor: Option<String> = None;

    loop {
        if cycle.pages >= feed.max_pages() {
            cycle.error = Some(TransiterError::TooManyPages {
                limit: feed.max_pages(),
            });
            return cycle;
        }

        let page = match feed.fetch_page(cursor.as_deref()).await {
            Ok(page) => page,
            Err(err) => {
                cycle.error = Some(err);
                return cycle;
            }
        };

        cycle.pages += 1;
        debug!(
            page = cycle.pages,
            stops = page.stops.len(),
            cursor = cursor.as_deref().unwrap_or(""),
            "fetched stops page"
        );

        cursor = page.next_cursor().map(str::to_string);
        cycle.stops.extend(page.stops);

        if cursor.is_none() {
            return cycle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transiter::MockStopFeed;

    fn page(ids: &[&str], next: Option<&str>) -> StopsPage {
        StopsPage {
            stops: ids
                .iter()
                .map(|id| StopRecord {
                    id: id.to_string(),
                    ..Default::default()
                })
                .collect(),
            next_id: next.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn follows_cursor_until_exhausted() {
        let feed = MockStopFeed::new()
            .with_page(None, page(&["101", "103"], Some("104")))
            .with_page(Some("104"), page(&["104"], Some("106")))
            .with_page(Some("106"), page(&["106"], Some("107")))
            .with_page(Some("107"), page(&["107"], None));

        let cycle = fetch_cycle(&feed).await;

        assert!(cycle.is_complete());
        assert_eq!(cycle.pages, 4);
        let ids: Vec<_> = cycle.stops.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["101", "103", "104", "106", "107"]);
        assert_eq!(
            feed.requested(),
            vec![None, Some("104".to_string()), Some("106".to_string()), Some("107".to_string())]
        );
    }

    #[tokio::test]
    async fn stops_at_first_failure() {
        let feed = MockStopFeed::new()
            .with_page(None, page(&["101"], Some("104")))
            .with_failure(Some("104"), 503)
            .with_page(Some("106"), page(&["106"], None));

        let cycle = fetch_cycle(&feed).await;

        assert!(!cycle.is_complete());
        assert_eq!(cycle.pages, 1);
        assert_eq!(cycle.stops.len(), 1);
        assert_eq!(feed.requested().len(), 2);
        assert!(matches!(
            cycle.into_result(),
            Err(TransiterError::Api { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn undecodable_page_stops_walk() {
        let feed = MockStopFeed::new()
            .with_page(None, page(&["101"], Some("104")))
            .with_json(Some("104"), "not json")
            .with_page(Some("106"), page(&["106"], None));

        let cycle = fetch_cycle(&feed).await;

        assert_eq!(cycle.pages, 1);
        assert_eq!(feed.requested().len(), 2);
        match cycle.into_result() {
            Err(TransiterError::Json { body, .. }) => {
                assert_eq!(body.as_deref(), Some("not json"))
            }
            other => panic!("expected a JSON error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn page_limit_breaks_cursor_loops() {
        let feed = MockStopFeed::new()
            .with_page(None, page(&["101"], Some("101")))
            .with_page(Some("101"), page(&["101"], Some("101")))
            .with_max_pages(3);

        let cycle = fetch_cycle(&feed).await;

        assert_eq!(cycle.pages, 3);
        assert!(matches!(
            cycle.error,
            Some(TransiterError::TooManyPages { limit: 3 })
        ));
    }

    #[tokio::test]
    async fn single_page_feed() {
        let feed = MockStopFeed::new().with_page(None, page(&["101"], None));
        let stops = fetch_cycle(&feed).await.into_result().unwrap();
        assert_eq!(stops.len(), 1);
    }
}
