// scraper.rs
use crate::db::connection::Database;
use crate::db::listings::save_listings;
use crate::db::scrapes;
use crate::errors::ServerError;
use crate::scraper::models::SearchFilters;
use crate::scraper::normalize::normalize;
use crate::scraper::{pagination, session};
use chrono::Utc;
use serde::Serialize;
use std::time::Duration;

const PAGE_LOAD_TIMEOUT: Duration = Duration::from_secs(45);

#[derive(Debug, Serialize)]
pub struct ScrapeOutcome {
    pub new_listings: usize,
    pub total_fetched: usize,
    pub pages_fetched: usize,
}

/// One scrape run end to end: browser bootstrap, header-replay pagination,
/// normalization, batch upsert.
pub struct StorageTreasuresScraper {
    page_load_timeout: Duration,
}

impl StorageTreasuresScraper {
    pub fn new() -> Self {
        Self {
            page_load_timeout: PAGE_LOAD_TIMEOUT,
        }
    }

    /// Run one scrape and return counts. The whole call is blocking and takes
    /// tens of seconds to a few minutes, dominated by browser page load and
    /// the inter-page delay.
    ///
    /// A failed browser launch is fatal and surfaces here. A blocked or
    /// timed-out session is not: it yields fewer records, which callers must
    /// treat as a normal outcome. Per-record normalize/upsert failures are
    /// logged and skipped without aborting the batch.
    pub fn run(
        &self,
        db: &Database,
        filters: &SearchFilters,
        max_pages: u32,
    ) -> Result<ScrapeOutcome, ServerError> {
        let session = session::bootstrap(filters, self.page_load_timeout)?;
        let paginated = pagination::fetch_all_pages(session, filters, max_pages);
        let total_fetched = paginated.records.len();

        let mut listings = Vec::new();
        let mut no_id = 0usize;
        for raw in &paginated.records {
            match normalize(raw) {
                Some(listing) => listings.push(listing),
                None => no_id += 1,
            }
        }
        if no_id > 0 {
            eprintln!("⚠️ {no_id} records without an auction id were dropped");
        }

        let batch = save_listings(db, &listings)?;

        eprintln!(
            "✅ Scrape complete: {} new / {} total fetched ({} skipped)",
            batch.new_listings, total_fetched, batch.skipped
        );

        Ok(ScrapeOutcome {
            new_listings: batch.new_listings,
            total_fetched,
            pages_fetched: paginated.pages_fetched,
        })
    }

    /// `run`, bracketed by a scrape_runs bookkeeping row.
    pub fn run_recorded(
        &self,
        db: &Database,
        filters: &SearchFilters,
        max_pages: u32,
    ) -> Result<ScrapeOutcome, ServerError> {
        let run_id = db
            .with_conn(|conn| {
                scrapes::start_scrape_run(conn, filters.search_term(), Utc::now().timestamp())
            })
            .unwrap_or(0);

        let result = self.run(db, filters, max_pages);

        let finished = Utc::now().timestamp();
        let record = match &result {
            Ok(outcome) => db.with_conn(|conn| {
                scrapes::end_scrape_run(
                    conn,
                    run_id,
                    finished,
                    outcome.pages_fetched,
                    outcome.total_fetched,
                    outcome.new_listings,
                    true,
                    None,
                )
            }),
            Err(e) => db.with_conn(|conn| {
                scrapes::end_scrape_run(conn, run_id, finished, 0, 0, 0, false, Some(e.to_string()))
            }),
        };
        if let Err(e) = record {
            eprintln!("⚠️ Failed to record scrape run: {e}");
        }

        result
    }
}

impl Default for StorageTreasuresScraper {
    fn default() -> Self {
        Self::new()
    }
}
