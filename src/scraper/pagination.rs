use crate::scraper::models::{AuctionsPage, SearchFilters, SessionContext, API_URL, PAGE_SIZE};
use crate::scraper::ScraperError;
use rand::distributions::Alphanumeric;
use rand::Rng;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use std::time::Duration;

/// Politeness delay before every replayed page request.
const PAGE_DELAY: Duration = Duration::from_millis(1500);
const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

pub struct PaginatedResult {
    pub records: Vec<Value>,
    pub pages_fetched: usize,
}

/// Page-1 records from the bootstrap session, concatenated with pages
/// 2..=max_pages replayed over plain HTTP with the captured headers.
///
/// Never fails: any HTTP error status, transport error, or parse error stops
/// further pagination and keeps everything fetched so far. A blocked run
/// simply yields a partial result set; there is no fresh browser pass here.
pub fn fetch_all_pages(
    session: SessionContext,
    filters: &SearchFilters,
    max_pages: u32,
) -> PaginatedResult {
    let SessionContext {
        headers,
        first_page,
        ..
    } = session;

    let mut result = PaginatedResult {
        pages_fetched: usize::from(!first_page.is_empty()),
        records: first_page,
    };

    if max_pages <= 1 || headers.is_empty() {
        return result;
    }
    if result.records.is_empty() {
        // Page 1 came back empty; the result set is exhausted already.
        return result;
    }

    let client = match Client::builder().timeout(HTTP_TIMEOUT).build() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("⚠️ HTTP client build failed, keeping page 1 only: {e}");
            return result;
        }
    };
    let header_map = build_header_map(&headers);

    let extra = paginate_with(max_pages, |page_num| {
        std::thread::sleep(PAGE_DELAY);
        fetch_page(&client, &header_map, filters, page_num)
    });

    result.records.extend(extra.records);
    result.pages_fetched += extra.pages_fetched;
    result
}

/// Drive pages 2..=max_pages through `fetch_page`, stopping at the first
/// empty page or error. Separated from the HTTP layer so termination
/// behavior is testable without a network.
pub fn paginate_with<F>(max_pages: u32, mut fetch_page: F) -> PaginatedResult
where
    F: FnMut(u32) -> Result<Vec<Value>, ScraperError>,
{
    let mut result = PaginatedResult {
        records: Vec::new(),
        pages_fetched: 0,
    };

    for page_num in 2..=max_pages {
        match fetch_page(page_num) {
            Ok(records) => {
                eprintln!("📄 Page {page_num}: {} auctions", records.len());
                if records.is_empty() {
                    break;
                }
                result.pages_fetched += 1;
                result.records.extend(records);
            }
            Err(e) => {
                eprintln!("⚠️ Page {page_num} failed — stopping pagination: {e}");
                break;
            }
        }
    }

    result
}

fn fetch_page(
    client: &Client,
    headers: &HeaderMap,
    filters: &SearchFilters,
    page_num: u32,
) -> Result<Vec<Value>, ScraperError> {
    let mut params: Vec<(&str, String)> = vec![
        ("page_num", page_num.to_string()),
        ("page_count", PAGE_SIZE.to_string()),
        ("search_type", filters.search_type().to_string()),
        ("search_term", filters.search_term().to_string()),
        ("filter_types", filters.filter_types.clone()),
        ("filter_categories", String::new()),
        ("filter_unit_contents", String::new()),
        ("sort_column", "expire_date".to_string()),
        ("sort_direction", "asc".to_string()),
        ("filter_public_notice", String::new()),
        ("randStr", random_token(12)),
    ];
    if let Some(state) = &filters.state {
        params.push(("search_state", state.clone()));
    }

    let resp = client
        .get(API_URL)
        .headers(headers.clone())
        .query(&params)
        .send()
        .map_err(|e| ScraperError::Network(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(ScraperError::HttpStatus(status.as_u16()));
    }

    let page: AuctionsPage = resp
        .json()
        .map_err(|e| ScraperError::JsonParse(e.to_string()))?;
    Ok(page.auctions)
}

/// Captured pairs become a reqwest header map; anything that doesn't survive
/// the round trip (invalid name or value) is dropped rather than failing the
/// whole replay.
fn build_header_map(pairs: &[(String, String)]) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in pairs {
        let name = match HeaderName::from_bytes(name.as_bytes()) {
            Ok(n) => n,
            Err(_) => continue,
        };
        let value = match HeaderValue::from_str(value) {
            Ok(v) => v,
            Err(_) => continue,
        };
        map.insert(name, value);
    }
    map
}

/// Per-request cache-busting token the site's own client sends.
fn random_token(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}
