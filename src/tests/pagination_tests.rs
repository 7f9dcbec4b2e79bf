use crate::scraper::models::{SearchFilters, SessionContext};
use crate::scraper::pagination::{fetch_all_pages, paginate_with};
use crate::scraper::ScraperError;
use serde_json::{json, Value};
use std::cell::Cell;

fn records(n: usize) -> Vec<Value> {
    (0..n).map(|i| json!({ "auction_id": format!("r{i}") })).collect()
}

#[test]
fn empty_page_halts_further_requests() {
    let calls = Cell::new(0u32);
    let result = paginate_with(5, |page_num| {
        calls.set(calls.get() + 1);
        Ok(if page_num == 3 { Vec::new() } else { records(2) })
    });

    // Page 2 returned records, page 3 was empty, pages 4-5 never requested.
    assert_eq!(calls.get(), 2);
    assert_eq!(result.pages_fetched, 1);
    assert_eq!(result.records.len(), 2);
}

#[test]
fn full_result_set_fetches_exactly_max_pages() {
    let calls = Cell::new(0u32);
    let result = paginate_with(4, |_| {
        calls.set(calls.get() + 1);
        Ok(records(15))
    });

    assert_eq!(calls.get(), 3); // pages 2, 3, 4
    assert_eq!(result.pages_fetched, 3);
    assert_eq!(result.records.len(), 45);
}

#[test]
fn http_error_stops_but_keeps_fetched_pages() {
    let calls = Cell::new(0u32);
    let result = paginate_with(6, |page_num| {
        calls.set(calls.get() + 1);
        if page_num == 4 {
            Err(ScraperError::HttpStatus(403))
        } else {
            Ok(records(15))
        }
    });

    assert_eq!(calls.get(), 3);
    assert_eq!(result.records.len(), 30); // pages 2 and 3 survive the block
}

#[test]
fn parse_error_stops_pagination_likewise() {
    let result = paginate_with(4, |page_num| {
        if page_num == 2 {
            Err(ScraperError::JsonParse("bad body".to_string()))
        } else {
            Ok(records(15))
        }
    });

    assert_eq!(result.records.len(), 0);
    assert_eq!(result.pages_fetched, 0);
}

#[test]
fn max_pages_one_never_calls_the_fetcher() {
    let result = paginate_with(1, |_| -> Result<Vec<Value>, ScraperError> {
        panic!("no pages past 1 should be requested")
    });
    assert!(result.records.is_empty());
}

#[test]
fn missing_headers_yield_page_one_only() {
    let session = SessionContext {
        headers: Vec::new(),
        first_page: records(7),
        total_records: 100,
    };
    let filters = SearchFilters::for_state("FL");

    let result = fetch_all_pages(session, &filters, 5);
    assert_eq!(result.records.len(), 7);
    assert_eq!(result.pages_fetched, 1);
}

#[test]
fn empty_first_page_short_circuits() {
    let session = SessionContext {
        headers: vec![("x-api-key".to_string(), "abc".to_string())],
        first_page: Vec::new(),
        total_records: 0,
    };
    let filters = SearchFilters::for_state("FL");

    let result = fetch_all_pages(session, &filters, 5);
    assert!(result.records.is_empty());
    assert_eq!(result.pages_fetched, 0);
}

#[test]
fn capture_completes_only_with_both_halves() {
    // Body before headers, headers before body: either order alone is not
    // enough to stop the bootstrap wait.
    let body_only = SessionContext {
        headers: Vec::new(),
        first_page: records(3),
        total_records: 3,
    };
    assert!(!body_only.is_complete());

    let headers_only = SessionContext {
        headers: vec![("x-api-key".to_string(), "abc".to_string())],
        first_page: Vec::new(),
        total_records: 0,
    };
    assert!(!headers_only.is_complete());

    let both = SessionContext {
        headers: vec![("x-api-key".to_string(), "abc".to_string())],
        first_page: records(3),
        total_records: 3,
    };
    assert!(both.is_complete());
}

#[test]
fn state_filters_build_the_expected_search_url() {
    let by_state = SearchFilters::for_state("FL");
    assert_eq!(
        by_state.search_url(),
        "https://www.storagetreasures.com/auctions?state=FL"
    );
    assert_eq!(by_state.search_type(), "state");
    assert_eq!(by_state.search_term(), "FL");

    let by_zip = SearchFilters::for_zip("33601", 25);
    assert_eq!(
        by_zip.search_url(),
        "https://www.storagetreasures.com/auctions?type=zipcode&radius=25&search_term=33601"
    );
    assert_eq!(by_zip.search_type(), "zipcode");
    assert_eq!(by_zip.search_term(), "33601");
}
