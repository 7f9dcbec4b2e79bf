use crate::db::listings::get_active_listings;
use crate::db::scrapes;
use crate::db::Database;
use crate::errors::ServerError;
use crate::responses::{json_response, ResultResp};
use crate::scraper::{SearchFilters, StorageTreasuresScraper};
use astra::Request;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::io::Read;

pub fn handle(mut req: Request, db: &Database) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();

    match (method.as_str(), path.as_str()) {
        ("GET", "/api/health") => {
            json_response(&serde_json::json!({ "status": "ok", "service": "storage-scraper" }))
        }

        ("GET", "/api/listings") => {
            let params = parse_query(&req);
            let state = params.get("state").map(String::as_str);
            let items = get_active_listings(db, state)?;
            json_response(&serde_json::json!({ "total": items.len(), "items": items }))
        }

        ("GET", "/api/scrapes") => {
            let runs = db.with_conn(|conn| scrapes::get_recent_scrapes(conn))?;
            json_response(&runs)
        }

        // Blocks for the duration of the scrape (tens of seconds to minutes);
        // the caller is expected to wait.
        ("POST", "/api/scraper/run") => run_scraper(&mut req, db),

        _ => Err(ServerError::NotFound),
    }
}

#[derive(Debug, Deserialize)]
struct ScrapeRequest {
    state: Option<String>,
    zip_code: Option<String>,
    #[serde(default = "default_radius")]
    radius_miles: u32,
    #[serde(default = "default_max_pages")]
    max_pages: u32,
    #[serde(default)]
    auction_types: Vec<String>,
}

fn default_radius() -> u32 {
    50
}

fn default_max_pages() -> u32 {
    5
}

fn run_scraper(req: &mut Request, db: &Database) -> ResultResp {
    let body = read_body(req)?;
    let data: ScrapeRequest = serde_json::from_slice(&body)
        .map_err(|e| ServerError::BadRequest(format!("Invalid JSON body: {e}")))?;

    let mut filters = match (&data.state, &data.zip_code) {
        (Some(state), _) => SearchFilters::for_state(state.trim().to_uppercase()),
        (None, Some(zip)) => SearchFilters::for_zip(zip.trim(), data.radius_miles),
        (None, None) => {
            return Err(ServerError::BadRequest(
                "state or zip_code is required".to_string(),
            ))
        }
    };
    filters.filter_types = filter_type_codes(&data.auction_types);

    let scraper = StorageTreasuresScraper::new();
    let outcome = scraper.run_recorded(db, &filters, data.max_pages)?;

    json_response(&serde_json::json!({
        "new_listings": outcome.new_listings,
        "total_scraped": outcome.total_fetched,
        "pages_fetched": outcome.pages_fetched,
    }))
}

/// Map human-readable auction type names to the site's numeric filter codes,
/// deduped and comma-joined in sorted order. Unrecognized inputs pass through
/// untouched so new remote codes keep working.
pub fn filter_type_codes(types: &[String]) -> String {
    let mut codes = BTreeSet::new();
    for t in types {
        codes.insert(auction_type_code(t));
    }
    if codes.is_empty() {
        return "1,2,3,4".to_string();
    }
    codes.into_iter().collect::<Vec<_>>().join(",")
}

fn auction_type_code(name: &str) -> String {
    match name.trim().to_lowercase().as_str() {
        "lien" | "1" => "1".to_string(),
        "private" | "private_seller" | "non_lien" | "2" => "2".to_string(),
        "manager_special" | "manager special" | "3" => "3".to_string(),
        "charity" | "4" => "4".to_string(),
        other => other.to_string(),
    }
}

fn read_body(req: &mut Request) -> Result<Vec<u8>, ServerError> {
    let mut buf = Vec::new();
    req.body_mut()
        .reader()
        .read_to_end(&mut buf)
        .map_err(|e| ServerError::BadRequest(format!("Body read failed: {e}")))?;
    Ok(buf)
}

fn parse_query(req: &Request) -> std::collections::HashMap<String, String> {
    let mut map = std::collections::HashMap::new();

    if let Some(q) = req.uri().query() {
        for pair in q.split('&') {
            let mut parts = pair.splitn(2, '=');
            if let (Some(k), Some(v)) = (parts.next(), parts.next()) {
                map.insert(k.to_string(), v.to_string());
            }
        }
    }

    map
}
