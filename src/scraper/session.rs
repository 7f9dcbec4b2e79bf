use crate::scraper::models::{AuctionsPage, SearchFilters, SessionContext, API_URL};
use crate::scraper::ScraperError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{
    EnableParams, EventRequestWillBeSent, EventResponseReceived, GetResponseBodyParams, Headers,
    RequestId,
};
use chromiumoxide::Page;
use futures::StreamExt;
use serde_json::Value;
use std::time::Duration;

const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Drive one headless-browser pass over the search page.
///
/// The page's own JavaScript calls the data API with whatever headers the
/// anti-bot layer wants; we watch those requests over CDP, keep the header
/// set, and read the first response body that actually carries auctions.
///
/// Only a failed browser launch (or runtime setup) is fatal. Everything after
/// that point is soft: navigation errors and the page-load deadline both
/// return whatever was captured so far, possibly nothing. The browser process
/// is released on every exit path.
pub fn bootstrap(
    filters: &SearchFilters,
    page_load_timeout: Duration,
) -> Result<SessionContext, ScraperError> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| ScraperError::Runtime(e.to_string()))?;

    rt.block_on(bootstrap_async(filters, page_load_timeout))
}

async fn bootstrap_async(
    filters: &SearchFilters,
    page_load_timeout: Duration,
) -> Result<SessionContext, ScraperError> {
    let config = BrowserConfig::builder()
        .arg(format!("--user-agent={USER_AGENT}"))
        .build()
        .map_err(ScraperError::Launch)?;

    let (mut browser, mut handler) = Browser::launch(config)
        .await
        .map_err(|e| ScraperError::Launch(e.to_string()))?;

    // The handler future is the CDP event pump; it must be polled for the
    // whole lifetime of the browser.
    let handler_task = tokio::task::spawn(async move { while handler.next().await.is_some() {} });

    let ctx = match drive_search_page(&browser, filters, page_load_timeout).await {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("⚠️ Bootstrap pass aborted: {e}");
            SessionContext::default()
        }
    };

    if let Err(e) = browser.close().await {
        eprintln!("⚠️ Browser close failed: {e}");
    }
    let _ = browser.wait().await;
    handler_task.abort();

    Ok(ctx)
}

async fn drive_search_page(
    browser: &Browser,
    filters: &SearchFilters,
    page_load_timeout: Duration,
) -> Result<SessionContext, ScraperError> {
    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|e| ScraperError::Navigation(e.to_string()))?;

    page.execute(EnableParams::default())
        .await
        .map_err(|e| ScraperError::Navigation(e.to_string()))?;

    // Subscribe before navigating so the page's first API call is seen.
    let mut requests = page
        .event_listener::<EventRequestWillBeSent>()
        .await
        .map_err(|e| ScraperError::Navigation(e.to_string()))?;
    let mut responses = page
        .event_listener::<EventResponseReceived>()
        .await
        .map_err(|e| ScraperError::Navigation(e.to_string()))?;

    let search_url = filters.search_url();
    eprintln!("🌐 Browser → {search_url}");

    let mut ctx = SessionContext::default();

    let deadline = tokio::time::sleep(page_load_timeout);
    tokio::pin!(deadline);

    let mut nav = Box::pin(page.goto(search_url.clone()));
    let mut nav_done = false;

    loop {
        tokio::select! {
            res = &mut nav, if !nav_done => {
                nav_done = true;
                if let Err(e) = res {
                    eprintln!("⚠️ Navigation error, keeping captured data: {e}");
                }
                // API calls can still land after the load event; keep
                // listening until we have a body or the deadline hits.
            }
            Some(ev) = requests.next() => {
                if ctx.headers.is_empty() && is_data_api_call(&ev.request.url) {
                    ctx.headers = replayable_headers(&ev.request.headers);
                    // The body may have landed before this request's headers.
                    if ctx.is_complete() {
                        break;
                    }
                }
            }
            Some(ev) = responses.next() => {
                // The page fires duplicate and empty preliminary calls; take
                // the first body whose auctions array is non-empty and that
                // we haven't already captured.
                if ctx.first_page.is_empty() && is_data_api_call(&ev.response.url) {
                    match read_json_body(&page, &ev.request_id).await {
                        Ok(body) => {
                            let parsed: AuctionsPage =
                                serde_json::from_value(body).unwrap_or_default();
                            if !parsed.auctions.is_empty() {
                                ctx.total_records = parsed.total_records;
                                ctx.first_page = parsed.auctions;
                                if ctx.is_complete() {
                                    break;
                                }
                            }
                        }
                        Err(e) => eprintln!("⚠️ Response body read failed: {e}"),
                    }
                }
            }
            _ = &mut deadline => {
                eprintln!("⏱️ Page load deadline reached, keeping whatever was captured");
                break;
            }
        }
    }

    eprintln!(
        "📥 Page 1: {} auctions (total_records={})",
        ctx.first_page.len(),
        ctx.total_records
    );

    Ok(ctx)
}

/// The listing search call, as opposed to the `upcoming` preview call the
/// page also issues against the same endpoint.
fn is_data_api_call(url: &str) -> bool {
    url.starts_with(API_URL) && !url.contains("upcoming")
}

/// Header pairs usable on a plain HTTP replay. HTTP/2 pseudo-headers
/// (`:authority` etc.) show up in CDP captures and must be dropped.
fn replayable_headers(headers: &Headers) -> Vec<(String, String)> {
    headers
        .inner()
        .as_object()
        .map(|map| {
            map.iter()
                .filter(|(name, _)| !name.starts_with(':'))
                .filter_map(|(name, value)| {
                    value.as_str().map(|v| (name.clone(), v.to_string()))
                })
                .collect()
        })
        .unwrap_or_default()
}

async fn read_json_body(page: &Page, request_id: &RequestId) -> Result<Value, ScraperError> {
    let body = page
        .execute(GetResponseBodyParams::new(request_id.clone()))
        .await
        .map_err(|e| ScraperError::Network(e.to_string()))?;

    let raw = if body.base64_encoded {
        let bytes = BASE64
            .decode(body.body.as_bytes())
            .map_err(|e| ScraperError::JsonParse(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| ScraperError::JsonParse(e.to_string()))?
    } else {
        body.body.clone()
    };

    serde_json::from_str(&raw).map_err(|e| ScraperError::JsonParse(e.to_string()))
}
