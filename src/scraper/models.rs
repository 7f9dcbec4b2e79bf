use serde::Deserialize;
use serde_json::Value;
use url::Url;

/// The site's data API. Pages are plain GETs against this endpoint once a
/// browser session has produced a passable header set.
pub const API_URL: &str = "https://api.st-prd-1.aws.storagetreasures.com/p/auctions";
pub const SITE_URL: &str = "https://www.storagetreasures.com";

/// Fixed page size the site itself uses.
pub const PAGE_SIZE: u32 = 15;

/// Target filters for one scrape run: a state code OR a zip+radius,
/// plus the comma-joined auction-type codes to request.
#[derive(Debug, Clone)]
pub struct SearchFilters {
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub radius_miles: u32,
    pub filter_types: String,
}

impl SearchFilters {
    pub fn for_state(state: impl Into<String>) -> Self {
        Self {
            state: Some(state.into()),
            zip_code: None,
            radius_miles: 50,
            filter_types: "1,2,3,4".to_string(),
        }
    }

    pub fn for_zip(zip_code: impl Into<String>, radius_miles: u32) -> Self {
        Self {
            state: None,
            zip_code: Some(zip_code.into()),
            radius_miles,
            filter_types: "1,2,3,4".to_string(),
        }
    }

    pub fn search_type(&self) -> &'static str {
        if self.state.is_some() {
            "state"
        } else {
            "zipcode"
        }
    }

    pub fn search_term(&self) -> &str {
        self.state
            .as_deref()
            .or(self.zip_code.as_deref())
            .unwrap_or("")
    }

    /// The human-facing search page the browser navigates to.
    pub fn search_url(&self) -> String {
        let mut url = Url::parse(SITE_URL).expect("site url is valid");
        url.set_path("/auctions");
        {
            let mut q = url.query_pairs_mut();
            if let Some(state) = &self.state {
                q.append_pair("state", state);
            } else if let Some(zip) = &self.zip_code {
                q.append_pair("type", "zipcode");
                q.append_pair("radius", &self.radius_miles.to_string());
                q.append_pair("search_term", zip);
            }
        }
        url.into()
    }
}

/// Ephemeral state for one scrape run: the header set captured from the
/// browser's own data-API request, plus the page-1 payload that arrived with
/// it. Built once by the bootstrap step, handed by value to the pagination
/// fetcher, and discarded when the run ends. Never persisted.
#[derive(Debug, Default)]
pub struct SessionContext {
    pub headers: Vec<(String, String)>,
    pub first_page: Vec<Value>,
    pub total_records: u64,
}

impl SessionContext {
    pub fn has_headers(&self) -> bool {
        !self.headers.is_empty()
    }

    /// Both halves of the capture are in hand: a replayable header set and a
    /// non-empty page-1 payload. The bootstrap loop can stop waiting.
    pub fn is_complete(&self) -> bool {
        self.has_headers() && !self.first_page.is_empty()
    }
}

/// Wire shape of one page of the data API's response. The auction objects
/// themselves stay opaque `Value`s; their schema is not stable enough for a
/// strict decode, and one odd record must never sink the page.
#[derive(Debug, Default, Deserialize)]
pub struct AuctionsPage {
    #[serde(default)]
    pub auctions: Vec<Value>,
    #[serde(default)]
    pub total_records: u64,
}
