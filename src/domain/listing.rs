use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;

/// Auction type codes used by the remote API.
/// Anything we don't recognize collapses to `Unknown` rather than erroring,
/// since the remote schema shifts between their deployments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuctionType {
    Lien,
    Private,
    ManagerSpecial,
    Charity,
    Unknown,
}

impl AuctionType {
    pub fn from_code(code: i64) -> AuctionType {
        match code {
            1 => AuctionType::Lien,
            2 => AuctionType::Private,
            3 => AuctionType::ManagerSpecial,
            4 => AuctionType::Charity,
            _ => AuctionType::Unknown,
        }
    }

    pub fn from_name(name: &str) -> AuctionType {
        match name.trim().to_lowercase().as_str() {
            "lien" => AuctionType::Lien,
            "private" | "private_seller" | "non_lien" => AuctionType::Private,
            "manager_special" | "manager special" => AuctionType::ManagerSpecial,
            "charity" => AuctionType::Charity,
            _ => AuctionType::Unknown,
        }
    }

    /// The raw field can arrive as a number, a numeric string, or a name.
    pub fn from_raw(raw: &Value) -> AuctionType {
        if let Some(code) = raw.as_i64() {
            return AuctionType::from_code(code);
        }
        if let Some(s) = raw.as_str() {
            if let Ok(code) = s.trim().parse::<i64>() {
                return AuctionType::from_code(code);
            }
            return AuctionType::from_name(s);
        }
        AuctionType::Unknown
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuctionType::Lien => "lien",
            AuctionType::Private => "private",
            AuctionType::ManagerSpecial => "manager_special",
            AuctionType::Charity => "charity",
            AuctionType::Unknown => "unknown",
        }
    }
}

/// The normalized, store-ready form of one raw auction record.
///
/// `external_id` is the remote marketplace's stable id and the only dedup key.
/// Everything except `current_bid` / `bid_count` is write-once: set when the
/// row is first created, never overwritten by later scrapes.
#[derive(Debug, Clone, Serialize)]
pub struct CanonicalListing {
    pub external_id: String,
    pub url: String,

    pub facility_name: Option<String>,
    pub facility_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub unit_number: Option<String>,

    pub unit_size: Option<String>,
    pub unit_size_sqft: Option<f64>,
    pub description: Option<String>,

    pub auction_end_time: Option<NaiveDateTime>,
    pub auction_type: AuctionType,

    pub current_bid: Option<f64>,
    pub bid_count: i64,

    pub primary_image_url: Option<String>,
}

/// A listing row as read back from the store, for API responses and for
/// checking what a scrape actually wrote.
#[derive(Debug, Clone, Serialize)]
pub struct StoredListing {
    pub id: i64,
    pub external_id: String,
    pub url: String,

    pub facility_name: Option<String>,
    pub facility_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub unit_number: Option<String>,

    pub unit_size: Option<String>,
    pub unit_size_sqft: Option<f64>,
    pub description: Option<String>,

    pub auction_end_time: Option<NaiveDateTime>,
    pub auction_type: Option<String>,

    pub current_bid: Option<f64>,
    pub bid_count: i64,

    pub status: String,
    pub watched: bool,
}
