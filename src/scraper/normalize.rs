use crate::domain::listing::{AuctionType, CanonicalListing};
use crate::scraper::models::SITE_URL;
use chrono::NaiveDateTime;
use serde_json::Value;

/// Format of `expire_date.utc.datetime` on the wire.
const END_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Map one raw auction object into a canonical listing.
///
/// Pure and total over well-formed-or-not input: any missing or malformed
/// field degrades to its optional default. The only way to get `None` back is
/// a record without an auction id, which cannot be deduped and is dropped.
pub fn normalize(raw: &Value) -> Option<CanonicalListing> {
    let external_id = external_id(raw)?;

    let state = string_field(raw, "state");
    let city = string_field(raw, "city");

    let state_slug = state.as_deref().unwrap_or("").to_lowercase();
    let city_slug = city
        .as_deref()
        .unwrap_or("")
        .to_lowercase()
        .replace(' ', "-");
    let url = format!("{SITE_URL}/auctions/{state_slug}/{city_slug}/{external_id}");

    Some(CanonicalListing {
        url,
        facility_name: facility_field(raw, "facility_name"),
        facility_address: facility_field(raw, "address"),
        city,
        state,
        zip_code: string_field(raw, "zipcode"),
        unit_number: stringy_field(raw, "unit_number"),
        unit_size: string_field(raw, "unit_size"),
        unit_size_sqft: raw.get("unit_volume").and_then(number_like),
        description: description(raw),
        auction_end_time: end_time(raw),
        auction_type: auction_type(raw),
        current_bid: current_bid(raw),
        bid_count: bid_count(raw),
        primary_image_url: primary_image(raw),
        external_id,
    })
}

/// Only these suffixes count as listing photos on the media CDN.
pub fn is_image_url(url: &str) -> bool {
    let path = url.split('?').next().unwrap_or(url);
    let ext = path.rsplit('.').next().unwrap_or("");
    IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
}

/// The auction id arrives as a string on most deployments and a bare number
/// on some. Either way it becomes the string identity key.
fn external_id(raw: &Value) -> Option<String> {
    match raw.get("auction_id") {
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                Some(s.to_string())
            }
        }
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn string_field(raw: &Value, key: &str) -> Option<String> {
    raw.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Like `string_field` but coerces numbers, for fields like unit_number that
/// flip between "12B" and 12 across remote deployments.
fn stringy_field(raw: &Value, key: &str) -> Option<String> {
    match raw.get(key) {
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => string_field(raw, key),
    }
}

/// Accepts numbers or numeric strings.
fn number_like(v: &Value) -> Option<f64> {
    v.as_f64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
}

/// Facility fields appear either flat on the record or nested under
/// `facility`, depending on the remote deployment.
fn facility_field(raw: &Value, key: &str) -> Option<String> {
    string_field(raw, key)
        .or_else(|| raw.get("facility").and_then(|f| string_field(f, key)))
}

fn end_time(raw: &Value) -> Option<NaiveDateTime> {
    let datetime = raw
        .get("expire_date")?
        .get("utc")?
        .get("datetime")?
        .as_str()?;
    NaiveDateTime::parse_from_str(datetime, END_TIME_FORMAT).ok()
}

fn current_bid(raw: &Value) -> Option<f64> {
    raw.get("current_bid")?.get("amount").and_then(number_like)
}

fn bid_count(raw: &Value) -> i64 {
    raw.get("total_bids")
        .and_then(number_like)
        .map(|n| n as i64)
        .unwrap_or(0)
}

fn auction_type(raw: &Value) -> AuctionType {
    raw.get("type")
        .or_else(|| raw.get("auction_type_id"))
        .or_else(|| raw.get("auction_type"))
        .map(AuctionType::from_raw)
        .unwrap_or(AuctionType::Unknown)
}

/// Up to two free-text fields joined with a blank line.
fn description(raw: &Value) -> Option<String> {
    let parts: Vec<String> = ["unit_contents", "unit_additional"]
        .iter()
        .filter_map(|key| string_field(raw, key))
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n\n"))
    }
}

fn primary_image(raw: &Value) -> Option<String> {
    raw.get("image")
        .and_then(|img| string_field(img, "image_path"))
        .filter(|path| is_image_url(path))
}
