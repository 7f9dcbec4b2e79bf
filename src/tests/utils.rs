use crate::db::connection::{init_db, Database};
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

/// Returns a fresh test database using the production schema
pub fn make_db(label: &str) -> Database {
    let path = std::env::temp_dir().join(format!(
        "{label}_{}.sqlite",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let db = Database::new(path.to_string_lossy().into_owned());
    init_db(&db, "sql/schema.sql").expect("Failed to initialize DB");
    db
}

/// A raw auction record shaped like the remote API's payload.
pub fn sample_raw(id: &str) -> Value {
    json!({
        "auction_id": id,
        "state": "FL",
        "city": "Tampa",
        "zipcode": "33601",
        "unit_number": "B12",
        "unit_size": "10x10",
        "unit_volume": "100",
        "facility_name": "Tampa Self Storage",
        "address": "100 Main St",
        "unit_contents": "Boxes, furniture",
        "expire_date": { "utc": { "datetime": "2099-01-01 00:00:00" } },
        "current_bid": { "amount": 50 },
        "total_bids": 2,
        "type": 1,
        "image": { "image_path": "https://media.st-prd-1.aws.storagetreasures.com/data/auctions/images/1/2/thumb.jpg" }
    })
}
