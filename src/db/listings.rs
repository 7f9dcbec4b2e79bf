use crate::db::connection::Database;
use crate::domain::listing::{CanonicalListing, StoredListing};
use crate::errors::ServerError;
use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, OptionalExtension, Transaction};

/// Counts for one committed batch of normalized records.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub new_listings: usize,
    pub seen: usize,
    pub skipped: usize,
}

/// Insert-or-refresh one normalized listing inside an open transaction.
/// Returns true only when a brand-new row was created.
///
/// Rules:
/// - empty external_id: cannot be deduped, no-op
/// - auction already ended at observation time: no-op, whether new or known
/// - known external_id: refresh only current_bid / bid_count; identity and
///   descriptive fields stay exactly as first stored
/// - unknown external_id: insert everything, plus the primary image row
pub fn upsert_listing(
    tx: &Transaction,
    listing: &CanonicalListing,
    now: NaiveDateTime,
) -> Result<bool, ServerError> {
    if listing.external_id.is_empty() {
        return Ok(false);
    }

    if let Some(end) = listing.auction_end_time {
        if end < now {
            return Ok(false);
        }
    }

    let existing: Option<i64> = tx
        .query_row(
            "SELECT id FROM listings WHERE external_id = ?1",
            params![listing.external_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    if let Some(id) = existing {
        tx.execute(
            "UPDATE listings SET current_bid = ?1, bid_count = ?2, updated_at = ?3 WHERE id = ?4",
            params![listing.current_bid, listing.bid_count, now, id],
        )
        .map_err(|e| ServerError::DbError(e.to_string()))?;
        return Ok(false);
    }

    tx.execute(
        r#"
        INSERT INTO listings (
            external_id, url,
            facility_name, facility_address, city, state, zip_code, unit_number,
            unit_size, unit_size_sqft, description,
            auction_end_time, auction_type,
            current_bid, bid_count,
            scraped_at, updated_at
        ) VALUES (
            ?1, ?2,
            ?3, ?4, ?5, ?6, ?7, ?8,
            ?9, ?10, ?11,
            ?12, ?13,
            ?14, ?15,
            ?16, ?17
        )
        "#,
        params![
            listing.external_id,
            listing.url,
            listing.facility_name,
            listing.facility_address,
            listing.city,
            listing.state,
            listing.zip_code,
            listing.unit_number,
            listing.unit_size,
            listing.unit_size_sqft,
            listing.description,
            listing.auction_end_time,
            listing.auction_type.as_str(),
            listing.current_bid,
            listing.bid_count,
            now,
            now,
        ],
    )
    .map_err(|e| ServerError::DbError(e.to_string()))?;

    let listing_id = tx.last_insert_rowid();

    if let Some(image_url) = &listing.primary_image_url {
        tx.execute(
            "INSERT INTO listing_images (listing_id, url, order_index) VALUES (?1, ?2, 0)",
            params![listing_id, image_url],
        )
        .map_err(|e| ServerError::DbError(e.to_string()))?;
    }

    Ok(true)
}

/// Apply one scrape batch in a single transaction, committed once.
/// Per-record failures are logged and skipped; they never abort the batch,
/// since every record is independently upsertable and re-running is safe.
pub fn save_listings(
    db: &Database,
    listings: &[CanonicalListing],
) -> Result<BatchOutcome, ServerError> {
    let now = Utc::now().naive_utc();

    db.with_conn(|conn| {
        let tx = conn
            .transaction()
            .map_err(|e| ServerError::DbError(e.to_string()))?;

        let mut outcome = BatchOutcome::default();
        for listing in listings {
            match upsert_listing(&tx, listing, now) {
                Ok(true) => outcome.new_listings += 1,
                Ok(false) => outcome.seen += 1,
                Err(e) => {
                    eprintln!("⚠️ Upsert failed for {}: {e}", listing.external_id);
                    outcome.skipped += 1;
                }
            }
        }

        tx.commit()
            .map_err(|e| ServerError::DbError(e.to_string()))?;

        Ok(outcome)
    })
}

const LISTING_COLUMNS: &str = r#"
    id, external_id, url,
    facility_name, facility_address, city, state, zip_code, unit_number,
    unit_size, unit_size_sqft, description,
    auction_end_time, auction_type,
    current_bid, bid_count,
    status, watched
"#;

fn row_to_listing(row: &rusqlite::Row) -> rusqlite::Result<StoredListing> {
    Ok(StoredListing {
        id: row.get(0)?,
        external_id: row.get(1)?,
        url: row.get(2)?,
        facility_name: row.get(3)?,
        facility_address: row.get(4)?,
        city: row.get(5)?,
        state: row.get(6)?,
        zip_code: row.get(7)?,
        unit_number: row.get(8)?,
        unit_size: row.get(9)?,
        unit_size_sqft: row.get(10)?,
        description: row.get(11)?,
        auction_end_time: row.get(12)?,
        auction_type: row.get(13)?,
        current_bid: row.get(14)?,
        bid_count: row.get(15)?,
        status: row.get(16)?,
        watched: row.get(17)?,
    })
}

pub fn find_by_external_id(
    db: &Database,
    external_id: &str,
) -> Result<Option<StoredListing>, ServerError> {
    db.with_conn(|conn| {
        let sql = format!("SELECT {LISTING_COLUMNS} FROM listings WHERE external_id = ?1");
        conn.query_row(&sql, params![external_id], row_to_listing)
            .optional()
            .map_err(|e| ServerError::DbError(e.to_string()))
    })
}

/// Listings whose auction has not yet ended, soonest-ending first.
/// Rows with no known end time sort last.
pub fn get_active_listings(
    db: &Database,
    state: Option<&str>,
) -> Result<Vec<StoredListing>, ServerError> {
    let now = Utc::now().naive_utc();

    db.with_conn(|conn| {
        let base = format!(
            r#"
            SELECT {LISTING_COLUMNS} FROM listings
            WHERE (auction_end_time IS NULL OR auction_end_time > ?1)
            "#
        );
        let (sql, has_state) = match state {
            Some(_) => (
                format!("{base} AND state = ?2 ORDER BY auction_end_time IS NULL, auction_end_time ASC"),
                true,
            ),
            None => (
                format!("{base} ORDER BY auction_end_time IS NULL, auction_end_time ASC"),
                false,
            ),
        };

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| ServerError::DbError(e.to_string()))?;

        let rows = if has_state {
            stmt.query_map(params![now, state.unwrap()], row_to_listing)
        } else {
            stmt.query_map(params![now], row_to_listing)
        }
        .map_err(|e| ServerError::DbError(e.to_string()))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row.map_err(|e| ServerError::DbError(e.to_string()))?);
        }
        Ok(out)
    })
}
