// src/tests/router_tests/scraper_run_tests.rs

use crate::errors::ServerError;
use crate::router::{filter_type_codes, handle};
use crate::tests::router_tests::request;
use crate::tests::utils::make_db;
use http::Method;

#[test]
fn scraper_run_requires_a_region() {
    let db = make_db("router_region");
    let result = handle(
        request(Method::POST, "/api/scraper/run", "{}".to_string()),
        &db,
    );
    assert!(matches!(result, Err(ServerError::BadRequest(_))));
}

#[test]
fn scraper_run_rejects_malformed_json() {
    let db = make_db("router_badjson");
    let result = handle(
        request(Method::POST, "/api/scraper/run", "not json".to_string()),
        &db,
    );
    assert!(matches!(result, Err(ServerError::BadRequest(_))));
}

#[test]
fn auction_type_names_map_to_codes() {
    let named = vec!["lien".to_string(), "charity".to_string()];
    assert_eq!(filter_type_codes(&named), "1,4");

    let mixed = vec!["manager special".to_string(), "2".to_string()];
    assert_eq!(filter_type_codes(&mixed), "2,3");

    let duped = vec!["private".to_string(), "non_lien".to_string(), "2".to_string()];
    assert_eq!(filter_type_codes(&duped), "2");

    // Unknown codes pass through instead of erroring.
    let unknown = vec!["7".to_string(), "lien".to_string()];
    assert_eq!(filter_type_codes(&unknown), "1,7");

    // No selection means all types.
    assert_eq!(filter_type_codes(&[]), "1,2,3,4");
}
