// src/tests/router_tests/api_tests.rs

use crate::db::scrapes;
use crate::errors::ServerError;
use crate::router::handle;
use crate::scraper::normalize::normalize;
use crate::tests::router_tests::{body_string, request};
use crate::tests::utils::{make_db, sample_raw};
use http::Method;
use serde_json::json;

#[test]
fn health_endpoint_reports_ok() {
    let db = make_db("router_health");
    let resp = handle(request(Method::GET, "/api/health", String::new()), &db).unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "application/json"
    );
    assert!(body_string(resp).contains("\"status\":\"ok\""));
}

#[test]
fn unknown_route_is_not_found() {
    let db = make_db("router_404");
    let result = handle(request(Method::GET, "/api/nope", String::new()), &db);
    assert!(matches!(result, Err(ServerError::NotFound)));
}

#[test]
fn listings_endpoint_filters_by_state() {
    let db = make_db("router_listings");

    let fl = normalize(&sample_raw("FL1")).unwrap();
    let mut tx_raw = sample_raw("TX1");
    tx_raw["state"] = json!("TX");
    let tx = normalize(&tx_raw).unwrap();
    crate::db::listings::save_listings(&db, &[fl, tx]).unwrap();

    let all = body_string(
        handle(request(Method::GET, "/api/listings", String::new()), &db).unwrap(),
    );
    assert!(all.contains("FL1"));
    assert!(all.contains("TX1"));

    let only_fl = body_string(
        handle(
            request(Method::GET, "/api/listings?state=FL", String::new()),
            &db,
        )
        .unwrap(),
    );
    assert!(only_fl.contains("FL1"));
    assert!(!only_fl.contains("TX1"));
}

#[test]
fn scrape_runs_round_trip_through_the_api() {
    let db = make_db("router_scrapes");

    db.with_conn(|conn| {
        let run_id = scrapes::start_scrape_run(conn, "FL", 1_700_000_000)?;
        scrapes::end_scrape_run(conn, run_id, 1_700_000_060, 3, 45, 12, true, None)
    })
    .unwrap();

    let body = body_string(
        handle(request(Method::GET, "/api/scrapes", String::new()), &db).unwrap(),
    );
    assert!(body.contains("\"search_term\":\"FL\""));
    assert!(body.contains("\"new_listings\":12"));
    assert!(body.contains("\"success\":true"));
}
