mod api_tests;
mod scraper_run_tests;

pub use api_tests::*;
pub use scraper_run_tests::*;

use astra::{Body, Request, Response};
use http::Method;
use std::io::Read;

pub fn request(method: Method, uri: &str, body: String) -> Request {
    http::Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::from(body))
        .unwrap()
}

pub fn body_string(mut resp: Response) -> String {
    let mut bytes = Vec::new();
    resp.body_mut().reader().read_to_end(&mut bytes).unwrap();
    String::from_utf8(bytes).unwrap()
}
