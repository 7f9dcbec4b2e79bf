// errors.rs
use std::fmt;

/// Errors originating from either the server logic
/// (routing, bad requests, etc.) or downstream layers (DB, scraper).
#[derive(Debug)]
pub enum ServerError {
    NotFound,
    BadRequest(String),
    DbError(String),
    ScrapeFailed(String),
    InternalError,
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::NotFound => write!(f, "Not Found"),
            ServerError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            ServerError::DbError(msg) => write!(f, "Database Error: {msg}"),
            ServerError::ScrapeFailed(msg) => write!(f, "Scrape Failed: {msg}"),
            ServerError::InternalError => write!(f, "Internal Server Error"),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<crate::scraper::ScraperError> for ServerError {
    fn from(err: crate::scraper::ScraperError) -> Self {
        ServerError::ScrapeFailed(err.to_string())
    }
}
