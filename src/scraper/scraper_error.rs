use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum ScraperError {
    Launch(String),
    Runtime(String),
    Navigation(String),
    Network(String),
    HttpStatus(u16),
    JsonParse(String),
}

impl fmt::Display for ScraperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScraperError::Launch(msg) => write!(f, "Browser launch failed: {msg}"),
            ScraperError::Runtime(msg) => write!(f, "Async runtime error: {msg}"),
            ScraperError::Navigation(msg) => write!(f, "Navigation error: {msg}"),
            ScraperError::Network(msg) => write!(f, "Network error: {msg}"),
            ScraperError::HttpStatus(code) => write!(f, "HTTP status {code}"),
            ScraperError::JsonParse(msg) => write!(f, "JSON parse error: {msg}"),
        }
    }
}

impl Error for ScraperError {}
