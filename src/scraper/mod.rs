pub mod models;
pub mod normalize;
pub mod pagination;
mod scraper;
mod scraper_error;
pub mod session;

pub use models::{SearchFilters, SessionContext};
pub use scraper::{ScrapeOutcome, StorageTreasuresScraper};
pub use scraper_error::ScraperError;
