pub mod listing;

pub use listing::{AuctionType, CanonicalListing};
