//! IO utilities for loading listing tables.

pub mod listing_csv;

pub use listing_csv::{read_listings_csv, read_listings_csv_with_config, ListingReaderConfig};
