pub mod aggregate;
pub mod config;
pub mod error;
pub mod extract;
pub mod feed;
pub mod fetch;
pub mod listing;
pub mod query;
pub mod search;
pub mod sources;

pub use aggregate::{aggregate, dedup_by_link, merge, Aggregate, SourceFailure};
pub use config::{AppConfig, FetchConfig};
pub use error::{ConfigError, FetchError, QueryError};
pub use feed::{parse_feed, RawEntry};
pub use fetch::fetch_source;
pub use listing::{listing_id, Listing};
pub use query::{ListingQuery, SearchResult, RESULT_LIMIT};
pub use search::search;
pub use sources::{Area, PriceBounds, SourceCatalog, SourceEndpoint};
