use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::listing::Listing;
use crate::sources::PriceBounds;

/// Maximum number of listings returned by one query.
pub const RESULT_LIMIT: usize = 100;

/// Caller-supplied filters, read from camelCase query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListingQuery {
    pub min_price: u64,
    pub max_price: u64,
    pub make: String,
    pub max_mileage: u64,
    pub year_from: u32,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            min_price: 0,
            max_price: 1_000_000,
            make: String::new(),
            max_mileage: 500_000,
            year_from: 1990,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    /// Matches after filtering, before truncation.
    pub count: usize,
    pub listings: Vec<Listing>,
}

impl ListingQuery {
    pub fn validate(&self) -> Result<(), QueryError> {
        if self.min_price > self.max_price {
            return Err(QueryError::InvalidPriceRange {
                min: self.min_price,
                max: self.max_price,
            });
        }
        Ok(())
    }

    /// Price filtering happens at the source, not here.
    pub fn price_bounds(&self) -> PriceBounds {
        PriceBounds {
            min: self.min_price,
            max: self.max_price,
        }
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        let make = self.make.trim().to_lowercase();
        (make.is_empty() || listing.make.to_lowercase().contains(&make))
            && listing.mileage <= self.max_mileage
            && listing.year >= self.year_from
    }

    pub fn filter(&self, listings: Vec<Listing>) -> Vec<Listing> {
        listings
            .into_iter()
            .filter(|listing| self.matches(listing))
            .collect()
    }

    /// Filters, sorts newest first (stable), and truncates.
    pub fn apply(&self, listings: Vec<Listing>) -> SearchResult {
        let mut filtered = self.filter(listings);
        sort_newest_first(&mut filtered);
        let count = filtered.len();
        filtered.truncate(RESULT_LIMIT);
        SearchResult {
            count,
            listings: filtered,
        }
    }
}

pub fn sort_newest_first(listings: &mut [Listing]) {
    listings.sort_by(|a, b| b.posted.cmp(&a.posted));
}
