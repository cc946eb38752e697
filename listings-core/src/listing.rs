use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::extract::{
    extract_location, extract_make_model, extract_mileage, extract_price, extract_year,
};
use crate::feed::RawEntry;

pub const SOURCE_NAME: &str = "Craigslist";
pub const DEFAULT_YEAR: u32 = 2020;
pub const DEFAULT_MILEAGE: u64 = 50_000;
pub const DEFAULT_LOCATION: &str = "Oregon";
pub const DEFAULT_CONDITION: &str = "Good";
pub const DEFAULT_VEHICLE_TYPE: &str = "sedan";
/// Listings priced strictly below this are flagged as deals.
pub const DEAL_PRICE_THRESHOLD: u64 = 20_000;

/// A normalized vehicle listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub id: i64,
    pub title: String,
    pub make: String,
    pub model: String,
    pub year: u32,
    pub price: u64,
    pub mileage: u64,
    pub location: String,
    pub source: String,
    pub link: String,
    pub posted: NaiveDateTime,
    pub condition: String,
    pub vehicle_type: String,
    pub image: String,
}

/// Stable identifier for a link: the first eight bytes of its SHA-256
/// digest, big-endian, with the sign bit cleared.
pub fn listing_id(link: &str) -> i64 {
    let digest = Sha256::digest(link.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(prefix) & i64::MAX as u64) as i64
}

impl Listing {
    /// Runs the extractor chain over an entry. `None` when no positive price
    /// can be found; every other field falls back to its default.
    pub fn from_entry(entry: &RawEntry, fetched_at: NaiveDateTime) -> Option<Self> {
        let price = extract_price(&entry.title).filter(|price| *price > 0)?;
        let name = extract_make_model(&entry.title);

        Some(Self {
            id: listing_id(&entry.link),
            title: entry.title.clone(),
            make: name.make_or_unknown().to_owned(),
            model: name.model_or_fallback(),
            year: extract_year(&entry.title).unwrap_or(DEFAULT_YEAR),
            price,
            mileage: extract_mileage(&entry.title)
                .filter(|miles| *miles > 0)
                .unwrap_or(DEFAULT_MILEAGE),
            location: entry
                .summary
                .as_deref()
                .and_then(extract_location)
                .unwrap_or_else(|| DEFAULT_LOCATION.to_owned()),
            source: SOURCE_NAME.to_owned(),
            link: entry.link.clone(),
            posted: entry
                .published_at
                .map(|dt| dt.naive_utc())
                .unwrap_or(fetched_at),
            condition: DEFAULT_CONDITION.to_owned(),
            vehicle_type: DEFAULT_VEHICLE_TYPE.to_owned(),
            image: entry.media.first().cloned().unwrap_or_default(),
        })
    }

    pub fn is_deal(&self) -> bool {
        self.price < DEAL_PRICE_THRESHOLD
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListingJson<'a> {
    id: i64,
    title: &'a str,
    make: &'a str,
    model: &'a str,
    year: u32,
    price: u64,
    mileage: u64,
    location: &'a str,
    source: &'a str,
    link: &'a str,
    posted: &'a NaiveDateTime,
    condition: &'a str,
    #[serde(rename = "type")]
    vehicle_type: &'a str,
    is_deal: bool,
    image: &'a str,
}

impl Serialize for Listing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ListingJson {
            id: self.id,
            title: &self.title,
            make: &self.make,
            model: &self.model,
            year: self.year,
            price: self.price,
            mileage: self.mileage,
            location: &self.location,
            source: &self.source,
            link: &self.link,
            posted: &self.posted,
            condition: &self.condition,
            vehicle_type: &self.vehicle_type,
            is_deal: self.is_deal(),
            image: &self.image,
        }
        .serialize(serializer)
    }
}
