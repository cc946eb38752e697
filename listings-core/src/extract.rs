//! Heuristic field extraction from free-text listing titles and descriptions.
//!
//! Every extractor is a pure function that reports absence with `None`.
//! Display defaults are applied later, when a [`crate::Listing`] is built.

use lazy_static::lazy_static;
use regex::Regex;

/// Manufacturer names matched against title tokens, in priority order.
pub const KNOWN_MAKES: &[&str] = &[
    "toyota",
    "honda",
    "ford",
    "chevrolet",
    "chevy",
    "nissan",
    "bmw",
    "mercedes",
    "audi",
    "volkswagen",
    "vw",
    "mazda",
    "subaru",
    "tesla",
    "jeep",
    "ram",
    "dodge",
    "hyundai",
    "kia",
];

/// Mileage figures below this are read as thousands ("80mi" means 80,000).
const MILEAGE_SHORTHAND_LIMIT: u64 = 500;

lazy_static! {
    static ref PRICE_REGEX: Regex = Regex::new(r"\$(\d[\d,]*)").unwrap();
    static ref YEAR_REGEX: Regex = Regex::new(r"\b(19\d{2}|20\d{2})\b").unwrap();
    static ref MILEAGE_REGEX: Regex =
        Regex::new(r"(?i)(\d{1,3}(?:,\d{3})+|\d+)k?\s*mi(?:les?|leage)?\b").unwrap();
    static ref LOCATION_REGEX: Regex =
        Regex::new(r"([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*),?\s*(OR|WA)\b").unwrap();
}

/// Make and model guessed from a title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleName {
    pub make: Option<&'static str>,
    pub model: Option<String>,
    /// Title with price and year removed, used as the model fallback.
    pub remainder: String,
}

impl VehicleName {
    pub fn make_or_unknown(&self) -> &'static str {
        self.make.unwrap_or("unknown")
    }

    pub fn model_or_fallback(&self) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| self.remainder.chars().take(30).collect())
    }
}

fn parse_grouped_digits(digits: &str) -> Option<u64> {
    digits.replace(',', "").parse().ok()
}

pub fn extract_price(title: &str) -> Option<u64> {
    let caps = PRICE_REGEX.captures(title)?;
    parse_grouped_digits(&caps[1])
}

pub fn extract_year(title: &str) -> Option<u32> {
    let caps = YEAR_REGEX.captures(title)?;
    caps[1].parse().ok()
}

/// First lexicon entry contained in any token wins; tokens are scanned in
/// title order and the lexicon in table order, so "chevrolet" never loses
/// to "chevy" and "ram" matches inside "tramway".
pub fn extract_make_model(title: &str) -> VehicleName {
    let without_price = PRICE_REGEX.replace_all(title, "");
    let remainder = YEAR_REGEX.replace_all(&without_price, "").trim().to_string();

    let lowered = remainder.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();

    for (i, word) in words.iter().enumerate() {
        if let Some(make) = KNOWN_MAKES.iter().copied().find(|make| word.contains(make)) {
            let following = &words[(i + 1).min(words.len())..(i + 3).min(words.len())];
            let model = (!following.is_empty()).then(|| following.join(" "));
            return VehicleName {
                make: Some(make),
                model,
                remainder,
            };
        }
    }

    VehicleName {
        make: None,
        model: None,
        remainder,
    }
}

pub fn extract_mileage(title: &str) -> Option<u64> {
    let caps = MILEAGE_REGEX.captures(title)?;
    let miles = parse_grouped_digits(&caps[1])?;
    if miles < MILEAGE_SHORTHAND_LIMIT {
        miles.checked_mul(1000)
    } else {
        Some(miles)
    }
}

pub fn extract_location(description: &str) -> Option<String> {
    let caps = LOCATION_REGEX.captures(description)?;
    Some(format!("{}, {}", &caps[1], &caps[2]))
}
