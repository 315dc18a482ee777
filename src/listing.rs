use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde_json::Value;

use crate::api::RawItem;
use crate::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingType {
    Auction,
    AuctionWithBin,
    Classified,
    FixedPrice,
    StoreInventory,
    Other(String),
}

impl ListingType {
    pub fn as_str(&self) -> &str {
        match self {
            ListingType::Auction => "Auction",
            ListingType::AuctionWithBin => "AuctionWithBIN",
            ListingType::Classified => "Classified",
            ListingType::FixedPrice => "FixedPrice",
            ListingType::StoreInventory => "StoreInventory",
            ListingType::Other(raw) => raw.as_str(),
        }
    }
}

impl From<&str> for ListingType {
    fn from(raw: &str) -> Self {
        match raw {
            "Auction" => ListingType::Auction,
            "AuctionWithBIN" => ListingType::AuctionWithBin,
            "Classified" => ListingType::Classified,
            "FixedPrice" => ListingType::FixedPrice,
            "StoreInventory" => ListingType::StoreInventory,
            other => ListingType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ListingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A search result flattened to the columns the report needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub title: String,
    pub item_url: String,
    pub image_url: String,
    pub location: String,
    pub postal_code: String,
    pub listing_type: ListingType,
    pub buy_it_now_available: bool,
    /// Always exactly two decimal places.
    pub current_price: String,
    pub end_time: DateTime<FixedOffset>,
}

impl Listing {
    /// Anything that isn't a plain auction can be bought outright; an auction only when
    /// the seller added a Buy It Now price.
    pub fn buy_it_now(&self) -> bool {
        self.listing_type != ListingType::Auction || self.buy_it_now_available
    }
}

pub fn normalize(raw: &RawItem) -> Result<Listing> {
    let info = raw.listing_info.as_ref();

    let listing_type = info
        .and_then(|i| i.listing_type.as_deref())
        .map(ListingType::from)
        .unwrap_or_else(|| ListingType::Other(String::new()));

    let buy_it_now_available = info
        .and_then(|i| i.buy_it_now_available.as_deref())
        .is_some_and(|flag| flag == "true");

    let price = raw
        .selling_status
        .as_ref()
        .and_then(|s| s.current_price.as_ref())
        .and_then(|p| p.value.as_ref());
    let current_price = match price {
        Some(value) => format_price(value)?,
        None => return Err(AppError::MalformedPrice(String::new())),
    };

    let end_time = match info.and_then(|i| i.end_time.as_deref()) {
        Some(raw_end) => parse_end_time(raw_end)?,
        None => {
            return Err(AppError::MalformedTimestamp {
                value: String::new(),
                reason: "listing has no endTime".to_string(),
            })
        }
    };

    Ok(Listing {
        title: raw.title.clone().unwrap_or_default(),
        item_url: raw.view_item_url.clone().unwrap_or_default(),
        image_url: raw.gallery_url.clone().unwrap_or_default(),
        location: raw.location.clone().unwrap_or_default(),
        postal_code: raw.postal_code.clone().unwrap_or_default(),
        listing_type,
        buy_it_now_available,
        current_price,
        end_time,
    })
}

/// Normalizes every record, keeping order. The first bad record fails the whole batch.
pub fn normalize_all(raw: &[RawItem]) -> Result<Vec<Listing>> {
    let mut listings = Vec::with_capacity(raw.len());
    for item in raw {
        listings.push(normalize(item)?);
    }
    Ok(listings)
}

/// Fixed-point text with two decimals. eBay sends the amount as a string, but plain JSON
/// numbers are accepted too.
pub fn format_price(value: &Value) -> Result<String> {
    let amount = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match amount {
        Some(amount) if amount.is_finite() => Ok(format!("{:.2}", amount)),
        _ => Err(AppError::MalformedPrice(value.to_string())),
    }
}

/// Parses an eBay timestamp such as `2024-01-01T12:00:00.000Z`. The trailing `Z` is
/// rewritten as `+00:00` first.
pub fn parse_end_time(raw: &str) -> Result<DateTime<FixedOffset>> {
    let normalized = match raw.strip_suffix('Z') {
        Some(stem) => format!("{}+00:00", stem),
        None => raw.to_string(),
    };

    DateTime::parse_from_rfc3339(&normalized).map_err(|e| AppError::MalformedTimestamp {
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
