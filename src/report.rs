use std::fmt::Display;

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::api::Query;
use crate::error::Result;
use crate::listing::Listing;

const TITLE_CHARS: usize = 25;
const HOME_COUNTRY_SUFFIX: &str = ",United Kingdom";

const TABLE_HEADER: &str = "| Item | Image | Location | Price | Type | BiN? | End |";
const TABLE_ALIGN: &str = "| ---- | ----- | -------- | ----: | :--: | :--: | :-: |";

/// Renders the markdown report: heading, run timestamp, the query that was sent and one
/// table row per listing, in the order given.
pub fn render<Tz>(query: &Query, timestamp: &DateTime<Tz>, listings: &[Listing]) -> Result<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let query_json = pretty_json(query)?;

    let mut out = String::with_capacity(512 + query_json.len() + listings.len() * 320);
    out.push_str("# eBay Search Results\n");
    out.push_str(&format!("## {}\n", timestamp.format("%A - %d-%b-%Y - %H:%M")));
    out.push_str("Searching for:\n");
    out.push_str("```json\n");
    out.push_str(&query_json);
    out.push_str("\n```\n");
    out.push_str(TABLE_HEADER);
    out.push('\n');
    out.push_str(TABLE_ALIGN);
    out.push('\n');

    for listing in listings {
        out.push_str(&render_row(listing));
        out.push('\n');
    }

    Ok(out)
}

pub fn render_row(listing: &Listing) -> String {
    let short_title: String = listing.title.chars().take(TITLE_CHARS).collect();

    format!(
        "| [{}...]({} \"{}\")  | ![image]({}) | {} | `{}` | {} | {} | `{}` |",
        escape_cell(&short_title),
        listing.item_url,
        escape_cell(&listing.title.replace('"', "\\\"")),
        listing.image_url,
        escape_cell(display_location(&listing.location)),
        listing.current_price,
        escape_cell(listing.listing_type.as_str()),
        buy_it_now_label(listing),
        listing.end_time.format("%Y-%m-%d %H:%M"),
    )
}

/// Drops the country from UK locations ("London,United Kingdom" -> "London").
pub fn display_location(location: &str) -> &str {
    location.strip_suffix(HOME_COUNTRY_SUFFIX).unwrap_or(location)
}

pub fn buy_it_now_label(listing: &Listing) -> &'static str {
    if listing.buy_it_now() { "Yes" } else { "No" }
}

// serde_json's pretty printer indents with two spaces unless told otherwise.
fn pretty_json<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
