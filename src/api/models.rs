use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::response::first;
use crate::config::LOCATED_IN;

/// Sort keys accepted by `findItemsAdvanced`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortOrder {
    BestMatch,
    BidCountFewest,
    BidCountMost,
    CurrentPriceHighest,
    DistanceNearest,
    EndTimeSoonest,
    PricePlusShippingHighest,
    PricePlusShippingLowest,
    StartTimeNewest,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::BestMatch => "BestMatch",
            SortOrder::BidCountFewest => "BidCountFewest",
            SortOrder::BidCountMost => "BidCountMost",
            SortOrder::CurrentPriceHighest => "CurrentPriceHighest",
            SortOrder::DistanceNearest => "DistanceNearest",
            SortOrder::EndTimeSoonest => "EndTimeSoonest",
            SortOrder::PricePlusShippingHighest => "PricePlusShippingHighest",
            SortOrder::PricePlusShippingLowest => "PricePlusShippingLowest",
            SortOrder::StartTimeNewest => "StartTimeNewest",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemFilter {
    pub name: String,
    pub value: String,
}

impl ItemFilter {
    pub fn new(name: &str, value: &str) -> Self {
        ItemFilter {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInput {
    pub entries_per_page: u32,
    pub page_number: u32,
}

/// A `findItemsAdvanced` request. Serializes with eBay's field names so the report can
/// echo exactly what was asked for.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    pub keywords: String,
    pub category_id: Vec<String>,
    pub item_filter: Vec<ItemFilter>,
    pub sort_order: SortOrder,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination_input: Option<PaginationInput>,
}

impl Query {
    /// Newest listings first, located in the UK, capped at `max_price`.
    pub fn new(keywords: &str, category: &str, max_price: &str) -> Self {
        Query {
            keywords: keywords.to_string(),
            category_id: vec![category.to_string()],
            item_filter: vec![
                ItemFilter::new("LocatedIn", LOCATED_IN),
                ItemFilter::new("MaxPrice", max_price),
            ],
            sort_order: SortOrder::StartTimeNewest,
            pagination_input: None,
        }
    }

    pub fn set_page(&mut self, entries_per_page: u32, page_number: u32) {
        self.pagination_input = Some(PaginationInput {
            entries_per_page,
            page_number,
        });
    }

    /// The query in the Finding API's name-value URL syntax.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(4 + self.category_id.len() + self.item_filter.len() * 2);

        if !self.keywords.is_empty() {
            params.push(("keywords".to_string(), self.keywords.clone()));
        }
        for (i, category) in self.category_id.iter().enumerate() {
            params.push((format!("categoryId({})", i), category.clone()));
        }
        for (i, filter) in self.item_filter.iter().enumerate() {
            params.push((format!("itemFilter({}).name", i), filter.name.clone()));
            params.push((format!("itemFilter({}).value", i), filter.value.clone()));
        }
        params.push(("sortOrder".to_string(), self.sort_order.to_string()));
        if let Some(page) = &self.pagination_input {
            params.push((
                "paginationInput.entriesPerPage".to_string(),
                page.entries_per_page.to_string(),
            ));
            params.push(("paginationInput.pageNumber".to_string(), page.page_number.to_string()));
        }

        params
    }
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPage {
    pub total_pages: u32,
    pub items: Vec<RawItem>,
}

// searchResult.item[] as the Finding API returns it. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    #[serde(default, deserialize_with = "first")]
    pub title: Option<String>,
    #[serde(rename = "viewItemURL", default, deserialize_with = "first")]
    pub view_item_url: Option<String>,
    #[serde(rename = "galleryURL", default, deserialize_with = "first")]
    pub gallery_url: Option<String>,
    #[serde(default, deserialize_with = "first")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "first")]
    pub postal_code: Option<String>,
    #[serde(default, deserialize_with = "first")]
    pub listing_info: Option<ListingInfo>,
    #[serde(default, deserialize_with = "first")]
    pub selling_status: Option<SellingStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingInfo {
    #[serde(default, deserialize_with = "first")]
    pub listing_type: Option<String>,
    #[serde(default, deserialize_with = "first")]
    pub buy_it_now_available: Option<String>,
    #[serde(default, deserialize_with = "first")]
    pub end_time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellingStatus {
    #[serde(default, deserialize_with = "first")]
    pub current_price: Option<Amount>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Amount {
    #[serde(rename = "__value__", default)]
    pub value: Option<Value>,
    #[serde(rename = "@currencyId", default)]
    pub currency_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn new_query_has_fixed_location_and_sort() {
        let query = Query::new("atari xl", "162075", "100");

        assert_eq!(query.category_id, vec!["162075".to_string()]);
        assert_eq!(
            query.item_filter,
            vec![ItemFilter::new("LocatedIn", "GB"), ItemFilter::new("MaxPrice", "100")]
        );
        assert_eq!(query.sort_order, SortOrder::StartTimeNewest);
        assert!(query.pagination_input.is_none());
    }

    #[test]
    fn params_use_name_value_syntax() {
        let mut query = Query::new("atari xl", "162075", "100");
        let params = query.to_params();

        assert_eq!(param(&params, "keywords"), Some("atari xl"));
        assert_eq!(param(&params, "categoryId(0)"), Some("162075"));
        assert_eq!(param(&params, "itemFilter(0).name"), Some("LocatedIn"));
        assert_eq!(param(&params, "itemFilter(0).value"), Some("GB"));
        assert_eq!(param(&params, "itemFilter(1).name"), Some("MaxPrice"));
        assert_eq!(param(&params, "itemFilter(1).value"), Some("100"));
        assert_eq!(param(&params, "sortOrder"), Some("StartTimeNewest"));
        assert_eq!(param(&params, "paginationInput.pageNumber"), None);

        query.set_page(100, 3);
        let params = query.to_params();
        assert_eq!(param(&params, "paginationInput.entriesPerPage"), Some("100"));
        assert_eq!(param(&params, "paginationInput.pageNumber"), Some("3"));
    }

    #[test]
    fn query_serializes_with_ebay_field_names() {
        let mut query = Query::new("atari xl", "162075", "100");
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({
                "keywords": "atari xl",
                "categoryId": ["162075"],
                "itemFilter": [
                    {"name": "LocatedIn", "value": "GB"},
                    {"name": "MaxPrice", "value": "100"}
                ],
                "sortOrder": "StartTimeNewest"
            })
        );

        query.set_page(100, 2);
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value["paginationInput"], json!({"entriesPerPage": 100, "pageNumber": 2}));
    }

    #[test]
    fn raw_item_reads_wrapped_fields() {
        let item: RawItem = serde_json::from_value(json!({
            "itemId": ["1234"],
            "title": ["Atari 800XL boxed"],
            "viewItemURL": ["https://www.ebay.co.uk/itm/1234"],
            "galleryURL": ["https://i.ebayimg.com/1234.jpg"],
            "location": ["London,United Kingdom"],
            "postalCode": ["SW1A1AA"],
            "sellingStatus": [{
                "currentPrice": [{"@currencyId": "GBP", "__value__": "42.5"}],
                "sellingState": ["Active"]
            }],
            "listingInfo": [{
                "buyItNowAvailable": ["false"],
                "endTime": ["2024-01-01T12:00:00.000Z"],
                "listingType": ["Auction"]
            }]
        }))
        .unwrap();

        assert_eq!(item.title.as_deref(), Some("Atari 800XL boxed"));
        assert_eq!(item.location.as_deref(), Some("London,United Kingdom"));
        let info = item.listing_info.unwrap();
        assert_eq!(info.listing_type.as_deref(), Some("Auction"));
        assert_eq!(info.end_time.as_deref(), Some("2024-01-01T12:00:00.000Z"));
        let price = item.selling_status.unwrap().current_price.unwrap();
        assert_eq!(price.value, Some(json!("42.5")));
        assert_eq!(price.currency_id.as_deref(), Some("GBP"));
    }

    #[test]
    fn raw_item_tolerates_missing_and_unwrapped_fields() {
        let item: RawItem = serde_json::from_value(json!({
            "title": "Plain title",
            "location": []
        }))
        .unwrap();

        assert_eq!(item.title.as_deref(), Some("Plain title"));
        assert_eq!(item.location, None);
        assert_eq!(item.gallery_url, None);
        assert_eq!(item.listing_info, None);
    }
}
