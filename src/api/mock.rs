// Stub search API for unit tests: replays queued pages and records every query.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use crate::api::models::{Amount, ListingInfo, Query, RawItem, RawPage, SellingStatus};
use crate::api::SearchApi;
use crate::error::SearchFailure;

pub struct MockSearchApi {
    responses: Mutex<VecDeque<Result<RawPage, SearchFailure>>>,
    calls: Mutex<Vec<Query>>,
}

impl MockSearchApi {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_page(self, total_pages: u32, items: Vec<RawItem>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(RawPage { total_pages, items }));
        self
    }

    pub fn with_failure(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(SearchFailure::with_payload(message, json!({"ack": ["Failure"]}))));
        self
    }

    /// Queries received so far, in call order.
    pub fn calls(&self) -> Vec<Query> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchApi for MockSearchApi {
    async fn fetch(&self, query: &Query) -> Result<RawPage, SearchFailure> {
        self.calls.lock().unwrap().push(query.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SearchFailure::new("no stubbed response left")))
    }
}

/// A fully populated fixed-price listing.
pub fn item(title: &str) -> RawItem {
    RawItem {
        title: Some(title.to_string()),
        view_item_url: Some(format!("https://www.ebay.co.uk/itm/{}", title.len())),
        gallery_url: Some("https://i.ebayimg.com/thumbs/1.jpg".to_string()),
        location: Some("Leeds,United Kingdom".to_string()),
        postal_code: Some("LS1".to_string()),
        listing_info: Some(ListingInfo {
            listing_type: Some("FixedPrice".to_string()),
            buy_it_now_available: Some("false".to_string()),
            end_time: Some("2024-03-05T18:30:00.000Z".to_string()),
        }),
        selling_status: Some(SellingStatus {
            current_price: Some(Amount {
                value: Some(json!("19.5")),
                currency_id: Some("GBP".to_string()),
            }),
        }),
    }
}
