use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde_json::Value;
use tracing::{debug, error};

use crate::api::models::{Query, RawPage};
use crate::api::response::{error_message, parse_page};
use crate::config::Config;
use crate::error::{AppError, Result, SearchFailure};

const OPERATION: &str = "findItemsAdvanced";
const SERVICE_VERSION: &str = "1.13.0";

/// The one remote call the pipeline depends on.
#[async_trait]
pub trait SearchApi: Send + Sync {
    async fn fetch(&self, query: &Query) -> std::result::Result<RawPage, SearchFailure>;
}

/// `findItemsAdvanced` over HTTP, using the Finding API's URL parameter syntax.
pub struct FindingClient {
    client: Client,
    endpoint: String,
    app_id: String,
    global_id: String,
}

impl FindingClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(config.request_timeout)
            .connect_timeout(config.request_timeout.min(Duration::from_secs(5)))
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(FindingClient {
            client,
            endpoint: config.finding_url.clone(),
            app_id: config.app_id.clone(),
            global_id: config.global_id.clone(),
        })
    }

    fn params(&self, query: &Query) -> Vec<(String, String)> {
        let mut params = vec![
            ("OPERATION-NAME".to_string(), OPERATION.to_string()),
            ("SERVICE-VERSION".to_string(), SERVICE_VERSION.to_string()),
            ("SECURITY-APPNAME".to_string(), self.app_id.clone()),
            ("GLOBAL-ID".to_string(), self.global_id.clone()),
            ("RESPONSE-DATA-FORMAT".to_string(), "JSON".to_string()),
            ("REST-PAYLOAD".to_string(), String::new()),
        ];
        params.extend(query.to_params());
        params
    }

    async fn execute(&self, query: &Query) -> std::result::Result<RawPage, SearchFailure> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&self.params(query))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let json: Value = serde_json::from_str(&body).map_err(|e| {
            SearchFailure::new(format!("Malformed response (HTTP {}): {}", status, e))
        })?;

        if !status.is_success() {
            let message = match error_message(&json) {
                Some(message) => format!("HTTP {}: {}", status, message),
                None => format!("HTTP {}", status),
            };
            return Err(SearchFailure::with_payload(message, json));
        }

        parse_page(json)
    }
}

#[async_trait]
impl SearchApi for FindingClient {
    async fn fetch(&self, query: &Query) -> std::result::Result<RawPage, SearchFailure> {
        let page_number = query.pagination_input.map(|p| p.page_number).unwrap_or(1);
        debug!("Requesting page {} for {:?}", page_number, query.keywords);

        match self.execute(query).await {
            Ok(page) => {
                debug!(
                    "Page {} returned {} items ({} pages in total)",
                    page_number,
                    page.items.len(),
                    page.total_pages
                );
                Ok(page)
            }
            Err(failure) => {
                error!("eBay search failed: {}", failure.message);
                if let Some(payload) = &failure.payload {
                    error!("eBay response: {}", payload);
                }
                Err(failure)
            }
        }
    }
}
