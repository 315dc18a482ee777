//! Decoding of the Finding API's JSON envelope.
//!
//! With `RESPONSE-DATA-FORMAT=JSON` every element of the XML schema becomes a JSON array,
//! even when it can only occur once: `{"findItemsAdvancedResponse":[{"ack":["Success"],...}]}`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use crate::api::models::{RawItem, RawPage};
use crate::error::SearchFailure;

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

/// Deserializes `[x, ...]` or a bare `x` into `Some(x)`; `[]`, `null` and a missing
/// field give `None`. Use together with `#[serde(default)]`.
pub(crate) fn first<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let value: Option<OneOrMany<T>> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(OneOrMany::Many(values)) => values.into_iter().next(),
        Some(OneOrMany::One(value)) => Some(value),
        None => None,
    })
}

pub(crate) fn many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let value: Option<OneOrMany<T>> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(OneOrMany::Many(values)) => values,
        Some(OneOrMany::One(value)) => vec![value],
        None => Vec::new(),
    })
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "findItemsAdvancedResponse", default, deserialize_with = "first")]
    response: Option<SearchResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default, deserialize_with = "first")]
    ack: Option<String>,
    #[serde(default, deserialize_with = "first")]
    error_message: Option<ErrorMessage>,
    #[serde(default, deserialize_with = "first")]
    pagination_output: Option<PaginationOutput>,
    #[serde(default, deserialize_with = "first")]
    search_result: Option<SearchResult>,
}

#[derive(Deserialize)]
struct ErrorMessage {
    #[serde(default, deserialize_with = "many")]
    error: Vec<ErrorData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorData {
    #[serde(default, deserialize_with = "first")]
    error_id: Option<Value>,
    #[serde(default, deserialize_with = "first")]
    message: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaginationOutput {
    #[serde(default, deserialize_with = "first")]
    total_pages: Option<Value>,
}

#[derive(Deserialize)]
struct SearchResult {
    #[serde(default, deserialize_with = "many")]
    item: Vec<RawItem>,
}

impl ErrorMessage {
    fn summary(&self) -> Option<String> {
        let error = self.error.first()?;
        let message = error.message.clone().unwrap_or_else(|| "unknown error".to_string());
        Some(match error.error_id.as_ref().and_then(as_text) {
            Some(id) => format!("{} (error {})", message, id),
            None => message,
        })
    }
}

/// Turns a decoded response body into a page, or a failure carrying the body.
pub fn parse_page(body: Value) -> Result<RawPage, SearchFailure> {
    let envelope: Envelope = match serde_json::from_value(body.clone()) {
        Ok(envelope) => envelope,
        Err(e) => {
            return Err(SearchFailure::with_payload(format!("Malformed response: {}", e), body));
        }
    };

    let Some(response) = envelope.response else {
        let message = error_message(&body)
            .unwrap_or_else(|| "Malformed response: no findItemsAdvancedResponse".to_string());
        return Err(SearchFailure::with_payload(message, body));
    };

    let ack = response.ack.as_deref().unwrap_or("Success");
    let error = response.error_message.as_ref().and_then(ErrorMessage::summary);

    match ack {
        "Success" => {}
        "Warning" => warn!("eBay returned a warning: {}", error.as_deref().unwrap_or("no details")),
        "PartialFailure" if response.search_result.is_some() => {
            warn!("eBay returned a partial failure: {}", error.as_deref().unwrap_or("no details"))
        }
        other => {
            let message = error.unwrap_or_else(|| format!("eBay returned ack {}", other));
            return Err(SearchFailure::with_payload(message, body));
        }
    }

    let total_pages = response
        .pagination_output
        .as_ref()
        .and_then(|p| p.total_pages.as_ref())
        .and_then(as_u32);

    let Some(total_pages) = total_pages else {
        return Err(SearchFailure::with_payload(
            "Malformed response: missing paginationOutput.totalPages",
            body,
        ));
    };

    let items = response.search_result.map(|r| r.item).unwrap_or_default();

    Ok(RawPage { total_pages, items })
}

/// Best-effort error text from a body that may or may not be a search envelope.
/// Error responses (bad app id, throttling) come back with the error block at the top
/// level instead of inside `findItemsAdvancedResponse`.
pub fn error_message(body: &Value) -> Option<String> {
    let root = body.get("findItemsAdvancedResponse").map(unwrap_one).unwrap_or(body);
    let error_message = root.get("errorMessage")?;
    let parsed: ErrorMessage = serde_json::from_value(unwrap_one(error_message).clone()).ok()?;
    parsed.summary()
}

fn unwrap_one(value: &Value) -> &Value {
    match value {
        Value::Array(values) => values.first().unwrap_or(value),
        _ => value,
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
