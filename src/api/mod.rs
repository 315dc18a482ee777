pub mod client;
pub mod models;
pub mod response;

pub use client::{FindingClient, SearchApi};
pub use models::{Query, RawItem, RawPage, SortOrder};

#[cfg(test)]
pub mod mock;
