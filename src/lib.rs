pub mod api;
pub mod config;
pub mod error;
pub mod listing;
pub mod pipeline;
pub mod report;
pub mod search;
