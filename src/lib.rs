pub mod config;
pub mod data_models;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod mcp;
pub mod query;
pub mod search;
