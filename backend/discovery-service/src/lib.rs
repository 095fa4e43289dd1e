pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod services;

pub use config::Config;
pub use services::{BioImprover, DiscoveryService, KeywordRanker, SemanticRanker};
