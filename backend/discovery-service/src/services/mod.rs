pub mod bio_improver;
pub mod discovery;
pub mod llm;

pub use bio_improver::BioImprover;
pub use discovery::{DiscoveryService, KeywordRanker, SemanticRanker};
