//! Identifier types shared across the client and the builder

pub mod ids;

pub use ids::PubMedId;
pub(crate) use ids::join_pmids;
