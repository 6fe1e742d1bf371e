//! PubMed E-utilities access
//!
//! - `client` - ESearch, ELink, EFetch and EPost requests
//! - `medline` - MEDLINE tagged-text records returned by EFetch
//! - `query` - ESearch term construction
//! - `responses` - typed wire schemas, validated at the parse boundary

pub mod client;
pub mod medline;
pub mod models;
pub mod query;
pub(crate) mod responses;

// Re-export public types
pub use client::{DEFAULT_MESH_SEARCH_LIMIT, MAX_LINK_BATCH, PubMedClient};
pub use medline::{MedlineRecord, parse_medline};
pub use models::{HistorySession, SearchResult};
