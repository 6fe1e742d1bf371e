use serde::{Deserialize, Serialize};

/// Outcome of an ESearch call
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// PMIDs in the order the server returned them
    pub pmids: Vec<String>,
    /// Total number of records matching the query (may exceed `pmids.len()`)
    pub total_count: usize,
    /// How PubMed interpreted the query, e.g. `"smith j"[Author]`
    pub query_translation: Option<String>,
}

/// Token pair addressing a set of UIDs stored on the NCBI History server
///
/// Obtained from EPost and valid only for the filtering step that created it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct HistorySession {
    /// WebEnv session identifier
    pub webenv: String,
    /// Query key within the session
    pub query_key: String,
}
