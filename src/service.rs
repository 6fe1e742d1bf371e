//! The remote operations the reference-set builder depends on
//!
//! [`PubMedClient`] is the production implementation; tests drive the builder
//! through in-memory implementations instead.

use async_trait::async_trait;

use crate::error::Result;
use crate::pubmed::{HistorySession, MedlineRecord, PubMedClient};

/// Remote literature operations, one request each, used by [`RefsetBuilder`](crate::RefsetBuilder)
#[async_trait]
pub trait LiteratureService: Send + Sync {
    /// Related identifiers for a batch (one link lookup)
    async fn find_linked_identifiers(&self, pmids: &[String]) -> Result<Vec<String>>;

    /// MEDLINE records for a batch (one fetch)
    async fn fetch_records(&self, pmids: &[String]) -> Result<Vec<MedlineRecord>>;

    /// Store identifiers on the History server
    async fn post_to_history(&self, pmids: &[String]) -> Result<HistorySession>;

    /// Search restricted to a History server session
    async fn search_in_history(
        &self,
        session: &HistorySession,
        term: &str,
        retmax: usize,
    ) -> Result<Vec<String>>;

    /// MeSH major-topic search bounded by `max_results`
    async fn search_by_mesh_and_year(
        &self,
        mesh_term: &str,
        year: u32,
        max_results: usize,
    ) -> Result<Vec<String>>;
}

#[async_trait]
impl LiteratureService for PubMedClient {
    async fn find_linked_identifiers(&self, pmids: &[String]) -> Result<Vec<String>> {
        PubMedClient::find_linked_identifiers(self, pmids).await
    }

    async fn fetch_records(&self, pmids: &[String]) -> Result<Vec<MedlineRecord>> {
        PubMedClient::fetch_records(self, pmids).await
    }

    async fn post_to_history(&self, pmids: &[String]) -> Result<HistorySession> {
        PubMedClient::post_to_history(self, pmids).await
    }

    async fn search_in_history(
        &self,
        session: &HistorySession,
        term: &str,
        retmax: usize,
    ) -> Result<Vec<String>> {
        PubMedClient::search_in_history(self, session, term, retmax).await
    }

    async fn search_by_mesh_and_year(
        &self,
        mesh_term: &str,
        year: u32,
        max_results: usize,
    ) -> Result<Vec<String>> {
        PubMedClient::search_by_mesh_and_year(self, mesh_term, year, max_results).await
    }
}
