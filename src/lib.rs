//! # PubMed Refset
//!
//! Builds *reference sets* for citation analysis: the articles related to a seed
//! publication, expanded two hops through PubMed's related-article links and
//! restricted to one publication year.
//!
//! ## Features
//!
//! - **Two-hop expansion**: related articles of the seed, then of those
//! - **Year filtering**: server-side, through the NCBI History server
//! - **MEDLINE records**: batch fetch and parsing of the tagged text format
//! - **MeSH helpers**: exploding `Heading/qualifier` lines
//! - **Rate limiting**: NCBI's 3 (or 10 with an API key) requests per second
//!
//! ## Quick Start
//!
//! ```no_run
//! use pubmed_refset::{RefsetClient, without_seed};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RefsetClient::from_env()?;
//!
//!     let refset = client.get_pmids_for_refset("31978945", "Coronavirus Infections", 2020).await?;
//!     // The seed usually comes back in its own reference set
//!     let refset = without_seed(refset, "31978945");
//!
//!     println!("{} related articles", refset.len());
//!     Ok(())
//! }
//! ```
//!
//! Every remote failure propagates unchanged; nothing is retried.

pub mod common;
pub mod config;
pub mod error;
pub mod mesh;
pub mod pubmed;
pub mod rate_limit;
pub mod refset;
pub mod service;

// Re-export main types for convenience
pub use config::{ClientConfig, RefsetConfig};
pub use error::{PubMedError, Result};
pub use mesh::{explode_all_mesh, explode_mesh_line};
pub use pubmed::{HistorySession, MedlineRecord, PubMedClient, SearchResult};
pub use rate_limit::RateLimiter;
pub use refset::{RefsetBuilder, without_seed};
pub use service::LiteratureService;

/// Library entry point combining a configured [`PubMedClient`] with a [`RefsetBuilder`]
#[derive(Clone)]
pub struct RefsetClient {
    builder: RefsetBuilder<PubMedClient>,
}

impl RefsetClient {
    /// Create a client with NCBI defaults and a reference-set length of 50
    pub fn new() -> Self {
        Self::with_config(ClientConfig::new(), RefsetConfig::new())
    }

    /// Configure both layers from the environment
    /// (`NCBI_API_KEY`, `NCBI_EMAIL`, `NCBI_TOOL`, `REFSET_LENGTH`)
    ///
    /// # Errors
    ///
    /// `PubMedError::InvalidConfig` if `REFSET_LENGTH` is not a non-negative integer.
    pub fn from_env() -> Result<Self> {
        Ok(Self::with_config(
            ClientConfig::from_env(),
            RefsetConfig::from_env()?,
        ))
    }

    /// ```
    /// use pubmed_refset::{ClientConfig, RefsetClient, RefsetConfig};
    ///
    /// let client = RefsetClient::with_config(
    ///     ClientConfig::new().with_email("team@example.org"),
    ///     RefsetConfig::new().with_refset_length(20),
    /// );
    /// assert_eq!(client.builder().config().retmax(), 21);
    /// ```
    pub fn with_config(client_config: ClientConfig, refset_config: RefsetConfig) -> Self {
        Self {
            builder: RefsetBuilder::new(PubMedClient::with_config(client_config), refset_config),
        }
    }

    /// The reference-set builder behind the `get_pmids_for_refset*` calls
    pub fn builder(&self) -> &RefsetBuilder<PubMedClient> {
        &self.builder
    }

    /// The underlying E-utilities client
    pub fn pubmed(&self) -> &PubMedClient {
        self.builder.service()
    }

    /// MEDLINE records for the given PMIDs, fetched in one request
    pub async fn get_medline_records<S: AsRef<str>>(&self, pmids: &[S]) -> Result<Vec<MedlineRecord>> {
        self.pubmed().fetch_records(pmids).await
    }

    /// Full ESearch result for a free-text author query
    pub async fn get_results_from_author_name(&self, author_name: &str) -> Result<SearchResult> {
        self.pubmed().search_by_author(author_name).await
    }

    /// PMIDs found by a free-text author query
    pub async fn get_pmids_from_author_name(&self, author_name: &str) -> Result<Vec<String>> {
        Ok(self.get_results_from_author_name(author_name).await?.pmids)
    }

    /// Up to ten PMIDs with `mesh_term` as a major topic, published in `year`
    pub async fn get_pmids_for_refset_using_mesh(
        &self,
        seed: &str,
        mesh_term: &str,
        year: u32,
    ) -> Result<Vec<String>> {
        self.builder.refset_using_mesh(seed, mesh_term, year).await
    }

    /// Reference set for `seed`; see [`RefsetBuilder::build_refset`]
    ///
    /// The seed itself is usually part of the result and must be removed by the
    /// caller, e.g. with [`without_seed`].
    pub async fn get_pmids_for_refset(
        &self,
        seed: &str,
        mesh_term: &str,
        year: u32,
    ) -> Result<Vec<String>> {
        self.builder.build_refset(seed, mesh_term, year).await
    }

    /// Related articles of the seed's related articles
    pub async fn get_second_order_related(&self, seed: &str) -> Result<Vec<String>> {
        self.builder.second_order_related(seed).await
    }
}

impl Default for RefsetClient {
    fn default() -> Self {
        Self::new()
    }
}
