//! Reference-set construction
//!
//! A reference set for a seed article is built in one linear pipeline:
//!
//! 1. related articles of the seed (first order)
//! 2. related articles of those (second order), skipped when step 1 found nothing
//! 3. the concatenation of both lists
//! 4. a MEDLINE fetch of the seed, logged only
//! 5. the concatenation restricted to one publication year through the History server
//!
//! Every step waits for the previous one, and the first failure aborts the
//! whole pipeline with no partial result.

use std::collections::HashSet;

use tracing::{debug, info, instrument};

use crate::config::RefsetConfig;
use crate::error::Result;
use crate::pubmed::DEFAULT_MESH_SEARCH_LIMIT;
use crate::pubmed::query::published_in_year;
use crate::service::LiteratureService;

/// Builds reference sets on top of a [`LiteratureService`]
#[derive(Debug, Clone)]
pub struct RefsetBuilder<S> {
    service: S,
    config: RefsetConfig,
}

impl<S: LiteratureService> RefsetBuilder<S> {
    pub fn new(service: S, config: RefsetConfig) -> Self {
        Self { service, config }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn config(&self) -> &RefsetConfig {
        &self.config
    }

    /// Build the reference set for `seed`, restricted to articles published in `year`
    ///
    /// The result holds at most `refset_length + 1` identifiers in server order and
    /// usually contains the seed itself. Removing it is the caller's job, see
    /// [`without_seed`].
    ///
    /// Duplicates between the first- and second-order expansions are kept unless
    /// `RefsetConfig::dedup_related` is set.
    ///
    /// `mesh_term` does not influence the result; it is only recorded in the trace span.
    #[instrument(skip(self), fields(seed = %seed, mesh_term = %mesh_term, year = year))]
    pub async fn build_refset(&self, seed: &str, mesh_term: &str, year: u32) -> Result<Vec<String>> {
        let related = self.related(&[seed.to_string()]).await?;
        let second_order = self.related(&related).await?;

        let candidates = self.union(related, second_order);
        debug!(candidates = candidates.len(), "Expansion finished");

        // The seed record is not used further, but a failed fetch still aborts the build.
        let records = self.service.fetch_records(&[seed.to_string()]).await?;
        debug!(
            records = records.len(),
            title = records.first().and_then(|r| r.title()).unwrap_or(""),
            "Fetched seed record"
        );

        let refset = self.filter_by_year(&candidates, year).await?;
        info!(refset_len = refset.len(), "Reference set built");

        Ok(refset)
    }

    /// Restrict `pmids` to articles published in `year`
    ///
    /// Uploads the whole list to the History server and runs a scoped year search
    /// with `retmax = refset_length + 1`. An empty input returns immediately
    /// without any remote call.
    #[instrument(skip(self, pmids), fields(pmids_count = pmids.len(), year = year))]
    pub async fn filter_by_year(&self, pmids: &[String], year: u32) -> Result<Vec<String>> {
        if pmids.is_empty() {
            return Ok(Vec::new());
        }

        let session = self.service.post_to_history(pmids).await?;
        let term = published_in_year(year);
        let retmax = self.config.retmax();

        info!(term = %term, retmax = retmax, "Searching PubMed within history session");
        let filtered = self
            .service
            .search_in_history(&session, &term, retmax)
            .await?;
        debug!(pmids = ?filtered, "Year filter returned PMIDs");

        Ok(filtered)
    }

    /// Related articles of the seed's related articles
    ///
    /// Empty when the seed has no related articles.
    #[instrument(skip(self), fields(seed = %seed))]
    pub async fn second_order_related(&self, seed: &str) -> Result<Vec<String>> {
        let related = self.related(&[seed.to_string()]).await?;
        self.related(&related).await
    }

    /// Up to ten articles with `mesh_term` as a major topic, published in `year`
    ///
    /// The seed is not part of the query.
    #[instrument(skip(self), fields(seed = %seed, mesh_term = %mesh_term, year = year))]
    pub async fn refset_using_mesh(
        &self,
        seed: &str,
        mesh_term: &str,
        year: u32,
    ) -> Result<Vec<String>> {
        self.service
            .search_by_mesh_and_year(mesh_term, year, DEFAULT_MESH_SEARCH_LIMIT)
            .await
    }

    async fn related(&self, pmids: &[String]) -> Result<Vec<String>> {
        if pmids.is_empty() {
            debug!("No identifiers to expand, skipping link lookup");
            return Ok(Vec::new());
        }
        self.service.find_linked_identifiers(pmids).await
    }

    fn union(&self, mut related: Vec<String>, second_order: Vec<String>) -> Vec<String> {
        related.extend(second_order);

        if self.config.dedup_related {
            let mut seen = HashSet::new();
            related.retain(|pmid| seen.insert(pmid.clone()));
        }

        related
    }
}

/// Drop every occurrence of `seed` from a reference set, keeping order
///
/// ```
/// use pubmed_refset::without_seed;
///
/// let refset = vec!["100".to_string(), "200".to_string(), "100".to_string()];
/// assert_eq!(without_seed(refset, "100"), vec!["200"]);
/// ```
pub fn without_seed(mut refset: Vec<String>, seed: &str) -> Vec<String> {
    let seed = seed.trim();
    refset.retain(|pmid| pmid.trim() != seed);
    refset
}
