use reqwest::{Client, Response};
use tracing::{debug, info, instrument, warn};

use crate::common::join_pmids;
use crate::config::ClientConfig;
use crate::error::{PubMedError, Result};
use crate::pubmed::medline::{MedlineRecord, parse_medline};
use crate::pubmed::models::{HistorySession, SearchResult};
use crate::pubmed::query::mesh_major_topic_in_year;
use crate::pubmed::responses::{ELinkResponse, EPostResult, ESearchResult};
use crate::rate_limit::RateLimiter;

/// At most this many identifiers are sent in one ELink request; the rest are dropped
pub const MAX_LINK_BATCH: usize = 50;

/// Default `retmax` for the MeSH/year search
pub const DEFAULT_MESH_SEARCH_LIMIT: usize = 10;

/// Client for the NCBI E-utilities endpoints used to build reference sets
///
/// Every call is a single request: nothing is batched behind the caller's back
/// and nothing is retried. Failures come back as [`PubMedError`].
#[derive(Clone)]
pub struct PubMedClient {
    client: Client,
    base_url: String,
    rate_limiter: RateLimiter,
    config: ClientConfig,
}

impl PubMedClient {
    /// Create a client with default configuration (3 requests/second, no API key)
    ///
    /// ```
    /// use pubmed_refset::PubMedClient;
    ///
    /// let client = PubMedClient::new();
    /// ```
    pub fn new() -> Self {
        Self::with_config(ClientConfig::new())
    }

    /// Create a client with explicit configuration
    ///
    /// ```
    /// use pubmed_refset::{ClientConfig, PubMedClient};
    ///
    /// let config = ClientConfig::new()
    ///     .with_email("team@example.org")
    ///     .with_tool("citation-pipeline");
    ///
    /// let client = PubMedClient::with_config(config);
    /// assert_eq!(client.config().effective_tool(), "citation-pipeline");
    /// ```
    pub fn with_config(config: ClientConfig) -> Self {
        let client = Client::builder()
            .user_agent(config.effective_user_agent())
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self::with_client(client, config)
    }

    /// Create a client around a preconfigured reqwest client
    pub fn with_client(client: Client, config: ClientConfig) -> Self {
        Self {
            client,
            base_url: config.effective_base_url().to_string(),
            rate_limiter: config.create_rate_limiter(),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch MEDLINE records for all identifiers in one EFetch request
    ///
    /// Records come back in server order. No chunking is done here, so very
    /// large inputs are the caller's concern.
    ///
    /// # Errors
    ///
    /// * `PubMedError::InvalidPmid` - an identifier is not a PMID; nothing is sent
    /// * `PubMedError::RequestError` / `PubMedError::ApiError` - transport or HTTP failure
    /// * `PubMedError::MalformedResponse` - the body is not MEDLINE text
    #[instrument(skip(self, pmids), fields(pmids_count = pmids.len()))]
    pub async fn fetch_records<S: AsRef<str>>(&self, pmids: &[S]) -> Result<Vec<MedlineRecord>> {
        if pmids.is_empty() {
            return Ok(Vec::new());
        }

        let id_list = join_pmids(pmids)?;
        let url = format!(
            "{}/efetch.fcgi?db=pubmed&id={}&rettype=medline&retmode=text",
            self.base_url,
            urlencoding::encode(&id_list)
        );

        debug!("Making EFetch API request");
        let response = self.make_request(&url).await?;
        let text = response.text().await?;

        let records = parse_medline(&text)?;
        info!(
            requested = pmids.len(),
            parsed = records.len(),
            "MEDLINE fetch completed"
        );

        Ok(records)
    }

    /// Free-text author search, returning the whole ESearch result
    ///
    /// The name is sent as given, blank or not, with the server's default `retmax`.
    #[instrument(skip(self), fields(author = %author_name))]
    pub async fn search_by_author(&self, author_name: &str) -> Result<SearchResult> {
        let result = self.esearch(author_name, None, None).await?;
        debug!(?result, "Author search raw result");

        Ok(result)
    }

    /// PMIDs where `mesh_term` is a major topic and the publication year is `year`
    ///
    /// At most `max_results` identifiers are requested; see
    /// [`DEFAULT_MESH_SEARCH_LIMIT`] for the usual value.
    #[instrument(skip(self), fields(mesh_term = %mesh_term, year = year))]
    pub async fn search_by_mesh_and_year(
        &self,
        mesh_term: &str,
        year: u32,
        max_results: usize,
    ) -> Result<Vec<String>> {
        if mesh_term.trim().is_empty() {
            return Err(PubMedError::InvalidQuery(
                "MeSH term cannot be empty".to_string(),
            ));
        }

        let term = mesh_major_topic_in_year(mesh_term, year);
        info!(term = %term, "Searching PubMed by MeSH major topic");

        let result = self.esearch(&term, Some(max_results), None).await?;
        debug!(pmids = ?result.pmids, "MeSH search returned PMIDs");

        Ok(result.pmids)
    }

    /// Related articles (`pubmed_pubmed` links) for a batch of identifiers
    ///
    /// Sends one ELink request with the identifiers joined into a single `id`
    /// parameter. Only the first [`MAX_LINK_BATCH`] identifiers are sent; the
    /// rest are silently dropped to bound the URL length, so the result may be
    /// incomplete for large inputs. The result is the link list of the first
    /// link set's first link database, or empty when NCBI reports no links.
    #[instrument(skip(self, pmids), fields(pmids_count = pmids.len()))]
    pub async fn find_linked_identifiers<S: AsRef<str>>(&self, pmids: &[S]) -> Result<Vec<String>> {
        if pmids.is_empty() {
            return Ok(Vec::new());
        }

        let batch = if pmids.len() > MAX_LINK_BATCH {
            debug!(
                dropped = pmids.len() - MAX_LINK_BATCH,
                "Truncating ELink batch to {} identifiers", MAX_LINK_BATCH
            );
            &pmids[..MAX_LINK_BATCH]
        } else {
            pmids
        };

        let id_list = join_pmids(batch)?;
        let url = format!(
            "{}/elink.fcgi?dbfrom=pubmed&db=pubmed&id={}&linkname=pubmed_pubmed&retmode=json",
            self.base_url,
            urlencoding::encode(&id_list)
        );

        debug!("Making ELink API request");
        let response = self.make_request(&url).await?;
        let body = response.text().await?;

        let related = ELinkResponse::parse(&body)?.first_links()?;
        info!(
            source_count = batch.len(),
            related_count = related.len(),
            "Related articles retrieved"
        );

        Ok(related)
    }

    /// Upload identifiers to the History server with EPost
    ///
    /// # Errors
    ///
    /// * `PubMedError::InvalidQuery` - empty input
    /// * `PubMedError::InvalidPmid` - an identifier is not a PMID; nothing is sent
    /// * `PubMedError::WebEnvNotAvailable` - NCBI answered without a token pair
    #[instrument(skip(self, pmids), fields(pmids_count = pmids.len()))]
    pub async fn post_to_history<S: AsRef<str>>(&self, pmids: &[S]) -> Result<HistorySession> {
        if pmids.is_empty() {
            return Err(PubMedError::InvalidQuery(
                "PMID list cannot be empty for EPost".to_string(),
            ));
        }

        let id_list = join_pmids(pmids)?;
        let params = vec![
            ("db".to_string(), "pubmed".to_string()),
            ("id".to_string(), id_list),
        ];
        let url = format!("{}/epost.fcgi", self.base_url);

        debug!("Making EPost API request");
        let response = self.make_post(&url, params).await?;
        let body = response.text().await?;

        let session = EPostResult::parse(&body)?;
        info!(query_key = %session.query_key, "EPost completed");

        Ok(session)
    }

    /// ESearch restricted to the identifiers stored under `session`
    #[instrument(skip(self, session), fields(term = %term, retmax = retmax))]
    pub async fn search_in_history(
        &self,
        session: &HistorySession,
        term: &str,
        retmax: usize,
    ) -> Result<Vec<String>> {
        let result = self.esearch(term, Some(retmax), Some(session)).await?;
        debug!(pmids = ?result.pmids, "History-scoped search returned PMIDs");

        Ok(result.pmids)
    }

    async fn esearch(
        &self,
        term: &str,
        retmax: Option<usize>,
        session: Option<&HistorySession>,
    ) -> Result<SearchResult> {
        let mut url = format!(
            "{}/esearch.fcgi?db=pubmed&term={}&retmode=json",
            self.base_url,
            urlencoding::encode(term)
        );

        if let Some(retmax) = retmax {
            url.push_str(&format!("&retmax={}", retmax));
        }

        if let Some(session) = session {
            url.push_str(&format!(
                "&WebEnv={}&query_key={}",
                urlencoding::encode(&session.webenv),
                urlencoding::encode(&session.query_key)
            ));
        }

        debug!("Making ESearch API request");
        let response = self.make_request(&url).await?;
        let body = response.text().await?;

        let result = ESearchResult::parse(&body)?;
        info!(
            total_count = result.total_count,
            returned_count = result.pmids.len(),
            "Search completed"
        );

        Ok(result)
    }

    /// GET with the identification parameters (api_key, email, tool) appended
    async fn make_request(&self, url: &str) -> Result<Response> {
        let mut final_url = url.to_string();
        let api_params = self.config.build_api_params();

        if !api_params.is_empty() {
            let separator = if url.contains('?') { '&' } else { '?' };
            final_url.push(separator);

            let param_strings: Vec<String> = api_params
                .into_iter()
                .map(|(key, value)| format!("{}={}", key, urlencoding::encode(&value)))
                .collect();
            final_url.push_str(&param_strings.join("&"));
        }

        self.rate_limiter.acquire().await;
        debug!("Making API request to: {}", final_url);
        let response = self.client.get(&final_url).send().await?;

        Self::check_status(response)
    }

    /// Form-encoded POST, used for EPost so long identifier lists stay out of the URL
    async fn make_post(&self, url: &str, mut params: Vec<(String, String)>) -> Result<Response> {
        params.extend(self.config.build_api_params());

        self.rate_limiter.acquire().await;
        debug!("Making POST request to: {}", url);
        let response = self.client.post(url).form(&params).send().await?;

        Self::check_status(response)
    }

    fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        warn!("API request failed with status: {}", status);
        Err(PubMedError::ApiError {
            status: status.as_u16(),
            message: status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
        })
    }
}

impl Default for PubMedClient {
    fn default() -> Self {
        Self::new()
    }
}
