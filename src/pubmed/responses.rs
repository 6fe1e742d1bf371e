//! Wire schemas for the E-utilities responses the client consumes
//!
//! Each response is deserialized into a typed struct and validated here, so a
//! shape mismatch surfaces as `MalformedResponse` at the parse boundary.

use serde::Deserialize;
use tracing::debug;

use crate::error::{PubMedError, Result};
use crate::pubmed::models::{HistorySession, SearchResult};

fn parse_json<'a, T: Deserialize<'a>>(operation: &'static str, body: &'a str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| PubMedError::malformed(operation, e.to_string()))
}

/// NCBI reports request-level failures with HTTP 200 and an `ERROR` field
fn api_error(operation: &str, message: &str) -> PubMedError {
    PubMedError::ApiError {
        status: 200,
        message: format!("NCBI {} API error: {}", operation, message),
    }
}

// ESearch (retmode=json)

#[derive(Debug, Deserialize)]
pub(crate) struct ESearchResult {
    pub esearchresult: ESearchData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ESearchData {
    #[serde(default, rename = "ERROR")]
    pub error: Option<String>,
    #[serde(default)]
    pub count: Option<String>,
    #[serde(default)]
    pub idlist: Option<Vec<String>>,
    #[serde(default)]
    pub querytranslation: Option<String>,
}

impl ESearchResult {
    pub(crate) fn parse(body: &str) -> Result<SearchResult> {
        let data = parse_json::<ESearchResult>("esearch", body)?.esearchresult;

        if let Some(error_msg) = &data.error {
            return Err(api_error("ESearch", error_msg));
        }

        let pmids = data
            .idlist
            .ok_or_else(|| PubMedError::malformed("esearch", "missing idlist"))?;

        let total_count = match data.count.as_deref() {
            Some(count) => count.trim().parse().map_err(|_| {
                PubMedError::malformed("esearch", format!("non-numeric count {:?}", count))
            })?,
            None => pmids.len(),
        };

        Ok(SearchResult {
            pmids,
            total_count,
            query_translation: data.querytranslation,
        })
    }
}

// ELink (retmode=json)

#[derive(Debug, Deserialize)]
pub(crate) struct ELinkResponse {
    #[serde(default, rename = "ERROR")]
    pub error: Option<String>,
    #[serde(default)]
    pub linksets: Option<Vec<ELinkSet>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ELinkSet {
    #[serde(rename = "dbfrom", default)]
    pub db_from: Option<String>,
    #[serde(default)]
    pub ids: Vec<String>,
    #[serde(rename = "linksetdbs", default)]
    pub linkset_dbs: Vec<ELinkSetDb>,
    #[serde(default, rename = "ERROR")]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ELinkSetDb {
    #[serde(rename = "dbto")]
    pub db_to: String,
    #[serde(rename = "linkname")]
    pub link_name: String,
    #[serde(default)]
    pub links: Vec<String>,
}

impl ELinkResponse {
    pub(crate) fn parse(body: &str) -> Result<Self> {
        let response = parse_json::<ELinkResponse>("elink", body)?;

        if let Some(error_msg) = &response.error {
            return Err(api_error("ELink", error_msg));
        }
        if response.linksets.is_none() {
            return Err(PubMedError::malformed("elink", "missing linksets"));
        }

        Ok(response)
    }

    /// Links of the first link set's first link database, or nothing at all
    pub(crate) fn first_links(self) -> Result<Vec<String>> {
        let Some(linkset) = self.linksets.and_then(|sets| sets.into_iter().next()) else {
            return Ok(Vec::new());
        };

        match (linkset.linkset_dbs.into_iter().next(), linkset.error) {
            (Some(linkset_db), _) => {
                debug!(
                    db_from = linkset.db_from.as_deref().unwrap_or("?"),
                    db_to = %linkset_db.db_to,
                    link_name = %linkset_db.link_name,
                    source_ids = linkset.ids.len(),
                    links = linkset_db.links.len(),
                    "Using first link database of first link set"
                );
                Ok(linkset_db.links)
            }
            (None, Some(error_msg)) => Err(api_error("ELink", &error_msg)),
            (None, None) => Ok(Vec::new()),
        }
    }
}

// EPost (XML only)

#[derive(Debug, Deserialize)]
pub(crate) struct EPostResult {
    #[serde(rename = "QueryKey", default)]
    pub query_key: Option<String>,
    #[serde(rename = "WebEnv", default)]
    pub webenv: Option<String>,
    #[serde(rename = "ERROR", default)]
    pub error: Option<String>,
}

impl EPostResult {
    pub(crate) fn parse(body: &str) -> Result<HistorySession> {
        let result: EPostResult = quick_xml::de::from_str(body)
            .map_err(|e| PubMedError::malformed("epost", e.to_string()))?;

        if let Some(error_msg) = &result.error {
            return Err(api_error("EPost", error_msg));
        }

        let non_blank = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        match (non_blank(result.webenv), non_blank(result.query_key)) {
            (Some(webenv), Some(query_key)) => Ok(HistorySession { webenv, query_key }),
            _ => Err(PubMedError::WebEnvNotAvailable),
        }
    }
}
