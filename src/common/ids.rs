//! PMID validation
//!
//! Identifiers travel through the crate as plain strings in server order;
//! they are only parsed here, right before being joined into a batch request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PubMedError, Result};

/// A validated PubMed ID (PMID)
///
/// # Examples
///
/// ```
/// use pubmed_refset::common::PubMedId;
///
/// let pmid = PubMedId::parse("  31978945 ").unwrap();
/// assert_eq!(pmid.as_u32(), 31978945);
/// assert_eq!(pmid.to_string(), "31978945");
///
/// assert!(PubMedId::parse("").is_err());
/// assert!(PubMedId::parse("0").is_err());
/// assert!(PubMedId::parse("PMC123").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PubMedId {
    value: u32,
}

impl PubMedId {
    /// Parse a PMID, trimming surrounding whitespace
    ///
    /// # Errors
    ///
    /// Returns `PubMedError::InvalidPmid` for empty, non-numeric, zero or
    /// out-of-range input.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || PubMedError::InvalidPmid {
            pmid: s.to_string(),
        };

        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        match trimmed.parse::<u32>() {
            Ok(0) | Err(_) => Err(invalid()),
            Ok(value) => Ok(Self { value }),
        }
    }

    pub fn as_u32(&self) -> u32 {
        self.value
    }
}

impl fmt::Display for PubMedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl FromStr for PubMedId {
    type Err = PubMedError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Validate every identifier and join them with commas for an `id=` parameter
///
/// Fails on the first invalid entry, so nothing is sent for a partly malformed batch.
pub(crate) fn join_pmids<S: AsRef<str>>(pmids: &[S]) -> Result<String> {
    let validated = pmids
        .iter()
        .map(|pmid| PubMedId::parse(pmid.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    Ok(validated
        .iter()
        .map(PubMedId::to_string)
        .collect::<Vec<_>>()
        .join(","))
}
