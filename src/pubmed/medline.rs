//! MEDLINE tagged-text records, as returned by `efetch ... rettype=medline&retmode=text`
//!
//! ```text
//! PMID- 100
//! TI  - A title that is long enough to
//!       wrap onto a continuation line.
//! AU  - Smith J
//! MH  - Heart/*drug effects/metabolism
//! ```
//!
//! Each record is a block of `TAG - value` lines; blocks are separated by blank lines.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{PubMedError, Result};
use crate::mesh::explode_all_mesh;

static TAG_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z][A-Z0-9]{0,3}) *- ?(.*)$").expect("valid regex"));

const CONTINUATION_INDENT: &str = "      ";

/// One parsed MEDLINE record: every tag maps to the values it carried, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedlineRecord {
    fields: BTreeMap<String, Vec<String>>,
}

impl MedlineRecord {
    /// All values of a tag, e.g. `record.get("AU")`
    pub fn get(&self, tag: &str) -> Option<&[String]> {
        self.fields.get(tag).map(Vec::as_slice)
    }

    /// First value of a tag
    pub fn first(&self, tag: &str) -> Option<&str> {
        self.fields
            .get(tag)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn pmid(&self) -> Option<&str> {
        self.first("PMID")
    }

    pub fn title(&self) -> Option<&str> {
        self.first("TI")
    }

    pub fn abstract_text(&self) -> Option<&str> {
        self.first("AB")
    }

    /// Short author names (`AU`), e.g. `Smith J`
    pub fn authors(&self) -> &[String] {
        self.get("AU").unwrap_or(&[])
    }

    /// Full author names (`FAU`), e.g. `Smith, John`
    pub fn full_author_names(&self) -> &[String] {
        self.get("FAU").unwrap_or(&[])
    }

    /// Full journal title, falling back to the abbreviation
    pub fn journal(&self) -> Option<&str> {
        self.first("JT").or_else(|| self.first("TA"))
    }

    pub fn publication_date(&self) -> Option<&str> {
        self.first("DP")
    }

    pub fn publication_types(&self) -> &[String] {
        self.get("PT").unwrap_or(&[])
    }

    /// Raw MeSH lines (`MH`), qualifiers still slash-joined
    pub fn mesh_headings(&self) -> &[String] {
        self.get("MH").unwrap_or(&[])
    }

    /// MeSH headings with one entry per heading/qualifier pair
    pub fn exploded_mesh(&self) -> Vec<String> {
        explode_all_mesh(self.mesh_headings())
    }

    fn push(&mut self, tag: &str, value: String) {
        self.fields.entry(tag.to_string()).or_default().push(value);
    }

    fn extend_last(&mut self, tag: &str, text: &str) {
        if let Some(last) = self.fields.get_mut(tag).and_then(|values| values.last_mut()) {
            if !last.is_empty() {
                last.push(' ');
            }
            last.push_str(text);
        }
    }
}

/// Parse a MEDLINE text payload into records, in file order
///
/// # Errors
///
/// `MalformedResponse` when a line is neither a tag line, a continuation of one,
/// nor blank (an HTML error page, for instance).
pub fn parse_medline(text: &str) -> Result<Vec<MedlineRecord>> {
    let mut records = Vec::new();
    let mut current = MedlineRecord::default();
    let mut current_tag: Option<String> = None;

    for (index, line) in text.lines().enumerate() {
        let line = line.trim_end();

        if line.is_empty() {
            if !current.is_empty() {
                records.push(std::mem::take(&mut current));
            }
            current_tag = None;
            continue;
        }

        if let Some(rest) = line.strip_prefix(CONTINUATION_INDENT) {
            let tag = current_tag.as_deref().ok_or_else(|| {
                PubMedError::malformed(
                    "efetch",
                    format!("continuation without a tag on line {}", index + 1),
                )
            })?;
            current.extend_last(tag, rest.trim());
            continue;
        }

        let captures = TAG_LINE.captures(line).ok_or_else(|| {
            PubMedError::malformed(
                "efetch",
                format!("unrecognized MEDLINE line {}: {:?}", index + 1, line),
            )
        })?;
        let tag = &captures[1];
        current.push(tag, captures[2].trim().to_string());
        current_tag = Some(tag.to_string());
    }

    if !current.is_empty() {
        records.push(current);
    }

    Ok(records)
}
