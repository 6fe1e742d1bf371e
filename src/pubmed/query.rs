//! ESearch term construction

/// Restrict to articles where `mesh_term` is a major topic, published in `year`
///
/// ```
/// use pubmed_refset::pubmed::query::mesh_major_topic_in_year;
///
/// assert_eq!(
///     mesh_major_topic_in_year("Heart/*drug effects", 2020),
///     r#"(Heart/*drug effects[MeSH Major Topic]) AND "2020"[Date - Publication]"#
/// );
/// ```
pub fn mesh_major_topic_in_year(mesh_term: &str, year: u32) -> String {
    format!(
        "({}[MeSH Major Topic]) AND {}",
        mesh_term,
        published_in_year(year)
    )
}

/// Publication-date filter for a single year
pub fn published_in_year(year: u32) -> String {
    format!("\"{}\"[Date - Publication]", year)
}
