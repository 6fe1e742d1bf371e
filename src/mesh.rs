//! MeSH heading lines
//!
//! A MEDLINE `MH` line packs a descriptor and its qualifiers into one string,
//! `Heart/*drug effects/metabolism`, where `*` marks a major-topic qualifier.

/// Split a MeSH line into one `heading/qualifier` term per qualifier
///
/// A line without qualifiers comes back unchanged as the only element.
/// Qualifiers keep their leading `*`.
///
/// # Example
///
/// ```
/// use pubmed_refset::explode_mesh_line;
///
/// assert_eq!(explode_mesh_line("Heart"), vec!["Heart"]);
/// assert_eq!(
///     explode_mesh_line("Heart/*drug effects/metabolism"),
///     vec!["Heart/*drug effects", "Heart/metabolism"]
/// );
/// ```
pub fn explode_mesh_line(line: &str) -> Vec<String> {
    let mut parts = line.split('/');
    // split always yields at least one item
    let heading = parts.next().unwrap_or_default();

    let exploded: Vec<String> = parts
        .map(|qualifier| format!("{}/{}", heading, qualifier))
        .collect();

    if exploded.is_empty() {
        vec![heading.to_string()]
    } else {
        exploded
    }
}

/// Explode every line and concatenate the results, keeping order and duplicates
///
/// ```
/// use pubmed_refset::explode_all_mesh;
///
/// assert_eq!(explode_all_mesh(&["A", "B/x/y"]), vec!["A", "B/x", "B/y"]);
/// ```
pub fn explode_all_mesh<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    lines
        .iter()
        .flat_map(|line| explode_mesh_line(line.as_ref()))
        .collect()
}
