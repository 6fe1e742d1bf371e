//! PubMedClient operations against a mocked E-utilities server
//!
//! These tests check what goes over the wire (paths, parameters, batch contents)
//! and how each typed response is turned into results.

mod common;

use pubmed_refset::pubmed::{DEFAULT_MESH_SEARCH_LIMIT, MAX_LINK_BATCH};
use pubmed_refset::{HistorySession, explode_all_mesh};
use tracing_test::traced_test;
use wiremock::matchers::{body_string_contains, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{create_mock_client, elink_json, epost_xml, esearch_json, medline_text};

#[tokio::test]
#[traced_test]
async fn test_search_by_author_returns_full_result() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("db", "pubmed"))
        .and(query_param("term", "Smith J"))
        .and(query_param("retmode", "json"))
        .and(query_param_is_missing("retmax"))
        .and(query_param("tool", "test-client"))
        .and(query_param("email", "test@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esearch_json(&["11", "12"], 2400)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let result = client.search_by_author("Smith J").await.unwrap();

    assert_eq!(result.pmids, vec!["11", "12"]);
    assert_eq!(result.total_count, 2400);
}

#[tokio::test]
#[traced_test]
async fn test_search_by_author_sends_blank_name_as_given() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("term", "   "))
        .respond_with(ResponseTemplate::new(200).set_body_json(esearch_json(&[], 0)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let result = client.search_by_author("   ").await.unwrap();

    assert!(result.pmids.is_empty());
    assert_eq!(result.total_count, 0);
}

#[tokio::test]
#[traced_test]
async fn test_search_by_mesh_and_year_builds_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param(
            "term",
            r#"(Heart/*drug effects[MeSH Major Topic]) AND "2020"[Date - Publication]"#,
        ))
        .and(query_param("retmax", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esearch_json(&["5", "6", "7"], 3)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let pmids = client
        .search_by_mesh_and_year("Heart/*drug effects", 2020, DEFAULT_MESH_SEARCH_LIMIT)
        .await
        .unwrap();

    assert_eq!(pmids, vec!["5", "6", "7"]);
}

#[tokio::test]
#[traced_test]
async fn test_find_linked_identifiers_single_batch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/elink.fcgi"))
        .and(query_param("dbfrom", "pubmed"))
        .and(query_param("db", "pubmed"))
        .and(query_param("linkname", "pubmed_pubmed"))
        .and(query_param("id", "200,300"))
        .respond_with(ResponseTemplate::new(200).set_body_json(elink_json(&["200", "300"], &["400", "200"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let related = client.find_linked_identifiers(&["200", "300"]).await.unwrap();

    // Server order and duplicates of the input are passed through untouched
    assert_eq!(related, vec!["400", "200"]);
}

#[tokio::test]
#[traced_test]
async fn test_find_linked_identifiers_truncates_to_first_50() {
    let mock_server = MockServer::start().await;

    let pmids: Vec<String> = (1..=75).map(|n| (1000 + n).to_string()).collect();
    let expected_ids = pmids[..MAX_LINK_BATCH].join(",");

    Mock::given(method("GET"))
        .and(path("/elink.fcgi"))
        .and(query_param("id", expected_ids.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(elink_json(&["1001"], &["9"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let related = client.find_linked_identifiers(&pmids).await.unwrap();
    assert_eq!(related, vec!["9"]);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let sent_ids: Vec<String> = requests[0]
        .url
        .query_pairs()
        .filter(|(key, _)| key == "id")
        .flat_map(|(_, value)| value.split(',').map(str::to_string).collect::<Vec<_>>())
        .collect();
    assert_eq!(sent_ids, pmids[..MAX_LINK_BATCH].to_vec());
    assert!(!sent_ids.contains(&pmids[MAX_LINK_BATCH]));
}

#[tokio::test]
#[traced_test]
async fn test_find_linked_identifiers_exactly_50_is_not_truncated() {
    let mock_server = MockServer::start().await;

    let pmids: Vec<String> = (1..=50).map(|n| n.to_string()).collect();

    Mock::given(method("GET"))
        .and(path("/elink.fcgi"))
        .and(query_param("id", pmids.join(",").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(elink_json(&["1"], &[])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    assert!(client.find_linked_identifiers(&pmids).await.unwrap().is_empty());
}

#[tokio::test]
#[traced_test]
async fn test_find_linked_identifiers_without_linksets_is_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/elink.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "header": {"type": "elink", "version": "0.3"},
            "linksets": [{"dbfrom": "pubmed", "ids": ["100"]}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let related = client.find_linked_identifiers(&["100"]).await.unwrap();
    assert!(related.is_empty());
}

#[tokio::test]
#[traced_test]
async fn test_post_to_history_sends_form() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/epost.fcgi"))
        .and(body_string_contains("db=pubmed"))
        .and(body_string_contains("id=200%2C300%2C400"))
        .and(body_string_contains("tool=test-client"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(epost_xml("MCID_67890abcdef", "1"))
                .insert_header("content-type", "text/xml"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let session = client
        .post_to_history(&["200", "300", "400"])
        .await
        .unwrap();

    assert_eq!(
        session,
        HistorySession {
            webenv: "MCID_67890abcdef".to_string(),
            query_key: "1".to_string(),
        }
    );
}

#[tokio::test]
#[traced_test]
async fn test_search_in_history_scopes_by_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("term", r#""2020"[Date - Publication]"#))
        .and(query_param("retmax", "51"))
        .and(query_param("WebEnv", "MCID_abc"))
        .and(query_param("query_key", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esearch_json(&["300", "200"], 2)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let session = HistorySession {
        webenv: "MCID_abc".to_string(),
        query_key: "3".to_string(),
    };
    let pmids = client
        .search_in_history(&session, r#""2020"[Date - Publication]"#, 51)
        .await
        .unwrap();

    assert_eq!(pmids, vec!["300", "200"]);
}

#[tokio::test]
#[traced_test]
async fn test_fetch_records_parses_medline() {
    let mock_server = MockServer::start().await;

    let body = format!(
        "{}{}",
        medline_text("100", "First article."),
        medline_text("101", "Second article.")
    );

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("id", "100,101"))
        .and(query_param("rettype", "medline"))
        .and(query_param("retmode", "text"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let records = client.fetch_records(&["100", "101"]).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].pmid(), Some("100"));
    assert_eq!(records[0].title(), Some("First article."));
    assert_eq!(records[1].pmid(), Some("101"));
    assert_eq!(records[1].authors(), ["Smith J"]);
    assert_eq!(
        explode_all_mesh(records[1].mesh_headings()),
        vec!["Heart/*drug effects", "Heart/metabolism"]
    );
}

#[tokio::test]
#[traced_test]
async fn test_fetch_records_does_not_chunk() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .expect(1)
        .mount(&mock_server)
        .await;

    let pmids: Vec<String> = (1..=500).map(|n| n.to_string()).collect();
    let client = create_mock_client(&mock_server);
    let records = client.fetch_records(&pmids).await.unwrap();

    assert!(records.is_empty());
}
