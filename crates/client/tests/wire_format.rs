use regulus_client::{ApiOutcome, ClientError, RegulationsClient, ReqwestTransport};
use regulus_core::DocumentSearch;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> RegulationsClient {
    let key: SecretString = "test-api-key".to_string().into();
    let transport = ReqwestTransport::new(&key).expect("transport");
    RegulationsClient::new(transport, &format!("{}/v4", server.uri())).expect("client")
}

#[tokio::test]
async fn list_request_sends_key_content_type_and_bracketed_params() {
    let server = MockServer::start().await;
    let body = json!({
        "data": [],
        "meta": { "pageNumber": 2, "pageSize": 25, "totalElements": 0 }
    });

    Mock::given(method("GET"))
        .and(path("/v4/documents"))
        .and(header("x-api-key", "test-api-key"))
        .and(header("content-type", "application/vnd.api+json"))
        .and(query_param("filter[agencyId]", "EPA"))
        .and(query_param("filter[postedDate][ge]", "2024-01-01"))
        .and(query_param("sort", "title"))
        .and(query_param("page[number]", "2"))
        .and(query_param("page[size]", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let search = DocumentSearch {
        agency_id: Some("EPA".to_string()),
        posted_date_ge: Some("2024-01-01".to_string()),
        sort: Some("title".to_string()),
        page_number: Some("2".into()),
        page_size: Some(25.into()),
        ..DocumentSearch::default()
    };

    let outcome = client_for(&server).get_documents(&search).await.expect("ok");
    assert_eq!(outcome, ApiOutcome::Ok(body));
}

#[tokio::test]
async fn missing_document_maps_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/documents/NOPE-0000"))
        .and(query_param("include", "attachments"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let outcome =
        client_for(&server).get_document_details("NOPE-0000", true).await.expect("soft failure");
    assert_eq!(outcome.into_json(), json!({ "error": "Resource not found", "status_code": 404 }));
}

#[tokio::test]
async fn rate_limited_request_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/comments"))
        .respond_with(ResponseTemplate::new(429).set_body_string("OVER_RATE_LIMIT"))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .get_comments(&Default::default())
        .await
        .expect_err("429 is not a soft failure");
    assert!(matches!(error, ClientError::Http { status: 429, .. }));
}
