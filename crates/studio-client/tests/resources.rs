//! Request transport and resource endpoint tests.

mod common;

use serde_json::{json, Value};
use studio_client::models::{JobRef, NewJob, NewProfile, QueueOptions};
use studio_client::{ApiRequest, StudioClient, StudioConfig, StudioError};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{api_path, closed_port_uri, request_log, test_client, API_KEY};

#[tokio::test]
async fn test_job_lifecycle_endpoint_sequence() {
    let server = MockServer::start().await;
    let (client, _) = test_client(&server);

    Mock::given(method("POST"))
        .and(path(api_path("jobs")))
        .and(body_json(json!({ "name": "spring-catalog", "profile_id": 3 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 77,
            "name": "spring-catalog",
            "type": "regular",
            "profile_id": 3
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api_path("jobs/77/queue")))
        .and(body_json(json!({ "callback_url": "https://hooks.example/studio" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 77, "state": "queued" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("jobs/77/jobs_in_front")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "jobs_in_front": 4 })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api_path("jobs/77/cancel")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 77, "state": "cancelled" })))
        .mount(&server)
        .await;

    let job = client
        .create_job(&NewJob::new("spring-catalog").with_profile(3))
        .await
        .unwrap();
    assert_eq!(job.id, 77);
    assert!(job.is_regular());

    let queue = QueueOptions {
        callback_url: Some("https://hooks.example/studio".to_string()),
    };
    let queued = client.queue_job(job.id, &queue).await.unwrap();
    assert_eq!(queued["state"], "queued");

    let position = client.fetch_jobs_in_front(job.id).await.unwrap();
    assert_eq!(position["jobs_in_front"], 4);

    let cancelled = client.cancel_job(job.id).await.unwrap();
    assert_eq!(cancelled["state"], "cancelled");

    assert_eq!(
        request_log(&server).await,
        vec![
            "POST /api/public/v1/jobs",
            "POST /api/public/v1/jobs/77/queue",
            "GET /api/public/v1/jobs/77/jobs_in_front",
            "POST /api/public/v1/jobs/77/cancel",
        ]
    );
}

#[tokio::test]
async fn test_requests_carry_auth_and_client_headers() {
    let server = MockServer::start().await;
    let (client, _) = test_client(&server);
    let client_header = format!("rust-{}", env!("CARGO_PKG_VERSION"));

    Mock::given(method("GET"))
        .and(path(api_path("profiles")))
        .and(header("X-SLT-API-KEY", API_KEY))
        .and(header("X-SLT-API-CLIENT", client_header.as_str()))
        .and(header("Content-Type", "application/json"))
        .and(header("Accept", "text/plain"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "white-bg", "enable_extract": true },
            { "id": 2, "name": "color-only" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let profiles = client.list_profiles().await.unwrap();
    assert_eq!(profiles.len(), 2);
    assert_eq!(profiles[0].enable_extract, Some(true));
}

#[tokio::test]
async fn test_server_errors_become_typed_errors() {
    let server = MockServer::start().await;
    let (client, _) = test_client(&server);

    Mock::given(method("GET"))
        .and(path(api_path("jobs/404")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Job not found" })))
        .mount(&server)
        .await;

    let err = client.get_job(404).await.unwrap_err();
    assert!(matches!(
        &err,
        StudioError::Server { status: 404, message } if message == "Job not found"
    ));

    let descriptor = err.descriptor();
    assert_eq!(descriptor.status, Some(404));
    assert_eq!(descriptor.message, "Job not found");
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let client = StudioClient::new(StudioConfig::new(API_KEY).with_base_url(closed_port_uri())).unwrap();
    let err = client.list_jobs().await.unwrap_err();
    assert!(matches!(err, StudioError::Transport(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_lookups_by_name_use_query_parameters() {
    let server = MockServer::start().await;
    let (client, _) = test_client(&server);

    Mock::given(method("GET"))
        .and(path(api_path("jobs/find_by_name")))
        .and(query_param("name", "spring catalog"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 77, "name": "spring catalog" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("profiles/find_by_name")))
        .and(query_param("name", "white-bg"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1, "name": "white-bg" })))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.get_job_by_name("spring catalog").await.unwrap().id, 77);
    assert_eq!(client.get_profile_by_name("white-bg").await.unwrap().id, 1);
}

#[tokio::test]
async fn test_job_photos_by_id_and_name() {
    let server = MockServer::start().await;
    let (client, _) = test_client(&server);

    Mock::given(method("GET"))
        .and(path(api_path("photos/list_for_job")))
        .and(query_param("job_id", "77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 1, "job_id": 77 }])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("photos/list_for_job")))
        .and(query_param("job_name", "catalog"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let photos = client.get_job_photos(77u64).await.unwrap();
    assert_eq!(photos[0].job_id, Some(77));

    let photos = client.get_job_photos(JobRef::from("catalog")).await.unwrap();
    assert!(photos.is_empty());
}

#[tokio::test]
async fn test_delete_sends_no_body_and_accepts_empty_response() {
    let server = MockServer::start().await;
    let (client, _) = test_client(&server);

    Mock::given(method("DELETE"))
        .and(path(api_path("photos/5")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let ack = client.delete_photo(5).await.unwrap();
    assert_eq!(ack, Value::Null);

    let received = server.received_requests().await.unwrap();
    assert!(received[0].body.is_empty());
}

#[tokio::test]
async fn test_put_and_patch_send_payloads() {
    let server = MockServer::start().await;
    let (client, _) = test_client(&server);

    Mock::given(method("PUT"))
        .and(path(api_path("profiles/1")))
        .and(body_json(json!({
            "name": "white-bg",
            "enable_extract": true,
            "replace_background": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "name": "white-bg",
            "enable_extract": true,
            "replace_background": true
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(api_path("jobs/job_callback_url")))
        .and(body_json(json!({ "callback_url": "https://hooks.example/jobs" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let profile = client
        .update_profile(1, &NewProfile::new("white-bg").with_background_replacement())
        .await
        .unwrap();
    assert_eq!(profile.replace_background, Some(true));

    let ack = client
        .update_job_callback_url(&json!({ "callback_url": "https://hooks.example/jobs" }))
        .await
        .unwrap();
    assert_eq!(ack["ok"], true);
}

#[tokio::test]
async fn test_post_without_payload_sends_empty_body() {
    let server = MockServer::start().await;
    let (client, _) = test_client(&server);

    Mock::given(method("POST"))
        .and(path(api_path("jobs/9/process")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 9 })))
        .expect(1)
        .mount(&server)
        .await;

    client.process_job(9).await.unwrap();

    let received = server.received_requests().await.unwrap();
    assert!(received[0].body.is_empty());
}

#[tokio::test]
async fn test_raw_data_is_sent_when_no_payload() {
    let server = MockServer::start().await;
    let (client, _) = test_client(&server);

    Mock::given(method("PUT"))
        .and(path(api_path("photos/3")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 3 })))
        .expect(1)
        .mount(&server)
        .await;

    let photo: Value = client
        .request(ApiRequest::put("photos/3").data(r#"{"name":"renamed.jpg"}"#))
        .await
        .unwrap();
    assert_eq!(photo["id"], 3);

    let received = server.received_requests().await.unwrap();
    assert_eq!(received[0].body, br#"{"name":"renamed.jpg"}"#.to_vec());
}

#[tokio::test]
async fn test_non_json_success_body_is_invalid_response() {
    let server = MockServer::start().await;
    let (client, _) = test_client(&server);

    Mock::given(method("GET"))
        .and(path(api_path("photos")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client.list_photos().await.unwrap_err();
    assert!(matches!(err, StudioError::InvalidResponse(_)));
}
