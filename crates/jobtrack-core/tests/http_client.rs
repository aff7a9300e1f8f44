//! Integration test: HTTP collaborators against a local scripted server.

mod common;

use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use common::status_server::{self, Reply};
use jobtrack_core::http::HttpJobClient;
use jobtrack_core::job::{
    ControllerConfig, JobController, JobStatus, JobSubmitter, PollResponse, RemoteStatus,
    StatusEndpoint,
};
use jobtrack_core::retry::{classify_exception, NETWORK_ERROR};

#[tokio::test]
async fn submit_posts_json_and_reads_job_id() {
    let server = status_server::start(vec![(
        "POST /api/jobs/resume-tailoring",
        vec![Reply::json(202, json!({"success": true, "jobId": "job-42"}))],
    )]);
    let client = HttpJobClient::new(&server.base_url, "api/jobs/{job_id}").unwrap();
    let submission = client
        .submission("api/jobs/resume-tailoring", json!({"resume": "r", "job": "j"}))
        .unwrap();

    let response = submission.submit().await.expect("submit");
    assert!(response.success);
    assert_eq!(response.job_id(), Some("job-42"));

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    let sent: Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(sent, json!({"resume": "r", "job": "j"}));
}

#[tokio::test]
async fn submit_http_error_becomes_rejection() {
    let server = status_server::start(vec![(
        "POST /api/jobs/interview-prep",
        vec![Reply::json(422, json!({"detail": "resume is required"}))],
    )]);
    let client = HttpJobClient::new(&server.base_url, "api/jobs/{job_id}").unwrap();
    let submission = client.submission("api/jobs/interview-prep", json!({})).unwrap();

    let response = submission.submit().await.expect("submit");
    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some("resume is required"));
    assert_eq!(response.job_id(), None);
}

#[tokio::test]
async fn status_ok_parses_snapshot() {
    let server = status_server::start(vec![(
        "GET /api/jobs/job-1",
        vec![Reply::json(
            200,
            json!({"status": "processing", "progress": 35, "message": "Analyzing resume"}),
        )],
    )]);
    let client = HttpJobClient::new(&server.base_url, "api/jobs/{job_id}").unwrap();

    let response: PollResponse<Value> = client.fetch(&client.status_url("job-1")).await.unwrap();
    match response {
        PollResponse::Ok(snapshot) => {
            assert_eq!(snapshot.status, RemoteStatus::Processing);
            assert_eq!(snapshot.progress, Some(35.0));
            assert_eq!(snapshot.message.as_deref(), Some("Analyzing resume"));
        }
        other => panic!("expected snapshot, got {other:?}"),
    }
}

#[tokio::test]
async fn status_503_reports_detail_and_retry_after() {
    let server = status_server::start(vec![(
        "GET /api/jobs/job-1",
        vec![Reply::json(503, json!({"detail": "worker busy"})).with_header("Retry-After", "5")],
    )]);
    let client = HttpJobClient::new(&server.base_url, "api/jobs/{job_id}").unwrap();

    let response: PollResponse<Value> = client.fetch(&client.status_url("job-1")).await.unwrap();
    assert_eq!(
        response,
        PollResponse::Failed {
            status: 503,
            error: Some("worker busy".to_string()),
            retry_after: Some("5".to_string()),
        }
    );
}

#[tokio::test]
async fn invalid_status_body_is_a_transport_error() {
    let server = status_server::start(vec![("GET /api/jobs/job-1", vec![Reply::raw(200, "not json")])]);
    let client = HttpJobClient::new(&server.base_url, "api/jobs/{job_id}").unwrap();

    let err = StatusEndpoint::<Value>::fetch(&client, &client.status_url("job-1"))
        .await
        .unwrap_err();
    assert!(err.message.contains("invalid status response"));
    assert!(!classify_exception(&err).retryable);
}

#[tokio::test]
async fn connection_refused_is_retryable_network_error() {
    let client = HttpJobClient::new(&status_server::closed_port_url(), "api/jobs/{job_id}")
        .unwrap()
        .with_timeout(Duration::from_secs(5));

    let err = StatusEndpoint::<Value>::fetch(&client, &client.status_url("job-1"))
        .await
        .unwrap_err();
    assert_eq!(err.name, NETWORK_ERROR);
    let classified = classify_exception(&err);
    assert!(classified.retryable);
    assert_eq!(classified.retry_after_ms(), 2000);
}

#[tokio::test]
async fn controller_tracks_job_over_http() {
    let server = status_server::start(vec![
        (
            "POST /api/jobs/career-plan",
            vec![Reply::json(200, json!({"success": true, "data": {"jobId": "plan-7"}}))],
        ),
        (
            "GET /api/jobs/plan-7",
            vec![
                Reply::json(200, json!({"status": "pending"})),
                Reply::json(200, json!({"status": "processing", "progress": 60})),
                Reply::json(200, json!({"status": "completed", "result": {"milestones": 3}})),
            ],
        ),
    ]);
    let client = HttpJobClient::new(&server.base_url, "api/jobs/{job_id}").unwrap();
    let submission = client.submission("api/jobs/career-plan", json!({"goal": "staff"})).unwrap();

    let config = ControllerConfig::default().with_poll_interval(Duration::from_millis(20));
    let controller: JobController<Value> = JobController::new(config, Arc::new(client.clone()));
    let status_client = client.clone();
    controller.start(Arc::new(submission), move |id| status_client.status_url(id));

    let state = tokio::time::timeout(Duration::from_secs(10), controller.wait_for_terminal())
        .await
        .expect("run should finish");
    assert_eq!(state.status, JobStatus::Completed);
    assert_eq!(state.result, Some(json!({"milestones": 3})));
    assert_eq!(state.job_id.as_deref(), Some("plan-7"));

    let polls = server
        .requests()
        .iter()
        .filter(|r| r.method == "GET")
        .count();
    assert_eq!(polls, 3);
}
