//! End-to-end orchestrator scenarios against a mock API server.

use std::path::Path;
use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use roster::error::AppError;
use roster::models::Config;
use roster::pipeline::run_export;
use roster::report::LogReporter;
use roster::storage::{CheckpointStore, FileCheckpointStore};

fn test_config(server_uri: &str, dir: &Path) -> Config {
    let mut config = Config::default();
    config.api.domain = server_uri.to_string();
    config.api.token = "123abc".to_string();
    config.fetcher.max_retries = 3;
    config.fetcher.backoff_base_ms = 1;
    config.fetcher.backoff_factor = 1.0;
    // Serial completion keeps first-seen-wins deterministic for assertions
    config.runner.max_concurrent = 1;
    config.runner.progress_interval = 1;
    config.paths.checkpoint_file = dir.join("progress.json").display().to_string();
    config.paths.export_file = dir.join("teachers.csv").display().to_string();
    config
}

fn enrollment(name: &str, login: &str, sis: Option<&str>) -> serde_json::Value {
    let mut user = json!({"name": name, "login_id": login});
    if let Some(sis) = sis {
        user["sis_user_id"] = json!(sis);
    }
    json!({"user": user})
}

async fn mount_courses(server: &MockServer, courses: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/v1/accounts/1/courses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(courses))
        .mount(server)
        .await;
}

fn three_courses() -> serde_json::Value {
    json!([
        {"id": 1, "course_code": "MATH 2024-01", "enrollment_term_id": 337},
        {"id": 2, "course_code": "CS 2024-02", "enrollment_term_id": 337},
        {"id": 3, "course_code": "Special Topics", "enrollment_term_id": 338}
    ])
}

#[tokio::test]
async fn full_run_processes_all_courses_and_exports_roster() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = Arc::new(test_config(&server.uri(), dir.path()));

    mount_courses(&server, three_courses()).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/courses/1/enrollments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            enrollment("Jane Doe", "jdoe", Some("12345_e")),
            enrollment("Al Smith", "asmith", Some("67890")),
        ])))
        .mount(&server)
        .await;

    // Same teacher with different name casing; first-seen (course 1) wins
    Mock::given(method("GET"))
        .and(path("/api/v1/courses/2/enrollments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            enrollment("JANE DOE", "jdoe", Some("12345")),
            enrollment("Bea White", "bwhite", None),
        ])))
        .mount(&server)
        .await;

    // Course 3 fails twice with a retryable status, then succeeds empty
    Mock::given(method("GET"))
        .and(path("/api/v1/courses/3/enrollments"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/courses/3/enrollments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let store = FileCheckpointStore::new(&config.paths.checkpoint_file);
    let stats = run_export(
        Arc::clone(&config),
        reqwest::Client::new(),
        &store,
        Arc::new(LogReporter),
        None,
    )
    .await
    .unwrap();

    assert_eq!(stats.total_courses, 3);
    assert_eq!(stats.submitted, 3);
    assert_eq!(stats.succeeded, 3);
    assert_eq!(stats.failed, 0);
    assert_eq!(stats.teacher_count, 3);

    let checkpoint = store.load().await.unwrap();
    assert!(checkpoint.is_processed(1));
    assert!(checkpoint.is_processed(2));
    assert!(checkpoint.is_processed(3));

    let jdoe = &checkpoint.teachers["jdoe"];
    assert_eq!(jdoe.first_name, "Jane");
    assert_eq!(jdoe.sis_id, "12345");
    assert_eq!(jdoe.course_segment, "MATH");
    assert_eq!(checkpoint.teachers["bwhite"].sis_id, "");

    let export = std::fs::read_to_string(&config.paths.export_file).unwrap();
    let lines: Vec<&str> = export.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[0],
        "First Name,Last Name,Login ID,Course Segment,SIS ID,Term ID"
    );
}

#[tokio::test]
async fn resumed_run_skips_checkpointed_courses() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = Arc::new(test_config(&server.uri(), dir.path()));

    // Prior run already completed course 1; its enrollments endpoint is not
    // mounted, so any request to it would fail the course.
    std::fs::write(
        &config.paths.checkpoint_file,
        json!({
            "processed": [1],
            "teachers": {
                "jdoe": {
                    "first_name": "Jane",
                    "last_name": "Doe",
                    "login_id": "jdoe",
                    "course_segment": "MATH",
                    "sis_id": "12345",
                    "term_id": 337
                }
            }
        })
        .to_string(),
    )
    .unwrap();

    mount_courses(&server, three_courses()).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/courses/2/enrollments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            enrollment("Bea White", "bwhite", None),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/courses/3/enrollments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let store = FileCheckpointStore::new(&config.paths.checkpoint_file);
    let stats = run_export(
        Arc::clone(&config),
        reqwest::Client::new(),
        &store,
        Arc::new(LogReporter),
        None,
    )
    .await
    .unwrap();

    assert_eq!(stats.already_processed, 1);
    assert_eq!(stats.submitted, 2);
    assert_eq!(stats.succeeded, 2);
    assert_eq!(stats.failed, 0);

    let checkpoint = store.load().await.unwrap();
    assert_eq!(checkpoint.processed.len(), 3);
    // Facts carried over from the prior run survive the resume
    assert_eq!(checkpoint.teachers["jdoe"].first_name, "Jane");
    assert!(checkpoint.teachers.contains_key("bwhite"));
}

#[tokio::test]
async fn course_failure_is_scoped_and_leaves_course_for_next_run() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = Arc::new(test_config(&server.uri(), dir.path()));

    mount_courses(&server, three_courses()).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/courses/1/enrollments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            enrollment("Jane Doe", "jdoe", Some("12345")),
        ])))
        .mount(&server)
        .await;
    // Course 2 is broken upstream; 404 is not retryable
    Mock::given(method("GET"))
        .and(path("/api/v1/courses/2/enrollments"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/courses/3/enrollments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            enrollment("Bea White", "bwhite", None),
        ])))
        .mount(&server)
        .await;

    let store = FileCheckpointStore::new(&config.paths.checkpoint_file);
    let stats = run_export(
        Arc::clone(&config),
        reqwest::Client::new(),
        &store,
        Arc::new(LogReporter),
        None,
    )
    .await
    .unwrap();

    assert_eq!(stats.succeeded, 2);
    assert_eq!(stats.failed, 1);

    // The failed course stays unprocessed so the next run retries it
    let checkpoint = store.load().await.unwrap();
    assert!(checkpoint.is_processed(1));
    assert!(!checkpoint.is_processed(2));
    assert!(checkpoint.is_processed(3));

    // Export is still written from the accumulated map
    let export = std::fs::read_to_string(&config.paths.export_file).unwrap();
    assert_eq!(export.lines().count(), 3);
}

#[tokio::test]
async fn corrupt_checkpoint_aborts_the_run_before_any_fetch() {
    let dir = TempDir::new().unwrap();
    let config = test_config("http://127.0.0.1:1", dir.path());

    std::fs::write(&config.paths.checkpoint_file, "{ torn write").unwrap();

    let store = FileCheckpointStore::new(&config.paths.checkpoint_file);
    let result = run_export(
        Arc::new(config),
        reqwest::Client::new(),
        &store,
        Arc::new(LogReporter),
        None,
    )
    .await;

    assert!(matches!(result, Err(AppError::CheckpointCorrupt { .. })));
}

#[tokio::test]
async fn term_filter_reaches_the_courses_endpoint() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = Arc::new(test_config(&server.uri(), dir.path()));

    Mock::given(method("GET"))
        .and(path("/api/v1/accounts/1/courses"))
        .and(wiremock::matchers::query_param("enrollment_term_id", "337"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let store = FileCheckpointStore::new(&config.paths.checkpoint_file);
    let stats = run_export(
        Arc::clone(&config),
        reqwest::Client::new(),
        &store,
        Arc::new(LogReporter),
        Some(337),
    )
    .await
    .unwrap();

    assert_eq!(stats.total_courses, 0);
    assert_eq!(stats.teacher_count, 0);
}
