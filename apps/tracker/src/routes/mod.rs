pub mod health;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::extraction::handlers as extraction;
use crate::jobs::handlers as jobs;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs
        .route(
            "/api/v1/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_add_job),
        )
        .route("/api/v1/jobs/import", post(extraction::handle_import_job))
        .route(
            "/api/v1/jobs/:id",
            get(jobs::handle_get_job)
                .put(jobs::handle_update_job)
                .delete(jobs::handle_delete_job),
        )
        .route("/api/v1/jobs/:id/status", patch(jobs::handle_set_status))
        .route("/api/v1/jobs/:id/archive", post(jobs::handle_archive_job))
        .route(
            "/api/v1/jobs/:id/documents",
            post(jobs::handle_attach_document),
        )
        .route(
            "/api/v1/jobs/:id/documents/:doc_id",
            delete(jobs::handle_detach_document),
        )
        // Dashboard views
        .route("/api/v1/board", get(jobs::handle_board))
        .route("/api/v1/metrics", get(jobs::handle_metrics))
        .route("/api/v1/dashboard", get(jobs::handle_dashboard))
        .route("/api/v1/documents", get(jobs::handle_documents))
        // Completion-API proxy
        .route("/api/extract-job", post(extraction::handle_extract_job))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::errors::AppError;
    use crate::extraction::{validate_url, ExtractedJob, JobExtractor};
    use crate::jobs::store::JobStore;

    /// Answers every URL with the same listing.
    struct CannedExtractor;

    #[async_trait]
    impl JobExtractor for CannedExtractor {
        async fn extract(&self, url: &str) -> Result<ExtractedJob, AppError> {
            validate_url(url)?;
            Ok(ExtractedJob {
                company: Some("Acme".into()),
                role: Some("Rust Engineer".into()),
                salary: Some("$150,000-$180,000".into()),
                source: Some("linkedin.com".into()),
                location: None,
                link: url.trim().to_string(),
            })
        }
    }

    /// Behaves like a model that answers in prose.
    struct RefusingExtractor;

    #[async_trait]
    impl JobExtractor for RefusingExtractor {
        async fn extract(&self, _url: &str) -> Result<ExtractedJob, AppError> {
            Err(AppError::Llm(
                "Failed to parse job details from API response".into(),
            ))
        }
    }

    fn app_with(store: JobStore, extractor: Arc<dyn JobExtractor>) -> Router {
        build_router(AppState {
            store,
            extractor,
            config: Config::default(),
        })
    }

    fn app() -> Router {
        app_with(JobStore::new(), Arc::new(CannedExtractor))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        app.clone().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create(app: &Router, company: &str, status: &str) -> Value {
        let response = send(
            app,
            "POST",
            "/api/v1/jobs",
            Some(json!({"company": company, "role": "Engineer", "status": status})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        json_body(response).await
    }

    #[tokio::test]
    async fn test_health_reports_ok() {
        let response = send(&app(), "GET", "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["extraction"]["configured"], false);
        assert_eq!(body["extraction"]["prompt"], "structured");
    }

    #[tokio::test]
    async fn test_add_and_fetch_job() {
        let app = app();
        let created = create(&app, "Acme", "Applied").await;
        assert_eq!(created["status"], "Applied");
        assert_eq!(created["dateApplied"], Value::Null);

        let id = created["id"].as_str().unwrap();
        let response = send(&app, "GET", &format!("/api/v1/jobs/{id}"), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["company"], "Acme");
    }

    #[tokio::test]
    async fn test_add_job_without_company_is_400() {
        let response = send(
            &app(),
            "POST",
            "/api/v1/jobs",
            Some(json!({"company": "", "role": "Engineer"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_add_job_unknown_status_is_rejected() {
        let response = send(
            &app(),
            "POST",
            "/api/v1/jobs",
            Some(json!({"company": "Acme", "role": "Engineer", "status": "Ghosted"})),
        )
        .await;
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_wrongly_typed_body_uses_error_shape() {
        let response = send(&app(), "POST", "/api/v1/jobs", Some(json!({"company": 5}))).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "UNPROCESSABLE_ENTITY");
        assert!(body["error"]["message"].as_str().unwrap().contains("company"));
    }

    #[tokio::test]
    async fn test_malformed_json_body_uses_error_shape() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/jobs")
            .header("content-type", "application/json")
            .body(Body::from("{\"company\": "))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_missing_content_type_uses_error_shape() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/extract-job")
            .body(Body::from(r#"{"url": "https://example.com/job"}"#))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert!(response.status().is_client_error());
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_bad_job_id_uses_error_shape() {
        let response = send(&app(), "GET", "/api/v1/jobs/not-a-uuid", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_get_unknown_job_is_404() {
        let uri = format!("/api/v1/jobs/{}", uuid::Uuid::new_v4());
        let response = send(&app(), "GET", &uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let app = app();
        let created = create(&app, "Acme", "Saved").await;
        let id = created["id"].as_str().unwrap();

        let response = send(
            &app,
            "PUT",
            &format!("/api/v1/jobs/{id}"),
            Some(json!({
                "company": "Acme",
                "role": "Senior Engineer",
                "status": "Interview",
                "dateApplied": "2025-05-20",
                "notes": "Onsite next week"
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["role"], "Senior Engineer");
        assert_eq!(body["status"], "Interview");
        assert_eq!(body["dateApplied"], "2025-05-20");
        assert_eq!(body["id"], created["id"]);
    }

    #[tokio::test]
    async fn test_status_move_and_board() {
        let app = app();
        let created = create(&app, "Acme", "Saved").await;
        let id = created["id"].as_str().unwrap();

        let response = send(
            &app,
            "PATCH",
            &format!("/api/v1/jobs/{id}/status"),
            Some(json!({"status": "Offer"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let board = json_body(send(&app, "GET", "/api/v1/board", None).await).await;
        let columns = board.as_array().unwrap();
        assert_eq!(columns.len(), 5);
        assert_eq!(columns[0]["status"], "Saved");
        assert!(columns[0]["jobs"].as_array().unwrap().is_empty());
        assert_eq!(columns[4]["status"], "Offer");
        assert_eq!(columns[4]["jobs"][0]["company"], "Acme");
    }

    #[tokio::test]
    async fn test_archive_hides_job_from_list_and_metrics() {
        let app = app();
        let keep = create(&app, "Keep", "Applied").await;
        let gone = create(&app, "Gone", "Offer").await;
        let gone_id = gone["id"].as_str().unwrap();

        let response = send(&app, "POST", &format!("/api/v1/jobs/{gone_id}/archive"), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "Archived");

        let list = json_body(send(&app, "GET", "/api/v1/jobs", None).await).await;
        let list = list.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["id"], keep["id"]);

        let all = json_body(send(&app, "GET", "/api/v1/jobs?include_archived=true", None).await).await;
        assert_eq!(all.as_array().unwrap().len(), 2);

        let metrics = json_body(send(&app, "GET", "/api/v1/metrics", None).await).await;
        assert_eq!(metrics["total"], 1);
        assert_eq!(metrics["offers"], 0);
    }

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let app = app();
        create(&app, "A", "Applied").await;
        create(&app, "B", "Saved").await;

        let list = json_body(send(&app, "GET", "/api/v1/jobs?status=Applied", None).await).await;
        let list = list.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["company"], "A");
    }

    #[tokio::test]
    async fn test_list_status_filter_is_case_insensitive() {
        let app = app();
        create(&app, "A", "Applied").await;
        create(&app, "B", "Saved").await;

        let response = send(&app, "GET", "/api/v1/jobs?status=applied", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let list = json_body(response).await;
        let list = list.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["company"], "A");
    }

    #[tokio::test]
    async fn test_list_unknown_status_uses_error_shape() {
        let response = send(&app(), "GET", "/api/v1/jobs?status=ghosted", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_delete_job() {
        let app = app();
        let created = create(&app, "Acme", "Saved").await;
        let uri = format!("/api/v1/jobs/{}", created["id"].as_str().unwrap());

        assert_eq!(send(&app, "DELETE", &uri, None).await.status(), StatusCode::NO_CONTENT);
        assert_eq!(send(&app, "GET", &uri, None).await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_attach_and_detach_document() {
        let app = app();
        let created = create(&app, "Acme", "Saved").await;
        let id = created["id"].as_str().unwrap();

        let response = send(
            &app,
            "POST",
            &format!("/api/v1/jobs/{id}/documents"),
            Some(json!({"document_id": "resume2"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["documents"], json!(["resume2"]));

        let response = send(
            &app,
            "POST",
            &format!("/api/v1/jobs/{id}/documents"),
            Some(json!({"documentId": "resume42"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(
            &app,
            "DELETE",
            &format!("/api/v1/jobs/{id}/documents/resume2"),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["documents"], json!([]));
    }

    #[tokio::test]
    async fn test_documents_catalog() {
        let body = json_body(send(&app(), "GET", "/api/v1/documents", None).await).await;
        let docs = body.as_array().unwrap();
        assert_eq!(docs.len(), 4);
        assert_eq!(docs[0]["id"], "resume1");
        assert_eq!(docs[2]["kind"], "cover_letter");
    }

    #[tokio::test]
    async fn test_dashboard_on_seeded_store() {
        let store = JobStore::new();
        store.seed_samples().await;
        let app = app_with(store, Arc::new(CannedExtractor));

        let body = json_body(send(&app, "GET", "/api/v1/dashboard", None).await).await;
        assert_eq!(body["metrics"]["total"], 6);
        assert_eq!(body["metrics"]["interviewRate"], 60);
        assert_eq!(body["metrics"]["successRate"], 20);
        assert_eq!(body["board"][1]["jobs"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_extract_job_returns_fields_with_link() {
        let url = "https://www.linkedin.com/jobs/view/42";
        let response = send(&app(), "POST", "/api/extract-job", Some(json!({"url": url}))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["company"], "Acme");
        assert_eq!(body["role"], "Rust Engineer");
        assert_eq!(body["link"], url);
    }

    #[tokio::test]
    async fn test_extract_job_requires_url() {
        let response = send(&app(), "POST", "/api/extract-job", Some(json!({}))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"]["message"],
            "URL is required"
        );
    }

    #[tokio::test]
    async fn test_extract_job_null_url_is_required_error() {
        for path in ["/api/extract-job", "/api/v1/jobs/import"] {
            let response = send(&app(), "POST", path, Some(json!({"url": null}))).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{path}");
            let body = json_body(response).await;
            assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
            assert_eq!(body["error"]["message"], "URL is required");
        }
    }

    #[tokio::test]
    async fn test_extract_job_blank_url_is_required_error() {
        let response = send(&app(), "POST", "/api/extract-job", Some(json!({"url": "   "}))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"]["message"],
            "URL is required"
        );
    }

    #[tokio::test]
    async fn test_extract_job_surfaces_parse_failure() {
        let app = app_with(JobStore::new(), Arc::new(RefusingExtractor));
        let response = send(
            &app,
            "POST",
            "/api/extract-job",
            Some(json!({"url": "https://example.com/job"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            json_body(response).await["error"]["message"],
            "Failed to parse job details from API response"
        );
    }

    #[tokio::test]
    async fn test_import_job_stores_saved_record() {
        let store = JobStore::new();
        let app = app_with(store.clone(), Arc::new(CannedExtractor));
        let url = "https://jobs.example.com/123";

        let response = send(&app, "POST", "/api/v1/jobs/import", Some(json!({"url": url}))).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["status"], "Saved");
        assert_eq!(body["company"], "Acme");
        assert_eq!(body["link"], url);
        assert_eq!(body["notes"], format!("Imported from {url}"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_import_failure_stores_nothing() {
        let store = JobStore::new();
        let app = app_with(store.clone(), Arc::new(RefusingExtractor));

        let response = send(
            &app,
            "POST",
            "/api/v1/jobs/import",
            Some(json!({"url": "https://example.com/job"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(store.len().await, 0);
    }
}
