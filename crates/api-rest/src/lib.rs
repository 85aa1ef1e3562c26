//! # API REST
//!
//! HTTP surface for the diabetes survey.
//!
//! Handles:
//! - The server-rendered two-page survey (`/`, `/survey/:id`, form posts)
//! - A JSON session API under `/api/sessions` for non-browser clients
//! - OpenAPI/Swagger documentation and CORS
//!
//! Survey logic lives in `survey-core`; handlers only translate between HTTP and
//! [`SurveyService`] calls.

#![warn(rust_2018_idioms)]

pub mod html;

use axum::{
    extract::{Path as AxumPath, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::HealthService;
use survey_core::wire::{
    HealthRes, Page, Section1Answers, Section2Answers, SessionRes, SubmitRes,
};
use survey_core::{
    CoreConfig, SessionId, SurveyError, SurveyService, SUBMIT_SUCCESS_MESSAGE,
};

use crate::html::{render_page, Notice};

/// Application state shared across request handlers.
#[derive(Clone)]
pub struct AppState {
    pub survey: SurveyService,
}

impl AppState {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self {
            survey: SurveyService::new(cfg),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        create_session,
        get_session,
        submit_section1,
        submit_section2,
        end_session,
    ),
    components(schemas(
        HealthRes,
        Page,
        Section1Answers,
        Section2Answers,
        SessionRes,
        SubmitRes,
    ))
)]
pub struct ApiDoc;

/// Builds the full application router: HTML pages, JSON API and Swagger UI.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(start_survey))
        .route("/survey/:id", get(show_survey))
        .route("/survey/:id/section1", post(post_section1_form))
        .route("/survey/:id/section2", post(post_section2_form))
        .route("/health", get(health))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session).delete(end_session))
        .route("/api/sessions/:id/section1", post(submit_section1))
        .route("/api/sessions/:id/section2", post(submit_section2))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Maps a core error onto an HTTP status and a short, non-sensitive message.
fn error_status(err: &SurveyError) -> (StatusCode, &'static str) {
    match err {
        SurveyError::InvalidInput(_) | SurveyError::Uuid(_) => {
            (StatusCode::BAD_REQUEST, "Bad request")
        }
        SurveyError::SessionNotFound(_) => (StatusCode::NOT_FOUND, "Session not found"),
        SurveyError::NoStagedAnswers(_) => (
            StatusCode::CONFLICT,
            "Section 1 must be submitted before section 2",
        ),
        other => {
            tracing::error!("Survey error: {:?}", other);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}

/// Renders a survey page with `status`, or 500 if the template fails.
fn page_response(
    status: StatusCode,
    id: &SessionId,
    page: Page,
    notice: Option<Notice>,
) -> Response {
    match render_page(id, page, notice) {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            tracing::error!("Template error: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
        }
    }
}

fn parse_session_id(raw: &str) -> Result<SessionId, (StatusCode, &'static str)> {
    SessionId::parse(raw).map_err(|e| error_status(&SurveyError::from(e)))
}

// ============================================================================
// HTML PAGES
// ============================================================================

/// GET / - start a new survey session and send the browser to its first page.
#[axum::debug_handler]
async fn start_survey(State(state): State<AppState>) -> Response {
    match state.survey.start_session() {
        Ok(id) => Redirect::to(&format!("/survey/{}", id)).into_response(),
        Err(e) => error_status(&e).into_response(),
    }
}

/// GET /survey/:id - render the session's current page.
///
/// Unknown, expired or malformed sessions are sent back to `/` to start over.
#[axum::debug_handler]
async fn show_survey(
    State(state): State<AppState>,
    AxumPath(raw_id): AxumPath<String>,
) -> Response {
    let Ok(id) = SessionId::parse(&raw_id) else {
        return Redirect::to("/").into_response();
    };

    match state.survey.current_page(&id) {
        Ok(page) => page_response(StatusCode::OK, &id, page, None),
        Err(SurveyError::SessionNotFound(_)) => Redirect::to("/").into_response(),
        Err(e) => error_status(&e).into_response(),
    }
}

/// POST /survey/:id/section1 - stage Section 1 and move on to Section 2.
#[axum::debug_handler]
async fn post_section1_form(
    State(state): State<AppState>,
    AxumPath(raw_id): AxumPath<String>,
    Form(answers): Form<Section1Answers>,
) -> Response {
    let Ok(id) = SessionId::parse(&raw_id) else {
        return Redirect::to("/").into_response();
    };

    match state.survey.submit_section1(&id, answers) {
        Ok(_) => Redirect::to(&format!("/survey/{}", id)).into_response(),
        Err(SurveyError::SessionNotFound(_)) => Redirect::to("/").into_response(),
        Err(e) => error_status(&e).into_response(),
    }
}

/// POST /survey/:id/section2 - store the completed survey and show Section 1 again.
#[axum::debug_handler]
async fn post_section2_form(
    State(state): State<AppState>,
    AxumPath(raw_id): AxumPath<String>,
    Form(answers): Form<Section2Answers>,
) -> Response {
    let Ok(id) = SessionId::parse(&raw_id) else {
        return Redirect::to("/").into_response();
    };

    match state.survey.submit_section2(&id, answers) {
        Ok(_) => page_response(StatusCode::OK, &id, Page::Section1, Some(Notice::Submitted)),
        Err(SurveyError::NoStagedAnswers(_)) => page_response(
            StatusCode::CONFLICT,
            &id,
            Page::Section1,
            Some(Notice::SectionOneFirst),
        ),
        Err(SurveyError::SessionNotFound(_)) => Redirect::to("/").into_response(),
        Err(e) => error_status(&e).into_response(),
    }
}

// ============================================================================
// JSON API
// ============================================================================

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancers.
#[axum::debug_handler]
async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/api/sessions",
    responses(
        (status = 201, description = "Session started on section 1", body = SessionRes),
        (status = 500, description = "Internal server error")
    )
)]
/// Start a new survey session.
#[axum::debug_handler]
async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionRes>), (StatusCode, &'static str)> {
    let id = state.survey.start_session().map_err(|e| error_status(&e))?;
    Ok((
        StatusCode::CREATED,
        Json(SessionRes {
            session_id: id.to_string(),
            page: Page::Section1,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    params(("id" = String, Path, description = "Canonical session id")),
    responses(
        (status = 200, description = "Current page of the session", body = SessionRes),
        (status = 400, description = "Malformed session id"),
        (status = 404, description = "Unknown or expired session")
    )
)]
/// Report which page a session is on.
#[axum::debug_handler]
async fn get_session(
    State(state): State<AppState>,
    AxumPath(raw_id): AxumPath<String>,
) -> Result<Json<SessionRes>, (StatusCode, &'static str)> {
    let id = parse_session_id(&raw_id)?;
    let page = state.survey.current_page(&id).map_err(|e| error_status(&e))?;
    Ok(Json(SessionRes {
        session_id: id.to_string(),
        page,
    }))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/section1",
    params(("id" = String, Path, description = "Canonical session id")),
    request_body = Section1Answers,
    responses(
        (status = 200, description = "Answers staged; session is on section 2", body = SessionRes),
        (status = 400, description = "Malformed session id"),
        (status = 404, description = "Unknown or expired session")
    )
)]
/// Stage Section 1 answers.
///
/// Every field is free text and optional; missing fields are stored as empty strings.
#[axum::debug_handler]
async fn submit_section1(
    State(state): State<AppState>,
    AxumPath(raw_id): AxumPath<String>,
    Json(answers): Json<Section1Answers>,
) -> Result<Json<SessionRes>, (StatusCode, &'static str)> {
    let id = parse_session_id(&raw_id)?;
    let page = state
        .survey
        .submit_section1(&id, answers)
        .map_err(|e| error_status(&e))?;
    Ok(Json(SessionRes {
        session_id: id.to_string(),
        page,
    }))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/section2",
    params(("id" = String, Path, description = "Canonical session id")),
    request_body = Section2Answers,
    responses(
        (status = 200, description = "Survey stored; session is back on section 1", body = SubmitRes),
        (status = 400, description = "Malformed session id"),
        (status = 404, description = "Unknown or expired session"),
        (status = 409, description = "Section 1 has not been submitted"),
        (status = 500, description = "Internal server error")
    )
)]
/// Complete the survey: merge with the staged Section 1 answers and store the response.
#[axum::debug_handler]
async fn submit_section2(
    State(state): State<AppState>,
    AxumPath(raw_id): AxumPath<String>,
    Json(answers): Json<Section2Answers>,
) -> Result<Json<SubmitRes>, (StatusCode, &'static str)> {
    let id = parse_session_id(&raw_id)?;
    state
        .survey
        .submit_section2(&id, answers)
        .map_err(|e| error_status(&e))?;
    Ok(Json(SubmitRes {
        page: Page::Section1,
        message: SUBMIT_SUCCESS_MESSAGE.into(),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/sessions/{id}",
    params(("id" = String, Path, description = "Canonical session id")),
    responses(
        (status = 204, description = "Session ended"),
        (status = 400, description = "Malformed session id"),
        (status = 404, description = "Unknown or expired session")
    )
)]
/// End a session, discarding any staged answers.
#[axum::debug_handler]
async fn end_session(
    State(state): State<AppState>,
    AxumPath(raw_id): AxumPath<String>,
) -> Result<StatusCode, (StatusCode, &'static str)> {
    let id = parse_session_id(&raw_id)?;
    state.survey.end_session(&id).map_err(|e| error_status(&e))?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use tempfile::TempDir;
    use tower::ServiceExt;

    struct TestApp {
        _dir: TempDir,
        state: AppState,
    }

    impl TestApp {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let cfg = CoreConfig::new(dir.path().join("responses.csv"), 3600).unwrap();
            Self {
                _dir: dir,
                state: AppState::new(Arc::new(cfg)),
            }
        }

        async fn send(&self, request: Request<Body>) -> (StatusCode, Option<String>, String) {
            let response = router(self.state.clone()).oneshot(request).await.unwrap();
            let status = response.status();
            let location = response
                .headers()
                .get(header::LOCATION)
                .map(|v| v.to_str().unwrap().to_string());
            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            (status, location, String::from_utf8(bytes.to_vec()).unwrap())
        }

        async fn get(&self, uri: &str) -> (StatusCode, Option<String>, String) {
            self.send(Request::get(uri).body(Body::empty()).unwrap())
                .await
        }

        async fn post_form(&self, uri: &str, form: &str) -> (StatusCode, Option<String>, String) {
            self.send(
                Request::post(uri)
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(form.to_string()))
                    .unwrap(),
            )
            .await
        }

        async fn post_json(
            &self,
            uri: &str,
            json: serde_json::Value,
        ) -> (StatusCode, Option<String>, String) {
            self.send(
                Request::post(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json.to_string()))
                    .unwrap(),
            )
            .await
        }

        /// Follows `GET /` and returns the new session's page path.
        async fn start_browser_session(&self) -> String {
            let (status, location, _) = self.get("/").await;
            assert_eq!(status, StatusCode::SEE_OTHER);
            location.expect("redirect location")
        }

        async fn start_api_session(&self) -> String {
            let (status, _, body) = self.post_json("/api/sessions", serde_json::json!({})).await;
            assert_eq!(status, StatusCode::CREATED);
            let res: SessionRes = serde_json::from_str(&body).unwrap();
            res.session_id
        }
    }

    #[tokio::test]
    async fn test_health() {
        let app = TestApp::new();
        let (status, _, body) = app.get("/health").await;

        assert_eq!(status, StatusCode::OK);
        let res: HealthRes = serde_json::from_str(&body).unwrap();
        assert!(res.ok);
    }

    #[tokio::test]
    async fn test_browser_flow_stores_one_row() {
        let app = TestApp::new();
        let page = app.start_browser_session().await;

        let (status, _, body) = app.get(&page).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(">Next</button>"));

        let (status, location, _) = app
            .post_form(
                &format!("{}/section1", page),
                "name=Asha+Rao&email=asha%40example.com&bmi=22.5&resources=Diet%2C+exercise",
            )
            .await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some(page.as_str()));

        let (_, _, body) = app.get(&page).await;
        assert!(body.contains("Medication Management"));

        let (status, _, body) = app
            .post_form(
                &format!("{}/section2", page),
                "medication_types=Insulin%2C+Metformin&side_effects=No",
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(SUBMIT_SUCCESS_MESSAGE));
        assert!(body.contains(">Next</button>"));

        let table = app.state.survey.store().read_table().unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.header.len(), 21);
        assert_eq!(table.cell(0, "name"), Some("Asha Rao"));
        assert_eq!(table.cell(0, "email"), Some("asha@example.com"));
        assert_eq!(table.cell(0, "resources"), Some("Diet, exercise"));
        assert_eq!(table.cell(0, "medication_types"), Some("Insulin, Metformin"));
        assert_eq!(table.cell(0, "diet"), Some(""));
    }

    #[tokio::test]
    async fn test_browser_empty_forms_store_empty_row() {
        let app = TestApp::new();
        let page = app.start_browser_session().await;

        app.post_form(&format!("{}/section1", page), "").await;
        let (status, _, _) = app.post_form(&format!("{}/section2", page), "").await;
        assert_eq!(status, StatusCode::OK);

        let table = app.state.survey.store().read_table().unwrap();
        assert_eq!(table.rows, vec![vec![String::new(); 21]]);
    }

    #[tokio::test]
    async fn test_browser_section2_first_is_refused() {
        let app = TestApp::new();
        let page = app.start_browser_session().await;

        let (status, _, body) = app
            .post_form(&format!("{}/section2", page), "side_effects=Yes")
            .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body.contains("complete the first section"));
        assert!(body.contains(">Next</button>"));
        assert!(!app.state.survey.store().path().exists());
    }

    #[tokio::test]
    async fn test_browser_unknown_session_starts_over() {
        let app = TestApp::new();

        let (status, location, _) = app.get(&format!("/survey/{}", SessionId::new())).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/"));

        let (status, location, _) = app.get("/survey/not-a-session").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/"));
    }

    #[tokio::test]
    async fn test_markup_in_answers_is_stored_verbatim() {
        let app = TestApp::new();
        let page = app.start_browser_session().await;

        app.post_form(&format!("{}/section1", page), "name=%3Cscript%3E")
            .await;
        let (_, _, body) = app.post_form(&format!("{}/section2", page), "").await;

        assert!(!body.contains("<script>"));
        let table = app.state.survey.store().read_table().unwrap();
        assert_eq!(table.cell(0, "name"), Some("<script>"));
    }

    #[tokio::test]
    async fn test_api_flow_stores_one_row() {
        let app = TestApp::new();
        let id = app.start_api_session().await;

        let (status, _, body) = app
            .post_json(
                &format!("/api/sessions/{}/section1", id),
                serde_json::json!({ "name": "Ravi", "diabetes_type": "Type 1" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let res: SessionRes = serde_json::from_str(&body).unwrap();
        assert_eq!(res.page, Page::Section2);

        let (status, _, body) = app
            .post_json(
                &format!("/api/sessions/{}/section2", id),
                serde_json::json!({ "tracking_methods": "Mobile app" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let res: SubmitRes = serde_json::from_str(&body).unwrap();
        assert_eq!(res.page, Page::Section1);
        assert_eq!(res.message, SUBMIT_SUCCESS_MESSAGE);

        let table = app.state.survey.store().read_table().unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.cell(0, "name"), Some("Ravi"));
        assert_eq!(table.cell(0, "diabetes_type"), Some("Type 1"));
        assert_eq!(table.cell(0, "tracking_methods"), Some("Mobile app"));
    }

    #[tokio::test]
    async fn test_api_section2_first_is_conflict() {
        let app = TestApp::new();
        let id = app.start_api_session().await;

        let (status, _, _) = app
            .post_json(
                &format!("/api/sessions/{}/section2", id),
                serde_json::json!({}),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, _, body) = app.get(&format!("/api/sessions/{}", id)).await;
        let res: SessionRes = serde_json::from_str(&body).unwrap();
        assert_eq!(res.page, Page::Section1);
    }

    #[tokio::test]
    async fn test_api_sessions_are_isolated() {
        let app = TestApp::new();
        let a = app.start_api_session().await;
        app.post_json(
            &format!("/api/sessions/{}/section1", a),
            serde_json::json!({ "name": "User A" }),
        )
        .await;

        let b = app.start_api_session().await;
        let (status, _, _) = app
            .post_json(
                &format!("/api/sessions/{}/section2", b),
                serde_json::json!({}),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);

        app.post_json(
            &format!("/api/sessions/{}/section1", b),
            serde_json::json!({ "name": "User B" }),
        )
        .await;
        app.post_json(
            &format!("/api/sessions/{}/section2", b),
            serde_json::json!({}),
        )
        .await;

        let table = app.state.survey.store().read_table().unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.cell(0, "name"), Some("User B"));
    }

    #[tokio::test]
    async fn test_api_session_lookup_errors() {
        let app = TestApp::new();

        let (status, _, _) = app.get("/api/sessions/not-canonical").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _, _) = app.get(&format!("/api/sessions/{}", SessionId::new())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_api_end_session() {
        let app = TestApp::new();
        let id = app.start_api_session().await;
        let uri = format!("/api/sessions/{}", id);

        let delete = || Request::delete(uri.as_str()).body(Body::empty()).unwrap();
        let (status, _, _) = app.send(delete()).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _, _) = app.send(delete()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _, _) = app.get(&uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_store_failure_is_internal_error_on_both_surfaces() {
        let app = TestApp::new();
        // A directory in place of the store file makes every read fail.
        std::fs::create_dir(app.state.survey.store().path()).unwrap();

        let page = app.start_browser_session().await;
        app.post_form(&format!("{}/section1", page), "name=Asha").await;
        let (status, _, body) = app.post_form(&format!("{}/section2", page), "").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Internal error");

        let id = app.start_api_session().await;
        app.post_json(
            &format!("/api/sessions/{}/section1", id),
            serde_json::json!({ "name": "Ravi" }),
        )
        .await;
        let (status, _, body) = app
            .post_json(
                &format!("/api/sessions/{}/section2", id),
                serde_json::json!({}),
            )
            .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Internal error");

        // The staged answers survive, so the client can retry.
        let (_, _, body) = app.get(&format!("/api/sessions/{}", id)).await;
        let res: SessionRes = serde_json::from_str(&body).unwrap();
        assert_eq!(res.page, Page::Section2);
    }

    #[tokio::test]
    async fn test_corrupt_store_is_internal_error() {
        let app = TestApp::new();
        std::fs::write(
            app.state.survey.store().path(),
            "name,email\nAsha,asha@example.com,extra\n",
        )
        .unwrap();

        let id = app.start_api_session().await;
        app.post_json(
            &format!("/api/sessions/{}/section1", id),
            serde_json::json!({ "name": "Ravi" }),
        )
        .await;
        let (status, _, _) = app
            .post_json(
                &format!("/api/sessions/{}/section2", id),
                serde_json::json!({}),
            )
            .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(app.state.survey.store().count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let app = TestApp::new();
        let (status, _, body) = app.get("/api-docs/openapi.json").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("/api/sessions/{id}/section2"));
    }
}
