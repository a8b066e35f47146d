// src/routes.rs

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, grade, question, quiz},
    state::AppState,
    utils::session::session_middleware,
};

/// Assembles the console router.
///
/// * `/api/auth` is public (login, logout, current session).
/// * Everything else under `/api` requires a session.
/// * Applies global middleware (Trace, CORS, upload size limit).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .console_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers([header::CONTENT_DISPOSITION])
        .allow_credentials(true);

    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me));

    let question_routes = Router::new()
        .route("/", get(question::list_questions).post(question::create_question))
        .route(
            "/{id}",
            get(question::get_question)
                .put(question::update_question)
                .delete(question::delete_question),
        )
        .route("/draft/retype", post(question::retype_draft));

    let quiz_routes = Router::new()
        .route("/", get(quiz::list_quizzes).post(quiz::create_quiz))
        .route(
            "/{id}",
            get(quiz::get_quiz).put(quiz::update_quiz).delete(quiz::delete_quiz),
        );

    let grade_routes = Router::new()
        .route("/analysis/{quiz_id}", get(grade::get_analysis))
        .route("/overview", get(grade::get_overview))
        .route("/student/{user_id}/trend", get(grade::get_student_trend))
        .route("/template", get(grade::download_template))
        .route("/import/preview", post(grade::preview_import))
        .route("/import", post(grade::import_grades));

    let protected = Router::new()
        .nest("/questions", question_routes)
        .nest("/quizzes", quiz_routes)
        .nest("/grade", grade_routes)
        .layer(middleware::from_fn_with_state(state.clone(), session_middleware));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api", protected)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(state.config.max_upload_bytes)),
        )
        .with_state(state)
}
