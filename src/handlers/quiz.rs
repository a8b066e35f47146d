// src/handlers/quiz.rs

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    backend::{Authed, BackendClient},
    compose::{ComposeError, QuizDraft, SelectedQuestion},
    error::AppError,
    models::quiz::{QuizCategory, QuizForm, QuizListParams, QuizPayload},
    utils::session::Session,
};

pub async fn list_quizzes(
    State(backend): State<BackendClient>,
    Extension(session): Extension<Session>,
    Query(params): Query<QuizListParams>,
) -> Result<impl IntoResponse, AppError> {
    params.validate()?;
    let page = backend.authed(&session).quizzes(&params).await?;
    Ok(Json(page))
}

pub async fn get_quiz(
    State(backend): State<BackendClient>,
    Extension(session): Extension<Session>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = backend.authed(&session).quiz(id).await?;
    Ok(Json(quiz))
}

pub async fn create_quiz(
    State(backend): State<BackendClient>,
    Extension(session): Extension<Session>,
    Json(form): Json<QuizForm>,
) -> Result<impl IntoResponse, AppError> {
    let api = backend.authed(&session);
    let payload = compose_quiz(&api, form).await?;

    let created = api.store_quiz(&payload).await?;
    tracing::info!("Quiz {} created ({})", created.id, payload.category.as_str());

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_quiz(
    State(backend): State<BackendClient>,
    Extension(session): Extension<Session>,
    Path(id): Path<i64>,
    Json(form): Json<QuizForm>,
) -> Result<impl IntoResponse, AppError> {
    let api = backend.authed(&session);
    let payload = compose_quiz(&api, form).await?;

    let updated = api.update_quiz(id, &payload).await?;
    tracing::info!("Quiz {} updated", id);

    Ok(Json(updated))
}

pub async fn delete_quiz(
    State(backend): State<BackendClient>,
    Extension(session): Extension<Session>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    backend.authed(&session).destroy_quiz(id).await?;
    tracing::info!("Quiz {} deleted", id);

    Ok(StatusCode::NO_CONTENT)
}

/// Turns a submitted form into a validated payload.
///
/// Online quizzes need the selected questions' scores, which only the
/// backend knows; they are fetched in selection order. Rules that do not
/// depend on scores are checked first so those failures stay local.
async fn compose_quiz(api: &Authed<'_>, form: QuizForm) -> Result<QuizPayload, AppError> {
    form.validate()?;
    if form.title.trim().is_empty() {
        return Err(ComposeError::EmptyTitle.into());
    }

    let mut questions: Vec<SelectedQuestion> = Vec::new();
    if form.category == QuizCategory::OnlineAuto {
        if form.question_ids.is_empty() {
            return Err(ComposeError::NoQuestionsSelected.into());
        }
        for id in &form.question_ids {
            if questions.iter().any(|q| q.id == *id) {
                continue;
            }
            questions.push(api.question(*id).await?.into());
        }
    }

    let payload = QuizDraft::from_form(form, questions)?.validate()?;
    Ok(payload)
}
