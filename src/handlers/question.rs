// src/handlers/question.rs

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{
    backend::BackendClient,
    compose::QuestionDraft,
    error::AppError,
    models::question::{QuestionForm, QuestionListParams, RetypeRequest},
    utils::session::Session,
};

pub async fn list_questions(
    State(backend): State<BackendClient>,
    Extension(session): Extension<Session>,
    Query(params): Query<QuestionListParams>,
) -> Result<impl IntoResponse, AppError> {
    params.validate()?;
    let page = backend.authed(&session).questions(&params).await?;
    Ok(Json(page))
}

/// Opens a stored question for editing, with its answer set made valid
/// for its type.
pub async fn get_question(
    State(backend): State<BackendClient>,
    Extension(session): Extension<Session>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let detail = backend.authed(&session).question(id).await?;
    let id = detail.id;
    let draft = QuestionDraft::edit(detail);

    Ok(Json(json!({
        "id": id,
        "type_label": draft.question_type().label(),
        "draft": draft.to_form(),
        "answer_options": draft.answer_options(),
    })))
}

/// Creates a question. The form is validated locally; nothing reaches the
/// backend unless every rule holds.
pub async fn create_question(
    State(backend): State<BackendClient>,
    Extension(session): Extension<Session>,
    Json(form): Json<QuestionForm>,
) -> Result<impl IntoResponse, AppError> {
    form.validate()?;
    let payload = QuestionDraft::from_form(form).validate()?;

    let created = backend.authed(&session).store_question(&payload).await?;
    tracing::info!("Question {} created", created.id);

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_question(
    State(backend): State<BackendClient>,
    Extension(session): Extension<Session>,
    Path(id): Path<i64>,
    Json(form): Json<QuestionForm>,
) -> Result<impl IntoResponse, AppError> {
    form.validate()?;
    let payload = QuestionDraft::from_form(form).validate()?;

    backend.authed(&session).update_question(id, &payload).await?;
    tracing::info!("Question {} updated", id);

    Ok(Json(json!({ "message": "Question updated successfully" })))
}

pub async fn delete_question(
    State(backend): State<BackendClient>,
    Extension(session): Extension<Session>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    backend.authed(&session).destroy_question(id).await?;
    tracing::info!("Question {} deleted", id);

    Ok(StatusCode::NO_CONTENT)
}

/// Applies a type change to an unsaved draft and returns the reconciled
/// draft (options and answers valid for the new type).
pub async fn retype_draft(Json(req): Json<RetypeRequest>) -> Result<impl IntoResponse, AppError> {
    req.draft.validate()?;
    let mut draft = QuestionDraft::from_form(req.draft);
    draft.change_type(req.target);

    Ok(Json(json!({
        "draft": draft.to_form(),
        "answer_options": draft.answer_options(),
    })))
}
