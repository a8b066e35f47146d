// src/handlers/grade.rs

use axum::{
    Json,
    extract::{Extension, Multipart, Path, Query, State},
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    backend::BackendClient,
    error::AppError,
    grade_import::{
        ImportDialog, ImportError, ImportLocks, QuizTarget,
        template::{XLSX_MIME, build_template, template_file_name},
    },
    models::{
        grade::{AnalysisParams, AnalysisView, GradeOverview, OverviewParams, TrendParams},
        quiz::QuizListParams,
    },
    utils::session::Session,
};

const OVERVIEW_PAGE_SIZE: i64 = 200;

const EMPTY_PREVIEW_WARNING: &str = "No valid data found in the file.";

/// Statistics of one quiz, formatted for display.
pub async fn get_analysis(
    State(backend): State<BackendClient>,
    Extension(session): Extension<Session>,
    Path(quiz_id): Path<i64>,
    Query(params): Query<AnalysisParams>,
) -> Result<impl IntoResponse, AppError> {
    let analysis = backend
        .authed(&session)
        .grade_analysis(quiz_id, params.refresh)
        .await?;
    Ok(Json(AnalysisView::from(analysis)))
}

/// Grade center: first page of quizzes, filtered by category, with totals.
pub async fn get_overview(
    State(backend): State<BackendClient>,
    Extension(session): Extension<Session>,
    Query(params): Query<OverviewParams>,
) -> Result<impl IntoResponse, AppError> {
    let list = QuizListParams {
        page: 1,
        size: OVERVIEW_PAGE_SIZE,
        keyword: None,
    };
    let page = backend.authed(&session).quizzes(&list).await?;
    Ok(Json(GradeOverview::from_quizzes(page.data, params.category)))
}

pub async fn get_student_trend(
    State(backend): State<BackendClient>,
    Extension(session): Extension<Session>,
    Path(user_id): Path<i64>,
    Query(params): Query<TrendParams>,
) -> Result<impl IntoResponse, AppError> {
    let window = match (params.start, params.end) {
        (Some(start), Some(end)) if start > end => {
            return Err(AppError::BadRequest(
                "start must not be later than end".to_string(),
            ));
        }
        (Some(start), Some(end)) => Some((start, end)),
        _ => None,
    };

    let points = backend.authed(&session).student_trend(user_id, window).await?;
    Ok(Json(points))
}

#[derive(Debug, Deserialize)]
pub struct TemplateParams {
    pub quiz_title: Option<String>,
}

/// Downloadable grade template, optionally named after a quiz.
pub async fn download_template(Query(params): Query<TemplateParams>) -> Result<impl IntoResponse, AppError> {
    let bytes = build_template()?;
    let file_name = template_file_name(params.quiz_title.as_deref());
    let encoded: String = url::form_urlencoded::byte_serialize(file_name.as_bytes()).collect();

    let headers = [
        (header::CONTENT_TYPE, XLSX_MIME.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"template.xlsx\"; filename*=UTF-8''{}",
                encoded.replace('+', "%20")
            ),
        ),
    ];

    Ok((headers, bytes))
}

/// Multipart fields of the import endpoints.
#[derive(Debug, Default)]
struct ImportUpload {
    quiz_id: Option<String>,
    quiz_title: Option<String>,
    file: Option<(String, Vec<u8>)>,
}

async fn read_upload(mut multipart: Multipart) -> Result<ImportUpload, AppError> {
    let mut upload = ImportUpload::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "quiz_id" => upload.quiz_id = Some(field.text().await?),
            "quiz_title" => upload.quiz_title = Some(field.text().await?),
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                upload.file = Some((file_name, bytes.to_vec()));
            }
            other => tracing::debug!("Ignoring multipart field {}", other),
        }
    }

    Ok(upload)
}

/// Parses an uploaded sheet and returns the capped preview.
pub async fn preview_import(multipart: Multipart) -> Result<impl IntoResponse, AppError> {
    let upload = read_upload(multipart).await?;
    let (name, bytes) = upload.file.ok_or(ImportError::MissingFile)?;

    let mut dialog = ImportDialog::open(None);
    dialog.select_file(name, bytes)?;

    let preview = dialog.preview();
    let warning = preview.is_empty().then_some(EMPTY_PREVIEW_WARNING);

    Ok(Json(json!({
        "rows": preview.rows,
        "parsed_rows": preview.parsed_rows,
        "truncated": preview.is_truncated(),
        "warning": warning,
    })))
}

/// Uploads an offline grade sheet for a quiz.
///
/// The sheet is parsed locally first; a file that cannot be read is never
/// sent. The raw bytes go to the backend unchanged. Only one upload per quiz
/// is in flight at a time; a concurrent one gets 409.
pub async fn import_grades(
    State(backend): State<BackendClient>,
    State(imports): State<ImportLocks>,
    Extension(session): Extension<Session>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let upload = read_upload(multipart).await?;

    let quiz = match upload.quiz_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(QuizTarget {
            id: raw
                .parse::<i64>()
                .map_err(|_| AppError::BadRequest("quiz_id must be a number".to_string()))?,
            title: upload.quiz_title.filter(|t| !t.trim().is_empty()),
        }),
        None => None,
    };

    let mut dialog = ImportDialog::open(quiz);
    if let Some((name, bytes)) = upload.file {
        dialog.select_file(name, bytes)?;
    }

    // A second submit for the same quiz is refused while one is running.
    let _permit = match dialog.quiz() {
        Some(quiz) if dialog.selected_file().is_some() => Some(imports.acquire(quiz.id)?),
        _ => None,
    };

    let api = backend.authed(&session);
    let summary = dialog.submit(&api).await?;

    Ok(Json(json!({
        "message": format!("{} completed", dialog.title()),
        "summary": summary,
    })))
}
