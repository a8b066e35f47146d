// src/backend/grade.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{
    Method,
    multipart::{Form, Part},
};

use super::{Authed, BackendError};
use crate::{
    grade_import::{GradeImporter, SelectedFile},
    models::grade::{GradeAnalysis, ImportSummary, TrendPoint},
};

impl Authed<'_> {
    /// Statistics for a quiz. `refresh` asks the backend to recompute them.
    pub async fn grade_analysis(&self, quiz_id: i64, refresh: bool) -> Result<GradeAnalysis, BackendError> {
        let path = format!("/grade/analysis/{}", quiz_id);
        let request = self
            .request(Method::GET, self.client.endpoint(&path)?)
            .query(&[("refresh", if refresh { "1" } else { "0" })]);
        self.fetch(&path, request).await
    }

    /// A student's score history, optionally bounded by a date window.
    pub async fn student_trend(
        &self,
        user_id: i64,
        window: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Vec<TrendPoint>, BackendError> {
        let path = format!("/grade/student/{}/trend", user_id);
        let mut request = self.request(Method::GET, self.client.endpoint(&path)?);
        if let Some((start, end)) = window {
            request = request.query(&[
                ("start", start.format("%Y-%m-%d").to_string()),
                ("end", end.format("%Y-%m-%d").to_string()),
            ]);
        }
        self.fetch(&path, request).await
    }

    /// Uploads the raw spreadsheet; the backend parses and persists it.
    pub async fn import_offline_grade(&self, quiz_id: i64, file: &SelectedFile) -> Result<ImportSummary, BackendError> {
        let path = "/grade/import";
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(file.mime())?;
        let form = Form::new()
            .text("quiz_id", quiz_id.to_string())
            .part("file", part);

        let request = self
            .request(Method::POST, self.client.endpoint(path)?)
            .multipart(form);
        self.fetch(path, request).await
    }
}

#[async_trait]
impl GradeImporter for Authed<'_> {
    async fn import(&self, quiz_id: i64, file: &SelectedFile) -> Result<ImportSummary, BackendError> {
        self.import_offline_grade(quiz_id, file).await
    }
}
