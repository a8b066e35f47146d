// src/backend/quiz.rs

use reqwest::Method;

use super::{Authed, BackendError};
use crate::models::{
    Page,
    quiz::{QuizDetail, QuizListParams, QuizPayload, QuizSummary},
};

impl Authed<'_> {
    pub async fn quizzes(&self, params: &QuizListParams) -> Result<Page<QuizSummary>, BackendError> {
        let path = "/quizzes";
        let request = self
            .request(Method::GET, self.client.endpoint(path)?)
            .query(params);
        self.fetch(path, request).await
    }

    pub async fn quiz(&self, id: i64) -> Result<QuizDetail, BackendError> {
        let path = format!("/quizzes/{}", id);
        let request = self.request(Method::GET, self.client.endpoint(&path)?);
        self.fetch(&path, request).await
    }

    pub async fn store_quiz(&self, payload: &QuizPayload) -> Result<QuizDetail, BackendError> {
        let path = "/quizzes";
        let request = self
            .request(Method::POST, self.client.endpoint(path)?)
            .json(payload);
        self.fetch(path, request).await
    }

    pub async fn update_quiz(&self, id: i64, payload: &QuizPayload) -> Result<QuizDetail, BackendError> {
        let path = format!("/quizzes/{}", id);
        let request = self
            .request(Method::PUT, self.client.endpoint(&path)?)
            .json(payload);
        self.fetch(&path, request).await
    }

    pub async fn destroy_quiz(&self, id: i64) -> Result<(), BackendError> {
        let path = format!("/quizzes/{}", id);
        let request = self.request(Method::DELETE, self.client.endpoint(&path)?);
        self.execute(&path, request).await
    }
}
