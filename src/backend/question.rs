// src/backend/question.rs

use reqwest::Method;

use super::{Authed, BackendError};
use crate::models::{
    Page,
    question::{QuestionDetail, QuestionListParams, QuestionPayload},
};

impl Authed<'_> {
    pub async fn questions(&self, params: &QuestionListParams) -> Result<Page<QuestionDetail>, BackendError> {
        let path = "/questions";
        let request = self
            .request(Method::GET, self.client.endpoint(path)?)
            .query(params);
        self.fetch(path, request).await
    }

    pub async fn question(&self, id: i64) -> Result<QuestionDetail, BackendError> {
        let path = format!("/questions/{}", id);
        let request = self.request(Method::GET, self.client.endpoint(&path)?);
        self.fetch(&path, request).await
    }

    pub async fn store_question(&self, payload: &QuestionPayload) -> Result<QuestionDetail, BackendError> {
        let path = "/questions";
        let request = self
            .request(Method::POST, self.client.endpoint(path)?)
            .json(payload);
        self.fetch(path, request).await
    }

    pub async fn update_question(&self, id: i64, payload: &QuestionPayload) -> Result<(), BackendError> {
        let path = format!("/questions/{}", id);
        let request = self
            .request(Method::PUT, self.client.endpoint(&path)?)
            .json(payload);
        self.execute(&path, request).await
    }

    pub async fn destroy_question(&self, id: i64) -> Result<(), BackendError> {
        let path = format!("/questions/{}", id);
        let request = self.request(Method::DELETE, self.client.endpoint(&path)?);
        self.execute(&path, request).await
    }
}
