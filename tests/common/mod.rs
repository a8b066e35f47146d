// tests/common/mod.rs

#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use admin_console::{backend::BackendClient, config::Config, routes, state::AppState};
use axum::{
    Json, Router,
    body::Body,
    extract::{Multipart, Path, State},
    http::{Request, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};

pub const PASSWORD: &str = "secret";
pub const TOKEN: &str = "tok-1";

/// What the mock backend saw and how it should behave.
#[derive(Default)]
pub struct BackendLog {
    /// `METHOD /path` of every request, in arrival order.
    pub requests: Mutex<Vec<String>>,
    /// `(quiz_id, file name, byte count)` of each import upload.
    pub imports: Mutex<Vec<(String, String, usize)>>,
    /// JSON bodies of stored quizzes and questions.
    pub stored: Mutex<Vec<Value>>,
    /// When set, every authenticated call answers HTTP 401.
    pub token_expired: AtomicBool,
}

impl BackendLog {
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.requests().iter().filter(|r| r.starts_with(prefix)).count()
    }
}

fn ok(data: Value) -> Json<Value> {
    Json(json!({ "code": 0, "msg": "", "data": data }))
}

fn question_json(id: i64) -> Option<Value> {
    let score = match id {
        1 => 10,
        2 => 20,
        3 => 30,
        _ => return None,
    };
    Some(json!({
        "id": id,
        "type": "SINGLE",
        "content": format!("Question {}", id),
        "score": score,
        "options": [{"value": "A", "label": "yes"}, {"value": "B", "label": "no"}],
        "answer": ["A"],
    }))
}

async fn record_and_authorize(
    State(log): State<Arc<BackendLog>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let line = format!("{} {}", req.method(), req.uri().path());
    log.requests.lock().unwrap().push(line);

    if req.uri().path().ends_with("/auth/login") {
        return next.run(req).await;
    }

    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TOKEN))
        .unwrap_or(false);

    if !bearer || log.token_expired.load(Ordering::SeqCst) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    next.run(req).await
}

async fn login(Json(body): Json<Value>) -> Json<Value> {
    if body["password"] == PASSWORD {
        ok(json!({ "token": TOKEN }))
    } else {
        Json(json!({ "code": -1, "msg": "Incorrect email or password", "data": null }))
    }
}

async fn detail() -> Json<Value> {
    ok(json!({
        "user": { "id": 1, "name": "Root", "email": "admin@example.com" },
        "permissions": { "question": true, "quiz": true },
    }))
}

async fn show_question(Path(id): Path<i64>) -> Json<Value> {
    match question_json(id) {
        Some(q) => ok(q),
        None => Json(json!({ "code": 404, "msg": "Question not found", "data": null })),
    }
}

async fn store_question(State(log): State<Arc<BackendLog>>, Json(body): Json<Value>) -> Json<Value> {
    log.stored.lock().unwrap().push(body.clone());
    let mut created = body;
    created["id"] = json!(99);
    ok(created)
}

async fn list_quizzes() -> Json<Value> {
    ok(json!({
        "data": [
            { "id": 1, "title": "Online A", "category": "ONLINE_AUTO", "participant_count": 10, "pass_rate": 0.5 },
            { "id": 2, "title": "Offline B", "category": "OFFLINE_MANUAL", "participant_count": 4, "pass_rate": 1.0 },
        ],
        "total": 2,
    }))
}

async fn store_quiz(State(log): State<Arc<BackendLog>>, Json(body): Json<Value>) -> Json<Value> {
    log.stored.lock().unwrap().push(body.clone());
    let mut created = body;
    created["id"] = json!(7);
    ok(created)
}

async fn analysis(Path(id): Path<i64>) -> Json<Value> {
    ok(json!({
        "quiz": { "id": id, "title": "Offline B", "category": "OFFLINE_MANUAL", "total_score": 100, "pass_score": 60 },
        "stats": {
            "participant_count": 3,
            "average_score": 71.666,
            "median_score": 72.0,
            "max_score": 85.0,
            "min_score": 58.0,
            "pass_rate": 0.6667,
            "distribution": { "90-100": 0, "60-69": 1, "0-59": 1, "80-89": 1 },
        },
    }))
}

async fn import(State(log): State<Arc<BackendLog>>, mut multipart: Multipart) -> Json<Value> {
    let mut quiz_id = String::new();
    let mut file = (String::new(), 0);
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "quiz_id" => quiz_id = field.text().await.unwrap(),
            "file" => {
                let name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.unwrap();
                file = (name, bytes.len());
            }
            _ => {}
        }
    }

    // Quiz 77 imports slowly, leaving time for a second submit to arrive.
    if quiz_id == "77" {
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
    }

    if quiz_id == "13" {
        return Json(json!({ "code": -1, "msg": "Quiz 13 is not an offline quiz", "data": null }));
    }

    log.imports.lock().unwrap().push((quiz_id, file.0, file.1));
    ok(json!({ "total_rows": 2, "success_count": 2, "skipped_count": 0, "errors": [] }))
}

async fn spawn_backend(log: Arc<BackendLog>) -> String {
    let app = Router::new()
        .route("/backend/v1/auth/login", post(login))
        .route("/backend/v1/auth/detail", get(detail))
        .route("/backend/v1/auth/logout", post(|| async { ok(Value::Null) }))
        .route("/backend/v1/questions", post(store_question))
        .route("/backend/v1/questions/{id}", get(show_question))
        .route("/backend/v1/quizzes", get(list_quizzes).post(store_quiz))
        .route("/backend/v1/grade/analysis/{id}", get(analysis))
        .route("/backend/v1/grade/import", post(import))
        .layer(middleware::from_fn_with_state(log.clone(), record_and_authorize))
        .with_state(log);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    address
}

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub backend: Arc<BackendLog>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn login(&self) {
        let response = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": "admin@example.com", "password": PASSWORD }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 200);
    }
}

/// Spawns a mock backend and a console pointed at it, each on a random port.
pub async fn spawn_app() -> TestApp {
    let backend = Arc::new(BackendLog::default());
    let backend_address = spawn_backend(backend.clone()).await;

    let config = Config::for_backend(backend_address.parse().unwrap());
    let client = BackendClient::new(&config.backend_url, config.backend_timeout).unwrap();
    let app = routes::create_router(AppState::new(config, client));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let address = format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address,
        client: reqwest::Client::new(),
        backend,
    }
}

/// Workbook with the template header and the given rows.
pub fn workbook(rows: &[(&str, &str, f64, &str, &str)]) -> Vec<u8> {
    let mut book = rust_xlsxwriter::Workbook::new();
    let sheet = book.add_worksheet();
    for (col, title) in ["工号", "姓名", "分数", "考试日期", "备注"].iter().enumerate() {
        sheet.write_string(0, col as u16, *title).unwrap();
    }
    for (i, (sno, name, score, date, comment)) in rows.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, *sno).unwrap();
        sheet.write_string(row, 1, *name).unwrap();
        sheet.write_number(row, 2, *score).unwrap();
        sheet.write_string(row, 3, *date).unwrap();
        if !comment.is_empty() {
            sheet.write_string(row, 4, *comment).unwrap();
        }
    }
    book.save_to_buffer().unwrap()
}
