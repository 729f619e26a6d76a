#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{Path as UrlPath, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Json;
use cotacoes_frete::{AppConfig, Notice, NoticeKind, Quote, QuoteDraft, StateObserver};
use serde_json::{Map, Value, json};
use tokio::task::JoinHandle;

#[derive(Debug, Default)]
pub struct BackendState {
    pub quotes: Vec<Value>,
    pub next_id: u64,
    pub healthy: bool,
    pub fail_reads: bool,
    pub fail_writes: bool,
    pub malformed_reads: bool,
    pub last_authorization: Option<String>,
    pub last_cache_control: Option<String>,
    pub requests: Vec<String>,
}

type Shared = Arc<Mutex<BackendState>>;

/// In-process stand-in for the quote REST backend.
pub struct MockBackend {
    pub base_url: String,
    pub state: Shared,
    handle: JoinHandle<()>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(BackendState {
            next_id: 1,
            healthy: true,
            ..Default::default()
        }));

        let app = Router::new()
            .route("/health", get(health))
            .route("/api/cotacoes", get(list_quotes).post(create_quote))
            .route("/api/cotacoes/:id", axum::routing::put(update_quote).delete(delete_quote))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend address");
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
            handle,
        }
    }

    pub fn api_url(&self) -> String {
        format!("{}/api/cotacoes", self.base_url)
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.state.lock().unwrap().healthy = healthy;
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.state.lock().unwrap().fail_writes = fail;
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.state.lock().unwrap().fail_reads = fail;
    }

    pub fn set_malformed_reads(&self, malformed: bool) {
        self.state.lock().unwrap().malformed_reads = malformed;
    }

    /// Inserts a record as another operator would, returning its id.
    pub fn insert(&self, transportadora: &str, valor_frete: f64) -> String {
        let mut state = self.state.lock().unwrap();
        let mut record = object(json!({
            "responsavelCotacao": "Bruno",
            "transportadora": transportadora,
            "destino": "Recife",
            "valorFrete": valor_frete,
            "dataCotacao": "2024-03-02",
            "negocioFechado": false,
        }));
        let id = assign_identity(&mut state, &mut record);
        state.quotes.insert(0, Value::Object(record));
        id.to_string()
    }

    pub fn quotes(&self) -> Vec<Value> {
        self.state.lock().unwrap().quotes.clone()
    }

    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn last_authorization(&self) -> Option<String> {
        self.state.lock().unwrap().last_authorization.clone()
    }

    pub fn last_cache_control(&self) -> Option<String> {
        self.state.lock().unwrap().last_cache_control.clone()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn assign_identity(state: &mut BackendState, record: &mut Map<String, Value>) -> u64 {
    let id = state.next_id;
    state.next_id += 1;
    record.insert("id".into(), json!(id));
    record.insert(
        "timestamp".into(),
        json!(format!("2024-03-01T12:00:{:02}.000Z", id % 60)),
    );
    id
}

fn record_request(state: &Shared, line: String, headers: &HeaderMap) {
    let mut state = state.lock().unwrap();
    state.requests.push(line);
    state.last_authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    state.last_cache_control = headers
        .get(header::CACHE_CONTROL)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
}

fn id_matches(record: &Value, id: &str) -> bool {
    match record.get("id") {
        Some(Value::Number(number)) => number.to_string() == id,
        Some(Value::String(text)) => text == id,
        _ => false,
    }
}

async fn health(State(state): State<Shared>, headers: HeaderMap) -> StatusCode {
    record_request(&state, "GET /health".into(), &headers);
    if state.lock().unwrap().healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

async fn list_quotes(State(state): State<Shared>, headers: HeaderMap) -> Response {
    record_request(&state, "GET /api/cotacoes".into(), &headers);
    let state = state.lock().unwrap();
    if state.fail_reads {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    if state.malformed_reads {
        return (StatusCode::OK, "<html>maintenance</html>").into_response();
    }
    Json(state.quotes.clone()).into_response()
}

async fn create_quote(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record_request(&state, "POST /api/cotacoes".into(), &headers);
    let mut state = state.lock().unwrap();
    if state.fail_writes {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let mut record = object(body);
    record.remove("id");
    assign_identity(&mut state, &mut record);
    let record = Value::Object(record);
    state.quotes.insert(0, record.clone());
    (StatusCode::CREATED, Json(record)).into_response()
}

async fn update_quote(
    State(state): State<Shared>,
    UrlPath(id): UrlPath<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record_request(&state, format!("PUT /api/cotacoes/{id}"), &headers);
    let mut state = state.lock().unwrap();
    if state.fail_writes {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let Some(record) = state.quotes.iter_mut().find(|record| id_matches(record, &id)) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if let (Value::Object(target), Value::Object(changes)) = (&mut *record, body) {
        for (key, value) in changes {
            if key != "id" && key != "timestamp" {
                target.insert(key, value);
            }
        }
    }
    Json(record.clone()).into_response()
}

async fn delete_quote(
    State(state): State<Shared>,
    UrlPath(id): UrlPath<String>,
    headers: HeaderMap,
) -> StatusCode {
    record_request(&state, format!("DELETE /api/cotacoes/{id}"), &headers);
    let mut state = state.lock().unwrap();
    if state.fail_writes {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    let before = state.quotes.len();
    state.quotes.retain(|record| !id_matches(record, &id));
    if state.quotes.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}

/// Observer that keeps every call for later assertions.
#[derive(Default)]
pub struct RecordingObserver {
    renders: Mutex<Vec<Vec<Quote>>>,
    notices: Mutex<Vec<Notice>>,
    connection: Mutex<Vec<bool>>,
}

impl RecordingObserver {
    pub fn render_count(&self) -> usize {
        self.renders.lock().unwrap().len()
    }

    pub fn last_render(&self) -> Vec<Quote> {
        self.renders.lock().unwrap().last().cloned().unwrap_or_default()
    }

    pub fn messages(&self, kind: NoticeKind) -> Vec<String> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .filter(|notice| notice.kind == kind)
            .map(|notice| notice.message.clone())
            .collect()
    }

    pub fn connection_changes(&self) -> Vec<bool> {
        self.connection.lock().unwrap().clone()
    }
}

impl StateObserver for RecordingObserver {
    fn render(&self, quotes: &[Quote]) {
        self.renders.lock().unwrap().push(quotes.to_vec());
    }

    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }

    fn connection_changed(&self, online: bool) {
        self.connection.lock().unwrap().push(online);
    }
}

pub fn config_for(backend: &MockBackend, data_dir: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.remote.api_url = backend.api_url();
    config.remote.request_timeout_secs = 2;
    config.sync.poll_interval_ms = 40;
    config.storage.data_dir = data_dir.to_string_lossy().into_owned();
    config
}

pub fn acme_draft() -> QuoteDraft {
    QuoteDraft {
        responsavel_cotacao: "Ana".into(),
        transportadora: "ACME".into(),
        destino: "Curitiba".into(),
        valor_frete: 120.5,
        data_cotacao: "2024-03-01".into(),
        ..Default::default()
    }
}

/// Polls `check` every 10 ms until it holds or `timeout` passes.
pub async fn wait_until<F>(timeout: Duration, mut check: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}
