// task-client/tests/support/mod.rs
#![allow(dead_code)]

use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use common::models::credential::{Credential, Subject};
use common::Config;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use task_client::{LocalStorage, TaskClient};
use uuid::Uuid;

const SECRET: &[u8] = b"mock-task-service-secret";

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
    iat: usize,
}

struct User {
    id: String,
    name: String,
    email: String,
    password: String,
}

/// Shared state of the fake task service
#[derive(Default)]
pub struct MockState {
    reject_all: AtomicBool,
    delay_ms: AtomicU64,
    register_calls: AtomicUsize,
    task_list_calls: AtomicUsize,
    seen_authorization: Mutex<Vec<Option<String>>>,
    static_tokens: Mutex<Vec<String>>,
    users: Mutex<Vec<User>>,
    tasks: Mutex<Vec<Value>>,
}

/// In-process stand-in for the remote task service
pub struct MockService {
    pub base_url: String,
    state: Arc<MockState>,
}

impl MockService {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let data = web::Data::from(state.clone());

        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .service(
                    web::scope("/api")
                        .route("/auth/login", web::post().to(login))
                        .route("/auth/register", web::post().to(register))
                        .route("/tasks", web::get().to(list_tasks))
                        .route("/tasks", web::post().to(create_task))
                        .route("/tasks/{id}", web::put().to(update_task))
                        .route("/tasks/{id}", web::delete().to(delete_task))
                        .route("/slow", web::get().to(slow))
                )
        })
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .expect("failed to bind mock service");

        let addr = server.addrs()[0];
        tokio::spawn(server.run());

        Self {
            base_url: format!("http://{}/api", addr),
            state,
        }
    }

    /// Make the service accept a fixed bearer token
    pub fn accept_token(&self, token: &str) {
        self.state.static_tokens.lock().unwrap().push(token.to_string());
    }

    /// From now on every credentialed call is answered with 401
    pub fn reject_everything(&self) {
        self.state.reject_all.store(true, Ordering::SeqCst);
    }

    /// Hold every task call for `delay` before answering
    pub fn delay_task_calls(&self, delay: Duration) {
        self.state.delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn add_user(&self, name: &str, email: &str, password: &str) {
        self.state.users.lock().unwrap().push(User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        });
    }

    pub fn seed_task(&self, id: &str, title: &str) {
        self.state.tasks.lock().unwrap().push(json!({
            "_id": id,
            "title": title,
            "description": "",
            "dueDate": "2024-05-01",
            "status": "pending"
        }));
    }

    /// Store a task document exactly as given
    pub fn seed_raw_task(&self, task: Value) {
        self.state.tasks.lock().unwrap().push(task);
    }

    pub fn task_ids(&self) -> Vec<String> {
        self.state.tasks.lock().unwrap().iter()
            .filter_map(|task| task["_id"].as_str().map(str::to_string))
            .collect()
    }

    pub fn register_calls(&self) -> usize {
        self.state.register_calls.load(Ordering::SeqCst)
    }

    pub fn task_list_calls(&self) -> usize {
        self.state.task_list_calls.load(Ordering::SeqCst)
    }

    /// Authorization header of the most recent task call, if any call arrived
    pub fn last_authorization(&self) -> Option<Option<String>> {
        self.state.seen_authorization.lock().unwrap().last().cloned()
    }

    pub fn config(&self) -> Config {
        Config {
            api_base_url: self.base_url.clone(),
            request_timeout_secs: 5,
            ..Config::default()
        }
    }

    pub fn client(&self) -> TaskClient {
        TaskClient::with_storage(self.config(), Arc::new(LocalStorage::in_memory()))
            .expect("client should build")
    }

    pub fn client_with_timeout(&self, secs: u64) -> TaskClient {
        let config = Config {
            request_timeout_secs: secs,
            ..self.config()
        };
        TaskClient::with_storage(config, Arc::new(LocalStorage::in_memory()))
            .expect("client should build")
    }

    pub fn persistent_client(&self, path: &Path) -> TaskClient {
        TaskClient::with_storage(self.config(), Arc::new(LocalStorage::open(path)))
            .expect("client should build")
    }
}

pub fn credential(token: &str) -> Credential {
    Credential::new(
        token,
        Subject {
            id: "u1".into(),
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
        },
    )
    .expect("token is not empty")
}

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as usize
}

fn issue_token(user_id: &str) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now(),
        exp: now() + 3600,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET))
        .expect("token encoding")
}

async fn authorize(req: &HttpRequest, state: &MockState) -> Result<String, HttpResponse> {
    let delay = state.delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        actix_web::rt::time::sleep(Duration::from_millis(delay)).await;
    }

    let header = req.headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    state.seen_authorization.lock().unwrap().push(header.clone());

    if state.reject_all.load(Ordering::SeqCst) {
        return Err(HttpResponse::Unauthorized().json(json!({ "message": "Token expired" })));
    }

    let Some(token) = header.as_deref().and_then(|h| h.strip_prefix("Bearer ")) else {
        return Err(HttpResponse::Unauthorized().json(json!({
            "message": "No token, authorization denied"
        })));
    };

    if state.static_tokens.lock().unwrap().iter().any(|t| t == token) {
        return Ok("static-user".to_string());
    }

    decode::<Claims>(token, &DecodingKey::from_secret(SECRET), &Validation::new(Algorithm::HS256))
        .map(|data| data.claims.sub)
        .map_err(|_| HttpResponse::Unauthorized().json(json!({ "message": "Token is not valid" })))
}

async fn login(state: web::Data<MockState>, body: web::Json<Value>) -> HttpResponse {
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    let users = state.users.lock().unwrap();
    match users.iter().find(|u| u.email == email && u.password == password) {
        Some(user) => HttpResponse::Ok().json(json!({
            "token": issue_token(&user.id),
            "id": user.id,
            "name": user.name,
            "email": user.email
        })),
        None => HttpResponse::Unauthorized().json(json!({ "error": "Invalid email or password" })),
    }
}

async fn register(state: web::Data<MockState>, body: web::Json<Value>) -> HttpResponse {
    state.register_calls.fetch_add(1, Ordering::SeqCst);

    let name = body["name"].as_str().unwrap_or_default().to_string();
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default().to_string();

    let mut users = state.users.lock().unwrap();
    if users.iter().any(|u| u.email == email) {
        return HttpResponse::BadRequest().json(json!({ "message": "User already exists" }));
    }

    let id = Uuid::new_v4().to_string();
    users.push(User {
        id: id.clone(),
        name: name.clone(),
        email: email.clone(),
        password,
    });
    HttpResponse::Created().json(json!({ "_id": id, "name": name, "email": email }))
}

async fn list_tasks(req: HttpRequest, state: web::Data<MockState>) -> HttpResponse {
    state.task_list_calls.fetch_add(1, Ordering::SeqCst);
    if let Err(denied) = authorize(&req, &state).await {
        return denied;
    }
    let tasks = state.tasks.lock().unwrap().clone();
    HttpResponse::Ok().json(tasks)
}

async fn create_task(
    req: HttpRequest,
    state: web::Data<MockState>,
    body: web::Json<Value>,
) -> HttpResponse {
    if let Err(denied) = authorize(&req, &state).await {
        return denied;
    }

    let mut task = body.into_inner();
    if task["title"].as_str().map_or(true, str::is_empty) {
        return HttpResponse::BadRequest().json(json!({ "message": "title required" }));
    }
    task["_id"] = json!(Uuid::new_v4().to_string());

    state.tasks.lock().unwrap().push(task.clone());
    HttpResponse::Created().json(task)
}

async fn update_task(
    req: HttpRequest,
    state: web::Data<MockState>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> HttpResponse {
    if let Err(denied) = authorize(&req, &state).await {
        return denied;
    }

    if body["dueDate"].is_null() {
        return HttpResponse::BadRequest().json(json!({ "message": "dueDate required" }));
    }

    let id = path.into_inner();
    let mut tasks = state.tasks.lock().unwrap();
    let Some(task) = tasks.iter_mut().find(|t| t["_id"] == json!(id)) else {
        return HttpResponse::NotFound().json(json!({ "message": "Task not found" }));
    };

    if let Value::Object(fields) = body.into_inner() {
        for (key, value) in fields {
            task[key.as_str()] = value;
        }
    }
    HttpResponse::Ok().json(task.clone())
}

async fn delete_task(
    req: HttpRequest,
    state: web::Data<MockState>,
    path: web::Path<String>,
) -> HttpResponse {
    if let Err(denied) = authorize(&req, &state).await {
        return denied;
    }

    let id = path.into_inner();
    let mut tasks = state.tasks.lock().unwrap();
    let before = tasks.len();
    tasks.retain(|t| t["_id"] != json!(id));

    if tasks.len() == before {
        HttpResponse::NotFound().json(json!({ "message": "Task not found" }))
    } else {
        HttpResponse::Ok().json(json!({ "message": "Task deleted" }))
    }
}

async fn slow() -> HttpResponse {
    actix_web::rt::time::sleep(Duration::from_secs(3)).await;
    HttpResponse::Ok().finish()
}
