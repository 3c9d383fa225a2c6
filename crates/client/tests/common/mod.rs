//! Scripted mock backend the black-box tests drive the real client against.
//!
//! The server enforces the public-path allowlist (bearer header shape only)
//! and scripts one user with a rotating token pair. Resource routes are
//! scripted per scenario: `/users` succeeds for the currently valid access
//! token, `/regions` is permission-denied, `/menus` is a server failure, and
//! so on, so every taxonomy kind can be provoked over real HTTP.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use axum::Json;
use axum::extract::{Path, Query, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header};
use serde_json::{Value, json};

use portico_auth::{Role, TokenClaims, UserProfile};
use portico_core::{RoleId, UserId};

pub const JWT_SECRET: &[u8] = b"portico-test-secret";
pub const TEST_EMAIL: &str = "jordan.reyes@example.com";
pub const TEST_PASSWORD: &str = "correct-horse";

/// Paths that bypass bearer enforcement.
const PUBLIC_PATHS: &[&str] = &[
    "/auth/login",
    "/auth/register",
    "/auth/forgot-password",
    "/auth/reset-password",
    "/health",
];

pub fn sample_user() -> UserProfile {
    let now = Utc::now();
    UserProfile {
        id: UserId::new(),
        email: TEST_EMAIL.to_string(),
        first_name: "Jordan".to_string(),
        last_name: "Reyes".to_string(),
        phone_number: None,
        is_active: true,
        is_email_verified: true,
        roles: vec![Role {
            id: RoleId::new(),
            name: "Admin".to_string(),
            description: None,
        }],
        permissions: vec!["Users.View".to_string()],
        regions: Vec::new(),
        last_login_at: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn mint_token(user: &UserProfile, expires_in_secs: i64) -> String {
    let now = Utc::now().timestamp();
    let claims = TokenClaims {
        sub: user.id,
        email: user.email.clone(),
        iat: now,
        exp: Some(now + expires_in_secs),
        jti: "test-jti".to_string(),
        user_id: user.id,
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        roles: user.roles.iter().map(|role| role.name.clone()).collect(),
        permissions: user.permissions.clone(),
        regions: user.regions.clone(),
        session_id: "test-session".to_string(),
        device_id: None,
        token_version: 1,
        ip_address: None,
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET),
    )
    .expect("failed to encode jwt")
}

pub struct MockState {
    user: UserProfile,
    valid_access: RwLock<String>,
    valid_refresh: RwLock<String>,
    refresh_generation: AtomicUsize,
    /// Lifetime of tokens minted by login and refresh.
    pub token_expires_in: AtomicI64,
    pub fail_refresh: AtomicBool,
    pub fail_logout: AtomicBool,
    /// Reject every access token, even freshly rotated ones.
    pub reject_all_tokens: AtomicBool,
    /// Delay `/users` responses long enough to trip small client timeouts.
    pub slow_users: AtomicBool,
    pub login_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
    pub users_calls: AtomicUsize,
}

impl MockState {
    fn new() -> Self {
        Self {
            user: sample_user(),
            valid_access: RwLock::new(String::new()),
            valid_refresh: RwLock::new(String::new()),
            refresh_generation: AtomicUsize::new(1),
            token_expires_in: AtomicI64::new(900),
            fail_refresh: AtomicBool::new(false),
            fail_logout: AtomicBool::new(false),
            reject_all_tokens: AtomicBool::new(false),
            slow_users: AtomicBool::new(false),
            login_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
            logout_calls: AtomicUsize::new(0),
            users_calls: AtomicUsize::new(0),
        }
    }

    pub fn user(&self) -> UserProfile {
        self.user.clone()
    }

    /// Mint and record a fresh token pair, as login and refresh do.
    pub fn grant_session(&self, access_expires_in: i64) -> (String, String) {
        let access = mint_token(&self.user, access_expires_in);
        let generation = self.refresh_generation.fetch_add(1, Ordering::SeqCst);
        let refresh = format!("refresh-{generation}");
        *self.valid_access.write().unwrap() = access.clone();
        *self.valid_refresh.write().unwrap() = refresh.clone();
        (access, refresh)
    }

    /// Invalidate the currently accepted access token so the next
    /// authenticated request gets a 401.
    pub fn expire_current_access(&self) {
        *self.valid_access.write().unwrap() = "no-longer-valid".to_string();
    }

    fn accepts(&self, token: Option<&str>) -> bool {
        if self.reject_all_tokens.load(Ordering::SeqCst) {
            return false;
        }
        match token {
            Some(token) => *self.valid_access.read().unwrap() == token,
            None => false,
        }
    }

    fn current_refresh(&self) -> String {
        self.valid_refresh.read().unwrap().clone()
    }
}

/// Mock API server bound to an ephemeral port.
pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<MockState>,
    handle: tokio::task::JoinHandle<()>,
}

impl MockBackend {
    pub async fn spawn() -> Self {
        portico_observability::init();

        let state = Arc::new(MockState::new());
        let app = router(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            state,
            handle,
        }
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn router(state: Arc<MockState>) -> axum::Router {
    axum::Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/refresh-token", post(refresh_token))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
        .route("/users", get(list_users))
        .route("/users/:id", get(get_user).delete(delete_user))
        .route("/regions", get(forbidden_regions).post(create_region))
        .route("/branches/:id", get(missing_branch))
        .route("/menus", get(broken_menus))
        .layer(middleware::from_fn(bearer_gate))
        .with_state(state)
}

async fn bearer_gate(request: Request, next: Next) -> Response {
    if PUBLIC_PATHS.contains(&request.uri().path()) {
        return next.run(request).await;
    }

    let well_formed = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|token| !token.is_empty());

    if !well_formed {
        return envelope_err(
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED",
            "Authentication required",
        );
    }
    next.run(request).await
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn envelope_ok(data: Value) -> Response {
    Json(json!({"success": true, "data": data})).into_response()
}

fn envelope_err(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        Json(json!({"success": false, "error": {"code": code, "message": message}})),
    )
        .into_response()
}

fn expired_access_response() -> Response {
    envelope_err(StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED", "Access token expired")
}

async fn health() -> Response {
    Json(json!({"status": "ok"})).into_response()
}

async fn login(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.login_calls.fetch_add(1, Ordering::SeqCst);

    if body["email"] != TEST_EMAIL || body["password"] != TEST_PASSWORD {
        return envelope_err(
            StatusCode::UNAUTHORIZED,
            "INVALID_CREDENTIALS",
            "Invalid email or password",
        );
    }

    let expires_in = state.token_expires_in.load(Ordering::SeqCst);
    let (access, refresh) = state.grant_session(expires_in);
    envelope_ok(json!({
        "accessToken": access,
        "refreshToken": refresh,
        "expiresIn": expires_in,
        "user": serde_json::to_value(state.user()).unwrap(),
    }))
}

async fn register(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    envelope_ok(json!({
        "userId": state.user.id.to_string(),
        "email": body["email"],
        "emailVerificationRequired": true,
    }))
}

async fn refresh_token(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);

    if state.fail_refresh.load(Ordering::SeqCst) {
        return envelope_err(
            StatusCode::UNAUTHORIZED,
            "INVALID_REFRESH_TOKEN",
            "Refresh token is invalid or expired",
        );
    }
    if body["refreshToken"] != state.current_refresh().as_str() {
        return envelope_err(
            StatusCode::UNAUTHORIZED,
            "INVALID_REFRESH_TOKEN",
            "Refresh token is invalid or expired",
        );
    }

    let expires_in = state.token_expires_in.load(Ordering::SeqCst);
    let (access, refresh) = state.grant_session(expires_in);
    envelope_ok(json!({
        "accessToken": access,
        "refreshToken": refresh,
        "expiresIn": expires_in,
    }))
}

async fn logout(State(state): State<Arc<MockState>>) -> Response {
    state.logout_calls.fetch_add(1, Ordering::SeqCst);
    if state.fail_logout.load(Ordering::SeqCst) {
        return envelope_err(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "logout blew up",
        );
    }
    Json(json!({"success": true})).into_response()
}

async fn me(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if !state.accepts(bearer_token(&headers)) {
        return expired_access_response();
    }
    envelope_ok(serde_json::to_value(state.user()).unwrap())
}

async fn list_users(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.users_calls.fetch_add(1, Ordering::SeqCst);

    if state.slow_users.load(Ordering::SeqCst) {
        tokio::time::sleep(Duration::from_millis(400)).await;
    }
    if !state.accepts(bearer_token(&headers)) {
        return expired_access_response();
    }

    let page: u32 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let page_size: u32 = params
        .get("pageSize")
        .and_then(|p| p.parse().ok())
        .unwrap_or(10);

    envelope_ok(json!({
        "items": [serde_json::to_value(state.user()).unwrap()],
        "pagination": {
            "page": page,
            "pageSize": page_size,
            "totalItems": 1,
            "totalPages": 1,
            "hasNextPage": false,
            "hasPreviousPage": false,
        }
    }))
}

async fn get_user(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(_id): Path<String>,
) -> Response {
    if !state.accepts(bearer_token(&headers)) {
        return expired_access_response();
    }
    envelope_ok(serde_json::to_value(state.user()).unwrap())
}

async fn delete_user(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(_id): Path<String>,
) -> Response {
    if !state.accepts(bearer_token(&headers)) {
        return expired_access_response();
    }
    Json(json!({"success": true, "message": "User deleted"})).into_response()
}

async fn forbidden_regions(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if !state.accepts(bearer_token(&headers)) {
        return expired_access_response();
    }
    envelope_err(
        StatusCode::FORBIDDEN,
        "FORBIDDEN",
        "You do not have access to regions",
    )
}

async fn create_region(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(_body): Json<Value>,
) -> Response {
    if !state.accepts(bearer_token(&headers)) {
        return expired_access_response();
    }
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "success": false,
            "error": {
                "code": "VALIDATION_ERROR",
                "message": "Validation failed",
                "details": {"code": "Code is required"}
            }
        })),
    )
        .into_response()
}

async fn missing_branch(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(_id): Path<String>,
) -> Response {
    if !state.accepts(bearer_token(&headers)) {
        return expired_access_response();
    }
    envelope_err(StatusCode::NOT_FOUND, "NOT_FOUND", "Branch not found")
}

async fn broken_menus(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if !state.accepts(bearer_token(&headers)) {
        return expired_access_response();
    }
    envelope_err(
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "menu storage unavailable",
    )
}
