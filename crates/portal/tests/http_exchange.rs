use std::sync::Arc;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use reparto_auth::User;
use reparto_portal::{
    ApiError, AuthError, AuthorizedClient, CredentialExchange, Credentials,
    HttpCredentialExchange, JsonFileSessionStore, PortalConfig, Session, SessionContext,
    SessionStore,
};

struct StubApi {
    config: PortalConfig,
    handle: tokio::task::JoinHandle<()>,
}

impl StubApi {
    async fn spawn() -> Self {
        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/pedidos", get(orders));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let config = PortalConfig {
            api_url: format!("http://{addr}/api"),
            ..PortalConfig::default()
        };
        Self { config, handle }
    }

    fn exchange(&self) -> HttpCredentialExchange {
        HttpCredentialExchange::from_config(&self.config).unwrap()
    }
}

impl Drop for StubApi {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    match (body["email"].as_str(), body["password"].as_str()) {
        (Some("admin@example.com"), Some("ok")) => (
            StatusCode::OK,
            Json(json!({
                "token": "tok-live",
                "user": {
                    "id": 1,
                    "email": "admin@example.com",
                    "rol": { "id": 1, "nombre": "admin" }
                }
            })),
        ),
        (Some("empty@example.com"), _) => (
            StatusCode::OK,
            Json(json!({ "token": "", "user": { "rol": { "nombre": "admin" } } })),
        ),
        (Some("boom@example.com"), _) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "database unavailable" })),
        ),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Credenciales inválidas" })),
        ),
    }
}

async fn orders(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if bearer == "Bearer tok-live" {
        (StatusCode::OK, Json(json!([{ "id": 10 }])))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "message": "token expirado" })))
    }
}

#[tokio::test]
async fn successful_exchange_returns_token_and_user() {
    let api = StubApi::spawn().await;
    let resp = api
        .exchange()
        .exchange(&Credentials::new("admin@example.com", "ok"))
        .await
        .unwrap();

    assert_eq!(resp.token, "tok-live");
    assert_eq!(resp.user.role_name(), Some("admin"));
}

#[tokio::test]
async fn rejected_credentials_carry_server_message() {
    let api = StubApi::spawn().await;
    let err = api
        .exchange()
        .exchange(&Credentials::new("admin@example.com", "wrong"))
        .await
        .unwrap_err();

    let expected = AuthError::CredentialsRejected {
        message: Some("Credenciales inválidas".into()),
    };
    assert_eq!(err, expected);
    assert_eq!(err.user_message(), "Credenciales inválidas");
}

#[tokio::test]
async fn server_error_is_unknown_with_status_detail() {
    let api = StubApi::spawn().await;
    let err = api
        .exchange()
        .exchange(&Credentials::new("boom@example.com", "x"))
        .await
        .unwrap_err();

    match err {
        AuthError::Unknown { message, detail } => {
            assert_eq!(message.as_deref(), Some("database unavailable"));
            assert_eq!(detail, "API error (500)");
        }
        other => panic!("expected unknown error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_token_is_not_a_success() {
    let api = StubApi::spawn().await;
    let err = api
        .exchange()
        .exchange(&Credentials::new("empty@example.com", "x"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Unknown { .. }));
}

#[tokio::test]
async fn unreachable_server_is_a_network_failure() {
    // Bind then drop to get a port nobody listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = PortalConfig {
        api_url: format!("http://{addr}/api"),
        ..PortalConfig::default()
    };
    let err = HttpCredentialExchange::from_config(&config)
        .unwrap()
        .exchange(&Credentials::new("admin@example.com", "ok"))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::NetworkFailure(_)));
    assert_eq!(err.user_message(), "No se pudo conectar con el servidor");
}

#[tokio::test]
async fn authorized_client_forwards_token() {
    let api = StubApi::spawn().await;
    let session = SessionContext::new();
    let _ = session.establish(Session::new("tok-live", User::with_role("admin")));

    let client = AuthorizedClient::new(reqwest::Client::new(), api.config.clone(), session.clone());
    let orders: Vec<Value> = client.get_json("pedidos").await.unwrap();

    assert_eq!(orders.len(), 1);
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn rejected_token_tears_session_down() {
    let api = StubApi::spawn().await;
    let session = SessionContext::new();
    let _ = session.establish(Session::new("tok-stale", User::with_role("admin")));
    let mut rx = session.subscribe();
    rx.borrow_and_update();

    let client = AuthorizedClient::new(reqwest::Client::new(), api.config.clone(), session.clone());
    let err = client.get_json::<Vec<Value>>("pedidos").await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized));
    assert!(!session.is_authenticated());
    assert!(rx.has_changed().unwrap());
}

#[tokio::test]
async fn client_without_session_does_not_call_api() {
    let api = StubApi::spawn().await;
    let client = AuthorizedClient::new(
        reqwest::Client::new(),
        api.config.clone(),
        SessionContext::new(),
    );
    let err = client.get_json::<Vec<Value>>("pedidos").await.unwrap_err();
    assert!(matches!(err, ApiError::NoSession));
}

#[test]
fn json_file_store_survives_restart() {
    let dir = std::env::temp_dir().join(format!("reparto-session-{}", uuid::Uuid::now_v7()));
    let path = dir.join("session.json");
    let store = Arc::new(JsonFileSessionStore::new(&path));

    assert!(store.load().unwrap().is_none());

    let ctx = SessionContext::with_store(store.clone());
    let _ = ctx.establish(Session::new("tok-disk", User::with_role("courier")));
    assert!(path.exists());

    let reopened = SessionContext::with_store(Arc::new(JsonFileSessionStore::new(&path)));
    let restored = reopened.restore().unwrap().unwrap();
    assert_eq!(restored.token(), "tok-disk");
    assert_eq!(restored.user().role_name(), Some("courier"));

    reopened.logout();
    assert!(!path.exists());
    // Clearing twice is fine.
    store.clear().unwrap();

    let _ = std::fs::remove_dir_all(&dir);
}
