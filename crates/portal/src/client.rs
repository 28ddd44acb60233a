//! Bearer-authenticated calls against the delivery API.

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::PortalConfig;
use crate::error::ApiError;
use crate::session::{SessionContext, TeardownReason};

/// Forwards the session token and tears the session down on HTTP 401.
#[derive(Debug, Clone)]
pub struct AuthorizedClient {
    http: reqwest::Client,
    config: PortalConfig,
    session: SessionContext,
}

impl AuthorizedClient {
    pub fn new(http: reqwest::Client, config: PortalConfig, session: SessionContext) -> Self {
        Self { http, config, session }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let req = self.http.get(self.config.endpoint(path));
        self.send(req).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.http.post(self.config.endpoint(path)).json(body);
        self.send(req).await
    }

    async fn send<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> Result<T, ApiError> {
        let snapshot = self.session.snapshot();
        let session = snapshot.session.ok_or(ApiError::NoSession)?;

        let resp = req
            .bearer_auth(session.token())
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            tracing::info!("API rejected session token; tearing session down");
            self.session.clear_if_current(snapshot.generation, TeardownReason::Expired);
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            return Err(ApiError::Api(status.as_u16(), resp.text().await.unwrap_or_default()));
        }

        resp.json().await.map_err(|e| ApiError::Parse(e.to_string()))
    }
}
