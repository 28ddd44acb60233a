//! Command-line login against the delivery API.
//!
//! `reparto-login` logs in with `REPARTO_EMAIL` / `REPARTO_PASSWORD` and
//! prints the landing path. `reparto-login logout` clears the persisted
//! session.

use std::sync::Arc;

use anyhow::{Context, bail};

use reparto_auth::{PathResolver, menu_for};
use reparto_portal::{
    Credentials, HttpCredentialExchange, JsonFileSessionStore, LoginFlow, MemorySessionStore,
    PortalConfig, SessionContext, SessionStore, TracingNavigator,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    reparto_observability::init();

    let config = PortalConfig::from_env().context("invalid portal configuration")?;
    let store: Arc<dyn SessionStore> = match &config.session_file {
        Some(path) => Arc::new(JsonFileSessionStore::new(path)),
        None => Arc::new(MemorySessionStore::default()),
    };
    let session = SessionContext::with_store(store);

    let restored = match session.restore() {
        Ok(restored) => restored,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable persisted session");
            None
        }
    };

    if std::env::args().nth(1).as_deref() == Some("logout") {
        println!("{}", session.logout());
        return Ok(());
    }

    let resolver = PathResolver::standard();

    if let Some(existing) = restored {
        tracing::info!("already logged in; skipping credential exchange");
        println!("{}", existing.landing(&resolver).path);
        return Ok(());
    }

    let email = std::env::var("REPARTO_EMAIL").context("REPARTO_EMAIL is not set")?;
    let password = std::env::var("REPARTO_PASSWORD").context("REPARTO_PASSWORD is not set")?;

    let exchange =
        HttpCredentialExchange::from_config(&config).context("failed to build HTTP client")?;
    let flow = LoginFlow::new(exchange, session.clone());
    let navigator = TracingNavigator::default();

    match flow.submit(&Credentials::new(email, password), &navigator).await {
        Ok(success) => {
            if let Some(current) = session.current() {
                for item in menu_for(&resolver, current.user()) {
                    tracing::info!(label = item.label, path = item.path, "menu entry");
                }
            }
            println!("{}", success.destination.path);
            Ok(())
        }
        Err(e) => {
            let message = flow.error().unwrap_or_else(|| e.to_string());
            bail!("{message}")
        }
    }
}
