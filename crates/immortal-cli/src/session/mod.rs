//! CLI session context over the persisted cookie store.
//!
//! The refresh cookie is the CLI's only durable credential: each
//! invocation loads the cookie store from disk, silently restores the
//! session through the refresh endpoint, and saves the store back when
//! done. Access tokens never touch the disk.

pub mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};

use immortal_client::{ApiClient, ApiSession};
use immortal_core::ApiUrl;
use reqwest_cookie_store::CookieStoreMutex;

pub struct CliContext {
    pub session: ApiSession,
    cookies: Arc<CookieStoreMutex>,
}

impl CliContext {
    /// Build a context whose HTTP client reads and writes the persisted
    /// cookie store.
    pub fn open(api: ApiUrl) -> Result<Self> {
        let cookies = storage::load()?;
        let client = ApiClient::with_cookie_provider(api, cookies.clone());

        Ok(Self {
            session: ApiSession::new(client),
            cookies,
        })
    }

    /// Open and silently restore the session; errors when no session can
    /// be restored.
    pub async fn authenticated(api: ApiUrl) -> Result<Self> {
        let ctx = Self::open(api)?;
        ctx.session
            .restore()
            .await
            .context("No active session. Run 'immortal account login' first.")?;

        Ok(ctx)
    }

    /// Persist the cookie store.
    pub fn save(&self) -> Result<()> {
        storage::save(&self.cookies)
    }
}
