//! Authenticated session management.

use std::sync::{Arc, RwLock};

use tracing::{debug, info, instrument};

use immortal_core::{
    AccessToken, Credentials, DefaultTraits, Device, HealthStats, MemorialPreferences, Photo,
    RegisterPayload, Result, TraitEntry, TraitSelection, User, UserProfile,
};

use crate::endpoints::{self, ConnectDeviceRequest, LoginRequest, TokenResponse};
use crate::http::{ApiClient, FilePart};

/// Where the session currently stands.
///
/// A session is derived state: a held access token plus a successfully
/// fetched identity. `Restoring` is visited exactly once, at startup;
/// afterwards the session cycles between the other two indefinitely.
#[derive(Debug, Clone)]
pub enum SessionState {
    /// Startup restore is still in progress.
    Restoring,
    /// A token is held and the identity was fetched.
    Authenticated(User),
    /// No usable credential.
    Unauthenticated,
}

/// Session manager for the Immortal API.
///
/// Owns the login/register/logout lifecycle on top of an [`ApiClient`] and
/// carries the typed operations of the platform. Cloning is cheap; clones
/// share the same session state.
#[derive(Clone)]
pub struct ApiSession {
    client: ApiClient,
    state: Arc<RwLock<SessionState>>,
}

impl ApiSession {
    /// Create a session manager over the given client, in the `Restoring`
    /// state. Call [`restore`](Self::restore) next.
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: Arc::new(RwLock::new(SessionState::Restoring)),
        }
    }

    /// Returns the underlying API client.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Returns a snapshot of the session state.
    pub fn state(&self) -> SessionState {
        self.state.read().unwrap().clone()
    }

    /// Returns the authenticated identity, if any.
    pub fn user(&self) -> Option<User> {
        match &*self.state.read().unwrap() {
            SessionState::Authenticated(user) => Some(user.clone()),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(&*self.state.read().unwrap(), SessionState::Authenticated(_))
    }

    fn set_state(&self, state: SessionState) {
        *self.state.write().unwrap() = state;
    }

    /// Attempt to restore a session from the ambient refresh cookie.
    ///
    /// Performs a silent refresh and, if a token was minted, fetches the
    /// identity. Any failure lands in `Unauthenticated` without surfacing
    /// an error; a missing session at startup is the normal cold path.
    #[instrument(skip(self))]
    pub async fn restore(&self) -> Option<User> {
        if !self.client.refresh().await {
            debug!("no refresh credential, starting unauthenticated");
            self.set_state(SessionState::Unauthenticated);
            return None;
        }

        match self.client.get::<User>(endpoints::ME).await {
            Ok(user) => {
                info!(user = %user.id, "session restored");
                self.set_state(SessionState::Authenticated(user.clone()));
                Some(user)
            }
            Err(err) => {
                debug!(error = %err, "identity fetch failed after refresh");
                self.set_state(SessionState::Unauthenticated);
                None
            }
        }
    }

    /// Log in with email and password.
    ///
    /// On success the server also sets the refresh cookie on the transport
    /// cookie store. Failures propagate and leave the session
    /// unauthenticated.
    #[instrument(skip(self, credentials), fields(email = credentials.email()))]
    pub async fn login(&self, credentials: Credentials) -> Result<User> {
        let request = LoginRequest {
            email: credentials.email(),
            password: credentials.password(),
            remember: credentials.is_remembered(),
        };

        let response: TokenResponse = match self.client.post(endpoints::LOGIN, &request).await {
            Ok(response) => response,
            Err(err) => {
                self.set_state(SessionState::Unauthenticated);
                return Err(err);
            }
        };

        self.finish_authentication(response).await
    }

    /// Create a new account and log straight into it.
    #[instrument(skip(self, payload), fields(email = %payload.email))]
    pub async fn register(&self, payload: RegisterPayload) -> Result<User> {
        let response: TokenResponse = match self.client.post(endpoints::REGISTER, &payload).await {
            Ok(response) => response,
            Err(err) => {
                self.set_state(SessionState::Unauthenticated);
                return Err(err);
            }
        };

        self.finish_authentication(response).await
    }

    /// Store the freshly minted token and fetch the identity behind it.
    async fn finish_authentication(&self, response: TokenResponse) -> Result<User> {
        self.client
            .tokens()
            .set(AccessToken::new(response.access_token));

        match self.client.get::<User>(endpoints::ME).await {
            Ok(user) => {
                info!(user = %user.id, "authenticated");
                self.set_state(SessionState::Authenticated(user.clone()));
                Ok(user)
            }
            Err(err) => {
                self.set_state(SessionState::Unauthenticated);
                Err(err)
            }
        }
    }

    /// Log out.
    ///
    /// The server call is best-effort and its result is discarded; local
    /// state is cleared unconditionally, so logout never fails.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        if let Err(err) = self.client.post_no_body(endpoints::LOGOUT).await {
            debug!(error = %err, "logout request failed, clearing local session anyway");
        }

        self.client.tokens().clear();
        self.set_state(SessionState::Unauthenticated);
        info!("logged out");
    }

    /// Fetch the account identity.
    pub async fn me(&self) -> Result<User> {
        self.client.get(endpoints::ME).await
    }

    /// Fetch the editable profile document.
    pub async fn profile(&self) -> Result<UserProfile> {
        self.client.get(endpoints::PROFILE).await
    }

    /// Replace the profile document. Absent fields clear their values.
    pub async fn update_profile(&self, profile: &UserProfile) -> Result<()> {
        self.client.put_no_content(endpoints::PROFILE, profile).await
    }

    /// List the traits attached to the profile.
    pub async fn traits(&self) -> Result<Vec<TraitEntry>> {
        self.client.get(endpoints::TRAITS).await
    }

    /// Fetch the platform's default trait list.
    pub async fn default_traits(&self) -> Result<DefaultTraits> {
        self.client.get(endpoints::TRAIT_DEFAULTS).await
    }

    /// Replace the trait selection wholesale.
    pub async fn set_traits(&self, selection: &TraitSelection) -> Result<()> {
        self.client.post_no_content(endpoints::TRAITS, selection).await
    }

    /// List biometric devices and their connection state.
    pub async fn devices(&self) -> Result<Vec<Device>> {
        self.client.get(endpoints::DEVICES).await
    }

    /// Connect (or re-sync) a biometric device.
    pub async fn connect_device(&self, device_type: &str) -> Result<()> {
        let request = ConnectDeviceRequest { device_type };
        self.client
            .post_no_content(endpoints::DEVICE_CONNECT, &request)
            .await
    }

    /// Fetch aggregated health stats. `None` until a device has synced.
    pub async fn health_stats(&self) -> Result<Option<HealthStats>> {
        self.client.get_optional(endpoints::HEALTH_STATS).await
    }

    /// List the uploaded gallery photos.
    pub async fn photos(&self) -> Result<Vec<Photo>> {
        self.client.get(endpoints::PHOTOS).await
    }

    /// Upload photos to the gallery. Returns the stored photo records.
    pub async fn upload_photos(&self, files: Vec<FilePart>) -> Result<Vec<Photo>> {
        self.client.post_files(endpoints::PHOTOS, files).await
    }

    /// Fetch the memorial page preferences.
    pub async fn memorial_preferences(&self) -> Result<MemorialPreferences> {
        self.client.get(endpoints::MEMORIAL_PREFERENCES).await
    }

    /// Replace the memorial page preferences.
    pub async fn update_memorial_preferences(&self, prefs: &MemorialPreferences) -> Result<()> {
        self.client
            .put_no_content(endpoints::MEMORIAL_PREFERENCES, prefs)
            .await
    }
}

impl std::fmt::Debug for ApiSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSession")
            .field("base", self.client.base())
            .field("state", &self.state())
            .finish()
    }
}
