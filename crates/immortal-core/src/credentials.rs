//! Login and registration input types.

use std::fmt;

use serde::Serialize;

/// Login credentials for the Immortal API.
///
/// # Security
///
/// The password is never exposed in Debug output to prevent accidental
/// logging.
///
/// # Example
///
/// ```
/// use immortal_core::Credentials;
///
/// let creds = Credentials::new("ada@example.com", "correct horse");
/// assert_eq!(creds.email(), "ada@example.com");
/// ```
#[derive(Clone)]
pub struct Credentials {
    email: String,
    password: String,
    remember: bool,
}

impl Credentials {
    /// Create new credentials. The session is remembered by default,
    /// meaning the server issues a long-lived refresh cookie.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            remember: true,
        }
    }

    /// Set whether the server should issue a long-lived refresh cookie.
    pub fn remember(mut self, remember: bool) -> Self {
        self.remember = remember;
        self
    }

    /// Returns the account email.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the password.
    ///
    /// Use this only when constructing authentication requests.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Returns the remember flag.
    pub fn is_remembered(&self) -> bool {
        self.remember
    }
}

// Intentionally hide the password in Debug output
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("remember", &self.remember)
            .finish()
    }
}

/// Payload for creating a new account.
///
/// `consent` records the user's agreement to the platform's data handling
/// terms; the server rejects registration without it.
#[derive(Clone, Serialize)]
pub struct RegisterPayload {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    /// What the account is for, e.g. "myself" or "loved_one".
    pub intent: String,
    pub consent: bool,
}

impl fmt::Debug for RegisterPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterPayload")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("confirm_password", &"[REDACTED]")
            .field("intent", &self.intent)
            .field("consent", &self.consent)
            .finish()
    }
}
