//! Account identity and profile types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The authenticated account identity, as returned by `/api/auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned account id.
    pub id: String,

    /// Full display name given at registration.
    pub full_name: String,

    /// Account email.
    pub email: String,

    /// What the account is for, e.g. "myself" or "loved_one".
    pub intent: String,

    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// The editable profile document behind the memorial page.
///
/// All fields are optional; the onboarding flow fills them in over several
/// visits. Serialized for both reading and updating `/api/users/me`;
/// absent values go over the wire as explicit nulls, clearing the field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,

    /// ISO-8601 date string, e.g. "1912-06-23".
    pub date_of_birth: Option<String>,
    pub place_of_birth: Option<String>,

    /// First-person statement shown on the memorial page.
    pub personal_statement: Option<String>,

    /// "How I want to be remembered."
    pub remember_statement: Option<String>,
}
