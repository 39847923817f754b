//! API endpoint paths and wire types.

use serde::{Deserialize, Serialize};

pub(crate) const REGISTER: &str = "/api/auth/register";
pub(crate) const LOGIN: &str = "/api/auth/login";
pub(crate) const REFRESH: &str = "/api/auth/refresh";
pub(crate) const LOGOUT: &str = "/api/auth/logout";
pub(crate) const ME: &str = "/api/auth/me";

pub(crate) const PROFILE: &str = "/api/users/me";
pub(crate) const TRAITS: &str = "/api/traits";
pub(crate) const TRAIT_DEFAULTS: &str = "/api/traits/defaults";
pub(crate) const DEVICES: &str = "/api/health/devices";
pub(crate) const DEVICE_CONNECT: &str = "/api/health/devices/connect";
pub(crate) const HEALTH_STATS: &str = "/api/health/stats";
pub(crate) const PHOTOS: &str = "/api/photos";
pub(crate) const MEMORIAL_PREFERENCES: &str = "/api/memorial/preferences";

/// Request body for login.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub remember: bool,
}

/// Response from login and register.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    /// Always "bearer"; kept so the wire shape round-trips.
    #[allow(dead_code)]
    pub token_type: String,
}

/// Response from the refresh endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct RefreshResponse {
    pub access_token: String,
}

/// Request body for connecting a biometric device.
#[derive(Debug, Serialize)]
pub(crate) struct ConnectDeviceRequest<'a> {
    pub device_type: &'a str,
}
