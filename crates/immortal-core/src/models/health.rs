//! Biometric device and health stat types.

use serde::{Deserialize, Serialize};

/// A connectable biometric device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    /// Device identifier, e.g. "whoop", "apple", "garmin", "fitbit".
    pub device_type: String,
    pub connected: bool,
}

/// Aggregated biometrics from connected devices.
///
/// Absent entirely (404) until at least one device has synced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStats {
    /// Average nightly sleep in hours.
    pub avg_sleep: f64,

    /// Recovery score, 0-100.
    pub recovery_score: f64,

    /// Resting heart rate in bpm.
    pub resting_hr: f64,
}
