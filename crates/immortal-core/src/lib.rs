//! immortal-core - Core types for the Immortal memorial platform client.

pub mod credentials;
pub mod error;
pub mod models;
pub mod token;
pub mod types;

pub use credentials::{Credentials, RegisterPayload};
pub use error::{ApiError, Error, TransportError};
pub use models::{
    DefaultTraits, Device, HealthStats, MemorialPreferences, Photo, TraitEntry, TraitSelection,
    User, UserProfile,
};
pub use token::{AccessToken, TokenStore};
pub use types::ApiUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
