//! Personality trait types.

use serde::{Deserialize, Serialize};

/// A single trait attached to a profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraitEntry {
    pub trait_name: String,

    /// True when the trait was typed in by the user rather than picked
    /// from the platform's default list.
    pub is_custom: bool,
}

/// The full trait selection submitted for a profile.
///
/// Replaces the previous selection wholesale; the server distinguishes
/// platform defaults from user-typed traits by which list a name arrives in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraitSelection {
    pub traits: Vec<String>,
    pub custom_traits: Vec<String>,
}

/// The platform's default trait list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultTraits {
    pub traits: Vec<String>,
}
