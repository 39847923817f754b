//! Memorial preference and photo types.

use serde::{Deserialize, Serialize};

/// How the memorial page behaves after it goes live.
///
/// Serialized for both reading and updating `/api/memorial/preferences`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemorialPreferences {
    /// Post a remembrance on the anniversary of passing.
    pub anniversary_posts: bool,

    /// Post a remembrance on the person's birthday.
    pub birthday_remembrance: bool,

    /// Show biometric history on the public page.
    pub biometric_public: bool,

    /// Allow family members to contribute memories.
    pub family_memories: bool,

    /// The person trusted to manage the page.
    pub guardian_name: Option<String>,
    pub guardian_email: Option<String>,

    /// A final message revealed on the memorial page.
    pub final_message: Option<String>,
}

impl Default for MemorialPreferences {
    fn default() -> Self {
        Self {
            anniversary_posts: true,
            birthday_remembrance: true,
            biometric_public: false,
            family_memories: true,
            guardian_name: None,
            guardian_email: None,
            final_message: None,
        }
    }
}

/// An uploaded gallery photo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,

    /// Server path to the stored file; relative paths resolve against the
    /// API base origin.
    pub file_path: String,

    pub original_filename: String,
}
