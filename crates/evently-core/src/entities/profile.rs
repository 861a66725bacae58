//! Profile entity - the public identity record mirroring an auth identity

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Profile entity
///
/// The id is the auth identity id, so a profile is created at most once per
/// registered user and never deleted by the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// First and last name joined with a space
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Two-letter initials used as an avatar fallback
    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .take(1)
            .chain(self.last_name.chars().take(1))
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// Apply a partial update in place
    pub fn apply(&mut self, patch: &ProfilePatch) {
        if let Some(first_name) = &patch.first_name {
            self.first_name.clone_from(first_name);
        }
        if let Some(last_name) = &patch.last_name {
            self.last_name.clone_from(last_name);
        }
        if let Some(email) = &patch.email {
            self.email.clone_from(email);
        }
        if let Some(avatar_url) = &patch.avatar_url {
            self.avatar_url.clone_from(avatar_url);
        }
        if let Some(bio) = &patch.bio {
            self.bio.clone_from(bio);
        }
    }
}

/// Values for inserting a new profile row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Partial profile update
///
/// `None` leaves a column untouched; `Some(None)` clears a nullable column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<Option<String>>,
    pub bio: Option<Option<String>>,
}

impl ProfilePatch {
    /// True when the patch would not change any column
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.avatar_url.is_none()
            && self.bio.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Profile {
        Profile {
            id: Uuid::new_v4(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            avatar_url: Some("https://example.com/ada.png".to_string()),
            bio: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_full_name_and_initials() {
        let profile = sample();
        assert_eq!(profile.full_name(), "Ada Lovelace");
        assert_eq!(profile.initials(), "AL");
    }

    #[test]
    fn test_apply_patch_clears_nullable_columns() {
        let mut profile = sample();
        let patch = ProfilePatch {
            first_name: Some("Augusta".to_string()),
            avatar_url: Some(None),
            bio: Some(Some("Analyst".to_string())),
            ..ProfilePatch::default()
        };

        profile.apply(&patch);

        assert_eq!(profile.first_name, "Augusta");
        assert_eq!(profile.last_name, "Lovelace");
        assert!(profile.avatar_url.is_none());
        assert_eq!(profile.bio.as_deref(), Some("Analyst"));
    }

    #[test]
    fn test_empty_patch() {
        assert!(ProfilePatch::default().is_empty());
        let patch = ProfilePatch {
            bio: Some(None),
            ..ProfilePatch::default()
        };
        assert!(!patch.is_empty());
    }
}
