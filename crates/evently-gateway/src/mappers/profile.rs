//! Profile entity <-> row mapper

use evently_core::{NewProfile, Profile, ProfilePatch};
use serde::Serialize;
use uuid::Uuid;

use crate::models::ProfileRow;

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            avatar_url: row.avatar_url,
            bio: row.bio,
            created_at: row.created_at,
        }
    }
}

/// Insert payload for `profiles`
#[derive(Debug, Serialize)]
pub struct ProfileInsert<'a> {
    pub id: Uuid,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
}

impl<'a> From<&'a NewProfile> for ProfileInsert<'a> {
    fn from(profile: &'a NewProfile) -> Self {
        Self {
            id: profile.id,
            first_name: &profile.first_name,
            last_name: &profile.last_name,
            email: &profile.email,
        }
    }
}

/// Update payload for `profiles`; absent fields are left untouched
#[derive(Debug, Serialize)]
pub struct ProfileUpdate<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<Option<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<Option<&'a str>>,
}

impl<'a> From<&'a ProfilePatch> for ProfileUpdate<'a> {
    fn from(patch: &'a ProfilePatch) -> Self {
        Self {
            first_name: patch.first_name.as_deref(),
            last_name: patch.last_name.as_deref(),
            email: patch.email.as_deref(),
            avatar_url: patch.avatar_url.as_ref().map(Option::as_deref),
            bio: patch.bio.as_ref().map(Option::as_deref),
        }
    }
}
