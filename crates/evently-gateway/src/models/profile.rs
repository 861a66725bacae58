//! Profile row model

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

/// Row of the `profiles` table
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRow {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
}
