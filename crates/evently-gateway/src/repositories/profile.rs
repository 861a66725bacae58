//! REST implementation of ProfileRepository

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;
use uuid::Uuid;

use evently_core::{
    Caller, DomainError, NewProfile, Profile, ProfilePatch, ProfileRepository, RepoResult,
};

use crate::client::{Query, RestClient};
use crate::mappers::{ProfileInsert, ProfileUpdate};
use crate::models::ProfileRow;

const TABLE: &str = "profiles";

/// REST implementation of ProfileRepository
#[derive(Clone)]
pub struct RestProfileRepository {
    client: Arc<RestClient>,
}

impl RestProfileRepository {
    /// Create a new RestProfileRepository
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProfileRepository for RestProfileRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, caller: &Caller, id: Uuid) -> RepoResult<Option<Profile>> {
        let query = Query::table(TABLE).select("*").eq("id", id);
        let rows: Vec<ProfileRow> = self.client.select(caller, &query).await?;
        Ok(rows.into_iter().next().map(Profile::from))
    }

    #[instrument(skip(self, profile), fields(id = %profile.id))]
    async fn create(&self, caller: &Caller, profile: &NewProfile) -> RepoResult<Profile> {
        let query = Query::table(TABLE).select("*");
        let rows: Vec<ProfileRow> = self
            .client
            .insert(caller, &query, &[ProfileInsert::from(profile)])
            .await?;

        rows.into_iter()
            .next()
            .map(Profile::from)
            .ok_or_else(|| DomainError::PolicyViolation("create profile".to_string()))
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, caller: &Caller, id: Uuid, patch: &ProfilePatch) -> RepoResult<Profile> {
        let query = Query::table(TABLE).select("*").eq("id", id);
        let rows: Vec<ProfileRow> = self
            .client
            .update(caller, &query, &ProfileUpdate::from(patch))
            .await?;

        if let Some(row) = rows.into_iter().next() {
            return Ok(row.into());
        }

        match self.find_by_id(caller, id).await? {
            Some(_) => Err(DomainError::PolicyViolation(format!("update profile {id}"))),
            None => Err(DomainError::ProfileNotFound(id)),
        }
    }
}
