//! Profile service

use tracing::{info, instrument};

use evently_core::{Caller, DomainError, Profile, ProfilePatch};

use crate::dto::UpdateProfileRequest;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Profile service
pub struct ProfileService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ProfileService<'a> {
    /// Create a new ProfileService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// The caller's own profile
    #[instrument(skip(self))]
    pub async fn get_profile(&self, caller: &Caller) -> ServiceResult<Profile> {
        let user_id = caller.require_user()?;
        self.ctx
            .profile_repo()
            .find_by_id(caller, user_id)
            .await?
            .ok_or_else(|| DomainError::ProfileNotFound(user_id).into())
    }

    /// Update the caller's own profile
    ///
    /// Empty avatar or bio values clear the stored value.
    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        caller: &Caller,
        request: UpdateProfileRequest,
    ) -> ServiceResult<Profile> {
        let user_id = caller.require_user()?;
        let patch = ProfilePatch::from(request);

        let profile = self
            .ctx
            .profile_repo()
            .update(caller, user_id, &patch)
            .await?;

        info!(user_id = %user_id, "Profile updated");
        Ok(profile)
    }
}
