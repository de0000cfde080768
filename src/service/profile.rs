use crate::database::profile::ProfileRepository;
use crate::error::app_error::AppError;
use crate::models::profile::{Profile, ProfileRequest};
use uuid::Uuid;

pub struct ProfileService<'a, R: ?Sized> {
    repository: &'a R,
}

impl<'a, R: ProfileRepository + ?Sized> ProfileService<'a, R> {
    pub fn new(repository: &'a R) -> Self {
        ProfileService { repository }
    }

    pub async fn create(&self, owner: &Uuid, request: &ProfileRequest) -> Result<Profile, AppError> {
        self.repository
            .create_profile(owner, request)
            .await?
            .ok_or_else(|| AppError::conflict("profile already exists"))
    }

    pub async fn get(&self, id: &Uuid) -> Result<Profile, AppError> {
        self.repository
            .get_profile_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("profile not found"))
    }

    pub async fn get_for_user(&self, user_id: &Uuid) -> Result<Profile, AppError> {
        self.repository
            .get_profile_by_user_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("profile not found"))
    }

    pub async fn list(&self, only_user: Option<&Uuid>, requester: &Uuid) -> Result<Vec<Profile>, AppError> {
        self.repository.list_profiles(only_user, requester).await
    }

    pub async fn update(&self, id: &Uuid, requester: &Uuid, request: &ProfileRequest) -> Result<Profile, AppError> {
        self.owned(id, requester).await?;
        if request.is_empty() {
            return Err(AppError::bad_request("no fields to update"));
        }

        self.repository
            .update_profile(id, request)
            .await?
            .ok_or_else(|| AppError::not_found("profile not found"))
    }

    pub async fn delete(&self, id: &Uuid, requester: &Uuid) -> Result<(), AppError> {
        self.owned(id, requester).await?;
        if !self.repository.delete_profile(id).await? {
            return Err(AppError::not_found("profile not found"));
        }
        Ok(())
    }

    async fn owned(&self, id: &Uuid, requester: &Uuid) -> Result<Profile, AppError> {
        let profile = self.get(id).await?;
        if profile.user_id != *requester {
            return Err(AppError::forbidden("only the owner can change a profile"));
        }
        Ok(profile)
    }
}
