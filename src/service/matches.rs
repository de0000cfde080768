use crate::database::matches::MatchRepository;
use crate::database::user::UserRepository;
use crate::error::app_error::AppError;
use crate::models::matches::{MatchUpdateRequest, MatchWithProfiles, UserPair};
use crate::models::swipe::{Swipe, SwipeDirection};
use tracing::info;
use uuid::Uuid;

pub struct MatchService<'a, R: ?Sized> {
    repository: &'a R,
}

impl<'a, R: MatchRepository + UserRepository + ?Sized> MatchService<'a, R> {
    pub fn new(repository: &'a R) -> Self {
        MatchService { repository }
    }

    /// Creates the match completed by `swipe`, if any.
    ///
    /// Must run after `swipe` is persisted. The reciprocity check and the
    /// insert are one storage operation, so concurrent Right swipes in both
    /// directions yield exactly one match and the caller whose statement
    /// inserted it is the only one to get `Some`.
    pub async fn resolve_right_swipe(&self, swipe: &Swipe) -> Result<Option<MatchWithProfiles>, AppError> {
        if swipe.direction != SwipeDirection::Right {
            return Ok(None);
        }

        let pair = UserPair::new(swipe.swiper_id, swipe.swipee_id)?;
        let Some(created) = self.repository.insert_match_if_reciprocal(&pair, &swipe.swiper_id, &swipe.swipee_id).await? else {
            return Ok(None);
        };

        info!(match_id = %created.id, user1_id = %created.user1_id, user2_id = %created.user2_id, "match created");
        self.repository.get_match_with_profiles(&created.id).await
    }

    /// Direct creation that bypasses swipes but keeps the pair invariant.
    pub async fn create_match(&self, user1_id: &Uuid, user2_id: &Uuid) -> Result<MatchWithProfiles, AppError> {
        let pair = UserPair::new(*user1_id, *user2_id)?;

        let user1 = self.repository.get_user_by_id(&pair.lo()).await?;
        let user2 = self.repository.get_user_by_id(&pair.hi()).await?;
        if user1.is_none() || user2.is_none() {
            return Err(AppError::not_found("one or both users not found"));
        }

        let created = self
            .repository
            .insert_match(&pair)
            .await?
            .ok_or_else(|| AppError::conflict("match already exists for these users"))?;

        info!(match_id = %created.id, "match created directly");
        self.load(&created.id).await
    }

    pub async fn list_matches(&self, user_id: &Uuid) -> Result<Vec<MatchWithProfiles>, AppError> {
        self.repository.list_matches_for_user(user_id).await
    }

    /// Matches are only visible to their participants.
    pub async fn get_match(&self, id: &Uuid, requester: &Uuid) -> Result<MatchWithProfiles, AppError> {
        let found = self.load(id).await?;
        if !found.record.has_participant(requester) {
            return Err(AppError::not_found("match not found"));
        }
        Ok(found)
    }

    pub async fn update_match(&self, id: &Uuid, requester: &Uuid, request: &MatchUpdateRequest) -> Result<MatchWithProfiles, AppError> {
        match self.repository.get_match_by_id(id).await? {
            Some(existing) if existing.has_participant(requester) => {}
            _ => return Err(AppError::forbidden("you are not part of this match")),
        }

        if request.notes.is_some() || request.archived.is_some() {
            self.repository.update_match(id, request.normalized_notes(), request.archived).await?;
        }

        self.load(id).await
    }

    async fn load(&self, id: &Uuid) -> Result<MatchWithProfiles, AppError> {
        self.repository
            .get_match_with_profiles(id)
            .await?
            .ok_or_else(|| AppError::not_found("match not found"))
    }
}
