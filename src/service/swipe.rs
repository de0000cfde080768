use crate::database::matches::MatchRepository;
use crate::database::swipe::SwipeRepository;
use crate::database::user::UserRepository;
use crate::error::app_error::AppError;
use crate::models::matches::MatchWithProfiles;
use crate::models::swipe::{Swipe, SwipeDirection, SwipeFilter};
use crate::service::matches::MatchService;
use uuid::Uuid;

#[derive(Debug)]
pub struct SwipeOutcome {
    pub swipe: Swipe,
    pub created_match: Option<MatchWithProfiles>,
}

pub struct SwipeService<'a, R: ?Sized> {
    repository: &'a R,
}

impl<'a, R: SwipeRepository + MatchRepository + UserRepository + ?Sized> SwipeService<'a, R> {
    pub fn new(repository: &'a R) -> Self {
        SwipeService { repository }
    }

    /// Appends a swipe and, for Right swipes, resolves a possible match.
    /// Repeated swipes on the same user are recorded again.
    pub async fn record_swipe(&self, swiper_id: &Uuid, swipee_id: &Uuid, direction: &str) -> Result<SwipeOutcome, AppError> {
        let direction = SwipeDirection::parse(direction)?;
        if swiper_id == swipee_id {
            return Err(AppError::bad_request("cannot swipe on yourself"));
        }
        if self.repository.get_user_by_id(swipee_id).await?.is_none() {
            return Err(AppError::not_found("user not found"));
        }

        let swipe = self.repository.create_swipe(swiper_id, swipee_id, direction).await?;
        let created_match = MatchService::new(self.repository).resolve_right_swipe(&swipe).await?;

        Ok(SwipeOutcome { swipe, created_match })
    }

    pub async fn get_swipe(&self, id: &Uuid) -> Result<Swipe, AppError> {
        self.repository
            .get_swipe_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("swipe not found"))
    }

    pub async fn list_swipes(&self, filter: &SwipeFilter) -> Result<Vec<Swipe>, AppError> {
        self.repository.list_swipes(filter).await
    }

    pub async fn delete_swipe(&self, id: &Uuid, requester: &Uuid) -> Result<(), AppError> {
        let swipe = self.get_swipe(id).await?;
        if swipe.swiper_id != *requester {
            return Err(AppError::forbidden("only the swiper can delete a swipe"));
        }
        if !self.repository.delete_swipe(id).await? {
            return Err(AppError::not_found("swipe not found"));
        }
        Ok(())
    }
}
