use crate::database::conversation::ConversationRepository;
use crate::database::matches::MatchRepository;
use crate::database::message::MessageRepository;
use crate::error::app_error::AppError;
use crate::models::conversation::{Conversation, ConversationAccess, ConversationSummary};
use crate::models::message::Message;
use tracing::info;
use uuid::Uuid;

pub(crate) const NO_ACCESS: &str = "you do not have access to this conversation";

/// Loads a conversation for a participant of its match. Absent conversations
/// and outsiders get the same 403.
pub(crate) async fn authorize_participant<R: ConversationRepository + ?Sized>(
    repository: &R,
    conversation_id: &Uuid,
    requester: &Uuid,
) -> Result<ConversationAccess, AppError> {
    match repository.get_conversation_access(conversation_id).await? {
        Some(access) if access.has_participant(requester) => Ok(access),
        _ => Err(AppError::forbidden(NO_ACCESS)),
    }
}

pub struct ConversationService<'a, R: ?Sized> {
    repository: &'a R,
}

impl<'a, R: ConversationRepository + MatchRepository + MessageRepository + ?Sized> ConversationService<'a, R> {
    pub fn new(repository: &'a R) -> Self {
        ConversationService { repository }
    }

    pub async fn create_conversation(&self, match_id: &Uuid, requester: &Uuid) -> Result<Conversation, AppError> {
        match self.repository.get_match_by_id(match_id).await? {
            Some(found) if found.has_participant(requester) => {}
            _ => return Err(AppError::forbidden("you are not part of this match")),
        }

        let conversation = self
            .repository
            .create_conversation(match_id)
            .await?
            .ok_or_else(|| AppError::conflict("conversation already exists for this match"))?;

        info!(conversation_id = %conversation.id, match_id = %match_id, "conversation created");
        Ok(conversation)
    }

    /// The conversation and its visible messages, oldest first.
    pub async fn get_conversation(&self, id: &Uuid, requester: &Uuid) -> Result<(ConversationAccess, Vec<Message>), AppError> {
        let access = authorize_participant(self.repository, id, requester).await?;
        let messages = self.repository.list_visible_messages(id).await?;
        Ok((access, messages))
    }

    pub async fn list_conversations(&self, requester: &Uuid) -> Result<Vec<ConversationSummary>, AppError> {
        self.repository.list_conversation_summaries(requester).await
    }

    /// Soft-deletes the messages and drops the conversation; the match stays.
    pub async fn delete_conversation(&self, id: &Uuid, requester: &Uuid) -> Result<(), AppError> {
        authorize_participant(self.repository, id, requester).await?;
        if !self.repository.delete_conversation(id).await? {
            return Err(AppError::forbidden(NO_ACCESS));
        }
        info!(conversation_id = %id, "conversation deleted");
        Ok(())
    }
}
