use crate::database::conversation::ConversationRepository;
use crate::database::message::MessageRepository;
use crate::error::app_error::AppError;
use crate::models::message::{Message, MessageRequest};
use crate::models::pagination::{OffsetParams, PageInfo};
use crate::service::conversation::authorize_participant;
use uuid::Uuid;

pub struct MessageService<'a, R: ?Sized> {
    repository: &'a R,
}

impl<'a, R: ConversationRepository + MessageRepository + ?Sized> MessageService<'a, R> {
    pub fn new(repository: &'a R) -> Self {
        MessageService { repository }
    }

    pub async fn send(&self, conversation_id: &Uuid, sender_id: &Uuid, request: &MessageRequest) -> Result<Message, AppError> {
        let content = request.content()?;
        authorize_participant(self.repository, conversation_id, sender_id).await?;
        self.repository
            .create_message(conversation_id, sender_id, content)
            .await?
            .ok_or_else(|| AppError::forbidden("you do not have access to this conversation"))
    }

    /// A newest-first page of visible messages.
    pub async fn list(&self, conversation_id: &Uuid, requester: &Uuid, params: &OffsetParams) -> Result<(Vec<Message>, PageInfo), AppError> {
        let limit = params.effective_limit();
        let offset = params.effective_offset()?;
        authorize_participant(self.repository, conversation_id, requester).await?;

        let (messages, total) = self.repository.page_visible_messages(conversation_id, limit, offset).await?;
        Ok((messages, PageInfo { limit, offset, total }))
    }

    pub async fn edit(&self, message_id: &Uuid, requester: &Uuid, request: &MessageRequest) -> Result<Message, AppError> {
        let content = request.content()?;
        self.repository
            .edit_message(message_id, requester, content)
            .await?
            .ok_or_else(|| AppError::forbidden("you cannot edit this message"))
    }

    pub async fn soft_delete(&self, message_id: &Uuid, requester: &Uuid) -> Result<(), AppError> {
        if self.repository.soft_delete_message(message_id, requester).await? {
            Ok(())
        } else {
            Err(AppError::forbidden("you cannot delete this message"))
        }
    }
}
