use crate::{ChatId, MessageId};

/// Outbound side of the chat platform.
///
/// Rounds only ever post plain text and edit their own countdown message. Delivery is
/// best-effort: callers log failures and carry on.
#[async_trait::async_trait]
pub trait Messenger: Send + Sync + 'static {
    /// Posts a new message and returns its identifier for later edits.
    async fn send(&self, chat: ChatId, text: String) -> anyhow::Result<MessageId>;

    /// Replaces the text of a message previously returned by [`Messenger::send`].
    async fn edit(&self, chat: ChatId, message: MessageId, text: String) -> anyhow::Result<()>;
}
