use lobby::{Answer, ChatId, Inbound, MessageId, Messenger, UserId};
use std::{
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
};

/// Prints outbound messages to standard output in place of a chat platform.
#[derive(Default)]
pub struct Console {
    next: AtomicU64,
}

#[async_trait::async_trait]
impl Messenger for Console {
    async fn send(&self, chat: ChatId, text: String) -> anyhow::Result<MessageId> {
        let id = self.next.fetch_add(1, Ordering::Relaxed);
        println!("[{chat}] #{id}\n{text}\n");
        Ok(id)
    }

    async fn edit(&self, chat: ChatId, message: MessageId, text: String) -> anyhow::Result<()> {
        println!("[{chat}] #{message} (edited)\n{text}\n");
        Ok(())
    }
}

/// Turns typed lines into lobby triggers. Plain lines are read as `name: text`, and lines
/// without a name are attributed to the default player.
#[derive(Default)]
pub struct Reader {
    /// Stable identity for every name typed so far.
    users: HashMap<Box<str>, UserId>,
}

impl Reader {
    const DEFAULT_NAME: &'static str = "you";

    pub fn read(&mut self, line: &str) -> Option<Inbound> {
        let inbound = match line.trim() {
            "" => return None,
            "/start" | "/help" => Inbound::Welcome,
            "/quiz" => Inbound::Start,
            "/stop" => Inbound::Cancel,
            _ => {
                let (name, text) = match line.split_once(':') {
                    Some((name, text)) if !name.trim().is_empty() => (name.trim(), text),
                    _ => (Self::DEFAULT_NAME, line),
                };
                let next = self.users.len() as UserId + 1;
                let user = *self.users.entry(name.into()).or_insert(next);
                Inbound::Text(Answer { user, name: name.into(), text: text.into() })
            }
        };
        Some(inbound)
    }
}
