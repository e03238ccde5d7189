pub mod error;
pub mod round;

mod messenger;
mod session;
mod settings;

pub use messenger::Messenger;
pub use model::Question;
pub use settings::Settings;

use dashmap::{mapref::entry::Entry, DashMap};
use error::{Error, Result};
use round::Round;
use session::{Event, Session};
use std::sync::Arc;
use tokio::sync::mpsc;

pub type ChatId = i64;
pub type UserId = u64;
pub type MessageId = u64;

type Channel = mpsc::UnboundedSender<Event>;
type Registry = DashMap<ChatId, Channel>;

/// A free-text message that may answer the current question.
#[derive(Clone, Debug)]
pub struct Answer {
    pub user: UserId,
    /// Display name of the sender at the time of the message.
    pub name: String,
    pub text: String,
}

/// Everything a chat can ask of the lobby.
#[derive(Clone, Debug)]
pub enum Inbound {
    /// Explain the rules.
    Welcome,
    /// Begin a new round.
    Start,
    /// Abandon the running round without a scoreboard.
    Cancel,
    /// Any message that is not a command.
    Text(Answer),
}

pub struct Lobby<M> {
    /// One entry per chat with a running round.
    rounds: Arc<Registry>,
    /// Outbound chat messages.
    messenger: Arc<M>,
    settings: Arc<Settings>,
    /// Questions that each round draws from.
    catalog: Arc<[Question]>,
}

impl<M> Clone for Lobby<M> {
    fn clone(&self) -> Self {
        Self {
            rounds: Arc::clone(&self.rounds),
            messenger: Arc::clone(&self.messenger),
            settings: Arc::clone(&self.settings),
            catalog: Arc::clone(&self.catalog),
        }
    }
}

impl<M: Messenger> Lobby<M> {
    pub fn new(messenger: M, settings: Settings, catalog: Vec<Question>) -> Self {
        Self {
            rounds: Arc::default(),
            messenger: Arc::new(messenger),
            settings: Arc::new(settings),
            catalog: catalog.into(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_active(&self, chat: ChatId) -> bool {
        self.rounds.contains_key(&chat)
    }

    /// Routes a trigger to the chat's round. Rejections are reported back to the chat.
    pub async fn on_inbound(&self, chat: ChatId, inbound: Inbound) {
        let result = match inbound {
            Inbound::Welcome => {
                self.welcome(chat).await;
                Ok(())
            }
            Inbound::Start => self.start(chat),
            Inbound::Cancel => self.cancel(chat),
            Inbound::Text(answer) => {
                self.answer(chat, answer);
                Ok(())
            }
        };

        let Err(err) = result else {
            return;
        };

        log::debug!("rejected request in chat {chat}: {err:?}");
        if let Err(err) = self.messenger.send(chat, err.to_string()).await {
            log::warn!("failed to deliver warning to chat {chat}: {err:#}");
        }
    }

    /// Spawns a fresh round for the chat. Fails if one is already running.
    pub fn start(&self, chat: ChatId) -> Result<()> {
        let (tx, rx) = mpsc::unbounded_channel();
        match self.rounds.entry(chat) {
            Entry::Occupied(_) => return Err(Error::RoundInProgress),
            Entry::Vacant(entry) => {
                entry.insert(tx);
            }
        }

        let round = Round::new(&self.catalog, Arc::clone(&self.settings), &mut rand::thread_rng());
        let session = Session::new(chat, round, rx, Arc::clone(&self.messenger), Arc::clone(&self.rounds));
        tokio::spawn(session.run());
        Ok(())
    }

    /// Forwards a candidate answer. Messages in chats without a round are dropped.
    pub fn answer(&self, chat: ChatId, answer: Answer) {
        let Some(channel) = self.rounds.get(&chat) else {
            log::trace!("no round in chat {chat} for message from {}", answer.user);
            return;
        };

        // The round may be wrapping up, in which case the answer is moot anyway.
        if channel.send(Event::Answer(answer)).is_err() {
            log::trace!("round in chat {chat} already closed");
        }
    }

    pub fn cancel(&self, chat: ChatId) -> Result<()> {
        self.rounds.get(&chat).ok_or(Error::NoRound)?.send(Event::Cancel).map_err(|_| Error::NoRound)
    }

    pub async fn welcome(&self, chat: ChatId) {
        let Settings { round_length, duration, .. } = *self.settings;
        let text = format!(
            "Welcome to the Ion Formula Quiz!\n\n\
            Answer with the formula of the ion followed by its charge, separated by a space. \
            For example, the carbonate ion is written as 'CO3 2-'.\n\n\
            Keep a periodic table handy!\n\n\
            Type /quiz to start a {round_length}-question round. \
            You have {duration}s per question and the first correct answer scores."
        );
        if let Err(err) = self.messenger.send(chat, text).await {
            log::warn!("failed to deliver welcome to chat {chat}: {err:#}");
        }
    }
}
