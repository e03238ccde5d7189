use crate::{
    round::{Round, Tick},
    Answer, ChatId, Messenger, Registry,
};
use core::{ops::ControlFlow, pin::Pin, time::Duration};
use std::sync::Arc;
use tokio::{
    sync::mpsc,
    time::{self, Instant, Interval, MissedTickBehavior, Sleep},
};

/// Triggers that reach a session from outside its own timers.
pub enum Event {
    Answer(Answer),
    Cancel,
}

enum Timer {
    Tick,
    Timeout,
}

/// The two per-question timers. Dropping a handle cancels it.
#[derive(Default)]
struct Timers {
    tick: Option<Interval>,
    timeout: Option<Pin<Box<Sleep>>>,
}

impl Timers {
    const PERIOD: Duration = Duration::from_secs(1);

    fn arm(&mut self, timeout: Duration) {
        let mut tick = time::interval_at(Instant::now() + Self::PERIOD, Self::PERIOD);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.tick = Some(tick);
        self.timeout = Some(Box::pin(time::sleep(timeout)));
    }

    fn cancel(&mut self) {
        self.tick = None;
        self.timeout = None;
    }

    /// Waits for whichever armed timer fires first. Never resolves while both are disarmed.
    async fn fired(&mut self) -> Timer {
        let Self { tick, timeout } = self;
        let on_tick = async move {
            match tick {
                Some(interval) => {
                    interval.tick().await;
                }
                None => core::future::pending().await,
            }
        };
        let on_timeout = async move {
            match timeout {
                Some(sleep) => sleep.as_mut().await,
                None => core::future::pending().await,
            }
        };
        tokio::select! {
            biased;
            _ = on_tick => Timer::Tick,
            _ = on_timeout => Timer::Timeout,
        }
    }
}

/// Owns one chat's round for its whole lifetime. Every trigger for the chat is handled here
/// in order, so no two of them ever interleave their side effects.
pub struct Session<M> {
    chat: ChatId,
    round: Round,
    inbox: mpsc::UnboundedReceiver<Event>,
    timers: Timers,
    messenger: Arc<M>,
    registry: Arc<Registry>,
}

impl<M: Messenger> Session<M> {
    pub fn new(
        chat: ChatId,
        round: Round,
        inbox: mpsc::UnboundedReceiver<Event>,
        messenger: Arc<M>,
        registry: Arc<Registry>,
    ) -> Self {
        Self { chat, round, inbox, timers: Timers::default(), messenger, registry }
    }

    pub async fn run(mut self) {
        log::info!("round started in chat {}", self.chat);
        let mut flow = self.present().await;
        while flow.is_continue() {
            flow = tokio::select! {
                biased;
                event = self.inbox.recv() => match event {
                    Some(Event::Answer(answer)) => self.on_answer(answer).await,
                    Some(Event::Cancel) => self.on_cancel().await,
                    None => ControlFlow::Break(()),
                },
                timer = self.timers.fired() => match timer {
                    Timer::Tick => self.on_tick().await,
                    Timer::Timeout => self.on_timeout().await,
                },
            };
        }

        // Only this session ever removes its own entry, so nobody else could have claimed it.
        self.timers.cancel();
        self.registry.remove(&self.chat);
        log::info!("round closed in chat {}", self.chat);
    }

    /// Posts the next question, or the scoreboard if the round is over.
    async fn present(&mut self) -> ControlFlow<()> {
        self.timers.cancel();

        let Some(prompt) = self.round.advance().map(|question| question.prompt.clone()) else {
            self.finish().await;
            return ControlFlow::Break(());
        };

        let text = format!(
            "Q{}: {prompt}\n\n{}s left... First correct answer scores!",
            self.round.count(),
            self.round.remaining()
        );
        match self.messenger.send(self.chat, text).await {
            Ok(message) => self.round.set_countdown(message),
            Err(err) => log::warn!("failed to post question {} in chat {}: {err:#}", self.round.count(), self.chat),
        }

        self.timers.arm(self.round.settings().question_timeout());
        ControlFlow::Continue(())
    }

    async fn on_answer(&mut self, answer: Answer) -> ControlFlow<()> {
        let Answer { user, name, text } = answer;
        let Some(score) = self.round.answer(user, &name, &text) else {
            log::trace!("ignored answer from {user} in chat {}", self.chat);
            return ControlFlow::Continue(());
        };

        self.timers.cancel();
        log::debug!("{user} solved question {} in chat {}", self.round.count(), self.chat);
        self.say(format!("{} got it first! (+1) Current points: {score}", name.trim())).await;
        self.present().await
    }

    async fn on_tick(&mut self) -> ControlFlow<()> {
        match self.round.tick() {
            Tick::Stale | Tick::Elapsed => self.timers.tick = None,
            Tick::Counted => {}
            Tick::Checkpoint(left) => self.refresh_countdown(left).await,
        }
        ControlFlow::Continue(())
    }

    async fn on_timeout(&mut self) -> ControlFlow<()> {
        // The one-shot has fired either way.
        self.timers.timeout = None;

        let Some(question) = self.round.timeout() else {
            return ControlFlow::Continue(());
        };

        let text = format!("Time's up! The correct answer is {}", question.answer);
        self.timers.cancel();
        log::debug!("question {} timed out in chat {}", self.round.count(), self.chat);
        self.say(text).await;
        self.present().await
    }

    async fn on_cancel(&mut self) -> ControlFlow<()> {
        self.timers.cancel();
        log::info!("round cancelled in chat {} after {} questions", self.chat, self.round.count());
        self.say(String::from("Quiz cancelled.")).await;
        ControlFlow::Break(())
    }

    async fn finish(&mut self) {
        let board = self.round.scoreboard();
        let text = if board.is_empty() {
            String::from("Round finished! Nobody scored any points :(")
        } else {
            let lines: Vec<_> = board.into_iter().map(|(name, score)| format!("{name}: {score}")).collect();
            format!("Round finished ({} questions)!\n\nFinal scoreboard:\n{}", self.round.count(), lines.join("\n"))
        };
        self.say(text).await;
    }

    /// Best-effort edit of the question message. Failures never affect the round.
    async fn refresh_countdown(&mut self, left: u32) {
        let (Some(message), Some(question)) = (self.round.countdown(), self.round.current()) else {
            return;
        };

        let text = format!("Q{}: {}\n\n{left}s left... Quickly!", self.round.count(), question.prompt);
        if let Err(err) = self.messenger.edit(self.chat, message, text).await {
            log::debug!("countdown edit dropped in chat {}: {err:#}", self.chat);
        }
    }

    async fn say(&mut self, text: String) {
        if let Err(err) = self.messenger.send(self.chat, text).await {
            log::warn!("failed to deliver message to chat {}: {err:#}", self.chat);
        }
    }
}
