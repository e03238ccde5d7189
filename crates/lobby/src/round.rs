use crate::{settings::Settings, MessageId, UserId};
use model::Question;
use rand::{seq::SliceRandom, Rng};
use std::{
    cmp::Reverse,
    collections::{HashMap, VecDeque},
    sync::Arc,
};

/// Result of a single countdown tick.
#[derive(Debug, PartialEq, Eq)]
pub enum Tick {
    /// The question has already resolved. The ticker should be disarmed.
    Stale,
    /// One second elapsed without reaching a checkpoint.
    Counted,
    /// One second elapsed and the countdown message should now show this many seconds.
    Checkpoint(u32),
    /// No time remains. The ticker should be disarmed and the timeout left to move on.
    Elapsed,
}

/// Everything a chat knows about its running round.
///
/// This type performs no I/O. The owning session turns its return values into messages
/// and timer changes.
pub struct Round {
    settings: Arc<Settings>,
    /// Questions not yet asked, already shuffled.
    queue: VecDeque<Question>,
    current: Option<Question>,
    /// Number of questions presented so far.
    count: u32,
    scores: HashMap<UserId, u32>,
    /// Last display name seen for each scorer.
    names: HashMap<UserId, String>,
    active: bool,
    solved_by: Option<UserId>,
    remaining: u32,
    countdown: Option<MessageId>,
}

impl Round {
    pub fn new<R: Rng + ?Sized>(catalog: &[Question], settings: Arc<Settings>, rng: &mut R) -> Self {
        let mut questions = catalog.to_vec();
        questions.shuffle(rng);
        questions.truncate(usize::try_from(settings.round_length).unwrap_or(usize::MAX));
        Self {
            remaining: settings.duration,
            settings,
            queue: questions.into(),
            current: None,
            count: 0,
            scores: HashMap::new(),
            names: HashMap::new(),
            active: false,
            solved_by: None,
            countdown: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Number of questions presented so far. This is also the 1-based number of the current one.
    pub const fn count(&self) -> u32 {
        self.count
    }

    pub fn current(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    pub const fn is_active(&self) -> bool {
        self.active
    }

    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    pub const fn countdown(&self) -> Option<MessageId> {
        self.countdown
    }

    pub fn set_countdown(&mut self, message: MessageId) {
        self.countdown = Some(message);
    }

    /// Moves on to the next question. Returns `None` once the round is over, either because
    /// enough questions were asked or because the catalog ran dry.
    pub fn advance(&mut self) -> Option<&Question> {
        if self.count >= self.settings.round_length {
            return None;
        }

        let question = self.queue.pop_front()?;
        self.count += 1;
        self.active = true;
        self.solved_by = None;
        self.remaining = self.settings.duration;
        self.countdown = None;
        self.current = Some(question);
        self.current.as_ref()
    }

    pub fn tick(&mut self) -> Tick {
        if !self.active {
            return Tick::Stale;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            Tick::Elapsed
        } else if self.settings.checkpoints.contains(&self.remaining) {
            Tick::Checkpoint(self.remaining)
        } else {
            Tick::Counted
        }
    }

    /// Closes the current question for lack of a correct answer. Returns the question so that
    /// its answer can be revealed, or `None` if it had already been closed.
    pub fn timeout(&mut self) -> Option<&Question> {
        if !self.active {
            return None;
        }
        self.active = false;
        self.current.as_ref()
    }

    /// Checks a candidate answer. Returns the answerer's new total if they were the first to
    /// get the current question right. Anything else leaves the round untouched.
    pub fn answer(&mut self, user: UserId, name: &str, text: &str) -> Option<u32> {
        if !self.active || self.solved_by.is_some() {
            return None;
        }

        if !self.current.as_ref()?.is_correct(text) {
            return None;
        }

        self.solved_by = Some(user);
        self.active = false;
        self.names.insert(user, String::from(name.trim()));
        let score = self.scores.entry(user).or_default();
        *score += 1;
        Some(*score)
    }

    /// Final standings: highest score first, ties broken by display name.
    pub fn scoreboard(&self) -> Vec<(String, u32)> {
        let mut board: Vec<_> = self
            .scores
            .iter()
            .map(|(user, &score)| {
                let name = self.names.get(user).cloned().unwrap_or_else(|| user.to_string());
                (name, score)
            })
            .collect();
        board.sort_by(|(a_name, a_score), (b_name, b_score)| {
            (Reverse(a_score), a_name).cmp(&(Reverse(b_score), b_name))
        });
        board
    }
}

#[cfg(test)]
mod tests {
    use super::{Round, Settings, Tick};
    use model::Question;
    use rand::{rngs::StdRng, SeedableRng};
    use std::{collections::HashSet, sync::Arc};

    fn settings(round_length: u32, duration: u32) -> Arc<Settings> {
        Arc::new(Settings { round_length, duration, ..Default::default() })
    }

    fn round(catalog: &[Question], round_length: u32, duration: u32) -> Round {
        let mut rng = StdRng::seed_from_u64(7);
        Round::new(catalog, settings(round_length, duration), &mut rng)
    }

    fn letters() -> Vec<Question> {
        ["A", "B", "C"].into_iter().map(|letter| Question::new(format!("Say {letter}."), letter)).collect()
    }

    /// Answers whatever question is currently open.
    fn solve(round: &mut Round, user: u64, name: &str) -> Option<u32> {
        let answer = round.current().unwrap().answer.clone();
        round.answer(user, name, &answer)
    }

    #[test]
    fn draws_without_repeats() {
        let catalog = model::catalog();
        let mut round = round(&catalog, 15, 15);
        let mut seen = HashSet::new();
        while let Some(question) = round.advance() {
            assert!(seen.insert(question.prompt.clone()), "repeated {}", question.prompt);
        }
        assert_eq!(seen.len(), 15);
        assert_eq!(round.count(), 15);
    }

    #[test]
    fn short_catalog_ends_early() {
        let mut round = round(&letters(), 15, 15);
        assert!(round.advance().is_some());
        assert!(round.advance().is_some());
        assert!(round.advance().is_some());
        assert!(round.advance().is_none());
        assert_eq!(round.count(), 3);
    }

    #[test]
    fn advance_resets_question_state() {
        let mut round = round(&letters(), 3, 4);
        assert!(!round.is_active());
        round.advance().unwrap();
        round.set_countdown(9);
        assert_eq!(round.tick(), Tick::Counted);
        assert_eq!(solve(&mut round, 1, "Ann"), Some(1));

        round.advance().unwrap();
        assert!(round.is_active());
        assert_eq!(round.count(), 2);
        assert_eq!(round.remaining(), 4);
        assert_eq!(round.countdown(), None);
        assert_eq!(solve(&mut round, 2, "Ben"), Some(1));
    }

    #[test]
    fn nothing_to_answer_before_first_question() {
        let mut round = round(&letters(), 3, 15);
        assert_eq!(round.answer(1, "Ann", "A"), None);
        assert_eq!(round.answer(1, "Ann", "B"), None);
        assert_eq!(round.answer(1, "Ann", "C"), None);
        assert!(round.scoreboard().is_empty());
    }

    #[test]
    fn first_correct_answer_wins() {
        let mut round = round(&letters(), 3, 15);
        round.advance().unwrap();
        assert_eq!(solve(&mut round, 1, "Ann"), Some(1));
        assert_eq!(solve(&mut round, 2, "Ben"), None);
        assert!(!round.is_active());
        assert_eq!(round.scoreboard(), [(String::from("Ann"), 1)]);
    }

    #[test]
    fn wrong_answers_change_nothing() {
        let mut round = round(&letters(), 3, 15);
        round.advance().unwrap();
        assert_eq!(round.answer(1, "Ann", "definitely wrong"), None);
        assert!(round.is_active());
        assert!(round.scoreboard().is_empty());
        assert_eq!(solve(&mut round, 1, "Ann"), Some(1));
    }

    #[test]
    fn answers_are_trimmed_only() {
        let catalog = [Question::new("What is the formula of an iron(II) ion?", "Fe 2+")];
        let mut round = round(&catalog, 1, 15);
        round.advance().unwrap();
        assert_eq!(round.answer(1, "Ann", "Fe2+"), None);
        assert_eq!(round.answer(1, "Ann", "fe 2+"), None);
        assert_eq!(round.answer(1, " Ann ", "  Fe 2+ "), Some(1));
        assert_eq!(round.scoreboard(), [(String::from("Ann"), 1)]);
    }

    #[test]
    fn timeout_fires_once() {
        let mut round = round(&letters(), 3, 15);
        round.advance().unwrap();
        let expected = round.current().unwrap().clone();
        assert_eq!(round.timeout(), Some(&expected));
        assert_eq!(round.timeout(), None);
        assert!(!round.is_active());
        assert_eq!(solve(&mut round, 1, "Ann"), None);
    }

    #[test]
    fn timeout_after_solve_is_ignored() {
        let mut round = round(&letters(), 3, 15);
        round.advance().unwrap();
        assert_eq!(solve(&mut round, 1, "Ann"), Some(1));
        assert_eq!(round.timeout(), None);
    }

    #[test]
    fn countdown_hits_checkpoints() {
        let mut round = round(&letters(), 3, 15);
        round.advance().unwrap();
        let ticks: Vec<_> = (0..15).map(|_| round.tick()).collect();
        let checkpoints: Vec<_> = ticks
            .iter()
            .filter_map(|tick| match tick {
                Tick::Checkpoint(left) => Some(*left),
                _ => None,
            })
            .collect();
        assert_eq!(checkpoints, [10, 5]);
        assert_eq!(ticks.last(), Some(&Tick::Elapsed));
        assert_eq!(round.remaining(), 0);

        // The timeout has not fired yet, so the counter just stays put.
        assert_eq!(round.tick(), Tick::Elapsed);
        assert_eq!(round.remaining(), 0);
    }

    #[test]
    fn longer_questions_reach_first_checkpoint() {
        let mut round = round(&letters(), 3, 16);
        round.advance().unwrap();
        assert_eq!(round.tick(), Tick::Checkpoint(15));
    }

    #[test]
    fn countdown_freezes_once_resolved() {
        let mut round = round(&letters(), 3, 15);
        round.advance().unwrap();
        assert_eq!(round.tick(), Tick::Counted);
        assert_eq!(solve(&mut round, 1, "Ann"), Some(1));
        assert_eq!(round.tick(), Tick::Stale);
        assert_eq!(round.remaining(), 14);
    }

    #[test]
    fn scoreboard_orders_by_score_then_name() {
        let catalog: Vec<_> = (0..5).map(|i| Question::new(format!("Q{i}"), i.to_string())).collect();
        let mut round = round(&catalog, 5, 15);

        for (user, name) in [(1, "Zed"), (2, "Amy"), (3, "Bob"), (3, "Bob"), (4, "Cat")] {
            round.advance().unwrap();
            assert!(solve(&mut round, user, name).is_some());
        }

        let board = round.scoreboard();
        let names: Vec<_> = board.iter().map(|(name, score)| (name.as_str(), *score)).collect();
        assert_eq!(names, [("Bob", 2), ("Amy", 1), ("Cat", 1), ("Zed", 1)]);
    }

    #[test]
    fn scoreboard_keeps_latest_name() {
        let mut round = round(&letters(), 3, 15);
        round.advance().unwrap();
        assert_eq!(solve(&mut round, 1, "Ann"), Some(1));
        round.advance().unwrap();
        assert_eq!(solve(&mut round, 1, "Annie"), Some(2));
        assert_eq!(round.scoreboard(), [(String::from("Annie"), 2)]);
    }
}
