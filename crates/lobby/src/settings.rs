use core::time::Duration;

/// Tunables shared by every round in a lobby.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Maximum number of questions asked per round.
    pub round_length: u32,
    /// How long each question stays open (in seconds).
    pub duration: u32,
    /// Remaining seconds at which the countdown message is refreshed.
    pub checkpoints: Box<[u32]>,
}

impl Settings {
    pub const ROUND_LENGTH: u32 = 15;
    pub const DURATION: u32 = 15;
    pub const CHECKPOINTS: [u32; 3] = [15, 10, 5];

    pub fn question_timeout(&self) -> Duration {
        Duration::from_secs(self.duration.into())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self { round_length: Self::ROUND_LENGTH, duration: Self::DURATION, checkpoints: Box::new(Self::CHECKPOINTS) }
    }
}
