use core::fmt::{self, Display};

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// A round is already running in this chat.
    RoundInProgress,
    /// There is no round to act on.
    NoRound,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::RoundInProgress => "A quiz is already in progress! Please wait for it to finish.",
            Self::NoRound => "There is no quiz in progress. Type /quiz to start one.",
        })
    }
}

pub type Result<T> = core::result::Result<T, Error>;
