use thiserror::Error;

use crate::lineup::Slot;

/// Errors raised by roster loading, candidate lookup and lineup assignment
#[derive(Debug, Error)]
pub enum LineupError {
    /// The candidate shares a player with another assigned slot
    #[error("{player} is already playing {held_by}, cannot assign to {slot}")]
    PlayerInUse {
        slot: Slot,
        player: String,
        held_by: Slot,
    },

    /// A pair was offered to a singles slot or a single to a doubles slot
    #[error("candidate does not fit slot {slot}")]
    SlotKindMismatch { slot: Slot },

    #[error("unknown slot: {0}")]
    UnknownSlot(String),

    /// The names do not form an eligible candidate for the slot
    #[error("{names:?} is not an eligible option for {slot}")]
    UnknownCandidate { slot: Slot, names: Vec<String> },

    #[error("malformed candidate: {0}")]
    MalformedCandidate(String),

    #[error("invalid rating: {0}")]
    InvalidRating(String),

    #[error("player {0} appears more than once in the roster")]
    DuplicatePlayer(String),

    #[error("no players found for team {0}")]
    UnknownTeam(String),

    #[error("lineup is incomplete: {missing} slot(s) still empty")]
    IncompleteLineup { missing: usize },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LineupError>;
