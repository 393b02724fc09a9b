pub mod types;
pub mod rules;
pub mod candidates;
pub mod assignment;
pub mod solver;

pub use types::{Candidate, Player, Rating, Roster, Slot, SlotKind};
pub use candidates::{generate_candidates, CandidateSet};
pub use assignment::{Assignment, Lineup, Toggle};
pub use solver::{enumerate_lineups, is_capped, DEFAULT_MAX_RESULTS};
