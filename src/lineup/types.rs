use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LineupError, Result};
use super::rules::Rule;

/// NTRP-style rating stored as a count of half points (3.5 => 7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "f64", try_from = "f64")]
pub struct Rating(u8);

impl Rating {
    pub const fn from_halves(halves: u8) -> Self {
        Rating(halves)
    }

    pub fn halves(self) -> u8 {
        self.0
    }

    pub fn value(self) -> f64 {
        f64::from(self.0) / 2.0
    }
}

impl TryFrom<f64> for Rating {
    type Error = LineupError;

    fn try_from(value: f64) -> Result<Self> {
        let doubled = value * 2.0;
        if !doubled.is_finite() || doubled < 0.0 || doubled > f64::from(u8::MAX) {
            return Err(LineupError::InvalidRating(value.to_string()));
        }
        // Only half-point steps are valid ratings
        if (doubled - doubled.round()).abs() > 1e-9 {
            return Err(LineupError::InvalidRating(value.to_string()));
        }
        Ok(Rating(doubled.round() as u8))
    }
}

impl From<Rating> for f64 {
    fn from(rating: Rating) -> f64 {
        rating.value()
    }
}

impl FromStr for Rating {
    type Err = LineupError;

    fn from_str(s: &str) -> Result<Self> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| LineupError::InvalidRating(s.trim().to_string()))?;
        Rating::try_from(value)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 2, (self.0 % 2) * 5)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub rating: Rating,
}

impl Player {
    pub fn new(name: impl Into<String>, rating: Rating) -> Self {
        Player {
            name: name.into(),
            rating,
        }
    }
}

/// Ordered players of a single team; names are unique
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    pub fn new(players: Vec<Player>) -> Result<Self> {
        let mut seen = HashSet::new();
        for player in &players {
            if !seen.insert(player.name.as_str()) {
                return Err(LineupError::DuplicatePlayer(player.name.clone()));
            }
        }
        Ok(Roster { players })
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn rating_of(&self, name: &str) -> Option<Rating> {
        self.players
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.rating)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Singles,
    Doubles,
}

/// One of the eight match positions, in lineup order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Slot {
    S1,
    S2,
    S3,
    D1,
    D2,
    D3,
    D4,
    D5,
}

impl Slot {
    pub const COUNT: usize = 8;

    pub const ALL: [Slot; Slot::COUNT] = [
        Slot::S1,
        Slot::S2,
        Slot::S3,
        Slot::D1,
        Slot::D2,
        Slot::D3,
        Slot::D4,
        Slot::D5,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Slot::S1 => "S1",
            Slot::S2 => "S2",
            Slot::S3 => "S3",
            Slot::D1 => "D1",
            Slot::D2 => "D2",
            Slot::D3 => "D3",
            Slot::D4 => "D4",
            Slot::D5 => "D5",
        }
    }

    pub fn kind(self) -> SlotKind {
        match self {
            Slot::S1 | Slot::S2 | Slot::S3 => SlotKind::Singles,
            _ => SlotKind::Doubles,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Slot::S1 => "Singles 1 (Rating = 4.0 or 4.5)",
            Slot::S2 => "Singles 2 (Rating = 3.0 or 3.5)",
            Slot::S3 => "Singles 3 (Rating = 3.0 only)",
            Slot::D1 => "Doubles 1 (Combined Rating = 8.0 or 8.5)",
            Slot::D2 => "Doubles 2 (Combined Rating = 7.0 or 7.5)",
            Slot::D3 => "Doubles 3 (Combined Rating = 7.0 or 7.5)",
            Slot::D4 => "Doubles 4 (Combined Rating = 6.0 or 6.5)",
            Slot::D5 => "Doubles 5 (Combined Rating = 6.0 or 6.5)",
        }
    }

    pub fn rule(self) -> Rule {
        Rule::for_slot(self)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Slot {
    type Err = LineupError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Slot::ALL
            .iter()
            .copied()
            .find(|slot| slot.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| LineupError::UnknownSlot(wanted.to_string()))
    }
}

/// A single player or an unordered pair of distinct players.
///
/// Pairs keep the order they were generated in for display, but compare and
/// hash as sets, so `(A, B) == (B, A)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "Vec<String>", try_from = "Vec<String>")]
pub enum Candidate {
    Single(String),
    Pair(String, String),
}

impl Candidate {
    pub fn single(name: impl Into<String>) -> Self {
        Candidate::Single(name.into())
    }

    pub fn pair(first: impl Into<String>, second: impl Into<String>) -> Self {
        Candidate::Pair(first.into(), second.into())
    }

    pub fn kind(&self) -> SlotKind {
        match self {
            Candidate::Single(_) => SlotKind::Singles,
            Candidate::Pair(..) => SlotKind::Doubles,
        }
    }

    pub fn players(&self) -> impl Iterator<Item = &str> + '_ {
        let (first, second) = match self {
            Candidate::Single(name) => (name.as_str(), None),
            Candidate::Pair(a, b) => (a.as_str(), Some(b.as_str())),
        };
        std::iter::once(first).chain(second)
    }

    pub fn names(&self) -> Vec<String> {
        self.players().map(str::to_string).collect()
    }

    pub fn shares_player_with(&self, other: &Candidate) -> bool {
        self.players().any(|p| other.players().any(|q| q == p))
    }

    fn canonical(&self) -> (&str, Option<&str>) {
        match self {
            Candidate::Single(name) => (name.as_str(), None),
            Candidate::Pair(a, b) if a <= b => (a.as_str(), Some(b.as_str())),
            Candidate::Pair(a, b) => (b.as_str(), Some(a.as_str())),
        }
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for Candidate {}

impl Hash for Candidate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl From<Candidate> for Vec<String> {
    fn from(candidate: Candidate) -> Self {
        match candidate {
            Candidate::Single(name) => vec![name],
            Candidate::Pair(a, b) => vec![a, b],
        }
    }
}

impl TryFrom<Vec<String>> for Candidate {
    type Error = LineupError;

    fn try_from(names: Vec<String>) -> Result<Self> {
        let mut names = names.into_iter();
        match (names.next(), names.next(), names.next()) {
            (Some(name), None, None) => Ok(Candidate::Single(name)),
            (Some(a), Some(b), None) if a != b => Ok(Candidate::Pair(a, b)),
            (Some(a), Some(_), None) => Err(LineupError::MalformedCandidate(format!(
                "{} cannot partner themselves",
                a
            ))),
            _ => Err(LineupError::MalformedCandidate(
                "expected one or two player names".to_string(),
            )),
        }
    }
}
