use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{LineupError, Result};
use super::candidates::CandidateSet;
use super::types::{Candidate, Slot};

/// Partial slot -> candidate mapping where no player appears in two slots.
///
/// Every mutation either keeps that invariant or is rejected without
/// touching the assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assignment {
    slots: BTreeMap<Slot, Candidate>,
}

/// What `Assignment::toggle` ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Toggle {
    Selected,
    Cleared,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: Slot) -> Option<&Candidate> {
        self.slots.get(&slot)
    }

    /// Assigned slots in lineup order
    pub fn iter(&self) -> impl Iterator<Item = (Slot, &Candidate)> + '_ {
        self.slots.iter().map(|(slot, c)| (*slot, c))
    }

    pub fn used_players(&self) -> HashSet<&str> {
        self.slots.values().flat_map(|c| c.players()).collect()
    }

    pub fn is_available(&self, candidate: &Candidate) -> bool {
        let used = self.used_players();
        !candidate.players().any(|p| used.contains(p))
    }

    /// Like `is_available`, but ignores whoever currently holds `slot`
    pub fn is_available_for(&self, slot: Slot, candidate: &Candidate) -> bool {
        self.conflict(slot, candidate).is_none()
    }

    fn conflict(&self, slot: Slot, candidate: &Candidate) -> Option<(String, Slot)> {
        self.slots
            .iter()
            .filter(|(held, _)| **held != slot)
            .find_map(|(held, occupant)| {
                candidate
                    .players()
                    .find(|p| occupant.players().any(|q| q == *p))
                    .map(|p| (p.to_string(), *held))
            })
    }

    pub fn assign(&mut self, slot: Slot, candidate: Candidate) -> Result<()> {
        if candidate.kind() != slot.kind() {
            return Err(LineupError::SlotKindMismatch { slot });
        }
        if let Some((player, held_by)) = self.conflict(slot, &candidate) {
            return Err(LineupError::PlayerInUse {
                slot,
                player,
                held_by,
            });
        }
        self.slots.insert(slot, candidate);
        Ok(())
    }

    /// Clears `slot`, returning what was there. Clearing an empty slot is a no-op.
    pub fn unassign(&mut self, slot: Slot) -> Option<Candidate> {
        self.slots.remove(&slot)
    }

    pub fn reset(&mut self) {
        self.slots.clear();
    }

    /// Re-picking the candidate already in `slot` clears it; anything else is an `assign`.
    pub fn toggle(&mut self, slot: Slot, candidate: Candidate) -> Result<Toggle> {
        if self.get(slot) == Some(&candidate) {
            self.unassign(slot);
            return Ok(Toggle::Cleared);
        }
        self.assign(slot, candidate)?;
        Ok(Toggle::Selected)
    }

    pub fn assigned_count(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.slots.len() == Slot::COUNT
    }

    pub fn progress(&self) -> f64 {
        self.slots.len() as f64 / Slot::COUNT as f64
    }

    pub(crate) fn place(&mut self, slot: Slot, candidate: Candidate) {
        self.slots.insert(slot, candidate);
    }
}

/// A complete assignment whose every slot holds one of its eligible candidates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Lineup(pub(super) Assignment);

impl Lineup {
    /// Promotes a complete assignment to a lineup, checking every slot
    /// against the team's generated candidates.
    ///
    /// Catches occupants that break their slot's rule or name players who
    /// are not on the roster, which `assign` alone cannot see.
    pub fn validate(assignment: Assignment, candidates: &CandidateSet) -> Result<Self> {
        if !assignment.is_complete() {
            return Err(LineupError::IncompleteLineup {
                missing: Slot::COUNT - assignment.assigned_count(),
            });
        }
        for (slot, occupant) in assignment.iter() {
            if !candidates.get(slot).contains(occupant) {
                return Err(LineupError::UnknownCandidate {
                    slot,
                    names: occupant.names(),
                });
            }
        }
        Ok(Lineup(assignment))
    }

    pub fn get(&self, slot: Slot) -> Option<&Candidate> {
        self.0.get(slot)
    }

    pub fn assignment(&self) -> &Assignment {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lineup::types::SlotKind;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn assert_disjoint(assignment: &Assignment) {
        let mut seen = HashSet::new();
        for (_, candidate) in assignment.iter() {
            for player in candidate.players() {
                assert!(seen.insert(player.to_string()), "{} used twice", player);
            }
        }
    }

    #[test]
    fn used_player_in_another_slot_is_rejected() {
        let mut assignment = Assignment::new();
        assignment.assign(Slot::S1, Candidate::single("Amy")).unwrap();

        let before = assignment.clone();
        let err = assignment
            .assign(Slot::D1, Candidate::pair("Amy", "Beth"))
            .unwrap_err();
        match err {
            LineupError::PlayerInUse { slot, player, held_by } => {
                assert_eq!(slot, Slot::D1);
                assert_eq!(player, "Amy");
                assert_eq!(held_by, Slot::S1);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(assignment, before);

        assignment.assign(Slot::D1, Candidate::pair("Beth", "Cam")).unwrap();
        assert_eq!(assignment.used_players().len(), 3);
    }

    #[test]
    fn availability_is_negated_intersection() {
        let mut assignment = Assignment::new();
        assignment.assign(Slot::D2, Candidate::pair("Amy", "Cam")).unwrap();

        assert!(!assignment.is_available(&Candidate::single("Cam")));
        assert!(!assignment.is_available(&Candidate::pair("Dee", "Amy")));
        assert!(assignment.is_available(&Candidate::pair("Dee", "Beth")));
        assert!(assignment.used_players().contains("Amy"));
    }

    #[test]
    fn assign_then_unassign_restores_state() {
        let mut assignment = Assignment::new();
        assignment.assign(Slot::S2, Candidate::single("Cam")).unwrap();
        let before = assignment.clone();

        assignment.assign(Slot::D4, Candidate::pair("Dee", "Eve")).unwrap();
        assert_eq!(assignment.unassign(Slot::D4), Some(Candidate::pair("Dee", "Eve")));
        assert_eq!(assignment, before);

        // clearing an empty slot changes nothing
        assert_eq!(assignment.unassign(Slot::D4), None);
        assert_eq!(assignment, before);
    }

    #[test]
    fn slot_can_be_reassigned_to_a_pair_sharing_its_own_player() {
        let mut assignment = Assignment::new();
        assignment.assign(Slot::D1, Candidate::pair("Amy", "Beth")).unwrap();
        assignment.assign(Slot::S2, Candidate::single("Dee")).unwrap();

        assert!(!assignment.is_available(&Candidate::pair("Beth", "Cam")));
        assert!(assignment.is_available_for(Slot::D1, &Candidate::pair("Beth", "Cam")));

        assignment.assign(Slot::D1, Candidate::pair("Beth", "Cam")).unwrap();
        assert_eq!(assignment.get(Slot::D1), Some(&Candidate::pair("Beth", "Cam")));
        assert!(!assignment.used_players().contains("Amy"));

        // but not to one sharing a player held by another slot
        assert!(assignment.assign(Slot::D1, Candidate::pair("Beth", "Dee")).is_err());
    }

    #[test]
    fn candidate_kind_must_fit_the_slot() {
        let mut assignment = Assignment::new();
        assert!(matches!(
            assignment.assign(Slot::S1, Candidate::pair("Amy", "Beth")),
            Err(LineupError::SlotKindMismatch { slot: Slot::S1 })
        ));
        assert!(matches!(
            assignment.assign(Slot::D5, Candidate::single("Amy")),
            Err(LineupError::SlotKindMismatch { slot: Slot::D5 })
        ));
        assert!(assignment.is_empty());
    }

    #[test]
    fn toggle_selects_then_clears() {
        let mut assignment = Assignment::new();
        let pair = Candidate::pair("Amy", "Beth");

        assert_eq!(assignment.toggle(Slot::D1, pair.clone()).unwrap(), Toggle::Selected);
        assert_eq!(
            assignment.toggle(Slot::D1, Candidate::pair("Beth", "Amy")).unwrap(),
            Toggle::Cleared
        );
        assert!(assignment.get(Slot::D1).is_none());

        assignment.toggle(Slot::D1, pair).unwrap();
        assert_eq!(
            assignment.toggle(Slot::D1, Candidate::pair("Amy", "Cam")).unwrap(),
            Toggle::Selected
        );
        assert_eq!(assignment.get(Slot::D1), Some(&Candidate::pair("Amy", "Cam")));
    }

    #[test]
    fn progress_and_completion() {
        let mut assignment = Assignment::new();
        assert_eq!(assignment.progress(), 0.0);

        let names = ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M"];
        let mut next = names.iter();
        for slot in Slot::ALL {
            let candidate = match slot.kind() {
                SlotKind::Singles => Candidate::single(*next.next().unwrap()),
                SlotKind::Doubles => Candidate::pair(*next.next().unwrap(), *next.next().unwrap()),
            };
            assignment.assign(slot, candidate).unwrap();
        }
        assert!(assignment.is_complete());
        assert_eq!(assignment.progress(), 1.0);

        assignment.unassign(Slot::S3);
        assert_eq!(assignment.assigned_count(), 7);

        assignment.reset();
        assert!(assignment.is_empty());
    }

    #[test]
    fn invariant_survives_random_operations() {
        let players = ["A", "B", "C", "D", "E", "F"];
        let mut rng = StdRng::seed_from_u64(7);
        let mut assignment = Assignment::new();

        for _ in 0..2000 {
            let slot = Slot::ALL[rng.gen_range(0..Slot::COUNT)];
            match rng.gen_range(0..10) {
                0 => assignment.reset(),
                1..=3 => {
                    assignment.unassign(slot);
                }
                _ => {
                    let first = players[rng.gen_range(0..players.len())];
                    let candidate = if rng.gen_bool(0.5) {
                        Candidate::single(first)
                    } else {
                        let second = players[rng.gen_range(0..players.len())];
                        if second == first {
                            continue;
                        }
                        Candidate::pair(first, second)
                    };
                    let before = assignment.clone();
                    let allowed = candidate.kind() == slot.kind()
                        && assignment.is_available_for(slot, &candidate);
                    match assignment.assign(slot, candidate) {
                        Ok(()) => assert!(allowed),
                        Err(_) => {
                            assert!(!allowed);
                            assert_eq!(assignment, before);
                        }
                    }
                }
            }
            assert_disjoint(&assignment);
        }
    }

    #[test]
    fn serializes_as_slot_map() {
        let mut assignment = Assignment::new();
        assignment.assign(Slot::S1, Candidate::single("Amy")).unwrap();
        assignment.assign(Slot::D2, Candidate::pair("Cam", "Dee")).unwrap();

        let json = serde_json::to_string(&assignment).unwrap();
        assert_eq!(json, r#"{"S1":["Amy"],"D2":["Cam","Dee"]}"#);

        let back: Assignment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, assignment);
    }
}
