use log::debug;

use crate::error::{LineupError, Result};
use super::assignment::Assignment;
use super::rules::{Rule, PAIR_GROUPS};
use super::types::{Candidate, Roster, Slot};

/// Eligible options per slot, in generation order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    slots: [Vec<Candidate>; Slot::COUNT],
}

/// Builds every slot's candidate list from a roster.
///
/// Singles keep roster order. Pairs are generated once each in combination
/// order (lower roster index first) and appended to every slot whose rule
/// they satisfy, so a pair can land in both D2 and D3.
pub fn generate_candidates(roster: &Roster) -> CandidateSet {
    let mut set = CandidateSet::default();
    let players = roster.players();

    for slot in Slot::ALL {
        if let Rule::Singles(rule) = slot.rule() {
            set.slots[slot.index()] = players
                .iter()
                .filter(|p| rule.accepts(p.rating))
                .map(|p| Candidate::single(p.name.clone()))
                .collect();
        }
    }

    for (i, first) in players.iter().enumerate() {
        for second in &players[i + 1..] {
            for (rule, slots) in PAIR_GROUPS.iter() {
                if !rule.accepts(first.rating, second.rating) {
                    continue;
                }
                for slot in slots.iter() {
                    set.slots[slot.index()]
                        .push(Candidate::pair(first.name.clone(), second.name.clone()));
                }
            }
        }
    }

    for (slot, options) in set.iter() {
        debug!("{}: {} candidate(s)", slot, options.len());
    }

    set
}

impl CandidateSet {
    pub fn get(&self, slot: Slot) -> &[Candidate] {
        &self.slots[slot.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Slot, &[Candidate])> + '_ {
        Slot::ALL.iter().map(move |&slot| (slot, self.get(slot)))
    }

    /// Slots nobody on the roster can fill
    pub fn empty_slots(&self) -> Vec<Slot> {
        Slot::ALL
            .iter()
            .copied()
            .filter(|&slot| self.get(slot).is_empty())
            .collect()
    }

    /// Maps player names back to the generated candidate for `slot`.
    ///
    /// Fails when the names are not an eligible option for the slot, which
    /// includes names that are not on the roster.
    pub fn resolve(&self, slot: Slot, names: &[String]) -> Result<Candidate> {
        let unknown = || LineupError::UnknownCandidate {
            slot,
            names: names.to_vec(),
        };
        let wanted = Candidate::try_from(names.to_vec()).map_err(|_| unknown())?;
        self.get(slot)
            .iter()
            .find(|c| **c == wanted)
            .cloned()
            .ok_or_else(unknown)
    }

    /// Options for `slot` that could be picked without clashing with the
    /// other slots of `assignment`
    pub fn available<'a>(&'a self, slot: Slot, assignment: &Assignment) -> Vec<&'a Candidate> {
        self.get(slot)
            .iter()
            .filter(|c| assignment.is_available_for(slot, c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lineup::types::{Player, Rating};

    fn roster(players: &[(&str, f64)]) -> Roster {
        Roster::new(
            players
                .iter()
                .map(|(name, rating)| Player::new(*name, Rating::try_from(*rating).unwrap()))
                .collect(),
        )
        .unwrap()
    }

    fn four_players() -> Roster {
        roster(&[("Amy", 4.0), ("Beth", 4.5), ("Cam", 3.5), ("Dee", 3.0)])
    }

    #[test]
    fn singles_follow_roster_order() {
        let set = generate_candidates(&four_players());
        assert_eq!(set.get(Slot::S1), &[Candidate::single("Amy"), Candidate::single("Beth")]);
        assert_eq!(set.get(Slot::S2), &[Candidate::single("Cam"), Candidate::single("Dee")]);
        assert_eq!(set.get(Slot::S3), &[Candidate::single("Dee")]);
    }

    #[test]
    fn pairs_land_in_every_matching_slot() {
        let set = generate_candidates(&four_players());

        // Amy+Beth = 8.5, Beth+Cam = 8.0
        assert_eq!(
            set.get(Slot::D1),
            &[Candidate::pair("Amy", "Beth"), Candidate::pair("Beth", "Cam")]
        );
        // Amy+Cam = 7.5, Amy+Dee = 7.0, Beth+Dee = 7.5
        let middle = vec![
            Candidate::pair("Amy", "Cam"),
            Candidate::pair("Amy", "Dee"),
            Candidate::pair("Beth", "Dee"),
        ];
        assert_eq!(set.get(Slot::D2), middle.as_slice());
        assert_eq!(set.get(Slot::D3), middle.as_slice());
        // Cam+Dee = 6.5
        assert_eq!(set.get(Slot::D4), &[Candidate::pair("Cam", "Dee")]);
        assert_eq!(set.get(Slot::D5), set.get(Slot::D4));
    }

    #[test]
    fn pairs_keep_combination_order() {
        let set = generate_candidates(&four_players());
        for (_, options) in set.iter() {
            for option in options {
                if let Candidate::Pair(a, b) = option {
                    let pos = |n: &str| four_players().players().iter().position(|p| p.name == n);
                    assert!(pos(a.as_str()) < pos(b.as_str()));
                }
            }
        }
    }

    #[test]
    fn empty_roster_yields_empty_lists() {
        let set = generate_candidates(&Roster::default());
        for (_, options) in set.iter() {
            assert!(options.is_empty());
        }
        assert_eq!(set.empty_slots(), Slot::ALL.to_vec());
    }

    #[test]
    fn unmatched_ratings_contribute_nothing() {
        let set = generate_candidates(&roster(&[("Max", 5.0), ("Top", 5.0)]));
        assert_eq!(set.empty_slots(), Slot::ALL.to_vec());
    }

    #[test]
    fn pair_lands_only_where_its_sum_fits() {
        // 5.0 + 2.0 = 7.0 is a D2/D3 pair even though neither single qualifies
        let set = generate_candidates(&roster(&[("Max", 5.0), ("Low", 2.0)]));
        assert_eq!(
            set.empty_slots(),
            vec![Slot::S1, Slot::S2, Slot::S3, Slot::D1, Slot::D4, Slot::D5]
        );
        assert_eq!(set.get(Slot::D2), &[Candidate::pair("Max", "Low")]);
        assert_eq!(set.get(Slot::D3), &[Candidate::pair("Max", "Low")]);
    }

    #[test]
    fn no_false_positives_or_negatives() {
        let roster = roster(&[
            ("A", 2.5),
            ("B", 3.0),
            ("C", 3.0),
            ("D", 3.5),
            ("E", 4.0),
            ("F", 4.5),
            ("G", 5.0),
            ("H", 3.5),
        ]);
        let set = generate_candidates(&roster);
        let players = roster.players();

        for slot in Slot::ALL {
            let rule = slot.rule();
            let options = set.get(slot);
            for option in options {
                assert!(rule.accepts(option, &roster), "{} wrongly offered {:?}", slot, option);
            }

            let mut expected = 0;
            for (i, p) in players.iter().enumerate() {
                let single = Candidate::single(p.name.clone());
                if rule.accepts(&single, &roster) {
                    expected += 1;
                    assert_eq!(options.iter().filter(|c| **c == single).count(), 1);
                }
                for q in &players[i + 1..] {
                    let pair = Candidate::pair(p.name.clone(), q.name.clone());
                    if rule.accepts(&pair, &roster) {
                        expected += 1;
                        assert_eq!(options.iter().filter(|c| **c == pair).count(), 1);
                    }
                }
            }
            assert_eq!(options.len(), expected, "{} list size", slot);
        }

        assert_eq!(set.get(Slot::D2), set.get(Slot::D3));
        assert_eq!(set.get(Slot::D4), set.get(Slot::D5));
    }

    #[test]
    fn resolve_finds_generated_candidates() {
        let set = generate_candidates(&four_players());

        let pair = set
            .resolve(Slot::D1, &["Cam".to_string(), "Beth".to_string()])
            .unwrap();
        // the generated orientation comes back
        assert_eq!(pair.names(), vec!["Beth", "Cam"]);

        let err = set.resolve(Slot::S3, &["Amy".to_string()]).unwrap_err();
        assert!(matches!(err, LineupError::UnknownCandidate { slot: Slot::S3, .. }));

        let err = set.resolve(Slot::S1, &["Nobody".to_string()]).unwrap_err();
        assert!(matches!(err, LineupError::UnknownCandidate { .. }));

        assert!(set.resolve(Slot::D1, &[]).is_err());
    }

    #[test]
    fn available_skips_players_used_elsewhere() {
        let set = generate_candidates(&four_players());
        let mut assignment = Assignment::default();
        assignment.assign(Slot::S1, Candidate::single("Amy")).unwrap();

        let d1 = set.available(Slot::D1, &assignment);
        assert_eq!(d1, vec![&Candidate::pair("Beth", "Cam")]);

        // the slot's own occupant stays offered
        let s1 = set.available(Slot::S1, &assignment);
        assert_eq!(s1.len(), 2);
    }
}
