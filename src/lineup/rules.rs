use super::types::{Candidate, Rating, Roster, Slot};

/// Accepted ratings for a singles slot
#[derive(Debug, PartialEq, Eq)]
pub struct SinglesRule {
    pub ratings: &'static [Rating],
}

/// Accepted combined ratings for a doubles slot, in half points
#[derive(Debug, PartialEq, Eq)]
pub struct PairRule {
    pub sums: &'static [u16],
}

pub const S1_RULE: SinglesRule = SinglesRule {
    ratings: &[Rating::from_halves(8), Rating::from_halves(9)],
};
pub const S2_RULE: SinglesRule = SinglesRule {
    ratings: &[Rating::from_halves(6), Rating::from_halves(7)],
};
pub const S3_RULE: SinglesRule = SinglesRule {
    ratings: &[Rating::from_halves(6)],
};

pub const TOP_PAIR: PairRule = PairRule { sums: &[16, 17] };
pub const MIDDLE_PAIR: PairRule = PairRule { sums: &[14, 15] };
pub const BOTTOM_PAIR: PairRule = PairRule { sums: &[12, 13] };

/// Each pair rule with every doubles slot that uses it.
/// D2/D3 and D4/D5 share one rule so they can never drift apart.
pub const PAIR_GROUPS: [(&PairRule, &[Slot]); 3] = [
    (&TOP_PAIR, &[Slot::D1]),
    (&MIDDLE_PAIR, &[Slot::D2, Slot::D3]),
    (&BOTTOM_PAIR, &[Slot::D4, Slot::D5]),
];

impl SinglesRule {
    pub fn accepts(&self, rating: Rating) -> bool {
        self.ratings.contains(&rating)
    }
}

impl PairRule {
    pub fn accepts(&self, first: Rating, second: Rating) -> bool {
        let sum = u16::from(first.halves()) + u16::from(second.halves());
        self.sums.contains(&sum)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Singles(&'static SinglesRule),
    Doubles(&'static PairRule),
}

impl Rule {
    pub fn for_slot(slot: Slot) -> Rule {
        match slot {
            Slot::S1 => Rule::Singles(&S1_RULE),
            Slot::S2 => Rule::Singles(&S2_RULE),
            Slot::S3 => Rule::Singles(&S3_RULE),
            Slot::D1 => Rule::Doubles(&TOP_PAIR),
            Slot::D2 | Slot::D3 => Rule::Doubles(&MIDDLE_PAIR),
            Slot::D4 | Slot::D5 => Rule::Doubles(&BOTTOM_PAIR),
        }
    }

    /// Checks a candidate against this rule using the roster's ratings.
    /// Players missing from the roster never satisfy a rule.
    pub fn accepts(&self, candidate: &Candidate, roster: &Roster) -> bool {
        match (self, candidate) {
            (Rule::Singles(rule), Candidate::Single(name)) => {
                roster.rating_of(name).is_some_and(|r| rule.accepts(r))
            }
            (Rule::Doubles(rule), Candidate::Pair(a, b)) => {
                match (roster.rating_of(a), roster.rating_of(b)) {
                    (Some(ra), Some(rb)) => a != b && rule.accepts(ra, rb),
                    _ => false,
                }
            }
            _ => false,
        }
    }
}
