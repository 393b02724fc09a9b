use std::collections::HashSet;

use log::{debug, trace};

use super::assignment::{Assignment, Lineup};
use super::candidates::CandidateSet;
use super::types::Slot;

/// Result cap used when the caller does not pick one
pub const DEFAULT_MAX_RESULTS: usize = 200;

/// True when a search stopped at its cap, so more lineups may exist.
/// A zero cap never searched and is not reported as capped.
pub fn is_capped(found: usize, max_results: usize) -> bool {
    max_results > 0 && found >= max_results
}

/// Enumerates complete lineups depth-first over the fixed slot order.
///
/// Candidates are tried in generation order, so results come out leftmost
/// first. At most `max_results` lineups are returned; getting exactly
/// `max_results` back means there may be more.
pub fn enumerate_lineups(candidates: &CandidateSet, max_results: usize) -> Vec<Lineup> {
    let mut search = Search {
        candidates,
        max_results,
        used: HashSet::new(),
        current: Assignment::new(),
        results: Vec::new(),
    };
    search.backtrack(0);

    debug!(
        "Found {} lineup(s){}",
        search.results.len(),
        if search.results.len() >= max_results { " (cap reached)" } else { "" }
    );
    search.results
}

struct Search<'a> {
    candidates: &'a CandidateSet,
    max_results: usize,
    used: HashSet<&'a str>,
    current: Assignment,
    results: Vec<Lineup>,
}

impl<'a> Search<'a> {
    fn backtrack(&mut self, idx: usize) {
        if self.results.len() >= self.max_results {
            return;
        }
        if idx == Slot::COUNT {
            self.results.push(Lineup(self.current.clone()));
            return;
        }

        let slot = Slot::ALL[idx];
        let candidates = self.candidates;
        for option in candidates.get(slot) {
            if option.players().any(|p| self.used.contains(p)) {
                continue;
            }
            trace!("{} <- {:?}", slot, option);

            self.used.extend(option.players());
            self.current.place(slot, option.clone());

            self.backtrack(idx + 1);

            self.current.unassign(slot);
            for player in option.players() {
                self.used.remove(player);
            }
        }
    }
}
