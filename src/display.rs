use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::lineup::{Assignment, Candidate, CandidateSet, Slot};

/// Formats a candidate for display: "Amy" or "Amy / Beth"
pub fn format_candidate(candidate: &Candidate) -> String {
    match candidate {
        Candidate::Single(name) => name.clone(),
        Candidate::Pair(a, b) => format!("{} / {}", a, b),
    }
}

fn slot_text(assignment: &Assignment, slot: Slot) -> String {
    assignment
        .get(slot)
        .map(format_candidate)
        .unwrap_or_else(|| "Not selected".to_string())
}

/// Writes a lineup to a text file in the format: SLOT players
pub fn write_lineup_to_file<P: AsRef<Path>>(
    team: &str,
    assignment: &Assignment,
    filename: P,
) -> Result<()> {
    let mut file = File::create(filename)?;
    write_lineup(&mut file, team, assignment)
}

pub fn write_lineup<W: Write>(out: &mut W, team: &str, assignment: &Assignment) -> Result<()> {
    writeln!(out, "** Team: {} **", team)?;
    writeln!(out, "Generated {}", chrono::Local::now().format("%Y-%m-%d %H:%M"))?;

    for slot in Slot::ALL {
        writeln!(out, "{} {}", slot, slot_text(assignment, slot))?;
    }

    Ok(())
}

/// Prints every slot's eligible options
pub fn print_candidates(team: &str, candidates: &CandidateSet) {
    println!("\n=== Candidates for {} ===", team);
    for (slot, options) in candidates.iter() {
        println!("\n{}: {}", slot, slot.description());
        if options.is_empty() {
            println!("  (no eligible options)");
        }
        for option in options {
            println!("  - {}", format_candidate(option));
        }
    }
}

/// Prints the lineup table with completion status
pub fn print_lineup(team: &str, assignment: &Assignment) {
    println!("\n=== Lineup for {} ===", team);
    for slot in Slot::ALL {
        println!("  {:<3} {}", slot, slot_text(assignment, slot));
    }
    println!(
        "Progress: {}/{} rounds completed",
        assignment.assigned_count(),
        Slot::COUNT
    );
    if assignment.is_complete() {
        println!("Lineup Complete!");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_singles_and_pairs() {
        assert_eq!(format_candidate(&Candidate::single("Amy")), "Amy");
        assert_eq!(format_candidate(&Candidate::pair("Amy", "Beth")), "Amy / Beth");
    }

    #[test]
    fn writes_every_slot() {
        let mut assignment = Assignment::new();
        assignment.assign(Slot::S1, Candidate::single("Amy")).unwrap();
        assignment.assign(Slot::D1, Candidate::pair("Beth", "Cam")).unwrap();

        let mut out = Vec::new();
        write_lineup(&mut out, "Wicklund", &assignment).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "** Team: Wicklund **");
        assert!(lines[1].starts_with("Generated "));
        assert_eq!(lines.len(), 2 + Slot::COUNT);
        assert_eq!(lines[2], "S1 Amy");
        assert_eq!(lines[3], "S2 Not selected");
        assert_eq!(lines[5], "D1 Beth / Cam");
    }
}
