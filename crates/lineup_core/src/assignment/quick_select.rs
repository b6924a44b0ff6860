// crates/lineup_core/src/assignment/quick_select.rs
// Candidate lists for the "pick a player for this slot" and "add to bench" dialogs

use crate::roster::{sort_by_number, Player, PositionCategory};

use super::AssignmentManager;

impl<'c> AssignmentManager<'c> {
    /// Players offered for `slot`, sorted by jersey number (unnumbered last).
    ///
    /// Players already placed in a different slot are excluded. The current
    /// occupant of `slot` is always offered so the dialog can show it as
    /// selected. `category` narrows the list to one registered position.
    pub fn quick_select_candidates<'r>(
        &self,
        roster: &'r [Player],
        slot: &str,
        category: Option<PositionCategory>,
    ) -> Vec<&'r Player> {
        let occupant = self.occupant(slot);
        let mut candidates: Vec<&Player> = roster
            .iter()
            .filter(|player| {
                let placed_elsewhere = self
                    .slots()
                    .iter()
                    .any(|(held, id)| *id == player.id && held.as_str() != slot);
                !placed_elsewhere || occupant == Some(&player.id)
            })
            .filter(|player| match category {
                Some(category) => player.category == Some(category),
                None => true,
            })
            .collect();
        sort_by_number(&mut candidates);
        candidates
    }

    /// Players neither on the field nor already on the bench.
    pub fn bench_candidates<'r>(&self, roster: &'r [Player]) -> Vec<&'r Player> {
        let mut candidates: Vec<&Player> = roster
            .iter()
            .filter(|player| !self.is_placed(&player.id) && !self.is_benched(&player.id))
            .collect();
        sort_by_number(&mut candidates);
        candidates
    }
}
