// crates/lineup_core/src/assignment/auto_fill.rs
// Automatic placement of roster players into free slots by registered position

use pathfinding::kuhn_munkres::kuhn_munkres_min;
use pathfinding::matrix::Matrix;
use tracing::{debug, info};

use crate::catalog::{Sector, SlotName};
use crate::roster::Player;

use super::AssignmentManager;

/// Same category as the slot label.
const COST_MATCH: i64 = 0;
/// Outfield player on an outfield slot of another category.
const COST_OTHER: i64 = 10;
/// Goalkeeper slot for a non-goalkeeper, or the reverse.
const COST_INCOMPATIBLE: i64 = 1_000_000;

impl<'c> AssignmentManager<'c> {
    /// Place one player into the best free slot.
    ///
    /// Labels are tried in the player's preference order, slots in formation
    /// order; without a fitting slot the first free one is used. Returns the
    /// chosen slot, or `None` when the player is already placed or the
    /// formation is full.
    pub fn auto_place(&mut self, player: &Player) -> Option<SlotName> {
        if self.is_placed(&player.id) {
            return None;
        }
        let free = self.free_slots();
        let Some(first_free) = free.first() else {
            debug!(player = %player.id, "no free slot");
            return None;
        };

        let catalog = self.catalog();
        let preferred = player.category.and_then(|category| {
            category.preferred_labels().iter().find_map(|label| {
                free.iter().find(|slot| catalog.label_for(slot.as_str()) == *label)
            })
        });
        let slot = (*preferred.unwrap_or(first_free)).clone();

        self.assign(&slot, player.id.clone());
        Some(slot)
    }

    /// Fill every free slot from players neither placed nor benched with a
    /// minimum-cost assignment. Goalkeepers only go in goal and the goal only
    /// takes goalkeepers; such a slot stays empty when nobody fits. Ties go to
    /// earlier roster entries and earlier slots.
    ///
    /// Returns the new `(slot, player)` pairs in formation order.
    pub fn auto_fill(&mut self, roster: &[Player]) -> Vec<(SlotName, Player)> {
        let free: Vec<SlotName> = self.free_slots().into_iter().cloned().collect();
        let candidates: Vec<&Player> = roster
            .iter()
            .filter(|p| !self.is_placed(&p.id) && !self.is_benched(&p.id))
            .collect();
        if free.is_empty() || candidates.is_empty() {
            return Vec::new();
        }

        let catalog = self.catalog();
        let goal_slot: Vec<bool> = free
            .iter()
            .map(|slot| catalog.label_for(slot.as_str()) == Sector::Gol.as_str())
            .collect();
        let base_cost = |player: &Player, slot_idx: usize| -> i64 {
            let keeper = player.category.map(|c| c.is_goalkeeper()).unwrap_or(false);
            if goal_slot[slot_idx] != keeper {
                return COST_INCOMPATIBLE;
            }
            if keeper {
                return COST_MATCH;
            }
            let label = catalog.label_for(free[slot_idx].as_str());
            match player.category {
                Some(category) if category.fits_label(&label) => COST_MATCH,
                _ => COST_OTHER,
            }
        };

        // kuhn_munkres needs rows <= columns, so the smaller side goes on rows.
        // Index terms break ties and stay below one step of the base cost.
        let players_on_rows = candidates.len() <= free.len();
        let (rows, columns) = if players_on_rows {
            (candidates.len(), free.len())
        } else {
            (free.len(), candidates.len())
        };
        let scale = (rows * (rows + columns) + 1) as i64;
        let costs = Matrix::from_fn(rows, columns, |(row, column)| {
            let (player_idx, slot_idx) = if players_on_rows { (row, column) } else { (column, row) };
            base_cost(candidates[player_idx], slot_idx) * scale + (player_idx + slot_idx) as i64
        });
        let (_, assignments) = kuhn_munkres_min(&costs);

        let mut chosen: Vec<(usize, usize)> = assignments
            .iter()
            .enumerate()
            .map(|(row, &column)| if players_on_rows { (row, column) } else { (column, row) })
            .filter(|&(player_idx, slot_idx)| {
                base_cost(candidates[player_idx], slot_idx) < COST_INCOMPATIBLE
            })
            .collect();
        chosen.sort_by_key(|&(_, slot_idx)| slot_idx);

        let placed: Vec<(SlotName, Player)> = chosen
            .into_iter()
            .map(|(player_idx, slot_idx)| (free[slot_idx].clone(), candidates[player_idx].clone()))
            .collect();
        for (slot, player) in &placed {
            self.assign(slot, player.id.clone());
        }

        info!(
            formation = %self.formation(),
            placed = placed.len(),
            free = free.len() - placed.len(),
            "auto fill"
        );
        placed
    }
}
