// crates/lineup_core/src/assignment/mod.rs
// Slot <-> player <-> bench bookkeeping for one lineup editing session.
//
// The manager is exclusively owned by the session (`&mut` only). It never
// fails on lookups; the hard failures are an unknown modality and malformed
// identifiers.

pub mod auto_fill;
pub mod quick_select;

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::{catalog, FormationCatalog, FormationId, Modality, SlotName};
use crate::codec::PositionCode;
use crate::error::Result;
use crate::roster::PlayerId;

/// Lineup state as seen by the placement board.
pub trait PlacementSink {
    fn occupant(&self, slot: &str) -> Option<&PlayerId>;

    fn is_placed(&self, player: &PlayerId) -> bool;

    /// Store an encoded position for `player`. Called on every move sample.
    fn commit_position(&mut self, player: &PlayerId, code: PositionCode);

    /// Clear the field placement of `player`. Returns whether anything changed.
    fn remove_player(&mut self, player: &PlayerId) -> bool;
}

/// One filled slot in formation order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub slot: SlotName,
    pub player: PlayerId,
    /// Custom override when present, otherwise the bare slot name.
    pub code: PositionCode,
}

#[derive(Debug, Clone)]
pub struct AssignmentManager<'c> {
    catalog: &'c FormationCatalog,
    modality: Modality,
    formation: FormationId,
    slots: BTreeMap<SlotName, PlayerId>,
    custom_positions: BTreeMap<PlayerId, PositionCode>,
    bench: Vec<PlayerId>,
}

impl AssignmentManager<'static> {
    /// Empty lineup on the first formation of `modality`, shared catalog.
    pub fn new(modality: Modality) -> Result<Self> {
        Self::with_catalog(catalog(), modality)
    }
}

impl<'c> AssignmentManager<'c> {
    pub fn with_catalog(catalog: &'c FormationCatalog, modality: Modality) -> Result<Self> {
        let formation = catalog.formations_for(modality)?[0].clone();
        Ok(Self::empty(catalog, modality, formation))
    }

    /// Empty lineup on an explicit formation.
    pub fn with_formation(
        catalog: &'c FormationCatalog,
        modality: Modality,
        formation: &str,
    ) -> Result<Self> {
        catalog.formations_for(modality)?;
        let formation = FormationId::parse(formation)?;
        if !catalog.contains_formation(formation.as_str()) {
            debug!(%formation, "formation not cataloged, lineup has no slots");
        }
        Ok(Self::empty(catalog, modality, formation))
    }

    fn empty(catalog: &'c FormationCatalog, modality: Modality, formation: FormationId) -> Self {
        Self {
            catalog,
            modality,
            formation,
            slots: BTreeMap::new(),
            custom_positions: BTreeMap::new(),
            bench: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &'c FormationCatalog {
        self.catalog
    }

    pub fn modality(&self) -> Modality {
        self.modality
    }

    pub fn formation(&self) -> &FormationId {
        &self.formation
    }

    pub fn slots(&self) -> &BTreeMap<SlotName, PlayerId> {
        &self.slots
    }

    pub fn custom_positions(&self) -> &BTreeMap<PlayerId, PositionCode> {
        &self.custom_positions
    }

    pub fn bench(&self) -> &[PlayerId] {
        &self.bench
    }

    // ========================================================================
    // Field
    // ========================================================================

    /// Put `player` into `slot`, returning the previous occupant.
    ///
    /// Other slots holding the same player are left alone. The replaced
    /// occupant loses its custom coordinate unless it still holds a slot.
    /// A slot missing from the catalog layout is stored all the same; it is
    /// not drawn and `LineupRecord::validate` reports it.
    pub fn assign(&mut self, slot: &SlotName, player: PlayerId) -> Option<PlayerId> {
        if !self.catalog.has_slot(self.formation.as_str(), slot.as_str()) {
            warn!(%slot, formation = %self.formation, "slot not in formation layout");
        }
        if self.is_benched(&player) {
            warn!(%player, %slot, "player is also on the bench");
        }

        debug!(%slot, %player, "assign");
        let previous = self.slots.insert(slot.clone(), player.clone());
        if let Some(ref old) = previous {
            if *old != player {
                self.forget_custom_if_unplaced(old);
            }
        }
        previous
    }

    /// Empty `slot`. Returns the player that held it.
    pub fn unassign(&mut self, slot: &str) -> Option<PlayerId> {
        let removed = self.slots.remove(slot)?;
        debug!(slot, player = %removed, "unassign");
        self.forget_custom_if_unplaced(&removed);
        Some(removed)
    }

    fn forget_custom_if_unplaced(&mut self, player: &PlayerId) {
        if !self.is_placed(player) && self.custom_positions.remove(player).is_some() {
            debug!(%player, "dropped custom position of unplaced player");
        }
    }

    pub fn occupant(&self, slot: &str) -> Option<&PlayerId> {
        self.slots.get(slot)
    }

    pub fn is_placed(&self, player: &PlayerId) -> bool {
        self.slots.values().any(|p| p == player)
    }

    /// First slot in formation order held by `player`.
    pub fn placement_of(&self, player: &PlayerId) -> Option<&SlotName> {
        self.catalog
            .slots_for(self.formation.as_str())
            .into_iter()
            .find(|slot| self.slots.get(slot.as_str()) == Some(player))
    }

    pub fn custom_position(&self, player: &PlayerId) -> Option<&PositionCode> {
        self.custom_positions.get(player)
    }

    pub fn has_custom_positions(&self) -> bool {
        self.custom_positions.keys().any(|player| self.is_placed(player))
    }

    /// Filled slots in formation order.
    pub fn placements(&self) -> Vec<Placement> {
        self.catalog
            .slots_for(self.formation.as_str())
            .into_iter()
            .filter_map(|slot| {
                let player = self.slots.get(slot.as_str())?;
                let code = self
                    .custom_positions
                    .get(player)
                    .cloned()
                    .unwrap_or_else(|| PositionCode::Slot(slot.clone()));
                Some(Placement { slot: slot.clone(), player: player.clone(), code })
            })
            .collect()
    }

    pub fn filled_count(&self) -> usize {
        self.slots.len()
    }

    pub fn slot_count(&self) -> usize {
        self.catalog.layout(self.formation.as_str()).len()
    }

    pub fn free_slots(&self) -> Vec<&'c SlotName> {
        self.catalog
            .slots_for(self.formation.as_str())
            .into_iter()
            .filter(|slot| !self.slots.contains_key(slot.as_str()))
            .collect()
    }

    // ========================================================================
    // Bench
    // ========================================================================

    /// Append to the bench. Returns `false` when already benched.
    pub fn add_to_bench(&mut self, player: PlayerId) -> bool {
        if self.is_benched(&player) {
            return false;
        }
        if self.is_placed(&player) {
            warn!(%player, "benching a player who holds a slot");
        }
        debug!(%player, "add to bench");
        self.bench.push(player);
        true
    }

    pub fn remove_from_bench(&mut self, player: &PlayerId) -> bool {
        let before = self.bench.len();
        self.bench.retain(|p| p != player);
        before != self.bench.len()
    }

    pub fn is_benched(&self, player: &PlayerId) -> bool {
        self.bench.contains(player)
    }

    /// Players both on the field and on the bench, in bench order.
    pub fn overlaps(&self) -> Vec<&PlayerId> {
        self.bench.iter().filter(|p| self.is_placed(p)).collect()
    }

    // ========================================================================
    // Formation / modality
    // ========================================================================

    /// Switch formation. Clears every placement and custom coordinate; the
    /// bench survives untouched.
    pub fn set_formation(&mut self, formation: &str) -> Result<()> {
        let formation = FormationId::parse(formation)?;
        match self.catalog.modality_of(formation.as_str()) {
            Some(owner) if owner != self.modality => {
                warn!(%formation, modality = %self.modality, %owner, "formation belongs to another modality")
            }
            None => debug!(%formation, "formation not cataloged, lineup has no slots"),
            _ => {}
        }

        info!(
            from = %self.formation,
            to = %formation,
            cleared = self.slots.len(),
            "formation changed"
        );
        self.formation = formation;
        self.slots.clear();
        self.custom_positions.clear();
        Ok(())
    }

    /// Switch modality. Resets to the modality's first formation and clears
    /// placements and the bench.
    pub fn set_modality(&mut self, modality: Modality) -> Result<()> {
        let formation = self.catalog.formations_for(modality)?[0].clone();
        info!(from = %self.modality, to = %modality, %formation, "modality changed");
        self.modality = modality;
        self.formation = formation;
        self.slots.clear();
        self.custom_positions.clear();
        self.bench.clear();
        Ok(())
    }

    /// Forget every placement, override and bench entry.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.custom_positions.clear();
        self.bench.clear();
    }

    pub(crate) fn set_custom_position(&mut self, player: PlayerId, code: PositionCode) {
        self.custom_positions.insert(player, code);
    }
}

impl PlacementSink for AssignmentManager<'_> {
    fn occupant(&self, slot: &str) -> Option<&PlayerId> {
        AssignmentManager::occupant(self, slot)
    }

    fn is_placed(&self, player: &PlayerId) -> bool {
        AssignmentManager::is_placed(self, player)
    }

    fn commit_position(&mut self, player: &PlayerId, code: PositionCode) {
        self.custom_positions.insert(player.clone(), code);
    }

    fn remove_player(&mut self, player: &PlayerId) -> bool {
        let before = self.slots.len();
        self.slots.retain(|_, p| p != player);
        let removed_custom = self.custom_positions.remove(player).is_some();
        let changed = before != self.slots.len() || removed_custom;
        if changed {
            debug!(%player, "removed from field");
        }
        changed
    }
}
