// crates/lineup_core/src/wire.rs
// Persisted lineup shapes: the JSON record handed to the store and the
// per-player rows of the lineup table.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::assignment::{AssignmentManager, PlacementSink};
use crate::catalog::{FormationCatalog, FormationId, Modality, SlotName, BENCH_POSITION};
use crate::codec::PositionCode;
use crate::error::Result;
use crate::roster::PlayerId;

/// Finished lineup as handed to persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LineupRecord {
    pub formation: FormationId,
    pub modality: Modality,
    /// Filled slots only. Empty-string entries from older records are dropped on read.
    #[serde(default, deserialize_with = "filled_slots")]
    #[schemars(with = "BTreeMap<String, String>")]
    pub slots: BTreeMap<SlotName, PlayerId>,
    #[serde(default)]
    pub bench: Vec<PlayerId>,
    /// Player id -> `"LABEL|top|left"`.
    #[serde(default)]
    pub custom_positions: BTreeMap<PlayerId, PositionCode>,
}

fn filled_slots<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<SlotName, PlayerId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
    raw.into_iter()
        .filter(|(_, player)| !player.is_empty())
        .map(|(slot, player)| {
            let slot = SlotName::parse(&slot).map_err(serde::de::Error::custom)?;
            let player = PlayerId::parse(&player).map_err(serde::de::Error::custom)?;
            Ok((slot, player))
        })
        .collect()
}

impl LineupRecord {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Consistency problems a strict reader would reject. Loading through
    /// [`AssignmentManager::from_record`] tolerates all of them.
    pub fn validate(&self, catalog: &FormationCatalog) -> Vec<String> {
        let mut issues = Vec::new();
        match catalog.formations_for(self.modality) {
            Ok(offered) if !offered.contains(&self.formation) => issues.push(format!(
                "formation {} is not offered for {}",
                self.formation, self.modality
            )),
            Err(err) => issues.push(err.to_string()),
            _ => {}
        }
        for slot in self.slots.keys() {
            if !catalog.has_slot(self.formation.as_str(), slot.as_str()) {
                issues.push(format!("slot {} is not part of {}", slot, self.formation));
            }
        }
        for (player, code) in &self.custom_positions {
            if !code.is_custom() {
                issues.push(format!("custom position of {} is a bare slot name", player));
            }
            if !self.slots.values().any(|p| p == player) {
                issues.push(format!("custom position of {} who is not placed", player));
            }
        }
        for player in &self.bench {
            if self.slots.values().any(|p| p == player) {
                issues.push(format!("{} is both placed and benched", player));
            }
        }
        issues
    }

    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(LineupRecord)
    }
}

/// One row of the lineup table. Field rows come first in formation order,
/// then bench rows with `field_position = "banco"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LineupRow {
    pub player_id: PlayerId,
    /// Slot name, custom code, or `"banco"`.
    pub field_position: String,
    pub order: u32,
}

impl<'c> AssignmentManager<'c> {
    /// Seed a session from a stored record. Every stored slot is kept, even one
    /// the formation layout lacks; overrides of unplaced players are skipped
    /// with a warning.
    pub fn from_record(catalog: &'c FormationCatalog, record: &LineupRecord) -> Result<Self> {
        let mut manager =
            AssignmentManager::with_formation(catalog, record.modality, record.formation.as_str())?;

        for (slot, player) in &record.slots {
            manager.assign(slot, player.clone());
        }
        for player in &record.bench {
            manager.add_to_bench(player.clone());
        }
        for (player, code) in &record.custom_positions {
            if code.is_custom() && manager.is_placed(player) {
                manager.commit_position(player, code.clone());
            } else {
                warn!(%player, %code, "skipping stored custom position");
            }
        }
        Ok(manager)
    }

    /// Snapshot for persistence. Only overrides of placed players are kept.
    pub fn to_record(&self) -> LineupRecord {
        LineupRecord {
            formation: self.formation().clone(),
            modality: self.modality(),
            slots: self.slots().clone(),
            bench: self.bench().to_vec(),
            custom_positions: self
                .custom_positions()
                .iter()
                .filter(|(player, code)| code.is_custom() && self.is_placed(player))
                .map(|(player, code)| (player.clone(), code.clone()))
                .collect(),
        }
    }

    pub fn to_rows(&self) -> Vec<LineupRow> {
        let field = self
            .placements()
            .into_iter()
            .map(|placement| (placement.player, placement.code.to_string()));
        let bench = self
            .bench()
            .iter()
            .map(|player| (player.clone(), BENCH_POSITION.to_string()));
        field
            .chain(bench)
            .enumerate()
            .map(|(order, (player_id, field_position))| LineupRow {
                player_id,
                field_position,
                order: order as u32,
            })
            .collect()
    }

    /// Rebuild a session from stored rows.
    ///
    /// Slot-name rows go straight to their slot. Custom-code rows take the
    /// first free slot and keep their coordinate. `banco` rows fill the bench
    /// by `order`. Unknown or duplicate positions are skipped.
    pub fn from_rows(
        catalog: &'c FormationCatalog,
        modality: Modality,
        formation: &str,
        rows: &[LineupRow],
    ) -> Result<Self> {
        let mut manager = AssignmentManager::with_formation(catalog, modality, formation)?;
        let mut rows: Vec<&LineupRow> = rows.iter().collect();
        rows.sort_by_key(|row| row.order);

        let mut custom_rows = Vec::new();
        for row in &rows {
            if row.field_position == BENCH_POSITION {
                manager.add_to_bench(row.player_id.clone());
                continue;
            }
            match PositionCode::parse(&row.field_position) {
                Ok(PositionCode::Slot(slot)) if manager.occupant(slot.as_str()).is_none() => {
                    manager.assign(&slot, row.player_id.clone());
                }
                Ok(code @ PositionCode::Custom(_)) => {
                    custom_rows.push((row.player_id.clone(), code))
                }
                Ok(PositionCode::Slot(slot)) => {
                    warn!(player = %row.player_id, %slot, "slot already filled, skipping row")
                }
                Err(err) => warn!(player = %row.player_id, error = %err, "unreadable row"),
            }
        }

        // Custom rows carry no slot name; give them whatever is left.
        for (player, code) in custom_rows {
            let Some(slot) = manager.free_slots().first().map(|s| (*s).clone()) else {
                warn!(%player, "no free slot for custom row");
                continue;
            };
            debug!(%player, %slot, %code, "custom row placed in free slot");
            manager.assign(&slot, player.clone());
            manager.commit_position(&player, code);
        }

        Ok(manager)
    }
}
