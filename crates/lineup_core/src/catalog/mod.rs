// crates/lineup_core/src/catalog/mod.rs
// Formation catalog: modality -> formations -> ordered slots with default coordinates,
// plus the short display label of every slot name and sector abbreviation.

pub mod embedded;
pub mod types;

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LineupError, Result};

pub use embedded::{catalog, FORMATIONS_YAML};
pub use types::{Coordinate, FormationId, Modality, Sector, SlotName, BENCH_POSITION};

/// One slot of a formation layout with its default coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotPosition {
    pub slot: SlotName,
    pub top: f64,
    pub left: f64,
}

impl SlotPosition {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.top, self.left)
    }
}

/// Immutable lookup tables. Build once, then share by reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormationCatalog {
    modalities: BTreeMap<Modality, Vec<FormationId>>,
    formations: HashMap<FormationId, Vec<SlotPosition>>,
    #[serde(default)]
    labels: HashMap<String, String>,
}

impl FormationCatalog {
    /// Parse and validate a catalog from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let catalog: FormationCatalog = serde_yaml::from_str(yaml)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Ordered formation ids offered for `modality`.
    pub fn formations_for(&self, modality: Modality) -> Result<&[FormationId]> {
        match self.modalities.get(&modality) {
            Some(list) if !list.is_empty() => Ok(list),
            _ => Err(LineupError::UnknownModality(modality.id().to_string())),
        }
    }

    /// Same as [`formations_for`](Self::formations_for) for a raw modality tag.
    pub fn formations_for_tag(&self, tag: &str) -> Result<&[FormationId]> {
        let modality: Modality = tag.parse()?;
        self.formations_for(modality)
    }

    /// Modality that lists `formation`, if any.
    pub fn modality_of(&self, formation: &str) -> Option<Modality> {
        self.modalities
            .iter()
            .find(|(_, list)| list.iter().any(|f| f.as_str() == formation))
            .map(|(modality, _)| *modality)
    }

    pub fn contains_formation(&self, formation: &str) -> bool {
        self.formations.contains_key(formation)
    }

    /// Slot layout of a formation; empty for formations not cataloged yet.
    pub fn layout(&self, formation: &str) -> &[SlotPosition] {
        self.formations.get(formation).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Ordered slot names of a formation; empty for unknown ids.
    pub fn slots_for(&self, formation: &str) -> Vec<&SlotName> {
        self.layout(formation).iter().map(|p| &p.slot).collect()
    }

    pub fn has_slot(&self, formation: &str, slot: &str) -> bool {
        self.layout(formation).iter().any(|p| p.slot.as_str() == slot)
    }

    /// Default coordinate of `slot` in `formation`; field center when not cataloged.
    pub fn default_coordinate(&self, formation: &str, slot: &str) -> Coordinate {
        match self.layout(formation).iter().find(|p| p.slot.as_str() == slot) {
            Some(position) => position.coordinate(),
            None => {
                debug!(formation, slot, "slot not cataloged, using field center");
                Coordinate::CENTER
            }
        }
    }

    /// Short display label; unmapped names fall back to their upper-cased form.
    pub fn label_for<'a>(&'a self, name: &str) -> Cow<'a, str> {
        match self.labels.get(name) {
            Some(label) => Cow::Borrowed(label.as_str()),
            None => Cow::Owned(name.to_uppercase()),
        }
    }

    pub fn modalities(&self) -> impl Iterator<Item = Modality> + '_ {
        self.modalities.keys().copied()
    }

    /// Structural checks applied to every catalog before use.
    pub fn validate(&self) -> Result<()> {
        for modality in Modality::ALL {
            let list = self.modalities.get(&modality).map(Vec::as_slice).unwrap_or(&[]);
            if list.is_empty() {
                return Err(LineupError::Catalog(format!(
                    "modality {} has no formations",
                    modality
                )));
            }
            for formation in list {
                if !self.formations.contains_key(formation.as_str()) {
                    return Err(LineupError::Catalog(format!(
                        "modality {} lists undefined formation {}",
                        modality, formation
                    )));
                }
            }
        }

        for (formation, layout) in &self.formations {
            let expected = FormationId::parse(formation.as_str())?
                .squad_size()
                .ok_or_else(|| LineupError::InvalidFormation(formation.to_string()))?;
            if layout.len() != expected {
                return Err(LineupError::Catalog(format!(
                    "formation {} has {} slots, expected {}",
                    formation,
                    layout.len(),
                    expected
                )));
            }

            let mut seen = HashSet::new();
            let mut goalkeepers = 0;
            for position in layout {
                SlotName::parse(position.slot.as_str())?;
                if !seen.insert(position.slot.as_str()) {
                    return Err(LineupError::Catalog(format!(
                        "formation {} repeats slot {}",
                        formation, position.slot
                    )));
                }
                let in_range = |v: f64| (0.0..=100.0).contains(&v);
                if !in_range(position.top) || !in_range(position.left) {
                    return Err(LineupError::Catalog(format!(
                        "formation {} slot {} coordinate out of range",
                        formation, position.slot
                    )));
                }
                if self.label_for(position.slot.as_str()) == Sector::Gol.as_str() {
                    goalkeepers += 1;
                }
            }
            if goalkeepers != 1 {
                return Err(LineupError::Catalog(format!(
                    "formation {} must have exactly one goalkeeper slot, found {}",
                    formation, goalkeepers
                )));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Shared-catalog accessors
// ============================================================================

pub fn formations_for(modality: Modality) -> Result<&'static [FormationId]> {
    catalog().formations_for(modality)
}

pub fn slots_for(formation: &str) -> Vec<&'static SlotName> {
    catalog().slots_for(formation)
}

pub fn default_coordinate(formation: &str, slot: &str) -> Coordinate {
    catalog().default_coordinate(formation, slot)
}

pub fn label_for(name: &str) -> Cow<'static, str> {
    catalog().label_for(name)
}
