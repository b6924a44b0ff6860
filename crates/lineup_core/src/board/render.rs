// crates/lineup_core/src/board/render.rs
// Marker list for one lineup, in paint order (first = bottom)

use std::collections::HashSet;

use serde::Serialize;

use crate::assignment::AssignmentManager;
use crate::catalog::{Coordinate, SlotName};
use crate::codec::decode_with;
use crate::roster::PlayerId;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Marker {
    /// Placed player, at the custom coordinate when one is set.
    Player {
        player: PlayerId,
        slot: SlotName,
        label: String,
        coordinate: Coordinate,
        customized: bool,
    },
    /// Unoccupied slot at its default coordinate (edit mode only).
    Free { slot: SlotName, label: String, coordinate: Coordinate },
    /// Low-opacity default spot of an occupied slot under custom markers
    /// (edit mode only).
    Ghost { slot: SlotName, label: String, coordinate: Coordinate },
}

impl Marker {
    pub fn slot(&self) -> &SlotName {
        match self {
            Marker::Player { slot, .. } | Marker::Free { slot, .. } | Marker::Ghost { slot, .. } => {
                slot
            }
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Marker::Player { label, .. } | Marker::Free { label, .. } | Marker::Ghost { label, .. } => {
                label
            }
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        match self {
            Marker::Player { coordinate, .. }
            | Marker::Free { coordinate, .. }
            | Marker::Ghost { coordinate, .. } => *coordinate,
        }
    }

    /// CSS `top`/`left` pair, e.g. `("92%", "50%")`.
    pub fn css_position(&self) -> (String, String) {
        let at = self.coordinate();
        (at.css_top(), at.css_left())
    }

    pub fn is_ghost(&self) -> bool {
        matches!(self, Marker::Ghost { .. })
    }
}

/// Markers for the current lineup.
///
/// Read-only views show placed players only. When any placed player has a
/// custom coordinate, the default spots of occupied slots are hidden in
/// read-only mode and drawn as ghosts beneath the players in edit mode.
///
/// A player holding several slots is drawn at its custom coordinate once, in
/// the first of those slots; the others keep their default spot.
pub fn render(lineup: &AssignmentManager<'_>, editable: bool) -> Vec<Marker> {
    let catalog = lineup.catalog();
    let formation = lineup.formation().as_str();
    let show_ghosts = editable && lineup.has_custom_positions();

    let mut ghosts = Vec::new();
    let mut free = Vec::new();
    let mut players = Vec::new();
    let mut moved: HashSet<&PlayerId> = HashSet::new();

    for position in catalog.layout(formation) {
        let label = catalog.label_for(position.slot.as_str()).into_owned();
        let default = position.coordinate();

        let Some(player) = lineup.occupant(position.slot.as_str()) else {
            if editable {
                free.push(Marker::Free { slot: position.slot.clone(), label, coordinate: default });
            }
            continue;
        };

        if show_ghosts {
            ghosts.push(Marker::Ghost {
                slot: position.slot.clone(),
                label: label.clone(),
                coordinate: default,
            });
        }

        let marker = match lineup.custom_position(player) {
            Some(code) if code.is_custom() && moved.insert(player) => {
                let decoded = decode_with(catalog, &code.to_string(), formation);
                Marker::Player {
                    player: player.clone(),
                    slot: position.slot.clone(),
                    label: decoded.label,
                    coordinate: decoded.coordinate,
                    customized: true,
                }
            }
            _ => Marker::Player {
                player: player.clone(),
                slot: position.slot.clone(),
                label,
                coordinate: default,
                customized: false,
            },
        };
        players.push(marker);
    }

    ghosts.extend(free);
    ghosts.extend(players);
    ghosts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::PlacementSink;
    use crate::catalog::{catalog, Modality};
    use crate::codec::PositionCode;
    use crate::roster::fixtures::pid;

    fn lineup() -> AssignmentManager<'static> {
        let mut m = AssignmentManager::with_formation(catalog(), Modality::Futsal, "2-2").unwrap();
        m.assign(&SlotName::parse("goleiro").unwrap(), pid("p1"));
        m.assign(&SlotName::parse("atacante-direito").unwrap(), pid("p9"));
        m
    }

    fn kinds(markers: &[Marker]) -> Vec<&'static str> {
        markers
            .iter()
            .map(|m| match m {
                Marker::Player { .. } => "player",
                Marker::Free { .. } => "free",
                Marker::Ghost { .. } => "ghost",
            })
            .collect()
    }

    #[test]
    fn test_read_only_hides_free_slots() {
        let markers = render(&lineup(), false);
        assert_eq!(kinds(&markers), vec!["player", "player"]);
        assert_eq!(markers[0].css_position(), ("88%".to_string(), "50%".to_string()));
        assert_eq!(markers[0].label(), "GOL");
    }

    #[test]
    fn test_editable_shows_free_slots_beneath_players() {
        let markers = render(&lineup(), true);
        assert_eq!(kinds(&markers), vec!["free", "free", "free", "player", "player"]);
        assert_eq!(markers[0].slot().as_str(), "zagueiro-esquerdo");
    }

    #[test]
    fn test_custom_positions_and_ghosts() {
        let mut m = lineup();
        m.commit_position(&pid("p9"), PositionCode::parse("PTD|22|80").unwrap());

        let read_only = render(&m, false);
        assert_eq!(kinds(&read_only), vec!["player", "player"]);
        match &read_only[1] {
            Marker::Player { label, coordinate, customized, .. } => {
                assert_eq!(label, "PTD");
                assert_eq!(*coordinate, Coordinate::new(22.0, 80.0));
                assert!(*customized);
            }
            other => panic!("unexpected marker {:?}", other),
        }

        let editable = render(&m, true);
        assert_eq!(
            kinds(&editable),
            vec!["ghost", "ghost", "free", "free", "free", "player", "player"]
        );
        assert_eq!(editable[1].coordinate(), Coordinate::new(25.0, 65.0));
        assert!(editable.iter().filter(|m| m.is_ghost()).all(|m| m.label() != "PTD"));
    }

    #[test]
    fn test_override_of_unplaced_player_is_ignored() {
        let mut m = lineup();
        m.commit_position(&pid("p5"), PositionCode::parse("MEI|50|50").unwrap());
        let markers = render(&m, true);
        assert!(!markers.iter().any(Marker::is_ghost));
    }

    #[test]
    fn test_player_in_two_slots_is_drawn_once_at_custom_spot() {
        let mut m = lineup();
        m.assign(&SlotName::parse("atacante-esquerdo").unwrap(), pid("p9"));
        m.commit_position(&pid("p9"), PositionCode::parse("PTD|22|80").unwrap());

        let markers = render(&m, false);
        let customized: Vec<_> = markers
            .iter()
            .filter(|m| matches!(m, Marker::Player { customized: true, .. }))
            .collect();
        assert_eq!(customized.len(), 1);
        assert_eq!(customized[0].coordinate(), Coordinate::new(22.0, 80.0));
        assert_eq!(customized[0].slot().as_str(), "atacante-esquerdo");

        let at_custom = markers.iter().filter(|m| m.coordinate() == Coordinate::new(22.0, 80.0));
        assert_eq!(at_custom.count(), 1);
        assert_eq!(kinds(&markers), vec!["player", "player", "player"]);
    }
}
