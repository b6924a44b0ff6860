// crates/lineup_core/src/board/mod.rs
// Placement board: drag lifecycle over the field surface.
//
// ```text
// Idle --press(editable, placed)--> Dragging(player) --release/teardown--> Idle
//                                     |  move: encode + commit, every sample
// ```
//
// Move listeners are attached exactly while dragging. Every move sample is
// committed to the sink as it arrives; nothing is buffered until release.

pub mod render;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::assignment::PlacementSink;
use crate::catalog::{Coordinate, SlotName};
use crate::codec::{encode_within, PositionCode};
use crate::config::BoardConfig;
use crate::roster::PlayerId;

pub use render::{render, Marker};

/// Field bounding box in client pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl FieldRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Pointer position as percentages of the box; `None` for an empty box.
    pub fn to_percent(&self, x: f64, y: f64) -> Option<Coordinate> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return None;
        }
        Some(Coordinate::new(
            (y - self.top) / self.height * 100.0,
            (x - self.left) / self.width * 100.0,
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DragState {
    Idle,
    Dragging { player: PlayerId },
}

/// Input accepted by the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoardEvent {
    /// Field box measured (mount or resize).
    Layout { field: FieldRect },
    Press { player: PlayerId },
    Move { x: f64, y: f64 },
    Release,
    /// Board unmounted mid-interaction.
    Teardown,
    ClickSlot { slot: SlotName },
    Remove { player: PlayerId },
}

/// Why an event was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoopReason {
    ReadOnly,
    AlreadyDragging,
    NotDragging,
    NotPlaced,
    SlotOccupied,
    NoFieldBounds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum BoardEffect {
    LayoutUpdated,
    DragStarted { player: PlayerId },
    PositionCommitted { player: PlayerId, code: PositionCode },
    DragEnded { player: PlayerId },
    /// Open the quick-select dialog for an empty slot. Never assigns.
    SlotSelectionRequested { slot: SlotName },
    PlayerRemoved { player: PlayerId },
    Noop { reason: NoopReason },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardTransition {
    pub from: DragState,
    pub to: DragState,
    pub effect: BoardEffect,
}

#[derive(Debug, Clone)]
pub struct PlacementBoard {
    config: BoardConfig,
    editable: bool,
    state: DragState,
    listening: bool,
    field: Option<FieldRect>,
}

impl PlacementBoard {
    /// An out-of-range margin is not rejected: inverted bounds are swapped
    /// and non-finite ones fall back to the default margin when encoding.
    pub fn new(config: BoardConfig, editable: bool) -> Self {
        if let Err(err) = config.validate() {
            warn!(error = %err, "board margin will be normalized");
        }
        Self { config, editable, state: DragState::Idle, listening: false, field: None }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Whether move/release listeners are currently attached.
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn field(&self) -> Option<FieldRect> {
        self.field
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Dispatch one event and report the transition.
    pub fn apply(&mut self, sink: &mut impl PlacementSink, event: &BoardEvent) -> BoardTransition {
        let from = self.state.clone();
        let effect = match event {
            BoardEvent::Layout { field } => self.layout(*field),
            BoardEvent::Press { player } => self.press(&*sink, player),
            BoardEvent::Move { x, y } => self.pointer_move(sink, *x, *y),
            BoardEvent::Release => self.release(),
            BoardEvent::Teardown => self.teardown(),
            BoardEvent::ClickSlot { slot } => self.click_slot(&*sink, slot),
            BoardEvent::Remove { player } => self.remove(sink, player),
        };
        BoardTransition { from, to: self.state.clone(), effect }
    }

    pub fn layout(&mut self, field: FieldRect) -> BoardEffect {
        self.field = Some(field);
        BoardEffect::LayoutUpdated
    }

    /// Press-down over a player marker.
    pub fn press(&mut self, sink: &impl PlacementSink, player: &PlayerId) -> BoardEffect {
        if !self.editable {
            return noop(NoopReason::ReadOnly);
        }
        if self.is_dragging() {
            return noop(NoopReason::AlreadyDragging);
        }
        if !sink.is_placed(player) {
            return noop(NoopReason::NotPlaced);
        }

        debug!(%player, "drag started");
        self.state = DragState::Dragging { player: player.clone() };
        self.listening = true;
        BoardEffect::DragStarted { player: player.clone() }
    }

    /// Pointer moved while the listeners are attached. The clamped, encoded
    /// position is committed to `sink` before returning.
    pub fn pointer_move(&mut self, sink: &mut impl PlacementSink, x: f64, y: f64) -> BoardEffect {
        let DragState::Dragging { player } = &self.state else {
            return noop(NoopReason::NotDragging);
        };
        let Some(at) = self.field.and_then(|field| field.to_percent(x, y)) else {
            return noop(NoopReason::NoFieldBounds);
        };

        let code = encode_within(self.config.margin(), at.top, at.left);
        trace!(%player, %code, "position committed");
        sink.commit_position(player, code.clone());
        BoardEffect::PositionCommitted { player: player.clone(), code }
    }

    pub fn release(&mut self) -> BoardEffect {
        self.end_drag()
    }

    /// Unmount. Listeners are detached whatever the state.
    pub fn teardown(&mut self) -> BoardEffect {
        self.end_drag()
    }

    fn end_drag(&mut self) -> BoardEffect {
        self.listening = false;
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Dragging { player } => {
                debug!(%player, "drag ended");
                BoardEffect::DragEnded { player }
            }
            DragState::Idle => noop(NoopReason::NotDragging),
        }
    }

    /// Click on a slot marker. Only empty slots in edit mode ask for a player.
    pub fn click_slot(&mut self, sink: &impl PlacementSink, slot: &SlotName) -> BoardEffect {
        if !self.editable {
            return noop(NoopReason::ReadOnly);
        }
        if sink.occupant(slot.as_str()).is_some() {
            return noop(NoopReason::SlotOccupied);
        }
        BoardEffect::SlotSelectionRequested { slot: slot.clone() }
    }

    /// Take a player off the field. The bench is not touched.
    pub fn remove(&mut self, sink: &mut impl PlacementSink, player: &PlayerId) -> BoardEffect {
        if !self.editable {
            return noop(NoopReason::ReadOnly);
        }
        if matches!(&self.state, DragState::Dragging { player: dragged } if dragged == player) {
            self.end_drag();
        }
        if sink.remove_player(player) {
            BoardEffect::PlayerRemoved { player: player.clone() }
        } else {
            noop(NoopReason::NotPlaced)
        }
    }
}

fn noop(reason: NoopReason) -> BoardEffect {
    BoardEffect::Noop { reason }
}
