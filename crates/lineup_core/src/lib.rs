//! # lineup_core - Tactical Lineup Placement Engine
//!
//! Formation catalog, position codec and placement board for amateur football
//! lineups (society 5/6/7, campo 11, futsal).
//!
//! ## Features
//! - Embedded formation catalog with default slot coordinates
//! - Sector classifier and `"LABEL|top|left"` custom position codes
//! - Drag-and-drop board state machine with per-sample commits
//! - Slot/bench bookkeeping, quick-select and category-aware auto-fill
//! - Stored lineup records and field/bench rows
//! - JSON API for host integration

// Struct initialization pattern used intentionally
#![allow(clippy::field_reassign_with_default)]
// Method naming conventions - would require API changes
#![allow(clippy::should_implement_trait)]

pub mod api;
pub mod assignment;
pub mod board;
pub mod catalog;
pub mod codec;
pub mod config;
pub mod error;
pub mod roster;
pub mod wire;


pub use assignment::{AssignmentManager, Placement, PlacementSink};
pub use board::{
    render, BoardEffect, BoardEvent, BoardTransition, DragState, FieldRect, Marker, NoopReason,
    PlacementBoard,
};
pub use catalog::{catalog, Coordinate, FormationCatalog, FormationId, Modality, Sector, SlotName};
pub use codec::{classify, decode, encode, encode_within, FieldMargin, PositionCode};
pub use config::{BoardConfig, EditorConfig};
pub use error::{LineupError, Result};
pub use roster::{Player, PlayerId, PositionCategory};
pub use wire::{LineupRecord, LineupRow};
