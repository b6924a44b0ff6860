// crates/lineup_core/src/catalog/types.rs
// Identifier types shared by the catalog, codec, board and assignment layers

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{LineupError, Result};

/// Squad-size format. Each modality owns a fixed list of formations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
pub enum Modality {
    #[serde(rename = "society-5")]
    Society5,
    #[serde(rename = "society-6")]
    Society6,
    #[serde(rename = "society-7")]
    Society7,
    #[serde(rename = "campo-11")]
    Campo11,
    #[serde(rename = "futsal")]
    Futsal,
}

impl Modality {
    pub const ALL: [Modality; 5] =
        [Self::Society5, Self::Society6, Self::Society7, Self::Campo11, Self::Futsal];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Society5 => "society-5",
            Self::Society6 => "society-6",
            Self::Society7 => "society-7",
            Self::Campo11 => "campo-11",
            Self::Futsal => "futsal",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Society5 => "Society 5x5 (6 players)",
            Self::Society6 => "Society 6x6 (7 players)",
            Self::Society7 => "Society 7x7 (8 players)",
            Self::Campo11 => "Campo 11x11 (11 players)",
            Self::Futsal => "Futsal (5 players)",
        }
    }

    /// Label shown by the club portal.
    pub fn localized_name(&self) -> &'static str {
        match self {
            Self::Society5 => "Society 5x5 (6 jogadores)",
            Self::Society6 => "Society 6x6 (7 jogadores)",
            Self::Society7 => "Society 7x7 (8 jogadores)",
            Self::Campo11 => "Campo 11x11 (11 jogadores)",
            Self::Futsal => "Futsal (5 jogadores)",
        }
    }

    /// Players on the field including the goalkeeper.
    pub fn squad_size(&self) -> usize {
        match self {
            Self::Society5 => 6,
            Self::Society6 => 7,
            Self::Society7 => 8,
            Self::Campo11 => 11,
            Self::Futsal => 5,
        }
    }

    /// Full-size pitch uses a taller aspect ratio than the society/indoor courts.
    pub fn is_full_pitch(&self) -> bool {
        matches!(self, Self::Campo11)
    }
}

impl Default for Modality {
    fn default() -> Self {
        Self::Society6
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Modality {
    type Err = LineupError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.id() == s)
            .ok_or_else(|| LineupError::UnknownModality(s.to_string()))
    }
}

/// Coarse pitch zone inferred from a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
pub enum Sector {
    Gol,
    Zag,
    Lte,
    Ltd,
    Vol,
    Me,
    Mei,
    Md,
    Pte,
    Ptd,
    Ata,
    Banco,
}

impl Sector {
    pub const ALL: [Sector; 12] = [
        Self::Gol,
        Self::Zag,
        Self::Lte,
        Self::Ltd,
        Self::Vol,
        Self::Me,
        Self::Mei,
        Self::Md,
        Self::Pte,
        Self::Ptd,
        Self::Ata,
        Self::Banco,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gol => "GOL",
            Self::Zag => "ZAG",
            Self::Lte => "LTE",
            Self::Ltd => "LTD",
            Self::Vol => "VOL",
            Self::Me => "ME",
            Self::Mei => "MEI",
            Self::Md => "MD",
            Self::Pte => "PTE",
            Self::Ptd => "PTD",
            Self::Ata => "ATA",
            Self::Banco => "BANCO",
        }
    }

    pub fn parse(s: &str) -> Option<Sector> {
        Self::ALL.iter().copied().find(|sector| sector.as_str() == s)
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formation token such as `"4-3-3"`: dash-separated line sizes, goalkeeper excluded.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct FormationId(String);

impl FormationId {
    pub fn parse(token: &str) -> Result<Self> {
        let valid = !token.is_empty()
            && token
                .split('-')
                .all(|line| !line.is_empty() && line.bytes().all(|b| b.is_ascii_digit()));
        if valid {
            Ok(Self(token.to_string()))
        } else {
            Err(LineupError::InvalidFormation(token.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Outfield players implied by the token (sum of the line sizes).
    ///
    /// Returns `None` for a token that was deserialized without validation and
    /// does not parse.
    pub fn outfield_count(&self) -> Option<usize> {
        self.0.split('-').map(|line| line.parse::<usize>().ok()).sum()
    }

    /// Outfield players plus one goalkeeper.
    pub fn squad_size(&self) -> Option<usize> {
        self.outfield_count().map(|n| n + 1)
    }
}

impl fmt::Display for FormationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for FormationId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl FromStr for FormationId {
    type Err = LineupError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Reserved field position used by persisted rows for bench players.
pub const BENCH_POSITION: &str = "banco";

/// Named tactical position within a formation (`"zagueiro-esquerdo"`).
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct SlotName(String);

impl SlotName {
    pub fn parse(name: &str) -> Result<Self> {
        let valid = !name.is_empty()
            && name != BENCH_POSITION
            && !name.starts_with('-')
            && !name.ends_with('-')
            && name.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-');
        if valid {
            Ok(Self(name.to_string()))
        } else {
            Err(LineupError::InvalidSlot(name.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for SlotName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl FromStr for SlotName {
    type Err = LineupError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Normalized board coordinate in percent of field height (`top`) and width (`left`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Coordinate {
    pub top: f64,
    pub left: f64,
}

impl Coordinate {
    pub const CENTER: Coordinate = Coordinate { top: 50.0, left: 50.0 };

    pub fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }

    /// Clamp both axes into `[min, max]`. Inverted bounds are swapped and a NaN
    /// bound leaves that side open, so this never panics.
    pub fn clamped(self, min: f64, max: f64) -> Self {
        let (lo, hi) = if min > max { (max, min) } else { (min, max) };
        Self { top: self.top.max(lo).min(hi), left: self.left.max(lo).min(hi) }
    }

    pub fn rounded(self) -> Self {
        Self { top: self.top.round(), left: self.left.round() }
    }

    /// CSS value for the `top` style property, e.g. `"88%"`.
    pub fn css_top(&self) -> String {
        format!("{}%", self.top)
    }

    /// CSS value for the `left` style property, e.g. `"50%"`.
    pub fn css_left(&self) -> String {
        format!("{}%", self.left)
    }
}
