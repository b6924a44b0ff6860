// crates/lineup_core/src/roster.rs
// Roster entries handed in by the club store

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::catalog::Sector;
use crate::error::{LineupError, Result};

/// Jersey sort key for players without a number.
pub const UNNUMBERED_SORT_KEY: u32 = 99;

/// Opaque player identifier issued by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerId(String);

impl PlayerId {
    pub fn parse(id: &str) -> Result<Self> {
        let trimmed = id.trim();
        if trimmed.is_empty() || trimmed.len() != id.len() || id.contains('|') {
            return Err(LineupError::InvalidPlayerId(id.to_string()));
        }
        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for PlayerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl FromStr for PlayerId {
    type Err = LineupError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PlayerId {
    type Error = LineupError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<PlayerId> for String {
    fn from(id: PlayerId) -> Self {
        id.0
    }
}

impl JsonSchema for PlayerId {
    fn schema_name() -> String {
        "PlayerId".to_string()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        <String as JsonSchema>::json_schema(gen)
    }
}

/// Registered playing position of a roster member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
pub enum PositionCategory {
    Goleiro,
    Zagueiro,
    Lateral,
    Volante,
    Meia,
    Atacante,
}

impl PositionCategory {
    pub const ALL: [PositionCategory; 6] = [
        Self::Goleiro,
        Self::Zagueiro,
        Self::Lateral,
        Self::Volante,
        Self::Meia,
        Self::Atacante,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Goleiro => "goleiro",
            Self::Zagueiro => "zagueiro",
            Self::Lateral => "lateral",
            Self::Volante => "volante",
            Self::Meia => "meia",
            Self::Atacante => "atacante",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Goleiro => "Goalkeeper",
            Self::Zagueiro => "Centre-back",
            Self::Lateral => "Full-back",
            Self::Volante => "Defensive midfielder",
            Self::Meia => "Midfielder",
            Self::Atacante => "Forward",
        }
    }

    pub fn localized_name(&self) -> &'static str {
        match self {
            Self::Goleiro => "Goleiro",
            Self::Zagueiro => "Zagueiro",
            Self::Lateral => "Lateral",
            Self::Volante => "Volante",
            Self::Meia => "Meia",
            Self::Atacante => "Atacante",
        }
    }

    /// Slot labels this category fits, best first.
    ///
    /// `LAT` is the label of the `lateral-*` slot names.
    pub fn preferred_labels(&self) -> &'static [&'static str] {
        match self {
            Self::Goleiro => &["GOL"],
            Self::Zagueiro => &["ZAG", "LTD", "LTE"],
            Self::Lateral => &["LTD", "LTE", "LAT"],
            Self::Volante => &["VOL", "MEI"],
            Self::Meia => &["MEI", "ME", "MD", "VOL"],
            Self::Atacante => &["ATA", "PTE", "PTD"],
        }
    }

    pub fn fits_label(&self, label: &str) -> bool {
        self.preferred_labels().contains(&label)
    }

    pub fn is_goalkeeper(&self) -> bool {
        matches!(self, Self::Goleiro)
    }

    /// Category matching a sector, used when filtering quick-select by slot.
    pub fn for_sector(sector: Sector) -> Option<PositionCategory> {
        match sector {
            Sector::Gol => Some(Self::Goleiro),
            Sector::Zag => Some(Self::Zagueiro),
            Sector::Lte | Sector::Ltd => Some(Self::Lateral),
            Sector::Vol => Some(Self::Volante),
            Sector::Me | Sector::Mei | Sector::Md => Some(Self::Meia),
            Sector::Pte | Sector::Ptd | Sector::Ata => Some(Self::Atacante),
            Sector::Banco => None,
        }
    }
}

impl fmt::Display for PositionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for PositionCategory {
    type Err = LineupError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.id() == s)
            .ok_or_else(|| LineupError::InvalidSlot(s.to_string()))
    }
}

/// Roster member as supplied by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub category: Option<PositionCategory>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self { id, name: name.into(), nickname: None, number: None, category: None, photo_url: None }
    }

    pub fn with_number(mut self, number: u32) -> Self {
        self.number = Some(number);
        self
    }

    pub fn with_category(mut self, category: PositionCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    /// Nickname when set, otherwise the first word of the name.
    pub fn display_name(&self) -> &str {
        match self.nickname.as_deref().map(str::trim) {
            Some(nickname) if !nickname.is_empty() => nickname,
            _ => self.name.split_whitespace().next().unwrap_or(&self.name),
        }
    }

    /// Jersey sort key; missing or zero numbers sort last.
    pub fn sort_number(&self) -> u32 {
        self.number.filter(|n| *n != 0).unwrap_or(UNNUMBERED_SORT_KEY)
    }
}

/// Stable sort by jersey number, unnumbered players last.
pub fn sort_by_number(players: &mut [&Player]) {
    players.sort_by_key(|p| p.sort_number());
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn pid(id: &str) -> PlayerId {
        PlayerId::parse(id).unwrap()
    }

    pub fn player(id: &str, number: Option<u32>, category: PositionCategory) -> Player {
        let mut p = Player::new(pid(id), format!("Player {}", id)).with_category(category);
        p.number = number;
        p
    }

    /// Eleven-man roster with one reserve goalkeeper, shuffled numbers.
    pub fn squad() -> Vec<Player> {
        use PositionCategory::*;
        vec![
            player("p1", Some(1), Goleiro),
            player("p2", Some(4), Zagueiro),
            player("p3", Some(3), Zagueiro),
            player("p4", Some(2), Lateral),
            player("p5", Some(6), Lateral),
            player("p6", Some(5), Volante),
            player("p7", Some(8), Meia),
            player("p8", Some(10), Meia),
            player("p9", Some(7), Atacante),
            player("p10", Some(9), Atacante),
            player("p11", None, Atacante),
            player("p12", Some(12), Goleiro),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_player_id_validation() {
        assert!(PlayerId::parse("a1b2").is_ok());
        assert!(PlayerId::parse("").is_err());
        assert!(PlayerId::parse(" p1").is_err());
        assert!(PlayerId::parse("p|1").is_err());

        let err = serde_json::from_str::<PlayerId>("\"\"").unwrap_err();
        assert!(err.to_string().contains("Invalid player id"));
    }

    #[test]
    fn test_display_name_prefers_nickname() {
        let p = Player::new(pid("p1"), "Carlos Eduardo Silva");
        assert_eq!(p.display_name(), "Carlos");
        let p = p.with_nickname("Cadu");
        assert_eq!(p.display_name(), "Cadu");
        let p = Player::new(pid("p2"), "Zé").with_nickname("  ");
        assert_eq!(p.display_name(), "Zé");
    }

    #[test]
    fn test_sort_number_treats_zero_as_unnumbered() {
        let zero = player("a", Some(0), PositionCategory::Meia);
        let none = player("b", None, PositionCategory::Meia);
        let ten = player("c", Some(10), PositionCategory::Meia);
        assert_eq!(zero.sort_number(), 99);
        assert_eq!(none.sort_number(), 99);

        let mut list = vec![&zero, &none, &ten];
        sort_by_number(&mut list);
        let ids: Vec<&str> = list.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_category_labels() {
        for category in PositionCategory::iter() {
            assert!(!category.preferred_labels().is_empty());
            assert_eq!(category.id().parse::<PositionCategory>().unwrap(), category);
        }
        assert!(PositionCategory::Lateral.fits_label("LAT"));
        assert!(!PositionCategory::Goleiro.fits_label("ZAG"));
        assert_eq!(PositionCategory::for_sector(Sector::Ptd), Some(PositionCategory::Atacante));
        assert_eq!(PositionCategory::for_sector(Sector::Banco), None);
    }

    #[test]
    fn test_player_deserializes_with_defaults() {
        let p: Player =
            serde_json::from_str(r#"{"id":"p9","name":"Rafael Souza","category":"atacante"}"#)
                .unwrap();
        assert_eq!(p.category, Some(PositionCategory::Atacante));
        assert_eq!(p.number, None);
        assert_eq!(p.sort_number(), 99);
    }
}
