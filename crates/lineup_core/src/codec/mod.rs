// crates/lineup_core/src/codec/mod.rs
// Position codes: a bare slot name (use the catalog default) or an explicit
// custom coordinate serialized as "LABEL|top|left".

pub mod sector;

use std::fmt;

use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{catalog, Coordinate, FormationCatalog, Sector, SlotName};
use crate::error::{LineupError, Result};

pub use sector::classify;

pub const CODE_DELIMITER: char = '|';

/// Visible field margin, in percent. Encoded coordinates never leave it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldMargin {
    pub min: f64,
    pub max: f64,
}

impl FieldMargin {
    pub const DEFAULT: FieldMargin = FieldMargin { min: 5.0, max: 95.0 };

    /// Ordered bounds. Non-finite bounds fall back to [`FieldMargin::DEFAULT`].
    pub fn normalized(&self) -> FieldMargin {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Self::DEFAULT;
        }
        FieldMargin { min: self.min.min(self.max), max: self.max.max(self.min) }
    }

    pub fn clamp(&self, coordinate: Coordinate) -> Coordinate {
        let margin = self.normalized();
        coordinate.clamped(margin.min, margin.max)
    }
}

impl Default for FieldMargin {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Explicit coordinate overriding the slot grid.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomPosition {
    pub label: String,
    pub top: f64,
    pub left: f64,
}

impl CustomPosition {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.top, self.left)
    }

    pub fn sector(&self) -> Option<Sector> {
        Sector::parse(&self.label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PositionCode {
    Slot(SlotName),
    Custom(CustomPosition),
}

impl PositionCode {
    /// Strict parse. Custom codes need exactly three fields and numeric coordinates.
    pub fn parse(code: &str) -> Result<Self> {
        if !code.contains(CODE_DELIMITER) {
            return SlotName::parse(code)
                .map(PositionCode::Slot)
                .map_err(|_| LineupError::InvalidPositionCode(code.to_string()));
        }

        let invalid = || LineupError::InvalidPositionCode(code.to_string());
        let parts: Vec<&str> = code.split(CODE_DELIMITER).collect();
        let [label, top, left] = parts.as_slice() else {
            return Err(invalid());
        };
        if label.is_empty() {
            return Err(invalid());
        }
        let top: f64 = top.trim().parse().map_err(|_| invalid())?;
        let left: f64 = left.trim().parse().map_err(|_| invalid())?;
        if !top.is_finite() || !left.is_finite() {
            return Err(invalid());
        }

        Ok(PositionCode::Custom(CustomPosition { label: label.to_string(), top, left }))
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, PositionCode::Custom(_))
    }

    pub fn as_custom(&self) -> Option<&CustomPosition> {
        match self {
            PositionCode::Custom(custom) => Some(custom),
            PositionCode::Slot(_) => None,
        }
    }

    pub fn as_slot(&self) -> Option<&SlotName> {
        match self {
            PositionCode::Slot(slot) => Some(slot),
            PositionCode::Custom(_) => None,
        }
    }
}

impl fmt::Display for PositionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionCode::Slot(slot) => f.write_str(slot.as_str()),
            PositionCode::Custom(c) => {
                write!(f, "{}{}{}{}{}", c.label, CODE_DELIMITER, c.top, CODE_DELIMITER, c.left)
            }
        }
    }
}

impl From<PositionCode> for String {
    fn from(code: PositionCode) -> Self {
        code.to_string()
    }
}

impl TryFrom<String> for PositionCode {
    type Error = LineupError;

    fn try_from(value: String) -> Result<Self> {
        PositionCode::parse(&value)
    }
}

impl Serialize for PositionCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PositionCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        PositionCode::parse(&raw).map_err(serde::de::Error::custom)
    }
}

impl JsonSchema for PositionCode {
    fn schema_name() -> String {
        "PositionCode".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        <String as JsonSchema>::json_schema(gen)
    }
}

/// Result of resolving a position code for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedPosition {
    pub label: String,
    pub coordinate: Coordinate,
    pub custom: bool,
    /// `top` and `left` fields of a well-formed custom code exactly as stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbatim: Option<(String, String)>,
}

impl DecodedPosition {
    /// CSS `top`/`left` values. Stored text wins over the parsed coordinate.
    pub fn css_position(&self) -> (String, String) {
        match &self.verbatim {
            Some((top, left)) => (format!("{}%", top.trim()), format!("{}%", left.trim())),
            None => (self.coordinate.css_top(), self.coordinate.css_left()),
        }
    }
}

/// Resolve a position code against a formation using the shared catalog.
pub fn decode(code: &str, formation: &str) -> DecodedPosition {
    decode_with(catalog(), code, formation)
}

/// Resolve a position code. Custom codes need no catalog; slot names fall back
/// to the catalog default coordinate and label. Never fails: malformed custom
/// codes render at the field center under their first field.
///
/// The label of a custom code is kept as stored. `coordinate` is the numeric
/// reading of the other two fields (`GOL|092|50` gives `92`); their stored text
/// is kept in `verbatim` for display.
pub fn decode_with(catalog: &FormationCatalog, code: &str, formation: &str) -> DecodedPosition {
    if code.contains(CODE_DELIMITER) {
        return match PositionCode::parse(code) {
            Ok(PositionCode::Custom(custom)) => {
                let mut fields = code.splitn(3, CODE_DELIMITER).skip(1);
                let verbatim = match (fields.next(), fields.next()) {
                    (Some(top), Some(left)) => Some((top.to_string(), left.to_string())),
                    _ => None,
                };
                DecodedPosition {
                    coordinate: custom.coordinate(),
                    label: custom.label,
                    custom: true,
                    verbatim,
                }
            }
            _ => {
                debug!(code, "malformed custom position code");
                let label = code.split(CODE_DELIMITER).next().unwrap_or_default();
                DecodedPosition {
                    label: label.to_string(),
                    coordinate: Coordinate::CENTER,
                    custom: true,
                    verbatim: None,
                }
            }
        };
    }

    DecodedPosition {
        label: catalog.label_for(code).into_owned(),
        coordinate: catalog.default_coordinate(formation, code),
        custom: false,
        verbatim: None,
    }
}

/// Encode a free-form coordinate using the default field margin.
pub fn encode(top: f64, left: f64) -> PositionCode {
    encode_within(FieldMargin::DEFAULT, top, left)
}

/// Clamp into the margin, label by sector and round to whole percentages.
///
/// The sector comes from the clamped sample before rounding, so a code near a
/// band edge may carry a label its rounded coordinate would not get.
pub fn encode_within(margin: FieldMargin, top: f64, left: f64) -> PositionCode {
    let clamped = margin.clamp(Coordinate::new(top, left));
    let sector = classify(clamped.top, clamped.left);
    let at = clamped.rounded();
    PositionCode::Custom(CustomPosition {
        label: sector.as_str().to_string(),
        top: at.top,
        left: at.left,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_goalkeeper_drag() {
        assert_eq!(encode(92.0, 50.0).to_string(), "GOL|92|50");
    }

    #[test]
    fn test_encode_clamps_and_rounds() {
        assert_eq!(encode(-12.0, 130.0).to_string(), "ATA|5|95");
        assert_eq!(encode(99.6, 0.2).to_string(), "LTE|95|5");
        assert_eq!(encode(49.5, 50.4).to_string(), "MEI|50|50");
    }

    #[test]
    fn test_label_comes_from_unrounded_sample() {
        assert_eq!(encode(84.6, 50.0).to_string(), "ZAG|85|50");
        assert_eq!(encode(69.6, 50.0).to_string(), "VOL|70|50");
        assert_eq!(encode(85.0, 50.0).to_string(), "GOL|85|50");
        assert_eq!(encode(64.6, 34.6).to_string(), "ME|65|35");
    }

    #[test]
    fn test_encode_within_custom_margin() {
        let margin = FieldMargin { min: 10.0, max: 90.0 };
        assert_eq!(encode_within(margin, 100.0, 50.0).to_string(), "GOL|90|50");
        assert_eq!(encode_within(margin, 0.0, 0.0).to_string(), "ATA|10|10");
    }

    #[test]
    fn test_encode_within_bad_margin_does_not_panic() {
        let inverted = FieldMargin { min: 90.0, max: 10.0 };
        assert_eq!(inverted.normalized(), FieldMargin { min: 10.0, max: 90.0 });
        assert_eq!(encode_within(inverted, 50.0, 50.0).to_string(), "MEI|50|50");
        assert_eq!(encode_within(inverted, 0.0, 0.0).to_string(), "ATA|10|10");

        let nan = FieldMargin { min: f64::NAN, max: 95.0 };
        assert_eq!(nan.normalized(), FieldMargin::DEFAULT);
        assert_eq!(encode_within(nan, -20.0, 50.0).to_string(), "ATA|5|50");
        let infinite = FieldMargin { min: 5.0, max: f64::INFINITY };
        assert_eq!(encode_within(infinite, 140.0, 50.0).to_string(), "GOL|95|50");
    }

    #[test]
    fn test_decode_custom_code_needs_no_catalog() {
        let empty: FormationCatalog = serde_yaml::from_str(
            "modalities: {}\nformations: {}\n",
        )
        .unwrap();
        let decoded = decode_with(&empty, "VOL|58|40", "does-not-matter");
        assert_eq!(decoded.label, "VOL");
        assert_eq!(decoded.coordinate, Coordinate::new(58.0, 40.0));
        assert!(decoded.custom);
    }

    #[test]
    fn test_decode_slot_uses_catalog() {
        let decoded = decode("zagueiro-centro-esquerdo", "4-4-2");
        assert_eq!(decoded.label, "ZAG");
        assert_eq!(decoded.coordinate, Coordinate::new(75.0, 43.0));
        assert!(!decoded.custom);
    }

    #[test]
    fn test_decode_degrades_silently() {
        let unknown_slot = decode("ala-esquerdo", "4-4-2");
        assert_eq!(unknown_slot.label, "ALA-ESQUERDO");
        assert_eq!(unknown_slot.coordinate, Coordinate::CENTER);

        let malformed = decode("GOL|abc|50", "4-4-2");
        assert_eq!(malformed.label, "GOL");
        assert_eq!(malformed.coordinate, Coordinate::CENTER);

        let too_many = decode("GOL|1|2|3", "4-4-2");
        assert_eq!(too_many.coordinate, Coordinate::CENTER);
        assert_eq!(too_many.verbatim, None);
    }

    #[test]
    fn test_decode_keeps_stored_text() {
        let decoded = decode("GOL|092|50.0", "4-3-3");
        assert_eq!(decoded.label, "GOL");
        assert_eq!(decoded.coordinate, Coordinate::new(92.0, 50.0));
        assert_eq!(decoded.verbatim, Some(("092".to_string(), "50.0".to_string())));
        assert_eq!(decoded.css_position(), ("092%".to_string(), "50.0%".to_string()));

        let slot = decode("goleiro", "4-3-3");
        assert_eq!(slot.verbatim, None);
        assert_eq!(slot.css_position(), (slot.coordinate.css_top(), slot.coordinate.css_left()));
        let json = serde_json::to_value(&slot).unwrap();
        assert!(json.get("verbatim").is_none());
    }

    #[test]
    fn test_decode_every_cataloged_slot() {
        let catalog = catalog();
        for modality in crate::catalog::Modality::ALL {
            for formation in catalog.formations_for(modality).unwrap() {
                for position in catalog.layout(formation.as_str()) {
                    let decoded = decode(position.slot.as_str(), formation.as_str());
                    assert_eq!(decoded.coordinate, position.coordinate());
                    assert_eq!(decoded.label, catalog.label_for(position.slot.as_str()));
                }
            }
        }
    }

    #[test]
    fn test_parse_strictness() {
        assert!(matches!(PositionCode::parse("goleiro"), Ok(PositionCode::Slot(_))));
        assert!(PositionCode::parse("GOL|92|50").unwrap().is_custom());
        assert!(PositionCode::parse("|92|50").is_err());
        assert!(PositionCode::parse("GOL|92").is_err());
        assert!(PositionCode::parse("GOL|92|50|1").is_err());
        assert!(PositionCode::parse("GOL|inf|50").is_err());
        assert!(PositionCode::parse("Goleiro Reserva").is_err());
    }

    #[test]
    fn test_code_serde_is_plain_string() {
        let code = PositionCode::parse("PTD|20|80").unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"PTD|20|80\"");
        let back: PositionCode = serde_json::from_str("\"meia-centro\"").unwrap();
        assert_eq!(back.as_slot().map(SlotName::as_str), Some("meia-centro"));
        assert!(serde_json::from_str::<PositionCode>("\"X|1\"").is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: encode output always lies inside the default margin with integer values
            #[test]
            fn prop_encode_inside_margin(top in -200.0f64..300.0, left in -200.0f64..300.0) {
                let code = encode(top, left);
                let custom = code.as_custom().unwrap();
                prop_assert!(custom.top >= 5.0 && custom.top <= 95.0);
                prop_assert!(custom.left >= 5.0 && custom.left <= 95.0);
                prop_assert_eq!(custom.top.fract(), 0.0);
                prop_assert_eq!(custom.left.fract(), 0.0);
            }

            /// Property: the encoded coordinate survives decode and re-encode,
            /// and the code is stable after one pass
            #[test]
            fn prop_encode_decode_stable(top in 0.0f64..=100.0, left in 0.0f64..=100.0) {
                let first = encode(top, left).to_string();
                prop_assert_eq!(PositionCode::parse(&first).unwrap().to_string(), first.clone());

                let decoded = decode(&first, "4-3-3");
                let second = encode(decoded.coordinate.top, decoded.coordinate.left);
                prop_assert_eq!(second.as_custom().unwrap().coordinate(), decoded.coordinate);

                let again = decode(&second.to_string(), "4-3-3");
                let third = encode(again.coordinate.top, again.coordinate.left);
                prop_assert_eq!(third.to_string(), second.to_string());
            }

            /// Property: the label always matches the clamped, unrounded sample
            #[test]
            fn prop_label_matches_classify(top in 5.0f64..=95.0, left in 5.0f64..=95.0) {
                let code = encode(top, left);
                prop_assert_eq!(code.as_custom().unwrap().label.as_str(), classify(top, left).as_str());
            }
        }
    }
}
