//! JSON endpoints for the lineup editor
//!
//! * `list_formations_json` - formations and slot layouts of a modality
//! * `classify_position_json` - encode a dropped coordinate
//! * `quick_select_json` - candidate list for one slot
//! * `render_board_json` - markers of a stored lineup

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::{check_version, ApiError, ApiResponse};
use crate::assignment::AssignmentManager;
use crate::board::{render, Marker};
use crate::catalog::{catalog, FormationId, Modality, SlotName};
use crate::codec::{classify, encode_within, FieldMargin};
use crate::roster::{Player, PlayerId, PositionCategory};
use crate::wire::LineupRecord;

// ============================================================================
// Requests / responses
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormationListRequest {
    pub schema_version: Option<String>,
    /// Raw modality tag, e.g. `"society-6"`.
    pub modality: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotInfo {
    pub slot: SlotName,
    pub label: String,
    pub top: f64,
    pub left: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormationInfo {
    pub id: FormationId,
    pub slots: Vec<SlotInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormationListResponse {
    pub modality: Modality,
    pub display_name: String,
    pub squad_size: usize,
    pub formations: Vec<FormationInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyRequest {
    pub schema_version: Option<String>,
    pub top: f64,
    pub left: f64,
    pub margin: Option<FieldMargin>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyResponse {
    /// Encoded custom position, e.g. `"GOL|92|50"`.
    pub code: String,
    pub label: String,
    pub top: f64,
    pub left: f64,
    /// Sector of the raw input before clamping.
    pub raw_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickSelectRequest {
    pub schema_version: Option<String>,
    pub lineup: LineupRecord,
    pub roster: Vec<Player>,
    pub slot: SlotName,
    pub category: Option<PositionCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickSelectCandidate {
    pub id: PlayerId,
    pub display_name: String,
    pub number: Option<u32>,
    pub category: Option<PositionCategory>,
    /// Current occupant of the slot.
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickSelectResponse {
    pub slot: SlotName,
    pub label: String,
    pub candidates: Vec<QuickSelectCandidate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderBoardRequest {
    pub schema_version: Option<String>,
    pub lineup: LineupRecord,
    #[serde(default)]
    pub editable: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderBoardResponse {
    pub formation: FormationId,
    pub filled: usize,
    pub slot_count: usize,
    pub markers: Vec<Marker>,
    /// Players both placed and benched.
    pub overlaps: Vec<PlayerId>,
}

// ============================================================================
// Validation
// ============================================================================

impl FormationListRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        check_version(self.schema_version.as_deref())
    }
}

impl ClassifyRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        check_version(self.schema_version.as_deref())?;
        if !self.top.is_finite() || !self.left.is_finite() {
            return Err(ApiError::new("INVALID_COORDINATE", "top and left must be finite numbers")
                .with_detail("top", self.top.to_string())
                .with_detail("left", self.left.to_string()));
        }
        if let Some(margin) = self.margin {
            if !(margin.min.is_finite() && margin.max.is_finite() && margin.min < margin.max) {
                return Err(ApiError::new("INVALID_MARGIN", "margin.min must be below margin.max"));
            }
        }
        Ok(())
    }
}

impl QuickSelectRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        check_version(self.schema_version.as_deref())?;
        if !catalog().has_slot(self.lineup.formation.as_str(), self.slot.as_str()) {
            return Err(ApiError::new(
                "INVALID_SLOT",
                &format!("Slot {} is not part of formation {}", self.slot, self.lineup.formation),
            ));
        }
        Ok(())
    }
}

impl RenderBoardRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        check_version(self.schema_version.as_deref())
    }
}

fn parse_request<R: for<'de> Deserialize<'de>>(request_json: &str, name: &str) -> Result<R, ApiError> {
    serde_json::from_str(request_json).map_err(|e| {
        error!("Failed to parse {}: {}", name, e);
        ApiError::invalid_json(&e)
    })
}

// ============================================================================
// Endpoints
// ============================================================================

/// List the formations of a modality with their slot layouts.
///
/// # Returns
/// JSON string containing `ApiResponse<FormationListResponse>`
pub fn list_formations_json(request_json: &str) -> String {
    debug!("Processing formation list request");
    let result = parse_request::<FormationListRequest>(request_json, "FormationListRequest")
        .and_then(|request| {
            request.validate()?;
            list_formations(&request.modality)
        });
    respond(result)
}

fn list_formations(tag: &str) -> Result<FormationListResponse, ApiError> {
    let catalog = catalog();
    let modality: Modality = tag.parse()?;
    let formations = catalog
        .formations_for(modality)?
        .iter()
        .map(|id| FormationInfo {
            id: id.clone(),
            slots: catalog
                .layout(id.as_str())
                .iter()
                .map(|p| SlotInfo {
                    slot: p.slot.clone(),
                    label: catalog.label_for(p.slot.as_str()).into_owned(),
                    top: p.top,
                    left: p.left,
                })
                .collect(),
        })
        .collect();
    Ok(FormationListResponse {
        modality,
        display_name: modality.display_name().to_string(),
        squad_size: modality.squad_size(),
        formations,
    })
}

/// Encode a dropped coordinate into a custom position code.
///
/// # Returns
/// JSON string containing `ApiResponse<ClassifyResponse>`
pub fn classify_position_json(request_json: &str) -> String {
    let result = parse_request::<ClassifyRequest>(request_json, "ClassifyRequest").and_then(|request| {
        request.validate()?;
        let margin = request.margin.unwrap_or_default();
        let code = encode_within(margin, request.top, request.left);
        let custom = code
            .as_custom()
            .ok_or_else(|| ApiError::new("INTERNAL_ERROR", "encoder returned a slot name"))?;
        Ok(ClassifyResponse {
            code: code.to_string(),
            label: custom.label.clone(),
            top: custom.top,
            left: custom.left,
            raw_label: classify(request.top, request.left).to_string(),
        })
    });
    respond(result)
}

/// Candidates for one slot of a stored lineup.
///
/// # Returns
/// JSON string containing `ApiResponse<QuickSelectResponse>`
pub fn quick_select_json(request_json: &str) -> String {
    let result = parse_request::<QuickSelectRequest>(request_json, "QuickSelectRequest")
        .and_then(|request| {
            request.validate()?;
            let manager = AssignmentManager::from_record(catalog(), &request.lineup)?;
            let occupant = manager.occupant(request.slot.as_str()).cloned();
            let candidates = manager
                .quick_select_candidates(&request.roster, request.slot.as_str(), request.category)
                .into_iter()
                .map(|p| QuickSelectCandidate {
                    id: p.id.clone(),
                    display_name: p.display_name().to_string(),
                    number: p.number,
                    category: p.category,
                    selected: occupant.as_ref() == Some(&p.id),
                })
                .collect::<Vec<_>>();
            info!(slot = %request.slot, candidates = candidates.len(), "quick select");
            Ok(QuickSelectResponse {
                label: catalog().label_for(request.slot.as_str()).into_owned(),
                slot: request.slot,
                candidates,
            })
        });
    respond(result)
}

/// Markers of a stored lineup, following the board rendering policy.
///
/// # Returns
/// JSON string containing `ApiResponse<RenderBoardResponse>`
pub fn render_board_json(request_json: &str) -> String {
    let result = parse_request::<RenderBoardRequest>(request_json, "RenderBoardRequest")
        .and_then(|request| {
            request.validate()?;
            for issue in request.lineup.validate(catalog()) {
                warn!(%issue, "stored lineup inconsistency");
            }
            let manager = AssignmentManager::from_record(catalog(), &request.lineup)?;
            Ok(RenderBoardResponse {
                formation: manager.formation().clone(),
                filled: manager.filled_count(),
                slot_count: manager.slot_count(),
                markers: render(&manager, request.editable),
                overlaps: manager.overlaps().into_iter().cloned().collect(),
            })
        });
    respond(result)
}

fn respond<T: Serialize>(result: Result<T, ApiError>) -> String {
    match result {
        Ok(data) => ApiResponse::success(data).to_json(),
        Err(error) => {
            warn!("Lineup request failed: {} ({})", error.message, error.code);
            ApiResponse::<T>::error(error).to_json()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn parse(response: &str) -> Value {
        serde_json::from_str(response).expect("response is JSON")
    }

    fn stored_lineup() -> Value {
        json!({
            "formation": "4-3-3",
            "modality": "campo-11",
            "slots": { "goleiro": "p1", "meia-centro": "p8" },
            "bench": ["p12"],
            "custom_positions": { "p8": "MEI|45|52" }
        })
    }

    fn roster() -> Value {
        json!([
            { "id": "p1", "name": "Carlos Silva", "number": 1, "category": "goleiro" },
            { "id": "p8", "name": "Bruno Lima", "nickname": "Bruninho", "number": 10, "category": "meia" },
            { "id": "p7", "name": "Diego Alves", "number": 8, "category": "meia" },
            { "id": "p11", "name": "Rafael Souza", "category": "atacante" },
            { "id": "p12", "name": "Marcos Reis", "number": 12, "category": "goleiro" }
        ])
    }

    #[test]
    fn test_list_formations() {
        let response = parse(&list_formations_json(r#"{"modality": "futsal"}"#));
        assert_eq!(response["success"], true);
        assert_eq!(response["data"]["squad_size"], 5);
        let formations = response["data"]["formations"].as_array().unwrap();
        assert_eq!(formations.len(), 3);
        assert_eq!(formations[0]["id"], "2-2");
        assert_eq!(formations[0]["slots"][0]["label"], "GOL");
    }

    #[test]
    fn test_list_formations_unknown_modality() {
        let response = parse(&list_formations_json(r#"{"modality": "beach-4"}"#));
        assert_eq!(response["success"], false);
        assert_eq!(response["error"]["code"], "UNKNOWN_MODALITY");
    }

    #[test]
    fn test_invalid_json_and_version() {
        let response = parse(&list_formations_json("{not json"));
        assert_eq!(response["error"]["code"], "INVALID_JSON");
        assert!(response["error"]["details"]["line"].is_number());

        let response =
            parse(&list_formations_json(r#"{"schema_version": "v9", "modality": "futsal"}"#));
        assert_eq!(response["error"]["code"], "UNSUPPORTED_SCHEMA_VERSION");
    }

    #[test]
    fn test_classify_position() {
        let response = parse(&classify_position_json(r#"{"top": 92, "left": 50}"#));
        assert_eq!(response["data"]["code"], "GOL|92|50");
        assert_eq!(response["data"]["label"], "GOL");

        let response = parse(&classify_position_json(r#"{"top": 3, "left": 120}"#));
        assert_eq!(response["data"]["code"], "ATA|5|95");
        assert_eq!(response["data"]["raw_label"], "ATA");

        let response =
            parse(&classify_position_json(r#"{"top": 50, "left": 50, "margin": {"min": 60, "max": 40}}"#));
        assert_eq!(response["error"]["code"], "INVALID_MARGIN");
    }

    #[test]
    fn test_quick_select() {
        let request = json!({
            "lineup": stored_lineup(),
            "roster": roster(),
            "slot": "meia-esquerdo",
            "category": "meia"
        });
        let response = parse(&quick_select_json(&request.to_string()));
        assert_eq!(response["success"], true);
        let candidates = response["data"]["candidates"].as_array().unwrap();
        // p8 already holds meia-centro
        let ids: Vec<&str> = candidates.iter().map(|c| c["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["p7"]);
        assert_eq!(response["data"]["label"], "MEI");
    }

    #[test]
    fn test_quick_select_marks_occupant() {
        let request = json!({ "lineup": stored_lineup(), "roster": roster(), "slot": "meia-centro" });
        let response = parse(&quick_select_json(&request.to_string()));
        let candidates = response["data"]["candidates"].as_array().unwrap();
        let selected: Vec<&Value> = candidates.iter().filter(|c| c["selected"] == true).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0]["display_name"], "Bruninho");
        // p1 is in goal, so only unplaced players and the occupant remain
        assert_eq!(candidates.len(), 4);
        assert_eq!(candidates.last().unwrap()["id"], "p11");
    }

    #[test]
    fn test_quick_select_rejects_foreign_slot() {
        let request = json!({ "lineup": stored_lineup(), "roster": roster(), "slot": "volante" });
        let response = parse(&quick_select_json(&request.to_string()));
        assert_eq!(response["error"]["code"], "INVALID_SLOT");
    }

    #[test]
    fn test_render_board() {
        let request = json!({ "lineup": stored_lineup(), "editable": true });
        let response = parse(&render_board_json(&request.to_string()));
        let data = &response["data"];
        assert_eq!(data["filled"], 2);
        assert_eq!(data["slot_count"], 11);

        let markers = data["markers"].as_array().unwrap();
        let count = |kind: &str| markers.iter().filter(|m| m["kind"] == kind).count();
        assert_eq!(count("ghost"), 2);
        assert_eq!(count("free"), 9);
        assert_eq!(count("player"), 2);

        let custom = markers.iter().find(|m| m["player"] == "p8").unwrap();
        assert_eq!(custom["label"], "MEI");
        assert_eq!(custom["coordinate"]["top"], 45.0);
        assert_eq!(custom["customized"], true);
    }

    #[test]
    fn test_render_board_read_only() {
        let request = json!({ "lineup": stored_lineup() });
        let response = parse(&render_board_json(&request.to_string()));
        let markers = response["data"]["markers"].as_array().unwrap();
        assert_eq!(markers.len(), 2);
        assert!(markers.iter().all(|m| m["kind"] == "player"));
    }
}
