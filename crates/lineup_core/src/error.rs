use thiserror::Error;

#[derive(Error, Debug)]
pub enum LineupError {
    #[error("Unknown modality: {0}")]
    UnknownModality(String),

    #[error("Invalid formation: {0}")]
    InvalidFormation(String),

    #[error("Invalid slot name: {0}")]
    InvalidSlot(String),

    #[error("Invalid player id: {0:?}")]
    InvalidPlayerId(String),

    #[error("Invalid position code: {0}")]
    InvalidPositionCode(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LineupError {
    /// Stable machine-readable code used by the JSON API.
    pub fn code(&self) -> &'static str {
        match self {
            LineupError::UnknownModality(_) => "UNKNOWN_MODALITY",
            LineupError::InvalidFormation(_) => "INVALID_FORMATION",
            LineupError::InvalidSlot(_) => "INVALID_SLOT",
            LineupError::InvalidPlayerId(_) => "INVALID_PLAYER_ID",
            LineupError::InvalidPositionCode(_) => "INVALID_POSITION_CODE",
            LineupError::Catalog(_) => "CATALOG_ERROR",
            LineupError::InvalidConfig(_) => "INVALID_CONFIG",
            LineupError::Config(_) => "CONFIG_ERROR",
            LineupError::Io(_) => "IO_ERROR",
            LineupError::Serialization(_) => "INVALID_JSON",
        }
    }

    /// Programming errors (fail fast) versus bad input the caller can correct.
    pub fn is_programming_error(&self) -> bool {
        matches!(self, LineupError::UnknownModality(_) | LineupError::Catalog(_))
    }
}

pub type Result<T> = std::result::Result<T, LineupError>;
