// crates/lineup_core/src/config.rs
// Editor configuration (YAML). Every field has a default so an empty file is valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::{FormationCatalog, FormationId, Modality};
use crate::codec::FieldMargin;
use crate::error::{LineupError, Result};

fn default_margin_min() -> f64 {
    FieldMargin::DEFAULT.min
}

fn default_margin_max() -> f64 {
    FieldMargin::DEFAULT.max
}

/// Placement board settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoardConfig {
    #[serde(default = "default_margin_min")]
    pub margin_min: f64,
    #[serde(default = "default_margin_max")]
    pub margin_max: f64,
}

impl BoardConfig {
    pub fn margin(&self) -> FieldMargin {
        FieldMargin { min: self.margin_min, max: self.margin_max }
    }

    pub fn validate(&self) -> Result<()> {
        let in_range = |v: f64| (0.0..=100.0).contains(&v);
        if !in_range(self.margin_min) || !in_range(self.margin_max) || self.margin_min >= self.margin_max
        {
            return Err(LineupError::InvalidConfig(format!(
                "board margin must satisfy 0 <= min < max <= 100, got {}..{}",
                self.margin_min, self.margin_max
            )));
        }
        Ok(())
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self { margin_min: default_margin_min(), margin_max: default_margin_max() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditorConfig {
    #[serde(default)]
    pub default_modality: Modality,
    /// First formation of the modality when unset.
    #[serde(default)]
    pub default_formation: Option<FormationId>,
    #[serde(default)]
    pub board: BoardConfig,
    /// Catalog file replacing the embedded one.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

impl EditorConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: EditorConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file. Relative `catalog_path` values resolve against
    /// the config file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml_str(&yaml)?;
        if let (Some(catalog), Some(dir)) = (config.catalog_path.as_mut(), path.parent()) {
            if catalog.is_relative() {
                *catalog = dir.join(&*catalog);
            }
        }
        info!(path = %path.display(), modality = %config.default_modality, "editor config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.board.validate()
    }

    /// Catalog named by `catalog_path`, if any. `None` means the embedded one.
    pub fn load_catalog(&self) -> Result<Option<FormationCatalog>> {
        match &self.catalog_path {
            Some(path) => {
                let catalog = FormationCatalog::load(path)?;
                info!(path = %path.display(), "external formation catalog loaded");
                Ok(Some(catalog))
            }
            None => Ok(None),
        }
    }

    /// Formation a new lineup starts on, checked against `catalog`.
    pub fn starting_formation(&self, catalog: &FormationCatalog) -> Result<FormationId> {
        let offered = catalog.formations_for(self.default_modality)?;
        match &self.default_formation {
            Some(formation) if offered.contains(formation) => Ok(formation.clone()),
            Some(formation) => Err(LineupError::InvalidFormation(format!(
                "{} is not offered for {}",
                formation, self.default_modality
            ))),
            None => Ok(offered[0].clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::catalog;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = EditorConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.default_modality, Modality::Society6);
        assert_eq!(config.board.margin(), FieldMargin::DEFAULT);
        assert_eq!(config.starting_formation(catalog()).unwrap().as_str(), "2-2-2");
        assert!(config.load_catalog().unwrap().is_none());
    }

    #[test]
    fn test_explicit_values() {
        let config = EditorConfig::from_yaml_str(
            "default_modality: campo-11\ndefault_formation: \"4-4-2\"\nboard:\n  margin_min: 8\n",
        )
        .unwrap();
        assert_eq!(config.default_modality, Modality::Campo11);
        assert_eq!(config.board.margin(), FieldMargin { min: 8.0, max: 95.0 });
        assert_eq!(config.starting_formation(catalog()).unwrap().as_str(), "4-4-2");
    }

    #[test]
    fn test_formation_must_belong_to_modality() {
        let config =
            EditorConfig::from_yaml_str("default_modality: futsal\ndefault_formation: \"4-4-2\"\n")
                .unwrap();
        let err = config.starting_formation(catalog()).unwrap_err();
        assert!(matches!(err, LineupError::InvalidFormation(_)));
    }

    #[test]
    fn test_invalid_configs() {
        assert!(matches!(
            EditorConfig::from_yaml_str("default_modality: beach-4\n"),
            Err(LineupError::Config(_))
        ));
        assert!(matches!(
            EditorConfig::from_yaml_str("board:\n  margin_min: 60\n  margin_max: 40\n"),
            Err(LineupError::InvalidConfig(_))
        ));
        assert!(EditorConfig::from_yaml_str("unknown_key: 1\n").is_err());
    }

    #[test]
    fn test_load_resolves_relative_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let catalog_file = dir.path().join("formations.yaml");
        std::fs::write(&catalog_file, crate::catalog::FORMATIONS_YAML).unwrap();

        let config_file = dir.path().join("editor.yaml");
        let mut f = std::fs::File::create(&config_file).unwrap();
        writeln!(f, "default_modality: society-7\ncatalog_path: formations.yaml").unwrap();

        let config = EditorConfig::load(&config_file).unwrap();
        assert_eq!(config.catalog_path.as_deref(), Some(catalog_file.as_path()));
        let loaded = config.load_catalog().unwrap().unwrap();
        assert_eq!(config.starting_formation(&loaded).unwrap().as_str(), "2-3-2");
    }
}
