//! Embedded formation catalog
//!
//! `data/formations.yaml` is compiled into the binary with `include_str!` and
//! parsed once on first access. No file I/O at runtime.

use once_cell::sync::Lazy;

use super::FormationCatalog;

/// Formation catalog YAML (modalities, layouts, labels)
pub const FORMATIONS_YAML: &str = include_str!("../../../../data/formations.yaml");

static CATALOG: Lazy<FormationCatalog> = Lazy::new(|| {
    FormationCatalog::from_yaml_str(FORMATIONS_YAML)
        .expect("Embedded formation catalog YAML is corrupted")
});

/// Shared read-only catalog.
///
/// # Panics
/// On first access if the embedded YAML fails validation.
pub fn catalog() -> &'static FormationCatalog {
    &CATALOG
}
