//! Dashboard catalog.
//!
//! Dashboards are declared in TOML, one `[[dashboards]]` table each. The
//! built-in catalog ships inside the binary; a user file with the same
//! layout replaces it entirely.

pub mod error;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use painel_model::DashboardSpec;

pub use error::{CatalogError, Result};

const BUILTIN_CATALOG: &str = include_str!("../data/dashboards.toml");
const BUILTIN_ORIGIN: &str = "<builtin>";

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    dashboards: Vec<DashboardSpec>,
}

/// Validated set of dashboard definitions, in declaration order.
#[derive(Debug, Clone)]
pub struct Catalog {
    dashboards: Vec<DashboardSpec>,
}

impl Catalog {
    /// Validates and wraps a list of definitions.
    pub fn new(dashboards: Vec<DashboardSpec>) -> Result<Self> {
        validate(&dashboards)?;
        Ok(Self { dashboards })
    }

    pub fn get(&self, id: &str) -> Option<&DashboardSpec> {
        self.dashboards.iter().find(|spec| spec.id == id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.dashboards.iter().map(|spec| spec.id.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DashboardSpec> {
        self.dashboards.iter()
    }

    pub fn len(&self) -> usize {
        self.dashboards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dashboards.is_empty()
    }
}

pub fn load_builtin_catalog() -> Result<Catalog> {
    parse_catalog(BUILTIN_CATALOG, Path::new(BUILTIN_ORIGIN))
}

pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_catalog(&text, path)
}

/// Parses catalog text; `origin` only labels errors.
pub fn parse_catalog(text: &str, origin: &Path) -> Result<Catalog> {
    let file: CatalogFile = toml::from_str(text).map_err(|source| CatalogError::Toml {
        path: PathBuf::from(origin),
        source,
    })?;
    let catalog = Catalog::new(file.dashboards)?;
    debug!(origin = %origin.display(), dashboards = catalog.len(), "catalog loaded");
    Ok(catalog)
}

fn validate(dashboards: &[DashboardSpec]) -> Result<()> {
    let mut ids = BTreeSet::new();
    for spec in dashboards {
        if spec.id.trim().is_empty() {
            return Err(CatalogError::invalid("dashboard with an empty id"));
        }
        if !ids.insert(spec.id.as_str()) {
            return Err(CatalogError::invalid(format!(
                "duplicate dashboard id: {}",
                spec.id
            )));
        }
        validate_dashboard(spec)?;
    }
    Ok(())
}

fn validate_dashboard(spec: &DashboardSpec) -> Result<()> {
    let id = &spec.id;
    if spec.source.location.trim().is_empty() {
        return Err(CatalogError::invalid(format!("{id}: empty source location")));
    }
    if !spec.source.delimiter.is_ascii() {
        return Err(CatalogError::invalid(format!(
            "{id}: delimiter {:?} is not ASCII",
            spec.source.delimiter
        )));
    }

    let mut controls = BTreeSet::new();
    for control in &spec.controls {
        if !controls.insert(control.id.as_str()) {
            return Err(CatalogError::invalid(format!(
                "{id}: duplicate control id: {}",
                control.id
            )));
        }
    }

    let mut aggregates = BTreeSet::new();
    for aggregate in &spec.aggregates {
        if !aggregates.insert(aggregate.id.as_str()) {
            return Err(CatalogError::invalid(format!(
                "{id}: duplicate aggregate id: {}",
                aggregate.id
            )));
        }
    }

    if let Some(code) = spec.schema.code_columns.iter().find(|code| code.width == 0) {
        return Err(CatalogError::invalid(format!(
            "{id}: code column {} has zero width",
            code.column
        )));
    }

    let declared = spec.schema.declared_columns();
    if let Some(column) = spec
        .referenced_columns()
        .into_iter()
        .find(|column| !declared.contains(column))
    {
        return Err(CatalogError::invalid(format!(
            "{id}: column {column:?} is used but not declared by the schema"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = load_builtin_catalog().unwrap();
        assert_eq!(
            catalog.ids(),
            vec!["contratos", "atas", "compras", "orcamento", "diarias"]
        );
    }

    #[test]
    fn empty_file_is_an_empty_catalog() {
        let catalog = parse_catalog("", Path::new("vazio.toml")).unwrap();
        assert!(catalog.is_empty());
    }
}
