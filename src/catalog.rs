//! The element catalog: an ordered, read-only table of [`Element`] rows.
//!
//! A catalog is normally loaded once from periodic-table JSON. When no
//! document is available, [`ElementCatalog::embedded`] provides a built-in
//! table covering the elements a sandbox user is likely to spawn.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::element::{embedded_elements, Category, Element, DEFAULT_ELECTRONEGATIVITY};

/// Errors raised while loading a catalog document.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("malformed catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("catalog contains no elements")]
    Empty,

    #[error("element '{symbol}' appears more than once")]
    DuplicateSymbol { symbol: String },

    #[error("invalid record for '{symbol}': {reason}")]
    InvalidRecord { symbol: String, reason: String },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    Wrapped { elements: Vec<ElementRecord> },
    Bare(Vec<ElementRecord>),
}

#[derive(Debug, Deserialize)]
struct ElementRecord {
    symbol: String,
    name: String,
    #[serde(alias = "number", alias = "atomicNumber")]
    atomic_number: u8,
    period: u8,
    #[serde(default)]
    group: Option<u8>,
    #[serde(default)]
    category: String,
    #[serde(
        default,
        alias = "electronegativity_pauling",
        alias = "electronegativityPauling"
    )]
    electronegativity: Option<f64>,
    #[serde(alias = "atomicMass")]
    atomic_mass: f64,
    #[serde(default, alias = "commonIonCharge", alias = "ionCharge")]
    common_ion_charge: Option<String>,
}

impl ElementRecord {
    fn into_element(self) -> Result<Element, CatalogError> {
        let invalid = |reason: &str| CatalogError::InvalidRecord {
            symbol: self.symbol.clone(),
            reason: reason.to_string(),
        };
        if self.symbol.is_empty() {
            return Err(invalid("empty symbol"));
        }
        if self.atomic_number == 0 {
            return Err(invalid("atomic number must be positive"));
        }
        if self.period == 0 {
            return Err(invalid("period must be positive"));
        }
        if !(self.atomic_mass.is_finite() && self.atomic_mass > 0.0) {
            return Err(invalid("atomic mass must be a positive number"));
        }
        let electronegativity = self
            .electronegativity
            .filter(|en| en.is_finite() && *en > 0.0)
            .unwrap_or(DEFAULT_ELECTRONEGATIVITY);
        Ok(Element {
            category: Category::from_label(&self.category),
            group: self.group.filter(|g| (1..=18).contains(g)),
            common_ion_charge: self.common_ion_charge.filter(|s| !s.trim().is_empty()),
            symbol: self.symbol,
            name: self.name,
            atomic_number: self.atomic_number,
            period: self.period,
            electronegativity,
            atomic_mass: self.atomic_mass,
        })
    }
}

/// Immutable element table, indexed by symbol.
#[derive(Debug, Clone)]
pub struct ElementCatalog {
    elements: Vec<Arc<Element>>,
    by_symbol: HashMap<String, usize>,
}

impl ElementCatalog {
    /// Build a catalog from already-constructed elements.
    pub fn from_elements(
        elements: impl IntoIterator<Item = Element>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self {
            elements: Vec::new(),
            by_symbol: HashMap::new(),
        };
        for element in elements {
            if catalog.by_symbol.contains_key(&element.symbol) {
                return Err(CatalogError::DuplicateSymbol {
                    symbol: element.symbol,
                });
            }
            catalog
                .by_symbol
                .insert(element.symbol.clone(), catalog.elements.len());
            catalog.elements.push(Arc::new(element));
        }
        if catalog.elements.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(catalog)
    }

    /// Parse a periodic-table JSON document.
    ///
    /// Both a bare array of records and an object with an `elements` array
    /// are accepted. Missing electronegativity defaults to 2.1.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let records = match serde_json::from_str::<CatalogDocument>(json)? {
            CatalogDocument::Wrapped { elements } => elements,
            CatalogDocument::Bare(elements) => elements,
        };
        let elements = records
            .into_iter()
            .map(ElementRecord::into_element)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_elements(elements)
    }

    /// Parse `json` if given, falling back to the embedded table when the
    /// document is absent or unusable.
    pub fn from_json_or_embedded(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(catalog)) => catalog,
            Some(Err(e)) => {
                log::warn!("element catalog unusable ({e}); using embedded table");
                Self::embedded()
            }
            None => Self::embedded(),
        }
    }

    /// The built-in fallback table.
    pub fn embedded() -> Self {
        let elements: Vec<Arc<Element>> = embedded_elements().map(Arc::new).collect();
        let by_symbol = elements
            .iter()
            .enumerate()
            .map(|(i, e)| (e.symbol.clone(), i))
            .collect();
        Self {
            elements,
            by_symbol,
        }
    }

    pub fn get(&self, symbol: &str) -> Option<&Arc<Element>> {
        self.by_symbol.get(symbol).map(|&i| &self.elements[i])
    }

    pub fn by_atomic_number(&self, z: u8) -> Option<&Arc<Element>> {
        self.elements.iter().find(|e| e.atomic_number == z)
    }

    /// Elements in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Element>> + '_ {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Default for ElementCatalog {
    fn default() -> Self {
        Self::embedded()
    }
}
