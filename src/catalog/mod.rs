pub mod instructions;
pub mod templates;

pub use instructions::{instructions_for, shelf_life_days, storage_instructions};

use std::collections::BTreeMap;

use crate::error::{PlantifyError, Result};
use crate::models::DessertTemplate;

/// Read-only set of dessert templates keyed by id.
#[derive(Debug, Clone)]
pub struct DessertCatalog {
    templates: BTreeMap<String, DessertTemplate>,
}

impl Default for DessertCatalog {
    fn default() -> Self {
        Self::new(templates::builtin_templates())
    }
}

impl DessertCatalog {
    pub fn new(templates: Vec<DessertTemplate>) -> Self {
        Self {
            templates: templates.into_iter().map(|t| (t.id.clone(), t)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&DessertTemplate> {
        self.templates.get(id)
    }

    /// Look up a template, failing with the list of supported ids.
    pub fn require(&self, id: &str) -> Result<&DessertTemplate> {
        self.get(id).ok_or_else(|| PlantifyError::UnsupportedDessert {
            requested: id.to_string(),
            available: self.ids().map(str::to_string).collect(),
        })
    }

    /// Ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DessertTemplate> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
