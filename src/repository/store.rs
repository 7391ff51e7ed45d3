use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{PlantifyError, Result};
use crate::models::Ingredient;

/// On-disk shape of the ingredient database.
#[derive(Debug, Deserialize)]
pub(crate) struct IngredientDocument {
    pub ingredients: Vec<Ingredient>,
}

/// Read-only store of every known ingredient.
///
/// Iteration is in id order, so any tie-break that depends on encounter
/// order is reproducible across runs.
#[derive(Debug, Clone, Default)]
pub struct IngredientRepository {
    /// All ingredients keyed by id.
    ingredients: BTreeMap<String, Ingredient>,
}

impl IngredientRepository {
    /// Build a repository, validating each ingredient and rejecting duplicate ids.
    pub fn new(ingredients: Vec<Ingredient>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for ingredient in ingredients {
            ingredient.validate()?;
            if map.contains_key(&ingredient.id) {
                return Err(PlantifyError::InvalidIngredient {
                    id: ingredient.id,
                    reason: "duplicate id".to_string(),
                });
            }
            map.insert(ingredient.id.clone(), ingredient);
        }
        Ok(Self { ingredients: map })
    }

    /// Parse a `{ "ingredients": [...] }` document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: IngredientDocument = serde_json::from_str(json)?;
        Self::new(document.ingredients)
    }

    pub fn get(&self, id: &str) -> Option<&Ingredient> {
        self.ingredients.get(id)
    }

    /// Like [`get`](Self::get) but fails with `UnknownIngredient`.
    pub fn require(&self, id: &str) -> Result<&Ingredient> {
        self.get(id)
            .ok_or_else(|| PlantifyError::UnknownIngredient(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ingredients.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ingredient> {
        self.ingredients.values()
    }

    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }

    /// Case-insensitive lookup by id or display name.
    pub fn find_by_name(&self, name: &str) -> Option<&Ingredient> {
        let wanted = name.trim().to_lowercase();
        self.get(&wanted).or_else(|| {
            self.iter()
                .find(|i| i.name.to_lowercase() == wanted || i.id == wanted.replace(' ', "_"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_DB: &str = r#"{
        "ingredients": [
            {
                "id": "aquafaba", "name": "Aquafaba", "category": "liquid",
                "functional_roles": ["foaming", "emulsification"],
                "properties": {"foaming_capacity": 0.85},
                "sustainability": {"co2_kg_per_kg": 0.3, "water_liters_per_kg": 50, "land_m2_per_kg": 0.2, "source": "estimate"},
                "cost_per_kg_eur": 2.0, "allergens": [], "availability": "common",
                "substitutes": [], "notes": ""
            },
            {
                "id": "cornstarch", "name": "Cornstarch", "category": "stabilizer",
                "functional_roles": ["thickening"],
                "sustainability": {"co2_kg_per_kg": 0.7, "water_liters_per_kg": 350, "land_m2_per_kg": 0.9},
                "cost_per_kg_eur": 2.2
            }
        ]
    }"#;

    #[test]
    fn test_from_json_applies_defaults() {
        let repo = IngredientRepository::from_json_str(SMALL_DB).unwrap();
        assert_eq!(repo.len(), 2);

        let starch = repo.get("cornstarch").unwrap();
        assert!(starch.allergens.is_empty());
        assert_eq!(starch.properties.viscosity_cps, None);
        assert!(starch.substitutes.is_empty());
    }

    #[test]
    fn test_iteration_is_id_ordered() {
        let repo = IngredientRepository::from_json_str(SMALL_DB).unwrap();
        let ids: Vec<&str> = repo.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["aquafaba", "cornstarch"]);
    }

    #[test]
    fn test_empty_roles_rejected() {
        let json = SMALL_DB.replace(r#"["thickening"]"#, "[]");
        let result = IngredientRepository::from_json_str(&json);
        assert!(matches!(result, Err(PlantifyError::InvalidIngredient { .. })));
    }

    #[test]
    fn test_unknown_role_rejected() {
        let json = SMALL_DB.replace(r#"["thickening"]"#, r#"["levitation"]"#);
        assert!(matches!(
            IngredientRepository::from_json_str(&json),
            Err(PlantifyError::Json(_))
        ));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let json = SMALL_DB.replace(r#""id": "cornstarch""#, r#""id": "aquafaba""#);
        assert!(IngredientRepository::from_json_str(&json).is_err());
    }

    #[test]
    fn test_require_and_find_by_name() {
        let repo = IngredientRepository::from_json_str(SMALL_DB).unwrap();
        assert!(matches!(
            repo.require("tofu"),
            Err(PlantifyError::UnknownIngredient(_))
        ));
        assert_eq!(repo.find_by_name("AQUAFABA").map(|i| i.id.as_str()), Some("aquafaba"));
        assert!(repo.contains("cornstarch"));
    }
}
