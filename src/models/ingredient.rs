use std::collections::HashSet;
use std::fmt;
use std::ops::AddAssign;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PlantifyError, Result};

/// Primary culinary category of an ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngredientCategory {
    Fat,
    Protein,
    Emulsifier,
    Sweetener,
    Flour,
    Liquid,
    Leavening,
    Stabilizer,
    Flavoring,
}

impl IngredientCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            IngredientCategory::Fat => "fat",
            IngredientCategory::Protein => "protein",
            IngredientCategory::Emulsifier => "emulsifier",
            IngredientCategory::Sweetener => "sweetener",
            IngredientCategory::Flour => "flour",
            IngredientCategory::Liquid => "liquid",
            IngredientCategory::Leavening => "leavening",
            IngredientCategory::Stabilizer => "stabilizer",
            IngredientCategory::Flavoring => "flavoring",
        }
    }
}

impl fmt::Display for IngredientCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A capability an ingredient contributes to a dessert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionalRole {
    FatStructuring,
    Emulsification,
    Foaming,
    Binding,
    Browning,
    Sweetening,
    Thickening,
    MoistureRetention,
    FlavorCarrier,
    Crystallization,
}

impl FunctionalRole {
    pub const ALL: [FunctionalRole; 10] = [
        FunctionalRole::FatStructuring,
        FunctionalRole::Emulsification,
        FunctionalRole::Foaming,
        FunctionalRole::Binding,
        FunctionalRole::Browning,
        FunctionalRole::Sweetening,
        FunctionalRole::Thickening,
        FunctionalRole::MoistureRetention,
        FunctionalRole::FlavorCarrier,
        FunctionalRole::Crystallization,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FunctionalRole::FatStructuring => "fat_structuring",
            FunctionalRole::Emulsification => "emulsification",
            FunctionalRole::Foaming => "foaming",
            FunctionalRole::Binding => "binding",
            FunctionalRole::Browning => "browning",
            FunctionalRole::Sweetening => "sweetening",
            FunctionalRole::Thickening => "thickening",
            FunctionalRole::MoistureRetention => "moisture_retention",
            FunctionalRole::FlavorCarrier => "flavor_carrier",
            FunctionalRole::Crystallization => "crystallization",
        }
    }
}

impl fmt::Display for FunctionalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FunctionalRole {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        FunctionalRole::ALL
            .iter()
            .copied()
            .find(|role| role.as_str() == wanted)
            .ok_or_else(|| format!("unknown functional role '{}'", s))
    }
}

/// How easily a kitchen can source an ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    #[default]
    Common,
    Specialty,
    Rare,
}

impl Availability {
    pub fn as_str(self) -> &'static str {
        match self {
            Availability::Common => "common",
            Availability::Specialty => "specialty",
            Availability::Rare => "rare",
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Availability {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "common" => Ok(Availability::Common),
            "specialty" => Ok(Availability::Specialty),
            "rare" => Ok(Availability::Rare),
            other => Err(format!("unknown availability '{}'", other)),
        }
    }
}

/// A named dietary restriction on a formulation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietaryConstraint {
    Vegan,
    NutFree,
    SoyFree,
    GlutenFree,
    CoconutFree,
    SugarFree,
}

impl DietaryConstraint {
    pub const ALL: [DietaryConstraint; 6] = [
        DietaryConstraint::Vegan,
        DietaryConstraint::NutFree,
        DietaryConstraint::SoyFree,
        DietaryConstraint::GlutenFree,
        DietaryConstraint::CoconutFree,
        DietaryConstraint::SugarFree,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DietaryConstraint::Vegan => "vegan",
            DietaryConstraint::NutFree => "nut_free",
            DietaryConstraint::SoyFree => "soy_free",
            DietaryConstraint::GlutenFree => "gluten_free",
            DietaryConstraint::CoconutFree => "coconut_free",
            DietaryConstraint::SugarFree => "sugar_free",
        }
    }

    /// Allergen tags an ingredient must not carry to satisfy this constraint.
    ///
    /// Vegan and sugar-free never exclude by allergen: every ingredient is
    /// plant-based, and sugar-free is handled by sweetener substitution.
    pub fn blocked_allergens(self) -> &'static [&'static str] {
        match self {
            DietaryConstraint::NutFree => &[
                "almond",
                "cashew",
                "hazelnut",
                "walnut",
                "pecan",
                "pistachio",
            ],
            DietaryConstraint::SoyFree => &["soy"],
            DietaryConstraint::GlutenFree => &["wheat", "barley", "rye", "gluten"],
            DietaryConstraint::CoconutFree => &["coconut"],
            DietaryConstraint::Vegan | DietaryConstraint::SugarFree => &[],
        }
    }
}

impl fmt::Display for DietaryConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DietaryConstraint {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        DietaryConstraint::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| format!("unknown dietary constraint '{}'", s))
    }
}

/// Physical and chemical properties relevant to baking. Every value may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub melting_point_celsius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein_content_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fat_content_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_content_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ph: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viscosity_cps: Option<f64>,
    /// 0-1 scale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emulsifying_capacity: Option<f64>,
    /// 0-1 scale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foaming_capacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbohydrate_content_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sugar_content_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiber_content_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sodium_mg_per_100g: Option<f64>,
}

/// Environmental footprint per kilogram of ingredient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SustainabilityMetrics {
    pub co2_kg_per_kg: f64,
    pub water_liters_per_kg: f64,
    pub land_m2_per_kg: f64,
    #[serde(default)]
    pub source: String,
}

/// Absolute environmental impact of some quantity of ingredients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalImpact {
    pub co2_kg: f64,
    pub water_liters: f64,
    pub land_m2: f64,
}

impl AddAssign for EnvironmentalImpact {
    fn add_assign(&mut self, other: Self) {
        self.co2_kg += other.co2_kg;
        self.water_liters += other.water_liters;
        self.land_m2 += other.land_m2;
    }
}

/// A plant-based ingredient with functional, environmental, and cost data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    pub category: IngredientCategory,
    pub functional_roles: Vec<FunctionalRole>,
    #[serde(default)]
    pub properties: PhysicalProperties,
    pub sustainability: SustainabilityMetrics,
    pub cost_per_kg_eur: f64,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub availability: Availability,
    #[serde(default)]
    pub substitutes: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

impl Ingredient {
    /// Check the construction invariants: at least one role, no negative metrics.
    pub fn validate(&self) -> Result<()> {
        let fail = |reason: &str| {
            Err(PlantifyError::InvalidIngredient {
                id: self.id.clone(),
                reason: reason.to_string(),
            })
        };

        if self.id.trim().is_empty() {
            return fail("id must not be empty");
        }
        if self.functional_roles.is_empty() {
            return fail("at least one functional role required");
        }
        if self.cost_per_kg_eur < 0.0 {
            return fail("cost must be non-negative");
        }
        let metrics = &self.sustainability;
        if metrics.co2_kg_per_kg < 0.0
            || metrics.water_liters_per_kg < 0.0
            || metrics.land_m2_per_kg < 0.0
        {
            return fail("sustainability metrics must be non-negative");
        }
        Ok(())
    }

    #[inline]
    pub fn has_role(&self, role: FunctionalRole) -> bool {
        self.functional_roles.contains(&role)
    }

    /// Case-insensitive allergen check.
    pub fn has_allergen(&self, allergen: &str) -> bool {
        self.allergens
            .iter()
            .any(|a| a.eq_ignore_ascii_case(allergen))
    }

    /// True when none of the ingredient's allergens are blocked by the constraints.
    pub fn is_suitable_for_constraints(&self, constraints: &[DietaryConstraint]) -> bool {
        constraints.iter().all(|constraint| {
            constraint
                .blocked_allergens()
                .iter()
                .all(|allergen| !self.has_allergen(allergen))
        })
    }

    /// Number of functional roles this ingredient shares with `other`.
    pub fn role_overlap(&self, other: &Ingredient) -> usize {
        let mine: HashSet<FunctionalRole> = self.functional_roles.iter().copied().collect();
        other
            .functional_roles
            .iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .filter(|role| mine.contains(role))
            .count()
    }

    pub fn calculate_impact(&self, amount_kg: f64) -> EnvironmentalImpact {
        EnvironmentalImpact {
            co2_kg: self.sustainability.co2_kg_per_kg * amount_kg,
            water_liters: self.sustainability.water_liters_per_kg * amount_kg,
            land_m2: self.sustainability.land_m2_per_kg * amount_kg,
        }
    }

    pub fn calculate_cost(&self, amount_kg: f64) -> f64 {
        self.cost_per_kg_eur * amount_kg
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_ingredient(id: &str, roles: &[FunctionalRole]) -> Ingredient {
        Ingredient {
            id: id.to_string(),
            name: id.replace('_', " "),
            category: IngredientCategory::Fat,
            functional_roles: roles.to_vec(),
            properties: PhysicalProperties::default(),
            sustainability: SustainabilityMetrics {
                co2_kg_per_kg: 1.0,
                water_liters_per_kg: 500.0,
                land_m2_per_kg: 1.0,
                source: String::new(),
            },
            cost_per_kg_eur: 5.0,
            allergens: Vec::new(),
            availability: Availability::Common,
            substitutes: Vec::new(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_validate_rejects_empty_roles() {
        let ingredient = sample_ingredient("oil", &[]);
        assert!(matches!(
            ingredient.validate(),
            Err(PlantifyError::InvalidIngredient { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_negative_metrics() {
        let mut ingredient = sample_ingredient("oil", &[FunctionalRole::FatStructuring]);
        ingredient.sustainability.water_liters_per_kg = -1.0;
        assert!(ingredient.validate().is_err());

        let mut ingredient = sample_ingredient("oil", &[FunctionalRole::FatStructuring]);
        ingredient.cost_per_kg_eur = -0.5;
        assert!(ingredient.validate().is_err());
    }

    #[test]
    fn test_nut_free_blocks_tree_nuts() {
        let mut cashew = sample_ingredient("cashew_cream", &[FunctionalRole::Emulsification]);
        cashew.allergens = vec!["Cashew".to_string()];

        assert!(!cashew.is_suitable_for_constraints(&[DietaryConstraint::NutFree]));
        assert!(cashew.is_suitable_for_constraints(&[DietaryConstraint::SoyFree]));
        assert!(cashew.is_suitable_for_constraints(&[DietaryConstraint::Vegan]));
    }

    #[test]
    fn test_gluten_free_blocks_wheat() {
        let mut flour = sample_ingredient("all_purpose_flour", &[FunctionalRole::Binding]);
        flour.allergens = vec!["wheat".to_string(), "gluten".to_string()];

        assert!(!flour.is_suitable_for_constraints(&[
            DietaryConstraint::Vegan,
            DietaryConstraint::GlutenFree
        ]));
    }

    #[test]
    fn test_impact_is_linear_in_mass() {
        let oil = sample_ingredient("oil", &[FunctionalRole::FatStructuring]);
        let impact = oil.calculate_impact(0.5);
        assert!((impact.co2_kg - 0.5).abs() < 1e-9);
        assert!((impact.water_liters - 250.0).abs() < 1e-9);
        assert!((oil.calculate_cost(0.5) - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!(
            "moisture-retention".parse::<FunctionalRole>(),
            Ok(FunctionalRole::MoistureRetention)
        );
        assert!("levitation".parse::<FunctionalRole>().is_err());
        assert_eq!(
            "NUT_FREE".parse::<DietaryConstraint>(),
            Ok(DietaryConstraint::NutFree)
        );
    }
}
