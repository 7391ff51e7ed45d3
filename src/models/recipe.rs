use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ingredient::{EnvironmentalImpact, FunctionalRole};
use super::request::FormulationRequest;

/// Measurement unit of a recipe line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "ml")]
    Milliliter,
    #[serde(rename = "l")]
    Liter,
    #[serde(rename = "tsp")]
    Teaspoon,
    #[serde(rename = "tbsp")]
    Tablespoon,
    #[serde(rename = "cup")]
    Cup,
    #[serde(rename = "piece")]
    Piece,
}

impl Unit {
    /// Kilograms per one unit. Volumes assume a density of 1 g/ml.
    pub fn kg_factor(self) -> f64 {
        match self {
            Unit::Gram => 0.001,
            Unit::Kilogram => 1.0,
            Unit::Milliliter => 0.001,
            Unit::Liter => 1.0,
            Unit::Teaspoon => 0.005,
            Unit::Tablespoon => 0.015,
            Unit::Cup => 0.240,
            Unit::Piece => 0.050,
        }
    }

    #[inline]
    pub fn to_kg(self, amount: f64) -> f64 {
        amount * self.kg_factor()
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Gram => "g",
            Unit::Kilogram => "kg",
            Unit::Milliliter => "ml",
            Unit::Liter => "l",
            Unit::Teaspoon => "tsp",
            Unit::Tablespoon => "tbsp",
            Unit::Cup => "cup",
            Unit::Piece => "piece",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "g" | "gram" => Ok(Unit::Gram),
            "kg" | "kilogram" => Ok(Unit::Kilogram),
            "ml" | "milliliter" => Ok(Unit::Milliliter),
            "l" | "liter" => Ok(Unit::Liter),
            "tsp" | "teaspoon" => Ok(Unit::Teaspoon),
            "tbsp" | "tablespoon" => Ok(Unit::Tablespoon),
            "cup" => Ok(Unit::Cup),
            "piece" => Ok(Unit::Piece),
            other => Err(format!("unknown unit '{}'", other)),
        }
    }
}

/// One ingredient line of a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub ingredient_id: String,
    pub ingredient_name: String,
    pub amount: f64,
    pub unit: Unit,
    #[serde(default)]
    pub preparation_notes: String,
}

impl RecipeIngredient {
    pub fn new(id: &str, name: &str, amount: f64, unit: Unit) -> Self {
        Self {
            ingredient_id: id.to_string(),
            ingredient_name: name.to_string(),
            amount,
            unit,
            preparation_notes: String::new(),
        }
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.preparation_notes = notes.to_string();
        self
    }

    #[inline]
    pub fn amount_kg(&self) -> f64 {
        self.unit.to_kg(self.amount)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeStep {
    pub step_number: u32,
    pub instruction: String,
    pub duration_minutes: Option<u32>,
    pub temperature_celsius: Option<u32>,
    pub critical: bool,
    #[serde(default)]
    pub tips: Vec<String>,
}

/// Letter grade derived from CO2 per serving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SustainabilityGrade {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl SustainabilityGrade {
    pub fn from_co2_per_serving(co2: f64) -> Self {
        if co2 < 0.5 {
            SustainabilityGrade::A
        } else if co2 < 1.0 {
            SustainabilityGrade::B
        } else if co2 < 2.0 {
            SustainabilityGrade::C
        } else if co2 < 3.0 {
            SustainabilityGrade::D
        } else if co2 < 5.0 {
            SustainabilityGrade::E
        } else {
            SustainabilityGrade::F
        }
    }

    pub fn is_poor(self) -> bool {
        self >= SustainabilityGrade::D
    }
}

impl fmt::Display for SustainabilityGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            SustainabilityGrade::A => "A",
            SustainabilityGrade::B => "B",
            SustainabilityGrade::C => "C",
            SustainabilityGrade::D => "D",
            SustainabilityGrade::E => "E",
            SustainabilityGrade::F => "F",
        };
        f.write_str(letter)
    }
}

/// Reduction of a plant-based recipe against a traditional baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraditionalComparison {
    pub co2_reduction_percent: f64,
    pub water_reduction_percent: f64,
    pub land_reduction_percent: f64,
    pub traditional: EnvironmentalImpact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SustainabilityScore {
    pub total_co2_kg: f64,
    pub total_water_liters: f64,
    pub total_land_m2: f64,
    pub co2_per_serving: f64,
    pub water_per_serving: f64,
    pub land_per_serving: f64,
    pub grade: SustainabilityGrade,
    pub comparison_to_traditional: Option<TraditionalComparison>,
}

impl SustainabilityScore {
    /// Build a score from batch totals. `servings` must be positive.
    pub fn from_totals(totals: EnvironmentalImpact, servings: u32) -> Self {
        let n = f64::from(servings);
        let co2_per_serving = totals.co2_kg / n;
        Self {
            total_co2_kg: totals.co2_kg,
            total_water_liters: totals.water_liters,
            total_land_m2: totals.land_m2,
            co2_per_serving,
            water_per_serving: totals.water_liters / n,
            land_per_serving: totals.land_m2 / n,
            grade: SustainabilityGrade::from_co2_per_serving(co2_per_serving),
            comparison_to_traditional: None,
        }
    }

    pub fn per_serving(&self) -> EnvironmentalImpact {
        EnvironmentalImpact {
            co2_kg: self.co2_per_serving,
            water_liters: self.water_per_serving,
            land_m2: self.land_per_serving,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostAnalysis {
    pub ingredient_cost_total: f64,
    pub ingredient_cost_per_serving: f64,
    pub labor_cost_estimate: f64,
    pub overhead_cost_estimate: f64,
    pub total_cost_per_serving: f64,
    pub suggested_retail_price: f64,
    pub profit_margin_percent: f64,
    /// Ingredient name to batch cost in EUR.
    pub cost_breakdown: BTreeMap<String, f64>,
}

impl CostAnalysis {
    #[inline]
    pub fn is_within_budget(&self, budget_per_serving: f64) -> bool {
        self.total_cost_per_serving <= budget_per_serving
    }

    /// Breakdown entries sorted by cost, most expensive first.
    pub fn ranked_breakdown(&self) -> Vec<(&str, f64)> {
        let mut entries: Vec<(&str, f64)> = self
            .cost_breakdown
            .iter()
            .map(|(name, cost)| (name.as_str(), *cost))
            .collect();
        entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        entries
    }
}

/// Nutrition per serving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionalInfo {
    pub calories: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub carbohydrates_g: f64,
    pub fiber_g: f64,
    pub sugar_g: f64,
    pub sodium_mg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictiveAnalysis {
    pub success_probability: f64,
    /// Component name to predicted texture.
    pub texture_prediction: BTreeMap<String, String>,
    pub stability_score: f64,
    pub risk_warnings: Vec<String>,
    pub optimization_suggestions: Vec<String>,
    /// Critical template properties the aggregate formulation misses.
    #[serde(default)]
    pub property_deviations: Vec<String>,
}

/// Which ingredient filled a required role, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleSelection {
    pub role: FunctionalRole,
    pub ingredient_id: String,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSummary {
    pub name: String,
    pub selections: Vec<RoleSelection>,
    pub ingredient_ids: Vec<String>,
}

/// A formulated plant-based dessert with all four analyses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub dessert_id: String,
    pub dessert_name: String,
    pub version: String,
    pub ingredients: Vec<RecipeIngredient>,
    pub components: Vec<ComponentSummary>,
    pub instructions: Vec<RecipeStep>,
    pub yield_servings: u32,
    pub preparation_time_minutes: u32,
    pub baking_time_minutes: Option<u32>,
    pub total_time_minutes: u32,
    pub sustainability: SustainabilityScore,
    pub cost_analysis: CostAnalysis,
    pub nutritional_info: NutritionalInfo,
    pub predictive_analysis: PredictiveAnalysis,
    pub dietary_labels: Vec<String>,
    pub allergen_warnings: Vec<String>,
    pub storage_instructions: String,
    pub shelf_life_days: u32,
    pub scaling_notes: String,
    pub formulation_parameters: FormulationRequest,
}

impl Recipe {
    pub fn ingredient_ids(&self) -> impl Iterator<Item = &str> {
        self.ingredients.iter().map(|i| i.ingredient_id.as_str())
    }

    pub fn critical_steps(&self) -> impl Iterator<Item = &RecipeStep> {
        self.instructions.iter().filter(|s| s.critical)
    }
}
