use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ingredient::DietaryConstraint;
use crate::error::{PlantifyError, Result};

/// Criterion used to pick one ingredient among role-eligible candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SustainabilityPriority {
    LowCo2,
    LowWater,
    LowCost,
    #[default]
    Balanced,
}

impl SustainabilityPriority {
    pub const ALL: [SustainabilityPriority; 4] = [
        SustainabilityPriority::LowCo2,
        SustainabilityPriority::LowWater,
        SustainabilityPriority::LowCost,
        SustainabilityPriority::Balanced,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SustainabilityPriority::LowCo2 => "low_co2",
            SustainabilityPriority::LowWater => "low_water",
            SustainabilityPriority::LowCost => "low_cost",
            SustainabilityPriority::Balanced => "balanced",
        }
    }
}

impl fmt::Display for SustainabilityPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SustainabilityPriority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        SustainabilityPriority::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| format!("unknown sustainability priority '{}'", s))
    }
}

fn default_constraints() -> Vec<DietaryConstraint> {
    vec![DietaryConstraint::Vegan]
}

fn default_budget() -> f64 {
    DEFAULT_BUDGET_PER_UNIT
}

/// Budget ceiling per serving (EUR) when a request names none.
pub const DEFAULT_BUDGET_PER_UNIT: f64 = 5.0;

/// A high-level request to formulate one dessert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulationRequest {
    pub dessert_type: String,
    #[serde(default = "default_constraints")]
    pub dietary_constraints: Vec<DietaryConstraint>,
    #[serde(default = "default_budget")]
    pub budget_per_unit: f64,
    #[serde(default)]
    pub sustainability_priority: SustainabilityPriority,
    /// Falls back to the template's typical yield when absent.
    #[serde(default)]
    pub yield_servings: Option<u32>,
}

impl FormulationRequest {
    pub fn new(dessert_type: &str) -> Self {
        Self {
            dessert_type: dessert_type.to_string(),
            dietary_constraints: default_constraints(),
            budget_per_unit: DEFAULT_BUDGET_PER_UNIT,
            sustainability_priority: SustainabilityPriority::default(),
            yield_servings: None,
        }
    }

    pub fn with_constraints(mut self, constraints: Vec<DietaryConstraint>) -> Self {
        self.dietary_constraints = constraints;
        self
    }

    pub fn with_budget(mut self, budget_per_unit: f64) -> Self {
        self.budget_per_unit = budget_per_unit;
        self
    }

    pub fn with_priority(mut self, priority: SustainabilityPriority) -> Self {
        self.sustainability_priority = priority;
        self
    }

    pub fn with_servings(mut self, servings: u32) -> Self {
        self.yield_servings = Some(servings);
        self
    }

    #[inline]
    pub fn has_constraint(&self, constraint: DietaryConstraint) -> bool {
        self.dietary_constraints.contains(&constraint)
    }

    /// Reject requests that cannot be formulated regardless of the dessert.
    pub fn validate(&self) -> Result<()> {
        if self.dessert_type.trim().is_empty() {
            return Err(PlantifyError::MissingField("dessert_type"));
        }
        if self.yield_servings == Some(0) {
            return Err(PlantifyError::InvalidInput(
                "yield_servings must be at least 1".to_string(),
            ));
        }
        if !self.budget_per_unit.is_finite() || self.budget_per_unit < 0.0 {
            return Err(PlantifyError::InvalidInput(format!(
                "budget_per_unit must be a non-negative number, got {}",
                self.budget_per_unit
            )));
        }
        Ok(())
    }

    /// Stable four-digit fingerprint of the request, used in recipe ids.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.dessert_type.hash(&mut hasher);
        self.dietary_constraints.hash(&mut hasher);
        self.budget_per_unit.to_bits().hash(&mut hasher);
        self.sustainability_priority.hash(&mut hasher);
        self.yield_servings.hash(&mut hasher);
        hasher.finish() % 10_000
    }
}
