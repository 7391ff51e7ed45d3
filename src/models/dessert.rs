use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::ingredient::FunctionalRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DessertCategory {
    Choux,
    Laminated,
    Tart,
    Layered,
    Macaron,
    Custard,
    Mousse,
    Cake,
}

impl fmt::Display for DessertCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DessertCategory::Choux => "choux",
            DessertCategory::Laminated => "laminated",
            DessertCategory::Tart => "tart",
            DessertCategory::Layered => "layered",
            DessertCategory::Macaron => "macaron",
            DessertCategory::Custard => "custard",
            DessertCategory::Mousse => "mousse",
            DessertCategory::Cake => "cake",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureProfile {
    Crispy,
    Flaky,
    Creamy,
    Airy,
    Smooth,
    Crunchy,
    Soft,
    Chewy,
}

impl fmt::Display for TextureProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TextureProfile::Crispy => "crispy",
            TextureProfile::Flaky => "flaky",
            TextureProfile::Creamy => "creamy",
            TextureProfile::Airy => "airy",
            TextureProfile::Smooth => "smooth",
            TextureProfile::Crunchy => "crunchy",
            TextureProfile::Soft => "soft",
            TextureProfile::Chewy => "chewy",
        };
        f.write_str(name)
    }
}

/// Technical difficulty for a professional kitchen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl DifficultyLevel {
    /// Points subtracted from the predicted success probability.
    pub fn success_penalty(self) -> f64 {
        match self {
            DifficultyLevel::Beginner => 0.0,
            DifficultyLevel::Intermediate => 5.0,
            DifficultyLevel::Advanced => 10.0,
            DifficultyLevel::Expert => 15.0,
        }
    }

    /// Starting point of the template complexity score.
    pub fn complexity_base(self) -> f64 {
        match self {
            DifficultyLevel::Beginner => 20.0,
            DifficultyLevel::Intermediate => 40.0,
            DifficultyLevel::Advanced => 60.0,
            DifficultyLevel::Expert => 80.0,
        }
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DifficultyLevel::Beginner => "beginner",
            DifficultyLevel::Intermediate => "intermediate",
            DifficultyLevel::Advanced => "advanced",
            DifficultyLevel::Expert => "expert",
        };
        f.write_str(name)
    }
}

/// Identifies which base-quantity table formulates a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    ChouxShell,
    PastryCreamFilling,
    ChocolateGlaze,
    CustardBase,
    CaramelizedSugarTop,
    LaminatedDough,
    TartShell,
    TartPastryCream,
    MacaronShell,
    MacaronFilling,
    MousseBase,
}

/// Inclusive `[min, max]` range for a critical property.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PropertyRange {
    pub min: f64,
    pub max: f64,
}

impl PropertyRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// A structural sub-part of a dessert (shell, filling, glaze, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRequirement {
    pub kind: ComponentKind,
    pub name: String,
    pub required_roles: Vec<FunctionalRole>,
    pub texture_targets: Vec<TextureProfile>,
    pub ratio_percent: f64,
    #[serde(default)]
    pub critical_properties: BTreeMap<String, PropertyRange>,
}

impl ComponentRequirement {
    /// Lists the critical properties whose measured value falls outside its range.
    ///
    /// Properties absent from `measured` are not reported.
    pub fn out_of_range(&self, measured: &BTreeMap<String, f64>) -> Vec<String> {
        self.critical_properties
            .iter()
            .filter_map(|(name, range)| {
                let value = *measured.get(name)?;
                (!range.contains(value)).then(|| {
                    format!(
                        "{} {:.1} outside range [{}, {}]",
                        name, value, range.min, range.max
                    )
                })
            })
            .collect()
    }
}

/// Static description of a dessert and its structural requirements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DessertTemplate {
    pub id: String,
    pub name: String,
    pub category: DessertCategory,
    pub components: Vec<ComponentRequirement>,
    pub difficulty: DifficultyLevel,
    pub typical_yield: u32,
    pub preparation_time_minutes: u32,
    pub baking_temp_celsius: Option<u32>,
    pub baking_time_minutes: Option<u32>,
    pub special_equipment: Vec<String>,
    pub critical_techniques: Vec<String>,
    pub common_failures: Vec<String>,
    pub success_indicators: Vec<String>,
    pub notes: String,
}

impl DessertTemplate {
    /// Every distinct role required by any component, in role order.
    pub fn all_required_roles(&self) -> BTreeSet<FunctionalRole> {
        self.components
            .iter()
            .flat_map(|c| c.required_roles.iter().copied())
            .collect()
    }

    pub fn requires_role(&self, role: FunctionalRole) -> bool {
        self.components
            .iter()
            .any(|c| c.required_roles.contains(&role))
    }

    /// Every distinct texture targeted by any component.
    pub fn texture_profile(&self) -> BTreeSet<TextureProfile> {
        self.components
            .iter()
            .flat_map(|c| c.texture_targets.iter().copied())
            .collect()
    }

    /// 0-100 complexity estimate from difficulty, component and technique counts.
    pub fn complexity_score(&self) -> f64 {
        let components = self.components.len() as f64 * 5.0;
        let techniques = self.critical_techniques.len() as f64 * 3.0;
        (self.difficulty.complexity_base() + components + techniques).min(100.0)
    }

    pub fn total_time_minutes(&self) -> u32 {
        self.preparation_time_minutes + self.baking_time_minutes.unwrap_or(0)
    }
}
