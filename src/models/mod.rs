pub mod dessert;
pub mod ingredient;
pub mod recipe;
pub mod request;

pub use dessert::{
    ComponentKind, ComponentRequirement, DessertCategory, DessertTemplate, DifficultyLevel,
    PropertyRange, TextureProfile,
};
pub use ingredient::{
    Availability, DietaryConstraint, EnvironmentalImpact, FunctionalRole, Ingredient,
    IngredientCategory, PhysicalProperties, SustainabilityMetrics,
};
pub use recipe::{
    ComponentSummary, CostAnalysis, NutritionalInfo, PredictiveAnalysis, Recipe,
    RecipeIngredient, RecipeStep, RoleSelection, SustainabilityGrade, SustainabilityScore,
    TraditionalComparison, Unit,
};
pub use request::{FormulationRequest, SustainabilityPriority, DEFAULT_BUDGET_PER_UNIT};
