use crate::models::{DietaryConstraint, RecipeIngredient};

/// Hook for bringing an over-budget ingredient list under the per-serving ceiling.
///
/// Invoked only when a formulation exceeds its budget; cost is recomputed afterwards.
pub trait BudgetOptimizer {
    fn optimize(
        &self,
        ingredients: Vec<RecipeIngredient>,
        budget_per_unit: f64,
        servings: u32,
        constraints: &[DietaryConstraint],
    ) -> Vec<RecipeIngredient>;
}

/// Leaves the ingredient list untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughOptimizer;

impl BudgetOptimizer for PassthroughOptimizer {
    fn optimize(
        &self,
        ingredients: Vec<RecipeIngredient>,
        _budget_per_unit: f64,
        _servings: u32,
        _constraints: &[DietaryConstraint],
    ) -> Vec<RecipeIngredient> {
        ingredients
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Unit;

    #[test]
    fn test_passthrough_keeps_lines() {
        let lines = vec![
            RecipeIngredient::new("aquafaba", "Aquafaba", 120.0, Unit::Milliliter),
            RecipeIngredient::new("cane_sugar", "Organic Cane Sugar", 80.0, Unit::Gram),
        ];
        let optimized =
            PassthroughOptimizer.optimize(lines.clone(), 0.5, 12, &[DietaryConstraint::Vegan]);
        assert_eq!(optimized, lines);
    }
}
