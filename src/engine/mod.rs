pub mod budget;
pub mod constants;
pub mod cost;
pub mod formulation;
pub mod matcher;
pub mod nutrition;
pub mod portions;
pub mod scaling;
pub mod simulator;
pub mod sustainability;

pub use budget::{BudgetOptimizer, PassthroughOptimizer};
pub use cost::{BreakEven, CostAnalyzer, CostOpportunity, OperationType, break_even_volume};
pub use formulation::Formulator;
pub use matcher::IngredientMatcher;
pub use nutrition::calculate_nutrition;
pub use scaling::scale_recipe;
pub use simulator::simulate_recipe;
pub use sustainability::{carbon_equivalents, compare_to_traditional, recipe_impact};

use tracing::warn;

use crate::models::{Ingredient, RecipeIngredient};
use crate::repository::IngredientRepository;

/// Pair each recipe line with its ingredient, skipping ids the repository lacks.
pub(crate) fn resolve_lines<'a>(
    ingredients: &'a [RecipeIngredient],
    repository: &'a IngredientRepository,
) -> impl Iterator<Item = (&'a RecipeIngredient, &'a Ingredient)> {
    ingredients.iter().filter_map(move |line| {
        let ingredient = repository.get(&line.ingredient_id);
        if ingredient.is_none() {
            warn!(id = %line.ingredient_id, "recipe line references unknown ingredient");
        }
        ingredient.map(|ingredient| (line, ingredient))
    })
}

pub(crate) fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
