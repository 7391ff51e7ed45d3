use tracing::debug;

use super::cost::CostAnalyzer;
use crate::error::{PlantifyError, Result};
use crate::models::{Recipe, RecipeIngredient, SustainabilityScore};

/// A new recipe for `target_servings`; the source is left untouched.
///
/// Amounts and batch impact scale linearly, per-serving impact is unchanged, and
/// cost is re-derived with sub-linear labor. Instructions are carried over as written.
pub fn scale_recipe(
    recipe: &Recipe,
    target_servings: u32,
    analyzer: &CostAnalyzer,
) -> Result<Recipe> {
    if target_servings == 0 {
        return Err(PlantifyError::InvalidInput(
            "target servings must be at least 1".to_string(),
        ));
    }
    if recipe.yield_servings == 0 {
        return Err(PlantifyError::InvalidInput(
            "recipe has no servings to scale from".to_string(),
        ));
    }

    let factor = f64::from(target_servings) / f64::from(recipe.yield_servings);
    debug!(recipe = %recipe.id, from = recipe.yield_servings, to = target_servings, factor, "scaling recipe");

    let ingredients = recipe
        .ingredients
        .iter()
        .map(|line| RecipeIngredient {
            amount: line.amount * factor,
            ..line.clone()
        })
        .collect();

    let source = &recipe.sustainability;
    let sustainability = SustainabilityScore {
        total_co2_kg: source.total_co2_kg * factor,
        total_water_liters: source.total_water_liters * factor,
        total_land_m2: source.total_land_m2 * factor,
        ..source.clone()
    };

    let cost_analysis =
        analyzer.scale_cost_analysis(&recipe.cost_analysis, recipe.yield_servings, target_servings);

    let mut formulation_parameters = recipe.formulation_parameters.clone();
    formulation_parameters.yield_servings = Some(target_servings);

    Ok(Recipe {
        id: format!("{}_scaled_{}", recipe.id, target_servings),
        version: format!("{}_scaled", recipe.version),
        ingredients,
        yield_servings: target_servings,
        sustainability,
        cost_analysis,
        scaling_notes: format!(
            "Scaled from {} to {} servings (x{:.2}). Step timings are written for the original batch.",
            recipe.yield_servings, target_servings, factor
        ),
        formulation_parameters,
        ..recipe.clone()
    })
}
