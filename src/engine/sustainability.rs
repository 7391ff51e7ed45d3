use std::collections::BTreeMap;

use serde::Serialize;

use super::constants::{
    HIGH_LAND_PER_SERVING, HIGH_WATER_PER_SERVING, KG_CO2_PER_TREE_YEAR, KM_DRIVEN_PER_KG_CO2,
    LED_HOURS_PER_KG_CO2, PHONE_CHARGES_PER_KG_CO2, TOP_CONTRIBUTOR_SHARE, traditional_baseline,
};
use super::{resolve_lines, round_to};
use crate::models::{
    EnvironmentalImpact, RecipeIngredient, SustainabilityScore, TraditionalComparison,
};
use crate::repository::IngredientRepository;

/// Sum per-ingredient impact over a recipe and divide by servings.
///
/// `servings` must be positive; callers validate it before formulation.
pub fn recipe_impact(
    ingredients: &[RecipeIngredient],
    repository: &IngredientRepository,
    servings: u32,
) -> SustainabilityScore {
    let mut totals = EnvironmentalImpact::default();
    for (line, ingredient) in resolve_lines(ingredients, repository) {
        totals += ingredient.calculate_impact(line.amount_kg());
    }
    SustainabilityScore::from_totals(totals, servings)
}

/// Percent reduction of each per-serving metric against the dessert's traditional version.
pub fn compare_to_traditional(
    score: &SustainabilityScore,
    dessert_id: &str,
) -> TraditionalComparison {
    let baseline = traditional_baseline(dessert_id);
    let reduction = |traditional: f64, actual: f64| {
        round_to((traditional - actual) / traditional * 100.0, 1)
    };

    TraditionalComparison {
        co2_reduction_percent: reduction(baseline.co2_kg, score.co2_per_serving),
        water_reduction_percent: reduction(baseline.water_liters, score.water_per_serving),
        land_reduction_percent: reduction(baseline.land_m2, score.land_per_serving),
        traditional: baseline,
    }
}

/// Batch CO2 (kg) per ingredient name.
pub fn carbon_footprint_breakdown(
    ingredients: &[RecipeIngredient],
    repository: &IngredientRepository,
) -> BTreeMap<String, f64> {
    let mut breakdown = BTreeMap::new();
    for (line, ingredient) in resolve_lines(ingredients, repository) {
        *breakdown.entry(ingredient.name.clone()).or_insert(0.0) +=
            ingredient.calculate_impact(line.amount_kg()).co2_kg;
    }
    breakdown
}

/// Actionable advice for lowering the recipe's footprint.
pub fn recommendations(
    score: &SustainabilityScore,
    ingredients: &[RecipeIngredient],
    repository: &IngredientRepository,
) -> Vec<String> {
    let mut advice = Vec::new();

    let breakdown = carbon_footprint_breakdown(ingredients, repository);
    let total_co2: f64 = breakdown.values().sum();
    let top = breakdown
        .iter()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal));
    if let Some((name, co2)) = top {
        if total_co2 > 0.0 && co2 / total_co2 > TOP_CONTRIBUTOR_SHARE {
            advice.push(format!(
                "Consider reducing {} amount or finding lower-impact alternative ({:.2} kg CO₂, {:.0}% of total)",
                name,
                co2,
                co2 / total_co2 * 100.0
            ));
        }
    }

    if score.grade.is_poor() {
        advice.push(format!(
            "Current sustainability grade: {}. Consider using more local, seasonal ingredients.",
            score.grade
        ));
    }

    if score.water_per_serving > HIGH_WATER_PER_SERVING {
        advice.push(format!(
            "High water usage ({:.1}L per serving). Consider ingredients with lower water footprint.",
            score.water_per_serving
        ));
    }

    if score.land_per_serving > HIGH_LAND_PER_SERVING {
        advice.push(format!(
            "High land use ({:.2}m² per serving). Favor ingredients with efficient land use.",
            score.land_per_serving
        ));
    }

    if score.grade <= crate::models::SustainabilityGrade::B {
        advice.push(format!(
            "Excellent sustainability! Grade {}. This recipe has low environmental impact.",
            score.grade
        ));
    }

    advice
}

/// Everyday equivalents of an amount of CO2. Illustrative only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CarbonEquivalents {
    pub km_driven: f64,
    pub trees_needed_year: f64,
    pub smartphone_charges: f64,
    pub led_bulb_hours: f64,
}

pub fn carbon_equivalents(co2_kg: f64) -> CarbonEquivalents {
    CarbonEquivalents {
        km_driven: co2_kg * KM_DRIVEN_PER_KG_CO2,
        trees_needed_year: co2_kg / KG_CO2_PER_TREE_YEAR,
        smartphone_charges: co2_kg * PHONE_CHARGES_PER_KG_CO2,
        led_bulb_hours: co2_kg * LED_HOURS_PER_KG_CO2,
    }
}
