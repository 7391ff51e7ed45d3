use std::collections::HashMap;
use std::sync::LazyLock;

use crate::models::EnvironmentalImpact;

// ─────────────────────────────────────────────────────────────────────────────
// Ingredient selection
// ─────────────────────────────────────────────────────────────────────────────

/// Balanced priority divides CO2 (kg/kg) by this before summing.
pub const BALANCED_CO2_NORM: f64 = 5.0;

/// Balanced priority divides water (L/kg) by this before summing.
pub const BALANCED_WATER_NORM: f64 = 5000.0;

/// Balanced priority divides cost (EUR/kg) by this before summing.
pub const BALANCED_COST_NORM: f64 = 20.0;

/// Ranking multiplier for common-availability ingredients.
pub const COMMON_AVAILABILITY_BONUS: f64 = 1.1;

/// Viscosity (cps) that earns a full thickening score.
pub const THICKENING_FULL_VISCOSITY: f64 = 10_000.0;

/// Protein % that earns a binding score of 1.0.
pub const BINDING_REFERENCE_PROTEIN: f64 = 20.0;

/// Share of the original's roles a role-based substitute must also carry.
pub const SUBSTITUTE_ROLE_OVERLAP: f64 = 0.6;

/// CO2 (kg/kg) below which a selection rationale notes low impact.
pub const LOW_IMPACT_CO2: f64 = 2.0;

// ─────────────────────────────────────────────────────────────────────────────
// Formulation
// ─────────────────────────────────────────────────────────────────────────────

/// Erythritol needed per gram of sugar for the same sweetness.
pub const ERYTHRITOL_SWEETNESS_RATIO: f64 = 1.3;

/// Base grams of an otherwise uncovered role's ingredient, at reference yield.
pub const ACCENT_PORTION_GRAMS: f64 = 5.0;

pub const SCALING_NOTE: &str = "Recipe can be scaled linearly up to 5x";

pub const RECIPE_VERSION: &str = "1.0";

// ─────────────────────────────────────────────────────────────────────────────
// Sustainability
// ─────────────────────────────────────────────────────────────────────────────

/// Traditional baseline used when a dessert has no specific entry.
pub const FALLBACK_BASELINE: EnvironmentalImpact = EnvironmentalImpact {
    co2_kg: 0.40,
    water_liters: 80.0,
    land_m2: 0.17,
};

/// Per-serving impact of the conventional (dairy and egg) version of a dessert.
pub static TRADITIONAL_BASELINES: LazyLock<HashMap<&'static str, EnvironmentalImpact>> =
    LazyLock::new(|| {
        let mut m = HashMap::new();
        m.insert(
            "eclair",
            EnvironmentalImpact {
                co2_kg: 0.45,
                water_liters: 85.0,
                land_m2: 0.18,
            },
        );
        m.insert(
            "creme_brulee",
            EnvironmentalImpact {
                co2_kg: 0.52,
                water_liters: 95.0,
                land_m2: 0.22,
            },
        );
        m.insert(
            "croissant",
            EnvironmentalImpact {
                co2_kg: 0.38,
                water_liters: 75.0,
                land_m2: 0.15,
            },
        );
        m.insert(
            "macaron",
            EnvironmentalImpact {
                co2_kg: 0.35,
                water_liters: 70.0,
                land_m2: 0.14,
            },
        );
        m
    });

/// Get the traditional baseline for a dessert id.
pub fn traditional_baseline(dessert_id: &str) -> EnvironmentalImpact {
    TRADITIONAL_BASELINES
        .get(dessert_id)
        .copied()
        .unwrap_or(FALLBACK_BASELINE)
}

/// Share of total CO2 above which the top contributor is called out.
pub const TOP_CONTRIBUTOR_SHARE: f64 = 0.3;

/// Liters of water per serving considered high.
pub const HIGH_WATER_PER_SERVING: f64 = 50.0;

/// Square meters of land per serving considered high.
pub const HIGH_LAND_PER_SERVING: f64 = 0.15;

pub const KM_DRIVEN_PER_KG_CO2: f64 = 5.5;
pub const KG_CO2_PER_TREE_YEAR: f64 = 21.0;
pub const PHONE_CHARGES_PER_KG_CO2: f64 = 121.0;
pub const LED_HOURS_PER_KG_CO2: f64 = 1000.0;

// ─────────────────────────────────────────────────────────────────────────────
// Cost
// ─────────────────────────────────────────────────────────────────────────────

/// Default hourly labor rate in EUR.
pub const DEFAULT_LABOR_RATE: f64 = 20.0;

/// Share of ingredient cost an ingredient must exceed to be worth optimizing.
pub const SIGNIFICANT_COST_SHARE_PERCENT: f64 = 15.0;

/// How many of the costliest ingredients are inspected for savings.
pub const COST_REVIEW_DEPTH: usize = 5;

/// Savings assumed achievable by buying a common ingredient in bulk.
pub const BULK_PURCHASE_SAVINGS_PERCENT: f64 = 15.0;

/// Labor grows slower than batch size: (upper bound of segment, slope).
/// Below 1.0 the factor is returned unchanged.
pub const LABOR_SCALE_SEGMENTS: [(f64, f64); 3] = [(2.0, 0.8), (5.0, 0.6), (f64::INFINITY, 0.4)];

// ─────────────────────────────────────────────────────────────────────────────
// Predictive simulator
// ─────────────────────────────────────────────────────────────────────────────

pub const BASE_STABILITY: f64 = 50.0;
pub const BASE_SUCCESS: f64 = 60.0;

/// Weight of stability above/below the base when computing success.
pub const STABILITY_SUCCESS_WEIGHT: f64 = 0.4;

/// Maximum success points from functional-role coverage.
pub const COVERAGE_SUCCESS_POINTS: f64 = 20.0;

/// Stability below this raises a warning.
pub const LOW_STABILITY: f64 = 40.0;

/// Success below this suggests a test batch.
pub const TEST_BATCH_SUCCESS: f64 = 70.0;

/// Success at or above this earns a positive note.
pub const EXCELLENT_SUCCESS: f64 = 85.0;

/// Water % above which sogginess is likely.
pub const HIGH_WATER_PERCENT: f64 = 70.0;

/// Choux needs at least this water % to puff.
pub const CHOUX_MIN_WATER_PERCENT: f64 = 45.0;

// ─────────────────────────────────────────────────────────────────────────────
// Nutrition
// ─────────────────────────────────────────────────────────────────────────────

pub const KCAL_PER_G_FAT: f64 = 9.0;
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
pub const KCAL_PER_G_CARBOHYDRATE: f64 = 4.0;
