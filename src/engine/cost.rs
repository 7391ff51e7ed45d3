use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::constants::{
    BULK_PURCHASE_SAVINGS_PERCENT, COST_REVIEW_DEPTH, DEFAULT_LABOR_RATE, LABOR_SCALE_SEGMENTS,
    SIGNIFICANT_COST_SHARE_PERCENT,
};
use super::resolve_lines;
use crate::models::{Availability, CostAnalysis, Ingredient, RecipeIngredient};
use crate::repository::IngredientRepository;

/// Kind of food-service business, which fixes overhead and markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    #[default]
    Cafe,
    Restaurant,
    Canteen,
    Bakery,
}

impl OperationType {
    /// Overhead as a fraction of ingredient cost.
    pub fn overhead_multiplier(self) -> f64 {
        match self {
            OperationType::Cafe => 0.15,
            OperationType::Restaurant => 0.20,
            OperationType::Canteen => 0.10,
            OperationType::Bakery => 0.12,
        }
    }

    /// Retail price as a multiple of total cost per serving.
    pub fn markup(self) -> f64 {
        match self {
            OperationType::Cafe => 3.0,
            OperationType::Restaurant => 3.5,
            OperationType::Canteen => 1.5,
            OperationType::Bakery => 2.5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OperationType::Cafe => "cafe",
            OperationType::Restaurant => "restaurant",
            OperationType::Canteen => "canteen",
            OperationType::Bakery => "bakery",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cafe" => Ok(OperationType::Cafe),
            "restaurant" => Ok(OperationType::Restaurant),
            "canteen" => Ok(OperationType::Canteen),
            "bakery" => Ok(OperationType::Bakery),
            other => Err(format!("unknown operation type '{}'", other)),
        }
    }
}

/// How labor grows with batch size. Sub-linear above 1x.
pub fn labor_scale_factor(scale_factor: f64) -> f64 {
    if scale_factor <= 1.0 {
        return scale_factor;
    }

    let mut lower = 1.0;
    let mut value = 1.0;
    for (upper, slope) in LABOR_SCALE_SEGMENTS {
        if scale_factor <= upper {
            return value + (scale_factor - lower) * slope;
        }
        value += (upper - lower) * slope;
        lower = upper;
    }
    value
}

/// Outcome of a break-even calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakEven {
    /// Price does not exceed cost.
    Never,
    /// No fixed costs to recover.
    Immediate,
    Servings(u64),
}

impl BreakEven {
    /// Numeric form: -1 for never, 0 for immediate.
    pub fn as_count(self) -> i64 {
        match self {
            BreakEven::Never => -1,
            BreakEven::Immediate => 0,
            BreakEven::Servings(n) => i64::try_from(n).unwrap_or(i64::MAX),
        }
    }
}

impl fmt::Display for BreakEven {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreakEven::Never => f.write_str("never (price does not cover cost)"),
            BreakEven::Immediate => f.write_str("immediately (no fixed costs)"),
            BreakEven::Servings(n) => write!(f, "{} servings", n),
        }
    }
}

/// Servings needed to recover monthly fixed costs.
///
/// Volumes beyond `u64::MAX` saturate.
pub fn break_even_volume(cost_per_serving: f64, retail_price: f64, fixed_costs: f64) -> BreakEven {
    if retail_price <= cost_per_serving {
        return BreakEven::Never;
    }
    if fixed_costs == 0.0 {
        return BreakEven::Immediate;
    }
    let contribution_margin = retail_price - cost_per_serving;
    let covered = (fixed_costs / contribution_margin).floor() as u64;
    BreakEven::Servings(covered.saturating_add(1))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheaperAlternative {
    pub name: String,
    pub savings_percent: f64,
    pub cost_per_kg: f64,
}

/// A concrete way to lower ingredient spend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CostOpportunity {
    Substitute {
        ingredient: String,
        current_cost: f64,
        contribution_percent: f64,
        alternatives: Vec<CheaperAlternative>,
    },
    BulkPurchase {
        ingredient: String,
        current_cost: f64,
        contribution_percent: f64,
        potential_savings_percent: f64,
        note: String,
    },
}

/// Cost model for one kind of operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostAnalyzer {
    pub operation_type: OperationType,
    /// EUR per hour.
    pub labor_rate: f64,
}

impl Default for CostAnalyzer {
    fn default() -> Self {
        Self::new(OperationType::default(), DEFAULT_LABOR_RATE)
    }
}

impl CostAnalyzer {
    pub fn new(operation_type: OperationType, labor_rate: f64) -> Self {
        Self {
            operation_type,
            labor_rate,
        }
    }

    /// Fill in the per-serving economics from batch totals.
    fn finish(
        &self,
        ingredient_cost_total: f64,
        labor_cost_estimate: f64,
        servings: u32,
        cost_breakdown: BTreeMap<String, f64>,
    ) -> CostAnalysis {
        let n = f64::from(servings);
        let overhead_cost_estimate = ingredient_cost_total * self.operation_type.overhead_multiplier();
        let total_cost_per_serving =
            (ingredient_cost_total + labor_cost_estimate + overhead_cost_estimate) / n;
        let suggested_retail_price = total_cost_per_serving * self.operation_type.markup();
        let profit_margin_percent = if suggested_retail_price > 0.0 {
            (suggested_retail_price - total_cost_per_serving) / suggested_retail_price * 100.0
        } else {
            0.0
        };

        CostAnalysis {
            ingredient_cost_total,
            ingredient_cost_per_serving: ingredient_cost_total / n,
            labor_cost_estimate,
            overhead_cost_estimate,
            total_cost_per_serving,
            suggested_retail_price,
            profit_margin_percent,
            cost_breakdown,
        }
    }

    /// Full cost structure of a batch. `servings` must be positive.
    pub fn analyze_recipe_cost(
        &self,
        ingredients: &[RecipeIngredient],
        repository: &IngredientRepository,
        servings: u32,
        preparation_time_minutes: u32,
    ) -> CostAnalysis {
        let mut ingredient_cost_total = 0.0;
        let mut cost_breakdown = BTreeMap::new();

        for (line, ingredient) in resolve_lines(ingredients, repository) {
            let cost = ingredient.calculate_cost(line.amount_kg());
            ingredient_cost_total += cost;
            *cost_breakdown.entry(ingredient.name.clone()).or_insert(0.0) += cost;
        }

        let labor_cost_estimate = f64::from(preparation_time_minutes) / 60.0 * self.labor_rate;
        self.finish(ingredient_cost_total, labor_cost_estimate, servings, cost_breakdown)
    }

    /// Rescale an analysis to another batch size with sub-linear labor.
    pub fn scale_cost_analysis(
        &self,
        base: &CostAnalysis,
        base_servings: u32,
        target_servings: u32,
    ) -> CostAnalysis {
        let scale_factor = f64::from(target_servings) / f64::from(base_servings);
        let cost_breakdown = base
            .cost_breakdown
            .iter()
            .map(|(name, cost)| (name.clone(), cost * scale_factor))
            .collect();

        self.finish(
            base.ingredient_cost_total * scale_factor,
            base.labor_cost_estimate * labor_scale_factor(scale_factor),
            target_servings,
            cost_breakdown,
        )
    }

    /// Cheaper substitutes and bulk buys for the ingredients that dominate spend.
    pub fn find_cost_reduction_opportunities(
        &self,
        ingredients: &[RecipeIngredient],
        repository: &IngredientRepository,
        analysis: &CostAnalysis,
    ) -> Vec<CostOpportunity> {
        let by_name: BTreeMap<&str, &Ingredient> = resolve_lines(ingredients, repository)
            .map(|(_, ingredient)| (ingredient.name.as_str(), ingredient))
            .collect();

        let total: f64 = analysis.cost_breakdown.values().sum();
        if total <= 0.0 {
            return Vec::new();
        }

        let mut opportunities = Vec::new();
        for (name, cost) in analysis.ranked_breakdown().into_iter().take(COST_REVIEW_DEPTH) {
            let Some(ingredient) = by_name.get(name) else {
                continue;
            };

            let contribution_percent = cost / total * 100.0;
            if contribution_percent <= SIGNIFICANT_COST_SHARE_PERCENT {
                continue;
            }

            let alternatives: Vec<CheaperAlternative> = ingredient
                .substitutes
                .iter()
                .filter_map(|id| repository.get(id))
                .filter(|sub| sub.cost_per_kg_eur < ingredient.cost_per_kg_eur)
                .map(|sub| CheaperAlternative {
                    name: sub.name.clone(),
                    savings_percent: (ingredient.cost_per_kg_eur - sub.cost_per_kg_eur)
                        / ingredient.cost_per_kg_eur
                        * 100.0,
                    cost_per_kg: sub.cost_per_kg_eur,
                })
                .collect();

            if !alternatives.is_empty() {
                opportunities.push(CostOpportunity::Substitute {
                    ingredient: name.to_string(),
                    current_cost: cost,
                    contribution_percent,
                    alternatives,
                });
            }

            if ingredient.availability == Availability::Common {
                opportunities.push(CostOpportunity::BulkPurchase {
                    ingredient: name.to_string(),
                    current_cost: cost,
                    contribution_percent,
                    potential_savings_percent: BULK_PURCHASE_SAVINGS_PERCENT,
                    note: "Consider bulk purchasing for 10-15% savings".to_string(),
                });
            }
        }

        opportunities
    }

    /// Plain-text cost report for terminal output.
    pub fn cost_report(&self, analysis: &CostAnalysis, servings: u32) -> String {
        let mut lines = vec![
            "=== COST ANALYSIS REPORT ===".to_string(),
            format!("Batch Size: {} servings ({})", servings, self.operation_type),
            String::new(),
            "--- Ingredient Costs ---".to_string(),
            format!("Total: €{:.2}", analysis.ingredient_cost_total),
            format!("Per Serving: €{:.2}", analysis.ingredient_cost_per_serving),
            String::new(),
            "--- Top 5 Expensive Ingredients ---".to_string(),
        ];

        for (name, cost) in analysis.ranked_breakdown().into_iter().take(COST_REVIEW_DEPTH) {
            let percent = if analysis.ingredient_cost_total > 0.0 {
                cost / analysis.ingredient_cost_total * 100.0
            } else {
                0.0
            };
            lines.push(format!("  {}: €{:.2} ({:.1}%)", name, cost, percent));
        }

        lines.extend([
            String::new(),
            "--- Additional Costs ---".to_string(),
            format!("Labor: €{:.2}", analysis.labor_cost_estimate),
            format!("Overhead: €{:.2}", analysis.overhead_cost_estimate),
            String::new(),
            "--- Per Serving Economics ---".to_string(),
            format!("Total Cost: €{:.2}", analysis.total_cost_per_serving),
            format!("Suggested Price: €{:.2}", analysis.suggested_retail_price),
            format!("Profit Margin: {:.1}%", analysis.profit_margin_percent),
        ]);

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ingredient::tests::sample_ingredient;
    use crate::models::{FunctionalRole, Unit};
    use assert_float_eq::*;

    fn sample_repository() -> IngredientRepository {
        let mut cream = sample_ingredient("coconut_cream", &[FunctionalRole::MoistureRetention]);
        cream.name = "Coconut Cream".to_string();
        cream.cost_per_kg_eur = 6.5;
        cream.substitutes = vec!["soy_cream".to_string(), "cashew_cream".to_string()];

        let mut soy = sample_ingredient("soy_cream", &[FunctionalRole::MoistureRetention]);
        soy.name = "Soy Cooking Cream".to_string();
        soy.cost_per_kg_eur = 4.5;

        let mut cashew = sample_ingredient("cashew_cream", &[FunctionalRole::MoistureRetention]);
        cashew.name = "Cashew Cream".to_string();
        cashew.cost_per_kg_eur = 14.0;

        let mut sugar = sample_ingredient("cane_sugar", &[FunctionalRole::Sweetening]);
        sugar.name = "Organic Cane Sugar".to_string();
        sugar.cost_per_kg_eur = 1.8;

        let mut vanilla = sample_ingredient("vanilla_extract", &[FunctionalRole::FlavorCarrier]);
        vanilla.name = "Pure Vanilla Extract".to_string();
        vanilla.cost_per_kg_eur = 180.0;
        vanilla.availability = Availability::Specialty;

        IngredientRepository::new(vec![cream, soy, cashew, sugar, vanilla]).unwrap()
    }

    fn sample_lines() -> Vec<RecipeIngredient> {
        vec![
            RecipeIngredient::new("coconut_cream", "Coconut Cream", 400.0, Unit::Milliliter),
            RecipeIngredient::new("cane_sugar", "Organic Cane Sugar", 100.0, Unit::Gram),
            RecipeIngredient::new("vanilla_extract", "Pure Vanilla Extract", 10.0, Unit::Milliliter),
        ]
    }

    #[test]
    fn test_cost_identities() {
        let repo = sample_repository();
        let analyzer = CostAnalyzer::new(OperationType::Cafe, 20.0);
        let a = analyzer.analyze_recipe_cost(&sample_lines(), &repo, 6, 60);

        // 0.4 * 6.5 + 0.1 * 1.8 + 0.01 * 180
        assert_float_absolute_eq!(a.ingredient_cost_total, 4.58, 1e-9);
        assert_float_absolute_eq!(a.labor_cost_estimate, 20.0, 1e-9);
        assert_float_absolute_eq!(a.overhead_cost_estimate, 4.58 * 0.15, 1e-9);
        assert_float_absolute_eq!(
            a.total_cost_per_serving,
            (a.ingredient_cost_total + a.labor_cost_estimate + a.overhead_cost_estimate) / 6.0,
            1e-9
        );
        assert_float_absolute_eq!(a.suggested_retail_price, a.total_cost_per_serving * 3.0, 1e-9);
        assert_float_absolute_eq!(
            a.profit_margin_percent,
            (a.suggested_retail_price - a.total_cost_per_serving) / a.suggested_retail_price * 100.0,
            1e-9
        );
    }

    #[test]
    fn test_breakdown_accumulates_repeated_ingredients() {
        let repo = sample_repository();
        let mut lines = sample_lines();
        lines.push(RecipeIngredient::new("cane_sugar", "Organic Cane Sugar", 60.0, Unit::Gram));
        let a = CostAnalyzer::default().analyze_recipe_cost(&lines, &repo, 6, 60);
        assert_float_absolute_eq!(a.cost_breakdown["Organic Cane Sugar"], 0.16 * 1.8, 1e-9);
    }

    #[test]
    fn test_labor_scale_breakpoints() {
        assert_float_absolute_eq!(labor_scale_factor(0.5), 0.5, 1e-12);
        assert_float_absolute_eq!(labor_scale_factor(1.5), 1.4, 1e-12);
        assert_float_absolute_eq!(labor_scale_factor(2.0), 1.8, 1e-12);
        assert_float_absolute_eq!(labor_scale_factor(4.0), 3.0, 1e-12);
        assert_float_absolute_eq!(labor_scale_factor(5.0), 3.6, 1e-12);
        assert_float_absolute_eq!(labor_scale_factor(10.0), 5.6, 1e-12);
    }

    #[test]
    fn test_scale_six_to_fifty_servings_uses_batch_labor() {
        let repo = sample_repository();
        let analyzer = CostAnalyzer::default();
        let base = analyzer.analyze_recipe_cost(&sample_lines(), &repo, 6, 60);
        let scaled = analyzer.scale_cost_analysis(&base, 6, 50);

        let factor = 50.0 / 6.0;
        let labor_scale: f64 = 3.6 + (factor - 5.0) * 0.4;
        assert!((labor_scale - 4.933).abs() < 0.001);
        assert_float_absolute_eq!(scaled.labor_cost_estimate, 20.0 * labor_scale, 1e-9);
        assert_float_absolute_eq!(scaled.ingredient_cost_total, 4.58 * factor, 1e-9);
        assert!(scaled.total_cost_per_serving < base.total_cost_per_serving);
    }

    #[test]
    fn test_break_even_cases() {
        assert_eq!(break_even_volume(2.0, 5.0, 3000.0), BreakEven::Servings(1001));
        assert_eq!(break_even_volume(2.0, 5.0, 3000.0).as_count(), 1001);
        assert_eq!(break_even_volume(5.0, 5.0, 100.0), BreakEven::Never);
        assert_eq!(break_even_volume(5.0, 4.0, 100.0).as_count(), -1);
        assert_eq!(break_even_volume(2.0, 5.0, 0.0), BreakEven::Immediate);
    }

    #[test]
    fn test_break_even_saturates_for_tiny_margins() {
        let result = break_even_volume(0.0, 1e-300, 1e300);
        assert_eq!(result, BreakEven::Servings(u64::MAX));
        assert_eq!(result.as_count(), i64::MAX);
    }

    #[test]
    fn test_cost_reduction_opportunities() {
        let repo = sample_repository();
        let analyzer = CostAnalyzer::default();
        let lines = sample_lines();
        let analysis = analyzer.analyze_recipe_cost(&lines, &repo, 6, 60);
        let found = analyzer.find_cost_reduction_opportunities(&lines, &repo, &analysis);

        // vanilla (39%) is specialty with no substitutes; cream (57%) has one cheaper sub
        // and is common; sugar (4%) is below the threshold
        assert_eq!(found.len(), 2);
        match &found[0] {
            CostOpportunity::Substitute {
                ingredient,
                alternatives,
                ..
            } => {
                assert_eq!(ingredient, "Coconut Cream");
                assert_eq!(alternatives.len(), 1);
                assert_eq!(alternatives[0].name, "Soy Cooking Cream");
                assert!((alternatives[0].savings_percent - 2.0 / 6.5 * 100.0).abs() < 1e-9);
            }
            other => panic!("unexpected opportunity {:?}", other),
        }
        assert!(matches!(found[1], CostOpportunity::BulkPurchase { .. }));
    }

    #[test]
    fn test_cost_report_lists_top_ingredients() {
        let repo = sample_repository();
        let analyzer = CostAnalyzer::new(OperationType::Bakery, 18.0);
        let analysis = analyzer.analyze_recipe_cost(&sample_lines(), &repo, 6, 60);
        let report = analyzer.cost_report(&analysis, 6);
        assert!(report.contains("Batch Size: 6 servings (bakery)"));
        assert!(report.contains("  Coconut Cream: €2.60"));
        assert!(report.contains("Profit Margin: 60.0%"));
    }

    #[test]
    fn test_operation_type_tables() {
        assert_float_absolute_eq!(OperationType::Restaurant.markup(), 3.5, 1e-12);
        assert_float_absolute_eq!(OperationType::Canteen.overhead_multiplier(), 0.10, 1e-12);
        assert_eq!("BAKERY".parse::<OperationType>(), Ok(OperationType::Bakery));
    }
}
