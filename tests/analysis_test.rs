use assert_float_eq::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use plantify_dessert_rs::catalog::DessertCatalog;
use plantify_dessert_rs::engine::matcher::priority_score;
use plantify_dessert_rs::engine::{
    BreakEven, CostAnalyzer, CostOpportunity, Formulator, IngredientMatcher, break_even_volume,
    simulate_recipe,
};
use plantify_dessert_rs::models::{
    DietaryConstraint, FormulationRequest, FunctionalRole, RecipeIngredient,
    SustainabilityPriority, Unit,
};
use plantify_dessert_rs::repository::{IngredientRepository, load_ingredients};

fn bundled() -> IngredientRepository {
    load_ingredients(concat!(env!("CARGO_MANIFEST_DIR"), "/data/ingredients_database.json"))
        .unwrap()
}

fn constraint_sets() -> Vec<Vec<DietaryConstraint>> {
    vec![
        vec![DietaryConstraint::Vegan],
        vec![DietaryConstraint::Vegan, DietaryConstraint::NutFree],
        vec![DietaryConstraint::SoyFree, DietaryConstraint::GlutenFree],
        vec![DietaryConstraint::CoconutFree, DietaryConstraint::NutFree],
    ]
}

#[test]
fn balanced_selection_minimizes_score() {
    let repo = bundled();
    let matcher = IngredientMatcher::new(&repo);

    for constraints in constraint_sets() {
        for role in FunctionalRole::ALL {
            let candidates = matcher.find_ingredients_by_role(role, &constraints, None);
            let Some(chosen) =
                matcher.select_for_role(role, &constraints, SustainabilityPriority::Balanced)
            else {
                assert!(candidates.is_empty());
                continue;
            };

            let chosen_score = priority_score(chosen, SustainabilityPriority::Balanced);
            let expected = chosen.sustainability.co2_kg_per_kg / 5.0
                + chosen.sustainability.water_liters_per_kg / 5000.0
                + chosen.cost_per_kg_eur / 20.0;
            assert_float_absolute_eq!(chosen_score, expected, 1e-12);

            for candidate in candidates {
                assert!(
                    chosen_score <= priority_score(candidate, SustainabilityPriority::Balanced),
                    "{} beats {} for {}",
                    candidate.id,
                    chosen.id,
                    role
                );
            }
        }
    }
}

#[test]
fn substitutes_never_include_the_original() {
    let repo = bundled();
    let matcher = IngredientMatcher::new(&repo);

    for constraints in constraint_sets() {
        for ingredient in repo.iter() {
            let subs = matcher.find_substitutes(&ingredient.id, &constraints);
            assert!(subs.iter().all(|s| s.id != ingredient.id));
            assert!(subs.iter().all(|s| s.is_suitable_for_constraints(&constraints)));
        }
    }
    assert!(matcher.find_substitutes("unobtainium", &[]).is_empty());
}

#[test]
fn multi_role_ingredients_carry_every_role() {
    let repo = bundled();
    let matcher = IngredientMatcher::new(&repo);

    let roles = [FunctionalRole::Emulsification, FunctionalRole::Thickening];
    let found = matcher.find_multi_role_ingredients(&roles, &[DietaryConstraint::Vegan]);
    assert!(!found.is_empty());
    assert!(found.iter().all(|i| roles.iter().all(|r| i.has_role(*r))));
    assert!(found
        .windows(2)
        .all(|w| w[0].functional_roles.len() >= w[1].functional_roles.len()));
}

#[test]
fn batch_labor_grows_sub_linearly() {
    let repo = bundled();
    let catalog = DessertCatalog::default();
    let formulator = Formulator::new(&repo, &catalog);
    let analyzer = CostAnalyzer::default();

    let recipe = formulator
        .formulate(&FormulationRequest::new("mousse").with_servings(6))
        .unwrap();
    let base = &recipe.cost_analysis;
    let scaled = analyzer.scale_cost_analysis(base, 6, 50);

    let factor = 50.0 / 6.0;
    let labor_factor = 3.6 + (factor - 5.0) * 0.4;
    assert_float_absolute_eq!(labor_factor, 4.9333, 1e-3);
    assert_float_relative_eq!(
        scaled.labor_cost_estimate,
        base.labor_cost_estimate * labor_factor,
        1e-9
    );
    assert_float_relative_eq!(
        scaled.ingredient_cost_total,
        base.ingredient_cost_total * factor,
        1e-9
    );
    assert!(scaled.total_cost_per_serving < base.total_cost_per_serving);
}

#[test]
fn break_even_volumes() {
    assert_eq!(break_even_volume(2.0, 5.0, 3000.0), BreakEven::Servings(1001));
    assert_eq!(break_even_volume(5.0, 5.0, 3000.0), BreakEven::Never);
    assert_eq!(break_even_volume(2.0, 5.0, 0.0), BreakEven::Immediate);
    assert_eq!(break_even_volume(2.0, 5.0, 3000.0).as_count(), 1001);
    assert_eq!(BreakEven::Never.as_count(), -1);
    assert_eq!(break_even_volume(0.0, 1e-300, 1e300), BreakEven::Servings(u64::MAX));
}

#[test]
fn cost_opportunities_target_significant_spend() {
    let repo = bundled();
    let catalog = DessertCatalog::default();
    let formulator = Formulator::new(&repo, &catalog);

    let recipe = formulator.formulate(&FormulationRequest::new("eclair")).unwrap();
    let opportunities = formulator.cost_analyzer().find_cost_reduction_opportunities(
        &recipe.ingredients,
        &repo,
        &recipe.cost_analysis,
    );

    for opportunity in &opportunities {
        match opportunity {
            CostOpportunity::Substitute {
                contribution_percent,
                alternatives,
                ..
            } => {
                assert!(*contribution_percent > 15.0);
                assert!(alternatives.iter().all(|a| a.savings_percent > 0.0));
            }
            CostOpportunity::BulkPurchase {
                contribution_percent,
                potential_savings_percent,
                ..
            } => {
                assert!(*contribution_percent > 15.0);
                assert_float_absolute_eq!(*potential_savings_percent, 15.0, 1e-12);
            }
        }
    }
}

#[test]
fn simulator_scores_stay_in_range() {
    let repo = bundled();
    let catalog = DessertCatalog::default();
    let ids: Vec<String> = repo.iter().map(|i| i.id.clone()).collect();
    let units = [Unit::Gram, Unit::Milliliter, Unit::Tablespoon, Unit::Piece];
    let mut rng = StdRng::seed_from_u64(7);

    for template in catalog.iter() {
        for _ in 0..50 {
            let count = rng.gen_range(1..=8);
            let lines: Vec<RecipeIngredient> = ids
                .choose_multiple(&mut rng, count)
                .map(|id| {
                    let amount = rng.gen_range(1.0..500.0);
                    let unit = *units.choose(&mut rng).unwrap();
                    RecipeIngredient::new(id, id, amount, unit)
                })
                .collect();

            let analysis = simulate_recipe(&lines, &repo, template);
            assert!((0.0..=100.0).contains(&analysis.stability_score));
            assert!((0.0..=100.0).contains(&analysis.success_probability));
        }
    }
}
