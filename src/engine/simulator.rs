use std::collections::{BTreeMap, BTreeSet};

use super::constants::{
    BASE_STABILITY, BASE_SUCCESS, CHOUX_MIN_WATER_PERCENT, COVERAGE_SUCCESS_POINTS,
    EXCELLENT_SUCCESS, HIGH_WATER_PERCENT, LOW_STABILITY, STABILITY_SUCCESS_WEIGHT,
    TEST_BATCH_SUCCESS,
};
use super::resolve_lines;
use crate::models::{
    DessertTemplate, FunctionalRole, PredictiveAnalysis, RecipeIngredient, TextureProfile,
};
use crate::repository::IngredientRepository;

/// Whole-recipe composition used by the heuristics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeProperties {
    pub total_weight_kg: f64,
    pub fat_percent: f64,
    pub protein_percent: f64,
    pub water_percent: f64,
    /// Distinct ids of ingredients carrying each functional role. An ingredient
    /// named on several lines (e.g. in two components) counts once.
    pub emulsifiers: BTreeSet<String>,
    pub aerators: BTreeSet<String>,
    pub thickeners: BTreeSet<String>,
}

impl RecipeProperties {
    /// Roles among emulsification, foaming and thickening the recipe actually carries.
    pub fn functional_roles_present(&self) -> BTreeSet<FunctionalRole> {
        let mut present = BTreeSet::new();
        if !self.emulsifiers.is_empty() {
            present.insert(FunctionalRole::Emulsification);
        }
        if !self.aerators.is_empty() {
            present.insert(FunctionalRole::Foaming);
        }
        if !self.thickeners.is_empty() {
            present.insert(FunctionalRole::Thickening);
        }
        present
    }

    fn measured(&self) -> BTreeMap<String, f64> {
        BTreeMap::from([
            ("fat_content".to_string(), self.fat_percent),
            ("protein_content".to_string(), self.protein_percent),
            ("water_content".to_string(), self.water_percent),
        ])
    }
}

/// Aggregate weight, weighted fat/protein/water percentages and functional carriers.
pub fn recipe_properties(
    ingredients: &[RecipeIngredient],
    repository: &IngredientRepository,
) -> RecipeProperties {
    let mut props = RecipeProperties::default();
    let mut fat = 0.0;
    let mut protein = 0.0;
    let mut water = 0.0;

    for (line, ingredient) in resolve_lines(ingredients, repository) {
        let kg = line.amount_kg();
        let composition = &ingredient.properties;
        props.total_weight_kg += kg;
        fat += kg * composition.fat_content_percent.unwrap_or(0.0) / 100.0;
        protein += kg * composition.protein_content_percent.unwrap_or(0.0) / 100.0;
        water += kg * composition.water_content_percent.unwrap_or(0.0) / 100.0;

        if ingredient.has_role(FunctionalRole::Emulsification) {
            props.emulsifiers.insert(ingredient.id.clone());
        }
        if ingredient.has_role(FunctionalRole::Foaming) {
            props.aerators.insert(ingredient.id.clone());
        }
        if ingredient.has_role(FunctionalRole::Thickening) {
            props.thickeners.insert(ingredient.id.clone());
        }
    }

    if props.total_weight_kg > 0.0 {
        props.fat_percent = fat / props.total_weight_kg * 100.0;
        props.protein_percent = protein / props.total_weight_kg * 100.0;
        props.water_percent = water / props.total_weight_kg * 100.0;
    }
    props
}

/// Predicted texture per component, keyed by component name.
pub fn predict_textures(
    template: &DessertTemplate,
    props: &RecipeProperties,
) -> BTreeMap<String, String> {
    template
        .components
        .iter()
        .map(|component| {
            let name = component.name.to_lowercase();
            let fat_in_choux_range = (15.0..=25.0).contains(&props.fat_percent);
            let has_thickener = !props.thickeners.is_empty();

            let texture = if name.contains("choux") || name.contains("shell") {
                match (fat_in_choux_range, props.water_percent >= 50.0) {
                    (true, true) => "crispy and airy",
                    (true, false) => "crispy but dense",
                    (false, _) => "may not puff properly",
                }
            } else if name.contains("cream") || name.contains("custard") {
                match (has_thickener, props.fat_percent >= 10.0) {
                    (true, true) => "smooth and creamy",
                    (true, false) => "smooth but light",
                    (false, _) => "may be too thin",
                }
            } else if name.contains("glaze") {
                if props.fat_percent >= 30.0 {
                    "glossy and smooth"
                } else {
                    "may be dull"
                }
            } else if name.contains("sugar") || name.contains("caramel") {
                "crunchy"
            } else if component.texture_targets.contains(&TextureProfile::Creamy) {
                "creamy"
            } else if component.texture_targets.contains(&TextureProfile::Crispy) {
                "crispy"
            } else {
                "as expected"
            };

            (component.name.clone(), texture.to_string())
        })
        .collect()
}

/// Formulation robustness, 0-100.
pub fn stability_score(props: &RecipeProperties, template: &DessertTemplate) -> f64 {
    let mut score = BASE_STABILITY;

    if !props.emulsifiers.is_empty() {
        score += 15.0;
        if props.emulsifiers.len() > 1 {
            score += 5.0;
        }
    } else if template.requires_role(FunctionalRole::Emulsification) {
        score -= 20.0;
    }

    if !props.thickeners.is_empty() {
        score += 10.0;
    }
    if !props.aerators.is_empty() {
        score += 10.0;
    }

    let fat = props.fat_percent;
    if (10.0..=40.0).contains(&fat) {
        score += 10.0;
    } else if fat < 5.0 {
        score -= 10.0;
    } else if fat > 50.0 {
        score -= 5.0;
    }

    if (3.0..=15.0).contains(&props.protein_percent) {
        score += 5.0;
    }

    score.clamp(0.0, 100.0)
}

/// Estimated chance of success, 0-100.
pub fn success_probability(
    props: &RecipeProperties,
    template: &DessertTemplate,
    stability: f64,
) -> f64 {
    let required = template.all_required_roles();
    let covered = props
        .functional_roles_present()
        .intersection(&required)
        .count();
    let coverage_ratio = covered as f64 / required.len().max(1) as f64;

    let probability = BASE_SUCCESS + (stability - BASE_STABILITY) * STABILITY_SUCCESS_WEIGHT
        + coverage_ratio * COVERAGE_SUCCESS_POINTS
        - template.difficulty.success_penalty();

    probability.clamp(0.0, 100.0)
}

pub fn risk_warnings(
    props: &RecipeProperties,
    template: &DessertTemplate,
    stability: f64,
) -> Vec<String> {
    let mut warnings = Vec::new();

    if stability < LOW_STABILITY {
        warnings.push(
            "LOW STABILITY: Formulation may be unstable. Consider adding stabilizers or emulsifiers."
                .to_string(),
        );
    }

    if props.fat_percent < 5.0 {
        warnings.push(
            "Very low fat content may result in dry texture and poor mouthfeel.".to_string(),
        );
    } else if props.fat_percent > 50.0 {
        warnings.push(
            "Very high fat content may result in greasy texture and separation issues."
                .to_string(),
        );
    }

    if props.water_percent > HIGH_WATER_PERCENT {
        warnings.push(
            "High water content may cause sogginess. Ensure proper baking/setting time."
                .to_string(),
        );
    }

    if props.emulsifiers.is_empty() && template.requires_role(FunctionalRole::Emulsification) {
        warnings.push("No emulsifier detected. May have separation issues.".to_string());
    }

    if props.thickeners.is_empty() && template.requires_role(FunctionalRole::Thickening) {
        warnings.push("No thickener detected. Mixture may be too thin.".to_string());
    }

    if template.id == "eclair" && props.water_percent < CHOUX_MIN_WATER_PERCENT {
        warnings.push(
            "Choux pastry needs sufficient moisture for steam. May not puff properly."
                .to_string(),
        );
    }

    warnings
}

pub fn optimization_suggestions(props: &RecipeProperties, success: f64) -> Vec<String> {
    let mut suggestions = Vec::new();

    if success < TEST_BATCH_SUCCESS {
        suggestions.push(
            "Consider testing a small batch first before scaling up production.".to_string(),
        );
    }
    if props.fat_percent < 10.0 {
        suggestions
            .push("Increase fat content slightly for better texture and mouthfeel.".to_string());
    }
    if props.protein_percent < 2.0 {
        suggestions
            .push("Consider adding protein-rich ingredient for better structure.".to_string());
    }
    if props.emulsifiers.is_empty() {
        suggestions.push("Add emulsifier (e.g., lecithin) for better stability.".to_string());
    }
    if success >= EXCELLENT_SUCCESS {
        suggestions.push("Excellent formulation! High probability of success.".to_string());
    }

    suggestions
}

/// Critical template ranges missed by the recipe-wide composition, per component.
pub fn property_deviations(props: &RecipeProperties, template: &DessertTemplate) -> Vec<String> {
    let measured = props.measured();
    template
        .components
        .iter()
        .flat_map(|component| {
            component
                .out_of_range(&measured)
                .into_iter()
                .map(move |issue| format!("{}: {}", component.name, issue))
        })
        .collect()
}

/// Run every heuristic over a recipe.
pub fn simulate_recipe(
    ingredients: &[RecipeIngredient],
    repository: &IngredientRepository,
    template: &DessertTemplate,
) -> PredictiveAnalysis {
    let props = recipe_properties(ingredients, repository);
    let stability = stability_score(&props, template);
    let success = success_probability(&props, template, stability);

    PredictiveAnalysis {
        success_probability: success,
        texture_prediction: predict_textures(template, &props),
        stability_score: stability,
        risk_warnings: risk_warnings(&props, template, stability),
        optimization_suggestions: optimization_suggestions(&props, success),
        property_deviations: property_deviations(&props, template),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::templates::{creme_brulee_template, eclair_template, mousse_template};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn sample_props(fat: f64, protein: f64, water: f64) -> RecipeProperties {
        RecipeProperties {
            total_weight_kg: 1.0,
            fat_percent: fat,
            protein_percent: protein,
            water_percent: water,
            ..Default::default()
        }
    }

    fn ids(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_stability_with_full_functional_set() {
        let mut props = sample_props(20.0, 5.0, 55.0);
        props.emulsifiers = ids(&["aquafaba", "coconut_cream"]);
        props.thickeners = ids(&["cornstarch"]);
        props.aerators = ids(&["aquafaba"]);
        // 50 + 15 + 5 + 10 + 10 + 10 + 5
        assert!((stability_score(&props, &eclair_template()) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_stability_penalizes_missing_emulsifier() {
        let props = sample_props(3.0, 1.0, 80.0);
        // 50 - 20 - 10
        assert!((stability_score(&props, &eclair_template()) - 20.0).abs() < 1e-9);
        let warnings = risk_warnings(&props, &eclair_template(), 20.0);
        assert!(warnings[0].starts_with("LOW STABILITY"));
        assert!(warnings.iter().any(|w| w.starts_with("No emulsifier detected")));
        assert!(warnings.iter().any(|w| w.starts_with("No thickener detected")));
        assert!(warnings.iter().any(|w| w.starts_with("High water content")));
    }

    #[test]
    fn test_success_uses_coverage_and_difficulty() {
        let mut props = sample_props(20.0, 5.0, 55.0);
        props.emulsifiers = ids(&["aquafaba"]);
        props.thickeners = ids(&["cornstarch"]);
        let template = creme_brulee_template();
        // custard roles: thickening, emulsification, binding, flavor_carrier,
        // crystallization, browning -> 2 of 6 covered
        let success = success_probability(&props, &template, 80.0);
        let expected = 60.0 + 30.0 * 0.4 + (2.0 / 6.0) * 20.0 - 5.0;
        assert!((success - expected).abs() < 1e-9);
    }

    #[test]
    fn test_texture_rules_by_component_name() {
        let mut props = sample_props(20.0, 5.0, 55.0);
        props.thickeners = ids(&["cornstarch"]);
        let textures = predict_textures(&eclair_template(), &props);
        assert_eq!(textures["Choux Pastry Shell"], "crispy and airy");
        assert_eq!(textures["Pastry Cream Filling"], "smooth and creamy");
        assert_eq!(textures["Chocolate Glaze"], "may be dull");

        let brulee = predict_textures(&creme_brulee_template(), &props);
        assert_eq!(brulee["Caramelized Sugar Top"], "crunchy");

        let mousse = predict_textures(&mousse_template(), &props);
        assert_eq!(mousse["Mousse Base"], "creamy");
    }

    #[test]
    fn test_eclair_dry_choux_warning() {
        let props = sample_props(20.0, 5.0, 30.0);
        let warnings = risk_warnings(&props, &eclair_template(), 60.0);
        assert!(warnings.iter().any(|w| w.starts_with("Choux pastry needs")));
    }

    #[test]
    fn test_suggestions() {
        let props = sample_props(8.0, 1.0, 50.0);
        let low = optimization_suggestions(&props, 50.0);
        assert_eq!(low.len(), 4);

        let mut good = sample_props(20.0, 5.0, 50.0);
        good.emulsifiers = ids(&["soy_lecithin"]);
        let high = optimization_suggestions(&good, 90.0);
        assert_eq!(high, vec!["Excellent formulation! High probability of success."]);
    }

    #[test]
    fn test_property_deviations_name_component() {
        let props = sample_props(20.0, 5.0, 55.0);
        let deviations = property_deviations(&props, &eclair_template());
        // shell protein 8-12, glaze fat 30-40, filling fat 8-15
        assert!(deviations.iter().any(|d| d.starts_with("Choux Pastry Shell: protein_content")));
        assert!(deviations.iter().any(|d| d.starts_with("Chocolate Glaze: fat_content")));
        assert!(deviations.iter().any(|d| d.starts_with("Pastry Cream Filling: fat_content")));
    }

    #[test]
    fn test_repeated_ingredient_counts_once() {
        use crate::models::Unit;
        use crate::models::ingredient::tests::sample_ingredient;

        let repo = IngredientRepository::new(vec![
            sample_ingredient(
                "aquafaba",
                &[FunctionalRole::Emulsification, FunctionalRole::Foaming],
            ),
            sample_ingredient("cornstarch", &[FunctionalRole::Thickening]),
        ])
        .unwrap();
        let lines = vec![
            RecipeIngredient::new("aquafaba", "Aquafaba", 200.0, Unit::Milliliter),
            RecipeIngredient::new("cornstarch", "Cornstarch", 30.0, Unit::Gram),
            RecipeIngredient::new("aquafaba", "Aquafaba", 5.0, Unit::Gram),
        ];

        let props = recipe_properties(&lines, &repo);
        assert_eq!(props.emulsifiers, ids(&["aquafaba"]));
        assert_eq!(props.aerators, ids(&["aquafaba"]));

        // one emulsifier: +15 only, no bonus for a second line of the same one
        let single = stability_score(&props, &eclair_template());
        let mut two = props.clone();
        two.emulsifiers.insert("soy_lecithin".to_string());
        assert!((stability_score(&two, &eclair_template()) - single - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_scores_stay_bounded_for_random_compositions() {
        let mut rng = StdRng::seed_from_u64(7);
        let templates = [eclair_template(), creme_brulee_template(), mousse_template()];

        for _ in 0..500 {
            let mut props = sample_props(
                rng.gen_range(0.0..120.0),
                rng.gen_range(0.0..100.0),
                rng.gen_range(0.0..100.0),
            );
            for (set, id) in [
                (&mut props.emulsifiers, "e"),
                (&mut props.aerators, "a"),
                (&mut props.thickeners, "t"),
            ] {
                for i in 0..rng.gen_range(0..3) {
                    set.insert(format!("{}{}", id, i));
                }
            }

            for template in &templates {
                let stability = stability_score(&props, template);
                let success = success_probability(&props, template, stability);
                assert!((0.0..=100.0).contains(&stability));
                assert!((0.0..=100.0).contains(&success));
            }
        }
    }
}
