use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use tracing::trace;

use super::constants::{
    BALANCED_CO2_NORM, BALANCED_COST_NORM, BALANCED_WATER_NORM, BINDING_REFERENCE_PROTEIN,
    COMMON_AVAILABILITY_BONUS, LOW_IMPACT_CO2, SUBSTITUTE_ROLE_OVERLAP,
    THICKENING_FULL_VISCOSITY,
};
use crate::models::{
    Availability, DietaryConstraint, FunctionalRole, Ingredient, SustainabilityPriority,
};
use crate::repository::IngredientRepository;

/// Zero counts as "no data", the same as an absent value.
#[inline]
fn measured(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

/// How well an ingredient is expected to perform a role. Higher is better.
pub fn performance_score(ingredient: &Ingredient, role: FunctionalRole) -> f64 {
    let props = &ingredient.properties;
    let score = match role {
        FunctionalRole::Emulsification => measured(props.emulsifying_capacity),
        FunctionalRole::Foaming => measured(props.foaming_capacity),
        FunctionalRole::FatStructuring => measured(props.fat_content_percent).map(|f| f / 100.0),
        FunctionalRole::Thickening => measured(props.viscosity_cps)
            .map(|v| (v / THICKENING_FULL_VISCOSITY).min(1.0)),
        FunctionalRole::Binding => {
            measured(props.protein_content_percent).map(|p| p / BINDING_REFERENCE_PROTEIN)
        }
        _ => None,
    }
    .unwrap_or(1.0);

    if ingredient.availability == Availability::Common {
        score * COMMON_AVAILABILITY_BONUS
    } else {
        score
    }
}

/// The quantity a sustainability priority minimizes.
pub fn priority_score(ingredient: &Ingredient, priority: SustainabilityPriority) -> f64 {
    let metrics = &ingredient.sustainability;
    match priority {
        SustainabilityPriority::LowCo2 => metrics.co2_kg_per_kg,
        SustainabilityPriority::LowWater => metrics.water_liters_per_kg,
        SustainabilityPriority::LowCost => ingredient.cost_per_kg_eur,
        SustainabilityPriority::Balanced => {
            metrics.co2_kg_per_kg / BALANCED_CO2_NORM
                + metrics.water_liters_per_kg / BALANCED_WATER_NORM
                + ingredient.cost_per_kg_eur / BALANCED_COST_NORM
        }
    }
}

/// Pick the candidate minimizing the priority score. Ties keep the earliest candidate.
pub fn select_best<'a>(
    candidates: &[&'a Ingredient],
    priority: SustainabilityPriority,
) -> Option<&'a Ingredient> {
    candidates.iter().copied().min_by(|a, b| {
        priority_score(a, priority)
            .partial_cmp(&priority_score(b, priority))
            .unwrap_or(Ordering::Equal)
    })
}

/// Human-readable reason an ingredient fills a role.
pub fn explain_choice(ingredient: &Ingredient, role: FunctionalRole) -> String {
    let name = &ingredient.name;
    let props = &ingredient.properties;

    let mut explanation = match role {
        FunctionalRole::FatStructuring => format!(
            "{} provides fat structuring with {:.1}% fat content",
            name,
            props.fat_content_percent.unwrap_or(0.0)
        ),
        FunctionalRole::Emulsification => format!(
            "{} acts as emulsifier, binding water and fat phases together",
            name
        ),
        FunctionalRole::Foaming => format!(
            "{} creates foam and aeration, essential for light texture",
            name
        ),
        FunctionalRole::Binding => format!(
            "{} provides binding and structure through protein content",
            name
        ),
        FunctionalRole::Thickening => format!(
            "{} thickens the mixture, creating desired consistency",
            name
        ),
        FunctionalRole::Browning => format!(
            "{} enables Maillard reaction and caramelization for color and flavor",
            name
        ),
        FunctionalRole::Sweetening => format!("{} provides sweetness and affects texture", name),
        FunctionalRole::MoistureRetention => format!(
            "{} retains moisture, extending shelf life and maintaining texture",
            name
        ),
        FunctionalRole::FlavorCarrier => format!("{} carries and enhances flavors", name),
        FunctionalRole::Crystallization => format!(
            "{} controls crystallization for proper texture development",
            name
        ),
    };

    let mut details = Vec::new();
    if let Some(melting) = measured(props.melting_point_celsius) {
        details.push(format!("melting point {}°C", melting));
    }
    if role == FunctionalRole::Emulsification {
        if let Some(capacity) = measured(props.emulsifying_capacity) {
            details.push(format!("emulsifying capacity {:.0}%", capacity * 100.0));
        }
    }
    if role == FunctionalRole::Foaming {
        if let Some(capacity) = measured(props.foaming_capacity) {
            details.push(format!("foaming capacity {:.0}%", capacity * 100.0));
        }
    }
    if !details.is_empty() {
        explanation.push_str(&format!(" ({})", details.join(", ")));
    }

    if ingredient.sustainability.co2_kg_per_kg < LOW_IMPACT_CO2 {
        explanation.push_str(". Low environmental impact.");
    }

    explanation
}

/// Role-based search over the ingredient repository.
pub struct IngredientMatcher<'a> {
    repository: &'a IngredientRepository,
    /// Role to ingredient ids, in repository (id) order.
    role_index: HashMap<FunctionalRole, Vec<&'a str>>,
}

impl<'a> IngredientMatcher<'a> {
    pub fn new(repository: &'a IngredientRepository) -> Self {
        let mut role_index: HashMap<FunctionalRole, Vec<&'a str>> = HashMap::new();
        for ingredient in repository.iter() {
            for role in &ingredient.functional_roles {
                let ids = role_index.entry(*role).or_default();
                if !ids.contains(&ingredient.id.as_str()) {
                    ids.push(ingredient.id.as_str());
                }
            }
        }
        Self {
            repository,
            role_index,
        }
    }

    pub fn repository(&self) -> &'a IngredientRepository {
        self.repository
    }

    /// Ingredients carrying `role` that satisfy every constraint, best performers first.
    pub fn find_ingredients_by_role(
        &self,
        role: FunctionalRole,
        constraints: &[DietaryConstraint],
        availability: Option<Availability>,
    ) -> Vec<&'a Ingredient> {
        let mut candidates: Vec<&'a Ingredient> = self
            .role_index
            .get(&role)
            .into_iter()
            .flatten()
            .filter_map(|id| self.repository.get(id))
            .filter(|ingredient| ingredient.is_suitable_for_constraints(constraints))
            .filter(|ingredient| availability.is_none_or(|tier| ingredient.availability == tier))
            .collect();

        candidates.sort_by(|a, b| {
            performance_score(b, role)
                .partial_cmp(&performance_score(a, role))
                .unwrap_or(Ordering::Equal)
        });

        trace!(role = %role, count = candidates.len(), "ranked role candidates");
        candidates
    }

    /// Explicit substitutes first, then ingredients sharing most of the original's roles.
    ///
    /// Never contains the original. Unknown ids yield an empty list.
    pub fn find_substitutes(
        &self,
        ingredient_id: &str,
        constraints: &[DietaryConstraint],
    ) -> Vec<&'a Ingredient> {
        let Some(original) = self.repository.get(ingredient_id) else {
            return Vec::new();
        };

        let required_overlap =
            (original.functional_roles.len() as f64 * SUBSTITUTE_ROLE_OVERLAP).ceil() as usize;

        let explicit = original
            .substitutes
            .iter()
            .filter_map(|id| self.repository.get(id))
            .filter(|sub| sub.is_suitable_for_constraints(constraints));

        let role_based = original.functional_roles.iter().flat_map(move |role| {
            self.find_ingredients_by_role(*role, constraints, None)
                .into_iter()
                .filter(move |candidate| candidate.role_overlap(original) >= required_overlap)
        });

        let mut seen: HashSet<String> = HashSet::new();
        explicit
            .chain(role_based)
            .filter(|sub| sub.id != original.id)
            .filter(|sub| seen.insert(sub.id.clone()))
            .collect()
    }

    /// Ingredients carrying every listed role, most versatile first.
    pub fn find_multi_role_ingredients(
        &self,
        roles: &[FunctionalRole],
        constraints: &[DietaryConstraint],
    ) -> Vec<&'a Ingredient> {
        if roles.is_empty() {
            return Vec::new();
        }

        let mut candidates: Vec<&'a Ingredient> = self
            .repository
            .iter()
            .filter(|ingredient| roles.iter().all(|role| ingredient.has_role(*role)))
            .filter(|ingredient| ingredient.is_suitable_for_constraints(constraints))
            .collect();

        candidates.sort_by(|a, b| b.functional_roles.len().cmp(&a.functional_roles.len()));
        candidates
    }

    /// Best candidate for `role` under the request's priority, if any exists.
    pub fn select_for_role(
        &self,
        role: FunctionalRole,
        constraints: &[DietaryConstraint],
        priority: SustainabilityPriority,
    ) -> Option<&'a Ingredient> {
        let candidates = self.find_ingredients_by_role(role, constraints, None);
        select_best(&candidates, priority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ingredient::tests::sample_ingredient;

    fn sample_repository() -> IngredientRepository {
        let mut aquafaba = sample_ingredient(
            "aquafaba",
            &[FunctionalRole::Foaming, FunctionalRole::Emulsification, FunctionalRole::Binding],
        );
        aquafaba.properties.foaming_capacity = Some(0.85);
        aquafaba.properties.emulsifying_capacity = Some(0.5);
        aquafaba.sustainability.co2_kg_per_kg = 0.3;
        aquafaba.substitutes = vec!["potato_protein".to_string(), "aquafaba".to_string()];

        let mut potato = sample_ingredient(
            "potato_protein",
            &[FunctionalRole::Foaming, FunctionalRole::Emulsification, FunctionalRole::Binding],
        );
        potato.properties.foaming_capacity = Some(0.9);
        potato.availability = Availability::Specialty;
        potato.cost_per_kg_eur = 28.0;

        let mut lecithin = sample_ingredient("soy_lecithin", &[FunctionalRole::Emulsification]);
        lecithin.properties.emulsifying_capacity = Some(0.95);
        lecithin.allergens = vec!["soy".to_string()];

        let mut cashew = sample_ingredient(
            "cashew_cream",
            &[FunctionalRole::Emulsification, FunctionalRole::Thickening],
        );
        cashew.properties.emulsifying_capacity = Some(0.0);
        cashew.allergens = vec!["cashew".to_string()];

        let mut starch = sample_ingredient("cornstarch", &[FunctionalRole::Thickening]);
        starch.properties.viscosity_cps = Some(8000.0);

        IngredientRepository::new(vec![aquafaba, potato, lecithin, cashew, starch]).unwrap()
    }

    fn ids(ingredients: &[&Ingredient]) -> Vec<String> {
        ingredients.iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn test_emulsifiers_ranked_by_capacity() {
        let repo = sample_repository();
        let matcher = IngredientMatcher::new(&repo);
        let found = matcher.find_ingredients_by_role(FunctionalRole::Emulsification, &[], None);
        // zero capacity counts as absent (1.0); specialty potato protein gets no bonus
        assert_eq!(
            ids(&found),
            vec!["cashew_cream", "soy_lecithin", "potato_protein", "aquafaba"]
        );
    }

    #[test]
    fn test_common_bonus_breaks_near_ties() {
        let repo = sample_repository();
        let matcher = IngredientMatcher::new(&repo);
        let found = matcher.find_ingredients_by_role(FunctionalRole::Foaming, &[], None);
        // aquafaba 0.85*1.1 = 0.935 beats specialty potato protein at 0.9
        assert_eq!(ids(&found), vec!["aquafaba", "potato_protein"]);
    }

    #[test]
    fn test_constraints_and_availability_filter() {
        let repo = sample_repository();
        let matcher = IngredientMatcher::new(&repo);

        let found = matcher.find_ingredients_by_role(
            FunctionalRole::Emulsification,
            &[DietaryConstraint::NutFree, DietaryConstraint::SoyFree],
            None,
        );
        assert_eq!(ids(&found), vec!["potato_protein", "aquafaba"]);

        let specialty = matcher.find_ingredients_by_role(
            FunctionalRole::Foaming,
            &[],
            Some(Availability::Specialty),
        );
        assert_eq!(ids(&specialty), vec!["potato_protein"]);
    }

    #[test]
    fn test_thickening_score_is_capped() {
        let repo = sample_repository();
        let starch = repo.get("cornstarch").unwrap();
        assert!((performance_score(starch, FunctionalRole::Thickening) - 0.88).abs() < 1e-9);
        assert!((performance_score(starch, FunctionalRole::Browning) - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_substitutes_exclude_original() {
        let repo = sample_repository();
        let matcher = IngredientMatcher::new(&repo);
        let subs = matcher.find_substitutes("aquafaba", &[]);
        let sub_ids = ids(&subs);
        assert!(!sub_ids.contains(&"aquafaba".to_string()));
        assert_eq!(sub_ids[0], "potato_protein");
        // lecithin shares only emulsification: 1 < ceil(0.6 * 3)
        assert!(!sub_ids.contains(&"soy_lecithin".to_string()));
    }

    #[test]
    fn test_substitutes_of_unknown_id_are_empty() {
        let repo = sample_repository();
        let matcher = IngredientMatcher::new(&repo);
        assert!(matcher.find_substitutes("tofu", &[]).is_empty());
    }

    #[test]
    fn test_multi_role_sorted_by_versatility() {
        let repo = sample_repository();
        let matcher = IngredientMatcher::new(&repo);
        let found = matcher.find_multi_role_ingredients(&[FunctionalRole::Emulsification], &[]);
        assert_eq!(found[0].functional_roles.len(), 3);
        assert_eq!(found.last().unwrap().id, "soy_lecithin");
        assert!(matcher.find_multi_role_ingredients(&[], &[]).is_empty());
    }

    #[test]
    fn test_select_best_by_priority() {
        let repo = sample_repository();
        let matcher = IngredientMatcher::new(&repo);

        let co2 = matcher
            .select_for_role(FunctionalRole::Foaming, &[], SustainabilityPriority::LowCo2)
            .unwrap();
        assert_eq!(co2.id, "aquafaba");

        let cost = matcher
            .select_for_role(FunctionalRole::Foaming, &[], SustainabilityPriority::LowCost)
            .unwrap();
        assert_eq!(cost.id, "aquafaba");

        assert!(select_best(&[], SustainabilityPriority::Balanced).is_none());
    }

    #[test]
    fn test_explain_choice_mentions_capacity_and_impact() {
        let repo = sample_repository();
        let aquafaba = repo.get("aquafaba").unwrap();
        let text = explain_choice(aquafaba, FunctionalRole::Foaming);
        assert!(text.starts_with("aquafaba creates foam"));
        assert!(text.contains("foaming capacity 85%"));
        assert!(text.ends_with("Low environmental impact."));
    }
}
