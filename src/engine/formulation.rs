use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use super::budget::{BudgetOptimizer, PassthroughOptimizer};
use super::constants::{ACCENT_PORTION_GRAMS, ERYTHRITOL_SWEETNESS_RATIO, RECIPE_VERSION, SCALING_NOTE};
use super::cost::CostAnalyzer;
use super::matcher::{IngredientMatcher, explain_choice};
use super::nutrition::calculate_nutrition;
use super::portions::{
    DEFAULT_FLOUR, GLUTEN_FREE_FLOUR, Portion, PortionSource, SUGAR_FREE_SWEETENER, portions,
    scale_amount,
};
use super::scaling::scale_recipe;
use super::simulator::simulate_recipe;
use super::sustainability::{compare_to_traditional, recipe_impact};
use super::{resolve_lines, round_to};
use crate::catalog::{DessertCatalog, instructions_for, shelf_life_days, storage_instructions};
use crate::error::{PlantifyError, Result};
use crate::models::{
    ComponentRequirement, ComponentSummary, DietaryConstraint, FormulationRequest,
    FunctionalRole, Ingredient, Recipe, RecipeIngredient, RoleSelection, Unit,
};
use crate::repository::IngredientRepository;

/// Turns formulation requests into complete recipes.
///
/// Holds only shared read-only data, so one instance can serve any number of requests.
pub struct Formulator<'a> {
    repository: &'a IngredientRepository,
    catalog: &'a DessertCatalog,
    matcher: IngredientMatcher<'a>,
    cost_analyzer: CostAnalyzer,
    optimizer: Box<dyn BudgetOptimizer + Send + Sync>,
}

impl<'a> Formulator<'a> {
    pub fn new(repository: &'a IngredientRepository, catalog: &'a DessertCatalog) -> Self {
        Self {
            repository,
            catalog,
            matcher: IngredientMatcher::new(repository),
            cost_analyzer: CostAnalyzer::default(),
            optimizer: Box::new(PassthroughOptimizer),
        }
    }

    pub fn with_cost_analyzer(mut self, cost_analyzer: CostAnalyzer) -> Self {
        self.cost_analyzer = cost_analyzer;
        self
    }

    pub fn with_optimizer(mut self, optimizer: Box<dyn BudgetOptimizer + Send + Sync>) -> Self {
        self.optimizer = optimizer;
        self
    }

    pub fn repository(&self) -> &'a IngredientRepository {
        self.repository
    }

    pub fn catalog(&self) -> &'a DessertCatalog {
        self.catalog
    }

    pub fn matcher(&self) -> &IngredientMatcher<'a> {
        &self.matcher
    }

    pub fn cost_analyzer(&self) -> &CostAnalyzer {
        &self.cost_analyzer
    }

    /// Formulate a complete recipe. Fails without a partial result.
    pub fn formulate(&self, request: &FormulationRequest) -> Result<Recipe> {
        request.validate()?;
        let template = self.catalog.require(&request.dessert_type)?;

        let servings = request.yield_servings.unwrap_or(template.typical_yield);
        let scale = f64::from(servings) / f64::from(template.typical_yield);

        let mut ingredients = Vec::new();
        let mut components = Vec::with_capacity(template.components.len());
        for component in &template.components {
            let (lines, summary) = self.formulate_component(component, request, scale)?;
            ingredients.extend(lines);
            components.push(summary);
        }

        let prep_minutes = template.preparation_time_minutes;
        let mut cost_analysis = self.cost_analyzer.analyze_recipe_cost(
            &ingredients,
            self.repository,
            servings,
            prep_minutes,
        );
        if !cost_analysis.is_within_budget(request.budget_per_unit) {
            warn!(
                dessert = %template.id,
                cost_per_serving = cost_analysis.total_cost_per_serving,
                budget = request.budget_per_unit,
                "formulation exceeds budget"
            );
            ingredients = self.optimizer.optimize(
                ingredients,
                request.budget_per_unit,
                servings,
                &request.dietary_constraints,
            );
            cost_analysis = self.cost_analyzer.analyze_recipe_cost(
                &ingredients,
                self.repository,
                servings,
                prep_minutes,
            );
        }

        let mut sustainability = recipe_impact(&ingredients, self.repository, servings);
        sustainability.comparison_to_traditional =
            Some(compare_to_traditional(&sustainability, &template.id));

        let predictive_analysis = simulate_recipe(&ingredients, self.repository, template);
        let nutritional_info = calculate_nutrition(&ingredients, self.repository, servings);
        let allergen_warnings = collect_allergens(&ingredients, self.repository);
        let dietary_labels = dietary_labels(&allergen_warnings);

        info!(
            dessert = %template.id,
            servings,
            lines = ingredients.len(),
            grade = %sustainability.grade,
            success = predictive_analysis.success_probability,
            "formulated recipe"
        );

        Ok(Recipe {
            id: format!("{}_v1_{}", template.id, request.fingerprint()),
            dessert_id: template.id.clone(),
            dessert_name: template.name.clone(),
            version: RECIPE_VERSION.to_string(),
            ingredients,
            components,
            instructions: instructions_for(&template.id),
            yield_servings: servings,
            preparation_time_minutes: prep_minutes,
            baking_time_minutes: template.baking_time_minutes,
            total_time_minutes: template.total_time_minutes(),
            sustainability,
            cost_analysis,
            nutritional_info,
            predictive_analysis,
            dietary_labels,
            allergen_warnings,
            storage_instructions: storage_instructions(&template.id).to_string(),
            shelf_life_days: shelf_life_days(&template.id),
            scaling_notes: SCALING_NOTE.to_string(),
            formulation_parameters: request.clone(),
        })
    }

    /// Scale a recipe with this formulator's cost model.
    pub fn scale(&self, recipe: &Recipe, target_servings: u32) -> Result<Recipe> {
        scale_recipe(recipe, target_servings, &self.cost_analyzer)
    }

    fn formulate_component(
        &self,
        component: &ComponentRequirement,
        request: &FormulationRequest,
        scale: f64,
    ) -> Result<(Vec<RecipeIngredient>, ComponentSummary)> {
        let mut selected: Vec<(FunctionalRole, &'a Ingredient)> =
            Vec::with_capacity(component.required_roles.len());
        for &role in &component.required_roles {
            let ingredient = self.select(component, role, request)?;
            debug!(
                component = %component.name,
                role = %role,
                ingredient = %ingredient.id,
                "selected ingredient for role"
            );
            selected.push((role, ingredient));
        }

        let mut lines = portions(component.kind)
            .iter()
            .map(|portion| self.resolve_portion(portion, component, request, scale))
            .collect::<Result<Vec<_>>>()?;

        for (role, ingredient) in &selected {
            let covered = resolve_lines(&lines, self.repository).any(|(_, i)| i.has_role(*role));
            if !covered {
                debug!(component = %component.name, role = %role, ingredient = %ingredient.id, "adding accent portion");
                lines.push(RecipeIngredient::new(
                    &ingredient.id,
                    &ingredient.name,
                    round_to(ACCENT_PORTION_GRAMS * scale, 1),
                    Unit::Gram,
                ));
            }
        }

        let lines = merge_duplicates(lines);
        let summary = ComponentSummary {
            name: component.name.clone(),
            selections: selected
                .iter()
                .map(|(role, ingredient)| RoleSelection {
                    role: *role,
                    ingredient_id: ingredient.id.clone(),
                    rationale: explain_choice(ingredient, *role),
                })
                .collect(),
            ingredient_ids: lines.iter().map(|l| l.ingredient_id.clone()).collect(),
        };
        Ok((lines, summary))
    }

    fn select(
        &self,
        component: &ComponentRequirement,
        role: FunctionalRole,
        request: &FormulationRequest,
    ) -> Result<&'a Ingredient> {
        self.matcher
            .select_for_role(
                role,
                &request.dietary_constraints,
                request.sustainability_priority,
            )
            .ok_or_else(|| PlantifyError::NoIngredientForRole {
                component: component.name.clone(),
                role: role.to_string(),
                constraints: request
                    .dietary_constraints
                    .iter()
                    .map(|c| c.to_string())
                    .collect(),
            })
    }

    /// Keep the classic ingredient when allowed, else a listed substitute, else the role's pick.
    fn base_ingredient(
        &self,
        component: &ComponentRequirement,
        role: FunctionalRole,
        preferred: &str,
        request: &FormulationRequest,
    ) -> Result<&'a Ingredient> {
        let constraints = &request.dietary_constraints;
        let classic = self.repository.require(preferred)?;
        if classic.is_suitable_for_constraints(constraints) {
            return Ok(classic);
        }

        let substitute = classic
            .substitutes
            .iter()
            .filter_map(|id| self.repository.get(id))
            .find(|sub| sub.has_role(role) && sub.is_suitable_for_constraints(constraints));

        match substitute {
            Some(sub) => {
                debug!(original = %classic.id, substitute = %sub.id, "substituted base ingredient");
                Ok(sub)
            }
            None => self.select(component, role, request),
        }
    }

    fn resolve_portion(
        &self,
        portion: &Portion,
        component: &ComponentRequirement,
        request: &FormulationRequest,
        scale: f64,
    ) -> Result<RecipeIngredient> {
        let (ingredient, amount, unit) = match portion.source {
            PortionSource::Staple(id) => (
                self.repository.require(id)?,
                scale_amount(portion.amount, scale),
                portion.unit,
            ),
            PortionSource::Sweetener {
                usual,
                sugar_free_amount,
            } => {
                if request.has_constraint(DietaryConstraint::SugarFree) {
                    (
                        self.repository.require(SUGAR_FREE_SWEETENER)?,
                        scale_amount(sugar_free_amount, scale * ERYTHRITOL_SWEETNESS_RATIO),
                        Unit::Gram,
                    )
                } else {
                    (
                        self.repository.require(usual)?,
                        scale_amount(portion.amount, scale),
                        portion.unit,
                    )
                }
            }
            PortionSource::Flour => {
                let id = if request.has_constraint(DietaryConstraint::GlutenFree) {
                    GLUTEN_FREE_FLOUR
                } else {
                    DEFAULT_FLOUR
                };
                (
                    self.repository.require(id)?,
                    scale_amount(portion.amount, scale),
                    portion.unit,
                )
            }
            PortionSource::Role(role) => (
                self.select(component, role, request)?,
                scale_amount(portion.amount, scale),
                portion.unit,
            ),
            PortionSource::Base { role, preferred } => (
                self.base_ingredient(component, role, preferred, request)?,
                scale_amount(portion.amount, scale),
                portion.unit,
            ),
        };

        Ok(RecipeIngredient::new(&ingredient.id, &ingredient.name, amount, unit)
            .with_notes(portion.preparation))
    }
}

/// Merge lines naming the same ingredient, converting into the first line's unit.
fn merge_duplicates(lines: Vec<RecipeIngredient>) -> Vec<RecipeIngredient> {
    let mut merged: Vec<RecipeIngredient> = Vec::with_capacity(lines.len());
    for line in lines {
        match merged
            .iter_mut()
            .find(|m| m.ingredient_id == line.ingredient_id)
        {
            Some(existing) if existing.unit == line.unit => existing.amount += line.amount,
            Some(existing) => {
                existing.amount =
                    round_to(existing.amount + line.amount_kg() / existing.unit.kg_factor(), 1)
            }
            None => merged.push(line),
        }
    }
    merged
}

/// Sorted union of the allergen tags of every resolved line.
pub fn collect_allergens(
    ingredients: &[RecipeIngredient],
    repository: &IngredientRepository,
) -> Vec<String> {
    resolve_lines(ingredients, repository)
        .flat_map(|(_, ingredient)| ingredient.allergens.iter().cloned())
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

/// Labels implied by the absence of allergens. Any tag containing "nut" drops nut-free.
pub fn dietary_labels(allergens: &[String]) -> Vec<String> {
    let mut labels = vec!["vegan".to_string(), "plant-based".to_string()];

    let lowered: Vec<String> = allergens.iter().map(|a| a.to_lowercase()).collect();
    if !lowered.iter().any(|a| a == "wheat" || a == "gluten") {
        labels.push("gluten-free".to_string());
    }
    if !lowered.iter().any(|a| a == "soy") {
        labels.push("soy-free".to_string());
    }
    if !lowered.iter().any(|a| a.contains("nut")) {
        labels.push("nut-free".to_string());
    }
    labels
}
