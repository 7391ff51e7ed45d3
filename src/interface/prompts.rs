use dialoguer::{Confirm, Input, MultiSelect, Select};
use strsim::jaro_winkler;

use crate::catalog::DessertCatalog;
use crate::error::{PlantifyError, Result};
use crate::models::{
    DEFAULT_BUDGET_PER_UNIT, DietaryConstraint, FormulationRequest, SustainabilityPriority,
};

/// Similarity above which a typed name counts as a likely match.
const FUZZY_THRESHOLD: f64 = 0.7;

/// Candidates resembling `input`, most similar first.
pub fn fuzzy_matches<'c>(input: &str, candidates: &[&'c str]) -> Vec<(&'c str, f64)> {
    let wanted = input.trim().to_lowercase().replace([' ', '-'], "_");
    let mut matches: Vec<(&'c str, f64)> = candidates
        .iter()
        .map(|c| (*c, jaro_winkler(&c.to_lowercase(), &wanted)))
        .filter(|(_, score)| *score > FUZZY_THRESHOLD)
        .collect();

    matches.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    matches
}

/// Prompt for a dessert id, suggesting close matches for typos.
pub fn prompt_dessert(catalog: &DessertCatalog) -> Result<String> {
    let ids: Vec<&str> = catalog.ids().collect();
    println!("Available desserts: {}", ids.join(", "));

    loop {
        let input: String = Input::new()
            .with_prompt("Which dessert should be formulated?")
            .interact_text()?;

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        if let Some(id) = ids.iter().find(|id| id.eq_ignore_ascii_case(input)) {
            return Ok(id.to_string());
        }

        let candidates = fuzzy_matches(input, &ids);

        if candidates.is_empty() {
            println!("No dessert matches '{}'", input);
            continue;
        }

        if candidates.len() == 1 {
            let id = candidates[0].0;
            let confirm = Confirm::new()
                .with_prompt(format!("Did you mean '{}'?", id))
                .default(true)
                .interact()?;

            if confirm {
                return Ok(id.to_string());
            }
        } else {
            let options: Vec<String> = candidates
                .iter()
                .take(5)
                .map(|(id, _)| id.to_string())
                .collect();

            let mut selection_options = options.clone();
            selection_options.push("None of these".to_string());

            let selection = Select::new()
                .with_prompt("Which did you mean?")
                .items(&selection_options)
                .default(0)
                .interact()?;

            if selection < options.len() {
                return Ok(options[selection].clone());
            }
        }
    }
}

pub fn prompt_constraints() -> Result<Vec<DietaryConstraint>> {
    let names: Vec<&str> = DietaryConstraint::ALL.iter().map(|c| c.as_str()).collect();
    let defaults: Vec<bool> = DietaryConstraint::ALL
        .iter()
        .map(|c| *c == DietaryConstraint::Vegan)
        .collect();

    let chosen = MultiSelect::new()
        .with_prompt("Dietary constraints (space to toggle, enter to confirm)")
        .items(&names)
        .defaults(&defaults)
        .interact()?;

    Ok(chosen.into_iter().map(|i| DietaryConstraint::ALL[i]).collect())
}

pub fn prompt_budget() -> Result<f64> {
    let input: String = Input::new()
        .with_prompt("Maximum cost per serving (EUR)")
        .default(format!("{:.2}", DEFAULT_BUDGET_PER_UNIT))
        .interact_text()?;

    let budget: f64 = input
        .trim()
        .parse()
        .map_err(|_| PlantifyError::InvalidInput("Invalid number".to_string()))?;

    if budget < 0.0 {
        return Err(PlantifyError::InvalidInput(
            "Budget must be non-negative".to_string(),
        ));
    }

    Ok(budget)
}

pub fn prompt_priority() -> Result<SustainabilityPriority> {
    let options: Vec<&str> = SustainabilityPriority::ALL
        .iter()
        .map(|p| p.as_str())
        .collect();
    let default = SustainabilityPriority::ALL
        .iter()
        .position(|p| *p == SustainabilityPriority::Balanced)
        .unwrap_or(0);

    let selection = Select::new()
        .with_prompt("Optimize ingredient choice for")
        .items(&options)
        .default(default)
        .interact()?;

    Ok(SustainabilityPriority::ALL[selection])
}

pub fn prompt_servings(typical_yield: u32) -> Result<u32> {
    let input: String = Input::new()
        .with_prompt("How many servings?")
        .default(typical_yield.to_string())
        .interact_text()?;

    match input.trim().parse::<u32>() {
        Ok(0) | Err(_) => Err(PlantifyError::InvalidInput(
            "Servings must be a positive whole number".to_string(),
        )),
        Ok(n) => Ok(n),
    }
}

/// Ask for every field of a formulation request.
pub fn collect_request(catalog: &DessertCatalog) -> Result<FormulationRequest> {
    let dessert = prompt_dessert(catalog)?;
    let typical_yield = catalog.require(&dessert)?.typical_yield;
    let constraints = prompt_constraints()?;
    let budget = prompt_budget()?;
    let priority = prompt_priority()?;
    let servings = prompt_servings(typical_yield)?;

    Ok(FormulationRequest::new(&dessert)
        .with_constraints(constraints)
        .with_budget(budget)
        .with_priority(priority)
        .with_servings(servings))
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}
