use crate::catalog::DessertCatalog;
use crate::engine::sustainability::CarbonEquivalents;
use crate::engine::{BreakEven, CostOpportunity};
use crate::models::{Ingredient, Recipe};

/// Display a formulated recipe as a terminal report.
pub fn display_recipe(recipe: &Recipe) {
    println!();
    println!("=== {} ({}) ===", recipe.dessert_name, recipe.id);
    println!(
        "Yield: {} servings | Prep {} min | Total {} min",
        recipe.yield_servings, recipe.preparation_time_minutes, recipe.total_time_minutes
    );
    println!("Labels: {}", recipe.dietary_labels.join(", "));
    if !recipe.allergen_warnings.is_empty() {
        println!("Allergens: {}", recipe.allergen_warnings.join(", "));
    }

    println!();
    println!("--- Ingredients ---");
    let max_name_len = recipe
        .ingredients
        .iter()
        .map(|i| i.ingredient_name.len())
        .max()
        .unwrap_or(10);

    for line in &recipe.ingredients {
        let notes = if line.preparation_notes.is_empty() {
            String::new()
        } else {
            format!("  ({})", line.preparation_notes)
        };
        println!(
            "  {:<width$} {:>8.1} {}{}",
            line.ingredient_name,
            line.amount,
            line.unit,
            notes,
            width = max_name_len
        );
    }

    println!();
    println!("--- Components ---");
    for component in &recipe.components {
        println!("  {}", component.name);
        for selection in &component.selections {
            println!("    {}: {}", selection.role, selection.rationale);
        }
    }

    println!();
    println!("--- Method ---");
    for step in &recipe.instructions {
        let marker = if step.critical { "!" } else { " " };
        println!("{} {:>2}. {}", marker, step.step_number, step.instruction);
        for tip in &step.tips {
            println!("       tip: {}", tip);
        }
    }

    let s = &recipe.sustainability;
    println!();
    println!("--- Sustainability (grade {}) ---", s.grade);
    println!(
        "Per serving: {:.3} kg CO2, {:.1} L water, {:.3} m² land",
        s.co2_per_serving, s.water_per_serving, s.land_per_serving
    );
    if let Some(cmp) = &s.comparison_to_traditional {
        println!(
            "Versus traditional: CO2 {:+.1}%, water {:+.1}%, land {:+.1}% reduction",
            cmp.co2_reduction_percent, cmp.water_reduction_percent, cmp.land_reduction_percent
        );
    }

    let c = &recipe.cost_analysis;
    println!();
    println!("--- Cost ---");
    println!(
        "€{:.2} per serving, suggested price €{:.2} ({:.1}% margin)",
        c.total_cost_per_serving, c.suggested_retail_price, c.profit_margin_percent
    );

    let n = &recipe.nutritional_info;
    println!();
    println!("--- Nutrition per serving ---");
    println!(
        "{:.0} kcal | protein {:.1} g | fat {:.1} g | carbs {:.1} g | sugar {:.1} g | fiber {:.1} g | sodium {:.0} mg",
        n.calories, n.protein_g, n.fat_g, n.carbohydrates_g, n.sugar_g, n.fiber_g, n.sodium_mg
    );

    let p = &recipe.predictive_analysis;
    println!();
    println!("--- Prediction ---");
    println!(
        "Success {:.0}% | Stability {:.0}/100",
        p.success_probability, p.stability_score
    );
    for (component, texture) in &p.texture_prediction {
        println!("  {}: {}", component, texture);
    }
    for warning in &p.risk_warnings {
        println!("  [warn] {}", warning);
    }
    for deviation in &p.property_deviations {
        println!("  [range] {}", deviation);
    }
    for suggestion in &p.optimization_suggestions {
        println!("  [tip] {}", suggestion);
    }

    println!();
    println!("Storage: {}", recipe.storage_instructions);
    println!("Shelf life: {} day(s)", recipe.shelf_life_days);
    println!("{}", recipe.scaling_notes);
    println!();
}

/// Display a list of ingredients with their headline metrics.
pub fn display_ingredient_list(ingredients: &[&Ingredient], title: &str) {
    if ingredients.is_empty() {
        println!("{}: (none)", title);
        return;
    }

    println!();
    println!("=== {} ({} items) ===", title, ingredients.len());
    println!();

    for ingredient in ingredients {
        let allergens = if ingredient.allergens.is_empty() {
            String::new()
        } else {
            format!(", allergens: {}", ingredient.allergens.join("/"))
        };
        println!(
            "  {} [{}] - {:.2} kg CO2/kg, {:.0} L/kg, €{:.2}/kg, {}{}",
            ingredient.name,
            ingredient.id,
            ingredient.sustainability.co2_kg_per_kg,
            ingredient.sustainability.water_liters_per_kg,
            ingredient.cost_per_kg_eur,
            ingredient.availability,
            allergens
        );
    }

    println!();
}

pub fn display_desserts(catalog: &DessertCatalog) {
    println!();
    println!("=== Desserts ===");
    println!();
    for template in catalog.iter() {
        let components: Vec<&str> = template.components.iter().map(|c| c.name.as_str()).collect();
        println!(
            "  {:<13} {} - {}, serves {}, {} min [{}]",
            template.id,
            template.name,
            template.difficulty,
            template.typical_yield,
            template.total_time_minutes(),
            components.join(", ")
        );
    }
    println!();
}

pub fn display_opportunities(opportunities: &[CostOpportunity]) {
    if opportunities.is_empty() {
        println!("No significant cost reduction opportunities found.");
        return;
    }

    println!();
    println!("=== Cost Reduction Opportunities ===");
    println!();
    for opportunity in opportunities {
        match opportunity {
            CostOpportunity::Substitute {
                ingredient,
                current_cost,
                contribution_percent,
                alternatives,
            } => {
                println!(
                    "  {} (€{:.2}, {:.1}% of cost) could be replaced by:",
                    ingredient, current_cost, contribution_percent
                );
                for alt in alternatives {
                    println!(
                        "    {} at €{:.2}/kg ({:.0}% cheaper)",
                        alt.name, alt.cost_per_kg, alt.savings_percent
                    );
                }
            }
            CostOpportunity::BulkPurchase {
                ingredient,
                contribution_percent,
                note,
                ..
            } => {
                println!(
                    "  {} ({:.1}% of cost): {}",
                    ingredient, contribution_percent, note
                );
            }
        }
    }
    println!();
}

pub fn display_break_even(result: BreakEven) {
    match result {
        BreakEven::Never => println!("Price does not exceed cost: this never breaks even."),
        BreakEven::Immediate => println!("No fixed costs: profitable from the first serving."),
        BreakEven::Servings(n) => println!("Break-even after {} servings.", n),
    }
}

pub fn display_carbon_equivalents(co2_kg: f64, eq: &CarbonEquivalents) {
    println!(
        "{:.2} kg CO2 ≈ {:.1} km driven, {:.2} tree-years, {:.0} phone charges, {:.0} LED hours",
        co2_kg, eq.km_driven, eq.trees_needed_year, eq.smartphone_charges, eq.led_bulb_hours
    );
}
