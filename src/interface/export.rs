use std::fs;
use std::path::Path;

use crate::engine::round_to;
use crate::error::Result;
use crate::models::Recipe;

/// Write the ingredient list of a recipe to a CSV file.
pub fn write_ingredients_csv(recipe: &Recipe, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "component",
        "ingredient_id",
        "ingredient_name",
        "amount",
        "unit",
        "preparation_notes",
    ])?;

    for line in &recipe.ingredients {
        let component = recipe
            .components
            .iter()
            .find(|c| c.ingredient_ids.contains(&line.ingredient_id))
            .map(|c| c.name.as_str())
            .unwrap_or("");
        wtr.write_record([
            component,
            &line.ingredient_id,
            &line.ingredient_name,
            &format!("{:.1}", line.amount),
            line.unit.symbol(),
            &line.preparation_notes,
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Compact JSON overview of a recipe with rounded figures.
pub fn recipe_summary_json(recipe: &Recipe) -> serde_json::Value {
    let s = &recipe.sustainability;
    let c = &recipe.cost_analysis;
    let p = &recipe.predictive_analysis;
    serde_json::json!({
        "id": recipe.id,
        "dessert": recipe.dessert_id,
        "servings": recipe.yield_servings,
        "ingredients": recipe.ingredients.iter().map(|i| {
            serde_json::json!({
                "id": i.ingredient_id,
                "amount": round_to(i.amount, 1),
                "unit": i.unit,
            })
        }).collect::<Vec<_>>(),
        "sustainability": {
            "grade": s.grade,
            "co2_per_serving": round_to(s.co2_per_serving, 3),
            "water_per_serving": round_to(s.water_per_serving, 1),
        },
        "cost": {
            "per_serving": round_to(c.total_cost_per_serving, 2),
            "suggested_price": round_to(c.suggested_retail_price, 2),
        },
        "prediction": {
            "success_probability": round_to(p.success_probability, 1),
            "stability_score": round_to(p.stability_score, 1),
            "warnings": p.risk_warnings.len(),
        },
        "dietary_labels": recipe.dietary_labels,
    })
}

/// Write the full recipe as pretty JSON.
pub fn write_recipe_json(recipe: &Recipe, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(recipe)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DessertCatalog;
    use crate::engine::Formulator;
    use crate::models::FormulationRequest;
    use crate::repository::load_ingredients;
    use tempfile::NamedTempFile;

    fn mousse() -> Recipe {
        let repo =
            load_ingredients(concat!(env!("CARGO_MANIFEST_DIR"), "/data/ingredients_database.json"))
                .unwrap();
        let catalog = DessertCatalog::default();
        Formulator::new(&repo, &catalog)
            .formulate(&FormulationRequest::new("mousse"))
            .unwrap()
    }

    #[test]
    fn test_csv_has_one_row_per_line() {
        let recipe = mousse();
        let file = NamedTempFile::new().unwrap();
        write_ingredients_csv(&recipe, file.path()).unwrap();

        let mut reader = csv::Reader::from_path(file.path()).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), recipe.ingredients.len());
        assert_eq!(&rows[0][0], "Mousse Base");
        assert_eq!(&rows[0][1], recipe.ingredients[0].ingredient_id.as_str());
    }

    #[test]
    fn test_json_round_trip() {
        let recipe = mousse();
        let file = NamedTempFile::new().unwrap();
        write_recipe_json(&recipe, file.path()).unwrap();

        let content = fs::read_to_string(file.path()).unwrap();
        let loaded: Recipe = serde_json::from_str(&content).unwrap();
        assert_eq!(loaded.id, recipe.id);
        assert_eq!(loaded.ingredients, recipe.ingredients);
    }

    #[test]
    fn test_summary_json_fields() {
        let recipe = mousse();
        let summary = recipe_summary_json(&recipe);
        assert_eq!(summary["dessert"], "mousse");
        assert_eq!(summary["servings"], 6);
        assert!(summary["sustainability"]["grade"].is_string());
    }
}
