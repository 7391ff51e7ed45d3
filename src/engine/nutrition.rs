use super::constants::{KCAL_PER_G_CARBOHYDRATE, KCAL_PER_G_FAT, KCAL_PER_G_PROTEIN};
use super::resolve_lines;
use crate::models::{NutritionalInfo, RecipeIngredient};
use crate::repository::IngredientRepository;

/// Per-serving nutrition estimated from ingredient composition.
///
/// Missing composition values count as zero. `servings` must be positive.
pub fn calculate_nutrition(
    ingredients: &[RecipeIngredient],
    repository: &IngredientRepository,
    servings: u32,
) -> NutritionalInfo {
    let mut totals = NutritionalInfo::default();

    for (line, ingredient) in resolve_lines(ingredients, repository) {
        let grams = line.amount_kg() * 1000.0;
        let props = &ingredient.properties;
        let share = |percent: Option<f64>| grams * percent.unwrap_or(0.0) / 100.0;

        totals.protein_g += share(props.protein_content_percent);
        totals.fat_g += share(props.fat_content_percent);
        totals.carbohydrates_g += share(props.carbohydrate_content_percent);
        totals.fiber_g += share(props.fiber_content_percent);
        totals.sugar_g += share(props.sugar_content_percent);
        totals.sodium_mg += grams / 100.0 * props.sodium_mg_per_100g.unwrap_or(0.0);
    }

    let n = f64::from(servings);
    let per_serving = NutritionalInfo {
        calories: 0.0,
        protein_g: totals.protein_g / n,
        fat_g: totals.fat_g / n,
        carbohydrates_g: totals.carbohydrates_g / n,
        fiber_g: totals.fiber_g / n,
        sugar_g: totals.sugar_g / n,
        sodium_mg: totals.sodium_mg / n,
    };

    NutritionalInfo {
        calories: per_serving.fat_g * KCAL_PER_G_FAT
            + per_serving.protein_g * KCAL_PER_G_PROTEIN
            + per_serving.carbohydrates_g * KCAL_PER_G_CARBOHYDRATE,
        ..per_serving
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ingredient::tests::sample_ingredient;
    use crate::models::{FunctionalRole, Unit};

    #[test]
    fn test_nutrition_per_serving() {
        let mut butter = sample_ingredient("vegan_butter", &[FunctionalRole::FatStructuring]);
        butter.properties.fat_content_percent = Some(80.0);
        butter.properties.sodium_mg_per_100g = Some(600.0);

        let mut sugar = sample_ingredient("cane_sugar", &[FunctionalRole::Sweetening]);
        sugar.properties.carbohydrate_content_percent = Some(100.0);
        sugar.properties.sugar_content_percent = Some(100.0);

        let repo = IngredientRepository::new(vec![butter, sugar]).unwrap();
        let lines = vec![
            RecipeIngredient::new("vegan_butter", "Plant-Based Butter", 100.0, Unit::Gram),
            RecipeIngredient::new("cane_sugar", "Organic Cane Sugar", 0.2, Unit::Kilogram),
        ];

        let info = calculate_nutrition(&lines, &repo, 4);
        assert!((info.fat_g - 20.0).abs() < 1e-9);
        assert!((info.carbohydrates_g - 50.0).abs() < 1e-9);
        assert!((info.sugar_g - 50.0).abs() < 1e-9);
        assert!((info.protein_g).abs() < 1e-9);
        assert!((info.sodium_mg - 150.0).abs() < 1e-9);
        assert!((info.calories - (20.0 * 9.0 + 50.0 * 4.0)).abs() < 1e-9);
    }
}
