pub mod export;
pub mod prompts;
pub mod render;

pub use export::{recipe_summary_json, write_ingredients_csv, write_recipe_json};
pub use prompts::{
    collect_request, fuzzy_matches, prompt_dessert, prompt_servings, prompt_yes_no,
};
pub use render::{
    display_break_even, display_carbon_equivalents, display_desserts, display_ingredient_list,
    display_opportunities, display_recipe,
};
