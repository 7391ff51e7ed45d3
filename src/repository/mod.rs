mod persistence;
mod store;

pub use persistence::load_ingredients;
pub use store::IngredientRepository;
