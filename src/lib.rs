pub mod catalog;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod interface;
pub mod models;
pub mod repository;

pub use catalog::DessertCatalog;
pub use engine::Formulator;
pub use error::{PlantifyError, Result};
pub use models::{FormulationRequest, Ingredient, Recipe};
pub use repository::{IngredientRepository, load_ingredients};
