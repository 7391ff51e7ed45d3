use std::fs;
use std::path::Path;

use tracing::debug;

use super::store::IngredientRepository;
use crate::error::Result;

/// Load the ingredient database from a JSON file.
pub fn load_ingredients<P: AsRef<Path>>(path: P) -> Result<IngredientRepository> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let repository = IngredientRepository::from_json_str(&content)?;
    debug!(
        path = %path.display(),
        count = repository.len(),
        "loaded ingredient database"
    );
    Ok(repository)
}
