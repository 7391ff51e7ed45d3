use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlantifyError {
    #[error("Unsupported dessert type: {requested}. Available: {}", available.join(", "))]
    UnsupportedDessert {
        requested: String,
        available: Vec<String>,
    },

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No suitable ingredients found for {role} in '{component}' with constraints [{}]", constraints.join(", "))]
    NoIngredientForRole {
        component: String,
        role: String,
        constraints: Vec<String>,
    },

    #[error("Invalid ingredient '{id}': {reason}")]
    InvalidIngredient { id: String, reason: String },

    #[error("Ingredient not found: {0}")]
    UnknownIngredient(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl PlantifyError {
    /// Whether the error stems from a malformed or unsupported request.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PlantifyError::UnsupportedDessert { .. }
                | PlantifyError::MissingField(_)
                | PlantifyError::InvalidInput(_)
        )
    }

    /// Whether no ingredient could fill a required role.
    pub fn is_matching_failure(&self) -> bool {
        matches!(self, PlantifyError::NoIngredientForRole { .. })
    }
}

pub type Result<T> = std::result::Result<T, PlantifyError>;
