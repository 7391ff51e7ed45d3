use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::engine::OperationType;
use crate::models::{
    Availability, DietaryConstraint, FormulationRequest, FunctionalRole, SustainabilityPriority,
};

/// Formulates plant-based desserts and scores their footprint, cost and odds of success.
#[derive(Parser, Debug)]
#[command(name = "plantify")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the ingredient database JSON file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Path to a TOML config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// What to formulate.
#[derive(Args, Debug, Clone)]
pub struct RequestArgs {
    /// Dessert type (eclair, creme_brulee, croissant, tart, macaron, mousse).
    #[arg(short, long)]
    pub dessert: String,

    /// Dietary constraint; repeat for several. Defaults to vegan.
    #[arg(short, long = "constraint", value_name = "CONSTRAINT")]
    pub constraints: Vec<DietaryConstraint>,

    /// Maximum cost per serving in EUR.
    #[arg(long)]
    pub budget: Option<f64>,

    /// Criterion for choosing among suitable ingredients.
    #[arg(long, default_value_t = SustainabilityPriority::Balanced)]
    pub priority: SustainabilityPriority,

    /// Servings to produce. Defaults to the dessert's typical yield.
    #[arg(long)]
    pub servings: Option<u32>,
}

impl RequestArgs {
    pub fn to_request(&self) -> FormulationRequest {
        let mut request =
            FormulationRequest::new(&self.dessert).with_priority(self.priority);
        if !self.constraints.is_empty() {
            request = request.with_constraints(self.constraints.clone());
        }
        if let Some(budget) = self.budget {
            request = request.with_budget(budget);
        }
        if let Some(servings) = self.servings {
            request = request.with_servings(servings);
        }
        request
    }
}

/// Overrides for the cost model.
#[derive(Args, Debug, Clone, Default)]
pub struct CostArgs {
    /// Kind of operation (cafe, restaurant, canteen, bakery).
    #[arg(long)]
    pub operation: Option<OperationType>,

    /// Labor rate in EUR per hour.
    #[arg(long)]
    pub labor_rate: Option<f64>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Formulate a recipe and print it.
    Formulate {
        #[command(flatten)]
        request: RequestArgs,

        #[command(flatten)]
        cost: CostArgs,

        /// Print the recipe as JSON instead of a report.
        #[arg(long)]
        json: bool,

        /// Print a compact JSON summary instead of a report.
        #[arg(long, conflicts_with = "json")]
        summary: bool,

        /// Also write the ingredient list to a CSV file.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Also save the full recipe as JSON.
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Formulate a recipe, then scale it to another batch size.
    Scale {
        #[command(flatten)]
        request: RequestArgs,

        #[command(flatten)]
        cost: CostArgs,

        /// Target number of servings.
        #[arg(long)]
        to: u32,

        /// Print the scaled recipe as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Build a request through interactive prompts.
    Interactive {
        #[command(flatten)]
        cost: CostArgs,
    },

    /// List ingredients that can fill a functional role, best performers first.
    Ingredients {
        #[arg(long)]
        role: FunctionalRole,

        #[arg(short, long = "constraint", value_name = "CONSTRAINT")]
        constraints: Vec<DietaryConstraint>,

        /// Only show ingredients of this availability tier.
        #[arg(long)]
        availability: Option<Availability>,
    },

    /// List substitutes for an ingredient.
    Substitutes {
        /// Ingredient id, e.g. coconut_cream.
        id: String,

        #[arg(short, long = "constraint", value_name = "CONSTRAINT")]
        constraints: Vec<DietaryConstraint>,
    },

    /// List ingredients carrying every given role.
    MultiRole {
        #[arg(long = "role", required = true)]
        roles: Vec<FunctionalRole>,

        #[arg(short, long = "constraint", value_name = "CONSTRAINT")]
        constraints: Vec<DietaryConstraint>,
    },

    /// List supported desserts.
    Desserts,

    /// Servings needed to cover fixed costs.
    BreakEven {
        /// Cost per serving in EUR.
        #[arg(long)]
        cost: f64,

        /// Retail price per serving in EUR.
        #[arg(long)]
        price: f64,

        /// Fixed costs in EUR.
        #[arg(long, default_value_t = 0.0)]
        fixed: f64,
    },

    /// Formulate a recipe and list ways to cut its ingredient cost.
    Opportunities {
        #[command(flatten)]
        request: RequestArgs,

        #[command(flatten)]
        cost: CostArgs,
    },
}
