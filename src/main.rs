use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, info};

use plantify_dessert_rs::catalog::DessertCatalog;
use plantify_dessert_rs::cli::{Cli, Command, CostArgs, RequestArgs};
use plantify_dessert_rs::config::AppConfig;
use plantify_dessert_rs::engine::sustainability::recommendations;
use plantify_dessert_rs::engine::{Formulator, break_even_volume, carbon_equivalents};
use plantify_dessert_rs::error::Result;
use plantify_dessert_rs::interface::{
    collect_request, display_break_even, display_carbon_equivalents, display_desserts,
    display_ingredient_list, display_opportunities, display_recipe, prompt_servings,
    prompt_yes_no, recipe_summary_json, write_ingredients_csv, write_recipe_json,
};
use plantify_dessert_rs::models::{FormulationRequest, Recipe};
use plantify_dessert_rs::repository::{IngredientRepository, load_ingredients};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(verbose >= 2)
        .with_writer(std::io::stderr)
        .init();

    debug!("plantify started with verbosity level: {}", verbose);
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let base_config = AppConfig::load_optional(cli.config.as_deref())?;

    match cli.command {
        Command::Formulate {
            request,
            cost,
            json,
            summary,
            csv,
            save,
        } => {
            let config = base_config.with_overrides(cli.db, cost.operation, cost.labor_rate)?;
            let repository = load_ingredients(config.database_path())?;
            let catalog = DessertCatalog::default();
            let formulator =
                Formulator::new(&repository, &catalog).with_cost_analyzer(config.cost_analyzer());

            let recipe = formulator.formulate(&request.to_request())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&recipe)?);
            } else if summary {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&recipe_summary_json(&recipe))?
                );
            } else {
                report(&formulator, &recipe);
            }

            if let Some(path) = csv {
                write_ingredients_csv(&recipe, &path)?;
                info!(path = %path.display(), "wrote ingredient list");
                eprintln!("Ingredient list written to {}", path.display());
            }
            if let Some(path) = save {
                write_recipe_json(&recipe, &path)?;
                info!(path = %path.display(), "saved recipe");
                eprintln!("Recipe saved to {}", path.display());
            }
            Ok(())
        }

        Command::Scale {
            request,
            cost,
            to,
            json,
        } => cmd_scale(base_config, cli.db, &request, &cost, to, json),

        Command::Interactive { cost } => {
            let config = base_config.with_overrides(cli.db, cost.operation, cost.labor_rate)?;
            let repository = load_ingredients(config.database_path())?;
            let catalog = DessertCatalog::default();
            let formulator =
                Formulator::new(&repository, &catalog).with_cost_analyzer(config.cost_analyzer());

            let request = collect_request(&catalog)?;
            cmd_interactive(&formulator, &request)
        }

        Command::Ingredients {
            role,
            constraints,
            availability,
        } => {
            let repository = open_repository(base_config, cli.db)?;
            let catalog = DessertCatalog::default();
            let formulator = Formulator::new(&repository, &catalog);
            let found = formulator
                .matcher()
                .find_ingredients_by_role(role, &constraints, availability);
            display_ingredient_list(&found, &format!("Ingredients for {}", role));
            Ok(())
        }

        Command::Substitutes { id, constraints } => {
            let repository = open_repository(base_config, cli.db)?;
            let original = repository.require(&id)?;
            let catalog = DessertCatalog::default();
            let formulator = Formulator::new(&repository, &catalog);
            let found = formulator.matcher().find_substitutes(&id, &constraints);
            display_ingredient_list(&found, &format!("Substitutes for {}", original.name));
            Ok(())
        }

        Command::MultiRole { roles, constraints } => {
            let repository = open_repository(base_config, cli.db)?;
            let catalog = DessertCatalog::default();
            let formulator = Formulator::new(&repository, &catalog);
            let found = formulator
                .matcher()
                .find_multi_role_ingredients(&roles, &constraints);
            let names: Vec<String> = roles.iter().map(|r| r.to_string()).collect();
            display_ingredient_list(&found, &format!("Ingredients for {}", names.join(" + ")));
            Ok(())
        }

        Command::Desserts => {
            display_desserts(&DessertCatalog::default());
            Ok(())
        }

        Command::BreakEven { cost, price, fixed } => {
            display_break_even(break_even_volume(cost, price, fixed));
            Ok(())
        }

        Command::Opportunities { request, cost } => {
            let config = base_config.with_overrides(cli.db, cost.operation, cost.labor_rate)?;
            let repository = load_ingredients(config.database_path())?;
            let catalog = DessertCatalog::default();
            let formulator =
                Formulator::new(&repository, &catalog).with_cost_analyzer(config.cost_analyzer());

            let recipe = formulator.formulate(&request.to_request())?;
            show_opportunities(&formulator, &recipe);
            Ok(())
        }
    }
}

fn open_repository(
    config: AppConfig,
    db: Option<PathBuf>,
) -> Result<IngredientRepository> {
    let config = config.with_overrides(db, None, None)?;
    load_ingredients(config.database_path())
}

/// Formulate at the requested size, then rescale to `target`.
fn cmd_scale(
    config: AppConfig,
    db: Option<PathBuf>,
    request: &RequestArgs,
    cost: &CostArgs,
    target: u32,
    json: bool,
) -> Result<()> {
    let config = config.with_overrides(db, cost.operation, cost.labor_rate)?;
    let repository = load_ingredients(config.database_path())?;
    let catalog = DessertCatalog::default();
    let formulator =
        Formulator::new(&repository, &catalog).with_cost_analyzer(config.cost_analyzer());

    let base = formulator.formulate(&request.to_request())?;
    let scaled = formulator.scale(&base, target)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&scaled)?);
    } else {
        println!(
            "Scaled {} from {} to {} servings",
            base.dessert_name, base.yield_servings, scaled.yield_servings
        );
        report(&formulator, &scaled);
    }
    Ok(())
}

fn cmd_interactive(formulator: &Formulator<'_>, request: &FormulationRequest) -> Result<()> {
    let recipe = formulator.formulate(request)?;
    report(formulator, &recipe);

    if prompt_yes_no("Show cost reduction opportunities?", false)? {
        show_opportunities(formulator, &recipe);
    }

    if prompt_yes_no("Scale this recipe to another batch size?", false)? {
        let target = prompt_servings(recipe.yield_servings)?;
        let scaled = formulator.scale(&recipe, target)?;
        report(formulator, &scaled);
    }

    Ok(())
}

/// Recipe, cost report, footprint equivalents and advice.
fn report(formulator: &Formulator<'_>, recipe: &Recipe) {
    display_recipe(recipe);
    println!(
        "{}",
        formulator
            .cost_analyzer()
            .cost_report(&recipe.cost_analysis, recipe.yield_servings)
    );
    println!();

    let co2 = recipe.sustainability.total_co2_kg;
    display_carbon_equivalents(co2, &carbon_equivalents(co2));

    for advice in recommendations(
        &recipe.sustainability,
        &recipe.ingredients,
        formulator.repository(),
    ) {
        println!("  * {}", advice);
    }
    println!();
}

fn show_opportunities(formulator: &Formulator<'_>, recipe: &Recipe) {
    let opportunities = formulator.cost_analyzer().find_cost_reduction_opportunities(
        &recipe.ingredients,
        formulator.repository(),
        &recipe.cost_analysis,
    );
    display_opportunities(&opportunities);
}
