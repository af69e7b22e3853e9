//! Cattle Advisor CLI
//!
//! Predicts daily nutrient requirements for growing cattle and builds feed
//! menus from a pre-trained model bundle.

use anyhow::{Context, Result};
use cattle_advisor_cli::{load_config, run_session, VERSION};
use cattle_nutrition_core::{
    AdvisorConfig, AdvisorResponse, AdvisorService, ModelBundle, PredictionRequest, FEED_CATALOG,
};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cattle-advisor")]
#[command(version = VERSION)]
#[command(about = "Nutrient requirements and feed menus for growing cattle", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Model bundle path (overrides configuration)
    #[arg(short, long, global = true)]
    model: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Predict daily nutrient requirements
    Predict {
        #[command(flatten)]
        animal: AnimalArgs,
        /// Print a JSON response instead of text
        #[arg(long)]
        json: bool,
    },
    /// Predict requirements and print a feed menu report
    Recommend {
        #[command(flatten)]
        animal: AnimalArgs,
        #[command(flatten)]
        unavailable: UnavailableArgs,
        /// Print a JSON response instead of the markdown report
        #[arg(long)]
        json: bool,
    },
    /// Print the prompt for an external nutritionist model
    Prompt {
        #[command(flatten)]
        animal: AnimalArgs,
        #[command(flatten)]
        unavailable: UnavailableArgs,
    },
    /// Summarize the model bundle
    Inspect {
        #[arg(long)]
        json: bool,
    },
    /// List the feed ingredient catalog
    Catalog,
    /// Recommend, then repeatedly mark ingredients unavailable
    Interactive {
        #[command(flatten)]
        animal: AnimalArgs,
    },
}

#[derive(Args, Debug)]
struct AnimalArgs {
    /// Cattle category, e.g. "Growing Yearlings" or growing_mature_bulls
    #[arg(long)]
    category: String,

    /// Target weight (lbs)
    #[arg(long)]
    target_weight: f64,

    /// Current body weight (lbs)
    #[arg(long)]
    body_weight: f64,

    /// Average daily gain (lbs/day)
    #[arg(long)]
    adg: f64,
}

#[derive(Args, Debug)]
struct UnavailableArgs {
    /// Ingredients to leave out, comma-separated
    #[arg(long, value_delimiter = ',')]
    unavailable: Vec<String>,
}

impl From<&AnimalArgs> for PredictionRequest {
    fn from(args: &AnimalArgs) -> Self {
        PredictionRequest::new(args.category.clone(), args.target_weight, args.body_weight, args.adg)
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.model.clone())?;
    init_logging(&config, cli.verbose)?;

    debug!("Using model bundle {}", config.model_path.display());

    match &cli.command {
        Commands::Catalog => {
            print_catalog();
            Ok(ExitCode::SUCCESS)
        }
        Commands::Inspect { json } => inspect(&config, *json),
        Commands::Predict { animal, json } => {
            let service = load_service(&config)?;
            let result = service.predict(&animal.into()).map(|(_, p)| p);
            if *json {
                return print_response(AdvisorResponse::from(result));
            }
            let prediction = result?;
            for (target, value) in prediction.iter() {
                println!("{:<22} {:>10.3}", target.column_name(), value);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Recommend {
            animal,
            unavailable,
            json,
        } => {
            let service = load_service(&config)?;
            let result = service.advise(&animal.into(), &unavailable.unavailable);
            if *json {
                return print_response(AdvisorResponse::from(result));
            }
            println!("{}", result?.report);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Prompt {
            animal,
            unavailable,
        } => {
            let service = load_service(&config)?;
            println!("{}", service.prompt(&animal.into(), &unavailable.unavailable)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Interactive { animal } => {
            let service = load_service(&config)?;
            let stdin = io::stdin();
            let unavailable = run_session(&service, &animal.into(), stdin.lock(), io::stdout())?;
            info!("Session ended with {} unavailable ingredients", unavailable.len());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_logging(config: &AdvisorConfig, verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level))
    };

    // stdout carries reports and JSON; logs go to stderr
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("Failed to set tracing subscriber")
}

fn load_service(config: &AdvisorConfig) -> Result<AdvisorService> {
    AdvisorService::from_config(config)
        .with_context(|| format!("Failed to load model bundle {}", config.model_path.display()))
}

fn inspect(config: &AdvisorConfig, json: bool) -> Result<ExitCode> {
    let bundle = ModelBundle::from_json_file(&config.model_path)
        .with_context(|| format!("Failed to load model bundle {}", config.model_path.display()))?;
    let summary = bundle.summary();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("Model bundle: {}", config.model_path.display());
    println!("Loaded by:    cattle-nutrition-core {}", summary.version);
    println!("Fingerprint:  {}", summary.fingerprint.as_deref().unwrap_or("-"));
    println!("Features:     {}", summary.feature_columns.join(", "));
    println!("Total trees:  {}", summary.total_trees);
    println!();
    println!(
        "{:<22} {:>6} {:>6} {:>7} {:>8} {:>8}",
        "Target", "Trees", "Depth", "Scaled", "Samples", "Reported"
    );
    for target in &summary.targets {
        println!(
            "{:<22} {:>6} {:>6} {:>7} {:>8} {:>8}",
            target.name,
            target.trees,
            target.max_depth,
            if target.scaled_output { "yes" } else { "no" },
            target.training_samples.map_or_else(|| "-".to_string(), |n| n.to_string()),
            if target.reported { "yes" } else { "no" }
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn print_catalog() {
    println!(
        "{:<20} {:<13} {:>6} {:>6} {:>6} {:>6} {:>6} {:>6}",
        "Ingredient", "Class", "TDN%", "NEm", "NEg", "CP%", "Ca%", "P%"
    );
    for i in FEED_CATALOG.iter() {
        println!(
            "{:<20} {:<13} {:>6.1} {:>6.2} {:>6.2} {:>6.1} {:>6.2} {:>6.2}",
            i.name,
            i.class.to_string(),
            i.tdn_pct,
            i.nem_per_lb,
            i.neg_per_lb,
            i.cp_pct,
            i.ca_pct,
            i.p_pct
        );
    }
}

fn print_response<T: Serialize>(response: AdvisorResponse<T>) -> Result<ExitCode> {
    println!(
        "{}",
        serde_json::to_string_pretty(&response).context("Failed to serialize response")?
    );
    Ok(if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
