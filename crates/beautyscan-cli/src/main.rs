mod commands;
mod output;
mod telemetry;

use beautyscan_core::model::HazardBucket;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "beautyscan",
    version,
    about = "Hazard-based safety scoring for cosmetic ingredient lists"
)]
struct Cli {
    /// Log filter (e.g. "debug", "beautyscan_core=trace"); overrides BEAUTYSCAN_LOG
    #[arg(long, global = true, value_name = "FILTER")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a product from its ingredient list
    Score {
        /// Ingredient names (commas inside a name are treated as separators)
        ingredients: Vec<String>,

        /// Comma-separated ingredient list, as printed on packaging
        #[arg(short, long)]
        text: Option<String>,

        /// Read the ingredient list from a file
        #[arg(short, long, value_name = "FILE")]
        file: Option<PathBuf>,

        /// JSON compound table used as the chemical database
        #[arg(long, value_name = "FILE")]
        compounds: Option<PathBuf>,

        /// JSON estimate table used as the fallback estimator
        #[arg(long, value_name = "FILE")]
        estimates: Option<PathBuf>,

        /// Engine config (JSON)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Resolve ingredients concurrently
        #[arg(long)]
        concurrent: bool,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Show per-code weighting and the aggregation arithmetic
        #[arg(long)]
        verbose: bool,
    },
    /// Inspect the GHS hazard-code catalog
    Codes {
        #[command(subcommand)]
        action: CodesAction,
    },
    /// Inspect and validate engine configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum CodesAction {
    /// List catalog entries
    List {
        /// Only codes in this bucket: health, physical or environmental
        #[arg(short, long, value_parser = parse_bucket)]
        bucket: Option<HazardBucket>,
    },
    /// Show one hazard code
    Show {
        /// Hazard code (e.g., "H350")
        code: String,
    },
    /// Group hazard codes into Health / Physical / Environmental
    Group {
        /// Hazard codes
        #[arg(required = true)]
        codes: Vec<String>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as JSON
    Show {
        /// Config file to load (defaults are shown without one)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// Validate a config file
    Validate {
        /// Path to JSON config file
        file: PathBuf,
    },
}

fn parse_bucket(s: &str) -> Result<HazardBucket, String> {
    HazardBucket::from_str_loose(s)
        .ok_or_else(|| format!("unknown bucket '{s}' (expected health, physical or environmental)"))
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = telemetry::init(cli.log_level.as_deref()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let result = match cli.command {
        Commands::Score {
            ingredients,
            text,
            file,
            compounds,
            estimates,
            config,
            concurrent,
            output,
            verbose,
        } => commands::score::run(commands::score::ScoreArgs {
            ingredients,
            text,
            file,
            compounds,
            estimates,
            config,
            concurrent,
            output_format: output,
            verbose,
        }),
        Commands::Codes { action } => match action {
            CodesAction::List { bucket } => commands::codes::list(bucket),
            CodesAction::Show { code } => commands::codes::show(&code),
            CodesAction::Group { codes } => commands::codes::group(&codes),
        },
        Commands::Config { action } => match action {
            ConfigAction::Show { config } => commands::config::show(config.as_deref()),
            ConfigAction::Validate { file } => commands::config::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
