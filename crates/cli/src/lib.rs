pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "croprec",
    about = "Crop recommendation operator CLI",
    long_about = "Inspect configuration, check model readiness, and run crop recommendations offline.",
    after_help = "Examples:\n  croprec doctor --json\n  croprec config\n  croprec suggest --season rainy --city guntur\n  croprec predict --nitrogen 90 --phosphorus 42 --potassium 43 --temperature 20.9 \\\n    --humidity 82 --ph 6.5 --rainfall 202.9 --season rainy --city guntur"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Print the effective configuration with the source of each value")]
    Config,
    #[command(about = "Validate config, model bundle, and form template readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Recommend a crop from soil and climate readings")]
    Predict(PredictArgs),
    #[command(about = "Look up suggested crops for a season and city")]
    Suggest {
        #[arg(long)]
        season: String,
        #[arg(long)]
        city: String,
    },
}

/// Readings stay strings so malformed values reach input validation.
#[derive(Debug, Clone, Default, Args)]
pub struct PredictArgs {
    #[arg(long, short = 'n')]
    pub nitrogen: Option<String>,
    #[arg(long, short = 'p')]
    pub phosphorus: Option<String>,
    #[arg(long, short = 'k')]
    pub potassium: Option<String>,
    #[arg(long)]
    pub temperature: Option<String>,
    #[arg(long)]
    pub humidity: Option<String>,
    #[arg(long)]
    pub ph: Option<String>,
    #[arg(long)]
    pub rainfall: Option<String>,
    #[arg(long)]
    pub season: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long, help = "Model bundle to use instead of the configured one")]
    pub bundle: Option<PathBuf>,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => commands::config::run(),
        Command::Doctor { json } => commands::doctor::run(json),
        Command::Predict(args) => commands::predict::run(args),
        Command::Suggest { season, city } => commands::suggest::run(&season, &city),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
