// src/cli.rs
use clap::{Command, CommandFactory, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate a one-day training menu from a hosted workflow", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate the inputs, run the workflow and print the training menu
    Plan {
        /// Age in years (1-120). Defaults to 30
        #[arg(short, long)]
        age: Option<String>,
        /// 男性 | 女性 | 回答しない (or male | female | no-answer)
        #[arg(short, long)]
        gender: Option<String>,
        /// 初心者 | 中級者 | 上級者 (or beginner | intermediate | advanced)
        #[arg(short = 'l', long)]
        fitness_level: Option<String>,
        /// 週1回 | 週2-3回 | 週4回以上 (or once-a-week | two-to-three | four-plus)
        #[arg(short = 'f', long = "frequency")]
        exercise_frequency: Option<String>,
        /// Print the inputs and the menu as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Inspect or change the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
    /// Generate shell completion scripts
    GenerateCompletion {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration (environment overrides applied)
    Show,
    /// Show the path to the config file
    Path,
    /// Set the workflow API base URL (e.g. "https://api.dify.ai/v1")
    SetBaseUrl { url: String },
    /// Store the workflow API key in the config file
    SetApiKey { key: String },
    /// Remove the stored API key
    ClearApiKey,
}

// Function to parse CLI arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

pub fn build_cli_command() -> Command {
    Cli::command()
}
