//src/main.rs
mod cli;

use anyhow::{bail, Context, Result};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use serde::Serialize;
use std::io::stdout;

use fitness_planner_lib::{
    logging, ApiConfig, FormInput, FormValues, LastOutcome, PlanError, PlannerForm,
    PlannerService, SubmitBlocked, ToastKind, ValidationErrors,
};

const RESULT_TITLE: &str = "あなたの1日のトレーニングメニュー";

#[derive(Serialize)]
struct PlanOutput<'a> {
    inputs: &'a FormValues,
    text: &'a str,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = cli::parse_args();

    if let cli::Commands::GenerateCompletion { shell } = cli_args.command {
        let mut cmd = cli::build_cli_command();
        let bin_name = cmd.get_name().to_string();

        eprintln!("Generating completion script for {}...", shell);
        clap_complete::generate(shell, &mut cmd, bin_name, &mut stdout());
        return Ok(());
    }

    if let Err(e) = logging::init_stderr() {
        eprintln!("Warning: logging disabled: {e}");
    }

    let mut service =
        PlannerService::initialize().context("Failed to initialize planner service")?;

    match cli_args.command {
        cli::Commands::GenerateCompletion { .. } => {
            unreachable!("Completion generation should have exited already");
        }
        cli::Commands::Plan {
            age,
            gender,
            fitness_level,
            exercise_frequency,
            json,
        } => {
            let defaults = FormInput::default();
            let input = FormInput {
                age: age.unwrap_or(defaults.age),
                gender: gender.unwrap_or(defaults.gender),
                fitness_level: fitness_level.unwrap_or(defaults.fitness_level),
                exercise_frequency: exercise_frequency.unwrap_or(defaults.exercise_frequency),
            };
            run_plan(&service, input, json).await?;
        }
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => {
                print_config_table(&service.api_config(), &service, header_color(&service));
            }
            cli::ConfigCommands::Path => {
                println!("{}", service.get_config_path().display());
            }
            cli::ConfigCommands::SetBaseUrl { url } => {
                service
                    .set_base_url(&url)
                    .with_context(|| format!("Error setting base URL to '{url}'"))?;
                println!(
                    "Base URL set to {} in {:?}",
                    service.config.api.base_url,
                    service.get_config_path()
                );
            }
            cli::ConfigCommands::SetApiKey { key } => {
                service
                    .set_api_key(Some(&key))
                    .context("Error saving API key")?;
                println!("API key saved to {:?}", service.get_config_path());
            }
            cli::ConfigCommands::ClearApiKey => {
                service.set_api_key(None).context("Error clearing API key")?;
                println!("API key removed from {:?}", service.get_config_path());
            }
        },
    }

    Ok(())
}

async fn run_plan(service: &PlannerService, input: FormInput, json: bool) -> Result<()> {
    let mut form = service.new_form();
    *form.input_mut() = input;
    let client = service.workflow_client();
    tracing::debug!("Workflow endpoint: {}", client.endpoint());

    eprintln!("生成中...");
    match form.submit(&client).await {
        Ok(LastOutcome::Success) => {
            let text = form.training_menu().unwrap_or_default();
            if json {
                let values = form.input().validate()?;
                let output = PlanOutput {
                    inputs: &values,
                    text,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print_plan_table(text, header_color(service));
            }
            Ok(())
        }
        Ok(LastOutcome::Error) => {
            print_toasts(&form);
            bail!("Failed to fetch training menu. See the log output above for details.");
        }
        Err(SubmitBlocked::Invalid(errors)) => Err(validation_failure(form.input(), errors)),
        Err(SubmitBlocked::InFlight) => bail!("A submission is already in flight."),
    }
}

/// Prints each field error and converts them into the tagged plan error.
fn validation_failure(input: &FormInput, errors: ValidationErrors) -> anyhow::Error {
    for error in errors.iter() {
        eprintln!(
            "{} ({}): {}  [got '{}']",
            error.field.label(),
            error.field.key(),
            error.message,
            input.value(error.field)
        );
    }
    anyhow::Error::new(PlanError::from(errors)).context("Invalid input; nothing was sent.")
}

fn header_color(service: &PlannerService) -> Color {
    fitness_planner_lib::parse_color(&service.config.theme.header_color)
        .map(Color::from)
        .unwrap_or(Color::Green)
}

fn print_toasts(form: &PlannerForm) {
    for toast in form.toasts().iter() {
        let marker = match toast.kind {
            ToastKind::Success => "✓",
            ToastKind::Error => "✗",
            ToastKind::Info => "i",
        };
        match &toast.title {
            Some(title) => eprintln!("[{marker}] {title}: {}", toast.message),
            None => eprintln!("[{marker}] {}", toast.message),
        }
    }
}

// --- Table Printing Functions ---

/// Prints the training menu as a single-card table
fn print_plan_table(text: &str, header_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![Cell::new(RESULT_TITLE)
            .fg(header_color)
            .add_attribute(Attribute::Bold)]);
    table.add_row(vec![Cell::new(text)]);
    println!("{table}");
}

fn print_config_table(api: &ApiConfig, service: &PlannerService, header_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Setting").fg(header_color),
            Cell::new("Value").fg(header_color),
        ]);

    let api_key = match api.api_key.as_deref() {
        Some(key) => mask_key(key),
        None => "(not set)".to_string(),
    };
    let timeout = api
        .timeout_secs
        .map_or_else(|| "none".to_string(), |s| format!("{s}s"));
    let toasts = &service.config.toasts;

    let rows = [
        ("Config file", service.get_config_path().display().to_string()),
        ("Base URL", api.base_url.clone()),
        ("API key", api_key),
        ("User", api.user.clone()),
        ("Timeout", timeout),
        ("Toast capacity", toasts.capacity.to_string()),
        ("Toast lifetime", format!("{}s", toasts.lifetime_secs)),
        ("Header color", service.config.theme.header_color.clone()),
    ];
    for (name, value) in rows {
        table.add_row(vec![Cell::new(name), Cell::new(value)]);
    }
    println!("{table}");
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("****{visible}")
}
