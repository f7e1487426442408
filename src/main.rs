//! `examiner` - structured reasoning for online assessments
//!
//! Thin command-line front end over `examiner_core::Examiner`. Every command
//! prints the resulting envelope as JSON and exits non-zero on an error
//! envelope.

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser};
use console::Style;
use serde::Serialize;
use serde_json::{json, Value};
use std::io::Read;
use std::path::Path;

use crate::cli::{Cli, Commands};
use examiner_core::config::ExaminerConfig;
use examiner_core::{logger, Envelope, Examiner, ExaminerError, Operation};

mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.version {
        let blue = Style::new().blue();
        println!(
            "{} v{} ({})",
            blue.apply_to("examiner"),
            env!("CARGO_PKG_VERSION"),
            env!("GIT_HASH")
        );
        return Ok(());
    }

    let Some(command) = &cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let succeeded = match command {
        Commands::Contracts { operation } => {
            print_contracts(operation.as_deref())?;
            true
        }
        Commands::InitConfig { force } => {
            init_config(&cli, *force)?;
            true
        }
        Commands::AnalyzeLogs { file } => {
            let entries = read_json(file)?;
            let examiner = build_examiner(&cli)?;
            report(examiner.analyze_proctoring_logs(entries).await)?
        }
        Commands::Evaluate { file } => {
            let request = read_json(file)?;
            let examiner = build_examiner(&cli)?;
            report(examiner.evaluate_answer(request).await)?
        }
        Commands::ParseQuestions { file } => {
            let text = read_input(file)?;
            let examiner = build_examiner(&cli)?;
            report(examiner.parse_mcq_questions(Value::String(text)).await)?
        }
        Commands::Motto { name } => {
            let examiner = build_examiner(&cli)?;
            report(examiner.generate_company_motto(Value::String(name.join(" "))).await)?
        }
    };

    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}

fn load_config(cli: &Cli) -> examiner_core::Result<ExaminerConfig> {
    let mut config = match &cli.config {
        Some(path) => ExaminerConfig::load_from(path)?,
        None => ExaminerConfig::load()?,
    };

    config.apply_env_overrides();
    if let Some(model) = &cli.model {
        config.endpoint.model = model.clone();
    }
    Ok(config)
}

fn build_examiner(cli: &Cli) -> Result<Examiner> {
    let config = load_config(cli).map_err(setup_error)?;

    if let Some(path) = cli.debug_log.clone().or_else(|| config.logging.file.clone()) {
        logger::init(path);
    }

    examiner_core::info_log!(
        "Using {} model {}",
        config.endpoint.provider,
        config.endpoint.model
    );

    Examiner::from_config(&config).map_err(setup_error)
}

/// Keep the underlying cause in the chain, lead with the friendly message
fn setup_error(err: ExaminerError) -> anyhow::Error {
    let message = err.user_message();
    anyhow::Error::new(err).context(message)
}

fn init_config(cli: &Cli, force: bool) -> Result<()> {
    let target = match &cli.config {
        Some(path) => path.clone(),
        None => ExaminerConfig::user_config_path()
            .ok_or_else(|| anyhow!("Could not determine home directory"))?,
    };

    if target.exists() && !force {
        return Err(anyhow!(
            "{} already exists (use --force to overwrite)",
            target.display()
        ));
    }

    let mut config = ExaminerConfig::default();
    if let Some(model) = &cli.model {
        config.endpoint.model = model.clone();
    }
    config
        .save(Some(&target))
        .with_context(|| format!("Failed to write {}", target.display()))?;

    println!(
        "{} {}",
        Style::new().green().apply_to("Wrote"),
        target.display()
    );
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        return Ok(buffer);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn read_json(path: &Path) -> Result<Value> {
    let content = read_input(path)?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Print the envelope; returns whether it carried data
fn report<T: Serialize>(envelope: Envelope<T>) -> Result<bool> {
    println!("{}", serde_json::to_string_pretty(&envelope)?);

    if envelope.is_error() {
        eprintln!(
            "{} {}",
            Style::new().red().bold().apply_to("error:"),
            envelope.error_message().unwrap_or_default()
        );
        return Ok(false);
    }
    Ok(true)
}

fn print_contracts(filter: Option<&str>) -> Result<()> {
    let operations = match filter {
        Some(name) => vec![name.parse::<Operation>().map_err(|e| anyhow!(e))?],
        None => Operation::ALL.to_vec(),
    };

    let mut schemas = serde_json::Map::new();
    for operation in operations {
        schemas.insert(
            operation.name().to_string(),
            json!({
                "input": operation.input_contract().json_schema(),
                "output": operation.output_contract().json_schema(),
            }),
        );
    }

    println!("{}", serde_json::to_string_pretty(&Value::Object(schemas))?);
    Ok(())
}
