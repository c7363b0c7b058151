mod cli;

use std::io::Read;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use gist_compute::{SummarizeRequest, SummarizeService, SummaryMethod};
use gist_core::config::{load_dotenv, Config};
use serde_json::json;
use tracing::info;

use crate::cli::{CliArgs, Command};

fn main() -> Result<ExitCode> {
    // Logs go to stderr so stdout carries only JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    load_dotenv();
    let args = CliArgs::parse();

    let config = match args.profile.as_deref() {
        Some(profile) => Config::for_profile(profile),
        None => Config::from_env(),
    };
    config.validate().context("invalid configuration")?;
    config.log_summary();

    let service = SummarizeService::from_config(&config);

    match args.command {
        Command::Summarize {
            file,
            sentences,
            method,
        } => {
            let text = read_text(file.as_deref())?;
            let request = SummarizeRequest::new(
                text,
                sentences.unwrap_or(config.summary.default_sentences),
                SummaryMethod::from(method.as_deref().unwrap_or(&config.summary.default_method)),
            );
            info!(method = %request.method, num_sentences = request.num_sentences, "summarizing");

            match service.summarize(&request) {
                Ok(response) => print_json(&serde_json::to_value(&response)?)?,
                Err(e) => {
                    print_json(&e.to_json())?;
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Command::Health => {
            let health = serde_json::to_value(service.health())?;
            print_json(&json!({ "health": health, "config": config.redacted_summary() }))?;
        }
        Command::Models => {
            let methods = serde_json::to_value(service.available_methods())?;
            print_json(&json!({ "methods": methods }))?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn read_text(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read '{}'", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_text_loads_file_contents() {
        let path = std::env::temp_dir().join(format!("gist-cli-input-{}.txt", std::process::id()));
        std::fs::write(&path, "First sentence. Second sentence.").unwrap();

        let text = read_text(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(text, "First sentence. Second sentence.");
    }

    #[test]
    fn missing_file_error_names_the_path() {
        let path = Path::new("/nonexistent/gist-input.txt");
        let err = read_text(Some(path)).unwrap_err();

        assert_eq!(err.to_string(), "failed to read '/nonexistent/gist-input.txt'");
        assert!(err.downcast_ref::<std::io::Error>().is_some());
    }
}
