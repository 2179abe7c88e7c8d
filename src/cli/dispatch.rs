// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Command dispatch and execution.

use std::io::Read;

use crate::commit::CommitMessage;
use crate::config::LintConfig;
use crate::error::{CgError, CommitError, ConfigError, LintError, Result, ResultExt};
use crate::rules::{RuleEngine, ValidationResult};

use super::args::{CheckArgs, Cli, Commands, ConfigArgs, InitArgs, LintArgs};

/// Run the CLI with the given arguments.
pub fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Lint(args) => run_lint(&cli, &load_config(&cli)?, args),
        Commands::Check(args) => run_check(&cli, &load_config(&cli)?, args),
        Commands::Config(args) => run_config(&cli, args),
        Commands::Init(args) => run_init(args),
        Commands::Version => run_version(),
    }
}

/// Load the configuration named on the command line, or discover one.
fn load_config(cli: &Cli) -> Result<LintConfig> {
    if let Some(config_path) = &cli.config {
        LintConfig::load_from(config_path)
    } else {
        LintConfig::load()
    }
}

/// Run the lint command.
fn run_lint(cli: &Cli, config: &LintConfig, args: &LintArgs) -> Result<()> {
    tracing::debug!("Running lint command with args: {:?}", args);

    let raw = if let Some(ref message) = args.message {
        message.clone()
    } else if let Some(ref path) = args.file {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CgError::Commit(CommitError::ReadFailed {
                source_name: path.display().to_string(),
                message: e.to_string(),
            })
        })?;
        CommitMessage::strip_comments(&content)
    } else {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| {
                CgError::Commit(CommitError::ReadFailed {
                    source_name: "stdin".to_string(),
                    message: e.to_string(),
                })
            })?;
        content
    };

    let engine = RuleEngine::new(config.clone());
    let result = engine.validate_str(&raw);
    result.print(cli.format);

    exit_status(std::slice::from_ref(&result), args.strict)
}

/// Run the check command.
fn run_check(cli: &Cli, config: &LintConfig, args: &CheckArgs) -> Result<()> {
    tracing::debug!("Running check command with args: {:?}", args);

    let engine = RuleEngine::new(config.clone());

    let results = if args.range || args.target.contains("..") {
        engine.check_range(&args.target)?
    } else {
        vec![engine.check_commit(&args.target)?]
    };

    if results.is_empty() {
        println!("No commits to check");
    }

    if cli.format == Some(super::args::OutputFormat::Json) {
        let json: Vec<_> = results.iter().map(ValidationResult::to_json).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&json).unwrap_or_default()
        );
    } else {
        for result in &results {
            result.print(cli.format);
        }
    }

    exit_status(&results, args.strict)
}

/// Turn validation results into the command's exit status.
fn exit_status(results: &[ValidationResult], strict: bool) -> Result<()> {
    let errors: usize = results.iter().map(|r| r.errors.len()).sum();
    let warnings: usize = results.iter().map(|r| r.warnings.len()).sum();

    if errors > 0 || (strict && warnings > 0) {
        Err(CgError::Lint(LintError::Failed { errors, warnings }))
    } else {
        Ok(())
    }
}

/// Run the config command.
fn run_config(cli: &Cli, args: &ConfigArgs) -> Result<()> {
    let config = if args.builtin {
        LintConfig::builtin().clone()
    } else {
        load_config(cli)?
    };

    let rendered = if args.json {
        serde_json::to_string_pretty(&config).context("serializing configuration")?
    } else {
        toml::to_string_pretty(&config).context("serializing configuration")?
    };

    println!("{}", rendered);
    Ok(())
}

/// Run the init command.
fn run_init(args: &InitArgs) -> Result<()> {
    use crate::config::default::example_config;

    tracing::debug!("Running init command with args: {:?}", args);

    if args.output.exists() && !args.force {
        return Err(CgError::Config(ConfigError::AlreadyExists {
            path: args.output.clone(),
        }));
    }

    std::fs::write(&args.output, example_config())?;

    println!("✓ Created {}", args.output.display());
    Ok(())
}

/// Run the version command.
fn run_version() -> Result<()> {
    println!("cg {}", crate::version::version_string());

    if let Some(sha) = crate::version::GIT_SHA {
        println!("git commit: {}", sha);
    }
    if let Some(date) = crate::version::GIT_COMMIT_DATE {
        println!("commit date: {}", date);
    }

    Ok(())
}
