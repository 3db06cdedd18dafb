//! CODEOWNERS Query CLI
//!
//! A command-line tool for asking who owns the files of a repository.

use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::process::ExitCode as StdExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::signal;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::config::{CliError, ExitCode, ValidatedConfig, create_octocrab};
use cli::github::{OctocrabTeamChecker, UnauthenticatedTeamChecker};
use cli::output::{HumanOutput, JsonValidation, write_ownership_json};
use cli::repo::{repo_relative, resolve_query_path};
use cli::{Args, Command};
use codeowners_query_core::{
    BulkQueryEngine, OwnershipResolver, OwnershipResult, RuleStore, TeamChecker, Validator,
};

#[tokio::main]
async fn main() -> StdExitCode {
    // Parse command-line arguments
    let args = Args::parse();

    // Initialize tracing
    init_tracing(args.verbose, args.json);

    // Set up signal handling for graceful shutdown
    let terminated = Arc::new(AtomicBool::new(false));
    let terminated_clone = terminated.clone();

    tokio::spawn(async move {
        let ctrl_c = signal::ctrl_c();
        #[cfg(unix)]
        let terminate = async {
            signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("failed to install signal handler")
                .recv()
                .await;
        };
        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received SIGINT, shutting down...");
            }
            _ = terminate => {
                info!("Received SIGTERM, shutting down...");
            }
        }

        terminated_clone.store(true, Ordering::SeqCst);
    });

    let exit_code = run(args, &terminated).await;

    // Check if we were terminated by signal
    if terminated.load(Ordering::SeqCst) {
        return StdExitCode::from(ExitCode::Terminated as u8);
    }

    StdExitCode::from(i32::from(exit_code) as u8)
}

/// Initialize tracing based on verbosity level.
fn init_tracing(verbosity: u8, json_output: bool) {
    // Don't output logs when using JSON output mode
    if json_output {
        return;
    }

    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let mut filter = EnvFilter::from_default_env().add_directive(level.into());
    for directive in ["octocrab=warn", "hyper=warn", "reqwest=warn"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();
}

/// Run the requested command with the given arguments.
async fn run(args: Args, terminated: &AtomicBool) -> ExitCode {
    let use_colors = !args.json && io::stdout().is_terminal();

    match execute(&args, terminated, use_colors).await {
        Ok(code) => code,
        Err(CliError::Io(e)) => {
            error!("Failed to write output: {}", e);
            ExitCode::StartupFailure
        }
        Err(e) => {
            let use_colors = !args.json && io::stderr().is_terminal();
            let _ = HumanOutput::new(io::stderr().lock(), use_colors).write_error(&e.to_string());
            ExitCode::StartupFailure
        }
    }
}

async fn execute(
    args: &Args,
    terminated: &AtomicBool,
    use_colors: bool,
) -> Result<ExitCode, CliError> {
    let config = ValidatedConfig::from_args(args)?;
    let root = config.repository.root();

    debug!("Validated configuration: {:?}", config);
    if config.repository.is_git() {
        info!(
            "Repository root: {} (origin: {})",
            root.display(),
            config.repository.remote().unwrap_or("none")
        );
    } else {
        info!("Not a git repository, using {} as the root", root.display());
    }

    if args.command == Command::CacheClear {
        config.clear_cache()?;
        if !config.json_output {
            writeln!(io::stdout().lock(), "Cleared cached results for {}", root.display())?;
        }
        return Ok(ExitCode::Success);
    }

    let store = RuleStore::build(root)?;
    info!(
        "Loaded {} rule(s) from {}",
        store.len(),
        store.source().display()
    );

    let resolver = OwnershipResolver::new(store);
    let mut engine = BulkQueryEngine::new(&resolver, root);
    if let Some(cache) = config.result_cache() {
        engine = engine.with_cache(cache);
    }

    if terminated.load(Ordering::SeqCst) {
        return Ok(ExitCode::Terminated);
    }

    let cwd = std::env::current_dir()
        .map_err(|e| CliError::Invalid(format!("cannot read working directory: {}", e)))?;
    let mut stdout = io::stdout().lock();

    match &args.command {
        Command::Owners { paths } => {
            let result = owners_of(&resolver, root, &cwd, paths);
            write_ownership(&mut stdout, &result, config.json_output, use_colors)?;
        }
        Command::Files { path, recursive } => {
            let target = resolve_query_path(root, &cwd, path);
            let result = engine.query_files_or_empty(target, *recursive);
            write_ownership(&mut stdout, &result, config.json_output, use_colors)?;
        }
        Command::OwnedBy { owner } => {
            let result = engine.files_owned_by(owner);
            write_paths(&mut stdout, &result, config.json_output, use_colors)?;
        }
        Command::Unowned => {
            let result = engine.unowned_files();
            write_paths(&mut stdout, &result, config.json_output, use_colors)?;
        }
        Command::Validate => {
            let checker: Box<dyn TeamChecker> =
                match create_octocrab(args, &config.github_base_url)? {
                    Some(client) => Box::new(OctocrabTeamChecker::new(client)),
                    None => {
                        warn!("No GitHub authentication configured; team owners are not verified");
                        Box::new(UnauthenticatedTeamChecker)
                    }
                };

            let issues = Validator::new(&engine, checker.as_ref()).validate().await;
            if terminated.load(Ordering::SeqCst) {
                return Ok(ExitCode::Terminated);
            }
            debug!("Validation found {} issue(s)", issues.len());

            if config.json_output {
                JsonValidation::new(&issues).write(&mut stdout)?;
            } else {
                HumanOutput::new(&mut stdout, use_colors).write_validation(&issues)?;
            }
            return Ok(config.exit_code_for_issues(issues.len()));
        }
        Command::CacheClear => {}
    }

    Ok(ExitCode::Success)
}

/// Resolves each user-supplied path, logging the rule that decided it.
fn owners_of(
    resolver: &OwnershipResolver,
    root: &Path,
    cwd: &Path,
    paths: &[String],
) -> OwnershipResult {
    paths
        .iter()
        .map(|path| {
            let relative = repo_relative(root, cwd, path);
            match resolver.matching_rule(&relative) {
                Some(rule) => info!(
                    "'{}' decided by line {}: {}",
                    relative,
                    rule.line(),
                    rule.pattern()
                ),
                None => info!("'{}' matches no rule", relative),
            }
            let owners = resolver.resolve(&relative);
            (relative, owners)
        })
        .collect()
}

fn write_ownership<W: Write>(
    writer: &mut W,
    result: &OwnershipResult,
    json: bool,
    use_colors: bool,
) -> io::Result<()> {
    if json {
        write_ownership_json(writer, result)
    } else {
        HumanOutput::new(writer, use_colors).write_ownership(result)
    }
}

fn write_paths<W: Write>(
    writer: &mut W,
    result: &OwnershipResult,
    json: bool,
    use_colors: bool,
) -> io::Result<()> {
    if json {
        write_ownership_json(writer, result)
    } else {
        HumanOutput::new(writer, use_colors).write_paths(result)
    }
}
