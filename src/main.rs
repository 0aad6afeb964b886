use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::builder::FalseyValueParser;
use clap::{ArgAction, Args, Parser, Subcommand};
use colored::Colorize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ghia::config::{self, ConfigError};
use ghia::github::{OctocrabClient, build_octocrab, fetch_authenticated_user};
use ghia::reconcile::Strategy;
use ghia::report::format::{write_batch_report, write_listing_failure};
use ghia::runner::{AssignmentConfig, RunError, run};
use ghia::server::{AppState, GitHubClients, build_router};
use ghia::types::RepoId;

const EXIT_CONFIG: u8 = 2;
const EXIT_LISTING: u8 = 10;

/// GitHub Issues Auto-Assigner.
#[derive(Debug, Parser)]
#[command(name = "ghia", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Assign every open issue of a repository once, then exit.
    Run(RunArgs),
    /// Receive GitHub webhooks and assign issues as they change.
    Serve(ServeArgs),
}

/// Options shared by both subcommands.
#[derive(Debug, Args)]
struct AssignArgs {
    /// How to treat users already assigned to an issue.
    #[arg(short, long, value_enum, env = "GHIA_STRATEGY", default_value_t = Strategy::Append)]
    strategy: Strategy,

    /// Report what would change without changing anything on GitHub.
    #[arg(
        short,
        long,
        env = "GHIA_DRYRUN",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new()
    )]
    dry_run: bool,
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Repository as `owner/name`.
    reposlug: RepoId,

    /// File with the `[github]` token.
    #[arg(short = 'a', long)]
    config_auth: PathBuf,

    /// File with the `[patterns]` and optional `[fallback]` sections.
    #[arg(short = 'r', long)]
    config_rules: PathBuf,

    #[command(flatten)]
    assign: AssignArgs,
}

#[derive(Debug, Args)]
struct ServeArgs {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:5000")]
    listen: SocketAddr,

    /// Colon-separated configuration files, merged in order.
    #[arg(long, env = "GHIA_CONFIG")]
    config: String,

    #[command(flatten)]
    assign: AssignArgs,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ghia=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let result = match cli.command {
        Command::Run(args) => run_once(args).await,
        Command::Serve(args) => serve(args).await,
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {e:#}", "ERROR".red().bold());
            if e.downcast_ref::<ConfigError>().is_some() {
                ExitCode::from(EXIT_CONFIG)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run_once(args: RunArgs) -> anyhow::Result<ExitCode> {
    let auth = config::load_auth(&args.config_auth)?;
    let rules = config::load_rules(&args.config_rules)?;
    let config = AssignmentConfig {
        rules: rules.rules,
        strategy: args.assign.strategy,
        fallback: rules.fallback,
        dry_run: args.assign.dry_run,
    };

    let github = OctocrabClient::from_token(auth.token, args.reposlug.clone())
        .context("could not build GitHub client")?;

    let batch = match run(&github, &args.reposlug, &config).await {
        Ok(batch) => batch,
        Err(e @ RunError::ListingFailed { .. }) => {
            tracing::error!(error = %e, "Listing failed");
            write_listing_failure(&mut io::stderr().lock(), &args.reposlug)?;
            return Ok(ExitCode::from(EXIT_LISTING));
        }
    };

    let mut out = io::stdout().lock();
    write_batch_report(&mut out, &mut io::stderr().lock(), &batch)?;
    out.flush()?;
    Ok(ExitCode::SUCCESS)
}

async fn serve(args: ServeArgs) -> anyhow::Result<ExitCode> {
    let paths = config::split_config_paths(&args.config);
    let server_config = config::load_merged(&paths)?;

    let octocrab =
        build_octocrab(server_config.auth.token).context("could not build GitHub client")?;
    let user = match fetch_authenticated_user(&octocrab).await {
        Ok(user) => user,
        Err(e) if e.is_unauthorized() => {
            return Err(anyhow::Error::new(e).context("GitHub token was rejected"));
        }
        Err(e) => {
            return Err(anyhow::Error::new(e).context("could not fetch the authenticated user"));
        }
    };
    info!(user = %user.login, "Authenticated");

    let config = AssignmentConfig {
        rules: server_config.rules.rules,
        strategy: args.assign.strategy,
        fallback: server_config.rules.fallback,
        dry_run: args.assign.dry_run,
    };
    let secret = server_config.auth.secret.map(String::into_bytes);
    let state = AppState::new(GitHubClients::new(octocrab), config, secret, user);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("could not listen on {}", args.listen))?;
    info!(addr = %args.listen, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(ExitCode::SUCCESS)
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}
