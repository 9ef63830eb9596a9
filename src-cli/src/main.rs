//! AeroDesk command shell
//!
//! Every invocation is one application load: the stored session is
//! restored first, then the requested command runs against it.

mod commands;
mod state;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use aerodesk_core::Config;
use commands::CommandResult;
use state::AppState;

#[derive(Parser)]
#[command(
    name = "aerodesk",
    about = "Sign in to the booking backend and manage the local session",
    version
)]
struct Cli {
    /// JSON config file (defaults plus AERODESK_* variables otherwise)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the restored session
    Status,

    /// Sign in with a username and password
    Login {
        #[arg(long, short = 'u')]
        username: String,

        #[arg(long, short = 'p', env = "AERODESK_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign in with tokens delivered by an OAuth redirect
    Oauth {
        #[arg(long)]
        access_token: String,

        #[arg(long)]
        refresh_token: String,
    },

    /// Exchange the OAuth session cookie for tokens and sign in
    OauthComplete,

    /// Sign out and clear stored credentials
    Logout,

    /// Refresh and print the cart item count
    Cart,

    /// Trade the stored refresh token for a new access token
    Refresh,
}

fn print<T: Serialize>(result: &CommandResult<T>) -> Result<bool> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(result.success)
}

#[tokio::main]
async fn main() -> Result<()> {
    aerodesk_core::init_logging();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path),
        None => Config::from_env(),
    }
    .context("Failed to load configuration")?;

    let state = AppState::new(config).context("Failed to open client")?;
    let outcome = state.initialize().await;

    let success = match cli.command {
        Command::Status => print(&commands::session::status(&state, &outcome))?,
        Command::Login { username, password } => {
            print(&commands::auth::login(&state, username, password).await)?
        }
        Command::Oauth {
            access_token,
            refresh_token,
        } => print(&commands::auth::oauth(&state, access_token, refresh_token).await)?,
        Command::OauthComplete => print(&commands::auth::oauth_complete(&state).await)?,
        Command::Logout => print(&commands::auth::logout(&state).await)?,
        Command::Cart => print(&commands::cart::cart(&state).await)?,
        Command::Refresh => print(&commands::session::refresh(&state).await)?,
    };

    if !success {
        std::process::exit(1);
    }

    Ok(())
}
