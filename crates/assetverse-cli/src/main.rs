//! AssetVerse CLI: drives the client core from a terminal.
//!
//! Set ASSETVERSE_BACKEND_URL (or API_URL) and, to act as a signed-in user,
//! ASSETVERSE_USER_EMAIL / ASSETVERSE_USER_NAME / ASSETVERSE_USER_ROLE.

use anyhow::Context;
use assetverse_app::{links_for, resolve_dashboard_route, AppContext};
use assetverse_cli::{
    init_tracing, nav_table, route_json, session_json, simulated_state, upload_summary,
};
use assetverse_core::{ClientConfig, Role, TargetFolder};
use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "assetverse", about = "AssetVerse client CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a file through a backend-signed grant
    Upload {
        /// Path to the file to upload
        file: std::path::PathBuf,
        /// Target folder: assets or users
        #[arg(long, default_value = "assets")]
        folder: TargetFolder,
    },
    /// Ask the backend to create the storage folders
    InitFolders,
    /// Print the dashboard links for a role (defaults to the signed-in role)
    Nav {
        #[arg(long)]
        role: Option<Role>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show what the dashboard does when entered at a route
    Route {
        /// Route path, e.g. /dashboard
        path: String,
        /// Evaluate for a simulated user with this role
        #[arg(long)]
        role: Option<Role>,
        /// Evaluate as a signed-out visitor
        #[arg(long)]
        signed_out: bool,
    },
    /// Show the current session
    Whoami,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = ClientConfig::from_env().context(
        "Invalid configuration. Check ASSETVERSE_BACKEND_URL and ASSETVERSE_USER_ROLE",
    )?;
    let ctx = AppContext::from_config(config)?;
    ctx.start().await;

    let outcome = run(&ctx, cli.command).await;
    if let Err(ref err) = outcome {
        tracing::error!(error = %err, "Command failed");
    }
    ctx.shutdown();
    outcome
}

async fn run(ctx: &AppContext, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Upload { file, folder } => {
            let uploader = ctx.uploader();
            uploader.set_target_folder(folder);
            uploader
                .select_path(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;

            let outcome = uploader.upload().await;
            print_json(&upload_summary(&uploader.snapshot()))?;
            outcome?;
        }
        Commands::InitFolders => {
            let outcome = ctx.folders().initialize_folders().await;
            let state = ctx.folders().snapshot();
            print_json(&serde_json::json!({
                "status": state.status,
                "error": state.error,
            }))?;
            outcome?;
        }
        Commands::Nav { role, json } => {
            let links = match role {
                Some(role) => links_for(Some(role)),
                None => ctx.nav_links(),
            };
            if json {
                print_json(&links)?;
            } else {
                println!("{}", nav_table(links));
            }
        }
        Commands::Route {
            path,
            role,
            signed_out,
        } => {
            let decision = if role.is_some() || signed_out {
                resolve_dashboard_route(&path, &simulated_state(role, signed_out))
            } else {
                ctx.route(&path)
            };
            print_json(&route_json(&path, decision))?;
        }
        Commands::Whoami => match ctx.session().session() {
            Some(session) => print_json(&session_json(&session))?,
            None => {
                let state = ctx.session().snapshot();
                print_json(&serde_json::json!({
                    "signed_in": false,
                    "error": state.error,
                }))?;
            }
        },
    }
    Ok(())
}
