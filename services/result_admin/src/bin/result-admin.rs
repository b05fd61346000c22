//! services/result_admin/src/bin/result-admin.rs

use clap::Parser;
use dialoguer::{theme::ColorfulTheme, Confirm, Password};
use result_admin_core::{AuthContext, RemoteDataClient, SessionStore};
use result_admin_lib::{
    adapters::{FileSessionStore, HttpDataClient},
    cli::{Cli, Command},
    commands::{AdminContext, ScreenAction},
    config::Config,
    error::AdminError,
    render,
};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Command failed: {:?}", e);
            eprintln!("Error: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String, AdminError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!("Configuration loaded. Backend at {}", config.api_base_url);

    // --- 2. Initialize Adapters and the Session ---
    let client: Arc<dyn RemoteDataClient> = Arc::new(HttpDataClient::new(
        config.api_base_url.clone(),
        config.request_timeout,
    )?);
    let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(&config.session_path));
    let mut auth = AuthContext::new(client.clone(), store);

    // --- 3. Dispatch ---
    match cli.command {
        Command::Login { email, password } => {
            let password = match password {
                Some(p) => p,
                None => Password::with_theme(&ColorfulTheme::default())
                    .with_prompt("Password")
                    .interact()
                    .map_err(|e| AdminError::Internal(e.to_string()))?,
            };
            let user = auth.login(&email, &password).await?;
            Ok(format!("Logged in as {}", render::identity(user)))
        }
        Command::Logout => {
            // A stale or unreachable session is still cleared locally.
            if let Err(e) = auth.init().await {
                info!("Session could not be validated before logout: {}", e);
            }
            auth.teardown().await?;
            Ok("Logged out.\n".to_string())
        }
        command => {
            if !auth.init().await? {
                return Err(AdminError::NotAuthenticated);
            }
            let ctx = AdminContext::new(client, config.default_page_size);
            dispatch(&ctx, &auth, command).await
        }
    }
}

async fn dispatch(
    ctx: &AdminContext,
    auth: &AuthContext,
    command: Command,
) -> Result<String, AdminError> {
    let confirm = |prompt: &str| {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| AdminError::Internal(e.to_string()))
    };

    match command {
        Command::Whoami => auth
            .user()
            .map(render::identity)
            .ok_or(AdminError::NotAuthenticated),
        Command::List { screen, args } => {
            ctx.run_screen(screen, ScreenAction::List(args), &confirm).await
        }
        Command::Show { screen, id } => ctx.run_screen(screen, ScreenAction::Show(id), &confirm).await,
        Command::Create { screen, data } => {
            ctx.run_screen(screen, ScreenAction::Create(data), &confirm).await
        }
        Command::Update { screen, id, data } => {
            ctx.run_screen(screen, ScreenAction::Update { id, data }, &confirm)
                .await
        }
        Command::Delete { screen, id, yes } => {
            ctx.run_screen(screen, ScreenAction::Delete { id, yes }, &confirm)
                .await
        }
        Command::Options { kind } => ctx.options(kind.into()).await,
        Command::Transcript { student_id } => ctx.transcript(&student_id).await,
        Command::Distribution { session, course } => ctx.distribution(session, course).await,
        Command::Login { .. } | Command::Logout => Err(AdminError::Internal(
            "session commands are handled before dispatch".to_string(),
        )),
    }
}
