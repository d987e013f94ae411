//! Till terminal register

use std::{process::ExitCode, sync::Arc};

use thiserror::Error;
use till_app::{
    api::{ApiError, Session},
    checkout::CheckoutController,
    context::{AppInitError, PosContext},
    scanner::ChannelDecoder,
    storage::FileCartStore,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

use crate::{
    config::RegisterConfig,
    notifier::TerminalNotifier,
    register::{Register, RegisterError},
};

mod commands;
mod config;
mod notifier;
mod observability;
mod register;
mod render;

/// Scanner lines buffered before input is dropped.
const SCANNER_BUFFER: usize = 16;

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Init(#[from] AppInitError),

    #[error("no se pudo iniciar sesión: {0}")]
    Login(#[source] ApiError),

    #[error(transparent)]
    Register(#[from] RegisterError),
}

/// Till register entry point
#[tokio::main]
pub async fn main() -> ExitCode {
    // Load configuration from .env and CLI arguments
    let config = match RegisterConfig::load() {
        Ok(config) => config,
        Err(error) => {
            // clap renders help and version requests as errors too
            _ = error.print();

            return if error.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(e) = observability::init(&config) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized, must use eprintln for setup errors"
        )]
        {
            eprintln!("Logging error: {e}");
        }

        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(%error, "register stopped");

            ExitCode::FAILURE
        }
    }
}

async fn run(config: RegisterConfig) -> Result<(), StartupError> {
    let store = FileCartStore::new(&config.storage.data_dir);
    let (decoder, scanner_input) = ChannelDecoder::new(SCANNER_BUFFER);

    info!(store = %store.path().display(), api = %config.api.api_url, "starting register");

    let (context, api) = PosContext::connect(
        config.api.api_config(),
        Arc::new(store),
        Arc::new(TerminalNotifier::stdout()),
        Arc::new(decoder),
    )?;

    let settings = config.api;
    let mut logged_in = false;

    if let Some(token) = settings.api_token {
        api.set_session(Session::new(token, settings.refresh_token))
            .await;
    } else if let (Some(username), Some(password)) = (settings.username, settings.password) {
        let user = context
            .auth
            .login(&username, &password)
            .await
            .map_err(StartupError::Login)?;

        info!(user = %user.display_name(), "cashier logged in");

        logged_in = true;
    } else {
        warn!("no credentials configured; requests are sent without a session");
    }

    let mut register = Register::new(
        CheckoutController::start(&context),
        BufReader::new(tokio::io::stdin()).lines(),
        std::io::stdout(),
        scanner_input,
    );

    let result = register.run().await;

    // A session handed in by token outlives the register.
    if logged_in && api.has_session().await {
        context.auth.logout().await;
    }

    result?;

    Ok(())
}
