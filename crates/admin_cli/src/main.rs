mod cli;
mod commands;

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use log::{debug, error};
use smart_energy_admin::logging::init_logging;
use smart_energy_admin::{AdminError, ConfigError, EnvConfig, Settings, SmartEnergyAdmin};

use crate::cli::Cli;
use crate::commands::{run, ReloginNotice};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();

    let settings = match resolve_settings(&args) {
        Ok(settings) => settings,
        Err(err) => {
            init_logging(None, args.verbose);
            error!("Unable to load configuration: {err}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(settings.log_level.as_deref(), args.verbose);
    debug!(
        "api {} with session at {}",
        settings.api_url,
        settings.session_path.display()
    );

    let admin = match SmartEnergyAdmin::connect(&settings, Arc::new(ReloginNotice)) {
        Ok(admin) => admin,
        Err(err) => {
            error!("Unable to create the admin client: {err}");
            return ExitCode::FAILURE;
        }
    };

    match run(&admin, args.command).await {
        Ok(()) => ExitCode::SUCCESS,
        // The expiry handler already told the operator what to do.
        Err(err) if err.is_session_expired() && !matches!(err, AdminError::NotAuthenticated) => {
            ExitCode::from(2)
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Environment and config file, then command-line flags on top.
fn resolve_settings(args: &Cli) -> Result<Settings, ConfigError> {
    let mut env_config = EnvConfig::from_env();
    if let Some(path) = &args.session_path {
        env_config.session_path = Some(path.clone());
    }
    let home = env::var_os("HOME").map(PathBuf::from);

    let mut settings = Settings::resolve(&env_config, home.as_deref())?;
    if let Some(api_url) = &args.api_url {
        settings = settings.with_api_url(api_url);
    }
    if let Some(timeout) = args.timeout {
        settings = settings.with_timeout_secs(timeout);
    }
    Ok(settings)
}
