use std::process::ExitCode;

use fitforge_db_init::config::Config;
use fitforge_db_init::error::ProvisionError;
use fitforge_db_init::{env, provision, telemetry};
use tracing::{info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let env_loaded = env::load_environment();
    let _otel_guard = telemetry::init_tracing();

    match env_loaded {
        Ok(files) => env::log_loaded(&files),
        Err(err) => warn!(error = %err, "Failed to load environment files"),
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            let err = ProvisionError::from(err);
            err.log_and_record("configuration");
            println!("{}", err);
            return Ok(ExitCode::FAILURE);
        }
    };

    info!(
        backend = config.backend.as_str(),
        host = %config.host,
        port = config.port,
        user = %config.user,
        auth_plugin = config.auth_plugin.as_str(),
        "Provisioning gym_trainer database"
    );

    let report = provision(&config).await;

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        warn!(
            halted = report.halted(),
            failed_tables = ?report.failed_tables(),
            "Provisioning finished with failures"
        );
        Ok(ExitCode::FAILURE)
    }
}
