pub mod config;
pub mod database;
pub mod env;
pub mod error;
pub mod models;
pub mod telemetry;
#[cfg(test)]
mod test;

use config::Config;
use database::{ProvisionReport, Provisioner};

/// Provisions the `gym_trainer` database described by `config`.
pub async fn provision(config: &Config) -> ProvisionReport {
    Provisioner::new(config).provision().await
}
